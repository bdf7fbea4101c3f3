//! Grid primitives: positions, directions, moves and period arithmetic.

use serde::{Deserialize, Serialize};

/// A cell in agent-relative coordinates. The start cell is `(0, 0)`,
/// x grows to the right and y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in `direction`.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// The cell `distance` steps away in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i64) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }

    #[must_use]
    pub const fn translate(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Coordinate along the axis `direction` moves on.
    #[must_use]
    pub const fn along(self, direction: Direction) -> i64 {
        if direction.is_horizontal() {
            self.x
        } else {
            self.y
        }
    }

    #[must_use]
    pub const fn manhattan(self, other: Self) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// One of the four grid directions.
///
/// The declaration order doubles as the fixed tie-breaking priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// All directions in priority order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Unit offset `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// True for directions that decrease their coordinate (LEFT and UP).
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Left | Self::Up)
    }
}

/// A single turn's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Wait,
    Go(Direction),
}

impl Move {
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Wait => None,
            Self::Go(direction) => Some(direction),
        }
    }

    #[must_use]
    pub const fn is_wait(self) -> bool {
        matches!(self, Self::Wait)
    }
}

impl From<Direction> for Move {
    fn from(direction: Direction) -> Self {
        Self::Go(direction)
    }
}

#[must_use]
pub const fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; zero if either argument is zero.
#[must_use]
pub const fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}
