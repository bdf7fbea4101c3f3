use rand::Rng;
use tracing::{debug, info};

use crate::error::MazeError;
use crate::simulation::agent::{Navigator, Percept};
use crate::simulation::geometry::{Direction, Move, Position};
use crate::simulation::memory::{DoorState, Observation};

/// A bounded maze of periodically opening doors.
///
/// Each cell has its own door on each side; a door with period `p` is open
/// on turns divisible by `p`, and a step succeeds only when the door being
/// left and the neighbor's facing door are open on the same turn. Doors on
/// the outer edge are walls. Coordinates are `(column, row)` from the
/// top-left corner.
#[derive(Clone, Debug)]
pub struct TimingMaze {
    width: usize,
    height: usize,
    periods: Vec<[u64; 4]>,
    start: (usize, usize),
    goal: (usize, usize),
    agent: (usize, usize),
}

impl TimingMaze {
    /// Builds a maze whose door periods come from `period(column, row, direction)`.
    ///
    /// # Errors
    /// Fails on an empty maze, out-of-bounds start or goal, or a zero period
    /// on an interior door.
    pub fn from_fn(
        width: usize,
        height: usize,
        start: (usize, usize),
        goal: (usize, usize),
        mut period: impl FnMut(usize, usize, Direction) -> u64,
    ) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::Empty { width, height });
        }
        if start.0 >= width || start.1 >= height {
            return Err(MazeError::StartOutOfBounds(start.0, start.1));
        }
        if goal.0 >= width || goal.1 >= height {
            return Err(MazeError::GoalOutOfBounds(goal.0, goal.1));
        }

        let mut periods = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let mut doors = [0; 4];
                for d in Direction::ALL {
                    if Self::leads_outside(width, height, col, row, d) {
                        continue;
                    }
                    let p = period(col, row, d);
                    if p == 0 {
                        return Err(MazeError::InvalidPeriod(p));
                    }
                    doors[d.index()] = p;
                }
                periods.push(doors);
            }
        }

        Ok(Self {
            width,
            height,
            periods,
            start,
            goal,
            agent: start,
        })
    }

    /// Every interior door opens every `period` turns.
    ///
    /// # Errors
    /// See [`TimingMaze::from_fn`].
    pub fn uniform(
        width: usize,
        height: usize,
        start: (usize, usize),
        goal: (usize, usize),
        period: u64,
    ) -> Result<Self, MazeError> {
        Self::from_fn(width, height, start, goal, |_, _, _| period)
    }

    /// Door periods drawn uniformly from `1..=max_period`.
    ///
    /// # Errors
    /// See [`TimingMaze::from_fn`].
    pub fn random(
        width: usize,
        height: usize,
        start: (usize, usize),
        goal: (usize, usize),
        max_period: u64,
        rng: &mut impl Rng,
    ) -> Result<Self, MazeError> {
        if max_period == 0 {
            return Err(MazeError::InvalidPeriod(0));
        }
        Self::from_fn(width, height, start, goal, |_, _, _| rng.random_range(1..=max_period))
    }

    const fn leads_outside(
        width: usize,
        height: usize,
        col: usize,
        row: usize,
        d: Direction,
    ) -> bool {
        match d {
            Direction::Left => col == 0,
            Direction::Up => row == 0,
            Direction::Right => col + 1 == width,
            Direction::Down => row + 1 == height,
        }
    }

    fn step_from(&self, (col, row): (usize, usize), d: Direction) -> Option<(usize, usize)> {
        if Self::leads_outside(self.width, self.height, col, row, d) {
            return None;
        }
        let (dx, dy) = d.delta();
        Some((col.checked_add_signed(dx as isize)?, row.checked_add_signed(dy as isize)?))
    }

    /// What the sensor sees of one door on `turn`.
    #[must_use]
    pub fn door_state(&self, (col, row): (usize, usize), d: Direction, turn: u64) -> DoorState {
        if Self::leads_outside(self.width, self.height, col, row, d) {
            return DoorState::Boundary;
        }
        let period = self.periods[row * self.width + col][d.index()];
        if turn % period == 0 {
            DoorState::Open
        } else {
            DoorState::Closed
        }
    }

    /// Whether a step from `cell` in direction `d` succeeds on `turn`.
    #[must_use]
    pub fn can_pass(&self, cell: (usize, usize), d: Direction, turn: u64) -> bool {
        let Some(next) = self.step_from(cell, d) else {
            return false;
        };
        self.door_state(cell, d, turn) == DoorState::Open
            && self.door_state(next, d.opposite(), turn) == DoorState::Open
    }

    /// Sensor reading for `turn`: every cell within Euclidean distance
    /// `radius` of the agent, plus the goal offset if it is in range.
    #[must_use]
    pub fn percept(&self, turn: u64, radius: u32) -> Percept {
        let r = i64::from(radius);
        let (ax, ay) = (self.agent.0 as i64, self.agent.1 as i64);
        let mut observations = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (x, y) = (ax + dx, ay + dy);
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let cell = (x as usize, y as usize);
                for d in Direction::ALL {
                    observations.push(Observation::new(dx, dy, d, self.door_state(cell, d, turn)));
                }
            }
        }

        let (gx, gy) = (self.goal.0 as i64 - ax, self.goal.1 as i64 - ay);
        let goal = (gx * gx + gy * gy <= r * r).then_some((gx, gy));
        Percept { observations, goal }
    }

    /// Applies the agent's move on `turn`. Returns false if a step was refused.
    pub fn apply(&mut self, chosen: Move, turn: u64) -> bool {
        let Move::Go(d) = chosen else {
            return true;
        };
        if !self.can_pass(self.agent, d, turn) {
            return false;
        }
        if let Some(next) = self.step_from(self.agent, d) {
            self.agent = next;
        }
        true
    }

    /// The agent's cell relative to its start, in the navigator's frame.
    #[must_use]
    pub fn agent_offset(&self) -> Position {
        Position::new(
            self.agent.0 as i64 - self.start.0 as i64,
            self.agent.1 as i64 - self.start.1 as i64,
        )
    }

    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.agent == self.goal
    }

    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[must_use]
    pub const fn goal(&self) -> (usize, usize) {
        self.goal
    }
}

/// Summary of one run of a navigator through a maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpisodeReport {
    pub turns: u64,
    pub reached_goal: bool,
    pub waits: u64,
    /// Steps the maze refused
    pub rejected_moves: u64,
    /// Turns on which the navigator's position disagreed with the maze
    pub position_mismatches: u64,
}

/// Drives `navigator` through `maze` until the goal or `max_turns`.
pub fn run_episode<R: Rng>(
    maze: &mut TimingMaze,
    navigator: &mut Navigator<R>,
    max_turns: u64,
) -> EpisodeReport {
    let radius = navigator.config().radius;
    let mut report = EpisodeReport::default();

    for turn in 1..=max_turns {
        let percept = maze.percept(turn, radius);
        let chosen = navigator.decide(&percept);
        report.turns = turn;

        if chosen.is_wait() {
            report.waits += 1;
        }
        if !maze.apply(chosen, turn) {
            report.rejected_moves += 1;
        }
        if navigator.position() != maze.agent_offset() {
            report.position_mismatches += 1;
        }
        if maze.reached_goal() {
            report.reached_goal = true;
            info!(turn, waits = report.waits, "goal reached");
            return report;
        }
    }

    debug!(max_turns, "turn limit reached");
    report
}
