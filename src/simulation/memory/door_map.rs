//! Door-period model of the maze built from partial sensor readings.
//!
//! Periods are learned by folding every turn on which a door was seen open
//! into a running greatest common divisor. Every open turn is a multiple of
//! the door's true period, so the estimate is always a multiple of the true
//! period as well. It may stay a strict multiple (a door only ever seen on
//! turns divisible by 2P folds to 2P); the model accepts that approximation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{DoorState, Observation};
use crate::simulation::geometry::{gcd, lcm, Direction, Position};
use crate::simulation::params::{BOUNDARY_VALUE, VALUE_WINDOW};

/// What the agent believes about one door of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorFrequency {
    /// Never seen open.
    #[default]
    Unknown,
    /// Believed to open every `n` turns.
    Period(u64),
    /// Edge of the maze; never changes once set.
    Boundary,
}

impl DoorFrequency {
    #[must_use]
    pub const fn period(self) -> Option<u64> {
        match self {
            Self::Period(n) => Some(n),
            Self::Unknown | Self::Boundary => None,
        }
    }

    #[must_use]
    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::Boundary)
    }

    /// Folds a turn on which the door was seen open into the estimate.
    /// Turn 0 is a multiple of every period and carries no information.
    #[must_use]
    pub const fn fold_open(self, turn: u64) -> Self {
        if turn == 0 {
            return self;
        }
        match self {
            Self::Unknown => Self::Period(turn),
            Self::Period(n) => Self::Period(gcd(n, turn)),
            Self::Boundary => Self::Boundary,
        }
    }
}

/// Everything the agent has learned about the maze.
#[derive(Clone, Debug, Default)]
pub struct MazeModel {
    doors: HashMap<Position, [DoorFrequency; 4]>,
    values: HashMap<Position, i64>,
    boundary: [Option<i64>; 4],
    corners: [[Option<i64>; 2]; 4],
}

impl MazeModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one turn's sensor batch taken from `origin` on `turn`.
    pub fn observe(&mut self, observations: &[Observation], origin: Position, turn: u64) {
        for obs in observations {
            let cell = origin.translate(obs.dx, obs.dy);
            self.record_door(cell, obs.direction, obs.state, turn);
            self.record_value(cell, obs.state);
        }
    }

    /// Updates a single door estimate.
    pub fn record_door(
        &mut self,
        cell: Position,
        direction: Direction,
        state: DoorState,
        turn: u64,
    ) {
        let doors = self.doors.entry(cell).or_default();
        let door = &mut doors[direction.index()];
        match state {
            DoorState::Open => *door = door.fold_open(turn),
            DoorState::Boundary => {
                *door = DoorFrequency::Boundary;
                self.record_boundary(cell, direction);
            }
            DoorState::Closed => {}
        }
    }

    fn record_boundary(&mut self, cell: Position, direction: Direction) {
        let slot = &mut self.boundary[direction.index()];
        if slot.is_some() {
            return;
        }
        let coord = cell.along(direction);
        *slot = Some(coord);

        // Corner slots are (L,D), (L,U), (R,U), (R,D): a wall fills its own
        // slot and the next one along that axis.
        let axis = usize::from(!direction.is_horizontal());
        self.corners[direction.index()][axis] = Some(coord);
        self.corners[(direction.index() + 1) % 4][axis] = Some(coord);
    }

    fn record_value(&mut self, cell: Position, state: DoorState) {
        let is_boundary = state == DoorState::Boundary;
        match self.values.get_mut(&cell) {
            None => {
                self.values.insert(cell, if is_boundary { BOUNDARY_VALUE } else { 1 });
            }
            Some(value) => {
                if is_boundary {
                    *value = BOUNDARY_VALUE;
                }
                if *value != BOUNDARY_VALUE {
                    *value += 1;
                }
            }
        }
    }

    #[must_use]
    pub fn knows(&self, cell: Position) -> bool {
        self.doors.contains_key(&cell)
    }

    #[must_use]
    pub fn known_cells(&self) -> usize {
        self.doors.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.doors.keys().copied()
    }

    #[must_use]
    pub fn doors(&self, cell: Position) -> Option<&[DoorFrequency; 4]> {
        self.doors.get(&cell)
    }

    /// Estimate for one door; unknown cells report `Unknown`.
    #[must_use]
    pub fn frequency(&self, cell: Position, direction: Direction) -> DoorFrequency {
        self.doors
            .get(&cell)
            .map_or(DoorFrequency::Unknown, |doors| doors[direction.index()])
    }

    /// Periods of the door out of `cell` and the neighbor's facing door,
    /// when both are known.
    #[must_use]
    pub fn passage_periods(&self, cell: Position, direction: Direction) -> Option<(u64, u64)> {
        let own = self.doors.get(&cell)?[direction.index()].period()?;
        let facing_cell = self.doors.get(&cell.neighbor(direction))?;
        let facing = facing_cell[direction.opposite().index()].period()?;
        Some((own, facing))
    }

    /// Period on which both sides of a passage are believed to line up.
    #[must_use]
    pub fn passage_period(&self, cell: Position, direction: Direction) -> Option<u64> {
        self.passage_periods(cell, direction).map(|(a, b)| lcm(a, b))
    }

    #[must_use]
    pub fn value(&self, cell: Position) -> Option<i64> {
        self.values.get(&cell).copied()
    }

    /// Sum of values over the window centered on `center`; unseen cells add 0.
    #[must_use]
    pub fn neighborhood_value(&self, center: Position) -> i64 {
        let mut total = 0;
        for dx in -VALUE_WINDOW..=VALUE_WINDOW {
            for dy in -VALUE_WINDOW..=VALUE_WINDOW {
                total += self.value(center.translate(dx, dy)).unwrap_or(0);
            }
        }
        total
    }

    #[must_use]
    pub const fn boundary(&self, direction: Direction) -> Option<i64> {
        self.boundary[direction.index()]
    }

    /// True if coordinate `coord` along `direction`'s axis reaches or passes
    /// the known wall in that direction.
    #[must_use]
    pub fn beyond_boundary(&self, direction: Direction, coord: i64) -> bool {
        self.boundary(direction).is_some_and(|wall| {
            if direction.is_negative() {
                coord <= wall
            } else {
                coord >= wall
            }
        })
    }

    /// Corners whose two walls are both known, in (L,D), (L,U), (R,U), (R,D) order.
    #[must_use]
    pub fn corners(&self) -> [Option<Position>; 4] {
        self.corners.map(|[x, y]| Some(Position::new(x?, y?)))
    }

    /// A fully known corner never seen by the sensor and close enough to
    /// the agent to be worth a look.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn nearby_unseen_corner(&self, position: Position, radius: u32) -> Option<Position> {
        let r = f64::from(radius);
        let reach = (2.0 * r * r).sqrt() + r;
        self.corners()
            .into_iter()
            .flatten()
            .filter(|corner| !self.values.contains_key(corner))
            .find(|corner| corner.manhattan(position) as f64 <= reach)
    }
}
