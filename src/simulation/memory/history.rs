//! Append-only record of where the agent has been and which way it went.

use std::collections::HashMap;

use crate::simulation::geometry::{Direction, Position};

/// Exploration score per direction (indexed by `Direction::index`), lower is better.
pub type MoveRegret = [i64; 4];

/// One committed move: the cell it started from and the direction taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub position: Position,
    pub direction: Direction,
}

/// Visited cells in order, plus the regret vectors computed at them.
#[derive(Clone, Debug, Default)]
pub struct MoveHistory {
    steps: Vec<Step>,
    regrets: HashMap<Position, MoveRegret>,
}

impl MoveHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Position, direction: Direction) {
        self.steps.push(Step { position, direction });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Direction of the most recent move.
    #[must_use]
    pub fn last_direction(&self) -> Option<Direction> {
        self.steps.last().map(|step| step.direction)
    }

    /// Steps from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Step> + ExactSizeIterator {
        self.steps.iter()
    }

    pub fn set_regret(&mut self, position: Position, regret: MoveRegret) {
        self.regrets.insert(position, regret);
    }

    #[must_use]
    pub fn regret(&self, position: Position) -> Option<&MoveRegret> {
        self.regrets.get(&position)
    }

    /// Regret at `position`, or all zeros if it was never scored.
    #[must_use]
    pub fn regret_or_neutral(&self, position: Position) -> MoveRegret {
        self.regrets.get(&position).copied().unwrap_or_default()
    }
}
