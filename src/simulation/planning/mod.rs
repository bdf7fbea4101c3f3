//! Move selection on top of the learned maze model.
//!
//! This module provides:
//! - Time-aware shortest paths toward a visible goal
//! - Value-driven exploration when the goal is out of sight
//! - Backtracking escape search when exploration stalls

pub mod escape;
pub mod explore;
pub mod path;

use crate::simulation::geometry::{lcm, Direction, Position};
use crate::simulation::memory::{MazeModel, MoveHistory};

pub use escape::{cost_of_directions, find_best_out, EscapeRoute};
pub use explore::{choose_move, eligible_directions, score_directions, Exploration};
pub use path::PathPlanner;

/// The agent's owned working state, handed explicitly to every planner.
#[derive(Clone, Debug, Default)]
pub struct PlannerState {
    /// Current turn, starting at 1 on the first percept
    pub turn: u64,
    /// Current cell relative to the start
    pub position: Position,
    /// Learned door periods, walls and exploration values
    pub model: MazeModel,
    /// Every committed move plus cached exploration regrets
    pub history: MoveHistory,
}

impl PlannerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether stepping in `direction` from the current cell succeeds this turn.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        can_move(&self.model, self.position, direction, self.turn)
    }

    /// Records a move and advances the position bookkeeping.
    pub fn commit_move(&mut self, direction: Direction) {
        self.history.push(self.position, direction);
        self.position = self.position.neighbor(direction);
    }
}

/// A passage is usable on `turn` only if both of its doors have known
/// periods and `turn` is a common multiple of them.
#[must_use]
pub fn can_move(model: &MazeModel, cell: Position, direction: Direction, turn: u64) -> bool {
    let Some((own, facing)) = model.passage_periods(cell, direction) else {
        return false;
    };
    turn % own == 0 && turn % facing == 0 && turn % lcm(own, facing) == 0
}
