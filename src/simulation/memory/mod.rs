//! Learned knowledge about the maze.
//!
//! This module provides:
//! - The door model (periods, boundaries, corners, exploration values)
//! - The append-only move history with cached exploration regrets

pub mod door_map;
pub mod history;

use serde::{Deserialize, Serialize};

use crate::simulation::geometry::Direction;

pub use door_map::{DoorFrequency, MazeModel};
pub use history::{MoveHistory, MoveRegret, Step};

/// State of a single door as reported by the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Open,
    Closed,
    Boundary,
}

/// One sensor reading: a door of a cell at an offset from the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Column offset from the agent
    pub dx: i64,
    /// Row offset from the agent
    pub dy: i64,
    /// Which door of that cell was seen
    pub direction: Direction,
    /// What the door looked like this turn
    pub state: DoorState,
}

impl Observation {
    #[must_use]
    pub const fn new(dx: i64, dy: i64, direction: Direction, state: DoorState) -> Self {
        Self {
            dx,
            dy,
            direction,
            state,
        }
    }
}
