//! Error types for configuration and harness construction.
//!
//! Planning itself never fails: every planner degrades to `Move::Wait`.

use std::path::PathBuf;

/// Errors raised while building or configuring a
/// [`Navigator`](crate::simulation::agent::Navigator).
#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while building a [`TimingMaze`](crate::simulation::environment::TimingMaze).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze must be at least 1x1, got {width}x{height}")]
    Empty { width: usize, height: usize },
    #[error("start cell ({0}, {1}) is outside the maze")]
    StartOutOfBounds(usize, usize),
    #[error("goal cell ({0}, {1}) is outside the maze")]
    GoalOutOfBounds(usize, usize),
    #[error("door period must be positive, got {0}")]
    InvalidPeriod(u64),
}
