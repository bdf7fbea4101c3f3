//! Navigator hyperparameters.

/// Default probability of taking a random exploration move.
pub const DEFAULT_EPSILON: f64 = 0.0;
pub const DEFAULT_RADIUS: u32 = 15;
pub const DEFAULT_MAX_DOOR_FREQUENCY: u64 = 5;

/// Half-width of the value window summed around an exploration target (3x3).
pub const VALUE_WINDOW: i64 = 1;

/// Score assigned to a direction whose projected view lies past a known wall.
pub const BLOCKED_REGRET: i64 = i64::MAX;

/// Value-map score of a cell seen with a boundary door.
pub const BOUNDARY_VALUE: i64 = -1;

/// Demo maze size. With the default radius the goal corner is in sensor
/// range from every cell, so demo episodes are decided by path planning.
pub const DEMO_WIDTH: usize = 10;
pub const DEMO_HEIGHT: usize = 10;
pub const DEMO_TURNS: u64 = 2000;
