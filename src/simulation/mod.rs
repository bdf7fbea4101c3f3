pub mod agent;
pub mod config;
pub mod environment;
pub mod geometry;
pub mod memory;
pub mod params;
pub mod planning;

pub use agent::{Navigator, Percept};
pub use config::NavigatorConfig;
pub use geometry::{Direction, Move, Position};
