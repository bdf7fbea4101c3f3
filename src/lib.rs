#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::collapsible_if)]

//! Inference and planning core for an agent crossing a maze whose doors open
//! on unknown periodic schedules.

pub mod error;
pub mod simulation;

pub use error::{MazeError, NavigatorError};
