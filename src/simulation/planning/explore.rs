//! Epsilon-greedy exploration while the goal is out of sight.
//!
//! Each direction is scored by summing the value map around the cell one
//! sensor radius away in that direction. Low sums mean little-seen ground
//! away from walls, so the lowest eligible score wins.

use rand::Rng;
use tracing::{debug, trace};

use super::PlannerState;
use crate::simulation::geometry::{Direction, Move, Position};
use crate::simulation::memory::{MazeModel, MoveRegret};
use crate::simulation::params::BLOCKED_REGRET;

/// Outcome of one exploration decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exploration {
    /// Take this action.
    Act(Move),
    /// The greedy pick would undo the previous move; hand over to the escape search.
    Stalled(Direction),
}

/// Projected vision edge when moving one step in `direction` has reached
/// the known wall on that side.
fn sees_past_wall(
    model: &MazeModel,
    position: Position,
    direction: Direction,
    radius: i64,
) -> bool {
    let edge = position.offset(direction, radius).along(direction);
    model.beyond_boundary(direction, edge)
}

/// Directions that are open right now and still lead toward unseen ground.
#[must_use]
pub fn eligible_directions(state: &PlannerState, radius: u32) -> Vec<Direction> {
    let radius = i64::from(radius);
    Direction::ALL
        .into_iter()
        .filter(|&d| state.can_move(d) && !sees_past_wall(&state.model, state.position, d, radius))
        .collect()
}

/// Value-map score per direction; walls already in view score `BLOCKED_REGRET`.
#[must_use]
pub fn score_directions(model: &MazeModel, position: Position, radius: u32) -> MoveRegret {
    let radius = i64::from(radius);
    Direction::ALL.map(|d| {
        if sees_past_wall(model, position, d, radius) {
            BLOCKED_REGRET
        } else {
            model.neighborhood_value(position.offset(d, radius))
        }
    })
}

/// Picks an exploration move for the current turn.
///
/// The greedy branch caches its scores as the current cell's regret, which
/// the escape search later uses to break ties.
pub fn choose_move(
    state: &mut PlannerState,
    radius: u32,
    epsilon: f64,
    rng: &mut impl Rng,
) -> Exploration {
    let eligible = eligible_directions(state, radius);
    if eligible.is_empty() {
        trace!(position = ?state.position, "no eligible direction");
        return Exploration::Act(Move::Wait);
    }

    if rng.random_bool(epsilon) {
        let pick = Direction::from_index(rng.random_range(0..4));
        debug!(?pick, "random exploration move");
        return Exploration::Act(if eligible.contains(&pick) {
            Move::Go(pick)
        } else {
            Move::Wait
        });
    }

    let regret = score_directions(&state.model, state.position, radius);
    state.history.set_regret(state.position, regret);

    let Some(best) = eligible
        .into_iter()
        .min_by_key(|d| (regret[d.index()], d.index()))
    else {
        return Exploration::Act(Move::Wait);
    };

    if state.history.last_direction() == Some(best.opposite()) {
        debug!(?best, ?regret, "greedy move would reverse the last step");
        return Exploration::Stalled(best);
    }
    Exploration::Act(Move::Go(best))
}
