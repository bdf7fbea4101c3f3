use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::NavigatorError;
use crate::simulation::config::NavigatorConfig;
use crate::simulation::geometry::{Move, Position};
use crate::simulation::memory::{MazeModel, MoveHistory, Observation};
use crate::simulation::planning::{
    choose_move, find_best_out, EscapeRoute, Exploration, PathPlanner, PlannerState,
};

/// One turn of sensor input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Percept {
    /// Door readings for every cell in sensor range, relative to the agent
    pub observations: Vec<Observation>,
    /// Offset of the goal from the agent, if it is in sensor range
    pub goal: Option<(i64, i64)>,
}

/// The maze-crossing agent.
///
/// Each call to [`Navigator::decide`] is one turn: the percept is folded
/// into the model, then an active escape route, the path planner or the
/// exploration policy picks exactly one move.
#[derive(Debug)]
pub struct Navigator<R = StdRng> {
    config: NavigatorConfig,
    rng: R,
    state: PlannerState,
    path: PathPlanner,
    escape: Option<EscapeRoute>,
}

impl Navigator<StdRng> {
    /// Creates a navigator with a deterministic random source.
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn with_seed(config: NavigatorConfig, seed: u64) -> Result<Self, NavigatorError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Navigator<R> {
    /// Creates a navigator at the origin on turn 0.
    ///
    /// # Errors
    /// Fails if `config` does not validate.
    pub fn new(config: NavigatorConfig, rng: R) -> Result<Self, NavigatorError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            state: PlannerState::new(),
            path: PathPlanner::new(),
            escape: None,
        })
    }

    /// Plays one turn and returns the chosen move.
    pub fn decide(&mut self, percept: &Percept) -> Move {
        self.state.turn += 1;
        self.state
            .model
            .observe(&percept.observations, self.state.position, self.state.turn);

        let chosen = self.choose(percept);
        if let Move::Go(direction) = chosen {
            self.state.commit_move(direction);
        }
        trace!(turn = self.state.turn, ?chosen, position = ?self.state.position, "turn done");
        chosen
    }

    fn choose(&mut self, percept: &Percept) -> Move {
        if let Some(route) = &self.escape {
            if !route.is_empty() {
                return self.follow_route();
            }
            // A finished route hands the turn back to the goal/explore flow.
            // The escape search only runs again if exploration stalls anew.
            debug!(turn = self.state.turn, "escape route finished");
            self.escape = None;
        }

        if let Some(goal) = percept.goal {
            return self.path.move_toward_goal(&self.state, goal);
        }

        if let Some(corner) = self
            .state
            .model
            .nearby_unseen_corner(self.state.position, self.config.radius)
        {
            debug!(?corner, "unseen corner nearby");
        }

        match choose_move(
            &mut self.state,
            self.config.radius,
            self.config.epsilon,
            &mut self.rng,
        ) {
            Exploration::Act(chosen) => chosen,
            Exploration::Stalled(_) => self.escape(),
        }
    }

    fn escape(&mut self) -> Move {
        match find_best_out(&self.state) {
            Some(route) => {
                debug!(turn = self.state.turn, actions = route.len(), "escaping");
                self.escape = Some(route);
                self.follow_route()
            }
            None => Move::Wait,
        }
    }

    /// Next action of the active route. A queued step whose passage is not
    /// open this turn stays queued and the agent waits instead.
    fn follow_route(&mut self) -> Move {
        let Some(route) = self.escape.as_mut() else {
            return Move::Wait;
        };
        match route.peek() {
            Some(Move::Go(direction)) if !self.state.can_move(direction) => {
                trace!(?direction, "escape step not open yet");
                Move::Wait
            }
            _ => route.pop().unwrap_or(Move::Wait),
        }
    }

    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.state.turn
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.state.position
    }

    #[must_use]
    pub const fn model(&self) -> &MazeModel {
        &self.state.model
    }

    #[must_use]
    pub const fn history(&self) -> &MoveHistory {
        &self.state.history
    }

    #[must_use]
    pub const fn state(&self) -> &PlannerState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[must_use]
    pub const fn path(&self) -> &PathPlanner {
        &self.path
    }

    #[must_use]
    pub const fn is_escaping(&self) -> bool {
        self.escape.is_some()
    }

    #[must_use]
    pub const fn escape_route(&self) -> Option<&EscapeRoute> {
        self.escape.as_ref()
    }
}
