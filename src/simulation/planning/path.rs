//! Time-aware shortest paths toward a visible goal.
//!
//! Runs Dijkstra backward from the goal over the known part of the maze.
//! Crossing a passage costs the worst-case wait for both of its doors to
//! line up, plus the step itself, plus the passage's distance from the agent
//! so that ties lean toward cells near the agent.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use super::PlannerState;
use crate::simulation::geometry::{Direction, Move, Position};

#[derive(PartialEq, Eq)]
struct Frontier {
    cost: u64,
    cell: Position,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cached per-cell directions toward a single goal.
#[derive(Clone, Debug, Default)]
pub struct PathPlanner {
    goal: Option<Position>,
    best: HashMap<Position, Move>,
}

impl PathPlanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute goal the cached directions lead to.
    #[must_use]
    pub const fn goal(&self) -> Option<Position> {
        self.goal
    }

    /// Cached move from `cell` toward the goal. The goal itself maps to `Wait`.
    #[must_use]
    pub fn planned_move(&self, cell: Position) -> Option<Move> {
        self.best.get(&cell).copied()
    }

    #[must_use]
    pub fn planned_cells(&self) -> usize {
        self.best.len()
    }

    pub fn clear(&mut self) {
        self.goal = None;
        self.best.clear();
    }

    fn retarget(&mut self, goal: Position) {
        if self.goal != Some(goal) {
            self.best.clear();
            self.goal = Some(goal);
        }
    }

    /// Labels known cells with their best move toward the goal at
    /// `goal_offset` from the agent, stopping once the agent's cell is settled.
    ///
    /// Does nothing if the goal cell is not in the model yet.
    pub fn find_path(&mut self, state: &PlannerState, goal_offset: (i64, i64)) {
        let agent = state.position;
        let goal = agent.translate(goal_offset.0, goal_offset.1);
        let model = &state.model;
        if !model.knows(goal) {
            trace!(?goal, "goal not in model yet");
            return;
        }
        self.retarget(goal);

        let mut dist: HashMap<Position, u64> = HashMap::new();
        let mut settled: HashSet<Position> = HashSet::new();
        let mut open = BinaryHeap::new();

        dist.insert(goal, 0);
        self.best.insert(goal, Move::Wait);
        open.push(Frontier { cost: 0, cell: goal });

        while let Some(Frontier { cost, cell }) = open.pop() {
            if cell == agent {
                debug!(?goal, cost, settled = settled.len(), "path reached agent");
                return;
            }
            if !settled.insert(cell) {
                continue;
            }

            for direction in Direction::ALL {
                let neighbor = cell.neighbor(direction);
                if settled.contains(&neighbor) || !model.knows(neighbor) {
                    continue;
                }
                let Some(period) = model.passage_period(cell, direction) else {
                    continue;
                };

                // Cells without a distance yet are unreached at any cost.
                let candidate = cost + period + 1 + agent.manhattan(neighbor);
                if dist.get(&neighbor).map_or(true, |&known| candidate < known) {
                    // From `neighbor`, the way to the goal runs back through `cell`.
                    dist.insert(neighbor, candidate);
                    self.best.insert(neighbor, Move::Go(direction.opposite()));
                    open.push(Frontier {
                        cost: candidate,
                        cell: neighbor,
                    });
                }
            }
        }
        debug!(?goal, settled = settled.len(), "no known path to agent");
    }

    /// This turn's goal-directed move: the cached direction if its passage
    /// is open now, otherwise `Wait`.
    pub fn move_toward_goal(&mut self, state: &PlannerState, goal_offset: (i64, i64)) -> Move {
        let goal = state.position.translate(goal_offset.0, goal_offset.1);
        self.retarget(goal);

        if !self.best.contains_key(&state.position) {
            self.find_path(state, goal_offset);
        }

        match self.best.get(&state.position) {
            Some(Move::Go(direction)) if state.can_move(*direction) => Move::Go(*direction),
            _ => Move::Wait,
        }
    }
}
