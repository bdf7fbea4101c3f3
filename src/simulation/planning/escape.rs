//! Escape search for when exploration keeps undoing its own last step.
//!
//! The search walks the move history backward. At each cell it asks how
//! long the agent would wait for a door other than the one it came through,
//! and how long it takes to retreat one more cell. Candidate routes are the
//! retreat chain so far followed by that cell's exit. The walk ends once the
//! retreat alone costs as much as the cheapest candidate already found.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::PlannerState;
use crate::simulation::geometry::{Direction, Move, Position};

/// Pending actions of an escape, consumed one per turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EscapeRoute {
    actions: VecDeque<Move>,
}

impl EscapeRoute {
    #[must_use]
    pub fn new(actions: impl IntoIterator<Item = Move>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn peek(&self) -> Option<Move> {
        self.actions.front().copied()
    }

    pub fn pop(&mut self) -> Option<Move> {
        self.actions.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.actions.iter()
    }
}

/// Turns to wait from `at_turn` until a passage with `period` next opens.
#[must_use]
pub const fn wait_for(period: u64, at_turn: u64) -> u64 {
    let mut next = at_turn.div_ceil(period);
    if next == 0 {
        next = 1;
    }
    next * period - at_turn
}

/// Per direction, turns to wait at `cell` before both doors of that passage
/// line up, as seen `added_steps` turns from now. `None` where either door
/// has no known period.
#[must_use]
pub fn cost_of_directions(
    state: &PlannerState,
    cell: Position,
    added_steps: u64,
) -> [Option<u64>; 4] {
    let at_turn = state.turn + added_steps;
    Direction::ALL.map(|d| {
        state
            .model
            .passage_period(cell, d)
            .map(|period| wait_for(period, at_turn))
    })
}

/// `waits` idle turns followed by one step.
fn wait_then(waits: u64, direction: Direction) -> impl Iterator<Item = Move> {
    (0..waits).map(|_| Move::Wait).chain(std::iter::once(Move::Go(direction)))
}

/// Cheapest exit from `cell` that avoids `excluded`, ranked by
/// (wait, cached regret, direction priority).
fn best_exit(
    state: &PlannerState,
    cell: Position,
    costs: &[Option<u64>; 4],
    excluded: &[Direction],
) -> Option<(Direction, u64)> {
    let regret = state.history.regret_or_neutral(cell);
    Direction::ALL
        .into_iter()
        .filter(|d| !excluded.contains(d))
        .filter_map(|d| costs[d.index()].map(|cost| (d, cost)))
        .min_by_key(|&(d, cost)| (cost, regret[d.index()], d.index()))
}

/// An exit found during the walk: the first `retreat_len` retreat actions,
/// then `waits` idle turns and one step in `direction`.
struct Candidate {
    /// Turns until the agent has stepped out
    total: u64,
    retreat_len: usize,
    waits: u64,
    direction: Direction,
    exit_from: Position,
}

impl Candidate {
    fn actions(&self, retreat: &[Move]) -> Vec<Move> {
        retreat[..self.retreat_len]
            .iter()
            .copied()
            .chain(wait_then(self.waits, self.direction))
            .collect()
    }
}

/// Searches recent history for the cheapest way out of a dead end.
///
/// Returns `None` when the agent has never moved or no cell along the
/// history offers an exit; the caller then waits a turn and tries again.
#[must_use]
pub fn find_best_out(state: &PlannerState) -> Option<EscapeRoute> {
    let last = *state.history.last()?;
    let here = state.position;
    let reverse = last.direction.opposite();

    let mut checked: HashSet<Position> = HashSet::from([here]);
    // Only ever appended to; candidates keep the length of their prefix.
    let mut retreat: Vec<Move> = Vec::new();
    let costs = cost_of_directions(state, here, 0);
    let mut best = best_exit(state, here, &costs, &[reverse]).map(|(direction, waits)| Candidate {
        total: waits + 1,
        retreat_len: 0,
        waits,
        direction,
        exit_from: here,
    });

    let Some(back_cost) = costs[reverse.index()] else {
        return commit(best, &retreat);
    };
    retreat.extend(wait_then(back_cost, reverse));
    let mut added_steps = back_cost + 1;

    for i in (0..state.history.len()).rev() {
        if best.as_ref().is_some_and(|b| added_steps >= b.total) {
            break;
        }
        let Some(step) = state.history.get(i) else { break };
        let cell = step.position;
        // Stepping `came_from` would undo the retreat; `back` continues it.
        let came_from = step.direction;
        let back = i
            .checked_sub(1)
            .and_then(|j| state.history.get(j))
            .map(|prev| prev.direction.opposite());

        let costs = cost_of_directions(state, cell, added_steps);
        if checked.insert(cell) {
            let mut excluded = vec![came_from];
            excluded.extend(back);
            if let Some((direction, waits)) = best_exit(state, cell, &costs, &excluded) {
                let total = added_steps + waits + 1;
                if best.as_ref().map_or(true, |b| total < b.total) {
                    best = Some(Candidate {
                        total,
                        retreat_len: retreat.len(),
                        waits,
                        direction,
                        exit_from: cell,
                    });
                }
            }
        }

        let Some(back) = back else { break };
        let Some(back_cost) = costs[back.index()] else { break };
        retreat.extend(wait_then(back_cost, back));
        added_steps += back_cost + 1;
    }

    commit(best, &retreat)
}

fn commit(best: Option<Candidate>, retreat: &[Move]) -> Option<EscapeRoute> {
    match best {
        Some(candidate) => {
            debug!(
                exit_from = ?candidate.exit_from,
                turns = candidate.total,
                "escape route committed"
            );
            Some(EscapeRoute::new(candidate.actions(retreat)))
        }
        None => {
            debug!("no escape found in history");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::memory::DoorState;

    /// Opens the passage out of `cell` in `direction` on both sides with the given periods.
    fn passage(
        state: &mut PlannerState,
        cell: Position,
        direction: Direction,
        own: u64,
        facing: u64,
    ) {
        let model = &mut state.model;
        model.record_door(cell, direction, DoorState::Open, own);
        model.record_door(cell.neighbor(direction), direction.opposite(), DoorState::Open, facing);
    }

    fn walk(state: &mut PlannerState, moves: &[Direction]) {
        for &d in moves {
            state.commit_move(d);
        }
    }

    #[test]
    fn test_wait_for() {
        assert_eq!(wait_for(3, 6), 0);
        assert_eq!(wait_for(3, 7), 2);
        assert_eq!(wait_for(4, 0), 4);
        assert_eq!(wait_for(1, 9), 0);
    }

    #[test]
    fn test_costs_are_none_for_unknown_doors() {
        let mut state = PlannerState::new();
        state.turn = 5;
        passage(&mut state, Position::default(), Direction::Right, 2, 3);
        let costs = cost_of_directions(&state, Position::default(), 0);
        assert_eq!(costs[Direction::Right.index()], Some(1));
        assert_eq!(costs[Direction::Left.index()], None);

        let later = cost_of_directions(&state, Position::default(), 1);
        assert_eq!(later[Direction::Right.index()], Some(0));
    }

    #[test]
    fn test_no_history_means_no_route() {
        let state = PlannerState::new();
        assert!(find_best_out(&state).is_none());
    }

    #[test]
    fn test_waits_for_side_door_when_backtracking_is_slow() {
        let mut state = PlannerState::new();
        let origin = Position::default();
        passage(&mut state, origin, Direction::Right, 1, 1);
        walk(&mut state, &[Direction::Right]);
        let here = state.position;
        // Back through the door we came: every 10 turns. Side door: every 4.
        passage(&mut state, here, Direction::Left, 10, 10);
        passage(&mut state, here, Direction::Down, 4, 4);
        state.turn = 21;

        let route = find_best_out(&state).unwrap();
        let actions: Vec<_> = route.iter().copied().collect();
        assert_eq!(actions, vec![Move::Wait, Move::Wait, Move::Wait, Move::Go(Direction::Down)]);
    }

    #[test]
    fn test_backtracks_to_earlier_exit() {
        // (0,0) -Right-> (1,0) -Right-> (2,0), dead end at (2,0).
        let mut state = PlannerState::new();
        let origin = Position::default();
        passage(&mut state, origin, Direction::Right, 1, 1);
        passage(&mut state, Position::new(1, 0), Direction::Right, 1, 1);
        passage(&mut state, Position::new(1, 0), Direction::Up, 1, 1);
        walk(&mut state, &[Direction::Right, Direction::Right]);
        state.turn = 7;

        let route = find_best_out(&state).unwrap();
        let actions: Vec<_> = route.iter().copied().collect();
        assert_eq!(actions, vec![Move::Go(Direction::Left), Move::Go(Direction::Up)]);
    }

    #[test]
    fn test_nothing_to_find_returns_none() {
        let mut state = PlannerState::new();
        passage(&mut state, Position::default(), Direction::Right, 1, 1);
        walk(&mut state, &[Direction::Right]);
        state.turn = 3;
        assert!(find_best_out(&state).is_none());
    }

    #[test]
    fn test_ties_break_on_regret() {
        let mut state = PlannerState::new();
        passage(&mut state, Position::default(), Direction::Right, 1, 1);
        walk(&mut state, &[Direction::Right]);
        let here = state.position;
        passage(&mut state, here, Direction::Left, 7, 7);
        passage(&mut state, here, Direction::Up, 1, 1);
        passage(&mut state, here, Direction::Down, 1, 1);
        state.history.set_regret(here, [0, 9, 0, 2]);
        state.turn = 8;

        let route = find_best_out(&state).unwrap();
        assert_eq!(route.peek(), Some(Move::Go(Direction::Down)));
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_terminates_on_long_looping_history() {
        let mut state = PlannerState::new();
        let square = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        let mut cell = Position::default();
        for d in square {
            passage(&mut state, cell, d, 1, 1);
            cell = cell.neighbor(d);
        }
        for _ in 0..200 {
            walk(&mut state, &square);
        }
        state.turn = 1000;
        // Every cell of the square has a second exit, so a route exists.
        let route = find_best_out(&state).unwrap();
        assert!(!route.is_empty());
    }

    #[test]
    fn test_retreats_along_a_long_corridor() {
        // 2000 steps right with no side doors; the only exit is down at the start.
        let mut state = PlannerState::new();
        let mut cell = Position::default();
        for _ in 0..2000 {
            passage(&mut state, cell, Direction::Right, 1, 1);
            cell = cell.neighbor(Direction::Right);
        }
        passage(&mut state, Position::default(), Direction::Down, 1, 1);
        walk(&mut state, &[Direction::Right; 2000]);
        state.turn = 3;

        let route = find_best_out(&state).unwrap();
        assert_eq!(route.len(), 2001);
        assert!(route.iter().take(2000).all(|&m| m == Move::Go(Direction::Left)));
        assert_eq!(route.iter().last(), Some(&Move::Go(Direction::Down)));
    }
}
