//! Property-based tests for period learning and move safety.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use timing_maze::simulation::environment::{run_episode, TimingMaze};
use timing_maze::simulation::geometry::{Direction, Position};
use timing_maze::simulation::memory::{DoorFrequency, DoorState, MazeModel, Observation};
use timing_maze::simulation::planning::can_move;
use timing_maze::simulation::{Navigator, NavigatorConfig};

fn open_turns() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..500, 1..20)
}

// ============== Period Folding ==============

proptest! {
    // The estimate divides every turn it was folded from and never grows.
    #[test]
    fn test_estimate_divides_observed_turns(turns in open_turns()) {
        let mut model = MazeModel::new();
        let origin = Position::default();
        let mut previous = u64::MAX;
        for &turn in &turns {
            model.observe(&[Observation::new(0, 0, Direction::Up, DoorState::Open)], origin, turn);
            let DoorFrequency::Period(n) = model.frequency(origin, Direction::Up) else {
                return Err(TestCaseError::fail("open door without a period"));
            };
            prop_assert!(n <= previous);
            previous = n;
        }
        for &turn in &turns {
            prop_assert_eq!(turn % previous, 0);
        }
    }

    // A door with true period `p` only ever folds to a multiple of `p`.
    #[test]
    fn test_estimate_is_multiple_of_true_period(
        p in 1u64..12,
        ks in prop::collection::vec(1u64..40, 1..10),
    ) {
        let mut door = DoorFrequency::Unknown;
        for k in ks {
            door = door.fold_open(k * p);
        }
        let n = door.period().unwrap_or(0);
        prop_assert!(n > 0 && n % p == 0);
    }

    // Once a wall, always a wall.
    #[test]
    fn test_boundary_is_absorbing(turns in open_turns()) {
        let mut door = DoorFrequency::Boundary;
        for turn in turns {
            door = door.fold_open(turn);
        }
        prop_assert_eq!(door, DoorFrequency::Boundary);
    }

    // A passage is usable exactly on common multiples of both periods.
    #[test]
    fn test_can_move_iff_common_multiple(a in 1u64..20, b in 1u64..20, turn in 1u64..400) {
        let mut model = MazeModel::new();
        let origin = Position::default();
        model.record_door(origin, Direction::Right, DoorState::Open, a);
        model.record_door(origin.neighbor(Direction::Right), Direction::Left, DoorState::Open, b);
        prop_assert_eq!(
            can_move(&model, origin, Direction::Right, turn),
            turn % a == 0 && turn % b == 0
        );
    }
}

// ============== Move Safety ==============

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // Every step the navigator takes is one the maze accepts.
    #[test]
    fn test_navigator_never_forces_a_closed_door(
        seed in any::<u64>(),
        max_period in 1u64..6,
        epsilon in 0.0f64..0.5,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut maze = TimingMaze::random(7, 7, (3, 3), (6, 0), max_period, &mut rng).unwrap();
        let config = NavigatorConfig::new(max_period, 2).with_epsilon(epsilon);
        let mut nav = Navigator::with_seed(config, seed).unwrap();

        let report = run_episode(&mut maze, &mut nav, 150);
        prop_assert_eq!(report.rejected_moves, 0);
        prop_assert_eq!(report.position_mismatches, 0);
    }
}
