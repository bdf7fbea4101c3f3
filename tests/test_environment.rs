//! Tests for the timing-maze harness.

use rand::rngs::StdRng;
use rand::SeedableRng;

use timing_maze::simulation::environment::{run_episode, TimingMaze};
use timing_maze::simulation::geometry::{Direction, Move, Position};
use timing_maze::simulation::memory::DoorState;
use timing_maze::simulation::{Navigator, NavigatorConfig};

#[test]
fn test_random_maze_is_reproducible() {
    let build = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        TimingMaze::random(6, 4, (0, 0), (5, 3), 7, &mut rng).unwrap()
    };
    let (a, b) = (build(17), build(17));
    for turn in 1..=20 {
        for row in 0..4 {
            for col in 0..6 {
                for d in Direction::ALL {
                    let cell = (col, row);
                    assert_eq!(a.door_state(cell, d, turn), b.door_state(cell, d, turn));
                }
            }
        }
    }
}

#[test]
fn test_random_periods_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(2);
    let maze = TimingMaze::random(5, 5, (0, 0), (4, 4), 4, &mut rng).unwrap();
    // Every interior door with a period in 1..=4 is open on turn 12.
    for row in 0..5 {
        for col in 0..5 {
            for d in Direction::ALL {
                assert_ne!(maze.door_state((col, row), d, 12), DoorState::Closed);
            }
        }
    }
}

#[test]
fn test_door_schedule() {
    let maze = TimingMaze::from_fn(3, 3, (0, 0), (2, 2), |col, row, d| {
        if (col, row, d) == (1, 1, Direction::Up) {
            4
        } else {
            1
        }
    })
    .unwrap();
    let opened: Vec<_> = (1..=8)
        .filter(|&t| maze.door_state((1, 1), Direction::Up, t) == DoorState::Open)
        .collect();
    assert_eq!(opened, vec![4, 8]);
    // The passage is shared, so both sides wait on the slower door.
    assert!(!maze.can_pass((1, 0), Direction::Down, 3));
    assert!(maze.can_pass((1, 0), Direction::Down, 4));
    assert!(!maze.can_pass((1, 1), Direction::Up, 6));
    assert!(maze.can_pass((1, 1), Direction::Left, 3));
}

#[test]
fn test_percept_clips_at_edges() {
    let maze = TimingMaze::uniform(4, 4, (0, 0), (3, 3), 1).unwrap();
    let percept = maze.percept(1, 1);
    // The agent's cell and the two in-bounds neighbors.
    assert_eq!(percept.observations.len(), 12);
    assert!(percept.observations.iter().all(|o| o.dx >= 0 && o.dy >= 0));
    let walls = percept
        .observations
        .iter()
        .filter(|o| o.state == DoorState::Boundary)
        .count();
    assert_eq!(walls, 4);
}

#[test]
fn test_moves_change_offset() {
    let mut maze = TimingMaze::uniform(3, 3, (1, 1), (2, 2), 1).unwrap();
    assert!(maze.apply(Move::Go(Direction::Up), 1));
    assert_eq!(maze.agent_offset(), Position::new(0, -1));
    assert!(!maze.apply(Move::Go(Direction::Up), 2));
    assert_eq!(maze.agent_offset(), Position::new(0, -1));
}

#[test]
fn test_episode_starting_on_goal() {
    let mut maze = TimingMaze::uniform(3, 3, (1, 1), (1, 1), 1).unwrap();
    let mut nav = Navigator::with_seed(NavigatorConfig::new(1, 2), 0).unwrap();
    let report = run_episode(&mut maze, &mut nav, 10);
    assert!(report.reached_goal);
    assert_eq!(report.turns, 1);
    assert_eq!(report.waits, 1);
}
