use maze_chase_core::{Direction, Event, FoodKind, GhostId, InputState, Tile};
use maze_chase_simulation::{GameConfig, GhostState, Simulation, SimulationError, Snapshot};
use maze_chase_world::World;

const ONE_PELLET: &str = concat!(
    "#########\n",
    "#       #\n",
    "# ##B## #\n",
    "t ##-## t\n",
    "# #ipc# #\n",
    "# ##### #\n",
    "#   P.  #\n",
    "#########\n",
);

const ENERGIZER: &str = concat!(
    "#########\n",
    "#.      #\n",
    "# ##B## #\n",
    "t ##-## t\n",
    "# #ipc# #\n",
    "# ##### #\n",
    "#   P*  #\n",
    "#########\n",
);

fn session(maze: &str) -> Simulation {
    let world = World::from_text(maze).expect("maze parses");
    Simulation::new(world, GameConfig::default()).expect("session starts")
}

fn right() -> InputState {
    InputState::pressing(Direction::Right)
}

#[test]
fn release_follows_house_precedence() {
    let mut simulation = Simulation::classic(GameConfig::default()).expect("session starts");

    let first = simulation.update(InputState::default()).expect("tick");
    assert!(first.contains(&Event::GhostReleased {
        ghost: GhostId::Blinky
    }));

    let second = simulation.update(InputState::default()).expect("tick");
    assert!(second.contains(&Event::GhostReleased {
        ghost: GhostId::Pinky
    }));
    assert_eq!(
        simulation.ghost_state(GhostId::Blinky),
        Some(GhostState::Scattering)
    );
    assert_eq!(
        simulation.ghost_state(GhostId::Inky),
        Some(GhostState::Locked)
    );
}

#[test]
fn released_ghost_opens_the_door_on_its_way_out() {
    let mut simulation = Simulation::classic(GameConfig::default()).expect("session starts");
    let mut opened = false;
    for _ in 0..120 {
        let events = simulation.update(InputState::default()).expect("tick");
        opened |= events
            .iter()
            .any(|event| matches!(event, Event::DoorOpened { .. }));
        if simulation.ghost_state(GhostId::Pinky) == Some(GhostState::Scattering) {
            break;
        }
    }
    assert!(opened);
    assert_eq!(
        simulation.ghost_state(GhostId::Pinky),
        Some(GhostState::Scattering)
    );
}

#[test]
fn eating_the_last_food_completes_the_level() {
    let mut simulation = session(ONE_PELLET);

    let mut completed = Vec::new();
    for _ in 0..10 {
        completed.extend(simulation.update(right()).expect("tick"));
        if simulation.is_level_complete() {
            break;
        }
    }
    assert!(completed.contains(&Event::FoodEaten {
        tile: Tile::new(5, 6),
        kind: FoodKind::Pellet,
        remaining: 0,
    }));
    assert!(completed.contains(&Event::LevelCompleted { level: 1 }));
    assert_eq!(simulation.score(), 10);
    assert!(simulation.update(right()).expect("tick").is_empty());

    let started = simulation.start_level(2).expect("next level");
    assert_eq!(started, vec![Event::LevelStarted { level: 2 }]);
    assert_eq!(simulation.level(), 2);
    assert!(!simulation.is_level_complete());
    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.remaining_food, 1);
    assert_eq!(snapshot.total_food, 1);
}

#[test]
fn energizer_frightens_ghosts_outside_the_house() {
    let mut simulation = session(ENERGIZER);

    let mut powered_at = None;
    for tick in 1..=8 {
        let events = simulation.update(right()).expect("tick");
        if events.contains(&Event::PacManGainsPower) {
            powered_at = Some(tick);
            break;
        }
    }
    assert_eq!(powered_at, Some(4));
    assert!(simulation.power_ticks() > 0);

    let _ = simulation.update(right()).expect("tick");
    assert_eq!(
        simulation.ghost_state(GhostId::Blinky),
        Some(GhostState::Frightened)
    );
    assert_eq!(
        simulation.ghost_state(GhostId::Pinky),
        Some(GhostState::LeavingHouse)
    );
}

#[test]
fn invalid_sessions_are_rejected() {
    let no_lives = GameConfig {
        lives: 0,
        ..GameConfig::default()
    };
    assert_eq!(
        Simulation::classic(no_lives).err(),
        Some(SimulationError::NoLives)
    );

    let level_zero = GameConfig {
        start_level: 0,
        ..GameConfig::default()
    };
    assert_eq!(
        Simulation::classic(level_zero).err(),
        Some(SimulationError::InvalidLevel { level: 0 })
    );

    let broken = World::from_text("#####\n#P..#\n###\n");
    assert!(broken.is_err());
}

#[test]
fn autopilot_session_replays_identically() {
    let first = replay(42);
    let second = replay(42);
    assert_eq!(first, second, "replay diverged");
    assert!(first.events.iter().any(|event| matches!(event, Event::FoodEaten { .. })));
}

#[derive(Debug, PartialEq)]
struct Replay {
    events: Vec<Event>,
    snapshots: Vec<Snapshot>,
}

fn replay(seed: u64) -> Replay {
    let config = GameConfig {
        seed,
        autopilot: true,
        route_preview: true,
        ..GameConfig::default()
    };
    let mut simulation = Simulation::classic(config).expect("session starts");
    let mut events = Vec::new();
    let mut snapshots = Vec::new();

    for tick in 0..3_000 {
        if simulation.is_game_over() {
            break;
        }
        if simulation.is_waiting_for_reset() {
            simulation.reset_after_death().expect("lives remain");
        }
        if simulation.is_level_complete() {
            let next = simulation.level() + 1;
            events.extend(simulation.start_level(next).expect("next level"));
        }
        events.extend(simulation.update(InputState::default()).expect("tick"));
        if tick % 250 == 0 {
            snapshots.push(simulation.snapshot());
        }
    }
    snapshots.push(simulation.snapshot());

    Replay { events, snapshots }
}
