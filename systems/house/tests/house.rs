use maze_chase_core::{Command, GhostId, LevelParams, Tile};
use maze_chase_system_house::{door_commands, DoorController, Release, ReleaseReason};
use maze_chase_world::{apply, query, World};
use proptest::prelude::*;

fn level(number: u32) -> DoorController {
    DoorController::new(&LevelParams::for_level(number))
}

#[test]
fn pinky_leaves_on_first_evaluation() {
    let mut controller = level(1);
    let release = controller.update(0, &[GhostId::Pinky, GhostId::Inky, GhostId::Clyde]);
    assert_eq!(
        release,
        Some(Release {
            ghost: GhostId::Pinky,
            reason: ReleaseReason::PersonalCounter,
        })
    );
}

#[test]
fn inky_leaves_when_global_counter_reaches_seventeen() {
    let mut controller = level(1);
    controller.life_lost();
    let locked = [GhostId::Inky, GhostId::Clyde];

    assert_eq!(controller.update(16, &locked), None);
    assert_eq!(controller.global_counter(), Some(16));
    assert_eq!(
        controller.update(1, &locked),
        Some(Release {
            ghost: GhostId::Inky,
            reason: ReleaseReason::GlobalCounter,
        })
    );
}

#[test]
fn starvation_forces_release_and_restarts() {
    let mut controller = level(1);
    let locked = [GhostId::Inky, GhostId::Clyde];
    let limit = LevelParams::for_level(1).starvation_limit();

    for _ in 0..limit {
        assert_eq!(controller.update(0, &locked), None);
    }
    assert_eq!(controller.starvation_ticks(), limit);
    assert_eq!(
        controller.update(0, &locked),
        Some(Release {
            ghost: GhostId::Inky,
            reason: ReleaseReason::Starvation,
        })
    );
    assert_eq!(controller.starvation_ticks(), 0);
}

#[test]
fn eating_resets_starvation() {
    let mut controller = level(5);
    let _ = controller.update(0, &[]);
    let _ = controller.update(0, &[]);
    assert_eq!(controller.starvation_ticks(), 2);
    let _ = controller.update(1, &[]);
    assert_eq!(controller.starvation_ticks(), 0);
}

#[test]
fn global_counter_is_dropped_at_thirty_two_while_clyde_waits() {
    let mut controller = level(1);
    controller.life_lost();
    let locked = [GhostId::Inky, GhostId::Clyde];

    assert_eq!(controller.update(16, &locked), None);
    assert_eq!(controller.update(16, &locked), None);
    assert_eq!(controller.global_counter(), None);
    assert_eq!(controller.personal_counter(GhostId::Inky), 0);

    let _ = controller.update(3, &locked);
    assert_eq!(controller.personal_counter(GhostId::Inky), 3);
}

#[test]
fn door_opens_for_passing_ghost_and_closes_after() {
    let mut world = World::classic().expect("classic maze parses");
    let entry = query::house(&world).entry();

    let opening = door_commands(&world, &[entry]);
    assert!(!opening.is_empty());
    assert!(opening
        .iter()
        .all(|command| matches!(command, Command::SetDoor { open: true, .. })));

    let mut events = Vec::new();
    for command in opening {
        apply(&mut world, command, &mut events);
    }
    assert!(door_commands(&world, &[entry]).is_empty());

    let closing = door_commands(&world, &[Tile::new(1, 1)]);
    assert_eq!(closing.len(), query::doors(&world).len());
    assert!(closing
        .iter()
        .all(|command| matches!(command, Command::SetDoor { open: false, .. })));
}

proptest! {
    #[test]
    fn only_the_preferred_ghost_is_released(
        food in proptest::collection::vec(0u32..4, 1..300),
        level_number in 1u32..8,
    ) {
        let mut controller = level(level_number);
        let mut locked = vec![GhostId::Pinky, GhostId::Inky, GhostId::Clyde];
        for eaten in food {
            if let Some(release) = controller.update(eaten, &locked) {
                prop_assert_eq!(Some(&release.ghost), locked.first());
                locked.retain(|ghost| *ghost != release.ghost);
            }
        }
    }
}
