use maze_chase_core::{Direction, LevelParams, Tile, BASE_SPEED};
use maze_chase_system_movement::{Mover, Point};
use maze_chase_world::{Access, World};

fn classic() -> World {
    World::classic().expect("classic maze parses")
}

#[test]
fn turns_are_committed_only_while_aligned() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(6, 5), Direction::Right);

    mover.advance(&world, Access::Outside, 2.0);
    assert_eq!(mover.position(), Point::new(50.0, 40.0));

    mover.set_wish_dir(Direction::Down);
    mover.advance(&world, Access::Outside, 2.0);
    assert_eq!(mover.move_dir(), Direction::Right);
    assert_eq!(mover.position(), Point::new(52.0, 40.0));
}

#[test]
fn aligned_agent_adopts_open_wish_direction() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(6, 5), Direction::Right);
    mover.set_wish_dir(Direction::Down);

    mover.advance(&world, Access::Outside, 2.0);
    assert_eq!(mover.move_dir(), Direction::Down);
    assert_eq!(mover.position(), Point::new(48.0, 42.0));
}

#[test]
fn blocked_agent_holds_until_a_direction_opens() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(1, 1), Direction::Up);

    mover.advance(&world, Access::Outside, 2.0);
    assert!(mover.is_stuck());
    assert!(!mover.entered_new_tile());
    assert_eq!(mover.position(), Point::of_tile(Tile::new(1, 1)));

    mover.set_wish_dir(Direction::Right);
    mover.advance(&world, Access::Outside, 2.0);
    assert!(!mover.is_stuck());
    assert_eq!(mover.move_dir(), Direction::Right);
}

#[test]
fn every_alignment_point_is_a_decision_point() {
    let world = classic();
    let junction = Point::of_tile(Tile::new(6, 5));

    for speed in [0.9375, 1.0, 1.1875, 1.25, 1.3125, 2.5, 3.0] {
        let mut mover = Mover::new(Tile::new(2, 5), Direction::Right);
        mover.set_wish_dir(Direction::Down);
        for _ in 0..40 {
            mover.advance(&world, Access::Outside, speed);
            if mover.move_dir() == Direction::Down {
                break;
            }
        }
        assert_eq!(mover.move_dir(), Direction::Down, "speed {speed}");
        mover.advance(&world, Access::Outside, speed);
        assert_eq!(mover.position().x, junction.x, "speed {speed}");
        assert!(mover.position().y > junction.y, "speed {speed}");
    }
}

#[test]
fn leftover_distance_is_spent_after_turning() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(5, 5), Direction::Right);

    mover.advance(&world, Access::Outside, 3.0);
    mover.set_wish_dir(Direction::Down);
    mover.advance(&world, Access::Outside, 3.0);
    assert_eq!(mover.position(), Point::new(46.0, 40.0));

    mover.advance(&world, Access::Outside, 3.0);
    assert_eq!(mover.move_dir(), Direction::Down);
    assert_eq!(mover.position(), Point::new(48.0, 41.0));
}

#[test]
fn distance_covered_follows_speed_exactly() {
    let world = classic();
    let params = LevelParams::for_level(5);
    let speeds = [
        params.ghost_speed,
        params.pacman_speed,
        params.elroy2_speed,
    ]
    .map(|fraction| fraction * BASE_SPEED);

    let covered = speeds.map(|speed| {
        let mut mover = Mover::new(Tile::new(1, 5), Direction::Right);
        for _ in 0..70 {
            mover.advance(&world, Access::Outside, speed);
        }
        mover.position().x - Point::of_tile(Tile::new(1, 5)).x
    });

    for (speed, distance) in speeds.iter().zip(covered) {
        assert!((distance - speed * 70.0).abs() < 0.01, "speed {speed} covered {distance}");
    }
    assert!(covered[0] < covered[1]);
    assert!(covered[1] < covered[2]);
}

#[test]
fn doors_block_outside_agents_only() {
    let world = classic();
    let above_door = Tile::new(13, 11);

    let mut outsider = Mover::new(above_door, Direction::Down);
    outsider.advance(&world, Access::Outside, 2.0);
    assert!(outsider.is_stuck());

    let mut ghost = Mover::new(above_door, Direction::Down);
    ghost.advance(&world, Access::ThroughDoors, 2.0);
    assert!(!ghost.is_stuck());
    assert_eq!(ghost.position(), Point::new(104.0, 90.0));
}

#[test]
fn portal_round_trip_preserves_direction_and_reports_every_tile() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(2, 14), Direction::Left);

    let mut entered = Vec::new();
    for _ in 0..40 {
        mover.advance(&world, Access::Outside, 2.0);
        assert_eq!(mover.move_dir(), Direction::Left);
        if mover.entered_new_tile() {
            entered.push(mover.tile());
        }
    }

    assert_eq!(
        &entered[..5],
        &[
            Tile::new(1, 14),
            Tile::new(0, 14),
            Tile::new(-1, 14),
            Tile::new(28, 14),
            Tile::new(27, 14),
        ]
    );
    for pair in entered.windows(2) {
        let adjacent = pair[0].manhattan_distance(pair[1]) == 1;
        let wrapped = pair[0] == Tile::new(-1, 14) && pair[1] == Tile::new(28, 14);
        assert!(adjacent || wrapped, "skipped from {:?} to {:?}", pair[0], pair[1]);
    }
}

#[test]
fn teleport_flag_is_set_only_on_the_crossing_tick() {
    let world = classic();
    let mut mover = Mover::new(Tile::new(-1, 14), Direction::Left);

    mover.advance(&world, Access::Outside, 2.0);
    assert!(mover.teleported());
    assert_eq!(mover.tile(), Tile::new(28, 14));
    assert_eq!(mover.position(), Point::new(222.0, 112.0));

    mover.advance(&world, Access::Outside, 2.0);
    assert!(!mover.teleported());
    assert_eq!(mover.position(), Point::new(220.0, 112.0));
}
