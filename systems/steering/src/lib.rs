#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering strategies that compute an agent's wish direction each tick.
//!
//! Every strategy implements [`Steer`]. A strategy inspects the agent's
//! [`Mover`] and a [`SteeringContext`], may update the mover's wish
//! direction, and returns the [`Drive`] the motion model should apply this
//! tick. The [`Steering`] enum closes the set of strategies so a state
//! machine can bind one to each of its states.

mod house;
mod path;
mod pursuit;
mod random;

use maze_chase_core::{Direction, InputState, Tile};
use maze_chase_system_movement::{Mover, Point};
use maze_chase_world::{Access, World};

pub use house::{HouseEntry, HouseExit};
pub use path::PathFollower;
pub use pursuit::{decide, preview_route, TargetPursuit};
pub use random::RandomWalker;

/// How the motion model should move the agent this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drive {
    /// Move along the maze grid honouring the access rules.
    Grid,
    /// Move straight toward the point, ignoring the maze structure.
    Glide(Point),
    /// Stay in place.
    Hold,
}

/// Read-only inputs available to a strategy.
#[derive(Clone, Copy, Debug)]
pub struct SteeringContext<'a> {
    /// The maze.
    pub world: &'a World,
    /// Tiles the agent may enter.
    pub access: Access,
    /// Tile the agent is heading for, when one is known.
    pub target: Option<Tile>,
    /// Current input signals.
    pub input: InputState,
}

/// Capability shared by every steering strategy.
pub trait Steer {
    /// Updates the wish direction of `mover` and selects this tick's drive.
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive;

    /// Forgets cached decisions, e.g. after the agent was repositioned.
    fn reset(&mut self) {}

    /// Tiles the strategy currently plans to visit.
    fn route(&self) -> &[Tile] {
        &[]
    }
}

/// Follows asserted input signals; no lookahead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSteering;

impl Steer for InputSteering {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        let pressed = Direction::PRIORITY.into_iter().find(|direction| {
            context.input.is_pressed(*direction)
                && mover.can_head(context.world, context.access, *direction)
        });
        if let Some(direction) = pressed {
            mover.set_wish_dir(direction);
        }
        Drive::Grid
    }
}

/// Closed set of strategies a state can be bound to.
#[derive(Clone, Debug)]
pub enum Steering {
    /// Keeps the agent in place.
    Idle,
    /// Target-tile pursuit.
    Pursuit(TargetPursuit),
    /// Shortest-path following.
    FollowPath(PathFollower),
    /// Seeded random walk.
    RandomWalk(RandomWalker),
    /// Input following.
    Input(InputSteering),
    /// Glide from the house entry down to a bed.
    EnterHouse(HouseEntry),
    /// Glide from inside the house out through the door.
    LeaveHouse(HouseExit),
}

impl Steer for Steering {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        match self {
            Self::Idle => Drive::Hold,
            Self::Pursuit(strategy) => strategy.steer(mover, context),
            Self::FollowPath(strategy) => strategy.steer(mover, context),
            Self::RandomWalk(strategy) => strategy.steer(mover, context),
            Self::Input(strategy) => strategy.steer(mover, context),
            Self::EnterHouse(strategy) => strategy.steer(mover, context),
            Self::LeaveHouse(strategy) => strategy.steer(mover, context),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Idle | Self::Input(_) | Self::EnterHouse(_) | Self::LeaveHouse(_) => {}
            Self::Pursuit(strategy) => strategy.reset(),
            Self::FollowPath(strategy) => strategy.reset(),
            Self::RandomWalk(strategy) => strategy.reset(),
        }
    }

    fn route(&self) -> &[Tile] {
        match self {
            Self::Pursuit(strategy) => strategy.route(),
            Self::FollowPath(strategy) => strategy.route(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_adopts_first_pressed_open_direction() {
        let world = World::classic().expect("classic maze parses");
        let mut mover = Mover::new(Tile::new(6, 5), Direction::Right);
        let mut steering = Steering::Input(InputSteering);

        let context = SteeringContext {
            world: &world,
            access: Access::Outside,
            target: None,
            input: InputState {
                up: true,
                down: true,
                ..InputState::default()
            },
        };
        assert_eq!(steering.steer(&mut mover, &context), Drive::Grid);
        assert_eq!(mover.wish_dir(), Direction::Up);

        let mut walled = Mover::new(Tile::new(1, 1), Direction::Right);
        let _ = steering.steer(&mut walled, &context);
        assert_eq!(walled.wish_dir(), Direction::Down);
    }

    #[test]
    fn idle_holds_position() {
        let world = World::classic().expect("classic maze parses");
        let mut mover = Mover::new(Tile::new(6, 5), Direction::Right);
        let context = SteeringContext {
            world: &world,
            access: Access::Outside,
            target: Some(Tile::new(1, 1)),
            input: InputState::default(),
        };
        assert_eq!(Steering::Idle.steer(&mut mover, &context), Drive::Hold);
        assert!(Steering::Idle.route().is_empty());
    }
}
