//! Axis-aligned micro-behaviours used inside the ghost house.
//!
//! House interior tiles are not part of the pursuit graph, so both
//! strategies glide between fixed reference points instead of deciding at
//! intersections.

use maze_chase_core::GhostId;
use maze_chase_system_movement::{Mover, Point};
use maze_chase_world::{query, World};

use crate::{Drive, Steer, SteeringContext};

fn entry_point(world: &World) -> Point {
    Point::of_tile(query::house(world).entry())
}

fn center_row(world: &World) -> f32 {
    Point::of_tile(query::house(world).revival_bed(GhostId::Blinky).tile()).y
}

/// Glides down from the house entry through the door, then sideways to
/// the bed given as the context target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HouseEntry;

impl Steer for HouseEntry {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        let Some(bed) = context.target else {
            return Drive::Hold;
        };
        let seat = Point::of_tile(bed);
        let position = mover.position();
        let entry = entry_point(context.world);

        if position == seat {
            return Drive::Hold;
        }
        if position.y < seat.y {
            if position.x != entry.x {
                return Drive::Glide(Point::new(entry.x, position.y));
            }
            return Drive::Glide(Point::new(entry.x, seat.y));
        }
        Drive::Glide(seat)
    }
}

/// Glides from anywhere inside the house to the tile above the door:
/// vertically to the house's centre row, horizontally to the door column,
/// then straight up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HouseExit;

impl HouseExit {
    /// Reports whether the agent has left the house.
    #[must_use]
    pub fn is_outside(mover: &Mover, world: &World) -> bool {
        mover.position() == entry_point(world)
    }
}

impl Steer for HouseExit {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        let exit = entry_point(context.world);
        let position = mover.position();

        if position == exit {
            return Drive::Hold;
        }
        if position.x == exit.x {
            return Drive::Glide(exit);
        }
        let row = center_row(context.world);
        if position.y != row {
            return Drive::Glide(Point::new(position.x, row));
        }
        Drive::Glide(Point::new(exit.x, row))
    }
}
