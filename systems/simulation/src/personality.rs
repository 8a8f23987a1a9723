//! Scatter corners and chase targets of the four ghosts.

use maze_chase_core::{Direction, GhostId, Tile};
use maze_chase_world::{query, World};

/// Distance in tiles at or below which Clyde gives up chasing.
const CLYDE_SHYNESS: f32 = 8.0;

/// Home corner a ghost heads for while scattering. Every corner lies
/// outside the maze so it can never be reached.
#[must_use]
pub fn scatter_corner(ghost: GhostId, world: &World) -> Tile {
    let graph = query::graph(world);
    let columns = i32::try_from(graph.columns()).unwrap_or(i32::MAX);
    let rows = i32::try_from(graph.rows()).unwrap_or(i32::MAX);
    match ghost {
        GhostId::Blinky => Tile::new(columns - 3, -4),
        GhostId::Pinky => Tile::new(2, -4),
        GhostId::Inky => Tile::new(columns - 1, rows),
        GhostId::Clyde => Tile::new(0, rows),
    }
}

/// Tile `steps` ahead of Pac-Man. Facing up also shifts the tile left by
/// the same amount, as the arcade machine does.
#[must_use]
pub fn ahead_of(pacman: Tile, heading: Direction, steps: i32) -> Tile {
    let ahead = pacman.towards(heading, steps);
    if heading == Direction::Up {
        ahead.towards(Direction::Left, steps)
    } else {
        ahead
    }
}

/// Positions a chase target is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pursued {
    /// Pac-Man's tile.
    pub pacman: Tile,
    /// Pac-Man's move direction.
    pub heading: Direction,
    /// Blinky's tile, used by Inky.
    pub blinky: Tile,
}

/// Tile a ghost standing on `own` pursues while chasing.
#[must_use]
pub fn chase_target(ghost: GhostId, own: Tile, pursued: Pursued, world: &World) -> Tile {
    match ghost {
        GhostId::Blinky => pursued.pacman,
        GhostId::Pinky => ahead_of(pursued.pacman, pursued.heading, 4),
        GhostId::Inky => {
            let pivot = ahead_of(pursued.pacman, pursued.heading, 2);
            Tile::new(
                2 * pivot.column() - pursued.blinky.column(),
                2 * pivot.row() - pursued.blinky.row(),
            )
        }
        GhostId::Clyde => {
            if own.euclidean_distance(pursued.pacman) > CLYDE_SHYNESS {
                pursued.pacman
            } else {
                scatter_corner(GhostId::Clyde, world)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> World {
        World::classic().expect("classic maze parses")
    }

    fn pursued(heading: Direction) -> Pursued {
        Pursued {
            pacman: Tile::new(13, 23),
            heading,
            blinky: Tile::new(13, 11),
        }
    }

    #[test]
    fn corners_lie_outside_the_maze() {
        let world = classic();
        let graph = query::graph(&world);
        for ghost in GhostId::ALL {
            assert!(!graph.contains(scatter_corner(ghost, &world)));
        }
        assert_eq!(scatter_corner(GhostId::Blinky, &world), Tile::new(25, -4));
        assert_eq!(scatter_corner(GhostId::Clyde, &world), Tile::new(0, 31));
    }

    #[test]
    fn pinky_aims_ahead_with_upward_overflow() {
        let world = classic();
        let own = Tile::new(1, 1);
        assert_eq!(
            chase_target(GhostId::Pinky, own, pursued(Direction::Left), &world),
            Tile::new(9, 23)
        );
        assert_eq!(
            chase_target(GhostId::Pinky, own, pursued(Direction::Up), &world),
            Tile::new(9, 19)
        );
    }

    #[test]
    fn inky_doubles_the_vector_from_blinky() {
        let world = classic();
        let target = chase_target(GhostId::Inky, Tile::new(1, 1), pursued(Direction::Right), &world);
        assert_eq!(target, Tile::new(17, 35));
    }

    #[test]
    fn clyde_retreats_when_close() {
        let world = classic();
        let far = chase_target(GhostId::Clyde, Tile::new(1, 1), pursued(Direction::Left), &world);
        assert_eq!(far, Tile::new(13, 23));
        let near = chase_target(GhostId::Clyde, Tile::new(13, 20), pursued(Direction::Left), &world);
        assert_eq!(near, scatter_corner(GhostId::Clyde, &world));
        let edge = chase_target(GhostId::Clyde, Tile::new(13, 15), pursued(Direction::Left), &world);
        assert_eq!(edge, scatter_corner(GhostId::Clyde, &world));
        let beyond = chase_target(GhostId::Clyde, Tile::new(12, 15), pursued(Direction::Left), &world);
        assert_eq!(beyond, Tile::new(13, 23));
    }
}
