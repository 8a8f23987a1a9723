//! Target-tile pursuit: the classic intersection decision.

use maze_chase_core::{Direction, Tile};
use maze_chase_system_movement::Mover;
use maze_chase_world::{query, Access, World};

use crate::{Drive, Steer, SteeringContext};

/// Chooses the direction to leave `tile` in while heading for `target`.
///
/// The reverse of `move_dir` is never a candidate. Among directions whose
/// neighbour satisfies `can_enter`, the one whose neighbour is closest to
/// `target` by squared Euclidean distance wins, ties going to the earlier
/// direction in [`Direction::PRIORITY`]. Returns `None` when no candidate
/// survives.
pub fn decide<F>(tile: Tile, move_dir: Direction, target: Tile, can_enter: F) -> Option<Direction>
where
    F: Fn(Tile) -> bool,
{
    let forbidden = move_dir.opposite();
    let mut best: Option<(i64, Direction)> = None;
    for direction in Direction::PRIORITY {
        if direction == forbidden {
            continue;
        }
        let neighbor = tile.neighbor(direction);
        if !can_enter(neighbor) {
            continue;
        }
        let distance = neighbor.euclidean_distance_sq(target);
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, direction));
        }
    }
    best.map(|(_, direction)| direction)
}

/// Simulates pursuit decisions from `from` without moving any agent.
///
/// The walk ends at `target`, at a tile with no way forward, when a tile
/// would be revisited, or when it would leave the grid. The starting tile is not part of the route.
#[must_use]
pub fn preview_route(
    world: &World,
    access: Access,
    from: Tile,
    move_dir: Direction,
    target: Tile,
) -> Vec<Tile> {
    let graph = query::graph(world);
    let mut route = Vec::new();
    let mut tile = from;
    let mut direction = move_dir;
    let limit = (graph.columns() as usize) * (graph.rows() as usize);

    while route.len() < limit {
        let Some(chosen) = decide(tile, direction, target, |candidate| {
            query::is_accessible(world, candidate, access)
        }) else {
            break;
        };
        direction = chosen;
        let next = tile.neighbor(direction);
        if !graph.contains(next) || next == from || route.contains(&next) {
            break;
        }
        route.push(next);
        if next == target {
            break;
        }
        tile = next;
    }
    route
}

/// Steers toward the context target, one decision per tile.
#[derive(Clone, Debug, Default)]
pub struct TargetPursuit {
    preview: bool,
    route: Vec<Tile>,
}

impl TargetPursuit {
    /// Creates a pursuer. With `preview` set, the planned route is kept
    /// for display.
    #[must_use]
    pub fn new(preview: bool) -> Self {
        Self {
            preview,
            route: Vec::new(),
        }
    }
}

impl Steer for TargetPursuit {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        if !(mover.entered_new_tile() || mover.is_stuck()) {
            return Drive::Grid;
        }
        let Some(target) = context.target else {
            return Drive::Grid;
        };

        let world = context.world;
        let access = context.access;
        let chosen = decide(mover.tile(), mover.move_dir(), target, |tile| {
            query::is_accessible(world, tile, access)
        });
        let direction = chosen.unwrap_or_else(|| mover.move_dir());
        tracing::trace!(tile = ?mover.tile(), ?target, ?direction, "pursuit decision");
        mover.set_wish_dir(direction);

        if self.preview {
            self.route = preview_route(world, access, mover.tile(), mover.move_dir(), target);
        }
        Drive::Grid
    }

    fn reset(&mut self) {
        self.route.clear();
    }

    fn route(&self) -> &[Tile] {
        &self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equidistant_candidates_prefer_up_over_down() {
        let wall = Tile::new(6, 5);
        let chosen = decide(Tile::new(5, 5), Direction::Right, Tile::new(10, 5), |tile| {
            tile != wall
        });
        assert_eq!(chosen, Some(Direction::Up));
    }

    #[test]
    fn priority_order_breaks_every_tie() {
        let open = |_: Tile| true;
        let center = Tile::new(5, 5);
        assert_eq!(
            decide(center, Direction::Up, Tile::new(6, 4), open),
            Some(Direction::Up)
        );
        assert_eq!(
            decide(center, Direction::Left, Tile::new(4, 6), open),
            Some(Direction::Left)
        );
        assert_eq!(
            decide(center, Direction::Down, Tile::new(6, 6), open),
            Some(Direction::Down)
        );
    }

    #[test]
    fn reverse_is_never_chosen_even_when_closest() {
        let chosen = decide(Tile::new(5, 5), Direction::Right, Tile::new(0, 5), |_| true);
        assert_eq!(chosen, Some(Direction::Up));
    }

    #[test]
    fn no_candidates_yields_none() {
        let only_back = Tile::new(4, 5);
        let chosen = decide(Tile::new(5, 5), Direction::Right, Tile::new(9, 9), |tile| {
            tile == only_back
        });
        assert_eq!(chosen, None);
    }
}
