use maze_chase_core::Tile;
use maze_chase_system_movement::{Mover, Point};
use maze_chase_world::query;

use crate::{Drive, Steer, SteeringContext};

/// Follows a shortest path to the context target.
///
/// The path is recomputed whenever the target changes, the agent is no
/// longer on the tile the cursor expects, or the path ran out before the
/// target. The first step of a fresh path avoids reversing when possible.
/// On the goal tile the agent glides onto its alignment point and stays.
#[derive(Clone, Debug, Default)]
pub struct PathFollower {
    path: Vec<Tile>,
    cursor: usize,
    goal: Option<Tile>,
}

impl PathFollower {
    /// Creates a follower without a path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn recompute(&mut self, mover: &Mover, context: &SteeringContext<'_>, goal: Tile) {
        let from = mover.tile();
        let reverse = mover.move_dir().opposite();
        let mut path = query::shortest_path(context.world, from, goal, context.access, Some(reverse));
        if path.is_empty() {
            path = query::shortest_path(context.world, from, goal, context.access, None);
        }
        tracing::debug!(?from, ?goal, length = path.len(), "path recomputed");
        self.path = path;
        self.cursor = 0;
        self.goal = Some(goal);
    }
}

impl Steer for PathFollower {
    fn steer(&mut self, mover: &mut Mover, context: &SteeringContext<'_>) -> Drive {
        let Some(goal) = context.target else {
            return Drive::Grid;
        };
        let tile = mover.tile();
        if tile == goal {
            return Drive::Glide(Point::of_tile(goal));
        }
        if !(mover.entered_new_tile() || mover.is_stuck()) {
            return Drive::Grid;
        }

        let in_sync = self.path.get(self.cursor) == Some(&tile);
        let exhausted = self.cursor + 1 >= self.path.len();
        if self.goal != Some(goal) || !in_sync || exhausted {
            self.recompute(mover, context, goal);
        }

        if let Some(direction) = self
            .path
            .get(self.cursor + 1)
            .and_then(|next| tile.direction_to(*next))
        {
            mover.set_wish_dir(direction);
            self.cursor += 1;
        }
        Drive::Grid
    }

    fn reset(&mut self) {
        self.path.clear();
        self.cursor = 0;
        self.goal = None;
    }

    fn route(&self) -> &[Tile] {
        self.path.get(self.cursor..).unwrap_or(&[])
    }
}
