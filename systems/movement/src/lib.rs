#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Agent motion model resolving per-tick movement against the maze.
//!
//! Positions are measured in pixels. A tile `(c, r)` is aligned at pixel
//! `(c * TILE_SIZE, r * TILE_SIZE)` and an agent belongs to the tile whose
//! alignment point is nearest, so the tile changes halfway between two
//! alignment points. Direction changes are committed only while aligned.

use maze_chase_core::{Direction, Tile, TILE_SIZE};
use maze_chase_world::{query, Access, World};
use serde::Serialize;

/// Pixel coordinate of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Alignment point of the tile.
    #[must_use]
    pub fn of_tile(tile: Tile) -> Self {
        Self {
            x: tile.column() as f32 * TILE_SIZE,
            y: tile.row() as f32 * TILE_SIZE,
        }
    }

    /// Tile owning this point.
    #[must_use]
    pub fn tile(self) -> Tile {
        Tile::new(tile_coordinate(self.x), tile_coordinate(self.y))
    }
}

fn tile_coordinate(pixels: f32) -> i32 {
    ((pixels + TILE_SIZE / 2.0) / TILE_SIZE).floor() as i32
}

fn next_alignment(coordinate: f32, direction: Direction) -> f32 {
    let (dc, dr) = direction.delta();
    let direction_sign = (dc + dr) as f32;
    let cells = coordinate / TILE_SIZE;
    let nearest = cells.round();
    let next = if (cells - nearest).abs() <= f32::EPSILON {
        nearest + direction_sign
    } else if direction_sign > 0.0 {
        cells.ceil()
    } else {
        cells.floor()
    };
    next * TILE_SIZE
}

/// Movement state of one agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Mover {
    position: Point,
    move_dir: Direction,
    wish_dir: Direction,
    tile: Tile,
    entered_new_tile: bool,
    stuck: bool,
    teleported: bool,
}

impl Mover {
    /// Creates an agent aligned at `tile` and heading `direction`.
    #[must_use]
    pub fn new(tile: Tile, direction: Direction) -> Self {
        Self {
            position: Point::of_tile(tile),
            move_dir: direction,
            wish_dir: direction,
            tile,
            entered_new_tile: true,
            stuck: false,
            teleported: false,
        }
    }

    /// Repositions the agent at `tile`, heading `direction`.
    ///
    /// The placement counts as entering a new tile so that steering decides
    /// on the next tick.
    pub fn place(&mut self, tile: Tile, direction: Direction) {
        *self = Self::new(tile, direction);
    }

    /// Current pixel position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Tile the agent belongs to.
    #[must_use]
    pub const fn tile(&self) -> Tile {
        self.tile
    }

    /// Pixel offset from the alignment point of the current tile.
    #[must_use]
    pub fn offset(&self) -> Point {
        let origin = Point::of_tile(self.tile);
        Point::new(self.position.x - origin.x, self.position.y - origin.y)
    }

    /// Direction the agent is moving in.
    #[must_use]
    pub const fn move_dir(&self) -> Direction {
        self.move_dir
    }

    /// Direction the agent intends to take at the next alignment point.
    #[must_use]
    pub const fn wish_dir(&self) -> Direction {
        self.wish_dir
    }

    /// Records the direction to adopt at the next alignment point.
    pub fn set_wish_dir(&mut self, direction: Direction) {
        self.wish_dir = direction;
    }

    /// Whether the last update moved the agent onto a different tile.
    #[must_use]
    pub const fn entered_new_tile(&self) -> bool {
        self.entered_new_tile
    }

    /// Whether the agent is aligned and unable to continue.
    #[must_use]
    pub const fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Whether the last update carried the agent through a portal.
    #[must_use]
    pub const fn teleported(&self) -> bool {
        self.teleported
    }

    /// Whether the agent sits exactly on its tile's alignment point.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.position == Point::of_tile(self.tile)
    }

    /// Reports whether the agent can leave its current tile heading
    /// `direction` with the given privilege.
    #[must_use]
    pub fn can_head(&self, world: &World, access: Access, direction: Direction) -> bool {
        query::is_accessible(world, self.tile.neighbor(direction), access)
    }

    /// Moves along the maze grid by exactly `speed` pixels unless blocked.
    ///
    /// Every alignment point on the way is a decision point: the agent passes
    /// through a portal if it stands on a portal end facing outward, adopts
    /// the wish direction when the neighbour that way is enterable, and
    /// holds there when the neighbour ahead is not enterable. Distance left
    /// after an alignment point is spent in the resolved direction.
    pub fn advance(&mut self, world: &World, access: Access, speed: f32) {
        let before = self.tile;
        self.teleported = false;
        self.stuck = false;
        let mut budget = speed.max(0.0);

        loop {
            if self.is_aligned() {
                if !self.teleported {
                    if let Some(exit) = self.portal_exit(world) {
                        tracing::trace!(from = ?self.tile, to = ?exit, "portal teleport");
                        self.position = Point::of_tile(exit);
                        self.tile = exit;
                        self.teleported = true;
                        continue;
                    }
                }
                if self.wish_dir != self.move_dir && self.can_head(world, access, self.wish_dir) {
                    self.move_dir = self.wish_dir;
                }
                if !self.can_head(world, access, self.move_dir) {
                    self.stuck = true;
                    break;
                }
            }
            if budget <= 0.0 {
                break;
            }
            let stop = next_alignment(self.axis(self.move_dir), self.move_dir);
            budget -= self.step(self.move_dir, budget, stop);
        }
        self.entered_new_tile = self.tile != before;
    }

    /// Moves straight toward `target` by up to `speed` pixels, ignoring the
    /// maze structure.
    ///
    /// Horizontal distance is covered before vertical distance; the switch
    /// happens on the following tick. Returns `true` once the target is
    /// reached.
    pub fn glide(&mut self, target: Point, speed: f32) -> bool {
        let before = self.tile;
        self.teleported = false;
        self.stuck = false;

        let dx = target.x - self.position.x;
        let dy = target.y - self.position.y;
        let (direction, stop) = if dx != 0.0 {
            let direction = if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            };
            (direction, target.x)
        } else if dy != 0.0 {
            let direction = if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            };
            (direction, target.y)
        } else {
            self.entered_new_tile = false;
            return true;
        };

        self.move_dir = direction;
        self.wish_dir = direction;
        let _ = self.step(direction, speed.max(0.0), stop);
        self.entered_new_tile = self.tile != before;
        self.position == target
    }

    /// Keeps the agent in place for this tick.
    pub fn hold(&mut self) {
        self.entered_new_tile = false;
        self.teleported = false;
    }

    fn portal_exit(&self, world: &World) -> Option<Tile> {
        let ahead = self.tile.neighbor(self.move_dir);
        if query::graph(world).contains(ahead) {
            return None;
        }
        query::portal_counterpart(world, self.tile)
    }

    fn axis(&self, direction: Direction) -> f32 {
        if direction.is_horizontal() {
            self.position.x
        } else {
            self.position.y
        }
    }

    /// Moves toward `stop` along `direction` by at most `budget` pixels and
    /// returns the distance covered.
    fn step(&mut self, direction: Direction, budget: f32, stop: f32) -> f32 {
        let coordinate = self.axis(direction);
        let distance = (stop - coordinate).abs();
        let (moved, covered) = if budget >= distance {
            (stop, distance)
        } else {
            let (dc, dr) = direction.delta();
            (coordinate + (dc + dr) as f32 * budget, budget)
        };

        if direction.is_horizontal() {
            self.position.x = moved;
        } else {
            self.position.y = moved;
        }
        self.tile = self.position.tile();
        covered
    }
}
