//! Immutable maze structure and the breadth-first queries run against it.

use std::collections::VecDeque;

use maze_chase_core::{Direction, Tile};

use crate::WorldError;

/// Structural classification of a maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileContent {
    /// Impassable wall.
    Wall,
    /// House door; passable only by agents allowed through doors.
    Door,
    /// Open tunnel tile on which ghosts slow down.
    Tunnel,
    /// Any other open tile.
    Space,
}

/// The maze as an undirected grid graph.
///
/// Edges join 4-adjacent in-bounds tiles unless either endpoint is a wall.
/// The contents are fixed at construction so the edge set never changes.
#[derive(Clone, Debug)]
pub struct TileGraph {
    columns: u32,
    rows: u32,
    contents: Vec<TileContent>,
}

impl TileGraph {
    pub(crate) fn new(columns: u32, rows: u32, contents: Vec<TileContent>) -> Self {
        debug_assert_eq!(contents.len(), (columns as usize) * (rows as usize));
        Self {
            columns,
            rows,
            contents,
        }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.index(tile).is_some()
    }

    /// Content of the tile, `None` outside the grid.
    #[must_use]
    pub fn content(&self, tile: Tile) -> Option<TileContent> {
        self.index(tile).map(|index| self.contents[index])
    }

    /// Reports whether the tile is an in-bounds wall.
    #[must_use]
    pub fn is_wall(&self, tile: Tile) -> bool {
        self.content(tile) == Some(TileContent::Wall)
    }

    /// Reports whether the tile is a house door.
    #[must_use]
    pub fn is_door(&self, tile: Tile) -> bool {
        self.content(tile) == Some(TileContent::Door)
    }

    /// Reports whether the tile is a tunnel tile.
    #[must_use]
    pub fn is_tunnel(&self, tile: Tile) -> bool {
        self.content(tile) == Some(TileContent::Tunnel)
    }

    /// Reports whether an edge joins the two tiles.
    #[must_use]
    pub fn has_edge(&self, from: Tile, to: Tile) -> bool {
        from.direction_to(to).is_some()
            && matches!(self.content(from), Some(content) if content != TileContent::Wall)
            && matches!(self.content(to), Some(content) if content != TileContent::Wall)
    }

    /// Tiles joined to `tile` by an edge, in direction priority order.
    pub fn neighbors(&self, tile: Tile) -> impl Iterator<Item = Tile> + '_ {
        Direction::PRIORITY
            .into_iter()
            .map(move |direction| tile.neighbor(direction))
            .filter(move |neighbor| self.has_edge(tile, *neighbor))
    }

    /// Direction leading from `from` to the adjacent tile `to`.
    pub fn direction(&self, from: Tile, to: Tile) -> Result<Direction, WorldError> {
        from.direction_to(to)
            .ok_or(WorldError::NotAdjacent { from, to })
    }

    /// Computes a shortest path from `from` to `to`, both ends included.
    ///
    /// `can_traverse` filters individual edges on top of the graph structure.
    /// An empty path is returned when `to` is unreachable. Which of several
    /// equally short paths is returned is unspecified.
    pub fn shortest_path<F>(&self, from: Tile, to: Tile, can_traverse: F) -> Vec<Tile>
    where
        F: Fn(Tile, Tile) -> bool,
    {
        let (Some(start), Some(goal)) = (self.index(from), self.index(to)) else {
            return Vec::new();
        };
        if start == goal {
            return vec![from];
        }

        let mut parents: Vec<Option<usize>> = vec![None; self.contents.len()];
        let mut visited = vec![false; self.contents.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back(from);

        while let Some(tile) = queue.pop_front() {
            let Some(current) = self.index(tile) else {
                continue;
            };
            if current == goal {
                break;
            }

            for neighbor in self.neighbors(tile) {
                if !can_traverse(tile, neighbor) {
                    continue;
                }
                let Some(next) = self.index(neighbor) else {
                    continue;
                };
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                parents[next] = Some(current);
                queue.push_back(neighbor);
            }
        }

        if !visited[goal] {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cursor = Some(goal);
        while let Some(index) = cursor {
            path.push(self.tile_at(index));
            cursor = parents[index];
        }
        path.reverse();
        path
    }

    /// Breadth-first distance field seeded from `source`.
    pub fn distance_field<F>(&self, source: Tile, can_traverse: F) -> DistanceField
    where
        F: Fn(Tile, Tile) -> bool,
    {
        let mut distances = vec![u32::MAX; self.contents.len()];
        let mut queue = VecDeque::new();

        if let Some(index) = self.index(source) {
            distances[index] = 0;
            queue.push_back(source);
        }

        while let Some(tile) = queue.pop_front() {
            let Some(current) = self.index(tile) else {
                continue;
            };
            let next_distance = distances[current].saturating_add(1);

            for neighbor in self.neighbors(tile) {
                if !can_traverse(tile, neighbor) {
                    continue;
                }
                let Some(next) = self.index(neighbor) else {
                    continue;
                };
                if distances[next] <= next_distance {
                    continue;
                }
                distances[next] = next_distance;
                queue.push_back(neighbor);
            }
        }

        DistanceField {
            columns: self.columns,
            rows: self.rows,
            distances,
        }
    }

    /// Iterates every in-bounds tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.contents.len()).map(|index| self.tile_at(index))
    }

    pub(crate) fn index(&self, tile: Tile) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn tile_at(&self, index: usize) -> Tile {
        let width = self.columns.max(1) as usize;
        Tile::new((index % width) as i32, (index / width) as i32)
    }
}

/// Dense breadth-first distances from a single source tile.
///
/// Unreachable or out-of-bounds tiles report `None`.
#[derive(Clone, Debug)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Number of edges on a shortest walk from the source to `tile`.
    #[must_use]
    pub fn distance(&self, tile: Tile) -> Option<u32> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = (row as usize) * (self.columns as usize) + column as usize;
        self.distances
            .get(index)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(columns: u32, rows: u32, walls: &[Tile]) -> TileGraph {
        let mut contents = vec![TileContent::Space; (columns * rows) as usize];
        for wall in walls {
            let index = (wall.row() as u32 * columns + wall.column() as u32) as usize;
            contents[index] = TileContent::Wall;
        }
        TileGraph::new(columns, rows, contents)
    }

    #[test]
    fn distance_field_sets_source_to_zero() {
        let graph = open_grid(3, 4, &[]);
        let field = graph.distance_field(Tile::new(1, 2), |_, _| true);

        assert_eq!(field.distance(Tile::new(1, 2)), Some(0));
        assert_eq!(field.distance(Tile::new(1, 1)), Some(1));
        assert_eq!(field.distance(Tile::new(1, 0)), Some(2));
        assert_eq!(field.distance(Tile::new(0, 0)), Some(3));
        assert_eq!(field.distance(Tile::new(-1, 0)), None);
    }

    #[test]
    fn distance_field_respects_walls() {
        let wall = Tile::new(1, 1);
        let graph = open_grid(3, 4, &[wall]);
        let field = graph.distance_field(Tile::new(1, 2), |_, _| true);

        assert_eq!(field.distance(wall), None);
        assert_eq!(field.distance(Tile::new(1, 0)), Some(4));
        assert_eq!(field.distance(Tile::new(0, 1)), Some(2));
    }

    #[test]
    fn shortest_path_detours_around_walls() {
        let graph = open_grid(3, 3, &[Tile::new(1, 0), Tile::new(1, 1)]);
        let path = graph.shortest_path(Tile::new(0, 0), Tile::new(2, 0), |_, _| true);

        assert_eq!(path.first(), Some(&Tile::new(0, 0)));
        assert_eq!(path.last(), Some(&Tile::new(2, 0)));
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            assert!(graph.has_edge(pair[0], pair[1]));
        }
    }

    #[test]
    fn shortest_path_is_empty_when_unreachable() {
        let graph = open_grid(3, 1, &[Tile::new(1, 0)]);
        assert!(graph
            .shortest_path(Tile::new(0, 0), Tile::new(2, 0), |_, _| true)
            .is_empty());
        assert!(graph
            .shortest_path(Tile::new(0, 0), Tile::new(5, 0), |_, _| true)
            .is_empty());
    }

    #[test]
    fn shortest_path_honours_edge_filter() {
        let graph = open_grid(3, 2, &[]);
        let blocked = Tile::new(1, 0);
        let path = graph.shortest_path(Tile::new(0, 0), Tile::new(2, 0), |_, to| to != blocked);

        assert_eq!(path.len(), 5);
        assert!(!path.contains(&blocked));
    }

    #[test]
    fn direction_fails_for_non_adjacent_tiles() {
        let graph = open_grid(3, 3, &[]);
        assert_eq!(
            graph.direction(Tile::new(0, 0), Tile::new(1, 0)),
            Ok(Direction::Right)
        );
        assert_eq!(
            graph.direction(Tile::new(0, 0), Tile::new(2, 2)),
            Err(WorldError::NotAdjacent {
                from: Tile::new(0, 0),
                to: Tile::new(2, 2),
            })
        );
    }

    #[test]
    fn neighbors_follow_direction_priority() {
        let graph = open_grid(3, 3, &[]);
        let neighbors: Vec<_> = graph.neighbors(Tile::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Tile::new(1, 0),
                Tile::new(0, 1),
                Tile::new(1, 2),
                Tile::new(2, 1)
            ]
        );
    }
}
