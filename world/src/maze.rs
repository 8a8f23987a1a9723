//! Parser for the ASCII maze definition format.
//!
//! One line of text describes one maze row. The recognised characters are:
//!
//! | Char | Meaning |
//! |------|---------|
//! | `#` | wall |
//! | ` ` | open tile without food |
//! | `.` | pellet |
//! | `*` | energizer |
//! | `-` | house door |
//! | `t` | tunnel tile |
//! | `P` | Pac-Man start |
//! | `B` | Blinky's seat, the house entry tile directly above a door |
//! | `p` `i` `c` | Pinky, Inky and Clyde beds inside the house |
//! | `$` | bonus tile (optional) |

use std::collections::{BTreeSet, VecDeque};

use maze_chase_core::{Direction, FoodKind, GhostId, Tile};

use crate::{navigation::TileContent, Bed, Door, House, Portal, TileGraph};

/// The classic 28x31 arcade maze.
pub const CLASSIC_MAZE: &str = concat!(
    "############################\n",
    "#............##............#\n",
    "#.####.#####.##.#####.####.#\n",
    "#*####.#####.##.#####.####*#\n",
    "#.####.#####.##.#####.####.#\n",
    "#..........................#\n",
    "#.####.##.########.##.####.#\n",
    "#.####.##.########.##.####.#\n",
    "#......##....##....##......#\n",
    "######.##### ## #####.######\n",
    "######.##### ## #####.######\n",
    "######.##    B     ##.######\n",
    "######.## ###--### ##.######\n",
    "######.## #      # ##.######\n",
    "tttttt.   #i p c #   .tttttt\n",
    "######.## #      # ##.######\n",
    "######.## ######## ##.######\n",
    "######.##    $     ##.######\n",
    "######.## ######## ##.######\n",
    "######.## ######## ##.######\n",
    "#............##............#\n",
    "#.####.#####.##.#####.####.#\n",
    "#.####.#####.##.#####.####.#\n",
    "#*..##.......P .......##..*#\n",
    "###.##.##.########.##.##.###\n",
    "###.##.##.########.##.##.###\n",
    "#......##....##....##......#\n",
    "#.##########.##.##########.#\n",
    "#.##########.##.##########.#\n",
    "#..........................#\n",
    "############################\n",
);

const MIN_SIDE: usize = 3;

/// Reasons a maze definition is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// The text contained no rows.
    #[error("maze definition is empty")]
    Empty,
    /// The grid is smaller than 3x3.
    #[error("maze must be at least 3x3 tiles, found {columns}x{rows}")]
    TooSmall {
        /// Columns found.
        columns: usize,
        /// Rows found.
        rows: usize,
    },
    /// A row's length differs from the first row's length.
    #[error("maze row {row} has {found} columns, expected {expected}")]
    NonRectangular {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A character with no assigned meaning was found.
    #[error("unknown maze character {character:?} at column {column}, row {row}")]
    UnknownCharacter {
        /// The offending character.
        character: char,
        /// Zero-based column.
        column: usize,
        /// Zero-based row.
        row: usize,
    },
    /// A mandatory marker does not appear in the maze.
    #[error("maze is missing the {meaning} marker {marker:?}")]
    MissingMarker {
        /// Marker character.
        marker: char,
        /// What the marker denotes.
        meaning: &'static str,
    },
    /// A unique marker appears more than once.
    #[error("maze marker {marker:?} appears at {first:?} and again at {second:?}")]
    DuplicateMarker {
        /// Marker character.
        marker: char,
        /// First occurrence.
        first: Tile,
        /// Second occurrence.
        second: Tile,
    },
    /// Blinky's seat is not directly above a house door.
    #[error("house entry {entry:?} is not directly above a door")]
    EntryNotAboveDoor {
        /// Tile holding the `B` marker.
        entry: Tile,
    },
    /// The house interior leaks into the rest of the maze.
    #[error("house interior is not enclosed; it reaches {tile:?}")]
    HouseNotEnclosed {
        /// First tile found outside the house.
        tile: Tile,
    },
    /// A bed marker lies outside the house interior.
    #[error("bed of {ghost:?} at {tile:?} lies outside the house")]
    BedOutsideHouse {
        /// Owner of the bed.
        ghost: GhostId,
        /// Tile holding the bed marker.
        tile: Tile,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Wall,
    Space,
    Pellet,
    Energizer,
    Door,
    Tunnel,
    PacMan,
    Bed(GhostId),
    Bonus,
}

impl Cell {
    fn parse(character: char) -> Option<Self> {
        Some(match character {
            '#' => Self::Wall,
            ' ' => Self::Space,
            '.' => Self::Pellet,
            '*' => Self::Energizer,
            '-' => Self::Door,
            't' => Self::Tunnel,
            'P' => Self::PacMan,
            'B' => Self::Bed(GhostId::Blinky),
            'p' => Self::Bed(GhostId::Pinky),
            'i' => Self::Bed(GhostId::Inky),
            'c' => Self::Bed(GhostId::Clyde),
            '$' => Self::Bonus,
            _ => return None,
        })
    }

    fn content(self) -> TileContent {
        match self {
            Self::Wall => TileContent::Wall,
            Self::Door => TileContent::Door,
            Self::Tunnel => TileContent::Tunnel,
            _ => TileContent::Space,
        }
    }

    fn food(self) -> Option<FoodKind> {
        match self {
            Self::Pellet => Some(FoodKind::Pellet),
            Self::Energizer => Some(FoodKind::Energizer),
            _ => None,
        }
    }

    fn is_open_house_tile(self) -> bool {
        matches!(self, Self::Space | Self::Bed(_))
    }
}

/// Everything derived from a maze definition.
#[derive(Debug)]
pub(crate) struct Blueprint {
    pub(crate) graph: TileGraph,
    pub(crate) food: Vec<Option<FoodKind>>,
    pub(crate) house: House,
    pub(crate) portals: Vec<Portal>,
    pub(crate) pacman_start: Tile,
    pub(crate) bonus: Option<Tile>,
}

pub(crate) fn parse(text: &str) -> Result<Blueprint, MazeError> {
    let mut lines: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        let _ = lines.pop();
    }
    if lines.is_empty() {
        return Err(MazeError::Empty);
    }

    let columns = lines[0].chars().count();
    let rows = lines.len();
    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != columns {
            return Err(MazeError::NonRectangular {
                row,
                expected: columns,
                found,
            });
        }
    }
    if columns < MIN_SIDE || rows < MIN_SIDE {
        return Err(MazeError::TooSmall { columns, rows });
    }

    let mut cells = Vec::with_capacity(columns * rows);
    for (row, line) in lines.iter().enumerate() {
        for (column, character) in line.chars().enumerate() {
            let cell = Cell::parse(character).ok_or(MazeError::UnknownCharacter {
                character,
                column,
                row,
            })?;
            cells.push(cell);
        }
    }

    let grid = CellGrid {
        columns,
        rows,
        cells,
    };

    let pacman_start = grid
        .unique(Cell::PacMan, 'P')?
        .ok_or(MazeError::MissingMarker {
            marker: 'P',
            meaning: "Pac-Man start",
        })?;
    let bonus = grid.unique(Cell::Bonus, '$')?;
    let mut bed_tiles = [Tile::new(0, 0); 4];
    for ghost in GhostId::ALL {
        let (marker, meaning) = bed_marker(ghost);
        bed_tiles[ghost.index()] =
            grid.unique(Cell::Bed(ghost), marker)?
                .ok_or(MazeError::MissingMarker { marker, meaning })?;
    }

    let entry = bed_tiles[GhostId::Blinky.index()];
    if grid.cell(entry.neighbor(Direction::Down)) != Some(Cell::Door) {
        return Err(MazeError::EntryNotAboveDoor { entry });
    }

    let interior = grid.flood_house(entry.towards(Direction::Down, 2))?;
    for ghost in [GhostId::Pinky, GhostId::Inky, GhostId::Clyde] {
        let tile = bed_tiles[ghost.index()];
        if !interior.contains(&tile) {
            return Err(MazeError::BedOutsideHouse { ghost, tile });
        }
    }

    let doors = grid
        .tiles()
        .filter(|tile| grid.cell(*tile) == Some(Cell::Door))
        .enumerate()
        .map(|(index, tile)| Door::new(index as u32, tile))
        .collect();

    let beds = GhostId::ALL.map(|ghost| Bed::new(ghost, bed_tiles[ghost.index()], bed_facing(ghost)));
    let house = House::new(entry, doors, interior.into_iter().collect(), beds);
    let portals = grid.portals();

    let graph = TileGraph::new(
        columns as u32,
        rows as u32,
        grid.cells.iter().map(|cell| cell.content()).collect(),
    );
    let food = grid.cells.iter().map(|cell| cell.food()).collect();

    Ok(Blueprint {
        graph,
        food,
        house,
        portals,
        pacman_start,
        bonus,
    })
}

const fn bed_marker(ghost: GhostId) -> (char, &'static str) {
    match ghost {
        GhostId::Blinky => ('B', "house entry"),
        GhostId::Pinky => ('p', "Pinky bed"),
        GhostId::Inky => ('i', "Inky bed"),
        GhostId::Clyde => ('c', "Clyde bed"),
    }
}

const fn bed_facing(ghost: GhostId) -> Direction {
    match ghost {
        GhostId::Blinky => Direction::Left,
        GhostId::Pinky => Direction::Down,
        GhostId::Inky | GhostId::Clyde => Direction::Up,
    }
}

struct CellGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    fn cell(&self, tile: Tile) -> Option<Cell> {
        let column = usize::try_from(tile.column()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| Tile::new(column as i32, row as i32))
        })
    }

    fn unique(&self, wanted: Cell, marker: char) -> Result<Option<Tile>, MazeError> {
        let mut found: Option<Tile> = None;
        for tile in self.tiles() {
            if self.cell(tile) != Some(wanted) {
                continue;
            }
            if let Some(first) = found {
                return Err(MazeError::DuplicateMarker {
                    marker,
                    first,
                    second: tile,
                });
            }
            found = Some(tile);
        }
        Ok(found)
    }

    fn is_border(&self, tile: Tile) -> bool {
        tile.column() == 0
            || tile.row() == 0
            || tile.column() as usize == self.columns - 1
            || tile.row() as usize == self.rows - 1
    }

    fn flood_house(&self, start: Tile) -> Result<BTreeSet<Tile>, MazeError> {
        let mut interior = BTreeSet::new();
        let mut queue = VecDeque::new();
        match self.cell(start) {
            Some(cell) if cell.is_open_house_tile() => queue.push_back(start),
            _ => return Err(MazeError::HouseNotEnclosed { tile: start }),
        }

        while let Some(tile) = queue.pop_front() {
            if !interior.insert(tile) {
                continue;
            }
            if self.is_border(tile) {
                return Err(MazeError::HouseNotEnclosed { tile });
            }
            for direction in Direction::PRIORITY {
                let neighbor = tile.neighbor(direction);
                match self.cell(neighbor) {
                    Some(Cell::Wall | Cell::Door) | None => {}
                    Some(Cell::Bed(GhostId::Blinky)) => {
                        return Err(MazeError::HouseNotEnclosed { tile: neighbor })
                    }
                    Some(cell) if cell.is_open_house_tile() => {
                        if !interior.contains(&neighbor) {
                            queue.push_back(neighbor);
                        }
                    }
                    Some(_) => return Err(MazeError::HouseNotEnclosed { tile: neighbor }),
                }
            }
        }

        Ok(interior)
    }

    fn portals(&self) -> Vec<Portal> {
        let width = self.columns as i32;
        let height = self.rows as i32;
        let open = |tile: Tile| !matches!(self.cell(tile), Some(Cell::Wall) | None);

        let mut portals = Vec::new();
        for row in 0..height {
            if open(Tile::new(0, row)) && open(Tile::new(width - 1, row)) {
                portals.push(Portal::new(Tile::new(-1, row), Tile::new(width, row)));
            }
        }
        for column in 0..width {
            if open(Tile::new(column, 0)) && open(Tile::new(column, height - 1)) {
                portals.push(Portal::new(Tile::new(column, -1), Tile::new(column, height)));
            }
        }
        portals
    }
}
