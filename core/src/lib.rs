#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze chase engine.
//!
//! This crate defines the message surface that connects the maze world, the
//! agent systems and adapters. The simulation submits [`Command`] values
//! describing desired world mutations, the world executes them via its `apply`
//! entry point and broadcasts [`Event`] values. Events are queued for one tick
//! and then handed to every agent state machine, which pattern-matches on the
//! variants it cares about.

use serde::{Deserialize, Serialize};

/// Side length of a single square tile measured in pixels.
pub const TILE_SIZE: f32 = 8.0;

/// Number of simulation ticks that make up one second of game time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Distance in pixels that an agent running at 100% speed covers per tick.
pub const BASE_SPEED: f32 = 1.25;

/// Converts a duration in seconds into a whole number of simulation ticks.
#[must_use]
pub fn ticks_from_secs(seconds: f32) -> u32 {
    if seconds <= 0.0 {
        return 0;
    }
    (seconds * TICKS_PER_SECOND as f32).round() as u32
}

/// Cardinal movement directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Universal tie-break order used whenever two directions score equally.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Direction reached by a quarter turn counter-clockwise.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Direction reached by a quarter turn clockwise.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Reports whether the direction runs along the row axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Position of the direction within [`Direction::PRIORITY`].
    #[must_use]
    pub const fn priority(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Down => 2,
            Self::Right => 3,
        }
    }
}

/// Location of a single maze tile expressed as column and row coordinates.
///
/// Coordinates are signed: tiles just beyond the grid edge are legal values
/// used while an agent passes through a portal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    column: i32,
    row: i32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Adjacent tile in the provided direction. No bounds are checked.
    #[must_use]
    pub const fn neighbor(self, direction: Direction) -> Self {
        self.towards(direction, 1)
    }

    /// Tile reached after `steps` steps in the provided direction.
    #[must_use]
    pub const fn towards(self, direction: Direction, steps: i32) -> Self {
        let (dc, dr) = direction.delta();
        Self::new(self.column + dc * steps, self.row + dr * steps)
    }

    /// Squared Euclidean distance between two tiles.
    #[must_use]
    pub fn euclidean_distance_sq(self, other: Tile) -> i64 {
        let dc = i64::from(self.column) - i64::from(other.column);
        let dr = i64::from(self.row) - i64::from(other.row);
        dc * dc + dr * dr
    }

    /// Euclidean distance between two tiles measured in tiles.
    #[must_use]
    pub fn euclidean_distance(self, other: Tile) -> f32 {
        (self.euclidean_distance_sq(other) as f32).sqrt()
    }

    /// Computes the Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan_distance(self, other: Tile) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Reports whether `other` lies between one and `steps` tiles ahead of
    /// this tile along `direction`.
    #[must_use]
    pub fn is_ahead_within(self, other: Tile, direction: Direction, steps: u32) -> bool {
        let (dc, dr) = direction.delta();
        let along = (other.column - self.column) * dc + (other.row - self.row) * dr;
        let across = if direction.is_horizontal() {
            other.row - self.row
        } else {
            other.column - self.column
        };
        across == 0 && along >= 1 && along.unsigned_abs() <= steps
    }

    /// Direction leading from this tile to an adjacent tile.
    ///
    /// Returns `None` when the tiles are not 4-adjacent.
    #[must_use]
    pub fn direction_to(self, other: Tile) -> Option<Direction> {
        match (other.column - self.column, other.row - self.row) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The four adversarial agents, in house-release precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GhostId {
    /// The red ghost; never held in the house.
    Blinky,
    /// The pink ghost.
    Pinky,
    /// The cyan ghost.
    Inky,
    /// The orange ghost.
    Clyde,
}

impl GhostId {
    /// Every ghost ordered by house-release precedence.
    pub const ALL: [GhostId; 4] = [
        GhostId::Blinky,
        GhostId::Pinky,
        GhostId::Inky,
        GhostId::Clyde,
    ];

    /// Dense index of the ghost, suitable for per-ghost arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Blinky => 0,
            Self::Pinky => 1,
            Self::Inky => 2,
            Self::Clyde => 3,
        }
    }

    /// Value of the global dot counter at which the ghost may leave the house.
    #[must_use]
    pub const fn global_dot_limit(self) -> u32 {
        match self {
            Self::Blinky => 0,
            Self::Pinky => 7,
            Self::Inky => 17,
            Self::Clyde => 32,
        }
    }
}

/// Identifies any agent in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorId {
    /// The player-controlled agent.
    PacMan,
    /// One of the four adversarial agents.
    Ghost(GhostId),
}

/// Identifier of a house door tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorId(u32);

impl DoorId {
    /// Creates a new door identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of food that can lie on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Regular pellet.
    Pellet,
    /// Power pellet that frightens the ghosts.
    Energizer,
}

impl FoodKind {
    /// Score awarded for eating the food.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Pellet => 10,
            Self::Energizer => 50,
        }
    }
}

/// Symbol shown for the bonus fruit of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusSymbol {
    /// Level 1.
    Cherries,
    /// Level 2.
    Strawberry,
    /// Levels 3 and 4.
    Peach,
    /// Levels 5 and 6.
    Apple,
    /// Levels 7 and 8.
    Grapes,
    /// Levels 9 and 10.
    Galaxian,
    /// Levels 11 and 12.
    Bell,
    /// Level 13 onward.
    Key,
}

/// Raw direction signals of the input device steering the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputState {
    /// Up is asserted.
    pub up: bool,
    /// Down is asserted.
    pub down: bool,
    /// Left is asserted.
    pub left: bool,
    /// Right is asserted.
    pub right: bool,
}

impl InputState {
    /// Input with exactly one direction asserted.
    #[must_use]
    pub const fn pressing(direction: Direction) -> Self {
        Self {
            up: matches!(direction, Direction::Up),
            down: matches!(direction, Direction::Down),
            left: matches!(direction, Direction::Left),
            right: matches!(direction, Direction::Right),
        }
    }

    /// Reports whether the signal mapped to `direction` is asserted.
    #[must_use]
    pub const fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the world clock by one tick.
    Tick,
    /// Removes the food lying on the tile, if any.
    ConsumeFood {
        /// Tile whose food is eaten.
        tile: Tile,
    },
    /// Places food back on every tile that started with food.
    RestoreFood,
    /// Opens or closes a house door.
    SetDoor {
        /// Door whose state changes.
        door: DoorId,
        /// Whether the door should be open.
        open: bool,
    },
    /// Shows the bonus on its tile for a limited number of ticks.
    ActivateBonus {
        /// Symbol displayed while the bonus is active.
        symbol: BonusSymbol,
        /// Points awarded when the bonus is eaten.
        value: u32,
        /// Number of ticks the bonus stays available.
        ticks: u32,
    },
    /// Eats the bonus if it is currently active.
    ConsumeBonus,
    /// Removes the bonus without awarding it.
    ClearBonus,
}

/// Events broadcast by the world and the simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new level started.
    LevelStarted {
        /// Number of the level, starting at 1.
        level: u32,
    },
    /// A food item was eaten.
    FoodEaten {
        /// Tile the food was removed from.
        tile: Tile,
        /// Kind of food that was eaten.
        kind: FoodKind,
        /// Food items still present in the maze.
        remaining: u32,
    },
    /// Pac-Man ate an energizer and can now eat ghosts.
    PacManGainsPower,
    /// Pac-Man's power ran out.
    PacManLostPower,
    /// Pac-Man ate a frightened ghost.
    GhostKilled {
        /// Ghost that was eaten.
        ghost: GhostId,
        /// Points awarded for the kill.
        bounty: u32,
    },
    /// A ghost caught Pac-Man.
    PacManKilled {
        /// Ghost that caught Pac-Man.
        by: GhostId,
    },
    /// Pac-Man's dying sequence ended and a life was deducted.
    LifeLost {
        /// Lives remaining after the deduction.
        lives: u32,
    },
    /// The door controller allowed a ghost to leave the house.
    GhostReleased {
        /// Ghost that may leave.
        ghost: GhostId,
    },
    /// A house door opened.
    DoorOpened {
        /// Door that opened.
        door: DoorId,
    },
    /// A house door closed.
    DoorClosed {
        /// Door that closed.
        door: DoorId,
    },
    /// The bonus appeared on its tile.
    BonusActivated {
        /// Tile holding the bonus.
        tile: Tile,
        /// Symbol of the bonus.
        symbol: BonusSymbol,
        /// Points awarded when eaten.
        value: u32,
    },
    /// Pac-Man ate the bonus.
    BonusEaten {
        /// Points awarded.
        value: u32,
    },
    /// The bonus disappeared without being eaten.
    BonusExpired,
    /// The last food item of the level was eaten.
    LevelCompleted {
        /// Number of the completed level.
        level: u32,
    },
}

/// Phase of the global scatter/chase schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Ghosts head for their home corners.
    Scatter,
    /// Ghosts pursue their personal chase targets.
    Chase,
}

/// One entry of the scatter/chase schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackWave {
    /// Phase active during the wave.
    pub phase: AttackPhase,
    /// Duration in ticks, `None` for a wave that never ends.
    pub ticks: Option<u32>,
}

/// Per-level tuning record supplied to the core.
///
/// Speeds are fractions of [`BASE_SPEED`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Number of the level, starting at 1.
    pub level: u32,
    /// Bonus fruit of the level.
    pub bonus_symbol: BonusSymbol,
    /// Points awarded for the bonus.
    pub bonus_value: u32,
    /// Pac-Man speed without power.
    pub pacman_speed: f32,
    /// Pac-Man speed while powered.
    pub pacman_power_speed: f32,
    /// Ghost speed outside tunnels.
    pub ghost_speed: f32,
    /// Ghost speed on tunnel tiles.
    pub ghost_tunnel_speed: f32,
    /// Ghost speed while frightened.
    pub ghost_frightened_speed: f32,
    /// Remaining food at which Blinky enters the first Elroy stage.
    pub elroy1_dots_left: u32,
    /// Blinky speed during the first Elroy stage.
    pub elroy1_speed: f32,
    /// Remaining food at which Blinky enters the second Elroy stage.
    pub elroy2_dots_left: u32,
    /// Blinky speed during the second Elroy stage.
    pub elroy2_speed: f32,
    /// Seconds for which ghosts stay frightened.
    pub frightened_secs: f32,
    /// Number of flashes before frightened ghosts recover.
    pub flashes: u32,
}

impl LevelParams {
    /// Returns the arcade tuning of the provided level. Levels past the end of
    /// the table repeat the last entry; level 0 is treated as level 1.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let index = usize::try_from(level - 1)
            .unwrap_or(usize::MAX)
            .min(LEVEL_TABLE.len() - 1);
        let row = &LEVEL_TABLE[index];
        Self {
            level,
            bonus_symbol: row.0,
            bonus_value: row.1,
            pacman_speed: percent(row.2),
            ghost_speed: percent(row.3),
            ghost_tunnel_speed: percent(row.4),
            elroy1_dots_left: row.5,
            elroy1_speed: percent(row.6),
            elroy2_dots_left: row.7,
            elroy2_speed: percent(row.8),
            pacman_power_speed: percent(row.9),
            ghost_frightened_speed: percent(row.10),
            frightened_secs: row.11,
            flashes: row.12,
        }
    }

    /// Ticks for which ghosts stay frightened after an energizer.
    #[must_use]
    pub fn frightened_ticks(&self) -> u32 {
        ticks_from_secs(self.frightened_secs)
    }

    /// Ticks without food after which the next locked ghost is forced out.
    #[must_use]
    pub fn starvation_limit(&self) -> u32 {
        if self.level < 5 {
            ticks_from_secs(4.0)
        } else {
            ticks_from_secs(3.0)
        }
    }

    /// Personal dot counter value at which the ghost may leave the house.
    #[must_use]
    pub const fn personal_dot_limit(&self, ghost: GhostId) -> u32 {
        match (ghost, self.level) {
            (GhostId::Inky, 1) => 30,
            (GhostId::Clyde, 1) => 60,
            (GhostId::Clyde, 2) => 50,
            _ => 0,
        }
    }

    /// Scatter/chase schedule of the level.
    #[must_use]
    pub fn attack_waves(&self) -> [AttackWave; 8] {
        let secs: [f32; 7] = match self.level {
            1 => [7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0],
            2..=4 => [7.0, 20.0, 7.0, 20.0, 5.0, 1033.0, 1.0 / 60.0],
            _ => [5.0, 20.0, 5.0, 20.0, 5.0, 1037.0, 1.0 / 60.0],
        };
        let mut waves = [AttackWave {
            phase: AttackPhase::Chase,
            ticks: None,
        }; 8];
        for (index, seconds) in secs.iter().enumerate() {
            waves[index] = AttackWave {
                phase: if index % 2 == 0 {
                    AttackPhase::Scatter
                } else {
                    AttackPhase::Chase
                },
                ticks: Some(ticks_from_secs(*seconds).max(1)),
            };
        }
        waves
    }
}

fn percent(value: u32) -> f32 {
    value as f32 / 100.0
}

type LevelRow = (
    BonusSymbol,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    u32,
    f32,
    u32,
);

// symbol, value, pac, ghost, tunnel, elroy1 dots, elroy1 %, elroy2 dots,
// elroy2 %, pac power, ghost frightened, frightened secs, flashes
const LEVEL_TABLE: [LevelRow; 21] = [
    (BonusSymbol::Cherries, 100, 80, 75, 40, 20, 80, 10, 85, 90, 50, 6.0, 5),
    (BonusSymbol::Strawberry, 300, 90, 85, 45, 30, 90, 15, 95, 95, 55, 5.0, 5),
    (BonusSymbol::Peach, 500, 90, 85, 45, 40, 90, 20, 95, 95, 55, 4.0, 5),
    (BonusSymbol::Peach, 500, 90, 85, 45, 40, 90, 20, 95, 95, 55, 3.0, 5),
    (BonusSymbol::Apple, 700, 100, 95, 50, 40, 100, 20, 105, 100, 60, 2.0, 5),
    (BonusSymbol::Apple, 700, 100, 95, 50, 50, 100, 25, 105, 100, 60, 5.0, 5),
    (BonusSymbol::Grapes, 1000, 100, 95, 50, 50, 100, 25, 105, 100, 60, 2.0, 5),
    (BonusSymbol::Grapes, 1000, 100, 95, 50, 50, 100, 25, 105, 100, 60, 2.0, 5),
    (BonusSymbol::Galaxian, 2000, 100, 95, 50, 60, 100, 30, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Galaxian, 2000, 100, 95, 50, 60, 100, 30, 105, 100, 60, 5.0, 5),
    (BonusSymbol::Bell, 3000, 100, 95, 50, 60, 100, 30, 105, 100, 60, 2.0, 5),
    (BonusSymbol::Bell, 3000, 100, 95, 50, 80, 100, 40, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Key, 5000, 100, 95, 50, 80, 100, 40, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Key, 5000, 100, 95, 50, 80, 100, 40, 105, 100, 60, 3.0, 5),
    (BonusSymbol::Key, 5000, 100, 95, 50, 100, 100, 50, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Key, 5000, 100, 95, 50, 100, 100, 50, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Key, 5000, 100, 95, 50, 100, 100, 50, 105, 100, 60, 0.0, 0),
    (BonusSymbol::Key, 5000, 100, 95, 50, 100, 100, 50, 105, 100, 60, 1.0, 3),
    (BonusSymbol::Key, 5000, 100, 95, 50, 120, 100, 60, 105, 100, 60, 0.0, 0),
    (BonusSymbol::Key, 5000, 100, 95, 50, 120, 100, 60, 105, 100, 60, 0.0, 0),
    (BonusSymbol::Key, 5000, 90, 95, 50, 120, 100, 60, 105, 90, 60, 0.0, 0),
];
