//! Read-only view of the simulation for presentation collaborators.

use maze_chase_core::{ActorId, AttackPhase, Direction, DoorId, Tile};
use maze_chase_system_fsm::Timer;
use maze_chase_system_movement::Point;
use serde::Serialize;

/// Remaining time of an agent's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimerView {
    /// The state has no time limit.
    Unbounded,
    /// The state ends after `remaining` more ticks.
    Remaining {
        /// Ticks left.
        remaining: u32,
        /// Ticks the state was entered with.
        total: u32,
    },
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        match timer {
            Timer::Unbounded => Self::Unbounded,
            Timer::Running { total, remaining } => Self::Remaining { remaining, total },
        }
    }
}

/// Observable state of one agent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorSnapshot {
    /// Agent described.
    pub actor: ActorId,
    /// Tile the agent belongs to.
    pub tile: Tile,
    /// Pixel offset from the tile's alignment point.
    pub offset: Point,
    /// Direction of motion.
    pub move_dir: Direction,
    /// Direction the agent takes at its next decision point.
    pub wish_dir: Direction,
    /// Name of the active state.
    pub state: &'static str,
    /// Timer of the active state.
    pub timer: TimerView,
    /// Tile the agent pursues, when it has one.
    pub target: Option<Tile>,
    /// Tiles the agent plans to visit.
    pub route: Vec<Tile>,
}

/// Open state of a house door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DoorView {
    /// Door described.
    pub door: DoorId,
    /// Tile of the door.
    pub tile: Tile,
    /// Whether the door is open.
    pub open: bool,
}

/// Everything a renderer or HUD needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Ticks the world has advanced.
    pub tick: u64,
    /// Current level.
    pub level: u32,
    /// Score so far.
    pub score: u32,
    /// Lives left.
    pub lives: u32,
    /// Food items left in the maze.
    pub remaining_food: u32,
    /// Food items the maze holds at the start of a level.
    pub total_food: u32,
    /// Phase of the attack schedule.
    pub phase: AttackPhase,
    /// Ticks of power left, zero without power.
    pub power_ticks: u32,
    /// Pac-Man first, then the ghosts in house-release order.
    pub actors: Vec<ActorSnapshot>,
    /// Every house door.
    pub doors: Vec<DoorView>,
}
