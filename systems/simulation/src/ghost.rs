//! Ghost state table and per-ghost bookkeeping.

use maze_chase_core::{AttackPhase, Event, GhostId, Tile};
use maze_chase_system_fsm::{FsmError, StateMachine, Ticks};
use maze_chase_system_movement::Mover;
use maze_chase_system_steering::{
    HouseEntry, HouseExit, PathFollower, RandomWalker, Steering, TargetPursuit,
};
use maze_chase_world::Access;
use serde::Serialize;

use crate::GameConfig;

/// States a ghost moves through.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::EnumIter, strum::IntoStaticStr,
)]
pub enum GhostState {
    /// Waiting on its bed for the door controller.
    Locked,
    /// Gliding from inside the house to the tile above the door.
    LeavingHouse,
    /// Heading for its home corner.
    Scattering,
    /// Pursuing its personal chase target.
    Chasing,
    /// Wandering at random while Pac-Man has power.
    Frightened,
    /// Eaten; racing back to the house entry.
    Dead,
    /// Gliding from the house entry down to its revival bed.
    EnteringHouse,
}

impl GhostState {
    /// Tiles a ghost in this state may enter.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Locked | Self::LeavingHouse | Self::EnteringHouse => Access::ThroughDoors,
            Self::Scattering | Self::Chasing | Self::Frightened | Self::Dead => Access::Outside,
        }
    }

    /// Whether the ghost is inside or passing through the house.
    #[must_use]
    pub const fn is_in_house(self) -> bool {
        matches!(self, Self::Locked | Self::LeavingHouse | Self::EnteringHouse)
    }

    /// Whether touching Pac-Man kills him.
    #[must_use]
    pub const fn is_dangerous(self) -> bool {
        matches!(self, Self::Scattering | Self::Chasing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GhostAction {
    ForgetRoute,
}

/// What a ghost's transitions observe at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GhostView {
    pub(crate) ghost: GhostId,
    pub(crate) phase: AttackPhase,
    pub(crate) elroy: bool,
    pub(crate) powered: bool,
    pub(crate) frightened_ticks: u32,
    pub(crate) outside: bool,
    pub(crate) at_entry: bool,
    pub(crate) seated: bool,
}

impl GhostView {
    fn scatters(&self) -> bool {
        self.phase == AttackPhase::Scatter && !self.elroy
    }
}

pub(crate) type GhostMachine = StateMachine<GhostState, Event, GhostView, GhostAction, Steering>;

pub(crate) struct Ghost {
    pub(crate) id: GhostId,
    pub(crate) mover: Mover,
    pub(crate) machine: GhostMachine,
    pub(crate) target: Option<Tile>,
}

impl Ghost {
    pub(crate) fn state(&self) -> GhostState {
        self.machine.state()
    }
}

pub(crate) const fn name(ghost: GhostId) -> &'static str {
    match ghost {
        GhostId::Blinky => "Blinky",
        GhostId::Pinky => "Pinky",
        GhostId::Inky => "Inky",
        GhostId::Clyde => "Clyde",
    }
}

fn duration(state: GhostState, view: &GhostView) -> Ticks {
    match state {
        GhostState::Frightened => Ticks::Finite(view.frightened_ticks),
        _ => Ticks::Unbounded,
    }
}

fn released(view: &GhostView, event: &Event) -> bool {
    matches!(event, Event::GhostReleased { ghost } if *ghost == view.ghost)
}

fn frightens(_: &GhostView, event: &Event) -> bool {
    matches!(event, Event::PacManGainsPower)
}

fn killed(view: &GhostView, event: &Event) -> bool {
    matches!(event, Event::GhostKilled { ghost, .. } if *ghost == view.ghost)
}

fn leaves_to_scatter(view: &GhostView) -> bool {
    view.outside && view.scatters()
}

fn leaves_to_chase(view: &GhostView) -> bool {
    view.outside
}

fn starts_chasing(view: &GhostView) -> bool {
    !view.scatters()
}

fn calms_to_scatter(view: &GhostView) -> bool {
    !view.powered && view.scatters()
}

fn calms_to_chase(view: &GhostView) -> bool {
    !view.powered
}

fn reached_entry(view: &GhostView) -> bool {
    view.at_entry
}

fn seated(view: &GhostView) -> bool {
    view.seated
}

/// Builds the state table of `ghost`, starting locked.
pub(crate) fn machine(
    ghost: GhostId,
    config: &GameConfig,
    view: &GhostView,
) -> Result<GhostMachine, FsmError> {
    use GhostState::{
        Chasing, Dead, EnteringHouse, Frightened, LeavingHouse, Locked, Scattering,
    };

    let seed = config.seed.wrapping_add(ghost.index() as u64 + 1);
    StateMachine::builder(name(ghost), Locked)
        .duration(duration)
        .behavior(Locked, Steering::Idle)
        .behavior(LeavingHouse, Steering::LeaveHouse(HouseExit))
        .behavior(Scattering, Steering::Pursuit(TargetPursuit::new(config.route_preview)))
        .behavior(Chasing, Steering::Pursuit(TargetPursuit::new(config.route_preview)))
        .behavior(Frightened, Steering::RandomWalk(RandomWalker::new(seed)))
        .behavior(Dead, Steering::FollowPath(PathFollower::new()))
        .behavior(EnteringHouse, Steering::EnterHouse(HouseEntry))
        .on_event(Locked, LeavingHouse, released)
        .when(LeavingHouse, Scattering, leaves_to_scatter)
        .then(GhostAction::ForgetRoute)
        .when(LeavingHouse, Chasing, leaves_to_chase)
        .then(GhostAction::ForgetRoute)
        .on_event(Scattering, Frightened, frightens)
        .on_event(Chasing, Frightened, frightens)
        .when(Scattering, Chasing, starts_chasing)
        .when(Chasing, Scattering, GhostView::scatters)
        .on_event(Frightened, Dead, killed)
        .then(GhostAction::ForgetRoute)
        .on_event(Frightened, Frightened, frightens)
        .when(Frightened, Scattering, calms_to_scatter)
        .when(Frightened, Chasing, calms_to_chase)
        .on_timeout(Frightened, Chasing)
        .when(Dead, EnteringHouse, reached_entry)
        .when(EnteringHouse, LeavingHouse, seated)
        .build(view)
}
