#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ghost house door controller deciding when locked ghosts may leave.
//!
//! The controller tracks three counters: a global dot counter that is only
//! enabled after a life was lost, one personal dot counter per ghost, and
//! the number of ticks since Pac-Man last ate. Each tick it considers the
//! most preferred locked ghost and releases it when one of the applicable
//! limits is met.

use maze_chase_core::{Command, GhostId, LevelParams, Tile};
use maze_chase_world::{query, World};

/// Why a ghost was allowed to leave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReleaseReason {
    /// Blinky is never held.
    NeverHeld,
    /// Pac-Man went too long without eating.
    Starvation,
    /// The global dot counter reached the ghost's limit.
    GlobalCounter,
    /// The ghost's personal dot counter reached its limit.
    PersonalCounter,
}

/// A release decided by [`DoorController::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Release {
    /// Ghost that may leave.
    pub ghost: GhostId,
    /// Rule that released it.
    pub reason: ReleaseReason,
}

/// Dot-counter scheduler for the ghost house.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoorController {
    global_enabled: bool,
    global_counter: u32,
    personal: [u32; 4],
    personal_limits: [u32; 4],
    starvation_ticks: u32,
    starvation_limit: u32,
}

impl DoorController {
    /// Creates a controller configured for the level.
    #[must_use]
    pub fn new(params: &LevelParams) -> Self {
        let mut controller = Self {
            global_enabled: false,
            global_counter: 0,
            personal: [0; 4],
            personal_limits: [0; 4],
            starvation_ticks: 0,
            starvation_limit: 0,
        };
        controller.start_level(params);
        controller
    }

    /// Clears every counter for a new level and adopts its limits.
    pub fn start_level(&mut self, params: &LevelParams) {
        self.global_enabled = false;
        self.global_counter = 0;
        self.personal = [0; 4];
        self.personal_limits = GhostId::ALL.map(|ghost| params.personal_dot_limit(ghost));
        self.starvation_ticks = 0;
        self.starvation_limit = params.starvation_limit();
    }

    /// Enables and clears the global counter after Pac-Man lost a life.
    pub fn life_lost(&mut self) {
        self.global_enabled = true;
        self.global_counter = 0;
        self.starvation_ticks = 0;
    }

    /// Value of the global counter, `None` while it is disabled.
    #[must_use]
    pub const fn global_counter(&self) -> Option<u32> {
        if self.global_enabled {
            Some(self.global_counter)
        } else {
            None
        }
    }

    /// Personal dot counter of the ghost.
    #[must_use]
    pub const fn personal_counter(&self, ghost: GhostId) -> u32 {
        self.personal[ghost.index()]
    }

    /// Ticks since food was last eaten.
    #[must_use]
    pub const fn starvation_ticks(&self) -> u32 {
        self.starvation_ticks
    }

    /// Accounts for the food eaten since the previous update and decides
    /// which locked ghost, if any, may leave.
    ///
    /// `locked` lists the ghosts currently held in the house.
    pub fn update(&mut self, food_eaten: u32, locked: &[GhostId]) -> Option<Release> {
        let preferred = GhostId::ALL
            .into_iter()
            .find(|ghost| locked.contains(ghost));

        if food_eaten == 0 {
            self.starvation_ticks = self.starvation_ticks.saturating_add(1);
        } else {
            self.starvation_ticks = 0;
            if self.global_enabled {
                self.global_counter = self.global_counter.saturating_add(food_eaten);
            } else if let Some(ghost) = preferred {
                let counter = &mut self.personal[ghost.index()];
                *counter = counter.saturating_add(food_eaten);
            }
        }

        let clyde_limit = GhostId::Clyde.global_dot_limit();
        if self.global_enabled
            && self.global_counter >= clyde_limit
            && locked.contains(&GhostId::Clyde)
            && preferred != Some(GhostId::Clyde)
        {
            tracing::debug!("global dot counter disabled with Clyde still locked");
            self.global_enabled = false;
            self.global_counter = 0;
        }

        let ghost = preferred?;
        let reason = self.release_reason(ghost)?;
        match reason {
            ReleaseReason::Starvation => self.starvation_ticks = 0,
            ReleaseReason::GlobalCounter if ghost == GhostId::Clyde => {
                self.global_enabled = false;
                self.global_counter = 0;
            }
            _ => {}
        }
        tracing::debug!(?ghost, ?reason, "ghost released");
        Some(Release { ghost, reason })
    }

    fn release_reason(&self, ghost: GhostId) -> Option<ReleaseReason> {
        if ghost == GhostId::Blinky {
            return Some(ReleaseReason::NeverHeld);
        }
        if self.starvation_ticks > self.starvation_limit {
            return Some(ReleaseReason::Starvation);
        }
        if self.global_enabled {
            return (self.global_counter >= ghost.global_dot_limit())
                .then_some(ReleaseReason::GlobalCounter);
        }
        (self.personal[ghost.index()] >= self.personal_limits[ghost.index()])
            .then_some(ReleaseReason::PersonalCounter)
    }
}

/// Door commands bringing every door in line with the ghosts passing it.
///
/// `passing` holds the tiles of ghosts currently entering or leaving the
/// house. A door is open exactly when one of them is near it; only doors
/// whose state differs produce a command.
#[must_use]
pub fn door_commands(world: &World, passing: &[Tile]) -> Vec<Command> {
    query::doors(world)
        .iter()
        .filter_map(|door| {
            let open = passing.iter().any(|tile| door.is_near(*tile));
            (open != door.is_open()).then_some(Command::SetDoor {
                door: door.id(),
                open,
            })
        })
        .collect()
}
