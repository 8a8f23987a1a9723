//! Session configuration.

use serde::{Deserialize, Serialize};

/// Settings fixed for a whole game session.
///
/// Every field has a default, so a configuration file only needs to list
/// the values it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Lives Pac-Man starts with.
    pub lives: u32,
    /// Level the session starts at.
    pub start_level: u32,
    /// Seed of every random walk.
    pub seed: u64,
    /// Steer Pac-Man with a random walk instead of input.
    pub autopilot: bool,
    /// Keep the planned pursuit route of every ghost for display.
    pub route_preview: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            start_level: 1,
            seed: 0,
            autopilot: false,
            route_preview: false,
        }
    }
}
