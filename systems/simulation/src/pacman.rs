//! Pac-Man's state table.

use maze_chase_core::{ticks_from_secs, Event};
use maze_chase_system_fsm::{FsmError, StateMachine, Ticks};
use maze_chase_system_movement::Mover;
use maze_chase_system_steering::{InputSteering, RandomWalker, Steering};
use serde::Serialize;

use crate::GameConfig;

/// Seconds the dying sequence lasts.
const DYING_SECS: f32 = 2.0;

/// States of the player agent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::EnumIter, strum::IntoStaticStr,
)]
pub enum PacManState {
    /// Moving through the maze.
    Running,
    /// Caught by a ghost; the dying sequence plays.
    Dying,
    /// The sequence ended and a life was deducted.
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PacManAction {
    LoseLife,
}

pub(crate) type PacManMachine = StateMachine<PacManState, Event, (), PacManAction, Steering>;

pub(crate) struct PacMan {
    pub(crate) mover: Mover,
    pub(crate) machine: PacManMachine,
}

fn duration(state: PacManState, _: &()) -> Ticks {
    match state {
        PacManState::Dying => Ticks::Finite(ticks_from_secs(DYING_SECS)),
        PacManState::Running | PacManState::Dead => Ticks::Unbounded,
    }
}

fn caught(_: &(), event: &Event) -> bool {
    matches!(event, Event::PacManKilled { .. })
}

/// Builds Pac-Man's table. With autopilot the running state walks at
/// random instead of following input.
pub(crate) fn machine(config: &GameConfig) -> Result<PacManMachine, FsmError> {
    let running = if config.autopilot {
        Steering::RandomWalk(RandomWalker::new(config.seed))
    } else {
        Steering::Input(InputSteering)
    };
    StateMachine::builder("Pac-Man", PacManState::Running)
        .duration(duration)
        .behavior(PacManState::Running, running)
        .behavior(PacManState::Dying, Steering::Idle)
        .behavior(PacManState::Dead, Steering::Idle)
        .on_event(PacManState::Running, PacManState::Dying, caught)
        .on_timeout(PacManState::Dying, PacManState::Dead)
        .then(PacManAction::LoseLife)
        .build(&())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::GhostId;

    #[test]
    fn dying_lasts_two_seconds_then_costs_a_life() {
        let mut machine = machine(&GameConfig::default()).expect("pac-man table is complete");
        let _ = machine.update(&(), &[Event::PacManKilled { by: GhostId::Inky }]);
        assert_eq!(machine.state(), PacManState::Dying);

        let fired = (0..ticks_from_secs(DYING_SECS))
            .map(|_| machine.update(&(), &[]))
            .last()
            .unwrap_or_default();
        assert_eq!(machine.state(), PacManState::Dead);
        assert_eq!(fired[0].action, Some(PacManAction::LoseLife));
    }
}
