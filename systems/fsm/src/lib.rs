#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Table-driven finite-state machine shared by every agent.
//!
//! A machine is generic over:
//!
//! - `S`, a closed enumeration of state ids,
//! - `E`, the broadcast event type,
//! - `C`, an observation snapshot handed to guards each tick,
//! - `A`, an action tag reported when a transition fires,
//! - `B`, the behaviour bound to each state.
//!
//! Transitions are plain data evaluated in declaration order, and the first
//! one that holds wins. Actions are not executed by the machine; they are
//! returned to the owner as [`Fired`] records so the owner can apply them
//! against state the machine cannot see.

mod builder;

use std::fmt::Debug;

use strum::IntoEnumIterator;

pub use builder::StateMachineBuilder;

/// Duration assigned to a state on entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ticks {
    /// The state lasts the given number of updates before timing out.
    Finite(u32),
    /// The state never times out.
    Unbounded,
}

/// Countdown of the active state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Timeout transitions never fire.
    Unbounded,
    /// The state times out once `remaining` reaches zero.
    Running {
        /// Duration the state was entered with.
        total: u32,
        /// Updates left until the timeout.
        remaining: u32,
    },
}

impl Timer {
    const fn start(duration: Ticks) -> Self {
        match duration {
            Ticks::Finite(total) => Self::Running {
                total,
                remaining: total,
            },
            Ticks::Unbounded => Self::Unbounded,
        }
    }

    fn tick(&mut self) {
        if let Self::Running { remaining, .. } = self {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Reports whether a finite timer has run out.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Running { remaining: 0, .. })
    }
}

/// Errors raised by state machine construction and use.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FsmError {
    /// A state has no behaviour bound to it.
    #[error("state machine `{machine}` has no behavior bound to state `{state}`")]
    MissingBehavior {
        /// Name of the machine.
        machine: &'static str,
        /// Name of the state lacking a behaviour.
        state: &'static str,
    },
}

/// Condition under which a transition holds.
pub(crate) enum Trigger<E, C> {
    Event(fn(&C, &E) -> bool),
    Guard(fn(&C) -> bool),
    Timeout,
}

pub(crate) struct Transition<S, E, C, A> {
    pub(crate) from: S,
    pub(crate) to: S,
    pub(crate) trigger: Trigger<E, C>,
    pub(crate) action: Option<A>,
}

/// A transition committed during [`StateMachine::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired<S, A> {
    /// State that was left.
    pub from: S,
    /// State that was entered.
    pub to: S,
    /// Action attached to the transition.
    pub action: Option<A>,
}

/// Generic actor state machine with per-state timers and behaviours.
pub struct StateMachine<S, E, C, A, B> {
    name: &'static str,
    current: S,
    timer: Timer,
    duration: fn(S, &C) -> Ticks,
    transitions: Vec<Transition<S, E, C, A>>,
    behaviors: Vec<(S, B)>,
}

impl<S, E, C, A, B> StateMachine<S, E, C, A, B>
where
    S: Copy + Eq + Debug + IntoEnumIterator + Into<&'static str>,
    A: Copy,
{
    /// Starts declaring a machine named `name` that begins in `initial`.
    #[must_use]
    pub fn builder(name: &'static str, initial: S) -> StateMachineBuilder<S, E, C, A, B> {
        StateMachineBuilder::new(name, initial)
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Currently active state.
    #[must_use]
    pub fn state(&self) -> S {
        self.current
    }

    /// Reports whether the machine is in any of the provided states.
    #[must_use]
    pub fn is_in(&self, states: &[S]) -> bool {
        states.contains(&self.current)
    }

    /// Countdown of the active state.
    #[must_use]
    pub const fn timer(&self) -> Timer {
        self.timer
    }

    /// Checks that every state has a bound behaviour.
    pub fn validate(&self) -> Result<(), FsmError> {
        for state in S::iter() {
            if !self.behaviors.iter().any(|(bound, _)| *bound == state) {
                return Err(FsmError::MissingBehavior {
                    machine: self.name,
                    state: state.into(),
                });
            }
        }
        Ok(())
    }

    /// Behaviour bound to the active state.
    pub fn behavior(&self) -> Result<&B, FsmError> {
        let current = self.current;
        self.behaviors
            .iter()
            .find(|(state, _)| *state == current)
            .map(|(_, behavior)| behavior)
            .ok_or(FsmError::MissingBehavior {
                machine: self.name,
                state: current.into(),
            })
    }

    /// Mutable behaviour bound to the active state.
    pub fn behavior_mut(&mut self) -> Result<&mut B, FsmError> {
        let current = self.current;
        let name = self.name;
        self.behaviors
            .iter_mut()
            .find(|(state, _)| *state == current)
            .map(|(_, behavior)| behavior)
            .ok_or(FsmError::MissingBehavior {
                machine: name,
                state: current.into(),
            })
    }

    /// Mutable access to every bound behaviour, for resets.
    pub fn behaviors_mut(&mut self) -> impl Iterator<Item = &mut B> + '_ {
        self.behaviors.iter_mut().map(|(_, behavior)| behavior)
    }

    /// Enters `state` unconditionally and restarts its timer.
    ///
    /// No transition table entry is consulted and no action is reported.
    pub fn restart(&mut self, state: S, context: &C) {
        self.enter(state, context);
    }

    /// Advances the machine by one tick.
    ///
    /// Each event is offered to the event transitions of the then-current
    /// state. If no event moved the machine, the timer counts down. Then the
    /// guard and timeout transitions of the current state are evaluated in
    /// declaration order and at most one of them fires.
    pub fn update(&mut self, context: &C, events: &[E]) -> Vec<Fired<S, A>> {
        let mut fired = Vec::new();

        for event in events {
            let hit = self.transitions.iter().find(|transition| {
                transition.from == self.current
                    && matches!(transition.trigger, Trigger::Event(matcher) if matcher(context, event))
            });
            if let Some(transition) = hit {
                fired.push(Fired {
                    from: transition.from,
                    to: transition.to,
                    action: transition.action,
                });
                let to = transition.to;
                self.enter(to, context);
            }
        }

        if fired.is_empty() {
            self.timer.tick();
        }

        let expired = self.timer.is_expired();
        let hit = self.transitions.iter().find(|transition| {
            transition.from == self.current
                && match transition.trigger {
                    Trigger::Event(_) => false,
                    Trigger::Guard(guard) => guard(context),
                    Trigger::Timeout => expired,
                }
        });
        if let Some(transition) = hit {
            fired.push(Fired {
                from: transition.from,
                to: transition.to,
                action: transition.action,
            });
            let to = transition.to;
            self.enter(to, context);
        }

        fired
    }

    fn enter(&mut self, state: S, context: &C) {
        let from: &'static str = self.current.into();
        let to: &'static str = state.into();
        tracing::debug!(machine = self.name, from, to, "state transition");
        self.current = state;
        self.timer = Timer::start((self.duration)(state, context));
    }
}

impl<S: Debug, E, C, A, B> Debug for StateMachine<S, E, C, A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("current", &self.current)
            .field("timer", &self.timer)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
