//! Fluent declaration of state machine tables.

use std::fmt::Debug;

use strum::IntoEnumIterator;

use crate::{FsmError, StateMachine, Ticks, Timer, Transition, Trigger};

/// Collects states, behaviours and transitions for a [`StateMachine`].
///
/// Transitions keep the order in which they are declared.
pub struct StateMachineBuilder<S, E, C, A, B> {
    name: &'static str,
    initial: S,
    duration: fn(S, &C) -> Ticks,
    transitions: Vec<Transition<S, E, C, A>>,
    behaviors: Vec<(S, B)>,
}

fn unbounded<S, C>(_: S, _: &C) -> Ticks {
    Ticks::Unbounded
}

impl<S, E, C, A, B> StateMachineBuilder<S, E, C, A, B>
where
    S: Copy + Eq + Debug + IntoEnumIterator + Into<&'static str>,
    A: Copy,
{
    pub(crate) fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            initial,
            duration: unbounded::<S, C>,
            transitions: Vec::new(),
            behaviors: Vec::new(),
        }
    }

    /// Sets the function computing each state's duration on entry.
    ///
    /// States are unbounded unless this is provided.
    #[must_use]
    pub fn duration(mut self, duration: fn(S, &C) -> Ticks) -> Self {
        self.duration = duration;
        self
    }

    /// Binds `behavior` to `state`, replacing any earlier binding.
    #[must_use]
    pub fn behavior(mut self, state: S, behavior: B) -> Self {
        self.behaviors.retain(|(bound, _)| *bound != state);
        self.behaviors.push((state, behavior));
        self
    }

    /// Declares a transition taken when a broadcast event matches.
    #[must_use]
    pub fn on_event(mut self, from: S, to: S, matcher: fn(&C, &E) -> bool) -> Self {
        self.transitions.push(Transition {
            from,
            to,
            trigger: Trigger::Event(matcher),
            action: None,
        });
        self
    }

    /// Declares a transition taken when `guard` holds.
    #[must_use]
    pub fn when(mut self, from: S, to: S, guard: fn(&C) -> bool) -> Self {
        self.transitions.push(Transition {
            from,
            to,
            trigger: Trigger::Guard(guard),
            action: None,
        });
        self
    }

    /// Declares the fallback transition taken when the state times out.
    #[must_use]
    pub fn on_timeout(mut self, from: S, to: S) -> Self {
        self.transitions.push(Transition {
            from,
            to,
            trigger: Trigger::Timeout,
            action: None,
        });
        self
    }

    /// Attaches `action` to the most recently declared transition.
    #[must_use]
    pub fn then(mut self, action: A) -> Self {
        if let Some(last) = self.transitions.last_mut() {
            last.action = Some(action);
        }
        self
    }

    /// Finishes the machine, entering the initial state.
    pub fn build(self, context: &C) -> Result<StateMachine<S, E, C, A, B>, FsmError> {
        let machine = StateMachine {
            name: self.name,
            current: self.initial,
            timer: Timer::start((self.duration)(self.initial, context)),
            duration: self.duration,
            transitions: self.transitions,
            behaviors: self.behaviors,
        };
        machine.validate()?;
        Ok(machine)
    }
}
