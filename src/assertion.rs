//! Fluent assertions over the notifications raised while running an action.
//!
//! [`EventAssertion`] collects requirements first and evaluates them after
//! running an action against the target with an [`EventRecorder`] attached.
//! The free functions at the bottom of this module cover the common cases.
//!
//! # Example
//!
//! ```rust,ignore
//! let sender = customer.publisher_id();
//!
//! EventAssertion::new(&mut customer)
//!     .where_event_with_message(move |e| e.sender() == sender, "foreign sender")
//!     .where_events(|events| events.len() == 2)
//!     .when_executing(|customer| {
//!         customer.set_first_name("Michael");
//!         customer.set_last_name("Dee");
//!     });
//! ```

use crate::errors::{AssertionFailure, ExecutionError};
use crate::recorder::{property_changes, CapturedEvent, EventRecorder};
use eventwatch_types::Publisher;
use std::convert::Infallible;

/// Message reported for a requirement registered without one.
pub const DEFAULT_MESSAGE: &str = "Expected property does not hold for the raised events.";

type SequencePredicate<'a> = Box<dyn Fn(&[CapturedEvent]) -> bool + 'a>;

struct Requirement<'a> {
    predicate: SequencePredicate<'a>,
    message: String,
}

/// Builder for assertions over the notifications a target raises.
///
/// Requirements are evaluated in registration order once the observed action
/// has finished; the first one that does not hold is reported and the rest
/// are not evaluated.
pub struct EventAssertion<'a, T: Publisher + ?Sized> {
    target: &'a mut T,
    requirements: Vec<Requirement<'a>>,
}

impl<'a, T: Publisher + ?Sized> EventAssertion<'a, T> {
    /// Starts an assertion over `target`.
    pub fn new(target: &'a mut T) -> Self {
        Self {
            target,
            requirements: Vec::new(),
        }
    }

    /// Requires every recorded event to satisfy `predicate`.
    #[must_use]
    pub fn where_event(self, predicate: impl Fn(&CapturedEvent) -> bool + 'a) -> Self {
        self.where_event_with_message(predicate, DEFAULT_MESSAGE)
    }

    /// Requires every recorded event to satisfy `predicate`, reporting `message` otherwise.
    #[must_use]
    pub fn where_event_with_message(
        self,
        predicate: impl Fn(&CapturedEvent) -> bool + 'a,
        message: impl Into<String>,
    ) -> Self {
        self.where_events_with_message(move |events| events.iter().all(&predicate), message)
    }

    /// Requires the recorded sequence as a whole to satisfy `predicate`.
    #[must_use]
    pub fn where_events(self, predicate: impl Fn(&[CapturedEvent]) -> bool + 'a) -> Self {
        self.where_events_with_message(predicate, DEFAULT_MESSAGE)
    }

    /// Requires the recorded sequence as a whole to satisfy `predicate`,
    /// reporting `message` otherwise.
    #[must_use]
    pub fn where_events_with_message(
        mut self,
        predicate: impl Fn(&[CapturedEvent]) -> bool + 'a,
        message: impl Into<String>,
    ) -> Self {
        self.requirements.push(Requirement {
            predicate: Box::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Number of requirements registered so far.
    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    /// Runs `action` against the target while recording, then checks the requirements.
    ///
    /// The recorder is detached before anything else happens once the action
    /// returns, and also when the action panics (the panic then continues
    /// unchanged). An `Err` from the action is returned as
    /// [`ExecutionError::Action`] without evaluating any requirement.
    pub fn run<F, R, E>(self, action: F) -> Result<R, ExecutionError<E>>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let Self {
            target,
            requirements,
        } = self;

        let mut recorder = EventRecorder::attach(&*target)?;
        let outcome = action(target);
        recorder.dispose();

        let value = outcome.map_err(ExecutionError::Action)?;
        let events = recorder.events().snapshot();
        check(&requirements, &events)?;
        Ok(value)
    }

    /// Runs `action` while recording and fails the test if a requirement does not hold.
    ///
    /// # Panics
    ///
    /// Panics with the failing requirement's message, or with the recorder
    /// error if the target cannot be recorded. A panic raised by `action`
    /// propagates after the recorder has been detached.
    #[track_caller]
    pub fn when_executing<F>(self, action: F)
    where
        F: FnOnce(&mut T),
    {
        let result = self.run(|target| {
            action(target);
            Ok::<(), Infallible>(())
        });

        match result {
            Ok(()) => {}
            Err(ExecutionError::Recorder(error)) => panic!("{error}"),
            Err(ExecutionError::Assertion(failure)) => panic!("{failure}"),
            Err(ExecutionError::Action(never)) => match never {},
        }
    }

    /// Runs a fallible `action` while recording.
    ///
    /// An `Err` from the action is returned unchanged and the requirements are
    /// not evaluated. Otherwise behaves like [`EventAssertion::when_executing`].
    ///
    /// # Panics
    ///
    /// Panics with the failing requirement's message, or with the recorder
    /// error if the target cannot be recorded.
    #[track_caller]
    pub fn try_when_executing<F, R, E>(self, action: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        match self.run(action) {
            Ok(value) => Ok(value),
            Err(ExecutionError::Action(error)) => Err(error),
            Err(ExecutionError::Recorder(error)) => panic!("{error}"),
            Err(ExecutionError::Assertion(failure)) => panic!("{failure}"),
        }
    }
}

fn check(
    requirements: &[Requirement<'_>],
    events: &[CapturedEvent],
) -> Result<(), AssertionFailure> {
    for (index, requirement) in requirements.iter().enumerate() {
        if !(requirement.predicate)(events) {
            return Err(AssertionFailure::new(
                requirement.message.clone(),
                index,
                events.len(),
            ));
        }
    }
    Ok(())
}

/// Asserts that `action` makes `target` raise at least one notification.
///
/// # Panics
///
/// Panics if no notification was raised.
#[track_caller]
pub fn assert_raises_events<T, F>(target: &mut T, action: F)
where
    T: Publisher + ?Sized,
    F: FnOnce(&mut T),
{
    EventAssertion::new(target)
        .where_events_with_message(
            |events| !events.is_empty(),
            "Expected at least one event to be raised, but none were.",
        )
        .when_executing(action);
}

/// Asserts that `action` makes `target` raise no notification at all.
///
/// # Panics
///
/// Panics if any notification was raised.
#[track_caller]
pub fn assert_raises_no_events<T, F>(target: &mut T, action: F)
where
    T: Publisher + ?Sized,
    F: FnOnce(&mut T),
{
    EventAssertion::new(target)
        .where_events_with_message(|events| events.is_empty(), "Expected no events to be raised.")
        .when_executing(action);
}

/// Asserts that `action` makes `target` raise property-change notifications
/// for exactly `expected`, in that order.
///
/// Other notifications are ignored; among property changes, missing, extra
/// or reordered names all fail the assertion.
///
/// # Panics
///
/// Panics if the recorded property changes differ from `expected`.
#[track_caller]
pub fn assert_raises_property_changed_events<T, F>(target: &mut T, expected: &[&str], action: F)
where
    T: Publisher + ?Sized,
    F: FnOnce(&mut T),
{
    let message = format!(
        "Expected property changed events [{}] in exactly that order.",
        expected.join(", ")
    );

    EventAssertion::new(target)
        .where_events_with_message(
            move |events| {
                let actual = property_changes(events);
                actual.len() == expected.len()
                    && actual
                        .iter()
                        .zip(expected)
                        .all(|(name, expected)| name.as_ref() == *expected)
            },
            message,
        )
        .when_executing(action);
}
