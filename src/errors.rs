use eventwatch_types::{ChannelName, SubscribeError};
use thiserror::Error;

/// Error type for recorder construction failures.
///
/// A recorder either attaches to every channel of its source or to none:
/// when construction fails, any subscription made so far has already been
/// removed again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// The source declares a channel whose callbacks cannot carry notifications.
    #[error("cannot record channel {channel}: signature {signature} does not carry notifications")]
    IncompatibleChannel {
        /// The offending channel.
        channel: ChannelName,
        /// Signature the channel declared.
        signature: String,
    },

    /// The source refused a subscription.
    #[error("cannot record channel {channel}: {source}")]
    Subscribe {
        /// The channel that could not be subscribed.
        channel: ChannelName,
        /// Why the source refused.
        #[source]
        source: SubscribeError,
    },
}

/// A registered requirement did not hold for the recorded events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
    requirement: usize,
    event_count: usize,
}

impl AssertionFailure {
    pub(crate) fn new(message: impl Into<String>, requirement: usize, event_count: usize) -> Self {
        Self {
            message: message.into(),
            requirement,
            event_count,
        }
    }

    /// The message registered with the failing requirement.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Zero-based registration index of the failing requirement.
    pub const fn requirement(&self) -> usize {
        self.requirement
    }

    /// Number of events the requirement was evaluated against.
    pub const fn event_count(&self) -> usize {
        self.event_count
    }
}

/// Error type for an observed execution.
///
/// Keeps the three failure modes apart: the recorder could not attach, the
/// observed action itself failed, or the action succeeded but a requirement
/// over the recorded events did not hold. An action failure is reported as
/// such and never as an assertion failure.
#[derive(Error, Debug)]
pub enum ExecutionError<E> {
    /// The recorder could not be attached to the target.
    #[error(transparent)]
    Recorder(#[from] RecorderError),

    /// The observed action returned an error.
    #[error("observed action failed: {0}")]
    Action(E),

    /// A requirement over the recorded events did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

impl<E> ExecutionError<E> {
    /// Returns the action's own error, if that is what failed.
    pub fn into_action_error(self) -> Option<E> {
        match self {
            Self::Action(error) => Some(error),
            Self::Recorder(_) | Self::Assertion(_) => None,
        }
    }
}
