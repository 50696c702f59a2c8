use crate::notification::{ChannelName, Notification, PublisherId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Callback attached to a notification channel.
///
/// Every channel that carries the uniform `(sender, payload)` shape accepts a
/// handler of this type, so an observer needs no per-channel code.
pub type NotificationHandler = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Shape of the callbacks a channel delivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelShape {
    /// The channel delivers [`Notification`]s and accepts a [`NotificationHandler`].
    Notification,
    /// The channel delivers callbacks with some other signature.
    ///
    /// Observers that only understand notifications cannot attach to it.
    Foreign {
        /// Human readable description of the callback signature.
        signature: String,
    },
}

/// A channel declared by an [`EventSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    name: ChannelName,
    shape: ChannelShape,
}

impl ChannelDescriptor {
    /// Declares a channel delivering notifications.
    pub const fn notification(name: ChannelName) -> Self {
        Self {
            name,
            shape: ChannelShape::Notification,
        }
    }

    /// Declares a channel delivering callbacks with a foreign signature.
    pub fn foreign(name: ChannelName, signature: impl Into<String>) -> Self {
        Self {
            name,
            shape: ChannelShape::Foreign {
                signature: signature.into(),
            },
        }
    }

    /// The channel name.
    pub const fn name(&self) -> &ChannelName {
        &self.name
    }

    /// The callback shape of the channel.
    pub const fn shape(&self) -> &ChannelShape {
        &self.shape
    }

    /// True when a [`NotificationHandler`] can be attached to this channel.
    pub const fn accepts_notifications(&self) -> bool {
        matches!(self.shape, ChannelShape::Notification)
    }
}

/// Handle identifying one subscription.
///
/// Returned by [`EventSource::subscribe`]; the same token must be handed back
/// to [`EventSource::unsubscribe`] to detach that exact handler. Sources never
/// reuse the id of a token they handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    channel: ChannelName,
    id: u64,
}

impl SubscriptionToken {
    /// Creates a token. Intended for [`EventSource`] implementations.
    pub const fn new(channel: ChannelName, id: u64) -> Self {
        Self { channel, id }
    }

    /// The channel this subscription is attached to.
    pub const fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// The source-assigned subscription id.
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Errors raised while attaching a handler to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// The source does not declare the requested channel.
    #[error("unknown channel {channel}")]
    UnknownChannel {
        /// The channel that was requested.
        channel: ChannelName,
    },

    /// The channel exists but its callbacks cannot carry notifications.
    #[error("channel {channel} has signature {signature} and cannot take a notification handler")]
    IncompatibleShape {
        /// The channel that was requested.
        channel: ChannelName,
        /// Signature of the channel's callbacks.
        signature: String,
    },
}

/// Something handlers can be attached to and detached from.
///
/// Implementations enumerate their channels explicitly instead of having
/// them discovered, which makes the set of observable channels part of the
/// type's contract.
pub trait EventSource: Send + Sync {
    /// Every channel this source exposes, in declaration order.
    fn channels(&self) -> Vec<ChannelDescriptor>;

    /// Attaches `handler` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError::UnknownChannel`] if the channel is not
    /// declared and [`SubscribeError::IncompatibleShape`] if it does not
    /// deliver notifications.
    fn subscribe(
        &self,
        channel: &ChannelName,
        handler: NotificationHandler,
    ) -> Result<SubscriptionToken, SubscribeError>;

    /// Detaches the handler registered under `token`.
    ///
    /// Returns `false` when no such subscription exists, for instance because
    /// it was already removed.
    fn unsubscribe(&self, token: &SubscriptionToken) -> bool;
}

/// An object whose notifications can be observed.
pub trait Publisher {
    /// The identity reported as sender of this publisher's notifications.
    fn publisher_id(&self) -> PublisherId;

    /// Shared handle to the source through which observers attach.
    ///
    /// Observers keep this handle rather than a borrow of the publisher, so
    /// the publisher stays free to be mutated while it is being observed.
    fn event_source(&self) -> Arc<dyn EventSource>;
}
