//! In-memory notification hub for domain types.
//!
//! `EventHub` is the ready-made [`EventSource`] a domain type embeds to become
//! observable: declare the channels once, hand out the hub from
//! [`Publisher::event_source`](eventwatch_types::Publisher::event_source), and
//! call [`EventHub::raise`] whenever something happens.

use eventwatch_types::{
    ChannelDescriptor, ChannelName, EventSource, Notification, NotificationHandler, Payload,
    PublisherId, SubscribeError, SubscriptionToken,
};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Thread-safe registry of notification handlers, keyed by channel.
///
/// The channel set is fixed at construction. Handlers are invoked
/// synchronously, in subscription order, on the thread that raises the
/// notification. The lock is released before any handler runs, so handlers
/// may raise further notifications or change subscriptions.
pub struct EventHub {
    publisher_id: PublisherId,
    state: Mutex<HubState>,
}

struct HubState {
    channels: Vec<Channel>,
    next_token: u64,
}

struct Channel {
    name: ChannelName,
    handlers: Vec<(u64, NotificationHandler)>,
}

impl EventHub {
    /// Creates a hub raising notifications on behalf of `publisher_id`.
    ///
    /// Duplicate channel names are declared once.
    pub fn new(publisher_id: PublisherId, channels: impl IntoIterator<Item = ChannelName>) -> Self {
        let mut declared: Vec<Channel> = Vec::new();
        for name in channels {
            if declared.iter().all(|channel| channel.name != name) {
                declared.push(Channel {
                    name,
                    handlers: Vec::new(),
                });
            }
        }

        Self {
            publisher_id,
            state: Mutex::new(HubState {
                channels: declared,
                next_token: 0,
            }),
        }
    }

    /// The sender reported by [`EventHub::raise`].
    pub const fn publisher_id(&self) -> PublisherId {
        self.publisher_id
    }

    /// Raises `payload` on `channel` with this hub's publisher as sender.
    ///
    /// Returns the number of handlers notified.
    pub fn raise(&self, channel: &ChannelName, payload: Payload) -> Result<usize, SubscribeError> {
        self.raise_from(channel, self.publisher_id, payload)
    }

    /// Raises `payload` on `channel` on behalf of `sender`.
    ///
    /// Used by publishers that forward notifications of the objects they own.
    pub fn raise_from(
        &self,
        channel: &ChannelName,
        sender: PublisherId,
        payload: Payload,
    ) -> Result<usize, SubscribeError> {
        // Collect handlers to invoke after releasing the lock
        let handlers: Vec<NotificationHandler> = {
            let state = self.state.lock();
            let declared = state.channel(channel)?;
            declared
                .handlers
                .iter()
                .map(|(_, handler)| handler.clone())
                .collect()
        };

        trace!(%channel, %sender, handlers = handlers.len(), "raising notification");

        let notification = Notification::new(sender, payload);
        for handler in &handlers {
            handler(&notification);
        }

        Ok(handlers.len())
    }

    /// Number of handlers currently attached to `channel`.
    pub fn subscriber_count(&self, channel: &ChannelName) -> Result<usize, SubscribeError> {
        let state = self.state.lock();
        Ok(state.channel(channel)?.handlers.len())
    }
}

impl HubState {
    fn channel(&self, name: &ChannelName) -> Result<&Channel, SubscribeError> {
        self.channels
            .iter()
            .find(|channel| &channel.name == name)
            .ok_or_else(|| SubscribeError::UnknownChannel {
                channel: name.clone(),
            })
    }

    fn channel_mut(&mut self, name: &ChannelName) -> Result<&mut Channel, SubscribeError> {
        self.channels
            .iter_mut()
            .find(|channel| &channel.name == name)
            .ok_or_else(|| SubscribeError::UnknownChannel {
                channel: name.clone(),
            })
    }
}

impl EventSource for EventHub {
    fn channels(&self) -> Vec<ChannelDescriptor> {
        self.state
            .lock()
            .channels
            .iter()
            .map(|channel| ChannelDescriptor::notification(channel.name.clone()))
            .collect()
    }

    fn subscribe(
        &self,
        channel: &ChannelName,
        handler: NotificationHandler,
    ) -> Result<SubscriptionToken, SubscribeError> {
        let mut state = self.state.lock();
        let id = state.next_token;
        state.channel_mut(channel)?.handlers.push((id, handler));
        state.next_token += 1;

        debug!(%channel, token = id, "handler subscribed");
        Ok(SubscriptionToken::new(channel.clone(), id))
    }

    fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let mut state = self.state.lock();
        let Ok(channel) = state.channel_mut(token.channel()) else {
            return false;
        };

        let before = channel.handlers.len();
        channel.handlers.retain(|(id, _)| *id != token.id());
        let removed = channel.handlers.len() < before;

        debug!(channel = %token.channel(), token = token.id(), removed, "handler unsubscribed");
        removed
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventHub")
            .field("publisher_id", &self.publisher_id)
            .field(
                "channels",
                &state
                    .channels
                    .iter()
                    .map(|channel| (channel.name.as_ref(), channel.handlers.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
