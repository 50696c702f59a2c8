//! Recording of the notifications a publisher raises.

use crate::errors::RecorderError;
use eventwatch_types::{
    ChannelName, ChannelShape, EventSource, Notification, NotificationHandler, Payload,
    PropertyName, Publisher, PublisherId, SubscriptionToken,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// One recorded notification.
///
/// Records are created once per notification, in the order the notifications
/// were raised, and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedEvent {
    sender: PublisherId,
    channel: ChannelName,
    payload: Payload,
}

impl CapturedEvent {
    fn new(channel: ChannelName, notification: &Notification) -> Self {
        Self {
            sender: notification.sender,
            channel,
            payload: notification.payload.clone(),
        }
    }

    /// The publisher that raised the notification.
    pub const fn sender(&self) -> PublisherId {
        self.sender
    }

    /// The channel the notification arrived on.
    pub const fn channel(&self) -> &ChannelName {
        &self.channel
    }

    /// The notification data.
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Events recorded so far; `attached` is cleared once the recorder is disposed.
#[derive(Debug)]
struct Log {
    events: Vec<CapturedEvent>,
    attached: bool,
}

/// Live, read-only view of a recorder's log.
///
/// Reads always reflect the log as it is now: while the recorder is attached,
/// each read may see more events than the previous one.
#[derive(Debug, Clone)]
pub struct RecordedEvents {
    log: Arc<Mutex<Log>>,
}

impl RecordedEvents {
    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.log.lock().events.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.log.lock().events.is_empty()
    }

    /// Copy of the events recorded so far, in the order they were raised.
    pub fn snapshot(&self) -> Vec<CapturedEvent> {
        self.log.lock().events.clone()
    }

    /// Runs `f` over the events recorded so far without copying them.
    ///
    /// The log is locked while `f` runs; `f` must not raise notifications on
    /// the observed publisher.
    pub fn with<R>(&self, f: impl FnOnce(&[CapturedEvent]) -> R) -> R {
        f(&self.log.lock().events)
    }

    /// Properties reported by the recorded property-change notifications, in order.
    pub fn property_changes(&self) -> Vec<PropertyName> {
        self.with(property_changes)
    }
}

/// Properties reported by the property-change notifications among `events`, in order.
pub fn property_changes(events: &[CapturedEvent]) -> Vec<PropertyName> {
    events
        .iter()
        .filter_map(|event| event.payload().property_name().cloned())
        .collect()
}

/// Records every notification a publisher raises while attached.
///
/// Attaching subscribes one capture handler to each channel the publisher's
/// source declares; all of them append to the same log, so the log holds the
/// notifications in the order they were raised regardless of channel.
/// [`EventRecorder::dispose`] removes exactly the subscriptions made at attach
/// time, and dropping the recorder disposes it, so a recorder bound to a scope
/// always detaches when the scope is left, including by panic. A notification
/// already in flight when the recorder is disposed is not recorded.
///
/// # Example
///
/// ```rust,ignore
/// let mut recorder = EventRecorder::attach(&customer)?;
/// customer.set_first_name("Michael");
/// recorder.dispose();
///
/// assert_eq!(recorder.events().len(), 1);
/// ```
pub struct EventRecorder {
    source: Arc<dyn EventSource>,
    log: Arc<Mutex<Log>>,
    subscriptions: Vec<SubscriptionToken>,
}

impl EventRecorder {
    /// Starts recording the notifications raised by `publisher`.
    pub fn attach<P: Publisher + ?Sized>(publisher: &P) -> Result<Self, RecorderError> {
        Self::from_source(publisher.event_source())
    }

    /// Starts recording every channel of `source`.
    ///
    /// A channel listed more than once is subscribed once. Fails without leaving any subscription behind if a channel cannot
    /// carry notifications or the source refuses a subscription.
    pub fn from_source(source: Arc<dyn EventSource>) -> Result<Self, RecorderError> {
        let channels = source.channels();

        // Refuse incompatible channels before touching the source
        for descriptor in &channels {
            if let ChannelShape::Foreign { signature } = descriptor.shape() {
                return Err(RecorderError::IncompatibleChannel {
                    channel: descriptor.name().clone(),
                    signature: signature.clone(),
                });
            }
        }

        let mut recorder = Self {
            source,
            log: Arc::new(Mutex::new(Log {
                events: Vec::new(),
                attached: true,
            })),
            subscriptions: Vec::with_capacity(channels.len()),
        };

        let mut seen = HashSet::with_capacity(channels.len());
        for descriptor in channels {
            let channel = descriptor.name().clone();
            if !seen.insert(channel.clone()) {
                debug!(%channel, "channel listed twice, subscribed once");
                continue;
            }
            let handler = recorder.capture_handler(channel.clone());
            match recorder.source.subscribe(&channel, handler) {
                Ok(token) => recorder.subscriptions.push(token),
                Err(source) => {
                    // Dropping the half-built recorder removes what was subscribed
                    return Err(RecorderError::Subscribe { channel, source });
                }
            }
        }

        debug!(
            channels = recorder.subscriptions.len(),
            "event recorder attached"
        );
        Ok(recorder)
    }

    fn capture_handler(&self, channel: ChannelName) -> NotificationHandler {
        let log = Arc::clone(&self.log);
        Arc::new(move |notification: &Notification| {
            let mut log = log.lock();
            if log.attached {
                log.events
                    .push(CapturedEvent::new(channel.clone(), notification));
            }
        })
    }

    /// Live view of the events recorded so far.
    pub fn events(&self) -> RecordedEvents {
        RecordedEvents {
            log: Arc::clone(&self.log),
        }
    }

    /// Number of channels this recorder is currently subscribed to.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// True once the recorder no longer holds any subscription.
    pub fn is_disposed(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Removes every subscription this recorder made.
    ///
    /// The log stops accepting events before the subscriptions are removed,
    /// so handlers the source is still running add nothing afterwards.
    /// Calling it again is a no-op. Events recorded before disposal stay
    /// available through [`EventRecorder::events`].
    pub fn dispose(&mut self) {
        let events = {
            let mut log = self.log.lock();
            log.attached = false;
            log.events.len()
        };
        if self.subscriptions.is_empty() {
            return;
        }

        let count = self.subscriptions.len();
        for token in self.subscriptions.drain(..) {
            if !self.source.unsubscribe(&token) {
                debug!(channel = %token.channel(), token = token.id(), "subscription already gone");
            }
        }

        debug!(
            channels = count,
            events,
            "event recorder disposed"
        );
    }
}

impl Drop for EventRecorder {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("subscriptions", &self.subscriptions)
            .field("events", &self.log.lock().events.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::EventHub;
    use eventwatch_types::{ChannelDescriptor, SubscribeError};

    fn channel(name: &str) -> ChannelName {
        ChannelName::try_new(name).expect("valid channel name")
    }

    struct Lamp {
        hub: Arc<EventHub>,
    }

    impl Lamp {
        fn new() -> Self {
            Self {
                hub: Arc::new(EventHub::new(
                    PublisherId::new(),
                    [channel("SwitchedOn"), channel("SwitchedOff")],
                )),
            }
        }

        fn switch_on(&self) {
            let _ = self.hub.raise(&channel("SwitchedOn"), Payload::Empty);
        }

        fn switch_off(&self) {
            let _ = self.hub.raise(&channel("SwitchedOff"), Payload::Empty);
        }
    }

    impl Publisher for Lamp {
        fn publisher_id(&self) -> PublisherId {
            self.hub.publisher_id()
        }

        fn event_source(&self) -> Arc<dyn EventSource> {
            self.hub.clone()
        }
    }

    /// Source that accepts a limited number of subscriptions, then refuses.
    struct GrudgingSource {
        hub: EventHub,
        remaining: Mutex<usize>,
    }

    impl EventSource for GrudgingSource {
        fn channels(&self) -> Vec<ChannelDescriptor> {
            self.hub.channels()
        }

        fn subscribe(
            &self,
            channel: &ChannelName,
            handler: NotificationHandler,
        ) -> Result<SubscriptionToken, SubscribeError> {
            let mut remaining = self.remaining.lock();
            if *remaining == 0 {
                return Err(SubscribeError::UnknownChannel {
                    channel: channel.clone(),
                });
            }
            *remaining -= 1;
            self.hub.subscribe(channel, handler)
        }

        fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
            self.hub.unsubscribe(token)
        }
    }

    /// Source that lists each of its hub's channels twice.
    struct EchoingSource {
        hub: EventHub,
    }

    impl EventSource for EchoingSource {
        fn channels(&self) -> Vec<ChannelDescriptor> {
            let mut channels = self.hub.channels();
            channels.extend(self.hub.channels());
            channels
        }

        fn subscribe(
            &self,
            channel: &ChannelName,
            handler: NotificationHandler,
        ) -> Result<SubscriptionToken, SubscribeError> {
            self.hub.subscribe(channel, handler)
        }

        fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
            self.hub.unsubscribe(token)
        }
    }

    /// Source that keeps a copy of every handler it is given, the way a
    /// notification already being delivered holds on to its handlers.
    struct RetainingSource {
        hub: EventHub,
        handlers: Mutex<Vec<NotificationHandler>>,
    }

    impl EventSource for RetainingSource {
        fn channels(&self) -> Vec<ChannelDescriptor> {
            self.hub.channels()
        }

        fn subscribe(
            &self,
            channel: &ChannelName,
            handler: NotificationHandler,
        ) -> Result<SubscriptionToken, SubscribeError> {
            self.handlers.lock().push(Arc::clone(&handler));
            self.hub.subscribe(channel, handler)
        }

        fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
            self.hub.unsubscribe(token)
        }
    }

    #[test]
    fn records_notifications_from_every_channel_in_order() {
        // Given: a recorder attached to a lamp with two channels
        let lamp = Lamp::new();
        let recorder = EventRecorder::attach(&lamp).expect("lamp channels are recordable");

        // When: notifications are raised on both channels
        lamp.switch_on();
        lamp.switch_off();
        lamp.switch_on();

        // Then: they are recorded in the order raised
        let channels: Vec<String> = recorder
            .events()
            .snapshot()
            .iter()
            .map(|event| event.channel().to_string())
            .collect();
        assert_eq!(channels, vec!["SwitchedOn", "SwitchedOff", "SwitchedOn"]);
        assert!(recorder
            .events()
            .with(|events| events.iter().all(|e| e.sender() == lamp.publisher_id())));
    }

    #[test]
    fn events_view_is_live() {
        let lamp = Lamp::new();
        let recorder = EventRecorder::attach(&lamp).expect("lamp channels are recordable");
        let events = recorder.events();

        lamp.switch_on();
        let after_one = events.len();
        lamp.switch_off();
        let after_two = events.len();

        assert_eq!((after_one, after_two), (1, 2));
    }

    #[test]
    fn dispose_detaches_and_is_idempotent() {
        // Given: an attached recorder
        let lamp = Lamp::new();
        let mut recorder = EventRecorder::attach(&lamp).expect("lamp channels are recordable");
        assert_eq!(lamp.hub.subscriber_count(&channel("SwitchedOn")), Ok(1));

        // When: it is disposed twice and the lamp keeps switching
        recorder.dispose();
        recorder.dispose();
        lamp.switch_on();

        // Then: no handler remains and nothing further is recorded
        assert!(recorder.is_disposed());
        assert_eq!(lamp.hub.subscriber_count(&channel("SwitchedOn")), Ok(0));
        assert_eq!(lamp.hub.subscriber_count(&channel("SwitchedOff")), Ok(0));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn drop_detaches() {
        let lamp = Lamp::new();
        {
            let _recorder = EventRecorder::attach(&lamp).expect("lamp channels are recordable");
            assert_eq!(lamp.hub.subscriber_count(&channel("SwitchedOff")), Ok(1));
        }

        assert_eq!(lamp.hub.subscriber_count(&channel("SwitchedOff")), Ok(0));
    }

    #[test]
    fn publisher_without_channels_records_nothing() {
        let source: Arc<dyn EventSource> =
            Arc::new(EventHub::new(PublisherId::new(), Vec::new()));

        let recorder = EventRecorder::from_source(source).expect("empty source is recordable");

        assert_eq!(recorder.subscription_count(), 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn refused_subscription_rolls_back_earlier_ones() {
        // Given: a source that accepts only the first of two subscriptions
        let source = Arc::new(GrudgingSource {
            hub: EventHub::new(PublisherId::new(), [channel("First"), channel("Second")]),
            remaining: Mutex::new(1),
        });

        // When: a recorder is attached
        let result = EventRecorder::from_source(source.clone());

        // Then: construction fails and the first subscription is gone again
        assert_eq!(
            result.map(|_| ()).unwrap_err(),
            RecorderError::Subscribe {
                channel: channel("Second"),
                source: SubscribeError::UnknownChannel {
                    channel: channel("Second")
                },
            }
        );
        assert_eq!(source.hub.subscriber_count(&channel("First")), Ok(0));
    }

    #[test]
    fn channel_listed_twice_is_recorded_once_per_notification() {
        // Given: a source that lists its only channel twice
        let source = Arc::new(EchoingSource {
            hub: EventHub::new(PublisherId::new(), [channel("Tick")]),
        });

        // When: a recorder attaches and one notification is raised
        let mut recorder =
            EventRecorder::from_source(source.clone()).expect("tick channel is recordable");
        let fired = source.hub.raise(&channel("Tick"), Payload::Empty);

        // Then: one handler, one record
        assert_eq!(fired, Ok(1));
        assert_eq!(recorder.subscription_count(), 1);
        assert_eq!(recorder.events().len(), 1);

        // And: disposing leaves nothing behind
        recorder.dispose();
        assert_eq!(source.hub.subscriber_count(&channel("Tick")), Ok(0));
    }

    #[test]
    fn handler_running_after_dispose_records_nothing() {
        // Given: a recorder whose handlers the source keeps hold of
        let source = Arc::new(RetainingSource {
            hub: EventHub::new(PublisherId::new(), [channel("Tick")]),
            handlers: Mutex::new(Vec::new()),
        });
        let mut recorder =
            EventRecorder::from_source(source.clone()).expect("tick channel is recordable");
        let _ = source.hub.raise(&channel("Tick"), Payload::Empty);

        // When: a kept handler is invoked after the recorder was disposed
        recorder.dispose();
        let handlers = source.handlers.lock().clone();
        for handler in &handlers {
            handler(&Notification::new(source.hub.publisher_id(), Payload::Empty));
        }

        // Then: the log holds only what was raised while attached
        assert_eq!(handlers.len(), 1);
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn property_changes_lists_property_names_only() {
        let hub = Arc::new(EventHub::new(
            PublisherId::new(),
            [ChannelName::property_changed(), channel("Saved")],
        ));
        let recorder =
            EventRecorder::from_source(hub.clone()).expect("hub channels are recordable");
        let name = PropertyName::try_new("Title").expect("valid property name");

        let _ = hub.raise(
            &ChannelName::property_changed(),
            Payload::property_changed(name.clone()),
        );
        let _ = hub.raise(&channel("Saved"), Payload::Empty);

        assert_eq!(recorder.events().property_changes(), vec![name]);
    }

    #[test]
    #[tracing_test::traced_test]
    fn attach_and_dispose_are_logged() {
        // Given
        let lamp = Lamp::new();

        // When
        let mut recorder = EventRecorder::attach(&lamp).expect("lamp channels are recordable");
        lamp.switch_on();
        recorder.dispose();

        // Then
        assert!(logs_contain("event recorder attached"));
        assert!(logs_contain("event recorder disposed"));
        assert!(logs_contain("channels=2"));
    }
}
