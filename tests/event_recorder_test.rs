use eventwatch::{
    ChannelDescriptor, ChannelName, EventHub, EventRecorder, EventSource, Notification,
    NotificationHandler, Payload, PropertyName, Publisher, PublisherId, RecorderError,
    SubscribeError, SubscriptionToken,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

fn channel(name: &str) -> ChannelName {
    ChannelName::try_new(name).expect("valid channel name")
}

/// Test publisher with three notification channels.
struct Thermostat {
    target: i32,
    hub: Arc<EventHub>,
}

impl Thermostat {
    fn new() -> Self {
        Self {
            target: 20,
            hub: Arc::new(EventHub::new(
                PublisherId::new(),
                [
                    ChannelName::property_changed(),
                    channel("Heating"),
                    channel("Idle"),
                ],
            )),
        }
    }

    fn set_target(&mut self, target: i32) {
        self.target = target;
        let _ = self.hub.raise(
            &ChannelName::property_changed(),
            Payload::property_changed(PropertyName::try_new("Target").expect("valid property")),
        );
    }

    fn raise(&self, name: &str) {
        let _ = self.hub.raise(&channel(name), Payload::Empty);
    }
}

impl Publisher for Thermostat {
    fn publisher_id(&self) -> PublisherId {
        self.hub.publisher_id()
    }

    fn event_source(&self) -> Arc<dyn EventSource> {
        self.hub.clone()
    }
}

/// Source declaring a channel whose callbacks take raw bytes.
struct SerialPort {
    hub: EventHub,
}

impl EventSource for SerialPort {
    fn channels(&self) -> Vec<ChannelDescriptor> {
        let mut channels = self.hub.channels();
        channels.push(ChannelDescriptor::foreign(channel("BytesReceived"), "Fn(&[u8])"));
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

fn subscriber_counts(hub: &EventHub) -> Vec<usize> {
    hub.channels()
        .iter()
        .map(|descriptor| {
            hub.subscriber_count(descriptor.name())
                .expect("declared channel")
        })
        .collect()
}

#[test]
fn attach_and_dispose_leaves_subscribers_unchanged() {
    // Given: a thermostat that already has an unrelated observer
    let thermostat = Thermostat::new();
    let _display = thermostat
        .hub
        .subscribe(&channel("Heating"), Arc::new(|_: &Notification| {}))
        .expect("declared channel");
    let before = subscriber_counts(&thermostat.hub);

    // When: a recorder attaches and is disposed
    let mut recorder = EventRecorder::attach(&thermostat).expect("recordable");
    let during = subscriber_counts(&thermostat.hub);
    recorder.dispose();

    // Then: one extra handler per channel while attached, none afterwards
    assert_eq!(before, vec![0, 1, 0]);
    assert_eq!(during, vec![1, 2, 1]);
    assert_eq!(subscriber_counts(&thermostat.hub), before);
}

#[test]
fn records_sender_channel_and_payload() {
    // Given
    let mut thermostat = Thermostat::new();
    let recorder = EventRecorder::attach(&thermostat).expect("recordable");

    // When: the target is changed, then the thermostat starts heating
    thermostat.set_target(22);
    thermostat.raise("Heating");

    // Then
    let events = recorder.events().snapshot();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].sender(), thermostat.publisher_id());
    assert_eq!(events[0].channel(), &ChannelName::property_changed());
    assert_eq!(
        events[0].payload().property_name().map(ToString::to_string),
        Some("Target".to_string())
    );
    assert_eq!(events[1].channel(), &channel("Heating"));
    assert!(events[1].payload().is_empty());
    assert_eq!(thermostat.target, 22);
}

#[test]
fn foreign_channel_fails_construction_without_subscribing() {
    // Given: a source with one notification channel and one foreign channel
    let port = Arc::new(SerialPort {
        hub: EventHub::new(PublisherId::new(), [channel("Connected")]),
    });

    // When
    let result = EventRecorder::from_source(port.clone());

    // Then: construction fails and nothing was subscribed
    match result {
        Err(RecorderError::IncompatibleChannel { channel, signature }) => {
            assert_eq!(channel.to_string(), "BytesReceived");
            assert_eq!(signature, "Fn(&[u8])");
        }
        other => panic!("expected incompatible channel error, got {other:?}"),
    }
    assert_eq!(port.hub.subscriber_count(&channel("Connected")), Ok(0));
}

#[test]
fn recorder_error_message_names_channel() {
    let port = Arc::new(SerialPort {
        hub: EventHub::new(PublisherId::new(), Vec::new()),
    });

    let error = EventRecorder::from_source(port).expect_err("foreign channel");

    assert_eq!(
        error.to_string(),
        "cannot record channel BytesReceived: signature Fn(&[u8]) does not carry notifications"
    );
}

#[test]
fn reentrant_notifications_are_recorded_in_firing_order() {
    // Given: an observer attached before the recorder that reacts to "Heating"
    // by raising "Idle"
    let thermostat = Thermostat::new();
    let hub = Arc::clone(&thermostat.hub);
    let _reaction = thermostat
        .hub
        .subscribe(
            &channel("Heating"),
            Arc::new(move |_: &Notification| {
                let _ = hub.raise(&channel("Idle"), Payload::Empty);
            }),
        )
        .expect("declared channel");
    let recorder = EventRecorder::attach(&thermostat).expect("recordable");

    // When
    thermostat.raise("Heating");

    // Then: the nested notification fired first, so it is recorded first
    let channels: Vec<String> = recorder
        .events()
        .snapshot()
        .iter()
        .map(|event| event.channel().to_string())
        .collect();
    assert_eq!(channels, vec!["Idle", "Heating"]);
}

#[test]
fn notifications_from_other_threads_are_recorded() {
    // Given
    let thermostat = Thermostat::new();
    let recorder = EventRecorder::attach(&thermostat).expect("recordable");

    // When: four threads raise notifications concurrently
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let hub = Arc::clone(&thermostat.hub);
            thread::spawn(move || {
                for _ in 0..25 {
                    let _ = hub.raise(&channel("Heating"), Payload::Empty);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker finished");
    }

    // Then: every notification is in the log
    assert_eq!(recorder.events().len(), 100);
}

#[test]
fn captured_events_serialize_with_tagged_payload() {
    let mut thermostat = Thermostat::new();
    let recorder = EventRecorder::attach(&thermostat).expect("recordable");

    thermostat.set_target(18);

    let json = serde_json::to_value(recorder.events().snapshot()).expect("serializable");
    assert_eq!(
        json,
        serde_json::json!([{
            "sender": thermostat.publisher_id().to_string(),
            "channel": "PropertyChanged",
            "payload": { "kind": "property_changed", "property": "Target" }
        }])
    );
}

#[test]
fn dispose_after_drop_of_publisher_is_harmless() {
    let thermostat = Thermostat::new();
    let mut recorder = EventRecorder::attach(&thermostat).expect("recordable");

    drop(thermostat);
    recorder.dispose();
    recorder.dispose();

    assert!(recorder.is_disposed());
}

#[test]
fn events_survive_disposal() {
    let thermostat = Thermostat::new();
    let mut recorder = EventRecorder::attach(&thermostat).expect("recordable");

    thermostat.raise("Idle");
    recorder.dispose();
    thermostat.raise("Idle");

    assert_eq!(recorder.events().len(), 1);
}

proptest! {
    #[test]
    fn log_matches_firing_sequence(sequence in prop::collection::vec(0usize..3, 0..40)) {
        let names = ["PropertyChanged", "Heating", "Idle"];
        let thermostat = Thermostat::new();
        let recorder = EventRecorder::attach(&thermostat).expect("recordable");

        for index in &sequence {
            thermostat.raise(names[*index]);
        }

        let recorded: Vec<String> = recorder
            .events()
            .snapshot()
            .iter()
            .map(|event| event.channel().to_string())
            .collect();
        let expected: Vec<String> = sequence.iter().map(|index| names[*index].to_string()).collect();
        prop_assert_eq!(recorded, expected);
    }

    #[test]
    fn attach_dispose_is_an_identity(existing in prop::collection::vec(0usize..3, 0..10)) {
        let names = ["PropertyChanged", "Heating", "Idle"];
        let thermostat = Thermostat::new();
        for index in &existing {
            let _ = thermostat
                .hub
                .subscribe(&channel(names[*index]), Arc::new(|_: &Notification| {}))
                .expect("declared channel");
        }
        let before = subscriber_counts(&thermostat.hub);

        let recorder = EventRecorder::attach(&thermostat).expect("recordable");
        drop(recorder);

        prop_assert_eq!(subscriber_counts(&thermostat.hub), before);
    }
}
