use nutype::nutype;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an object that raises notifications.
///
/// `PublisherId` values are UUIDv7, so ids handed out in sequence also sort in
/// creation order. The id is what a notification reports as its sender: two
/// notifications came from the same publisher iff their sender ids are equal.
#[nutype(
    validate(predicate = |id: &Uuid| id.get_version() == Some(uuid::Version::SortRand)),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct PublisherId(Uuid);

impl PublisherId {
    /// Creates a fresh publisher identity.
    pub fn new() -> Self {
        // Uuid::now_v7() always yields a version 7 UUID
        Self::try_new(Uuid::now_v7()).expect("Uuid::now_v7() should always return a valid v7 UUID")
    }
}

impl Default for PublisherId {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of a notification channel declared by a publisher.
///
/// Channel names are trimmed, non-empty and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct ChannelName(String);

impl ChannelName {
    /// The conventional channel on which property changes are announced.
    pub fn property_changed() -> Self {
        Self::try_new("PropertyChanged").expect("\"PropertyChanged\" is a valid channel name")
    }
}

/// Name of a property reported by a property-change notification.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct PropertyName(String);

/// Data carried by a notification.
///
/// New kinds of payload may be added; match with a wildcard arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Payload {
    /// The notification carries no data beyond its sender.
    Empty,
    /// A named property of the sender changed.
    PropertyChanged {
        /// The property that changed.
        property: PropertyName,
    },
    /// Publisher-specific data.
    Custom {
        /// Kind of the custom payload, chosen by the publisher.
        name: String,
        /// Arbitrary structured data.
        data: serde_json::Value,
    },
}

impl Payload {
    /// Builds a property-change payload.
    pub const fn property_changed(property: PropertyName) -> Self {
        Self::PropertyChanged { property }
    }

    /// Returns the changed property when this is a property-change payload.
    pub const fn property_name(&self) -> Option<&PropertyName> {
        match self {
            Self::PropertyChanged { property } => Some(property),
            _ => None,
        }
    }

    /// True for the empty payload.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A single notification as raised by a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// The publisher that raised the notification.
    pub sender: PublisherId,
    /// The data that came with it.
    pub payload: Payload,
}

impl Notification {
    /// Creates a notification from `sender` carrying `payload`.
    pub const fn new(sender: PublisherId, payload: Payload) -> Self {
        Self { sender, payload }
    }
}
