//! `EventWatch` - record the notifications an object raises and assert over them.
//!
//! A domain type becomes observable by implementing [`Publisher`], usually by
//! embedding an [`EventHub`]. Tests then either attach an [`EventRecorder`]
//! directly or describe what they expect with an [`EventAssertion`]:
//!
//! ```rust,ignore
//! use eventwatch::assert_raises_property_changed_events;
//!
//! assert_raises_property_changed_events(&mut customer, &["FirstName", "LastName"], |c| {
//!     c.set_first_name("Michael");
//!     c.set_last_name("Dee");
//! });
//! ```

mod assertion;
mod errors;
mod hub;
mod recorder;

pub use assertion::{
    assert_raises_events, assert_raises_no_events, assert_raises_property_changed_events,
    EventAssertion, DEFAULT_MESSAGE,
};
pub use errors::{AssertionFailure, ExecutionError, RecorderError};
pub use hub::EventHub;
pub use recorder::{property_changes, CapturedEvent, EventRecorder, RecordedEvents};

pub use eventwatch_types::{
    ChannelDescriptor, ChannelName, ChannelShape, EventSource, Notification, NotificationHandler,
    Payload, PropertyName, Publisher, PublisherId, SubscribeError, SubscriptionToken,
};
