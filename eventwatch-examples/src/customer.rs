use chrono::{Months, NaiveDate};
use eventwatch::{
    ChannelName, EventHub, EventSource, Payload, PropertyName, Publisher, PublisherId,
};
use std::sync::Arc;
use tracing::trace;

/// Property name raised when the first name changes.
pub const FIRST_NAME: &str = "FirstName";
/// Property name raised when the last name changes.
pub const LAST_NAME: &str = "LastName";

const ADULT_AGE_MONTHS: u32 = 18 * 12;

/// A sample customer. Replace this by an actual domain object to test.
///
/// Raises a property change on the `PropertyChanged` channel whenever a
/// name actually changes; assigning the current value raises nothing.
#[derive(Debug)]
pub struct Customer {
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
    hub: Arc<EventHub>,
}

impl Customer {
    /// Creates a customer with a fresh identity.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            hub: Arc::new(EventHub::new(
                PublisherId::new(),
                [ChannelName::property_changed()],
            )),
        }
    }

    /// The first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// The date of birth.
    pub const fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    /// Changes the first name.
    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        let first_name = first_name.into();
        if self.first_name != first_name {
            self.first_name = first_name;
            self.property_changed(FIRST_NAME);
        }
    }

    /// Changes the last name.
    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        let last_name = last_name.into();
        if self.last_name != last_name {
            self.last_name = last_name;
            self.property_changed(LAST_NAME);
        }
    }

    /// Whether the customer has turned 18 on or before `on`.
    pub fn is_adult(&self, on: NaiveDate) -> bool {
        self.birthdate
            .checked_add_months(Months::new(ADULT_AGE_MONTHS))
            .is_some_and(|eighteenth_birthday| eighteenth_birthday <= on)
    }

    fn property_changed(&self, property: &str) {
        let property =
            PropertyName::try_new(property).expect("customer property names are non-empty");
        let notified = self
            .hub
            .raise(
                &ChannelName::property_changed(),
                Payload::property_changed(property),
            )
            .expect("PropertyChanged is declared at construction");
        trace!(notified, "customer property changed");
    }
}

impl Publisher for Customer {
    fn publisher_id(&self) -> PublisherId {
        self.hub.publisher_id()
    }

    fn event_source(&self) -> Arc<dyn EventSource> {
        self.hub.clone()
    }
}
