use crate::customer::Customer;
use chrono::NaiveDate;

/// Builds a [`Customer`], starting from John Doe born on 2000-01-01.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerBuilder {
    first_name: String,
    last_name: String,
    birthdate: NaiveDate,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        }
    }
}

impl CustomerBuilder {
    /// A builder with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Sets the date of birth.
    #[must_use]
    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = birthdate;
        self
    }

    /// Creates the customer.
    pub fn create(&self) -> Customer {
        Customer::new(
            self.first_name.clone(),
            self.last_name.clone(),
            self.birthdate,
        )
    }
}
