use crate::config::{ConfigError, TestSettings};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Category a test belongs to.
///
/// Categories let a run select fast, self-contained tests separately from
/// tests that touch the file system or other external resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCategory {
    /// Fast, self-contained test.
    Unit,
    /// Test that depends on resources outside the process.
    Integration,
}

impl TestCategory {
    /// Name under which the category is reported.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unit => "UnitTest",
            Self::Integration => "IntegrationTest",
        }
    }

    /// True when the current environment enables this category.
    ///
    /// An unreadable category setting enables every category, so a typo in
    /// the environment runs too many tests rather than silently too few.
    pub fn is_enabled(self) -> bool {
        match TestSettings::from_env() {
            Ok(settings) => settings.category_enabled(self),
            Err(error) => {
                warn!(%error, category = self.name(), "ignoring invalid test category setting");
                true
            }
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TestCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            name if name.eq_ignore_ascii_case("unit") || name == Self::Unit.name() => {
                Ok(Self::Unit)
            }
            name if name.eq_ignore_ascii_case("integration") || name == Self::Integration.name() => {
                Ok(Self::Integration)
            }
            other => Err(ConfigError::UnknownCategory {
                name: other.to_string(),
            }),
        }
    }
}

/// Returns `true` when a test of `category` should be skipped.
///
/// Used through [`require_category!`](crate::require_category).
pub fn skip_unless(category: TestCategory) -> bool {
    if category.is_enabled() {
        return false;
    }
    debug!(%category, "skipping test: category disabled");
    eprintln!("skipped: {category} tests are disabled");
    true
}
