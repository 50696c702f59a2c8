//! Environment-driven test settings.

use crate::category::TestCategory;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Comma-separated list of enabled test categories. Unset enables all; set
/// but naming none is an error.
pub const CATEGORIES_VAR: &str = "EVENTWATCH_TEST_CATEGORIES";
/// Directory holding the bundled test documents.
pub const DOCUMENTS_VAR: &str = "EVENTWATCH_TEST_DOCUMENTS";
/// Root directory for temporary folders.
pub const TEMP_DIR_VAR: &str = "EVENTWATCH_TEMP_DIR";
/// Log filter used when `RUST_LOG` is not set.
pub const LOG_VAR: &str = "EVENTWATCH_LOG";

/// Test documents directory, relative to the package under test.
pub const DEFAULT_DOCUMENTS_DIR: &str = "test-documents";
/// Log filter used when neither `RUST_LOG` nor `EVENTWATCH_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Errors raised while reading test settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A category name that is not one of the known test categories.
    #[error("unknown test category {name:?}")]
    UnknownCategory {
        /// The name as it was given.
        name: String,
    },

    /// A variable was set but holds nothing usable.
    #[error("{variable} is set but empty")]
    Empty {
        /// The offending variable.
        variable: &'static str,
    },
}

/// Settings shared by test helpers.
///
/// Built from the environment with [`TestSettings::from_env`]; the `with_*`
/// methods override single values, which keeps tests of the settings
/// themselves independent of the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSettings {
    categories: Option<Vec<TestCategory>>,
    documents_dir: PathBuf,
    temp_root: PathBuf,
    log_filter: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            categories: None,
            documents_dir: PathBuf::from(DEFAULT_DOCUMENTS_DIR),
            temp_root: env::temp_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TestSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|variable| env::var(variable).ok())
    }

    /// Reads the settings through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(value) = lookup(CATEGORIES_VAR) {
            settings.categories = Some(parse_categories(non_empty(CATEGORIES_VAR, &value)?)?);
        }
        if let Some(value) = lookup(DOCUMENTS_VAR) {
            settings.documents_dir = PathBuf::from(non_empty(DOCUMENTS_VAR, &value)?);
        }
        if let Some(value) = lookup(TEMP_DIR_VAR) {
            settings.temp_root = PathBuf::from(non_empty(TEMP_DIR_VAR, &value)?);
        }
        if let Some(value) = lookup(LOG_VAR) {
            settings.log_filter = non_empty(LOG_VAR, &value)?.to_string();
        }

        Ok(settings)
    }

    /// Enables exactly `categories`.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = TestCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Uses `dir` as the test documents directory.
    #[must_use]
    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    /// Creates temporary folders under `root`.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    /// Uses `filter` when `RUST_LOG` is not set.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// True when tests of `category` should run.
    pub fn category_enabled(&self, category: TestCategory) -> bool {
        self.categories
            .as_ref()
            .map_or(true, |enabled| enabled.contains(&category))
    }

    /// Directory holding the test documents.
    pub fn documents_dir(&self) -> &Path {
        &self.documents_dir
    }

    /// Root directory for temporary folders.
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Default log filter.
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

fn non_empty<'a>(variable: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { variable });
    }
    Ok(trimmed)
}

fn parse_categories(value: &str) -> Result<Vec<TestCategory>, ConfigError> {
    let mut categories = Vec::new();
    for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let category: TestCategory = name.parse()?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    if categories.is_empty() {
        return Err(ConfigError::Empty {
            variable: CATEGORIES_VAR,
        });
    }
    Ok(categories)
}
