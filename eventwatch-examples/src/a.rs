use crate::builder::CustomerBuilder;
use eventwatch_testing::{ConfigError, FixtureError, TempFolder, TestDocumentBuilder};

/// A customer builder with default values.
pub fn customer() -> CustomerBuilder {
    CustomerBuilder::new()
}

/// A fresh temporary folder, removed when dropped.
pub fn temp_folder() -> Result<TempFolder, FixtureError> {
    TempFolder::new()
}

/// Access to the bundled test documents.
pub fn test_document() -> Result<TestDocumentBuilder, ConfigError> {
    TestDocumentBuilder::from_env()
}
