#![forbid(
    dead_code,
    invalid_value,
    overflowing_literals,
    unconditional_recursion,
    unreachable_pub,
    unused_allocation,
    unsafe_code
)]
#![deny(
    bad_style,
    clippy::allow_attributes,
    deprecated,
    meta_variable_misuse,
    non_ascii_idents,
    non_camel_case_types,
    non_snake_case,
    non_upper_case_globals,
    rust_2018_idioms,
    rust_2021_compatibility,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_code,
    unused_assignments,
    unused_attributes,
    unused_extern_crates,
    unused_imports,
    unused_must_use,
    unused_mut,
    unused_parens,
    unused_qualifications,
    unused_results,
    unused_variables
)]

//! Test-base helpers shared by `EventWatch` test suites.
//!
//! Everything here is meant to be called from `#[test]` functions: the
//! assertion helpers panic with a descriptive message on failure, while the
//! fixture and configuration types return errors so tests can decide
//! whether a broken environment is a failure or a skip.
//!
//! ```rust,ignore
//! use eventwatch_testing::{assert_panics, require_category, TestCategory};
//!
//! #[test]
//! fn reads_from_the_network() {
//!     require_category!(TestCategory::Integration);
//!
//!     let message = assert_panics(|| {
//!         let _ = vec![1, 2, 3][5];
//!     });
//!     assert!(message.contains("out of bounds"));
//! }
//! ```

mod assertions;
mod category;
mod config;
mod fixtures;
mod logging;
mod text;

pub use assertions::{
    assert_date_times_equal, assert_date_times_equal_with_message, assert_date_times_within,
    assert_date_times_within_with_message, assert_err, assert_is_empty,
    assert_is_empty_with_message, assert_panics, assert_panics_async, assert_panics_with,
    TIMESTAMP_FORMAT,
};
pub use category::{skip_unless, TestCategory};
pub use config::{
    ConfigError, TestSettings, CATEGORIES_VAR, DEFAULT_DOCUMENTS_DIR, DEFAULT_LOG_FILTER,
    DOCUMENTS_VAR, LOG_VAR, TEMP_DIR_VAR,
};
pub use fixtures::{FixtureError, TempFolder, TestDocument, TestDocumentBuilder};
pub use logging::init_test_logging;
pub use text::StrExt;

/// Skips the current test unless `category` is enabled.
///
/// Expands to an early `return` when the category is disabled by the
/// `EVENTWATCH_TEST_CATEGORIES` setting, so it must be used in a test
/// function returning `()`.
#[macro_export]
macro_rules! require_category {
    ($category:expr) => {
        if $crate::skip_unless($category) {
            return;
        }
    };
}
