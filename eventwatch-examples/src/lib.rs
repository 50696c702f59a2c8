//! Sample domain showing how `EventWatch` is used
//!
//! `Customer` is an observable domain object, `CustomerBuilder` creates it
//! with sensible defaults, and the [`a`] module is the single entry point
//! tests use to get customers, temp folders and test documents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Test-object entry point: `a::customer()`, `a::temp_folder()`, `a::test_document()`
pub mod a;

/// Builder for sample customers
pub mod builder;

/// Observable sample customer
pub mod customer;

pub use builder::CustomerBuilder;
pub use customer::Customer;
