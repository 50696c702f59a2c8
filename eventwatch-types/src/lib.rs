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

//! Shared vocabulary types and traits for `EventWatch`.
//!
//! This crate provides the notification model shared between the `eventwatch`
//! recorder and any domain type that wants to be observed by it. Keeping the
//! vocabulary in its own crate lets domain crates implement [`Publisher`]
//! without depending on the recorder itself.
//!
//! # Overview
//!
//! This crate contains:
//! - Identity and naming: `PublisherId`, `ChannelName`, `PropertyName`
//! - Notification data: `Payload`, `Notification`, `NotificationHandler`
//! - Subscription plumbing: `ChannelDescriptor`, `ChannelShape`, `SubscriptionToken`
//! - Traits: `EventSource`, `Publisher`
//! - Errors: `SubscribeError`

mod notification;
mod source;

pub use notification::{
    ChannelName, ChannelNameError, Notification, Payload, PropertyName, PropertyNameError,
    PublisherId, PublisherIdError,
};
pub use source::{
    ChannelDescriptor, ChannelShape, EventSource, NotificationHandler, Publisher, SubscribeError,
    SubscriptionToken,
};
