//! Assertions that complement the standard `assert!` family.

use chrono::{DateTime, TimeDelta, Utc};
use futures::FutureExt;
use std::any::{type_name, Any};
use std::fmt::Debug;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// Format used when timestamps appear in failure messages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const NO_PANIC: &str = "Expected a panic, but none was raised.";

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Asserts that `action` panics and returns the panic message.
///
/// Payloads that are neither `&str` nor `String` are reported as
/// `"Box<dyn Any>"`, like the standard panic hook does.
#[track_caller]
pub fn assert_panics<F: FnOnce()>(action: F) -> String {
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(()) => panic!("{NO_PANIC}"),
        Err(payload) => panic_message(&*payload),
    }
}

/// Asserts that `action` panics with a payload of type `P` and returns it.
///
/// Use this with [`std::panic::panic_any`] payloads, or with `String` for
/// formatted `panic!` messages.
#[track_caller]
pub fn assert_panics_with<P, F>(action: F) -> P
where
    P: Any + Send,
    F: FnOnce(),
{
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(()) => panic!(
            "Expected panic payload of type {}, but no panic was raised.",
            type_name::<P>()
        ),
        Err(payload) => match payload.downcast::<P>() {
            Ok(typed) => *typed,
            Err(_) => panic!(
                "Expected panic payload of type {}, but a panic with a different payload was raised.",
                type_name::<P>()
            ),
        },
    }
}

/// Asserts that `future` panics while being polled and returns the panic message.
pub async fn assert_panics_async<Fut: Future>(future: Fut) -> String {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(_) => panic!("{NO_PANIC}"),
        Err(payload) => panic_message(&*payload),
    }
}

/// Asserts that `result` is an error and returns it.
#[track_caller]
pub fn assert_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(value) => panic!("Expected an error, but got Ok({value:?})."),
        Err(error) => error,
    }
}

/// Asserts that `items` yields nothing.
#[track_caller]
pub fn assert_is_empty<I: IntoIterator>(items: I) {
    let count = items.into_iter().count();
    assert!(
        count == 0,
        "Expected empty collection, but there are {count} items"
    );
}

/// Asserts that `items` yields nothing, failing with `message` otherwise.
#[track_caller]
pub fn assert_is_empty_with_message<I: IntoIterator>(items: I, message: &str) {
    assert!(items.into_iter().next().is_none(), "{message}");
}

/// Asserts that two timestamps are identical.
#[track_caller]
pub fn assert_date_times_equal(expected: DateTime<Utc>, actual: DateTime<Utc>) {
    let message = format!(
        "Expected timestamp {}, but actual timestamp is {}",
        expected.format(TIMESTAMP_FORMAT),
        actual.format(TIMESTAMP_FORMAT)
    );
    assert_date_times_within_with_message(expected, actual, TimeDelta::zero(), &message);
}

/// Asserts that two timestamps are identical, failing with `message` otherwise.
#[track_caller]
pub fn assert_date_times_equal_with_message(
    expected: DateTime<Utc>,
    actual: DateTime<Utc>,
    message: &str,
) {
    assert_date_times_within_with_message(expected, actual, TimeDelta::zero(), message);
}

/// Asserts that two timestamps differ by at most `delta`, in either direction.
#[track_caller]
pub fn assert_date_times_within(expected: DateTime<Utc>, actual: DateTime<Utc>, delta: TimeDelta) {
    let message = format!(
        "Expected equal timestamps, but actual timestamp {} differs by more than {} milliseconds from expected timestamp {}",
        actual.format(TIMESTAMP_FORMAT),
        delta.num_milliseconds(),
        expected.format(TIMESTAMP_FORMAT)
    );
    assert_date_times_within_with_message(expected, actual, delta, &message);
}

/// Asserts that two timestamps differ by at most `delta`, failing with `message` otherwise.
#[track_caller]
pub fn assert_date_times_within_with_message(
    expected: DateTime<Utc>,
    actual: DateTime<Utc>,
    delta: TimeDelta,
    message: &str,
) {
    let difference = (expected - actual).abs();
    assert!(difference <= delta.abs(), "{message}");
}
