//! Integration flows.

pub mod atomicity;
pub mod flows;

use dses_registry::{InMemoryLedger, Response};

/// Default incentive token.
pub const INK: &str = "INK";

/// Register `user` from `invoker`, panicking on failure.
pub async fn register_user(ledger: &InMemoryLedger, invoker: &str, user: &str) {
    let response = ledger
        .invoke(invoker, "registerUser", &[user, "test developer"])
        .await;
    assert_ok(&response);
}

/// Register service `name` owned by `owner`, invoked from `invoker`.
pub async fn register_service(ledger: &InMemoryLedger, invoker: &str, name: &str, owner: &str) {
    let response = ledger
        .invoke(invoker, "registerService", &[name, "rest", "a service", owner])
        .await;
    assert_ok(&response);
}

/// Assert an OK response, showing the error message otherwise.
pub fn assert_ok(response: &Response) {
    assert_eq!(
        response.status,
        Response::OK,
        "unexpected failure: {}",
        response.message
    );
}

/// Assert a failed response whose message contains `needle`.
pub fn assert_err_contains(response: &Response, needle: &str) {
    assert_eq!(response.status, Response::ERROR, "unexpected success");
    assert!(
        response.message.contains(needle),
        "message {:?} does not contain {needle:?}",
        response.message
    );
}

/// Decode a JSON payload.
pub fn json(response: &Response) -> serde_json::Value {
    assert_ok(response);
    serde_json::from_slice(&response.payload).unwrap_or(serde_json::Value::Null)
}
