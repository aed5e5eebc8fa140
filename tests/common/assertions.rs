//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert an error response with the JSON error body
pub fn assert_api_error(response: &TestResponse, expected: StatusCode) -> String {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}. Full response: {}",
        expected.as_u16(),
        serde_json::to_string_pretty(&json).unwrap()
    );
    json["error"]
        .as_str()
        .expect("Expected error message")
        .to_string()
}

/// Assert painted cells only ever hold their target color
pub fn assert_painted_matches_target(grid: &serde_json::Value) {
    let target = grid["target"].as_array().expect("target array");
    let painted = grid["painted"].as_array().expect("painted array");
    assert_eq!(target.len(), painted.len());
    for (i, (t, p)) in target.iter().zip(painted).enumerate() {
        assert!(
            p == 0 || p == t,
            "cell {i} painted {p} but target is {t}"
        );
    }
}
