//! Integration tests for the palette and puzzle endpoints.

mod common;

use axum::http::StatusCode;
use common::fixtures::{heart, puzzles};
use common::TestApp;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    common::assert_ok(&response);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_palette_is_classic_by_default() {
    let app = TestApp::new();
    let response = app.get("/api/palette").await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    let indices: Vec<u64> = json["colors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 9]);
    assert_eq!(json["colors"][3]["reference"], "#FE0000");
}

#[tokio::test]
async fn test_list_puzzles() {
    let app = TestApp::new();
    app.open(puzzles::HEART).await;

    let response = app.get("/api/puzzles").await;
    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    let list = json["puzzles"].as_array().unwrap();

    let ids: Vec<&str> = list.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec![puzzles::CLOCK, puzzles::GIFTY, puzzles::HEART, puzzles::SNOWMAN]
    );

    let heart = list.iter().find(|p| p["id"] == puzzles::HEART).unwrap();
    assert_eq!(heart["title"], "Heart");
    assert_eq!(heart["open"], true);
    let clock = list.iter().find(|p| p["id"] == puzzles::CLOCK).unwrap();
    assert_eq!(clock["open"], false);
}

#[tokio::test]
async fn test_open_returns_session_state() {
    let app = TestApp::new();
    let json = app.open(puzzles::HEART).await;

    assert_eq!(json["puzzle_id"], puzzles::HEART);
    assert_eq!(json["width"], heart::WIDTH);
    assert_eq!(json["height"], heart::HEIGHT);
    assert_eq!(json["selected"], 1);
    assert_eq!(json["overall"]["total"], heart::PAINTABLE);
    assert_eq!(json["overall"]["painted"], 0);
    assert_eq!(json["complete"], false);
    assert!(json.get("saved_at").is_none());
}

#[tokio::test]
async fn test_open_unknown_puzzle() {
    let app = TestApp::new();
    let response = app
        .post(&format!("/api/puzzles/{}/open", puzzles::UNKNOWN))
        .await;
    let message = common::assert_api_error(&response, StatusCode::NOT_FOUND);
    assert_eq!(message, "Unknown puzzle: dragon");
}

#[tokio::test]
async fn test_state_before_open_is_conflict() {
    let app = TestApp::new();
    let response = app.get(&format!("/api/puzzles/{}", puzzles::HEART)).await;
    common::assert_api_error(&response, StatusCode::CONFLICT);

    let response = app.get(&format!("/api/puzzles/{}/grid", puzzles::HEART)).await;
    common::assert_api_error(&response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_grid_background_and_artwork() {
    let app = TestApp::new();
    app.open(puzzles::HEART).await;
    let grid = app.grid(puzzles::HEART).await;

    let target: Vec<u64> = grid["target"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect();
    assert_eq!(target.len(), heart::WIDTH * heart::HEIGHT);

    let count = |i: u64| target.iter().filter(|&&c| c == i).count();
    assert_eq!(count(4), heart::RED);
    assert_eq!(count(5), heart::WHITE);
    assert_eq!(count(9), heart::BLACK);
    assert_eq!(count(0), heart::WIDTH * heart::HEIGHT - heart::PAINTABLE);

    // The whole border is background
    for x in 0..heart::WIDTH {
        assert_eq!(target[x], 0);
        assert_eq!(target[(heart::HEIGHT - 1) * heart::WIDTH + x], 0);
    }
    assert!(grid["painted"].as_array().unwrap().iter().all(|v| v == 0));
}

#[tokio::test]
async fn test_transparent_border_puzzle() {
    let app = TestApp::new();
    let json = app.open(puzzles::GIFTY).await;
    assert_eq!(json["overall"]["total"], 126);

    // Snowman has no background: its blue sky touches every border
    let json = app.open(puzzles::SNOWMAN).await;
    assert_eq!(json["overall"]["total"], 256);
}

#[tokio::test]
async fn test_close() {
    let app = TestApp::new();
    app.open(puzzles::HEART).await;

    let response = app
        .post(&format!("/api/puzzles/{}/close", puzzles::HEART))
        .await;
    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["closed"], true);

    let response = app
        .post(&format!("/api/puzzles/{}/close", puzzles::HEART))
        .await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["closed"], false);

    let response = app.get(&format!("/api/puzzles/{}", puzzles::HEART)).await;
    common::assert_api_error(&response, StatusCode::CONFLICT);
}
