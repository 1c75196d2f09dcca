// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location API tests: validation, name uniqueness and the delete guard.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_location, create_test_app, send, today};

#[tokio::test]
async fn test_create_location_returns_row() {
    let (app, _state) = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/locations",
        Some(json!({
            "name": "  Stromovka  ",
            "terrain": "forest",
            "difficulty": "2",
            "note": "flat loop"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Stromovka");
    assert_eq!(body["terrain"], "forest");
    assert_eq!(body["difficulty"], 2);
    assert_eq!(body["note"], "flat loop");
}

#[tokio::test]
async fn test_create_location_validation_fields() {
    let (app, _state) = create_test_app();

    let cases = [
        (json!({"terrain": "road", "difficulty": 1}), "name"),
        (json!({"name": "  ", "terrain": "road", "difficulty": 1}), "name"),
        (json!({"name": "A", "terrain": "beach", "difficulty": 1}), "terrain"),
        (json!({"name": "A", "terrain": "road", "difficulty": 0}), "difficulty"),
        (json!({"name": "A", "terrain": "road", "difficulty": 3.5}), "difficulty"),
    ];

    for (payload, field) in cases {
        let (status, body) = send(&app, "POST", "/api/locations", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["field"], field);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_duplicate_name_any_case_is_conflict() {
    let (app, _state) = create_test_app();
    create_location(&app, "Park").await;

    for name in ["park", "PARK", " pArK "] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/locations",
            Some(json!({"name": name, "terrain": "road", "difficulty": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
        assert!(body.get("field").is_none());
    }
}

#[tokio::test]
async fn test_update_location() {
    let (app, _state) = create_test_app();
    let id = create_location(&app, "Park").await;
    create_location(&app, "Hill").await;

    // Renaming onto another location's name conflicts
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/locations/{}", id),
        Some(json!({"name": "hill", "terrain": "road", "difficulty": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Changing only the case of its own name is fine
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/locations/{}", id),
        Some(json!({"name": "PARK", "terrain": "road", "difficulty": 5, "note": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "PARK");
    assert_eq!(body["difficulty"], 5);
}

#[tokio::test]
async fn test_update_missing_location_is_not_found_before_validation() {
    let (app, _state) = create_test_app();

    let (status, body) = send(&app, "PUT", "/api/locations/999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_location_not_found() {
    let (app, _state) = create_test_app();

    let (status, body) = send(&app, "GET", "/api/locations/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Location not found");

    let (status, _) = send(&app, "GET", "/api/locations/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_locations_newest_first() {
    let (app, _state) = create_test_app();
    let first = create_location(&app, "First").await;
    let second = create_location(&app, "Second").await;

    let (status, body) = send(&app, "GET", "/api/locations", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_delete_unused_location() {
    let (app, _state) = create_test_app();
    let id = create_location(&app, "Park").await;

    let (status, body) = send(&app, "DELETE", &format!("/api/locations/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &format!("/api/locations/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_location_with_activities_is_conflict() {
    let (app, _state) = create_test_app();
    let id = create_location(&app, "Park").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/activities",
        Some(json!({
            "type": "run",
            "date": today(),
            "distance": 5,
            "duration": 30,
            "locationId": id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "DELETE", &format!("/api/locations/{}", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    // Location is still there
    let (status, body) = send(&app, "GET", &format!("/api/locations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Park");
}

#[tokio::test]
async fn test_delete_missing_location() {
    let (app, _state) = create_test_app();

    let (status, _) = send(&app, "DELETE", "/api/locations/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_location_activities() {
    let (app, _state) = create_test_app();
    let park = create_location(&app, "Park").await;
    let hill = create_location(&app, "Hill").await;

    for (location_id, distance) in [(park, 5), (park, 7), (hill, 3)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/activities",
            Some(json!({
                "type": "run",
                "date": "2024-01-15",
                "distance": distance,
                "duration": 30,
                "locationId": location_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", &format!("/api/locations/{}/activities", park), None).await;
    assert_eq!(status, StatusCode::OK);
    let activities = body.as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert!(activities.iter().all(|a| a["locationId"] == park));

    let (status, _) = send(&app, "GET", "/api/locations/999/activities", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
