#[allow(unused)]
mod support;

use axum::{
    extract::Query,
    http::{Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use support::*;

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    let (status, body) = app.get("/health").await?;
    assert_status(status, StatusCode::OK, "health");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "sportmap");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    let (_, headers, _) = app.request(Method::GET, "/equipements", None).await?;

    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(!headers.contains_key("strict-transport-security"));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    let (status, body) = app.get("/nope").await?;
    assert_status(status, StatusCode::NOT_FOUND, "fallback");
    assert_error_kind(&body, "not-found");
    Ok(())
}

#[tokio::test]
async fn metrics_are_exposed_as_text() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    app.get("/equipements").await?;

    let (status, headers, body) = app.request(Method::GET, "/metrics", None).await?;
    assert_status(status, StatusCode::OK, "metrics");
    assert!(headers["content-type"]
        .to_str()?
        .starts_with("text/plain"));
    let text = String::from_utf8(body.to_vec())?;
    assert!(text.contains("sportmap_http_requests_total"));
    assert!(text.contains("sportmap_server_info"));
    Ok(())
}

#[tokio::test]
async fn metric_path_labels_use_route_templates() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    for i in 0..5 {
        let (status, _) = app.get(&format!("/junk-{i}/x")).await?;
        assert_status(status, StatusCode::NOT_FOUND, "fallback");
    }
    app.get("/equipements/abc").await?;
    app.get("/equipements/4242").await?;

    let (_, _, body) = app.request(Method::GET, "/metrics", None).await?;
    let text = String::from_utf8(body.to_vec())?;
    assert!(!text.contains("junk-"), "raw fallback paths leaked into labels");
    assert!(!text.contains("/equipements/abc"));
    assert!(!text.contains("/equipements/4242"));
    assert!(text.contains(r#"path="unmatched""#));
    assert!(text.contains(r#"path="/equipements/:id""#));
    Ok(())
}

/// Nominatim stand-in: `q=slow` stalls, `q=broken` answers 503.
async fn stub_search(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("q").map(String::as_str) {
        Some("slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, Json(json!([])))
        }
        Some("broken") => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
        _ => (
            StatusCode::OK,
            Json(json!([
                {
                    "lat": "48.8566",
                    "lon": "2.3522",
                    "display_name": "Paris, Île-de-France, France",
                    "importance": 0.9,
                    "address": { "city": "Paris", "postcode": "75001", "country": "France" }
                },
                {
                    "lat": "48.4044",
                    "lon": "2.7016",
                    "display_name": "Fontainebleau, Seine-et-Marne, France",
                    "importance": 0.6,
                    "address": { "town": "Fontainebleau", "postcode": "77300", "country": "France" }
                }
            ])),
        ),
    }
}

async fn app_with_stub_provider() -> anyhow::Result<TestApp> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let stub = Router::new().route("/search", get(stub_search));
    tokio::spawn(async move {
        let _ = axum::serve(listener, stub).await;
    });

    TestApp::new_with_config(|config| {
        config.geocoding.provider_url = format!("http://{addr}/search");
        config.geocoding.timeout_seconds = 1;
    })
}

#[tokio::test]
async fn geocode_maps_provider_candidates() -> anyhow::Result<()> {
    let app = app_with_stub_provider().await?;
    let (status, body) = app.get("/location/geocode?query=%20Paris%20").await?;
    assert_status(status, StatusCode::OK, "geocode");
    assert_eq!(body["query"], "Paris");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["provider"], "nominatim");
    assert_eq!(body["data"][0]["lat"], 48.8566);
    assert_eq!(body["data"][0]["city"], "Paris");
    assert_eq!(body["data"][1]["city"], "Fontainebleau");
    assert_eq!(body["data"][1]["displayName"], "Fontainebleau, Seine-et-Marne, France");
    Ok(())
}

#[tokio::test]
async fn geocode_requires_a_query() -> anyhow::Result<()> {
    let app = TestApp::new()?;
    for path in ["/location/geocode", "/location/geocode?query=%20%20"] {
        let (status, body) = app.get(path).await?;
        assert_status(status, StatusCode::BAD_REQUEST, path);
        assert_error_kind(&body, "validation");
    }
    Ok(())
}

#[tokio::test]
async fn geocode_surfaces_provider_failures() -> anyhow::Result<()> {
    let app = app_with_stub_provider().await?;

    let (status, body) = app.get("/location/geocode?query=broken").await?;
    assert_status(status, StatusCode::BAD_GATEWAY, "provider 503");
    assert_error_kind(&body, "upstream");

    let (status, body) = app.get("/location/geocode?query=slow").await?;
    assert_status(status, StatusCode::GATEWAY_TIMEOUT, "provider timeout");
    assert_error_kind(&body, "upstream-timeout");
    Ok(())
}
