//! Outbound HTTP tests: the email function client and the address API client,
//! both against a local mock server.

#![cfg(feature = "ssr")]

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use interphone::backend::geocode::Geocoder;
use interphone::backend::notify::{DispatchError, HttpFunctionDispatcher, NotificationDispatcher};
use interphone::shared::intercom::notification::{compose_declined, compose_ring};
use interphone::shared::intercom::Disclosure;

const FUNCTION_PATH: &str = "/functions/v1/send-notification-email";

#[tokio::test]
async fn test_dispatch_posts_payload_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FUNCTION_PATH))
        .and(header("authorization", "Bearer service-key"))
        .and(body_partial_json(json!({ "to": "owner@example.fr", "type": "notification" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher =
        HttpFunctionDispatcher::new(format!("{}{}", server.uri(), FUNCTION_PATH), Some("service-key".to_string()))
            .unwrap();
    let email = compose_ring("owner@example.fr", "Livreur", "Famille Martin", "Colis", &Disclosure::default());

    assert_ok!(dispatcher.dispatch(&email).await);
}

#[tokio::test]
async fn test_dispatch_surfaces_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FUNCTION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dispatcher = HttpFunctionDispatcher::new(format!("{}{}", server.uri(), FUNCTION_PATH), None).unwrap();
    let email = compose_declined("visitor@example.fr", "Famille Martin");

    assert_matches!(
        dispatcher.dispatch(&email).await,
        Err(DispatchError::Rejected { status: 500, ref body }) if body == "boom"
    );
}

#[tokio::test]
async fn test_dispatch_unsuccessful_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(FUNCTION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let dispatcher = HttpFunctionDispatcher::new(format!("{}{}", server.uri(), FUNCTION_PATH), None).unwrap();
    let email = compose_declined("visitor@example.fr", "Famille Martin");

    assert_err!(dispatcher.dispatch(&email).await, DispatchError::Unsuccessful);
}

#[tokio::test]
async fn test_geocoder_maps_features() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", "8 rue de rivoli"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [2.3522, 48.8566] },
                "properties": {
                    "id": "75104_8158_00008",
                    "label": "8 Rue de Rivoli 75004 Paris",
                    "housenumber": "8",
                    "street": "Rue de Rivoli",
                    "postcode": "75004",
                    "city": "Paris",
                    "citycode": "75104",
                    "score": 0.96
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(server.uri());
    let candidates = assert_ok!(geocoder.search("  8 rue de rivoli ").await);

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].address.ban_id, "75104_8158_00008");
    assert_eq!(candidates[0].address.city, "Paris");
    assert_eq!(candidates[0].address.latitude, Some(48.8566));
}

#[tokio::test]
async fn test_geocoder_upstream_error_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(server.uri());
    let err = geocoder.search("rue de la paix").await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_address_route_proxies_geocoder() {
    use axum::http::Method;
    use interphone::backend::AppState;
    use interphone::shared::AppConfig;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "features": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig::builder().geocode_base_url(server.uri()).build().unwrap();
    let app = common::test_app_with(AppState::for_config(config));

    let (status, body) = common::send(
        &app,
        common::json_request(Method::GET, "/api/addresses/search?q=place%20bellecour", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
