//! Fetcher tests against live loopback responders

mod common;

use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, routing::get};
use jsonp_rs::{
    CallbackName, CallbackRegistry, Error, FetcherConfig, JsonpFetcher, Payload, ResponderConfig,
    get_data_jsonp,
};
use serde_json::{Value as JsonValue, json};

fn fetcher() -> JsonpFetcher {
    JsonpFetcher::new(FetcherConfig::default()).unwrap()
}

#[tokio::test]
async fn test_default_callback_resolves_with_payload() {
    let addr = common::spawn_responder(ResponderConfig::default()).await;
    let url = format!("http://{addr}/seismic.jsonp");

    let payload: Payload = fetcher().get_data_jsonp(&url, None).await.unwrap();
    assert_eq!(payload, Payload::new("alice"));
}

#[tokio::test]
async fn test_free_function_with_custom_name() {
    let addr = common::spawn_responder(ResponderConfig::default()).await;
    let url = format!("http://{addr}/seismic.jsonp");

    let data: JsonValue = get_data_jsonp(&url, Some("myHandler")).await.unwrap();
    assert_eq!(data, json!({"name": "alice"}));
}

#[tokio::test]
async fn test_handler_deregistered_after_success() {
    let addr = common::spawn_responder(ResponderConfig::default()).await;
    let url = format!("http://{addr}/seismic.jsonp");
    let f = fetcher();

    let _: Payload = f.get_data_jsonp(&url, None).await.unwrap();
    assert_eq!(f.registry().pending_count(), 0);

    // Same name is free again
    let _: Payload = f.get_data_jsonp(&url, None).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_url_rejects() {
    let addr = common::unused_addr().await;
    let url = format!("http://{addr}/seismic.jsonp");
    let f = fetcher();

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        f.get_data_jsonp::<Payload>(&url, None),
    )
    .await
    .expect("fetch must settle instead of hanging");

    assert!(matches!(result, Err(Error::Load { .. })));
    assert_eq!(f.registry().pending_count(), 0);
}

#[tokio::test]
async fn test_http_error_status_rejects() {
    let addr = common::spawn_responder(ResponderConfig::default()).await;
    let url = format!("http://{addr}/missing.jsonp");

    let result: jsonp_rs::Result<Payload> = fetcher().get_data_jsonp(&url, None).await;
    match result {
        Err(Error::Load { message, .. }) => assert!(message.contains("404")),
        other => panic!("expected load error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_same_name_overlap_rejected_unique_names_succeed() {
    let slow = Router::new().route(
        "/slow.jsonp",
        get(|query: axum::extract::RawQuery| async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let name = query
                .0
                .and_then(|q| q.strip_prefix("callback=").map(str::to_string))
                .unwrap_or_else(|| "callback".to_string());
            common::alice_body(&name)
        }),
    );
    let addr = common::spawn_router(slow).await;
    let url = format!("http://{addr}/slow.jsonp");

    let registry = Arc::new(CallbackRegistry::new());
    let first = JsonpFetcher::with_registry(FetcherConfig::default(), registry.clone()).unwrap();
    let second = JsonpFetcher::with_registry(FetcherConfig::default(), registry.clone()).unwrap();

    let in_flight = {
        let url = url.clone();
        tokio::spawn(async move { first.get_data_jsonp::<Payload>(&url, None).await })
    };

    // Let the first call register
    tokio::time::sleep(Duration::from_millis(50)).await;
    let overlap = second.get_data_jsonp::<Payload>(&url, None).await;
    assert!(matches!(overlap, Err(Error::CallbackInUse(name)) if name == "handleData"));

    assert_eq!(in_flight.await.unwrap().unwrap(), Payload::default());

    let (a, b) = tokio::join!(
        second.fetch_unique::<Payload>(&url),
        second.fetch_unique::<Payload>(&url)
    );
    assert_eq!(a.unwrap(), Payload::default());
    assert_eq!(b.unwrap(), Payload::default());
    assert_eq!(registry.pending_count(), 0);
}

#[tokio::test]
async fn test_body_for_other_callback_rejects() {
    let fixed = Router::new().route(
        "/fixed.jsonp",
        get(|| async { common::alice_body("somethingElse") }),
    );
    let addr = common::spawn_router(fixed).await;
    let url = format!("http://{addr}/fixed.jsonp");
    let f = fetcher();

    let result: jsonp_rs::Result<Payload> = f.get_data_jsonp(&url, None).await;
    assert!(matches!(result, Err(Error::UnregisteredCallback(name)) if name == "somethingElse"));
    assert_eq!(f.registry().pending_count(), 0);
}

#[tokio::test]
async fn test_malformed_body_rejects() {
    let plain = Router::new().route("/plain", get(|| async { "{\"name\": \"alice\"}" }));
    let addr = common::spawn_router(plain).await;

    let result: jsonp_rs::Result<Payload> = fetcher()
        .get_data_jsonp(&format!("http://{addr}/plain"), None)
        .await;
    assert!(matches!(result, Err(Error::Domain(_))));
}

#[tokio::test]
async fn test_timeout_rejects_stalled_responder() {
    let stalled = Router::new().route(
        "/stalled.jsonp",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            (StatusCode::OK, "never")
        }),
    );
    let addr = common::spawn_router(stalled).await;

    let f = JsonpFetcher::new(FetcherConfig::default().with_timeout(Duration::from_millis(100)))
        .unwrap();
    let result: jsonp_rs::Result<Payload> = f
        .get_data_jsonp(&format!("http://{addr}/stalled.jsonp"), None)
        .await;
    assert!(matches!(result, Err(Error::Load { .. })));
}

#[tokio::test]
async fn test_relative_url_with_base_and_plain_json() {
    let addr = common::spawn_responder(ResponderConfig::default()).await;
    let f = JsonpFetcher::new(FetcherConfig::default().with_base_url(format!("http://{addr}/")))
        .unwrap();

    let wrapped: Payload = f
        .fetch("seismic.jsonp", CallbackName::new("cb").unwrap())
        .await
        .unwrap();
    let plain: Payload = f.get_json("/seismic.json").await.unwrap();
    assert_eq!(wrapped, plain);
}
