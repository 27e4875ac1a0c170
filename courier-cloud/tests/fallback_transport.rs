//! Default channel wiring against an in-process gateway

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use common::*;
use courier_cloud::config::ChannelConfig;
use courier_cloud::state::build_channel;
use courier_cloud::webhook::NoopBroadcaster;
use serde_json::{Value, json};
use shared::models::{CustomerDetail, NotificationStatus, OrderUpdate};

async fn spawn_gateway(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn hang() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"id": "too-late"}))
}

async fn accept(State(calls): State<Arc<AtomicUsize>>) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"id": "fallback-ok"}))
}

fn channel_config(base_url: String) -> ChannelConfig {
    ChannelConfig {
        base_url,
        api_token: Some("secret-token".into()),
        send_path: "/api/send-message".into(),
        fallback_path: Some("/api/messages".into()),
    }
}

#[tokio::test]
async fn hanging_primary_route_falls_back_to_secondary() {
    let fallback_calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_gateway(
        Router::new()
            .route("/api/send-message", post(hang))
            .route("/api/messages", post(accept))
            .with_state(fallback_calls.clone()),
    )
    .await;

    let channel = build_channel(&channel_config(base), &fast_config()).unwrap();
    let store = seeded_store();
    let pipeline = pipeline(&store, channel, Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Confirmed"))
        .await
        .unwrap();

    let customer = &resp.notifications.customer;
    assert!(customer.attempted && customer.success, "{customer:?}");
    match &customer.detail {
        CustomerDetail::Sent { message_id, .. } => {
            assert_eq!(message_id.as_deref(), Some("fallback-ok"));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.notifications()[0].status, NotificationStatus::Sent);
}

#[tokio::test]
async fn hanging_routes_fail_once_every_strategy_is_spent() {
    let base = spawn_gateway(
        Router::new()
            .route("/api/send-message", post(hang))
            .route("/api/messages", post(hang)),
    )
    .await;

    let channel = build_channel(&channel_config(base), &fast_config()).unwrap();
    let store = seeded_store();
    let pipeline = pipeline(&store, channel, Arc::new(NoopBroadcaster));

    let resp = pipeline
        .perform_transition("O1", OrderUpdate::status("Confirmed"))
        .await
        .unwrap();

    let customer = &resp.notifications.customer;
    assert!(customer.attempted && !customer.success);
    assert_eq!(store.notifications()[0].status, NotificationStatus::Failed);
}
