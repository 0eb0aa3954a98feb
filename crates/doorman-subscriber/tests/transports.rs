// Copyright 2025 The Doorman Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end transport tests against an in-process HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use doorman::{DistributionUpdate, Doorman, Probability};
use doorman_subscriber::{
    DiscoverySubscriber, HttpSubscriber, HttpSubscriberConfig, QueueSubscriber, Subscriber,
    SubscriberError,
};

/// base64-url of 16 zero bytes.
const ZERO_ID: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn probs(specs: &[&str]) -> Vec<Probability> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}

fn update(timestamp: i64, specs: &[&str]) -> DistributionUpdate {
    DistributionUpdate {
        id: ZERO_ID.to_string(),
        timestamp,
        probabilities: probs(specs),
    }
}

fn fast_config() -> HttpSubscriberConfig {
    HttpSubscriberConfig { poll_interval_ms: 25, request_timeout_ms: 1_000 }
}

/// Serves the router on an ephemeral port and returns the base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn wait_until(mut reached: impl FnMut() -> bool) {
    for _ in 0..200 {
        if reached() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("condition not reached within 5s");
}

#[tokio::test]
async fn http_subscriber_drives_the_engine() {
    init_tracing();
    let served = update(2, &["1/2", "1/4", "1/4"]);
    let app = Router::new().route(
        "/status",
        get(move || {
            let served = served.clone();
            async move { Json(served) }
        }),
    );
    let base = serve(app).await;

    let doorman = Arc::new(Doorman::new(ZERO_ID, probs(&["1/3", "1/3", "1/3"])).unwrap());
    let subscriber = HttpSubscriber::with_config(format!("{base}/status"), fast_config());
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();

    let engine = Arc::clone(&doorman);
    wait_until(move || engine.version() == 2).await;
    assert_eq!(doorman.probabilities(), probs(&["1/2", "1/4", "1/4"]));
}

#[tokio::test]
async fn http_fetch_reports_bad_statuses() {
    init_tracing();
    let app = Router::new().route(
        "/status",
        get(|| async { (axum::http::StatusCode::NOT_FOUND, "gone") }),
    );
    let base = serve(app).await;

    let subscriber = HttpSubscriber::with_config(format!("{base}/status"), fast_config());
    let err = subscriber.fetch().await.unwrap_err();
    assert!(matches!(err, SubscriberError::Status { status: 404, .. }));
}

#[tokio::test]
async fn invalid_updates_never_reach_the_distribution() {
    init_tracing();
    // sums to 0.75: the engine must reject it on every poll
    let served = update(2, &["1/2", "1/4"]);
    let app = Router::new().route(
        "/status",
        get(move || {
            let served = served.clone();
            async move { Json(served) }
        }),
    );
    let base = serve(app).await;

    let doorman = Arc::new(Doorman::new(ZERO_ID, probs(&["1/2", "1/2"])).unwrap());
    let subscriber = HttpSubscriber::with_config(format!("{base}/status"), fast_config());
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();

    // let several polls happen
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(doorman.version(), 0);
    assert_eq!(doorman.probabilities(), probs(&["1/2", "1/2"]));
}

#[tokio::test]
async fn queue_subscriber_decodes_and_forwards_frames() {
    init_tracing();
    let doorman = Arc::new(Doorman::new(ZERO_ID, probs(&["1/2", "1/2"])).unwrap());
    let (frames, subscriber) = QueueSubscriber::channel(8);
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();

    let send = |message: &DistributionUpdate| {
        Bytes::from(serde_json::to_vec(message).unwrap())
    };
    frames.send(send(&update(2, &["1/4", "3/4"]))).await.unwrap();
    let engine = Arc::clone(&doorman);
    wait_until(move || engine.version() == 2).await;

    // garbage and invalid messages are dropped without touching the engine
    frames.send(Bytes::from_static(b"not json")).await.unwrap();
    frames.send(send(&update(3, &["1/2", "1/4"]))).await.unwrap();
    frames.send(send(&update(4, &["3/4", "1/4"]))).await.unwrap();

    let engine = Arc::clone(&doorman);
    wait_until(move || engine.version() == 4).await;
    assert_eq!(doorman.probabilities(), probs(&["3/4", "1/4"]));
}

#[tokio::test]
async fn queue_subscriber_starts_only_once() {
    init_tracing();
    let doorman = Arc::new(Doorman::new(ZERO_ID, vec![]).unwrap());
    let (_frames, subscriber) = QueueSubscriber::channel(1);
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();
    let err = subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap_err();
    assert!(matches!(err, SubscriberError::AlreadySubscribed));
}

fn discovery_app(message_queue: &str, served: DistributionUpdate) -> Router {
    let spec = serde_json::json!({
        "hostname": "127.0.0.1",
        "port": 0,
        "message_queue": message_queue,
    });
    Router::new()
        .route(
            "/api/server",
            get(move || {
                let spec = spec.clone();
                async move { Json(spec) }
            }),
        )
        .route(
            "/api/doormen/:id/status",
            get(move || {
                let served = served.clone();
                async move { Json(served) }
            }),
        )
}

#[tokio::test]
async fn discovery_seeds_initial_state_before_polling() {
    init_tracing();
    let app = discovery_app("http", update(3, &["1/4", "1/2", "1/4"]));
    let base = serve(app).await;

    let doorman = Arc::new(Doorman::new(ZERO_ID, vec![]).unwrap());
    assert!(doorman.validate().is_err());

    let subscriber = DiscoverySubscriber::with_config(base.as_str(), fast_config());
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();

    // the initial state is applied synchronously during subscribe
    assert_eq!(doorman.version(), 3);
    assert!(doorman.validate().is_ok());
    assert_eq!(doorman.probabilities(), probs(&["1/4", "1/2", "1/4"]));
}

#[tokio::test]
async fn discovery_falls_back_to_http_for_unknown_transports() {
    init_tracing();
    let app = discovery_app("nanomsg", update(7, &["1/2", "1/2"]));
    let base = serve(app).await;

    let doorman = Arc::new(Doorman::new(ZERO_ID, vec![]).unwrap());
    let subscriber = DiscoverySubscriber::with_config(base.as_str(), fast_config());
    subscriber
        .subscribe(ZERO_ID, doorman.update_handler())
        .await
        .unwrap();

    assert_eq!(doorman.version(), 7);
    assert_eq!(doorman.probabilities(), probs(&["1/2", "1/2"]));
}
