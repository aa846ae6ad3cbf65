//! Integration Tests - Service Chain, Metrics and HTTP Transport
//!
//! Exercises the decorators over mock and real inner services, real
//! Prometheus collectors under concurrency, and the axum router end to
//! end. Uses mockall for trait mocking and tokio::test for async tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockall::mock;
use mockall::predicate::*;
use tower::ServiceExt;

use stringsvc::adapters::http::{ApiServer, Endpoints};
use stringsvc::adapters::metrics::{HealthState, MetricsRegistry};
use stringsvc::config::MetricsConfig;
use stringsvc::domain::{StringError, Strings};
use stringsvc::middleware::{self, InstrumentingMiddleware, Layer, LayerDeps, LoggingMiddleware};
use stringsvc::ports::string_service::{RequestContext, StringService};

// ---- Mock Definitions ----

mock! {
    pub Svc {}

    impl StringService for Svc {
        fn uppercase(&self, ctx: &RequestContext, text: &str) -> Result<String, StringError>;
        fn count(&self, ctx: &RequestContext, text: &str) -> usize;
    }
}

// ---- Helpers ----

fn registry() -> MetricsRegistry {
    MetricsRegistry::new(&MetricsConfig::default()).unwrap()
}

fn calls(metrics: &MetricsRegistry, method: &str, error: &str) -> u64 {
    metrics
        .request_count
        .with_label_values(&[method, error])
        .get()
}

fn full_stack(metrics: &MetricsRegistry) -> Box<dyn StringService> {
    let deps = LayerDeps {
        collectors: Some(metrics.collectors()),
        log_sink: None,
    };
    middleware::compose(Strings, &[Layer::Logging, Layer::Instrumenting], &deps).unwrap()
}

// ---- Decorator pass-through ----

#[test]
fn test_decorators_pass_inner_results_through_unchanged() {
    let mut inner = MockSvc::new();
    inner
        .expect_uppercase()
        .with(always(), eq("x"))
        .times(1)
        .returning(|_, _| Ok("not actually uppercase".to_string()));
    inner
        .expect_uppercase()
        .with(always(), eq("y"))
        .times(1)
        .returning(|_, _| Err(StringError::EmptyInput));
    inner
        .expect_count()
        .times(1)
        .returning(|_, _| 42);

    let metrics = registry();
    let svc = LoggingMiddleware::new(InstrumentingMiddleware::new(inner, metrics.collectors()));
    let ctx = RequestContext::new();

    assert_eq!(
        svc.uppercase(&ctx, "x"),
        Ok("not actually uppercase".to_string())
    );
    assert_eq!(svc.uppercase(&ctx, "y"), Err(StringError::EmptyInput));
    assert_eq!(svc.count(&ctx, "anything"), 42);

    assert_eq!(calls(&metrics, "uppercase", "false"), 1);
    assert_eq!(calls(&metrics, "uppercase", "true"), 1);
    assert_eq!(calls(&metrics, "count", "false"), 1);
    assert_eq!(metrics.count_result.get_sample_count(), 1);
    assert!((metrics.count_result.get_sample_sum() - 42.0).abs() < f64::EPSILON);
}

#[test]
fn test_context_reaches_core_untouched() {
    let ctx = RequestContext::new();
    let expected = ctx.request_id;

    let mut inner = MockSvc::new();
    inner
        .expect_count()
        .withf(move |c, _| c.request_id == expected)
        .times(1)
        .returning(|_, _| 0);

    let metrics = registry();
    let svc = InstrumentingMiddleware::new(LoggingMiddleware::new(inner), metrics.collectors());
    assert_eq!(svc.count(&ctx, ""), 0);
}

#[test]
fn test_any_order_matches_bare_core() {
    let metrics = registry();
    let deps = LayerDeps {
        collectors: Some(metrics.collectors()),
        log_sink: None,
    };
    let orders: [&[Layer]; 4] = [
        &[],
        &[Layer::Logging, Layer::Instrumenting],
        &[Layer::Instrumenting, Layer::Logging],
        &[Layer::Instrumenting, Layer::Instrumenting, Layer::Logging],
    ];
    let ctx = RequestContext::new();

    for layers in orders {
        let svc = middleware::compose(Strings, layers, &deps).unwrap();
        for input in ["hello", "", "héllo", "ß"] {
            assert_eq!(svc.uppercase(&ctx, input), Strings.uppercase(&ctx, input));
            assert_eq!(svc.count(&ctx, input), Strings.count(&ctx, input));
        }
    }
}

// ---- Instrumentation counts ----

#[test]
fn test_uppercase_counter_reads_n_and_m() {
    let metrics = registry();
    let svc = full_stack(&metrics);
    let ctx = RequestContext::new();

    for _ in 0..7 {
        svc.uppercase(&ctx, "hello").unwrap();
    }
    for _ in 0..3 {
        assert!(svc.uppercase(&ctx, "").is_err());
    }

    assert_eq!(calls(&metrics, "uppercase", "false"), 7);
    assert_eq!(calls(&metrics, "uppercase", "true"), 3);
    assert_eq!(
        metrics
            .request_latency
            .with_label_values(&["uppercase", "false"])
            .get_sample_count(),
        7
    );
}

#[test]
fn test_count_is_labelled_count_not_uppercase() {
    let metrics = registry();
    let svc = full_stack(&metrics);
    let ctx = RequestContext::new();

    assert_eq!(svc.count(&ctx, "hello"), 5);
    assert_eq!(svc.count(&ctx, ""), 0);

    assert_eq!(calls(&metrics, "count", "false"), 2);
    assert_eq!(calls(&metrics, "uppercase", "false"), 0);
    assert_eq!(metrics.count_result.get_sample_count(), 2);
    assert!((metrics.count_result.get_sample_sum() - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_concurrent_calls_never_lose_increments() {
    const THREADS: usize = 8;
    const CALLS: usize = 500;

    let metrics = registry();
    let svc: Arc<dyn StringService> = Arc::from(full_stack(&metrics));

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let svc = Arc::clone(&svc);
            scope.spawn(move || {
                let ctx = RequestContext::new();
                for i in 0..CALLS {
                    let input = if (t + i) % 5 == 0 { "" } else { "abc" };
                    let _ = svc.uppercase(&ctx, input);
                    svc.count(&ctx, input);
                }
            });
        }
    });

    let total = (THREADS * CALLS) as u64;
    assert_eq!(
        calls(&metrics, "uppercase", "false") + calls(&metrics, "uppercase", "true"),
        total
    );
    assert_eq!(calls(&metrics, "count", "false"), total);
    assert_eq!(metrics.count_result.get_sample_count(), total);
}

// ---- HTTP transport ----

fn app(metrics: &MetricsRegistry) -> (axum::Router, HealthState) {
    let health = HealthState::new();
    let endpoints = Endpoints::new(Arc::from(full_stack(metrics)));
    let server = ApiServer::new(endpoints, health.clone(), "127.0.0.1:0".to_string());
    (server.router(), health)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_http_uppercase() {
    let metrics = registry();
    let (router, _) = app(&metrics);

    let resp = router
        .oneshot(post_json("/uppercase", r#"{"s":"hello"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({ "v": "HELLO" }));
}

#[tokio::test]
async fn test_http_uppercase_empty_reports_err_field() {
    let metrics = registry();
    let (router, _) = app(&metrics);

    let resp = router
        .oneshot(post_json("/uppercase", r#"{"s":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "v": "", "err": "empty string" })
    );
    assert_eq!(calls(&metrics, "uppercase", "true"), 1);
}

#[tokio::test]
async fn test_http_count() {
    let metrics = registry();
    let (router, _) = app(&metrics);

    let resp = router
        .oneshot(post_json("/count", r#"{"s":"héllo"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({ "v": 5 }));
}

#[tokio::test]
async fn test_http_malformed_body_is_rejected_before_service() {
    let metrics = registry();
    let (router, _) = app(&metrics);

    let resp = router
        .clone()
        .oneshot(post_json("/count", "{not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/uppercase")
        .body(Body::from(r#"{"s":"a"}"#))
        .unwrap();
    let resp = router.oneshot(no_content_type).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(calls(&metrics, "count", "false"), 0);
    assert_eq!(calls(&metrics, "uppercase", "false"), 0);
}

#[tokio::test]
async fn test_http_readiness_flips_on_shutdown() {
    let metrics = registry();
    let (router, health) = app(&metrics);

    let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let resp = router.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    health.mark_shutting_down();

    let resp = router.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let resp = router.oneshot(get("/live")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_exports_call_series() {
    let metrics = Arc::new(registry());
    let (router, _) = app(&metrics);

    router
        .oneshot(post_json("/count", r#"{"s":"abc"}"#))
        .await
        .unwrap();

    let resp = Arc::clone(&metrics)
        .router()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let series = text
        .lines()
        .find(|l| l.starts_with("my_group_string_service_request_count{"))
        .unwrap();
    assert!(series.contains(r#"method="count""#));
    assert!(series.contains(r#"error="false""#));
    assert!(series.ends_with(" 1"));
    assert!(text.contains("my_group_string_service_count_result_sum 3"));
}
