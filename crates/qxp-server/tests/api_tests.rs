//! HTTP API tests for the QXP server.
//!
//! Each test drives the full router (middleware included) through
//! `tower::ServiceExt::oneshot` over an in-memory draft store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use qxp_core::pricing::PricingConfig;
use qxp_server::build_router;
use qxp_server::state::AppState;
use qxp_storage::{MemoryBackend, StorageBackend};

fn app_with(storage: Arc<dyn StorageBackend>) -> Router {
    build_router(Arc::new(AppState::new(
        storage,
        "qxp",
        PricingConfig::default(),
    )))
}

fn app() -> Router {
    app_with(Arc::new(MemoryBackend::new()))
}

/// A response reduced to what the tests check.
struct Reply {
    status: StatusCode,
    body: Value,
    /// `name=value` of a `Set-Cookie` header, if the server set one.
    cookie: Option<String>,
}

async fn send_as(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_owned());
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Reply {
        status,
        body,
        cookie,
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let reply = send_as(app, method, uri, body, None).await;
    (reply.status, reply.body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

// ── Shell ────────────────────────────────────────────────────────────

#[tokio::test]
async fn shell_is_html_with_security_headers() {
    let res = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::X_FRAME_OPTIONS], "DENY");
    assert_eq!(res.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("hashchange"));
}

#[tokio::test]
async fn shell_routes_without_the_views_api() {
    let app = build_router(Arc::new(AppState::new(
        Arc::new(MemoryBackend::new()),
        "staging",
        PricingConfig::default(),
    )));
    let res = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!html.contains("/v1/views"), "routing must not hit the network");
    assert!(!html.contains("/v1/drafts"), "drafts stay in the browser");
    assert!(html.contains("\"staging_form_\""));
    assert!(html.contains("Simple, transparent pricing"));
    assert!(html.contains("Principal / Head Teacher"));
}

// ── Views ────────────────────────────────────────────────────────────

#[tokio::test]
async fn view_for_pricing_fragment() {
    let (status, body) = get(&app(), "/v1/views?fragment=%23%2Fpricing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"]["view"], "pricing");
    assert_eq!(body["rendered"], "pricing");
    assert_eq!(body["route"]["segments"], json!(["pricing"]));
    assert!(body.get("redirect").is_none());
    assert!(body["html"].as_str().unwrap().contains("data-quote"));
}

#[tokio::test]
async fn view_strips_legacy_prefix_and_keeps_slug() {
    let (_, body) = get(&app(), "/v1/views?fragment=%23%2Fmarketing%2Fsolutions%2Fbursar").await;
    assert_eq!(body["selected"]["view"], "solution");
    assert_eq!(body["selected"]["slug"], "bursar");
    assert_eq!(body["rendered"], "solution");
}

#[tokio::test]
async fn unknown_slug_renders_not_found() {
    let (status, body) = get(&app(), "/v1/views?fragment=%23%2Fsolutions%2Fastronaut").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"]["view"], "solution");
    assert_eq!(body["rendered"], "not_found");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (_, body) = get(&app(), "/v1/views?fragment=%23%2Fnowhere").await;
    assert_eq!(body["selected"]["view"], "not_found");
}

#[tokio::test]
async fn empty_fragment_asks_for_entry_redirect() {
    let (_, body) = get(&app(), "/v1/views?fragment=").await;
    assert_eq!(body["redirect"], "#/marketing");
    assert_eq!(body["selected"]["view"], "home");

    let (_, body) = get(&app(), "/v1/views").await;
    assert_eq!(body["redirect"], "#/marketing");
}

#[tokio::test]
async fn api_responses_are_not_cached() {
    let res = app()
        .oneshot(Request::get("/v1/sys/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
}

// ── Pricing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn tiers_list_all_five() {
    let (status, body) = get(&app(), "/v1/pricing/tiers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currency"], "KES");
    assert_eq!(body["price_per_user_per_term"], 999.0);
    let tiers = body["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 5);
    assert_eq!(tiers[4]["label"], "Enterprise");
    assert!(tiers[4]["max_users"].is_null());
}

#[tokio::test]
async fn quote_applies_large_school_discount() {
    let (status, body) = get(&app(), "/v1/pricing/quote?students=500&staff=40&terms=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 540);
    assert_eq!(body["tier"]["discount_percent"], 10);
    assert_eq!(body["subtotal"], 1_618_380.0);
    assert_eq!(body["discount_amount"], 161_838.0);
    assert_eq!(body["total"], 1_456_542.0);
    assert_eq!(body["formatted"]["total"], "KES 1,456,542");
}

#[tokio::test]
async fn quote_coerces_bad_input() {
    let (status, body) = get(&app(), "/v1/pricing/quote?students=abc&staff=-5&terms=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inputs"]["student_count"], 0);
    assert_eq!(body["inputs"]["staff_count"], 0);
    assert_eq!(body["inputs"]["terms_per_year"], 1);
    assert_eq!(body["total"], 0.0);
}

// ── Drafts ───────────────────────────────────────────────────────────

#[tokio::test]
async fn draft_roundtrip_and_clear() {
    let app = app();

    let first = send_as(&app, Method::GET, "/v1/drafts/contact", None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, json!({}));
    let cookie = first.cookie.expect("new visitor gets a cookie");
    assert!(cookie.starts_with("qxp_visitor="), "{cookie}");
    let me = Some(cookie.as_str());

    let draft = json!({ "name": "Wanjiku", "email": "w@school.ac.ke" });
    let put = send_as(&app, Method::PUT, "/v1/drafts/contact", Some(draft.clone()), me).await;
    assert_eq!(put.status, StatusCode::NO_CONTENT);
    assert!(put.cookie.is_none(), "known visitor is not re-issued a cookie");

    let loaded = send_as(&app, Method::GET, "/v1/drafts/contact", None, me).await;
    assert_eq!(loaded.body, draft);

    let cleared = send_as(&app, Method::DELETE, "/v1/drafts/contact", None, me).await;
    assert_eq!(cleared.status, StatusCode::NO_CONTENT);
    let loaded = send_as(&app, Method::GET, "/v1/drafts/contact", None, me).await;
    assert_eq!(loaded.body, json!({}));
}

#[tokio::test]
async fn drafts_are_isolated_per_form() {
    let app = app();
    let put = send_as(
        &app,
        Method::PUT,
        "/v1/drafts/demo",
        Some(json!({ "role": "teacher" })),
        None,
    )
    .await;
    let me = put.cookie.expect("cookie issued on first write");

    let contact = send_as(&app, Method::GET, "/v1/drafts/contact", None, Some(&me)).await;
    assert_eq!(contact.body, json!({}));
    let demo = send_as(&app, Method::GET, "/v1/drafts/demo", None, Some(&me)).await;
    assert_eq!(demo.body["role"], "teacher");
}

#[tokio::test]
async fn visitors_do_not_see_each_others_drafts() {
    let app = app();
    let draft = json!({ "name": "Wanjiku", "message": "Private note" });

    let alice = send_as(&app, Method::PUT, "/v1/drafts/contact", Some(draft.clone()), None)
        .await
        .cookie
        .expect("alice gets a cookie");

    // A visitor without a cookie starts empty and is issued a different id.
    let stranger = send_as(&app, Method::GET, "/v1/drafts/contact", None, None).await;
    assert_eq!(stranger.body, json!({}));
    let bob = stranger.cookie.expect("bob gets a cookie");
    assert_ne!(bob, alice);

    let as_bob = send_as(&app, Method::GET, "/v1/drafts/contact", None, Some(&bob)).await;
    assert_eq!(as_bob.body, json!({}));

    // Bob clearing his draft leaves Alice's in place.
    send_as(&app, Method::DELETE, "/v1/drafts/contact", None, Some(&bob)).await;
    let as_alice = send_as(&app, Method::GET, "/v1/drafts/contact", None, Some(&alice)).await;
    assert_eq!(as_alice.body, draft);

    // A forged id is treated as a new visitor.
    let forged = send_as(
        &app,
        Method::GET,
        "/v1/drafts/contact",
        None,
        Some("qxp_visitor=alice"),
    )
    .await;
    assert_eq!(forged.body, json!({}));
    assert!(forged.cookie.is_some());
}

#[tokio::test]
async fn corrupt_draft_reads_as_empty() {
    let storage = Arc::new(MemoryBackend::new());
    let visitor = Uuid::new_v4();
    let key = format!("qxp_{}_form_contact", visitor.simple());
    storage.put(&key, b"{not json").await.unwrap();

    let cookie = format!("theme=dark; qxp_visitor={visitor}");
    let reply = send_as(
        &app_with(storage),
        Method::GET,
        "/v1/drafts/contact",
        None,
        Some(&cookie),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({}));
    assert!(reply.cookie.is_none());
}

#[tokio::test]
async fn draft_for_unknown_form_is_404() {
    let (status, body) = get(&app(), "/v1/drafts/careers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn full_storage_surfaces_internal_error() {
    let app = app_with(Arc::new(MemoryBackend::with_quota(16)));
    let draft = json!({ "message": "x".repeat(64) });
    let (status, body) = send(&app, Method::PUT, "/v1/drafts/contact", Some(draft)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
}

// ── Forms ────────────────────────────────────────────────────────────

#[tokio::test]
async fn describe_demo_form() {
    let (status, body) = get(&app(), "/v1/forms/demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["form"], "demo");
    let names: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"role"));
}

#[tokio::test]
async fn validate_accepts_complete_contact() {
    let values = json!({ "name": "Otieno", "email": "o@school.ac.ke", "message": "Hello" });
    let (status, body) =
        send(&app(), Method::POST, "/v1/forms/contact/validate", Some(values)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn validate_rejects_missing_and_bad_values() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/forms/contact/validate",
        Some(json!({ "name": "Otieno", "email": "o@school.ac.ke" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid");

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/forms/demo/validate",
        Some(json!({ "name": "A", "email": "a@b.co", "role": "astronaut" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Sys ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(&app(), "/v1/sys/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
