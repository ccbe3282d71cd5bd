mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use floorwatch::domain::Theme;
use floorwatch::interfaces::commands::CommandRouter;
use floorwatch::interfaces::http_api::{build_router, ApiState};

use common::harness;

#[tokio::test]
async fn missing_arguments_get_usage_reply_without_lookup() {
    let h = harness();
    let router = CommandRouter::new(Arc::clone(&h.ctx), "--");

    let reply = router.route("u1", "--notify cool-cats").await.unwrap();

    assert_eq!(reply.title, "Error");
    assert_eq!(reply.color, Theme::default().error);
    assert_eq!(reply.fields[0].value, "--notify [collection] [floor_price]");
    assert_eq!(reply.fields[1].value, "2");
    assert!(h.provider.calls().is_empty());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn unrelated_text_is_ignored() {
    let h = harness();
    let router = CommandRouter::new(Arc::clone(&h.ctx), "--");

    assert!(router.route("u1", "hello there").await.is_none());
    assert!(router.route("u1", "--unknown a b").await.is_none());
    assert!(router.route("u1", "--").await.is_none());
    assert!(router.route("u1", "-- notify cool-cats 2.5").await.is_none());
    assert!(router.route("u1", " --notify cool-cats 2.5").await.is_none());
    assert!(h.provider.calls().is_empty());
}

#[tokio::test]
async fn notify_registers_and_replies() {
    let h = harness();
    h.provider.set_price("cool-cats", 3.0);
    let router = CommandRouter::new(Arc::clone(&h.ctx), "--");

    let reply = router.route("u1", "--notify cool-cats 2.5 extra").await.unwrap();

    assert_eq!(reply.title, "Notify");
    assert_eq!(reply.fields[0].name, "Success");
    assert!(reply.fields[0].value.contains("2.5 ETH"));
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn notify_below_target_shows_current_price() {
    let h = harness();
    h.provider.set_price("rare-apes", 0.5);
    let router = CommandRouter::new(Arc::clone(&h.ctx), "--");

    let reply = router.route("u2", "--notify rare-apes 1.0").await.unwrap();

    let text = reply.to_plain_text();
    assert!(text.contains("0.5 ETH"));
    assert!(text.contains("already below 1.0 ETH"));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn bad_price_gets_error_reply() {
    let h = harness();
    h.provider.set_price("cool-cats", 3.0);
    let router = CommandRouter::new(Arc::clone(&h.ctx), "--");

    let reply = router.route("u1", "--notify cool-cats lots").await.unwrap();

    assert_eq!(reply.title, "Error");
    assert!(reply.to_plain_text().contains("invalid argument"));
    assert!(h.store.is_empty());
}

fn api(h: &common::Harness, token: Option<&str>) -> axum::Router {
    build_router(ApiState {
        ctx: Arc::clone(&h.ctx),
        commands: Arc::new(CommandRouter::new(Arc::clone(&h.ctx), "--")),
        api_token: token.map(str::to_string),
    })
}

fn post_command(body: &str, auth: Option<&str>) -> Request<Body> {
    let mut req = Request::post("/commands").header("content-type", "application/json");
    if let Some(a) = auth {
        req = req.header("authorization", a);
    }
    req.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn http_command_round_trip() {
    let h = harness();
    h.provider.set_price("cool-cats", 3.0);
    let app = api(&h, None);

    let resp = app
        .clone()
        .oneshot(post_command(
            r#"{"user_id":"u1","content":"--notify cool-cats 2.5"}"#,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let reply: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(reply["title"], "Notify");

    let resp = app
        .oneshot(Request::get("/watches").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let watches: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        watches,
        serde_json::json!([{"owner_id":"u1","collection":"cool-cats","target_price":2.5}])
    );
}

#[tokio::test]
async fn http_ignored_text_is_no_content() {
    let h = harness();
    let resp = api(&h, None)
        .oneshot(post_command(r#"{"user_id":"u1","content":"gm"}"#, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn http_token_guards_everything_but_health() {
    let h = harness();
    let app = api(&h, Some("secret"));

    let resp = app
        .clone()
        .oneshot(post_command(r#"{"user_id":"u1","content":"gm"}"#, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(post_command(
            r#"{"user_id":"u1","content":"gm"}"#,
            Some("Bearer secret"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
