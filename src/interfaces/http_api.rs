use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::application::AppContext;
use crate::interfaces::commands::CommandRouter;

#[derive(Clone)]
pub struct ApiState {
    pub ctx: Arc<AppContext>,
    pub commands: Arc<CommandRouter>,
    pub api_token: Option<String>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/watches", get(list_watches))
        .route("/commands", post(run_command))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[derive(Serialize)]
struct WatchView {
    owner_id: String,
    collection: String,
    target_price: f64,
}

async fn list_watches(State(state): State<ApiState>, headers: HeaderMap) -> impl IntoResponse {
    if let Err((code, msg)) = check_auth(&headers, &state.api_token) {
        return (code, msg).into_response();
    }
    match state.ctx.store.all().await {
        Ok(v) => {
            let out: Vec<WatchView> = v
                .into_iter()
                .map(|w| WatchView {
                    owner_id: w.owner_id,
                    collection: w.collection,
                    target_price: w.target_price.value(),
                })
                .collect();
            Json(out).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {e}")).into_response(),
    }
}

#[derive(Deserialize)]
struct CommandReq {
    user_id: String,
    content: String,
}

async fn run_command(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<CommandReq>,
) -> impl IntoResponse {
    if let Err((code, msg)) = check_auth(&headers, &state.api_token) {
        return (code, msg).into_response();
    }
    if req.user_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "user_id must not be empty".to_string()).into_response();
    }
    match state.commands.route(&req.user_id, &req.content).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn check_auth(headers: &HeaderMap, token: &Option<String>) -> Result<(), (StatusCode, String)> {
    let Some(expected) = token else {
        return Ok(());
    };
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if auth == format!("Bearer {}", expected) {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "unauthorized".to_string()))
    }
}
