//! REST endpoints for the setup flow.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::equipment::presets::{BASKET_PRESETS, BasketPreset, GRINDER_PRESETS};
use crate::error::SetupError;

use super::flow::SetupFlow;
use super::form::{BasketField, GrinderField};

/// Shared state for setup routes.
#[derive(Clone)]
pub struct SetupRouteState {
    pub flow: Arc<SetupFlow>,
}

/// GET /api/setup/status
async fn get_status(State(state): State<SetupRouteState>) -> impl IntoResponse {
    match state.flow.status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => setup_error_response(e),
    }
}

/// GET /api/setup/state
async fn get_state(State(state): State<SetupRouteState>) -> impl IntoResponse {
    Json(state.flow.state().await)
}

#[derive(Deserialize)]
struct GrinderFieldInput {
    field: GrinderField,
    value: String,
}

/// POST /api/setup/grinder/fields
async fn set_grinder_field(
    State(state): State<SetupRouteState>,
    Json(input): Json<GrinderFieldInput>,
) -> impl IntoResponse {
    state.flow.set_grinder_field(input.field, &input.value).await;
    Json(state.flow.state().await)
}

#[derive(Deserialize)]
struct BasketFieldInput {
    field: BasketField,
    value: String,
}

/// POST /api/setup/basket/fields
async fn set_basket_field(
    State(state): State<SetupRouteState>,
    Json(input): Json<BasketFieldInput>,
) -> impl IntoResponse {
    state.flow.set_basket_field(input.field, &input.value).await;
    Json(state.flow.state().await)
}

#[derive(Deserialize)]
struct GrinderPresetInput {
    index: usize,
}

/// POST /api/setup/grinder/preset
async fn apply_grinder_preset(
    State(state): State<SetupRouteState>,
    Json(input): Json<GrinderPresetInput>,
) -> impl IntoResponse {
    match GRINDER_PRESETS.get(input.index) {
        Some(preset) => {
            state.flow.apply_grinder_preset(*preset).await;
            Json(state.flow.state().await).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Unknown grinder preset"})),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct BasketPresetInput {
    preset: BasketPreset,
}

/// POST /api/setup/basket/preset
async fn apply_basket_preset(
    State(state): State<SetupRouteState>,
    Json(input): Json<BasketPresetInput>,
) -> impl IntoResponse {
    state.flow.apply_basket_preset(input.preset).await;
    Json(state.flow.state().await)
}

/// POST /api/setup/next — blocked transitions return the unchanged state.
async fn next_step(State(state): State<SetupRouteState>) -> impl IntoResponse {
    state.flow.advance().await;
    Json(state.flow.state().await)
}

/// POST /api/setup/back
async fn back_step(State(state): State<SetupRouteState>) -> impl IntoResponse {
    state.flow.retreat().await;
    Json(state.flow.state().await)
}

/// POST /api/setup/finalize
async fn finalize(State(state): State<SetupRouteState>) -> impl IntoResponse {
    match state.flow.finalize().await {
        Ok(()) => Json(state.flow.state().await).into_response(),
        Err(e) => setup_error_response(e),
    }
}

/// POST /api/setup/skip
async fn skip(State(state): State<SetupRouteState>) -> impl IntoResponse {
    match state.flow.skip().await {
        Ok(()) => Json(state.flow.state().await).into_response(),
        Err(e) => setup_error_response(e),
    }
}

/// GET /api/setup/presets
async fn list_presets() -> impl IntoResponse {
    let baskets: Vec<_> = BASKET_PRESETS
        .iter()
        .map(|preset| {
            let config = preset.config();
            json!({
                "preset": preset,
                "label": preset.label(),
                "coffee_in_min": config.coffee_in_min,
                "coffee_in_max": config.coffee_in_max,
                "coffee_out_min": config.coffee_out_min,
                "coffee_out_max": config.coffee_out_max,
            })
        })
        .collect();
    Json(json!({
        "grinder": GRINDER_PRESETS,
        "basket": baskets,
    }))
}

fn setup_error_response(err: SetupError) -> axum::response::Response {
    let code = match err {
        SetupError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SetupError::Database(_) | SetupError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(json!({"error": err.user_message()}))).into_response()
}

/// Build the setup REST routes.
pub fn setup_routes(state: SetupRouteState) -> Router {
    Router::new()
        .route("/api/setup/status", get(get_status))
        .route("/api/setup/state", get(get_state))
        .route("/api/setup/presets", get(list_presets))
        .route("/api/setup/grinder/fields", post(set_grinder_field))
        .route("/api/setup/grinder/preset", post(apply_grinder_preset))
        .route("/api/setup/basket/fields", post(set_basket_field))
        .route("/api/setup/basket/preset", post(apply_basket_preset))
        .route("/api/setup/next", post(next_step))
        .route("/api/setup/back", post(back_step))
        .route("/api/setup/finalize", post(finalize))
        .route("/api/setup/skip", post(skip))
        .with_state(state)
}
