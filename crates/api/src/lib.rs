use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use folio_core::advisor::PortfolioAdvisor;
use folio_core::domain::error::PredictionError;
use folio_core::domain::portfolio::{PortfolioPrediction, StockFeature};
use folio_core::llm::error::LlmDiagnosticsError;

#[derive(Debug, Clone)]
pub struct AppState {
    pub advisor: Arc<PortfolioAdvisor>,
}

impl AppState {
    pub fn new(advisor: PortfolioAdvisor) -> Self {
        Self {
            advisor: Arc::new(advisor),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ai-predict", post(ai_predict))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<StockFeature>,
}

async fn ai_predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PortfolioPrediction>, ApiError> {
    let prediction = state
        .advisor
        .predict(&req.features)
        .await
        .map_err(|err| {
            let status = predict_status(&err);
            report(status, &err, "/ai-predict failed");
            (
                status,
                Json(json!({
                    "success": false,
                    "message": "Error in AI prediction",
                    "error": format!("{err:#}"),
                })),
            )
        })?;

    Ok(Json(prediction))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message_required = || {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message is required"})),
        )
    };

    let Some(message) = req.message.filter(|m| !m.is_empty()) else {
        return Err(message_required());
    };

    match state.advisor.chat(&message).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(err)
            if matches!(
                err.downcast_ref::<PredictionError>(),
                Some(PredictionError::EmptyMessage)
            ) =>
        {
            Err(message_required())
        }
        Err(err) => {
            report(StatusCode::INTERNAL_SERVER_ERROR, &err, "/chat failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal Server Error"})),
            ))
        }
    }
}

/// 400 for caller mistakes, 502 when the model broke the contract or the call failed.
fn predict_status(err: &anyhow::Error) -> StatusCode {
    if let Some(prediction_err) = err.downcast_ref::<PredictionError>() {
        if prediction_err.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::BAD_REQUEST
        }
    } else if err.downcast_ref::<LlmDiagnosticsError>().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn report(status: StatusCode, err: &anyhow::Error, msg: &'static str) {
    if status.is_server_error() {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(%status, error = format!("{err:#}"), "{msg}");
    } else {
        tracing::warn!(%status, error = %err, "{msg}");
    }
}
