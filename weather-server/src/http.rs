//! The inbound JSON endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use weather_core::{WeatherError, WeatherService};

#[derive(Debug, Deserialize)]
struct FetchRequest {
    city: String,
    lang: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(&'static str),
    Weather(WeatherError),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self::Weather(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            Self::Weather(err) => (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.message().to_string(),
            ),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/", post(fetch_weather).fallback(invalid_method))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn fetch_weather(
    State(service): State<Arc<WeatherService>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: FetchRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::BadRequest("Invalid request body")
    })?;

    let record = service.fetch(&request.city, request.lang.as_deref()).await?;
    Ok(Json(record).into_response())
}

async fn invalid_method(method: Method) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, format!("Invalid Method {method}"))
}

pub async fn serve(addr: &str, service: Arc<WeatherService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Weather endpoint listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
