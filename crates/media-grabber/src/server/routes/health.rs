use std::collections::BTreeMap;

use app_extractors::extractors::StrategySummary;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::server::{AppRouter, AppState};

pub(super) fn router() -> AppRouter {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
    /// Strategies per platform, in the order they are tried
    strategies: BTreeMap<String, Vec<StrategySummary>>,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let strategies = state
        .service
        .orchestrator()
        .platforms()
        .into_iter()
        .map(|(platform, summaries)| (platform.to_string(), summaries))
        .collect();

    Json(Health {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        strategies,
    })
}
