use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::server::{
    app_middleware::client_id::ClientId, app_response::AppResponse, AppRouter, AppState,
};

pub(super) fn router() -> AppRouter {
    Router::new()
        .route("/download", post(download))
        .route("/api/download", post(download))
}

#[derive(Debug, Deserialize)]
struct DownloadRequest {
    #[serde(default)]
    url: Option<String>,
}

async fn download(
    State(state): State<AppState>,
    ClientId(client_id): ClientId,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> AppResponse {
    let url = match payload {
        Ok(Json(DownloadRequest { url })) => url.unwrap_or_default(),
        Err(e) => {
            debug!("Rejected request body: {e}");
            String::new()
        }
    };

    state.service.handle(&url, &client_id).await.into()
}
