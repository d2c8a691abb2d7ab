use std::any::Any;

use app_extractors::service::INTERNAL_ERROR_MESSAGE;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use super::{app_response::AppResponse, AppRouter};

mod download;
mod health;

pub(super) fn router() -> AppRouter {
    Router::new()
        .merge(health::router())
        .merge(download::router())
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(
            |err: Box<dyn Any + Send + 'static>| -> Response<_> {
                let details = err.downcast_ref::<String>().map_or_else(
                    || {
                        err.downcast_ref::<&str>().map_or_else(
                            || "Unknown panic message".to_string(),
                            |s| (*s).to_string(),
                        )
                    },
                    std::clone::Clone::clone,
                );
                error!(%details, "Request handler panicked");

                AppResponse::error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
                    .into_response()
            },
        ))
}

async fn not_found() -> AppResponse {
    AppResponse::not_found()
}
