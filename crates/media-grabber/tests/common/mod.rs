#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use app_extractors::{
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, StrategyEntry},
    MediaService, Orchestrator, Platform, RateLimiter,
};
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use media_grabber::AppState;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

pub const INSTAGRAM_POST: &str = "https://www.instagram.com/p/ABC123/";
pub const YOUTUBE_VIDEO: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

#[derive(Debug)]
pub struct Stub {
    name: &'static str,
    succeed: bool,
}

#[async_trait::async_trait]
impl Strategy for Stub {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "test stub"
    }

    async fn attempt(&self, _url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        if !self.succeed {
            return Err(ExtractionError::NoMedia);
        }

        let link = MediaLink::parse("Instagram Video", "https://cdn.example.com/v.mp4", "original")?;
        ExtractedMedia::new(self.name, "Instagram Media", vec![link])
    }
}

pub fn stub(name: &'static str, succeed: bool) -> StrategyEntry {
    Arc::new(Stub { name, succeed })
}

/// Instagram falls through to `embed`; YouTube always fails.
pub fn test_state() -> AppState {
    let orchestrator = Orchestrator::new()
        .with_chain(
            Platform::Instagram,
            vec![
                stub("yt-dlp", false),
                stub("instagram_api", false),
                stub("embed", true),
            ],
        )
        .with_chain(Platform::Youtube, vec![stub("yt-dlp", false)]);

    AppState::new(MediaService::new(orchestrator, RateLimiter::default()))
}

pub fn test_app(state: AppState) -> Router {
    media_grabber::app(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
}

pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, req).await;

    (status, body)
}

pub async fn send_raw(app: Router, req: Request<Body>) -> (StatusCode, Response<()>, Value) {
    let res = app.oneshot(req).await.expect("router never errors");
    let (parts, body) = res.into_parts();
    let bytes = body.collect().await.expect("readable body").to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (parts.status, Response::from_parts(parts, ()), json)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
