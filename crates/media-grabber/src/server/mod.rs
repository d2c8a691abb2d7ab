use std::{net::SocketAddr, time::Duration};

use app_extractors::MediaService;
use axum::{
    http::{header, HeaderValue, Request},
    response::Response,
};
use listenfd::ListenFd;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, field, info, Span};

pub mod app_middleware;
pub mod app_response;
mod routes;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub async fn run(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    info!("Starting server...");
    let router = app(state);
    debug!(?router, "Finished building app router");

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => TcpListener::bind((host, port)).await?,
    };

    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

/// The full router with middlewares applied.
pub fn app(state: AppState) -> axum::Router {
    let timeout = state.request_timeout;

    add_middlewares(routes::router(), timeout).with_state(state)
}

static CACHE_CONTROL: Lazy<HeaderValue> = Lazy::new(|| HeaderValue::from_static("no-store"));

#[derive(Clone)]
struct MakeRequestUlid;
impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let mut id = ulid::Ulid::new().to_string();
        id.make_ascii_lowercase();
        let val = HeaderValue::from_str(&id).ok()?;

        Some(RequestId::new(val))
    }
}

type AppRouter = axum::Router<AppState>;

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: MediaService,
    /// Identify clients by the first `X-Forwarded-For` entry instead of the socket address
    pub trust_forwarded_for: bool,
    pub request_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub const fn new(service: MediaService) -> Self {
        Self {
            service,
            trust_forwarded_for: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn add_middlewares<T>(router: axum::Router<T>, timeout: Duration) -> axum::Router<T>
where
    T: std::clone::Clone + Send + Sync + 'static,
{
    router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUlid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<_>| {
                            let m = request.method();
                            let p = request.uri().path();
                            let id = request
                                .extensions()
                                .get::<RequestId>()
                                .and_then(|id| id.header_value().to_str().ok())
                                .unwrap_or("-");
                            let dur = field::Empty;

                            tracing::info_span!("", %id, %m, ?p, dur)
                        })
                        .on_request(|request: &Request<_>, _span: &Span| {
                            let headers = request.headers();
                            info!(
                                target: "request",
                                "START \"{method} {uri} {http_type:?}\" {user_agent:?} {ip:?}",
                                http_type = request.version(),
                                method = request.method(),
                                uri = request.uri(),
                                user_agent = headers
                                    .get(header::USER_AGENT)
                                    .map_or("-", |x| x.to_str().unwrap_or("-")),
                                ip = headers
                                    .get("x-forwarded-for")
                                    .map_or("-", |x| x.to_str().unwrap_or("-")),
                            );
                        })
                        .on_response(|response: &Response<_>, latency, span: &Span| {
                            span.record("dur", field::debug(latency));
                            debug!(
                                target: "request",
                                "END {status}",
                                status = response.status().as_u16(),
                            );
                        })
                        .on_body_chunk(())
                        .on_eos(|_trailers: Option<&_>, stream_duration, span: &Span| {
                            span.record("dur", field::debug(stream_duration));
                            debug!(
                                target: "request",
                                "ERR: stream closed unexpectedly",
                            );
                        })
                        .on_failure(|error, latency, span: &Span| {
                            span.record("dur", field::debug(latency));
                            debug!(
                                target: "request",
                                err = ?error,
                                "ERR: something went wrong",
                            );
                        }),
                )
                .layer(TimeoutLayer::new(timeout))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    |_response: &Response<_>| Some(CACHE_CONTROL.clone()),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::DATE,
                    |_response: &Response<_>| {
                        HeaderValue::from_str(&chrono::Utc::now().to_rfc2822()).ok()
                    },
                )),
        )
        .layer(
            CorsLayer::new()
                .allow_methods(cors::AllowMethods::mirror_request())
                .allow_origin(cors::AllowOrigin::mirror_request())
                .allow_headers(cors::AllowHeaders::mirror_request()),
        )
}
