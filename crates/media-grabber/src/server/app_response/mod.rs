use app_extractors::{ErrorCategory, MediaResponse, ServiceError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// A [`MediaResponse`] together with the HTTP status it is sent with.
#[derive(Debug)]
pub struct AppResponse {
    status_code: StatusCode,
    retry_after: Option<u64>,
    body: MediaResponse,
}

impl AppResponse {
    #[must_use]
    pub const fn new(status_code: StatusCode, body: MediaResponse) -> Self {
        Self {
            status_code,
            retry_after: None,
            body,
        }
    }

    #[must_use]
    pub const fn ok(body: MediaResponse) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn error<T: Into<String>>(status_code: StatusCode, message: T) -> Self {
        Self::new(status_code, MediaResponse::failure(message))
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND, "Not found")
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

#[must_use]
pub const fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCategory::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCategory::ExtractionFailed | ErrorCategory::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<ServiceError> for AppResponse {
    fn from(err: ServiceError) -> Self {
        Self {
            status_code: status_for(err.category()),
            retry_after: err.retry_after_secs(),
            body: err.to_response(),
        }
    }
}

impl From<Result<MediaResponse, ServiceError>> for AppResponse {
    fn from(res: Result<MediaResponse, ServiceError>) -> Self {
        match res {
            Ok(body) => Self::ok(body),
            Err(e) => e.into(),
        }
    }
}

impl IntoResponse for AppResponse {
    fn into_response(self) -> Response {
        let mut res = (self.status_code, Json(self.body)).into_response();

        if let Some(secs) = self.retry_after {
            res.headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use app_extractors::{service::InvalidInput, Platform};

    use super::*;

    #[test]
    fn error_categories_map_to_statuses() {
        let cases = [
            (
                ServiceError::InvalidInput(InvalidInput::Empty),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::RateLimited {
                    retry_after: Duration::from_secs(5),
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ServiceError::ExtractionFailed {
                    platform: Platform::Tiktok,
                    reason: "gone".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppResponse::from(err).status_code(), status);
        }
    }

    #[test]
    fn rate_limited_sets_retry_after() {
        let res = AppResponse::from(ServiceError::RateLimited {
            retry_after: Duration::from_millis(12_300),
        })
        .into_response();

        assert_eq!(
            res.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from_static("13"))
        );
    }
}
