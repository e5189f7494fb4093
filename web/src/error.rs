use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
fn status_code(error_kind: &DomainErrorKind) -> StatusCode {
    match error_kind {
        DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
            InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                EntityErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
                EntityErrorKind::Invalid => StatusCode::BAD_REQUEST,
                EntityErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
                EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            InternalErrorKind::Input(_) => StatusCode::BAD_REQUEST,
            InternalErrorKind::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            InternalErrorKind::Forbidden(_) => StatusCode::FORBIDDEN,
            InternalErrorKind::Conflict(_) => StatusCode::CONFLICT,
            InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
        DomainErrorKind::External(external_error_kind) => match external_error_kind {
            ExternalErrorKind::Network
            | ExternalErrorKind::BadGateway(_)
            | ExternalErrorKind::Other(_) => StatusCode::BAD_GATEWAY,
            ExternalErrorKind::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
    }
}

/// The status code and client-facing message for a domain error. Also used for
/// SSE `error` events, which can't change the response status once streaming.
pub(crate) fn status_and_message(err: &DomainError) -> (StatusCode, String) {
    (status_code(&err.error_kind), err.message())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = status_and_message(&self.0);

        if status.is_server_error() {
            error!("{status} responding to request: {:?}", self.0);
        } else {
            debug!("{status} responding to request: {message}");
        }

        (
            status,
            Json(json!({
                "statusCode": status.as_u16(),
                "message": message,
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
