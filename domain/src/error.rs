//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api`, and `web` is dependent on `domain`.
/// but `web` should not be dependent, directly, on `entity_api`. Ultimately the various
/// `error_kind`s are used by `web` to return appropriate HTTP status codes and messages.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Errors raised by this service itself. The `String` payloads are client-facing messages.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    /// Request data failed validation
    Input(String),
    /// Missing, invalid or expired credentials
    Unauthenticated(String),
    /// Authenticated, but the resource belongs to someone else
    Forbidden(String),
    /// The resource exists but isn't in a usable state yet
    Conflict(String),
    Other(String),
}

/// Entity errors reduced to the subset of kinds relevant to the `domain` layer.
/// `NotFound` carries the client-facing message when the domain knows which resource was missing.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound(String),
    Invalid,
    Unauthenticated,
    DbTransaction,
    Other(String),
}

/// Errors caused by the upstream services this backend calls.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The request never produced a response
    Network,
    /// A health check failed; carries the client-facing message
    Unavailable(String),
    /// The upstream answered with an error or an unusable payload
    BadGateway(String),
    Other(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Entity(EntityErrorKind::NotFound(
            message.into(),
        )))
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Input(message.into()))
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Unauthenticated(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Forbidden(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Conflict(message.into()))
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::internal(InternalErrorKind::Other(message.into()))
    }

    pub fn config() -> Self {
        Self::internal(InternalErrorKind::Config)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::external(ExternalErrorKind::Unavailable(message.into()))
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::external(ExternalErrorKind::BadGateway(message.into()))
    }

    fn internal(kind: InternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(kind),
        }
    }

    fn external(kind: ExternalErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(kind),
        }
    }

    /// True when the underlying entity could not be found (or isn't owned by the caller).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound(_)))
        )
    }

    /// Replaces a generic not found with a resource specific message; other errors pass through.
    pub fn with_not_found_message(self, message: &str) -> Self {
        if self.is_not_found() {
            Error {
                source: self.source,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                    EntityErrorKind::NotFound(message.to_string()),
                )),
            }
        } else {
            self
        }
    }

    /// The message shown to API clients for this error.
    pub fn message(&self) -> String {
        match &self.error_kind {
            DomainErrorKind::Internal(internal) => match internal {
                InternalErrorKind::Entity(entity) => match entity {
                    EntityErrorKind::NotFound(message) => message.clone(),
                    EntityErrorKind::Invalid => "Invalid request".to_string(),
                    EntityErrorKind::Unauthenticated => "Unauthorized".to_string(),
                    EntityErrorKind::DbTransaction => "Database error".to_string(),
                    EntityErrorKind::Other(_) => "Internal server error".to_string(),
                },
                InternalErrorKind::Config => "Server is not configured correctly".to_string(),
                InternalErrorKind::Input(message)
                | InternalErrorKind::Unauthenticated(message)
                | InternalErrorKind::Forbidden(message)
                | InternalErrorKind::Conflict(message)
                | InternalErrorKind::Other(message) => message.clone(),
            },
            DomainErrorKind::External(external) => match external {
                ExternalErrorKind::Network => "Upstream service could not be reached".to_string(),
                ExternalErrorKind::Unavailable(message)
                | ExternalErrorKind::BadGateway(message)
                | ExternalErrorKind::Other(message) => message.clone(),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound("Not found".to_string()),
            EntityApiErrorKind::SystemError | EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::DbTransaction
            }
            EntityApiErrorKind::Other => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JWT encoding related error".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_becomes_entity_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        assert!(err.is_not_found());
    }

    #[test]
    fn with_not_found_message_only_rewrites_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();
        let err = err.with_not_found_message("Conversation not found");

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound(
                "Conversation not found".to_string()
            )))
        );

        let err = Error::conflict("busy").with_not_found_message("Conversation not found");
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Conflict("busy".to_string()))
        );
    }

    #[test]
    fn message_exposes_client_text_but_hides_database_details() {
        assert_eq!(Error::input("Title is required").message(), "Title is required");
        assert_eq!(
            Error::unavailable("RAG service is unavailable").message(),
            "RAG service is unavailable"
        );

        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::SystemError,
        }
        .into();
        assert_eq!(err.message(), "Database error");
    }

    #[test]
    fn system_errors_become_db_transaction_errors() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::SystemError,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::DbTransaction))
        );
    }
}
