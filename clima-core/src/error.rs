//! Error types for a single weather fetch.

use reqwest::StatusCode;
use thiserror::Error;

/// Terminal failure of one fetch. Nothing is retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No data received")]
    NoData(#[source] TransportError),

    #[error("Failed to decode weather payload")]
    DecodingError(#[source] DecodeError),
}

/// Field-less discriminant of [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    InvalidRequest,
    NoData,
    DecodingError,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidRequest(_) => FetchErrorKind::InvalidRequest,
            Self::NoData(_) => FetchErrorKind::NoData,
            Self::DecodingError(_) => FetchErrorKind::DecodingError,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(msg) => format!("Could not build the weather request: {msg}"),
            Self::NoData(TransportError::Status { status, .. })
                if *status == StatusCode::NOT_FOUND =>
            {
                "Location not found".to_string()
            }
            Self::NoData(TransportError::Status { status, .. })
                if *status == StatusCode::UNAUTHORIZED =>
            {
                "The weather service rejected the API key".to_string()
            }
            Self::NoData(_) => "No weather data received. Check your connection.".to_string(),
            Self::DecodingError(_) => "The weather service sent an unexpected response".to_string(),
        }
    }
}

/// Why the transport produced no usable body.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response body was empty")]
    EmptyBody,
}

/// Why a response body could not be turned into a weather result.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed weather JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Weather payload contained no condition entries")]
    MissingCondition,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(FetchError::InvalidRequest("x".into()).kind(), FetchErrorKind::InvalidRequest);
        assert_eq!(FetchError::NoData(TransportError::EmptyBody).kind(), FetchErrorKind::NoData);
        assert_eq!(
            FetchError::DecodingError(DecodeError::MissingCondition).kind(),
            FetchErrorKind::DecodingError
        );
    }

    #[test]
    fn source_chain_keeps_the_cause() {
        let err = FetchError::NoData(TransportError::EmptyBody);
        let source = err.source().expect("NoData carries its cause");
        assert_eq!(source.to_string(), "Response body was empty");
    }

    #[test]
    fn user_message_distinguishes_not_found() {
        let err = FetchError::NoData(TransportError::Status {
            status: StatusCode::NOT_FOUND,
            body: r#"{"cod":"404","message":"city not found"}"#.into(),
        });
        assert_eq!(err.user_message(), "Location not found");

        let err = FetchError::NoData(TransportError::EmptyBody);
        assert!(err.user_message().contains("Check your connection"));
    }
}
