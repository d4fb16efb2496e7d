use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::params::MissingParameters;
use crate::source::ShapeError;

/// Every way a feed request can fail.
#[derive(Debug)]
pub enum FeedError {
    MalformedParameters,
    DataPathDoesNotExist,
    DataPathNotAnArray,
    Internal(anyhow::Error),
}

impl FeedError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MalformedParameters => {
                (StatusCode::BAD_REQUEST, "Missing or malformed parameters")
            }
            Self::DataPathDoesNotExist => {
                (StatusCode::BAD_REQUEST, "Supplied data path does not exist")
            }
            Self::DataPathNotAnArray => {
                (StatusCode::BAD_REQUEST, "Supplied data path is not an array")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl From<MissingParameters> for FeedError {
    fn from(_: MissingParameters) -> Self {
        Self::MalformedParameters
    }
}

impl From<ShapeError> for FeedError {
    fn from(e: ShapeError) -> Self {
        match e {
            ShapeError::PathDoesNotExist => Self::DataPathDoesNotExist,
            ShapeError::NotAnArray => Self::DataPathNotAnArray,
        }
    }
}

impl From<anyhow::Error> for FeedError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            Self::Internal(e) => error!("Error occured while processing an HTTP request: {e:#}"),
            _ => debug!("Rejected a feed request: {message}"),
        }

        IntoResponse::into_response((status, message))
    }
}

/// Answers a request whose handler panicked the same way as any other internal error.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    FeedError::Internal(anyhow::anyhow!("the request handler panicked: {details}")).into_response()
}
