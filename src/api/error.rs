use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::system::kill::TerminateError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Terminate(#[from] TerminateError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Text sent to clients in the `error` field.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Terminate(TerminateError::NotFound(_)) => "Process not found.".to_string(),
            ApiError::Terminate(TerminateError::PermissionDenied(_)) => {
                "Permission denied to terminate the process.".to_string()
            }
            ApiError::Terminate(TerminateError::Other(msg)) | ApiError::Internal(msg) => {
                msg.clone()
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Terminate(TerminateError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Terminate(TerminateError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
            ApiError::Terminate(TerminateError::Other(_)) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
