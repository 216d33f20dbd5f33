use thiserror::Error;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;

pub const IMAGE_PROCESSING_FAILED_MESSAGE: &str = "Error processing image";
pub const SUBMISSION_FAILED_MESSAGE: &str = "An error occurred while processing the image";
pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Please select an image first";

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Image processing failed")]
    ImageProcessingFailed(#[source] InfrastructureError),

    #[error("Submission failed")]
    SubmissionFailed(#[source] InfrastructureError),

    #[error("No image selected")]
    NoImageSelected,

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Domain error occurred")]
    DomainError(#[from] DomainError),
}

impl ApplicationError {
    /// ユーザーに見せるメッセージ。内部の詳細は含めない
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::ImageProcessingFailed(_) => IMAGE_PROCESSING_FAILED_MESSAGE.to_string(),
            ApplicationError::SubmissionFailed(_) => SUBMISSION_FAILED_MESSAGE.to_string(),
            ApplicationError::NoImageSelected => NO_IMAGE_SELECTED_MESSAGE.to_string(),
            ApplicationError::SubmissionInProgress => self.to_string(),
            ApplicationError::InvalidRequest(msg) => msg.clone(),
            ApplicationError::DomainError(domain_err) => domain_err.to_string(),
        }
    }
}

use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApplicationError::ImageProcessingFailed(InfrastructureError::DecodeError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationError::ImageProcessingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationError::SubmissionFailed(_) => StatusCode::BAD_GATEWAY,
            ApplicationError::NoImageSelected
            | ApplicationError::InvalidRequest(_)
            | ApplicationError::DomainError(_) => StatusCode::BAD_REQUEST,
            ApplicationError::SubmissionInProgress => StatusCode::CONFLICT,
        };
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = Json(json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}
