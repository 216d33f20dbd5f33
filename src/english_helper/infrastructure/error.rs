use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Image decode failed")]
    DecodeError(#[source] image::ImageError),

    #[error("Image encode failed: {0}")]
    EncodeError(String),

    #[error("Process-image API call failed: {0}")]
    ExternalApiError(String),

    #[error("Data decoding failed: {0}")]
    DecodingError(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    #[error("Underlying I/O error")]
    IoError(#[from] std::io::Error),

    #[error("Reqwest error")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Base64 decode error")]
    Base64DecodeError(#[from] base64::DecodeError),
}
