pub mod axum_handler;
pub mod data_url;
pub mod error;
pub mod file_storage;
pub mod image_scaler;
pub mod process_image_client;
