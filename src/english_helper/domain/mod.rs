pub mod bounding_box;
pub mod error;
pub mod image;
pub mod image_scaler_trait;
pub mod passage_analysis;
pub mod process_image_client_trait;
pub mod scale_config;
