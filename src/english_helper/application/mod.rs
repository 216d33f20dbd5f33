pub mod error;
pub mod loading_flag;
pub mod upload_service;
