use std::time::{SystemTime, UNIX_EPOCH};

pub const SCALED_MEDIA_TYPE: &str = "image/jpeg";

/// ユーザーが選択した元画像
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub data: Vec<u8>,
    pub media_type: Option<String>,
    pub filename: String,
}

impl SourceImage {
    pub fn new(data: Vec<u8>, media_type: Option<String>, filename: impl Into<String>) -> Self {
        Self {
            data,
            media_type,
            filename: filename.into(),
        }
    }
}

/// Bounded, JPEG re-encoded copy of a [`SourceImage`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledImage {
    pub data: Vec<u8>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub last_modified: SystemTime,
}

impl ScaledImage {
    pub fn new(data: Vec<u8>, filename: String, width: u32, height: u32) -> Self {
        Self {
            data,
            filename,
            width,
            height,
            last_modified: SystemTime::now(),
        }
    }

    pub fn media_type(&self) -> &'static str {
        SCALED_MEDIA_TYPE
    }

    pub fn last_modified_millis(&self) -> u64 {
        self.last_modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
