use crate::domain::bounding_box::BoundingBox;
use crate::domain::error::DomainError;

pub const DEFAULT_QUALITY: f32 = 0.8;

/// JPEG 圧縮率 (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    pub fn new(value: f32) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::InvalidInput(format!(
                "quality must be between 0.0 and 1.0, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// The 1-100 scale the JPEG encoder expects.
    pub fn jpeg_quality(&self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

/// Settings the scaler runs with. Built once at startup and passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleConfig {
    pub bounding_box: BoundingBox,
    pub quality: Quality,
}

impl ScaleConfig {
    pub fn new(max_width: u32, max_height: u32, quality: f32) -> Result<Self, DomainError> {
        Ok(Self {
            bounding_box: BoundingBox::new(max_width, max_height)?,
            quality: Quality::new(quality)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_upload_limits() {
        let config = ScaleConfig::default();
        assert_eq!(config.bounding_box.max_width(), 1600);
        assert_eq!(config.bounding_box.max_height(), 1600);
        assert_eq!(config.quality.jpeg_quality(), 80);
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(Quality::new(1.0).unwrap().jpeg_quality(), 100);
        assert_eq!(Quality::new(0.42).unwrap().jpeg_quality(), 42);
        // 0 のままだとエンコーダが拒否するので 1 に切り上げる
        assert_eq!(Quality::new(0.0).unwrap().jpeg_quality(), 1);
    }

    #[test]
    fn test_invalid_quality_is_rejected() {
        assert!(Quality::new(1.5).is_err());
        assert!(Quality::new(-0.1).is_err());
        assert!(Quality::new(f32::NAN).is_err());
    }

    #[test]
    fn test_new_validates_both_parts() {
        assert!(ScaleConfig::new(1024, 768, 0.9).is_ok());
        assert!(ScaleConfig::new(0, 768, 0.9).is_err());
        assert!(ScaleConfig::new(1024, 768, 2.0).is_err());
    }
}
