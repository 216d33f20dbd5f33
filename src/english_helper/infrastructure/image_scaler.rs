use crate::domain::image::{ScaledImage, SourceImage};
use crate::domain::image_scaler_trait::ImageScaler;
use crate::domain::scale_config::ScaleConfig;
use super::error::InfrastructureError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage};
use std::io::Cursor;

/// image クレートで decode -> resize -> JPEG encode を行う
pub struct DefaultImageScaler;

impl DefaultImageScaler {
    pub fn new() -> Self {
        Self
    }

    fn decode(&self, data: &[u8]) -> Result<DynamicImage, InfrastructureError> {
        // 宣言された media type は信用せず、中身からフォーマットを判定する
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| InfrastructureError::DecodeError(e.into()))?;
        reader.decode().map_err(InfrastructureError::DecodeError)
    }

    fn encode_jpeg(&self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>, InfrastructureError> {
        // JPEG はアルファを持たないので RGB8 に落とす
        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| InfrastructureError::EncodeError(e.to_string()))?;
        if buffer.is_empty() {
            return Err(InfrastructureError::EncodeError(
                "encoder produced no output".to_string(),
            ));
        }
        Ok(buffer)
    }
}

impl Default for DefaultImageScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageScaler for DefaultImageScaler {
    fn scale(
        &self,
        source: &SourceImage,
        config: &ScaleConfig,
    ) -> Result<ScaledImage, InfrastructureError> {
        let img = self.decode(&source.data)?;
        let (width, height) = (img.width(), img.height());
        let (new_width, new_height) = config.bounding_box.target_dimensions(width, height);

        let resized = if (new_width, new_height) == (width, height) {
            img
        } else {
            img.resize_exact(new_width, new_height, FilterType::Triangle)
        };

        let data = self.encode_jpeg(&resized, config.quality.jpeg_quality())?;
        tracing::debug!(
            filename = %source.filename,
            from = %format!("{}x{}", width, height),
            to = %format!("{}x{}", new_width, new_height),
            bytes = data.len(),
            "scaled image"
        );

        Ok(ScaledImage::new(
            data,
            source.filename.clone(),
            new_width,
            new_height,
        ))
    }
}
