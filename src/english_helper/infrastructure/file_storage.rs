use super::error::InfrastructureError;
use crate::domain::image::{ScaledImage, SourceImage};
use image::ImageFormat;
use std::path::Path;
use tokio::fs;

pub struct LocalFileStorage;

impl LocalFileStorage {
    pub fn new() -> Self {
        Self
    }

    pub async fn read_source_image(&self, path: &Path) -> Result<SourceImage, InfrastructureError> {
        let data = fs::read(path).await.map_err(InfrastructureError::IoError)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let media_type = ImageFormat::from_path(path)
            .ok()
            .and_then(media_type_for)
            .map(str::to_string);
        Ok(SourceImage::new(data, media_type, filename))
    }

    pub async fn save_scaled_image(&self, path: &Path, image: &ScaledImage) -> Result<(), InfrastructureError> {
        fs::write(path, &image.data).await.map_err(InfrastructureError::IoError)?;
        Ok(())
    }
}

impl Default for LocalFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

// 拡張子から分かる範囲の media type
fn media_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png_bytes;

    #[tokio::test]
    async fn test_read_source_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson.PNG");
        std::fs::write(&path, png_bytes(4, 4)).unwrap();

        let storage = LocalFileStorage::new();
        let source = storage.read_source_image(&path).await.unwrap();
        assert_eq!(source.filename, "lesson.PNG");
        assert_eq!(source.media_type.as_deref(), Some("image/png"));
        assert_eq!(source.data, png_bytes(4, 4));
    }

    #[tokio::test]
    async fn test_unknown_extension_has_no_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.dat");
        std::fs::write(&path, b"whatever").unwrap();

        let source = LocalFileStorage::new().read_source_image(&path).await.unwrap();
        assert_eq!(source.media_type, None);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalFileStorage::new()
            .read_source_image(&dir.path().join("nope.png"))
            .await;
        assert!(matches!(result, Err(InfrastructureError::IoError(_))));
    }

    #[tokio::test]
    async fn test_save_scaled_image_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let scaled = ScaledImage::new(vec![0xFF, 0xD8, 0xFF, 0xD9], "in.png".to_string(), 1, 1);

        LocalFileStorage::new().save_scaled_image(&path, &scaled).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }
}
