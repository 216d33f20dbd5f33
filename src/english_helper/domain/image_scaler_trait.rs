use crate::domain::image::{ScaledImage, SourceImage};
use crate::domain::scale_config::ScaleConfig;
use crate::infrastructure::error::InfrastructureError;

// 同期処理。非同期化は呼び出し側 (UploadService) が行う
#[cfg_attr(test, mockall::automock)]
pub trait ImageScaler {
    fn scale(
        &self,
        source: &SourceImage,
        config: &ScaleConfig,
    ) -> Result<ScaledImage, InfrastructureError>;
}
