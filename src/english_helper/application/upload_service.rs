use std::sync::Arc;
use super::error::ApplicationError;
use super::loading_flag::LoadingFlag;

use crate::domain::image::{ScaledImage, SourceImage};
use crate::domain::image_scaler_trait::ImageScaler;
use crate::domain::passage_analysis::PassageAnalysis;
use crate::domain::process_image_client_trait::ProcessImageClient;
use crate::domain::scale_config::ScaleConfig;
use crate::infrastructure::error::InfrastructureError;

/// 画像の縮小と process-image への送信をまとめるサービス
pub struct UploadService {
    image_scaler: Arc<dyn ImageScaler + Send + Sync>,
    process_image_client: Arc<dyn ProcessImageClient>,
    scale_config: ScaleConfig,
    loading: LoadingFlag,
}

impl UploadService {
    pub fn new(
        image_scaler: Arc<dyn ImageScaler + Send + Sync>,
        process_image_client: Arc<dyn ProcessImageClient>,
        scale_config: ScaleConfig,
    ) -> Self {
        Self {
            image_scaler,
            process_image_client,
            scale_config,
            loading: LoadingFlag::new(),
        }
    }

    pub fn scale_config(&self) -> ScaleConfig {
        self.scale_config
    }

    #[cfg(test)]
    pub(crate) fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Decode, resize and encode as one awaited step.
    pub async fn scale_image(&self, source: SourceImage) -> Result<ScaledImage, ApplicationError> {
        self.run_scaler(source)
            .await
            .map_err(ApplicationError::ImageProcessingFailed)
    }

    /// Scales `source` and posts it. Only one submission runs at a time.
    pub async fn submit(&self, source: Option<SourceImage>) -> Result<PassageAnalysis, ApplicationError> {
        let source = source.ok_or(ApplicationError::NoImageSelected)?;
        let _guard = self
            .loading
            .try_begin()
            .ok_or(ApplicationError::SubmissionInProgress)?;

        // 縮小の失敗も通信エラーと同じ扱いにする
        let scaled = self
            .run_scaler(source)
            .await
            .map_err(ApplicationError::SubmissionFailed)?;
        self.post(&scaled).await
    }

    /// Posts an image that was scaled earlier, without scaling it again.
    pub async fn submit_scaled(&self, image: &ScaledImage) -> Result<PassageAnalysis, ApplicationError> {
        let _guard = self
            .loading
            .try_begin()
            .ok_or(ApplicationError::SubmissionInProgress)?;
        self.post(image).await
    }

    async fn post(&self, image: &ScaledImage) -> Result<PassageAnalysis, ApplicationError> {
        let analysis = self
            .process_image_client
            .process_image(image)
            .await
            .map_err(ApplicationError::SubmissionFailed)?;
        tracing::info!(
            filename = %image.filename,
            new_words = analysis.new_words.len(),
            "image processed"
        );
        Ok(analysis)
    }

    async fn run_scaler(&self, source: SourceImage) -> Result<ScaledImage, InfrastructureError> {
        let scaler = Arc::clone(&self.image_scaler);
        let config = self.scale_config;
        // デコード・リサイズは CPU バウンドなので blocking スレッドで実行する
        let scaled = tokio::task::spawn_blocking(move || scaler.scale(&source, &config))
            .await
            .map_err(|e| InfrastructureError::TaskFailed(e.to_string()))??;
        tracing::info!(
            filename = %scaled.filename,
            width = scaled.width,
            height = scaled.height,
            bytes = scaled.data.len(),
            "image scaled"
        );
        Ok(scaled)
    }
}
