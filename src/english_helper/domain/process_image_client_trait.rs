use async_trait::async_trait;

use crate::domain::image::ScaledImage;
use crate::domain::passage_analysis::PassageAnalysis;
use crate::infrastructure::error::InfrastructureError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessImageClient: Send + Sync {
    async fn process_image(&self, image: &ScaledImage)
        -> Result<PassageAnalysis, InfrastructureError>;
}
