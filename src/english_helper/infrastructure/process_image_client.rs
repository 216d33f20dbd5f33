use super::error::InfrastructureError;
use crate::domain::image::ScaledImage;
use crate::domain::passage_analysis::PassageAnalysis;
use crate::domain::process_image_client_trait::ProcessImageClient;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

const PROCESS_IMAGE_PATH: &str = "/api/process-image";
const IMAGE_FIELD: &str = "image";

/// リモートの process-image エンドポイントへ multipart で画像を送る
pub struct ReqwestProcessImageClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ReqwestProcessImageClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(InfrastructureError::ReqwestError)?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), PROCESS_IMAGE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProcessImageClient for ReqwestProcessImageClient {
    async fn process_image(&self, image: &ScaledImage) -> Result<PassageAnalysis, InfrastructureError> {
        let part = Part::bytes(image.data.clone())
            .file_name(image.filename.clone())
            .mime_str(image.media_type())
            .map_err(InfrastructureError::ReqwestError)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        tracing::info!(endpoint = %self.endpoint, filename = %image.filename, bytes = image.data.len(), "posting image");
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(InfrastructureError::ReqwestError)?;

        let status = response.status();
        let body = response.text().await.map_err(InfrastructureError::ReqwestError)?;
        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| format!("status {}", status));
            return Err(InfrastructureError::ExternalApiError(message));
        }
        parse_analysis(&body)
    }
}

/// レスポンスボディを PassageAnalysis に変換する
///
/// バックエンドはモデルの出力テキストを JSON 文字列として返すことがあり、
/// その中身は ```json ... ``` で囲まれている場合もある。
pub fn parse_analysis(body: &str) -> Result<PassageAnalysis, InfrastructureError> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| InfrastructureError::DecodingError(format!("response is not JSON: {}", e)))?;

    let value = match value {
        Value::String(text) => serde_json::from_str(strip_code_fence(&text)).map_err(|e| {
            InfrastructureError::DecodingError(format!("embedded result is not JSON: {}", e))
        })?,
        other => other,
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(InfrastructureError::ExternalApiError(message.to_string()));
    }
    if !value.is_object() {
        return Err(InfrastructureError::DecodingError(
            "response is not a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| InfrastructureError::DecodingError(format!("unexpected response shape: {}", e)))
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(Value::as_str).map(str::to_string)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 言語タグ (```json) は最初の改行まで
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
