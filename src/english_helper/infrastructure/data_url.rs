use super::error::InfrastructureError;
use crate::domain::image::SourceImage;
use base64::decode;

/// `data:<media-type>;base64,<payload>` 形式の URL から SourceImage を作る
pub fn source_image_from_data_url(
    data_url: &str,
    filename: &str,
) -> Result<SourceImage, InfrastructureError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| InfrastructureError::DecodingError("Invalid data URL: missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| InfrastructureError::DecodingError("Invalid data URL: missing comma".to_string()))?;

    let mut params = header.split(';');
    let media_type = params
        .next()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_ascii_lowercase());
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(InfrastructureError::DecodingError(
            "Invalid data URL: only base64 payloads are supported".to_string(),
        ));
    }

    let data = decode(payload.trim()).map_err(InfrastructureError::Base64DecodeError)?;
    Ok(SourceImage::new(data, media_type, filename))
}
