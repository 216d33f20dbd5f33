use crate::domain::error::DomainError;

pub const DEFAULT_MAX_WIDTH: u32 = 1600;
pub const DEFAULT_MAX_HEIGHT: u32 = 1600;

/// アップロード前の画像が収まるべき最大サイズ (幅 x 高さ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    max_width: u32,
    max_height: u32,
}

impl BoundingBox {
    pub fn new(max_width: u32, max_height: u32) -> Result<Self, DomainError> {
        if max_width == 0 || max_height == 0 {
            return Err(DomainError::InvalidInput(format!(
                "bounding box must be at least 1x1, got {}x{}",
                max_width, max_height
            )));
        }
        Ok(Self { max_width, max_height })
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Computes the output size for a `width` x `height` source.
    ///
    /// Only the dominant axis is checked against its bound; width wins ties.
    /// Images already inside the box keep their size (never upscaled).
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width >= height {
            if width > self.max_width {
                let new_height = scale_side(height, self.max_width, width);
                return (self.max_width, new_height);
            }
        } else if height > self.max_height {
            let new_width = scale_side(width, self.max_height, height);
            return (new_width, self.max_height);
        }
        (width, height)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

// round(side * bound / dominant), 0 にはしない
fn scale_side(side: u32, bound: u32, dominant: u32) -> u32 {
    let scaled = (side as f64 * bound as f64 / dominant as f64).round() as u32;
    scaled.max(1)
}
