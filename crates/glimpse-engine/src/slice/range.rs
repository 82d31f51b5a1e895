use crate::error::{InvalidInput, Result};
use crate::texture::PixelTransfer;

/// Margin, in LUT entries, kept away from both ends of the table so linear
/// interpolation never samples exactly at an edge.
const LUT_EDGE_MARGIN: f64 = 3.1;

/// Data values mapped onto the full colormap.
///
/// `min > max` is allowed and reverses the colormap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Fails on equal or non-finite bounds.
    pub fn validate(self) -> Result<Self> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min == self.max {
            return Err(InvalidInput::DegenerateRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(self)
    }

    /// Upload transfer that maps `min..max` onto the index range of a LUT
    /// with `lut_size` entries:
    ///
    /// ```text
    /// scale = (s - 3.1) / ((s - 1) * (max - min))
    /// bias  = 1 / (s - 1) - min * scale
    /// ```
    pub fn bias_scale(self, lut_size: usize) -> Result<PixelTransfer> {
        self.validate()?;
        if lut_size < 2 {
            return Err(InvalidInput::Colormap(format!(
                "{lut_size} entries given, at least 2 required"
            )));
        }

        let s = lut_size as f64;
        let (min, max) = (self.min as f64, self.max as f64);
        let scale = (s - LUT_EDGE_MARGIN) / ((s - 1.0) * (max - min));
        let bias = 1.0 / (s - 1.0) - min * scale;
        Ok(PixelTransfer::new(bias as f32, scale as f32))
    }
}
