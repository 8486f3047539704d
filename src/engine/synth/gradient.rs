//! ### English
//! Diagonal RGB ramp at constant alpha.
//!
//! ### 中文
//! 恒定 alpha 的对角 RGB 渐变。

use super::{PixelSynthesizer, Rgba8};

/// ### English
/// Default alpha (~0.7 of full opacity).
///
/// ### 中文
/// 默认 alpha（约为完全不透明的 0.7）。
pub const GRADIENT_ALPHA: u8 = 178;

/// ### English
/// `r ∝ x/width`, `g ∝ y/height`, `b ∝ (x+y)/(width+height)`.
///
/// Channels are premultiplied by `alpha`, as ARGB8888 surfaces expect.
///
/// ### 中文
/// `r ∝ x/width`，`g ∝ y/height`，`b ∝ (x+y)/(width+height)`。
///
/// 各通道按 `alpha` 预乘，符合 ARGB8888 surface 的要求。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    alpha: u8,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            alpha: GRADIENT_ALPHA,
        }
    }
}

impl Gradient {
    pub fn with_alpha(alpha: u8) -> Self {
        Self { alpha }
    }
}

#[inline]
fn ramp(numerator: u32, denominator: u32, alpha: u8) -> u8 {
    if denominator == 0 {
        return 0;
    }
    (u64::from(numerator) * u64::from(alpha) / u64::from(denominator)) as u8
}

impl PixelSynthesizer for Gradient {
    fn synthesize(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba8 {
        Rgba8::new(
            ramp(x, width, self.alpha),
            ramp(y, height, self.alpha),
            ramp(x + y, width + height, self.alpha),
            self.alpha,
        )
    }
}
