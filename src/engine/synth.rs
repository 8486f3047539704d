//! ### English
//! Pixel synthesizers: pure functions from a pixel coordinate (and the buffer size) to a color.
//!
//! ### 中文
//! 像素合成器：由像素坐标（及 buffer 尺寸）得到颜色的纯函数。

mod escape_time;
mod gradient;

pub use escape_time::{ComplexPoint, Escape, EscapeTime};
pub use gradient::Gradient;

use super::frame::SlotCanvas;

/// ### English
/// One pixel as straight RGBA channels (0..=255).
///
/// ### 中文
/// 以 RGBA 通道表示的单个像素（0..=255）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// ### English
    /// Little-endian ARGB8888 byte order as stored in shared memory.
    ///
    /// ### 中文
    /// 共享内存中存储的小端 ARGB8888 字节顺序。
    #[inline]
    pub const fn to_argb8888_le(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

/// ### English
/// Capability shared by all pixel synthesizers. Implementations must be deterministic.
///
/// ### 中文
/// 所有像素合成器共享的能力；实现必须是确定性的。
pub trait PixelSynthesizer {
    fn synthesize(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba8;
}

/// ### English
/// Build/config-time choice of synthesizer.
///
/// ### 中文
/// 在构建/配置阶段选定的像素合成器。
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pattern {
    EscapeTime(EscapeTime),
    Gradient(Gradient),
}

impl PixelSynthesizer for Pattern {
    #[inline]
    fn synthesize(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba8 {
        match self {
            Pattern::EscapeTime(pattern) => pattern.synthesize(x, y, width, height),
            Pattern::Gradient(pattern) => pattern.synthesize(x, y, width, height),
        }
    }
}

/// ### English
/// Fills every pixel of `canvas` with `synthesizer`.
///
/// Pixel `(x, y)` lands at index `x + y × stride / 4`, i.e. byte `index × 4` of the slot.
///
/// ### 中文
/// 用 `synthesizer` 填充 `canvas` 的每一个像素。
///
/// 像素 `(x, y)` 写入索引 `x + y × stride / 4`，即槽位内第 `index × 4` 字节处。
pub fn fill<S: PixelSynthesizer + ?Sized>(synthesizer: &S, canvas: SlotCanvas<'_>) {
    let SlotCanvas {
        size,
        stride,
        pixels,
    } = canvas;
    if size.width == 0 || size.height == 0 || stride == 0 {
        return;
    }

    for (y, row) in pixels
        .chunks_exact_mut(stride as usize)
        .take(size.height as usize)
        .enumerate()
    {
        for (x, pixel) in row
            .chunks_exact_mut(4)
            .take(size.width as usize)
            .enumerate()
        {
            let color = synthesizer.synthesize(x as u32, y as u32, size.width, size.height);
            pixel.copy_from_slice(&color.to_argb8888_le());
        }
    }
}

#[cfg(test)]
mod tests {
    use dpi::PhysicalSize;

    use super::*;

    struct Coordinates;

    impl PixelSynthesizer for Coordinates {
        fn synthesize(&self, x: u32, y: u32, _width: u32, _height: u32) -> Rgba8 {
            Rgba8::new(x as u8, y as u8, 0, 255)
        }
    }

    #[test]
    fn fill_writes_argb8888_at_stride_offsets() {
        let size = PhysicalSize::new(3, 2);
        let stride = 3 * 4;
        let mut pixels = vec![0u8; stride * 2];
        fill(
            &Coordinates,
            SlotCanvas {
                size,
                stride: stride as u32,
                pixels: &mut pixels,
            },
        );

        let index = 2 + stride / 4;
        assert_eq!(&pixels[index * 4..index * 4 + 4], &[0, 1, 2, 255]);
        assert_eq!(&pixels[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn pattern_dispatches_to_the_selected_variant() {
        let gradient = Gradient::default();
        let pattern = Pattern::Gradient(gradient);
        assert_eq!(
            pattern.synthesize(5, 7, 64, 48),
            gradient.synthesize(5, 7, 64, 48)
        );

        let escape = EscapeTime::default();
        let pattern = Pattern::EscapeTime(escape);
        assert_eq!(
            pattern.synthesize(30, 20, 64, 48),
            escape.synthesize(30, 20, 64, 48)
        );
    }
}
