//! ### English
//! Escape-time fractal synthesizer (`z ← z² + c`) with a flat decoration border.
//!
//! ### 中文
//! 逃逸时间分形合成器（`z ← z² + c`），带纯色装饰边框。

use super::{PixelSynthesizer, Rgba8};

/// ### English
/// Iteration cap of the recurrence.
///
/// ### 中文
/// 递推的迭代上限。
pub const MAX_ITERATIONS: u32 = 50;

/// ### English
/// Width of the decoration band on every edge, in pixels.
///
/// ### 中文
/// 每条边上装饰边框的宽度（像素）。
pub const BORDER_WIDTH: u32 = 10;

pub const DECORATION: Rgba8 = Rgba8::new(128, 128, 128, 255);
pub const BOUNDED: Rgba8 = Rgba8::new(255, 255, 255, 255);

/// Squared divergence radius (`|z| ≥ 2`).
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// ### English
/// Point of the complex plane.
///
/// ### 中文
/// 复平面上的点。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexPoint {
    pub re: f64,
    pub im: f64,
}

impl ComplexPoint {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

/// ### English
/// Result of iterating one point.
///
/// ### 中文
/// 单个点的迭代结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escape {
    /// ### English
    /// `|z|` reached 2 after `iterations` steps (`0`: the point itself lies outside `|c| < 2`).
    ///
    /// ### 中文
    /// 经过 `iterations` 步迭代后 `|z|` 达到 2（`0` 表示该点本身已在 `|c| < 2` 之外）。
    Diverged { iterations: u32 },
    /// ### English
    /// Stayed bounded for the whole iteration cap.
    ///
    /// ### 中文
    /// 在整个迭代上限内保持有界。
    Bounded,
}

/// ### English
/// Escape-time synthesizer over a centered, aspect-corrected plane.
///
/// ### 中文
/// 基于居中且做了宽高比校正的平面的逃逸时间合成器。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeTime {
    max_iterations: u32,
    border: u32,
}

impl Default for EscapeTime {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            border: BORDER_WIDTH,
        }
    }
}

impl EscapeTime {
    /// ### English
    /// Maps a pixel to cartesian coordinates with `(0, 0)` in the middle.
    ///
    /// The shorter screen axis spans `[-1, 1]` and the longer one `[-aspect, aspect]`.
    ///
    /// ### 中文
    /// 将像素映射到以 `(0, 0)` 为中心的笛卡尔坐标。
    ///
    /// 屏幕较短的轴覆盖 `[-1, 1]`，较长的轴覆盖 `[-aspect, aspect]`。
    pub fn map_to_plane(x: u32, y: u32, width: u32, height: u32) -> ComplexPoint {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        let (max_xx, max_yy) = if w > h { (w / h, 1.0) } else { (1.0, h / w) };

        let xx = (2.0 * f64::from(x) / w - 1.0) * max_xx;
        let yy = (2.0 * f64::from(y) / h - 1.0) * max_yy;
        ComplexPoint::new(xx, yy)
    }

    /// ### English
    /// Iterates `z ← z² + c` from `z₀ = 0` while `|z| < 2`, up to the cap.
    ///
    /// `iterations` counts the steps actually run; reaching the cap means bounded.
    ///
    /// ### 中文
    /// 从 `z₀ = 0` 开始，在 `|z| < 2` 时迭代 `z ← z² + c`，直到达到上限。
    ///
    /// `iterations` 统计实际执行的步数；达到上限即视为有界。
    pub fn escape(&self, c: ComplexPoint) -> Escape {
        let mut z = ComplexPoint::new(0.0, 0.0);
        let mut iterations = 0;
        while z.norm_sq() < ESCAPE_RADIUS_SQ && iterations < self.max_iterations {
            z = ComplexPoint::new(z.re * z.re - z.im * z.im + c.re, 2.0 * z.re * z.im + c.im);
            iterations += 1;
        }

        if iterations < self.max_iterations {
            Escape::Diverged { iterations }
        } else {
            Escape::Bounded
        }
    }

    /// ### English
    /// Classifies a cartesian point. Points with `|point| ≥ 2` diverge at once; the rest
    /// iterate with `c = point / 2`.
    ///
    /// Depends only on the point, not on the pixel grid it came from.
    ///
    /// ### 中文
    /// 对一个笛卡尔坐标点分类。`|point| ≥ 2` 的点立即发散；其余点以 `c = point / 2` 迭代。
    ///
    /// 结果只依赖于该点本身，与其来源的像素网格无关。
    pub fn classify(&self, point: ComplexPoint) -> Escape {
        if point.norm_sq() >= ESCAPE_RADIUS_SQ {
            return Escape::Diverged { iterations: 0 };
        }
        self.escape(ComplexPoint::new(point.re / 2.0, point.im / 2.0))
    }

    /// ### English
    /// Color of an escape result: black with alpha `iterations / cap`, or opaque white.
    ///
    /// ### 中文
    /// 逃逸结果对应的颜色：alpha 为 `iterations / cap` 的黑色，或不透明白色。
    pub fn shade(&self, escape: Escape) -> Rgba8 {
        match escape {
            Escape::Diverged { iterations } => {
                let alpha =
                    f64::from(iterations) / f64::from(self.max_iterations.max(1)) * 255.0;
                Rgba8::new(0, 0, 0, alpha as u8)
            }
            Escape::Bounded => BOUNDED,
        }
    }

    #[inline]
    fn in_border(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        x < self.border
            || y < self.border
            || x + self.border >= width
            || y + self.border >= height
    }
}

impl PixelSynthesizer for EscapeTime {
    fn synthesize(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba8 {
        if self.in_border(x, y, width, height) {
            return DECORATION;
        }
        let point = Self::map_to_plane(x, y, width, height);
        self.shade(self.classify(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_diverges() {
        let fractal = EscapeTime::default();
        assert_eq!(fractal.escape(ComplexPoint::new(0.0, 0.0)), Escape::Bounded);
        assert_eq!(fractal.shade(Escape::Bounded), BOUNDED);
    }

    #[test]
    fn magnitude_two_diverges_immediately() {
        let fractal = EscapeTime::default();
        for point in [
            ComplexPoint::new(2.0, 0.0),
            ComplexPoint::new(-2.0, 0.0),
            ComplexPoint::new(0.0, 2.0),
            ComplexPoint::new(0.0, -2.0),
            ComplexPoint::new(1.5, 1.5),
        ] {
            let escape = fractal.classify(point);
            assert_eq!(escape, Escape::Diverged { iterations: 0 }, "{point:?}");
            assert_eq!(fractal.shade(escape), Rgba8::new(0, 0, 0, 0));
        }
    }

    #[test]
    fn iteration_count_includes_the_escaping_step() {
        let fractal = EscapeTime::default();
        // z₁ = c already has |z| = 2.
        assert_eq!(
            fractal.escape(ComplexPoint::new(2.0, 0.0)),
            Escape::Diverged { iterations: 1 }
        );
        // z₁ = 1, z₂ = 2.
        assert_eq!(
            fractal.escape(ComplexPoint::new(1.0, 0.0)),
            Escape::Diverged { iterations: 2 }
        );
        assert_eq!(
            fractal.shade(Escape::Diverged { iterations: 2 }).a,
            (2.0 / 50.0 * 255.0) as u8
        );
    }

    #[test]
    fn far_pixels_render_transparent() {
        // Corner just inside the border of a wide buffer maps to |point| > 2.
        let fractal = EscapeTime::default();
        let point = EscapeTime::map_to_plane(10, 10, 1000, 100);
        assert!(point.norm_sq() >= 4.0);
        assert_eq!(fractal.synthesize(10, 10, 1000, 100), Rgba8::new(0, 0, 0, 0));
    }

    #[test]
    fn center_pixel_maps_to_origin() {
        let point = EscapeTime::map_to_plane(320, 240, 640, 480);
        assert_eq!(point, ComplexPoint::new(0.0, 0.0));
        assert_eq!(
            EscapeTime::default().synthesize(320, 240, 640, 480),
            BOUNDED
        );
    }

    #[test]
    fn longer_axis_spans_aspect() {
        let left = EscapeTime::map_to_plane(0, 0, 640, 480);
        assert!((left.re - -(640.0 / 480.0)).abs() < 1e-12);
        assert!((left.im - -1.0).abs() < 1e-12);

        let top = EscapeTime::map_to_plane(0, 0, 480, 640);
        assert!((top.re - -1.0).abs() < 1e-12);
        assert!((top.im - -(640.0 / 480.0)).abs() < 1e-12);
    }

    #[test]
    fn classification_depends_only_on_mapped_point() {
        let fractal = EscapeTime::default();
        // (160, 120) on 640×480 and (80, 60) on 320×240 map to the same point.
        let a = EscapeTime::map_to_plane(160, 120, 640, 480);
        let b = EscapeTime::map_to_plane(80, 60, 320, 240);
        assert_eq!(a, b);
        assert_eq!(fractal.classify(a), fractal.classify(b));
    }

    #[test]
    fn border_band_is_ten_pixels_wide() {
        let fractal = EscapeTime::default();
        let (w, h) = (64, 48);
        for (x, y) in [(0, 20), (9, 20), (30, 0), (30, 9), (54, 20), (63, 20), (30, 38), (30, 47)] {
            assert_eq!(fractal.synthesize(x, y, w, h), DECORATION, "({x}, {y})");
        }
        for (x, y) in [(10, 20), (53, 20), (30, 10), (30, 37)] {
            assert_ne!(fractal.synthesize(x, y, w, h), DECORATION, "({x}, {y})");
        }
    }

    #[test]
    fn synthesize_is_deterministic() {
        let fractal = EscapeTime::default();
        for (x, y) in [(11, 11), (100, 200), (500, 300)] {
            assert_eq!(
                fractal.synthesize(x, y, 640, 480),
                fractal.synthesize(x, y, 640, 480)
            );
        }
    }
}
