//! ### English
//! Shell capability selection and the shared "configure" contract.
//!
//! The window is created with exactly one of two shell variants. Both accept a proposed size
//! from the compositor and return the clamped size the window will actually use. The frame
//! scheduler only sees the resulting size.
//!
//! ### 中文
//! shell 能力选择及共享的 “configure” 约定。
//!
//! 窗口创建时只会使用两种 shell 变体之一。两者都接收合成器提议的尺寸，并返回窗口实际采用的
//! 钳制后尺寸。帧调度器只看到最终尺寸。

use dpi::PhysicalSize;

/// ### English
/// Inclusive size limits for the window (`min ..= max`).
///
/// ### 中文
/// 窗口尺寸的闭区间限制（`min ..= max`）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: PhysicalSize<u32>,
    /// ### English
    /// Upper limit, taken from the display geometry.
    ///
    /// ### 中文
    /// 上限，取自显示器几何尺寸。
    pub max: PhysicalSize<u32>,
}

impl SizeBounds {
    pub fn new(min: PhysicalSize<u32>, max: PhysicalSize<u32>) -> Self {
        Self { min, max }
    }

    /// ### English
    /// Clamps `size` into the bounds. When `max < min` on an axis, `min` wins.
    ///
    /// ### 中文
    /// 将 `size` 钳制到范围内；若某一轴 `max < min`，以 `min` 为准。
    pub fn clamp(&self, size: PhysicalSize<u32>) -> PhysicalSize<u32> {
        PhysicalSize::new(
            size.width.min(self.max.width).max(self.min.width),
            size.height.min(self.max.height).max(self.min.height),
        )
    }
}

/// ### English
/// Which shell protocol the window was created with.
///
/// ### 中文
/// 窗口创建时所使用的 shell 协议。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellKind {
    /// ### English
    /// `wl_shell` / `wl_shell_surface` (deprecated core protocol).
    ///
    /// ### 中文
    /// `wl_shell` / `wl_shell_surface`（已废弃的核心协议）。
    LegacyShellSurface,
    /// ### English
    /// `xdg_wm_base` / `xdg_toplevel`.
    ///
    /// ### 中文
    /// `xdg_wm_base` / `xdg_toplevel`。
    ModernShellSurface,
}

impl ShellKind {
    /// ### English
    /// Accepts a compositor proposal and returns the size the window will use.
    ///
    /// - Legacy: the proposal is taken as-is and clamped (a zero axis clamps to `min`).
    /// - Modern: a zero axis means "client decides" and keeps `current`; the rest is clamped.
    ///
    /// ### 中文
    /// 接受合成器的尺寸提议，并返回窗口将采用的尺寸。
    ///
    /// - Legacy：直接采用提议并钳制（为 0 的轴会被钳制到 `min`）。
    /// - Modern：为 0 的轴表示 “由客户端决定”，保留 `current`；其余部分做钳制。
    pub fn accept_configure(
        self,
        proposed: PhysicalSize<u32>,
        current: PhysicalSize<u32>,
        bounds: SizeBounds,
    ) -> PhysicalSize<u32> {
        match self {
            ShellKind::LegacyShellSurface => bounds.clamp(proposed),
            ShellKind::ModernShellSurface => {
                let width = if proposed.width == 0 {
                    current.width
                } else {
                    proposed.width
                };
                let height = if proposed.height == 0 {
                    current.height
                } else {
                    proposed.height
                };
                bounds.clamp(PhysicalSize::new(width, height))
            }
        }
    }
}

/// ### English
/// The shell-side half of a window: answers pings and negotiates size.
///
/// ### 中文
/// 窗口的 shell 侧：响应 ping 并协商尺寸。
pub trait ShellRole {
    fn kind(&self) -> ShellKind;

    /// ### English
    /// Replies to a liveness ping (the compositor marks the client unresponsive otherwise).
    ///
    /// ### 中文
    /// 回复存活 ping（否则合成器会将客户端标记为无响应）。
    fn pong(&mut self, serial: u32);

    fn accept_configure(
        &mut self,
        proposed: PhysicalSize<u32>,
        current: PhysicalSize<u32>,
        bounds: SizeBounds,
    ) -> PhysicalSize<u32> {
        self.kind().accept_configure(proposed, current, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> SizeBounds {
        SizeBounds::new(PhysicalSize::new(32, 32), PhysicalSize::new(640, 480))
    }

    #[test]
    fn clamp_limits_both_axes() {
        let b = bounds();
        assert_eq!(b.clamp(PhysicalSize::new(10, 10)), PhysicalSize::new(32, 32));
        assert_eq!(
            b.clamp(PhysicalSize::new(4000, 3000)),
            PhysicalSize::new(640, 480)
        );
        assert_eq!(
            b.clamp(PhysicalSize::new(320, 240)),
            PhysicalSize::new(320, 240)
        );
    }

    #[test]
    fn min_wins_when_display_is_smaller_than_min() {
        let b = SizeBounds::new(PhysicalSize::new(32, 32), PhysicalSize::new(16, 16));
        assert_eq!(b.clamp(PhysicalSize::new(20, 20)), PhysicalSize::new(32, 32));
    }

    #[test]
    fn legacy_clamps_zero_to_min() {
        let current = PhysicalSize::new(320, 240);
        let accepted =
            ShellKind::LegacyShellSurface.accept_configure(PhysicalSize::new(0, 0), current, bounds());
        assert_eq!(accepted, PhysicalSize::new(32, 32));
    }

    #[test]
    fn modern_keeps_current_on_zero_axis() {
        let current = PhysicalSize::new(320, 240);
        let accepted = ShellKind::ModernShellSurface.accept_configure(
            PhysicalSize::new(0, 100),
            current,
            bounds(),
        );
        assert_eq!(accepted, PhysicalSize::new(320, 100));
    }

    #[test]
    fn both_variants_clamp_to_display_max() {
        let current = PhysicalSize::new(320, 240);
        for kind in [ShellKind::LegacyShellSurface, ShellKind::ModernShellSurface] {
            let accepted = kind.accept_configure(PhysicalSize::new(1920, 1080), current, bounds());
            assert_eq!(accepted, PhysicalSize::new(640, 480));
        }
    }
}
