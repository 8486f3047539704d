//! ### English
//! Frames-per-wall-clock-second counter.
//!
//! ### 中文
//! 按墙钟秒统计的帧率计数器。

use std::time::{SystemTime, UNIX_EPOCH};

/// ### English
/// Counts presented frames per wall-clock second and logs the count at each second boundary.
///
/// ### 中文
/// 统计每个墙钟秒内呈现的帧数，并在每个秒边界输出该计数。
#[derive(Debug, Default)]
pub struct FrameRateCounter {
    /// ### English
    /// Wall-clock second the current window started in (`None` before the first frame).
    ///
    /// ### 中文
    /// 当前统计窗口开始的墙钟秒（首帧之前为 `None`）。
    window_start: Option<u64>,
    count: u32,
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// ### English
    /// Records one frame at the current wall-clock second.
    ///
    /// ### 中文
    /// 在当前墙钟秒记录一帧。
    pub fn record_frame(&mut self) -> Option<u32> {
        self.record_frame_at(wall_clock_second())
    }

    /// ### English
    /// Records one frame at `second`.
    ///
    /// If `second` differs from the current window, the prior count is emitted (and returned),
    /// then the window restarts at `second` with a count of 0 before this frame is added.
    ///
    /// ### 中文
    /// 在 `second` 时刻记录一帧。
    ///
    /// 若 `second` 与当前窗口不同，先输出（并返回）之前的计数，然后以 `second` 重新开始窗口、
    /// 计数清零，再计入本帧。
    pub fn record_frame_at(&mut self, second: u64) -> Option<u32> {
        let mut emitted = None;
        if self.window_start != Some(second) {
            if self.window_start.is_some() {
                tracing::info!(fps = self.count, "frame rate");
                emitted = Some(self.count);
            }
            self.window_start = Some(second);
            self.count = 0;
        }

        self.count = self.count.saturating_add(1);
        emitted
    }

    /// ### English
    /// Frames counted so far in the current window.
    ///
    /// ### 中文
    /// 当前窗口内已计入的帧数。
    pub fn count(&self) -> u32 {
        self.count
    }
}

fn wall_clock_second() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
