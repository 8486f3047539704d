//! ### English
//! Frame scheduler: the single-threaded present loop paced by the compositor's frame callback.
//!
//! Each step selects a free slot, synthesizes every pixel into it, submits it and re-arms
//! exactly one frame callback. When no slot is free the step is skipped but the callback is
//! still re-armed, so the loop picks up again on the next notification.
//!
//! ### 中文
//! 帧调度器：由合成器 frame 回调驱动节奏的单线程呈现循环。
//!
//! 每一步：选出空闲槽位，合成全部像素，提交，并重新注册恰好一个 frame 回调。
//! 没有空闲槽位时跳过本步，但仍会重新注册回调，使循环在下一次通知时继续。

use dpi::PhysicalSize;

use crate::engine::compositor::Compositor;
use crate::engine::error::PresentError;
use crate::engine::frame::PresentWindow;
use crate::engine::synth::{self, PixelSynthesizer};

use super::fps::FrameRateCounter;

/// ### English
/// Scheduler state machine (cyclic; only process shutdown ends it).
///
/// ### 中文
/// 调度器状态机（循环往复，只有进程退出才终止）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Selecting,
    Synthesizing,
    Submitting,
    AwaitingCallback,
}

/// ### English
/// What one scheduler step did.
///
/// ### 中文
/// 调度器一步的执行结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// ### English
    /// Slot `slot` was rendered, attached and committed; it is now busy.
    ///
    /// ### 中文
    /// 槽位 `slot` 已渲染、attach 并 commit；现在处于 busy。
    Presented { slot: usize },
    /// ### English
    /// No slot was available; only the frame callback was re-armed.
    ///
    /// ### 中文
    /// 没有可用槽位；只重新注册了 frame 回调。
    Skipped,
}

/// ### English
/// Owns the window's present state and drives it from frame notifications.
///
/// The scheduler is the only mutator of slot and pool state.
///
/// ### 中文
/// 持有窗口的呈现状态，并由 frame 通知驱动。
///
/// 调度器是槽位及内存池状态的唯一修改者。
pub struct FrameScheduler<C: Compositor, S> {
    window: PresentWindow<C>,
    synthesizer: S,
    fps: FrameRateCounter,
    state: SchedulerState,
    frames_presented: u64,
    frames_skipped: u64,
}

impl<C: Compositor, S: PixelSynthesizer> FrameScheduler<C, S> {
    pub fn new(window: PresentWindow<C>, synthesizer: S) -> Self {
        Self {
            window,
            synthesizer,
            fps: FrameRateCounter::new(),
            state: SchedulerState::Idle,
            frames_presented: 0,
            frames_skipped: 0,
        }
    }

    /// ### English
    /// Initial synchronous kick: renders and presents the very first frame (no token yet).
    ///
    /// ### 中文
    /// 初始同步启动：渲染并呈现第一帧（此时还没有 token）。
    pub fn bootstrap(&mut self, compositor: &mut C) -> Result<FrameOutcome, PresentError> {
        self.step(compositor, None)
    }

    /// ### English
    /// Handles the compositor's "ready for next frame" notification.
    ///
    /// `token` is destroyed before anything else happens.
    ///
    /// ### 中文
    /// 处理合成器的 “可以绘制下一帧” 通知。
    ///
    /// `token` 会在其它任何处理之前被销毁。
    pub fn on_frame_ready(
        &mut self,
        compositor: &mut C,
        token: C::FrameToken,
    ) -> Result<FrameOutcome, PresentError> {
        self.step(compositor, Some(token))
    }

    /// ### English
    /// Out-of-band release of slot `slot` (compositor stopped reading it).
    ///
    /// ### 中文
    /// 槽位 `slot` 的带外 release（合成器已停止读取）。
    pub fn release(&mut self, slot: usize) -> bool {
        let released = self.window.release(slot);
        if !released {
            tracing::warn!(slot, "release for unknown buffer slot");
        }
        released
    }

    /// ### English
    /// Applies a size accepted by the shell; the next selection picks it up.
    ///
    /// ### 中文
    /// 应用 shell 接受的尺寸；下一次槽位选择会使用它。
    pub fn reconfigure(&mut self, size: PhysicalSize<u32>) -> PhysicalSize<u32> {
        let accepted = self.window.set_desired_size(size);
        tracing::debug!(
            width = accepted.width,
            height = accepted.height,
            "window reconfigured"
        );
        accepted
    }

    fn step(
        &mut self,
        compositor: &mut C,
        delivered: Option<C::FrameToken>,
    ) -> Result<FrameOutcome, PresentError> {
        // A delivered token is the pending one; otherwise any pending token is stale.
        let pending = self.window.take_pending_callback();
        if let Some(token) = delivered.or(pending) {
            compositor.release_frame(token);
        }

        self.state = SchedulerState::Selecting;
        let outcome = match self.window.select_buffer(compositor)? {
            Some(slot) => {
                self.state = SchedulerState::Synthesizing;
                if let Some(canvas) = self.window.canvas_mut(slot) {
                    synth::fill(&self.synthesizer, canvas);
                }

                self.state = SchedulerState::Submitting;
                if let Some(current) = self.window.slot(slot) {
                    if let Some(handle) = current.handle() {
                        compositor.attach(handle);
                    }
                    compositor.damage(current.size());
                }
                FrameOutcome::Presented { slot }
            }
            None => {
                tracing::debug!("no free buffer slot, skipping frame");
                FrameOutcome::Skipped
            }
        };

        let token = compositor.request_frame();
        self.window.set_pending_callback(token);
        compositor.commit();
        self.fps.record_frame();

        match outcome {
            FrameOutcome::Presented { slot } => {
                self.window.mark_busy(slot);
                self.frames_presented += 1;
            }
            FrameOutcome::Skipped => self.frames_skipped += 1,
        }

        self.state = SchedulerState::AwaitingCallback;
        Ok(outcome)
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn window(&self) -> &PresentWindow<C> {
        &self.window
    }

    /// ### English
    /// Frame-rate observer; counts every committed step, skipped ones included.
    ///
    /// ### 中文
    /// 帧率观察器；统计每一次 commit 的步骤，包括被跳过的帧。
    pub fn frame_rate(&self) -> &FrameRateCounter {
        &self.fps
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// ### English
    /// Releases the frame token, every buffer handle and the pool.
    ///
    /// ### 中文
    /// 释放 frame token、全部 buffer 句柄以及内存池。
    pub fn teardown(self, compositor: &mut C) {
        tracing::info!(
            presented = self.frames_presented,
            skipped = self.frames_skipped,
            "tearing down window"
        );
        self.window.teardown(compositor);
    }
}
