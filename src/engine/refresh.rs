//! ### English
//! Frame pacing: the callback-driven frame scheduler and the frame-rate observer.
//!
//! ### 中文
//! 帧节奏控制：由回调驱动的帧调度器与帧率观察器。

mod fps;
mod scheduler;

pub use fps::FrameRateCounter;
pub use scheduler::{FrameOutcome, FrameScheduler, SchedulerState};
