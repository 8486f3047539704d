//! ### English
//! Closed set of notifications delivered by the compositor connection, and the single function
//! that applies them.
//!
//! Protocol handlers only translate wire events into `ClientEvent`s; all state changes happen
//! in `dispatch`, in delivery order.
//!
//! ### 中文
//! 合成器连接送达的封闭通知集合，以及应用这些通知的唯一函数。
//!
//! 协议处理器只负责把线上事件翻译为 `ClientEvent`；所有状态变更都在 `dispatch` 中按送达顺序发生。

use dpi::PhysicalSize;

use super::compositor::Compositor;
use super::error::PresentError;
use super::refresh::{FrameOutcome, FrameScheduler};
use super::shell::ShellRole;
use super::synth::PixelSynthesizer;

/// ### English
/// One notification from the compositor.
///
/// ### 中文
/// 来自合成器的一条通知。
#[derive(Debug)]
pub enum ClientEvent<T> {
    /// ### English
    /// The compositor is ready for the next frame; carries the fired token.
    ///
    /// ### 中文
    /// 合成器已准备好下一帧；携带已触发的 token。
    FrameReady(T),
    /// ### English
    /// The compositor stopped reading the buffer of slot `slot`.
    ///
    /// ### 中文
    /// 合成器已停止读取槽位 `slot` 的 buffer。
    BufferReleased { slot: usize },
    /// ### English
    /// The shell proposed a new window size (`0` on an axis means "no preference").
    ///
    /// ### 中文
    /// shell 提议了新的窗口尺寸（某一轴为 `0` 表示 “无偏好”）。
    Reconfigured { width: u32, height: u32 },
    /// ### English
    /// Liveness ping that must be answered with a pong.
    ///
    /// ### 中文
    /// 必须以 pong 回应的存活 ping。
    Ping { serial: u32 },
    /// ### English
    /// The user asked to close the window.
    ///
    /// ### 中文
    /// 用户请求关闭窗口。
    CloseRequested,
}

/// ### English
/// What the event loop should do after an event was applied.
///
/// ### 中文
/// 应用事件后事件循环应采取的动作。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// ### English
/// Applies one event to the scheduler.
///
/// #### Parameters
/// - `scheduler`: Present loop state of the window.
/// - `compositor`: Connection the scheduler renders through.
/// - `shell`: Active shell variant (answers pings, negotiates size).
/// - `event`: Notification to apply.
///
/// ### 中文
/// 将一个事件应用到调度器。
///
/// #### 参数
/// - `scheduler`：窗口的呈现循环状态。
/// - `compositor`：调度器用于渲染的连接。
/// - `shell`：当前使用的 shell 变体（响应 ping、协商尺寸）。
/// - `event`：需要应用的通知。
pub fn dispatch<C, S, R>(
    scheduler: &mut FrameScheduler<C, S>,
    compositor: &mut C,
    shell: &mut R,
    event: ClientEvent<C::FrameToken>,
) -> Result<Control, PresentError>
where
    C: Compositor,
    S: PixelSynthesizer,
    R: ShellRole + ?Sized,
{
    match event {
        ClientEvent::FrameReady(token) => {
            if let FrameOutcome::Skipped = scheduler.on_frame_ready(compositor, token)? {
                tracing::trace!("frame skipped, callback re-armed");
            }
        }
        ClientEvent::BufferReleased { slot } => {
            scheduler.release(slot);
        }
        ClientEvent::Reconfigured { width, height } => {
            let window = scheduler.window();
            let accepted = shell.accept_configure(
                PhysicalSize::new(width, height),
                window.desired_size(),
                window.bounds(),
            );
            scheduler.reconfigure(accepted);
        }
        ClientEvent::Ping { serial } => shell.pong(serial),
        ClientEvent::CloseRequested => {
            tracing::info!("close requested");
            return Ok(Control::Exit);
        }
    }

    Ok(Control::Continue)
}
