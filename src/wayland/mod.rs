/// ### English
/// Wayland backend: display connection, protocol handlers and the blocking event loop that
/// feeds the presentation core.
///
/// ### 中文
/// Wayland 后端：显示连接、协议处理器，以及为呈现核心供给事件的阻塞事件循环。
pub mod compositor;
pub mod display;
mod dispatch;
pub mod window;

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Receiver;
use wayland_client::backend::WaylandError;
use wayland_client::protocol::wl_callback::WlCallback;
use wayland_client::{ConnectError, DispatchError};

use crate::engine::config::PresentConfig;
use crate::engine::error::PresentError;
use crate::engine::event::{self, ClientEvent, Control};
use crate::engine::frame::PresentWindow;
use crate::engine::refresh::FrameScheduler;
use crate::engine::synth::Pattern;

pub use compositor::WaylandCompositor;
pub use display::WaylandDisplay;
pub use window::ShellSurface;

/// ### English
/// Fatal backend errors. Any of these ends the process with a non-zero status.
///
/// ### 中文
/// 后端致命错误；任意一种都会使进程以非零状态退出。
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to connect to the wayland display")]
    Connect(#[from] ConnectError),
    #[error("wayland event dispatch failed")]
    Dispatch(#[from] DispatchError),
    #[error("wayland connection error")]
    Wayland(#[from] WaylandError),
    #[error("i/o error on the wayland connection")]
    Io(#[from] std::io::Error),
    #[error("compositor does not advertise `{0}`")]
    MissingGlobal(&'static str),
    #[error("compositor does not support the ARGB8888 shm format")]
    UnsupportedFormat,
    #[error("incompatible shell: no usable shell global is advertised")]
    NoShell,
    #[error(transparent)]
    Present(#[from] PresentError),
}

/// ### English
/// Runs the client until the window is closed or `stop` is raised.
///
/// #### Parameters
/// - `config`: Pattern, shell preference, sizes and title.
/// - `stop`: Set asynchronously (e.g. from a signal handler); checked after every wakeup.
///
/// ### 中文
/// 运行客户端，直到窗口被关闭或 `stop` 被置位。
///
/// #### 参数
/// - `config`：图案、shell 偏好、尺寸与标题。
/// - `stop`：可异步置位（例如信号处理器）；每次唤醒后检查。
pub fn run(config: &PresentConfig, stop: &AtomicBool) -> Result<(), BackendError> {
    let (events, inbox) = crossbeam_channel::unbounded();
    let mut display = WaylandDisplay::connect(events)?;

    let display_size = display.output_size().unwrap_or_else(|| {
        tracing::warn!(
            width = config.initial_size.width,
            height = config.initial_size.height,
            "no output mode reported, using the initial size as display size"
        );
        config.initial_size
    });

    let kind = config
        .shell
        .choose(display.has_legacy_shell(), display.has_modern_shell())
        .ok_or(BackendError::NoShell)?;
    let (mut compositor, mut shell) = window::create_window(&mut display, kind, &config.title)?;

    tracing::info!(
        width = display_size.width,
        height = display_size.height,
        "initialising buffers"
    );
    let window = PresentWindow::new(display_size, config.min_size, config.initial_size);
    let mut scheduler = FrameScheduler::new(window, config.pattern.synthesizer());

    // Configure and ping notifications that arrived during window creation.
    let mut control = drain(&inbox, &mut scheduler, &mut compositor, &mut shell)?;
    if control == Control::Continue {
        scheduler.bootstrap(&mut compositor)?;
    }

    tracing::info!("starting loop");
    while control == Control::Continue && !stop.load(Ordering::Relaxed) {
        display.dispatch_blocking()?;
        control = drain(&inbox, &mut scheduler, &mut compositor, &mut shell)?;
    }
    tracing::info!("loop exited");

    tracing::info!("destroying window");
    scheduler.teardown(&mut compositor);
    shell.destroy();
    compositor.destroy();

    tracing::info!("disconnecting display");
    display.disconnect();
    Ok(())
}

fn drain(
    inbox: &Receiver<ClientEvent<WlCallback>>,
    scheduler: &mut FrameScheduler<WaylandCompositor, Pattern>,
    compositor: &mut WaylandCompositor,
    shell: &mut ShellSurface,
) -> Result<Control, BackendError> {
    for pending in inbox.try_iter() {
        if event::dispatch(scheduler, compositor, shell, pending)? == Control::Exit {
            return Ok(Control::Exit);
        }
    }
    Ok(Control::Continue)
}
