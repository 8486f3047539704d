//! ### English
//! Display connection: registry discovery, capability checks and the blocking read loop.
//!
//! ### 中文
//! 显示连接：registry 发现、能力检查以及阻塞式读取循环。

use std::io;

use crossbeam_channel::Sender;
use dpi::PhysicalSize;
use rustix::event::{PollFd, PollFlags, poll};
use rustix::io::Errno;
use wayland_client::backend::WaylandError;
use wayland_client::protocol::{
    wl_callback::WlCallback, wl_compositor::WlCompositor, wl_output::WlOutput,
    wl_registry::WlRegistry, wl_shell::WlShell, wl_shm, wl_shm::WlShm,
};
use wayland_client::{Connection, EventQueue, Proxy, QueueHandle};
use wayland_protocols::xdg::shell::client::xdg_wm_base::XdgWmBase;

use crate::engine::event::ClientEvent;

use super::BackendError;

/// ### English
/// Dispatch data for every protocol object of the client.
///
/// Protocol handlers record globals here and forward render-relevant notifications as
/// `ClientEvent`s over `events`.
///
/// ### 中文
/// 客户端所有协议对象的 dispatch 数据。
///
/// 协议处理器在此记录全局对象，并通过 `events` 把与渲染相关的通知转发为 `ClientEvent`。
pub struct ClientState {
    pub(super) compositor: Option<WlCompositor>,
    pub(super) shm: Option<WlShm>,
    pub(super) legacy_shell: Option<WlShell>,
    pub(super) wm_base: Option<XdgWmBase>,
    /// ### English
    /// First advertised output; later outputs are ignored.
    ///
    /// ### 中文
    /// 第一个被通告的 output；之后的 output 会被忽略。
    pub(super) output: Option<WlOutput>,
    pub(super) formats: Vec<wl_shm::Format>,
    /// ### English
    /// Current (or first reported) mode of `output`.
    ///
    /// ### 中文
    /// `output` 的当前（或首个上报的）mode。
    pub(super) output_mode: Option<PhysicalSize<u32>>,
    /// ### English
    /// Set once the modern shell surface received its first configure.
    ///
    /// ### 中文
    /// modern shell surface 收到首个 configure 后置位。
    pub(super) surface_configured: bool,
    events: Sender<ClientEvent<WlCallback>>,
}

impl ClientState {
    fn new(events: Sender<ClientEvent<WlCallback>>) -> Self {
        Self {
            compositor: None,
            shm: None,
            legacy_shell: None,
            wm_base: None,
            output: None,
            formats: Vec::new(),
            output_mode: None,
            surface_configured: false,
            events,
        }
    }

    pub(super) fn emit(&self, event: ClientEvent<WlCallback>) {
        if self.events.send(event).is_err() {
            tracing::trace!("event inbox closed, dropping notification");
        }
    }
}

/// ### English
/// Connected display plus the event queue all client objects are dispatched on.
///
/// ### 中文
/// 已连接的显示，以及所有客户端对象所使用的事件队列。
pub struct WaylandDisplay {
    connection: Connection,
    queue: EventQueue<ClientState>,
    qh: QueueHandle<ClientState>,
    pub(super) state: ClientState,
    _registry: WlRegistry,
}

impl WaylandDisplay {
    /// ### English
    /// Connects to `$WAYLAND_DISPLAY`, binds the required globals and checks capabilities.
    ///
    /// Fails if `wl_compositor` / `wl_shm` are missing or `ARGB8888` is not advertised.
    ///
    /// ### 中文
    /// 连接 `$WAYLAND_DISPLAY`，绑定所需全局对象并检查能力。
    ///
    /// 缺少 `wl_compositor` / `wl_shm`，或未通告 `ARGB8888` 时失败。
    pub fn connect(events: Sender<ClientEvent<WlCallback>>) -> Result<Self, BackendError> {
        tracing::info!("connecting to display");
        let connection = Connection::connect_to_env()?;
        let mut queue = connection.new_event_queue();
        let qh = queue.handle();
        let registry = connection.display().get_registry(&qh, ());
        let mut state = ClientState::new(events);

        queue.roundtrip(&mut state)?;
        if state.compositor.is_none() {
            return Err(BackendError::MissingGlobal("wl_compositor"));
        }
        if state.shm.is_none() {
            return Err(BackendError::MissingGlobal("wl_shm"));
        }

        // Second roundtrip collects shm formats and output modes.
        queue.roundtrip(&mut state)?;
        if !state.formats.contains(&wl_shm::Format::Argb8888) {
            return Err(BackendError::UnsupportedFormat);
        }

        tracing::info!("connected");
        Ok(Self {
            connection,
            queue,
            qh,
            state,
            _registry: registry,
        })
    }

    pub fn queue_handle(&self) -> &QueueHandle<ClientState> {
        &self.qh
    }

    /// ### English
    /// Display geometry from the first output, if a mode was reported.
    ///
    /// ### 中文
    /// 来自第一个 output 的显示器几何尺寸（若已上报 mode）。
    pub fn output_size(&self) -> Option<PhysicalSize<u32>> {
        self.state.output_mode
    }

    pub fn has_legacy_shell(&self) -> bool {
        self.state.legacy_shell.is_some()
    }

    pub fn has_modern_shell(&self) -> bool {
        self.state.wm_base.is_some()
    }

    pub fn roundtrip(&mut self) -> Result<(), BackendError> {
        self.queue.roundtrip(&mut self.state)?;
        Ok(())
    }

    /// ### English
    /// One dispatch iteration: flush, block until the connection is readable, read, dispatch.
    ///
    /// Returns early (without reading) when the wait is interrupted by a signal, so the caller
    /// can check its stop flag.
    ///
    /// ### 中文
    /// 一次 dispatch 迭代：flush，阻塞直到连接可读，读取，dispatch。
    ///
    /// 若等待被信号中断则提前返回（不读取），以便调用方检查停止标记。
    pub fn dispatch_blocking(&mut self) -> Result<(), BackendError> {
        self.queue.dispatch_pending(&mut self.state)?;
        flush_tolerant(self.queue.flush())?;

        let Some(guard) = self.queue.prepare_read() else {
            self.queue.dispatch_pending(&mut self.state)?;
            return Ok(());
        };

        {
            let fd = guard.connection_fd();
            let mut fds = [PollFd::new(&fd, PollFlags::IN | PollFlags::ERR)];
            match poll(&mut fds, -1) {
                Ok(_) => {}
                Err(Errno::INTR) => return Ok(()),
                Err(errno) => return Err(BackendError::Io(io::Error::from(errno))),
            }
        }

        match guard.read() {
            Ok(_) => {}
            Err(WaylandError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => {}
            Err(err) => return Err(err.into()),
        }

        self.queue.dispatch_pending(&mut self.state)?;
        Ok(())
    }

    /// ### English
    /// Flushes outstanding requests and releases the globals that have a destructor.
    ///
    /// ### 中文
    /// flush 未发送的请求，并释放带有析构请求的全局对象。
    pub fn disconnect(mut self) {
        if let Some(output) = self.state.output.take() {
            if output.version() >= 3 {
                output.release();
            }
        }
        if let Some(wm_base) = self.state.wm_base.take() {
            wm_base.destroy();
        }
        if let Err(err) = self.connection.flush() {
            tracing::warn!(error = %err, "failed to flush display on disconnect");
        }
        tracing::info!("disconnected");
    }
}

fn flush_tolerant(result: Result<(), WaylandError>) -> Result<(), BackendError> {
    match result {
        Err(WaylandError::Io(err)) if err.kind() == io::ErrorKind::WouldBlock => Ok(()),
        other => other.map_err(BackendError::from),
    }
}
