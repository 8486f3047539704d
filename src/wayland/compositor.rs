//! ### English
//! `Compositor` implementation over a live `wl_surface`.
//!
//! ### 中文
//! 基于实际 `wl_surface` 的 `Compositor` 实现。

use std::os::fd::BorrowedFd;

use dpi::PhysicalSize;
use wayland_client::protocol::{
    wl_buffer::WlBuffer, wl_callback::WlCallback, wl_shm, wl_shm::WlShm, wl_shm_pool::WlShmPool,
    wl_surface::WlSurface,
};
use wayland_client::{Proxy, QueueHandle};

use crate::engine::compositor::{BufferLayout, Compositor, PixelFormat};

use super::display::ClientState;

/// ### English
/// Surface-bound compositor handle used by the frame scheduler.
///
/// ### 中文
/// 帧调度器使用的、绑定到 surface 的合成器句柄。
pub struct WaylandCompositor {
    qh: QueueHandle<ClientState>,
    shm: WlShm,
    surface: WlSurface,
}

impl WaylandCompositor {
    pub(super) fn new(qh: QueueHandle<ClientState>, shm: WlShm, surface: WlSurface) -> Self {
        Self { qh, shm, surface }
    }

    /// ### English
    /// Destroys the surface. The shell role object must be destroyed first.
    ///
    /// ### 中文
    /// 销毁 surface；必须先销毁 shell 角色对象。
    pub fn destroy(self) {
        self.surface.destroy();
    }
}

impl Compositor for WaylandCompositor {
    type Pool = WlShmPool;
    type Buffer = WlBuffer;
    type FrameToken = WlCallback;

    fn create_pool(&mut self, fd: BorrowedFd<'_>, byte_size: i32) -> WlShmPool {
        self.shm.create_pool(fd, byte_size, &self.qh, ())
    }

    fn create_buffer(
        &mut self,
        pool: &WlShmPool,
        slot: usize,
        layout: BufferLayout,
    ) -> Option<WlBuffer> {
        let offset = i32::try_from(layout.offset).ok()?;
        let width = i32::try_from(layout.size.width).ok()?;
        let height = i32::try_from(layout.size.height).ok()?;
        let stride = i32::try_from(layout.stride).ok()?;
        let format = match layout.format {
            PixelFormat::Argb8888 => wl_shm::Format::Argb8888,
        };

        let buffer = pool.create_buffer(offset, width, height, stride, format, &self.qh, slot);
        buffer.is_alive().then_some(buffer)
    }

    fn destroy_buffer(&mut self, buffer: WlBuffer) {
        buffer.destroy();
    }

    fn destroy_pool(&mut self, pool: WlShmPool) {
        pool.destroy();
    }

    fn attach(&mut self, buffer: &WlBuffer) {
        self.surface.attach(Some(buffer), 0, 0);
    }

    fn damage(&mut self, size: PhysicalSize<u32>) {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        self.surface.damage(0, 0, width, height);
    }

    fn commit(&mut self) {
        self.surface.commit();
    }

    fn request_frame(&mut self) -> WlCallback {
        self.surface.frame(&self.qh, ())
    }

    // wl_callback has no destructor request; the server destroys it after `done`.
    fn release_frame(&mut self, token: WlCallback) {
        drop(token);
    }
}
