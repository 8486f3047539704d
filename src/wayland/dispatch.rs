//! ### English
//! Protocol event handlers. They record globals and translate wire events into `ClientEvent`s;
//! they never touch slot or scheduler state.
//!
//! ### 中文
//! 协议事件处理器：记录全局对象，并把线上事件翻译为 `ClientEvent`；从不直接修改槽位或调度器状态。

use dpi::PhysicalSize;
use wayland_client::protocol::{
    wl_buffer, wl_callback, wl_compositor, wl_output, wl_registry, wl_shell, wl_shell_surface,
    wl_shm, wl_shm_pool, wl_surface,
};
use wayland_client::{Connection, Dispatch, QueueHandle, WEnum, delegate_noop};
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};

use crate::engine::event::ClientEvent;

use super::display::ClientState;

impl Dispatch<wl_registry::WlRegistry, ()> for ClientState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        else {
            return;
        };

        tracing::debug!(name, %interface, version, "registry global");
        match interface.as_str() {
            "wl_compositor" => {
                state.compositor = Some(registry.bind(name, version.min(4), qh, ()));
            }
            "wl_shm" => {
                state.shm = Some(registry.bind(name, version.min(1), qh, ()));
            }
            "wl_shell" => {
                state.legacy_shell = Some(registry.bind(name, version.min(1), qh, ()));
            }
            "xdg_wm_base" => {
                state.wm_base = Some(registry.bind(name, version.min(2), qh, ()));
            }
            "wl_output" if state.output.is_none() => {
                state.output = Some(registry.bind(name, version.min(3), qh, ()));
            }
            "wl_output" => tracing::debug!(name, "ignoring additional output"),
            _ => {}
        }
    }
}

impl Dispatch<wl_shm::WlShm, ()> for ClientState {
    fn event(
        state: &mut Self,
        _: &wl_shm::WlShm,
        event: wl_shm::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_shm::Event::Format {
            format: WEnum::Value(format),
        } = event
        {
            tracing::trace!(?format, "shm format");
            state.formats.push(format);
        }
    }
}

impl Dispatch<wl_output::WlOutput, ()> for ClientState {
    fn event(
        state: &mut Self,
        _: &wl_output::WlOutput,
        event: wl_output::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_output::Event::Geometry {
                physical_width,
                physical_height,
                make,
                model,
                ..
            } => {
                tracing::debug!(%make, %model, physical_width, physical_height, "output geometry");
            }
            wl_output::Event::Mode {
                flags,
                width,
                height,
                refresh,
            } => {
                let current = matches!(flags, WEnum::Value(flags) if flags.contains(wl_output::Mode::Current));
                tracing::info!(width, height, refresh, current, "output mode");
                if (current || state.output_mode.is_none()) && width > 0 && height > 0 {
                    state.output_mode = Some(PhysicalSize::new(width as u32, height as u32));
                }
            }
            other => tracing::debug!(?other, "output event"),
        }
    }
}

impl Dispatch<wl_buffer::WlBuffer, usize> for ClientState {
    fn event(
        state: &mut Self,
        _: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        slot: &usize,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            state.emit(ClientEvent::BufferReleased { slot: *slot });
        }
    }
}

impl Dispatch<wl_callback::WlCallback, ()> for ClientState {
    fn event(
        state: &mut Self,
        callback: &wl_callback::WlCallback,
        event: wl_callback::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_callback::Event::Done { .. } = event {
            state.emit(ClientEvent::FrameReady(callback.clone()));
        }
    }
}

impl Dispatch<wl_shell_surface::WlShellSurface, ()> for ClientState {
    fn event(
        state: &mut Self,
        _: &wl_shell_surface::WlShellSurface,
        event: wl_shell_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_shell_surface::Event::Ping { serial } => state.emit(ClientEvent::Ping { serial }),
            wl_shell_surface::Event::Configure { width, height, .. } => {
                tracing::debug!(width, height, "shell surface configure");
                state.emit(ClientEvent::Reconfigured {
                    width: width.max(0) as u32,
                    height: height.max(0) as u32,
                });
            }
            _ => {}
        }
    }
}

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for ClientState {
    fn event(
        state: &mut Self,
        _: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            state.emit(ClientEvent::Ping { serial });
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ()> for ClientState {
    fn event(
        state: &mut Self,
        xdg_surface: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            xdg_surface.ack_configure(serial);
            state.surface_configured = true;
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ()> for ClientState {
    fn event(
        state: &mut Self,
        _: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                tracing::debug!(width, height, "toplevel configure");
                state.emit(ClientEvent::Reconfigured {
                    width: width.max(0) as u32,
                    height: height.max(0) as u32,
                });
            }
            xdg_toplevel::Event::Close => state.emit(ClientEvent::CloseRequested),
            _ => {}
        }
    }
}

delegate_noop!(ClientState: wl_compositor::WlCompositor);
delegate_noop!(ClientState: wl_shm_pool::WlShmPool);
delegate_noop!(ClientState: wl_shell::WlShell);
delegate_noop!(ClientState: ignore wl_surface::WlSurface);
