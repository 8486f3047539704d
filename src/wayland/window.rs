//! ### English
//! Window creation: one `wl_surface` plus its shell role (legacy `wl_shell` or `xdg_toplevel`).
//!
//! ### 中文
//! 窗口创建：一个 `wl_surface` 及其 shell 角色（legacy `wl_shell` 或 `xdg_toplevel`）。

use wayland_client::protocol::wl_shell_surface::WlShellSurface;
use wayland_protocols::xdg::shell::client::{
    xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel, xdg_wm_base::XdgWmBase,
};

use crate::engine::shell::{ShellKind, ShellRole};

use super::BackendError;
use super::compositor::WaylandCompositor;
use super::display::WaylandDisplay;

/// ### English
/// Role object of the window surface.
///
/// ### 中文
/// 窗口 surface 的角色对象。
pub enum ShellSurface {
    Legacy {
        shell_surface: WlShellSurface,
    },
    Modern {
        wm_base: XdgWmBase,
        xdg_surface: XdgSurface,
        toplevel: XdgToplevel,
    },
}

impl ShellSurface {
    pub fn destroy(self) {
        match self {
            // wl_shell_surface is destroyed together with its wl_surface.
            ShellSurface::Legacy { shell_surface } => drop(shell_surface),
            ShellSurface::Modern {
                xdg_surface,
                toplevel,
                ..
            } => {
                toplevel.destroy();
                xdg_surface.destroy();
            }
        }
    }
}

impl ShellRole for ShellSurface {
    fn kind(&self) -> ShellKind {
        match self {
            ShellSurface::Legacy { .. } => ShellKind::LegacyShellSurface,
            ShellSurface::Modern { .. } => ShellKind::ModernShellSurface,
        }
    }

    fn pong(&mut self, serial: u32) {
        tracing::trace!(serial, "pong");
        match self {
            ShellSurface::Legacy { shell_surface } => shell_surface.pong(serial),
            ShellSurface::Modern { wm_base, .. } => wm_base.pong(serial),
        }
    }
}

/// ### English
/// Creates the window surface with the role of `kind` and returns it ready for the first frame.
///
/// For the modern shell the surface is committed without a buffer and the first configure is
/// awaited (and acknowledged) before this returns.
///
/// ### 中文
/// 以 `kind` 指定的角色创建窗口 surface，返回时已可呈现第一帧。
///
/// 对 modern shell，会先无 buffer 提交 surface，并在返回前等待（并确认）首个 configure。
pub fn create_window(
    display: &mut WaylandDisplay,
    kind: ShellKind,
    title: &str,
) -> Result<(WaylandCompositor, ShellSurface), BackendError> {
    tracing::info!(?kind, title, "creating window");

    let qh = display.queue_handle().clone();
    let wl_compositor = display
        .state
        .compositor
        .clone()
        .ok_or(BackendError::MissingGlobal("wl_compositor"))?;
    let shm = display
        .state
        .shm
        .clone()
        .ok_or(BackendError::MissingGlobal("wl_shm"))?;

    let surface = wl_compositor.create_surface(&qh, ());

    let shell = match kind {
        ShellKind::LegacyShellSurface => {
            let wl_shell = display
                .state
                .legacy_shell
                .clone()
                .ok_or(BackendError::NoShell)?;
            let shell_surface = wl_shell.get_shell_surface(&surface, &qh, ());
            shell_surface.set_title(title.to_string());
            shell_surface.set_toplevel();
            ShellSurface::Legacy { shell_surface }
        }
        ShellKind::ModernShellSurface => {
            let wm_base = display
                .state
                .wm_base
                .clone()
                .ok_or(BackendError::NoShell)?;
            let xdg_surface = wm_base.get_xdg_surface(&surface, &qh, ());
            let toplevel = xdg_surface.get_toplevel(&qh, ());
            toplevel.set_title(title.to_string());
            surface.commit();

            display.roundtrip()?;
            while !display.state.surface_configured {
                display.dispatch_blocking()?;
            }

            ShellSurface::Modern {
                wm_base,
                xdg_surface,
                toplevel,
            }
        }
    };

    tracing::info!("window created");
    Ok((WaylandCompositor::new(qh, shm, surface), shell))
}
