//! ### English
//! `shm-present` entry point: logging, configuration, interrupt handling, exit status.
//!
//! ### 中文
//! `shm-present` 入口：日志、配置、中断处理与退出状态。

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use shm_present::engine::config::PresentConfig;
use shm_present::wayland;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PresentConfig::from_env();
    tracing::debug!(?config, "configuration");

    let stop = Arc::new(AtomicBool::new(false));
    if let Err(err) = install_stop_handlers(&stop) {
        tracing::error!(error = %err, "failed to install signal handlers");
        return ExitCode::FAILURE;
    }

    match wayland::run(&config, &stop) {
        Ok(()) => {
            tracing::info!("done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let mut source = err.source();
            tracing::error!(error = %err, "fatal");
            while let Some(cause) = source {
                tracing::error!(cause = %cause, "caused by");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

// A second signal while the first is still pending terminates immediately.
fn install_stop_handlers(stop: &Arc<AtomicBool>) -> std::io::Result<()> {
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(stop))?;
        signal_hook::flag::register(signal, Arc::clone(stop))?;
    }
    Ok(())
}
