//! ### English
//! Fatal error conditions of the presentation core.
//!
//! "No free slot" is not an error: it is reported as `None` by `select_buffer` and only skips
//! one frame.
//!
//! ### 中文
//! 呈现核心的致命错误。
//!
//! “没有空闲槽位”不是错误：`select_buffer` 以 `None` 表示，只会跳过一帧。

/// ### English
/// Unrecoverable failures while creating the shared memory pool.
///
/// ### 中文
/// 创建共享内存池时的不可恢复错误。
#[derive(Debug, thiserror::Error)]
pub enum PresentError {
    #[error("failed to create shared memory backing store")]
    ShmCreate(#[source] rustix::io::Errno),
    #[error("failed to resize shared memory backing store to {size} bytes")]
    ShmResize {
        size: usize,
        #[source]
        source: rustix::io::Errno,
    },
    #[error("failed to map {size} bytes of shared memory")]
    ShmMap {
        size: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid shared memory pool size: {0} bytes")]
    InvalidPoolSize(usize),
}
