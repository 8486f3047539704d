//! ### English
//! The seam between the presentation core and the compositor connection.
//!
//! The core only needs pool registration, buffer creation, `attach/damage/commit` and a
//! one-shot frame callback. Notifications flow back as `ClientEvent`s (see `engine::event`).
//!
//! ### 中文
//! 呈现核心与合成器连接之间的接缝。
//!
//! 核心只需要：内存池注册、buffer 创建、`attach/damage/commit` 以及一次性 frame 回调。
//! 通知以 `ClientEvent` 的形式回流（见 `engine::event`）。

use std::os::fd::BorrowedFd;

use dpi::PhysicalSize;

/// ### English
/// Bytes per pixel of the fixed ARGB8888 layout.
///
/// ### 中文
/// 固定 ARGB8888 布局下每像素字节数。
pub const BYTES_PER_PIXEL: u32 = 4;

/// ### English
/// Pixel formats understood by the core (only one is ever requested).
///
/// ### 中文
/// 核心支持的像素格式（实际只会请求一种）。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// ### English
    /// 32-bit premultiplied ARGB, little-endian (`[b, g, r, a]` in memory).
    ///
    /// ### 中文
    /// 32 位预乘 ARGB，小端（内存中为 `[b, g, r, a]`）。
    Argb8888,
}

/// ### English
/// Placement and shape of one buffer inside the shared memory pool.
///
/// ### 中文
/// 单个 buffer 在共享内存池中的位置与形状。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferLayout {
    /// ### English
    /// Byte offset of the buffer's first pixel inside the pool.
    ///
    /// ### 中文
    /// buffer 首像素在池中的字节偏移。
    pub offset: usize,
    /// ### English
    /// Buffer size in pixels.
    ///
    /// ### 中文
    /// buffer 尺寸（像素）。
    pub size: PhysicalSize<u32>,
    /// ### English
    /// Bytes per row.
    ///
    /// ### 中文
    /// 每行字节数。
    pub stride: u32,
    pub format: PixelFormat,
}

impl BufferLayout {
    /// ### English
    /// Total bytes covered by this layout (`stride × height`).
    ///
    /// ### 中文
    /// 该布局覆盖的总字节数（`stride × height`）。
    pub fn byte_len(&self) -> usize {
        self.stride as usize * self.size.height as usize
    }
}

/// ### English
/// Row stride for a buffer `width` pixels wide.
///
/// ### 中文
/// 宽度为 `width` 像素的 buffer 的行跨度。
#[inline]
pub fn stride_for(width: u32) -> u32 {
    width * BYTES_PER_PIXEL
}

/// ### English
/// Compositor operations consumed by the core.
///
/// Handles are associated types so the core never names a protocol object. `Buffer` handles are
/// owned by the slot that created them; whoever implements this trait must route the buffer's
/// release notification back as `ClientEvent::BufferReleased { slot }`.
///
/// ### 中文
/// 核心所使用的合成器操作。
///
/// 句柄使用关联类型，核心不直接引用协议对象。`Buffer` 句柄由创建它的槽位持有；
/// 实现者必须把该 buffer 的 release 通知以 `ClientEvent::BufferReleased { slot }` 的形式送回。
pub trait Compositor {
    /// ### English
    /// Registered shared memory pool resource.
    ///
    /// ### 中文
    /// 已注册的共享内存池资源。
    type Pool;
    /// ### English
    /// Buffer object created from the pool.
    ///
    /// ### 中文
    /// 从池中创建的 buffer 对象。
    type Buffer;
    /// ### English
    /// One-shot "ready for next frame" registration.
    ///
    /// ### 中文
    /// 一次性的“可以绘制下一帧”注册。
    type FrameToken;

    /// ### English
    /// Registers the mapped backing store `fd` (exactly `byte_size` bytes) as a pool.
    ///
    /// ### 中文
    /// 将已映射的后备存储 `fd`（恰好 `byte_size` 字节）注册为内存池。
    fn create_pool(&mut self, fd: BorrowedFd<'_>, byte_size: i32) -> Self::Pool;

    /// ### English
    /// Creates a buffer for `slot` at `layout`. Returns `None` if the compositor refused.
    ///
    /// ### 中文
    /// 为 `slot` 在 `layout` 处创建 buffer；合成器拒绝时返回 `None`。
    fn create_buffer(
        &mut self,
        pool: &Self::Pool,
        slot: usize,
        layout: BufferLayout,
    ) -> Option<Self::Buffer>;

    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    fn destroy_pool(&mut self, pool: Self::Pool);

    /// ### English
    /// Attaches `buffer` to the surface at offset (0, 0).
    ///
    /// ### 中文
    /// 将 `buffer` 以偏移 (0, 0) attach 到 surface。
    fn attach(&mut self, buffer: &Self::Buffer);

    /// ### English
    /// Marks the region `(0, 0)..size` of the surface as damaged.
    ///
    /// ### 中文
    /// 将 surface 的 `(0, 0)..size` 区域标记为 damage。
    fn damage(&mut self, size: PhysicalSize<u32>);

    fn commit(&mut self);

    /// ### English
    /// Registers a frame callback applied by the next `commit`.
    ///
    /// ### 中文
    /// 注册一个 frame 回调，随下一次 `commit` 生效。
    fn request_frame(&mut self) -> Self::FrameToken;

    /// ### English
    /// Destroys a frame token (delivered or stale).
    ///
    /// ### 中文
    /// 销毁一个 frame token（已送达或已过期）。
    fn release_frame(&mut self, token: Self::FrameToken);
}
