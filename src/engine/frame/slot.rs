use dpi::PhysicalSize;

/// ### English
/// One double-buffering unit: a fixed region of the shared memory pool plus its present state.
///
/// A slot may only be written while `busy` is false. `busy` is set on submit and cleared only by
/// the compositor's release notification.
///
/// ### 中文
/// 一个双缓冲单元：共享内存池中的固定区域及其呈现状态。
///
/// 仅在 `busy` 为 false 时允许写入。`busy` 在提交时置位，只能由合成器的 release 通知清除。
pub struct BufferSlot<B> {
    /// ### English
    /// Whether the compositor may still be reading this slot.
    ///
    /// ### 中文
    /// 合成器是否可能仍在读取该槽位。
    pub(super) busy: bool,
    /// ### English
    /// Dimensions the current handle was created with (`0×0` before the first handle).
    ///
    /// ### 中文
    /// 当前句柄创建时的尺寸（首个句柄创建前为 `0×0`）。
    pub(super) size: PhysicalSize<u32>,
    /// ### English
    /// Row stride of the current handle in bytes.
    ///
    /// ### 中文
    /// 当前句柄的行跨度（字节）。
    pub(super) stride: u32,
    /// ### English
    /// Compositor buffer handle, lazily (re)created.
    ///
    /// ### 中文
    /// 合成器 buffer 句柄，惰性（重新）创建。
    pub(super) handle: Option<B>,
    /// ### English
    /// Byte offset of this slot inside the pool (`slot_index × max_slot_bytes`); never changes.
    ///
    /// ### 中文
    /// 该槽位在池中的字节偏移（`slot_index × max_slot_bytes`），永不改变。
    pub(super) data_offset: usize,
}

impl<B> BufferSlot<B> {
    pub(super) fn new(data_offset: usize) -> Self {
        Self {
            busy: false,
            size: PhysicalSize::new(0, 0),
            stride: 0,
            handle: None,
            data_offset,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn data_offset(&self) -> usize {
        self.data_offset
    }

    pub fn handle(&self) -> Option<&B> {
        self.handle.as_ref()
    }

    /// ### English
    /// Bytes covered by the current handle (`stride × height`).
    ///
    /// ### 中文
    /// 当前句柄覆盖的字节数（`stride × height`）。
    pub fn byte_len(&self) -> usize {
        self.stride as usize * self.size.height as usize
    }
}
