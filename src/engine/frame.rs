//! ### English
//! Double-buffered slot pool for one window.
//!
//! A fixed arena of `BUFFER_COUNT` slots, each a fixed view into the window's shared memory
//! pool. The frame scheduler is the only writer of slot state; the compositor's release
//! notification is the only thing that clears `busy`.
//!
//! ### 中文
//! 单个窗口的双缓冲槽位池。
//!
//! 固定容量为 `BUFFER_COUNT` 的槽位数组，每个槽位是窗口共享内存池中的固定视图。
//! 帧调度器是槽位状态的唯一写者；只有合成器的 release 通知会清除 `busy`。

mod slot;

use dpi::PhysicalSize;

use super::compositor::{BufferLayout, Compositor, PixelFormat, stride_for};
use super::error::PresentError;
use super::shell::SizeBounds;
use super::shm::SharedMemoryPool;

pub use slot::BufferSlot;

/// ### English
/// Fixed slot count (double buffering).
///
/// ### 中文
/// 固定槽位数量（双缓冲）。
pub const BUFFER_COUNT: usize = 2;

/// ### English
/// Writable pixel storage of a free slot, handed to the synthesizer.
///
/// ### 中文
/// 空闲槽位的可写像素存储，交给像素合成器使用。
pub struct SlotCanvas<'a> {
    pub size: PhysicalSize<u32>,
    pub stride: u32,
    /// ### English
    /// Exactly `stride × height` bytes, starting at the slot's `data_offset`.
    ///
    /// ### 中文
    /// 恰好 `stride × height` 字节，从槽位的 `data_offset` 开始。
    pub pixels: &'a mut [u8],
}

/// ### English
/// Present state of one window: desired size, slot arena, pool and the outstanding frame token.
///
/// ### 中文
/// 单个窗口的呈现状态：期望尺寸、槽位数组、内存池以及未完成的 frame token。
pub struct PresentWindow<C: Compositor> {
    /// ### English
    /// Size the next selected slot must have (already clamped to `bounds`).
    ///
    /// ### 中文
    /// 下一个被选中的槽位应具有的尺寸（已钳制到 `bounds`）。
    desired: PhysicalSize<u32>,
    bounds: SizeBounds,
    /// ### English
    /// Display geometry captured at window creation; sizes the pool once.
    ///
    /// ### 中文
    /// 窗口创建时记录的显示器几何尺寸；只用于一次性确定池大小。
    display: PhysicalSize<u32>,
    slots: [BufferSlot<C::Buffer>; BUFFER_COUNT],
    pool: Option<SharedMemoryPool<C::Pool>>,
    /// ### English
    /// At most one outstanding frame callback.
    ///
    /// ### 中文
    /// 至多一个未完成的 frame 回调。
    pending_callback: Option<C::FrameToken>,
}

impl<C: Compositor> PresentWindow<C> {
    /// ### English
    /// Creates the window state. Nothing is allocated until the first `select_buffer`.
    ///
    /// #### Parameters
    /// - `display`: Display geometry; becomes the upper size bound and sizes the pool.
    /// - `min`: Minimum accepted window size (lowered to `display` on any axis where it is larger).
    /// - `initial`: Initial desired size (clamped into `[min, display]`).
    ///
    /// ### 中文
    /// 创建窗口状态；在第一次 `select_buffer` 之前不分配任何资源。
    ///
    /// #### 参数
    /// - `display`：显示器几何尺寸；作为尺寸上限并用于确定池大小。
    /// - `min`：窗口允许的最小尺寸（在超过 `display` 的轴上降为 `display`）。
    /// - `initial`：初始期望尺寸（钳制到 `[min, display]`）。
    pub fn new(
        display: PhysicalSize<u32>,
        min: PhysicalSize<u32>,
        initial: PhysicalSize<u32>,
    ) -> Self {
        let effective_min = PhysicalSize::new(
            min.width.min(display.width),
            min.height.min(display.height),
        );
        if effective_min != min {
            let (display_width, display_height) = (display.width, display.height);
            tracing::warn!(
                min_width = min.width,
                min_height = min.height,
                display_width,
                display_height,
                "display is smaller than the minimum window size, lowering the minimum"
            );
        }
        let bounds = SizeBounds::new(effective_min, display);
        let max_slot_bytes = max_slot_bytes(display);
        Self {
            desired: bounds.clamp(initial),
            bounds,
            display,
            slots: std::array::from_fn(|index| BufferSlot::new(index * max_slot_bytes)),
            pool: None,
            pending_callback: None,
        }
    }

    pub fn desired_size(&self) -> PhysicalSize<u32> {
        self.desired
    }

    pub fn bounds(&self) -> SizeBounds {
        self.bounds
    }

    /// ### English
    /// Stores a new desired size, clamped to the bounds. Returns the stored value.
    ///
    /// ### 中文
    /// 存储新的期望尺寸（钳制到范围内），并返回实际存储的值。
    pub fn set_desired_size(&mut self, size: PhysicalSize<u32>) -> PhysicalSize<u32> {
        self.desired = self.bounds.clamp(size);
        self.desired
    }

    /// ### English
    /// Bytes reserved per slot: `stride(display_width) × display_height`.
    ///
    /// ### 中文
    /// 每个槽位预留的字节数：`stride(display_width) × display_height`。
    pub fn max_slot_bytes(&self) -> usize {
        max_slot_bytes(self.display)
    }

    pub fn slot(&self, index: usize) -> Option<&BufferSlot<C::Buffer>> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[BufferSlot<C::Buffer>] {
        &self.slots
    }

    pub fn busy_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.busy).count()
    }

    pub fn pool(&self) -> Option<&SharedMemoryPool<C::Pool>> {
        self.pool.as_ref()
    }

    /// ### English
    /// Picks the first free slot and makes sure its buffer handle matches the desired size.
    ///
    /// - Returns `Ok(None)` when every slot is busy (backpressure: skip the frame).
    /// - Creates the shared memory pool on first use; failure to do so is fatal (`Err`).
    /// - Destroys a free slot's handle whose size differs, then recreates it at the same
    ///   `data_offset` with `stride = width × 4`.
    /// - Returns `Ok(None)` if the compositor refuses the new handle, or if the desired size no
    ///   longer fits in one slot's share of the pool.
    ///
    /// ### 中文
    /// 选出第一个空闲槽位，并确保其 buffer 句柄与期望尺寸一致。
    ///
    /// - 所有槽位都 busy 时返回 `Ok(None)`（背压：跳过这一帧）。
    /// - 首次使用时创建共享内存池；创建失败是致命错误（`Err`）。
    /// - 空闲槽位的句柄尺寸不一致时先销毁，再在同一 `data_offset` 以 `stride = width × 4` 重建。
    /// - 合成器拒绝创建新句柄，或期望尺寸已超出单个槽位在池中的份额时，返回 `Ok(None)`。
    pub fn select_buffer(&mut self, compositor: &mut C) -> Result<Option<usize>, PresentError> {
        let Some(index) = self.slots.iter().position(|slot| !slot.busy) else {
            return Ok(None);
        };

        let max_slot_bytes = self.max_slot_bytes();
        let pool = SharedMemoryPool::ensure_created(
            &mut self.pool,
            max_slot_bytes * BUFFER_COUNT,
            BUFFER_COUNT,
            compositor,
        )?;

        let desired = self.desired;
        let slot = &mut self.slots[index];

        if slot.size != desired {
            if let Some(stale) = slot.handle.take() {
                tracing::info!(
                    slot = index,
                    old_width = slot.size.width,
                    old_height = slot.size.height,
                    width = desired.width,
                    height = desired.height,
                    "window resized, destroying buffer"
                );
                compositor.destroy_buffer(stale);
            }
        }

        if slot.handle.is_none() {
            let layout = BufferLayout {
                offset: slot.data_offset,
                size: desired,
                stride: stride_for(desired.width),
                format: PixelFormat::Argb8888,
            };

            if layout.byte_len() > max_slot_bytes {
                tracing::warn!(
                    slot = index,
                    bytes = layout.byte_len(),
                    max_slot_bytes,
                    "desired size exceeds the shared memory pool slot"
                );
                return Ok(None);
            }

            let Some(handle) = compositor.create_buffer(pool.resource(), index, layout) else {
                tracing::warn!(slot = index, "failed to create buffer");
                return Ok(None);
            };

            slot.handle = Some(handle);
            slot.size = layout.size;
            slot.stride = layout.stride;
        }

        Ok(Some(index))
    }

    /// ### English
    /// Writable pixels of `index`, or `None` if the slot is busy, has no handle, or no pool exists.
    ///
    /// ### 中文
    /// 返回 `index` 槽位的可写像素；若槽位 busy、没有句柄或池不存在则返回 `None`。
    pub fn canvas_mut(&mut self, index: usize) -> Option<SlotCanvas<'_>> {
        let slot = self.slots.get(index)?;
        if slot.busy || slot.handle.is_none() {
            return None;
        }

        let size = slot.size;
        let stride = slot.stride;
        let pixels = self
            .pool
            .as_mut()?
            .region_mut(slot.data_offset, slot.byte_len())?;
        Some(SlotCanvas {
            size,
            stride,
            pixels,
        })
    }

    /// ### English
    /// Read-only pixels of `index` (whatever was last rendered there).
    ///
    /// ### 中文
    /// `index` 槽位的只读像素（即最近一次渲染的内容）。
    pub fn pixels(&self, index: usize) -> Option<&[u8]> {
        let slot = self.slots.get(index)?;
        self.pool.as_ref()?.region(slot.data_offset, slot.byte_len())
    }

    /// ### English
    /// Marks slot `index` as held by the compositor; done once its buffer was committed.
    ///
    /// ### 中文
    /// 将槽位 `index` 标记为被合成器持有；在其 buffer 提交后调用。
    pub fn mark_busy(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.busy = true;
        }
    }

    /// ### English
    /// Out-of-band release: the compositor no longer reads slot `index`.
    ///
    /// Returns `false` for an out-of-range index.
    ///
    /// ### 中文
    /// 带外 release：合成器不再读取槽位 `index`。
    ///
    /// 索引越界时返回 `false`。
    pub fn release(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.busy = false;
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_pending_callback(&mut self) -> Option<C::FrameToken> {
        self.pending_callback.take()
    }

    pub(crate) fn set_pending_callback(&mut self, token: C::FrameToken) {
        self.pending_callback = Some(token);
    }

    pub fn has_pending_callback(&self) -> bool {
        self.pending_callback.is_some()
    }

    /// ### English
    /// Releases every compositor resource owned by the window, then unmaps the pool.
    ///
    /// ### 中文
    /// 释放窗口持有的全部合成器资源，然后解除内存池映射。
    pub fn teardown(mut self, compositor: &mut C) {
        if let Some(token) = self.pending_callback.take() {
            compositor.release_frame(token);
        }

        for slot in &mut self.slots {
            if let Some(handle) = slot.handle.take() {
                compositor.destroy_buffer(handle);
            }
        }

        if let Some(pool) = self.pool.take() {
            pool.destroy(compositor);
        }
    }
}

fn max_slot_bytes(display: PhysicalSize<u32>) -> usize {
    stride_for(display.width) as usize * display.height as usize
}
