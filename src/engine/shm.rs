//! ### English
//! Shared memory pool backing every buffer slot of a window.
//!
//! One anonymous `memfd` region, sized once from the display geometry, mapped read/write and
//! registered with the compositor. The region is shared with the compositor process; which part
//! of it may be written is decided by the slot busy flags in `engine::frame`.
//!
//! ### 中文
//! 承载窗口所有 buffer 槽位的共享内存池。
//!
//! 一块匿名 `memfd` 内存，按显示器几何尺寸一次性确定大小，以读写方式映射并注册到合成器。
//! 该内存与合成器进程共享；哪一部分可以写入由 `engine::frame` 中的槽位 busy 标记决定。

use std::fs::File;
use std::os::fd::AsFd;

use memmap2::{MmapMut, MmapOptions};
use rustix::fs::{MemfdFlags, ftruncate, memfd_create};

use super::compositor::Compositor;
use super::error::PresentError;

const MEMFD_NAME: &str = "shm-present-pool";

/// ### English
/// Mapped shared memory region plus its compositor-side pool resource.
///
/// `byte_size` is fixed for the pool's lifetime.
///
/// ### 中文
/// 已映射的共享内存区域及其合成器侧的 pool 资源。
///
/// `byte_size` 在池的整个生命周期内固定不变。
pub struct SharedMemoryPool<P> {
    /// ### English
    /// Backing descriptor (kept open for the lifetime of the mapping).
    ///
    /// ### 中文
    /// 后备文件描述符（在映射存续期间保持打开）。
    _file: File,
    /// ### English
    /// Read/write shared mapping of the whole region.
    ///
    /// ### 中文
    /// 整个区域的读写共享映射。
    map: MmapMut,
    byte_size: usize,
    capacity_slots: usize,
    /// ### English
    /// Compositor-side pool resource.
    ///
    /// ### 中文
    /// 合成器侧的 pool 资源。
    resource: P,
}

impl<P> SharedMemoryPool<P> {
    /// ### English
    /// Creates the pool in `pool` unless it already exists, then returns it.
    ///
    /// Allocates an anonymous backing store, grows it to exactly `capacity_bytes`, maps it and
    /// registers it with `compositor`. Any failure is fatal; nothing is retried.
    ///
    /// #### Parameters
    /// - `pool`: Window-owned pool storage (`None` until the first call).
    /// - `capacity_bytes`: Total size, `max_slot_bytes × capacity_slots`.
    /// - `capacity_slots`: Number of slots carved out of the region.
    /// - `compositor`: Connection used to register the pool.
    ///
    /// ### 中文
    /// 若 `pool` 尚不存在则创建，然后返回它。
    ///
    /// 分配匿名后备存储，将其扩展到恰好 `capacity_bytes`，映射并向 `compositor` 注册。
    /// 任何失败都是致命的，不会重试。
    ///
    /// #### 参数
    /// - `pool`：窗口持有的池存储（首次调用前为 `None`）。
    /// - `capacity_bytes`：总大小，即 `max_slot_bytes × capacity_slots`。
    /// - `capacity_slots`：从该区域切分出的槽位数量。
    /// - `compositor`：用于注册内存池的连接。
    pub fn ensure_created<'a, C>(
        pool: &'a mut Option<Self>,
        capacity_bytes: usize,
        capacity_slots: usize,
        compositor: &mut C,
    ) -> Result<&'a mut Self, PresentError>
    where
        C: Compositor<Pool = P>,
    {
        let existing = match pool.take() {
            Some(existing) => existing,
            None => Self::create(capacity_bytes, capacity_slots, compositor)?,
        };
        Ok(pool.insert(existing))
    }

    fn create<C>(
        capacity_bytes: usize,
        capacity_slots: usize,
        compositor: &mut C,
    ) -> Result<Self, PresentError>
    where
        C: Compositor<Pool = P>,
    {
        let wire_size = i32::try_from(capacity_bytes)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(PresentError::InvalidPoolSize(capacity_bytes))?;

        tracing::info!(
            size = capacity_bytes,
            slots = capacity_slots,
            "creating shared memory pool"
        );

        let fd = memfd_create(MEMFD_NAME, MemfdFlags::CLOEXEC).map_err(PresentError::ShmCreate)?;
        ftruncate(&fd, capacity_bytes as u64).map_err(|source| PresentError::ShmResize {
            size: capacity_bytes,
            source,
        })?;
        let file = File::from(fd);

        // SAFETY: the memfd is private to this process and the compositor; it is never
        // truncated after this point, so the mapping stays valid for `capacity_bytes`.
        let map = unsafe { MmapOptions::new().len(capacity_bytes).map_mut(&file) }.map_err(
            |source| PresentError::ShmMap {
                size: capacity_bytes,
                source,
            },
        )?;

        let resource = compositor.create_pool(file.as_fd(), wire_size);

        Ok(Self {
            _file: file,
            map,
            byte_size: capacity_bytes,
            capacity_slots,
            resource,
        })
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn capacity_slots(&self) -> usize {
        self.capacity_slots
    }

    /// ### English
    /// Compositor-side pool resource, used to create buffers.
    ///
    /// ### 中文
    /// 合成器侧的 pool 资源，用于创建 buffer。
    pub fn resource(&self) -> &P {
        &self.resource
    }

    /// ### English
    /// Mutable view of `len` bytes starting at `offset`, or `None` if out of range.
    ///
    /// ### 中文
    /// 从 `offset` 开始 `len` 字节的可变视图；越界时返回 `None`。
    pub fn region_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        self.map.get_mut(offset..end)
    }

    /// ### English
    /// Read-only view of `len` bytes starting at `offset`, or `None` if out of range.
    ///
    /// ### 中文
    /// 从 `offset` 开始 `len` 字节的只读视图；越界时返回 `None`。
    pub fn region(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.map.get(offset..end)
    }

    /// ### English
    /// Destroys the compositor-side pool; the mapping and descriptor are released on drop.
    ///
    /// ### 中文
    /// 销毁合成器侧的 pool；映射与文件描述符在 drop 时释放。
    pub fn destroy<C>(self, compositor: &mut C)
    where
        C: Compositor<Pool = P>,
    {
        let Self { resource, .. } = self;
        compositor.destroy_pool(resource);
    }
}
