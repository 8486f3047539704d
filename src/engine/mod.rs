/// ### English
/// Presentation core: shared memory pool, buffer slots, frame pacing and pixel synthesis.
/// Nothing in here names a protocol object; the compositor is reached through `Compositor`.
///
/// ### 中文
/// 呈现核心：共享内存池、buffer 槽位、帧节奏与像素合成。
/// 此处不引用任何协议对象；通过 `Compositor` 访问合成器。
pub mod compositor;
pub mod config;
pub mod error;
pub mod event;
pub mod frame;
pub mod refresh;
pub mod shell;
pub mod shm;
pub mod synth;

pub use compositor::Compositor;
pub use error::PresentError;
