/// ### English
/// `shm_present` crate root.
/// `engine` holds the presentation core (slots, pacing, synthesis); `wayland` binds it to a live
/// compositor connection.
///
/// ### 中文
/// `shm_present` 的 crate 根。
/// `engine` 包含呈现核心（槽位、帧节奏、像素合成）；`wayland` 将其绑定到实际的合成器连接。
pub mod engine;
pub mod wayland;
