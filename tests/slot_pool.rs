mod common;

use common::{Call, MockCompositor};
use dpi::PhysicalSize;
use shm_present::engine::compositor::{BufferLayout, PixelFormat};
use shm_present::engine::config::MIN_SIZE;
use shm_present::engine::frame::{BUFFER_COUNT, PresentWindow};

const DISPLAY: PhysicalSize<u32> = PhysicalSize::new(640, 480);
const SLOT_BYTES: usize = 640 * 4 * 480;

fn window() -> PresentWindow<MockCompositor> {
    PresentWindow::new(DISPLAY, MIN_SIZE, DISPLAY)
}

#[test]
fn nothing_is_allocated_before_first_selection() {
    let window = window();
    assert!(window.pool().is_none());
    assert_eq!(window.max_slot_bytes(), SLOT_BYTES);
    assert!(window.slots().iter().all(|slot| slot.handle().is_none()));
}

#[test]
fn both_slots_are_laid_out_at_fixed_offsets() {
    let mut compositor = MockCompositor::new();
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    window.mark_busy(0);
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(1));
    window.mark_busy(1);
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), None);

    assert_eq!(
        compositor.count(|call| matches!(call, Call::CreatePool { .. })),
        1
    );
    assert!(compositor.calls.contains(&Call::CreatePool {
        byte_size: (SLOT_BYTES * BUFFER_COUNT) as i32
    }));

    let layouts: Vec<_> = compositor
        .created_buffers()
        .into_iter()
        .map(|(_, slot, layout)| (slot, layout))
        .collect();
    assert_eq!(
        layouts,
        vec![
            (
                0,
                BufferLayout {
                    offset: 0,
                    size: DISPLAY,
                    stride: 2560,
                    format: PixelFormat::Argb8888,
                }
            ),
            (
                1,
                BufferLayout {
                    offset: SLOT_BYTES,
                    size: DISPLAY,
                    stride: 2560,
                    format: PixelFormat::Argb8888,
                }
            ),
        ]
    );

    let pool = window.pool().unwrap();
    assert_eq!(pool.byte_size(), SLOT_BYTES * BUFFER_COUNT);
    assert_eq!(pool.capacity_slots(), BUFFER_COUNT);
}

#[test]
fn resize_recreates_only_the_selected_slot_at_the_same_offset() {
    let mut compositor = MockCompositor::new();
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    window.mark_busy(0);
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(1));
    let old_slot1 = window.slot(1).unwrap().handle().unwrap().id;
    let old_slot0 = window.slot(0).unwrap().handle().unwrap().id;
    compositor.clear();

    window.set_desired_size(PhysicalSize::new(320, 240));
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(1));

    assert_eq!(
        compositor.calls[0],
        Call::DestroyBuffer { id: old_slot1 }
    );
    let created = compositor.created_buffers();
    assert_eq!(created.len(), 1);
    let (_, slot, layout) = created[0];
    assert_eq!(slot, 1);
    assert_eq!(layout.offset, SLOT_BYTES);
    assert_eq!(layout.size, PhysicalSize::new(320, 240));
    assert_eq!(layout.stride, 1280);

    // The busy slot keeps its old handle until it is released and selected again.
    assert_eq!(window.slot(0).unwrap().handle().unwrap().id, old_slot0);
    assert_eq!(window.slot(0).unwrap().size(), DISPLAY);
    assert!(
        !compositor
            .calls
            .contains(&Call::DestroyBuffer { id: old_slot0 })
    );
}

#[test]
fn matching_handle_is_reused_without_compositor_calls() {
    let mut compositor = MockCompositor::new();
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    let first = window.slot(0).unwrap().handle().unwrap().id;
    compositor.clear();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    assert!(compositor.calls.is_empty());
    assert_eq!(window.slot(0).unwrap().handle().unwrap().id, first);
}

#[test]
fn refused_buffer_creation_yields_no_slot() {
    let mut compositor = MockCompositor::new();
    compositor.refuse_buffers = true;
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), None);
    assert!(window.slot(0).unwrap().handle().is_none());
    assert!(window.canvas_mut(0).is_none());

    compositor.refuse_buffers = false;
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    assert_eq!(
        compositor.count(|call| matches!(call, Call::CreatePool { .. })),
        1
    );
}

#[test]
fn desired_size_is_clamped_to_display_and_minimum() {
    let mut window = window();
    assert_eq!(
        window.set_desired_size(PhysicalSize::new(4000, 10)),
        PhysicalSize::new(640, 32)
    );
    assert_eq!(window.desired_size(), PhysicalSize::new(640, 32));
}

#[test]
fn release_clears_busy_and_rejects_unknown_slots() {
    let mut compositor = MockCompositor::new();
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    window.mark_busy(0);
    assert_eq!(window.busy_count(), 1);
    assert!(window.canvas_mut(0).is_none());

    assert!(window.release(0));
    assert_eq!(window.busy_count(), 0);
    assert!(!window.release(BUFFER_COUNT));
}

#[test]
fn canvas_covers_exactly_stride_times_height() {
    let mut compositor = MockCompositor::new();
    let mut window = window();
    window.set_desired_size(PhysicalSize::new(100, 50));

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    let canvas = window.canvas_mut(0).unwrap();
    assert_eq!(canvas.size, PhysicalSize::new(100, 50));
    assert_eq!(canvas.stride, 400);
    assert_eq!(canvas.pixels.len(), 400 * 50);
}

#[test]
fn shrinking_a_released_slot_keeps_its_offset() {
    let mut compositor = MockCompositor::new();
    let mut window = window();

    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    window.mark_busy(0);
    let first = window.slot(0).unwrap().handle().unwrap().id;
    assert!(window.release(0));
    compositor.clear();

    window.set_desired_size(PhysicalSize::new(320, 240));
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));

    let slot = window.slot(0).unwrap();
    assert_eq!(slot.data_offset(), 0);
    assert_eq!(slot.stride(), 1280);
    assert_eq!(slot.size(), PhysicalSize::new(320, 240));
    assert_ne!(slot.handle().unwrap().id, first);
    assert_eq!(
        compositor.count(|call| matches!(call, Call::DestroyBuffer { .. })),
        1
    );
    assert_eq!(compositor.created_buffers().len(), 1);
}

#[test]
fn display_smaller_than_minimum_still_presents() {
    let tiny = PhysicalSize::new(20, 16);
    let mut compositor = MockCompositor::new();
    let mut window: PresentWindow<MockCompositor> = PresentWindow::new(tiny, MIN_SIZE, DISPLAY);

    assert_eq!(window.desired_size(), tiny);
    assert_eq!(window.bounds().min, tiny);
    assert_eq!(window.select_buffer(&mut compositor).unwrap(), Some(0));
    assert_eq!(window.slot(0).unwrap().size(), tiny);
    assert_eq!(window.slot(0).unwrap().stride(), 80);

    assert_eq!(
        window.set_desired_size(PhysicalSize::new(1, 100)),
        PhysicalSize::new(20, 16)
    );
}
