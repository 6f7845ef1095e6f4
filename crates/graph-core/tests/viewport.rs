// File: crates/graph-core/tests/viewport.rs
// Purpose: Validate pan/zoom clamping, limits, and listener dispatch.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use graph_core::Viewport;

const EPS: f32 = 1e-6;

fn assert_invariants(vp: &Viewport) {
    let (offset, zoom) = vp.window();
    assert!(zoom > 0.0, "zoom must stay positive, got {zoom}");
    assert!(offset >= -EPS, "offset must stay non-negative, got {offset}");
    assert!(
        offset + zoom <= 1.0 + EPS,
        "window must stay inside [0,1]: offset {offset} zoom {zoom}"
    );
}

#[test]
fn defaults_to_full_scale() {
    let vp = Viewport::new();
    assert_eq!(vp.zoom_level(), 1.0);
    assert_eq!(vp.offset(), 0.0);
    assert_eq!(vp.far_side_offset(), 1.0);
}

#[test]
fn zoom_above_full_scale_clamps_to_one() {
    let vp = Viewport::new();
    vp.set_zoom_level(1.5);
    assert_eq!(vp.zoom_level(), 1.0);
    assert_invariants(&vp);
}

#[test]
fn offset_is_pulled_back_to_keep_window_inside() {
    let vp = Viewport::new();
    vp.set_zoom_level(0.5);
    vp.set_offset(0.9);
    assert!((vp.offset() - 0.5).abs() < EPS);
    assert_invariants(&vp);
}

#[test]
fn zoom_change_pulls_offset_back() {
    let vp = Viewport::new();
    vp.set_zoom_level(0.2);
    vp.set_offset(0.8);
    vp.set_zoom_level(0.5);
    assert!((vp.offset() - 0.5).abs() < EPS);
    assert_invariants(&vp);
}

#[test]
fn non_positive_zoom_is_rejected_without_notification() {
    let vp = Viewport::new();
    vp.set_zoom_level(0.5);
    let fired = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&fired);
    vp.subscribe(move || {
        observed.fetch_add(1, Ordering::SeqCst);
    });
    vp.set_zoom_level(-0.1);
    vp.set_zoom_level(0.0);
    assert_eq!(vp.zoom_level(), 0.5);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn invariants_hold_across_arbitrary_setter_sequences() {
    let vp = Viewport::new();
    let inputs = [
        (0.3f32, 0.9f32),
        (1.7, -0.5),
        (0.01, 0.99),
        (0.5, 0.5),
        (0.999, 0.001),
        (0.25, 2.0),
    ];
    for (zoom, offset) in inputs {
        vp.set_zoom_level(zoom);
        assert_invariants(&vp);
        vp.set_offset(offset);
        assert_invariants(&vp);
    }
}

#[test]
fn limits_re_derive_zoom_and_offset() {
    let vp = Viewport::new();
    vp.set_limits(0.25, 0.75);
    assert!((vp.zoom_level() - 0.5).abs() < EPS);
    assert!((vp.offset() - 0.25).abs() < EPS);
    assert!((vp.far_side_offset() - 0.75).abs() < EPS);
    assert_invariants(&vp);
}

#[test]
fn degenerate_limits_are_rejected() {
    let vp = Viewport::new();
    vp.set_zoom_level(0.4);
    vp.set_limits(0.5, 0.5);
    assert!((vp.zoom_level() - 0.4).abs() < EPS);
    assert_invariants(&vp);
}

#[test]
fn each_accepted_mutation_notifies_once_in_order() {
    let vp = Viewport::new();
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let log = Arc::clone(&log);
        vp.subscribe(move || log.lock().unwrap().push(tag));
    }
    vp.set_zoom_level(0.5);
    vp.set_offset(0.25);
    let seen = log.lock().unwrap().clone();
    assert_eq!(seen, vec!["first", "second", "first", "second"]);
}

#[test]
fn listener_may_mutate_one_level_deep() {
    let vp = Viewport::new();
    let inner = vp.clone();
    let once = Arc::new(AtomicBool::new(false));
    vp.subscribe(move || {
        // Re-entrant mutation, guarded the way a grid refresh is: it does
        // not mutate again from its own notification.
        if !once.swap(true, Ordering::SeqCst) {
            inner.set_offset(0.1);
        }
    });
    vp.set_zoom_level(0.5);
    assert!((vp.offset() - 0.1).abs() < EPS);
    assert_invariants(&vp);
}

#[test]
fn shared_handles_observe_the_same_state() {
    let a = Viewport::new();
    let b = a.clone();
    assert!(a.same_instance(&b));
    a.set_zoom_level(0.3);
    assert!((b.zoom_level() - 0.3).abs() < EPS);
}
