// File: crates/graph-core/src/viewport.rs
// Summary: Shared pan/zoom window state for one axis, with change listeners.

use std::sync::{Arc, Mutex};

/// Full-range window lower bound.
const ABSOLUTE_MINIMUM: f32 = 0.0;
/// Full-range window upper bound.
const ABSOLUTE_MAXIMUM: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
struct ViewportState {
    /// Fraction of the axis range currently shown, (0, 1].
    zoom_level: f32,
    /// Fraction from the axis start to the near edge of the window, [0, 1].
    offset: f32,
    /// Window limits: the reachable window must stay inside [min, max].
    min_limit: f32,
    max_limit: f32,
}

type Listener = Arc<dyn Fn() + Send + Sync>;

struct ViewportInner {
    state: Mutex<ViewportState>,
    listeners: Mutex<Vec<Listener>>,
}

/// A pannable/zoomable [0,1]-normalized window onto one axis of a value
/// range. Handles are cheap clones of shared state, so a grid tree and a
/// signal can reference the same instance and stay in lock-step.
///
/// Mutation is expected from the consumer/UI role only. Listener dispatch is
/// synchronous, in registration order, on the mutating thread; the state lock
/// is released before dispatch so a listener may read (or, one level deep,
/// mutate) the viewport without deadlocking.
#[derive(Clone)]
pub struct Viewport {
    inner: Arc<ViewportInner>,
}

impl Viewport {
    /// A full-scale viewport: zoom 1.0, offset 0.0, limits [0, 1].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ViewportInner {
                state: Mutex::new(ViewportState {
                    zoom_level: ABSOLUTE_MAXIMUM,
                    offset: ABSOLUTE_MINIMUM,
                    min_limit: ABSOLUTE_MINIMUM,
                    max_limit: ABSOLUTE_MAXIMUM,
                }),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// True when both handles refer to the same shared state.
    pub fn same_instance(&self, other: &Viewport) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn state(&self) -> ViewportState {
        *self.lock_state()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ViewportState> {
        // A poisoned lock only means a panic elsewhere; the plain-old-data
        // state is still coherent.
        self.inner.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn zoom_level(&self) -> f32 {
        self.state().zoom_level
    }

    pub fn offset(&self) -> f32 {
        self.state().offset
    }

    /// `offset + zoom_level`: the far edge of the visible window.
    pub fn far_side_offset(&self) -> f32 {
        let s = self.state();
        s.offset + s.zoom_level
    }

    /// (offset, zoom_level) read under one lock acquisition.
    pub fn window(&self) -> (f32, f32) {
        let s = self.state();
        (s.offset, s.zoom_level)
    }

    /// Change the fraction of the axis being shown. Values above 1.0 are
    /// clamped; non-positive values are rejected without notification. The
    /// offset is pulled back as needed so the window stays inside the limits.
    pub fn set_zoom_level(&self, zoom_level: f32) {
        {
            let mut s = self.lock_state();
            if zoom_level <= ABSOLUTE_MINIMUM {
                return;
            }
            let mut zoom = zoom_level.min(ABSOLUTE_MAXIMUM);
            if zoom + s.offset > s.max_limit {
                s.offset = s.max_limit - zoom;
            }
            if s.max_limit - zoom < s.min_limit {
                s.offset = s.min_limit;
                zoom = s.max_limit - s.min_limit;
            }
            s.zoom_level = zoom;
        }
        self.notify();
    }

    /// Change where the window starts. Clamped into the limits; if the far
    /// side would leave the window, the offset is reduced instead.
    pub fn set_offset(&self, offset: f32) {
        {
            let mut s = self.lock_state();
            let mut offset = offset.clamp(s.min_limit, ABSOLUTE_MAXIMUM);
            if offset + s.zoom_level > s.max_limit {
                offset = s.max_limit - s.zoom_level;
            }
            s.offset = offset;
        }
        self.notify();
    }

    /// Confine the reachable window to [min_limit, max_limit] and re-derive
    /// zoom and offset through the setters, so the viewport now shows exactly
    /// that sub-window. A viewport fixed this way (and never touched again)
    /// serves as the immutable full-scale reference for axis labelling.
    pub fn set_limits(&self, min_limit: f32, max_limit: f32) {
        let min_limit = min_limit.max(ABSOLUTE_MINIMUM);
        let max_limit = max_limit.min(ABSOLUTE_MAXIMUM);
        if max_limit <= min_limit {
            // A degenerate window would zero the zoom level; leave the
            // viewport untouched.
            return;
        }
        {
            let mut s = self.lock_state();
            s.min_limit = min_limit;
            s.max_limit = max_limit;
        }
        self.set_zoom_level(max_limit - min_limit);
        self.set_offset(min_limit);
    }

    /// Register a listener fired synchronously after every accepted mutation.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.lock_listeners().push(Arc::new(listener));
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, Vec<Listener>> {
        self.inner.listeners.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn notify(&self) {
        // Clone out of the lock so a listener may subscribe or mutate without
        // re-entering it.
        let listeners: Vec<Listener> = self.lock_listeners().clone();
        for listener in &listeners {
            listener();
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
