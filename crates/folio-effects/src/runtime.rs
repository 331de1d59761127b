//! Cooperative single-threaded runtime shared by the effects of one page.
//!
//! The runtime owns the clock, pending timers, per-frame registrations, event
//! listeners and viewport observers. Components acquire handles from it and
//! every handle unregisters itself when dropped, so unmounting a component is
//! just dropping its handles.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Axis-aligned rectangle in virtual pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink (positive `margin`) or grow (negative) on every side.
    pub fn inset(&self, margin: f32) -> Bounds {
        Bounds {
            x: self.x + margin,
            y: self.y + margin,
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    /// Area of the overlap with `other`.
    pub fn overlap_area(&self, other: &Bounds) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.overlap_area(other) > 0.0
    }
}

/// Events delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer moved; coordinates are surface-local virtual pixels.
    PointerMove { x: f32, y: f32 },
    /// Pointer left the surface.
    PointerLeave,
    /// Surface was resized to the given size in virtual pixels.
    Resize { width: f32, height: f32 },
}

/// Event categories a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Pointer,
    Resize,
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::PointerMove { .. } | SurfaceEvent::PointerLeave => EventKind::Pointer,
            SurfaceEvent::Resize { .. } => EventKind::Resize,
        }
    }
}

type Mailbox = Rc<RefCell<VecDeque<SurfaceEvent>>>;

#[derive(Debug)]
struct Listener {
    kinds: Vec<EventKind>,
    mailbox: Mailbox,
}

#[derive(Debug, Clone, Copy)]
struct ObserverEntry {
    target: Bounds,
    root_margin: f32,
}

#[derive(Debug)]
struct Inner {
    now: Duration,
    next_id: u64,
    timers: HashMap<u64, Duration>,
    frames: HashSet<u64>,
    listeners: HashMap<u64, Listener>,
    observers: HashMap<u64, ObserverEntry>,
    viewport: Option<Bounds>,
    intersection_supported: bool,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Handle to the shared runtime. Cloning is cheap; all clones share state.
#[derive(Debug, Clone)]
pub struct Runtime {
    inner: Rc<RefCell<Inner>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Create a runtime with viewport intersection support.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                now: Duration::ZERO,
                next_id: 0,
                timers: HashMap::new(),
                frames: HashSet::new(),
                listeners: HashMap::new(),
                observers: HashMap::new(),
                viewport: None,
                intersection_supported: true,
            })),
        }
    }

    /// Create a runtime that cannot observe the viewport. Observers are never
    /// handed out, so reveals fall back to their final state.
    pub fn without_intersection() -> Self {
        let rt = Self::new();
        rt.inner.borrow_mut().intersection_supported = false;
        rt
    }

    /// Current animation time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Advance the clock.
    pub fn advance(&self, delta: Duration) {
        self.inner.borrow_mut().now += delta;
    }

    /// Schedule a one-shot timer `delay` from now.
    pub fn set_timeout(&self, delay: Duration) -> Timer {
        let deadline = self.now() + delay;
        self.schedule_at(deadline)
    }

    /// Schedule a one-shot timer at an absolute deadline.
    pub fn schedule_at(&self, deadline: Duration) -> Timer {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.timers.insert(id, deadline);
        Timer {
            id,
            deadline,
            runtime: Rc::downgrade(&self.inner),
        }
    }

    /// Register a continuous per-frame callback slot.
    pub fn request_frames(&self) -> FrameLoop {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.frames.insert(id);
        FrameLoop {
            id,
            runtime: Rc::downgrade(&self.inner),
        }
    }

    /// Listen for the given event kinds.
    pub fn subscribe(&self, kinds: &[EventKind]) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        let mailbox: Mailbox = Rc::new(RefCell::new(VecDeque::new()));
        inner.listeners.insert(
            id,
            Listener {
                kinds: kinds.to_vec(),
                mailbox: Rc::clone(&mailbox),
            },
        );
        Subscription {
            id,
            mailbox,
            runtime: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every matching listener.
    pub fn emit(&self, event: SurfaceEvent) {
        let inner = self.inner.borrow();
        let kind = event.kind();
        for listener in inner.listeners.values() {
            if listener.kinds.contains(&kind) {
                listener.mailbox.borrow_mut().push_back(event);
            }
        }
    }

    /// Observe `target` against the viewport shrunk by `root_margin`.
    ///
    /// Returns `None` when intersection observation is unsupported.
    pub fn observe(&self, target: Bounds, root_margin: f32) -> Option<Observer> {
        let mut inner = self.inner.borrow_mut();
        if !inner.intersection_supported {
            return None;
        }
        let id = inner.next_id();
        inner.observers.insert(
            id,
            ObserverEntry {
                target,
                root_margin,
            },
        );
        Some(Observer {
            id,
            runtime: Rc::downgrade(&self.inner),
        })
    }

    /// Update the visible viewport.
    pub fn set_viewport(&self, viewport: Bounds) {
        self.inner.borrow_mut().viewport = Some(viewport);
    }

    pub fn viewport(&self) -> Option<Bounds> {
        self.inner.borrow().viewport
    }

    /// Number of timers that have not been dropped.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Number of live frame registrations.
    pub fn active_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Number of live listeners.
    pub fn listeners(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of connected observers.
    pub fn observers(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

/// One-shot timer. Dropping it cancels it.
#[derive(Debug)]
pub struct Timer {
    id: u64,
    deadline: Duration,
    runtime: Weak<RefCell<Inner>>,
}

impl Timer {
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Whether the runtime clock has reached the deadline.
    pub fn fired(&self) -> bool {
        match self.runtime.upgrade() {
            Some(inner) => inner.borrow().now >= self.deadline,
            None => false,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(inner) = self.runtime.upgrade() {
            inner.borrow_mut().timers.remove(&self.id);
        }
    }
}

/// Continuous per-frame registration. Dropping it cancels the loop.
#[derive(Debug)]
pub struct FrameLoop {
    id: u64,
    runtime: Weak<RefCell<Inner>>,
}

impl FrameLoop {
    pub fn is_active(&self) -> bool {
        match self.runtime.upgrade() {
            Some(inner) => inner.borrow().frames.contains(&self.id),
            None => false,
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(inner) = self.runtime.upgrade() {
            inner.borrow_mut().frames.remove(&self.id);
        }
    }
}

/// Event listener with its own mailbox. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    mailbox: Mailbox,
    runtime: Weak<RefCell<Inner>>,
}

impl Subscription {
    /// Take every event delivered since the last drain, oldest first.
    pub fn drain(&self) -> Vec<SurfaceEvent> {
        self.mailbox.borrow_mut().drain(..).collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.runtime.upgrade() {
            inner.borrow_mut().listeners.remove(&self.id);
        }
    }
}

/// Viewport intersection observer. Dropping it disconnects.
#[derive(Debug)]
pub struct Observer {
    id: u64,
    runtime: Weak<RefCell<Inner>>,
}

impl Observer {
    /// Whether the target currently intersects the margin-adjusted viewport.
    pub fn is_intersecting(&self) -> bool {
        let Some(inner) = self.runtime.upgrade() else {
            return false;
        };
        let inner = inner.borrow();
        let (Some(viewport), Some(entry)) = (inner.viewport, inner.observers.get(&self.id)) else {
            return false;
        };
        viewport.inset(entry.root_margin).intersects(&entry.target)
    }

    /// Move the observed target, e.g. after a relayout.
    pub fn set_target(&self, target: Bounds) {
        let Some(inner) = self.runtime.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        if let Some(entry) = inner.observers.get_mut(&self.id) {
            entry.target = target;
        }
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        if let Some(inner) = self.runtime.upgrade() {
            inner.borrow_mut().observers.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_and_cancels_on_drop() {
        let rt = Runtime::new();
        let timer = rt.set_timeout(Duration::from_millis(100));
        assert_eq!(rt.pending_timers(), 1);
        assert!(!timer.fired());

        rt.advance(Duration::from_millis(99));
        assert!(!timer.fired());
        rt.advance(Duration::from_millis(1));
        assert!(timer.fired());

        drop(timer);
        assert_eq!(rt.pending_timers(), 0);
    }

    #[test]
    fn test_subscription_receives_matching_events_only() {
        let rt = Runtime::new();
        let pointer = rt.subscribe(&[EventKind::Pointer]);
        let resize = rt.subscribe(&[EventKind::Resize]);

        rt.emit(SurfaceEvent::PointerMove { x: 1.0, y: 2.0 });
        rt.emit(SurfaceEvent::Resize {
            width: 10.0,
            height: 20.0,
        });
        rt.emit(SurfaceEvent::PointerLeave);

        assert_eq!(
            pointer.drain(),
            vec![
                SurfaceEvent::PointerMove { x: 1.0, y: 2.0 },
                SurfaceEvent::PointerLeave
            ]
        );
        assert_eq!(resize.drain().len(), 1);
        assert!(pointer.drain().is_empty());

        drop(pointer);
        assert_eq!(rt.listeners(), 1);
        drop(resize);
        assert_eq!(rt.listeners(), 0);
    }

    #[test]
    fn test_frame_loop_registration() {
        let rt = Runtime::new();
        let frames = rt.request_frames();
        assert!(frames.is_active());
        assert_eq!(rt.active_frames(), 1);
        drop(frames);
        assert_eq!(rt.active_frames(), 0);
    }

    #[test]
    fn test_observer_respects_root_margin() {
        let rt = Runtime::new();
        rt.set_viewport(Bounds::new(0.0, 0.0, 800.0, 400.0));

        // Sits in the bottom 40px of the viewport, inside the 60px margin.
        let observer = rt
            .observe(Bounds::new(0.0, 360.0, 800.0, 100.0), 60.0)
            .expect("intersection supported");
        assert!(!observer.is_intersecting());

        observer.set_target(Bounds::new(0.0, 300.0, 800.0, 100.0));
        assert!(observer.is_intersecting());

        drop(observer);
        assert_eq!(rt.observers(), 0);
    }

    #[test]
    fn test_observe_unsupported() {
        let rt = Runtime::without_intersection();
        assert!(rt.observe(Bounds::new(0.0, 0.0, 1.0, 1.0), 0.0).is_none());
        assert_eq!(rt.observers(), 0);
    }

    #[test]
    fn test_handles_outliving_runtime() {
        let rt = Runtime::new();
        let timer = rt.set_timeout(Duration::ZERO);
        drop(rt);
        assert!(!timer.fired());
    }

    #[test]
    fn test_overlap_area() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 25.0);
        assert!(!a.intersects(&Bounds::new(10.0, 0.0, 5.0, 5.0)));
    }
}
