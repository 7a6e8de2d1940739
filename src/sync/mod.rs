//! Scroll synchronization between the source and preview panes.
//!
//! The two panes have no stable line-for-line correspondence (markdown source
//! wraps and collapses differently from its rendered form), so sync maps the
//! driving pane's scroll fraction onto the other pane's scroll range. A
//! re-entrancy lock keeps the mirrored write from triggering the inverse
//! handler; the lock is released by the event loop on the next tick.

use std::time::{Duration, Instant};

/// Throttle window for scroll-driven sync handlers.
pub const SYNC_THROTTLE_MS: u64 = 100;
/// How long after an outline jump scroll events may not move the highlight.
pub const JUMP_SUPPRESS_MS: u64 = 600;
/// How long an outline jump holds the sync lock.
pub const JUMP_LOCK_MS: u64 = 150;

/// Scroll geometry of one pane. Units are rows for the terminal panes, but
/// the math is unit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl PaneMetrics {
    pub const fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Maximum scroll offset. Zero when the content fits in the viewport.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll position as a fraction of the scrollable range.
    ///
    /// `None` when the pane has no overflow, which disables sync for it.
    pub fn fraction(&self) -> Option<f64> {
        let max = self.max_scroll();
        if max <= 0.0 {
            return None;
        }
        Some((self.scroll_top / max).clamp(0.0, 1.0))
    }
}

/// Layout conditions under which sync is allowed to run.
#[derive(Debug, Clone, Copy)]
pub struct SyncGate {
    /// Both panes are visible at once.
    pub split_view: bool,
    /// The user's scroll-lock preference is on.
    pub scroll_lock: bool,
}

impl SyncGate {
    pub const fn open(self) -> bool {
        self.split_view && self.scroll_lock
    }
}

/// Generic rate limiter: the first call in a window runs immediately, later
/// calls inside the window collapse into a single trailing run once the
/// window elapses.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    last_fired: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
            trailing: false,
        }
    }

    pub const fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// Leading edge. Returns true when the caller should run now; otherwise
    /// a trailing run is queued.
    pub fn poke(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.duration_since(last) < self.window => {
                self.trailing = true;
                false
            }
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    /// Trailing edge, polled by the event loop. Returns true at most once
    /// per queued run, after the window has elapsed.
    pub fn take_trailing(&mut self, now: Instant) -> bool {
        if !self.trailing {
            return false;
        }
        if let Some(last) = self.last_fired
            && now.duration_since(last) < self.window
        {
            return false;
        }
        self.trailing = false;
        self.last_fired = Some(now);
        true
    }

    pub const fn has_trailing(&self) -> bool {
        self.trailing
    }
}

/// When the re-entrancy lock clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockRelease {
    /// Next event-loop tick, after the mirrored write has been applied.
    NextTick,
    /// Fixed deadline, used by outline jumps.
    At(Instant),
}

/// Per-editor scroll synchronizer.
///
/// Owns the re-entrancy lock, the outline-jump suppression deadline, and one
/// throttle per pane. All timing is driven by `Instant`s passed in from the
/// event loop so the logic stays testable.
#[derive(Debug)]
pub struct ScrollSync {
    locked: bool,
    release: Option<LockRelease>,
    suppress_outline_until: Option<Instant>,
    pub source_throttle: Throttle,
    pub preview_throttle: Throttle,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub const fn new() -> Self {
        Self {
            locked: false,
            release: None,
            suppress_outline_until: None,
            source_throttle: Throttle::from_millis(SYNC_THROTTLE_MS),
            preview_throttle: Throttle::from_millis(SYNC_THROTTLE_MS),
        }
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Source pane scrolled: compute the preview pane's new scroll offset.
    ///
    /// Returns `None` (leaving both panes untouched) when the gate is
    /// closed, the lock is held, or either pane has no overflow. A returned
    /// target engages the lock until the next tick.
    pub fn sync_preview_to_source(
        &mut self,
        gate: SyncGate,
        source: &PaneMetrics,
        preview: &PaneMetrics,
    ) -> Option<f64> {
        self.mirror(gate, source, preview)
    }

    /// Preview pane scrolled: compute the source pane's new scroll offset.
    pub fn sync_source_to_preview(
        &mut self,
        gate: SyncGate,
        preview: &PaneMetrics,
        source: &PaneMetrics,
    ) -> Option<f64> {
        self.mirror(gate, preview, source)
    }

    fn mirror(
        &mut self,
        gate: SyncGate,
        driving: &PaneMetrics,
        following: &PaneMetrics,
    ) -> Option<f64> {
        if self.locked || !gate.open() {
            return None;
        }
        let fraction = driving.fraction()?;
        let max = following.max_scroll();
        if max <= 0.0 {
            return None;
        }
        self.locked = true;
        self.release = Some(LockRelease::NextTick);
        Some(fraction * max)
    }

    /// An outline jump is about to move both panes programmatically.
    ///
    /// Holds the lock for a fixed window instead of one tick so the smooth
    /// settle of both panes cannot feed back into the handlers, and
    /// suppresses scroll-driven outline highlight updates for the grace
    /// window.
    pub fn begin_jump(&mut self, now: Instant) {
        self.locked = true;
        self.release = Some(LockRelease::At(now + Duration::from_millis(JUMP_LOCK_MS)));
        self.suppress_outline_until = Some(now + Duration::from_millis(JUMP_SUPPRESS_MS));
    }

    /// True while scroll handlers must not recompute the outline highlight.
    pub fn outline_suppressed(&self, now: Instant) -> bool {
        self.suppress_outline_until.is_some_and(|until| now < until)
    }

    /// Event-loop tick: clear the lock once its release condition is met.
    pub fn on_tick(&mut self, now: Instant) {
        match self.release {
            Some(LockRelease::NextTick) => {
                self.locked = false;
                self.release = None;
            }
            Some(LockRelease::At(deadline)) if now >= deadline => {
                self.locked = false;
                self.release = None;
            }
            _ => {}
        }
        if self.suppress_outline_until.is_some_and(|until| now >= until) {
            self.suppress_outline_until = None;
        }
    }
}

/// Index of the outline entry the view has most recently scrolled past: the
/// last anchor at or above `position`. `Some(0)` when every anchor is still
/// below, `None` only when there are no anchors at all.
pub fn current_outline_index(anchors: &[f64], position: f64) -> Option<usize> {
    if anchors.is_empty() {
        return None;
    }
    let past = anchors.partition_point(|a| *a <= position);
    Some(past.saturating_sub(1))
}
