use crate::pointer::PointerState;

/// Duration of the fade-in that follows session activation.
pub const PAGE_LOAD_DURATION_MS: f64 = 2000.0;

/// Range of the random phase offset added to the animation time, in seconds.
pub const TIME_OFFSET_RANGE: f64 = 100.0;

/// Animation time source with a per-session random phase and pause support.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    offset: f64,
    frozen: f64,
}

impl AnimationClock {
    /// `unit_random` is expected in `[0, 1)`.
    pub fn new(unit_random: f64) -> Self {
        Self {
            offset: unit_random * TIME_OFFSET_RANGE,
            frozen: 0.0,
        }
    }

    /// Picks a new phase offset. The frozen time is kept.
    pub fn reseed(&mut self, unit_random: f64) {
        self.offset = unit_random * TIME_OFFSET_RANGE;
    }

    /// Animation time for a frame at `now_ms`.
    ///
    /// While paused the last computed value is returned unchanged, so
    /// unpausing continues from the current phase rather than from zero.
    pub fn advance(&mut self, now_ms: f64, time_scale: f64, paused: bool) -> f64 {
        if !paused {
            self.frozen = (now_ms * 0.001 + self.offset) * time_scale;
        }
        self.frozen
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn frozen(&self) -> f64 {
        self.frozen
    }
}

/// Start time of the page-load fade, captured on the first frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageLoadAnimation {
    started_at: Option<f64>,
}

impl PageLoadAnimation {
    /// Records `now_ms` as the start unless a start is already set.
    pub fn begin(&mut self, now_ms: f64) {
        self.started_at.get_or_insert(now_ms);
    }

    /// Fraction of the fade completed at `now_ms`, or `None` before it begins.
    pub fn progress(&self, now_ms: f64) -> Option<f32> {
        let start = self.started_at?;
        Some(((now_ms - start) / PAGE_LOAD_DURATION_MS).clamp(0.0, 1.0) as f32)
    }

    pub fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Mutable per-frame state that outlives individual render sessions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub pointer: PointerState,
    pub clock: AnimationClock,
    pub page_load: PageLoadAnimation,
}

impl FrameState {
    pub fn new(unit_random: f64) -> Self {
        Self {
            pointer: PointerState::default(),
            clock: AnimationClock::new(unit_random),
            page_load: PageLoadAnimation::default(),
        }
    }
}
