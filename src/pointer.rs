/// Fraction of the remaining distance the smoothed pointer covers per frame.
pub const POINTER_SMOOTHING: f32 = 0.08;

/// Layout box of the element the pointer moves over, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One pointer-move event: client coordinates plus the element box at the
/// time of the event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub client_x: f64,
    pub client_y: f64,
    pub bounds: Bounds,
}

impl PointerSample {
    /// Position relative to `bounds`, origin bottom-left.
    pub fn normalized(&self) -> Option<[f32; 2]> {
        let Bounds { left, top, width, height } = self.bounds;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let x = (self.client_x - left) / width;
        let y = 1.0 - (self.client_y - top) / height;
        Some([x as f32, y as f32])
    }
}

/// Raw pointer target and its low-pass filtered follower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    raw: [f32; 2],
    smoothed: [f32; 2],
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            raw: [0.5, 0.5],
            smoothed: [0.5, 0.5],
        }
    }
}

impl PointerState {
    /// Overwrites the raw target. Returns false for samples over an empty box.
    pub fn record(&mut self, sample: &PointerSample) -> bool {
        match sample.normalized() {
            Some(raw) => {
                self.raw = raw;
                true
            }
            None => false,
        }
    }

    /// Moves the smoothed position one frame closer to the raw target.
    pub fn advance(&mut self) -> [f32; 2] {
        for (smoothed, raw) in self.smoothed.iter_mut().zip(self.raw) {
            *smoothed += (raw - *smoothed) * POINTER_SMOOTHING;
        }
        self.smoothed
    }

    pub fn raw(&self) -> [f32; 2] {
        self.raw
    }

    pub fn smoothed(&self) -> [f32; 2] {
        self.smoothed
    }
}
