/// Layout size of the host container together with the pixel ratio the
/// backing buffer should use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl SurfaceSize {
    /// Backing-buffer dimensions, truncated the way canvas size setters do.
    pub fn backing(&self) -> (u32, u32) {
        (
            backing_dimension(self.css_width, self.pixel_ratio),
            backing_dimension(self.css_height, self.pixel_ratio),
        )
    }
}

pub fn backing_dimension(css: f64, pixel_ratio: f64) -> u32 {
    let scaled = css * pixel_ratio;
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u32
    } else {
        0
    }
}

/// The `iResolution` uniform: width, height and aspect ratio of the drawing
/// buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn as_uniform(&self) -> [f32; 3] {
        [self.width as f32, self.height as f32, self.aspect()]
    }
}
