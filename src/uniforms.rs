use crate::params::ParameterSet;
use crate::resize::Resolution;

pub const UNIFORM_COUNT: usize = 19;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

/// CPU-side copy of every uniform the fragment shader declares.
#[derive(Clone, Debug, PartialEq)]
pub struct Uniforms {
    pub time: f32,
    pub resolution: [f32; 3],
    pub scale: f32,
    pub grid_mul: [f32; 2],
    pub digit_size: f32,
    pub scanline_intensity: f32,
    pub glitch_amount: f32,
    pub flicker_amount: f32,
    pub noise_amp: f32,
    pub chromatic_aberration: f32,
    pub dither: f32,
    pub curvature: f32,
    pub tint: [f32; 3],
    pub mouse: [f32; 2],
    pub mouse_strength: f32,
    pub use_mouse: f32,
    pub page_load_progress: f32,
    pub use_page_load_animation: f32,
    pub brightness: f32,
}

impl Uniforms {
    /// Values used when a program is first compiled.
    ///
    /// Page-load progress starts at 0 when the fade is enabled and at 1
    /// (fully visible) otherwise.
    pub fn initial(params: &ParameterSet, resolution: Resolution, mouse: [f32; 2]) -> Self {
        let mut uniforms = Self {
            time: 0.0,
            resolution: resolution.as_uniform(),
            scale: 0.0,
            grid_mul: [0.0; 2],
            digit_size: 0.0,
            scanline_intensity: 0.0,
            glitch_amount: 0.0,
            flicker_amount: 0.0,
            noise_amp: 0.0,
            chromatic_aberration: 0.0,
            dither: 0.0,
            curvature: 0.0,
            tint: [0.0; 3],
            mouse,
            mouse_strength: 0.0,
            use_mouse: 0.0,
            page_load_progress: if params.page_load_animation { 0.0 } else { 1.0 },
            use_page_load_animation: 0.0,
            brightness: 0.0,
        };
        uniforms.apply_params(params);
        uniforms
    }

    /// Copies the live parameter values into their uniforms, tint included.
    pub fn apply_params(&mut self, params: &ParameterSet) {
        self.scale = params.scale;
        self.grid_mul = params.grid_mul;
        self.digit_size = params.digit_size;
        self.scanline_intensity = params.scanline_intensity;
        self.glitch_amount = params.glitch_amount;
        self.flicker_amount = params.flicker_amount;
        self.noise_amp = params.noise_amp;
        self.chromatic_aberration = params.chromatic_aberration;
        self.dither = params.dither.amount();
        self.curvature = params.curvature;
        self.mouse_strength = params.mouse_strength;
        self.use_mouse = flag(params.mouse_react);
        self.use_page_load_animation = flag(params.page_load_animation);
        self.brightness = params.brightness;
        self.tint = params.tint_rgb();
    }

    /// Uniform names as declared in the fragment shader, paired with values.
    pub fn entries(&self) -> [(&'static str, UniformValue); UNIFORM_COUNT] {
        use UniformValue::{Float, Vec2, Vec3};
        [
            ("iTime", Float(self.time)),
            ("iResolution", Vec3(self.resolution)),
            ("uScale", Float(self.scale)),
            ("uGridMul", Vec2(self.grid_mul)),
            ("uDigitSize", Float(self.digit_size)),
            ("uScanlineIntensity", Float(self.scanline_intensity)),
            ("uGlitchAmount", Float(self.glitch_amount)),
            ("uFlickerAmount", Float(self.flicker_amount)),
            ("uNoiseAmp", Float(self.noise_amp)),
            ("uChromaticAberration", Float(self.chromatic_aberration)),
            ("uDither", Float(self.dither)),
            ("uCurvature", Float(self.curvature)),
            ("uTint", Vec3(self.tint)),
            ("uMouse", Vec2(self.mouse)),
            ("uMouseStrength", Float(self.mouse_strength)),
            ("uUseMouse", Float(self.use_mouse)),
            ("uPageLoadProgress", Float(self.page_load_progress)),
            ("uUsePageLoadAnimation", Float(self.use_page_load_animation)),
            ("uBrightness", Float(self.brightness)),
        ]
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
