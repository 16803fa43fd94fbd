#![cfg_attr(target_arch = "wasm32", allow(dead_code))]
//! Animated "faulty CRT terminal" noise rendered by a fragment shader.
//!
//! The core is host independent: [`FaultyTerminal`] drives a
//! [`RenderSession`] through the [`Platform`] and [`GpuContext`] traits,
//! reacting to visibility, resize, pointer and frame callbacks. The browser
//! binding under `wasm` implements those traits with web-sys and WebGL2.

pub mod clock;
pub mod color;
pub mod controller;
pub mod error;
pub mod params;
pub mod platform;
pub mod pointer;
pub mod resize;
pub mod session;
pub mod shader;
pub mod uniforms;
pub mod visibility;

pub use clock::{AnimationClock, FrameState, PageLoadAnimation};
pub use color::{hex_to_rgb, parse_hex, ColorError, Rgb};
pub use controller::FaultyTerminal;
pub use error::EffectError;
pub use params::{Dither, ParameterSet};
pub use platform::{GpuContext, Platform, SessionId};
pub use pointer::{Bounds, PointerSample, PointerState};
pub use resize::{Resolution, SurfaceSize};
pub use session::{GpuResources, RenderSession, Tick};
pub use uniforms::{UniformValue, Uniforms};
pub use visibility::{Transition, VisibilityGate};

// Only compile the browser binding when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FaultyTerminalHandle, WebPlatform};
