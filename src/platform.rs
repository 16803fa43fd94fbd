use std::fmt;

use crate::error::EffectError;
use crate::resize::SurfaceSize;
use crate::uniforms::Uniforms;

/// Identifies one render session. Host callbacks carry the id of the session
/// that registered them so late deliveries can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Capabilities the effect needs from its host environment.
///
/// Observers are handed back as subscription values; dropping one must
/// detach the underlying observer or listener. Callbacks are expected to be
/// routed back into [`crate::FaultyTerminal`]:
/// intersection changes to `on_visibility_change`, box-size changes to
/// `on_resize`, pointer moves to `on_pointer_move` and frame callbacks to
/// `on_frame`.
pub trait Platform {
    type Context: GpuContext;
    type Subscription;
    type FrameHandle: Copy + fmt::Debug;

    /// False in headless or non-interactive environments.
    fn has_display(&self) -> bool;

    /// Watches the host region's intersection with the viewport.
    fn observe_visibility(&mut self, threshold: f64) -> Result<Self::Subscription, EffectError>;

    /// Creates a rendering context and mounts its surface into the host
    /// container, replacing whatever the container held.
    fn create_context(&mut self, pixel_ratio: f64) -> Result<Self::Context, EffectError>;

    /// Layout size of the host container in CSS pixels.
    fn container_size(&self) -> (f64, f64);

    fn observe_resize(&mut self, session: SessionId) -> Result<Self::Subscription, EffectError>;

    fn listen_pointer(&mut self, session: SessionId) -> Result<Self::Subscription, EffectError>;

    fn request_frame(&mut self, session: SessionId) -> Result<Self::FrameHandle, EffectError>;

    /// Cancelling a handle that already fired or was cancelled is a no-op.
    fn cancel_frame(&mut self, handle: Self::FrameHandle);

    /// Uniform random number in `[0, 1)`.
    fn random(&mut self) -> f64;
}

/// A GPU rendering context bound to one drawable surface.
pub trait GpuContext {
    type Program;
    type Geometry;
    type Mesh;

    fn set_clear_color(&mut self, rgba: [f32; 4]);

    /// Resizes the surface: CSS size from layout, backing size scaled by the
    /// pixel ratio.
    fn set_size(&mut self, size: SurfaceSize);

    fn drawing_buffer_size(&self) -> (u32, u32);

    fn compile_program(
        &mut self,
        vertex: &str,
        fragment: &str,
        uniforms: &Uniforms,
    ) -> Result<Self::Program, EffectError>;

    /// Full-viewport triangle with `position` and `uv` attributes.
    fn create_triangle(&mut self) -> Result<Self::Geometry, EffectError>;

    fn create_mesh(
        &mut self,
        geometry: &Self::Geometry,
        program: &Self::Program,
    ) -> Result<Self::Mesh, EffectError>;

    fn draw(
        &mut self,
        mesh: &Self::Mesh,
        program: &Self::Program,
        uniforms: &Uniforms,
    ) -> Result<(), EffectError>;

    /// Asks the driver to drop the context right away instead of waiting
    /// for garbage collection.
    fn lose_context(&mut self) -> Result<(), EffectError>;

    /// Removes the surface from the document.
    fn unmount(&mut self) -> Result<(), EffectError>;
}
