//! GPU resource ownership and the per-frame update loop.
//!
//! A [`RenderSession`] is either idle, holding nothing, or active, holding
//! exactly one context/program/geometry/mesh bundle plus the observers and
//! the pending frame callback registered for it. Activation always tears the
//! previous session down first, so two surfaces never share a container.

use log::{debug, warn};

use crate::clock::FrameState;
use crate::error::EffectError;
use crate::params::ParameterSet;
use crate::platform::{GpuContext, Platform, SessionId};
use crate::pointer::PointerSample;
use crate::resize::{Resolution, SurfaceSize};
use crate::shader::{FRAGMENT_SHADER, VERTEX_SHADER};
use crate::uniforms::Uniforms;

const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Context, program, geometry and mesh, created and released together.
pub struct GpuResources<C: GpuContext> {
    context: C,
    program: C::Program,
    // Owns the vertex buffers the mesh reads from.
    _geometry: C::Geometry,
    mesh: C::Mesh,
}

impl<C: GpuContext> GpuResources<C> {
    /// Builds the program and mesh on `context`. On failure the context is
    /// released before the error is returned.
    pub fn create(mut context: C, uniforms: &Uniforms) -> Result<Self, EffectError> {
        context.set_clear_color(CLEAR_COLOR);
        let built = context
            .compile_program(VERTEX_SHADER, FRAGMENT_SHADER, uniforms)
            .and_then(|program| {
                let geometry = context.create_triangle()?;
                let mesh = context.create_mesh(&geometry, &program)?;
                Ok((program, geometry, mesh))
            });

        match built {
            Ok((program, geometry, mesh)) => Ok(Self {
                context,
                program,
                _geometry: geometry,
                mesh,
            }),
            Err(err) => {
                release_context(&mut context);
                Err(err)
            }
        }
    }

    pub fn draw(&mut self, uniforms: &Uniforms) -> Result<(), EffectError> {
        self.context.draw(&self.mesh, &self.program, uniforms)
    }

    /// Resizes the surface and returns the resulting drawing-buffer size.
    pub fn resize(&mut self, size: SurfaceSize) -> Resolution {
        self.context.set_size(size);
        let (width, height) = self.context.drawing_buffer_size();
        Resolution::new(width, height)
    }

    /// Best-effort release; failures are logged and otherwise ignored.
    pub fn release(mut self) {
        release_context(&mut self.context);
    }
}

fn release_context<C: GpuContext>(context: &mut C) {
    if let Err(err) = context.lose_context() {
        debug!("ignoring context release failure: {err}");
    }
    if let Err(err) = context.unmount() {
        debug!("ignoring surface removal failure: {err}");
    }
}

struct ActiveSession<P: Platform> {
    id: SessionId,
    pixel_ratio: f64,
    gpu: GpuResources<P::Context>,
    uniforms: Uniforms,
    frame: Option<P::FrameHandle>,
    resize: Option<P::Subscription>,
    pointer: Option<P::Subscription>,
}

/// What a frame callback ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Drawn,
    /// The callback belonged to a session that is no longer live.
    Stale,
    /// Drawing failed; the loop stopped and will not reschedule.
    Halted,
}

pub struct RenderSession<P: Platform> {
    active: Option<ActiveSession<P>>,
    next_id: u64,
}

impl<P: Platform> Default for RenderSession<P> {
    fn default() -> Self {
        Self {
            active: None,
            next_id: 1,
        }
    }
}

impl<P: Platform> RenderSession<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Active. Any live session is torn down first.
    pub fn start(
        &mut self,
        platform: &mut P,
        params: &ParameterSet,
        state: &mut FrameState,
    ) -> Result<SessionId, EffectError> {
        self.stop(platform, state);

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let pixel_ratio = params.effective_pixel_ratio();
        let context = platform.create_context(pixel_ratio)?;
        let (width, height) = context.drawing_buffer_size();
        let uniforms = Uniforms::initial(
            params,
            Resolution::new(width, height),
            state.pointer.smoothed(),
        );
        let gpu = GpuResources::create(context, &uniforms)?;

        let mut session = ActiveSession {
            id,
            pixel_ratio,
            gpu,
            uniforms,
            frame: None,
            resize: None,
            pointer: None,
        };

        if let Err(err) = Self::attach(&mut session, platform, params) {
            Self::teardown(session, platform);
            return Err(err);
        }
        Self::apply_resize(&mut session, platform);
        match platform.request_frame(id) {
            Ok(frame) => session.frame = Some(frame),
            Err(err) => {
                Self::teardown(session, platform);
                return Err(err);
            }
        }

        debug!("{id} started at pixel ratio {pixel_ratio}");
        self.active = Some(session);
        Ok(id)
    }

    fn attach(
        session: &mut ActiveSession<P>,
        platform: &mut P,
        params: &ParameterSet,
    ) -> Result<(), EffectError> {
        session.resize = Some(platform.observe_resize(session.id)?);
        if params.mouse_react {
            session.pointer = Some(platform.listen_pointer(session.id)?);
        }
        Ok(())
    }

    /// Active -> Idle. Safe to call when already idle.
    ///
    /// The page-load fade is reset and the time offset re-randomized either
    /// way, so a later session does not resume mid-phase.
    pub fn stop(&mut self, platform: &mut P, state: &mut FrameState) {
        if let Some(session) = self.active.take() {
            let id = session.id;
            Self::teardown(session, platform);
            debug!("{id} stopped");
        }
        state.page_load.reset();
        state.clock.reseed(platform.random());
    }

    fn teardown(mut session: ActiveSession<P>, platform: &mut P) {
        if let Some(frame) = session.frame.take() {
            platform.cancel_frame(frame);
        }
        // Observers go first so nothing writes into the released resources.
        drop(session.resize.take());
        drop(session.pointer.take());
        session.gpu.release();
    }

    /// Box-size change for session `id`. Picks up the current pixel ratio.
    pub fn resize(&mut self, platform: &P, id: SessionId, params: &ParameterSet) -> bool {
        match self.live_mut(id) {
            Some(session) => {
                session.pixel_ratio = params.effective_pixel_ratio();
                Self::apply_resize(session, platform);
                true
            }
            None => false,
        }
    }

    fn apply_resize(session: &mut ActiveSession<P>, platform: &P) {
        let (css_width, css_height) = platform.container_size();
        let resolution = session.gpu.resize(SurfaceSize {
            css_width,
            css_height,
            pixel_ratio: session.pixel_ratio,
        });
        session.uniforms.resolution = resolution.as_uniform();
    }

    /// Pointer move for session `id`; updates the raw pointer target.
    pub fn pointer_moved(
        &self,
        id: SessionId,
        sample: &PointerSample,
        state: &mut FrameState,
    ) -> bool {
        if self.active_id() != Some(id) {
            return false;
        }
        state.pointer.record(sample)
    }

    /// One display-refresh callback for session `id`.
    pub fn tick(
        &mut self,
        platform: &mut P,
        id: SessionId,
        now_ms: f64,
        params: &ParameterSet,
        state: &mut FrameState,
    ) -> Tick {
        let Some(session) = self.live_mut(id) else {
            return Tick::Stale;
        };

        session.frame = match platform.request_frame(id) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!("{id}: {err}");
                None
            }
        };

        let pixel_ratio = params.effective_pixel_ratio();
        if pixel_ratio != session.pixel_ratio {
            session.pixel_ratio = pixel_ratio;
            Self::apply_resize(session, platform);
        }

        if params.page_load_animation {
            state.page_load.begin(now_ms);
        }

        let uniforms = &mut session.uniforms;
        uniforms.time = state
            .clock
            .advance(now_ms, params.time_scale, params.pause) as f32;

        if params.page_load_animation {
            if let Some(progress) = state.page_load.progress(now_ms) {
                uniforms.page_load_progress = progress;
            }
        }

        if params.mouse_react {
            uniforms.mouse = state.pointer.advance();
        }

        uniforms.apply_params(params);

        if let Err(err) = session.gpu.draw(&session.uniforms) {
            warn!("{id} halted: {err}");
            if let Some(frame) = session.frame.take() {
                platform.cancel_frame(frame);
            }
            return Tick::Halted;
        }
        Tick::Drawn
    }

    fn live_mut(&mut self, id: SessionId) -> Option<&mut ActiveSession<P>> {
        self.active.as_mut().filter(|session| session.id == id)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    /// True while a frame callback is pending.
    pub fn is_looping(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.frame.is_some())
    }

    pub fn uniforms(&self) -> Option<&Uniforms> {
        self.active.as_ref().map(|session| &session.uniforms)
    }
}
