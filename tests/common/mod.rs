#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use faulty_terminal::{
    EffectError, FaultyTerminal, GpuContext, ParameterSet, Platform, SessionId, SurfaceSize,
    Uniforms,
};

/// Everything the fake host saw, plus knobs to make it misbehave.
#[derive(Debug)]
pub struct HostLog {
    pub display: bool,
    pub container: (f64, f64),
    pub random: f64,
    pub fail_draw: bool,
    pub fail_lose_context: bool,
    pub fail_compile: bool,
    pub fail_observe_resize: bool,
    pub fail_listen_pointer: bool,
    pub fail_request_frame: bool,
    pub fail_unmount: bool,

    pub contexts_created: usize,
    pub contexts_lost: usize,
    pub unmounted: usize,
    pub mounted: usize,
    pub draws: Vec<Uniforms>,
    pub next_frame: u32,
    pub pending_frames: Vec<(u32, SessionId)>,
    pub cancelled_frames: Vec<u32>,
    pub subscriptions: Vec<(u64, &'static str, Option<SessionId>)>,
    pub next_subscription: u64,
    pub visibility_threshold: Option<f64>,
}

impl Default for HostLog {
    fn default() -> Self {
        Self {
            display: true,
            container: (400.0, 300.0),
            random: 0.25,
            fail_draw: false,
            fail_lose_context: false,
            fail_compile: false,
            fail_observe_resize: false,
            fail_listen_pointer: false,
            fail_request_frame: false,
            fail_unmount: false,
            contexts_created: 0,
            contexts_lost: 0,
            unmounted: 0,
            mounted: 0,
            draws: Vec::new(),
            next_frame: 1,
            pending_frames: Vec::new(),
            cancelled_frames: Vec::new(),
            subscriptions: Vec::new(),
            next_subscription: 1,
            visibility_threshold: None,
        }
    }
}

pub type Shared = Rc<RefCell<HostLog>>;

pub struct FakePlatform {
    log: Shared,
}

pub struct FakeSubscription {
    id: u64,
    log: Shared,
}

impl Drop for FakeSubscription {
    fn drop(&mut self) {
        self.log
            .borrow_mut()
            .subscriptions
            .retain(|(id, _, _)| *id != self.id);
    }
}

pub struct FakeContext {
    log: Shared,
    pixel_ratio: f64,
    buffer: (u32, u32),
    mounted: bool,
}

impl FakePlatform {
    fn subscribe(&mut self, kind: &'static str, session: Option<SessionId>) -> FakeSubscription {
        let mut log = self.log.borrow_mut();
        let id = log.next_subscription;
        log.next_subscription += 1;
        log.subscriptions.push((id, kind, session));
        FakeSubscription {
            id,
            log: self.log.clone(),
        }
    }
}

impl Platform for FakePlatform {
    type Context = FakeContext;
    type Subscription = FakeSubscription;
    type FrameHandle = u32;

    fn has_display(&self) -> bool {
        self.log.borrow().display
    }

    fn observe_visibility(&mut self, threshold: f64) -> Result<FakeSubscription, EffectError> {
        self.log.borrow_mut().visibility_threshold = Some(threshold);
        Ok(self.subscribe("visibility", None))
    }

    fn create_context(&mut self, pixel_ratio: f64) -> Result<FakeContext, EffectError> {
        let mut log = self.log.borrow_mut();
        log.contexts_created += 1;
        log.mounted += 1;
        Ok(FakeContext {
            log: self.log.clone(),
            pixel_ratio,
            // Canvas default size before the first resize.
            buffer: (300, 150),
            mounted: true,
        })
    }

    fn container_size(&self) -> (f64, f64) {
        self.log.borrow().container
    }

    fn observe_resize(&mut self, session: SessionId) -> Result<FakeSubscription, EffectError> {
        if self.log.borrow().fail_observe_resize {
            return Err(EffectError::Observer {
                what: "ResizeObserver",
                detail: "forced failure".into(),
            });
        }
        Ok(self.subscribe("resize", Some(session)))
    }

    fn listen_pointer(&mut self, session: SessionId) -> Result<FakeSubscription, EffectError> {
        if self.log.borrow().fail_listen_pointer {
            return Err(EffectError::Observer {
                what: "mousemove listener",
                detail: "forced failure".into(),
            });
        }
        Ok(self.subscribe("pointer", Some(session)))
    }

    fn request_frame(&mut self, session: SessionId) -> Result<u32, EffectError> {
        let mut log = self.log.borrow_mut();
        // A session only asks again once its previous callback has fired.
        log.pending_frames.retain(|(_, pending)| *pending != session);
        if log.fail_request_frame {
            return Err(EffectError::Schedule("forced failure".into()));
        }
        let handle = log.next_frame;
        log.next_frame += 1;
        log.pending_frames.push((handle, session));
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        let mut log = self.log.borrow_mut();
        log.pending_frames.retain(|(pending, _)| *pending != handle);
        log.cancelled_frames.push(handle);
    }

    fn random(&mut self) -> f64 {
        self.log.borrow().random
    }
}

impl GpuContext for FakeContext {
    type Program = ();
    type Geometry = ();
    type Mesh = ();

    fn set_clear_color(&mut self, _rgba: [f32; 4]) {}

    fn set_size(&mut self, size: SurfaceSize) {
        self.pixel_ratio = size.pixel_ratio;
        self.buffer = size.backing();
    }

    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.buffer
    }

    fn compile_program(
        &mut self,
        _vertex: &str,
        _fragment: &str,
        _uniforms: &Uniforms,
    ) -> Result<(), EffectError> {
        if self.log.borrow().fail_compile {
            return Err(EffectError::ShaderCompile {
                stage: "fragment",
                log: "forced failure".into(),
            });
        }
        Ok(())
    }

    fn create_triangle(&mut self) -> Result<(), EffectError> {
        Ok(())
    }

    fn create_mesh(&mut self, _geometry: &(), _program: &()) -> Result<(), EffectError> {
        Ok(())
    }

    fn draw(&mut self, _mesh: &(), _program: &(), uniforms: &Uniforms) -> Result<(), EffectError> {
        let mut log = self.log.borrow_mut();
        if log.fail_draw {
            return Err(EffectError::ContextLost);
        }
        log.draws.push(uniforms.clone());
        Ok(())
    }

    fn lose_context(&mut self) -> Result<(), EffectError> {
        let mut log = self.log.borrow_mut();
        if log.fail_lose_context {
            return Err(EffectError::Release("WEBGL_lose_context unavailable".into()));
        }
        log.contexts_lost += 1;
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), EffectError> {
        if self.log.borrow().fail_unmount {
            return Err(EffectError::Release("canvas has no parent".into()));
        }
        if !self.mounted {
            return Err(EffectError::Release("already detached".into()));
        }
        self.mounted = false;
        self.log.borrow_mut().unmounted += 1;
        Ok(())
    }
}

pub fn terminal_with(params: ParameterSet) -> (FaultyTerminal<FakePlatform>, Shared) {
    let log = Shared::default();
    let platform = FakePlatform { log: log.clone() };
    (FaultyTerminal::new(platform, params), log)
}

pub fn terminal() -> (FaultyTerminal<FakePlatform>, Shared) {
    terminal_with(ParameterSet::default())
}

/// Attaches and reports the region as visible, returning the live session.
pub fn visible_terminal(params: ParameterSet) -> (FaultyTerminal<FakePlatform>, Shared, SessionId) {
    let (mut terminal, log) = terminal_with(params);
    assert!(terminal.on_attach());
    terminal.on_visibility_change(true);
    let session = terminal
        .session()
        .active_id()
        .expect("session should start when visible");
    (terminal, log, session)
}

pub fn live_subscriptions(log: &Shared, kind: &str) -> Vec<Option<SessionId>> {
    log.borrow()
        .subscriptions
        .iter()
        .filter(|(_, k, _)| *k == kind)
        .map(|(_, _, session)| *session)
        .collect()
}

pub fn last_draw(log: &Shared) -> Uniforms {
    log.borrow()
        .draws
        .last()
        .cloned()
        .expect("at least one frame drawn")
}
