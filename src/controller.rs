use log::{debug, warn};

use crate::clock::FrameState;
use crate::params::ParameterSet;
use crate::platform::{Platform, SessionId};
use crate::pointer::PointerSample;
use crate::session::{RenderSession, Tick};
use crate::visibility::{Transition, VisibilityGate, VISIBILITY_THRESHOLD};

/// Lifecycle controller for one instance of the effect.
///
/// Owns the host platform, the live parameters, the cross-session frame
/// state and the render session. Host integrations call [`on_attach`] once
/// the host element is in a live document and [`on_detach`] when it goes
/// away; observer callbacks are routed to the `on_*` handlers below.
///
/// [`on_attach`]: FaultyTerminal::on_attach
/// [`on_detach`]: FaultyTerminal::on_detach
pub struct FaultyTerminal<P: Platform> {
    platform: P,
    params: ParameterSet,
    state: FrameState,
    gate: VisibilityGate,
    visibility: Option<P::Subscription>,
    session: RenderSession<P>,
    // Last tint run through validation, so each bad value warns once.
    checked_tint: String,
}

impl<P: Platform> FaultyTerminal<P> {
    pub fn new(mut platform: P, params: ParameterSet) -> Self {
        warn_on_bad_tint(&params.tint);
        let state = FrameState::new(platform.random());
        Self {
            platform,
            checked_tint: params.tint.clone(),
            params,
            state,
            gate: VisibilityGate::default(),
            visibility: None,
            session: RenderSession::new(),
        }
    }

    /// Starts watching viewport visibility. Returns false when the effect
    /// stays inert, either because there is no display or because the
    /// observer could not be created.
    pub fn on_attach(&mut self) -> bool {
        if self.visibility.is_some() {
            return true;
        }
        if !self.platform.has_display() {
            debug!("no display available; effect stays inert");
            return false;
        }
        match self.platform.observe_visibility(VISIBILITY_THRESHOLD) {
            Ok(subscription) => {
                self.visibility = Some(subscription);
                true
            }
            Err(err) => {
                warn!("effect disabled: {err}");
                false
            }
        }
    }

    /// Tears down any live session and stops watching visibility.
    /// Calling it again, or before attaching, is harmless.
    pub fn on_detach(&mut self) {
        self.session.stop(&mut self.platform, &mut self.state);
        drop(self.visibility.take());
        self.gate.reset();
    }

    pub fn on_visibility_change(&mut self, intersecting: bool) {
        match self.gate.observe(intersecting) {
            Transition::BecameVisible => self.start(),
            Transition::BecameHidden => self.session.stop(&mut self.platform, &mut self.state),
            Transition::Unchanged => {}
        }
    }

    fn start(&mut self) {
        if let Err(err) = self
            .session
            .start(&mut self.platform, &self.params, &mut self.state)
        {
            warn!("failed to start rendering: {err}");
        }
    }

    pub fn on_resize(&mut self, session: SessionId) {
        if !self.session.resize(&self.platform, session, &self.params) {
            debug!("ignoring resize for stale {session}");
        }
    }

    pub fn on_pointer_move(&mut self, session: SessionId, sample: &PointerSample) {
        self.session.pointer_moved(session, sample, &mut self.state);
    }

    pub fn on_frame(&mut self, session: SessionId, now_ms: f64) -> Tick {
        self.check_tint();
        let tick = self.session.tick(
            &mut self.platform,
            session,
            now_ms,
            &self.params,
            &mut self.state,
        );
        if tick == Tick::Stale {
            debug!("ignoring frame for stale {session}");
        }
        tick
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Live edits take effect on the next frame. A changed tint is
    /// validated then too.
    pub fn params_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    pub fn set_params(&mut self, params: ParameterSet) {
        self.params = params;
        self.check_tint();
    }

    fn check_tint(&mut self) {
        if self.params.tint != self.checked_tint {
            warn_on_bad_tint(&self.params.tint);
            self.checked_tint.clone_from(&self.params.tint);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.visibility.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    pub fn is_rendering(&self) -> bool {
        self.session.is_active()
    }

    pub fn session(&self) -> &RenderSession<P> {
        &self.session
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.state
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: Platform> Drop for FaultyTerminal<P> {
    fn drop(&mut self) {
        self.on_detach();
    }
}

fn warn_on_bad_tint(tint: &str) {
    if let Err(err) = crate::color::parse_hex(tint) {
        warn!("tint renders as black: {err}");
    }
}
