use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, AddEventListenerOptions, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, ResizeObserver,
};

use super::render::{describe, WebGlSurface};
use crate::controller::FaultyTerminal;
use crate::error::EffectError;
use crate::platform::{GpuContext, Platform, SessionId};
use crate::pointer::{Bounds, PointerSample};

type Target = Weak<RefCell<FaultyTerminal<WebPlatform>>>;

/// Runs `f` against the controller unless it is gone or already borrowed.
fn dispatch(target: &Target, f: impl FnOnce(&mut FaultyTerminal<WebPlatform>)) {
    let Some(terminal) = target.upgrade() else {
        return;
    };
    let Ok(mut terminal) = terminal.try_borrow_mut() else {
        log::debug!("dropping re-entrant host callback");
        return;
    };
    f(&mut terminal);
}

/// Browser implementation of [`Platform`].
///
/// The wrapper element is what visibility and pointer events are measured
/// against; the container receives the canvas.
pub struct WebPlatform {
    wrapper: HtmlElement,
    container: HtmlElement,
    target: Target,
    // One frame closure per session, reused by every tick of that session.
    frame_callback: Option<(SessionId, Closure<dyn FnMut(f64)>)>,
}

/// Observer or listener registration; dropping it detaches.
pub enum WebSubscription {
    Intersection {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    },
    Resize {
        observer: ResizeObserver,
        _callback: Closure<dyn FnMut(js_sys::Array, ResizeObserver)>,
    },
    Pointer {
        element: HtmlElement,
        callback: Closure<dyn FnMut(MouseEvent)>,
    },
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        match self {
            WebSubscription::Intersection { observer, .. } => observer.disconnect(),
            WebSubscription::Resize { observer, .. } => observer.disconnect(),
            WebSubscription::Pointer { element, callback } => {
                let _ = element.remove_event_listener_with_callback(
                    "mousemove",
                    callback.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

impl WebPlatform {
    pub fn new(wrapper: HtmlElement, container: HtmlElement) -> Self {
        Self {
            wrapper,
            container,
            target: Weak::new(),
            frame_callback: None,
        }
    }

    /// Points host callbacks at the controller that owns this platform.
    pub fn bind(&mut self, target: &Rc<RefCell<FaultyTerminal<WebPlatform>>>) {
        self.target = Rc::downgrade(target);
    }

    pub fn wrapper(&self) -> &HtmlElement {
        &self.wrapper
    }

    fn frame_callback(&mut self, session: SessionId) -> &Closure<dyn FnMut(f64)> {
        if !matches!(&self.frame_callback, Some((id, _)) if *id == session) {
            self.frame_callback = None;
        }
        let target = self.target.clone();
        let (_, callback) = self.frame_callback.get_or_insert_with(|| {
            let callback = Closure::wrap(Box::new(move |now_ms: f64| {
                dispatch(&target, |terminal| {
                    terminal.on_frame(session, now_ms);
                });
            }) as Box<dyn FnMut(f64)>);
            (session, callback)
        });
        callback
    }
}

impl Platform for WebPlatform {
    type Context = WebGlSurface;
    type Subscription = WebSubscription;
    type FrameHandle = i32;

    fn has_display(&self) -> bool {
        window().is_some()
    }

    fn observe_visibility(&mut self, threshold: f64) -> Result<WebSubscription, EffectError> {
        let target = self.target.clone();
        let handler: Box<dyn FnMut(js_sys::Array, IntersectionObserver)> =
            Box::new(move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let Some(entry) = entries
                    .iter()
                    .last()
                    .and_then(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                else {
                    return;
                };
                let intersecting = entry.is_intersecting();
                dispatch(&target, |terminal| terminal.on_visibility_change(intersecting));
            });
        let callback = Closure::wrap(handler);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| EffectError::Observer {
                    what: "intersection",
                    detail: describe(&err),
                })?;
        observer.observe(&self.wrapper);

        Ok(WebSubscription::Intersection {
            observer,
            _callback: callback,
        })
    }

    fn create_context(&mut self, _pixel_ratio: f64) -> Result<WebGlSurface, EffectError> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| EffectError::ContextUnavailable("container has no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|err| EffectError::ContextUnavailable(describe(&err)))?
            .unchecked_into();
        let mut surface = WebGlSurface::new(canvas)?;

        let mount = || -> Result<(), JsValue> {
            while let Some(child) = self.container.first_child() {
                self.container.remove_child(&child)?;
            }
            self.container.append_child(surface.canvas())?;
            Ok(())
        };
        if let Err(err) = mount() {
            // The context already exists even though the canvas never landed.
            if let Err(lost) = surface.lose_context() {
                log::debug!("ignoring context release failure: {lost}");
            }
            return Err(EffectError::ContextUnavailable(describe(&err)));
        }
        Ok(surface)
    }

    fn container_size(&self) -> (f64, f64) {
        (
            f64::from(self.container.offset_width()),
            f64::from(self.container.offset_height()),
        )
    }

    fn observe_resize(&mut self, session: SessionId) -> Result<WebSubscription, EffectError> {
        let target = self.target.clone();
        let handler: Box<dyn FnMut(js_sys::Array, ResizeObserver)> =
            Box::new(move |_entries: js_sys::Array, _observer: ResizeObserver| {
                dispatch(&target, |terminal| terminal.on_resize(session));
            });
        let callback = Closure::wrap(handler);

        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(|err| {
            EffectError::Observer {
                what: "resize",
                detail: describe(&err),
            }
        })?;
        observer.observe(&self.container);

        Ok(WebSubscription::Resize {
            observer,
            _callback: callback,
        })
    }

    fn listen_pointer(&mut self, session: SessionId) -> Result<WebSubscription, EffectError> {
        let target = self.target.clone();
        let element = self.wrapper.clone();
        let callback = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = element.get_bounding_client_rect();
            let sample = PointerSample {
                client_x: f64::from(event.client_x()),
                client_y: f64::from(event.client_y()),
                bounds: Bounds {
                    left: rect.left(),
                    top: rect.top(),
                    width: rect.width(),
                    height: rect.height(),
                },
            };
            dispatch(&target, |terminal| terminal.on_pointer_move(session, &sample));
        }) as Box<dyn FnMut(MouseEvent)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        self.wrapper
            .add_event_listener_with_callback_and_add_event_listener_options(
                "mousemove",
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| EffectError::Observer {
                what: "pointer",
                detail: describe(&err),
            })?;

        Ok(WebSubscription::Pointer {
            element: self.wrapper.clone(),
            callback,
        })
    }

    fn request_frame(&mut self, session: SessionId) -> Result<i32, EffectError> {
        let window = window().ok_or_else(|| EffectError::Schedule("no window".into()))?;
        let callback = self.frame_callback(session);
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|err| EffectError::Schedule(describe(&err)))
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(window) = window() {
            let _ = window.cancel_animation_frame(handle);
        }
    }

    fn random(&mut self) -> f64 {
        js_sys::Math::random()
    }
}
