use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::controller::FaultyTerminal;
use crate::params::ParameterSet;

mod platform;
mod render;

pub use platform::WebPlatform;

type SharedTerminal = Rc<RefCell<FaultyTerminal<WebPlatform>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn device_params() -> ParameterSet {
    let ratio = web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .unwrap_or(1.0);
    ParameterSet::for_device(ratio)
}

fn config_error(err: crate::error::EffectError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS-facing handle: `new FaultyTerminal(options?)`, then `attach(wrapper,
/// container)` once both elements are in the document and `detach()` before
/// they go away.
#[wasm_bindgen(js_name = FaultyTerminal)]
pub struct FaultyTerminalHandle {
    params: ParameterSet,
    terminal: Option<SharedTerminal>,
    applied_class: Option<String>,
}

#[wasm_bindgen(js_class = FaultyTerminal)]
impl FaultyTerminalHandle {
    /// `options` is a JSON object of parameters; missing keys use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<FaultyTerminalHandle, JsValue> {
        let params = match options {
            Some(json) => device_params().merged(&json).map_err(config_error)?,
            None => device_params(),
        };
        Ok(Self {
            params,
            terminal: None,
            applied_class: None,
        })
    }

    /// Starts watching `wrapper` for visibility. The canvas is mounted into
    /// `container` whenever the wrapper scrolls into view.
    pub fn attach(&mut self, wrapper: HtmlElement, container: HtmlElement) {
        self.detach();

        let terminal: SharedTerminal = Rc::new(RefCell::new(FaultyTerminal::new(
            WebPlatform::new(wrapper, container),
            self.params.clone(),
        )));
        terminal.borrow_mut().platform_mut().bind(&terminal);
        if terminal.borrow_mut().on_attach() {
            self.terminal = Some(terminal);
            self.apply_style_class();
        }
    }

    /// Stops rendering and disconnects every observer. Idempotent.
    pub fn detach(&mut self) {
        if let Some(terminal) = self.terminal.take() {
            if let Some(class) = self.applied_class.take() {
                let _ = terminal
                    .borrow()
                    .platform()
                    .wrapper()
                    .class_list()
                    .remove_1(&class);
            }
            terminal.borrow_mut().on_detach();
        }
    }

    /// Applies a partial JSON object of parameters; takes effect next frame.
    pub fn configure(&mut self, patch: &str) -> Result<(), JsValue> {
        self.params = self.params.merged(patch).map_err(config_error)?;
        if let Some(terminal) = &self.terminal {
            terminal.borrow_mut().set_params(self.params.clone());
        }
        self.apply_style_class();
        Ok(())
    }

    /// Whether a render session currently holds a canvas.
    #[wasm_bindgen(getter)]
    pub fn rendering(&self) -> bool {
        self.terminal
            .as_ref()
            .is_some_and(|terminal| terminal.borrow().is_rendering())
    }

    fn apply_style_class(&mut self) {
        let Some(terminal) = &self.terminal else {
            return;
        };
        if self.applied_class == self.params.style_class {
            return;
        }
        let terminal = terminal.borrow();
        let classes = terminal.platform().wrapper().class_list();
        if let Some(old) = self.applied_class.take() {
            let _ = classes.remove_1(&old);
        }
        if let Some(class) = self.params.style_class.as_deref().filter(|c| !c.is_empty()) {
            if classes.add_1(class).is_ok() {
                self.applied_class = Some(class.to_owned());
            }
        }
    }
}

impl Drop for FaultyTerminalHandle {
    fn drop(&mut self) {
        self.detach();
    }
}
