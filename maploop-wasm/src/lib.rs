use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

mod api;
mod error;
mod interop;
mod timer;

pub use api::{distance_meters, set_panic_hook};

pub(crate) type SharedSession = Rc<RefCell<maploop::DrawingSession>>;
pub(crate) type JsListeners = Rc<RefCell<Vec<Option<js_sys::Function>>>>;

#[wasm_bindgen]
pub struct LoopWidget {
    pub(crate) inner: SharedSession,
    pub(crate) js_listeners: JsListeners,
    pub(crate) transform: Option<js_sys::Function>,
    pub(crate) timer: timer::OneShot,
}

impl Drop for LoopWidget {
    // A late timer fire must never reach a freed widget
    fn drop(&mut self) {
        self.timer.cancel();
    }
}
