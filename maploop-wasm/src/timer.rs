use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

// One-shot cancellable wrapper over window.setTimeout
pub(crate) struct OneShot {
    handle: Option<i32>,
    closure: Option<Closure<dyn FnMut()>>,
}

impl OneShot {
    pub fn new() -> OneShot {
        OneShot {
            handle: None,
            closure: None,
        }
    }

    pub fn arm(&mut self, ms: i32, f: impl FnMut() + 'static) {
        self.cancel();
        let window = match web_sys::window() {
            Some(w) => w,
            None => {
                web_sys::console::warn_1(&JsValue::from_str(
                    "maploop: no window; connectivity timer not armed",
                ));
                return;
            }
        };
        let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        match window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), ms)
        {
            Ok(h) => {
                self.handle = Some(h);
                self.closure = Some(closure);
            }
            Err(_) => {
                web_sys::console::warn_1(&JsValue::from_str("maploop: setTimeout failed"));
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(h) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(h);
            }
        }
        self.closure = None;
    }
}

impl Drop for OneShot {
    fn drop(&mut self) {
        self.cancel();
    }
}
