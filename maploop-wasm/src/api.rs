use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use maploop::geometry::tolerance::CONNECTIVITY_TIMEOUT_MS;
use maploop::geometry::{haversine, limits};
use maploop::model::GeoPoint;
use maploop::DrawingSession;

use crate::error;
use crate::timer::OneShot;
use crate::{JsListeners, LoopWidget, SharedSession};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Great-circle meters between two geocoordinates.
#[wasm_bindgen]
pub fn distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine::distance_m(GeoPoint::new(lat1, lng1), GeoPoint::new(lat2, lng2))
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

// Listener calls happen on a snapshot taken after the session borrow is
// released, so a listener may call back into the widget.
fn notify_js(listeners: &JsListeners) {
    let snapshot: Vec<js_sys::Function> = listeners.borrow().iter().flatten().cloned().collect();
    for cb in snapshot {
        let _ = cb.call0(&JsValue::NULL);
    }
}

fn arm_connectivity_timer(timer: &mut OneShot, inner: &SharedSession, listeners: &JsListeners) {
    let inner = Rc::clone(inner);
    let listeners = Rc::clone(listeners);
    timer.arm(CONNECTIVITY_TIMEOUT_MS as i32, move || {
        let fired = inner.borrow_mut().expire_connectivity();
        if fired {
            notify_js(&listeners);
        }
    });
}

impl LoopWidget {
    fn screen_to_geo_js(&self, x: f64, y: f64) -> Option<GeoPoint> {
        let f = self.transform.as_ref()?;
        let v = f
            .call2(&JsValue::NULL, &JsValue::from_f64(x), &JsValue::from_f64(y))
            .ok()?;
        let pair: Vec<f64> = serde_wasm_bindgen::from_value(v).ok()?;
        if pair.len() != 2 {
            return None;
        }
        let g = GeoPoint::new(pair[0], pair[1]);
        if !g.is_finite() || !limits::in_lat_bounds(g.lat) {
            return None;
        }
        Some(g)
    }
}

#[wasm_bindgen]
impl LoopWidget {
    /// Build a widget and arm the 10 s map-readiness window. Freeing the
    /// widget cancels the pending timer.
    #[wasm_bindgen(constructor)]
    pub fn new() -> LoopWidget {
        let inner: SharedSession = Rc::new(RefCell::new(DrawingSession::new(now_ms())));
        let js_listeners: JsListeners = Rc::new(RefCell::new(Vec::new()));
        let mut timer = OneShot::new();
        arm_connectivity_timer(&mut timer, &inner, &js_listeners);
        LoopWidget {
            inner,
            js_listeners,
            transform: None,
            timer,
        }
    }

    // Host wiring

    /// Register the host's screen-to-geo projection. Called as `f(x, y)` and
    /// expected to return `[lat, lng]`; a throw or malformed result counts as
    /// a failed conversion for that event.
    pub fn set_transform(&mut self, f: js_sys::Function) {
        self.transform = Some(f);
    }

    pub fn clear_transform(&mut self) {
        self.transform = None;
    }

    pub fn on_change(&mut self, f: js_sys::Function) -> u32 {
        let mut listeners = self.js_listeners.borrow_mut();
        let id = listeners.len() as u32;
        listeners.push(Some(f));
        id
    }

    pub fn off_change(&mut self, id: u32) -> bool {
        let mut listeners = self.js_listeners.borrow_mut();
        match listeners.get_mut(id as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    // Gesture entry points (screen space)

    pub fn pan_start(&mut self, x: f64, y: f64) -> bool {
        let g = match self.screen_to_geo_js(x, y) {
            Some(g) => g,
            None => return false,
        };
        let changed = self.inner.borrow_mut().start(g, now_ms());
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn pan_update(&mut self, x: f64, y: f64) -> bool {
        let g = match self.screen_to_geo_js(x, y) {
            Some(g) => g,
            None => return false,
        };
        let changed = self.inner.borrow_mut().add_point(g);
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn pan_end(&mut self) -> bool {
        let changed = self.inner.borrow_mut().complete();
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn pan_start_res(&mut self, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.transform.is_none() {
            return error::no_transform();
        }
        let g = match self.screen_to_geo_js(x, y) {
            Some(g) => g,
            None => return error::transform_failed(),
        };
        let changed = self.inner.borrow_mut().start(g, now_ms());
        if changed {
            notify_js(&self.js_listeners);
        }
        error::ok(JsValue::from_bool(changed))
    }

    pub fn pan_update_res(&mut self, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.transform.is_none() {
            return error::no_transform();
        }
        let g = match self.screen_to_geo_js(x, y) {
            Some(g) => g,
            None => return error::transform_failed(),
        };
        let changed = self.inner.borrow_mut().add_point(g);
        if changed {
            notify_js(&self.js_listeners);
        }
        error::ok(JsValue::from_bool(changed))
    }

    // Geo-level lifecycle, for hosts that project coordinates themselves

    pub fn start(&mut self, lat: f64, lng: f64) -> bool {
        let changed = self.inner.borrow_mut().start(GeoPoint::new(lat, lng), now_ms());
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn add_point(&mut self, lat: f64, lng: f64) -> bool {
        let changed = self.inner.borrow_mut().add_point(GeoPoint::new(lat, lng));
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn complete(&mut self) -> bool {
        let changed = self.inner.borrow_mut().complete();
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn reset(&mut self) -> bool {
        let changed = self.inner.borrow_mut().reset();
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    pub fn start_res(&mut self, lat: f64, lng: f64) -> JsValue {
        if !lat.is_finite() {
            return error::non_finite("lat");
        }
        if !lng.is_finite() {
            return error::non_finite("lng");
        }
        if !limits::in_lat_bounds(lat) {
            return error::invalid_latitude(lat);
        }
        error::ok(JsValue::from_bool(self.start(lat, lng)))
    }

    pub fn add_point_res(&mut self, lat: f64, lng: f64) -> JsValue {
        if !lat.is_finite() {
            return error::non_finite("lat");
        }
        if !lng.is_finite() {
            return error::non_finite("lng");
        }
        if !limits::in_lat_bounds(lat) {
            return error::invalid_latitude(lat);
        }
        error::ok(JsValue::from_bool(self.add_point(lat, lng)))
    }

    // State getters

    pub fn status(&self) -> String {
        self.inner.borrow().state().status.as_str().to_string()
    }

    /// Recorded path, interleaved `[lat0, lng0, lat1, lng1, ...]`.
    pub fn path(&self) -> js_sys::Float64Array {
        crate::interop::arr_geo(&self.inner.borrow().state().path)
    }

    /// Path for rendering: closed loops repeat the first point at the end.
    pub fn display_path(&self) -> js_sys::Float64Array {
        crate::interop::arr_geo(&self.inner.borrow().display_path())
    }

    pub fn path_len(&self) -> u32 {
        self.inner.borrow().state().path.len() as u32
    }

    pub fn is_loop_closed(&self) -> bool {
        self.inner.borrow().state().loop_closed
    }

    pub fn started_at_ms(&self) -> Option<f64> {
        self.inner.borrow().state().started_at_ms
    }

    pub fn state_version(&self) -> u64 {
        self.inner.borrow().state_version()
    }

    pub fn snapshot(&self) -> JsValue {
        let s = self.inner.borrow();
        let obj = crate::interop::new_obj();
        crate::interop::set_kv(&obj, "status", &JsValue::from_str(s.state().status.as_str()));
        crate::interop::set_kv(&obj, "pathLength", &JsValue::from_f64(s.state().path.len() as f64));
        crate::interop::set_kv(&obj, "loopClosed", &JsValue::from_bool(s.state().loop_closed));
        crate::interop::set_kv(&obj, "ready", &JsValue::from_bool(s.is_ready()));
        crate::interop::set_kv(&obj, "offline", &JsValue::from_bool(s.is_offline()));
        crate::interop::set_kv(&obj, "version", &JsValue::from_f64(s.state_version() as f64));
        obj.into()
    }

    pub fn to_json(&self) -> JsValue {
        let v = self.inner.borrow().to_json_value();
        serde_wasm_bindgen::to_value(&v).unwrap_or(JsValue::NULL)
    }

    // Containment queries

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.inner.borrow().contains(GeoPoint::new(lat, lng))
    }

    pub fn on_boundary(&self, lat: f64, lng: f64, tol_deg: f64) -> bool {
        self.inner.borrow().on_boundary(GeoPoint::new(lat, lng), tol_deg)
    }

    pub fn contains_res(&self, lat: f64, lng: f64) -> JsValue {
        if !lat.is_finite() {
            return error::non_finite("lat");
        }
        if !lng.is_finite() {
            return error::non_finite("lng");
        }
        if !limits::in_lat_bounds(lat) {
            return error::invalid_latitude(lat);
        }
        error::ok(JsValue::from_bool(self.contains(lat, lng)))
    }

    // Connectivity

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().is_ready()
    }

    pub fn is_offline(&self) -> bool {
        self.inner.borrow().is_offline()
    }

    /// Forward the host map's ready signal. Cancels the pending window.
    pub fn map_ready(&mut self) -> bool {
        self.timer.cancel();
        let changed = self.inner.borrow_mut().map_ready();
        if changed {
            notify_js(&self.js_listeners);
        }
        changed
    }

    /// Clear the offline flag and re-arm the one-shot window.
    pub fn retry_connectivity(&mut self) -> bool {
        let changed = self.inner.borrow_mut().retry_connectivity(now_ms());
        if changed {
            arm_connectivity_timer(&mut self.timer, &self.inner, &self.js_listeners);
            notify_js(&self.js_listeners);
        }
        changed
    }
}
