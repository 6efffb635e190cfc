use js_sys::{Float64Array, Object, Reflect};
use wasm_bindgen::JsValue;

use maploop::model::GeoPoint;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
// Interleaved [lat0, lng0, lat1, lng1, ...]
pub fn arr_geo(points: &[GeoPoint]) -> Float64Array {
    let mut flat = Vec::with_capacity(points.len() * 2);
    for p in points {
        flat.push(p.lat);
        flat.push(p.lng);
    }
    arr_f64(&flat)
}
