// Centralized input caps to harden against untrusted host coordinates

pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;

// Path growth cap; a drag at the minimum point spacing would have to circle
// the globe hundreds of times to reach it.
pub const MAX_PATH_POINTS: usize = 100_000;

#[inline]
pub fn in_lat_bounds(lat: f64) -> bool {
    lat.is_finite() && lat >= LAT_MIN && lat <= LAT_MAX
}
