// Centralized thresholds for the drawing core

pub const MIN_POINT_SPACING_M: f64 = 1000.0; // drop drag samples closer than this (m)
pub const CONNECTIVITY_TIMEOUT_MS: f64 = 10_000.0; // offline fallback window (ms)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8; // mean Earth radius, matches the host measuring stack
pub const EPS_SEG: f64 = 1e-12; // degenerate segment guard (deg^2)
