//! Point-in-loop testing for drawn paths.
//!
//! Uses horizontal ray casting with the even-odd rule: an eastward ray at the
//! candidate's latitude is intersected with every loop edge whose endpoints
//! straddle that latitude.

use crate::geometry::tolerance::EPS_SEG;
use crate::model::GeoPoint;

/// Count crossings between an eastward ray from `p` and the loop edges.
///
/// Rings with fewer than 3 vertices cross nothing. The closing edge from the
/// last vertex back to the first is implied; callers pass the recorded path
/// without the repeated display point.
pub fn crossing_number(p: GeoPoint, ring: &[GeoPoint]) -> i32 {
    if ring.len() < 3 {
        return 0;
    }

    let mut crossings = 0i32;
    let n = ring.len();

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];

        let straddles = (a.lat <= p.lat && b.lat > p.lat) || (b.lat <= p.lat && a.lat > p.lat);

        if straddles {
            // Longitude where the edge meets the ray's latitude
            let t = (p.lat - a.lat) / (b.lat - a.lat);
            let lng_intersect = a.lng + t * (b.lng - a.lng);

            if p.lng < lng_intersect {
                crossings += 1;
            }
        }
    }

    crossings
}

/// Even-odd containment test. Odd crossing count means inside.
///
/// Behavior for points lying exactly on an edge or vertex is unspecified;
/// hosts that care should check [`point_on_ring_edge`] first.
#[inline]
pub fn point_in_ring(p: GeoPoint, ring: &[GeoPoint]) -> bool {
    crossing_number(p, ring) % 2 == 1
}

/// Check whether `p` lies within `tol_deg` of any loop edge (closing edge
/// included). Degree-space distance, intended for small tolerances.
pub fn point_on_ring_edge(p: GeoPoint, ring: &[GeoPoint], tol_deg: f64) -> bool {
    if ring.is_empty() {
        return false;
    }

    let tol_sq = tol_deg * tol_deg;
    let n = ring.len();

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        if point_on_segment_sq(p, a, b, tol_sq) {
            return true;
        }
    }

    false
}

fn point_on_segment_sq(p: GeoPoint, a: GeoPoint, b: GeoPoint, tol_sq: f64) -> bool {
    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;
    let len_sq = dx * dx + dy * dy;

    if len_sq < EPS_SEG {
        let dpx = p.lng - a.lng;
        let dpy = p.lat - a.lat;
        return dpx * dpx + dpy * dpy <= tol_sq;
    }

    let t = ((p.lng - a.lng) * dx + (p.lat - a.lat) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let cx = a.lng + t * dx;
    let cy = a.lat + t * dy;

    let dist_sq = (p.lng - cx).powi(2) + (p.lat - cy).powi(2);
    dist_sq <= tol_sq
}
