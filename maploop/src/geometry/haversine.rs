use crate::geometry::tolerance::EARTH_RADIUS_M;
use crate::model::GeoPoint;

/// Great-circle distance in meters between two geocoordinates.
///
/// Spherical haversine on the mean Earth radius, matching the measurement
/// model of the host mapping stack so spacing thresholds agree with what the
/// host reports.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi_a = a.lat.to_radians();
    let phi_b = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1.0 for antipodal pairs
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
