use crate::model::{GeoPoint, ScreenPoint};

/// Why a host coordinate transform produced no geocoordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// The host map surface is not available (not ready, disposed, ...)
    Unavailable,
    /// The host transform ran but failed for this point
    Failed,
}

/// Host capability: project a screen-space point onto the map surface.
pub trait MapTransform {
    fn to_geo(&self, p: ScreenPoint) -> Result<GeoPoint, TransformError>;
}

impl<F> MapTransform for F
where
    F: Fn(ScreenPoint) -> Result<GeoPoint, TransformError>,
{
    fn to_geo(&self, p: ScreenPoint) -> Result<GeoPoint, TransformError> {
        self(p)
    }
}

/// Convert one screen point. Failure is absence; the host error never
/// propagates to drawing callers.
pub fn screen_to_geo(p: ScreenPoint, transform: &dyn MapTransform) -> Option<GeoPoint> {
    match transform.to_geo(p) {
        Ok(g) if g.is_finite() => Some(g),
        _ => None,
    }
}

/// Convert a batch in order, silently dropping points that fail. The result
/// may be shorter than the input.
pub fn batch_screen_to_geo(points: &[ScreenPoint], transform: &dyn MapTransform) -> Vec<GeoPoint> {
    points
        .iter()
        .filter_map(|p| screen_to_geo(*p, transform))
        .collect()
}
