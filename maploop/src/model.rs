use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingStatus {
    Idle,
    Drawing,
    Completed,
}

impl DrawingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawingStatus::Idle => "idle",
            DrawingStatus::Drawing => "drawing",
            DrawingStatus::Completed => "completed",
        }
    }
}

/// Snapshot of a drawing gesture. Replaced wholesale on every transition,
/// never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawingState {
    pub status: DrawingStatus,
    pub path: Vec<GeoPoint>,
    pub started_at_ms: Option<f64>,
    pub loop_closed: bool,
}

impl DrawingState {
    pub fn idle() -> DrawingState {
        DrawingState {
            status: DrawingStatus::Idle,
            path: Vec::new(),
            started_at_ms: None,
            loop_closed: false,
        }
    }
}

/// Readiness of the host map surface. `ready` and `offline` are never both
/// true; both are false during the initial detection window. `deadline_ms`
/// is present only while the one-shot window is armed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connectivity {
    pub ready: bool,
    pub offline: bool,
    pub deadline_ms: Option<f64>,
}

impl Connectivity {
    pub fn armed(now_ms: f64, window_ms: f64) -> Connectivity {
        Connectivity {
            ready: false,
            offline: false,
            deadline_ms: Some(now_ms + window_ms),
        }
    }
}
