pub mod model;
pub mod geometry {
    pub mod containment;
    pub mod haversine;
    pub mod limits;
    pub mod tolerance;
    pub mod transform;
}
mod json;

use geometry::tolerance::{CONNECTIVITY_TIMEOUT_MS, MIN_POINT_SPACING_M};
use geometry::{containment, haversine, limits};
use model::{Connectivity, DrawingState, DrawingStatus, GeoPoint};

/// Change listener. Receives no payload; re-read the session state.
pub type Listener = Box<dyn FnMut()>;

/// One finger-drawn loop on a map: the current [`DrawingState`], the
/// transient drag flag, and the host-readiness record.
///
/// All mutating operations commit a fresh state value, bump the version and
/// notify listeners synchronously, then return whether anything changed.
/// Out-of-state calls are silent no-ops, never errors; the host gesture
/// layer may deliver events in surprising orders.
pub struct DrawingSession {
    pub(crate) state: DrawingState,
    pub(crate) dragged: bool,
    pub(crate) connectivity: Connectivity,
    listeners: Vec<Option<Listener>>,
    pub(crate) state_ver: u64,
}

impl DrawingSession {
    /// New idle session. Arms the readiness window; the caller owns actual
    /// timer scheduling and reports back via [`poll_connectivity`] or
    /// [`expire_connectivity`].
    ///
    /// [`poll_connectivity`]: DrawingSession::poll_connectivity
    /// [`expire_connectivity`]: DrawingSession::expire_connectivity
    pub fn new(now_ms: f64) -> DrawingSession {
        DrawingSession {
            state: DrawingState::idle(),
            dragged: false,
            connectivity: Connectivity::armed(now_ms, CONNECTIVITY_TIMEOUT_MS),
            listeners: Vec::new(),
            state_ver: 1,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn state_version(&self) -> u64 {
        self.state_ver
    }

    pub fn was_dragged(&self) -> bool {
        self.dragged
    }

    // Lifecycle

    /// Begin a gesture. Legal from any state; replaces whatever was there.
    pub fn start(&mut self, p: GeoPoint, now_ms: f64) -> bool {
        if !p.is_finite() {
            return false;
        }
        self.dragged = false;
        self.commit(DrawingState {
            status: DrawingStatus::Drawing,
            path: vec![p],
            started_at_ms: Some(now_ms),
            loop_closed: false,
        });
        true
    }

    /// Record a drag sample. No-op unless drawing. Samples closer than
    /// `MIN_POINT_SPACING_M` to the last recorded point are dropped to keep
    /// point density bounded over large areas.
    pub fn add_point(&mut self, p: GeoPoint) -> bool {
        if self.state.status != DrawingStatus::Drawing || !p.is_finite() {
            return false;
        }
        if self.state.path.len() >= limits::MAX_PATH_POINTS {
            return false;
        }
        if let Some(&last) = self.state.path.last() {
            if haversine::distance_m(last, p) < MIN_POINT_SPACING_M {
                return false;
            }
        }
        let mut path = self.state.path.clone();
        path.push(p);
        self.dragged = true;
        self.commit(DrawingState {
            status: DrawingStatus::Drawing,
            path,
            started_at_ms: self.state.started_at_ms,
            loop_closed: false,
        });
        true
    }

    /// End the gesture. No-op unless drawing.
    ///
    /// A gesture that never recorded a second point is a tap: it still closes
    /// into a (single-point) loop, except for the empty-path case, which
    /// resets instead. That branch is unreachable after `start`, which always
    /// seeds one point; it is kept for event-ordering races.
    pub fn complete(&mut self) -> bool {
        if self.state.status != DrawingStatus::Drawing {
            return false;
        }
        if !self.dragged && self.state.path.is_empty() {
            return self.reset();
        }
        self.commit(DrawingState {
            status: DrawingStatus::Completed,
            path: self.state.path.clone(),
            started_at_ms: self.state.started_at_ms,
            loop_closed: true,
        });
        true
    }

    /// Back to idle from any state.
    pub fn reset(&mut self) -> bool {
        self.dragged = false;
        self.commit(DrawingState::idle());
        true
    }

    /// Path as presented for display: the recorded points, plus the first
    /// point re-appended once the loop is closed. Computed, never stored.
    pub fn display_path(&self) -> Vec<GeoPoint> {
        let mut out = self.state.path.clone();
        if self.state.loop_closed {
            if let Some(&first) = out.first() {
                out.push(first);
            }
        }
        out
    }

    // Containment queries against the drawn loop

    pub fn contains(&self, p: GeoPoint) -> bool {
        containment::point_in_ring(p, &self.state.path)
    }

    pub fn on_boundary(&self, p: GeoPoint, tol_deg: f64) -> bool {
        containment::point_on_ring_edge(p, &self.state.path, tol_deg)
    }

    // Listeners

    pub fn subscribe(&mut self, listener: Listener) -> u32 {
        let id = self.listeners.len() as u32;
        self.listeners.push(Some(listener));
        id
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        match self.listeners.get_mut(id as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    // Connectivity

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn is_ready(&self) -> bool {
        self.connectivity.ready
    }

    pub fn is_offline(&self) -> bool {
        self.connectivity.offline
    }

    /// Host map surface came up. Disarms the window; `offline` can no longer
    /// fire for this session unless a retry re-arms it.
    pub fn map_ready(&mut self) -> bool {
        if self.connectivity.ready {
            return false;
        }
        self.connectivity = Connectivity {
            ready: true,
            offline: false,
            deadline_ms: None,
        };
        self.bump_and_notify();
        true
    }

    /// Clock-driven check of the readiness window. Flips to offline once the
    /// armed deadline has passed without a ready signal; fires at most once
    /// per armed window.
    pub fn poll_connectivity(&mut self, now_ms: f64) -> bool {
        match self.connectivity.deadline_ms {
            Some(d) if !self.connectivity.ready && now_ms >= d => self.expire_connectivity(),
            _ => false,
        }
    }

    /// Timer-driven expiry: the one-shot window elapsed. The timer is the
    /// authority here, so no timestamp comparison happens.
    pub fn expire_connectivity(&mut self) -> bool {
        if self.connectivity.ready || self.connectivity.deadline_ms.is_none() {
            return false;
        }
        self.connectivity = Connectivity {
            ready: false,
            offline: true,
            deadline_ms: None,
        };
        self.bump_and_notify();
        true
    }

    /// Caller-driven retry: clear the offline flag and re-arm the same
    /// one-shot window. No-op once ready.
    pub fn retry_connectivity(&mut self, now_ms: f64) -> bool {
        if self.connectivity.ready {
            return false;
        }
        self.connectivity = Connectivity::armed(now_ms, CONNECTIVITY_TIMEOUT_MS);
        self.bump_and_notify();
        true
    }

    // Snapshot

    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }

    fn commit(&mut self, next: DrawingState) {
        self.state = next;
        self.bump_and_notify();
    }

    fn bump_and_notify(&mut self) {
        self.state_ver = self.state_ver.wrapping_add(1);
        for slot in &mut self.listeners {
            if let Some(cb) = slot {
                cb();
            }
        }
    }
}
