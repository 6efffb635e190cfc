use serde_json::{json, Value};

use crate::DrawingSession;

pub(crate) fn to_json_impl(s: &DrawingSession) -> Value {
    let path: Vec<Value> = s.state.path.iter().map(|p| json!([p.lat, p.lng])).collect();
    let display: Vec<Value> = s
        .display_path()
        .iter()
        .map(|p| json!([p.lat, p.lng]))
        .collect();
    json!({
        "status": s.state.status.as_str(),
        "path": path,
        "displayPath": display,
        "loopClosed": s.state.loop_closed,
        "startedAtMs": s.state.started_at_ms,
        "dragged": s.dragged,
        "connectivity": {
            "ready": s.connectivity.ready,
            "offline": s.connectivity.offline,
        },
        "version": s.state_ver,
    })
}
