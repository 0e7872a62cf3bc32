use serde::{Deserialize, Serialize};

/// One within-radius notification, ready for the alert surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub ts_unix_ms: i64,
    pub marker_id: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_m: f64,
    pub radius_m: f64,
}
