pub mod doctor;
pub mod event;
pub mod policy;
pub mod surface;

use serde::Deserialize;

pub use event::AlertEvent;
pub use policy::{ProximityGate, RearmPolicy};
pub use surface::{AlertSurface, LogAlert, TimedOutputVibrator};

pub const DEFAULT_PULSE_MS: u64 = 5000;

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// "on-exit" (re-arm after leaving the radius) or "never" (one shot
    /// per marker placement).
    #[serde(default = "default_rearm")]
    pub rearm: String,

    /// Haptic pulse length written to the vibrator, milliseconds.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,

    /// Timed-output sysfs node, e.g. /sys/class/timed_output/vibrator/enable.
    /// Absent means log-only alerts.
    pub vibrator_path: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            rearm: default_rearm(),
            pulse_ms: default_pulse_ms(),
            vibrator_path: None,
        }
    }
}

fn default_rearm() -> String {
    "on-exit".to_string()
}

fn default_pulse_ms() -> u64 {
    DEFAULT_PULSE_MS
}
