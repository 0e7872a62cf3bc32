use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::event::AlertEvent;

/// Where a qualifying evaluation lands. The caller's contract is to call
/// `fire` exactly once per qualifying evaluation.
pub trait AlertSurface {
    fn fire(&mut self, ev: &AlertEvent) -> Result<()>;
}

/// Stands in for the modal notification: one structured log line.
pub struct LogAlert;

impl AlertSurface for LogAlert {
    fn fire(&mut self, ev: &AlertEvent) -> Result<()> {
        info!(
            "alert: within radius of marker {} ({:.0} m <= {:.0} m) at {:.5},{:.5}",
            ev.marker_id, ev.distance_m, ev.radius_m, ev.lat, ev.lon
        );
        Ok(())
    }
}

/// Haptic pulse via the timed-output sysfs interface: writing a duration
/// in milliseconds to the node runs the vibrator for that long.
pub struct TimedOutputVibrator {
    path: PathBuf,
    pulse_ms: u64,
}

impl TimedOutputVibrator {
    pub fn new(path: impl Into<PathBuf>, pulse_ms: u64) -> Self {
        Self { path: path.into(), pulse_ms }
    }
}

impl AlertSurface for TimedOutputVibrator {
    fn fire(&mut self, _ev: &AlertEvent) -> Result<()> {
        std::fs::write(&self.path, self.pulse_ms.to_string())
            .with_context(|| format!("write vibrator {}", self.path.display()))?;
        Ok(())
    }
}
