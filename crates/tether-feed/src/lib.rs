pub mod doctor;
pub mod gate;
pub mod nmea;
pub mod watch;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The OS refused access to the position source. Recoverable: the
    /// subscription is simply never established.
    #[error("location permission denied for {0}")]
    PermissionDenied(String),

    #[error("unknown feed source {0:?}")]
    UnsupportedSource(String),

    #[error("unknown accuracy tier {0:?}")]
    UnsupportedAccuracy(String),

    #[error("feed i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("serial: {0}")]
    Serial(#[from] tokio_serial::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// "nmea-serial" | "nmea-file"
    pub source: String,
    pub nmea_device: Option<String>,
    pub nmea_file: Option<String>,

    /// "high" | "balanced" | "low" (hdop ceiling on accepted fixes)
    #[serde(default = "default_accuracy")]
    pub accuracy: String,

    /// Deliver when this much time passed since the last delivered position...
    #[serde(default = "default_min_interval_s")]
    pub min_interval_s: u64,

    /// ...or when the device moved at least this far, whichever comes first.
    #[serde(default = "default_min_distance_m")]
    pub min_distance_m: f64,
}

fn default_accuracy() -> String {
    "high".to_string()
}

fn default_min_interval_s() -> u64 {
    20
}

fn default_min_distance_m() -> f64 {
    1.0
}

/// Desired fix quality, expressed as the worst hdop the feed will pass on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    High,
    Balanced,
    Low,
}

impl Accuracy {
    pub fn from_name(name: &str) -> Result<Self, FeedError> {
        match name {
            "high" => Ok(Self::High),
            "balanced" => Ok(Self::Balanced),
            "low" => Ok(Self::Low),
            other => Err(FeedError::UnsupportedAccuracy(other.to_string())),
        }
    }

    pub fn max_hdop(self) -> f32 {
        match self {
            Self::High => 2.0,
            Self::Balanced => 5.0,
            Self::Low => 10.0,
        }
    }

    pub fn accepts(self, hdop: f32) -> bool {
        hdop <= self.max_hdop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_tiers() {
        assert!(Accuracy::from_name("high").is_ok());
        assert!(Accuracy::from_name("turbo").is_err());
        assert!(Accuracy::High.accepts(1.2));
        assert!(!Accuracy::High.accepts(3.0));
        assert!(Accuracy::Low.accepts(9.9));
    }

    #[test]
    fn config_defaults_apply() {
        let cfg: FeedConfig = toml::from_str(r#"source = "nmea-file""#).unwrap();
        assert_eq!(cfg.accuracy, "high");
        assert_eq!(cfg.min_interval_s, 20);
        assert_eq!(cfg.min_distance_m, 1.0);
    }
}
