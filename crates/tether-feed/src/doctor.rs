use anyhow::Result;

use crate::{Accuracy, FeedConfig};

pub fn check_feed(cfg: &FeedConfig) -> Result<()> {
    match cfg.source.as_str() {
        "nmea-serial" => anyhow::ensure!(
            cfg.nmea_device.as_deref().map(|s| !s.is_empty()).unwrap_or(false),
            "feed.nmea_device missing for source nmea-serial"
        ),
        "nmea-file" => anyhow::ensure!(
            cfg.nmea_file.as_deref().map(|s| !s.is_empty()).unwrap_or(false),
            "feed.nmea_file missing for source nmea-file"
        ),
        other => anyhow::bail!("unknown feed.source: {}", other),
    }
    Accuracy::from_name(&cfg.accuracy)?;
    anyhow::ensure!(cfg.min_interval_s <= 3600, "feed.min_interval_s should be <= 3600");
    anyhow::ensure!(
        cfg.min_distance_m.is_finite() && cfg.min_distance_m >= 0.0,
        "feed.min_distance_m must be finite and >= 0"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FeedConfig {
        FeedConfig {
            source: "nmea-file".into(),
            nmea_device: None,
            nmea_file: Some("fix.nmea".into()),
            accuracy: "balanced".into(),
            min_interval_s: 20,
            min_distance_m: 1.0,
        }
    }

    #[test]
    fn accepts_sane_config() {
        assert!(check_feed(&base()).is_ok());
    }

    #[test]
    fn rejects_missing_path_and_bad_tier() {
        let mut cfg = base();
        cfg.nmea_file = None;
        assert!(check_feed(&cfg).is_err());

        let mut cfg = base();
        cfg.accuracy = "ultra".into();
        assert!(check_feed(&cfg).is_err());

        let mut cfg = base();
        cfg.min_distance_m = f64::NAN;
        assert!(check_feed(&cfg).is_err());
    }
}
