use anyhow::Result;

use crate::{AlertConfig, RearmPolicy};

pub fn check_alert(cfg: &AlertConfig) -> Result<()> {
    anyhow::ensure!(
        RearmPolicy::from_name(&cfg.rearm).is_some(),
        "alert.rearm must be \"on-exit\" or \"never\""
    );
    anyhow::ensure!(cfg.pulse_ms > 0, "alert.pulse_ms must be > 0");
    anyhow::ensure!(cfg.pulse_ms <= 60_000, "alert.pulse_ms should be <= 60000");
    if let Some(p) = &cfg.vibrator_path {
        anyhow::ensure!(!p.is_empty(), "alert.vibrator_path must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(check_alert(&AlertConfig::default()).is_ok());
    }

    #[test]
    fn bad_rearm_and_zero_pulse_fail() {
        let mut cfg = AlertConfig::default();
        cfg.rearm = "sometimes".into();
        assert!(check_alert(&cfg).is_err());

        let mut cfg = AlertConfig::default();
        cfg.pulse_ms = 0;
        assert!(check_alert(&cfg).is_err());
    }
}
