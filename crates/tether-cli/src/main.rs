use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use tether_alert::{doctor as alert_doctor, AlertConfig, AlertSurface, LogAlert, ProximityGate, RearmPolicy, TimedOutputVibrator};
use tether_feed::{doctor as feed_doctor, watch::Subscription, FeedConfig, FeedError};
use tether_geo::{doctor as fence_doctor, distance_m, Coordinate, Geofence, DEFAULT_RADIUS_M};

#[derive(Debug, Parser)]
#[command(name = "tether", version, about = "tether - single-marker geofence proximity alerts")]
struct Cli {
    /// TOML config; required for `doctor` and `run`.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the fence, feed and alert configuration.
    Doctor,
    /// Watch the position feed and alert on entering the radius.
    Run {
        /// Radius override in meters, validated like dialog input.
        #[arg(long)]
        radius: Option<String>,
    },
    /// Great-circle distance between two coordinates, in meters.
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    fence: FenceCfg,
    feed: FeedConfig,
    #[serde(default)]
    alert: AlertConfig,
}

#[derive(Debug, serde::Deserialize)]
struct FenceCfg {
    marker: Option<MarkerCfg>,
    radius_m: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct MarkerCfg {
    lat: f64,
    lon: f64,
    id: Option<String>,
}

impl FenceCfg {
    fn build(&self) -> Geofence {
        let mut fence = Geofence {
            marker: None,
            radius_m: self.radius_m.unwrap_or(DEFAULT_RADIUS_M),
        };
        if let Some(m) = &self.marker {
            fence.place_marker(
                Coordinate::new(m.lat, m.lon),
                m.id.clone().unwrap_or_else(|| "marker".to_string()),
            );
        }
        fence
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let path = path.context("--config is required for this command")?;
    let s = std::fs::read_to_string(path).context("read config")?;
    Ok(toml::from_str(&s).context("parse config toml")?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Doctor => doctor(&load_config(cli.config.as_deref())?)?,
        Command::Run { radius } => {
            let cfg = load_config(cli.config.as_deref())?;
            run(&cfg, radius.as_deref()).await?;
        }
        Command::Distance { lat1, lon1, lat2, lon2 } => {
            let d = distance_m(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2));
            println!("{:.1}", d);
        }
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");
    fence_doctor::check_fence(&cfg.fence.build())?;
    feed_doctor::check_feed(&cfg.feed)?;
    alert_doctor::check_alert(&cfg.alert)?;
    info!("doctor: OK");
    Ok(())
}

async fn run(cfg: &Config, radius_override: Option<&str>) -> Result<()> {
    info!("run: starting");

    let mut fence = cfg.fence.build();
    if let Some(input) = radius_override {
        // dialog-boundary validation: reject with feedback, never store NaN/0
        fence.set_radius(input)?;
    }
    fence_doctor::check_fence(&fence)?;

    match &fence.marker {
        Some(m) => info!(
            "run: fence at {:.5},{:.5} radius {:.0} m",
            m.coordinate.lat, m.coordinate.lon, fence.radius_m
        ),
        None => warn!("run: no marker configured; feed runs but nothing can fire"),
    }

    let rearm = RearmPolicy::from_name(&cfg.alert.rearm)
        .context("alert.rearm invalid (doctor would have said so)")?;
    let mut gate = ProximityGate::new(rearm);

    let mut surfaces: Vec<Box<dyn AlertSurface>> = vec![Box::new(LogAlert)];
    if let Some(path) = &cfg.alert.vibrator_path {
        surfaces.push(Box::new(TimedOutputVibrator::new(path, cfg.alert.pulse_ms)));
    }

    let mut sub = match Subscription::request(&cfg.feed) {
        Ok(sub) => sub,
        Err(FeedError::PermissionDenied(what)) => {
            // one-time notice, then an inert run: no subscription, no updates
            warn!("run: permission to access location was denied ({what})");
            tokio::signal::ctrl_c().await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("run: interrupted, unsubscribing");
                break;
            }
            pos = sub.recv() => {
                let Some(pos) = pos else {
                    warn!("run: position feed ended");
                    break;
                };
                match gate.observe(&fence, pos.coordinate, pos.ts) {
                    Ok(Some(ev)) => {
                        for s in surfaces.iter_mut() {
                            if let Err(e) = s.fire(&ev) {
                                warn!("run: alert surface failed: {e:#}");
                            }
                        }
                    }
                    Ok(None) => {
                        debug!(
                            "run: position {:.5},{:.5} (sats={}, hdop={})",
                            pos.coordinate.lat, pos.coordinate.lon, pos.sats, pos.hdop
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    sub.unsubscribe();
    Ok(())
}
