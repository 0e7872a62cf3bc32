use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::gate::UpdateGate;
use crate::nmea::{NmeaSource, Position};
use crate::{Accuracy, FeedConfig, FeedError};

/// A live position subscription. Holds the reader task; dropping it (or
/// calling `unsubscribe`) stops delivery deterministically.
pub struct Subscription {
    rx: mpsc::Receiver<Position>,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Opens the source (the permission step) and starts forwarding gated
    /// positions. A `PermissionDenied` here means no subscription exists
    /// and no updates will ever be delivered.
    pub fn request(cfg: &FeedConfig) -> Result<Self, FeedError> {
        let accuracy = Accuracy::from_name(&cfg.accuracy)?;
        let mut source = NmeaSource::open(cfg)?;
        let mut gate = UpdateGate::new(cfg.min_interval_s, cfg.min_distance_m);

        let (tx, rx) = mpsc::channel(16);
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stopped.changed() => break,
                    res = source.next_position() => match res {
                        Ok(pos) => {
                            if !accuracy.accepts(pos.hdop) {
                                debug!("feed: fix dropped (hdop={})", pos.hdop);
                                continue;
                            }
                            if !gate.admit(pos.ts, pos.coordinate) {
                                continue;
                            }
                            if tx.send(pos).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("feed: source read failed: {e}");
                            break;
                        }
                    }
                }
            }
        });

        Ok(Self { rx, stop, handle })
    }

    /// Next gated position, in feed order. `None` once the source is done
    /// or the subscription was stopped.
    pub async fn recv(&mut self) -> Option<Position> {
        self.rx.recv().await
    }

    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
        self.handle.abort();
    }
}
