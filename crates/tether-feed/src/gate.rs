use time::{Duration, OffsetDateTime};

use tether_geo::{distance_m, Coordinate};

/// Update throttle: a position passes when enough time elapsed since the
/// last delivery or the device moved far enough, whichever comes first.
#[derive(Debug)]
pub struct UpdateGate {
    min_interval: Duration,
    min_distance_m: f64,
    last: Option<(OffsetDateTime, Coordinate)>,
}

impl UpdateGate {
    pub fn new(min_interval_s: u64, min_distance_m: f64) -> Self {
        Self {
            min_interval: Duration::seconds(min_interval_s as i64),
            min_distance_m,
            last: None,
        }
    }

    /// The first position always passes.
    pub fn admit(&mut self, at: OffsetDateTime, coordinate: Coordinate) -> bool {
        let pass = match self.last {
            None => true,
            Some((t0, c0)) => {
                at - t0 >= self.min_interval || distance_m(c0, coordinate) >= self.min_distance_m
            }
        };
        if pass {
            self.last = Some((at, coordinate));
        }
        pass
    }
}
