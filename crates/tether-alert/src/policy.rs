use time::OffsetDateTime;

use tether_geo::{distance_m, Coordinate, FenceError, Geofence};

use crate::event::AlertEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearmPolicy {
    /// Re-arm once the device leaves the radius (the default).
    OnExit,
    /// One alert per marker placement, ever.
    Never,
}

impl RearmPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "on-exit" => Some(Self::OnExit),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Edge-triggered de-duplication in front of the alert surfaces.
///
/// The proximity predicate itself is stateless and would report "within"
/// on every qualifying update while the device lingers inside the radius.
/// This gate fires on the outside-to-inside transition only, and resets
/// whenever the marker is replaced or removed.
#[derive(Debug)]
pub struct ProximityGate {
    rearm: RearmPolicy,
    tracked: Option<Tracked>,
}

#[derive(Debug)]
struct Tracked {
    marker_id: String,
    inside: bool,
    fired: bool,
}

impl ProximityGate {
    pub fn new(rearm: RearmPolicy) -> Self {
        Self { rearm, tracked: None }
    }

    /// Evaluates one observed position against the current fence snapshot.
    /// Returns an event exactly when an alert should fire.
    pub fn observe(
        &mut self,
        fence: &Geofence,
        observed: Coordinate,
        at: OffsetDateTime,
    ) -> Result<Option<AlertEvent>, FenceError> {
        let within = fence.contains(observed)?;
        let Some(marker) = &fence.marker else {
            self.tracked = None;
            return Ok(None);
        };

        // a replaced marker starts a fresh cycle
        if self.tracked.as_ref().map(|t| t.marker_id != marker.id).unwrap_or(true) {
            self.tracked = Some(Tracked {
                marker_id: marker.id.clone(),
                inside: false,
                fired: false,
            });
        }
        let tracked = self.tracked.as_mut().unwrap();

        let entering = within && !tracked.inside;
        tracked.inside = within;

        if !entering {
            return Ok(None);
        }
        if self.rearm == RearmPolicy::Never && tracked.fired {
            return Ok(None);
        }
        tracked.fired = true;

        Ok(Some(AlertEvent {
            ts_unix_ms: (at.unix_timestamp_nanos() / 1_000_000) as i64,
            marker_id: marker.id.clone(),
            lat: observed.lat,
            lon: observed.lon,
            distance_m: distance_m(observed, marker.coordinate),
            radius_m: fence.radius_m,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_geo::Marker;

    fn fence() -> Geofence {
        Geofence {
            marker: Some(Marker::new(Coordinate::new(37.78825, -122.4324), "m1")),
            radius_m: 1000.0,
        }
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    // ~1113 m north of the marker
    fn outside() -> Coordinate {
        Coordinate::new(37.79825, -122.4324)
    }

    fn inside() -> Coordinate {
        Coordinate::new(37.78900, -122.4324)
    }

    #[test]
    fn fires_once_on_entry_and_stays_quiet_inside() {
        let mut gate = ProximityGate::new(RearmPolicy::OnExit);
        let f = fence();
        assert!(gate.observe(&f, outside(), now()).unwrap().is_none());
        let ev = gate.observe(&f, inside(), now()).unwrap().expect("enter fires");
        assert_eq!(ev.marker_id, "m1");
        assert!(ev.distance_m <= f.radius_m);
        // lingering inside: no re-fire
        assert!(gate.observe(&f, inside(), now()).unwrap().is_none());
        assert!(gate.observe(&f, inside(), now()).unwrap().is_none());
    }

    #[test]
    fn rearms_after_exit() {
        let mut gate = ProximityGate::new(RearmPolicy::OnExit);
        let f = fence();
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
        assert!(gate.observe(&f, outside(), now()).unwrap().is_none());
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
    }

    #[test]
    fn never_policy_is_one_shot_per_marker() {
        let mut gate = ProximityGate::new(RearmPolicy::Never);
        let f = fence();
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
        assert!(gate.observe(&f, outside(), now()).unwrap().is_none());
        assert!(gate.observe(&f, inside(), now()).unwrap().is_none());
    }

    #[test]
    fn replacing_the_marker_rearms_even_under_never() {
        let mut gate = ProximityGate::new(RearmPolicy::Never);
        let mut f = fence();
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
        f.place_marker(Coordinate::new(37.78825, -122.4324), "m2");
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
    }

    #[test]
    fn no_marker_is_a_no_op_and_resets_the_cycle() {
        let mut gate = ProximityGate::new(RearmPolicy::OnExit);
        let mut f = fence();
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
        f.marker = None;
        assert!(gate.observe(&f, inside(), now()).unwrap().is_none());
        // marker comes back: fresh cycle, fires again
        f.place_marker(Coordinate::new(37.78825, -122.4324), "m1");
        assert!(gate.observe(&f, inside(), now()).unwrap().is_some());
    }

    #[test]
    fn invalid_radius_propagates_as_an_error() {
        let mut gate = ProximityGate::new(RearmPolicy::OnExit);
        let mut f = fence();
        f.radius_m = f64::NAN;
        assert!(gate.observe(&f, inside(), now()).is_err());
    }
}
