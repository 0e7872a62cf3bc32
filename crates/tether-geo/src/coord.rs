use serde::{Deserialize, Serialize};

/// WGS-84 latitude/longitude pair, decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// The user-placed point of interest. At most one exists at a time;
/// a new placement replaces the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub id: String,
}

impl Marker {
    pub fn new(coordinate: Coordinate, id: impl Into<String>) -> Self {
        Self { coordinate, id: id.into() }
    }
}

/// Great-circle distance in meters (haversine, spherical earth).
pub fn distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let r = 6_371_000.0_f64;
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    r * c
}
