use serde::{Deserialize, Serialize};

use crate::coord::{distance_m, Coordinate, Marker};
use crate::error::FenceError;

pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// The whole application state the evaluator reads: one optional marker
/// and the threshold radius around it. Passed in per update, never captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geofence {
    pub marker: Option<Marker>,
    pub radius_m: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Self { marker: None, radius_m: DEFAULT_RADIUS_M }
    }
}

impl Geofence {
    /// Replaces any existing marker; markers never accumulate.
    pub fn place_marker(&mut self, coordinate: Coordinate, id: impl Into<String>) {
        self.marker = Some(Marker::new(coordinate, id));
    }

    /// Stores a radius from raw user input. On rejection the stored radius
    /// is left untouched.
    pub fn set_radius(&mut self, input: &str) -> Result<(), FenceError> {
        self.radius_m = parse_radius_m(input)?;
        Ok(())
    }

    pub fn contains(&self, observed: Coordinate) -> Result<bool, FenceError> {
        is_within_radius(observed, self.marker.as_ref(), self.radius_m)
    }
}

/// Stateless proximity predicate. No marker means no fence: `Ok(false)`.
/// A non-finite or negative radius is a contract violation, not a miss.
pub fn is_within_radius(
    observed: Coordinate,
    marker: Option<&Marker>,
    radius_m: f64,
) -> Result<bool, FenceError> {
    validate_radius_m(radius_m)?;
    let Some(marker) = marker else { return Ok(false) };
    Ok(distance_m(observed, marker.coordinate) <= radius_m)
}

/// Boundary validation for the radius dialog: the raw string is rejected
/// with feedback rather than coerced to 0 or NaN.
pub fn parse_radius_m(input: &str) -> Result<f64, FenceError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(FenceError::InvalidConfiguration("radius is empty".into()));
    }
    let radius_m: f64 = s
        .parse()
        .map_err(|_| FenceError::InvalidConfiguration(format!("radius {s:?} is not a number")))?;
    validate_radius_m(radius_m)?;
    Ok(radius_m)
}

pub fn validate_radius_m(radius_m: f64) -> Result<(), FenceError> {
    if !radius_m.is_finite() {
        return Err(FenceError::InvalidConfiguration("radius must be finite".into()));
    }
    if radius_m < 0.0 {
        return Err(FenceError::InvalidConfiguration(format!(
            "radius {radius_m} is negative"
        )));
    }
    Ok(())
}
