pub mod coord;
pub mod doctor;
pub mod error;
pub mod fence;

pub use coord::{distance_m, Coordinate, Marker};
pub use error::FenceError;
pub use fence::{is_within_radius, parse_radius_m, Geofence, DEFAULT_RADIUS_M};
