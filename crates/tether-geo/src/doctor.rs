use anyhow::Result;

use crate::fence::Geofence;

pub fn check_fence(fence: &Geofence) -> Result<()> {
    if let Some(m) = &fence.marker {
        anyhow::ensure!(m.coordinate.in_range(), "fence.marker coordinates invalid");
        anyhow::ensure!(!m.id.is_empty(), "fence.marker.id must not be empty");
    }
    anyhow::ensure!(fence.radius_m.is_finite(), "fence.radius_m must be finite");
    anyhow::ensure!(fence.radius_m >= 0.0, "fence.radius_m must be >= 0");
    Ok(())
}
