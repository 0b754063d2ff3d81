//! Weapons lying in a level, collected with the interact button.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::weapon::WeaponConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponPickup {
    pub weapon: WeaponConfig,
    /// Where the pickup rests.
    pub position: Vec3,
}

impl WeaponPickup {
    pub fn new(weapon: WeaponConfig, position: Vec3) -> Self {
        Self { weapon, position }
    }
}

/// Index of the closest pickup no further than `range` from `position`.
pub fn nearest_pickup(pickups: &[WeaponPickup], position: Vec3, range: f32) -> Option<usize> {
    let mut nearest = None;
    let mut nearest_dist_sq = range * range;

    for (index, pickup) in pickups.iter().enumerate() {
        let dist_sq = (pickup.position - position).length_squared();
        if dist_sq <= nearest_dist_sq {
            nearest_dist_sq = dist_sq;
            nearest = Some(index);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_in_range() {
        let pickups = vec![
            WeaponPickup::new(WeaponConfig::glock18(), Vec3::new(3.0, 0.0, 0.0)),
            WeaponPickup::new(WeaponConfig::egg_launcher(), Vec3::new(1.0, 0.0, 0.0)),
            WeaponPickup::new(WeaponConfig::glock18(), Vec3::new(0.0, 0.0, 1.5)),
        ];

        assert_eq!(nearest_pickup(&pickups, Vec3::ZERO, 2.0), Some(1));
        assert_eq!(nearest_pickup(&pickups, Vec3::new(0.0, 0.0, 1.4), 2.0), Some(2));
        assert_eq!(nearest_pickup(&pickups, Vec3::new(-5.0, 0.0, 0.0), 2.0), None);
        assert_eq!(nearest_pickup(&[], Vec3::ZERO, 2.0), None);
    }
}
