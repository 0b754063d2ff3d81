//! Content and surface flags for collision filtering.
//!
//! Content flags decide what a query can hit. Surface flags carry the
//! material of a collider so footstep and impact collaborators can pick
//! sounds and effects without knowing concrete collider types.

use serde::{Deserialize, Serialize};

/// Content flags describe what kind of volume a collider is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Nothing.
    pub const EMPTY: Self = Self(0);

    /// Static world geometry - walls, floors, ramps.
    pub const SOLID: Self = Self(1 << 0);

    /// Trigger volume. Never blocks movement, ground checks or shots.
    pub const TRIGGER: Self = Self(1 << 1);

    /// A player character's body.
    pub const PLAYER_BODY: Self = Self(1 << 2);

    /// A dynamic target (dummy, crate, barrel).
    pub const TARGET_BODY: Self = Self(1 << 3);

    /// Blocks projectiles and shots but not characters.
    pub const PROJECTILE_CLIP: Self = Self(1 << 4);

    /// Blocks characters but not projectiles.
    pub const PLAYER_CLIP: Self = Self(1 << 5);

    /// Mask for character movement and ground checks.
    pub const MASK_PLAYER_SOLID: Self = Self(
        Self::SOLID.0 | Self::PLAYER_CLIP.0 | Self::PLAYER_BODY.0 | Self::TARGET_BODY.0,
    );

    /// Mask for hitscan rays and projectile sweeps.
    pub const MASK_SHOT: Self = Self(
        Self::SOLID.0 | Self::PROJECTILE_CLIP.0 | Self::PLAYER_BODY.0 | Self::TARGET_BODY.0,
    );

    /// Mask for explosion overlap queries: anything that can own a body.
    pub const MASK_EXPLOSION: Self = Self(
        Self::SOLID.0 | Self::PLAYER_BODY.0 | Self::TARGET_BODY.0,
    );

    /// Check if these flags contain all of `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Remove flags from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Check if this is a trigger volume.
    #[inline]
    pub fn is_trigger(self) -> bool {
        self.intersects(Self::TRIGGER)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Surface material flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceFlags(pub u32);

impl SurfaceFlags {
    pub const NONE: Self = Self(0);
    pub const GRASS: Self = Self(1 << 0);
    pub const WATER: Self = Self(1 << 1);
    pub const METAL: Self = Self(1 << 2);
    pub const CONCRETE: Self = Self(1 << 3);
    pub const GRAVEL: Self = Self(1 << 4);
    pub const WOOD: Self = Self(1 << 5);

    /// No footsteps on this surface.
    pub const NO_STEPS: Self = Self(1 << 8);

    /// No impact effects on this surface.
    pub const NO_IMPACT: Self = Self(1 << 9);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Resolve the material of this surface.
    ///
    /// The first material bit wins, in declaration order.
    pub fn material(self) -> Surface {
        const ORDER: [(SurfaceFlags, Surface); 6] = [
            (SurfaceFlags::GRASS, Surface::Grass),
            (SurfaceFlags::WATER, Surface::Water),
            (SurfaceFlags::METAL, Surface::Metal),
            (SurfaceFlags::CONCRETE, Surface::Concrete),
            (SurfaceFlags::GRAVEL, Surface::Gravel),
            (SurfaceFlags::WOOD, Surface::Wood),
        ];
        ORDER
            .iter()
            .find(|(flag, _)| self.contains(*flag))
            .map_or(Surface::Unknown, |(_, surface)| *surface)
    }
}

impl std::ops::BitOr for SurfaceFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Walkable surface material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Surface {
    Grass,
    Water,
    Metal,
    Concrete,
    Gravel,
    Wood,
    #[default]
    Unknown,
}
