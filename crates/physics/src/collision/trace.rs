//! Trace results, query hits and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::{ContentFlags, SurfaceFlags};

/// Stable identity of a collider in a collision world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Which colliders a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Content flags to collide with.
    pub mask: ContentFlags,
    /// A collider to skip, usually the querying body itself.
    pub exclude: Option<ColliderId>,
}

impl QueryFilter {
    /// Filter on a content mask with nothing excluded.
    pub const fn new(mask: ContentFlags) -> Self {
        Self { mask, exclude: None }
    }

    /// Skip the given collider.
    pub const fn excluding(self, collider: ColliderId) -> Self {
        Self {
            mask: self.mask,
            exclude: Some(collider),
        }
    }

    /// Skip the given collider if there is one.
    pub const fn excluding_opt(self, collider: Option<ColliderId>) -> Self {
        Self {
            mask: self.mask,
            exclude: collider,
        }
    }

    /// Check if a collider passes this filter.
    ///
    /// Triggers never pass, whatever the mask says.
    #[inline]
    pub fn accepts(&self, id: ColliderId, contents: ContentFlags) -> bool {
        self.mask.intersects(contents) && !contents.is_trigger() && self.exclude != Some(id)
    }
}

impl From<ContentFlags> for QueryFilter {
    fn from(mask: ContentFlags) -> Self {
        Self::new(mask)
    }
}

/// A single hit from a ray, contact or overlap query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Surface normal at the contact, pointing away from the hit collider.
    pub normal: Vec3,
    /// Distance along the query (0 for overlaps).
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderId,
    /// Content flags of the hit collider.
    pub contents: ContentFlags,
    /// Surface flags of the hit collider.
    pub surface: SurfaceFlags,
}

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the path the shape got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Final position after the trace.
    pub end_position: Vec3,

    /// Surface normal at the impact point, `None` when nothing was hit.
    pub hit_normal: Option<Vec3>,

    /// Collider that stopped the sweep.
    pub hit_collider: Option<ColliderId>,

    /// Whether the trace started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the entire trace was inside solid geometry.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_collider: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Create a trace result indicating a collision occurred.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3) -> Self {
        Self {
            fraction,
            end_position,
            hit_normal: Some(normal),
            hit_collider: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Shape used for swept traces.
///
/// Positions passed with a shape are the bottom-center of the shape
/// (the feet, for characters).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule.
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from bottom cap to top cap.
        height: f32,
    },

    /// An axis-aligned box given by half-extents.
    Box { half_extents: Vec3 },

    /// A single point (infinitely small).
    Point,
}

impl TraceShape {
    /// Effective radius of this shape.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } => *radius,
            Self::Box { half_extents } => half_extents.x.max(half_extents.z),
            Self::Point => 0.0,
        }
    }

    /// Height of this shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Box { half_extents } => half_extents.y * 2.0,
            Self::Point => 0.0,
        }
    }
}
