//! Collision primitives consumed by the movement and weapon systems.
//!
//! Nothing above this module depends on a concrete backend. Movement,
//! weapons and explosions talk to [`CollisionQueries`]; [`CollisionWorld`]
//! is the parry3d-backed implementation used by the simulation and tests.
//!
//! # Key Types
//!
//! - [`CollisionQueries`]: ground check, raycast, overlap and swept trace
//! - [`QueryFilter`]: content mask plus an optional excluded collider
//! - [`QueryHit`]: hit point, normal and collider identity
//! - [`TraceResult`]: output of a swept shape

mod flags;
mod trace;
mod world;

use glam::Vec3;

pub use flags::{ContentFlags, Surface, SurfaceFlags};
pub use trace::{ColliderId, QueryFilter, QueryHit, TraceResult, TraceShape};
pub use world::CollisionWorld;

/// The collision primitives a host physics engine must provide.
///
/// Every query ignores trigger volumes and honors the filter's excluded
/// collider.
pub trait CollisionQueries {
    /// Sweep `shape` from `start` to `end`, stopping at the first blocker.
    fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: &QueryFilter) -> TraceResult;

    /// Cast a ray and return the closest hit within `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &QueryFilter,
    ) -> Option<QueryHit>;

    /// Test a sphere at `center` against the world.
    ///
    /// When several colliders touch the sphere, the contact whose normal
    /// points most upward wins.
    fn sphere_contact(&self, center: Vec3, radius: f32, filter: &QueryFilter) -> Option<QueryHit>;

    /// Collect every collider overlapping the sphere into `out`.
    ///
    /// `out` is cleared first so callers can reuse one buffer across ticks.
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &QueryFilter, out: &mut Vec<ColliderId>);
}
