//! Collision world containing static and dynamic colliders.
//!
//! Colliders keep stable [`ColliderId`]s so bodies that move every tick
//! (players, knocked-back targets) can be repositioned in place.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{contact, intersection_test, Ray, RayCast};
use parry3d::shape::{Ball, Shape, SharedShape};

use super::flags::{ContentFlags, SurfaceFlags};
use super::trace::{ColliderId, QueryFilter, QueryHit, TraceResult, TraceShape};
use super::CollisionQueries;

/// A collider in the world.
#[derive(Debug, Clone)]
struct Collider {
    id: ColliderId,
    shape: SharedShape,
    /// Shape center in world space.
    transform: Isometry<Real>,
    /// Offset from the collider's anchor to its shape center.
    ///
    /// Capsules are anchored at their base so they line up with body
    /// positions; boxes and balls are anchored at their center.
    anchor_offset: Vec3,
    contents: ContentFlags,
    surface: SurfaceFlags,
}

impl Collider {
    fn anchor(&self) -> Vec3 {
        let t = self.transform.translation.vector;
        Vec3::new(t.x, t.y, t.z) - self.anchor_offset
    }
}

/// The collision world containing all geometry.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> ColliderId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box, used for ramps and slopes.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.push(shape, center, rotation, Vec3::ZERO, contents)
    }

    /// Add a vertical capsule whose base sits at `base`.
    pub fn add_capsule(&mut self, base: Vec3, radius: f32, height: f32, contents: ContentFlags) -> ColliderId {
        let half_segment = (height - 2.0 * radius).max(0.0) / 2.0;
        let shape = SharedShape::capsule_y(half_segment, radius);
        let offset = Vec3::new(0.0, height / 2.0, 0.0);
        self.push(shape, base + offset, Quat::IDENTITY, offset, contents)
    }

    /// Add a sphere.
    pub fn add_ball(&mut self, center: Vec3, radius: f32, contents: ContentFlags) -> ColliderId {
        self.push(SharedShape::ball(radius), center, Quat::IDENTITY, Vec3::ZERO, contents)
    }

    /// Tag a collider with surface flags.
    pub fn set_surface(&mut self, id: ColliderId, surface: SurfaceFlags) {
        if let Some(collider) = self.get_mut(id) {
            collider.surface = surface;
        }
    }

    /// Move a collider's anchor, keeping its rotation.
    ///
    /// Returns `false` if the collider doesn't exist.
    pub fn set_collider_position(&mut self, id: ColliderId, anchor: Vec3) -> bool {
        let Some(collider) = self.get_mut(id) else {
            return false;
        };
        let center = anchor + collider.anchor_offset;
        collider.transform.translation = Translation3::new(center.x, center.y, center.z);
        true
    }

    /// Rebuild a capsule at a new height, keeping its radius and base.
    ///
    /// Returns `false` if the collider doesn't exist or isn't a capsule.
    pub fn set_capsule_height(&mut self, id: ColliderId, height: f32) -> bool {
        let Some(collider) = self.get_mut(id) else {
            return false;
        };
        let Some(radius) = collider.shape.as_capsule().map(|capsule| capsule.radius) else {
            return false;
        };

        let anchor = collider.anchor();
        let half_segment = (height - 2.0 * radius).max(0.0) / 2.0;
        collider.shape = SharedShape::capsule_y(half_segment, radius);
        collider.anchor_offset = Vec3::new(0.0, height / 2.0, 0.0);
        let center = anchor + collider.anchor_offset;
        collider.transform.translation = Translation3::new(center.x, center.y, center.z);
        true
    }

    /// Get a collider's anchor position.
    pub fn collider_position(&self, id: ColliderId) -> Option<Vec3> {
        self.get(id).map(Collider::anchor)
    }

    /// Get a collider's content flags.
    pub fn contents(&self, id: ColliderId) -> Option<ContentFlags> {
        self.get(id).map(|c| c.contents)
    }

    /// Remove a collider. Returns `false` if it didn't exist.
    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|c| c.id != id);
        self.colliders.len() != before
    }

    /// Remove all colliders.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Number of colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Check if a shape placed at `position` overlaps anything.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, filter: &QueryFilter) -> bool {
        let test_shape = create_parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        self.colliders
            .iter()
            .filter(|c| filter.accepts(c.id, c.contents))
            .any(|c| {
                matches!(
                    intersection_test(&test_transform, test_shape.as_ref(), &c.transform, c.shape.as_ref()),
                    Ok(true)
                )
            })
    }

    /// Push a shape out of whatever it overlaps.
    ///
    /// Returns the corrected position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, filter: &QueryFilter) -> Vec3 {
        let test_shape = create_parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        let mut correction = Vec3::ZERO;

        for collider in self.colliders.iter().filter(|c| filter.accepts(c.id, c.contents)) {
            if let Ok(Some(found)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &collider.transform,
                collider.shape.as_ref(),
                0.0,
            ) {
                // normal1 points from the test shape into the collider
                let out = -Vec3::new(found.normal1.x, found.normal1.y, found.normal1.z);
                let depth = -found.dist;
                if depth > 0.0 {
                    correction += out * (depth + 0.001);
                }
            }
        }

        position + correction
    }

    fn push(
        &mut self,
        shape: SharedShape,
        center: Vec3,
        rotation: Quat,
        anchor_offset: Vec3,
        contents: ContentFlags,
    ) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;

        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        ));
        let transform = Isometry::from_parts(Translation3::new(center.x, center.y, center.z), rotation);

        self.colliders.push(Collider {
            id,
            shape,
            transform,
            anchor_offset,
            contents,
            surface: SurfaceFlags::NONE,
        });

        id
    }

    fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.iter_mut().find(|c| c.id == id)
    }

    /// Binary search for the last free position along the sweep.
    fn trace_binary_search(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        filter: &QueryFilter,
        direction: Vec3,
    ) -> TraceResult {
        let start_in_solid = self.point_in_solid(start, shape, filter);

        if !self.point_in_solid(end, shape, filter) {
            let mut result = TraceResult::no_hit(end);
            result.started_in_solid = start_in_solid;
            return result;
        }

        let mut lo = 0.0_f32;
        let mut hi = 1.0_f32;

        // 12 iterations gives ~0.025% precision
        for _ in 0..12 {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start + (end - start) * mid, shape, filter) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let fraction = lo;
        let end_position = start + (end - start) * fraction;

        let penetration_test = start + (end - start) * hi;
        let push = self.resolve_penetration(penetration_test, shape, filter) - penetration_test;
        let hit_normal = if push.length_squared() > 0.0001 {
            push.normalize()
        } else {
            let horizontal = Vec3::new(-direction.x, 0.0, -direction.z);
            if horizontal.length_squared() > 0.1 {
                horizontal.normalize()
            } else {
                Vec3::Y
            }
        };

        let hit_collider = self.first_overlap(penetration_test, shape, filter);

        TraceResult {
            fraction,
            end_position,
            hit_normal: Some(hit_normal),
            hit_collider,
            started_in_solid: start_in_solid,
            all_solid: start_in_solid && fraction < 0.001,
        }
    }

    fn first_overlap(&self, position: Vec3, shape: TraceShape, filter: &QueryFilter) -> Option<ColliderId> {
        let test_shape = create_parry_shape(shape);
        let test_transform = shape_transform(position, shape);
        self.colliders
            .iter()
            .filter(|c| filter.accepts(c.id, c.contents))
            .find(|c| {
                matches!(
                    intersection_test(&test_transform, test_shape.as_ref(), &c.transform, c.shape.as_ref()),
                    Ok(true)
                )
            })
            .map(|c| c.id)
    }
}

impl CollisionQueries for CollisionWorld {
    fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: &QueryFilter) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();

        if distance < 0.0001 {
            return if self.point_in_solid(start, shape, filter) {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_collider: self.first_overlap(start, shape, filter),
                    started_in_solid: true,
                    all_solid: true,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        self.trace_binary_search(start, end, shape, filter, delta / distance)
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &QueryFilter,
    ) -> Option<QueryHit> {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 || max_distance <= 0.0 {
            return None;
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, &Collider)> = None;

        for collider in self.colliders.iter().filter(|c| filter.accepts(c.id, c.contents)) {
            if let Some(toi) = collider.shape.cast_ray(&collider.transform, &ray, max_distance, true) {
                if toi <= max_distance && closest.map_or(true, |(best, _)| toi < best) {
                    closest = Some((toi, collider));
                }
            }
        }

        closest.map(|(toi, collider)| QueryHit {
            point: origin + dir * toi,
            normal: hit_normal(&ray, toi, collider),
            distance: toi,
            collider: collider.id,
            contents: collider.contents,
            surface: collider.surface,
        })
    }

    fn sphere_contact(&self, center: Vec3, radius: f32, filter: &QueryFilter) -> Option<QueryHit> {
        let ball = Ball::new(radius.max(0.0001));
        let sphere = Isometry::translation(center.x, center.y, center.z);

        // Touching a wall and a floor at once reports the floor
        self.colliders
            .iter()
            .filter(|c| filter.accepts(c.id, c.contents))
            .filter_map(|c| match contact(&sphere, &ball, &c.transform, c.shape.as_ref(), 0.0) {
                Ok(Some(found)) => Some(QueryHit {
                    point: Vec3::new(found.point2.x, found.point2.y, found.point2.z),
                    normal: -Vec3::new(found.normal1.x, found.normal1.y, found.normal1.z),
                    distance: 0.0,
                    collider: c.id,
                    contents: c.contents,
                    surface: c.surface,
                }),
                _ => None,
            })
            .max_by(|a, b| a.normal.y.total_cmp(&b.normal.y))
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: &QueryFilter, out: &mut Vec<ColliderId>) {
        out.clear();
        let ball = Ball::new(radius.max(0.0001));
        let sphere = Isometry::translation(center.x, center.y, center.z);

        out.extend(
            self.colliders
                .iter()
                .filter(|c| filter.accepts(c.id, c.contents))
                .filter(|c| matches!(intersection_test(&sphere, &ball, &c.transform, c.shape.as_ref()), Ok(true)))
                .map(|c| c.id),
        );
    }
}

/// Create a parry3d shape from a trace shape.
fn create_parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            let half_segment = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(half_segment, radius)
        }
        TraceShape::Box { half_extents } => SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
        TraceShape::Point => SharedShape::ball(0.001),
    }
}

/// Transform for a shape whose base sits at `position`.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = match shape {
        TraceShape::Capsule { height, .. } => height / 2.0,
        TraceShape::Box { half_extents } => half_extents.y,
        TraceShape::Point => 0.0,
    };

    Isometry::translation(position.x, position.y + offset_y, position.z)
}

fn hit_normal(ray: &Ray, toi: f32, collider: &Collider) -> Vec3 {
    match collider.shape.cast_ray_and_get_normal(&collider.transform, ray, toi + 0.01, true) {
        Some(intersection) => Vec3::new(intersection.normal.x, intersection.normal.y, intersection.normal.z),
        None => -Vec3::new(ray.dir.x, ray.dir.y, ray.dir.z).normalize_or_zero(),
    }
}
