//! Collide-and-slide.
//!
//! A move is split into up to `max_clip_planes` sweeps. After each blocked
//! sweep the velocity is projected off every surface touched during the
//! move, so bodies glide along walls and into creases instead of stopping.
//! Every collider a sweep runs into is recorded in a [`TouchList`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{ColliderId, CollisionQueries, QueryFilter, TraceShape};

use super::config::MovementConfig;

const PLANE_CAPACITY: usize = 5;

/// Most colliders remembered per move.
pub const MAX_TOUCH: usize = 8;

/// Minimum velocity (squared) worth sweeping.
const MIN_SPEED_SQ: f32 = 1e-4;

/// Slack when checking that a velocity leaves a plane.
const PLANE_EPSILON: f32 = 0.01;

/// Remove the part of `velocity` going into a surface.
///
/// `overbounce` slightly over-corrects so the body doesn't stick.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let into = velocity.dot(normal);
    let backoff = if into < 0.0 { into * overbounce } else { into / overbounce };
    velocity - normal * backoff
}

/// A collider a move ran into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub collider: ColliderId,
    /// Surface normal at the first contact, facing the mover.
    pub normal: Vec3,
}

/// Colliders touched during one move, each listed once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchList {
    slots: [Option<Touch>; MAX_TOUCH],
}

impl TouchList {
    /// Record a contact. Repeats and contacts past [`MAX_TOUCH`] are dropped.
    pub fn record(&mut self, collider: ColliderId, normal: Vec3) {
        if self.contains(collider) {
            return;
        }
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(Touch { collider, normal });
        }
    }

    pub fn contains(&self, collider: ColliderId) -> bool {
        self.iter().any(|touch| touch.collider == collider)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Touch> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// Touches in `self` that `earlier` doesn't list.
    pub fn without(&self, earlier: &TouchList) -> TouchList {
        let mut fresh = TouchList::default();
        for touch in self.iter().filter(|touch| !earlier.contains(touch.collider)) {
            fresh.record(touch.collider, touch.normal);
        }
        fresh
    }
}

/// Surfaces touched during one move.
#[derive(Default)]
struct ClipPlanes {
    normals: [Vec3; PLANE_CAPACITY],
    len: usize,
}

impl ClipPlanes {
    fn push(&mut self, normal: Vec3) {
        if self.len < PLANE_CAPACITY {
            self.normals[self.len] = normal;
            self.len += 1;
        }
    }

    fn as_slice(&self) -> &[Vec3] {
        &self.normals[..self.len]
    }

    fn leaves_all(&self, velocity: Vec3, skip: usize) -> bool {
        self.as_slice()
            .iter()
            .enumerate()
            .all(|(i, plane)| i == skip || velocity.dot(*plane) >= -PLANE_EPSILON)
    }

    /// A velocity that doesn't push into any touched plane, if one exists.
    fn resolve(&self, velocity: Vec3, original: Vec3, overbounce: f32) -> Option<Vec3> {
        let single = self.as_slice().iter().enumerate().find_map(|(i, plane)| {
            let clipped = clip_velocity(velocity, *plane, overbounce);
            self.leaves_all(clipped, i).then_some(clipped)
        });
        if single.is_some() {
            return single;
        }

        // Two or more planes block every single clip: run along their crease
        let [first, second, ..] = self.as_slice() else {
            return None;
        };
        let crease = first.cross(*second).normalize_or_zero();
        let along = crease * original.dot(crease);
        (along.dot(*first) >= -PLANE_EPSILON && along.dot(*second) >= -PLANE_EPSILON).then_some(along)
    }
}

/// Move through the world for `delta_time`, sliding along surfaces.
///
/// Returns true only if the whole move completed without touching anything.
#[allow(clippy::too_many_arguments)]
pub fn slide_move(
    world: &dyn CollisionQueries,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    filter: &QueryFilter,
    delta_time: f32,
    config: &MovementConfig,
    touched: &mut TouchList,
) -> bool {
    let original = *velocity;
    let mut planes = ClipPlanes::default();
    let mut remaining = delta_time;

    for _ in 0..config.max_clip_planes.min(PLANE_CAPACITY) {
        if velocity.length_squared() < MIN_SPEED_SQ {
            break;
        }

        let trace = world.trace(*position, *position + *velocity * remaining, shape, filter);
        if trace.fraction > 0.0 || !trace.hit_something() {
            *position = trace.end_position;
        }
        if !trace.hit_something() {
            return planes.len == 0;
        }
        remaining *= 1.0 - trace.fraction;

        if trace.all_solid {
            *velocity = Vec3::ZERO;
            return false;
        }
        let Some(normal) = trace.hit_normal else {
            continue;
        };
        if let Some(collider) = trace.hit_collider {
            touched.record(collider, normal);
        }
        planes.push(normal);

        match planes.resolve(*velocity, original, config.overbounce) {
            Some(clipped) => *velocity = clipped,
            None => {
                *velocity = Vec3::ZERO;
                return false;
            }
        }
    }

    false
}

/// [`slide_move`], retried from `step_height` up when that gets further.
///
/// The stepped result only wins if it ends on walkable ground.
#[allow(clippy::too_many_arguments)]
pub fn step_slide_move(
    world: &dyn CollisionQueries,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    filter: &QueryFilter,
    delta_time: f32,
    config: &MovementConfig,
    touched: &mut TouchList,
) -> bool {
    let start = *position;
    let start_velocity = *velocity;

    if slide_move(world, position, velocity, shape, filter, delta_time, config, touched) {
        return true;
    }
    if config.step_height <= 0.0 {
        return false;
    }

    let up = world.trace(start, start + Vec3::Y * config.step_height, shape, filter);
    if up.all_solid {
        return false;
    }

    let mut raised = up.end_position;
    let mut raised_velocity = start_velocity;
    slide_move(world, &mut raised, &mut raised_velocity, shape, filter, delta_time, config, touched);

    let down = world.trace(raised, raised - Vec3::Y * (config.step_height + 0.01), shape, filter);
    if !down.all_solid {
        raised = down.end_position;
    }

    let flat_progress = (*position - start).with_y(0.0).length_squared();
    let stepped_progress = (raised - start).with_y(0.0).length_squared();
    let walkable = down.hit_normal.is_some_and(|n| n.y >= config.min_ground_normal);
    if stepped_progress <= flat_progress || !walkable {
        return false;
    }

    *position = raised;
    *velocity = raised_velocity.with_y(start_velocity.y.min(0.0));
    true
}
