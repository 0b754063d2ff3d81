//! Level geometry and spawn points.

use cluckstorm_physics::{CollisionWorld, ContentFlags, SurfaceFlags};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::pickup::WeaponPickup;
use crate::target::TargetSpawn;
use crate::weapon::WeaponConfig;

/// A game level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Static collision. Player and target colliders are added on spawn.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,

    /// Targets placed when the simulation starts.
    pub targets: Vec<TargetSpawn>,

    /// Weapons waiting to be collected. Removed as they are taken.
    pub pickups: Vec<WeaponPickup>,
}

/// A spawn point for players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space (feet).
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            targets: Vec::new(),
            pickups: Vec::new(),
        }
    }

    /// A flat floor with one spawn at the origin and nothing else.
    pub fn flat() -> Self {
        let mut level = Self::new("flat", "Flat");
        let floor = level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(200.0, 0.5, 200.0),
            ContentFlags::SOLID,
        );
        level.collision.set_surface(floor, SurfaceFlags::CONCRETE);
        level.spawn_points.push(SpawnPoint {
            position: Vec3::ZERO,
            facing: 0.0,
        });
        level
    }

    /// Create a simple test level for development.
    ///
    /// Walled concrete floor with a pillar, wooden crates, a grass patch,
    /// a downhill ramp descending toward -X and a row of targets.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");
        let arena_size = 50.0;
        let wall_height = 5.0;
        let wall_thickness = 0.5;

        // Floor
        let floor = level.collision.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(arena_size, 0.5, arena_size),
            ContentFlags::SOLID,
        );
        level.collision.set_surface(floor, SurfaceFlags::CONCRETE);

        // Walls
        for (center, half) in [
            (Vec3::new(0.0, wall_height / 2.0, -arena_size), Vec3::new(arena_size, wall_height / 2.0, wall_thickness)),
            (Vec3::new(0.0, wall_height / 2.0, arena_size), Vec3::new(arena_size, wall_height / 2.0, wall_thickness)),
            (Vec3::new(arena_size, wall_height / 2.0, 0.0), Vec3::new(wall_thickness, wall_height / 2.0, arena_size)),
            (Vec3::new(-arena_size, wall_height / 2.0, 0.0), Vec3::new(wall_thickness, wall_height / 2.0, arena_size)),
        ] {
            let wall = level.collision.add_box(center, half, ContentFlags::SOLID);
            level.collision.set_surface(wall, SurfaceFlags(SurfaceFlags::CONCRETE.0 | SurfaceFlags::NO_IMPACT.0));
        }

        // Central pillar
        let pillar = level
            .collision
            .add_box(Vec3::new(0.0, 2.0, 0.0), Vec3::new(2.0, 2.0, 2.0), ContentFlags::SOLID);
        level.collision.set_surface(pillar, SurfaceFlags::METAL);

        // Cover crates
        for center in [Vec3::new(-15.0, 1.0, 10.0), Vec3::new(15.0, 1.0, -10.0)] {
            let cover = level.collision.add_box(center, Vec3::new(1.5, 1.0, 1.5), ContentFlags::SOLID);
            level.collision.set_surface(cover, SurfaceFlags::WOOD);
        }

        // Grass patch, raised a hair above the floor
        let grass = level.collision.add_box(
            Vec3::new(20.0, -0.24, 20.0),
            Vec3::new(8.0, 0.25, 8.0),
            ContentFlags::SOLID,
        );
        level.collision.set_surface(grass, SurfaceFlags::GRASS);

        // Sliding ramp, 20 degrees
        let ramp = level.collision.add_oriented_box(
            Vec3::new(-30.0, 1.0, -25.0),
            Vec3::new(8.0, 0.5, 3.0),
            Quat::from_rotation_z(20f32.to_radians()),
            ContentFlags::SOLID,
        );
        level.collision.set_surface(ramp, SurfaceFlags::GRAVEL);

        // A trigger volume, ignored by every query
        level.collision.add_box(
            Vec3::new(0.0, 1.0, 15.0),
            Vec3::new(3.0, 1.0, 3.0),
            ContentFlags::TRIGGER,
        );

        // Spawn points
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 0.0, 0.0),
            facing: 0.0,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 0.0, 0.0),
            facing: std::f32::consts::PI,
        });

        // Targets down range of the first spawn
        for (i, z) in [-3.0f32, 0.0, 3.0].into_iter().enumerate() {
            level
                .targets
                .push(TargetSpawn::dummy(&format!("dummy_{i}"), Vec3::new(-10.0, 0.0, z)));
        }
        level
            .targets
            .push(TargetSpawn::crate_box("crate_0", Vec3::new(-14.0, 0.02, 4.0)));

        // Spare eggs beside the first spawn
        level
            .pickups
            .push(WeaponPickup::new(WeaponConfig::egg_launcher(), Vec3::new(-19.0, 0.0, 1.0)));

        level
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points.get(index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
