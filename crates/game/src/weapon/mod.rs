//! Weapons.
//!
//! A [`Weapon`] pairs a [`WeaponConfig`] with its mutable [`WeaponState`].
//! Every shot goes through [`Weapon::try_fire`], which checks the state
//! machine and then resolves the shot according to [`WeaponKind`]:
//!
//! ```text
//!   try_fire ──► can_fire? ──no──► None
//!                   │yes
//!                   ▼
//!           consume round, start cooldown, queue recoil
//!                   │
//!        ┌──────────┴───────────┐
//!        ▼                      ▼
//!     Hitscan               Projectile
//!   raycast + damage     pooled launch
//!   + impact effect
//! ```

mod config;
mod state;

pub use config::{Ammo, FireMode, WeaponConfig, WeaponKind};
pub use state::{ReloadState, WeaponPhase, WeaponState};

use cluckstorm_physics::{ColliderId, CollisionQueries, ContentFlags, QueryFilter, RecoilAccumulator, SurfaceFlags};
use glam::Vec3;
use log::{debug, warn};

use crate::damage::TargetLookup;
use crate::effects::ImpactEffects;
use crate::pool::PoolError;
use crate::projectile::{Launch, ProjectileSystem};

/// Who is shooting, and from where.
#[derive(Debug, Clone, Copy)]
pub struct FireContext {
    pub origin: Vec3,
    pub direction: Vec3,
    /// The shooter's own collider, never hit by its own shots.
    pub owner: Option<ColliderId>,
    /// Recoil multiplier from the shooter's physics modifier.
    pub recoil_multiplier: f32,
    /// Simulation time in seconds.
    pub now: f64,
}

/// World services a shot may touch.
pub struct WeaponServices<'a> {
    pub world: &'a dyn CollisionQueries,
    pub targets: &'a mut dyn TargetLookup,
    pub projectiles: &'a mut ProjectileSystem,
    pub effects: &'a mut ImpactEffects,
}

/// What a successful trigger pull did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// A hitscan ray struck a collider.
    Hit {
        collider: ColliderId,
        point: Vec3,
        damaged: bool,
        killed: bool,
    },
    /// A hitscan ray found nothing in range.
    Miss,
    /// A projectile left the muzzle.
    Launched,
    /// The projectile pool had nothing to give. Ammo and recoil were still spent.
    LaunchSkipped(PoolError),
}

#[derive(Debug, Clone)]
pub struct Weapon {
    config: WeaponConfig,
    state: WeaponState,
}

impl Weapon {
    pub fn new(config: WeaponConfig) -> Self {
        let state = WeaponState::new(&config);
        Self { config, state }
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn state(&self) -> &WeaponState {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Whether the trigger input should attempt a shot this tick.
    ///
    /// Full-auto fires while held, semi-auto only on the press edge.
    pub fn wants_fire(&self, held: bool, pressed: bool) -> bool {
        match self.config.fire_mode {
            FireMode::FullAuto => held,
            FireMode::SemiAuto => pressed,
        }
    }

    /// Fire once if the weapon is ready. Returns `None` when nothing happened.
    pub fn try_fire(
        &mut self,
        ctx: &FireContext,
        services: &mut WeaponServices<'_>,
        recoil: &mut RecoilAccumulator,
    ) -> Option<ShotOutcome> {
        if !self.state.can_fire() {
            return None;
        }
        let direction = ctx.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        self.state.consume_round(self.config.cooldown());
        recoil.queue(-direction, self.config.recoil_magnitude(), ctx.recoil_multiplier);
        recoil.kick_camera(self.config.camera_kick);

        let outcome = match self.config.kind {
            WeaponKind::Hitscan { max_range } => self.resolve_hitscan(ctx, direction, max_range, services),
            WeaponKind::Projectile {
                prototype,
                muzzle_speed,
                explosion_radius,
                lifetime,
            } => {
                let launch = Launch {
                    prototype,
                    origin: ctx.origin,
                    direction,
                    speed: muzzle_speed,
                    damage: self.config.damage,
                    explosion_radius,
                    lifetime,
                    owner: ctx.owner,
                };
                match services.projectiles.launch(launch, ctx.now) {
                    Ok(()) => ShotOutcome::Launched,
                    Err(err) => {
                        warn!("{}: projectile skipped: {}", self.config.name, err);
                        ShotOutcome::LaunchSkipped(err)
                    }
                }
            }
        };

        debug!("{} fired: {:?} (ammo {:?})", self.config.name, outcome, self.state.ammo());
        Some(outcome)
    }

    fn resolve_hitscan(
        &self,
        ctx: &FireContext,
        direction: Vec3,
        max_range: f32,
        services: &mut WeaponServices<'_>,
    ) -> ShotOutcome {
        let filter = QueryFilter::new(ContentFlags::MASK_SHOT).excluding_opt(ctx.owner);
        let Some(hit) = services.world.raycast(ctx.origin, direction, max_range, &filter) else {
            return ShotOutcome::Miss;
        };

        if !hit.surface.contains(SurfaceFlags::NO_IMPACT) {
            services.effects.spawn(hit.point, hit.normal, hit.surface.material());
        }

        let (damaged, killed) = match services.targets.damageable(hit.collider) {
            Some(target) => (true, target.take_damage(self.config.damage)),
            None => (false, false),
        };

        ShotOutcome::Hit {
            collider: hit.collider,
            point: hit.point,
            damaged,
            killed,
        }
    }

    /// Start reloading. Returns false if already reloading or full.
    pub fn try_reload(&mut self) -> bool {
        let started = self.state.begin_reload(self.config.reload_time);
        if started {
            debug!("{} reloading", self.config.name);
        }
        started
    }

    /// Run the cooldown and reload timers. Returns true when a reload finished.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.state.tick(dt)
    }
}
