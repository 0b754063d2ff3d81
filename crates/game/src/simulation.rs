//! Game simulation.
//!
//! [`Simulation`] is the context object every system runs against. It owns
//! the level, players, targets, projectiles and impact effects, and is
//! advanced by two explicit calls:
//!
//! - [`Simulation::tick_variable`] once per frame: input sampling, state
//!   transitions, blending and weapon fire
//! - [`Simulation::tick_fixed`] at the fixed rate: player physics, targets,
//!   projectiles and explosions
//!
//! Recoil queued by a shot during a frame is consumed by the next fixed tick.
//! Player colliders follow their body's position and height after every
//! controller update.

use cluckstorm_physics::{ColliderId, CollisionWorld, CommandButtons, ContentFlags, MovementState, TouchList};
use glam::Vec3;
use log::{debug, info};

use crate::config::SimulationConfig;
use crate::damage::{Damageable, PhysicsBody, TargetLookup};
use crate::effects::ImpactEffects;
use crate::events::SimEvent;
use crate::explosion::{Explosion, ExplosionResolver};
use crate::input::InputFrame;
use crate::level::Level;
use crate::pickup::nearest_pickup;
use crate::player::{EntityId, Player};
use crate::projectile::ProjectileSystem;
use crate::target::Target;
use crate::weapon::{FireContext, ShotOutcome, WeaponServices};

/// Players and targets resolvable by collider.
///
/// Built from disjoint slices so the shooter can stay borrowed elsewhere.
struct Combatants<'a> {
    players: [&'a mut [Player]; 2],
    targets: &'a mut [Target],
}

impl<'a> Combatants<'a> {
    fn all(players: &'a mut [Player], targets: &'a mut [Target]) -> Self {
        Self {
            players: [players, <&mut [Player]>::default()],
            targets,
        }
    }
}

fn find_player<'s>(players: &'s mut [&mut [Player]; 2], collider: ColliderId) -> Option<&'s mut Player> {
    players
        .iter_mut()
        .flat_map(|slice| slice.iter_mut())
        .find(|p| p.collider() == Some(collider))
}

impl TargetLookup for Combatants<'_> {
    fn damageable(&mut self, collider: ColliderId) -> Option<&mut dyn Damageable> {
        if let Some(player) = find_player(&mut self.players, collider) {
            return Some(player as &mut dyn Damageable);
        }
        self.targets
            .iter_mut()
            .find(|t| t.collider == collider)
            .map(|t| &mut t.health as &mut dyn Damageable)
    }

    fn physics_body(&mut self, collider: ColliderId) -> Option<&mut dyn PhysicsBody> {
        if let Some(player) = find_player(&mut self.players, collider) {
            return Some(player as &mut dyn PhysicsBody);
        }
        self.targets
            .iter_mut()
            .find(|t| t.collider == collider)
            .map(|t| &mut t.body as &mut dyn PhysicsBody)
    }
}

/// The player hit by `collider`, if any.
fn player_id(players: &[&mut [Player]; 2], collider: ColliderId) -> Option<EntityId> {
    players
        .iter()
        .flat_map(|slice| slice.iter())
        .find(|p| p.collider() == Some(collider))
        .map(|p| p.id)
}

/// Move a player's capsule to its body and resize it to the current height.
fn sync_collider(world: &mut CollisionWorld, player: &Player) {
    if let Some(collider) = player.collider() {
        world.set_capsule_height(collider, player.controller.body().height);
        world.set_collider_position(collider, player.position());
    }
}

/// Shove dynamic targets a player just walked into.
fn push_targets(player: &Player, entered: &TouchList, targets: &mut [Target]) {
    let config = player.controller.config();
    if !config.can_push {
        return;
    }
    for touch in entered.iter() {
        let Some(target) = targets.iter_mut().find(|t| t.collider == touch.collider) else {
            continue;
        };
        // Standing on top of a crate has no horizontal part and doesn't push
        let direction = (-touch.normal).with_y(0.0).normalize_or_zero();
        if target.body.dynamic && direction != Vec3::ZERO {
            target.body.apply_impulse(direction * config.push_strength);
            debug!("Player {} pushed {}", player.id, target.name);
        }
    }
}

/// Lift above the spawn point so a new body never starts touching the floor.
const SPAWN_CLEARANCE: f32 = 0.05;

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Fixed ticks run so far.
    pub frame: u64,

    /// Simulation time in seconds, advanced by fixed ticks.
    pub time: f64,

    pub config: SimulationConfig,

    pub level: Level,

    pub players: Vec<Player>,

    pub targets: Vec<Target>,

    projectiles: ProjectileSystem,
    effects: ImpactEffects,
    explosions: ExplosionResolver,
    events: Vec<SimEvent>,

    // Per-tick scratch
    pending_explosions: Vec<Explosion>,
    killed: Vec<ColliderId>,

    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let pools = &config.pools;
        let projectiles = ProjectileSystem::with_egg_pool(
            pools.projectiles.initial_size,
            pools.projectiles.can_expand,
            config.projectile_gravity,
        );
        let effects = ImpactEffects::with_pool(pools.impacts.initial_size, pools.impacts.can_expand, pools.impact_lifetime);
        let explosions = ExplosionResolver::new(config.knockback_coefficient);

        let mut sim = Self {
            frame: 0,
            time: 0.0,
            config,
            level,
            players: Vec::new(),
            targets: Vec::new(),
            projectiles,
            effects,
            explosions,
            events: Vec::new(),
            pending_explosions: Vec::new(),
            killed: Vec::new(),
            next_entity_id: 1,
        };

        for spawn in std::mem::take(&mut sim.level.targets) {
            let center = spawn.position + Vec3::Y * spawn.half_extents.y;
            let collider = sim
                .level
                .collision
                .add_box(center, spawn.half_extents, ContentFlags::TARGET_BODY);
            sim.targets.push(Target::new(&spawn, collider));
            sim.level.targets.push(spawn);
        }

        info!(
            "Simulation ready: level '{}', {} targets, {} Hz",
            sim.level.name,
            sim.targets.len(),
            sim.config.tick_rate
        );
        sim
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    /// Add a player to the simulation.
    ///
    /// Returns the player's ID.
    pub fn add_player(&mut self, name: &str) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        // Find a spawn point
        let spawn_index = self.players.len() % self.level.player_spawn_count().max(1);
        let spawn = self.level.get_player_spawn(spawn_index);
        let position = spawn.map(|s| s.position).unwrap_or(Vec3::ZERO) + Vec3::Y * SPAWN_CLEARANCE;
        let facing = spawn.map(|s| s.facing).unwrap_or(0.0);

        let mut player = Player::new(id, name.to_string(), position, &self.config);
        let movement = &self.config.movement;
        let collider = self.level.collision.add_capsule(
            position,
            movement.player_radius,
            movement.standing_height,
            ContentFlags::PLAYER_BODY,
        );
        player.controller.set_collider(collider);
        player.controller.set_yaw(facing);

        info!("Player {} ({}) joined at {:?}", id, name, position);
        self.players.push(player);
        id
    }

    /// Remove a player and its collider.
    pub fn remove_player(&mut self, player_id: EntityId) {
        if let Some(index) = self.players.iter().position(|p| p.id == player_id) {
            let player = self.players.remove(index);
            if let Some(collider) = player.collider() {
                self.level.collision.remove_collider(collider);
            }
        }
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Bring a dead player back at its spawn point. Returns false if unknown.
    pub fn respawn_player(&mut self, player_id: EntityId) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            return false;
        };
        let spawn_index = index % self.level.player_spawn_count().max(1);
        let position = self
            .level
            .get_player_spawn(spawn_index)
            .map(|s| s.position)
            .unwrap_or(Vec3::ZERO)
            + Vec3::Y * SPAWN_CLEARANCE;

        let player = &mut self.players[index];
        player.respawn(position);
        sync_collider(&mut self.level.collision, player);
        true
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    pub fn effects(&self) -> &ImpactEffects {
        &self.effects
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get the time step per fixed tick.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Frame tick.
    ///
    /// `inputs` is indexed by position in `players`; missing entries count
    /// as no input.
    pub fn tick_variable(&mut self, inputs: &[InputFrame], dt: f32) {
        for index in 0..self.players.len() {
            let frame = inputs.get(index).copied().unwrap_or_default();
            self.player_frame(index, &frame, dt);
        }
        self.resolve_kills();
    }

    fn player_frame(&mut self, index: usize, frame: &InputFrame, dt: f32) {
        let (before, rest) = self.players.split_at_mut(index);
        let Some((player, after)) = rest.split_first_mut() else {
            return;
        };
        if !player.is_alive() {
            return;
        }

        let intent = player.input.sample(frame, player.modifier.control_sensitivity);
        player.pending_jump |= intent.jump_pressed;
        player.command = intent.command;

        if let Some(slot) = intent.select_slot {
            if player.select_slot(slot) {
                self.events.push(SimEvent::WeaponSwitched { player: player.id, slot });
            }
        }

        // No pickups while aiming down sights
        if intent.interact_pressed && !intent.command.buttons.zoom() {
            let range = self.config.interaction_range;
            if let Some(nearest) = nearest_pickup(&self.level.pickups, player.position(), range) {
                let pickup = self.level.pickups.remove(nearest);
                let slot = player.pick_up(pickup.weapon);
                self.events.push(SimEvent::WeaponPickedUp {
                    player: player.id,
                    weapon: player.weapons[slot].name().to_string(),
                    slot,
                });
            }
        }

        let output = player
            .controller
            .tick_variable(&intent.command, &self.level.collision, dt);
        sync_collider(&mut self.level.collision, player);
        if output.changed() {
            self.events.push(SimEvent::StateChanged {
                player: player.id,
                from: output.previous,
                to: output.state,
            });
            if output.state == MovementState::Sliding {
                self.events.push(SimEvent::SlideStarted { player: player.id });
            } else if output.previous == MovementState::Sliding {
                self.events.push(SimEvent::SlideEnded { player: player.id });
            }
        }

        for weapon in &mut player.weapons {
            if weapon.tick(dt) {
                self.events.push(SimEvent::ReloadFinished {
                    player: player.id,
                    weapon: weapon.name().to_string(),
                });
            }
        }

        let ctx = FireContext {
            origin: player.eye_position(),
            direction: player.aim_direction(),
            owner: player.collider(),
            recoil_multiplier: player.modifier.recoil_force,
            now: self.time,
        };
        let Some(weapon) = player.weapons.get_mut(player.active_slot) else {
            return;
        };

        if intent.reload_pressed && weapon.try_reload() {
            self.events.push(SimEvent::ReloadStarted {
                player: player.id,
                weapon: weapon.name().to_string(),
            });
        }

        if !weapon.wants_fire(intent.fire_held, intent.fire_pressed) {
            return;
        }
        let mut combatants = Combatants {
            players: [&mut *before, &mut *after],
            targets: &mut self.targets,
        };
        let mut services = WeaponServices {
            world: &self.level.collision,
            targets: &mut combatants,
            projectiles: &mut self.projectiles,
            effects: &mut self.effects,
        };
        let Some(outcome) = weapon.try_fire(&ctx, &mut services, player.controller.recoil_mut()) else {
            return;
        };

        let name = weapon.name().to_string();
        let mut victim = None;
        let event = match outcome {
            ShotOutcome::Hit { collider, damaged, killed, .. } => {
                if killed {
                    self.killed.push(collider);
                }
                if damaged {
                    victim = player_id(&[before, after], collider);
                }
                SimEvent::ShotFired {
                    player: player.id,
                    weapon: name,
                    hit: Some(collider),
                }
            }
            ShotOutcome::Miss | ShotOutcome::Launched => SimEvent::ShotFired {
                player: player.id,
                weapon: name,
                hit: None,
            },
            ShotOutcome::LaunchSkipped(_) => SimEvent::ShotSkipped {
                player: player.id,
                weapon: name,
            },
        };
        self.events.push(event);
        if let Some(victim) = victim {
            self.events.push(SimEvent::PlayerDamaged {
                player: victim,
                amount: weapon.config().damage,
            });
        }
    }

    /// Fixed tick.
    pub fn tick_fixed(&mut self, dt: f32) {
        self.time += f64::from(dt);

        for player in &mut self.players {
            if !player.is_alive() {
                continue;
            }

            let latched = std::mem::take(&mut player.pending_jump);
            let mut command = player.command;
            command.buttons.set(CommandButtons::JUMP, latched);

            let report = player.controller.tick_fixed(&command, &self.level.collision, dt);
            if latched {
                // The latch held the button for one tick only
                player.controller.release_jump();
            }
            push_targets(player, &report.entered, &mut self.targets);
            if report.jumped {
                self.events.push(SimEvent::Jumped { player: player.id });
            }
            if report.landed {
                self.events.push(SimEvent::Landed {
                    player: player.id,
                    speed: report.landing_speed,
                });
                let damage = player.land(
                    report.landing_speed,
                    self.config.safe_fall_speed,
                    self.config.fall_damage_per_speed,
                );
                if damage > 0.0 {
                    self.events.push(SimEvent::PlayerDamaged {
                        player: player.id,
                        amount: damage,
                    });
                    if !player.is_alive() {
                        self.events.push(SimEvent::PlayerKilled { player: player.id });
                    }
                }
            }

            sync_collider(&mut self.level.collision, player);

            if let Some(step) = player
                .footsteps
                .tick(self.time, player.controller.body(), player.movement_state())
            {
                self.events.push(SimEvent::Footstep {
                    player: player.id,
                    surface: step.surface,
                    position: step.position,
                });
            }
        }

        let gravity = self.config.projectile_gravity;
        for target in &mut self.targets {
            if target.step(&self.level.collision, gravity, dt, &self.config.movement) {
                self.level
                    .collision
                    .set_collider_position(target.collider, target.body.position);
            }
        }

        self.pending_explosions.clear();
        self.projectiles
            .step(&self.level.collision, dt, self.time, &mut self.pending_explosions);

        for explosion in &self.pending_explosions {
            let mut combatants = Combatants::all(&mut self.players, &mut self.targets);
            let report = self
                .explosions
                .resolve(explosion, &self.level.collision, &mut combatants, &mut self.killed);
            self.events.push(SimEvent::ProjectileExploded {
                position: explosion.position,
                affected: report.affected,
            });
            for collider in self.explosions.last_damaged() {
                if let Some(player) = self.players.iter().find(|p| p.collider() == Some(*collider)) {
                    self.events.push(SimEvent::PlayerDamaged {
                        player: player.id,
                        amount: explosion.damage,
                    });
                }
            }
        }

        self.effects.tick(dt);
        self.resolve_kills();
        self.frame += 1;
    }

    /// Remove killed targets and report killed players.
    fn resolve_kills(&mut self) {
        for collider in std::mem::take(&mut self.killed) {
            if let Some(index) = self.targets.iter().position(|t| t.collider == collider) {
                let target = self.targets.remove(index);
                self.level.collision.remove_collider(target.collider);
                debug!("Target {} destroyed", target.name);
                self.events.push(SimEvent::TargetKilled { collider });
            } else if let Some(player) = self.players.iter().find(|p| p.collider() == Some(collider)) {
                self.events.push(SimEvent::PlayerKilled { player: player.id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SpawnPoint;
    use crate::pickup::WeaponPickup;
    use crate::projectile::{Launch, EGG};
    use crate::target::TargetSpawn;
    use crate::weapon::WeaponConfig;
    use cluckstorm_physics::{CollisionQueries, QueryFilter};
    use glam::Vec2;

    fn forward() -> InputFrame {
        InputFrame {
            move_axis: Vec2::new(0.0, 1.0),
            ..Default::default()
        }
    }

    fn run(sim: &mut Simulation, input: InputFrame, ticks: usize) {
        let dt = sim.delta_time();
        for _ in 0..ticks {
            sim.tick_variable(&[input], dt);
            sim.tick_fixed(dt);
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test();
        assert_eq!(sim.frame, 0);
        assert!(sim.players.is_empty());
        assert_eq!(sim.targets.len(), 4);
    }

    #[test]
    fn test_add_player() {
        let mut sim = Simulation::test();

        let id = sim.add_player("Player1");
        assert!(id > 0);
        assert_eq!(sim.players.len(), 1);

        let player = sim.get_player(id).unwrap();
        assert_eq!(player.name, "Player1");
        assert!(player.is_alive());
        assert!(player.collider().is_some());
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::new(SimulationConfig::default(), Level::flat());
        let id = sim.add_player("Test");
        let start = sim.get_player(id).unwrap().position();

        run(&mut sim, forward(), 60);

        let player = sim.get_player(id).unwrap();
        let distance = (player.position() - start).length();
        assert!(distance > 1.0, "Player should have moved, distance={}", distance);
        assert!(player.controller.is_grounded());
    }

    #[test]
    fn test_jump_press_survives_frames_without_fixed_ticks() {
        let mut sim = Simulation::new(SimulationConfig::default(), Level::flat());
        let id = sim.add_player("Test");
        run(&mut sim, InputFrame::default(), 10);

        let jump = InputFrame {
            jump: true,
            ..Default::default()
        };
        sim.tick_variable(&[jump], 0.001);
        sim.tick_variable(&[jump], 0.001);
        sim.tick_fixed(sim.delta_time());

        assert!(sim.events().iter().any(|e| matches!(e, SimEvent::Jumped { player } if *player == id)));
    }

    #[test]
    fn test_hitscan_kills_target_and_removes_it() {
        let mut config = SimulationConfig::default();
        config.loadout[0].camera_kick = Vec2::ZERO;
        let mut sim = Simulation::new(config, Level::test_arena());
        sim.add_player("Shooter");
        let before = sim.targets.len();
        let colliders_before = sim.level.collision.collider_count();

        // Spawn faces +X; the middle dummy stands 10 m ahead.
        let fire = InputFrame {
            fire: true,
            ..Default::default()
        };
        for _ in 0..120 {
            sim.tick_variable(&[fire], sim.delta_time());
            sim.tick_fixed(sim.delta_time());
        }

        assert_eq!(sim.targets.len(), before - 1);
        assert_eq!(sim.level.collision.collider_count(), colliders_before - 1);
        assert!(sim.events().iter().any(|e| matches!(e, SimEvent::TargetKilled { .. })));
    }

    #[test]
    fn test_explosion_pushes_crate() {
        let mut sim = Simulation::test();
        sim.add_player("Shooter");
        run(&mut sim, InputFrame::default(), 5);

        let crate_index = sim.targets.iter().position(|t| t.name == "crate_0").unwrap();
        let crate_collider = sim.targets[crate_index].collider;
        sim.explosions.resolve(
            &Explosion {
                position: sim.targets[crate_index].body.position - Vec3::X,
                radius: 3.0,
                damage: 10.0,
                struck: None,
                owner: None,
            },
            &sim.level.collision,
            &mut Combatants::all(&mut sim.players, &mut sim.targets),
            &mut sim.killed,
        );

        let target = sim.targets.iter().find(|t| t.collider == crate_collider).unwrap();
        assert!(target.body.velocity.x > 0.0);
        assert_eq!(target.health.current(), 40.0);
    }

    #[test]
    fn test_crouched_player_ducks_under_chest_shot() {
        let mut sim = Simulation::new(SimulationConfig::default(), Level::flat());
        let id = sim.add_player("Target");
        run(&mut sim, InputFrame::default(), 10);

        let filter = QueryFilter::new(ContentFlags::MASK_SHOT);
        let chest = Vec3::new(-5.0, 1.4, 0.0);
        let collider = sim.get_player(id).unwrap().collider();
        let standing = sim.level.collision.raycast(chest, Vec3::X, 10.0, &filter);
        assert_eq!(standing.map(|hit| hit.collider), collider);

        let crouch = InputFrame {
            crouch: true,
            ..Default::default()
        };
        run(&mut sim, crouch, 60);
        assert_eq!(sim.get_player(id).unwrap().movement_state(), MovementState::Crouching);
        assert!(sim.level.collision.raycast(chest, Vec3::X, 10.0, &filter).is_none());

        // Standing back up restores the full capsule
        run(&mut sim, InputFrame::default(), 60);
        let again = sim.level.collision.raycast(chest, Vec3::X, 10.0, &filter);
        assert_eq!(again.map(|hit| hit.collider), collider);
    }

    #[test]
    fn test_second_jump_press_is_not_swallowed_by_the_latch() {
        let mut config = SimulationConfig::default();
        config.movement.jump_buffer_ms = 500;
        let mut sim = Simulation::new(config, Level::flat());
        let id = sim.add_player("Test");
        run(&mut sim, InputFrame::default(), 10);

        let jump = InputFrame {
            jump: true,
            ..Default::default()
        };
        let dt = sim.delta_time();
        run(&mut sim, jump, 1);
        assert!(sim.events().iter().any(|e| matches!(e, SimEvent::Jumped { .. })));

        // Release and press again between two fixed ticks, while airborne
        sim.tick_variable(&[InputFrame::default()], dt);
        sim.tick_variable(&[jump], dt);
        sim.tick_fixed(dt);

        let player = sim.get_player(id).unwrap();
        assert!(!player.controller.is_grounded());
        assert!(player.controller.jump_state().is_buffered());
    }

    #[test]
    fn test_walking_into_crate_pushes_it() {
        let push = |can_push: bool| {
            let mut config = SimulationConfig::default();
            config.movement.can_push = can_push;
            let mut level = Level::flat();
            level.targets.push(TargetSpawn::crate_box("crate", Vec3::new(2.0, 0.02, 0.0)));
            let mut sim = Simulation::new(config, level);
            sim.add_player("Pusher");

            run(&mut sim, forward(), 120);
            sim.targets[0].body.position.x
        };

        assert!(push(true) > 2.1, "crate should have been shoved along +X");
        assert!((push(false) - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_hitscan_on_player_reports_damage() {
        let mut config = SimulationConfig::default();
        config.loadout[0].camera_kick = Vec2::ZERO;
        let mut level = Level::flat();
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(10.0, 0.0, 0.0),
            facing: std::f32::consts::PI,
        });
        let mut sim = Simulation::new(config, level);
        sim.add_player("Shooter");
        let victim = sim.add_player("Victim");

        let fire = InputFrame {
            fire: true,
            ..Default::default()
        };
        sim.tick_variable(&[fire, InputFrame::default()], sim.delta_time());

        let damage = WeaponConfig::glock18().damage;
        assert!(sim.events().iter().any(|e| matches!(
            e,
            SimEvent::PlayerDamaged { player, amount } if *player == victim && *amount == damage
        )));
        assert_eq!(sim.get_player(victim).unwrap().health.current(), 100.0 - damage);
    }

    #[test]
    fn test_explosion_on_player_reports_damage() {
        let mut sim = Simulation::new(SimulationConfig::default(), Level::flat());
        let id = sim.add_player("Victim");
        run(&mut sim, InputFrame::default(), 5);

        let feet = sim.get_player(id).unwrap().position();
        sim.projectiles
            .launch(
                Launch {
                    prototype: EGG,
                    origin: feet + Vec3::new(-2.0, 1.0, 0.0),
                    direction: Vec3::X,
                    speed: 20.0,
                    damage: 30.0,
                    explosion_radius: 5.0,
                    lifetime: 10.0,
                    owner: None,
                },
                sim.time,
            )
            .unwrap();
        run(&mut sim, InputFrame::default(), 30);

        let events = sim.events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::ProjectileExploded { .. })));
        let reported: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::PlayerDamaged { player, amount } if *player == id => Some(*amount),
                _ => None,
            })
            .collect();
        assert_eq!(reported, vec![30.0]);
        assert_eq!(sim.get_player(id).unwrap().health.current(), 70.0);
    }

    #[test]
    fn test_interact_picks_up_nearest_weapon() {
        let golden = WeaponConfig {
            name: "Golden Eggs".to_string(),
            ..WeaponConfig::egg_launcher()
        };
        let start = |zoom: bool| {
            let mut level = Level::flat();
            level.pickups.push(WeaponPickup::new(golden.clone(), Vec3::new(1.0, 0.0, 0.0)));
            level.pickups.push(WeaponPickup::new(WeaponConfig::glock18(), Vec3::new(30.0, 0.0, 0.0)));
            let mut sim = Simulation::new(SimulationConfig::default(), level);
            let id = sim.add_player("Collector");
            let interact = InputFrame {
                interact: true,
                zoom,
                ..Default::default()
            };
            run(&mut sim, interact, 1);
            (sim, id)
        };

        let (sim, id) = start(false);
        let player = sim.get_player(id).unwrap();
        assert_eq!(player.active_weapon().map(|w| w.name()), Some("Golden Eggs"));
        assert_eq!(player.weapons.len(), 3);
        assert_eq!(sim.level.pickups.len(), 1);
        assert!(sim.events().iter().any(|e| matches!(
            e,
            SimEvent::WeaponPickedUp { player, slot: 2, .. } if *player == id
        )));

        // Aiming down sights blocks interaction
        let (sim, id) = start(true);
        assert_eq!(sim.get_player(id).unwrap().weapons.len(), 2);
        assert_eq!(sim.level.pickups.len(), 2);
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<_> = (0..100)
            .map(|i| InputFrame {
                move_axis: Vec2::new(if i % 3 == 0 { 1.0 } else { 0.0 }, if i % 2 == 0 { 1.0 } else { 0.0 }),
                jump: i % 10 == 0,
                fire: i % 7 == 0,
                ..Default::default()
            })
            .collect();

        let play = || {
            let mut sim = Simulation::test();
            sim.add_player("Test");
            let dt = sim.delta_time();
            for input in &inputs {
                sim.tick_variable(&[*input], dt);
                sim.tick_fixed(dt);
            }
            sim.get_player(1).unwrap().position()
        };

        let (pos1, pos2) = (play(), play());
        assert!(
            (pos1 - pos2).length() < 0.0001,
            "Simulations should be deterministic: {:?} vs {:?}",
            pos1,
            pos2
        );
    }
}
