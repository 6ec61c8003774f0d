//! Ability effect entities
//!
//! Each cast spawns one short-lived effect entity; these systems move the
//! effects, test overlap against enemies, and report hits. Hit policy
//! differs per kind: projectiles stop at the first target, bursts and waves
//! damage each target at most once per instance, and walls re-apply damage
//! to occupants on a fixed tick for as long as the zone lasts.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::arena::{Enemy, Health, ENEMY_HIT_RADIUS};
use crate::combat::events::AbilityHitEvent;
use crate::combat::SimulationSpeed;

use super::config::AbilityType;

/// Thickness of a wave front along its travel axis.
const WAVE_FRONT_THICKNESS: f32 = 0.8;

/// Seconds a projectile survives without hitting anything.
pub const PROJECTILE_LIFETIME: f32 = 5.0;

/// Seconds a burst visual lingers after resolving.
pub const BURST_VISUAL_LIFETIME: f32 = 0.4;

/// Generic countdown that despawns the effect entity when it runs out.
#[derive(Component)]
pub struct EffectLifetime {
    pub remaining: f32,
}

/// Straight-line projectile. Despawns on the first enemy it touches.
#[derive(Component)]
pub struct ProjectileEffect {
    pub damage: f32,
    pub velocity: Vec2,
    pub traveled: f32,
    pub max_distance: f32,
    pub source: AbilityType,
}

/// Instant burst around a point. Resolves once against everything inside
/// its radius, then lingers only as a visual.
#[derive(Component)]
pub struct AreaBurstEffect {
    pub damage: f32,
    pub radius: f32,
    pub resolved: bool,
    pub source: AbilityType,
}

/// Stationary damage zone. Re-applies damage to occupants every
/// `tick_interval` seconds; each damage tick feeds the combo meter again.
#[derive(Component)]
pub struct WallEffect {
    pub damage: f32,
    pub half_extents: Vec2,
    pub tick_interval: f32,
    pub until_next_tick: f32,
    pub source: AbilityType,
}

/// Advancing front. Damages and knocks back each enemy at most once.
#[derive(Component)]
pub struct WaveEffect {
    pub damage: f32,
    pub velocity: Vec2,
    pub traveled: f32,
    pub max_distance: f32,
    pub width: f32,
    pub knockback: f32,
    pub hit_targets: SmallVec<[Entity; 8]>,
    pub source: AbilityType,
}

/// Move projectiles and resolve first-contact hits.
pub fn move_projectiles(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut commands: Commands,
    mut hits: EventWriter<AbilityHitEvent>,
    mut projectiles: Query<(Entity, &mut Transform, &mut ProjectileEffect), Without<Enemy>>,
    enemies: Query<(Entity, &Transform, &Health), With<Enemy>>,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }

    for (effect_entity, mut transform, mut projectile) in projectiles.iter_mut() {
        let step = projectile.velocity * dt;
        transform.translation += step.extend(0.0);
        projectile.traveled += step.length();

        let position = transform.translation.truncate();
        let mut struck = false;
        for (enemy_entity, enemy_transform, health) in enemies.iter() {
            if !health.is_alive() {
                continue;
            }
            if enemy_transform.translation.truncate().distance(position) <= ENEMY_HIT_RADIUS {
                hits.send(AbilityHitEvent {
                    target: enemy_entity,
                    amount: projectile.damage,
                    source: projectile.source,
                    combo_weight: 1,
                });
                struck = true;
                break;
            }
        }

        if struck || projectile.traveled >= projectile.max_distance {
            commands.entity(effect_entity).despawn();
        }
    }
}

/// Resolve freshly spawned area bursts: every living enemy inside the
/// radius takes damage exactly once per burst instance.
pub fn resolve_area_bursts(
    mut hits: EventWriter<AbilityHitEvent>,
    mut bursts: Query<(&Transform, &mut AreaBurstEffect), Without<Enemy>>,
    enemies: Query<(Entity, &Transform, &Health), With<Enemy>>,
) {
    for (transform, mut burst) in bursts.iter_mut() {
        if burst.resolved {
            continue;
        }
        burst.resolved = true;

        let center = transform.translation.truncate();
        let mut struck: SmallVec<[Entity; 8]> = SmallVec::new();
        for (enemy_entity, enemy_transform, health) in enemies.iter() {
            if !health.is_alive() || struck.contains(&enemy_entity) {
                continue;
            }
            let distance = enemy_transform.translation.truncate().distance(center);
            if distance <= burst.radius + ENEMY_HIT_RADIUS {
                struck.push(enemy_entity);
                hits.send(AbilityHitEvent {
                    target: enemy_entity,
                    amount: burst.damage,
                    source: burst.source,
                    combo_weight: 1,
                });
            }
        }
    }
}

/// Apply wall zone damage on its fixed tick interval. Unlike the other
/// kinds, a wall keeps re-damaging (and re-registering combo for) targets
/// that stay inside the zone.
pub fn tick_walls(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut hits: EventWriter<AbilityHitEvent>,
    mut walls: Query<(&Transform, &mut WallEffect), Without<Enemy>>,
    enemies: Query<(Entity, &Transform, &Health), With<Enemy>>,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }

    for (transform, mut wall) in walls.iter_mut() {
        wall.until_next_tick -= dt;
        if wall.until_next_tick > 0.0 {
            continue;
        }
        wall.until_next_tick += wall.tick_interval;

        let center = transform.translation.truncate();
        // Damage per tick is scaled by the interval so DPS stays constant
        // regardless of tick rate.
        let tick_damage = wall.damage * wall.tick_interval;
        for (enemy_entity, enemy_transform, health) in enemies.iter() {
            if !health.is_alive() {
                continue;
            }
            let offset = enemy_transform.translation.truncate() - center;
            if offset.x.abs() <= wall.half_extents.x + ENEMY_HIT_RADIUS
                && offset.y.abs() <= wall.half_extents.y + ENEMY_HIT_RADIUS
            {
                hits.send(AbilityHitEvent {
                    target: enemy_entity,
                    amount: tick_damage,
                    source: wall.source,
                    combo_weight: 1,
                });
            }
        }
    }
}

/// Advance wave fronts, damaging and shoving each enemy the front passes
/// over at most once per wave.
pub fn advance_waves(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut commands: Commands,
    mut hits: EventWriter<AbilityHitEvent>,
    mut waves: Query<(Entity, &mut Transform, &mut WaveEffect), Without<Enemy>>,
    mut enemies: Query<(Entity, &mut Transform, &Health), With<Enemy>>,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }

    for (effect_entity, mut transform, mut wave) in waves.iter_mut() {
        let step = wave.velocity * dt;
        transform.translation += step.extend(0.0);
        wave.traveled += step.length();

        let front = transform.translation.truncate();
        let push_direction = wave.velocity.normalize_or_zero();
        for (enemy_entity, mut enemy_transform, health) in enemies.iter_mut() {
            if !health.is_alive() || wave.hit_targets.contains(&enemy_entity) {
                continue;
            }
            let offset = enemy_transform.translation.truncate() - front;
            let along = offset.dot(push_direction).abs();
            let across = (offset - offset.dot(push_direction) * push_direction).length();
            if along <= WAVE_FRONT_THICKNESS + ENEMY_HIT_RADIUS && across <= wave.width / 2.0 {
                wave.hit_targets.push(enemy_entity);
                hits.send(AbilityHitEvent {
                    target: enemy_entity,
                    amount: wave.damage,
                    source: wave.source,
                    combo_weight: 1,
                });
                enemy_transform.translation += (push_direction * wave.knockback).extend(0.0);
            }
        }

        if wave.traveled >= wave.max_distance {
            commands.entity(effect_entity).despawn();
        }
    }
}

/// Count down effect lifetimes and discard expired entities.
pub fn expire_effects(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut commands: Commands,
    mut effects: Query<(Entity, &mut EffectLifetime)>,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }

    for (entity, mut lifetime) in effects.iter_mut() {
        lifetime.remaining -= dt;
        if lifetime.remaining <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
