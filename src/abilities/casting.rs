//! Cast pipeline
//!
//! Key press -> readiness gate -> animation delay -> effect spawn -> cooldown
//! start. Input only flips a timer into Casting; everything observable (the
//! effect entity, the cast event, the cooldown with its combo discount)
//! happens when the delay expires in `process_casting`.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::arena::{ArenaEntity, ElementalStats, Facing, Player};
use crate::combat::combo::ComboMeter;
use crate::combat::events::AbilityCastEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::SimulationSpeed;
use crate::keybindings::{GameAction, Keybindings};

use super::config::{AbilityConfig, AbilityDefinitions, AbilityType, EffectKind, ElementType};
use super::effects::{
    AreaBurstEffect, EffectLifetime, ProjectileEffect, WallEffect, WaveEffect,
    BURST_VISUAL_LIFETIME, PROJECTILE_LIFETIME,
};
use super::loadout::{AbilityLoadout, MAX_SLOTS};
use super::timer::TickOutcome;

/// Distance in front of the caster where projectiles and waves appear.
const MUZZLE_OFFSET: f32 = 0.8;

/// Sprite tint for an effect, by the element of its ability.
fn element_color(element: ElementType) -> Color {
    match element {
        ElementType::Fire => Color::srgb(0.95, 0.45, 0.15),
        ElementType::Water => Color::srgb(0.35, 0.65, 0.95),
        ElementType::Earth => Color::srgb(0.55, 0.40, 0.25),
        ElementType::Wind => Color::srgb(0.75, 0.90, 0.75),
    }
}

/// Where an effect of the given kind spawns, relative to the caster.
fn effect_spawn_translation(effect: &EffectKind, origin: Vec2, facing_dir: f32) -> Vec3 {
    let offset = match effect {
        EffectKind::Projectile { .. } | EffectKind::Wave { .. } => MUZZLE_OFFSET,
        EffectKind::AreaBurst { forward_offset, .. } => *forward_offset,
        EffectKind::Wall { forward_offset, .. } => *forward_offset,
    };
    Vec3::new(origin.x + facing_dir * offset, origin.y, 1.0)
}

/// Spawn the effect entity for a cast that just fired.
fn spawn_ability_effect(
    commands: &mut Commands,
    ability: AbilityType,
    config: &AbilityConfig,
    damage: f32,
    origin: Vec2,
    facing_dir: f32,
) {
    let translation = effect_spawn_translation(&config.effect, origin, facing_dir);
    let color = element_color(config.element);

    match &config.effect {
        EffectKind::Projectile { speed, max_distance } => {
            commands.spawn((
                ProjectileEffect {
                    damage,
                    velocity: Vec2::new(facing_dir * speed, 0.0),
                    traveled: 0.0,
                    max_distance: *max_distance,
                    source: ability,
                },
                EffectLifetime {
                    remaining: PROJECTILE_LIFETIME,
                },
                Sprite::from_color(color, Vec2::new(0.5, 0.25)),
                Transform::from_translation(translation),
                ArenaEntity,
            ));
        }
        EffectKind::AreaBurst { radius, .. } => {
            commands.spawn((
                AreaBurstEffect {
                    damage,
                    radius: *radius,
                    resolved: false,
                    source: ability,
                },
                EffectLifetime {
                    remaining: BURST_VISUAL_LIFETIME,
                },
                Sprite::from_color(
                    color.with_alpha(0.5),
                    Vec2::splat(radius * 2.0),
                ),
                Transform::from_translation(translation),
                ArenaEntity,
            ));
        }
        EffectKind::Wall {
            half_extents,
            duration,
            tick_interval,
            ..
        } => {
            commands.spawn((
                WallEffect {
                    damage,
                    half_extents: Vec2::new(half_extents.0, half_extents.1),
                    tick_interval: *tick_interval,
                    until_next_tick: *tick_interval,
                    source: ability,
                },
                EffectLifetime {
                    remaining: *duration,
                },
                Sprite::from_color(
                    color.with_alpha(0.6),
                    Vec2::new(half_extents.0 * 2.0, half_extents.1 * 2.0),
                ),
                Transform::from_translation(translation),
                ArenaEntity,
            ));
        }
        EffectKind::Wave {
            speed,
            max_distance,
            width,
            knockback,
        } => {
            commands.spawn((
                WaveEffect {
                    damage,
                    velocity: Vec2::new(facing_dir * speed, 0.0),
                    traveled: 0.0,
                    max_distance: *max_distance,
                    width: *width,
                    knockback: *knockback,
                    hit_targets: SmallVec::new(),
                    source: ability,
                },
                Sprite::from_color(color.with_alpha(0.7), Vec2::new(0.4, *width)),
                Transform::from_translation(translation),
                ArenaEntity,
            ));
        }
    }
}

/// Turn ability key presses into cast attempts. A press only lands when the
/// slot's timer is ready; presses during a cast or cooldown fall through
/// silently, as do all presses while paused.
pub fn handle_ability_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    sim: Res<SimulationSpeed>,
    mut players: Query<&mut AbilityLoadout, With<Player>>,
) {
    if sim.is_paused() {
        return;
    }

    for mut loadout in players.iter_mut() {
        for slot in 0..MAX_SLOTS {
            if !keybindings.action_just_pressed(GameAction::ability_slot(slot), &keyboard) {
                continue;
            }
            if let Some(equipped) = loadout.slot_mut(slot) {
                equipped.timer.try_cast();
            }
        }
    }
}

/// Advance every equipped timer. When a cast's animation delay expires the
/// effect spawns, the cooldown starts at `base * combo multiplier`, and a
/// cast event goes out. The multiplier is read at this moment, not at key
/// press, so hits landed during the animation still discount this cast.
pub fn process_casting(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    definitions: Res<AbilityDefinitions>,
    combo: Res<ComboMeter>,
    mut commands: Commands,
    mut cast_events: EventWriter<AbilityCastEvent>,
    mut combat_log: ResMut<CombatLog>,
    mut players: Query<
        (Entity, &Transform, &Facing, &ElementalStats, &mut AbilityLoadout),
        With<Player>,
    >,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }

    for (caster, transform, facing, stats, mut loadout) in players.iter_mut() {
        let origin = transform.translation.truncate();
        let facing_dir = facing.direction();

        for (slot, equipped) in loadout.equipped_mut() {
            match equipped.timer.tick(dt) {
                TickOutcome::None | TickOutcome::CooldownFinished => {}
                TickOutcome::EffectDue => {
                    let Some(config) = definitions.get(&equipped.ability) else {
                        warn!(
                            "No definition for {:?}; cancelling cast",
                            equipped.ability
                        );
                        equipped.timer.cancel_cast();
                        continue;
                    };

                    let damage = config.base_damage * stats.damage_multiplier(config.element);
                    spawn_ability_effect(
                        &mut commands,
                        equipped.ability,
                        config,
                        damage,
                        origin,
                        facing_dir,
                    );

                    let multiplier = combo.reduction_multiplier();
                    equipped.timer.on_cast_effect_fired(multiplier);

                    let cooldown_started = equipped.timer.total_cooldown();
                    cast_events.send(AbilityCastEvent {
                        caster,
                        ability: equipped.ability,
                        slot,
                        cooldown_started,
                    });
                    combat_log.log(
                        CombatLogEventType::AbilityCast,
                        format!("{} cast ({:.2}s cooldown)", config.name, cooldown_started),
                    );
                }
            }
        }
    }
}
