//! Combat orchestration
//!
//! Wires the cast pipeline, effect resolution, and the combo meter into a
//! fixed per-frame order: input, then casting and effect simulation, then
//! hit resolution. Resolution lands hits on the combo meter and pushes the
//! new multiplier to every equipped timer before the frame ends, so a hit's
//! cooldown discount is never deferred to a later frame.

pub mod combo;
pub mod events;
pub mod log;

use bevy::prelude::*;

use crate::abilities::casting::{handle_ability_input, process_casting};
use crate::abilities::config::AbilityDefinitions;
use crate::abilities::effects::{
    advance_waves, expire_effects, move_projectiles, resolve_area_bursts, tick_walls,
};
use crate::abilities::loadout::AbilityLoadout;
use crate::arena::{despawn_dead_enemies, GameRng, Health};
use crate::keybindings::{GameAction, Keybindings};

use combo::{load_combo_tuning, ComboChange, ComboMeter};
use events::{
    AbilityCastEvent, AbilityHitEvent, ComboChangedEvent, DamageEvent, EnemyDeathEvent,
};
use log::{CombatLog, CombatLogEventType};

/// Simulation speed control.
///
/// Multiplier applied to delta time for all combat systems.
/// 1.0 = normal speed, 0.0 = paused. Cooldowns, effect motion, and combo
/// decay all freeze together; nothing drifts while paused.
#[derive(Resource)]
pub struct SimulationSpeed {
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    pub fn normal_speed(&mut self) {
        self.multiplier = 1.0;
    }

    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }

    pub fn toggle_pause(&mut self) {
        if self.is_paused() {
            self.normal_speed();
        } else {
            self.pause();
        }
    }
}

/// Execution phases for combat systems within a frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Key presses become cast attempts
    Input,
    /// Timers advance, effects spawn and move, hits are detected
    CastingAndEffects,
    /// Hits become damage and combo changes; the new multiplier reaches
    /// every timer before the frame ends
    Resolution,
}

/// Register the events, resources, and simulation systems shared by the
/// graphical and headless assemblies. Input handling is not included;
/// graphical mode adds it, headless scenarios drive casts from a script.
pub fn add_core_combat_systems(app: &mut App) {
    app.add_event::<AbilityHitEvent>()
        .add_event::<DamageEvent>()
        .add_event::<AbilityCastEvent>()
        .add_event::<ComboChangedEvent>()
        .add_event::<EnemyDeathEvent>()
        .init_resource::<SimulationSpeed>()
        .init_resource::<CombatLog>()
        .configure_sets(
            Update,
            (
                CombatSystemPhase::Input,
                CombatSystemPhase::CastingAndEffects,
                CombatSystemPhase::Resolution,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                process_casting,
                move_projectiles,
                resolve_area_bursts,
                tick_walls,
                advance_waves,
                expire_effects,
            )
                .chain()
                .in_set(CombatSystemPhase::CastingAndEffects),
        )
        .add_systems(
            Update,
            (
                tick_combo_decay,
                apply_hits,
                broadcast_combo_multiplier,
                log_combo_changes,
                despawn_dead_enemies,
                advance_session_clock,
            )
                .chain()
                .in_set(CombatSystemPhase::Resolution),
        );
}

/// Advance the combo decay window. A lapsed window resets the chain and
/// announces multiplier 1.0; timers ignore the rise, so cooldowns already
/// discounted keep their discount.
pub fn tick_combo_decay(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut combo: ResMut<ComboMeter>,
    mut combo_events: EventWriter<ComboChangedEvent>,
) {
    let dt = time.delta_secs() * sim.multiplier;
    if dt <= 0.0 {
        return;
    }
    if combo.tick(dt) == ComboChange::Reset {
        combo_events.send(ComboChangedEvent {
            combo_count: 0,
            multiplier: 1.0,
        });
    }
}

/// Resolve this frame's hits: apply damage, log it, and feed the combo
/// meter. Hits against entities that despawned earlier in the frame are
/// dropped silently; they still happened too late to count.
pub fn apply_hits(
    definitions: Res<AbilityDefinitions>,
    mut hit_events: EventReader<AbilityHitEvent>,
    mut damage_events: EventWriter<DamageEvent>,
    mut combo_events: EventWriter<ComboChangedEvent>,
    mut combo: ResMut<ComboMeter>,
    mut combat_log: ResMut<CombatLog>,
    mut targets: Query<&mut Health>,
) {
    for hit in hit_events.read() {
        let Ok(mut health) = targets.get_mut(hit.target) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        health.take_damage(hit.amount);
        damage_events.send(DamageEvent {
            target: hit.target,
            amount: hit.amount,
            source: hit.source,
        });

        let ability_name = definitions
            .get(&hit.source)
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");
        combat_log.log_damage(ability_name, hit.target, hit.amount);

        let multiplier = combo.register_hit(hit.combo_weight);
        combo_events.send(ComboChangedEvent {
            combo_count: combo.combo_count(),
            multiplier,
        });
    }
}

/// Push the frame's final combo multiplier to every equipped timer.
/// Runs after `apply_hits` in the same frame, which is what makes the
/// discount from a hit visible on cooldowns immediately.
pub fn broadcast_combo_multiplier(
    mut combo_events: EventReader<ComboChangedEvent>,
    mut loadouts: Query<&mut AbilityLoadout>,
) {
    let Some(latest) = combo_events.read().last() else {
        return;
    };
    for mut loadout in loadouts.iter_mut() {
        loadout.broadcast_multiplier(latest.multiplier);
    }
}

/// Record combo movement in the combat log.
pub fn log_combo_changes(
    mut combo_events: EventReader<ComboChangedEvent>,
    mut combat_log: ResMut<CombatLog>,
) {
    for change in combo_events.read() {
        let message = if change.combo_count == 0 {
            "Combo chain reset".to_string()
        } else {
            format!(
                "Combo {} (cooldown x{:.2})",
                change.combo_count, change.multiplier
            )
        };
        combat_log.log(CombatLogEventType::Combo, message);
    }
}

/// Keep the combat log's session clock in step with simulated time.
pub fn advance_session_clock(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.session_time += time.delta_secs() * sim.multiplier;
}

/// Toggle pause from the keyboard. Graphical mode only.
pub fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut sim: ResMut<SimulationSpeed>,
    mut combat_log: ResMut<CombatLog>,
) {
    if keybindings.action_just_pressed(GameAction::PausePlay, &keyboard) {
        sim.toggle_pause();
        let message = if sim.is_paused() {
            "Simulation paused"
        } else {
            "Simulation resumed"
        };
        combat_log.log(CombatLogEventType::SessionEvent, message.to_string());
    }
}

/// Combat plugin for the graphical game: core simulation plus keyboard
/// input and the arena scene.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        let tuning = match load_combo_tuning() {
            Ok(tuning) => tuning,
            // Tuning must be valid before any session starts; a broken file
            // is a deployment error.
            Err(e) => panic!("Failed to load combo tuning: {}", e),
        };

        app.insert_resource(ComboMeter::new(tuning))
            .init_resource::<GameRng>();
        add_core_combat_systems(app);
        app.add_systems(Startup, crate::arena::setup_arena)
            .add_systems(
                Update,
                (handle_ability_input, toggle_pause).in_set(CombatSystemPhase::Input),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_speed_toggle() {
        let mut speed = SimulationSpeed::default();
        assert!(!speed.is_paused());
        assert_eq!(speed.multiplier, 1.0);

        speed.toggle_pause();
        assert!(speed.is_paused());
        assert_eq!(speed.multiplier, 0.0);

        speed.toggle_pause();
        assert!(!speed.is_paused());
    }
}
