//! Headless scenario execution
//!
//! Runs cast scenarios without any graphical output, suitable for automated
//! testing and balance analysis. The scripted casts go through the same
//! timers, effects, and combo resolution as live key presses; only the
//! input source differs.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::abilities::config::{AbilityConfigPlugin, AbilityDefinitions};
use crate::abilities::loadout::AbilityLoadout;
use crate::arena::{Enemy, Facing, GameRng, Health, Player};
use crate::combat::combo::{load_combo_tuning, ComboMeter};
use crate::combat::events::EnemyDeathEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::{add_core_combat_systems, CombatSystemPhase, SimulationSpeed};

use super::config::HeadlessScenarioConfig;

/// Result of a completed headless scenario
///
/// Provides programmatic access to the outcome for testing and analysis.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Simulated seconds the scenario ran
    pub elapsed_time: f32,
    /// Total damage dealt across all abilities
    pub total_damage: f32,
    /// Damage dealt per ability name
    pub damage_by_ability: HashMap<String, f32>,
    /// Enemies destroyed before the scenario ended
    pub enemies_defeated: u32,
    /// Combo count when the scenario ended
    pub final_combo: u32,
    /// Highest combo count reached
    pub peak_combo: u32,
    /// Cooldown multiplier when the scenario ended
    pub final_multiplier: f32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Resource tracking headless scenario state
#[derive(Resource)]
pub struct HeadlessScenarioState {
    /// Maximum scenario duration before forcing completion
    pub max_duration: f32,
    /// Elapsed simulated time
    pub elapsed_time: f32,
    /// Custom output path for the combat log
    pub output_path: Option<String>,
    /// Whether the scenario has completed
    pub scenario_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Index of the next script entry to fire
    next_cast: usize,
    /// Highest combo count seen so far
    peak_combo: u32,
    /// Enemies destroyed so far
    enemies_defeated: u32,
    /// Scenario result (populated on completion)
    pub result: Option<ScenarioResult>,
}

/// Plugin for headless scenario execution
pub struct HeadlessPlugin {
    pub config: HeadlessScenarioConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let tuning = load_combo_tuning().expect("Invalid combo tuning");

        app.insert_resource(self.config.clone())
            .insert_resource(HeadlessScenarioState {
                max_duration: self.config.max_duration_secs,
                elapsed_time: 0.0,
                output_path: self.config.output_path.clone(),
                scenario_complete: false,
                random_seed: self.config.random_seed,
                next_cast: 0,
                peak_combo: 0,
                enemies_defeated: 0,
                result: None,
            })
            .insert_resource(ComboMeter::new(tuning));

        add_core_combat_systems(app);

        app.add_systems(Startup, headless_setup_scenario)
            .add_systems(
                Update,
                headless_script_casts.in_set(CombatSystemPhase::Input),
            )
            .add_systems(
                Update,
                (headless_track_progress, headless_check_scenario_end)
                    .chain()
                    .after(CombatSystemPhase::Resolution),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Setup system for a headless scenario: spawn the caster and targets,
/// equip the configured loadout, and seed the RNG.
fn headless_setup_scenario(
    mut commands: Commands,
    config: Res<HeadlessScenarioConfig>,
    state: Res<HeadlessScenarioState>,
    definitions: Res<AbilityDefinitions>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::SessionEvent,
        "Scenario started (headless mode)".to_string(),
    );

    let game_rng = match state.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };
    commands.insert_resource(game_rng);

    // Config validation happened before the app was built.
    let abilities = config
        .to_loadout()
        .expect("scenario config validated before launch");
    let mut loadout = AbilityLoadout::default();
    for (slot, ability) in abilities.into_iter().enumerate() {
        let ability_config = definitions.get_unchecked(&ability);
        loadout
            .equip(ability, ability_config, slot)
            .expect("scenario loadout validated before launch");
    }

    commands.spawn((
        Player,
        Facing::Right,
        config.element_levels,
        loadout,
        Transform::from_xyz(-6.0, 0.0, 0.0),
    ));

    for spawn in &config.enemies {
        commands.spawn((
            Enemy,
            Health::new(spawn.health),
            Transform::from_xyz(spawn.x, spawn.y, 0.0),
        ));
    }

    info!(
        "Scenario ready: {} abilities, {} targets, {} scripted casts",
        config.loadout.len(),
        config.enemies.len(),
        config.script.len()
    );
}

/// Fire scripted casts whose time has come. Entries are matched against the
/// scenario clock in file order; a press on a busy slot is a silent no-op,
/// matching live input.
fn headless_script_casts(
    config: Res<HeadlessScenarioConfig>,
    mut state: ResMut<HeadlessScenarioState>,
    mut players: Query<&mut AbilityLoadout, With<Player>>,
) {
    let Ok(mut loadout) = players.get_single_mut() else {
        return;
    };

    while let Some(cast) = config.script.get(state.next_cast) {
        if cast.at > state.elapsed_time {
            break;
        }
        state.next_cast += 1;
        if let Some(equipped) = loadout.slot_mut(cast.slot) {
            equipped.timer.try_cast();
        }
    }
}

/// Advance the scenario clock and collect running statistics.
fn headless_track_progress(
    time: Res<Time>,
    sim: Res<SimulationSpeed>,
    combo: Res<ComboMeter>,
    mut death_events: EventReader<EnemyDeathEvent>,
    mut state: ResMut<HeadlessScenarioState>,
) {
    state.elapsed_time += time.delta_secs() * sim.multiplier;
    state.peak_combo = state.peak_combo.max(combo.combo_count());
    state.enemies_defeated += death_events.read().count() as u32;
}

/// Detect scenario completion: the duration limit was reached, or every
/// scripted cast has fired and every enemy is down.
fn headless_check_scenario_end(
    config: Res<HeadlessScenarioConfig>,
    combo: Res<ComboMeter>,
    combat_log: Res<CombatLog>,
    mut state: ResMut<HeadlessScenarioState>,
    enemies: Query<(), With<Enemy>>,
) {
    if state.scenario_complete {
        return;
    }

    let script_done = state.next_cast >= config.script.len();
    let all_enemies_down = enemies.is_empty();
    let timed_out = state.elapsed_time >= state.max_duration;

    if !timed_out && !(script_done && all_enemies_down) {
        return;
    }

    state.scenario_complete = true;

    let result = ScenarioResult {
        elapsed_time: state.elapsed_time,
        total_damage: combat_log.total_damage(),
        damage_by_ability: combat_log.damage_by_ability(),
        enemies_defeated: state.enemies_defeated,
        final_combo: combo.combo_count(),
        peak_combo: state.peak_combo,
        final_multiplier: combo.reduction_multiplier(),
        random_seed: state.random_seed,
    };

    println!("Scenario complete after {:.2}s", result.elapsed_time);
    println!("  Total damage:     {:.1}", result.total_damage);
    println!("  Enemies defeated: {}", result.enemies_defeated);
    println!(
        "  Combo: {} final / {} peak (cooldown x{:.2})",
        result.final_combo, result.peak_combo, result.final_multiplier
    );
    let mut per_ability: Vec<(&String, &f32)> = result.damage_by_ability.iter().collect();
    per_ability.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (ability, damage) in per_ability {
        println!("  {}: {:.1}", ability, damage);
    }

    if let Some(path) = &state.output_path {
        match combat_log.save_to_file(path) {
            Ok(()) => println!("Combat log saved to {}", path),
            Err(e) => eprintln!("Failed to save combat log: {}", e),
        }
    }

    state.result = Some(result);
}

/// Exit the app once the scenario is complete.
fn headless_exit_on_complete(
    state: Res<HeadlessScenarioState>,
    mut exit: EventWriter<AppExit>,
) {
    if state.scenario_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless scenario from a validated configuration.
pub fn run_headless_scenario(config: HeadlessScenarioConfig) -> Result<(), String> {
    println!("Starting headless scenario...");
    println!("  Loadout: {:?}", config.loadout);
    println!("  Targets: {}", config.enemies.len());
    println!("  Scripted casts: {}", config.script.len());
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        // Transform and hierarchy plugins needed for entity positions
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        // Load ability definitions from config
        .add_plugins(AbilityConfigPlugin)
        // Our headless scenario plugin
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}
