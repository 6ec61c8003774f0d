//! Combocast - combo-driven sorcerer ability sandbox
//!
//! A 2D arena where a sorcerer chains elemental abilities against target
//! dummies. Hits feed a combo meter that shortens every equipped cooldown.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use combocast::abilities::config::AbilityConfigPlugin;
use combocast::cli;
use combocast::combat::CombatPlugin;
use combocast::headless::{self, HeadlessScenarioConfig};
use combocast::settings::SettingsPlugin;
use combocast::ui::UiPlugin;

fn main() {
    let args = cli::parse_args();

    if let Some(scenario_path) = args.headless {
        let mut config = match HeadlessScenarioConfig::load_from_file(&scenario_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading scenario config: {}", e);
                std::process::exit(1);
            }
        };

        // CLI flags override the scenario file
        if let Some(output) = args.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        config.max_duration_secs = config.max_duration_secs.min(args.max_duration);

        if let Err(e) = headless::run_headless_scenario(config) {
            eprintln!("Scenario failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    App::new()
        // Bevy default plugins with custom window settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Combocast".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        // Our game plugins
        .add_plugins((
            EguiPlugin,
            AbilityConfigPlugin,
            SettingsPlugin,
            CombatPlugin,
            UiPlugin,
        ))
        .run();
}
