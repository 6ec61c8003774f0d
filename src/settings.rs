//! Game settings and persistence
//!
//! Manages the player's saved state: keybindings, the selected ability
//! loadout, and elemental upgrade levels. Settings are stored as RON next
//! to the executable and written back whenever they change, so progress
//! survives restarts.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::abilities::config::{AbilityDefinitions, AbilityType};
use crate::abilities::loadout::{AbilityLoadout, MAX_SLOTS};
use crate::arena::{ElementalStats, Player};
use crate::keybindings::Keybindings;

/// User-configurable game settings and saved progression
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct GameSettings {
    pub keybindings: Keybindings,
    /// Ability selected for each input slot, by slot index
    pub selected_abilities: [Option<AbilityType>; MAX_SLOTS],
    /// Elemental upgrade levels earned so far
    pub element_levels: ElementalStats,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            keybindings: Keybindings::default(),
            selected_abilities: [
                Some(AbilityType::FrostBolt),
                Some(AbilityType::FireBall),
                Some(AbilityType::FrostWall),
                Some(AbilityType::BlastWave),
            ],
            element_levels: ElementalStats::default(),
        }
    }
}

impl GameSettings {
    /// Get the path to the settings file
    fn settings_path() -> PathBuf {
        PathBuf::from("settings.ron")
    }

    /// Load settings from file, or return default if file doesn't exist
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(settings) => {
                        info!("Loaded settings from {:?}", path);
                        settings
                    }
                    Err(e) => {
                        warn!("Failed to parse settings file: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings file: {}", e);
                    Self::default()
                }
            }
        } else {
            info!("No settings file found, using defaults");
            Self::default()
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::settings_path();
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(&path, contents)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Plugin for managing game settings
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = GameSettings::load();

        // Also insert keybindings as a separate resource for easy access
        let keybindings = settings.keybindings.clone();

        app.insert_resource(settings)
            .insert_resource(keybindings)
            .add_systems(PostStartup, apply_saved_loadout)
            .add_systems(Update, (save_settings_on_change, sync_keybindings));
    }
}

/// Equip the saved ability selection and element levels onto the player.
/// Runs after arena setup so the player entity exists. Saved abilities with
/// no definition (or duplicate slots from a hand-edited file) are skipped
/// with a warning rather than aborting the session.
fn apply_saved_loadout(
    settings: Res<GameSettings>,
    definitions: Res<AbilityDefinitions>,
    mut players: Query<(&mut AbilityLoadout, &mut ElementalStats), With<Player>>,
) {
    for (mut loadout, mut stats) in players.iter_mut() {
        *stats = settings.element_levels;

        for (slot, selected) in settings.selected_abilities.iter().enumerate() {
            let Some(ability) = selected else { continue };
            let Some(config) = definitions.get(ability) else {
                warn!("Saved ability {:?} has no definition; skipping", ability);
                continue;
            };
            if let Err(e) = loadout.equip(*ability, config, slot) {
                warn!("Could not equip saved ability {:?}: {}", ability, e);
            }
        }
        info!("Equipped {} saved abilities", loadout.equipped_count());
    }
}

/// System to save settings when they change
fn save_settings_on_change(settings: Res<GameSettings>) {
    if settings.is_changed() && !settings.is_added() {
        if let Err(e) = settings.save() {
            error!("Failed to save settings: {}", e);
        }
    }
}

/// System to keep Keybindings resource in sync with GameSettings
fn sync_keybindings(settings: Res<GameSettings>, mut keybindings: ResMut<Keybindings>) {
    if settings.is_changed() && !settings.is_added() {
        *keybindings = settings.keybindings.clone();
        info!("Synced keybindings from settings");
    }
}
