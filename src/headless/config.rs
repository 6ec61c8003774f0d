//! JSON configuration parsing for headless mode
//!
//! Parses scenario files describing the loadout, the targets, and a timed
//! cast script, and validates them before the simulation starts.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::abilities::config::AbilityType;
use crate::abilities::loadout::MAX_SLOTS;
use crate::arena::{ElementalStats, MAX_ELEMENT_LEVEL};

/// One target dummy placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    /// Hit points (default: 100)
    #[serde(default = "default_enemy_health")]
    pub health: f32,
}

/// One scripted key press: cast the ability in `slot` once the scenario
/// clock reaches `at` seconds. Presses on busy slots fall through silently,
/// exactly like a real key press would.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptedCast {
    pub at: f32,
    pub slot: usize,
}

/// Headless scenario configuration loaded from JSON
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct HeadlessScenarioConfig {
    /// Ability names to equip, in slot order (1-4 entries)
    pub loadout: Vec<String>,
    /// Target dummies to spawn (default: a row of four)
    #[serde(default = "default_enemies")]
    pub enemies: Vec<EnemySpawn>,
    /// Caster's elemental upgrade levels
    #[serde(default)]
    pub element_levels: ElementalStats,
    /// Timed cast script
    #[serde(default)]
    pub script: Vec<ScriptedCast>,
    /// Maximum scenario duration in seconds (default: 30)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic scenario reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_enemy_health() -> f32 {
    100.0
}

fn default_enemies() -> Vec<EnemySpawn> {
    (0..4)
        .map(|i| EnemySpawn {
            x: 3.0 + i as f32 * 2.5,
            y: 0.0,
            health: default_enemy_health(),
        })
        .collect()
}

fn default_max_duration() -> f32 {
    30.0
}

impl HeadlessScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: HeadlessScenarioConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.loadout.is_empty() || self.loadout.len() > MAX_SLOTS {
            return Err(format!("loadout must have 1-{} abilities", MAX_SLOTS));
        }
        for (i, name) in self.loadout.iter().enumerate() {
            let ability = AbilityType::parse(name)?;
            for earlier in &self.loadout[..i] {
                if AbilityType::parse(earlier)? == ability {
                    return Err(format!("duplicate ability in loadout: '{}'", name));
                }
            }
        }

        if self.enemies.is_empty() {
            return Err("at least one enemy is required".to_string());
        }
        for enemy in &self.enemies {
            if enemy.health <= 0.0 {
                return Err(format!("enemy health must be positive, got {}", enemy.health));
            }
        }

        for cast in &self.script {
            if cast.slot >= self.loadout.len() {
                return Err(format!(
                    "script cast at {}s targets slot {} but only {} abilities are equipped",
                    cast.at,
                    cast.slot,
                    self.loadout.len()
                ));
            }
            if cast.at < 0.0 {
                return Err(format!("script cast time must be non-negative, got {}", cast.at));
            }
        }

        for (element, level) in [
            ("fire", self.element_levels.fire),
            ("water", self.element_levels.water),
            ("earth", self.element_levels.earth),
            ("wind", self.element_levels.wind),
        ] {
            if level > MAX_ELEMENT_LEVEL {
                return Err(format!(
                    "{} level {} exceeds maximum {}",
                    element, level, MAX_ELEMENT_LEVEL
                ));
            }
        }

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }

    /// Resolve the loadout names into ability types, in slot order.
    pub fn to_loadout(&self) -> Result<Vec<AbilityType>, String> {
        self.loadout.iter().map(|s| AbilityType::parse(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> HeadlessScenarioConfig {
        HeadlessScenarioConfig {
            loadout: vec!["FrostBolt".to_string(), "FireBall".to_string()],
            enemies: default_enemies(),
            element_levels: ElementalStats::default(),
            script: vec![
                ScriptedCast { at: 0.1, slot: 0 },
                ScriptedCast { at: 0.5, slot: 1 },
            ],
            max_duration_secs: 10.0,
            random_seed: Some(42),
            output_path: None,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_unknown_ability_rejected() {
        let mut config = base_config();
        config.loadout[0] = "Fireball".to_string(); // wrong casing
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_loadout_rejected() {
        let mut config = base_config();
        config.loadout[1] = "FrostBolt".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_loadout_rejected() {
        let mut config = base_config();
        config.loadout = vec![
            "FrostBolt".to_string(),
            "FireBall".to_string(),
            "Blizzard".to_string(),
            "Meteor".to_string(),
            "FrostWall".to_string(),
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_script_slot_out_of_range_rejected() {
        let mut config = base_config();
        config.script.push(ScriptedCast { at: 1.0, slot: 2 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_element_level_cap_enforced() {
        let mut config = base_config();
        config.element_levels.fire = MAX_ELEMENT_LEVEL + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_defaults() {
        let config: HeadlessScenarioConfig = serde_json::from_str(
            r#"{"loadout": ["FrostBolt"], "script": [{"at": 0.0, "slot": 0}]}"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemies.len(), 4);
        assert_eq!(config.max_duration_secs, 30.0);
        assert_eq!(config.random_seed, None);
    }
}
