//! Data-driven ability configuration
//!
//! Ability definitions live in `assets/config/abilities.ron` rather than in
//! Rust code, so balance changes don't require recompilation. Definitions
//! are validated once at startup; a cast never has to cope with a broken
//! config.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The elements abilities are attuned to. A caster's matching element level
/// multiplies the ability's damage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementType {
    Fire,
    Water,
    Earth,
    Wind,
}

/// Enum of the castable abilities.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AbilityType {
    /// Water projectile, single target
    FrostBolt,
    /// Fire projectile, single target
    FireBall,
    /// Water area burst around the caster
    Blizzard,
    /// Fire area burst at a forward offset
    Meteor,
    /// Water wall zone with continuous damage ticks
    FrostWall,
    /// Water wave front with knockback
    WaterWave,
    /// Fire wave front with knockback
    BlastWave,
}

impl AbilityType {
    /// All ability types, for exhaustive validation and UI listings.
    pub fn all() -> [AbilityType; 7] {
        [
            AbilityType::FrostBolt,
            AbilityType::FireBall,
            AbilityType::Blizzard,
            AbilityType::Meteor,
            AbilityType::FrostWall,
            AbilityType::WaterWave,
            AbilityType::BlastWave,
        ]
    }

    /// Parse a config/scenario name back into an ability type.
    pub fn parse(name: &str) -> Result<AbilityType, String> {
        match name {
            "FrostBolt" => Ok(AbilityType::FrostBolt),
            "FireBall" => Ok(AbilityType::FireBall),
            "Blizzard" => Ok(AbilityType::Blizzard),
            "Meteor" => Ok(AbilityType::Meteor),
            "FrostWall" => Ok(AbilityType::FrostWall),
            "WaterWave" => Ok(AbilityType::WaterWave),
            "BlastWave" => Ok(AbilityType::BlastWave),
            _ => Err(format!(
                "Unknown ability: '{}'. Valid abilities: FrostBolt, FireBall, Blizzard, \
                 Meteor, FrostWall, WaterWave, BlastWave",
                name
            )),
        }
    }
}

/// The effect an ability produces when its cast delay expires, with the
/// parameters specific to each kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EffectKind {
    /// Travels horizontally, despawns on first enemy hit
    Projectile {
        /// Travel speed in units/second
        speed: f32,
        /// Maximum travel distance before fizzling
        max_distance: f32,
    },
    /// Instant damage to every enemy inside a radius, once per enemy
    AreaBurst {
        /// Burst radius in units
        radius: f32,
        /// Distance in front of the caster where the burst centers
        forward_offset: f32,
    },
    /// Stationary zone that damages occupants on a fixed tick interval
    Wall {
        /// Zone half-width and half-height in units
        half_extents: (f32, f32),
        /// Distance in front of the caster where the wall spawns
        forward_offset: f32,
        /// Zone lifetime in seconds
        duration: f32,
        /// Seconds between damage applications to occupants
        tick_interval: f32,
    },
    /// Advancing front that damages each enemy once and shoves them back
    Wave {
        /// Travel speed in units/second
        speed: f32,
        /// Maximum travel distance
        max_distance: f32,
        /// Front width perpendicular to travel
        width: f32,
        /// Knockback displacement applied on hit
        knockback: f32,
    },
}

impl EffectKind {
    /// Validate kind-specific parameters.
    fn validate(&self) -> Result<(), String> {
        match self {
            EffectKind::Projectile { speed, max_distance } => {
                if *speed <= 0.0 {
                    return Err(format!("projectile speed must be positive, got {}", speed));
                }
                if *max_distance <= 0.0 {
                    return Err(format!(
                        "projectile max_distance must be positive, got {}",
                        max_distance
                    ));
                }
            }
            EffectKind::AreaBurst { radius, .. } => {
                if *radius <= 0.0 {
                    return Err(format!("area burst radius must be positive, got {}", radius));
                }
            }
            EffectKind::Wall {
                half_extents,
                duration,
                tick_interval,
                ..
            } => {
                if half_extents.0 <= 0.0 || half_extents.1 <= 0.0 {
                    return Err(format!(
                        "wall half_extents must be positive, got {:?}",
                        half_extents
                    ));
                }
                if *duration <= 0.0 {
                    return Err(format!("wall duration must be positive, got {}", duration));
                }
                if *tick_interval <= 0.0 || *tick_interval > *duration {
                    return Err(format!(
                        "wall tick_interval must be in (0, duration], got {}",
                        tick_interval
                    ));
                }
            }
            EffectKind::Wave {
                speed,
                max_distance,
                width,
                knockback,
            } => {
                if *speed <= 0.0 || *max_distance <= 0.0 || *width <= 0.0 {
                    return Err(format!(
                        "wave speed/max_distance/width must be positive, got {}/{}/{}",
                        speed, max_distance, width
                    ));
                }
                if *knockback < 0.0 {
                    return Err(format!("wave knockback must be non-negative, got {}", knockback));
                }
            }
        }
        Ok(())
    }
}

/// Complete ability definition loaded from RON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityConfig {
    /// Display name of the ability
    pub name: String,
    /// Element the ability is attuned to (scales damage with caster level)
    pub element: ElementType,
    /// Damage before elemental scaling
    pub base_damage: f32,
    /// Cooldown in seconds before elemental/combo scaling
    pub base_cooldown: f32,
    /// Seconds between the key press and the effect spawning (cast animation)
    #[serde(default)]
    pub animation_delay: f32,
    /// Effect produced when the cast fires
    pub effect: EffectKind,
}

impl AbilityConfig {
    /// Validate one definition. Called for every ability at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("ability name must not be empty".to_string());
        }
        if self.base_cooldown <= 0.0 {
            return Err(format!(
                "{}: base_cooldown must be positive, got {}",
                self.name, self.base_cooldown
            ));
        }
        if self.base_damage < 0.0 {
            return Err(format!(
                "{}: base_damage must be non-negative, got {}",
                self.name, self.base_damage
            ));
        }
        if self.animation_delay < 0.0 {
            return Err(format!(
                "{}: animation_delay must be non-negative, got {}",
                self.name, self.animation_delay
            ));
        }
        self.effect
            .validate()
            .map_err(|e| format!("{}: {}", self.name, e))
    }
}

/// Root structure for the abilities.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    pub abilities: HashMap<AbilityType, AbilityConfig>,
}

/// Resource containing all ability definitions.
///
/// Loaded from `assets/config/abilities.ron` at startup.
/// Access via `Res<AbilityDefinitions>` in systems.
#[derive(Resource)]
pub struct AbilityDefinitions {
    definitions: HashMap<AbilityType, AbilityConfig>,
}

impl Default for AbilityDefinitions {
    /// Load ability definitions from the default config file.
    /// Panics if the file cannot be loaded - use for tests only.
    fn default() -> Self {
        load_ability_definitions().expect("Failed to load ability definitions in Default impl")
    }
}

impl AbilityDefinitions {
    pub fn new(config: AbilitiesConfig) -> Self {
        Self {
            definitions: config.abilities,
        }
    }

    /// Get the configuration for an ability type
    pub fn get(&self, ability: &AbilityType) -> Option<&AbilityConfig> {
        self.definitions.get(ability)
    }

    /// Get the configuration for an ability type, panicking if not found.
    /// Use this when you know the ability must exist (validated at startup).
    pub fn get_unchecked(&self, ability: &AbilityType) -> &AbilityConfig {
        self.definitions
            .get(ability)
            .unwrap_or_else(|| panic!("Ability {:?} not found in definitions", ability))
    }

    /// Check that every ability type is defined and every definition is sane.
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<AbilityType> = AbilityType::all()
            .into_iter()
            .filter(|ability| !self.definitions.contains_key(ability))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing ability definitions: {:?}", missing));
        }

        for config in self.definitions.values() {
            config.validate()?;
        }
        Ok(())
    }

    pub fn ability_types(&self) -> impl Iterator<Item = &AbilityType> {
        self.definitions.keys()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Load ability definitions from assets/config/abilities.ron
pub fn load_ability_definitions() -> Result<AbilityDefinitions, String> {
    let config_path = "assets/config/abilities.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let config: AbilitiesConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    let definitions = AbilityDefinitions::new(config);
    definitions.validate()?;

    info!(
        "Loaded {} ability definitions from {}",
        definitions.len(),
        config_path
    );

    Ok(definitions)
}

/// Bevy plugin for ability configuration loading
pub struct AbilityConfigPlugin;

impl Plugin for AbilityConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_ability_definitions() {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                // The config must always be valid; a broken file is a
                // deployment error, not something to limp past.
                panic!("Failed to load ability definitions: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile_config() -> AbilityConfig {
        AbilityConfig {
            name: "Test Bolt".to_string(),
            element: ElementType::Water,
            base_damage: 10.0,
            base_cooldown: 5.0,
            animation_delay: 0.3,
            effect: EffectKind::Projectile {
                speed: 20.0,
                max_distance: 40.0,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(projectile_config().validate().is_ok());
    }

    #[test]
    fn test_non_positive_cooldown_rejected() {
        let mut config = projectile_config();
        config.base_cooldown = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_damage_rejected() {
        let mut config = projectile_config();
        config.base_damage = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wall_tick_interval_exceeding_duration_rejected() {
        let config = AbilityConfig {
            name: "Test Wall".to_string(),
            element: ElementType::Water,
            base_damage: 8.0,
            base_cooldown: 10.0,
            animation_delay: 0.3,
            effect: EffectKind::Wall {
                half_extents: (0.5, 2.0),
                forward_offset: 2.0,
                duration: 1.0,
                tick_interval: 2.0,
            },
        };
        assert!(config.validate().is_err());
    }
}
