//! Arena entities
//!
//! The playable scene: one sorcerer, a row of target dummies, and the
//! health bookkeeping abilities damage through. Rendering stays minimal
//! (colored sprites); collision is plain distance math against a fixed
//! enemy hit radius.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::combat::events::EnemyDeathEvent;
use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::abilities::config::ElementType;
use crate::abilities::loadout::AbilityLoadout;

/// Radius used when testing whether an effect overlaps an enemy.
pub const ENEMY_HIT_RADIUS: f32 = 0.6;

/// Seeded random number generator for deterministic simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same scenario. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Marker for the player character.
#[derive(Component)]
pub struct Player;

/// Which way the character faces; effects spawn and travel this way.
#[derive(Component, Clone, Copy, PartialEq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Unit x direction for this facing.
    pub fn direction(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Per-character elemental upgrade levels, each in [0, 5].
///
/// A level multiplies the damage of abilities attuned to that element.
/// Level 0 means no bonus (multiplier exactly 1.0).
#[derive(Component, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ElementalStats {
    pub fire: u8,
    pub water: u8,
    pub earth: u8,
    pub wind: u8,
}

/// Highest reachable elemental level.
pub const MAX_ELEMENT_LEVEL: u8 = 5;

impl ElementalStats {
    pub fn level(&self, element: ElementType) -> u8 {
        match element {
            ElementType::Fire => self.fire,
            ElementType::Water => self.water,
            ElementType::Earth => self.earth,
            ElementType::Wind => self.wind,
        }
    }

    /// Raise an element level, saturating at [`MAX_ELEMENT_LEVEL`].
    pub fn upgrade(&mut self, element: ElementType, points: u8) {
        let slot = match element {
            ElementType::Fire => &mut self.fire,
            ElementType::Water => &mut self.water,
            ElementType::Earth => &mut self.earth,
            ElementType::Wind => &mut self.wind,
        };
        *slot = (*slot + points).min(MAX_ELEMENT_LEVEL);
    }

    /// Damage multiplier for an ability of the given element:
    /// `1 + level * 0.4`, so 1.0 at level 0 up to 3.0 at level 5.
    pub fn damage_multiplier(&self, element: ElementType) -> f32 {
        1.0 + self.level(element).min(MAX_ELEMENT_LEVEL) as f32 * 0.4
    }
}

/// Marker for damageable targets.
#[derive(Component)]
pub struct Enemy;

/// Hit points for anything abilities can damage.
#[derive(Component, Clone, Debug)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, saturating at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// Marker for all entities spawned for the arena scene, for cleanup.
#[derive(Component)]
pub struct ArenaEntity;

/// Spawn the player and a scattered line of target dummies for the
/// graphical mode.
pub fn setup_arena(mut commands: Commands, mut rng: ResMut<GameRng>) {
    // World units are small (enemy radius 0.6); zoom the camera so the
    // arena fills the window.
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scale: 1.0 / 40.0,
            ..OrthographicProjection::default_2d()
        },
        ArenaEntity,
    ));

    commands.spawn((
        Player,
        Facing::Right,
        ElementalStats::default(),
        AbilityLoadout::default(),
        Sprite::from_color(Color::srgb(0.3, 0.5, 0.9), Vec2::new(0.8, 1.4)),
        Transform::from_xyz(-6.0, 0.0, 0.0),
        ArenaEntity,
    ));

    for i in 0..4 {
        let x = 3.0 + i as f32 * 2.5 + rng.random_range(-0.4, 0.4);
        let y = rng.random_range(-1.0, 1.0);
        commands.spawn((
            Enemy,
            Health::new(100.0),
            Sprite::from_color(Color::srgb(0.8, 0.3, 0.3), Vec2::new(0.8, 1.2)),
            Transform::from_xyz(x, y, 0.0),
            ArenaEntity,
        ));
    }

    info!("Arena ready: 1 sorcerer, 4 target dummies");
}

/// Remove enemies whose health reached zero and announce their death.
pub fn despawn_dead_enemies(
    mut commands: Commands,
    mut death_events: EventWriter<EnemyDeathEvent>,
    mut combat_log: ResMut<CombatLog>,
    enemies: Query<(Entity, &Health), With<Enemy>>,
) {
    for (entity, health) in enemies.iter() {
        if !health.is_alive() {
            death_events.send(EnemyDeathEvent { enemy: entity });
            combat_log.log(
                CombatLogEventType::EnemyDeath,
                format!("Enemy {:?} destroyed", entity),
            );
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_saturates_at_zero() {
        let mut health = Health::new(50.0);
        health.take_damage(30.0);
        assert_eq!(health.current, 20.0);
        assert!(health.is_alive());
        health.take_damage(100.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_element_multiplier_range() {
        let mut stats = ElementalStats::default();
        assert_eq!(stats.damage_multiplier(ElementType::Fire), 1.0);

        stats.upgrade(ElementType::Fire, 3);
        assert!((stats.damage_multiplier(ElementType::Fire) - 2.2).abs() < 1e-6);

        // Saturates at level 5 -> x3.0
        stats.upgrade(ElementType::Fire, 10);
        assert_eq!(stats.level(ElementType::Fire), MAX_ELEMENT_LEVEL);
        assert!((stats.damage_multiplier(ElementType::Fire) - 3.0).abs() < 1e-6);

        // Other elements untouched
        assert_eq!(stats.damage_multiplier(ElementType::Water), 1.0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut rng1 = GameRng::from_seed(42);
        let mut rng2 = GameRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.random_f32(), rng2.random_f32());
        }
    }

    #[test]
    fn test_facing_direction() {
        assert_eq!(Facing::Right.direction(), 1.0);
        assert_eq!(Facing::Left.direction(), -1.0);
    }
}
