//! Combat events
//!
//! Defines the events that flow between the cast pipeline, the combo meter,
//! and the logging systems within a single frame.

use bevy::prelude::*;

use crate::abilities::config::AbilityType;

/// An effect touched an eligible target. Ephemeral: consumed in the same
/// frame to apply damage and feed the combo meter, never persisted.
#[derive(Event, Clone, Copy, Debug)]
pub struct AbilityHitEvent {
    /// Entity that was hit
    pub target: Entity,
    /// Damage to apply (already elementally scaled)
    pub amount: f32,
    /// Ability whose effect landed the hit
    pub source: AbilityType,
    /// Combo weight this hit contributes (normally 1)
    pub combo_weight: u32,
}

/// Damage was actually applied to a target's health.
#[derive(Event, Clone, Copy, Debug)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: f32,
    pub source: AbilityType,
}

/// A cast finished its animation delay and spawned its effect.
#[derive(Event, Clone, Copy, Debug)]
pub struct AbilityCastEvent {
    pub caster: Entity,
    pub ability: AbilityType,
    pub slot: usize,
    /// Cooldown the ability entered, after the combo discount
    pub cooldown_started: f32,
}

/// The combo meter moved: a hit extended the chain or the decay window
/// lapsed. Presentation listens to this; ability timers are rescaled
/// synchronously by the broadcast system, not through this event.
#[derive(Event, Clone, Copy, Debug)]
pub struct ComboChangedEvent {
    pub combo_count: u32,
    pub multiplier: f32,
}

/// An enemy ran out of health this frame.
#[derive(Event, Clone, Copy, Debug)]
pub struct EnemyDeathEvent {
    pub enemy: Entity,
}
