//! Abilities: data-driven definitions, per-slot cooldown timers, the cast
//! pipeline, and the effect entities casts produce.

pub mod casting;
pub mod config;
pub mod effects;
pub mod loadout;
pub mod timer;

pub use config::{AbilityConfig, AbilityDefinitions, AbilityType, EffectKind, ElementType};
pub use loadout::{AbilityLoadout, EquippedAbility, LoadoutError, MAX_SLOTS};
pub use timer::{AbilityTimer, CastState, TickOutcome};
