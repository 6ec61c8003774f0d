//! Ability loadout registry
//!
//! Holds the four input slots a character can bind abilities to, owns the
//! runtime timer for each equipped ability, and fans combo multiplier
//! changes out to every live timer. Abilities are registered explicitly at
//! equip time; nothing scans the world looking for them.

use bevy::prelude::*;
use std::fmt;

use super::config::{AbilityConfig, AbilityType};
use super::timer::AbilityTimer;

/// Number of input slots a loadout offers.
pub const MAX_SLOTS: usize = 4;

/// Why an equip/unequip call was rejected. All of these are no-ops on the
/// loadout; the caller surfaces them to the UI ("slot full", "not equipped").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadoutError {
    /// Slot index outside 0..MAX_SLOTS
    InvalidSlot,
    /// Target slot already holds an ability
    SlotOccupied,
    /// Unequip aimed at an empty slot
    SlotEmpty,
    /// The ability is already bound to another slot
    AlreadyEquipped,
    /// Every slot is taken
    LoadoutFull,
}

impl fmt::Display for LoadoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            LoadoutError::InvalidSlot => "slot index out of range",
            LoadoutError::SlotOccupied => "slot already occupied",
            LoadoutError::SlotEmpty => "no ability bound to slot",
            LoadoutError::AlreadyEquipped => "ability already equipped in another slot",
            LoadoutError::LoadoutFull => "loadout full",
        };
        f.write_str(message)
    }
}

/// One equipped ability: its identity plus the runtime cooldown state that
/// exists only while it stays equipped.
#[derive(Clone, Debug)]
pub struct EquippedAbility {
    pub ability: AbilityType,
    pub timer: AbilityTimer,
}

/// The character's equipped abilities, one per input slot.
#[derive(Component, Default)]
pub struct AbilityLoadout {
    slots: [Option<EquippedAbility>; MAX_SLOTS],
}

impl AbilityLoadout {
    /// Bind `ability` to `slot`, creating fresh runtime state from its
    /// definition. Re-equipping after an unequip starts from Idle with the
    /// full cooldown available; no stale state carries over.
    pub fn equip(
        &mut self,
        ability: AbilityType,
        config: &AbilityConfig,
        slot: usize,
    ) -> Result<(), LoadoutError> {
        if slot >= MAX_SLOTS {
            return Err(LoadoutError::InvalidSlot);
        }
        if self.slot_of(ability).is_some() {
            return Err(LoadoutError::AlreadyEquipped);
        }
        if self.slots[slot].is_some() {
            return Err(LoadoutError::SlotOccupied);
        }
        self.slots[slot] = Some(EquippedAbility {
            ability,
            timer: AbilityTimer::new(config.base_cooldown, config.animation_delay),
        });
        Ok(())
    }

    /// Bind `ability` to the first free slot.
    pub fn equip_first_free(
        &mut self,
        ability: AbilityType,
        config: &AbilityConfig,
    ) -> Result<usize, LoadoutError> {
        if self.slot_of(ability).is_some() {
            return Err(LoadoutError::AlreadyEquipped);
        }
        let slot = self
            .slots
            .iter()
            .position(|s| s.is_none())
            .ok_or(LoadoutError::LoadoutFull)?;
        self.equip(ability, config, slot)?;
        Ok(slot)
    }

    /// Remove whatever is bound to `slot`, destroying its runtime state.
    /// A cast in flight is cancelled outright: the timer goes with the
    /// slot, so the pending effect never fires.
    pub fn unequip(&mut self, slot: usize) -> Result<AbilityType, LoadoutError> {
        if slot >= MAX_SLOTS {
            return Err(LoadoutError::InvalidSlot);
        }
        self.slots[slot]
            .take()
            .map(|equipped| equipped.ability)
            .ok_or(LoadoutError::SlotEmpty)
    }

    /// Which slot an ability occupies, if any. Resolves a key press to the
    /// right timer.
    pub fn slot_of(&self, ability: AbilityType) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|e| e.ability == ability))
    }

    pub fn slot(&self, slot: usize) -> Option<&EquippedAbility> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut EquippedAbility> {
        self.slots.get_mut(slot).and_then(|s| s.as_mut())
    }

    /// Iterate over occupied slots as (slot index, equipped ability).
    pub fn equipped(&self) -> impl Iterator<Item = (usize, &EquippedAbility)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }

    pub fn equipped_mut(&mut self) -> impl Iterator<Item = (usize, &mut EquippedAbility)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|e| (i, e)))
    }

    pub fn equipped_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Push a combo multiplier change to every equipped timer. Timers not
    /// on cooldown ignore it.
    pub fn broadcast_multiplier(&mut self, multiplier: f32) {
        for (_, equipped) in self.equipped_mut() {
            equipped.timer.apply_multiplier_change(multiplier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::config::{ElementType, EffectKind};

    fn config(cooldown: f32) -> AbilityConfig {
        AbilityConfig {
            name: "Test".to_string(),
            element: ElementType::Water,
            base_damage: 10.0,
            base_cooldown: cooldown,
            animation_delay: 0.3,
            effect: EffectKind::Projectile {
                speed: 20.0,
                max_distance: 40.0,
            },
        }
    }

    #[test]
    fn test_equip_and_resolve_slot() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 2)
            .unwrap();
        assert_eq!(loadout.slot_of(AbilityType::FrostBolt), Some(2));
        assert_eq!(loadout.slot_of(AbilityType::FireBall), None);
        assert_eq!(loadout.equipped_count(), 1);
    }

    #[test]
    fn test_equip_rejects_duplicate_ability() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 0)
            .unwrap();
        assert_eq!(
            loadout.equip(AbilityType::FrostBolt, &config(5.0), 1),
            Err(LoadoutError::AlreadyEquipped)
        );
    }

    #[test]
    fn test_equip_rejects_occupied_slot_and_bad_index() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 0)
            .unwrap();
        assert_eq!(
            loadout.equip(AbilityType::FireBall, &config(5.0), 0),
            Err(LoadoutError::SlotOccupied)
        );
        assert_eq!(
            loadout.equip(AbilityType::FireBall, &config(5.0), MAX_SLOTS),
            Err(LoadoutError::InvalidSlot)
        );
    }

    #[test]
    fn test_fifth_ability_rejected_loadout_unchanged() {
        let mut loadout = AbilityLoadout::default();
        let abilities = [
            AbilityType::FrostBolt,
            AbilityType::FireBall,
            AbilityType::Blizzard,
            AbilityType::Meteor,
        ];
        for ability in abilities {
            loadout.equip_first_free(ability, &config(5.0)).unwrap();
        }

        // Put slot 1 on cooldown so we can verify timers are untouched
        let equipped = loadout.slot_mut(1).unwrap();
        equipped.timer.try_cast();
        equipped.timer.tick(0.3);
        equipped.timer.on_cast_effect_fired(1.0);
        let remaining_before = loadout.slot(1).unwrap().timer.remaining_cooldown();

        assert_eq!(
            loadout.equip_first_free(AbilityType::WaterWave, &config(5.0)),
            Err(LoadoutError::LoadoutFull)
        );
        assert_eq!(loadout.equipped_count(), 4);
        for (i, ability) in abilities.iter().enumerate() {
            assert_eq!(loadout.slot(i).unwrap().ability, *ability);
        }
        assert_eq!(
            loadout.slot(1).unwrap().timer.remaining_cooldown(),
            remaining_before
        );
    }

    #[test]
    fn test_unequip_then_reequip_resets_runtime_state() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 2)
            .unwrap();

        // Put it on cooldown
        let equipped = loadout.slot_mut(2).unwrap();
        equipped.timer.try_cast();
        equipped.timer.tick(0.3);
        equipped.timer.on_cast_effect_fired(1.0);
        assert!(loadout.slot(2).unwrap().timer.remaining_cooldown() > 0.0);

        assert_eq!(loadout.unequip(2), Ok(AbilityType::FrostBolt));
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 2)
            .unwrap();

        let timer = &loadout.slot(2).unwrap().timer;
        assert!(timer.is_ready());
        assert_eq!(timer.remaining_cooldown(), 0.0);
    }

    #[test]
    fn test_unequip_empty_slot_is_error() {
        let mut loadout = AbilityLoadout::default();
        assert_eq!(loadout.unequip(0), Err(LoadoutError::SlotEmpty));
        assert_eq!(loadout.unequip(MAX_SLOTS), Err(LoadoutError::InvalidSlot));
    }

    #[test]
    fn test_unequip_mid_cast_cancels_pending_effect() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(5.0), 0)
            .unwrap();
        loadout.slot_mut(0).unwrap().timer.try_cast();
        assert!(loadout.slot(0).unwrap().timer.is_casting());

        loadout.unequip(0).unwrap();
        // The timer (and its pending cast) is gone with the slot
        assert!(loadout.slot(0).is_none());
    }

    #[test]
    fn test_broadcast_rescales_only_cooling_timers() {
        let mut loadout = AbilityLoadout::default();
        loadout
            .equip(AbilityType::FrostBolt, &config(10.0), 0)
            .unwrap();
        loadout
            .equip(AbilityType::FireBall, &config(10.0), 1)
            .unwrap();

        // Slot 0 on cooldown, slot 1 idle
        let equipped = loadout.slot_mut(0).unwrap();
        equipped.timer.try_cast();
        equipped.timer.tick(0.3);
        equipped.timer.on_cast_effect_fired(1.0);

        loadout.broadcast_multiplier(0.8);

        assert!((loadout.slot(0).unwrap().timer.remaining_cooldown() - 8.0).abs() < 1e-4);
        assert!(loadout.slot(1).unwrap().timer.is_ready());
    }
}
