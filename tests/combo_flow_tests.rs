//! Integration tests for the combo -> cooldown reduction flow
//!
//! Drives the combo meter, ability timers, and loadout together the way the
//! combat systems do each frame, and checks the end-to-end guarantees:
//! hits discount every cooling ability immediately, decay resets never
//! lengthen a cooldown, and casts read the multiplier at effect fire.

use combocast::abilities::config::{AbilityConfig, EffectKind, ElementType};
use combocast::abilities::{AbilityLoadout, AbilityType, TickOutcome};
use combocast::combat::combo::{ComboChange, ComboMeter, ComboTuning, ResponseCurve};

fn linear_meter() -> ComboMeter {
    ComboMeter::new(ComboTuning {
        decay_window: 3.0,
        max_reduction: 0.5,
        max_combo_for_max_reduction: 20,
        curve: ResponseCurve::Linear,
    })
}

fn config(name: &str, cooldown: f32) -> AbilityConfig {
    AbilityConfig {
        name: name.to_string(),
        element: ElementType::Water,
        base_damage: 10.0,
        base_cooldown: cooldown,
        animation_delay: 0.0,
        effect: EffectKind::Projectile {
            speed: 12.0,
            max_distance: 18.0,
        },
    }
}

/// A hit landing mid-cooldown shortens every cooling ability in the same
/// step, proportionally to remaining time.
#[test]
fn test_hit_discounts_all_cooling_abilities_immediately() {
    let mut combo = linear_meter();
    let mut loadout = AbilityLoadout::default();
    loadout
        .equip(AbilityType::FrostBolt, &config("Frost Bolt", 10.0), 0)
        .unwrap();
    loadout
        .equip(AbilityType::FireBall, &config("Fire Ball", 20.0), 1)
        .unwrap();

    // Both cast at multiplier 1.0
    for slot in 0..2 {
        let timer = &mut loadout.slot_mut(slot).unwrap().timer;
        assert!(timer.try_cast());
        assert_eq!(timer.tick(0.0), TickOutcome::EffectDue);
        timer.on_cast_effect_fired(combo.reduction_multiplier());
    }

    // 10 hits land: linear 10/20 at max_reduction 0.5 -> multiplier 0.75
    let multiplier = (0..10).map(|_| combo.register_hit(1)).last().unwrap();
    assert!((multiplier - 0.75).abs() < 1e-6);
    loadout.broadcast_multiplier(multiplier);

    assert!((loadout.slot(0).unwrap().timer.remaining_cooldown() - 7.5).abs() < 1e-4);
    assert!((loadout.slot(1).unwrap().timer.remaining_cooldown() - 15.0).abs() < 1e-4);
}

/// After the decay window lapses the chain resets to zero, but cooldowns
/// started under a discount are not retroactively lengthened.
#[test]
fn test_decay_reset_keeps_earned_discounts() {
    let mut combo = linear_meter();
    let mut loadout = AbilityLoadout::default();
    loadout
        .equip(AbilityType::FrostBolt, &config("Frost Bolt", 10.0), 0)
        .unwrap();

    for _ in 0..10 {
        combo.register_hit(1);
    }

    // Cast while the combo is hot: 10s base at x0.75 -> 7.5s
    let timer = &mut loadout.slot_mut(0).unwrap().timer;
    timer.try_cast();
    timer.tick(0.0);
    timer.on_cast_effect_fired(combo.reduction_multiplier());
    assert!((timer.remaining_cooldown() - 7.5).abs() < 1e-4);

    // Let the window lapse
    assert_eq!(combo.tick(3.1), ComboChange::Reset);
    assert_eq!(combo.combo_count(), 0);
    assert_eq!(combo.reduction_multiplier(), 1.0);

    let before = loadout.slot(0).unwrap().timer.remaining_cooldown();
    loadout.broadcast_multiplier(1.0);
    assert_eq!(loadout.slot(0).unwrap().timer.remaining_cooldown(), before);
}

/// The cooldown discount is read when the effect fires, not when the key
/// is pressed, so hits landing during the cast animation still count.
#[test]
fn test_multiplier_read_at_effect_fire_not_key_press() {
    let mut combo = linear_meter();
    let mut loadout = AbilityLoadout::default();
    let mut ability = config("Frost Bolt", 10.0);
    ability.animation_delay = 0.3;
    loadout
        .equip(AbilityType::FrostBolt, &ability, 0)
        .unwrap();

    // Key press with no combo running
    assert!(loadout.slot_mut(0).unwrap().timer.try_cast());

    // Hits land during the animation delay
    for _ in 0..10 {
        combo.register_hit(1);
    }

    let timer = &mut loadout.slot_mut(0).unwrap().timer;
    assert_eq!(timer.tick(0.3), TickOutcome::EffectDue);
    timer.on_cast_effect_fired(combo.reduction_multiplier());
    assert!((timer.remaining_cooldown() - 7.5).abs() < 1e-4);
}

/// Growing the chain while an ability cools keeps compounding the discount
/// through the start-multiplier ratio, never past the configured floor.
#[test]
fn test_chain_growth_compounds_but_respects_floor() {
    let mut combo = linear_meter();
    let mut loadout = AbilityLoadout::default();
    loadout
        .equip(AbilityType::FrostBolt, &config("Frost Bolt", 10.0), 0)
        .unwrap();

    let timer = &mut loadout.slot_mut(0).unwrap().timer;
    timer.try_cast();
    timer.tick(0.0);
    timer.on_cast_effect_fired(1.0);

    let mut previous = loadout.slot(0).unwrap().timer.remaining_cooldown();
    for _ in 0..40 {
        let multiplier = combo.register_hit(1);
        loadout.broadcast_multiplier(multiplier);
        let remaining = loadout.slot(0).unwrap().timer.remaining_cooldown();
        assert!(remaining <= previous);
        previous = remaining;
    }

    // Saturated chain: remaining can shrink to half the original, no further
    assert!(previous >= 10.0 * 0.5 - 1e-4);
    assert!((combo.reduction_multiplier() - 0.5).abs() < 1e-6);
}

/// A saturated chain keeps the window open on further hits without pushing
/// the multiplier past the floor.
#[test]
fn test_hits_past_saturation_only_refresh_window() {
    let mut combo = linear_meter();
    for _ in 0..20 {
        combo.register_hit(1);
    }
    let at_cap = combo.reduction_multiplier();

    combo.tick(2.5);
    combo.register_hit(1);
    assert_eq!(combo.reduction_multiplier(), at_cap);
    assert_eq!(combo.decay_remaining(), 3.0);
}
