//! Combo meter and cooldown reduction
//!
//! Tracks a rolling count of successful ability hits. Every hit extends a
//! short decay window; letting the window lapse resets the chain. The count
//! feeds a configurable response curve that converts combo momentum into a
//! global cooldown discount applied to every equipped ability.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Monotonic interpolation from (0,0) to (1,1) mapping normalized combo
/// progress to a fraction of the maximum cooldown reduction.
///
/// The curve governs game feel: EaseIn rewards long chains, EaseOut makes
/// early hits matter most. Selected in `assets/config/combo.ron` so balance
/// changes don't require recompilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCurve {
    /// Straight line: reduction scales linearly with combo count
    Linear,
    /// Quadratic ease-in: slow start, steep finish
    EaseIn,
    /// Quadratic ease-out: steep start, flat finish
    EaseOut,
    /// Hermite smoothstep: gentle at both ends
    Smoothstep,
}

impl ResponseCurve {
    /// Evaluate the curve at `t` in [0, 1]. Input is clamped.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ResponseCurve::Linear => t,
            ResponseCurve::EaseIn => t * t,
            ResponseCurve::EaseOut => t * (2.0 - t),
            ResponseCurve::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        ResponseCurve::EaseIn
    }
}

/// Tuning values for the combo meter, loaded from `assets/config/combo.ron`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComboTuning {
    /// Seconds without a hit before the combo chain resets
    pub decay_window: f32,
    /// Largest cooldown reduction fraction reachable (0.5 = cooldowns halved)
    pub max_reduction: f32,
    /// Combo count at which `max_reduction` is fully reached
    pub max_combo_for_max_reduction: u32,
    /// Curve shaping how reduction ramps up with combo count
    #[serde(default)]
    pub curve: ResponseCurve,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            decay_window: 3.0,
            max_reduction: 0.5,
            max_combo_for_max_reduction: 20,
            curve: ResponseCurve::default(),
        }
    }
}

impl ComboTuning {
    /// Check that the tuning describes a usable meter.
    ///
    /// Bad values are a configuration error and must be rejected at load
    /// time, never discovered mid-cast.
    pub fn validate(&self) -> Result<(), String> {
        if self.decay_window <= 0.0 {
            return Err(format!(
                "decay_window must be positive, got {}",
                self.decay_window
            ));
        }
        if !(self.max_reduction > 0.0 && self.max_reduction < 1.0) {
            return Err(format!(
                "max_reduction must be in (0, 1), got {}",
                self.max_reduction
            ));
        }
        if self.max_combo_for_max_reduction == 0 {
            return Err("max_combo_for_max_reduction must be at least 1".to_string());
        }
        Ok(())
    }
}

/// What a meter update did, so the caller knows whether to broadcast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComboChange {
    /// Nothing observable happened
    None,
    /// A hit landed; carries the new reduction multiplier
    Increased { multiplier: f32 },
    /// The decay window lapsed; multiplier is back to 1.0
    Reset,
}

/// Process-wide combo state for the active play session.
///
/// Mutated exclusively by hits and the decay tick; ability timers only ever
/// read the multiplier through broadcasts.
#[derive(Resource, Clone, Debug)]
pub struct ComboMeter {
    combo_count: u32,
    decay_remaining: f32,
    tuning: ComboTuning,
}

impl Default for ComboMeter {
    fn default() -> Self {
        Self::new(ComboTuning::default())
    }
}

impl ComboMeter {
    pub fn new(tuning: ComboTuning) -> Self {
        Self {
            combo_count: 0,
            decay_remaining: 0.0,
            tuning,
        }
    }

    /// Current hit count in the active chain.
    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    /// Seconds left before the chain decays (0 when no chain is active).
    pub fn decay_remaining(&self) -> f32 {
        self.decay_remaining.max(0.0)
    }

    pub fn tuning(&self) -> &ComboTuning {
        &self.tuning
    }

    /// Record `weight` successful hits and rewind the decay window.
    ///
    /// Returns the multiplier after the increment so the caller can
    /// broadcast it to every equipped ability in the same frame.
    pub fn register_hit(&mut self, weight: u32) -> f32 {
        self.combo_count += weight;
        self.decay_remaining = self.tuning.decay_window;
        self.reduction_multiplier()
    }

    /// Advance the decay timer. Crossing zero resets the chain.
    pub fn tick(&mut self, dt: f32) -> ComboChange {
        if self.decay_remaining <= 0.0 {
            return ComboChange::None;
        }
        self.decay_remaining -= dt;
        if self.decay_remaining <= 0.0 && self.combo_count > 0 {
            self.reset();
            return ComboChange::Reset;
        }
        ComboChange::None
    }

    /// Drop the chain immediately (decay expiry or session restart).
    pub fn reset(&mut self) {
        self.combo_count = 0;
        self.decay_remaining = 0.0;
    }

    /// Cooldown multiplier for the current combo count.
    ///
    /// Always in `(1 - max_reduction, 1]` and non-increasing as the count
    /// grows: 1.0 with no combo, approaching `1 - max_reduction` at
    /// `max_combo_for_max_reduction` hits.
    pub fn reduction_multiplier(&self) -> f32 {
        if self.combo_count == 0 {
            return 1.0;
        }
        let normalized =
            (self.combo_count as f32 / self.tuning.max_combo_for_max_reduction as f32).clamp(0.0, 1.0);
        let reduction = self.tuning.curve.evaluate(normalized) * self.tuning.max_reduction;
        1.0 - reduction
    }
}

/// Load combo tuning from `assets/config/combo.ron`, falling back to
/// defaults when the file is absent.
pub fn load_combo_tuning() -> Result<ComboTuning, String> {
    let config_path = "assets/config/combo.ron";

    let tuning = match std::fs::read_to_string(config_path) {
        Ok(contents) => ron::from_str::<ComboTuning>(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", config_path, e))?,
        Err(_) => {
            info!("No combo tuning file at {}, using defaults", config_path);
            ComboTuning::default()
        }
    };

    tuning.validate()?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_meter() -> ComboMeter {
        ComboMeter::new(ComboTuning {
            decay_window: 3.0,
            max_reduction: 0.5,
            max_combo_for_max_reduction: 20,
            curve: ResponseCurve::Linear,
        })
    }

    #[test]
    fn test_empty_meter_has_unit_multiplier() {
        let meter = linear_meter();
        assert_eq!(meter.combo_count(), 0);
        assert_eq!(meter.reduction_multiplier(), 1.0);
    }

    #[test]
    fn test_linear_curve_midpoint_scenario() {
        // combo 10 of 20 with max_reduction 0.5 -> multiplier 0.75
        let mut meter = linear_meter();
        for _ in 0..10 {
            meter.register_hit(1);
        }
        assert!((meter.reduction_multiplier() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_multiplier_bounds_and_monotonicity() {
        let mut meter = linear_meter();
        let mut previous = meter.reduction_multiplier();
        for _ in 0..100 {
            let current = meter.register_hit(1);
            assert!(current <= previous, "multiplier must be non-increasing");
            assert!(current > 1.0 - meter.tuning().max_reduction);
            assert!(current <= 1.0);
            previous = current;
        }
        // Saturated far past max_combo
        assert!((meter.reduction_multiplier() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hit_resets_decay_window() {
        let mut meter = linear_meter();
        meter.register_hit(1);
        meter.tick(2.0);
        assert!(meter.decay_remaining() < 1.1);
        meter.register_hit(1);
        assert_eq!(meter.decay_remaining(), 3.0);
    }

    #[test]
    fn test_decay_resets_chain() {
        let mut meter = linear_meter();
        for _ in 0..5 {
            meter.register_hit(1);
        }
        assert_eq!(meter.tick(1.0), ComboChange::None);
        assert_eq!(meter.tick(2.1), ComboChange::Reset);
        assert_eq!(meter.combo_count(), 0);
        assert_eq!(meter.reduction_multiplier(), 1.0);
        // Further ticks on an idle meter do nothing
        assert_eq!(meter.tick(1.0), ComboChange::None);
    }

    #[test]
    fn test_hit_weight_accumulates() {
        let mut meter = linear_meter();
        meter.register_hit(3);
        assert_eq!(meter.combo_count(), 3);
    }

    #[test]
    fn test_curves_are_monotonic_and_anchored() {
        for curve in [
            ResponseCurve::Linear,
            ResponseCurve::EaseIn,
            ResponseCurve::EaseOut,
            ResponseCurve::Smoothstep,
        ] {
            assert_eq!(curve.evaluate(0.0), 0.0, "{:?} must start at 0", curve);
            assert!((curve.evaluate(1.0) - 1.0).abs() < 1e-6, "{:?} must end at 1", curve);
            let mut previous = 0.0;
            for i in 1..=100 {
                let value = curve.evaluate(i as f32 / 100.0);
                assert!(value >= previous, "{:?} must be monotonic", curve);
                previous = value;
            }
        }
    }

    #[test]
    fn test_curve_clamps_out_of_range_input() {
        assert_eq!(ResponseCurve::Linear.evaluate(-1.0), 0.0);
        assert_eq!(ResponseCurve::Linear.evaluate(2.0), 1.0);
    }

    #[test]
    fn test_tuning_validation() {
        assert!(ComboTuning::default().validate().is_ok());

        let bad_window = ComboTuning {
            decay_window: 0.0,
            ..ComboTuning::default()
        };
        assert!(bad_window.validate().is_err());

        let bad_reduction = ComboTuning {
            max_reduction: 1.0,
            ..ComboTuning::default()
        };
        assert!(bad_reduction.validate().is_err());

        let bad_combo = ComboTuning {
            max_combo_for_max_reduction: 0,
            ..ComboTuning::default()
        };
        assert!(bad_combo.validate().is_err());
    }
}
