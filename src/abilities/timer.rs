//! Per-ability cast and cooldown state machine
//!
//! Each equipped ability owns one `AbilityTimer` cycling through
//! `Idle -> Casting -> OnCooldown -> Idle`. The timer is plain data ticked
//! once per frame by the central update loop; there are no scheduled
//! callbacks to cancel, so unequipping simply drops the timer and any
//! pending cast with it.

/// Where the ability is in its cast cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CastState {
    /// Ready to cast
    Idle,
    /// Cast key accepted, waiting out the animation delay. Input is locked.
    Casting { remaining: f32 },
    /// Effect fired, waiting out the (possibly rescaled) cooldown.
    OnCooldown { remaining: f32, total: f32 },
}

/// Signal returned from [`AbilityTimer::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// No transition this frame
    None,
    /// The animation delay just expired; spawn the effect now and call
    /// [`AbilityTimer::on_cast_effect_fired`].
    EffectDue,
    /// The cooldown just finished; the ability is ready again.
    CooldownFinished,
}

/// Cooldown state machine for one equipped ability.
#[derive(Clone, Debug)]
pub struct AbilityTimer {
    base_cooldown: f32,
    animation_delay: f32,
    state: CastState,
    /// Combo multiplier in force when the current cooldown started.
    /// Mid-cooldown rescales are expressed as a ratio against this.
    multiplier_at_start: f32,
}

impl AbilityTimer {
    pub fn new(base_cooldown: f32, animation_delay: f32) -> Self {
        Self {
            base_cooldown,
            animation_delay,
            state: CastState::Idle,
            multiplier_at_start: 1.0,
        }
    }

    pub fn state(&self) -> CastState {
        self.state
    }

    /// True when the ability can accept a cast: no cooldown left and not
    /// mid-cast.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, CastState::Idle)
    }

    pub fn is_casting(&self) -> bool {
        matches!(self.state, CastState::Casting { .. })
    }

    /// Remaining cooldown in seconds (0 outside of cooldown).
    pub fn remaining_cooldown(&self) -> f32 {
        match self.state {
            CastState::OnCooldown { remaining, .. } => remaining.max(0.0),
            _ => 0.0,
        }
    }

    /// Length of the current cooldown as started (after combo discount),
    /// for UI ratio display. Falls back to the base cooldown when idle.
    pub fn total_cooldown(&self) -> f32 {
        match self.state {
            CastState::OnCooldown { total, .. } => total,
            _ => self.base_cooldown,
        }
    }

    /// Remaining / total, in [0, 1]. 0 means ready.
    pub fn cooldown_fraction(&self) -> f32 {
        let total = self.total_cooldown();
        if total <= 0.0 {
            return 0.0;
        }
        (self.remaining_cooldown() / total).clamp(0.0, 1.0)
    }

    pub fn base_cooldown(&self) -> f32 {
        self.base_cooldown
    }

    /// Begin a cast. No-op unless Idle; returns whether the cast started.
    /// A second press in the same frame, or any press while Casting or
    /// OnCooldown, falls through silently.
    pub fn try_cast(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.state = CastState::Casting {
            remaining: self.animation_delay,
        };
        true
    }

    /// Abort an in-progress cast without firing its effect or starting a
    /// cooldown. Used when the effect cannot be spawned (missing
    /// definition) so the ability returns to ready instead of jamming.
    pub fn cancel_cast(&mut self) {
        if self.is_casting() {
            self.state = CastState::Idle;
        }
    }

    /// The cast's effect has spawned; start the cooldown discounted by the
    /// combo multiplier in force right now.
    pub fn on_cast_effect_fired(&mut self, multiplier: f32) {
        let total = self.base_cooldown * multiplier;
        self.multiplier_at_start = multiplier;
        self.state = CastState::OnCooldown {
            remaining: total,
            total,
        };
    }

    /// Advance the state machine by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        match self.state {
            CastState::Idle => TickOutcome::None,
            CastState::Casting { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    // The caller spawns the effect and starts the cooldown;
                    // stay Casting (zeroed) until on_cast_effect_fired.
                    self.state = CastState::Casting { remaining: 0.0 };
                    TickOutcome::EffectDue
                } else {
                    self.state = CastState::Casting { remaining };
                    TickOutcome::None
                }
            }
            CastState::OnCooldown { remaining, total } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.state = CastState::Idle;
                    TickOutcome::CooldownFinished
                } else {
                    self.state = CastState::OnCooldown { remaining, total };
                    TickOutcome::None
                }
            }
        }
    }

    /// Rescale the remaining cooldown after a combo change.
    ///
    /// The remaining wait shrinks by the ratio of the new multiplier to the
    /// one the cooldown started with; progress already made is preserved,
    /// the clock is never restarted. Decay resets (multiplier rising back
    /// toward 1.0) deliberately leave the earned discount in place, so only
    /// reductions apply. Clamped at zero: a rescale can finish a cooldown
    /// but never leave it negative.
    pub fn apply_multiplier_change(&mut self, new_multiplier: f32) {
        let CastState::OnCooldown { remaining, total } = self.state else {
            return;
        };
        if new_multiplier >= self.multiplier_at_start {
            return;
        }
        let ratio = new_multiplier / self.multiplier_at_start;
        let remaining = (remaining * ratio).max(0.0);
        let total = total * ratio;
        self.multiplier_at_start = new_multiplier;
        if remaining <= 0.0 {
            self.state = CastState::Idle;
        } else {
            self.state = CastState::OnCooldown { remaining, total };
        }
    }
}
