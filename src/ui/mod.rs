//! In-game HUD
//!
//! Ability bar with cooldown state, the combo meter readout, and a recent
//! combat log panel. The HUD only reads simulation state through getters;
//! all mutation happens in the combat systems.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::abilities::config::AbilityDefinitions;
use crate::abilities::loadout::{AbilityLoadout, MAX_SLOTS};
use crate::arena::Player;
use crate::combat::combo::ComboMeter;
use crate::combat::log::CombatLog;
use crate::combat::SimulationSpeed;
use crate::keybindings::{GameAction, Keybindings};

/// Number of combat log lines shown in the HUD panel.
const LOG_PANEL_LINES: usize = 8;

/// Plugin for UI management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (render_ability_bar, render_combo_panel, render_combat_log_panel),
        );
    }
}

/// Render the ability bar: one cell per slot with the bound key, ability
/// name, and cooldown progress.
pub fn render_ability_bar(
    mut contexts: EguiContexts,
    definitions: Res<AbilityDefinitions>,
    keybindings: Res<Keybindings>,
    players: Query<&AbilityLoadout, With<Player>>,
) {
    // Use try_ctx_mut to gracefully handle window close
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let Ok(loadout) = players.get_single() else {
        return;
    };

    let screen = ctx.screen_rect();
    egui::Window::new("Abilities")
        .fixed_pos(egui::pos2(screen.width() / 2.0 - 180.0, screen.height() - 110.0))
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_black_alpha(200))
                .stroke(egui::Stroke::NONE),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for slot in 0..MAX_SLOTS {
                    let key = keybindings.binding_display(GameAction::ability_slot(slot));
                    ui.vertical(|ui| {
                        ui.set_width(80.0);
                        match loadout.slot(slot) {
                            Some(equipped) => {
                                let name = definitions
                                    .get(&equipped.ability)
                                    .map(|c| c.name.as_str())
                                    .unwrap_or("???");
                                ui.label(
                                    egui::RichText::new(format!("[{}] {}", key, name)).size(12.0),
                                );

                                let timer = &equipped.timer;
                                if timer.is_casting() {
                                    ui.label(
                                        egui::RichText::new("casting...")
                                            .size(11.0)
                                            .color(egui::Color32::from_rgb(255, 220, 120)),
                                    );
                                } else if timer.is_ready() {
                                    ui.label(
                                        egui::RichText::new("READY")
                                            .size(11.0)
                                            .color(egui::Color32::from_rgb(100, 255, 100)),
                                    );
                                } else {
                                    ui.add(
                                        egui::ProgressBar::new(1.0 - timer.cooldown_fraction())
                                            .text(format!("{:.1}s", timer.remaining_cooldown())),
                                    );
                                }
                            }
                            None => {
                                ui.label(
                                    egui::RichText::new(format!("[{}] empty", key))
                                        .size(12.0)
                                        .color(egui::Color32::from_rgb(120, 120, 120)),
                                );
                            }
                        }
                    });
                }
            });
        });
}

/// Render the combo meter: chain count, current cooldown discount, and the
/// decay window draining in real time.
pub fn render_combo_panel(
    mut contexts: EguiContexts,
    combo: Res<ComboMeter>,
    sim: Res<SimulationSpeed>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    egui::Window::new("Combo")
        .fixed_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_black_alpha(200))
                .stroke(egui::Stroke::NONE),
        )
        .show(ctx, |ui| {
            ui.set_width(160.0);

            let count = combo.combo_count();
            let reduction = (1.0 - combo.reduction_multiplier()) * 100.0;
            ui.label(
                egui::RichText::new(format!("Combo: {}", count))
                    .size(18.0)
                    .strong()
                    .color(if count > 0 {
                        egui::Color32::from_rgb(255, 200, 80)
                    } else {
                        egui::Color32::from_rgb(160, 160, 160)
                    }),
            );
            ui.label(
                egui::RichText::new(format!("Cooldowns -{:.0}%", reduction)).size(13.0),
            );

            if count > 0 {
                let window = combo.tuning().decay_window;
                let fraction = (combo.decay_remaining() / window).clamp(0.0, 1.0);
                ui.add(egui::ProgressBar::new(fraction).desired_height(6.0));
            }

            if sim.is_paused() {
                ui.label(
                    egui::RichText::new("PAUSED")
                        .size(13.0)
                        .strong()
                        .color(egui::Color32::from_rgb(255, 100, 100)),
                );
            }
        });
}

/// Render the tail of the combat log in the bottom-left corner.
pub fn render_combat_log_panel(mut contexts: EguiContexts, combat_log: Res<CombatLog>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let screen = ctx.screen_rect();
    egui::Window::new("Combat Log")
        .fixed_pos(egui::pos2(10.0, screen.height() - 160.0))
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_black_alpha(180))
                .stroke(egui::Stroke::NONE),
        )
        .show(ctx, |ui| {
            ui.set_width(280.0);
            for entry in combat_log.recent(LOG_PANEL_LINES) {
                ui.label(
                    egui::RichText::new(format!("[{:6.1}s] {}", entry.timestamp, entry.message))
                        .size(11.0)
                        .color(egui::Color32::from_rgb(200, 200, 200)),
                );
            }
        });
}
