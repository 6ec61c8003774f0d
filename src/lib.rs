//! Combocast - combo-driven sorcerer ability sandbox
//!
//! A 2D arena where a sorcerer chains elemental abilities: every hit feeds
//! a combo meter, and combo momentum shortens the cooldowns of all equipped
//! abilities in the same frame the hit lands.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod abilities;
pub mod arena;
pub mod cli;
pub mod combat;
pub mod headless;
pub mod keybindings;
pub mod settings;
pub mod ui;

// Re-export commonly used types
pub use abilities::{AbilityDefinitions, AbilityLoadout, AbilityTimer, AbilityType};
pub use combat::combo::{ComboMeter, ComboTuning, ResponseCurve};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::HeadlessScenarioConfig;
