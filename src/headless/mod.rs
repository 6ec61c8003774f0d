//! Headless mode for agentic testing
//!
//! This module provides functionality to run cast scenarios without any
//! graphical output, suitable for automated testing and balance analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless scenario
//! cargo run --release -- --headless scenario.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "loadout": ["FrostBolt", "FireBall"],
//!   "script": [
//!     { "at": 0.0, "slot": 0 },
//!     { "at": 0.5, "slot": 1 }
//!   ],
//!   "max_duration_secs": 20,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessScenarioConfig;
pub use runner::{run_headless_scenario, ScenarioResult};
