//! Unit tests for combat log queries and serialization
//!
//! These tests verify that the CombatLog correctly:
//! - Aggregates damage by ability
//! - Preserves entry ordering and timestamps
//! - Serializes to the documented text format

use bevy::prelude::Entity;
use regex::Regex;

use combocast::{CombatLog, CombatLogEventType};

fn create_test_log() -> CombatLog {
    CombatLog::default()
}

// =============================================================================
// Damage Aggregation Tests
// =============================================================================

#[test]
fn test_damage_by_ability_empty_log() {
    let log = create_test_log();
    assert!(log.damage_by_ability().is_empty());
    assert_eq!(log.total_damage(), 0.0);
}

#[test]
fn test_damage_by_ability_accumulates_per_name() {
    let mut log = create_test_log();
    log.log_damage("Frost Bolt", Entity::from_raw(1), 12.0);
    log.log_damage("Frost Bolt", Entity::from_raw(2), 12.0);
    log.log_damage("Meteor", Entity::from_raw(1), 30.0);

    let damage = log.damage_by_ability();
    assert_eq!(damage.len(), 2);
    assert_eq!(damage.get("Frost Bolt"), Some(&24.0));
    assert_eq!(damage.get("Meteor"), Some(&30.0));
    assert_eq!(log.total_damage(), 54.0);
}

#[test]
fn test_clear_resets_everything() {
    let mut log = create_test_log();
    log.session_time = 12.0;
    log.log_damage("Frost Bolt", Entity::from_raw(1), 12.0);
    log.log(CombatLogEventType::Combo, "Combo 1".to_string());

    log.clear();
    assert!(log.entries.is_empty());
    assert!(log.damage_by_ability().is_empty());
    assert_eq!(log.session_time, 0.0);
}

// =============================================================================
// Entry Ordering and Filtering Tests
// =============================================================================

#[test]
fn test_entries_keep_session_timestamps() {
    let mut log = create_test_log();
    log.session_time = 1.0;
    log.log(CombatLogEventType::AbilityCast, "first".to_string());
    log.session_time = 2.5;
    log.log(CombatLogEventType::AbilityCast, "second".to_string());

    assert_eq!(log.entries[0].timestamp, 1.0);
    assert_eq!(log.entries[1].timestamp, 2.5);
}

#[test]
fn test_filter_by_type_selects_only_matches() {
    let mut log = create_test_log();
    log.log(CombatLogEventType::SessionEvent, "start".to_string());
    log.log_damage("Frost Bolt", Entity::from_raw(1), 10.0);
    log.log(CombatLogEventType::Combo, "Combo 1".to_string());
    log.log(CombatLogEventType::Combo, "Combo 2".to_string());

    assert_eq!(log.filter_by_type(CombatLogEventType::Combo).len(), 2);
    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
    assert_eq!(log.filter_by_type(CombatLogEventType::EnemyDeath).len(), 0);
}

// =============================================================================
// Serialization Format Tests
// =============================================================================

#[test]
fn test_damage_line_format() {
    let mut log = create_test_log();
    log.log_damage("Frost Bolt", Entity::from_raw(7), 14.25);

    let line = &log.entries[0].message;
    let pattern = Regex::new(r"^Frost Bolt hit .+ for \d+\.\d$").unwrap();
    assert!(pattern.is_match(line), "unexpected damage line: {}", line);
}

#[test]
fn test_saved_log_line_format() {
    let mut log = create_test_log();
    log.session_time = 3.21;
    log.log_damage("Meteor", Entity::from_raw(1), 30.0);
    log.log(CombatLogEventType::Combo, "Combo 1 (cooldown x0.99)".to_string());

    let path = std::env::temp_dir().join("combocast_log_format_test.txt");
    let path_str = path.to_string_lossy().into_owned();
    log.save_to_file(&path_str).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // Every entry line: "[  12.34s] EventType: message"
    let entry_pattern = Regex::new(r"(?m)^\[\s*\d+\.\d{2}s\] \w+: .+$").unwrap();
    assert_eq!(entry_pattern.find_iter(&saved).count(), 2);

    // Damage summary footer lists per-ability totals
    assert!(saved.contains("-- Damage summary --"));
    let summary_pattern = Regex::new(r"(?m)^Meteor: 30\.0$").unwrap();
    assert!(summary_pattern.is_match(&saved), "missing summary in:\n{}", saved);
}
