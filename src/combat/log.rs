//! Combat logging
//!
//! Records combat events for the in-game log panel and post-run analysis.
//! Headless scenarios save the log to a file when they finish.

use bevy::prelude::*;
use std::collections::HashMap;

/// A single entry in the combat log
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    /// Timestamp in session time (seconds since the scene started)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// Ability cast fired its effect
    AbilityCast,
    /// Damage dealt to an enemy
    Damage,
    /// Combo meter changed
    Combo,
    /// Enemy destroyed
    EnemyDeath,
    /// Session event (start, end, pause)
    SessionEvent,
}

/// Structured damage record for aggregation queries.
#[derive(Debug, Clone)]
struct DamageRecord {
    ability_name: String,
    amount: f32,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current session time
    pub session_time: f32,
    /// Structured damage records for per-ability aggregation
    damage_records: Vec<DamageRecord>,
}

impl CombatLog {
    /// Clear the log for a new session
    pub fn clear(&mut self) {
        self.entries.clear();
        self.damage_records.clear();
        self.session_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.session_time,
            event_type,
            message,
        });
    }

    /// Record damage with a structured entry for aggregation, plus the
    /// human-readable line.
    pub fn log_damage(&mut self, ability_name: &str, target: Entity, amount: f32) {
        self.damage_records.push(DamageRecord {
            ability_name: ability_name.to_string(),
            amount,
        });
        self.log(
            CombatLogEventType::Damage,
            format!("{} hit {:?} for {:.1}", ability_name, target, amount),
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total damage dealt, grouped by ability name.
    pub fn damage_by_ability(&self) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for record in &self.damage_records {
            *totals.entry(record.ability_name.clone()).or_insert(0.0) += record.amount;
        }
        totals
    }

    /// Total damage across all abilities.
    pub fn total_damage(&self) -> f32 {
        self.damage_records.iter().map(|r| r.amount).sum()
    }

    /// Serialize the log to a plain-text file, one timestamped line per
    /// entry, with a damage summary footer.
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(&format!(
                "[{:7.2}s] {:?}: {}\n",
                entry.timestamp, entry.event_type, entry.message
            ));
        }
        output.push_str("\n-- Damage summary --\n");
        let mut totals: Vec<(String, f32)> = self.damage_by_ability().into_iter().collect();
        totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (ability, total) in totals {
            output.push_str(&format!("{}: {:.1}\n", ability, total));
        }

        std::fs::write(path, output).map_err(|e| format!("Failed to write {}: {}", path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_filter() {
        let mut log = CombatLog::default();
        log.session_time = 1.5;
        log.log(CombatLogEventType::SessionEvent, "Session started".to_string());
        log.log_damage("Frost Bolt", Entity::from_raw(7), 14.0);

        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
        assert_eq!(log.entries[1].timestamp, 1.5);
    }

    #[test]
    fn test_damage_aggregation() {
        let mut log = CombatLog::default();
        log.log_damage("Frost Bolt", Entity::from_raw(1), 10.0);
        log.log_damage("Frost Bolt", Entity::from_raw(2), 12.5);
        log.log_damage("Meteor", Entity::from_raw(1), 30.0);

        let totals = log.damage_by_ability();
        assert_eq!(totals["Frost Bolt"], 22.5);
        assert_eq!(totals["Meteor"], 30.0);
        assert_eq!(log.total_damage(), 52.5);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut log = CombatLog::default();
        for i in 0..5 {
            log.log(CombatLogEventType::Combo, format!("combo {}", i));
        }
        let recent: Vec<&str> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(recent, vec!["combo 3", "combo 4"]);
    }
}
