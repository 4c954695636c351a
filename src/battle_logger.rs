//! Leveled logging plus the structured battle-event log.
//!
//! Logging calls never fail and never panic; a no-op implementation
//! ([`NullLogger`]) is always valid.

use serde_json::json;

pub trait BattleLogger {
    fn debug(&mut self, _msg: &str) {}
    fn info(&mut self, _msg: &str) {}
    fn warning(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}

    /// One structured battle-event line in the pipe-delimited format.
    fn event(&mut self, _line: &str) {}

    fn log_turn(&mut self, turn: u32) {
        self.event(&format!("|turn|{turn}"));
    }

    fn log_move(&mut self, source: &str, move_name: &str, target: &str) {
        self.event(&format!("|move|{source}|{move_name}|{target}"));
    }

    fn log_damage(&mut self, target: &str, hp: u16, max_hp: u16) {
        self.event(&format!("|-damage|{target}|{hp}/{max_hp}"));
    }

    fn log_heal(&mut self, target: &str, hp: u16, max_hp: u16) {
        self.event(&format!("|-heal|{target}|{hp}/{max_hp}"));
    }

    fn log_status(&mut self, target: &str, status: &str) {
        self.event(&format!("|-status|{target}|{status}"));
    }

    fn log_boost(&mut self, target: &str, stat: &str, delta: i8) {
        self.event(&format!("|-boost|{target}|{stat}|{delta}"));
    }

    fn log_switch(&mut self, ident: &str, species: &str, hp: u16, max_hp: u16) {
        self.event(&format!("|switch|{ident}|{species}|{hp}/{max_hp}"));
    }

    fn log_faint(&mut self, target: &str) {
        self.event(&format!("|faint|{target}"));
    }

    fn log_weather(&mut self, weather: &str) {
        self.event(&format!("|-weather|{weather}"));
    }

    fn log_terrain(&mut self, terrain: &str) {
        self.event(&format!("|-fieldstart|{terrain}"));
    }

    fn log_win(&mut self, winner: &str) {
        self.event(&format!("|win|{winner}"));
    }

    fn log_tie(&mut self) {
        self.event("|tie|");
    }
}

/// Logger that drops everything; the default for headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl BattleLogger for NullLogger {}

/// Collects leveled lines and battle events in memory.
#[derive(Clone, Debug, Default)]
pub struct BattleLog {
    lines: Vec<String>,
    events: Vec<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "log": self.lines,
            "events": self.events,
        })
    }
}

impl BattleLogger for BattleLog {
    fn debug(&mut self, msg: &str) {
        self.lines.push(format!("[debug] {msg}"));
    }

    fn info(&mut self, msg: &str) {
        self.lines.push(format!("[info] {msg}"));
    }

    fn warning(&mut self, msg: &str) {
        self.lines.push(format!("[warning] {msg}"));
    }

    fn error(&mut self, msg: &str) {
        self.lines.push(format!("[error] {msg}"));
    }

    fn event(&mut self, line: &str) {
        self.events.push(line.to_string());
    }
}

/// Log identifier for a slot: p1a/p1b/... for the player side, p2a/... for
/// the enemy side.
pub fn slot_ident(side: usize, slot: usize, species: &str) -> String {
    let side_tag = if side == 0 { "p1" } else { "p2" };
    let slot_tag = (b'a' + (slot as u8).min(25)) as char;
    format!("{side_tag}{slot_tag}: {species}")
}
