//! Presentation hooks. Every method has a no-op default so headless
//! simulation and tests can run against [`NullView`].
//!
//! The queue calls a hook after an action's logic phase; the hook returning
//! is the completion acknowledgement, which keeps action sequencing strict
//! without tying the core to any UI framework.

use crate::sim::field::SlotRef;
use crate::sim::pokemon::Status;
use crate::sim::stats::BoostableStat;

pub trait BattleView {
    fn show_message(&mut self, _text: &str) {}
    fn play_move_animation(&mut self, _user: SlotRef, _move_name: &str) {}
    fn play_damage_animation(&mut self, _target: SlotRef) {}
    fn update_hp_bar(&mut self, _target: SlotRef, _hp: u16, _max_hp: u16) {}
    fn play_faint_animation(&mut self, _target: SlotRef) {}
    fn play_status_animation(&mut self, _target: SlotRef, _status: Status) {}
    fn show_stat_change(&mut self, _target: SlotRef, _stat: BoostableStat, _delta: i8) {}
    fn play_switch_out_animation(&mut self, _slot: SlotRef) {}
    fn play_switch_in_animation(&mut self, _slot: SlotRef, _species: &str) {}

    /// Prompt hooks. None means "no selection"; the engine falls back to its
    /// own defaults.
    fn select_action_type(&mut self, _slot: SlotRef) -> Option<usize> {
        None
    }
    fn select_move(&mut self, _slot: SlotRef, _moves: &[String]) -> Option<usize> {
        None
    }
    fn select_target(&mut self, _slot: SlotRef, _candidates: &[SlotRef]) -> Option<usize> {
        None
    }
    fn select_switch(&mut self, _slot: SlotRef, _bench: &[usize]) -> Option<usize> {
        None
    }
}

/// View that renders nothing, for headless battles.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

impl BattleView for NullView {}
