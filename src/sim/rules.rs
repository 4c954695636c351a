//! Battle configuration: format slot counts, caps, permissions and the
//! spread-damage policy.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleRules {
    /// Active slots on the player side (1 = singles, 2 = doubles, 3 = triples).
    pub player_slots: usize,
    /// Active slots on the enemy side.
    pub enemy_slots: usize,
    /// Hard turn cap; 0 means unlimited.
    pub max_turns: u32,
    /// Consecutive turns without any HP change before the battle is drawn.
    /// 0 disables the stall detector.
    pub stall_turn_limit: u32,
    pub allow_items: bool,
    pub allow_switching: bool,
    /// Run the state validator after every turn.
    pub validate_after_turns: bool,
    /// HP multiplier applied to the enemy party for boss battles.
    pub boss_hp_multiplier: f32,
    /// Multiplier applied to the enemy party's other stats for boss battles.
    pub boss_stat_multiplier: f32,
    pub spread: SpreadPolicy,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            player_slots: 1,
            enemy_slots: 1,
            max_turns: 300,
            stall_turn_limit: 50,
            allow_items: true,
            allow_switching: true,
            validate_after_turns: false,
            boss_hp_multiplier: 1.0,
            boss_stat_multiplier: 1.0,
            spread: SpreadPolicy::default(),
        }
    }
}

impl BattleRules {
    pub fn singles() -> Self {
        Self::default()
    }

    pub fn doubles() -> Self {
        Self {
            player_slots: 2,
            enemy_slots: 2,
            ..Self::default()
        }
    }

    pub fn slots_for_side(&self, side: usize) -> usize {
        if side == 0 {
            self.player_slots
        } else {
            self.enemy_slots
        }
    }

    pub fn is_boss_battle(&self) -> bool {
        self.boss_hp_multiplier != 1.0 || self.boss_stat_multiplier != 1.0
    }
}

/// When and how strongly a spread move's per-target damage is reduced.
///
/// Kept as explicit configuration rather than hard-coded checks so the
/// boundary conditions (target count vs format slot count) are a tested
/// policy decision.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpreadPolicy {
    /// Per-target damage multiplier when the policy applies.
    pub modifier: f32,
    /// Minimum number of valid targets before the reduction kicks in.
    pub min_targets: usize,
    /// Only reduce in formats with more than one slot per side.
    pub require_multi_slot_format: bool,
}

impl Default for SpreadPolicy {
    fn default() -> Self {
        Self {
            modifier: 0.75,
            min_targets: 2,
            require_multi_slot_format: true,
        }
    }
}

impl SpreadPolicy {
    /// Whether the reduction applies for this hit.
    pub fn applies(&self, valid_targets: usize, format_slots: usize) -> bool {
        if self.require_multi_slot_format && format_slots < 2 {
            return false;
        }
        valid_targets >= self.min_targets
    }

    pub fn modifier_for(&self, valid_targets: usize, format_slots: usize) -> f32 {
        if self.applies(valid_targets, format_slots) {
            self.modifier
        } else {
            1.0
        }
    }
}
