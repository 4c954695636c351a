//! Optional post-turn state validation. Collects every violation before
//! failing so a broken turn surfaces all of its damage at once.

use crate::sim::field::Field;
use crate::sim::rules::BattleRules;
use anyhow::{bail, Result};

pub fn validate(field: &Field, rules: &BattleRules) -> Result<()> {
    let mut violations = Vec::new();

    for (side_idx, side) in field.sides.iter().enumerate() {
        let expected_slots = rules.slots_for_side(side_idx);
        if side.slots.len() != expected_slots {
            violations.push(format!(
                "side {side_idx} has {} slots, rules require {expected_slots}",
                side.slots.len()
            ));
        }

        let mut seen = Vec::new();
        for (slot_idx, slot) in side.slots.iter().enumerate() {
            let Some(member) = slot.member else {
                continue;
            };
            if member >= side.party.len() {
                violations.push(format!(
                    "side {side_idx} slot {slot_idx} references missing party member {member}"
                ));
                continue;
            }
            if side.party[member].is_fainted() {
                violations.push(format!(
                    "side {side_idx} slot {slot_idx} holds fainted party member {member}"
                ));
            }
            if seen.contains(&member) {
                violations.push(format!(
                    "side {side_idx} party member {member} occupies more than one slot"
                ));
            }
            seen.push(member);
        }

        for (member_idx, pokemon) in side.party.iter().enumerate() {
            if pokemon.current_hp > pokemon.stats.hp {
                violations.push(format!(
                    "side {side_idx} party member {member_idx} has {} HP over its max {}",
                    pokemon.current_hp, pokemon.stats.hp
                ));
            }
        }
    }

    if !violations.is_empty() {
        bail!("post-turn validation failed: {}", violations.join("; "));
    }
    Ok(())
}
