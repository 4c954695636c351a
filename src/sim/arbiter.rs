//! Outcome arbitration: a pure function over the field state.

use crate::sim::field::{Field, Side, SIDE_PLAYER};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
    Draw,
    Fled,
    Caught,
}

impl BattleOutcome {
    pub fn is_terminal(self) -> bool {
        self != BattleOutcome::Ongoing
    }
}

/// A side has lost when nothing healthy is in a slot and nothing can come
/// in from the bench.
fn side_defeated(side: &Side) -> bool {
    if side.has_active() {
        return false;
    }
    let all_fainted = side.party.iter().all(|p| p.is_fainted());
    all_fainted || side.bench().is_empty()
}

/// Judge the current field state. Simultaneous defeat is a draw, never a
/// coin flip.
pub fn judge(field: &Field) -> BattleOutcome {
    let player_defeated = side_defeated(field.side(SIDE_PLAYER));
    let enemy_defeated = side_defeated(field.side(crate::sim::field::SIDE_ENEMY));
    match (player_defeated, enemy_defeated) {
        (true, true) => BattleOutcome::Draw,
        (true, false) => BattleOutcome::Defeat,
        (false, true) => BattleOutcome::Victory,
        (false, false) => BattleOutcome::Ongoing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::{SlotRef, SIDE_ENEMY};
    use crate::sim::pokemon::Pokemon;
    use crate::sim::rules::BattleRules;
    use crate::sim::stats::Nature;

    fn make_pokemon(species: &str) -> Pokemon {
        Pokemon::new(
            species,
            50,
            [0; 6],
            [31; 6],
            Nature::Hardy,
            vec!["tackle".to_string()],
            "No Ability",
            None,
        )
        .expect("species exists")
    }

    fn faint_party(field: &mut Field, side: usize) {
        for pokemon in &mut field.side_mut(side).party {
            pokemon.current_hp = 0;
        }
        for slot in &mut field.side_mut(side).slots {
            slot.clear();
        }
    }

    fn two_vs_two() -> Field {
        Field::new(
            &BattleRules::default(),
            vec![make_pokemon("pikachu"), make_pokemon("snorlax")],
            vec![make_pokemon("gengar"), make_pokemon("machamp")],
        )
        .expect("valid field")
    }

    #[test]
    fn healthy_sides_are_ongoing() {
        assert_eq!(judge(&two_vs_two()), BattleOutcome::Ongoing);
    }

    #[test]
    fn both_parties_at_zero_is_a_draw() {
        let mut field = two_vs_two();
        faint_party(&mut field, SIDE_PLAYER);
        faint_party(&mut field, SIDE_ENEMY);
        assert_eq!(judge(&field), BattleOutcome::Draw);
    }

    #[test]
    fn player_wipe_with_no_bench_is_a_defeat() {
        let mut field = two_vs_two();
        faint_party(&mut field, SIDE_PLAYER);
        assert_eq!(judge(&field), BattleOutcome::Defeat);
    }

    #[test]
    fn enemy_wipe_with_no_bench_is_a_victory() {
        let mut field = two_vs_two();
        faint_party(&mut field, SIDE_ENEMY);
        assert_eq!(judge(&field), BattleOutcome::Victory);
    }

    #[test]
    fn empty_slot_with_a_healthy_bench_is_still_ongoing() {
        let mut field = two_vs_two();
        // Active fainted and removed, but a replacement is waiting.
        field.side_mut(SIDE_PLAYER).party[0].current_hp = 0;
        field.slot_mut(SlotRef::new(SIDE_PLAYER, 0)).clear();
        assert_eq!(judge(&field), BattleOutcome::Ongoing);
    }

    #[test]
    fn no_bench_to_switch_in_counts_as_defeated() {
        let mut field = two_vs_two();
        // Player's second member is already the only healthy one, but it is
        // occupying the lone slot; fainting it and clearing leaves nothing.
        field.side_mut(SIDE_PLAYER).party[0].current_hp = 0;
        field.slot_mut(SlotRef::new(SIDE_PLAYER, 0)).clear();
        field.slot_mut(SlotRef::new(SIDE_PLAYER, 0)).member = Some(1);
        field.side_mut(SIDE_PLAYER).party[1].current_hp = 0;
        field.slot_mut(SlotRef::new(SIDE_PLAYER, 0)).clear();
        assert_eq!(judge(&field), BattleOutcome::Defeat);
    }
}
