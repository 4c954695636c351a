//! Decision interfaces: where each slot's action for the turn comes from.

use crate::data::moves::{get_move, MoveCategory};
use crate::sim::field::{Field, SlotRef};
use crate::sim::order::ChosenAction;

pub trait ActionProvider {
    /// Decide what the Pokémon in `actor` does this turn.
    fn choose_action(&mut self, field: &Field, actor: SlotRef) -> ChosenAction;

    /// Pick a replacement after a faint. `bench` holds the eligible party
    /// indices. None defers to the engine's random selection.
    fn select_auto_switch(&mut self, _field: &Field, _actor: SlotRef, _bench: &[usize]) -> Option<usize> {
        None
    }
}

/// Always uses the first damaging move against the first opposing slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackProvider;

impl ActionProvider for AttackProvider {
    fn choose_action(&mut self, field: &Field, actor: SlotRef) -> ChosenAction {
        let Some(pokemon) = field.active(actor) else {
            return ChosenAction::Pass;
        };
        let damaging = pokemon.moves.iter().position(|name| {
            get_move(name)
                .map(|mv| mv.category != MoveCategory::Status)
                .unwrap_or(false)
        });
        match damaging.or(if pokemon.moves.is_empty() { None } else { Some(0) }) {
            Some(move_index) => ChosenAction::Move { move_index, target: None },
            None => ChosenAction::Pass,
        }
    }
}

/// Never acts. Useful for stall and draw scenarios in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassProvider;

impl ActionProvider for PassProvider {
    fn choose_action(&mut self, _field: &Field, _actor: SlotRef) -> ChosenAction {
        ChosenAction::Pass
    }
}
