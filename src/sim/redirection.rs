//! Target redirection for single-target moves: "draw-in" volatiles first,
//! then type-conditional magnet abilities. First matching redirector wins.

use crate::data::moves::{MoveData, MoveTarget};
use crate::data::types::Type;
use crate::sim::field::{Field, SlotRef};

fn magnet_ability_for(move_type: Type) -> Option<&'static str> {
    match move_type {
        Type::Electric => Some("Lightning Rod"),
        Type::Water => Some("Storm Drain"),
        _ => None,
    }
}

/// Resolve the actual target of a single-target move. Non-single-target
/// moves and moves already aimed at the redirector pass through untouched.
pub fn resolve(field: &Field, user: SlotRef, original: SlotRef, move_data: &MoveData) -> SlotRef {
    if move_data.target != MoveTarget::SingleAdjacent {
        return original;
    }

    // Forced redirection overrides everything, regardless of move type.
    for at in field.occupied_slots(original.side) {
        if at == user || at == original {
            continue;
        }
        if field.slot(at).volatile.follow_me {
            return at;
        }
    }

    // Type-conditional magnets only pull moves of the matching type.
    if let Some(ability) = magnet_ability_for(move_data.move_type) {
        for at in field.occupied_slots(original.side) {
            if at == user || at == original {
                continue;
            }
            let Some(pokemon) = field.active(at) else {
                continue;
            };
            if pokemon.has_ability(ability) {
                return at;
            }
        }
    }

    original
}
