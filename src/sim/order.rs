//! Turn order resolution: priority brackets, effective speed, random
//! tie-breaks.

use crate::data::moves::{get_move, MoveData, MoveEffect};
use crate::sim::field::{Field, SlotRef, Terrain, Weather};
use crate::sim::pokemon::{Pokemon, Status};
use crate::sim::rng::RandomSource;
use crate::sim::stats::{stage_multiplier, BoostableStat};

/// Priority bracket for non-move actions; above every move priority.
pub const SWITCH_PRIORITY: i8 = 6;

/// What an action provider decided for one slot this turn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChosenAction {
    Move {
        move_index: usize,
        target: Option<SlotRef>,
    },
    Switch {
        party_index: usize,
    },
    Pass,
}

/// A slot's decision waiting in the turn's action list.
#[derive(Clone, Debug)]
pub struct PendingAction {
    pub actor: SlotRef,
    pub choice: ChosenAction,
}

/// Declared move priority plus context-dependent bonuses.
pub fn move_priority(move_data: &MoveData, field: &Field) -> i8 {
    let mut priority = move_data.priority;
    for effect in move_data.effects {
        if let MoveEffect::TerrainPriority { terrain, bonus } = effect {
            let active = matches!(
                (field.terrain_kind(), *terrain),
                (Some(Terrain::Grassy), "grassy")
                    | (Some(Terrain::Electric), "electric")
                    | (Some(Terrain::Psychic), "psychic")
                    | (Some(Terrain::Misty), "misty")
            );
            if active {
                priority += bonus;
            }
        }
    }
    priority
}

fn action_priority(field: &Field, action: &PendingAction) -> i8 {
    match &action.choice {
        ChosenAction::Move { move_index, .. } => field
            .active(action.actor)
            .and_then(|pokemon| pokemon.moves.get(*move_index))
            .and_then(|name| get_move(name))
            .map(|mv| move_priority(mv, field))
            .unwrap_or(0),
        ChosenAction::Switch { .. } => SWITCH_PRIORITY,
        ChosenAction::Pass => i8::MIN,
    }
}

fn ability_speed_multiplier(pokemon: &Pokemon, weather: Option<Weather>) -> f32 {
    match weather {
        Some(Weather::Sun) if pokemon.has_ability("Chlorophyll") => 2.0,
        Some(Weather::Rain) if pokemon.has_ability("Swift Swim") => 2.0,
        Some(Weather::Sand) if pokemon.has_ability("Sand Rush") => 2.0,
        Some(Weather::Hail) if pokemon.has_ability("Slush Rush") => 2.0,
        _ => 1.0,
    }
}

/// Effective speed for one slot, given the current field snapshot.
///
/// Public because decision-making callers rank their options with it; the
/// result is reproducible for a fixed snapshot.
pub fn effective_speed(field: &Field, actor: SlotRef) -> u16 {
    let Some(pokemon) = field.active(actor) else {
        return 0;
    };
    let stage = field.slot(actor).volatile.stages.get(BoostableStat::Spe);
    let mut speed = ((pokemon.stats.spe as f32) * stage_multiplier(stage)).floor().max(1.0);
    if matches!(pokemon.status, Some(Status::Paralysis)) && !pokemon.has_ability("Quick Feet") {
        speed = (speed * 0.5).floor();
    }
    if let Some(item) = pokemon.held_item() {
        speed *= item.speed_multiplier;
    }
    if field.side(actor.side).conditions.tailwind_turns > 0 {
        speed *= 2.0;
    }
    speed *= ability_speed_multiplier(pokemon, field.weather_kind());
    speed.floor().max(1.0) as u16
}

/// Order the turn's actions in place: descending priority bracket, then
/// descending effective speed, then a fresh random draw per action so exact
/// speed ties are randomly, not positionally, ordered.
pub fn sort_actions(actions: &mut [PendingAction], field: &Field, rng: &mut dyn RandomSource) {
    let mut keyed: Vec<(i8, u16, u32, PendingAction)> = actions
        .iter()
        .map(|action| {
            (
                action_priority(field, action),
                effective_speed(field, action.actor),
                rng.next_max(u32::MAX),
                action.clone(),
            )
        })
        .collect();
    keyed.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| b.2.cmp(&a.2))
    });
    for (dst, (_, _, _, action)) in actions.iter_mut().zip(keyed) {
        *dst = action;
    }
}
