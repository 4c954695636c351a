//! The per-turn step pipeline: an ordered list of named, swappable steps
//! sharing one mutable turn state. Steps are skipped once a faint is
//! detected unless they opt into running anyway, and the whole pipeline
//! short-circuits as soon as the arbiter reports a conclusion.

use crate::battle_logger::BattleLogger;
use crate::data::moves::normalize_move_name;
use crate::sim::actions::{ActionQueue, BattleAction, DamageSource, ExecCtx};
use crate::sim::arbiter::{self, BattleOutcome};
use crate::sim::field::{Field, SlotRef, Weather, SIDE_ENEMY, SIDE_PLAYER};
use crate::sim::order::{self, ChosenAction, PendingAction};
use crate::sim::pokemon::Status;
use crate::sim::provider::ActionProvider;
use crate::sim::rng::RandomSource;
use crate::sim::rules::BattleRules;
use crate::sim::validator;
use crate::sim::view::BattleView;
use crate::data::types::Type;
use anyhow::Result;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepResult {
    Continue,
    Stop,
}

/// One named step of the turn pipeline.
pub struct TurnStep {
    pub name: &'static str,
    /// Runs even after a faint was detected this turn.
    pub always_runs: bool,
    pub run: fn(&mut TurnState<'_>) -> Result<StepResult>,
}

/// Mutable context threaded through the steps of one turn.
pub struct TurnState<'a> {
    pub field: &'a mut Field,
    pub rules: &'a BattleRules,
    pub rng: &'a mut dyn RandomSource,
    pub view: &'a mut dyn BattleView,
    pub logger: &'a mut dyn BattleLogger,
    pub providers: [&'a mut dyn ActionProvider; 2],
    pub pending: Vec<PendingAction>,
    pub outcome: BattleOutcome,
    pub fainted_this_turn: bool,
}

impl<'a> TurnState<'a> {
    fn run_queue(&mut self, queue: &mut ActionQueue) -> Result<()> {
        let mut ctx = ExecCtx {
            rules: self.rules,
            rng: &mut *self.rng,
            logger: &mut *self.logger,
        };
        let report = queue.run(self.field, &mut ctx, &mut *self.view)?;
        if report.faints > 0 {
            self.fainted_this_turn = true;
        }
        Ok(())
    }
}

/// The standard turn, in execution order.
pub fn default_turn_steps() -> Vec<TurnStep> {
    vec![
        TurnStep {
            name: "collect-actions",
            always_runs: false,
            run: step_collect_actions,
        },
        TurnStep {
            name: "sort-actions",
            always_runs: false,
            run: step_sort_actions,
        },
        TurnStep {
            name: "execute-actions",
            always_runs: false,
            run: step_execute_actions,
        },
        TurnStep {
            name: "end-of-turn",
            always_runs: false,
            run: step_end_of_turn,
        },
        TurnStep {
            name: "replace-fainted",
            always_runs: true,
            run: step_replace_fainted,
        },
        TurnStep {
            name: "validate",
            always_runs: true,
            run: step_validate,
        },
    ]
}

pub fn run_turn(steps: &[TurnStep], state: &mut TurnState<'_>) -> Result<()> {
    for step in steps {
        if state.outcome.is_terminal() {
            break;
        }
        if state.fainted_this_turn && !step.always_runs {
            continue;
        }
        let result = (step.run)(state)?;
        state.outcome = arbiter::judge(state.field);
        if result == StepResult::Stop {
            break;
        }
    }
    Ok(())
}

/// Charging and encored Pokémon do not get a free choice this turn.
fn forced_choice(field: &Field, at: SlotRef) -> Option<ChosenAction> {
    let volatile = &field.slot(at).volatile;
    let forced_move = volatile
        .charging_move
        .as_deref()
        .or_else(|| (volatile.encore_turns > 0).then_some(volatile.encore_move.as_deref()).flatten())?;
    let forced_id = normalize_move_name(forced_move);
    let index = field
        .active(at)?
        .moves
        .iter()
        .position(|name| normalize_move_name(name) == forced_id)?;
    Some(ChosenAction::Move {
        move_index: index,
        target: None,
    })
}

/// Degrade provider mistakes to a pass instead of aborting the battle.
fn sanitize_choice(
    field: &Field,
    rules: &BattleRules,
    logger: &mut dyn BattleLogger,
    at: SlotRef,
    choice: ChosenAction,
) -> ChosenAction {
    match &choice {
        ChosenAction::Move { move_index, .. } => {
            let valid = field
                .active(at)
                .map(|p| *move_index < p.moves.len())
                .unwrap_or(false);
            if !valid {
                logger.warning("provider chose an out-of-range move; passing");
                return ChosenAction::Pass;
            }
            choice
        }
        ChosenAction::Switch { party_index } => {
            if !rules.allow_switching {
                logger.warning("provider chose a switch but switching is disabled; passing");
                return ChosenAction::Pass;
            }
            let bench = field.side(at.side).bench();
            if !bench.contains(party_index) {
                logger.warning("provider chose an unavailable switch target; passing");
                return ChosenAction::Pass;
            }
            choice
        }
        ChosenAction::Pass => choice,
    }
}

fn step_collect_actions(state: &mut TurnState<'_>) -> Result<StepResult> {
    state.pending.clear();
    // Single-turn flags expire at the start of the next turn, whether or
    // not the previous turn ran to completion.
    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        for slot in &mut state.field.side_mut(side).slots {
            slot.volatile.flinched = false;
            slot.volatile.protect_active = false;
            slot.volatile.follow_me = false;
        }
    }
    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        for at in state.field.occupied_slots(side) {
            let choice = match forced_choice(state.field, at) {
                Some(forced) => forced,
                None => state.providers[side].choose_action(state.field, at),
            };
            let choice = sanitize_choice(state.field, state.rules, state.logger, at, choice);
            state.pending.push(PendingAction { actor: at, choice });
        }
    }
    Ok(StepResult::Continue)
}

fn step_sort_actions(state: &mut TurnState<'_>) -> Result<StepResult> {
    order::sort_actions(&mut state.pending, state.field, state.rng);
    Ok(StepResult::Continue)
}

fn step_execute_actions(state: &mut TurnState<'_>) -> Result<StepResult> {
    let mut queue = ActionQueue::new();
    for pending in state.pending.drain(..) {
        match pending.choice {
            ChosenAction::Move { move_index, target } => queue.push_back(BattleAction::UseMove {
                user: pending.actor,
                move_index,
                target,
            }),
            ChosenAction::Switch { party_index } => queue.push_back(BattleAction::Switch {
                actor: pending.actor,
                party_index,
                forced: false,
            }),
            ChosenAction::Pass => {}
        }
    }
    state.run_queue(&mut queue)?;
    Ok(StepResult::Continue)
}

fn weather_residual(pokemon: &crate::sim::pokemon::Pokemon, weather: Weather) -> Option<u16> {
    let immune = match weather {
        Weather::Sand => {
            pokemon.has_type(Type::Rock)
                || pokemon.has_type(Type::Ground)
                || pokemon.has_type(Type::Steel)
        }
        Weather::Hail => pokemon.has_type(Type::Ice),
        Weather::Sun | Weather::Rain => return None,
    };
    if immune {
        return None;
    }
    Some(((pokemon.stats.hp as u32 / 16).max(1)) as u16)
}

fn step_end_of_turn(state: &mut TurnState<'_>) -> Result<StepResult> {
    let mut queue = ActionQueue::new();
    let weather = state.field.weather_kind();

    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        for at in state.field.occupied_slots(side) {
            // Residual damage and item healing read the member, then queue
            // actions so faints funnel through the normal reaction path.
            let Some(pokemon) = state.field.active_mut(at) else {
                continue;
            };
            if let Some(weather) = weather {
                if let Some(amount) = weather_residual(pokemon, weather) {
                    let cause = match weather {
                        Weather::Sand => "sandstorm",
                        Weather::Hail => "hail",
                        _ => "weather",
                    };
                    queue.push_back(BattleAction::Damage {
                        target: at,
                        amount,
                        source: DamageSource::Residual { cause },
                    });
                }
            }
            let max_hp = pokemon.stats.hp;
            match pokemon.status {
                Some(Status::Burn) => queue.push_back(BattleAction::Damage {
                    target: at,
                    amount: ((max_hp as u32 / 16).max(1)) as u16,
                    source: DamageSource::Residual { cause: "burn" },
                }),
                Some(Status::Poison) => {
                    let amount = if pokemon.toxic_counter > 0 {
                        let counter = pokemon.toxic_counter.min(15);
                        pokemon.toxic_counter = pokemon.toxic_counter.saturating_add(1);
                        ((max_hp as u32 * counter as u32 / 16).max(1)) as u16
                    } else {
                        ((max_hp as u32 / 8).max(1)) as u16
                    };
                    queue.push_back(BattleAction::Damage {
                        target: at,
                        amount,
                        source: DamageSource::Residual { cause: "poison" },
                    });
                }
                _ => {}
            }
            if pokemon.current_hp < max_hp {
                if let Some(heal) = pokemon.held_item().and_then(|item| item.end_of_turn_heal) {
                    let amount = ((max_hp as u32 * heal.0 as u32 / heal.1 as u32).max(1)) as u16;
                    queue.push_back(BattleAction::Heal { target: at, amount });
                }
            }
        }
    }
    state.run_queue(&mut queue)?;

    // Duration bookkeeping.
    if let Some(mut weather) = state.field.weather {
        if !weather.primal {
            weather.turns_left = weather.turns_left.saturating_sub(1);
            state.field.weather = if weather.turns_left == 0 {
                state.logger.info("The weather returned to normal.");
                None
            } else {
                Some(weather)
            };
        }
    }
    if let Some(mut terrain) = state.field.terrain {
        terrain.turns_left = terrain.turns_left.saturating_sub(1);
        state.field.terrain = if terrain.turns_left == 0 {
            state.logger.info("The terrain faded.");
            None
        } else {
            Some(terrain)
        };
    }
    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        state.field.side_mut(side).conditions.tick();
        for slot in &mut state.field.side_mut(side).slots {
            let volatile = &mut slot.volatile;
            volatile.taunt_turns = volatile.taunt_turns.saturating_sub(1);
            if volatile.encore_turns > 0 {
                volatile.encore_turns -= 1;
                if volatile.encore_turns == 0 {
                    volatile.encore_move = None;
                }
            }
        }
    }
    Ok(StepResult::Continue)
}

fn step_replace_fainted(state: &mut TurnState<'_>) -> Result<StepResult> {
    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        for slot_idx in 0..state.field.side(side).slots.len() {
            let at = SlotRef::new(side, slot_idx);
            // A slot can still hold a fainted member if it dropped to zero
            // outside the damage-action path.
            let holds_fainted = state
                .field
                .slot(at)
                .member
                .map(|m| state.field.side(side).party[m].is_fainted())
                .unwrap_or(false);
            if holds_fainted {
                state.field.slot_mut(at).clear();
                state.fainted_this_turn = true;
            }
            if state.field.slot(at).member.is_some() {
                continue;
            }
            let bench = state.field.side(side).bench();
            if bench.is_empty() {
                continue;
            }
            let picked = state.providers[side].select_auto_switch(state.field, at, &bench);
            let party_index = match picked {
                Some(idx) if bench.contains(&idx) => idx,
                _ => bench[state.rng.next_max(bench.len() as u32) as usize],
            };
            let mut queue = ActionQueue::new();
            queue.push_back(BattleAction::Switch {
                actor: at,
                party_index,
                forced: true,
            });
            state.run_queue(&mut queue)?;
        }
    }
    Ok(StepResult::Continue)
}

fn step_validate(state: &mut TurnState<'_>) -> Result<StepResult> {
    if state.rules.validate_after_turns {
        validator::validate(state.field, state.rules)?;
    }
    Ok(StepResult::Continue)
}
