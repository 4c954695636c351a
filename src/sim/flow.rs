//! The whole-battle step pipeline (setup, turn loop, cleanup) and the loop
//! safeguards: the turn cap and the HP stall detector.

use crate::battle_logger::{slot_ident, BattleLogger};
use crate::sim::arbiter::{self, BattleOutcome};
use crate::sim::field::{Field, SIDE_ENEMY, SIDE_PLAYER};
use crate::sim::provider::ActionProvider;
use crate::sim::rng::RandomSource;
use crate::sim::rules::BattleRules;
use crate::sim::turn::{run_turn, StepResult, TurnState, TurnStep};
use crate::sim::view::BattleView;
use anyhow::{bail, Result};

/// One named step of the battle pipeline.
pub struct FlowStep {
    pub name: &'static str,
    pub run: fn(&mut FlowState<'_>) -> Result<StepResult>,
}

/// Mutable context threaded through the battle steps.
pub struct FlowState<'a> {
    pub field: &'a mut Field,
    pub rules: &'a BattleRules,
    pub rng: &'a mut dyn RandomSource,
    pub view: &'a mut dyn BattleView,
    pub logger: &'a mut dyn BattleLogger,
    pub providers: [&'a mut dyn ActionProvider; 2],
    pub turn_steps: Vec<TurnStep>,
    pub outcome: BattleOutcome,
    last_totals: Option<(u32, u32)>,
    stall_streak: u32,
}

impl<'a> FlowState<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        field: &'a mut Field,
        rules: &'a BattleRules,
        rng: &'a mut dyn RandomSource,
        view: &'a mut dyn BattleView,
        logger: &'a mut dyn BattleLogger,
        providers: [&'a mut dyn ActionProvider; 2],
    ) -> Self {
        Self {
            field,
            rules,
            rng,
            view,
            logger,
            providers,
            turn_steps: crate::sim::turn::default_turn_steps(),
            outcome: BattleOutcome::Ongoing,
            last_totals: None,
            stall_streak: 0,
        }
    }
}

pub fn default_flow_steps() -> Vec<FlowStep> {
    vec![
        FlowStep {
            name: "setup",
            run: step_setup,
        },
        FlowStep {
            name: "turn-loop",
            run: step_turn_loop,
        },
        FlowStep {
            name: "cleanup",
            run: step_cleanup,
        },
    ]
}

pub fn run_flow(steps: &[FlowStep], state: &mut FlowState<'_>) -> Result<BattleOutcome> {
    for step in steps {
        if (step.run)(state)? == StepResult::Stop {
            break;
        }
    }
    Ok(state.outcome)
}

fn step_setup(state: &mut FlowState<'_>) -> Result<StepResult> {
    for side in [SIDE_PLAYER, SIDE_ENEMY] {
        if state.field.occupied_slots(side).is_empty() {
            bail!("cannot start a battle: side {side} has no active Pokemon");
        }
        for at in state.field.occupied_slots(side) {
            if let Some(pokemon) = state.field.active(at) {
                let ident = slot_ident(at.side, at.slot, pokemon.species.as_str());
                state
                    .logger
                    .log_switch(ident.as_str(), pokemon.species.as_str(), pokemon.current_hp, pokemon.stats.hp);
                state.view.play_switch_in_animation(at, pokemon.species.as_str());
            }
        }
    }
    state.outcome = arbiter::judge(state.field);
    Ok(StepResult::Continue)
}

fn step_turn_loop(state: &mut FlowState<'_>) -> Result<StepResult> {
    while !state.outcome.is_terminal() {
        if state.rules.max_turns > 0 && state.field.turn >= state.rules.max_turns {
            state.logger.info("turn cap reached; calling the battle a draw");
            state.outcome = BattleOutcome::Draw;
            break;
        }
        state.field.turn += 1;
        state.logger.log_turn(state.field.turn);

        let [player_provider, enemy_provider] = &mut state.providers;
        let mut turn_state = TurnState {
            field: &mut *state.field,
            rules: state.rules,
            rng: &mut *state.rng,
            view: &mut *state.view,
            logger: &mut *state.logger,
            providers: [&mut **player_provider, &mut **enemy_provider],
            pending: Vec::new(),
            outcome: BattleOutcome::Ongoing,
            fainted_this_turn: false,
        };
        run_turn(&state.turn_steps, &mut turn_state)?;
        state.outcome = turn_state.outcome;

        // Stall detection: a run of turns where no HP moves on either side
        // forces a draw instead of looping forever.
        let totals = (
            state.field.side(SIDE_PLAYER).total_hp(),
            state.field.side(SIDE_ENEMY).total_hp(),
        );
        if state.last_totals == Some(totals) {
            state.stall_streak += 1;
            if state.rules.stall_turn_limit > 0
                && state.stall_streak >= state.rules.stall_turn_limit
                && !state.outcome.is_terminal()
            {
                state.logger.info("no HP has changed for too long; calling the battle a draw");
                state.outcome = BattleOutcome::Draw;
            }
        } else {
            state.stall_streak = 0;
            state.last_totals = Some(totals);
        }
    }
    Ok(StepResult::Continue)
}

fn step_cleanup(state: &mut FlowState<'_>) -> Result<StepResult> {
    match state.outcome {
        BattleOutcome::Victory => state.logger.log_win("player"),
        BattleOutcome::Defeat => state.logger.log_win("enemy"),
        BattleOutcome::Draw => state.logger.log_tie(),
        BattleOutcome::Ongoing | BattleOutcome::Fled | BattleOutcome::Caught => {}
    }
    Ok(StepResult::Continue)
}
