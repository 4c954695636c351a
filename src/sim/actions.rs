//! Battle actions and the queue that executes them.
//!
//! Every action runs in two phases: an instant logic phase that mutates the
//! field and may emit reaction actions, then a presentation phase against
//! the view. Reactions are spliced onto the front of the queue so they
//! resolve before previously-queued, unrelated actions.

use crate::battle_logger::{slot_ident, BattleLogger};
use crate::data::moves::{get_move, MoveCategory, MoveData, MoveTarget};
use crate::sim::effects::process_move_effects;
use crate::sim::field::{Field, SideConditionKind, SlotRef, Terrain, Weather};
use crate::sim::pokemon::{format_status, Status};
use crate::sim::redirection;
use crate::sim::rng::RandomSource;
use crate::sim::rules::BattleRules;
use crate::sim::stats::{accuracy_stage_multiplier, BoostableStat};
use crate::sim::view::BattleView;
use anyhow::{bail, Result};
use std::collections::VecDeque;

/// Fatal ceiling on queue dequeues per run. Hitting it means an action kept
/// producing unbounded reactions.
pub const QUEUE_ITERATION_CAP: usize = 1000;

/// Everything an action's logic phase may need besides the field itself.
pub struct ExecCtx<'a> {
    pub rules: &'a BattleRules,
    pub rng: &'a mut dyn RandomSource,
    pub logger: &'a mut dyn BattleLogger,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DamageSource {
    Move {
        name: String,
        effectiveness: f32,
        critical: bool,
    },
    Recoil,
    SelfDestruct,
    Residual { cause: &'static str },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolatileKind {
    Flinch,
    Protect,
    FollowMe,
    Taunt { turns: u8 },
    Encore { turns: u8 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum BattleAction {
    UseMove {
        user: SlotRef,
        move_index: usize,
        target: Option<SlotRef>,
    },
    Switch {
        actor: SlotRef,
        party_index: usize,
        forced: bool,
    },
    Damage {
        target: SlotRef,
        amount: u16,
        source: DamageSource,
    },
    Heal {
        target: SlotRef,
        amount: u16,
    },
    Faint {
        target: SlotRef,
    },
    Message {
        text: String,
    },
    StatChange {
        target: SlotRef,
        stat: BoostableStat,
        delta: i8,
    },
    ApplyStatus {
        target: SlotRef,
        status: Status,
        toxic: bool,
    },
    ApplyVolatile {
        target: SlotRef,
        kind: VolatileKind,
    },
    SetWeather {
        kind: Weather,
        turns: u8,
        primal: bool,
    },
    SetTerrain {
        kind: Terrain,
        turns: u8,
    },
    ApplySideCondition {
        side: usize,
        kind: SideConditionKind,
        turns: u8,
    },
}

fn ident_of(field: &Field, at: SlotRef) -> String {
    field
        .active(at)
        .map(|p| slot_ident(at.side, at.slot, p.species.as_str()))
        .unwrap_or_else(|| slot_ident(at.side, at.slot, "empty"))
}

fn accuracy_check(
    field: &Field,
    user: SlotRef,
    target: SlotRef,
    move_data: &MoveData,
    rng: &mut dyn RandomSource,
) -> bool {
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    let user_stage = field.slot(user).volatile.stages.get(BoostableStat::Accuracy);
    let target_stage = field.slot(target).volatile.stages.get(BoostableStat::Evasion);
    let stage = (user_stage - target_stage).clamp(-6, 6);
    let chance = accuracy * accuracy_stage_multiplier(stage);
    (rng.next_f32() * 100.0) < chance
}

impl BattleAction {
    /// Instant state-mutation phase. Returns reaction actions to run before
    /// anything already queued.
    pub fn execute_logic(&self, field: &mut Field, ctx: &mut ExecCtx<'_>) -> Result<Vec<BattleAction>> {
        match self {
            BattleAction::UseMove {
                user,
                move_index,
                target,
            } => execute_use_move(field, ctx, *user, *move_index, *target),
            BattleAction::Switch {
                actor,
                party_index,
                forced,
            } => execute_switch(field, ctx, *actor, *party_index, *forced),
            BattleAction::Damage { target, amount, source } => {
                let ident = ident_of(field, *target);
                let Some(pokemon) = field.active_mut(*target) else {
                    return Ok(Vec::new());
                };
                pokemon.take_damage(*amount);
                let (hp, max_hp) = (pokemon.current_hp, pokemon.stats.hp);
                let fainted = pokemon.is_fainted();
                let species = pokemon.species.clone();
                ctx.logger.log_damage(ident.as_str(), hp, max_hp);
                let mut reactions = Vec::new();
                if let DamageSource::Move { effectiveness, critical, .. } = source {
                    if *critical {
                        reactions.push(BattleAction::Message {
                            text: "A critical hit!".to_string(),
                        });
                    }
                    if *effectiveness > 1.0 {
                        reactions.push(BattleAction::Message {
                            text: "It's super effective!".to_string(),
                        });
                    } else if *effectiveness < 1.0 {
                        reactions.push(BattleAction::Message {
                            text: "It's not very effective...".to_string(),
                        });
                    }
                }
                if fainted {
                    reactions.push(BattleAction::Message {
                        text: format!("{species} fainted!"),
                    });
                    reactions.push(BattleAction::Faint { target: *target });
                }
                Ok(reactions)
            }
            BattleAction::Heal { target, amount } => {
                let ident = ident_of(field, *target);
                let Some(pokemon) = field.active_mut(*target) else {
                    return Ok(Vec::new());
                };
                pokemon.heal(*amount);
                ctx.logger.log_heal(ident.as_str(), pokemon.current_hp, pokemon.stats.hp);
                Ok(Vec::new())
            }
            BattleAction::Faint { target } => {
                let ident = ident_of(field, *target);
                ctx.logger.log_faint(ident.as_str());
                field.slot_mut(*target).clear();
                Ok(Vec::new())
            }
            BattleAction::Message { text } => {
                ctx.logger.info(text.as_str());
                Ok(Vec::new())
            }
            BattleAction::StatChange { target, stat, delta } => {
                let ident = ident_of(field, *target);
                if field.active(*target).is_none() {
                    return Ok(Vec::new());
                }
                let slot = field.slot_mut(*target);
                let (updated, applied) = slot.volatile.stages.modify(*stat, *delta);
                slot.volatile.stages = updated;
                if applied == 0 {
                    return Ok(vec![BattleAction::Message {
                        text: format!("{ident}'s stats can't go any further!"),
                    }]);
                }
                ctx.logger.log_boost(ident.as_str(), &format!("{stat:?}"), applied);
                Ok(Vec::new())
            }
            BattleAction::ApplyStatus { target, status, toxic } => {
                let ident = ident_of(field, *target);
                let Some(pokemon) = field.active_mut(*target) else {
                    return Ok(Vec::new());
                };
                if pokemon.apply_status(*status, *toxic, ctx.rng) {
                    ctx.logger.log_status(ident.as_str(), format_status(*status));
                }
                Ok(Vec::new())
            }
            BattleAction::ApplyVolatile { target, kind } => {
                if field.active(*target).is_none() {
                    return Ok(Vec::new());
                }
                let last_move = field.slot(*target).volatile.last_move.clone();
                let volatile = &mut field.slot_mut(*target).volatile;
                match kind {
                    VolatileKind::Flinch => volatile.flinched = true,
                    VolatileKind::Protect => volatile.protect_active = true,
                    VolatileKind::FollowMe => volatile.follow_me = true,
                    VolatileKind::Taunt { turns } => volatile.taunt_turns = *turns,
                    VolatileKind::Encore { turns } => {
                        if let Some(last) = last_move {
                            volatile.encore_turns = *turns;
                            volatile.encore_move = Some(last);
                        } else {
                            return Ok(vec![BattleAction::Message {
                                text: "But it failed!".to_string(),
                            }]);
                        }
                    }
                }
                Ok(Vec::new())
            }
            BattleAction::SetWeather { kind, turns, primal } => {
                if field.set_weather(*kind, *turns, *primal) {
                    let text = match kind {
                        Weather::Sun => "The sunlight turned harsh!",
                        Weather::Rain => "It started to rain!",
                        Weather::Sand => "A sandstorm kicked up!",
                        Weather::Hail => "It started to hail!",
                    };
                    ctx.logger.log_weather(&format!("{kind:?}"));
                    Ok(vec![BattleAction::Message { text: text.to_string() }])
                } else {
                    Ok(vec![BattleAction::Message {
                        text: "But it failed!".to_string(),
                    }])
                }
            }
            BattleAction::SetTerrain { kind, turns } => {
                field.set_terrain(*kind, *turns);
                ctx.logger.log_terrain(&format!("{kind:?}"));
                let text = match kind {
                    Terrain::Grassy => "Grass grew to cover the battlefield!",
                    Terrain::Electric => "An electric current ran across the battlefield!",
                    Terrain::Psychic => "The battlefield got weird!",
                    Terrain::Misty => "Mist swirled around the battlefield!",
                };
                Ok(vec![BattleAction::Message { text: text.to_string() }])
            }
            BattleAction::ApplySideCondition { side, kind, turns } => {
                field.side_mut(*side).conditions.set(*kind, *turns);
                Ok(Vec::new())
            }
        }
    }

    /// Presentation phase. Runs after the logic phase; the view returning is
    /// the completion acknowledgement.
    pub fn execute_visual(&self, field: &Field, view: &mut dyn BattleView) {
        match self {
            BattleAction::UseMove { user, move_index, .. } => {
                if let Some(name) = field
                    .active(*user)
                    .and_then(|p| p.moves.get(*move_index))
                {
                    view.play_move_animation(*user, name.as_str());
                }
            }
            BattleAction::Switch { actor, .. } => {
                if let Some(pokemon) = field.active(*actor) {
                    view.play_switch_in_animation(*actor, pokemon.species.as_str());
                }
            }
            BattleAction::Damage { target, .. } => {
                view.play_damage_animation(*target);
                if let Some(pokemon) = field.active(*target) {
                    view.update_hp_bar(*target, pokemon.current_hp, pokemon.stats.hp);
                } else {
                    view.update_hp_bar(*target, 0, 0);
                }
            }
            BattleAction::Heal { target, .. } => {
                if let Some(pokemon) = field.active(*target) {
                    view.update_hp_bar(*target, pokemon.current_hp, pokemon.stats.hp);
                }
            }
            BattleAction::Faint { target } => view.play_faint_animation(*target),
            BattleAction::Message { text } => view.show_message(text.as_str()),
            BattleAction::StatChange { target, stat, delta } => {
                view.show_stat_change(*target, *stat, *delta)
            }
            BattleAction::ApplyStatus { target, status, .. } => {
                view.play_status_animation(*target, *status)
            }
            BattleAction::ApplyVolatile { .. }
            | BattleAction::SetWeather { .. }
            | BattleAction::SetTerrain { .. }
            | BattleAction::ApplySideCondition { .. } => {}
        }
    }
}

fn execute_use_move(
    field: &mut Field,
    ctx: &mut ExecCtx<'_>,
    user: SlotRef,
    move_index: usize,
    chosen_target: Option<SlotRef>,
) -> Result<Vec<BattleAction>> {
    let Some(pokemon) = field.active(user) else {
        // The user left the field before acting.
        return Ok(Vec::new());
    };
    if pokemon.is_fainted() {
        return Ok(Vec::new());
    }
    let species = pokemon.species.clone();

    // Pre-move gates: flinch, then persistent status.
    if field.slot(user).volatile.flinched {
        return Ok(vec![BattleAction::Message {
            text: format!("{species} flinched and couldn't move!"),
        }]);
    }
    match field.active(user).and_then(|p| p.status) {
        Some(Status::Sleep) => {
            if let Some(pokemon) = field.active_mut(user) {
                if pokemon.sleep_turns > 0 {
                    pokemon.sleep_turns -= 1;
                    return Ok(vec![BattleAction::Message {
                        text: format!("{species} is fast asleep."),
                    }]);
                }
                pokemon.clear_status();
            }
            return Ok(vec![BattleAction::Message {
                text: format!("{species} woke up!"),
            }]);
        }
        Some(Status::Freeze) => {
            if ctx.rng.chance(20) {
                if let Some(pokemon) = field.active_mut(user) {
                    pokemon.clear_status();
                }
            } else {
                return Ok(vec![BattleAction::Message {
                    text: format!("{species} is frozen solid!"),
                }]);
            }
        }
        Some(Status::Paralysis) => {
            if ctx.rng.chance(25) {
                return Ok(vec![BattleAction::Message {
                    text: format!("{species} is paralyzed! It can't move!"),
                }]);
            }
        }
        _ => {}
    }

    let Some(move_name) = field
        .active(user)
        .and_then(|p| p.moves.get(move_index).cloned())
    else {
        bail!("move index {move_index} out of range for {species}");
    };
    let Some(move_data) = get_move(move_name.as_str()) else {
        bail!("unknown move '{move_name}'");
    };

    if field.slot(user).volatile.taunt_turns > 0 && move_data.category == MoveCategory::Status {
        return Ok(vec![BattleAction::Message {
            text: format!("{species} can't use {} after the taunt!", move_data.name),
        }]);
    }

    field.slot_mut(user).volatile.last_move = Some(move_name.clone());
    let user_ident = ident_of(field, user);

    let mut reactions = vec![BattleAction::Message {
        text: format!("{species} used {}!", move_data.name),
    }];

    if crate::sim::effects::charge_turn_pending(field, user, move_data) {
        ctx.logger.log_move(user_ident.as_str(), move_data.name, user_ident.as_str());
        process_move_effects(field, user, user, move_data, 1.0, true, &mut reactions, ctx.rng);
        return Ok(reactions);
    }

    match move_data.target {
        MoveTarget::User | MoveTarget::UserSide | MoveTarget::EntireField => {
            ctx.logger.log_move(user_ident.as_str(), move_data.name, user_ident.as_str());
            process_move_effects(field, user, user, move_data, 1.0, true, &mut reactions, ctx.rng);
        }
        MoveTarget::SingleAdjacent => {
            let foe_side = Field::opposing(user.side);
            let original = chosen_target
                .filter(|at| at.side != user.side)
                .or_else(|| field.occupied_slots(foe_side).first().copied());
            let Some(original) = original else {
                reactions.push(BattleAction::Message {
                    text: "But there was no target...".to_string(),
                });
                return Ok(reactions);
            };
            let target = redirection::resolve(field, user, original, move_data);
            ctx.logger
                .log_move(user_ident.as_str(), move_data.name, ident_of(field, target).as_str());
            resolve_against_target(field, ctx, user, target, move_data, 1.0, true, &mut reactions);
        }
        MoveTarget::AllAdjacentFoes => {
            let foe_side = Field::opposing(user.side);
            let targets = field.occupied_slots(foe_side);
            if targets.is_empty() {
                reactions.push(BattleAction::Message {
                    text: "But there was no target...".to_string(),
                });
                return Ok(reactions);
            }
            ctx.logger.log_move(user_ident.as_str(), move_data.name, "spread");
            let format_slots = field.side(foe_side).slots.len();
            let spread_factor = ctx.rules.spread.modifier_for(targets.len(), format_slots);
            for (index, target) in targets.into_iter().enumerate() {
                resolve_against_target(
                    field,
                    ctx,
                    user,
                    target,
                    move_data,
                    spread_factor,
                    index == 0,
                    &mut reactions,
                );
            }
        }
    }

    Ok(reactions)
}

#[allow(clippy::too_many_arguments)]
fn resolve_against_target(
    field: &mut Field,
    ctx: &mut ExecCtx<'_>,
    user: SlotRef,
    target: SlotRef,
    move_data: &MoveData,
    spread_factor: f32,
    apply_user_effects: bool,
    reactions: &mut Vec<BattleAction>,
) {
    let Some(defender) = field.active(target) else {
        reactions.push(BattleAction::Message {
            text: "But there was no target...".to_string(),
        });
        return;
    };
    let defender_name = defender.species.clone();

    if field.slot(target).volatile.protect_active && move_data.category != MoveCategory::Status {
        reactions.push(BattleAction::Message {
            text: format!("{defender_name} protected itself!"),
        });
        return;
    }
    if field.slot(target).volatile.semi_invulnerable {
        reactions.push(BattleAction::Message {
            text: format!("{defender_name} avoided the attack!"),
        });
        return;
    }
    if !accuracy_check(field, user, target, move_data, ctx.rng) {
        reactions.push(BattleAction::Message {
            text: format!("{defender_name} avoided the attack!"),
        });
        return;
    }
    process_move_effects(
        field,
        user,
        target,
        move_data,
        spread_factor,
        apply_user_effects,
        reactions,
        ctx.rng,
    );
}

fn execute_switch(
    field: &mut Field,
    ctx: &mut ExecCtx<'_>,
    actor: SlotRef,
    party_index: usize,
    forced: bool,
) -> Result<Vec<BattleAction>> {
    let side = field.side(actor.side);
    if party_index >= side.party.len() {
        bail!("switch target {party_index} out of range");
    }
    if side.party[party_index].is_fainted() {
        bail!("cannot switch in a fainted party member");
    }
    if side.slots.iter().any(|slot| slot.member == Some(party_index)) {
        bail!("party member {party_index} is already on the field");
    }
    if !forced && !ctx.rules.allow_switching {
        bail!("switching is disabled by the battle rules");
    }

    // Volatile state never survives leaving the field.
    field.slot_mut(actor).clear();
    field.slot_mut(actor).member = Some(party_index);

    let Some(pokemon) = field.active(actor) else {
        bail!("switch landed on an invalid slot");
    };
    let species = pokemon.species.clone();
    let ident = slot_ident(actor.side, actor.slot, species.as_str());
    ctx.logger
        .log_switch(ident.as_str(), species.as_str(), pokemon.current_hp, pokemon.stats.hp);
    Ok(vec![BattleAction::Message {
        text: format!("{species} was sent out!"),
    }])
}

/// FIFO queue with reaction splicing.
#[derive(Debug, Default)]
pub struct ActionQueue {
    queue: VecDeque<BattleAction>,
}

/// What one queue run processed.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueReport {
    pub executed: usize,
    pub faints: usize,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, action: BattleAction) {
        self.queue.push_back(action);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain the queue: for each action run logic, then presentation, then
    /// splice its reactions onto the front. Errors out at the iteration cap
    /// instead of looping forever.
    pub fn run(
        &mut self,
        field: &mut Field,
        ctx: &mut ExecCtx<'_>,
        view: &mut dyn BattleView,
    ) -> Result<QueueReport> {
        let mut report = QueueReport::default();
        while let Some(action) = self.queue.pop_front() {
            report.executed += 1;
            if report.executed > QUEUE_ITERATION_CAP {
                bail!(
                    "action queue exceeded {QUEUE_ITERATION_CAP} iterations; \
                     an action is producing unbounded reactions"
                );
            }
            if matches!(action, BattleAction::Faint { .. }) {
                report.faints += 1;
            }
            let reactions = action.execute_logic(field, ctx)?;
            action.execute_visual(field, view);
            for reaction in reactions.into_iter().rev() {
                self.queue.push_front(reaction);
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle_logger::NullLogger;
    use crate::sim::field::{SIDE_ENEMY, SIDE_PLAYER};
    use crate::sim::pokemon::Pokemon;
    use crate::sim::rng::SeededRandom;
    use crate::sim::stats::Nature;
    use crate::sim::view::NullView;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn make_pokemon(species: &str, moves: Vec<&str>) -> Pokemon {
        Pokemon::new(
            species,
            50,
            [0; 6],
            [31; 6],
            Nature::Hardy,
            moves.into_iter().map(|m| m.to_string()).collect(),
            "No Ability",
            None,
        )
        .expect("species exists")
    }

    fn singles_field(player: Pokemon, enemy: Pokemon) -> Field {
        Field::new(&BattleRules::default(), vec![player], vec![enemy]).expect("valid field")
    }

    /// Shared recorder implementing both the view and the logger, so logic
    /// and presentation phases land in one ordered trace.
    #[derive(Clone, Default)]
    struct Probe(Rc<RefCell<Vec<String>>>);

    impl Probe {
        fn trace(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl BattleView for Probe {
        fn show_message(&mut self, text: &str) {
            self.0.borrow_mut().push(format!("visual:message {text}"));
        }
        fn play_damage_animation(&mut self, target: SlotRef) {
            self.0
                .borrow_mut()
                .push(format!("visual:damage {}-{}", target.side, target.slot));
        }
        fn play_faint_animation(&mut self, target: SlotRef) {
            self.0
                .borrow_mut()
                .push(format!("visual:faint {}-{}", target.side, target.slot));
        }
    }

    impl BattleLogger for Probe {
        fn info(&mut self, msg: &str) {
            self.0.borrow_mut().push(format!("logic:info {msg}"));
        }
        fn log_damage(&mut self, target: &str, _hp: u16, _max_hp: u16) {
            self.0.borrow_mut().push(format!("logic:damage {target}"));
        }
        fn log_faint(&mut self, target: &str) {
            self.0.borrow_mut().push(format!("logic:faint {target}"));
        }
    }

    #[test]
    fn reactions_run_before_previously_queued_actions() {
        let mut field = singles_field(
            make_pokemon("Pikachu", vec!["tackle"]),
            make_pokemon("Snorlax", vec!["tackle"]),
        );
        // A 1 HP target faints from action A, producing reactions.
        field
            .active_mut(SlotRef::new(SIDE_ENEMY, 0))
            .expect("active")
            .current_hp = 1;

        let probe = Probe::default();
        let mut view = probe.clone();
        let mut logger = probe.clone();
        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };

        let mut queue = ActionQueue::new();
        queue.push_back(BattleAction::Damage {
            target: SlotRef::new(SIDE_ENEMY, 0),
            amount: 5,
            source: DamageSource::Recoil,
        });
        queue.push_back(BattleAction::Message {
            text: "B".to_string(),
        });
        let report = queue.run(&mut field, &mut ctx, &mut view).expect("queue runs");

        assert_eq!(report.faints, 1);
        let trace = probe.trace();
        let expected = vec![
            "logic:damage p2a: Snorlax".to_string(),
            "visual:damage 1-0".to_string(),
            "logic:info Snorlax fainted!".to_string(),
            "visual:message Snorlax fainted!".to_string(),
            "logic:faint p2a: Snorlax".to_string(),
            "visual:faint 1-0".to_string(),
            "logic:info B".to_string(),
            "visual:message B".to_string(),
        ];
        assert_eq!(trace, expected);
    }

    #[test]
    fn damage_action_reduces_hp_and_emits_faint() {
        let mut field = singles_field(
            make_pokemon("pikachu", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let target = SlotRef::new(SIDE_ENEMY, 0);
        field.active_mut(target).expect("active").current_hp = 10;

        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        let action = BattleAction::Damage {
            target,
            amount: 99,
            source: DamageSource::Recoil,
        };
        let reactions = action.execute_logic(&mut field, &mut ctx).expect("logic runs");
        assert!(reactions
            .iter()
            .any(|a| matches!(a, BattleAction::Faint { .. })));
        assert_eq!(field.active(target).expect("still slotted").current_hp, 0);
    }

    #[test]
    fn faint_action_clears_the_slot() {
        let mut field = singles_field(
            make_pokemon("pikachu", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let target = SlotRef::new(SIDE_ENEMY, 0);
        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        BattleAction::Faint { target }
            .execute_logic(&mut field, &mut ctx)
            .expect("logic runs");
        assert!(field.slot(target).member.is_none());
    }

    #[test]
    fn use_move_against_protected_target_is_blocked() {
        let mut field = singles_field(
            make_pokemon("machamp", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let target = SlotRef::new(SIDE_ENEMY, 0);
        field.slot_mut(target).volatile.protect_active = true;
        let hp_before = field.active(target).expect("active").current_hp;

        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        let mut queue = ActionQueue::new();
        queue.push_back(BattleAction::UseMove {
            user: SlotRef::new(SIDE_PLAYER, 0),
            move_index: 0,
            target: Some(target),
        });
        queue
            .run(&mut field, &mut ctx, &mut NullView)
            .expect("queue runs");
        assert_eq!(field.active(target).expect("active").current_hp, hp_before);
    }

    #[test]
    fn flinched_user_loses_its_action() {
        let mut field = singles_field(
            make_pokemon("machamp", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let user = SlotRef::new(SIDE_PLAYER, 0);
        field.slot_mut(user).volatile.flinched = true;
        let target = SlotRef::new(SIDE_ENEMY, 0);
        let hp_before = field.active(target).expect("active").current_hp;

        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        let mut queue = ActionQueue::new();
        queue.push_back(BattleAction::UseMove {
            user,
            move_index: 0,
            target: Some(target),
        });
        queue
            .run(&mut field, &mut ctx, &mut NullView)
            .expect("queue runs");
        assert_eq!(field.active(target).expect("active").current_hp, hp_before);
    }

    #[test]
    fn switch_replaces_the_slot_and_resets_volatile_state() {
        let mut field = Field::new(
            &BattleRules::default(),
            vec![
                make_pokemon("pikachu", vec!["tackle"]),
                make_pokemon("snorlax", vec!["tackle"]),
            ],
            vec![make_pokemon("gengar", vec!["tackle"])],
        )
        .expect("valid field");
        let actor = SlotRef::new(SIDE_PLAYER, 0);
        field.slot_mut(actor).volatile.flinched = true;

        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        BattleAction::Switch {
            actor,
            party_index: 1,
            forced: false,
        }
        .execute_logic(&mut field, &mut ctx)
        .expect("switch runs");
        assert_eq!(field.slot(actor).member, Some(1));
        assert!(!field.slot(actor).volatile.flinched);
        assert_eq!(field.active(actor).expect("active").species, "snorlax");
    }

    #[test]
    fn queue_iteration_cap_is_fatal() {
        let mut field = singles_field(
            make_pokemon("pikachu", vec!["tackle"]),
            make_pokemon("gengar", vec!["tackle"]),
        );
        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        let mut queue = ActionQueue::new();
        for _ in 0..QUEUE_ITERATION_CAP {
            queue.push_back(BattleAction::Message { text: "tick".to_string() });
        }
        assert!(queue.run(&mut field, &mut ctx, &mut NullView).is_ok());

        for _ in 0..(QUEUE_ITERATION_CAP + 1) {
            queue.push_back(BattleAction::Message { text: "tick".to_string() });
        }
        assert!(queue.run(&mut field, &mut ctx, &mut NullView).is_err());
    }

    #[test]
    fn invalid_switch_targets_are_contract_violations() {
        let mut field = singles_field(
            make_pokemon("pikachu", vec!["tackle"]),
            make_pokemon("gengar", vec!["tackle"]),
        );
        let rules = BattleRules::default();
        let mut rng = SeededRandom::from_seed(0);
        let mut logger = NullLogger;
        let mut ctx = ExecCtx {
            rules: &rules,
            rng: &mut rng,
            logger: &mut logger,
        };
        let result = BattleAction::Switch {
            actor: SlotRef::new(SIDE_PLAYER, 0),
            party_index: 5,
            forced: false,
        }
        .execute_logic(&mut field, &mut ctx);
        assert!(result.is_err());
    }
}
