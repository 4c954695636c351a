//! Move-effect orchestration: charge bookkeeping, the damage loop, and the
//! handler registry dispatching each declared effect to its handler.

use crate::data::moves::{normalize_move_name, MoveCategory, MoveData, MoveEffect};
use crate::sim::actions::{BattleAction, DamageSource, VolatileKind};
use crate::sim::damage;
use crate::sim::field::{Field, SideConditionKind, SlotRef, Terrain, Weather};
use crate::sim::pokemon::Status;
use crate::sim::rng::RandomSource;
use crate::sim::stats::BoostableStat;

#[derive(Clone, Copy, Debug)]
pub struct EffectOutcome {
    pub total_damage: u16,
    /// The rest of this move's resolution (for this target) was cut short:
    /// charge turn, or an immune target.
    pub should_stop: bool,
}

fn charge_effect(move_data: &MoveData) -> Option<bool> {
    move_data.effects.iter().find_map(|effect| match effect {
        MoveEffect::Charge { semi_invulnerable } => Some(*semi_invulnerable),
        _ => None,
    })
}

/// True when using this move now would spend the turn charging. A charge
/// turn needs no target and cannot miss.
pub(crate) fn charge_turn_pending(field: &Field, user: SlotRef, move_data: &MoveData) -> bool {
    if charge_effect(move_data).is_none() {
        return false;
    }
    let move_id = normalize_move_name(move_data.name);
    field.slot(user).volatile.charging_move.as_deref() != Some(move_id.as_str())
}

/// Number of hits this use. The 2-5 band uses the classic weighted
/// distribution instead of a flat roll.
fn multi_hit_count(move_data: &MoveData, rng: &mut dyn RandomSource) -> u8 {
    let Some((min, max)) = move_data.effects.iter().find_map(|effect| match effect {
        MoveEffect::MultiHit { min, max } => Some((*min, *max)),
        _ => None,
    }) else {
        return 1;
    };
    if min == max {
        return min;
    }
    if (min, max) == (2, 5) {
        return match rng.next_max(20) {
            0..=6 => 2,
            7..=13 => 3,
            14..=16 => 4,
            _ => 5,
        };
    }
    rng.next_range(min as u32, max as u32) as u8
}

fn status_from_id(id: &str) -> Option<(Status, bool)> {
    match id {
        "brn" => Some((Status::Burn, false)),
        "par" => Some((Status::Paralysis, false)),
        "psn" => Some((Status::Poison, false)),
        "tox" => Some((Status::Poison, true)),
        "slp" => Some((Status::Sleep, false)),
        "frz" => Some((Status::Freeze, false)),
        _ => None,
    }
}

fn weather_from_id(id: &str) -> Option<Weather> {
    match id {
        "sun" => Some(Weather::Sun),
        "rain" => Some(Weather::Rain),
        "sand" => Some(Weather::Sand),
        "hail" => Some(Weather::Hail),
        _ => None,
    }
}

fn terrain_from_id(id: &str) -> Option<Terrain> {
    match id {
        "grassy" => Some(Terrain::Grassy),
        "electric" => Some(Terrain::Electric),
        "psychic" => Some(Terrain::Psychic),
        "misty" => Some(Terrain::Misty),
        _ => None,
    }
}

fn fraction_of(value: u16, fraction: (u8, u8)) -> u16 {
    let (num, den) = fraction;
    if den == 0 || value == 0 {
        return 0;
    }
    let numerator = value as u32 * num as u32;
    (((numerator + den as u32 / 2) / den as u32).max(1)) as u16
}

/// Run a move's full effect set against one target, appending the resulting
/// actions to `sink`.
///
/// `spread_factor` is the per-target reduction already decided by the
/// spread policy; `apply_user_effects` gates one-shot user effects
/// (self-destruct) so spread moves trigger them only once.
pub(crate) fn process_move_effects(
    field: &mut Field,
    user: SlotRef,
    target: SlotRef,
    move_data: &MoveData,
    spread_factor: f32,
    apply_user_effects: bool,
    sink: &mut Vec<BattleAction>,
    rng: &mut dyn RandomSource,
) -> EffectOutcome {
    let mut outcome = EffectOutcome {
        total_damage: 0,
        should_stop: false,
    };

    // Charge-then-attack: the first turn only charges.
    if let Some(semi_invulnerable) = charge_effect(move_data) {
        let move_id = normalize_move_name(move_data.name);
        let already_charging =
            field.slot(user).volatile.charging_move.as_deref() == Some(move_id.as_str());
        if !already_charging {
            let volatile = &mut field.slot_mut(user).volatile;
            volatile.charging_move = Some(move_id);
            volatile.semi_invulnerable = semi_invulnerable;
            let name = field
                .active(user)
                .map(|p| p.species.clone())
                .unwrap_or_default();
            sink.push(BattleAction::Message {
                text: format!("{name} is gathering power!"),
            });
            outcome.should_stop = true;
            return outcome;
        }
        let volatile = &mut field.slot_mut(user).volatile;
        volatile.charging_move = None;
        volatile.semi_invulnerable = false;
    }

    // Damage loop: the full pipeline runs once per hit so every hit rolls
    // its own critical and random factor.
    if move_data.category != MoveCategory::Status {
        let hits = multi_hit_count(move_data, rng);
        for _ in 0..hits {
            let ctx = damage::calculate(field, user, target, move_data, None, None, rng);
            if ctx.is_immune() {
                let name = field
                    .active(target)
                    .map(|p| p.species.clone())
                    .unwrap_or_default();
                sink.push(BattleAction::Message {
                    text: format!("It doesn't affect {name}..."),
                });
                outcome.should_stop = true;
                return outcome;
            }
            let mut amount = ctx.final_damage;
            if spread_factor < 1.0 && !ctx.fixed {
                amount = (((amount as f32) * spread_factor).floor() as u16).max(1);
            }
            outcome.total_damage = outcome.total_damage.saturating_add(amount);
            sink.push(BattleAction::Damage {
                target,
                amount,
                source: DamageSource::Move {
                    name: move_data.name.to_string(),
                    effectiveness: ctx.type_effectiveness,
                    critical: ctx.critical,
                },
            });
        }
        if hits > 1 {
            sink.push(BattleAction::Message {
                text: format!("Hit {hits} times!"),
            });
        }
    }

    // Handler registry: every remaining declared effect dispatches to its
    // handler, in declaration order.
    for effect in move_data.effects {
        run_effect_handler(
            field,
            user,
            target,
            effect,
            outcome.total_damage,
            apply_user_effects,
            sink,
            rng,
        );
    }

    outcome
}

/// The registry proper. Matching is exhaustive: a new `MoveEffect` variant
/// does not compile until it has a handler arm.
fn run_effect_handler(
    field: &Field,
    user: SlotRef,
    target: SlotRef,
    effect: &MoveEffect,
    total_damage: u16,
    apply_user_effects: bool,
    sink: &mut Vec<BattleAction>,
    rng: &mut dyn RandomSource,
) {
    match effect {
        // Already consumed before the registry runs.
        MoveEffect::FixedDamage { .. }
        | MoveEffect::MultiHit { .. }
        | MoveEffect::Charge { .. }
        | MoveEffect::TerrainPriority { .. } => {}

        MoveEffect::Ailment { ailment, chance } => {
            handle_ailment(field, user, target, ailment, *chance, sink, rng)
        }
        MoveEffect::StatChange {
            stat,
            delta,
            chance,
            target_self,
        } => handle_stat_change(field, user, target, stat, *delta, *chance, *target_self, sink, rng),
        MoveEffect::Recoil { fraction } => {
            if total_damage > 0 {
                sink.push(BattleAction::Damage {
                    target: user,
                    amount: fraction_of(total_damage, *fraction),
                    source: DamageSource::Recoil,
                });
            }
        }
        MoveEffect::Drain { fraction } => {
            if total_damage > 0 {
                sink.push(BattleAction::Heal {
                    target: user,
                    amount: fraction_of(total_damage, *fraction),
                });
            }
        }
        MoveEffect::Heal { fraction } => {
            if let Some(pokemon) = field.active(user) {
                if pokemon.current_hp < pokemon.stats.hp {
                    sink.push(BattleAction::Heal {
                        target: user,
                        amount: fraction_of(pokemon.stats.hp, *fraction),
                    });
                } else {
                    sink.push(BattleAction::Message {
                        text: format!("{}'s HP is already full!", pokemon.species),
                    });
                }
            }
        }
        MoveEffect::Flinch { chance } => {
            if rng.chance(*chance) && field.active(target).is_some() {
                sink.push(BattleAction::ApplyVolatile {
                    target,
                    kind: VolatileKind::Flinch,
                });
            }
        }
        MoveEffect::Protect => sink.push(BattleAction::ApplyVolatile {
            target: user,
            kind: VolatileKind::Protect,
        }),
        MoveEffect::FollowMe => sink.push(BattleAction::ApplyVolatile {
            target: user,
            kind: VolatileKind::FollowMe,
        }),
        MoveEffect::Weather { kind } => {
            if let Some(weather) = weather_from_id(kind) {
                sink.push(BattleAction::SetWeather {
                    kind: weather,
                    turns: 5,
                    primal: false,
                });
            }
        }
        MoveEffect::Terrain { kind } => {
            if let Some(terrain) = terrain_from_id(kind) {
                sink.push(BattleAction::SetTerrain {
                    kind: terrain,
                    turns: 5,
                });
            }
        }
        MoveEffect::SideCondition { kind, turns } => {
            if let Some(condition) = SideConditionKind::from_id(kind) {
                sink.push(BattleAction::ApplySideCondition {
                    side: user.side,
                    kind: condition,
                    turns: *turns,
                });
            }
        }
        MoveEffect::SelfDestruct => {
            if apply_user_effects {
                if let Some(pokemon) = field.active(user) {
                    sink.push(BattleAction::Damage {
                        target: user,
                        amount: pokemon.current_hp,
                        source: DamageSource::SelfDestruct,
                    });
                }
            }
        }
        MoveEffect::Restrict { kind, turns } => {
            let restriction = match *kind {
                "taunt" => Some(VolatileKind::Taunt { turns: *turns }),
                "encore" => Some(VolatileKind::Encore { turns: *turns }),
                _ => None,
            };
            if let Some(kind) = restriction {
                if field.active(target).is_some() {
                    sink.push(BattleAction::ApplyVolatile { target, kind });
                }
            }
        }
    }
}

fn handle_ailment(
    field: &Field,
    _user: SlotRef,
    target: SlotRef,
    ailment: &str,
    chance: u8,
    sink: &mut Vec<BattleAction>,
    rng: &mut dyn RandomSource,
) {
    let Some((status, toxic)) = status_from_id(ailment) else {
        return;
    };
    if !rng.chance(chance) {
        return;
    }
    if field.side(target.side).conditions.safeguard_turns > 0 {
        return;
    }
    let Some(pokemon) = field.active(target) else {
        return;
    };
    if !pokemon.can_receive_status(status) {
        return;
    }
    sink.push(BattleAction::ApplyStatus {
        target,
        status,
        toxic,
    });
}

#[allow(clippy::too_many_arguments)]
fn handle_stat_change(
    field: &Field,
    user: SlotRef,
    target: SlotRef,
    stat: &str,
    delta: i8,
    chance: u8,
    target_self: bool,
    sink: &mut Vec<BattleAction>,
    rng: &mut dyn RandomSource,
) {
    let Some(stat) = BoostableStat::from_id(stat) else {
        return;
    };
    if !rng.chance(chance) {
        return;
    }
    let at = if target_self { user } else { target };
    if field.active(at).is_some() {
        sink.push(BattleAction::StatChange {
            target: at,
            stat,
            delta,
        });
    }
}
