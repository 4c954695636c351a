//! Damage calculation pipeline: a fixed sequence of steps transforming
//! (attacker, defender, move, field) into a final integer damage value.

use crate::data::moves::{MoveCategory, MoveData, MoveEffect};
use crate::data::types::{effectiveness_dual, Type};
use crate::sim::field::{is_grounded, Field, SlotRef, Terrain, Weather};
use crate::sim::pokemon::{Pokemon, Status};
use crate::sim::rng::RandomSource;
use crate::sim::stats::{stage_multiplier, BoostableStat, StatStages};

/// Base chance of a critical hit, as 1 in N.
const CRIT_DENOMINATOR: u32 = 24;
const CRIT_MULTIPLIER: f32 = 1.5;
const STAB_MULTIPLIER: f32 = 1.5;

/// Per-hit calculation scratchpad. Created at the pipeline entry point,
/// threaded through the steps, discarded after the hit.
#[derive(Clone, Copy, Debug)]
pub struct DamageContext {
    pub base_damage: f32,
    pub multiplier: f32,
    pub type_effectiveness: f32,
    pub stab: bool,
    pub critical: bool,
    pub random_factor: f32,
    /// Set when the move declared exact damage; stat steps were skipped.
    pub fixed: bool,
    pub final_damage: u16,
}

impl DamageContext {
    fn new() -> Self {
        Self {
            base_damage: 0.0,
            multiplier: 1.0,
            type_effectiveness: 1.0,
            stab: false,
            critical: false,
            random_factor: 1.0,
            fixed: false,
            final_damage: 0,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.type_effectiveness == 0.0 && !self.fixed
    }
}

fn fixed_damage(move_data: &MoveData) -> Option<u16> {
    move_data.effects.iter().find_map(|effect| match effect {
        MoveEffect::FixedDamage { amount } => Some(*amount),
        _ => None,
    })
}

fn offensive_stat(pokemon: &Pokemon, stages: &StatStages, category: MoveCategory) -> f32 {
    let (base, stage) = match category {
        MoveCategory::Physical => (pokemon.stats.atk, stages.get(BoostableStat::Atk)),
        MoveCategory::Special => (pokemon.stats.spa, stages.get(BoostableStat::Spa)),
        MoveCategory::Status => return 0.0,
    };
    let mut stat = (base as f32) * stage_multiplier(stage);
    if pokemon.has_ability("Huge Power") && category == MoveCategory::Physical {
        stat *= 2.0;
    }
    if pokemon.has_ability("Guts") && pokemon.status.is_some() {
        stat *= 1.5;
    }
    if let Some(item) = pokemon.held_item() {
        stat *= match category {
            MoveCategory::Physical => item.physical_attack_multiplier,
            MoveCategory::Special => item.special_attack_multiplier,
            MoveCategory::Status => 1.0,
        };
    }
    stat.floor().max(1.0)
}

fn defensive_stat(pokemon: &Pokemon, stages: &StatStages, category: MoveCategory) -> f32 {
    let (base, stage) = match category {
        MoveCategory::Physical => (pokemon.stats.def, stages.get(BoostableStat::Def)),
        MoveCategory::Special => (pokemon.stats.spd, stages.get(BoostableStat::Spd)),
        MoveCategory::Status => return 1.0,
    };
    ((base as f32) * stage_multiplier(stage)).floor().max(1.0)
}

fn weather_modifier(weather: Option<Weather>, move_type: Type) -> f32 {
    match weather {
        Some(Weather::Sun) => match move_type {
            Type::Fire => 1.5,
            Type::Water => 0.5,
            _ => 1.0,
        },
        Some(Weather::Rain) => match move_type {
            Type::Water => 1.5,
            Type::Fire => 0.5,
            _ => 1.0,
        },
        _ => 1.0,
    }
}

fn terrain_modifier(
    terrain: Option<Terrain>,
    attacker: &Pokemon,
    defender: &Pokemon,
    move_type: Type,
) -> f32 {
    match terrain {
        Some(Terrain::Grassy) if move_type == Type::Grass && is_grounded(attacker) => 1.3,
        Some(Terrain::Electric) if move_type == Type::Electric && is_grounded(attacker) => 1.3,
        Some(Terrain::Psychic) if move_type == Type::Psychic && is_grounded(attacker) => 1.3,
        Some(Terrain::Misty) if move_type == Type::Dragon && is_grounded(defender) => 0.5,
        _ => 1.0,
    }
}

/// Run the full pipeline for one hit.
///
/// `force_critical` and `fixed_random` bypass the corresponding random
/// draws for deterministic callers.
pub fn calculate(
    field: &Field,
    attacker: SlotRef,
    defender: SlotRef,
    move_data: &MoveData,
    force_critical: Option<bool>,
    fixed_random: Option<f32>,
    rng: &mut dyn RandomSource,
) -> DamageContext {
    let mut ctx = DamageContext::new();

    // Step 1: base damage, with the fixed-damage short circuit.
    if let Some(amount) = fixed_damage(move_data) {
        ctx.fixed = true;
        ctx.final_damage = amount;
        return ctx;
    }
    let (Some(user), Some(target)) = (field.active(attacker), field.active(defender)) else {
        return ctx;
    };
    if move_data.category == MoveCategory::Status {
        return ctx;
    }
    let power = move_data.base_power.unwrap_or(0);
    if power == 0 {
        return ctx;
    }
    let attack = offensive_stat(user, &field.slot(attacker).volatile.stages, move_data.category);
    let defense = defensive_stat(target, &field.slot(defender).volatile.stages, move_data.category);
    let level = user.level as f32;
    ctx.base_damage = ((2.0 * level / 5.0 + 2.0) * power as f32 * attack / defense) / 50.0 + 2.0;

    // Step 2: type effectiveness.
    ctx.type_effectiveness =
        effectiveness_dual(move_data.move_type, target.types[0], target.types[1]);
    if ctx.type_effectiveness == 0.0 {
        return ctx;
    }

    // Step 3: STAB.
    if user.has_type(move_data.move_type) {
        ctx.stab = true;
        ctx.multiplier *= STAB_MULTIPLIER;
    }

    // Step 4: critical hit.
    ctx.critical = match force_critical {
        Some(forced) => forced,
        None => rng.next_max(CRIT_DENOMINATOR) == 0,
    };
    if ctx.critical {
        ctx.multiplier *= CRIT_MULTIPLIER;
    }

    // Step 5: weather, terrain and screens.
    ctx.multiplier *= weather_modifier(field.weather_kind(), move_data.move_type);
    ctx.multiplier *= terrain_modifier(field.terrain_kind(), user, target, move_data.move_type);
    if !ctx.critical {
        let screens = &field.side(defender.side).conditions;
        match move_data.category {
            MoveCategory::Physical if screens.reflect_turns > 0 => ctx.multiplier *= 0.5,
            MoveCategory::Special if screens.light_screen_turns > 0 => ctx.multiplier *= 0.5,
            _ => {}
        }
    }

    // Burn halves physical damage unless the attacker has Guts.
    if move_data.category == MoveCategory::Physical
        && matches!(user.status, Some(Status::Burn))
        && !user.has_ability("Guts")
    {
        ctx.multiplier *= 0.5;
    }

    // Step 6: random factor in [0.85, 1.0].
    ctx.random_factor = match fixed_random {
        Some(roll) => roll.clamp(0.85, 1.0),
        None => 0.85 + rng.next_max(16) as f32 * 0.01,
    };

    // Step 7: finalize.
    let raw = ctx.base_damage * ctx.type_effectiveness * ctx.multiplier * ctx.random_factor;
    ctx.final_damage = (raw.floor() as u16).max(1);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::moves::get_move;
    use crate::sim::field::{SIDE_ENEMY, SIDE_PLAYER};
    use crate::sim::rng::SeededRandom;
    use crate::sim::rules::BattleRules;
    use crate::sim::stats::Nature;

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

    fn attacker() -> SlotRef {
        SlotRef::new(SIDE_PLAYER, 0)
    }

    fn defender() -> SlotRef {
        SlotRef::new(SIDE_ENEMY, 0)
    }

    #[test]
    fn fixed_damage_ignores_stat_pairings() {
        let dragon_rage = get_move("dragonrage").expect("move exists");
        let mut rng = SeededRandom::from_seed(0);

        // Wildly different pairings: feeble attacker into a wall, and a
        // powerhouse into a glass cannon.
        let weak = singles_field(
            make_pokemon("blissey", vec!["dragonrage"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let strong = singles_field(
            make_pokemon("garchomp", vec!["dragonrage"]),
            make_pokemon("alakazam", vec!["tackle"]),
        );
        for field in [&weak, &strong] {
            let ctx = calculate(field, attacker(), defender(), dragon_rage, None, None, &mut rng);
            assert!(ctx.fixed);
            assert_eq!(ctx.final_damage, 40);
        }
    }

    #[test]
    fn pipeline_is_reproducible_with_overrides() {
        let thunderbolt = get_move("thunderbolt").expect("move exists");
        let field = singles_field(
            make_pokemon("pikachu", vec!["thunderbolt"]),
            make_pokemon("gyarados", vec!["tackle"]),
        );
        let mut first = None;
        for seed in [1u64, 99, 12345] {
            let mut rng = SeededRandom::from_seed(seed);
            let ctx = calculate(
                &field,
                attacker(),
                defender(),
                thunderbolt,
                Some(false),
                Some(1.0),
                &mut rng,
            );
            match first {
                None => first = Some(ctx.final_damage),
                Some(expected) => assert_eq!(ctx.final_damage, expected),
            }
        }
    }

    #[test]
    fn stab_and_effectiveness_raise_damage() {
        let thunderbolt = get_move("thunderbolt").expect("move exists");
        let field = singles_field(
            make_pokemon("pikachu", vec!["thunderbolt"]),
            make_pokemon("gyarados", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let ctx = calculate(
            &field,
            attacker(),
            defender(),
            thunderbolt,
            Some(false),
            Some(1.0),
            &mut rng,
        );
        assert!(ctx.stab);
        assert_eq!(ctx.type_effectiveness, 4.0);
        assert!(ctx.final_damage > 0);
    }

    #[test]
    fn ground_moves_cannot_touch_flyers() {
        let earthquake = get_move("earthquake").expect("move exists");
        let field = singles_field(
            make_pokemon("garchomp", vec!["earthquake"]),
            make_pokemon("charizard", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let ctx = calculate(&field, attacker(), defender(), earthquake, None, None, &mut rng);
        assert!(ctx.is_immune());
        assert_eq!(ctx.final_damage, 0);
    }

    #[test]
    fn forced_critical_multiplies_damage() {
        let tackle = get_move("tackle").expect("move exists");
        let field = singles_field(
            make_pokemon("snorlax", vec!["tackle"]),
            make_pokemon("blissey", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let plain = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);
        let crit = calculate(&field, attacker(), defender(), tackle, Some(true), Some(1.0), &mut rng);
        assert_eq!(
            crit.final_damage,
            ((plain.final_damage as f32) * 1.5).floor() as u16
        );
    }

    #[test]
    fn rain_buffs_water_and_cuts_fire() {
        let flamethrower = get_move("flamethrower").expect("move exists");
        let mut field = singles_field(
            make_pokemon("charizard", vec!["flamethrower"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let clear = calculate(&field, attacker(), defender(), flamethrower, Some(false), Some(1.0), &mut rng);
        field.set_weather(Weather::Rain, 5, false);
        let rained = calculate(&field, attacker(), defender(), flamethrower, Some(false), Some(1.0), &mut rng);
        assert!(rained.final_damage < clear.final_damage);
    }

    #[test]
    fn grassy_terrain_only_boosts_grounded_attackers() {
        let gigadrain = get_move("gigadrain").expect("move exists");
        let mut field = singles_field(
            make_pokemon("venusaur", vec!["gigadrain"]),
            make_pokemon("blastoise", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let plain = calculate(&field, attacker(), defender(), gigadrain, Some(false), Some(1.0), &mut rng);
        field.set_terrain(Terrain::Grassy, 5);
        let boosted = calculate(&field, attacker(), defender(), gigadrain, Some(false), Some(1.0), &mut rng);
        assert!(boosted.final_damage > plain.final_damage);

        // A flying attacker gets no terrain boost.
        let mut airborne = singles_field(
            make_pokemon("charizard", vec!["gigadrain"]),
            make_pokemon("blastoise", vec!["tackle"]),
        );
        airborne.set_terrain(Terrain::Grassy, 5);
        let base = calculate(&airborne, attacker(), defender(), gigadrain, Some(false), Some(1.0), &mut rng);
        airborne.terrain = None;
        let no_terrain = calculate(&airborne, attacker(), defender(), gigadrain, Some(false), Some(1.0), &mut rng);
        assert_eq!(base.final_damage, no_terrain.final_damage);
    }

    #[test]
    fn burn_halves_physical_damage() {
        let tackle = get_move("tackle").expect("move exists");
        let mut field = singles_field(
            make_pokemon("snorlax", vec!["tackle"]),
            make_pokemon("blissey", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let healthy = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);
        field.active_mut(attacker()).expect("active").status = Some(Status::Burn);
        let burned = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);
        assert!(burned.final_damage < healthy.final_damage);
    }

    #[test]
    fn stat_stages_swing_the_formula() {
        let tackle = get_move("tackle").expect("move exists");
        let mut field = singles_field(
            make_pokemon("machamp", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let neutral = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);

        let at = attacker();
        let (stages, _) = field.slot(at).volatile.stages.modify(BoostableStat::Atk, 2);
        field.slot_mut(at).volatile.stages = stages;
        let boosted = calculate(&field, at, defender(), tackle, Some(false), Some(1.0), &mut rng);
        assert!(boosted.final_damage >= neutral.final_damage * 2 - 2);
        assert!(boosted.final_damage > neutral.final_damage);
    }

    #[test]
    fn reflect_halves_physical_damage_except_on_crits() {
        let tackle = get_move("tackle").expect("move exists");
        let mut field = singles_field(
            make_pokemon("snorlax", vec!["tackle"]),
            make_pokemon("blissey", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let open = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);
        field.side_mut(SIDE_ENEMY).conditions.reflect_turns = 5;
        let screened = calculate(&field, attacker(), defender(), tackle, Some(false), Some(1.0), &mut rng);
        assert_eq!(
            screened.final_damage,
            ((open.final_damage as f32) * 0.5).floor() as u16
        );

        // A critical hit goes straight through the screen.
        let through = calculate(&field, attacker(), defender(), tackle, Some(true), Some(1.0), &mut rng);
        assert!(through.final_damage > screened.final_damage);
    }

    #[test]
    fn minimum_damage_is_one() {
        let tackle = get_move("tackle").expect("move exists");
        let field = singles_field(
            make_pokemon("blissey", vec!["tackle"]),
            make_pokemon("snorlax", vec!["tackle"]),
        );
        let mut rng = SeededRandom::from_seed(0);
        let ctx = calculate(&field, attacker(), defender(), tackle, Some(false), Some(0.85), &mut rng);
        assert!(ctx.final_damage >= 1);
    }
}
