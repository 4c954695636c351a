//! High-level battle engine facade.

use crate::battle_logger::BattleLog;
use crate::sim::arbiter::BattleOutcome;
use crate::sim::field::Field;
use crate::sim::flow::{default_flow_steps, run_flow, FlowState};
use crate::sim::pokemon::Pokemon;
use crate::sim::provider::ActionProvider;
use crate::sim::rng::SeededRandom;
use crate::sim::rules::BattleRules;
use crate::sim::view::{BattleView, NullView};
use anyhow::Result;

/// Owns everything a battle needs: the field, the rules, the one random
/// source, and the collected log. Replaying with the same seed, parties and
/// providers reproduces the battle exactly.
pub struct BattleEngine {
    field: Field,
    rules: BattleRules,
    rng: SeededRandom,
    log: BattleLog,
}

impl BattleEngine {
    /// Build a battle from two parties.
    ///
    /// Boss multipliers from the rules are applied to the enemy party here,
    /// before the field is assembled.
    pub fn new(
        player_party: Vec<Pokemon>,
        enemy_party: Vec<Pokemon>,
        rules: BattleRules,
        seed: u64,
    ) -> Result<Self> {
        assert!(!player_party.is_empty(), "player party must not be empty");
        assert!(!enemy_party.is_empty(), "enemy party must not be empty");
        let mut player_party = player_party;
        let mut enemy_party = enemy_party;
        if rules.is_boss_battle() {
            for pokemon in &mut enemy_party {
                pokemon.scale_for_boss(rules.boss_hp_multiplier, rules.boss_stat_multiplier);
            }
        }
        if !rules.allow_items {
            for pokemon in player_party.iter_mut().chain(enemy_party.iter_mut()) {
                pokemon.item = None;
            }
        }
        let field = Field::new(&rules, player_party, enemy_party)?;
        Ok(Self {
            field,
            rules,
            rng: SeededRandom::from_seed(seed),
            log: BattleLog::new(),
        })
    }

    /// Drive the battle to its conclusion with a presentation layer.
    pub fn run(
        &mut self,
        player: &mut dyn ActionProvider,
        enemy: &mut dyn ActionProvider,
        view: &mut dyn BattleView,
    ) -> Result<BattleOutcome> {
        let steps = default_flow_steps();
        let mut state = FlowState::new(
            &mut self.field,
            &self.rules,
            &mut self.rng,
            view,
            &mut self.log,
            [player, enemy],
        );
        run_flow(&steps, &mut state)
    }

    /// Drive the battle with no presentation at all.
    pub fn run_headless(
        &mut self,
        player: &mut dyn ActionProvider,
        enemy: &mut dyn ActionProvider,
    ) -> Result<BattleOutcome> {
        let mut view = NullView;
        self.run(player, enemy, &mut view)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }
}

/// Convenience entry point for one-shot headless battles.
pub fn run_battle(
    player_party: Vec<Pokemon>,
    enemy_party: Vec<Pokemon>,
    rules: BattleRules,
    seed: u64,
    player: &mut dyn ActionProvider,
    enemy: &mut dyn ActionProvider,
) -> Result<BattleOutcome> {
    let mut engine = BattleEngine::new(player_party, enemy_party, rules, seed)?;
    engine.run_headless(player, enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::{SlotRef, SIDE_ENEMY};
    use crate::sim::provider::{AttackProvider, PassProvider};
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

    #[test]
    fn boss_multipliers_scale_the_enemy_party() {
        let rules = BattleRules {
            boss_hp_multiplier: 2.0,
            boss_stat_multiplier: 1.5,
            ..BattleRules::default()
        };
        let reference = make_pokemon("snorlax", vec!["tackle"]);
        let engine = BattleEngine::new(
            vec![make_pokemon("pikachu", vec!["tackle"])],
            vec![make_pokemon("snorlax", vec!["tackle"])],
            rules,
            1,
        )
        .expect("engine builds");
        let boss = engine
            .field()
            .active(SlotRef::new(SIDE_ENEMY, 0))
            .expect("active");
        assert_eq!(boss.stats.hp, reference.stats.hp * 2);
        assert_eq!(boss.current_hp, boss.stats.hp);
        assert!(boss.stats.atk > reference.stats.atk);
    }

    #[test]
    fn engine_records_a_battle_log() {
        let mut engine = BattleEngine::new(
            vec![make_pokemon("machamp", vec!["tackle"])],
            vec![make_pokemon("pikachu", vec!["splash"])],
            BattleRules::default(),
            5,
        )
        .expect("engine builds");
        let outcome = engine
            .run_headless(&mut AttackProvider, &mut PassProvider)
            .expect("battle runs");
        assert_eq!(outcome, BattleOutcome::Victory);
        assert!(engine.log().events().iter().any(|line| line.starts_with("|turn|")));
        assert!(engine.log().events().iter().any(|line| line == "|win|player"));
    }

    #[test]
    fn disallowing_items_strips_held_items() {
        let mut holder = make_pokemon("snorlax", vec!["splash"]);
        holder.item = Some("Leftovers".to_string());
        let engine = BattleEngine::new(
            vec![holder],
            vec![make_pokemon("pikachu", vec!["splash"])],
            BattleRules {
                allow_items: false,
                ..BattleRules::default()
            },
            3,
        )
        .expect("engine builds");
        let snorlax = engine
            .field()
            .active(SlotRef::new(crate::sim::field::SIDE_PLAYER, 0))
            .expect("active");
        assert!(snorlax.item.is_none());
    }

    #[test]
    fn run_battle_is_seed_deterministic() {
        let play = |seed: u64| {
            run_battle(
                vec![make_pokemon("garchomp", vec!["dragonclaw"])],
                vec![make_pokemon("gyarados", vec!["icebeam"])],
                BattleRules::default(),
                seed,
                &mut AttackProvider,
                &mut AttackProvider,
            )
            .expect("battle runs")
        };
        assert_eq!(play(77), play(77));
    }
}
