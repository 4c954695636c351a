use pokemon_battle_engine::battle_logger::NullLogger;
use pokemon_battle_engine::prelude::*;
use pokemon_battle_engine::sim::actions::{ActionQueue, BattleAction, ExecCtx};
use pokemon_battle_engine::sim::damage;
use pokemon_battle_engine::sim::field::{SIDE_ENEMY, SIDE_PLAYER};
use pokemon_battle_engine::sim::stats::Nature;
use std::collections::VecDeque;

fn make_pokemon(species: &str, moves: Vec<&str>, ability: &str) -> Pokemon {
    Pokemon::new(
        species,
        50,
        [0; 6],
        [31; 6],
        Nature::Hardy,
        moves.into_iter().map(|m| m.to_string()).collect(),
        ability,
        None,
    )
    .expect("species exists")
}

struct ScriptedProvider {
    script: VecDeque<ChosenAction>,
}

impl ScriptedProvider {
    fn new(choices: Vec<ChosenAction>) -> Self {
        Self {
            script: choices.into(),
        }
    }
}

impl ActionProvider for ScriptedProvider {
    fn choose_action(&mut self, _field: &Field, _actor: SlotRef) -> ChosenAction {
        self.script.pop_front().unwrap_or(ChosenAction::Pass)
    }
}

#[test]
fn full_singles_battle_reaches_a_decision() {
    let mut engine = BattleEngine::new(
        vec![
            make_pokemon("garchomp", vec!["dragonclaw"], "Rough Skin"),
            make_pokemon("pikachu", vec!["thunderbolt"], "Static"),
        ],
        vec![
            make_pokemon("gyarados", vec!["icebeam"], "Intimidate"),
            make_pokemon("gengar", vec!["shadowball"], "Cursed Body"),
        ],
        BattleRules::default(),
        1234,
    )
    .expect("engine builds");
    let outcome = engine
        .run_headless(&mut AttackProvider, &mut AttackProvider)
        .expect("battle runs");
    assert!(outcome.is_terminal());
    let events = engine.log().events();
    assert!(events.iter().any(|line| line.starts_with("|turn|")));
    assert!(events
        .iter()
        .any(|line| line.starts_with("|win|") || line.as_str() == "|tie|"));
}

#[test]
fn replaying_a_seed_reproduces_the_event_log() {
    let play = || {
        let mut engine = BattleEngine::new(
            vec![
                make_pokemon("machamp", vec!["doublekick"], "Guts"),
                make_pokemon("blastoise", vec!["surf"], "Torrent"),
            ],
            vec![
                make_pokemon("snorlax", vec!["doubleedge"], "Immunity"),
                make_pokemon("aerodactyl", vec!["rockslide"], "Pressure"),
            ],
            BattleRules::default(),
            9001,
        )
        .expect("engine builds");
        let outcome = engine
            .run_headless(&mut AttackProvider, &mut AttackProvider)
            .expect("battle runs");
        (outcome, engine.log().events().to_vec())
    };
    let (first_outcome, first_events) = play();
    let (second_outcome, second_events) = play();
    assert_eq!(first_outcome, second_outcome);
    assert_eq!(first_events, second_events);
}

#[test]
fn spread_earthquake_applies_the_reduction_to_each_target() {
    let rules = BattleRules::doubles();
    let build_field = || {
        Field::new(
            &rules,
            vec![
                make_pokemon("garchomp", vec!["earthquake"], "Rough Skin"),
                make_pokemon("clefable", vec!["splash"], "Magic Guard"),
            ],
            vec![
                make_pokemon("snorlax", vec!["splash"], "Immunity"),
                make_pokemon("blissey", vec!["splash"], "Natural Cure"),
            ],
        )
        .expect("valid field")
    };

    // Live run through the real action path.
    let mut field = build_field();
    let seed = 31337;
    let mut rng = SeededRandom::from_seed(seed);
    let mut logger = NullLogger;
    let mut ctx = ExecCtx {
        rules: &rules,
        rng: &mut rng,
        logger: &mut logger,
    };
    let before: Vec<u16> = (0..2)
        .map(|slot| {
            field
                .active(SlotRef::new(SIDE_ENEMY, slot))
                .expect("active")
                .current_hp
        })
        .collect();
    let mut queue = ActionQueue::new();
    queue.push_back(BattleAction::UseMove {
        user: SlotRef::new(SIDE_PLAYER, 0),
        move_index: 0,
        target: None,
    });
    let mut view = NullView;
    queue
        .run(&mut field, &mut ctx, &mut view)
        .expect("queue runs");

    // Replay the same draws against the pipeline to get the unreduced
    // single-target damage for each hit.
    let replay_field = build_field();
    let mut replay_rng = SeededRandom::from_seed(seed);
    let earthquake = pokemon_battle_engine::data::moves::get_move("earthquake").expect("move exists");
    for slot in 0..2 {
        let _accuracy_roll = replay_rng.next_f32();
        let single = damage::calculate(
            &replay_field,
            SlotRef::new(SIDE_PLAYER, 0),
            SlotRef::new(SIDE_ENEMY, slot),
            earthquake,
            None,
            None,
            &mut replay_rng,
        );
        let expected = (((single.final_damage as f32) * 0.75).floor() as u16).max(1);
        let after = field
            .active(SlotRef::new(SIDE_ENEMY, slot))
            .expect("active")
            .current_hp;
        assert_eq!(before[slot as usize] - after, expected, "slot {slot}");
    }
}

#[test]
fn lightning_rod_redirects_in_a_real_exchange() {
    let rules = BattleRules::doubles();
    let mut field = Field::new(
        &rules,
        vec![
            make_pokemon("pikachu", vec!["thunderbolt"], "Static"),
            make_pokemon("clefable", vec!["splash"], "Magic Guard"),
        ],
        vec![
            make_pokemon("gyarados", vec!["splash"], "Intimidate"),
            make_pokemon("lanturn", vec!["splash"], "Lightning Rod"),
        ],
    )
    .expect("valid field");

    let mut rng = SeededRandom::from_seed(2);
    let mut logger = NullLogger;
    let mut ctx = ExecCtx {
        rules: &rules,
        rng: &mut rng,
        logger: &mut logger,
    };
    let gyarados_before = field
        .active(SlotRef::new(SIDE_ENEMY, 0))
        .expect("active")
        .current_hp;
    let lanturn_before = field
        .active(SlotRef::new(SIDE_ENEMY, 1))
        .expect("active")
        .current_hp;

    let mut queue = ActionQueue::new();
    queue.push_back(BattleAction::UseMove {
        user: SlotRef::new(SIDE_PLAYER, 0),
        move_index: 0,
        // Aimed squarely at Gyarados; the rod should steal it.
        target: Some(SlotRef::new(SIDE_ENEMY, 0)),
    });
    let mut view = NullView;
    queue
        .run(&mut field, &mut ctx, &mut view)
        .expect("queue runs");

    let gyarados_after = field
        .active(SlotRef::new(SIDE_ENEMY, 0))
        .expect("active")
        .current_hp;
    let lanturn_after = field
        .active(SlotRef::new(SIDE_ENEMY, 1))
        .expect("active")
        .current_hp;
    assert_eq!(gyarados_after, gyarados_before);
    assert!(lanturn_after < lanturn_before);
}

#[test]
fn protect_blocks_for_one_turn_only() {
    let mut engine = BattleEngine::new(
        vec![make_pokemon("machamp", vec!["tackle"], "Guts")],
        vec![make_pokemon("blissey", vec!["protect", "splash"], "Natural Cure")],
        BattleRules {
            max_turns: 2,
            ..BattleRules::default()
        },
        77,
    )
    .expect("engine builds");
    let mut player = ScriptedProvider::new(vec![
        ChosenAction::Move { move_index: 0, target: None },
        ChosenAction::Move { move_index: 0, target: None },
    ]);
    let mut enemy = ScriptedProvider::new(vec![
        // Turn 1: protect. Turn 2: nothing.
        ChosenAction::Move { move_index: 0, target: None },
        ChosenAction::Move { move_index: 1, target: None },
    ]);
    engine
        .run_headless(&mut player, &mut enemy)
        .expect("battle runs");

    // Protect absorbed the first Tackle; the second one landed.
    let blissey = engine
        .field()
        .active(SlotRef::new(SIDE_ENEMY, 0))
        .expect("active");
    assert!(blissey.current_hp < blissey.stats.hp);
    let damage_events = engine
        .log()
        .events()
        .iter()
        .filter(|line| line.starts_with("|-damage|p2a"))
        .count();
    assert_eq!(damage_events, 1);
}

#[test]
fn fainted_actives_are_replaced_until_the_bench_runs_dry() {
    let mut engine = BattleEngine::new(
        vec![make_pokemon("machamp", vec!["dragonclaw"], "Guts")],
        vec![
            make_pokemon("pikachu", vec!["splash"], "Static"),
            make_pokemon("gengar", vec!["splash"], "Levitate"),
            make_pokemon("alakazam", vec!["splash"], "Synchronize"),
        ],
        BattleRules::default(),
        404,
    )
    .expect("engine builds");
    let outcome = engine
        .run_headless(&mut AttackProvider, &mut PassProvider)
        .expect("battle runs");
    assert_eq!(outcome, BattleOutcome::Victory);
    // Every enemy came in and went down.
    let switch_ins = engine
        .log()
        .events()
        .iter()
        .filter(|line| line.starts_with("|switch|p2a"))
        .count();
    assert_eq!(switch_ins, 3);
    assert!(engine
        .field()
        .side(SIDE_ENEMY)
        .party
        .iter()
        .all(|p| p.is_fainted()));
}

#[test]
fn passive_battles_draw_at_the_configured_cap() {
    let outcome = run_battle(
        vec![make_pokemon("blissey", vec!["splash"], "Natural Cure")],
        vec![make_pokemon("snorlax", vec!["splash"], "Immunity")],
        BattleRules {
            max_turns: 3,
            stall_turn_limit: 0,
            ..BattleRules::default()
        },
        5,
        &mut PassProvider,
        &mut PassProvider,
    )
    .expect("battle runs");
    assert_eq!(outcome, BattleOutcome::Draw);
}

#[test]
fn boss_battles_scale_the_enemy_but_stay_winnable() {
    let rules = BattleRules {
        boss_hp_multiplier: 2.0,
        boss_stat_multiplier: 1.2,
        max_turns: 200,
        ..BattleRules::default()
    };
    let mut engine = BattleEngine::new(
        vec![
            make_pokemon("garchomp", vec!["dragonclaw"], "Rough Skin"),
            make_pokemon("machamp", vec!["doublekick"], "Guts"),
        ],
        vec![make_pokemon("pikachu", vec!["splash"], "Static")],
        rules,
        616,
    )
    .expect("engine builds");
    let outcome = engine
        .run_headless(&mut AttackProvider, &mut PassProvider)
        .expect("battle runs");
    assert_eq!(outcome, BattleOutcome::Victory);
}

#[test]
fn charge_moves_telegraph_across_turns_in_a_full_battle() {
    let mut engine = BattleEngine::new(
        vec![make_pokemon("garchomp", vec!["dig"], "Rough Skin")],
        vec![make_pokemon("snorlax", vec!["splash"], "Immunity")],
        BattleRules {
            max_turns: 2,
            ..BattleRules::default()
        },
        8,
    )
    .expect("engine builds");
    engine
        .run_headless(&mut AttackProvider, &mut PassProvider)
        .expect("battle runs");
    let snorlax = engine
        .field()
        .active(SlotRef::new(SIDE_ENEMY, 0))
        .expect("active");
    // Turn 1 charged underground, turn 2 hit.
    assert!(snorlax.current_hp < snorlax.stats.hp);
    let damage_events = engine
        .log()
        .events()
        .iter()
        .filter(|line| line.starts_with("|-damage|p2a"))
        .count();
    assert_eq!(damage_events, 1);
}
