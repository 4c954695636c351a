//! Move blueprints, including the declared effect list each move carries.
//!
//! Cross-layer references (ailments, stats, weather, terrain, side
//! conditions) use short string ids; the sim layer translates them into its
//! own enums when building handlers.

use crate::data::types::Type;
use phf::phf_map;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Declared targeting shape of a move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveTarget {
    /// One adjacent slot, chosen by the actor (redirectable).
    SingleAdjacent,
    /// Every occupied opposing slot (spread).
    AllAdjacentFoes,
    /// The user itself.
    User,
    /// The user's side of the field.
    UserSide,
    /// The entire field (weather, terrain).
    EntireField,
}

/// One declared effect on a move. Closed set; the sim-layer handler registry
/// matches this exhaustively, so adding a variant forces every dispatch site
/// to handle it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveEffect {
    /// Inflict a persistent ailment ("brn", "par", "psn", "tox", "slp", "frz").
    Ailment { ailment: &'static str, chance: u8 },
    /// Raise or lower a stat stage ("atk", "def", "spa", "spd", "spe", "acc", "eva").
    StatChange {
        stat: &'static str,
        delta: i8,
        chance: u8,
        target_self: bool,
    },
    /// User takes fraction of dealt damage as recoil.
    Recoil { fraction: (u8, u8) },
    /// User heals fraction of dealt damage.
    Drain { fraction: (u8, u8) },
    /// Heal fraction of the user's max HP.
    Heal { fraction: (u8, u8) },
    /// Chance to make the target flinch this turn.
    Flinch { chance: u8 },
    /// Exact damage, ignoring stats, stages and items.
    FixedDamage { amount: u16 },
    /// Hit between min and max times in one use.
    MultiHit { min: u8, max: u8 },
    /// Charge on the first turn, attack on the second.
    Charge { semi_invulnerable: bool },
    /// Block incoming moves for the rest of the turn.
    Protect,
    /// Draw single-target moves aimed at allies to the user.
    FollowMe,
    /// Set field weather ("sun", "rain", "sand", "hail").
    Weather { kind: &'static str },
    /// Set field terrain ("grassy", "electric", "psychic", "misty").
    Terrain { kind: &'static str },
    /// Apply a side-wide condition ("tailwind", "reflect", "lightscreen", "safeguard").
    SideCondition { kind: &'static str, turns: u8 },
    /// The user faints after dealing damage.
    SelfDestruct,
    /// Priority bonus while the named terrain is active.
    TerrainPriority { terrain: &'static str, bonus: i8 },
    /// Restrict the target's move choices ("taunt", "encore").
    Restrict { kind: &'static str, turns: u8 },
}

#[derive(Clone, Copy, Debug)]
pub struct MoveData {
    pub name: &'static str,
    pub move_type: Type,
    pub category: MoveCategory,
    pub base_power: Option<u16>,
    /// None means the move never misses.
    pub accuracy: Option<f32>,
    pub priority: i8,
    pub target: MoveTarget,
    pub effects: &'static [MoveEffect],
}

pub static MOVES: phf::Map<&'static str, MoveData> = phf_map! {
    "tackle" => MoveData {
        name: "Tackle",
        move_type: Type::Normal,
        category: MoveCategory::Physical,
        base_power: Some(40),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[],
    },
    "quickattack" => MoveData {
        name: "Quick Attack",
        move_type: Type::Normal,
        category: MoveCategory::Physical,
        base_power: Some(40),
        accuracy: Some(100.0),
        priority: 1,
        target: MoveTarget::SingleAdjacent,
        effects: &[],
    },
    "extremespeed" => MoveData {
        name: "Extreme Speed",
        move_type: Type::Normal,
        category: MoveCategory::Physical,
        base_power: Some(80),
        accuracy: Some(100.0),
        priority: 2,
        target: MoveTarget::SingleAdjacent,
        effects: &[],
    },
    "thunderbolt" => MoveData {
        name: "Thunderbolt",
        move_type: Type::Electric,
        category: MoveCategory::Special,
        base_power: Some(90),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "par", chance: 10 }],
    },
    "thunderwave" => MoveData {
        name: "Thunder Wave",
        move_type: Type::Electric,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(90.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "par", chance: 100 }],
    },
    "flamethrower" => MoveData {
        name: "Flamethrower",
        move_type: Type::Fire,
        category: MoveCategory::Special,
        base_power: Some(90),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "brn", chance: 10 }],
    },
    "firepunch" => MoveData {
        name: "Fire Punch",
        move_type: Type::Fire,
        category: MoveCategory::Physical,
        base_power: Some(75),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "brn", chance: 10 }],
    },
    "icebeam" => MoveData {
        name: "Ice Beam",
        move_type: Type::Ice,
        category: MoveCategory::Special,
        base_power: Some(90),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "frz", chance: 10 }],
    },
    "toxic" => MoveData {
        name: "Toxic",
        move_type: Type::Poison,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(90.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Ailment { ailment: "tox", chance: 100 }],
    },
    "surf" => MoveData {
        name: "Surf",
        move_type: Type::Water,
        category: MoveCategory::Special,
        base_power: Some(90),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::AllAdjacentFoes,
        effects: &[],
    },
    "earthquake" => MoveData {
        name: "Earthquake",
        move_type: Type::Ground,
        category: MoveCategory::Physical,
        base_power: Some(100),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::AllAdjacentFoes,
        effects: &[],
    },
    "rockslide" => MoveData {
        name: "Rock Slide",
        move_type: Type::Rock,
        category: MoveCategory::Physical,
        base_power: Some(75),
        accuracy: Some(90.0),
        priority: 0,
        target: MoveTarget::AllAdjacentFoes,
        effects: &[MoveEffect::Flinch { chance: 30 }],
    },
    "shadowball" => MoveData {
        name: "Shadow Ball",
        move_type: Type::Ghost,
        category: MoveCategory::Special,
        base_power: Some(80),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::StatChange { stat: "spd", delta: -1, chance: 20, target_self: false }],
    },
    "dragonclaw" => MoveData {
        name: "Dragon Claw",
        move_type: Type::Dragon,
        category: MoveCategory::Physical,
        base_power: Some(80),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[],
    },
    "swordsdance" => MoveData {
        name: "Swords Dance",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::User,
        effects: &[MoveEffect::StatChange { stat: "atk", delta: 2, chance: 100, target_self: true }],
    },
    "agility" => MoveData {
        name: "Agility",
        move_type: Type::Psychic,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::User,
        effects: &[MoveEffect::StatChange { stat: "spe", delta: 2, chance: 100, target_self: true }],
    },
    "growl" => MoveData {
        name: "Growl",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::StatChange { stat: "atk", delta: -1, chance: 100, target_self: false }],
    },
    "sandattack" => MoveData {
        name: "Sand Attack",
        move_type: Type::Ground,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::StatChange { stat: "acc", delta: -1, chance: 100, target_self: false }],
    },
    "recover" => MoveData {
        name: "Recover",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::User,
        effects: &[MoveEffect::Heal { fraction: (1, 2) }],
    },
    "gigadrain" => MoveData {
        name: "Giga Drain",
        move_type: Type::Grass,
        category: MoveCategory::Special,
        base_power: Some(75),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Drain { fraction: (1, 2) }],
    },
    "doubleedge" => MoveData {
        name: "Double-Edge",
        move_type: Type::Normal,
        category: MoveCategory::Physical,
        base_power: Some(120),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Recoil { fraction: (1, 3) }],
    },
    "bulletseed" => MoveData {
        name: "Bullet Seed",
        move_type: Type::Grass,
        category: MoveCategory::Physical,
        base_power: Some(25),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::MultiHit { min: 2, max: 5 }],
    },
    "doublekick" => MoveData {
        name: "Double Kick",
        move_type: Type::Fighting,
        category: MoveCategory::Physical,
        base_power: Some(30),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::MultiHit { min: 2, max: 2 }],
    },
    "dragonrage" => MoveData {
        name: "Dragon Rage",
        move_type: Type::Dragon,
        category: MoveCategory::Special,
        base_power: None,
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::FixedDamage { amount: 40 }],
    },
    "sonicboom" => MoveData {
        name: "Sonic Boom",
        move_type: Type::Normal,
        category: MoveCategory::Special,
        base_power: None,
        accuracy: Some(90.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::FixedDamage { amount: 20 }],
    },
    "dig" => MoveData {
        name: "Dig",
        move_type: Type::Ground,
        category: MoveCategory::Physical,
        base_power: Some(80),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Charge { semi_invulnerable: true }],
    },
    "fly" => MoveData {
        name: "Fly",
        move_type: Type::Flying,
        category: MoveCategory::Physical,
        base_power: Some(90),
        accuracy: Some(95.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Charge { semi_invulnerable: true }],
    },
    "solarbeam" => MoveData {
        name: "Solar Beam",
        move_type: Type::Grass,
        category: MoveCategory::Special,
        base_power: Some(120),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Charge { semi_invulnerable: false }],
    },
    "protect" => MoveData {
        name: "Protect",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 4,
        target: MoveTarget::User,
        effects: &[MoveEffect::Protect],
    },
    "followme" => MoveData {
        name: "Follow Me",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 2,
        target: MoveTarget::User,
        effects: &[MoveEffect::FollowMe],
    },
    "explosion" => MoveData {
        name: "Explosion",
        move_type: Type::Normal,
        category: MoveCategory::Physical,
        base_power: Some(250),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::AllAdjacentFoes,
        effects: &[MoveEffect::SelfDestruct],
    },
    "raindance" => MoveData {
        name: "Rain Dance",
        move_type: Type::Water,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::EntireField,
        effects: &[MoveEffect::Weather { kind: "rain" }],
    },
    "sunnyday" => MoveData {
        name: "Sunny Day",
        move_type: Type::Fire,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::EntireField,
        effects: &[MoveEffect::Weather { kind: "sun" }],
    },
    "sandstorm" => MoveData {
        name: "Sandstorm",
        move_type: Type::Rock,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::EntireField,
        effects: &[MoveEffect::Weather { kind: "sand" }],
    },
    "grassyterrain" => MoveData {
        name: "Grassy Terrain",
        move_type: Type::Grass,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::EntireField,
        effects: &[MoveEffect::Terrain { kind: "grassy" }],
    },
    "electricterrain" => MoveData {
        name: "Electric Terrain",
        move_type: Type::Electric,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::EntireField,
        effects: &[MoveEffect::Terrain { kind: "electric" }],
    },
    "tailwind" => MoveData {
        name: "Tailwind",
        move_type: Type::Flying,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::UserSide,
        effects: &[MoveEffect::SideCondition { kind: "tailwind", turns: 4 }],
    },
    "reflect" => MoveData {
        name: "Reflect",
        move_type: Type::Psychic,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::UserSide,
        effects: &[MoveEffect::SideCondition { kind: "reflect", turns: 5 }],
    },
    "lightscreen" => MoveData {
        name: "Light Screen",
        move_type: Type::Psychic,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::UserSide,
        effects: &[MoveEffect::SideCondition { kind: "lightscreen", turns: 5 }],
    },
    "safeguard" => MoveData {
        name: "Safeguard",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::UserSide,
        effects: &[MoveEffect::SideCondition { kind: "safeguard", turns: 5 }],
    },
    "taunt" => MoveData {
        name: "Taunt",
        move_type: Type::Dark,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Restrict { kind: "taunt", turns: 3 }],
    },
    "encore" => MoveData {
        name: "Encore",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::Restrict { kind: "encore", turns: 3 }],
    },
    "grassyglide" => MoveData {
        name: "Grassy Glide",
        move_type: Type::Grass,
        category: MoveCategory::Physical,
        base_power: Some(70),
        accuracy: Some(100.0),
        priority: 0,
        target: MoveTarget::SingleAdjacent,
        effects: &[MoveEffect::TerrainPriority { terrain: "grassy", bonus: 1 }],
    },
    "splash" => MoveData {
        name: "Splash",
        move_type: Type::Normal,
        category: MoveCategory::Status,
        base_power: None,
        accuracy: None,
        priority: 0,
        target: MoveTarget::User,
        effects: &[],
    },
};

pub fn get_move(name: &str) -> Option<&'static MoveData> {
    MOVES.get(normalize_move_name(name).as_str())
}

pub fn normalize_move_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
