//! Stat computation, natures, stage arithmetic and the computed-stat cache.

use crate::data::species::POKEDEX;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

/// The seven stage-modifiable stats tracked per slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum BoostableStat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl BoostableStat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "atk" => Some(Self::Atk),
            "def" => Some(Self::Def),
            "spa" => Some(Self::Spa),
            "spd" => Some(Self::Spd),
            "spe" => Some(Self::Spe),
            "acc" => Some(Self::Accuracy),
            "eva" => Some(Self::Evasion),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Atk => 0,
            Self::Def => 1,
            Self::Spa => 2,
            Self::Spd => 3,
            Self::Spe => 4,
            Self::Accuracy => 5,
            Self::Evasion => 6,
        }
    }
}

/// Stage set as a copy value object. `modify` returns the updated copy plus
/// the delta that actually landed, which may be 0 at the ±6 boundary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatStages {
    stages: [i8; 7],
}

impl StatStages {
    pub fn get(&self, stat: BoostableStat) -> i8 {
        self.stages[stat.index()]
    }

    #[must_use]
    pub fn modify(&self, stat: BoostableStat, delta: i8) -> (StatStages, i8) {
        let current = self.stages[stat.index()];
        let next = current.saturating_add(delta).clamp(-6, 6);
        let mut updated = *self;
        updated.stages[stat.index()] = next;
        (updated, next - current)
    }

    pub fn is_neutral(&self) -> bool {
        self.stages.iter().all(|s| *s == 0)
    }
}

/// Multiplier for atk/def/spa/spd/spe stages.
pub fn stage_multiplier(stage: i8) -> f32 {
    if stage >= 0 {
        (2 + stage as i32) as f32 / 2.0
    } else {
        2.0 / (2 - stage as i32) as f32
    }
}

/// Multiplier for accuracy/evasion stages.
pub fn accuracy_stage_multiplier(stage: i8) -> f32 {
    if stage >= 0 {
        (3 + stage as i32) as f32 / 3.0
    } else {
        3.0 / (3 - stage as i32) as f32
    }
}

pub fn stat_modifier(nature: Nature, stat: Stat) -> f32 {
    match nature {
        Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => 1.0,
        Nature::Lonely => bonus(stat, Stat::Atk, Stat::Def),
        Nature::Brave => bonus(stat, Stat::Atk, Stat::Spe),
        Nature::Adamant => bonus(stat, Stat::Atk, Stat::Spa),
        Nature::Naughty => bonus(stat, Stat::Atk, Stat::Spd),
        Nature::Bold => bonus(stat, Stat::Def, Stat::Atk),
        Nature::Relaxed => bonus(stat, Stat::Def, Stat::Spe),
        Nature::Impish => bonus(stat, Stat::Def, Stat::Spa),
        Nature::Lax => bonus(stat, Stat::Def, Stat::Spd),
        Nature::Timid => bonus(stat, Stat::Spe, Stat::Atk),
        Nature::Hasty => bonus(stat, Stat::Spe, Stat::Def),
        Nature::Jolly => bonus(stat, Stat::Spe, Stat::Spa),
        Nature::Naive => bonus(stat, Stat::Spe, Stat::Spd),
        Nature::Modest => bonus(stat, Stat::Spa, Stat::Atk),
        Nature::Mild => bonus(stat, Stat::Spa, Stat::Def),
        Nature::Quiet => bonus(stat, Stat::Spa, Stat::Spe),
        Nature::Rash => bonus(stat, Stat::Spa, Stat::Spd),
        Nature::Calm => bonus(stat, Stat::Spd, Stat::Atk),
        Nature::Gentle => bonus(stat, Stat::Spd, Stat::Def),
        Nature::Sassy => bonus(stat, Stat::Spd, Stat::Spe),
        Nature::Careful => bonus(stat, Stat::Spd, Stat::Spa),
    }
}

fn bonus(stat: Stat, boosted: Stat, lowered: Stat) -> f32 {
    if stat == boosted {
        1.1
    } else if stat == lowered {
        0.9
    } else {
        1.0
    }
}

pub fn calc_hp(base: u16, iv: u8, ev: u8, level: u8) -> u16 {
    let ev_quarter = (ev / 4) as u16;
    let base_value = base * 2 + iv as u16 + ev_quarter;
    let intermediate = (base_value * level as u16) / 100;
    intermediate + level as u16 + 10
}

pub fn calc_stat(base: u16, iv: u8, ev: u8, level: u8, nature_mod: f32) -> u16 {
    let ev_quarter = (ev / 4) as u16;
    let base_value = base * 2 + iv as u16 + ev_quarter;
    let intermediate = (base_value * level as u16) / 100;
    let stat = (intermediate + 5) as f32 * nature_mod;
    stat.floor() as u16
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatsSet {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct StatCacheKey {
    species: String,
    level: u8,
    evs: [u8; 6],
    ivs: [u8; 6],
    nature: Nature,
}

static STAT_CACHE: Lazy<Mutex<HashMap<StatCacheKey, StatsSet>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Drop every memoized stat set. Call after mutating anything the
/// computation depends on (only relevant to tests and tooling).
pub fn invalidate_stat_cache() {
    if let Ok(mut cache) = STAT_CACHE.lock() {
        cache.clear();
    }
}

impl StatsSet {
    pub fn from_species(
        species: &str,
        level: u8,
        evs: [u8; 6],
        ivs: [u8; 6],
        nature: Nature,
    ) -> Option<Self> {
        let id = normalize_id(species);
        let key = StatCacheKey {
            species: id.clone(),
            level,
            evs,
            ivs,
            nature,
        };
        if let Ok(cache) = STAT_CACHE.lock() {
            if let Some(cached) = cache.get(&key) {
                return Some(*cached);
            }
        }
        let computed = Self::compute(id.as_str(), level, evs, ivs, nature)?;
        if let Ok(mut cache) = STAT_CACHE.lock() {
            cache.insert(key, computed);
        }
        Some(computed)
    }

    fn compute(id: &str, level: u8, evs: [u8; 6], ivs: [u8; 6], nature: Nature) -> Option<Self> {
        let data = POKEDEX.get(id)?;
        let base = data.base_stats;
        Some(Self {
            hp: calc_hp(base.hp, ivs[0], evs[0], level),
            atk: calc_stat(base.atk, ivs[1], evs[1], level, stat_modifier(nature, Stat::Atk)),
            def: calc_stat(base.def, ivs[2], evs[2], level, stat_modifier(nature, Stat::Def)),
            spa: calc_stat(base.spa, ivs[3], evs[3], level, stat_modifier(nature, Stat::Spa)),
            spd: calc_stat(base.spd, ivs[4], evs[4], level, stat_modifier(nature, Stat::Spd)),
            spe: calc_stat(base.spe, ivs[5], evs[5], level, stat_modifier(nature, Stat::Spe)),
        })
    }

    /// Boss scaling is an explicit transformation of the runtime stats, not
    /// a mutation of the species blueprint.
    #[must_use]
    pub fn scaled_for_boss(&self, hp_multiplier: f32, stat_multiplier: f32) -> Self {
        let scale = |value: u16, mult: f32| ((value as f32) * mult).floor().max(1.0) as u16;
        Self {
            hp: scale(self.hp, hp_multiplier),
            atk: scale(self.atk, stat_multiplier),
            def: scale(self.def, stat_multiplier),
            spa: scale(self.spa, stat_multiplier),
            spd: scale(self.spd, stat_multiplier),
            spe: scale(self.spe, stat_multiplier),
        }
    }
}

fn normalize_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
