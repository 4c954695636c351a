//! Battle-runtime Pokémon instance: persistent stats and status that
//! outlive any field slot. Slot-scoped transient state lives in
//! [`crate::sim::field::VolatileState`].

use crate::data::items::{get_item, ItemData};
use crate::data::species::get_species;
use crate::data::types::{parse_type, Type};
use crate::sim::rng::RandomSource;
use crate::sim::stats::{Nature, StatsSet};
use anyhow::{anyhow, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Burn,
    Paralysis,
    Poison,
    Sleep,
    Freeze,
}

#[derive(Clone, Debug)]
pub struct Pokemon {
    pub species: String,
    pub level: u8,
    pub types: [Type; 2],
    pub stats: StatsSet,
    pub current_hp: u16,
    pub status: Option<Status>,
    pub sleep_turns: u8,
    pub toxic_counter: u8,
    pub moves: Vec<String>,
    pub ability: String,
    pub item: Option<String>,
    pub item_consumed: bool,
}

impl Pokemon {
    pub fn new(
        species: impl Into<String>,
        level: u8,
        evs: [u8; 6],
        ivs: [u8; 6],
        nature: Nature,
        moves: Vec<String>,
        ability: impl Into<String>,
        item: Option<String>,
    ) -> Result<Self> {
        let species_str = species.into();
        let stats = StatsSet::from_species(species_str.as_str(), level, evs, ivs, nature)
            .ok_or_else(|| anyhow!("Species '{}' not found in POKEDEX", species_str))?;
        let types = species_types(species_str.as_str())
            .ok_or_else(|| anyhow!("Species '{}' not found in POKEDEX", species_str))?;
        Ok(Self {
            species: species_str,
            level,
            types,
            current_hp: stats.hp,
            stats,
            status: None,
            sleep_turns: 0,
            toxic_counter: 0,
            moves,
            ability: ability.into(),
            item,
            item_consumed: false,
        })
    }

    /// Apply boss multipliers to the runtime stats and refill HP to the new
    /// maximum.
    pub fn scale_for_boss(&mut self, hp_multiplier: f32, stat_multiplier: f32) {
        self.stats = self.stats.scaled_for_boss(hp_multiplier, stat_multiplier);
        self.current_hp = self.stats.hp;
    }

    pub fn take_damage(&mut self, damage: u16) {
        self.current_hp = self.current_hp.saturating_sub(damage);
    }

    pub fn heal(&mut self, amount: u16) {
        self.current_hp = (self.current_hp + amount).min(self.stats.hp);
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.ability.eq_ignore_ascii_case(ability)
    }

    pub fn has_type(&self, target: Type) -> bool {
        self.types[0] == target || self.types[1] == target
    }

    /// Held item data, or None once consumed.
    pub fn held_item(&self) -> Option<&'static ItemData> {
        if self.item_consumed {
            return None;
        }
        self.item.as_deref().and_then(get_item)
    }

    /// Try to inflict a persistent status. Returns false when blocked by an
    /// existing status or a type/ability immunity.
    pub fn apply_status(&mut self, status: Status, toxic: bool, rng: &mut dyn RandomSource) -> bool {
        if self.status.is_some() {
            return false;
        }
        if self.is_status_immune(status) {
            return false;
        }
        match status {
            Status::Sleep => {
                // 1-3 turns asleep.
                self.sleep_turns = rng.next_range(1, 3) as u8;
            }
            Status::Poison => {
                self.toxic_counter = if toxic { 1 } else { 0 };
            }
            _ => {}
        }
        self.status = Some(status);
        true
    }

    pub fn clear_status(&mut self) {
        self.status = None;
        self.sleep_turns = 0;
        self.toxic_counter = 0;
    }

    /// Whether `apply_status` would succeed right now.
    pub fn can_receive_status(&self, status: Status) -> bool {
        self.status.is_none() && !self.is_status_immune(status)
    }

    fn is_status_immune(&self, status: Status) -> bool {
        match status {
            Status::Burn => self.has_type(Type::Fire) || self.has_ability("Water Veil"),
            Status::Paralysis => self.has_type(Type::Electric) || self.has_ability("Limber"),
            Status::Poison => {
                self.has_type(Type::Poison)
                    || self.has_type(Type::Steel)
                    || self.has_ability("Immunity")
            }
            Status::Sleep => self.has_ability("Insomnia") || self.has_ability("Vital Spirit"),
            Status::Freeze => self.has_type(Type::Ice) || self.has_ability("Magma Armor"),
        }
    }
}

pub fn format_status(status: Status) -> &'static str {
    match status {
        Status::Burn => "brn",
        Status::Paralysis => "par",
        Status::Poison => "psn",
        Status::Sleep => "slp",
        Status::Freeze => "frz",
    }
}

fn species_types(species: &str) -> Option<[Type; 2]> {
    let info = get_species(species)?;
    let primary = parse_type(info.types[0]).unwrap_or(Type::Normal);
    let secondary = parse_type(info.types[1]).unwrap_or(primary);
    Some([primary, secondary])
}
