//! The battle field graph: two sides, their active slots, shared weather
//! and terrain. This is the mutable substrate every other component reads
//! and writes.

use crate::data::types::Type;
use crate::sim::pokemon::Pokemon;
use crate::sim::rules::BattleRules;
use crate::sim::stats::StatStages;
use anyhow::{bail, Result};

pub const SIDE_PLAYER: usize = 0;
pub const SIDE_ENEMY: usize = 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Hail,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Terrain {
    Grassy,
    Electric,
    Psychic,
    Misty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeatherState {
    pub kind: Weather,
    pub turns_left: u8,
    /// Primal weather cannot be overwritten by non-primal weather and does
    /// not time out.
    pub primal: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TerrainState {
    pub kind: Terrain,
    pub turns_left: u8,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SideConditionKind {
    Tailwind,
    Reflect,
    LightScreen,
    Safeguard,
}

impl SideConditionKind {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "tailwind" => Some(Self::Tailwind),
            "reflect" => Some(Self::Reflect),
            "lightscreen" => Some(Self::LightScreen),
            "safeguard" => Some(Self::Safeguard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SideConditions {
    pub tailwind_turns: u8,
    pub reflect_turns: u8,
    pub light_screen_turns: u8,
    pub safeguard_turns: u8,
}

impl SideConditions {
    pub fn set(&mut self, kind: SideConditionKind, turns: u8) {
        match kind {
            SideConditionKind::Tailwind => self.tailwind_turns = turns,
            SideConditionKind::Reflect => self.reflect_turns = turns,
            SideConditionKind::LightScreen => self.light_screen_turns = turns,
            SideConditionKind::Safeguard => self.safeguard_turns = turns,
        }
    }

    pub fn tick(&mut self) {
        self.tailwind_turns = self.tailwind_turns.saturating_sub(1);
        self.reflect_turns = self.reflect_turns.saturating_sub(1);
        self.light_screen_turns = self.light_screen_turns.saturating_sub(1);
        self.safeguard_turns = self.safeguard_turns.saturating_sub(1);
    }
}

/// Slot-scoped transient state, cleared wholesale at switch-out.
#[derive(Clone, Debug, Default)]
pub struct VolatileState {
    pub stages: StatStages,
    pub flinched: bool,
    pub protect_active: bool,
    pub follow_me: bool,
    pub charging_move: Option<String>,
    pub semi_invulnerable: bool,
    pub taunt_turns: u8,
    pub encore_turns: u8,
    pub encore_move: Option<String>,
    pub last_move: Option<String>,
}

/// A positional combat seat. References a party member by index; never owns
/// the Pokémon instance.
#[derive(Clone, Debug, Default)]
pub struct Slot {
    pub member: Option<usize>,
    pub volatile: VolatileState,
}

impl Slot {
    pub fn clear(&mut self) {
        self.member = None;
        self.volatile = VolatileState::default();
    }
}

#[derive(Clone, Debug)]
pub struct Side {
    pub party: Vec<Pokemon>,
    pub slots: Vec<Slot>,
    pub conditions: SideConditions,
}

impl Side {
    pub fn new(party: Vec<Pokemon>, slot_count: usize) -> Result<Self> {
        if party.is_empty() {
            bail!("a side needs at least one party member");
        }
        if slot_count == 0 || slot_count > 3 {
            bail!("slot count must be between 1 and 3, got {slot_count}");
        }
        let mut side = Self {
            party,
            slots: vec![Slot::default(); slot_count],
            conditions: SideConditions::default(),
        };
        // Fill slots with the first healthy party members, in roster order.
        let mut next_member = 0;
        for slot in &mut side.slots {
            while next_member < side.party.len() && side.party[next_member].is_fainted() {
                next_member += 1;
            }
            if next_member < side.party.len() {
                slot.member = Some(next_member);
                next_member += 1;
            }
        }
        Ok(side)
    }

    pub fn active(&self, slot: usize) -> Option<&Pokemon> {
        let member = self.slots.get(slot)?.member?;
        self.party.get(member)
    }

    pub fn active_mut(&mut self, slot: usize) -> Option<&mut Pokemon> {
        let member = self.slots.get(slot)?.member?;
        self.party.get_mut(member)
    }

    /// Party indices that could still switch in: healthy and not already in
    /// any slot.
    pub fn bench(&self) -> Vec<usize> {
        self.party
            .iter()
            .enumerate()
            .filter(|(idx, pokemon)| {
                !pokemon.is_fainted() && !self.slots.iter().any(|s| s.member == Some(*idx))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn has_active(&self) -> bool {
        self.slots
            .iter()
            .filter_map(|slot| slot.member)
            .any(|member| !self.party[member].is_fainted())
    }

    pub fn total_hp(&self) -> u32 {
        self.party.iter().map(|p| p.current_hp as u32).sum()
    }
}

/// Address of one slot on the field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotRef {
    pub side: usize,
    pub slot: usize,
}

impl SlotRef {
    pub fn new(side: usize, slot: usize) -> Self {
        Self { side, slot }
    }
}

#[derive(Clone, Debug)]
pub struct Field {
    pub sides: [Side; 2],
    pub weather: Option<WeatherState>,
    pub terrain: Option<TerrainState>,
    pub turn: u32,
}

impl Field {
    pub fn new(rules: &BattleRules, player_party: Vec<Pokemon>, enemy_party: Vec<Pokemon>) -> Result<Self> {
        let player = Side::new(player_party, rules.player_slots)?;
        let enemy = Side::new(enemy_party, rules.enemy_slots)?;
        Ok(Self {
            sides: [player, enemy],
            weather: None,
            terrain: None,
            turn: 0,
        })
    }

    pub fn side(&self, side: usize) -> &Side {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: usize) -> &mut Side {
        &mut self.sides[side]
    }

    pub fn opposing(side: usize) -> usize {
        1 - side
    }

    pub fn slot(&self, at: SlotRef) -> &Slot {
        &self.sides[at.side].slots[at.slot]
    }

    pub fn slot_mut(&mut self, at: SlotRef) -> &mut Slot {
        &mut self.sides[at.side].slots[at.slot]
    }

    pub fn active(&self, at: SlotRef) -> Option<&Pokemon> {
        self.sides[at.side].active(at.slot)
    }

    pub fn active_mut(&mut self, at: SlotRef) -> Option<&mut Pokemon> {
        self.sides[at.side].active_mut(at.slot)
    }

    /// Slots on a side currently holding a healthy Pokémon.
    pub fn occupied_slots(&self, side: usize) -> Vec<SlotRef> {
        self.sides[side]
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| {
                slot.member
                    .map(|m| !self.sides[side].party[m].is_fainted())
                    .unwrap_or(false)
            })
            .map(|(idx, _)| SlotRef::new(side, idx))
            .collect()
    }

    /// Set the weather. Returns false when blocked by active primal weather.
    pub fn set_weather(&mut self, kind: Weather, turns: u8, primal: bool) -> bool {
        if let Some(current) = self.weather {
            if current.primal && !primal {
                return false;
            }
        }
        self.weather = Some(WeatherState {
            kind,
            turns_left: turns,
            primal,
        });
        true
    }

    pub fn set_terrain(&mut self, kind: Terrain, turns: u8) {
        self.terrain = Some(TerrainState { kind, turns_left: turns });
    }

    pub fn weather_kind(&self) -> Option<Weather> {
        self.weather.map(|w| w.kind)
    }

    pub fn terrain_kind(&self) -> Option<Terrain> {
        self.terrain.map(|t| t.kind)
    }
}

/// Whether a Pokémon in a slot is affected by grounded-only effects.
pub fn is_grounded(pokemon: &Pokemon) -> bool {
    if let Some(item) = pokemon.held_item() {
        if item.grounds_holder {
            return true;
        }
        if item.lifts_holder {
            return false;
        }
    }
    if pokemon.has_ability("Levitate") {
        return false;
    }
    !pokemon.has_type(Type::Flying)
}
