//! Held-item blueprints. Only the fields the engine consults are modeled.

use phf::phf_map;

#[derive(Clone, Copy, Debug)]
pub struct ItemData {
    pub name: &'static str,
    pub speed_multiplier: f32,
    pub physical_attack_multiplier: f32,
    pub special_attack_multiplier: f32,
    /// End-of-turn heal as a fraction of max HP.
    pub end_of_turn_heal: Option<(u8, u8)>,
    /// Forces the holder to count as grounded (Iron Ball).
    pub grounds_holder: bool,
    /// Lifts the holder off the ground (Air Balloon).
    pub lifts_holder: bool,
}

pub static ITEMS: phf::Map<&'static str, ItemData> = phf_map! {
    "choicescarf" => ItemData {
        name: "Choice Scarf",
        speed_multiplier: 1.5,
        physical_attack_multiplier: 1.0,
        special_attack_multiplier: 1.0,
        end_of_turn_heal: None,
        grounds_holder: false,
        lifts_holder: false,
    },
    "choiceband" => ItemData {
        name: "Choice Band",
        speed_multiplier: 1.0,
        physical_attack_multiplier: 1.5,
        special_attack_multiplier: 1.0,
        end_of_turn_heal: None,
        grounds_holder: false,
        lifts_holder: false,
    },
    "choicespecs" => ItemData {
        name: "Choice Specs",
        speed_multiplier: 1.0,
        physical_attack_multiplier: 1.0,
        special_attack_multiplier: 1.5,
        end_of_turn_heal: None,
        grounds_holder: false,
        lifts_holder: false,
    },
    "leftovers" => ItemData {
        name: "Leftovers",
        speed_multiplier: 1.0,
        physical_attack_multiplier: 1.0,
        special_attack_multiplier: 1.0,
        end_of_turn_heal: Some((1, 16)),
        grounds_holder: false,
        lifts_holder: false,
    },
    "ironball" => ItemData {
        name: "Iron Ball",
        speed_multiplier: 0.5,
        physical_attack_multiplier: 1.0,
        special_attack_multiplier: 1.0,
        end_of_turn_heal: None,
        grounds_holder: true,
        lifts_holder: false,
    },
    "airballoon" => ItemData {
        name: "Air Balloon",
        speed_multiplier: 1.0,
        physical_attack_multiplier: 1.0,
        special_attack_multiplier: 1.0,
        end_of_turn_heal: None,
        grounds_holder: false,
        lifts_holder: true,
    },
};

pub fn get_item(name: &str) -> Option<&'static ItemData> {
    ITEMS.get(normalize_item_name(name).as_str())
}

pub fn normalize_item_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
