//! Species blueprints. Read-only content the engine never mutates;
//! per-battle runtime instances are derived from these entries.

use phf::phf_map;

#[derive(Clone, Copy, Debug)]
pub struct BaseStats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct SpeciesData {
    pub name: &'static str,
    pub base_stats: BaseStats,
    pub types: [&'static str; 2],
}

macro_rules! species {
    ($name:expr, $hp:expr, $atk:expr, $def:expr, $spa:expr, $spd:expr, $spe:expr, $t1:expr, $t2:expr) => {
        SpeciesData {
            name: $name,
            base_stats: BaseStats {
                hp: $hp,
                atk: $atk,
                def: $def,
                spa: $spa,
                spd: $spd,
                spe: $spe,
            },
            types: [$t1, $t2],
        }
    };
}

pub static POKEDEX: phf::Map<&'static str, SpeciesData> = phf_map! {
    "pikachu" => species!("Pikachu", 35, 55, 40, 50, 50, 90, "Electric", "Electric"),
    "charizard" => species!("Charizard", 78, 84, 78, 109, 85, 100, "Fire", "Flying"),
    "blastoise" => species!("Blastoise", 79, 83, 100, 85, 105, 78, "Water", "Water"),
    "venusaur" => species!("Venusaur", 80, 82, 83, 100, 100, 80, "Grass", "Poison"),
    "garchomp" => species!("Garchomp", 108, 130, 95, 80, 85, 102, "Dragon", "Ground"),
    "gengar" => species!("Gengar", 60, 65, 60, 130, 75, 110, "Ghost", "Poison"),
    "snorlax" => species!("Snorlax", 160, 110, 65, 65, 110, 30, "Normal", "Normal"),
    "dragonite" => species!("Dragonite", 91, 134, 95, 100, 100, 80, "Dragon", "Flying"),
    "gyarados" => species!("Gyarados", 95, 125, 79, 60, 100, 81, "Water", "Flying"),
    "blissey" => species!("Blissey", 255, 10, 10, 75, 135, 55, "Normal", "Normal"),
    "lucario" => species!("Lucario", 70, 110, 70, 115, 70, 90, "Fighting", "Steel"),
    "aerodactyl" => species!("Aerodactyl", 80, 105, 65, 60, 75, 130, "Rock", "Flying"),
    "clefable" => species!("Clefable", 95, 70, 73, 95, 90, 60, "Fairy", "Fairy"),
    "machamp" => species!("Machamp", 90, 130, 80, 65, 85, 55, "Fighting", "Fighting"),
    "alakazam" => species!("Alakazam", 55, 50, 45, 135, 95, 120, "Psychic", "Psychic"),
    "lanturn" => species!("Lanturn", 125, 58, 58, 76, 76, 67, "Water", "Electric"),
};

pub fn get_species(name: &str) -> Option<&'static SpeciesData> {
    POKEDEX.get(normalize_species_name(name).as_str())
}

pub fn normalize_species_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
