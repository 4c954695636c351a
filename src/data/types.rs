//! Type chart lookups for damage effectiveness.

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

pub fn parse_type(name: &str) -> Option<Type> {
    match name.to_ascii_lowercase().as_str() {
        "normal" => Some(Type::Normal),
        "fire" => Some(Type::Fire),
        "water" => Some(Type::Water),
        "electric" => Some(Type::Electric),
        "grass" => Some(Type::Grass),
        "ice" => Some(Type::Ice),
        "fighting" => Some(Type::Fighting),
        "poison" => Some(Type::Poison),
        "ground" => Some(Type::Ground),
        "flying" => Some(Type::Flying),
        "psychic" => Some(Type::Psychic),
        "bug" => Some(Type::Bug),
        "rock" => Some(Type::Rock),
        "ghost" => Some(Type::Ghost),
        "dragon" => Some(Type::Dragon),
        "dark" => Some(Type::Dark),
        "steel" => Some(Type::Steel),
        "fairy" => Some(Type::Fairy),
        _ => None,
    }
}

/// Effectiveness of an attacking type against a single defending type.
pub fn effectiveness_against(attacking: Type, defending: Type) -> f32 {
    use Type::*;
    match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Grass | Ice | Bug | Steel => 2.0,
            Fire | Water | Rock | Dragon => 0.5,
            _ => 1.0,
        },
        Water => match defending {
            Fire | Ground | Rock => 2.0,
            Water | Grass | Dragon => 0.5,
            _ => 1.0,
        },
        Electric => match defending {
            Water | Flying => 2.0,
            Electric | Grass | Dragon => 0.5,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Water | Ground | Rock => 2.0,
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            _ => 1.0,
        },
        Ice => match defending {
            Grass | Ground | Flying | Dragon => 2.0,
            Fire | Water | Ice | Steel => 0.5,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug | Fairy => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Fairy => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Dark => 2.0,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Psychic | Ghost => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            Fairy => 0.0,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Fairy => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Ice | Rock | Fairy => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => 2.0,
            Fire | Poison | Steel => 0.5,
            _ => 1.0,
        },
    }
}

/// Effectiveness against a dual-typed defender. Mono-typed defenders store
/// the same type twice and count it once.
pub fn effectiveness_dual(attacking: Type, primary: Type, secondary: Type) -> f32 {
    if primary == secondary {
        effectiveness_against(attacking, primary)
    } else {
        effectiveness_against(attacking, primary) * effectiveness_against(attacking, secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ice_is_super_effective_against_dragon() {
        assert_eq!(effectiveness_against(Type::Ice, Type::Dragon), 2.0);
    }

    #[test]
    fn ground_cannot_hit_flying() {
        assert_eq!(effectiveness_against(Type::Ground, Type::Flying), 0.0);
    }

    #[test]
    fn dual_effectiveness_multiplies_both_types() {
        // Electric vs Water/Flying: 2.0 * 2.0
        assert_eq!(
            effectiveness_dual(Type::Electric, Type::Water, Type::Flying),
            4.0
        );
    }

    #[test]
    fn dual_effectiveness_counts_mono_types_once() {
        assert_eq!(effectiveness_dual(Type::Water, Type::Fire, Type::Fire), 2.0);
    }

    #[test]
    fn parse_type_is_case_insensitive() {
        assert_eq!(parse_type("Fire"), Some(Type::Fire));
        assert_eq!(parse_type("FIRE"), Some(Type::Fire));
        assert_eq!(parse_type("???"), None);
    }
}
