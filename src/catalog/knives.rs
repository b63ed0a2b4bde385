//! Knife types, finish availability and wear ranges.

use crate::types::Wear;

pub const KNIFE_TYPES: &[&str] = &[
    "Bayonet",
    "Bowie Knife",
    "Butterfly Knife",
    "Classic Knife",
    "Falchion Knife",
    "Flip Knife",
    "Gut Knife",
    "Huntsman Knife",
    "Karambit",
    "Kukri Knife",
    "M9 Bayonet",
    "Navaja Knife",
    "Nomad Knife",
    "Paracord Knife",
    "Shadow Daggers",
    "Skeleton Knife",
    "Stiletto Knife",
    "Survival Knife",
    "Talon Knife",
    "Ursus Knife",
];

const FULL: &[Wear] = &[
    Wear::FactoryNew,
    Wear::MinimalWear,
    Wear::FieldTested,
    Wear::WellWorn,
    Wear::BattleScarred,
];
const LOW_FLOAT: &[Wear] = &[Wear::FactoryNew, Wear::MinimalWear];
const TO_FIELD_TESTED: &[Wear] = &[Wear::FactoryNew, Wear::MinimalWear, Wear::FieldTested];
const HIGH_FLOAT: &[Wear] = &[Wear::WellWorn, Wear::BattleScarred];

/// Wear conditions a knife finish can roll, from its float range.
/// `None` for finishes outside the knife tables.
pub fn finish_wears(finish: &str) -> Option<&'static [Wear]> {
    let wears = match finish {
        "Fade" | "Doppler" | "Marble Fade" | "Tiger Tooth" | "Gamma Doppler" => LOW_FLOAT,
        "Slaughter" => TO_FIELD_TESTED,
        "Rust Coat" => HIGH_FLOAT,
        "Blue Steel" | "Boreal Forest" | "Case Hardened" | "Crimson Web" | "Forest DDPAT"
        | "Night" | "Safari Mesh" | "Scorched" | "Stained" | "Urban Masked" | "Ultraviolet"
        | "Damascus Steel" | "Autotronic" | "Black Laminate" | "Bright Water" | "Freehand"
        | "Lore" => FULL,
        _ => return None,
    };
    Some(wears)
}

const CLASSIC_SET: &[&str] = &[
    "Blue Steel", "Boreal Forest", "Case Hardened", "Crimson Web", "Fade",
    "Forest DDPAT", "Night", "Safari Mesh", "Scorched", "Slaughter",
    "Stained", "Urban Masked", "Ultraviolet",
];

const CHROMA_SET: &[&str] = &[
    "Damascus Steel", "Doppler", "Marble Fade", "Rust Coat", "Tiger Tooth",
];

const GAMMA_SET: &[&str] = &[
    "Autotronic", "Black Laminate", "Bright Water", "Freehand", "Gamma Doppler", "Lore",
];

const SHATTERED_WEB_SET: &[&str] = &[
    "Blue Steel", "Case Hardened", "Crimson Web", "Fade", "Forest DDPAT",
    "Night", "Safari Mesh", "Scorched", "Slaughter", "Stained", "Urban Masked",
];

/// Finishes available on a knife type, in table order.
pub fn knife_finishes(knife: &str) -> Vec<&'static str> {
    let groups: &[&[&str]] = match knife {
        "Bayonet" | "Flip Knife" | "Gut Knife" | "Karambit" | "M9 Bayonet"
        | "Huntsman Knife" | "Butterfly Knife" | "Falchion Knife" | "Shadow Daggers"
        | "Bowie Knife" => &[CLASSIC_SET, CHROMA_SET, GAMMA_SET],
        "Stiletto Knife" | "Talon Knife" | "Ursus Knife" | "Navaja Knife" => {
            &[CHROMA_SET, GAMMA_SET]
        }
        "Classic Knife" => &[CLASSIC_SET],
        "Survival Knife" => &[SHATTERED_WEB_SET, CHROMA_SET],
        "Nomad Knife" | "Skeleton Knife" | "Paracord Knife" | "Kukri Knife" => {
            &[SHATTERED_WEB_SET]
        }
        _ => &[],
    };
    groups.iter().flat_map(|g| g.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_knife_has_finishes() {
        for knife in KNIFE_TYPES {
            assert!(!knife_finishes(knife).is_empty(), "{knife} has no finishes");
        }
    }

    #[test]
    fn test_every_knife_finish_has_wears() {
        for knife in KNIFE_TYPES {
            for finish in knife_finishes(knife) {
                assert!(finish_wears(finish).is_some(), "{finish} missing wear range");
            }
        }
    }

    #[test]
    fn test_restricted_wears() {
        assert_eq!(finish_wears("Rust Coat").unwrap(), HIGH_FLOAT);
        assert_eq!(finish_wears("Doppler").unwrap().len(), 2);
        assert_eq!(finish_wears("Slaughter").unwrap().len(), 3);
        assert!(finish_wears("Vice").is_none());
    }

    #[test]
    fn test_availability_counts() {
        assert_eq!(knife_finishes("Karambit").len(), 24);
        assert_eq!(knife_finishes("Talon Knife").len(), 11);
        assert_eq!(knife_finishes("Classic Knife").len(), 13);
        assert_eq!(knife_finishes("Survival Knife").len(), 16);
        assert_eq!(knife_finishes("Kukri Knife").len(), 11);
        assert!(knife_finishes("Spork").is_empty());
    }
}
