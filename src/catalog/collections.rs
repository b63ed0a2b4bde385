//! Built-in collection tables.
//!
//! `focused` covers six accessible cases and samples a handful of cheap
//! gold outcomes per case; `full` covers every knife and glove case with
//! the complete model × finish grid.

use super::{
    strings, CHROMA_FINISHES, GAMMA_FINISHES, GLOVE_SET_1_FINISHES, GLOVE_SET_2_FINISHES,
    GLOVE_SET_3_FINISHES, ORIGINAL_FINISHES,
};
use crate::types::{CollectionSpec, GoldPool, Wear};

const ORIGINAL_KNIVES: &[&str] = &["Bayonet", "Flip Knife", "Gut Knife", "Karambit", "M9 Bayonet"];
const SPECTRUM_KNIVES: &[&str] = &[
    "Bowie Knife", "Butterfly Knife", "Falchion Knife", "Huntsman Knife", "Shadow Daggers",
];
const HORIZON_KNIVES: &[&str] = &["Navaja Knife", "Stiletto Knife", "Talon Knife", "Ursus Knife"];
const SHATTERED_WEB_KNIVES: &[&str] =
    &["Nomad Knife", "Paracord Knife", "Skeleton Knife", "Survival Knife"];
const GLOVES_1: &[&str] = &[
    "Bloodhound Gloves", "Driver Gloves", "Hand Wraps",
    "Moto Gloves", "Specialist Gloves", "Sport Gloves",
];
const GLOVES_2: &[&str] = &[
    "Driver Gloves", "Hand Wraps", "Hydra Gloves",
    "Moto Gloves", "Specialist Gloves", "Sport Gloves",
];
const GLOVES_3: &[&str] = &[
    "Broken Fang Gloves", "Driver Gloves", "Hand Wraps",
    "Moto Gloves", "Specialist Gloves", "Sport Gloves",
];

/// Cheapest wear conditions, tried for every generated gold outcome.
const CHEAP_WEARS: &[Wear] = &[Wear::FieldTested, Wear::BattleScarred];

/// Knife case: vanilla listing plus every model × finish × cheap wear.
fn knives(name: &str, coverts: &[&str], models: &[&str], finishes: &[&str]) -> CollectionSpec {
    CollectionSpec::new(
        name,
        strings(coverts),
        GoldPool::Generated {
            models: strings(models),
            finishes: strings(finishes),
            wears: CHEAP_WEARS.to_vec(),
            include_vanilla: true,
            max_models: None,
            max_finishes: None,
        },
    )
}

/// Glove case: gloves have no vanilla listing.
fn gloves(name: &str, coverts: &[&str], models: &[&str], finishes: &[&str]) -> CollectionSpec {
    CollectionSpec::new(
        name,
        strings(coverts),
        GoldPool::Generated {
            models: strings(models),
            finishes: strings(finishes),
            wears: CHEAP_WEARS.to_vec(),
            include_vanilla: false,
            max_models: None,
            max_finishes: None,
        },
    )
}

/// Sampled knife case: first model only, three priority finishes.
fn sampled(name: &str, coverts: &[&str], models: &[&str], finishes: &[&str]) -> CollectionSpec {
    CollectionSpec::new(
        name,
        strings(coverts),
        GoldPool::Generated {
            models: strings(models),
            finishes: strings(finishes),
            wears: CHEAP_WEARS.to_vec(),
            include_vanilla: true,
            max_models: Some(1),
            max_finishes: Some(3),
        },
    )
}

/// Six accessible cases with wear-specific covert listings.
pub fn focused_collections() -> Vec<CollectionSpec> {
    vec![
        sampled(
            "Huntsman Weapon Case",
            &[
                "M4A1-S | Cyrex (Minimal Wear)", "M4A1-S | Cyrex (Field-Tested)",
                "AK-47 | Vulcan (Field-Tested)", "AK-47 | Vulcan (Well-Worn)",
            ],
            &["Huntsman Knife"],
            &[
                "Safari Mesh", "Boreal Forest", "Forest DDPAT", "Scorched", "Urban Masked",
                "Stained", "Blue Steel",
            ],
        ),
        sampled(
            "Falchion Case",
            &[
                "AK-47 | Aquamarine Revenge (Field-Tested)",
                "AK-47 | Aquamarine Revenge (Well-Worn)", "AWP | Hyper Beast (Field-Tested)",
                "AWP | Hyper Beast (Well-Worn)",
            ],
            &["Falchion Knife"],
            &[
                "Safari Mesh", "Boreal Forest", "Forest DDPAT", "Scorched", "Urban Masked",
                "Stained",
            ],
        ),
        sampled(
            "Shadow Case",
            &[
                "M4A1-S | Golden Coil (Field-Tested)", "M4A1-S | Golden Coil (Well-Worn)",
                "AK-47 | Fuel Injector (Field-Tested)", "AK-47 | Fuel Injector (Well-Worn)",
            ],
            &["Shadow Daggers"],
            &[
                "Safari Mesh", "Boreal Forest", "Forest DDPAT", "Scorched", "Urban Masked",
                "Stained",
            ],
        ),
        sampled(
            "Spectrum Case",
            &[
                "AK-47 | Bloodsport (Field-Tested)", "AK-47 | Bloodsport (Well-Worn)",
                "USP-S | Neo-Noir (Field-Tested)", "USP-S | Neo-Noir (Well-Worn)",
            ],
            &["Bowie Knife", "Butterfly Knife", "Falchion Knife"],
            &["Rust Coat", "Ultraviolet", "Damascus Steel"],
        ),
        sampled(
            "Horizon Case",
            &[
                "AK-47 | Neon Rider (Field-Tested)", "AK-47 | Neon Rider (Well-Worn)",
                "AWP | Neo-Noir (Field-Tested)",
            ],
            &["Navaja Knife", "Stiletto Knife"],
            &["Safari Mesh", "Boreal Forest", "Forest DDPAT", "Scorched"],
        ),
        sampled(
            "Prisma Case",
            &[
                "M4A4 | The Emperor (Field-Tested)", "M4A4 | The Emperor (Well-Worn)",
                "AWP | Atheris (Field-Tested)",
            ],
            &["Navaja Knife", "Stiletto Knife"],
            &["Rust Coat", "Ultraviolet", "Damascus Steel"],
        ),
    ]
}

/// Every knife and glove case.
pub fn full_collections() -> Vec<CollectionSpec> {
    vec![
        knives(
            "CS:GO Weapon Case",
            &[
                "AWP | Lightning Strike (Minimal Wear)",
                "AWP | Lightning Strike (Field-Tested)",
                "Desert Eagle | Hypnotic (Minimal Wear)",
                "Desert Eagle | Hypnotic (Field-Tested)",
                "Desert Eagle | Hypnotic (Well-Worn)",
            ],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "eSports 2013",
            &["AK-47 | Fire Serpent (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Operation Bravo",
            &["AK-47 | Fire Serpent (Factory New)", "Desert Eagle | Golden Koi (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "CS:GO Weapon Case 2",
            &["M4A4 | Asiimov (Factory New)", "Desert Eagle | Cobalt Disruption (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "eSports 2013 Winter",
            &["AWP | Redline (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Winter Offensive",
            &["AWP | Redline (Factory New)", "M4A4 | Asiimov (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "CS:GO Weapon Case 3",
            &["AK-47 | Case Hardened (Factory New)", "AWP | Lightning Strike (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Operation Phoenix",
            &["AK-47 | Redline (Factory New)", "AWP | Asiimov (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Huntsman Weapon Case",
            &[
                "M4A1-S | Cyrex (Minimal Wear)", "M4A1-S | Cyrex (Field-Tested)",
                "AK-47 | Vulcan (Minimal Wear)", "AK-47 | Vulcan (Field-Tested)",
                "AK-47 | Vulcan (Well-Worn)",
            ],
            &["Huntsman Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Chroma Case",
            &[
                "M4A1-S | Hyper Beast (Minimal Wear)", "M4A1-S | Hyper Beast (Field-Tested)",
                "AK-47 | Cartel (Minimal Wear)", "AK-47 | Cartel (Field-Tested)",
                "AK-47 | Cartel (Well-Worn)",
            ],
            ORIGINAL_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Chroma 2 Case",
            &[
                "M4A1-S | Hyper Beast (Minimal Wear)", "M4A1-S | Hyper Beast (Field-Tested)",
                "AK-47 | Aquamarine Revenge (Minimal Wear)",
                "AK-47 | Aquamarine Revenge (Field-Tested)",
                "AK-47 | Aquamarine Revenge (Well-Worn)",
            ],
            ORIGINAL_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Chroma 3 Case",
            &[
                "M4A1-S | Chantico's Fire (Minimal Wear)",
                "M4A1-S | Chantico's Fire (Field-Tested)",
                "AK-47 | Fuel Injector (Minimal Wear)", "AK-47 | Fuel Injector (Field-Tested)",
                "AK-47 | Fuel Injector (Well-Worn)",
            ],
            ORIGINAL_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Falchion Case",
            &[
                "AK-47 | Aquamarine Revenge (Minimal Wear)",
                "AK-47 | Aquamarine Revenge (Field-Tested)",
                "AWP | Hyper Beast (Minimal Wear)", "AWP | Hyper Beast (Field-Tested)",
                "AWP | Hyper Beast (Well-Worn)",
            ],
            &["Falchion Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Shadow Case",
            &[
                "M4A1-S | Golden Coil (Minimal Wear)", "M4A1-S | Golden Coil (Field-Tested)",
                "AK-47 | Fuel Injector (Minimal Wear)", "AK-47 | Fuel Injector (Field-Tested)",
                "AK-47 | Fuel Injector (Well-Worn)",
            ],
            &["Shadow Daggers"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Revolver Case",
            &["R8 Revolver | Fade (Factory New)", "M4A1-S | Hot Rod (Factory New)"],
            ORIGINAL_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Operation Wildfire Case",
            &["M4A1-S | Hot Rod (Factory New)", "AWP | Elite Build (Factory New)"],
            &["Bowie Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Gamma Case",
            &[
                "M4A1-S | Mecha Industries (Factory New)",
                "Glock-18 | Wasteland Rebel (Factory New)",
            ],
            ORIGINAL_KNIVES,
            GAMMA_FINISHES,
        ),
        knives(
            "Gamma 2 Case",
            &["AK-47 | Neon Revolution (Factory New)", "FAMAS | Roll Cage (Factory New)"],
            ORIGINAL_KNIVES,
            GAMMA_FINISHES,
        ),
        knives(
            "Spectrum Case",
            &["AK-47 | Bloodsport (Factory New)", "USP-S | Neo-Noir (Factory New)"],
            SPECTRUM_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Spectrum 2 Case",
            &["AK-47 | The Empress (Factory New)", "M4A1-S | Leaded Glass (Factory New)"],
            SPECTRUM_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Horizon Case",
            &["AK-47 | Neon Rider (Factory New)", "AWP | Neo-Noir (Factory New)"],
            HORIZON_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Danger Zone Case",
            &["AWP | Neo-Noir (Factory New)", "AK-47 | Asiimov (Factory New)"],
            HORIZON_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Prisma Case",
            &["M4A4 | The Emperor (Factory New)", "AWP | Atheris (Factory New)"],
            HORIZON_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "Prisma 2 Case",
            &["M4A1-S | Player Two (Factory New)", "Glock-18 | Bullet Queen (Factory New)"],
            HORIZON_KNIVES,
            CHROMA_FINISHES,
        ),
        knives(
            "CS20 Case",
            &["AWP | Wildfire (Factory New)", "USP-S | Neo-Noir (Factory New)"],
            &["Classic Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Shattered Web Case",
            &["AK-47 | Slate (Factory New)", "Desert Eagle | Mecha Industries (Factory New)"],
            SHATTERED_WEB_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Fracture Case",
            &["AK-47 | Legion of Anubis (Factory New)", "Glock-18 | Vogue (Factory New)"],
            SHATTERED_WEB_KNIVES,
            ORIGINAL_FINISHES,
        ),
        knives(
            "Operation Riptide Case",
            &["AK-47 | Ice Coaled (Factory New)", "M4A4 | Eye of Horus (Factory New)"],
            SPECTRUM_KNIVES,
            GAMMA_FINISHES,
        ),
        knives(
            "Dreams & Nightmares Case",
            &["AK-47 | Nightwish (Factory New)", "MP9 | Starlight Protector (Factory New)"],
            SPECTRUM_KNIVES,
            GAMMA_FINISHES,
        ),
        knives(
            "Kilowatt Case",
            &["Zeus x27 | Olympus (Factory New)", "USP-S | Whiteout (Factory New)"],
            &["Kukri Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Gallery Case",
            &["M4A4 | Temukau (Factory New)", "AK-47 | Head Shot (Factory New)"],
            &["Kukri Knife"],
            ORIGINAL_FINISHES,
        ),
        knives(
            "Fever Case",
            &["AK-47 | Wild Lotus (Factory New)", "M4A4 | Poseidon (Factory New)"],
            SHATTERED_WEB_KNIVES,
            CHROMA_FINISHES,
        ),
        gloves(
            "Glove Case",
            &["M4A4 | Buzz Kill (Factory New)", "USP-S | Cyrex (Factory New)"],
            GLOVES_1,
            GLOVE_SET_1_FINISHES,
        ),
        gloves(
            "Operation Hydra Case",
            &["AK-47 | Orbit Mk01 (Factory New)", "Five-SeveN | Hyper Beast (Factory New)"],
            GLOVES_1,
            GLOVE_SET_1_FINISHES,
        ),
        gloves(
            "Clutch Case",
            &["AWP | Mortis (Factory New)", "USP-S | Cortex (Factory New)"],
            GLOVES_2,
            GLOVE_SET_2_FINISHES,
        ),
        gloves(
            "Revolution Case",
            &["AK-47 | Ice Coaled (Factory New)", "P250 | Cyber Shell (Factory New)"],
            GLOVES_2,
            GLOVE_SET_2_FINISHES,
        ),
        gloves(
            "Operation Broken Fang Case",
            &["M4A1-S | Printstream (Factory New)", "Glock-18 | Neo-Noir (Factory New)"],
            GLOVES_3,
            GLOVE_SET_3_FINISHES,
        ),
        gloves(
            "Snakebite Case",
            &["AK-47 | Slate (Factory New)", "M4A4 | In Living Color (Factory New)"],
            GLOVES_3,
            GLOVE_SET_3_FINISHES,
        ),
        gloves(
            "Recoil Case",
            &["AK-47 | Ice Coaled (Factory New)", "AWP | Chromatic Aberration (Factory New)"],
            GLOVES_3,
            GLOVE_SET_3_FINISHES,
        ),
    ]
}
