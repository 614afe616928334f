//! Built-in highlighters for vanilla objects
//!
//! Junimo huts, sprinklers, scarecrows, bee houses and mushroom logs are
//! ordinary registry entries, keyed `range-highlight.<category>`. Bombs are
//! handled by the engine directly since they need the inner/outer split.

use std::rc::Rc;

use crate::category::Category;
use crate::color::Color;
use crate::config::{BombConfig, HighlightConfig};
use crate::registry::{BuildingHighlight, BuildingRegistry, ItemHighlight, ItemRegistry};
use crate::shape::{cartesian_disc, chebyshev_disc, manhattan_disc, Mask};
use crate::world::Building;

pub const KEY_PREFIX: &str = "range-highlight.";

pub const JUNIMO_HUT: &str = "Junimo Hut";
pub const JUNIMO_RADIUS: u32 = 8;

pub const SCARECROW_RADIUS: u32 = 8;
pub const DELUXE_SCARECROW_RADIUS: u32 = 16;
pub const BEEHOUSE_RADIUS: u32 = 5;
pub const MUSHROOM_LOG_RADIUS: u32 = 3;

/// Registry key of a built-in category's highlighter
pub fn builtin_key(category: &Category) -> String {
    format!("{}{}", KEY_PREFIX, category.name())
}

/// Register (or re-register with fresh tints) every built-in highlighter
pub fn register_builtins(config: &HighlightConfig, buildings: &BuildingRegistry, items: &ItemRegistry) {
    let junimo_tint = config.junimo.tint;
    buildings.add(
        builtin_key(&Category::Junimo),
        Category::Junimo,
        config.junimo.hotkey.clone(),
        Rc::new(move |building: &Building| junimo_highlight(building, junimo_tint)),
    );

    let item_highlighters: [(Category, fn(&str) -> Option<Mask>); 4] = [
        (Category::Sprinkler, sprinkler_mask),
        (Category::Scarecrow, scarecrow_mask),
        (Category::Beehouse, beehouse_mask),
        (Category::MushroomLog, mushroom_log_mask),
    ];

    for (category, mask_for) in item_highlighters {
        let Some(section) = config.category(&category) else {
            continue;
        };
        let tint = section.tint;
        items.add(
            builtin_key(&category),
            category,
            section.hotkey.clone(),
            Rc::new(move |name: &str| mask_for(name).map(|mask| ItemHighlight { tint, mask })),
        );
    }
}

fn junimo_highlight(building: &Building, tint: Color) -> Option<BuildingHighlight> {
    if building.kind != JUNIMO_HUT {
        return None;
    }
    // The hut's door tile is one right and one down from its corner
    Some(BuildingHighlight {
        tint,
        mask: chebyshev_disc(JUNIMO_RADIUS, false),
        x_offset: 1,
        y_offset: 1,
    })
}

pub fn sprinkler_mask(name: &str) -> Option<Mask> {
    match name {
        "Sprinkler" => Some(manhattan_disc(1, true)),
        "Quality Sprinkler" => Some(chebyshev_disc(1, true)),
        "Iridium Sprinkler" => Some(chebyshev_disc(2, true)),
        _ => None,
    }
}

pub fn scarecrow_mask(name: &str) -> Option<Mask> {
    if !name.contains("arecrow") {
        return None;
    }
    let radius = if name.contains("Deluxe") {
        DELUXE_SCARECROW_RADIUS
    } else {
        SCARECROW_RADIUS
    };
    Some(cartesian_disc(radius, true))
}

pub fn beehouse_mask(name: &str) -> Option<Mask> {
    (name == "Bee House").then(|| manhattan_disc(BEEHOUSE_RADIUS, true))
}

pub fn mushroom_log_mask(name: &str) -> Option<Mask> {
    (name == "Mushroom Log").then(|| chebyshev_disc(MUSHROOM_LOG_RADIUS, true))
}

/// Blast radius of a bomb item
pub fn bomb_radius(name: &str) -> Option<u32> {
    match name {
        "Cherry Bomb" => Some(3),
        "Bomb" => Some(5),
        "Mega Bomb" => Some(7),
        _ => None,
    }
}

/// Disjoint (mask, tint) layers for one bomb, outermost first.
///
/// The blast disc always shows. With `show_inner` its inner half is split
/// off with the inner tint; with `show_outer` the damage square one tile
/// beyond the blast is drawn as a ring with the outer tint.
pub fn bomb_layers(radius: u32, config: &BombConfig) -> Vec<(Mask, Color)> {
    let blast = cartesian_disc(radius, false);
    let mut layers = Vec::with_capacity(3);

    if config.show_outer {
        let ring = chebyshev_disc(radius + 1, false).difference(&blast);
        layers.push((ring, config.outer_tint));
    }

    if config.show_inner {
        let inner = cartesian_disc(radius / 2, false);
        layers.push((blast.difference(&inner), config.tint));
        layers.push((inner, config.inner_tint));
    } else {
        layers.push((blast, config.tint));
    }

    layers
}
