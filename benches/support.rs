//! Shared helpers for benchmarks

use range_highlight::scene::Scene;
use range_highlight::world::{Building, GridBounds, PlacedItem, TilePos};

/// A square farm with a regular grid of sprinklers, scarecrows and huts
#[allow(dead_code)]
pub fn make_farm(side: u32) -> Scene {
    let mut scene = Scene {
        bounds: Some(GridBounds::new(side, side)),
        ..Scene::default()
    };

    for y in (2..side as i32).step_by(5) {
        for x in (2..side as i32).step_by(5) {
            let name = match (x / 5 + y / 5) % 3 {
                0 => "Sprinkler",
                1 => "Quality Sprinkler",
                _ => "Iridium Sprinkler",
            };
            scene.items.push(PlacedItem::new(name, TilePos::new(x, y)));
        }
    }

    for y in (8..side as i32).step_by(20) {
        for x in (8..side as i32).step_by(20) {
            scene.items.push(PlacedItem::new("Scarecrow", TilePos::new(x + 1, y)));
            scene.buildings.push(Building::new("Junimo Hut", TilePos::new(x + 4, y + 4), 2, 2));
        }
    }

    scene
}
