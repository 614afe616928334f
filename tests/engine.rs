//! Engine tests
//!
//! End-to-end refreshes through the registries, throttle and compositor.

mod common;

use std::collections::HashSet;
use std::rc::Rc;

use common::{covered, RecordingSink, TestWorld, TICK};
use range_highlight::activation::{ActivationState, HotkeyTracker};
use range_highlight::config::SprinklerModCompatibility;
use range_highlight::keymap::{KeyCode, KeybindList};
use range_highlight::registry::{BuildingHighlight, ItemCallback, ItemHighlight};
use range_highlight::render::NullSink;
use range_highlight::scene::Scene;
use range_highlight::shape::{chebyshev_disc, manhattan_disc};
use range_highlight::world::{PlacedItem, TilePos};
use range_highlight::{Category, Color, HighlightConfig, RangeHighlighter};

const BLUE: Color = Color::rgba(0, 0, 255, 178);

fn pressed(keys: &[KeyCode]) -> HashSet<KeyCode> {
    keys.iter().copied().collect()
}

// ========================================================================
// End-to-end
// ========================================================================

#[test]
fn test_plugin_building_highlighter_end_to_end() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    engine.api().add_building_range_highlighter(
        "test.sprinkler",
        Some(KeybindList::single(KeyCode::char('r'))),
        |_| {
            Some(BuildingHighlight {
                tint: BLUE,
                mask: manhattan_disc(1, false),
                x_offset: 0,
                y_offset: 0,
            })
        },
    );

    let world = TestWorld::new().with_building("Silo", 5, 5);
    let mut tracker = HotkeyTracker::new(false);
    let activation = tracker.activation(
        &engine.hotkey_bindings(),
        &KeybindList::none(),
        &pressed(&[KeyCode::char('r')]),
    );
    assert!(activation.requested.contains(&Category::external("test.sprinkler")));

    let mut sink = RecordingSink::default();
    assert!(engine.tick(TICK, &world, &activation, &mut sink));

    let map = sink.last().unwrap();
    assert_eq!(covered(&map), vec![(4, 5), (5, 4), (5, 5), (5, 6), (6, 5)]);
    assert!(map.iter().all(|(_, cell)| cell.color == BLUE));
}

#[test]
fn test_plugin_building_highlighter_needs_hotkey() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    engine.api().add_building_range_highlighter(
        "test.sprinkler",
        Some(KeybindList::single(KeyCode::char('r'))),
        |_| {
            Some(BuildingHighlight {
                tint: BLUE,
                mask: manhattan_disc(1, false),
                x_offset: 0,
                y_offset: 0,
            })
        },
    );
    let world = TestWorld::new().with_building("Silo", 5, 5);
    // Cursor elsewhere so mouseover does not apply
    let idle = ActivationState::new().with_cursor(TilePos::new(30, 30));
    engine.tick(TICK, &world, &idle, &mut NullSink);
    assert!(engine.current().is_empty());
}

#[test]
fn test_hotkey_toggle_mode_follows_config() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    engine
        .api()
        .add_item_range_highlighter("test.pond", Some(KeybindList::single(KeyCode::char('r'))), |_| None);
    let key = Category::external("test.pond");
    assert!(!engine.hotkey_tracker().toggle_mode());

    // Hold mode: released means not requested
    assert!(engine.activation(&pressed(&[KeyCode::char('r')])).requested.contains(&key));
    assert!(engine.activation(&pressed(&[])).requested.is_empty());

    let mut config = HighlightConfig::default();
    config.hotkeys_toggle = true;
    engine.update_config(config);
    assert!(engine.hotkey_tracker().toggle_mode());

    // Toggle mode: a press latches until the next press
    assert!(engine.activation(&pressed(&[KeyCode::char('r')])).requested.contains(&key));
    assert!(engine.activation(&pressed(&[])).requested.contains(&key));
    engine.activation(&pressed(&[KeyCode::char('r')]));
    assert!(engine.activation(&pressed(&[])).requested.is_empty());
}

// ========================================================================
// Throttling
// ========================================================================

#[test]
fn test_refresh_every_sixth_tick() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    assert_eq!(engine.config().refresh_interval(), 6);

    let mut world = TestWorld::new().with_item("Sprinkler", 3, 3);
    let activation = ActivationState::new().with_requested(Category::Sprinkler);
    let mut sink = RecordingSink::default();

    assert!(engine.tick(TICK, &world, &activation, &mut sink));
    let first = engine.current().clone();
    assert_eq!(first.len(), 4);

    // World changes, but the overlay stays stale until the interval passes
    world.items.push(PlacedItem::new("Sprinkler", TilePos::new(10, 10)));
    for _ in 0..5 {
        assert!(!engine.tick(TICK, &world, &activation, &mut sink));
        assert_eq!(engine.current(), &first);
    }
    assert_eq!(sink.count(), 1);

    assert!(engine.tick(TICK, &world, &activation, &mut sink));
    assert_eq!(sink.count(), 2);
    assert_eq!(engine.current().len(), 8);
}

#[test]
fn test_invalidate_forces_refresh() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let mut world = TestWorld::new().with_item("Bee House", 8, 8);
    let activation = ActivationState::new().with_requested(Category::Beehouse);

    engine.tick(TICK, &world, &activation, &mut NullSink);
    engine.tick(TICK, &world, &activation, &mut NullSink);
    world.items.clear();

    engine.invalidate();
    assert!(engine.tick(TICK, &world, &activation, &mut NullSink));
    assert!(engine.current().is_empty());
    // Counter restarted: five quiet ticks follow
    for _ in 0..5 {
        assert!(!engine.tick(TICK, &world, &activation, &mut NullSink));
    }
}

#[test]
fn test_activation_change_refreshes_immediately() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new().with_item("Sprinkler", 3, 3);

    engine.tick(TICK, &world, &ActivationState::new(), &mut NullSink);
    assert!(engine.current().is_empty());

    let pressed = ActivationState::new().with_requested(Category::Sprinkler);
    assert!(engine.tick(TICK, &world, &pressed, &mut NullSink));
    assert_eq!(engine.current().len(), 4);

    // Released again
    assert!(engine.tick(TICK, &world, &ActivationState::new(), &mut NullSink));
    assert!(engine.current().is_empty());
}

#[test]
fn test_registry_change_refreshes_immediately() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    let world = TestWorld::new().with_item("Pond", 3, 3);
    let activation = ActivationState::new().with_show_all(true);
    engine.tick(TICK, &world, &activation, &mut NullSink);

    let api = engine.api();
    api.add_item_range_highlighter("mod.pond", None, |name| {
        (name == "Pond").then(|| ItemHighlight {
            tint: BLUE,
            mask: chebyshev_disc(1, true),
        })
    });
    assert!(engine.tick(TICK, &world, &activation, &mut NullSink));
    assert_eq!(engine.current().len(), 8);
}

#[test]
fn test_cursor_movement_waits_for_interval() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new();
    let mut sink = RecordingSink::default();

    for i in 0..12 {
        let activation = ActivationState::new()
            .with_requested(Category::Sprinkler)
            .with_cursor(TilePos::new(20 + i, 20));
        engine.tick(TICK, &world, &activation, &mut sink);
    }
    assert_eq!(sink.count(), 2);
    assert_eq!(engine.refresh_count(), 2);
}

#[test]
fn test_action_tile_movement_waits_for_interval() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new();
    let held = |x: i32| {
        ActivationState::new()
            .holding("Sprinkler")
            .with_action_tile(TilePos::new(x, 5))
    };

    assert!(engine.tick(TICK, &world, &held(0), &mut NullSink));
    assert!(!engine.tick(TICK, &world, &held(1), &mut NullSink));
    // Still drawn at the old action tile until the interval passes
    assert!(engine.current().color(TilePos::new(1, 5)).is_some());
    assert!(engine.current().color(TilePos::new(2, 5)).is_none());
}

#[test]
fn test_hovering_onto_building_refreshes_immediately() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new().with_building("Junimo Hut", 20, 20);
    let at = |x: i32| ActivationState::new().with_cursor(TilePos::new(x, 21));

    assert!(engine.tick(TICK, &world, &at(10), &mut NullSink));
    assert!(!engine.tick(TICK, &world, &at(11), &mut NullSink));
    assert!(engine.tick(TICK, &world, &at(20), &mut NullSink));
    assert!(!engine.current().is_empty());
    // Moving within the same hut is not a new trigger
    assert!(!engine.tick(TICK, &world, &at(21), &mut NullSink));
    assert!(engine.tick(TICK, &world, &at(30), &mut NullSink));
    assert!(engine.current().is_empty());
}

#[test]
fn test_held_item_change_refreshes_immediately() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new();
    let cursor = TilePos::new(5, 5);

    engine.tick(TICK, &world, &ActivationState::new().with_cursor(cursor), &mut NullSink);
    let holding = ActivationState::new()
        .with_cursor(cursor)
        .holding("Sprinkler");
    assert!(engine.tick(TICK, &world, &holding, &mut NullSink));
    assert_eq!(engine.current().len(), 4);
}

#[test]
fn test_elapsed_accumulates_ticks() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new();
    for _ in 0..3 {
        engine.tick(TICK, &world, &ActivationState::new(), &mut NullSink);
    }
    assert_eq!(engine.elapsed(), TICK * 3);
}

// ========================================================================
// Plugin failures and registry snapshots
// ========================================================================

#[test]
fn test_panicking_callback_skips_only_that_subject() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    engine.api().add_item_range_highlighter("mod.fragile", None, |name| {
        if name == "Cursed Idol" {
            panic!("cannot highlight {}", name);
        }
        Some(ItemHighlight {
            tint: BLUE,
            mask: chebyshev_disc(0, false),
        })
    });

    let world = TestWorld::new()
        .with_item("Lamp", 1, 1)
        .with_item("Cursed Idol", 2, 2)
        .with_item("Lamp", 3, 3);
    let activation = ActivationState::new().with_show_all(true);
    let map = engine.refresh(&world, &activation).clone();

    assert_eq!(covered(&map), vec![(1, 1), (3, 3)]);
    assert_eq!(engine.stats().failed_callbacks, 1);
}

#[test]
fn test_callback_may_mutate_registry_mid_refresh() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    let registry = engine.item_registry();
    let handle = registry.clone();

    let callback: Rc<ItemCallback> = Rc::new(move |_: &str| {
        handle.remove("mod.once");
        Some(ItemHighlight {
            tint: BLUE,
            mask: chebyshev_disc(0, false),
        })
    });
    registry.add("mod.once", Category::external("mod.once"), KeybindList::none(), callback);

    let world = TestWorld::new().with_item("Lamp", 1, 1).with_item("Torch", 2, 2);
    let activation = ActivationState::new().with_show_all(true);

    // The refresh that removes the definition still completes from its snapshot
    assert_eq!(engine.refresh(&world, &activation).len(), 2);
    assert!(registry.is_empty());
    assert!(engine.refresh(&world, &activation).is_empty());
}

#[test]
fn test_unregister_removes_contributions() {
    let mut engine = RangeHighlighter::new(HighlightConfig::default());
    engine.add_item_highlighter(
        "mod.pond",
        KeybindList::none(),
        Rc::new(|_: &str| {
            Some(ItemHighlight {
                tint: BLUE,
                mask: chebyshev_disc(0, false),
            })
        }),
    );
    let world = TestWorld::new().with_item("Pond", 1, 1);
    let activation = ActivationState::new().with_show_all(true);
    assert_eq!(engine.refresh(&world, &activation).len(), 1);

    engine.remove_item_highlighter("mod.pond");
    engine.remove_item_highlighter("mod.pond");
    assert!(engine.refresh(&world, &activation).is_empty());
}

// ========================================================================
// Held items and "show others"
// ========================================================================

#[test]
fn test_holding_sprinkler_shows_others() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new()
        .with_item("Sprinkler", 2, 2)
        .with_item("Quality Sprinkler", 20, 20);
    let activation = ActivationState::new()
        .holding("Sprinkler")
        .with_cursor(TilePos::new(10, 10));

    let contributions = engine.contributions(&world, &activation);
    let anchors: Vec<TilePos> = contributions.iter().map(|c| c.anchor).collect();
    assert_eq!(
        anchors,
        vec![TilePos::new(2, 2), TilePos::new(20, 20), TilePos::new(10, 10)]
    );
    assert_eq!(engine.refresh(&world, &activation).len(), 4 + 8 + 4);
}

#[test]
fn test_holding_beehouse_hides_others_by_default() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new().with_item("Bee House", 2, 2);
    let activation = ActivationState::new()
        .holding("Bee House")
        .with_cursor(TilePos::new(20, 20));

    let anchors: Vec<TilePos> = engine
        .contributions(&world, &activation)
        .iter()
        .map(|c| c.anchor)
        .collect();
    assert_eq!(anchors, vec![TilePos::new(20, 20)]);

    let mut config = HighlightConfig::default();
    config.beehouse.show_others_when_holding = true;
    engine.update_config(config);
    assert_eq!(engine.contributions(&world, &activation).len(), 2);
}

#[test]
fn test_held_item_at_cursor_and_action_tile() {
    let engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new();
    let activation = ActivationState::new()
        .holding("Mushroom Log")
        .with_cursor(TilePos::new(10, 10))
        .with_action_tile(TilePos::new(4, 4));
    let anchors: Vec<TilePos> = engine
        .contributions(&world, &activation)
        .iter()
        .map(|c| c.anchor)
        .collect();
    assert_eq!(anchors, vec![TilePos::new(10, 10), TilePos::new(4, 4)]);
}

#[test]
fn test_disabled_category_contributes_nothing() {
    let mut config = HighlightConfig::default();
    config.sprinkler.enabled = false;
    let mut engine = RangeHighlighter::with_builtins(config);
    let world = TestWorld::new().with_item("Sprinkler", 2, 2);
    let activation = ActivationState::new()
        .with_show_all(true)
        .holding("Sprinkler")
        .with_cursor(TilePos::new(5, 5));
    assert!(engine.refresh(&world, &activation).is_empty());
}

#[test]
fn test_config_update_changes_tint() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new().with_item("Sprinkler", 2, 2);
    let activation = ActivationState::new().with_requested(Category::Sprinkler);
    engine.tick(TICK, &world, &activation, &mut NullSink);

    let mut config = HighlightConfig::default();
    config.sprinkler.tint = BLUE;
    engine.update_config(config);
    assert!(engine.tick(TICK, &world, &activation, &mut NullSink));
    assert_eq!(engine.current().color(TilePos::new(2, 1)), Some(BLUE));
}

// ========================================================================
// Buildings
// ========================================================================

#[test]
fn test_junimo_hut_on_mouseover() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new()
        .with_building("Junimo Hut", 20, 20)
        .with_building("Junimo Hut", 60, 60);
    let hovering = ActivationState::new().with_cursor(TilePos::new(21, 21));

    let map = engine.refresh(&world, &hovering).clone();
    // Only the hovered hut, centred one tile in from its corner
    assert_eq!(map.len(), 17 * 17);
    assert!(map.color(TilePos::new(13, 13)).is_some());
    assert!(map.color(TilePos::new(29, 29)).is_some());
    assert!(map.color(TilePos::new(30, 30)).is_none());

    let mut config = HighlightConfig::default();
    config.highlight_buildings_on_mouseover = false;
    engine.update_config(config);
    assert!(engine.refresh(&world, &hovering).is_empty());
}

#[test]
fn test_junimo_hotkey_shows_every_hut() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new()
        .with_building("Junimo Hut", 20, 20)
        .with_building("Junimo Hut", 60, 60);
    let activation = ActivationState::new().with_requested(Category::Junimo);
    assert_eq!(engine.refresh(&world, &activation).len(), 2 * 17 * 17);
}

// ========================================================================
// Bombs
// ========================================================================

#[test]
fn test_held_bomb_hidden_while_placed_ticking() {
    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    let world = TestWorld::new().with_ticking_bomb("Cherry Bomb", 5, 5);
    let activation = ActivationState::new()
        .holding("Bomb")
        .with_cursor(TilePos::new(30, 30));

    let contributions = engine.contributions(&world, &activation);
    assert!(contributions.iter().all(|c| c.anchor == TilePos::new(5, 5)));
    assert!(contributions.iter().all(|c| c.category == Category::Bomb));

    let mut config = HighlightConfig::default();
    config.bomb.hide_held_when_placed_ticking = false;
    engine.update_config(config);
    let contributions = engine.contributions(&world, &activation);
    assert!(contributions.iter().any(|c| c.anchor == TilePos::new(30, 30)));
    // Placed bombs come before the held one
    assert_eq!(contributions[0].anchor, TilePos::new(5, 5));
}

#[test]
fn test_bomb_inner_and_outer_toggles() {
    let mut config = HighlightConfig::default();
    config.bomb.show_outer = false;
    let mut engine = RangeHighlighter::with_builtins(config.clone());
    let world = TestWorld::new().with_ticking_bomb("Mega Bomb", 10, 10);
    let activation = ActivationState::new();

    let blast_only = engine.refresh(&world, &activation).clone();
    assert_eq!(blast_only.color(TilePos::new(10, 10)), Some(config.bomb.tint));

    config.bomb.show_inner = true;
    engine.update_config(config.clone());
    let with_inner = engine.refresh(&world, &activation).clone();
    assert_eq!(with_inner.len(), blast_only.len());
    assert_eq!(with_inner.color(TilePos::new(10, 10)), Some(config.bomb.inner_tint));
    assert_eq!(with_inner.overlap_count(), 0);

    config.bomb.show_outer = true;
    engine.update_config(config.clone());
    let with_outer = engine.refresh(&world, &activation).clone();
    assert_eq!(with_outer.len(), 17 * 17);
    assert_eq!(with_outer.color(TilePos::new(2, 2)), Some(config.bomb.outer_tint));
}

#[test]
fn test_overlapping_ranges_use_overlap_tint() {
    let config = HighlightConfig::default();
    let overlap = config.overlap_tint;
    let mut engine = RangeHighlighter::with_builtins(config);
    let world = TestWorld::new()
        .with_item("Quality Sprinkler", 5, 5)
        .with_item("Quality Sprinkler", 7, 5);
    let activation = ActivationState::new().with_requested(Category::Sprinkler);
    let map = engine.refresh(&world, &activation).clone();
    assert_eq!(map.color(TilePos::new(6, 5)), Some(overlap));
    assert_eq!(map.color(TilePos::new(6, 4)), Some(overlap));
    assert_eq!(map.color(TilePos::new(4, 5)), Some(engine.config().sprinkler.tint));
}

// ========================================================================
// Sprinkler coverage from the world
// ========================================================================

#[test]
fn test_sprinkler_coverage_compatibility() {
    let yaml = r######"
items:
  - { name: Sprinkler, tile: { x: 5, y: 5 } }
coverage:
  - tile: { x: 5, y: 5 }
    rows: ["#####", ".....", ".....", ".....", "....."]
"######;
    let scene = Scene::from_yaml(yaml).unwrap();
    let activation = ActivationState::new().with_requested(Category::Sprinkler);

    let mut engine = RangeHighlighter::with_builtins(HighlightConfig::default());
    assert_eq!(
        covered(engine.refresh(&scene, &activation)),
        vec![(3, 3), (4, 3), (5, 3), (6, 3), (7, 3)]
    );

    let mut config = HighlightConfig::default();
    config.sprinkler_mod_compatibility = SprinklerModCompatibility::Faster;
    engine.update_config(config);
    assert_eq!(
        covered(engine.refresh(&scene, &activation)),
        vec![(4, 5), (5, 4), (5, 6), (6, 5)]
    );
}

#[test]
fn test_held_bomb_shown_when_placed_bombs_are_hidden() {
    let mut config = HighlightConfig::default();
    config.bomb.show_placed = false;
    let engine = RangeHighlighter::with_builtins(config);
    let world = TestWorld::new().with_ticking_bomb("Bomb", 5, 5);
    let activation = ActivationState::new()
        .holding("Cherry Bomb")
        .with_cursor(TilePos::new(30, 30));

    let contributions = engine.contributions(&world, &activation);
    assert!(!contributions.is_empty());
    assert!(contributions.iter().all(|c| c.anchor == TilePos::new(30, 30)));
}
