//! RangeHighlighter: throttled recompute of the range overlay
//!
//! Each refresh walks the building and item registries (snapshots), asks the
//! world what is placed, collects contributions in a fixed order and
//! composites them. The result is kept until the next refresh and handed to
//! the render sink once per refresh.
//!
//! Between interval ticks only a change of what is shown recomputes early:
//! requested categories, show-all, the held item, or the building under the
//! cursor. Cursor movement alone waits for the next interval tick.
//!
//! Contribution order:
//! 1. building definitions, in registration order
//! 2. item definitions, in registration order (placed instances, then held)
//! 3. ticking placed bombs
//! 4. the held bomb

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use crate::activation::{ActivationState, HotkeyTracker};
use crate::api::RangeHighlightApi;
use crate::builtin::{self, bomb_layers, bomb_radius};
use crate::category::Category;
use crate::composite::{CompositeMap, Compositor, Contribution};
use crate::config::{ActionLocationStyle, HighlightConfig, SprinklerModCompatibility};
use crate::keymap::{KeyCode, KeybindList};
use crate::registry::{
    BuildingCallback, BuildingRegistry, ItemCallback, ItemHighlight, ItemRegistry,
};
use crate::render::RenderSink;
use crate::throttle::RefreshThrottle;
use crate::world::{TilePos, WorldQuery};

/// Counters from the most recent refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub contributions: usize,
    pub tiles: usize,
    pub overlaps: usize,
    pub failed_callbacks: usize,
}

/// The parts of an activation that change what is shown, not where
#[derive(Debug, Clone, PartialEq, Eq)]
struct TriggerKey {
    requested: BTreeSet<Category>,
    show_all: bool,
    held_item: Option<String>,
    /// Index of the building under the cursor, when mouseover applies
    hovered: Option<usize>,
}

pub struct RangeHighlighter {
    config: HighlightConfig,
    /// Read-only copy for API handles
    published: Rc<RefCell<HighlightConfig>>,
    buildings: BuildingRegistry,
    items: ItemRegistry,
    builtins: bool,
    throttle: RefreshThrottle,
    hotkeys: HotkeyTracker,
    last_trigger: Option<TriggerKey>,
    seen_revisions: (u64, u64),
    current: CompositeMap,
    stats: RefreshStats,
    refreshes: u64,
    elapsed: Duration,
}

impl RangeHighlighter {
    /// Engine with empty registries
    pub fn new(config: HighlightConfig) -> Self {
        let buildings = BuildingRegistry::new();
        let items = ItemRegistry::new();
        Self {
            throttle: RefreshThrottle::new(config.refresh_interval()),
            hotkeys: HotkeyTracker::new(config.hotkeys_toggle),
            seen_revisions: (buildings.revision(), items.revision()),
            published: Rc::new(RefCell::new(config.clone())),
            config,
            buildings,
            items,
            builtins: false,
            last_trigger: None,
            current: CompositeMap::default(),
            stats: RefreshStats::default(),
            refreshes: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Engine with the vanilla highlighters registered
    pub fn with_builtins(config: HighlightConfig) -> Self {
        let mut engine = Self::new(config);
        builtin::register_builtins(&engine.config, &engine.buildings, &engine.items);
        engine.builtins = true;
        engine
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Replace the configuration. Built-in highlighters pick up new tints
    /// and hotkeys, and the next tick recomputes.
    pub fn update_config(&mut self, config: HighlightConfig) {
        self.config = config;
        *self.published.borrow_mut() = self.config.clone();
        self.throttle.set_interval(self.config.refresh_interval());
        self.hotkeys.set_toggle_mode(self.config.hotkeys_toggle);
        if self.builtins {
            builtin::register_builtins(&self.config, &self.buildings, &self.items);
        }
        self.throttle.invalidate();
        tracing::debug!(
            "Config updated, refresh interval {}",
            self.config.refresh_interval()
        );
    }

    /// Plugin-facing handle. It stays valid for the engine's lifetime and
    /// sees later config updates.
    pub fn api(&self) -> RangeHighlightApi {
        RangeHighlightApi::new(
            self.buildings.clone(),
            self.items.clone(),
            Rc::clone(&self.published),
        )
    }

    /// Shared handle to the building registry
    pub fn building_registry(&self) -> BuildingRegistry {
        self.buildings.clone()
    }

    /// Shared handle to the item registry
    pub fn item_registry(&self) -> ItemRegistry {
        self.items.clone()
    }

    pub fn add_building_highlighter(&mut self, key: &str, hotkey: KeybindList, callback: Rc<BuildingCallback>) {
        self.buildings.add(key, Category::external(key), hotkey, callback);
        self.throttle.invalidate();
    }

    pub fn add_item_highlighter(&mut self, key: &str, hotkey: KeybindList, callback: Rc<ItemCallback>) {
        self.items.add(key, Category::external(key), hotkey, callback);
        self.throttle.invalidate();
    }

    pub fn remove_building_highlighter(&mut self, key: &str) {
        if self.buildings.remove(key) {
            self.throttle.invalidate();
        }
    }

    pub fn remove_item_highlighter(&mut self, key: &str) {
        if self.items.remove(key) {
            self.throttle.invalidate();
        }
    }

    /// Force a recompute on the next tick (e.g. after a location change)
    pub fn invalidate(&mut self) {
        self.throttle.invalidate();
    }

    /// Hotkeys of every registered highlighter, for [`crate::activation::HotkeyTracker`]
    pub fn hotkey_bindings(&self) -> Vec<(Category, KeybindList)> {
        let buildings = self
            .buildings
            .list()
            .into_iter()
            .map(|d| (d.category, d.hotkey));
        let items = self.items.list().into_iter().map(|d| (d.category, d.hotkey));
        buildings
            .chain(items)
            .filter(|(_, hotkey)| hotkey.is_bound())
            .collect()
    }

    /// Resolve held buttons into requested categories using every registered
    /// hotkey and the configured show-all key. Hold or toggle mode follows
    /// `hotkeys_toggle`.
    pub fn activation(&mut self, pressed: &HashSet<KeyCode>) -> ActivationState {
        let bindings = self.hotkey_bindings();
        self.hotkeys
            .activation(&bindings, &self.config.show_all_key, pressed)
    }

    pub fn hotkey_tracker(&self) -> &HotkeyTracker {
        &self.hotkeys
    }

    /// Result of the last refresh
    pub fn current(&self) -> &CompositeMap {
        &self.current
    }

    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    /// Total time reported through [`Self::tick`]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance one host tick. Recomputes when the throttle allows it or when
    /// what is shown changed, and presents the new map to `sink`. Returns true
    /// if a refresh happened.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        world: &dyn WorldQuery,
        activation: &ActivationState,
        sink: &mut dyn RenderSink,
    ) -> bool {
        self.elapsed += elapsed;

        let trigger = self.trigger_key(world, activation);
        if self.last_trigger.as_ref() != Some(&trigger) {
            self.last_trigger = Some(trigger);
            self.throttle.invalidate();
        }

        let revisions = (self.buildings.revision(), self.items.revision());
        if revisions != self.seen_revisions {
            self.seen_revisions = revisions;
            self.throttle.invalidate();
        }

        if !self.throttle.tick() {
            return false;
        }

        self.refresh(world, activation);
        sink.present(&self.current);
        true
    }

    fn trigger_key(&self, world: &dyn WorldQuery, activation: &ActivationState) -> TriggerKey {
        let hovered = self
            .hover_tile(activation)
            .and_then(|tile| world.buildings().iter().position(|b| b.occupies(tile)));
        TriggerKey {
            requested: activation.requested.clone(),
            show_all: activation.show_all,
            held_item: activation.held_item.clone(),
            hovered,
        }
    }

    /// Cursor tile used for building mouseover, if mouseover applies
    fn hover_tile(&self, activation: &ActivationState) -> Option<TilePos> {
        if self.config.highlight_buildings_on_mouseover && !activation.mouse_hidden {
            activation.cursor_tile
        } else {
            None
        }
    }

    /// Recompute immediately, bypassing the throttle
    pub fn refresh(&mut self, world: &dyn WorldQuery, activation: &ActivationState) -> &CompositeMap {
        let mut failed = 0;
        let contributions = self.collect(world, activation, &mut failed);

        let compositor = Compositor::new(self.config.show_overlaps, self.config.overlap_tint)
            .with_bounds(world.bounds());
        self.current = compositor.composite(&contributions);
        self.refreshes += 1;

        self.stats = RefreshStats {
            contributions: contributions.len(),
            tiles: self.current.len(),
            overlaps: self.current.overlap_count(),
            failed_callbacks: failed,
        };
        tracing::debug!(
            refresh = self.refreshes,
            contributions = self.stats.contributions,
            tiles = self.stats.tiles,
            overlaps = self.stats.overlaps,
            "Range highlight refreshed"
        );

        &self.current
    }

    /// Contributions for the current state, in compositing order
    pub fn contributions(&self, world: &dyn WorldQuery, activation: &ActivationState) -> Vec<Contribution> {
        let mut failed = 0;
        self.collect(world, activation, &mut failed)
    }

    fn collect(&self, world: &dyn WorldQuery, activation: &ActivationState, failed: &mut usize) -> Vec<Contribution> {
        let mut out = Vec::new();
        self.collect_buildings(world, activation, failed, &mut out);
        self.collect_items(world, activation, failed, &mut out);
        self.collect_bombs(world, activation, &mut out);
        out
    }

    fn collect_buildings(
        &self,
        world: &dyn WorldQuery,
        activation: &ActivationState,
        failed: &mut usize,
        out: &mut Vec<Contribution>,
    ) {
        let definitions = self.buildings.list();
        if definitions.is_empty() {
            return;
        }
        let buildings = world.buildings();

        let hovered = self.hover_tile(activation);

        for definition in &definitions {
            if !self.config.is_enabled(&definition.category) {
                continue;
            }
            let active = activation.is_requested(&definition.category);

            for building in &buildings {
                let hovering = hovered.is_some_and(|tile| building.occupies(tile));
                if !active && !hovering {
                    continue;
                }
                let callback = &definition.callback;
                let Some(highlight) = guarded(&definition.key, failed, || callback(building)) else {
                    continue;
                };
                out.push(Contribution::new(
                    building.tile.offset(highlight.x_offset, highlight.y_offset),
                    highlight.mask,
                    highlight.tint,
                    definition.category.clone(),
                ));
            }
        }
    }

    fn collect_items(
        &self,
        world: &dyn WorldQuery,
        activation: &ActivationState,
        failed: &mut usize,
        out: &mut Vec<Contribution>,
    ) {
        let definitions = self.items.list();
        if definitions.is_empty() {
            return;
        }
        let placed = world.placed_items();
        let sprinkler_key = builtin::builtin_key(&Category::Sprinkler);

        for definition in &definitions {
            if !self.config.is_enabled(&definition.category) {
                continue;
            }
            let callback = &definition.callback;

            let held = activation
                .held_item
                .as_deref()
                .and_then(|name| guarded(&definition.key, failed, || callback(name)));
            let holding = held.is_some();

            let show_placed = activation.is_requested(&definition.category)
                || (holding && self.config.show_others_when_holding(&definition.category));

            if show_placed {
                let world_coverage = self.builtins
                    && definition.key == sprinkler_key
                    && self.config.sprinkler_mod_compatibility
                        == SprinklerModCompatibility::MoreCompatible;
                let mut by_name: HashMap<&str, Option<ItemHighlight>> = HashMap::new();

                for item in &placed {
                    if world_coverage {
                        if let Some(mask) = world.sprinkler_coverage(item) {
                            out.push(Contribution::new(
                                item.tile,
                                mask,
                                self.config.sprinkler.tint,
                                definition.category.clone(),
                            ));
                            continue;
                        }
                    }

                    let highlight = by_name
                        .entry(item.name.as_str())
                        .or_insert_with(|| guarded(&definition.key, failed, || callback(&item.name)));
                    if let Some(highlight) = highlight {
                        out.push(Contribution::new(
                            item.tile,
                            highlight.mask.clone(),
                            highlight.tint,
                            definition.category.clone(),
                        ));
                    }
                }
            }

            if let Some(highlight) = held {
                for tile in self.held_locations(activation, &definition.category) {
                    out.push(Contribution::new(
                        tile,
                        highlight.mask.clone(),
                        highlight.tint,
                        definition.category.clone(),
                    ));
                }
            }
        }
    }

    fn collect_bombs(&self, world: &dyn WorldQuery, activation: &ActivationState, out: &mut Vec<Contribution>) {
        let bomb = &self.config.bomb;
        if !bomb.enabled {
            return;
        }

        let mut placed_shown = false;
        if bomb.show_placed {
            for placed in world.ticking_bombs() {
                let Some(radius) = bomb_radius(&placed.name) else {
                    continue;
                };
                for (mask, tint) in bomb_layers(radius, bomb) {
                    out.push(Contribution::new(placed.tile, mask, tint, Category::Bomb));
                }
                placed_shown = true;
            }
        }

        if !bomb.show_held || (bomb.hide_held_when_placed_ticking && placed_shown) {
            return;
        }
        let Some(radius) = activation.held_item.as_deref().and_then(bomb_radius) else {
            return;
        };
        let layers = bomb_layers(radius, bomb);
        for tile in self.held_locations(activation, &Category::Bomb) {
            for (mask, tint) in &layers {
                out.push(Contribution::new(tile, mask.clone(), *tint, Category::Bomb));
            }
        }
    }

    /// Tiles where a held item's range is drawn
    fn held_locations(&self, activation: &ActivationState, category: &Category) -> Vec<TilePos> {
        let mut tiles = Vec::with_capacity(2);

        let cursor_hidden = activation.mouse_hidden
            || (self.config.hide_at_mouse_on_movement && activation.player_moving);
        if !cursor_hidden {
            tiles.extend(activation.cursor_tile);
        }

        let use_action_tile = match self.config.action_location(category) {
            ActionLocationStyle::Never => false,
            ActionLocationStyle::WhenMouseHidden => activation.mouse_hidden,
            ActionLocationStyle::Always => true,
        };
        if use_action_tile {
            if let Some(tile) = activation.action_tile {
                if !tiles.contains(&tile) {
                    tiles.push(tile);
                }
            }
        }

        tiles
    }
}

thread_local! {
    /// Set while a plugin callback runs; its panics are reported through `tracing`
    static IN_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a panic hook that stays silent for panics inside plugin callbacks
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_CALLBACK.with(|flag| flag.get()) {
                previous(info);
            }
        }));
    });
}

/// Run a plugin callback, turning a panic into "no contribution"
fn guarded<T>(key: &str, failed: &mut usize, f: impl FnOnce() -> Option<T>) -> Option<T> {
    install_quiet_hook();
    let outer = IN_CALLBACK.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    IN_CALLBACK.with(|flag| flag.set(outer));

    match result {
        Ok(result) => result,
        Err(payload) => {
            *failed += 1;
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!("Highlighter '{}' failed: {}", key, message);
            None
        }
    }
}
