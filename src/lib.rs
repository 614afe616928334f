//! Range highlighting for a tile-based farming game
//!
//! This crate computes the shaded "range" overlay that shows where placed or
//! held objects (sprinklers, scarecrows, bee houses, mushroom logs, Junimo
//! huts, bombs) have an effect. It is organised leaves first:
//!
//! - [`shape`] generates disc masks under several distance metrics
//! - [`registry`] holds building and item highlighters, built-in or plugin
//! - [`engine`] decides what to show each refresh and throttles recomputation
//! - [`composite`] merges tinted masks into one color per tile
//!
//! The host supplies the world through [`world::WorldQuery`], the player's
//! input through [`activation::ActivationState`], and receives the result
//! through a [`render::RenderSink`].

pub mod activation;
pub mod api;
pub mod builtin;
pub mod category;
pub mod cli;
pub mod color;
pub mod composite;
pub mod config;
pub mod engine;
pub mod keymap;
pub mod logging;
pub mod registry;
pub mod render;
pub mod scene;
pub mod shape;
pub mod throttle;
pub mod world;

// Re-export commonly used types
pub use activation::ActivationState;
pub use api::RangeHighlightApi;
pub use category::Category;
pub use color::Color;
pub use composite::{composite, CompositeMap, Contribution};
pub use config::HighlightConfig;
pub use engine::RangeHighlighter;
pub use shape::{DistanceMetric, Mask};
