//! Highlight categories
//!
//! Each highlighter belongs to one category. The six built-in categories
//! have their own config section; every externally registered highlighter
//! forms its own category named after its registry key.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Junimo,
    Sprinkler,
    Scarecrow,
    Beehouse,
    MushroomLog,
    Bomb,
    /// A plugin highlighter, identified by its registry key
    External(String),
}

impl Category {
    pub fn external(key: impl Into<String>) -> Self {
        Category::External(key.into())
    }

    /// Stable lowercase name, also used as the config section name
    pub fn name(&self) -> &str {
        match self {
            Category::Junimo => "junimo",
            Category::Sprinkler => "sprinkler",
            Category::Scarecrow => "scarecrow",
            Category::Beehouse => "beehouse",
            Category::MushroomLog => "mushroom_log",
            Category::Bomb => "bomb",
            Category::External(key) => key,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
