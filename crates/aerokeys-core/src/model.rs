//! The display model: modes and the bindings shown for each of them.

use serde::{Deserialize, Serialize};

/// Display group of a binding. Variant order is the column order on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Apps,
    Focus,
    Move,
    Workspaces,
    Layout,
    Modes,
    Navigation,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Apps,
        Category::Focus,
        Category::Move,
        Category::Workspaces,
        Category::Layout,
        Category::Modes,
        Category::Navigation,
        Category::Other,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Apps => "Apps",
            Category::Focus => "Focus",
            Category::Move => "Move",
            Category::Workspaces => "Workspaces",
            Category::Layout => "Layout",
            Category::Modes => "Modes",
            Category::Navigation => "Navigation",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// One row of the cheat-sheet.
///
/// `key` is the raw AeroSpace token (`alt-shift-h`) and is kept for grouping;
/// the two display fields are what gets rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub display_key: String,
    pub display_label: String,
    pub category: Category,
}

impl KeyBinding {
    pub fn new(
        key: impl Into<String>,
        display_key: impl Into<String>,
        display_label: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            key: key.into(),
            display_key: display_key.into(),
            display_label: display_label.into(),
            category,
        }
    }
}

/// A window-manager mode with its bindings sorted by `display_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub bindings: Vec<KeyBinding>,
}

impl Mode {
    /// A mode named after its id; `bindings` are kept in the given order.
    pub fn new(id: impl Into<String>, bindings: Vec<KeyBinding>) -> Self {
        let id = id.into();
        Self {
            name: mode_display_name(&id),
            id,
            bindings,
        }
    }

    /// Bindings of one category, in display order.
    pub fn bindings_in(&self, category: Category) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter().filter(move |b| b.category == category)
    }

    /// Categories that have at least one binding, in display order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.bindings.iter().any(|b| b.category == *c))
            .collect()
    }

    /// Bindings grouped by category, empty categories left out.
    pub fn grouped(&self) -> Vec<(Category, Vec<&KeyBinding>)> {
        self.categories()
            .into_iter()
            .map(|c| (c, self.bindings_in(c).collect()))
            .collect()
    }
}

/// Display name for a mode id: `main` becomes `Main`, others are
/// capitalized word by word (`service-mode` → `Service-Mode`).
pub fn mode_display_name(id: &str) -> String {
    if id == "main" {
        "Main".to_string()
    } else {
        capitalize_words(id)
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
/// Any non-alphanumeric character starts a new word.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order_is_display_order() {
        let mut shuffled = vec![Category::Other, Category::Apps, Category::Layout, Category::Focus];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Apps, Category::Focus, Category::Layout, Category::Other]
        );
        assert!(Category::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn mode_names() {
        assert_eq!(mode_display_name("main"), "Main");
        assert_eq!(mode_display_name("resize"), "Resize");
        assert_eq!(mode_display_name("service-mode"), "Service-Mode");
        assert_eq!(mode_display_name("GOTO"), "Goto");
    }

    #[test]
    fn capitalize_words_handles_spaces_and_empty() {
        assert_eq!(capitalize_words(""), "");
        assert_eq!(capitalize_words("left"), "Left");
        assert_eq!(capitalize_words("smart -50"), "Smart -50");
    }

    #[test]
    fn categories_lists_only_populated() {
        let mode = Mode {
            id: "main".into(),
            name: "Main".into(),
            bindings: vec![
                KeyBinding::new("alt-h", "⌥ H", "Focus Left", Category::Focus),
                KeyBinding::new("alt-a", "⌥ A", "Safari", Category::Apps),
            ],
        };
        assert_eq!(mode.categories(), vec![Category::Apps, Category::Focus]);
        assert_eq!(mode.bindings_in(Category::Focus).count(), 1);
        let grouped = mode.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].1[0].display_label, "Safari");
    }
}
