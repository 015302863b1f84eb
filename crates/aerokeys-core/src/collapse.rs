//! Folding families of near-identical bindings into one summary row.
//!
//! `alt-1 … alt-9` bound to `workspace N` become a single `⌥0-9 / Workspace 0-9`
//! row, and `alt-h/j/k/l` bound to `focus <dir>` become `⌥H/J/K/L / Focus H/J/K/L`.
//! The range is appended directly to the modifier glyphs, so a collapsed
//! row sorts after the single keys sharing its modifiers.

use crate::keys::{format_modifiers, split_modifiers};
use crate::model::{Category, KeyBinding};

/// Smallest family that gets folded.
pub const MIN_COLLAPSE_GROUP: usize = 4;

const NUMERIC_RANGE: &str = "0-9";
const DIRECTIONAL_RANGE: &str = "H/J/K/L";
const DIRECTION_WORDS: [&str; 4] = ["Left", "Right", "Up", "Down"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Numeric,
    Directional,
}

impl Family {
    fn of(suffix: &str) -> Option<Self> {
        let mut chars = suffix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Some(Family::Numeric),
            (Some('h' | 'j' | 'k' | 'l'), None) => Some(Family::Directional),
            _ => None,
        }
    }
}

struct Group {
    category: Category,
    prefix: String,
    family: Family,
    members: Vec<KeyBinding>,
}

/// Collapse every numeric or hjkl family of at least [`MIN_COLLAPSE_GROUP`]
/// bindings that share category and modifiers.
///
/// Bindings outside any family come first in their original order, followed
/// by the groups in order of first appearance. Callers sort afterwards.
pub fn collapse(bindings: Vec<KeyBinding>) -> Vec<KeyBinding> {
    let mut ungrouped = Vec::new();
    let mut groups: Vec<Group> = Vec::new();

    for binding in bindings {
        let (prefix, suffix) = split_modifiers(&binding.key);
        let Some(family) = Family::of(&suffix) else {
            ungrouped.push(binding);
            continue;
        };
        match groups
            .iter_mut()
            .find(|g| g.category == binding.category && g.prefix == prefix && g.family == family)
        {
            Some(group) => group.members.push(binding),
            None => groups.push(Group {
                category: binding.category,
                prefix,
                family,
                members: vec![binding],
            }),
        }
    }

    let mut out = ungrouped;
    for group in groups {
        if group.members.len() >= MIN_COLLAPSE_GROUP {
            out.push(summarize(group));
        } else {
            out.extend(group.members);
        }
    }
    out
}

fn summarize(group: Group) -> KeyBinding {
    let modifiers = format_modifiers(group.prefix.split('-'));
    let first = &group.members[0];
    let (range, label) = match group.family {
        Family::Numeric => (NUMERIC_RANGE, numeric_label(&first.display_label)),
        Family::Directional => (DIRECTIONAL_RANGE, directional_label(&first.display_label)),
    };
    KeyBinding::new(
        first.key.clone(),
        format!("{modifiers}{range}"),
        label,
        group.category,
    )
}

/// `Workspace 3` → `Workspace 0-9`. Strips every trailing digit and space,
/// whatever the digits meant.
fn numeric_label(label: &str) -> String {
    let stem = label.trim_end_matches(|c: char| c.is_ascii_digit() || c == ' ');
    if stem.is_empty() {
        NUMERIC_RANGE.to_string()
    } else {
        format!("{stem} {NUMERIC_RANGE}")
    }
}

/// `Focus Left` → `Focus H/J/K/L`; a label made only of direction words is
/// kept as-is.
fn directional_label(label: &str) -> String {
    let stem: Vec<&str> = label
        .split_whitespace()
        .filter(|w| !DIRECTION_WORDS.contains(w))
        .collect();
    if stem.is_empty() {
        label.to_string()
    } else {
        format!("{} {DIRECTIONAL_RANGE}", stem.join(" "))
    }
}
