//! Turning one mode's raw `key = "command; command"` map into bindings.

use std::collections::BTreeMap;

use crate::classify::{Classification, Classifier};
use crate::keys::format_key;
use crate::model::{Category, KeyBinding};

/// Fragments that trigger sketchybar events; side effects only.
pub const SKETCHYBAR_TRIGGER: &str = "sketchybar --trigger";

/// Fragments that notify the aerokeys daemon of a mode switch.
pub const NOTIFY_MARKER: &str = "aerokeys-cli notify";

const RETURN_TO_MAIN: &str = "mode main";

/// Raw bindings of one mode, keyed by raw key token.
pub type RawBindings = BTreeMap<String, String>;

/// Fragments of `command` that say something about what the key does.
pub fn meaningful_fragments(command: &str) -> Vec<&str> {
    command
        .split(';')
        .map(str::trim)
        .filter(|f| !f.is_empty() && !is_noise(f))
        .collect()
}

fn is_noise(fragment: &str) -> bool {
    fragment.contains(SKETCHYBAR_TRIGGER)
        || fragment.contains(NOTIFY_MARKER)
        || fragment == RETURN_TO_MAIN
}

/// Build the binding for one raw entry, or `None` when it should not be shown.
pub fn parse_binding(
    mode_id: &str,
    raw_key: &str,
    command: &str,
    classifier: &Classifier,
) -> Option<KeyBinding> {
    let classification = match meaningful_fragments(command).first() {
        Some(first) => classifier.classify(first),
        None if mode_id == "main" => return None,
        None => Classification::new("Back to Main", Category::Modes),
    };
    Some(KeyBinding::new(
        raw_key,
        format_key(raw_key),
        classification.label,
        classification.category,
    ))
}

/// Parse every binding of a mode, in raw key order.
pub fn parse_bindings(mode_id: &str, raw: &RawBindings, classifier: &Classifier) -> Vec<KeyBinding> {
    raw.iter()
        .filter_map(|(key, command)| parse_binding(mode_id, key, command, classifier))
        .collect()
}
