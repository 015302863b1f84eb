//! AeroSpace key tokens and their glyph display.
//!
//! AeroSpace writes key combos as hyphen-joined tokens: `alt-shift-h`,
//! `cmd-enter`, `esc`. Modifiers may come in any order; the display always
//! uses the macOS menu order ⌥⇧⌃⌘.

/// Modifier tokens with their glyphs, in display order.
const MODIFIERS: [(&str, char); 4] = [("alt", '⌥'), ("shift", '⇧'), ("ctrl", '⌃'), ("cmd", '⌘')];

const NAMED_KEYS: &[(&str, &str)] = &[
    ("enter", "↩"),
    ("esc", "⎋"),
    ("tab", "⇥"),
    ("space", "␣"),
    ("backspace", "⌫"),
    ("delete", "⌦"),
    ("slash", "/"),
    ("comma", ","),
    ("semicolon", ";"),
    ("period", "."),
    ("left", "←"),
    ("right", "→"),
    ("up", "↑"),
    ("down", "↓"),
];

pub fn is_modifier(token: &str) -> bool {
    MODIFIERS.iter().any(|(name, _)| *name == token)
}

/// Split a raw key into its modifier prefix and base suffix, both still in
/// raw form: `alt-shift-1` → (`alt-shift`, `1`). Modifier tokens keep their
/// input order.
pub fn split_modifiers(raw: &str) -> (String, String) {
    let (mods, rest): (Vec<&str>, Vec<&str>) = raw.split('-').partition(|t| is_modifier(t));
    (mods.join("-"), rest.join("-"))
}

/// Glyphs for the modifier tokens present, in ⌥⇧⌃⌘ order.
pub fn format_modifiers<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    let tokens: Vec<&str> = tokens.into_iter().collect();
    MODIFIERS
        .iter()
        .filter(|(name, _)| tokens.contains(name))
        .map(|(_, glyph)| *glyph)
        .collect()
}

/// Display form of a base key: named keys map to symbols, anything else is
/// upper-cased.
pub fn format_base(base: &str) -> String {
    NAMED_KEYS
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, sym)| sym.to_string())
        .unwrap_or_else(|| base.to_uppercase())
}

/// Join modifier glyphs and a formatted base with a single space, leaving
/// out the space when either side is empty.
pub fn join_display(modifiers: &str, base: &str) -> String {
    match (modifiers.is_empty(), base.is_empty()) {
        (true, _) => base.to_string(),
        (false, true) => modifiers.to_string(),
        (false, false) => format!("{modifiers} {base}"),
    }
}

/// Format a raw key token for display: `alt-shift-h` → `⌥⇧ H`.
pub fn format_key(raw: &str) -> String {
    let (mods, base) = split_modifiers(raw);
    join_display(&format_modifiers(mods.split('-')), &format_base(&base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_in_fixed_order() {
        assert_eq!(format_key("alt-shift-h"), "⌥⇧ H");
        assert_eq!(format_key("shift-alt-h"), "⌥⇧ H");
        assert_eq!(format_key("cmd-ctrl-shift-alt-x"), "⌥⇧⌃⌘ X");
    }

    #[test]
    fn named_keys() {
        assert_eq!(format_key("esc"), "⎋");
        assert_eq!(format_key("alt-enter"), "⌥ ↩");
        assert_eq!(format_key("alt-tab"), "⌥ ⇥");
        assert_eq!(format_key("space"), "␣");
        assert_eq!(format_key("backspace"), "⌫");
        assert_eq!(format_key("delete"), "⌦");
        assert_eq!(format_key("alt-slash"), "⌥ /");
        assert_eq!(format_key("alt-comma"), "⌥ ,");
        assert_eq!(format_key("alt-semicolon"), "⌥ ;");
        assert_eq!(format_key("alt-period"), "⌥ .");
        assert_eq!(format_key("left"), "←");
        assert_eq!(format_key("right"), "→");
        assert_eq!(format_key("up"), "↑");
        assert_eq!(format_key("down"), "↓");
    }

    #[test]
    fn unknown_base_is_uppercased() {
        assert_eq!(format_key("h"), "H");
        assert_eq!(format_key("alt-1"), "⌥ 1");
        assert_eq!(format_key("alt-keypadMinus"), "⌥ KEYPADMINUS");
    }

    #[test]
    fn empty_and_modifier_only() {
        assert_eq!(format_key(""), "");
        assert_eq!(format_key("alt"), "⌥");
    }

    #[test]
    fn split_keeps_raw_tokens() {
        assert_eq!(split_modifiers("alt-shift-1"), ("alt-shift".into(), "1".into()));
        assert_eq!(split_modifiers("h"), (String::new(), "h".into()));
        assert_eq!(split_modifiers("ctrl-alt-l"), ("ctrl-alt".into(), "l".into()));
    }

    #[test]
    fn modifier_glyphs_only() {
        assert_eq!(format_modifiers(["shift", "alt"]), "⌥⇧");
        assert_eq!(format_modifiers([""]), "");
    }
}
