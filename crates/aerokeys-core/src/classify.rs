//! Command classification: one AeroSpace command fragment to a display label
//! and a [`Category`].
//!
//! The rules live in [`RULES`], an ordered table. The first rule whose
//! predicate accepts the fragment produces the result; the last rule accepts
//! everything, so classification never fails.

use crate::model::{capitalize_words, Category};
use crate::paths::PathNamer;

/// Label and category for a single command fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub category: Category,
}

impl Classification {
    pub fn new(label: impl Into<String>, category: Category) -> Self {
        Self {
            label: label.into(),
            category,
        }
    }
}

/// One entry of the rule table.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub apply: fn(&Classifier, &str) -> Classification,
}

/// Prefixes that only say how AeroSpace runs a shell command.
const EXEC_WRAPPERS: &[&str] = &["exec-and-forget", "exec-and-wait"];

/// Boundary flags that may trail or precede the direction of `focus`.
const FOCUS_QUALIFIERS: &[&str] = &[
    "--boundaries all-monitors-outer-frame",
    "--boundaries workspace",
    "--boundaries-action wrap-around-all-monitors",
    "--boundaries-action wrap-around-the-workspace",
    "--boundaries-action stop",
];

const FOCUS_FOLLOWS: &str = "--focus-follows-window";

const DIRECTIONS: [&str; 4] = ["left", "right", "up", "down"];

/// Commands recognised only by exact match.
const LITERALS: &[(&str, &str, Category)] = &[
    ("fullscreen", "Fullscreen", Category::Layout),
    ("balance-sizes", "Balance Sizes", Category::Layout),
    ("flatten-workspace-tree", "Flatten Tree", Category::Layout),
    ("close-all-windows-but-current", "Close Other Windows", Category::Other),
    ("reload-config", "Reload Config", Category::Other),
];

pub static RULES: &[Rule] = &[
    Rule {
        name: "app-launch",
        matches: |cmd| cmd.contains("open -a"),
        apply: |_, cmd| Classification::new(app_name(cmd), Category::Apps),
    },
    Rule {
        name: "open-path",
        matches: |cmd| cmd.contains("open ") && !cmd.contains("open -a"),
        apply: |c, cmd| Classification::new(c.paths.friendly_name(&open_target(cmd)), Category::Navigation),
    },
    Rule {
        name: "focus",
        matches: |cmd| cmd.starts_with("focus "),
        apply: |_, cmd| {
            let mut rest = after_word(cmd, "focus").to_string();
            for q in FOCUS_QUALIFIERS {
                rest = rest.replace(q, "");
            }
            let rest = squeeze_spaces(&rest);
            Classification::new(format!("Focus {}", capitalize_words(&rest)), Category::Focus)
        },
    },
    Rule {
        name: "move-direction",
        matches: |cmd| DIRECTIONS.iter().any(|d| cmd.starts_with(&format!("move {d}"))),
        apply: |_, cmd| {
            let dir = after_word(cmd, "move");
            Classification::new(format!("Move {}", capitalize_words(dir)), Category::Move)
        },
    },
    Rule {
        name: "move-to-workspace",
        matches: |cmd| cmd.starts_with("move-node-to-workspace "),
        apply: |_, cmd| {
            let ws = after_word(cmd, "move-node-to-workspace").replace(FOCUS_FOLLOWS, "");
            Classification::new(format!("Move to WS {}", squeeze_spaces(&ws)), Category::Workspaces)
        },
    },
    Rule {
        name: "workspace-to-monitor",
        matches: |cmd| cmd.starts_with("move-workspace-to-monitor"),
        apply: |_, _| Classification::new("Move WS to Next Monitor", Category::Workspaces),
    },
    Rule {
        name: "workspace",
        matches: |cmd| cmd.starts_with("workspace") && !cmd.contains("move"),
        apply: |_, cmd| {
            if cmd.starts_with("workspace-back-and-forth") {
                return Classification::new("Previous Workspace", Category::Workspaces);
            }
            let ws: Vec<&str> = after_word(cmd, "workspace")
                .split_whitespace()
                .filter(|t| !t.starts_with("--"))
                .collect();
            Classification::new(format!("Workspace {}", ws.join(" ")), Category::Workspaces)
        },
    },
    Rule {
        name: "layout",
        matches: |cmd| cmd.starts_with("layout "),
        apply: |_, cmd| {
            let label = if cmd.contains("tiles") {
                "Tiling Layout"
            } else if cmd.contains("accordion") {
                "Accordion Layout"
            } else if cmd.contains("floating") {
                "Toggle Floating"
            } else {
                "Layout"
            };
            Classification::new(label, Category::Layout)
        },
    },
    Rule {
        name: "literal",
        matches: |cmd| LITERALS.iter().any(|(lit, _, _)| *lit == cmd),
        apply: |_, cmd| {
            LITERALS
                .iter()
                .find(|(lit, _, _)| *lit == cmd)
                .map(|(_, label, category)| Classification::new(*label, *category))
                .unwrap_or_else(|| Classification::new(cmd, Category::Other))
        },
    },
    Rule {
        name: "resize",
        matches: |cmd| cmd.starts_with("resize "),
        apply: |_, cmd| Classification::new(format!("Resize {}", after_word(cmd, "resize")), Category::Layout),
    },
    Rule {
        name: "sketchybar",
        matches: |cmd| cmd.contains("sketchybar"),
        apply: |_, cmd| {
            let label = if cmd.contains("--reload") {
                "Reload Sketchybar"
            } else {
                "Sketchybar"
            };
            Classification::new(label, Category::Other)
        },
    },
    Rule {
        name: "mode",
        matches: |cmd| cmd.starts_with("mode "),
        apply: |_, cmd| {
            let name = capitalize_words(after_word(cmd, "mode"));
            Classification::new(format!("{name} Mode"), Category::Modes)
        },
    },
    Rule {
        name: "join-with",
        matches: |cmd| cmd.starts_with("join-with "),
        apply: |_, cmd| {
            let dir = capitalize_words(after_word(cmd, "join-with"));
            Classification::new(format!("Join {dir}"), Category::Layout)
        },
    },
    Rule {
        name: "fallback",
        matches: |_| true,
        apply: |_, cmd| Classification::new(cmd, Category::Other),
    },
];

/// Classifies command fragments against [`RULES`].
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    paths: PathNamer,
}

impl Classifier {
    pub fn new(paths: PathNamer) -> Self {
        Self { paths }
    }

    pub fn classify(&self, fragment: &str) -> Classification {
        let fragment = fragment.trim();
        self.matching_rule(fragment)
            .map(|rule| (rule.apply)(self, fragment))
            .unwrap_or_else(|| Classification::new(fragment, Category::Other))
    }

    /// The rule that decides `fragment`, for diagnostics (`aerokeys-cli show --explain`).
    pub fn matching_rule(&self, fragment: &str) -> Option<&'static Rule> {
        RULES.iter().find(|rule| (rule.matches)(fragment))
    }
}

/// Text after a leading command word, trimmed.
fn after_word<'a>(cmd: &'a str, word: &str) -> &'a str {
    cmd.strip_prefix(word).unwrap_or(cmd).trim()
}

fn squeeze_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_exec_wrapper(cmd: &str) -> &str {
    let cmd = cmd.trim();
    EXEC_WRAPPERS
        .iter()
        .find_map(|w| cmd.strip_prefix(w))
        .unwrap_or(cmd)
        .trim()
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s.trim_matches(|c| c == '\'' || c == '"')
}

fn app_name(cmd: &str) -> String {
    let cmd = strip_exec_wrapper(cmd);
    let rest = cmd.split_once("open -a").map(|(_, r)| r).unwrap_or(cmd);
    strip_quotes(rest).to_string()
}

fn open_target(cmd: &str) -> String {
    let cmd = strip_exec_wrapper(cmd);
    let rest = cmd.split_once("open ").map(|(_, r)| r).unwrap_or(cmd);
    strip_quotes(&rest.replace("\\ ", " ")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classify(cmd: &str) -> (String, Category) {
        let c = Classifier::new(PathNamer::new(Some(PathBuf::from("/Users/kim"))));
        let r = c.classify(cmd);
        (r.label, r.category)
    }

    fn rule_for(cmd: &str) -> &'static str {
        Classifier::default().matching_rule(cmd).map(|r| r.name).unwrap_or("none")
    }

    #[test]
    fn app_launch() {
        assert_eq!(classify("exec-and-forget open -a 'Safari'"), ("Safari".into(), Category::Apps));
        assert_eq!(
            classify("exec-and-forget open -a \"Visual Studio Code\""),
            ("Visual Studio Code".into(), Category::Apps)
        );
        assert_eq!(classify("exec-and-forget open -a Ghostty"), ("Ghostty".into(), Category::Apps));
    }

    #[test]
    fn open_path() {
        assert_eq!(classify("exec-and-forget open ~/Downloads"), ("Downloads".into(), Category::Navigation));
        assert_eq!(classify("exec-and-forget open ~"), ("Home".into(), Category::Navigation));
        assert_eq!(classify("exec-and-forget open /"), ("Computer".into(), Category::Navigation));
        assert_eq!(
            classify("exec-and-forget open ~/Library/Mobile\\ Documents/com~apple~CloudDocs"),
            ("iCloud Drive".into(), Category::Navigation)
        );
        assert_eq!(
            classify("exec-and-forget open '/Users/kim/My Projects'"),
            ("My Projects".into(), Category::Navigation)
        );
    }

    #[test]
    fn focus_directions() {
        assert_eq!(classify("focus left"), ("Focus Left".into(), Category::Focus));
        assert_eq!(
            classify("focus down --boundaries all-monitors-outer-frame --boundaries-action wrap-around-all-monitors"),
            ("Focus Down".into(), Category::Focus)
        );
        assert_eq!(
            classify("focus --boundaries-action wrap-around-the-workspace up"),
            ("Focus Up".into(), Category::Focus)
        );
    }

    #[test]
    fn move_direction() {
        assert_eq!(classify("move left"), ("Move Left".into(), Category::Move));
        assert_eq!(classify("move down"), ("Move Down".into(), Category::Move));
        assert_eq!(rule_for("move-node-to-monitor next"), "fallback");
    }

    #[test]
    fn workspaces() {
        assert_eq!(classify("move-node-to-workspace 3"), ("Move to WS 3".into(), Category::Workspaces));
        assert_eq!(
            classify("move-node-to-workspace 7 --focus-follows-window"),
            ("Move to WS 7".into(), Category::Workspaces)
        );
        assert_eq!(
            classify("move-workspace-to-monitor --wrap-around next"),
            ("Move WS to Next Monitor".into(), Category::Workspaces)
        );
        assert_eq!(classify("workspace 4"), ("Workspace 4".into(), Category::Workspaces));
        assert_eq!(classify("workspace --auto-back-and-forth B"), ("Workspace B".into(), Category::Workspaces));
        assert_eq!(
            classify("workspace-back-and-forth"),
            ("Previous Workspace".into(), Category::Workspaces)
        );
    }

    #[test]
    fn layouts() {
        assert_eq!(classify("layout tiles"), ("Tiling Layout".into(), Category::Layout));
        assert_eq!(
            classify("layout tiles horizontal vertical"),
            ("Tiling Layout".into(), Category::Layout)
        );
        assert_eq!(
            classify("layout accordion horizontal vertical"),
            ("Accordion Layout".into(), Category::Layout)
        );
        assert_eq!(
            classify("layout floating tiling"),
            ("Toggle Floating".into(), Category::Layout)
        );
        assert_eq!(classify("layout h_accordion"), ("Accordion Layout".into(), Category::Layout));
        assert_eq!(classify("layout horizontal"), ("Layout".into(), Category::Layout));
    }

    #[test]
    fn literals_need_exact_match() {
        assert_eq!(classify("fullscreen"), ("Fullscreen".into(), Category::Layout));
        assert_eq!(classify("balance-sizes").1, Category::Layout);
        assert_eq!(classify("flatten-workspace-tree").1, Category::Layout);
        assert_eq!(classify("close-all-windows-but-current").1, Category::Other);
        assert_eq!(classify("reload-config"), ("Reload Config".into(), Category::Other));
        assert_eq!(rule_for("fullscreen --no-outer-gaps"), "fallback");
    }

    #[test]
    fn resize_keeps_arguments() {
        assert_eq!(classify("resize smart -50"), ("Resize smart -50".into(), Category::Layout));
        assert_eq!(classify("resize width +100"), ("Resize width +100".into(), Category::Layout));
    }

    #[test]
    fn sketchybar() {
        assert_eq!(
            classify("exec-and-forget sketchybar --reload"),
            ("Reload Sketchybar".into(), Category::Other)
        );
        assert_eq!(
            classify("exec-and-forget sketchybar --bar hidden=toggle"),
            ("Sketchybar".into(), Category::Other)
        );
    }

    #[test]
    fn modes_and_join() {
        assert_eq!(classify("mode service"), ("Service Mode".into(), Category::Modes));
        assert_eq!(classify("mode resize"), ("Resize Mode".into(), Category::Modes));
        assert_eq!(classify("join-with left"), ("Join Left".into(), Category::Layout));
    }

    #[test]
    fn unknown_falls_back_verbatim() {
        assert_eq!(classify("macos-native-minimize"), ("macos-native-minimize".into(), Category::Other));
        assert_eq!(classify("  trim-me  "), ("trim-me".into(), Category::Other));
        assert_eq!(classify(""), ("".into(), Category::Other));
    }

    #[test]
    fn rules_are_checked_in_order() {
        assert_eq!(rule_for("exec-and-forget open -a Finder"), "app-launch");
        assert_eq!(rule_for("exec-and-forget open ~/Desktop"), "open-path");
        assert_eq!(rule_for("workspace-back-and-forth"), "workspace");
        assert_eq!(rule_for("move-workspace-to-monitor next"), "workspace-to-monitor");
        assert_eq!(RULES.last().map(|r| r.name), Some("fallback"));
    }
}
