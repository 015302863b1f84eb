//! Assembling the full mode list from a [`ModeSource`].

use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::collapse::collapse;
use crate::model::Mode;
use crate::parse::{parse_bindings, RawBindings};
use crate::source::ModeSource;

/// Mode list used when the source cannot name any modes.
pub const FALLBACK_MODE: &str = "main";

/// Build one mode from its raw bindings: parse, collapse, sort.
pub fn build_mode(id: &str, raw: &RawBindings, classifier: &Classifier) -> Mode {
    let mut bindings = collapse(parse_bindings(id, raw, classifier));
    bindings.sort_by(|a, b| {
        a.display_key
            .cmp(&b.display_key)
            .then_with(|| a.key.cmp(&b.key))
    });
    Mode::new(id, bindings)
}

/// Load every mode the source knows about.
///
/// Never fails: an unreadable mode list becomes `["main"]`, and a mode whose
/// bindings cannot be read is left out.
pub fn load_modes(source: &dyn ModeSource, classifier: &Classifier) -> Vec<Mode> {
    let names = match source.mode_names() {
        Ok(names) if !names.is_empty() => names,
        Ok(_) => {
            warn!("mode source returned no modes, falling back to main");
            vec![FALLBACK_MODE.to_string()]
        }
        Err(e) => {
            warn!(error = %e, "failed to list modes, falling back to main");
            vec![FALLBACK_MODE.to_string()]
        }
    };

    names
        .iter()
        .filter_map(|id| match source.bindings(id) {
            Ok(raw) => {
                let mode = build_mode(id, &raw, classifier);
                debug!(mode = %id, bindings = mode.bindings.len(), "loaded mode");
                Some(mode)
            }
            Err(e) => {
                warn!(mode = %id, error = %e, "failed to load bindings, skipping mode");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::source::{SourceError, StaticSource};

    struct BrokenNames;

    impl ModeSource for BrokenNames {
        fn mode_names(&self) -> Result<Vec<String>, SourceError> {
            Err(SourceError::Parse("boom".into()))
        }
        fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError> {
            assert_eq!(mode, "main");
            Ok(RawBindings::from([("alt-h".to_string(), "focus left".to_string())]))
        }
    }

    #[test]
    fn build_mode_sorts_by_display_key() {
        let raw = RawBindings::from([
            ("alt-z".to_string(), "fullscreen".to_string()),
            ("alt-a".to_string(), "exec-and-forget open -a Safari".to_string()),
            ("alt-m".to_string(), "mode goto".to_string()),
        ]);
        let mode = build_mode("main", &raw, &Classifier::default());
        let keys: Vec<&str> = mode.bindings.iter().map(|b| b.display_key.as_str()).collect();
        assert_eq!(keys, vec!["⌥ A", "⌥ M", "⌥ Z"]);
        assert_eq!(mode.name, "Main");
    }

    #[test]
    fn name_listing_failure_falls_back_to_main() {
        let modes = load_modes(&BrokenNames, &Classifier::default());
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].id, "main");
        assert_eq!(modes[0].bindings[0].category, Category::Focus);
    }

    #[test]
    fn empty_name_listing_falls_back_to_main() {
        let source = StaticSource::new();
        // No "main" in the static source either, so the fallback mode is skipped.
        assert!(load_modes(&source, &Classifier::default()).is_empty());
    }

    #[test]
    fn unreadable_mode_is_skipped() {
        struct Partial;
        impl ModeSource for Partial {
            fn mode_names(&self) -> Result<Vec<String>, SourceError> {
                Ok(vec!["main".into(), "resize".into(), "goto".into()])
            }
            fn bindings(&self, mode: &str) -> Result<RawBindings, SourceError> {
                if mode == "resize" {
                    return Err(SourceError::Timeout(std::time::Duration::from_secs(3)));
                }
                Ok(RawBindings::from([("esc".to_string(), "mode main".to_string())]))
            }
        }

        let modes = load_modes(&Partial, &Classifier::default());
        let ids: Vec<&str> = modes.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["main", "goto"]);
        assert!(modes[0].bindings.is_empty());
        assert_eq!(modes[1].bindings[0].display_label, "Back to Main");
        assert_eq!(modes[1].name, "Goto");
    }
}
