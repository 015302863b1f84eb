//! Friendly names for the folders that `open <path>` bindings point at.

use std::path::PathBuf;

/// Known subpaths, checked in order; the first substring hit wins.
const KNOWN_FOLDERS: &[(&str, &str)] = &[
    ("/Desktop", "Desktop"),
    ("/Downloads", "Downloads"),
    ("/Documents", "Documents"),
    ("com~apple~CloudDocs", "iCloud Drive"),
    ("iCloud Drive", "iCloud Drive"),
];

/// File-provider folders under `~/Library/CloudStorage`.
const CLOUD_PROVIDERS: &[(&str, &str)] = &[
    ("ProtonDrive", "Proton Drive"),
    ("GoogleDrive", "Google Drive"),
    ("OneDrive", "OneDrive"),
    ("Dropbox", "Dropbox"),
];

/// Maps paths to short names. The home directory is injected so naming
/// never touches the environment.
#[derive(Debug, Clone, Default)]
pub struct PathNamer {
    home: Option<String>,
}

impl PathNamer {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self {
            home: home.map(|h| h.to_string_lossy().trim_end_matches('/').to_string()),
        }
    }

    /// Namer for the current user's home directory.
    pub fn from_env() -> Self {
        Self::new(dirs::home_dir())
    }

    pub fn friendly_name(&self, path: &str) -> String {
        if path == "~" || self.home.as_deref().is_some_and(|h| !h.is_empty() && h == path) {
            return "Home".to_string();
        }
        if path == "/" {
            return "Computer".to_string();
        }
        if let Some((_, name)) = KNOWN_FOLDERS.iter().find(|(sub, _)| path.contains(sub)) {
            return name.to_string();
        }
        if path.contains("CloudStorage") {
            if let Some((_, name)) = CLOUD_PROVIDERS.iter().find(|(sub, _)| path.contains(sub)) {
                return name.to_string();
            }
        }
        match path.rsplit('/').next() {
            Some(last) if !last.is_empty() && last != "~" => last.to_string(),
            _ => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer() -> PathNamer {
        PathNamer::new(Some(PathBuf::from("/Users/kim")))
    }

    #[test]
    fn home_and_root() {
        assert_eq!(namer().friendly_name("~"), "Home");
        assert_eq!(namer().friendly_name("/Users/kim"), "Home");
        assert_eq!(namer().friendly_name("/"), "Computer");
    }

    #[test]
    fn known_folders() {
        assert_eq!(namer().friendly_name("~/Desktop"), "Desktop");
        assert_eq!(namer().friendly_name("/Users/kim/Downloads"), "Downloads");
        assert_eq!(namer().friendly_name("~/Documents/"), "Documents");
        assert_eq!(
            namer().friendly_name("~/Library/Mobile Documents/com~apple~CloudDocs"),
            "iCloud Drive"
        );
        assert_eq!(namer().friendly_name("/Users/kim/iCloud Drive (Archive)"), "iCloud Drive");
    }

    #[test]
    fn known_folders_match_in_table_order() {
        assert_eq!(namer().friendly_name("~/Desktop/Downloads"), "Desktop");
    }

    #[test]
    fn cloud_storage_providers() {
        assert_eq!(
            namer().friendly_name("~/Library/CloudStorage/GoogleDrive-kim@example.com"),
            "Google Drive"
        );
        assert_eq!(
            namer().friendly_name("~/Library/CloudStorage/ProtonDrive-kim"),
            "Proton Drive"
        );
        assert_eq!(
            namer().friendly_name("~/Library/CloudStorage/OneDrive-Personal"),
            "OneDrive"
        );
        assert_eq!(
            namer().friendly_name("~/Library/CloudStorage/Dropbox"),
            "Dropbox"
        );
        assert_eq!(
            namer().friendly_name("~/Library/CloudStorage/Box-Box"),
            "Box-Box"
        );
    }

    #[test]
    fn falls_back_to_last_component() {
        assert_eq!(namer().friendly_name("~/src/aerokeys"), "aerokeys");
        assert_eq!(namer().friendly_name("/tmp/"), "/tmp/");
        assert_eq!(namer().friendly_name("projects"), "projects");
    }

    #[test]
    fn no_home_known() {
        let namer = PathNamer::new(None);
        assert_eq!(namer.friendly_name("/Users/kim"), "kim");
        assert_eq!(namer.friendly_name("~"), "Home");
    }
}
