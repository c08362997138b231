use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::advice::Thresholds;
use crate::error::SettingsError;
use crate::report::{PageLayout, DEFAULT_DOWNLOAD_NAME};

pub const DEFAULT_SETTINGS_PATH: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: Thresholds,
    pub layout: PageLayout,
    /// File name offered when saving the exported report.
    pub download_name: String,
    pub window_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            thresholds: Thresholds::default(),
            layout: PageLayout::default(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            window_size: [1280.0, 900.0],
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file; using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read { path: path.to_path_buf(), source });
            }
        };

        serde_json::from_str(&data).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Settings::load`], but logs the failure and falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring settings file");
            Settings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("dashboard.json")).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.download_name, "business_report.pdf");
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{"thresholds":{"min_conversion_rate":7.5},"layout":{"body_size_pt":11}}"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.thresholds.min_conversion_rate, 7.5);
        assert_eq!(settings.thresholds.max_marketing_share, 0.3);
        assert_eq!(settings.layout.body_size_pt, 11.0);
        assert_eq!(settings.layout.bottom_margin_mm, 15.0);
    }

    #[test]
    fn malformed_file_is_an_error_but_fallback_recovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
