//! Helper functions for the Sabot app: settings persistence and export
//! file naming.

use chrono::{DateTime, SecondsFormat, Utc};
use shared::settings::AppSettings;

/// Get the config file path
pub fn config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("sabot");
        p.push("settings.json");
        p
    })
}

/// Load settings from disk or return defaults
pub fn load_settings_or_default() -> AppSettings {
    if let Some(path) = config_path() {
        if let Ok(contents) = std::fs::read_to_string(&path) {
            if let Ok(settings) = serde_json::from_str::<AppSettings>(&contents) {
                return settings;
            }
        }
    }
    AppSettings::default()
}

/// Save settings to disk
pub fn save_settings(settings: &AppSettings) {
    if let Some(path) = config_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(settings) {
            let _ = std::fs::write(&path, json);
        }
    }
}

/// Suggested name for a conversation export taken at `when`.
pub fn chat_export_filename(when: DateTime<Utc>) -> String {
    format!(
        "chat-export-{}.json",
        when.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn export_name_carries_millisecond_timestamp() {
        let when = Utc.timestamp_opt(1714566605, 123_000_000).unwrap();
        assert_eq!(
            chat_export_filename(when),
            "chat-export-2024-05-01T12:30:05.123Z.json"
        );
    }
}
