use std::path::PathBuf;

/// Smart reply data directory (~/.smart-reply)
pub fn smart_reply_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".smart-reply")
}

/// Default settings file read by `JsonFileConfigStore`
pub fn config_json_path() -> PathBuf {
    smart_reply_dir().join("config.json")
}
