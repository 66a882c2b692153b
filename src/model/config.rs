use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key-hint line under the board
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Lines moved by pgup/pgdown in the help viewer
    #[serde(default = "default_help_page_size")]
    pub help_page_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            help_page_size: default_help_page_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_help_page_size() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.ui.show_key_hints);
        assert_eq!(config.ui.help_page_size, 5);
    }

    #[test]
    fn partial_ui_table() {
        let config: Config = toml::from_str("[ui]\nshow_key_hints = false\n").unwrap();
        assert!(!config.ui.show_key_hints);
        assert_eq!(config.ui.help_page_size, 5);
    }
}
