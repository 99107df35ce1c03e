/// User settings persisted in chrome.storage.local

use serde::{Deserialize, Serialize};

use crate::tree::WindowItem;

/// Storage key the settings live under
pub const SETTINGS_KEY: &str = "tabby_settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub show_incognito_windows: bool,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            show_incognito_windows: false,
        }
    }

    pub fn is_window_visible(&self, window: &WindowItem) -> bool {
        !window.incognito || self.show_incognito_windows
    }

    pub fn toggle_incognito_windows(&mut self) {
        self.show_incognito_windows = !self.show_incognito_windows;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
