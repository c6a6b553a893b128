//! Single settings record stored alongside entity sequences.

use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "strawberry-milk";
pub const DEFAULT_LAYOUT: &str = "comfy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Kept as raw text so unknown persisted names survive a load.
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub show_quotes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            show_quotes: true,
        }
    }
}
