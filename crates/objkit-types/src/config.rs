use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, ObjectResult};

/// How an identity string's suffix is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Suffix fixed at construction (hex of the surrogate id).
    #[default]
    Stable,
    /// Suffix re-randomized on every call. Kept for output compatibility only.
    Compat,
}

/// Runtime configuration for object construction and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Identity string rendering.
    pub display_mode: DisplayMode,
    /// Report containers built through the raw constructor.
    pub warn_on_direct_construction: bool,
    /// Report unset host values coerced to empty.
    pub warn_on_unset_normalization: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Stable,
            warn_on_direct_construction: true,
            warn_on_unset_normalization: true,
        }
    }
}

impl RuntimeConfig {
    /// A configuration that emits no diagnostics at all.
    pub fn quiet() -> Self {
        Self {
            warn_on_direct_construction: false,
            warn_on_unset_normalization: false,
            ..Default::default()
        }
    }

    /// Parse a configuration from a TOML document. Missing keys take their
    /// default values.
    pub fn from_toml_str(s: &str) -> ObjectResult<Self> {
        toml::from_str(s)
            .map_err(|e| ObjectError::illegal_argument(format!("invalid runtime config: {e}")))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ObjectResult<String> {
        toml::to_string(self)
            .map_err(|e| ObjectError::illegal_argument(format!("invalid runtime config: {e}")))
    }
}
