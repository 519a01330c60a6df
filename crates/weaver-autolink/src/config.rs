use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AutolinkError, Result};

/// Settings for link detection and the markup it produces.
///
/// Every field has a default, so a partial JSON document only needs to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutolinkConfig {
    /// On-screen characters an address may take before it is shortened.
    pub max_display_chars: usize,
    /// Allowed length of a name reference, not counting the `@`.
    pub name_bounds: NameBounds,
    /// Where name-reference widgets post to.
    pub profile_form: ProfileFormConfig,
}

impl Default for AutolinkConfig {
    fn default() -> Self {
        Self {
            max_display_chars: 60,
            name_bounds: NameBounds::default(),
            profile_form: ProfileFormConfig::default(),
        }
    }
}

impl AutolinkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(target: "weaver::autolink", path = %path.display(), "loading autolink config");
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        let NameBounds { min, max } = self.name_bounds;
        if min == 0 {
            return Err(AutolinkError::invalid(
                "name_bounds.min is 0",
                "a name reference needs at least one character after the @",
            ));
        }
        if min > max {
            return Err(AutolinkError::invalid(
                format!("name_bounds.min ({min}) is greater than name_bounds.max ({max})"),
                "swap the bounds or raise name_bounds.max",
            ));
        }
        if self.profile_form.action_url.trim().is_empty() {
            return Err(AutolinkError::invalid(
                "profile_form.action_url is empty",
                "set the URL profile forms should post to",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for NameBounds {
    fn default() -> Self {
        Self { min: 3, max: 16 }
    }
}

impl NameBounds {
    pub fn contains(&self, chars: usize) -> bool {
        (self.min..=self.max).contains(&chars)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFormConfig {
    pub action_url: String,
    /// Name of the hidden field carrying the profile's encoded identifier.
    pub id_param: String,
    pub button_class: String,
}

impl Default for ProfileFormConfig {
    fn default() -> Self {
        Self {
            action_url: "/profile".to_string(),
            id_param: "otr".to_string(),
            button_class: "NICK_WHITE".to_string(),
        }
    }
}
