use std::num::NonZero;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::location::Dimension;
use crate::matching::Policy;

/// Settings for a [`Session`](crate::session::Session).
///
/// Every field is optional when read from JSON; missing fields take their [`Default`] value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Side of every grid, reference and answer alike.
    pub grid_size: Dimension,
    /// The rule answers are checked with.
    pub policy: Policy,
    /// The shared credential for registering and deleting problems.
    ///
    /// This is a placeholder gate for the editing views, not an access control.
    pub admin_password: String,
    /// The key the problem list is persisted under.
    pub storage_key: String,
}

const DEFAULT_SIDE: Dimension = NonZero::new(4).unwrap();

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_SIDE,
            policy: Policy::default(),
            admin_password: "admin".to_owned(),
            storage_key: "problems".to_owned(),
        }
    }
}

impl Config {
    /// Read a config from JSON. A zero `gridSize` is rejected by deserialization.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)?.validate()
    }

    /// Check the constraints deserialization alone cannot express.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }

        Ok(self)
    }
}
