// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Validation settings.
//!
//! Settings are layered with the `config` crate: every `with_*` call
//! overlays a partial configuration on the current values, then the result
//! is validated before it is returned.

use chrono::{DateTime, Utc};
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{policy::ValidationPolicy, Error, Result};

const VERSION: u32 = 1;

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Settings for the validation run itself.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Core {
    /// Evaluate independent signatures on parallel worker threads.
    ///
    /// Results are identical to a sequential run. The default value is false.
    pub parallel_evaluation: bool,
}

impl SettingsValidate for Core {}

/// Settings to configure the verification process.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Verify {
    /// Time to validate at, in RFC 3339 format.
    ///
    /// The current time is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,
}

impl SettingsValidate for Verify {}

impl SettingsValidate for ValidationPolicy {
    fn validate(&self) -> Result<()> {
        ValidationPolicy::validate(self)
    }
}

/// Settings for configuring the validation engine.
///
/// ```
/// # use esig_validation::Settings;
/// # fn main() -> esig_validation::Result<()> {
/// let settings = Settings::new().with_toml(
///     r#"
///         [core]
///         parallel_evaluation = true
///
///         [verify]
///         validation_time = "2025-03-01T12:00:00Z"
///     "#,
/// )?;
/// assert!(settings.core.parallel_evaluation);
/// # Ok(())
/// # }
/// ```
// Sections serialized as empty tables are dropped by `config`, so every
// missing section falls back to its default.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Version of the configuration.
    pub version: u32,

    /// Settings for configuring the validation run.
    pub core: Core,

    /// Settings for configuring verification.
    pub verify: Verify,

    /// The validation policy.
    pub policy: ValidationPolicy,
}

impl Settings {
    /// Create default settings: sequential evaluation at the current time
    /// with the [`ValidationPolicy::baseline_b`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML string, starting from the defaults.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::new().with_toml(toml)
    }

    /// Overlay a JSON configuration on these settings.
    ///
    /// ```
    /// # use esig_validation::Settings;
    /// # fn main() -> esig_validation::Result<()> {
    /// let settings = Settings::new().with_json(r#"{"core": {"parallel_evaluation": true}}"#)?;
    /// assert!(settings.core.parallel_evaluation);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_json(self, json: &str) -> Result<Self> {
        self.with_string(json, "json")
    }

    /// Overlay a TOML configuration on these settings.
    pub fn with_toml(self, toml: &str) -> Result<Self> {
        self.with_string(toml, "toml")
    }

    fn with_string(self, settings_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => return Err(Error::UnsupportedType),
        };

        let current_config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        // merge overrides, allows for partial changes
        let updated_config = Config::builder()
            .add_source(current_config)
            .add_source(config::File::from_str(settings_str, f))
            .build()
            .map_err(|_e| Error::BadParam("could not parse configuration".into()))?;

        let settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::BadParam(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Set the value at a dot-separated `path`, e.g.
    /// `"core.parallel_evaluation"`.
    ///
    /// ```
    /// # use esig_validation::Settings;
    /// # fn main() -> esig_validation::Result<()> {
    /// let settings = Settings::default().with_value("policy.name", "strict")?;
    /// assert_eq!(settings.get_value::<String>("policy.name")?, "strict");
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_value<T: Into<config::Value>>(self, path: &str, value: T) -> Result<Self> {
        let config = Config::try_from(&self).map_err(|e| Error::OtherError(Box::new(e)))?;

        let updated_config = Config::builder()
            .add_source(config)
            .set_override(path, value)
            .map_err(|e| Error::BadParam(format!("Invalid path '{path}': {e}")))?
            .build()
            .map_err(|e| Error::OtherError(Box::new(e)))?;

        let updated_settings = updated_config
            .try_deserialize::<Settings>()
            .map_err(|e| Error::BadParam(format!("Invalid value for '{path}': {e}")))?;

        updated_settings.validate()?;

        Ok(updated_settings)
    }

    /// Get the value at a dot-separated `path`.
    pub fn get_value<'de, T: serde::de::Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let config = Config::try_from(self).map_err(|e| Error::OtherError(Box::new(e)))?;

        config
            .get::<T>(path)
            .map_err(|e| Error::BadParam(format!("Failed to get value at '{path}': {e}")))
    }

    /// Serializes these settings into a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: VERSION,
            core: Default::default(),
            verify: Default::default(),
            policy: Default::default(),
        }
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        if self.version > VERSION {
            return Err(Error::VersionCompatibility(
                "settings version too new".into(),
            ));
        }
        self.core.validate()?;
        self.verify.validate()?;
        SettingsValidate::validate(&self.policy)
    }
}
