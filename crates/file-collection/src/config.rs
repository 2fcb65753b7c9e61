//! Configuration for collection initialization.

use serde::{Deserialize, Serialize};

/// Names the collection needs to interpret time in its files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Dimensions that represent time. Empty means one timestep per file.
    #[serde(default)]
    pub time_dimensions: Vec<String>,

    /// 1-D variables holding the time values, paired one-to-one with
    /// `time_dimensions`. Empty means integer times.
    #[serde(default)]
    pub time_coordinate_variables: Vec<String>,

    /// Attribute read as the missing value of each variable. Empty disables
    /// missing values.
    #[serde(default)]
    pub missing_value_attribute: String,
}

impl CollectionConfig {
    /// Load configuration from environment variables.
    ///
    /// - `COLLECTION_TIME_DIMS`: comma separated time dimension names
    /// - `COLLECTION_TIME_COORDVARS`: comma separated coordinate variables
    /// - `COLLECTION_MISSING_VALUE_ATTR`: missing value attribute name
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("COLLECTION_TIME_DIMS") {
            config.time_dimensions = split_names(&val);
        }

        if let Ok(val) = std::env::var("COLLECTION_TIME_COORDVARS") {
            config.time_coordinate_variables = split_names(&val);
        }

        if let Ok(val) = std::env::var("COLLECTION_MISSING_VALUE_ATTR") {
            config.missing_value_attribute = val.trim().to_string();
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.time_coordinate_variables.is_empty()
            && self.time_coordinate_variables.len() != self.time_dimensions.len()
        {
            return Err(format!(
                "{} time coordinate variables given for {} time dimensions",
                self.time_coordinate_variables.len(),
                self.time_dimensions.len()
            ));
        }

        if self
            .time_dimensions
            .iter()
            .chain(&self.time_coordinate_variables)
            .any(|name| name.is_empty())
        {
            return Err("time dimension and coordinate names must not be empty".to_string());
        }

        Ok(())
    }
}

fn split_names(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
