//! Deployment-specific extraction defaults.
//!
//! Every constant the extractor would otherwise hard-code (fallback dates,
//! default buyer, orderer, region, unit) lives in [`ExtractorConfig`].
//! Values come from, in increasing priority: built-in defaults, an
//! optional TOML file, and `UNICO_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unico_order_models::Location;
use unico_order_models::schema::SchemaGeneration;

use crate::ExtractError;

/// Environment variable naming the default buyer.
pub const ENV_DEFAULT_BUYER: &str = "UNICO_DEFAULT_BUYER";
/// Environment variable naming the orderer written to every row.
pub const ENV_DEFAULT_ORDERER: &str = "UNICO_DEFAULT_ORDERER";
/// Environment variable naming the fallback shipping region.
pub const ENV_DEFAULT_LOCATION: &str = "UNICO_DEFAULT_LOCATION";
/// Environment variable naming the fallback unit of measure.
pub const ENV_DEFAULT_UNIT: &str = "UNICO_DEFAULT_UNIT";
/// Environment variable selecting the column schema generation.
pub const ENV_SCHEMA: &str = "UNICO_SCHEMA";

/// Extraction defaults and schema selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Issued date used when the `ISSUED DATE:` label is missing.
    pub default_issued_date: String,
    /// Buyer used when the `BUYER:` label is missing.
    pub default_buyer: String,
    /// Person recorded as placing the order.
    pub default_orderer: String,
    /// Customer name; also the prefix of the bill-to column.
    pub customer: String,
    /// Region used when no location marker matches.
    pub default_location: Location,
    /// Unit used when a line's unit cell is blank.
    pub default_unit: String,
    /// Column layout of emitted rows.
    pub schema: SchemaGeneration,
    /// Minimum cells for a line to be read as a table header row.
    pub min_table_cells: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            default_issued_date: "12/12/2025".to_owned(),
            default_buyer: "LL.BEAN".to_owned(),
            default_orderer: "Nguyễn Quyên_IS3".to_owned(),
            customer: "UNICO".to_owned(),
            default_location: Location::BacGiang,
            default_unit: "YDS".to_owned(),
            schema: SchemaGeneration::default(),
            min_table_cells: unico_pdf::DEFAULT_MIN_TABLE_CELLS,
        }
    }
}

impl ExtractorConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] if the TOML is malformed or a value
    /// has the wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self, ExtractError> {
        toml::from_str(toml).map_err(|e| ExtractError::Config(e.to_string()))
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read, or
    /// [`ExtractError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded extractor config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Builds the effective config: the optional file, then environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn resolve(path: Option<&Path>) -> Result<Self, ExtractError> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// Applies `UNICO_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Blank values are ignored. Values that fail to parse are logged and
    /// ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(buyer) = get(ENV_DEFAULT_BUYER) {
            self.default_buyer = buyer;
        }
        if let Some(orderer) = get(ENV_DEFAULT_ORDERER) {
            self.default_orderer = orderer;
        }
        if let Some(unit) = get(ENV_DEFAULT_UNIT) {
            self.default_unit = unit;
        }
        if let Some(raw) = get(ENV_DEFAULT_LOCATION) {
            match raw.trim().parse() {
                Ok(location) => self.default_location = location,
                Err(_) => log::warn!("Ignoring {ENV_DEFAULT_LOCATION}={raw}: unknown region"),
            }
        }
        if let Some(raw) = get(ENV_SCHEMA) {
            match raw.trim().parse() {
                Ok(schema) => self.schema = schema,
                Err(_) => log::warn!("Ignoring {ENV_SCHEMA}={raw}: unknown schema generation"),
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml_str(
            r#"
            default_buyer = "PATAGONIA"
            default_location = "yen_bai"
            schema = "v1"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_buyer, "PATAGONIA");
        assert_eq!(config.default_location, Location::YenBai);
        assert_eq!(config.schema, SchemaGeneration::V1);
        assert_eq!(config.default_unit, "YDS");
        assert_eq!(config.customer, "UNICO");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = ExtractorConfig::from_toml_str("default_buyer = [").unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn overrides_apply_valid_values_only() {
        let vars: BTreeMap<&str, &str> = [
            (ENV_DEFAULT_UNIT, "MTR"),
            (ENV_DEFAULT_LOCATION, "nowhere"),
            (ENV_SCHEMA, "V1"),
            (ENV_DEFAULT_BUYER, "  "),
        ]
        .into_iter()
        .collect();

        let config = ExtractorConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| (*v).to_owned()));

        assert_eq!(config.default_unit, "MTR");
        assert_eq!(config.default_location, Location::BacGiang);
        assert_eq!(config.schema, SchemaGeneration::V1);
        assert_eq!(config.default_buyer, "LL.BEAN");
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = ExtractorConfig::load("/nonexistent/unico.toml").unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
