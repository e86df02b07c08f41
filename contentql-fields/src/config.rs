//! Registry configuration loaded with Figment.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Default values
//! 2. An optional configuration file (TOML, YAML or JSON, by extension)
//! 3. Environment variables with the `CONTENTQL_FIELDS_` prefix
//!
//! Configuration only shapes a registry while it is being built; see
//! [`crate::FieldKindRegistryBuilder::configure`].

use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::registry::FieldKindRegistry;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CONTENTQL_FIELDS_";

/// Settings applied while building a field-kind registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Kind identifiers left out of the registry
    pub disabled_kinds: Vec<String>,
    /// Description overrides keyed by kind identifier
    pub descriptions: BTreeMap<String, String>,
}

impl FieldsConfig {
    /// Load from defaults, `path` if given, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: FieldsConfig = Self::figment(path).extract()?;
        debug!(
            disabled = config.disabled_kinds.len(),
            overrides = config.descriptions.len(),
            "loaded fields configuration"
        );
        Ok(config)
    }

    /// The layered sources, before extraction.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FieldsConfig::default()));

        if let Some(path) = path {
            trace!(path = %path.display(), "merging fields configuration file");
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Builtin registry with this configuration applied.
    pub fn build_registry(&self) -> Result<FieldKindRegistry> {
        Ok(FieldKindRegistry::builder()
            .with_builtins()?
            .configure(self)?
            .build())
    }
}
