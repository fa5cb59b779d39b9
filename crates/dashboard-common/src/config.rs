//! Controller configuration lookup
//!
//! Image names, tags and mount directories are read through the
//! [`ConfigProvider`] capability rather than a process-wide global, so the
//! synthesis code can be driven by an injected fake in tests.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::Error;

// =============================================================================
// Keys and Defaults
// =============================================================================

/// Key for the Grafana image repository
pub const GRAFANA_IMAGE_KEY: &str = "grafana.image.url";
/// Key for the Grafana image tag
pub const GRAFANA_IMAGE_TAG_KEY: &str = "grafana.image.tag";
/// Key for the plugins init container image repository
pub const PLUGINS_INIT_IMAGE_KEY: &str = "grafana.plugins.init.container.image.url";
/// Key for the plugins init container image tag
pub const PLUGINS_INIT_IMAGE_TAG_KEY: &str = "grafana.plugins.init.container.image.tag";
/// Key for the directory external secrets are mounted under
pub const SECRETS_MOUNT_DIR_KEY: &str = "grafana.secrets.mount.dir";
/// Key for the directory external config maps are mounted under
pub const CONFIG_MAPS_MOUNT_DIR_KEY: &str = "grafana.configmaps.mount.dir";

/// Default Grafana image repository
pub const DEFAULT_GRAFANA_IMAGE: &str = "quay.io/openshift/origin-grafana";
/// Default Grafana image tag
pub const DEFAULT_GRAFANA_VERSION: &str = "4.2";
/// Default plugins init container image repository
pub const DEFAULT_PLUGINS_INIT_IMAGE: &str = "quay.io/integreatly/grafana_plugins_init";
/// Default plugins init container image tag
pub const DEFAULT_PLUGINS_INIT_TAG: &str = "0.0.2";
/// Default directory for external secret mounts
pub const DEFAULT_SECRETS_MOUNT_DIR: &str = "/etc/grafana-secrets/";
/// Default directory for external config map mounts
pub const DEFAULT_CONFIG_MAPS_MOUNT_DIR: &str = "/etc/grafana-configmaps/";

/// Prefix of environment variables read by [`ControllerConfig::from_env`]
pub const ENV_PREFIX: &str = "DASHBOARD_";

// =============================================================================
// ConfigProvider
// =============================================================================

/// Read-only key/value lookup with caller-supplied fallbacks.
///
/// Implementations must be safe to share across reconcile workers.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigProvider: Send + Sync {
    /// Value for `key`, or `fallback` when the key is not set
    fn get_string(&self, key: &str, fallback: &str) -> String;
}

/// Immutable configuration store backed by a sorted map.
///
/// Populated once at process start and never mutated afterwards; share it
/// behind an `Arc` when several workers need it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    values: BTreeMap<String, String>,
}

impl ControllerConfig {
    /// Empty configuration; every lookup returns its fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Parse a flat YAML map of string keys to string values.
    ///
    /// ```yaml
    /// grafana.image.url: docker.io/grafana/grafana
    /// grafana.image.tag: "10.4.2"
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let values: BTreeMap<String, String> = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config("<inline>", format!("expected a map of strings: {}", e)))?;
        Ok(Self { values })
    }

    /// Load a flat YAML map from a file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(&shown, format!("failed to read: {}", e)))?;
        let config = Self::from_yaml_str(&contents).map_err(|e| match e {
            Error::Config { message, .. } => Error::config(&shown, message),
            other => other,
        })?;
        debug!(path = %shown, keys = config.len(), "loaded controller configuration");
        Ok(config)
    }

    /// Collect `DASHBOARD_*` variables from the process environment.
    ///
    /// `DASHBOARD_GRAFANA_IMAGE_URL` becomes `grafana.image.url`.
    pub fn from_env() -> Self {
        let config = Self::from_vars(std::env::vars());
        debug!(keys = config.len(), "read controller configuration from environment");
        config
    }

    /// Collect `DASHBOARD_*` variables from an iterator of name/value pairs
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let values = vars
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(ENV_PREFIX)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_ascii_lowercase().replace('_', "."), value))
            })
            .collect();
        Self { values }
    }

    /// Overlay `other` on top of this configuration; `other` wins on conflicts
    pub fn merged_with(mut self, other: ControllerConfig) -> Self {
        self.values.extend(other.values);
        self
    }

    /// Number of configured keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are configured
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigProvider for ControllerConfig {
    fn get_string(&self, key: &str, fallback: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}
