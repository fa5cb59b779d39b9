//! Plugin list handed to the plugin installer init container

use std::fmt;
use std::str::FromStr;

use dashboard_common::Error;
use serde::{Deserialize, Serialize};

/// One plugin to install
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    /// Plugin id, e.g. `grafana-piechart-panel`
    pub name: String,
    /// Plugin version, e.g. `1.3.9`
    pub version: String,
}

impl PluginSpec {
    /// Create a plugin spec
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PluginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

impl FromStr for PluginSpec {
    type Err = Error;

    /// Parse `name:version`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(Error::validation(format!(
                "plugin '{}' must be written as name:version",
                s
            ))),
        }
    }
}

/// Ordered, duplicate-free set of plugins.
///
/// Renders as the comma-delimited `name:version` list the init container
/// reads from its environment; empty when there are no plugins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PluginList {
    plugins: Vec<PluginSpec>,
}

impl PluginList {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin unless one with the same name is already present
    pub fn with_plugin(mut self, plugin: PluginSpec) -> Self {
        self.push(plugin);
        self
    }

    /// Add a plugin unless one with the same name is already present.
    ///
    /// Returns whether the plugin was added.
    pub fn push(&mut self, plugin: PluginSpec) -> bool {
        if self.plugins.iter().any(|p| p.name == plugin.name) {
            return false;
        }
        self.plugins.push(plugin);
        true
    }

    /// Parse a list of `name:version` strings
    pub fn parse<S: AsRef<str>>(items: &[S]) -> Result<Self, Error> {
        let mut list = Self::new();
        for item in items {
            list.push(item.as_ref().parse()?);
        }
        Ok(list)
    }

    /// Plugins in insertion order
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Value of the init container's plugin variable
    pub fn render(&self) -> String {
        self.plugins
            .iter()
            .map(PluginSpec::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<PluginSpec> for PluginList {
    fn from_iter<I: IntoIterator<Item = PluginSpec>>(iter: I) -> Self {
        let mut list = Self::new();
        for plugin in iter {
            list.push(plugin);
        }
        list
    }
}
