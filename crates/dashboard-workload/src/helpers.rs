//! Shared helper functions for deployment synthesis

use std::collections::BTreeMap;
use std::fmt;

use aws_lc_rs::digest::{digest, SHA256};
use dashboard_common::constants::DEFAULT_HTTP_PORT;
use dashboard_common::crd::DashboardInstance;

// =============================================================================
// Service Port
// =============================================================================

/// Port the dashboard listens on.
///
/// Taken from `config.server.httpPort`; a missing, empty, unparseable or zero
/// value falls back to the default port.
pub fn service_port(instance: &DashboardInstance) -> u16 {
    instance
        .http_port()
        .and_then(|p| p.trim().parse::<u16>().ok())
        .filter(|p| *p != 0)
        .unwrap_or(DEFAULT_HTTP_PORT)
}

// =============================================================================
// Config Fingerprint
// =============================================================================

/// Opaque fingerprint of the effective runtime configuration.
///
/// Placed in the main container's environment so that any change rolls the
/// pods. Uses SHA-256 for FIPS compliance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint(String);

impl ConfigFingerprint {
    /// Hex characters kept from the digest
    pub const LEN: usize = 16;

    /// Fingerprint of rendered configuration text
    pub fn of(contents: &str) -> Self {
        let hash = digest(&SHA256, contents.as_bytes());
        Self(
            hash.as_ref()
                .iter()
                .take(Self::LEN / 2)
                .map(|b| format!("{:02x}", b))
                .collect(),
        )
    }

    /// Use a fingerprint computed elsewhere as-is
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fingerprint as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Map Merge
// =============================================================================

/// Merge `fixed` on top of `user`, returning a new map.
///
/// Fixed entries win on key collision; neither input is modified.
pub fn merge_fixed<'a>(
    user: Option<&BTreeMap<String, String>>,
    fixed: impl IntoIterator<Item = (&'a str, String)>,
) -> BTreeMap<String, String> {
    let mut merged = user.cloned().unwrap_or_default();
    for (key, value) in fixed {
        merged.insert(key.to_string(), value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_common::crd::{DashboardConfig, DashboardInstanceSpec, ServerConfig};

    fn with_port(port: Option<&str>) -> DashboardInstance {
        DashboardInstance::new(
            "example",
            DashboardInstanceSpec {
                config: Some(DashboardConfig {
                    server: Some(ServerConfig {
                        http_port: port.map(str::to_string),
                    }),
                }),
                ..Default::default()
            },
        )
    }

    #[test]
    fn port_defaults_to_3000() {
        assert_eq!(
            service_port(&DashboardInstance::new("x", Default::default())),
            3000
        );
        assert_eq!(service_port(&with_port(None)), 3000);
        assert_eq!(service_port(&with_port(Some(""))), 3000);
        assert_eq!(service_port(&with_port(Some("http"))), 3000);
        assert_eq!(service_port(&with_port(Some("0"))), 3000);
        assert_eq!(service_port(&with_port(Some("70000"))), 3000);
    }

    #[test]
    fn configured_port_is_used() {
        assert_eq!(service_port(&with_port(Some("3001"))), 3001);
        assert_eq!(service_port(&with_port(Some(" 8080 "))), 8080);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = ConfigFingerprint::of("[server]\nhttp_port = 3000\n");
        let b = ConfigFingerprint::of("[server]\nhttp_port = 3000\n");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), ConfigFingerprint::LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_changes_with_content() {
        assert_ne!(
            ConfigFingerprint::of("[server]\nhttp_port = 3000\n"),
            ConfigFingerprint::of("[server]\nhttp_port = 3001\n")
        );
    }

    #[test]
    fn empty_content_has_known_digest() {
        // SHA-256 of the empty string starts with e3b0c44298fc1c14
        assert_eq!(ConfigFingerprint::of("").as_str(), "e3b0c44298fc1c14");
    }

    /// Story: fixed keys override user keys without touching the user's map
    #[test]
    fn story_fixed_keys_win_and_input_is_untouched() {
        let user = BTreeMap::from([
            ("app".to_string(), "mine".to_string()),
            ("team".to_string(), "sre".to_string()),
        ]);

        let merged = merge_fixed(Some(&user), [("app", "grafana".to_string())]);

        assert_eq!(merged.get("app").map(String::as_str), Some("grafana"));
        assert_eq!(merged.get("team").map(String::as_str), Some("sre"));
        assert_eq!(user.get("app").map(String::as_str), Some("mine"));
    }

    #[test]
    fn merge_without_user_map_is_just_fixed() {
        let merged = merge_fixed(None, [("app", "grafana".to_string())]);
        assert_eq!(merged.len(), 1);
    }
}
