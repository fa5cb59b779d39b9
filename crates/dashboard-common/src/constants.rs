//! Fixed names and paths shared with the rest of the operator
//!
//! Other controllers (service, ingress, secret management) rely on these
//! values, so changing one is a breaking change for the whole operator.

// =============================================================================
// Resource Names
// =============================================================================

/// ServiceAccount the dashboard pods run under
pub const SERVICE_ACCOUNT_NAME: &str = "grafana-serviceaccount";

/// ConfigMap holding the rendered configuration file
pub const CONFIG_NAME: &str = "grafana-config";

/// File name of the rendered configuration inside [`CONFIG_NAME`]
pub const CONFIG_FILE_NAME: &str = "grafana.ini";

/// Name of the Deployment (and its pod template)
pub const DEPLOYMENT_NAME: &str = "grafana-deployment";

/// Value of the `app` label carried by every dashboard pod
pub const POD_LABEL: &str = "grafana";

// =============================================================================
// Volumes
// =============================================================================

/// emptyDir volume receiving plugins installed by the init container
pub const PLUGINS_VOLUME_NAME: &str = "grafana-plugins";

/// emptyDir volume for log files
pub const LOGS_VOLUME_NAME: &str = "grafana-logs";

/// emptyDir volume for the data directory
pub const DATA_VOLUME_NAME: &str = "grafana-data";

/// Prefix of volumes created for external secrets
pub const SECRET_VOLUME_PREFIX: &str = "secret-";

/// Prefix of volumes created for external config maps
pub const CONFIG_MAP_VOLUME_PREFIX: &str = "configmap-";

/// Mount path of the configuration volume
pub const CONFIG_MOUNT_PATH: &str = "/etc/grafana/";

/// Mount path of the data volume
pub const DATA_MOUNT_PATH: &str = "/var/lib/grafana";

/// Mount path of the plugins volume in the main container
pub const PLUGINS_MOUNT_PATH: &str = "/var/lib/grafana/plugins";

/// Mount path of the logs volume
pub const LOGS_MOUNT_PATH: &str = "/var/log/grafana";

/// Mount path of the plugins volume in the init container
pub const PLUGINS_INIT_MOUNT_PATH: &str = "/opt/plugins";

// =============================================================================
// Containers
// =============================================================================

/// Name of the primary dashboard container
pub const CONTAINER_NAME: &str = "grafana";

/// Name of the plugin installer init container
pub const INIT_CONTAINER_NAME: &str = "grafana-plugins-init";

/// Name of the HTTP port on the primary container
pub const HTTP_PORT_NAME: &str = "grafana-http";

/// Default HTTP port when the instance does not configure one
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Health endpoint used by liveness and readiness probes
pub const HEALTH_ENDPOINT: &str = "/api/health";

/// Termination message path set on operator-built containers
pub const TERMINATION_MESSAGE_PATH: &str = "/dev/termination-log";

/// Termination message policy set on operator-built containers
pub const TERMINATION_MESSAGE_POLICY: &str = "File";

/// Image pull policy set on operator-built containers
pub const IMAGE_PULL_POLICY: &str = "IfNotPresent";

// =============================================================================
// Environment and Credentials
// =============================================================================

/// Env var carrying the configuration fingerprint
pub const LAST_CONFIG_ENV_VAR: &str = "LAST_CONFIG";

/// Annotation the apply layer may use to record the configuration fingerprint
pub const LAST_CONFIG_ANNOTATION: &str = "last-config";

/// Env var carrying the plugin list into the init container
pub const PLUGINS_ENV_VAR: &str = "GRAFANA_PLUGINS";

/// Secret holding the admin credentials
pub const ADMIN_SECRET_NAME: &str = "admin-credentials";

/// Env var (and secret key) for the admin user
pub const ADMIN_USER_ENV_VAR: &str = "GF_SECURITY_ADMIN_USER";

/// Env var (and secret key) for the admin password
pub const ADMIN_PASSWORD_ENV_VAR: &str = "GF_SECURITY_ADMIN_PASSWORD";

// =============================================================================
// Pod Annotations
// =============================================================================

/// Annotation enabling Prometheus scraping
pub const PROMETHEUS_SCRAPE_ANNOTATION: &str = "prometheus.io/scrape";

/// Annotation carrying the Prometheus scrape port
pub const PROMETHEUS_PORT_ANNOTATION: &str = "prometheus.io/port";

// =============================================================================
// Helper Functions
// =============================================================================

/// Path of the rendered configuration file inside the main container
pub fn config_file_path() -> String {
    format!("{}{}", CONFIG_MOUNT_PATH, CONFIG_FILE_NAME)
}

/// Volume name for an external secret reference
pub fn secret_volume_name(secret: &str) -> String {
    format!("{}{}", SECRET_VOLUME_PREFIX, secret)
}

/// Volume name for an external config map reference
pub fn config_map_volume_name(config_map: &str) -> String {
    format!("{}{}", CONFIG_MAP_VOLUME_PREFIX, config_map)
}
