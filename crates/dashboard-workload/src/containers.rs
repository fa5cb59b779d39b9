//! Container set: the dashboard itself, the plugin installer and user sidecars

use dashboard_common::config::{
    DEFAULT_GRAFANA_IMAGE, DEFAULT_GRAFANA_VERSION, DEFAULT_PLUGINS_INIT_IMAGE,
    DEFAULT_PLUGINS_INIT_TAG, GRAFANA_IMAGE_KEY, GRAFANA_IMAGE_TAG_KEY, PLUGINS_INIT_IMAGE_KEY,
    PLUGINS_INIT_IMAGE_TAG_KEY,
};
use dashboard_common::constants::{
    config_file_path, ADMIN_PASSWORD_ENV_VAR, ADMIN_SECRET_NAME, ADMIN_USER_ENV_VAR,
    CONTAINER_NAME, HTTP_PORT_NAME, IMAGE_PULL_POLICY, INIT_CONTAINER_NAME, LAST_CONFIG_ENV_VAR,
    PLUGINS_ENV_VAR, TERMINATION_MESSAGE_PATH, TERMINATION_MESSAGE_POLICY,
};
use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{literal_env, secret_env, Container, ContainerPort, VolumeMount};
use dashboard_common::ConfigProvider;

use crate::probes::{liveness_probe, readiness_probe};
use crate::resources::resolve_resources;
use crate::volumes::init_volume_mounts;

/// Fully qualified images of the operator-built containers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerImages {
    /// `<repo>:<tag>` of the dashboard container
    pub grafana: String,
    /// `<repo>:<tag>` of the plugin installer init container
    pub plugins_init: String,
}

impl ContainerImages {
    /// Resolve both images from the controller configuration
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            grafana: format!(
                "{}:{}",
                config.get_string(GRAFANA_IMAGE_KEY, DEFAULT_GRAFANA_IMAGE),
                config.get_string(GRAFANA_IMAGE_TAG_KEY, DEFAULT_GRAFANA_VERSION),
            ),
            plugins_init: format!(
                "{}:{}",
                config.get_string(PLUGINS_INIT_IMAGE_KEY, DEFAULT_PLUGINS_INIT_IMAGE),
                config.get_string(PLUGINS_INIT_IMAGE_TAG_KEY, DEFAULT_PLUGINS_INIT_TAG),
            ),
        }
    }
}

/// The dashboard container.
///
/// Admin credentials are referenced from the admin secret, never inlined, so
/// the container only starts once that secret carries both keys.
pub fn main_container(
    instance: &DashboardInstance,
    image: &str,
    port: u16,
    fingerprint: &str,
    mounts: Vec<VolumeMount>,
) -> Container {
    Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        args: Some(vec![format!("-config={}", config_file_path())]),
        env: Some(vec![
            literal_env(LAST_CONFIG_ENV_VAR, fingerprint),
            secret_env(ADMIN_USER_ENV_VAR, ADMIN_SECRET_NAME, ADMIN_USER_ENV_VAR),
            secret_env(
                ADMIN_PASSWORD_ENV_VAR,
                ADMIN_SECRET_NAME,
                ADMIN_PASSWORD_ENV_VAR,
            ),
        ]),
        ports: Some(vec![ContainerPort {
            name: Some(HTTP_PORT_NAME.to_string()),
            container_port: i32::from(port),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }]),
        resources: Some(resolve_resources(instance)),
        liveness_probe: Some(liveness_probe(port)),
        readiness_probe: Some(readiness_probe(port)),
        volume_mounts: Some(mounts),
        termination_message_path: Some(TERMINATION_MESSAGE_PATH.to_string()),
        termination_message_policy: Some(TERMINATION_MESSAGE_POLICY.to_string()),
        ..Default::default()
    }
}

/// The plugin installer init container; runs best-effort with no resources
pub fn init_container(image: &str, plugins: &str) -> Container {
    Container {
        name: INIT_CONTAINER_NAME.to_string(),
        image: Some(image.to_string()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
        env: Some(vec![literal_env(PLUGINS_ENV_VAR, plugins)]),
        volume_mounts: Some(init_volume_mounts()),
        termination_message_path: Some(TERMINATION_MESSAGE_PATH.to_string()),
        termination_message_policy: Some(TERMINATION_MESSAGE_POLICY.to_string()),
        ..Default::default()
    }
}

/// User sidecars in declaration order.
///
/// Each sidecar is passed through as declared except for its mounts, which are
/// always replaced by `mounts`.
pub fn sidecars(instance: &DashboardInstance, mounts: &[VolumeMount]) -> Vec<Container> {
    instance
        .overlay()
        .map(|o| o.containers.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|sidecar| Container {
            volume_mounts: Some(mounts.to_vec()),
            ..sidecar.clone()
        })
        .collect()
}
