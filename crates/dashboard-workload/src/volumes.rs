//! Volume and mount planning
//!
//! Four internal volumes come first in a fixed order, followed by one volume
//! per external secret and one per external config map in declaration order.
//! External volumes are optional so a dangling reference does not block pod
//! start.

use dashboard_common::config::{
    CONFIG_MAPS_MOUNT_DIR_KEY, DEFAULT_CONFIG_MAPS_MOUNT_DIR, DEFAULT_SECRETS_MOUNT_DIR,
    SECRETS_MOUNT_DIR_KEY,
};
use dashboard_common::constants::{
    config_map_volume_name, secret_volume_name, CONFIG_MOUNT_PATH, CONFIG_NAME, DATA_MOUNT_PATH,
    DATA_VOLUME_NAME, LOGS_MOUNT_PATH, LOGS_VOLUME_NAME, PLUGINS_INIT_MOUNT_PATH,
    PLUGINS_MOUNT_PATH, PLUGINS_VOLUME_NAME,
};
use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{
    config_map_volume, empty_dir_volume, secret_volume, volume_mount, Volume, VolumeMount,
};
use dashboard_common::ConfigProvider;

/// Directories external secrets and config maps are mounted under
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountDirs {
    /// Prefix for secret mounts (normally ends in `/`)
    pub secrets: String,
    /// Prefix for config map mounts (normally ends in `/`)
    pub config_maps: String,
}

impl MountDirs {
    /// Read both prefixes from the controller configuration
    pub fn from_provider(config: &dyn ConfigProvider) -> Self {
        Self {
            secrets: config.get_string(SECRETS_MOUNT_DIR_KEY, DEFAULT_SECRETS_MOUNT_DIR),
            config_maps: config
                .get_string(CONFIG_MAPS_MOUNT_DIR_KEY, DEFAULT_CONFIG_MAPS_MOUNT_DIR),
        }
    }
}

impl Default for MountDirs {
    fn default() -> Self {
        Self {
            secrets: DEFAULT_SECRETS_MOUNT_DIR.to_string(),
            config_maps: DEFAULT_CONFIG_MAPS_MOUNT_DIR.to_string(),
        }
    }
}

/// Pod volumes for an instance
pub fn volumes(instance: &DashboardInstance) -> Vec<Volume> {
    let spec = &instance.spec;
    let mut volumes = Vec::with_capacity(4 + spec.secrets.len() + spec.config_maps.len());

    volumes.push(config_map_volume(CONFIG_NAME, CONFIG_NAME, None));
    volumes.push(empty_dir_volume(LOGS_VOLUME_NAME));
    volumes.push(empty_dir_volume(DATA_VOLUME_NAME));
    volumes.push(empty_dir_volume(PLUGINS_VOLUME_NAME));

    for secret in &spec.secrets {
        volumes.push(secret_volume(
            secret_volume_name(secret),
            secret,
            Some(true),
        ));
    }

    for config_map in &spec.config_maps {
        volumes.push(config_map_volume(
            config_map_volume_name(config_map),
            config_map,
            Some(true),
        ));
    }

    volumes
}

/// Mounts shared by the main container and every sidecar
pub fn volume_mounts(instance: &DashboardInstance, dirs: &MountDirs) -> Vec<VolumeMount> {
    let spec = &instance.spec;
    let mut mounts = Vec::with_capacity(4 + spec.secrets.len() + spec.config_maps.len());

    mounts.push(volume_mount(CONFIG_NAME, CONFIG_MOUNT_PATH));
    mounts.push(volume_mount(DATA_VOLUME_NAME, DATA_MOUNT_PATH));
    mounts.push(volume_mount(PLUGINS_VOLUME_NAME, PLUGINS_MOUNT_PATH));
    mounts.push(volume_mount(LOGS_VOLUME_NAME, LOGS_MOUNT_PATH));

    for secret in &spec.secrets {
        mounts.push(volume_mount(
            secret_volume_name(secret),
            format!("{}{}", dirs.secrets, secret),
        ));
    }

    for config_map in &spec.config_maps {
        mounts.push(volume_mount(
            config_map_volume_name(config_map),
            format!("{}{}", dirs.config_maps, config_map),
        ));
    }

    mounts
}

/// The single mount of the plugin installer init container
pub fn init_volume_mounts() -> Vec<VolumeMount> {
    vec![VolumeMount {
        read_only: Some(false),
        ..volume_mount(PLUGINS_VOLUME_NAME, PLUGINS_INIT_MOUNT_PATH)
    }]
}
