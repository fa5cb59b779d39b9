//! Pod template assembly
//!
//! Combines volumes, containers, labels and annotations under the fixed
//! service account. The pod's `app` label and the Deployment selector are
//! produced from the same constant so they cannot drift apart.

use std::collections::BTreeMap;

use dashboard_common::constants::{
    DEPLOYMENT_NAME, POD_LABEL, PROMETHEUS_PORT_ANNOTATION, PROMETHEUS_SCRAPE_ANNOTATION,
    SERVICE_ACCOUNT_NAME,
};
use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{LabelSelector, ObjectMeta, PodSpec, PodTemplateSpec};
use dashboard_common::{ConfigProvider, LABEL_APP};

use crate::containers::{init_container, main_container, sidecars, ContainerImages};
use crate::helpers::{merge_fixed, service_port};
use crate::volumes::{volume_mounts, volumes, MountDirs};

/// Pod labels: overlay labels with the fixed `app` label on top
pub fn pod_labels(instance: &DashboardInstance) -> BTreeMap<String, String> {
    merge_fixed(
        instance.overlay().map(|o| &o.labels),
        [(LABEL_APP, POD_LABEL.to_string())],
    )
}

/// Pod annotations: overlay annotations with the scrape annotations on top
pub fn pod_annotations(instance: &DashboardInstance, port: u16) -> BTreeMap<String, String> {
    merge_fixed(
        instance.overlay().map(|o| &o.annotations),
        [
            (PROMETHEUS_SCRAPE_ANNOTATION, "true".to_string()),
            (PROMETHEUS_PORT_ANNOTATION, port.to_string()),
        ],
    )
}

/// Deployment selector; always exactly the fixed `app` label
pub fn selector() -> LabelSelector {
    LabelSelector {
        match_labels: Some(BTreeMap::from([(
            LABEL_APP.to_string(),
            POD_LABEL.to_string(),
        )])),
        ..Default::default()
    }
}

/// Compiles the pod template of the dashboard Deployment
pub struct PodTemplateCompiler;

impl PodTemplateCompiler {
    /// Build the pod template for `instance`.
    ///
    /// Volume mounts are computed once and shared by the main container and
    /// every sidecar.
    pub fn compile(
        instance: &DashboardInstance,
        config: &dyn ConfigProvider,
        fingerprint: &str,
        plugins: &str,
    ) -> PodTemplateSpec {
        let port = service_port(instance);
        let images = ContainerImages::from_provider(config);
        let mounts = volume_mounts(instance, &MountDirs::from_provider(config));

        let mut containers = Vec::with_capacity(
            1 + instance.overlay().map(|o| o.containers.len()).unwrap_or(0),
        );
        containers.push(main_container(
            instance,
            &images.grafana,
            port,
            fingerprint,
            mounts.clone(),
        ));
        containers.extend(sidecars(instance, &mounts));

        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                name: Some(DEPLOYMENT_NAME.to_string()),
                labels: Some(pod_labels(instance)),
                annotations: Some(pod_annotations(instance, port)),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                service_account_name: Some(SERVICE_ACCOUNT_NAME.to_string()),
                containers,
                init_containers: Some(vec![init_container(&images.plugins_init, plugins)]),
                volumes: Some(volumes(instance)),
                ..Default::default()
            }),
        }
    }
}
