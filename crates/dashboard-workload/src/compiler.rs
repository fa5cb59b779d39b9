//! DeploymentCompiler: single entry point for dashboard Deployment synthesis

use std::collections::BTreeMap;

use dashboard_common::constants::DEPLOYMENT_NAME;
use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{Deployment, DeploymentSpec, ObjectKey, ObjectMeta};
use dashboard_common::{ConfigProvider, LABEL_MANAGED_BY, LABEL_MANAGED_BY_OPERATOR};
use tracing::debug;

use crate::pod_template::{selector, PodTemplateCompiler};
use crate::resources::{resolve_replicas, rolling_update_strategy};

/// Compiles a `DashboardInstance` into its Deployment.
///
/// The controller configuration is injected at construction; compilation is
/// otherwise pure, so the same inputs always yield an equal result.
///
/// ```rust,ignore
/// let config = ControllerConfig::from_env();
/// let compiler = DeploymentCompiler::new(&config);
/// let deployment = compiler.compile(&instance, fingerprint.as_str(), &plugins.render());
/// ```
pub struct DeploymentCompiler<'a> {
    config: &'a dyn ConfigProvider,
}

impl<'a> DeploymentCompiler<'a> {
    /// Create a compiler reading images and mount directories from `config`
    pub fn new(config: &'a dyn ConfigProvider) -> Self {
        Self { config }
    }

    /// Desired Deployment spec for `instance`
    pub fn compile_spec(
        &self,
        instance: &DashboardInstance,
        fingerprint: &str,
        plugins: &str,
    ) -> DeploymentSpec {
        let template = PodTemplateCompiler::compile(instance, self.config, fingerprint, plugins);
        let replicas = resolve_replicas(instance);

        debug!(
            namespace = %instance.namespace_or_default(),
            replicas,
            volumes = template
                .spec
                .as_ref()
                .and_then(|p| p.volumes.as_ref())
                .map_or(0, Vec::len),
            sidecars = template
                .spec
                .as_ref()
                .map_or(0, |p| p.containers.len().saturating_sub(1)),
            "compiled dashboard deployment spec"
        );

        DeploymentSpec {
            replicas: Some(replicas),
            selector: selector(),
            template,
            strategy: Some(rolling_update_strategy()),
            ..Default::default()
        }
    }

    /// Complete Deployment for first creation
    pub fn compile(
        &self,
        instance: &DashboardInstance,
        fingerprint: &str,
        plugins: &str,
    ) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(DEPLOYMENT_NAME.to_string()),
                namespace: Some(instance.namespace_or_default().to_string()),
                labels: Some(BTreeMap::from([(
                    LABEL_MANAGED_BY.to_string(),
                    LABEL_MANAGED_BY_OPERATOR.to_string(),
                )])),
                ..Default::default()
            },
            spec: Some(self.compile_spec(instance, fingerprint, plugins)),
            status: None,
        }
    }

    /// Update `observed` with a freshly compiled spec
    pub fn reconcile(
        &self,
        observed: &Deployment,
        instance: &DashboardInstance,
        fingerprint: &str,
        plugins: &str,
    ) -> Deployment {
        crate::reconcile::reconcile(observed, self.compile_spec(instance, fingerprint, plugins))
    }
}

/// Key of the Deployment the apply layer should fetch for `instance`
pub fn deployment_key(instance: &DashboardInstance) -> ObjectKey {
    ObjectKey {
        namespace: instance.namespace_or_default().to_string(),
        name: DEPLOYMENT_NAME.to_string(),
    }
}
