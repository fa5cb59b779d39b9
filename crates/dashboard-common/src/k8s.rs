//! Kubernetes resource types for workload synthesis
//!
//! Objects are the upstream `k8s-openapi` types so that user containers and
//! cluster-observed objects pass through without losing fields the operator
//! does not model. Maps are `BTreeMap`, so serializing the same value twice
//! yields byte-identical documents.
//!
//! The free functions here are shorthand constructors for the handful of
//! shapes synthesis builds over and over.

use std::collections::BTreeMap;

pub use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment,
};
pub use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, Container, ContainerPort, EmptyDirVolumeSource, EnvVar, EnvVarSource,
    HTTPGetAction, PodSpec, PodTemplateSpec, Probe, ResourceRequirements, SecretKeySelector,
    SecretVolumeSource, Volume, VolumeMount,
};
pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
pub use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

// =============================================================================
// Identity
// =============================================================================

/// Namespace/name pair identifying an object in the cluster
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Namespace
    pub namespace: String,
    /// Name
    pub name: String,
}

impl ObjectKey {
    /// Key of the object described by `meta`; absent fields become empty
    pub fn from_meta(meta: &ObjectMeta) -> Self {
        Self {
            namespace: meta.namespace.clone().unwrap_or_default(),
            name: meta.name.clone().unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Env var with a literal value
pub fn literal_env(name: impl Into<String>, value: impl Into<String>) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: Some(value.into()),
        value_from: None,
    }
}

/// Env var read from a key of a Secret; the value is never inlined
pub fn secret_env(
    name: impl Into<String>,
    secret_name: impl Into<String>,
    key: impl Into<String>,
) -> EnvVar {
    EnvVar {
        name: name.into(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.into(),
                key: key.into(),
                optional: None,
            }),
            ..Default::default()
        }),
    }
}

// =============================================================================
// Resources
// =============================================================================

/// `{cpu, memory}` resource list
pub fn resource_list(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ])
}

// =============================================================================
// Volumes
// =============================================================================

/// Volume backed by a ConfigMap
pub fn config_map_volume(
    name: impl Into<String>,
    config_map: impl Into<String>,
    optional: Option<bool>,
) -> Volume {
    Volume {
        name: name.into(),
        config_map: Some(ConfigMapVolumeSource {
            name: config_map.into(),
            optional,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Volume backed by a Secret
pub fn secret_volume(
    name: impl Into<String>,
    secret_name: impl Into<String>,
    optional: Option<bool>,
) -> Volume {
    Volume {
        name: name.into(),
        secret: Some(SecretVolumeSource {
            secret_name: Some(secret_name.into()),
            optional,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Volume backed by an emptyDir
pub fn empty_dir_volume(name: impl Into<String>) -> Volume {
    Volume {
        name: name.into(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    }
}

/// Read-write mount of a whole volume
pub fn volume_mount(name: impl Into<String>, mount_path: impl Into<String>) -> VolumeMount {
    VolumeMount {
        name: name.into(),
        mount_path: mount_path.into(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVED: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: grafana-deployment
  namespace: monitoring
  generateName: grafana-
  resourceVersion: "48213"
  uid: 0b6f6f62-1b1c-4d8e-9b1a-3f1d2f1a9c11
  generation: 7
  creationTimestamp: "2024-05-01T10:00:00Z"
  deletionTimestamp: "2024-05-02T10:00:00Z"
  deletionGracePeriodSeconds: 30
  finalizers:
    - example.com/protect
  ownerReferences:
    - apiVersion: dashboards.dev/v1alpha1
      kind: DashboardInstance
      name: example
      uid: 9d3c
      controller: true
spec:
  selector:
    matchLabels:
      app: grafana
  template:
    metadata:
      labels:
        app: grafana
    spec:
      containers:
        - name: grafana
          image: grafana:4.2
status:
  replicas: 1
  readyReplicas: 1
"#;

    /// Story: system-managed metadata survives a parse/serialize cycle
    #[test]
    fn story_observed_metadata_keeps_system_fields() {
        let deployment: Deployment = serde_yaml::from_str(OBSERVED).expect("parse");
        let meta = &deployment.metadata;
        assert_eq!(meta.resource_version.as_deref(), Some("48213"));
        assert_eq!(meta.generation, Some(7));
        assert_eq!(meta.generate_name.as_deref(), Some("grafana-"));
        assert_eq!(meta.deletion_grace_period_seconds, Some(30));
        assert!(meta.deletion_timestamp.is_some());
        assert_eq!(
            meta.finalizers.as_deref(),
            Some(&["example.com/protect".to_string()][..])
        );
        assert_eq!(meta.owner_references.as_ref().map(Vec::len), Some(1));

        let json = serde_json::to_value(&deployment).expect("serialize");
        assert_eq!(json["apiVersion"], "apps/v1");
        assert_eq!(json["kind"], "Deployment");
        assert_eq!(json["metadata"]["finalizers"][0], "example.com/protect");
        assert_eq!(json["metadata"]["deletionTimestamp"], "2024-05-02T10:00:00Z");
        assert_eq!(json["status"]["readyReplicas"], 1);
    }

    #[test]
    fn pod_spec_without_service_account_parses() {
        let deployment: Deployment = serde_yaml::from_str(OBSERVED).expect("parse");
        let pod = deployment
            .spec
            .and_then(|s| s.template.spec)
            .expect("pod spec");
        assert!(pod.service_account_name.is_none());
    }

    #[test]
    fn secret_env_never_inlines_a_value() {
        let env = secret_env("PASSWORD", "creds", "password");
        assert!(env.value.is_none());
        let selector = env
            .value_from
            .and_then(|s| s.secret_key_ref)
            .expect("secret ref");
        assert_eq!(selector.name, "creds");
        assert_eq!(selector.key, "password");
    }

    #[test]
    fn volume_constructors_set_exactly_one_source() {
        let cm = config_map_volume("cfg", "cfg", None);
        assert!(cm.config_map.is_some() && cm.secret.is_none() && cm.empty_dir.is_none());

        let secret = secret_volume("s", "s", Some(true));
        let source = secret.secret.expect("secret source");
        assert_eq!(source.secret_name.as_deref(), Some("s"));
        assert_eq!(source.optional, Some(true));

        let scratch = empty_dir_volume("tmp");
        assert!(scratch.empty_dir.is_some());
    }

    #[test]
    fn resource_list_has_cpu_and_memory() {
        let list = resource_list("100m", "256Mi");
        assert_eq!(list.get("cpu"), Some(&Quantity("100m".to_string())));
        assert_eq!(list.get("memory"), Some(&Quantity("256Mi".to_string())));
    }

    #[test]
    fn object_key_displays_namespace_slash_name() {
        let meta = ObjectMeta {
            name: Some("grafana-deployment".to_string()),
            namespace: Some("monitoring".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ObjectKey::from_meta(&meta).to_string(),
            "monitoring/grafana-deployment"
        );
    }
}
