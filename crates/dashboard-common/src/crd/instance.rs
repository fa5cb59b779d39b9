//! DashboardInstance CRD types
//!
//! A `DashboardInstance` describes one Grafana deployment. The operator reads
//! it and synthesizes the Deployment; it never writes to the spec.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::k8s::{Container, ResourceRequirements};
use crate::DEFAULT_NAMESPACE;

/// DashboardInstance describes a Grafana deployment managed by the operator.
///
/// Example:
/// ```yaml
/// apiVersion: dashboards.dev/v1alpha1
/// kind: DashboardInstance
/// metadata:
///   name: example
///   namespace: monitoring
/// spec:
///   secrets: [grafana-tls]
///   configMaps: [dashboards]
///   deployment:
///     replicas: 2
///     labels:
///       team: observability
///   config:
///     server:
///       httpPort: "3001"
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "dashboards.dev",
    version = "v1alpha1",
    kind = "DashboardInstance",
    namespaced,
    shortname = "dbi",
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.deployment.replicas"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInstanceSpec {
    /// Resource requests/limits for the main container.
    ///
    /// When set, replaces the operator defaults entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    /// Deployment overlay (replicas, pod labels/annotations, sidecars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentOverlay>,

    /// Secrets mounted into every container under the secrets mount directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<String>,

    /// ConfigMaps mounted into every container under the config-map mount directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_maps: Vec<String>,

    /// Grafana configuration overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DashboardConfig>,
}

/// User overlay applied on top of the operator-built Deployment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOverlay {
    /// Desired replica count; zero or negative means "use the default"
    #[serde(default)]
    pub replicas: i32,

    /// Extra pod labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Extra pod annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Sidecar containers appended after the main container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
}

/// Grafana configuration (the subset the Deployment depends on)
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// `[server]` section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

/// `[server]` section of the Grafana configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// HTTP port, as written in the ini file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<String>,
}

impl DashboardInstance {
    /// Namespace of the instance, falling back to `default`
    pub fn namespace_or_default(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Deployment overlay, if any
    pub fn overlay(&self) -> Option<&DeploymentOverlay> {
        self.spec.deployment.as_ref()
    }

    /// Configured HTTP port string, if any
    pub fn http_port(&self) -> Option<&str> {
        self.spec
            .config
            .as_ref()
            .and_then(|c| c.server.as_ref())
            .and_then(|s| s.http_port.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::{IntOrString, Quantity};
    use kube::CustomResourceExt;

    #[test]
    fn full_instance_yaml() {
        let yaml = r#"
apiVersion: dashboards.dev/v1alpha1
kind: DashboardInstance
metadata:
  name: example
  namespace: monitoring
spec:
  resources:
    requests:
      cpu: 250m
      memory: 512Mi
  secrets: [grafana-tls, oauth]
  configMaps: [dashboards]
  deployment:
    replicas: 3
    labels:
      team: observability
    annotations:
      owner: sre
    containers:
      - name: proxy
        image: oauth2-proxy:v7
  config:
    server:
      httpPort: "3001"
"#;
        let instance: DashboardInstance = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(instance.namespace_or_default(), "monitoring");
        assert_eq!(instance.spec.secrets, vec!["grafana-tls", "oauth"]);
        assert_eq!(instance.spec.config_maps, vec!["dashboards"]);
        assert_eq!(instance.http_port(), Some("3001"));

        let overlay = instance.overlay().expect("overlay");
        assert_eq!(overlay.replicas, 3);
        assert_eq!(overlay.labels.get("team").map(String::as_str), Some("observability"));
        assert_eq!(overlay.containers[0].name, "proxy");

        let requests = instance
            .spec
            .resources
            .and_then(|r| r.requests)
            .expect("requests");
        assert_eq!(requests.get("cpu"), Some(&Quantity("250m".to_string())));
        assert_eq!(requests.get("memory"), Some(&Quantity("512Mi".to_string())));
    }

    /// Story: a sidecar using container fields the operator never touches
    /// keeps all of them, named ports included
    #[test]
    fn story_sidecar_keeps_every_container_field() {
        let yaml = r#"
apiVersion: dashboards.dev/v1alpha1
kind: DashboardInstance
metadata:
  name: example
  namespace: monitoring
spec:
  deployment:
    containers:
      - name: proxy
        image: oauth2-proxy:v7
        envFrom:
          - secretRef:
              name: proxy-env
        securityContext:
          runAsNonRoot: true
        ports:
          - name: http
            containerPort: 4180
        livenessProbe:
          httpGet:
            path: /ping
            port: http
"#;
        let instance: DashboardInstance = serde_yaml::from_str(yaml).expect("parse");
        let proxy = &instance.overlay().expect("overlay").containers[0];

        let env_from = proxy.env_from.as_ref().expect("envFrom");
        assert_eq!(
            env_from[0].secret_ref.as_ref().map(|s| s.name.as_str()),
            Some("proxy-env")
        );
        assert_eq!(
            proxy.security_context.as_ref().and_then(|s| s.run_as_non_root),
            Some(true)
        );
        let port = proxy
            .liveness_probe
            .as_ref()
            .and_then(|p| p.http_get.as_ref())
            .map(|h| h.port.clone())
            .expect("httpGet port");
        assert_eq!(port, IntOrString::String("http".to_string()));

        let json = serde_json::to_value(&instance).expect("serialize");
        let sidecar = &json["spec"]["deployment"]["containers"][0];
        assert_eq!(sidecar["envFrom"][0]["secretRef"]["name"], "proxy-env");
        assert_eq!(sidecar["securityContext"]["runAsNonRoot"], true);
        assert_eq!(sidecar["livenessProbe"]["httpGet"]["port"], "http");
    }

    #[test]
    fn minimal_instance_has_empty_defaults() {
        let yaml = r#"
apiVersion: dashboards.dev/v1alpha1
kind: DashboardInstance
metadata:
  name: bare
spec: {}
"#;
        let instance: DashboardInstance = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(instance.namespace_or_default(), "default");
        assert!(instance.overlay().is_none());
        assert!(instance.spec.resources.is_none());
        assert!(instance.spec.secrets.is_empty());
        assert!(instance.http_port().is_none());
    }

    #[test]
    fn overlay_replicas_default_to_zero() {
        let overlay: DeploymentOverlay =
            serde_yaml::from_str("labels: {a: b}").expect("parse overlay");
        assert_eq!(overlay.replicas, 0);
    }

    #[test]
    fn crd_metadata() {
        let crd = DashboardInstance::crd();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("dashboardinstances.dashboards.dev")
        );
        assert_eq!(crd.spec.group, "dashboards.dev");
        assert_eq!(crd.spec.scope, "Namespaced");
    }
}
