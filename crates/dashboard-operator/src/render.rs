//! `render` command: load inputs, synthesize, serialize

use std::path::{Path, PathBuf};

use anyhow::Context;
use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{Deployment, ObjectKey};
use dashboard_common::{ControllerConfig, Error};
use dashboard_workload::{deployment_key, ConfigFingerprint, DeploymentCompiler, PluginList};
use tracing::info;

/// Serialization of the rendered Deployment
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Inputs of one render invocation
#[derive(Debug, Default)]
pub struct RenderRequest {
    pub instance: PathBuf,
    pub fingerprint: Option<String>,
    pub grafana_ini: Option<PathBuf>,
    pub plugins: Vec<String>,
    pub config: Option<PathBuf>,
    pub observed: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Render the Deployment described by `request`
pub fn run(request: &RenderRequest) -> anyhow::Result<String> {
    let config = load_config(request.config.as_deref())?;
    let instance = load_instance(&request.instance)?;
    let fingerprint = resolve_fingerprint(request)?;
    let plugins = PluginList::parse(&request.plugins).context("invalid --plugin")?;

    let compiler = DeploymentCompiler::new(&config);
    let deployment = match &request.observed {
        Some(path) => {
            let observed = load_observed(path)?;
            let key = ObjectKey::from_meta(&observed.metadata);
            let expected = deployment_key(&instance);
            if key != expected {
                anyhow::bail!(
                    "observed deployment {} does not belong to instance (expected {})",
                    key,
                    expected
                );
            }
            compiler.reconcile(&observed, &instance, fingerprint.as_str(), &plugins.render())
        }
        None => compiler.compile(&instance, fingerprint.as_str(), &plugins.render()),
    };

    info!(
        deployment = %ObjectKey::from_meta(&deployment.metadata),
        fingerprint = %fingerprint,
        plugins = plugins.plugins().len(),
        "rendered deployment"
    );

    serialize(&deployment, request.format)
}

/// Controller configuration: optional file, overlaid by `DASHBOARD_*` env vars
fn load_config(path: Option<&Path>) -> anyhow::Result<ControllerConfig> {
    let base = match path {
        Some(path) => ControllerConfig::from_yaml_file(path)?,
        None => ControllerConfig::new(),
    };
    Ok(base.merged_with(ControllerConfig::from_env()))
}

fn load_instance(path: &Path) -> anyhow::Result<DashboardInstance> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read instance {}", path.display()))?;
    let instance = serde_yaml::from_str(&contents)
        .map_err(|e| Error::serialization_for("DashboardInstance", e.to_string()))?;
    Ok(instance)
}

fn load_observed(path: &Path) -> anyhow::Result<Deployment> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read observed deployment {}", path.display()))?;
    // apiVersion and kind are checked by the Deployment deserializer
    let observed: Deployment = serde_yaml::from_str(&contents)
        .map_err(|e| Error::serialization_for("Deployment", e.to_string()))?;
    Ok(observed)
}

/// Fingerprint from `--fingerprint`, or the digest of `--grafana-ini`, or the
/// digest of an empty configuration
fn resolve_fingerprint(request: &RenderRequest) -> anyhow::Result<ConfigFingerprint> {
    if let Some(raw) = &request.fingerprint {
        return Ok(ConfigFingerprint::from_raw(raw.clone()));
    }
    let contents = match &request.grafana_ini {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => String::new(),
    };
    Ok(ConfigFingerprint::of(&contents))
}

fn serialize(deployment: &Deployment, format: OutputFormat) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Yaml => serde_yaml::to_string(deployment).map_err(Error::from)?,
        OutputFormat::Json => serde_json::to_string_pretty(deployment).map_err(Error::from)?,
    };
    Ok(output)
}
