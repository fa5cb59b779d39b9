//! Dashboard Operator - desired-state synthesis for Grafana instances

mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashboard_common::crd::DashboardInstance;
use dashboard_common::telemetry::{init_logging, LoggingConfig};
use kube::CustomResourceExt;

use crate::render::{OutputFormat, RenderRequest};

/// Dashboard operator - synthesizes Grafana Deployments from DashboardInstance resources
#[derive(Parser, Debug)]
#[command(name = "dashboard-operator", version, about, long_about = None)]
struct Cli {
    /// Generate the DashboardInstance CRD manifest and exit
    #[arg(long)]
    crd: bool,

    /// Emit human-readable logs instead of JSON
    #[arg(long, global = true)]
    text_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the Deployment for an instance
    ///
    /// Without `--observed` the complete object for first creation is printed.
    /// With it, the observed object is reconciled: its metadata and status are
    /// kept and only the spec is replaced.
    Render {
        /// DashboardInstance manifest (YAML or JSON)
        #[arg(long)]
        instance: PathBuf,

        /// Configuration fingerprint to inject
        #[arg(long, conflicts_with = "grafana_ini")]
        fingerprint: Option<String>,

        /// Rendered grafana.ini to fingerprint
        #[arg(long)]
        grafana_ini: Option<PathBuf>,

        /// Plugin to install, as name:version (repeatable)
        #[arg(long = "plugin", value_name = "NAME:VERSION")]
        plugins: Vec<String>,

        /// Controller configuration file (flat YAML map); DASHBOARD_* env vars win
        #[arg(long, env = "DASHBOARD_CONFIG")]
        config: Option<PathBuf>,

        /// Deployment currently in the cluster (YAML or JSON)
        #[arg(long)]
        observed: Option<PathBuf>,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        json: !cli.text_logs,
        ..Default::default()
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if cli.crd {
        let crd = serde_yaml::to_string(&DashboardInstance::crd())
            .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;
        println!("{crd}");
        return Ok(());
    }

    match cli.command {
        Some(Commands::Render {
            instance,
            fingerprint,
            grafana_ini,
            plugins,
            config,
            observed,
            json,
        }) => {
            let request = RenderRequest {
                instance,
                fingerprint,
                grafana_ini,
                plugins,
                config,
                observed,
                format: if json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Yaml
                },
            };
            let output = render::run(&request)?;
            println!("{output}");
            Ok(())
        }
        None => {
            anyhow::bail!("no command given; use --crd or `render` (see --help)")
        }
    }
}
