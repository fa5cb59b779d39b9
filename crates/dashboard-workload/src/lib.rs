//! Desired-state synthesis of the dashboard Deployment
//!
//! Compiles a `DashboardInstance` plus a configuration fingerprint and a plugin
//! list into the complete Deployment (volumes, containers, probes, resources),
//! and reconciles it against the copy observed in the cluster. Everything here
//! is synchronous and pure; the reconcile-loop driver owns all I/O.
//!
//! # Usage
//!
//! ```rust,ignore
//! let compiler = DeploymentCompiler::new(&config);
//! let desired = match observed {
//!     Some(observed) => compiler.reconcile(&observed, &instance, fp.as_str(), &plugins.render()),
//!     None => compiler.compile(&instance, fp.as_str(), &plugins.render()),
//! };
//! ```

#![deny(missing_docs)]

pub mod containers;
mod compiler;
pub mod helpers;
pub mod plugins;
pub mod pod_template;
pub mod probes;
pub mod reconcile;
pub mod resources;
pub mod volumes;

pub use compiler::{deployment_key, DeploymentCompiler};
pub use helpers::{service_port, ConfigFingerprint};
pub use plugins::{PluginList, PluginSpec};
pub use reconcile::reconcile;
