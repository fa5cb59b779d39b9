//! Replace-spec, preserve-identity reconciliation
//!
//! The observed Deployment keeps its metadata (including `resourceVersion`,
//! `uid`, owner references and finalizers) and status; only the spec is
//! swapped for the desired one. The API server computes the actual patch.

use dashboard_common::k8s::{Deployment, DeploymentSpec, ObjectKey};
use tracing::{debug, info};

/// Copy of `observed` carrying `desired` as its spec.
///
/// `observed` itself is not modified.
pub fn reconcile(observed: &Deployment, desired: DeploymentSpec) -> Deployment {
    let key = ObjectKey::from_meta(&observed.metadata);
    if observed.spec.as_ref() == Some(&desired) {
        debug!(deployment = %key, "deployment spec unchanged");
    } else {
        info!(
            deployment = %key,
            replicas = desired.replicas,
            "replacing deployment spec"
        );
    }

    Deployment {
        spec: Some(desired),
        ..observed.clone()
    }
}
