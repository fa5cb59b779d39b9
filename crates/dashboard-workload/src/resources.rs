//! Resource policy: requests/limits, replica count and rollout strategy

use dashboard_common::crd::DashboardInstance;
use dashboard_common::k8s::{
    resource_list, DeploymentStrategy, IntOrString, ResourceRequirements, RollingUpdateDeployment,
};

/// Default CPU request of the main container
pub const DEFAULT_CPU_REQUEST: &str = "100m";
/// Default memory request of the main container
pub const DEFAULT_MEMORY_REQUEST: &str = "256Mi";
/// Default CPU limit of the main container
pub const DEFAULT_CPU_LIMIT: &str = "500m";
/// Default memory limit of the main container
pub const DEFAULT_MEMORY_LIMIT: &str = "1024Mi";

/// Replica count used when the instance does not ask for a positive number
pub const DEFAULT_REPLICAS: i32 = 1;

/// Rollout budget for both maxUnavailable and maxSurge
pub const ROLLOUT_BUDGET: &str = "25%";

/// Requests and limits applied when the instance carries no override
pub fn default_resources() -> ResourceRequirements {
    ResourceRequirements {
        requests: Some(resource_list(DEFAULT_CPU_REQUEST, DEFAULT_MEMORY_REQUEST)),
        limits: Some(resource_list(DEFAULT_CPU_LIMIT, DEFAULT_MEMORY_LIMIT)),
        ..Default::default()
    }
}

/// Resources of the main container.
///
/// An override replaces the defaults wholesale; a request-only override
/// therefore yields no limits.
pub fn resolve_resources(instance: &DashboardInstance) -> ResourceRequirements {
    instance
        .spec
        .resources
        .clone()
        .unwrap_or_else(default_resources)
}

/// Replica count: the overlay value when positive, otherwise 1
pub fn resolve_replicas(instance: &DashboardInstance) -> i32 {
    instance
        .overlay()
        .map(|o| o.replicas)
        .filter(|r| *r > 0)
        .unwrap_or(DEFAULT_REPLICAS)
}

/// Rolling update with a fixed 25% budget on both sides
pub fn rolling_update_strategy() -> DeploymentStrategy {
    DeploymentStrategy {
        type_: Some("RollingUpdate".to_string()),
        rolling_update: Some(RollingUpdateDeployment {
            max_unavailable: Some(IntOrString::String(ROLLOUT_BUDGET.to_string())),
            max_surge: Some(IntOrString::String(ROLLOUT_BUDGET.to_string())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use dashboard_common::crd::{DashboardInstanceSpec, DeploymentOverlay};
    use dashboard_common::k8s::Quantity;

    fn instance_with(spec: DashboardInstanceSpec) -> DashboardInstance {
        DashboardInstance::new("example", spec)
    }

    fn with_replicas(replicas: i32) -> DashboardInstance {
        instance_with(DashboardInstanceSpec {
            deployment: Some(DeploymentOverlay {
                replicas,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[test]
    fn defaults_apply_without_override() {
        let resources = resolve_resources(&instance_with(Default::default()));
        let requests = resources.requests.expect("requests");
        let limits = resources.limits.expect("limits");
        assert_eq!(requests, resource_list("100m", "256Mi"));
        assert_eq!(limits, resource_list("500m", "1024Mi"));
    }

    /// Story: a partial override is not merged with the defaults
    #[test]
    fn story_override_is_used_verbatim() {
        let custom = ResourceRequirements {
            requests: Some(BTreeMap::from([(
                "cpu".to_string(),
                Quantity("2".to_string()),
            )])),
            ..Default::default()
        };
        let instance = instance_with(DashboardInstanceSpec {
            resources: Some(custom.clone()),
            ..Default::default()
        });

        let resolved = resolve_resources(&instance);
        assert_eq!(resolved, custom);
        assert!(resolved.limits.is_none());
    }

    #[test]
    fn replicas_clamp_to_one() {
        assert_eq!(resolve_replicas(&instance_with(Default::default())), 1);
        assert_eq!(resolve_replicas(&with_replicas(0)), 1);
        assert_eq!(resolve_replicas(&with_replicas(-5)), 1);
        assert_eq!(resolve_replicas(&with_replicas(3)), 3);
    }

    #[test]
    fn rolling_update_uses_fixed_budget() {
        let strategy = rolling_update_strategy();
        assert_eq!(strategy.type_.as_deref(), Some("RollingUpdate"));
        let rolling = strategy.rolling_update.expect("rolling update");
        let budget = Some(IntOrString::String("25%".to_string()));
        assert_eq!(rolling.max_unavailable, budget);
        assert_eq!(rolling.max_surge, budget);
    }
}
