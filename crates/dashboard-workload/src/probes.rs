//! Health probes against the dashboard's HTTP health endpoint

use dashboard_common::constants::HEALTH_ENDPOINT;
use dashboard_common::k8s::{HTTPGetAction, IntOrString, Probe};

/// Liveness timing: (initial delay, timeout, failure threshold).
///
/// Slow startup must not trigger restarts.
pub const LIVENESS: (i32, i32, i32) = (60, 30, 10);

/// Readiness timing: (initial delay, timeout, failure threshold)
pub const READINESS: (i32, i32, i32) = (5, 3, 1);

/// HTTP GET probe on the health endpoint at `port`
pub fn probe(port: u16, initial_delay: i32, timeout: i32, failure_threshold: i32) -> Probe {
    Probe {
        http_get: Some(HTTPGetAction {
            path: Some(HEALTH_ENDPOINT.to_string()),
            port: IntOrString::Int(i32::from(port)),
            ..Default::default()
        }),
        initial_delay_seconds: Some(initial_delay),
        timeout_seconds: Some(timeout),
        failure_threshold: Some(failure_threshold),
        ..Default::default()
    }
}

/// Liveness probe for the main container
pub fn liveness_probe(port: u16) -> Probe {
    let (delay, timeout, failure) = LIVENESS;
    probe(port, delay, timeout, failure)
}

/// Readiness probe for the main container
pub fn readiness_probe(port: u16) -> Probe {
    let (delay, timeout, failure) = READINESS;
    probe(port, delay, timeout, failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_tolerates_slow_start() {
        let check = liveness_probe(3000);
        let http = check.http_get.as_ref().expect("http get");
        assert_eq!(http.path.as_deref(), Some("/api/health"));
        assert_eq!(http.port, IntOrString::Int(3000));
        assert_eq!(check.initial_delay_seconds, Some(60));
        assert_eq!(check.timeout_seconds, Some(30));
        assert_eq!(check.failure_threshold, Some(10));
    }

    #[test]
    fn readiness_gates_quickly() {
        let check = readiness_probe(3001);
        assert_eq!(
            check.http_get.as_ref().map(|h| h.port.clone()),
            Some(IntOrString::Int(3001))
        );
        assert_eq!(check.initial_delay_seconds, Some(5));
        assert_eq!(check.timeout_seconds, Some(3));
        assert_eq!(check.failure_threshold, Some(1));
    }

    /// Story: liveness and readiness differ only in their timing parameters
    #[test]
    fn story_health_checks_differ_only_in_timing() {
        let mut liveness = liveness_probe(3000);
        let readiness = readiness_probe(3000);

        liveness.initial_delay_seconds = readiness.initial_delay_seconds;
        liveness.timeout_seconds = readiness.timeout_seconds;
        liveness.failure_threshold = readiness.failure_threshold;
        assert_eq!(liveness, readiness);

        assert!(readiness.exec.is_none());
        assert!(readiness.period_seconds.is_none());
        assert!(readiness.success_threshold.is_none());
    }
}
