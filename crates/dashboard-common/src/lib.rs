//! Common types for the dashboard operator: CRDs, Kubernetes resource types,
//! configuration lookup, errors, and logging setup.

#![deny(missing_docs)]

pub mod config;
pub mod constants;
pub mod crd;
pub mod error;
pub mod k8s;
pub mod telemetry;

pub use config::{ConfigProvider, ControllerConfig};
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label key used to select dashboard pods
pub const LABEL_APP: &str = "app";

/// Label key for the component that manages a resource
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Label value for resources managed by this operator
pub const LABEL_MANAGED_BY_OPERATOR: &str = "dashboard-operator";

/// Namespace used when an instance carries none
pub const DEFAULT_NAMESPACE: &str = "default";
