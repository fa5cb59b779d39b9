//! Custom Resource Definitions for the dashboard operator

mod instance;

pub use instance::{
    DashboardConfig, DashboardInstance, DashboardInstanceSpec, DeploymentOverlay, ServerConfig,
};
