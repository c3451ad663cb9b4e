//! Metrics infrastructure for the wine_graph service
//!
//! Each area of the service (GraphQL execution, the store) defines its own metrics in a
//! dedicated submodule. A Prometheus recorder is installed once and rendered in-process by
//! the `/metrics` route.

pub mod graphql;
pub mod registry;
pub mod store;

pub use graphql::GraphQLMetrics;
pub use store::StoreMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register every phase's metrics.
///
/// Idempotent. Without a recorder the `metrics` macros are no-ops, which is what tests and
/// the CLI commands rely on.
pub fn init_metrics() {
    INIT.call_once(|| match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if HANDLE.set(handle).is_err() {
                warn!("Prometheus handle was already set");
            }
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    });
}

/// Render the current snapshot in Prometheus text format, if a recorder is installed.
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

/// Trait for area-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase so they show up before first use
    fn register_metrics();

    /// Phase name used in the metric prefix
    fn phase_name() -> &'static str;

    /// Documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Build a metric name following `wine_graph_<phase>_<name>[_total]`.
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("wine_graph_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("wine_graph_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("wine_graph_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_naming_convention() {
        assert_eq!(
            phase_metric!(counter, "graphql", "requests"),
            "wine_graph_graphql_requests_total"
        );
        assert_eq!(
            phase_metric!(histogram, "graphql", "request_duration_seconds"),
            "wine_graph_graphql_request_duration_seconds"
        );
        assert_eq!(
            phase_metric!(gauge, "store", "records_loaded"),
            "wine_graph_store_records_loaded"
        );
    }
}
