//! Registers every phase's metrics and flags naming conflicts early.

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::graphql::GraphQLMetrics>(&mut all_metrics);
    register_phase_metrics::<super::store::StoreMetrics>(&mut all_metrics);

    info!(
        "Registered {} total metrics across all phases",
        all_metrics.len()
    );
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<String, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        debug!(
            "{} ({:?}, labels {:?}): {}",
            doc.name, doc.metric_type, doc.labels, doc.help
        );
        if extract_phase_from_metric_name(doc.name) != phase_name {
            warn!(
                "Metric '{}' does not carry the '{}' phase prefix",
                doc.name, phase_name
            );
        }
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' registered twice (phase '{}')",
                doc.name, phase_name
            );
        } else {
            all_metrics.insert(doc.name.to_string(), doc);
        }
    }
}

/// Extract phase name from metric name (e.g., "wine_graph_store_mutations_total" -> "store")
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("wine_graph_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_phase_from_metric_name() {
        assert_eq!(
            extract_phase_from_metric_name("wine_graph_graphql_requests_total"),
            "graphql"
        );
        assert_eq!(
            extract_phase_from_metric_name("wine_graph_store_records_loaded"),
            "store"
        );
        assert_eq!(
            extract_phase_from_metric_name("http_requests_total"),
            "unknown"
        );
    }
}
