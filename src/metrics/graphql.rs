//! GraphQL execution metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct GraphQLMetrics;

impl GraphQLMetrics {
    /// Record one executed request, its duration, and whether it carried errors
    pub fn record_request(duration_secs: f64, had_errors: bool) {
        ::metrics::counter!(phase_metric!(counter, "graphql", "requests")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "graphql", "request_duration_seconds"))
            .record(duration_secs);
        if had_errors {
            ::metrics::counter!(phase_metric!(counter, "graphql", "errors")).increment(1);
        }
    }
}

impl PhaseMetrics for GraphQLMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "graphql", "requests"));
        let _ = counter!(phase_metric!(counter, "graphql", "errors"));
        let _ = histogram!(phase_metric!(histogram, "graphql", "request_duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "graphql"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "graphql", "requests"),
                metric_type: MetricType::Counter,
                help: "Total number of GraphQL requests executed",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "graphql", "errors"),
                metric_type: MetricType::Counter,
                help: "Total number of GraphQL responses that carried errors",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "graphql", "request_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Duration of GraphQL request execution in seconds",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        GraphQLMetrics::register_metrics();
        GraphQLMetrics::record_request(0.01, true);
    }

    #[test]
    fn test_metrics_documentation() {
        let docs = GraphQLMetrics::metrics_documentation();
        assert_eq!(docs.len(), 3);
        for doc in docs {
            assert!(doc.name.starts_with("wine_graph_graphql_"));
        }
    }
}
