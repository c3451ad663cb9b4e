//! Store metrics: mutations and write-back to the data files

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a successful mutation, labelled by operation
    pub fn record_mutation(operation: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "store", "mutations"), "operation" => operation)
            .increment(1);
    }

    /// Record the outcome of a `wines.json` rewrite
    pub fn record_write_back(success: bool) {
        if success {
            ::metrics::counter!(phase_metric!(counter, "store", "write_backs")).increment(1);
        } else {
            ::metrics::counter!(phase_metric!(counter, "store", "write_back_errors"))
                .increment(1);
        }
    }

    pub fn record_records_loaded(count: usize) {
        ::metrics::gauge!(phase_metric!(gauge, "store", "records_loaded")).set(count as f64);
    }
}

impl PhaseMetrics for StoreMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge};

        let _ = counter!(phase_metric!(counter, "store", "mutations"));
        let _ = counter!(phase_metric!(counter, "store", "write_backs"));
        let _ = counter!(phase_metric!(counter, "store", "write_back_errors"));
        let _ = gauge!(phase_metric!(gauge, "store", "records_loaded"));
    }

    fn phase_name() -> &'static str {
        "store"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "store", "mutations"),
                metric_type: MetricType::Counter,
                help: "Total number of applied mutations",
                labels: vec!["operation"],
            },
            MetricDoc {
                name: phase_metric!(counter, "store", "write_backs"),
                metric_type: MetricType::Counter,
                help: "Successful rewrites of wines.json",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "store", "write_back_errors"),
                metric_type: MetricType::Counter,
                help: "Failed rewrites of wines.json",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "store", "records_loaded"),
                metric_type: MetricType::Gauge,
                help: "Records loaded from the data files at startup",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_documentation() {
        let docs = StoreMetrics::metrics_documentation();
        assert_eq!(docs.len(), 4);
        assert!(docs
            .iter()
            .all(|doc| doc.name.starts_with("wine_graph_store_")));
    }
}
