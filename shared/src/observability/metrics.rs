//! In-process ledger metrics

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;

/// Counter and gauge registry keyed by metric name.
#[derive(Default)]
pub struct MetricsCollector {
    counters: RwLock<HashMap<String, AtomicU64>>,
    gauges: RwLock<HashMap<String, AtomicU64>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_counter(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.read().get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        self.counters
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    pub fn set_gauge(&self, name: &str, value: u64) {
        if let Some(gauge) = self.gauges.read().get(name) {
            gauge.store(value, Ordering::Relaxed);
            return;
        }
        self.gauges
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .store(value, Ordering::Relaxed);
    }

    pub fn increment_gauge(&self, name: &str) {
        if let Some(gauge) = self.gauges.read().get(name) {
            gauge.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.gauges
            .write()
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Saturates at zero.
    pub fn decrement_gauge(&self, name: &str) {
        if let Some(gauge) = self.gauges.read().get(name) {
            let _ = gauge.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_sub(1)));
        }
    }

    pub fn get_counter(&self, name: &str) -> Option<u64> {
        self.counters
            .read()
            .get(name)
            .map(|counter| counter.load(Ordering::Relaxed))
    }

    pub fn get_gauge(&self, name: &str) -> Option<u64> {
        self.gauges
            .read()
            .get(name)
            .map(|gauge| gauge.load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();

        let gauges = self
            .gauges
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect();

        MetricsSnapshot { counters, gauges }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub gauges: HashMap<String, u64>,
}

pub mod metric_names {
    pub const BOUNTIES_CREATED_TOTAL: &str = "bounties_created_total";
    pub const BOUNTIES_CLAIMED_TOTAL: &str = "bounties_claimed_total";
    pub const BOUNTIES_REFUNDED_TOTAL: &str = "bounties_refunded_total";
    pub const LEDGER_REJECTIONS_TOTAL: &str = "ledger_rejections_total";
    pub const EMISSION_CLAWBACKS_TOTAL: &str = "emission_clawbacks_total";

    pub const BOUNTIES_ACTIVE: &str = "bounties_active";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        let metrics = MetricsCollector::new();

        metrics.increment_counter(metric_names::BOUNTIES_CREATED_TOTAL, 1);
        assert_eq!(metrics.get_counter(metric_names::BOUNTIES_CREATED_TOTAL), Some(1));

        metrics.increment_counter(metric_names::BOUNTIES_CREATED_TOTAL, 5);
        assert_eq!(metrics.get_counter(metric_names::BOUNTIES_CREATED_TOTAL), Some(6));
        assert_eq!(metrics.get_counter("missing"), None);
    }

    #[test]
    fn test_active_gauge_saturates() {
        let metrics = MetricsCollector::new();

        metrics.increment_gauge(metric_names::BOUNTIES_ACTIVE);
        metrics.increment_gauge(metric_names::BOUNTIES_ACTIVE);
        metrics.decrement_gauge(metric_names::BOUNTIES_ACTIVE);
        assert_eq!(metrics.get_gauge(metric_names::BOUNTIES_ACTIVE), Some(1));

        metrics.decrement_gauge(metric_names::BOUNTIES_ACTIVE);
        metrics.decrement_gauge(metric_names::BOUNTIES_ACTIVE);
        assert_eq!(metrics.get_gauge(metric_names::BOUNTIES_ACTIVE), Some(0));

        metrics.set_gauge(metric_names::BOUNTIES_ACTIVE, 7);
        assert_eq!(metrics.get_gauge(metric_names::BOUNTIES_ACTIVE), Some(7));
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = MetricsCollector::new();
        metrics.increment_counter("counter1", 10);
        metrics.set_gauge("gauge1", 42);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.counters.get("counter1"), Some(&10));
        assert_eq!(snapshot.gauges.get("gauge1"), Some(&42));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["gauges"]["gauge1"], 42);
    }
}
