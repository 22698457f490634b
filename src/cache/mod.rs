use std::collections::{HashMap, HashSet};

use crate::types::InvestigationReport;

/// Cumulative view of every report seen so far, keyed by alert id.
///
/// Merges are last-write-wins per key and never evict: an alert that drops out
/// of a later listing keeps its last known value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportCache {
    reports: HashMap<String, InvestigationReport>,
    order: Vec<String>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows from this fetch come first in fetch order, followed by alerts
    /// only known from earlier fetches in their previous relative order.
    pub fn merge(&mut self, reports: impl IntoIterator<Item = InvestigationReport>) {
        let mut seen = HashSet::new();
        let mut order = Vec::new();

        for report in reports {
            if seen.insert(report.alert_id.clone()) {
                order.push(report.alert_id.clone());
            }
            self.reports.insert(report.alert_id.clone(), report);
        }

        order.extend(self.order.iter().filter(|id| !seen.contains(*id)).cloned());
        self.order = order;
    }

    pub fn lookup(&self, alert_id: &str) -> Option<&InvestigationReport> {
        self.reports.get(alert_id)
    }

    /// Reports in display order
    pub fn rows(&self) -> impl Iterator<Item = &InvestigationReport> {
        self.order.iter().filter_map(|id| self.reports.get(id))
    }

    pub fn row(&self, index: usize) -> Option<&InvestigationReport> {
        self.order.get(index).and_then(|id| self.reports.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Keep the selected row across a refresh when it still exists.
pub fn reconcile_cursor(previous: usize, rows: usize) -> usize {
    if previous < rows {
        previous
    } else {
        0
    }
}
