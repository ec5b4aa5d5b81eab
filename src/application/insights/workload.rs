// Workload distribution across employees.
// balance_score = max(0, 1 - stddev / mean), 1.0 when nobody works.

use std::collections::BTreeMap;

use crate::domain::insights::{EmployeeUtilization, WorkloadDistribution};

pub fn report(utilization: &[EmployeeUtilization]) -> WorkloadDistribution {
    if utilization.is_empty() {
        return WorkloadDistribution {
            balance_score: 1.0,
            ..Default::default()
        };
    }

    let hours: Vec<f64> = utilization.iter().map(|u| u.hours_worked).collect();
    let n = hours.len() as f64;
    let mean = hours.iter().sum::<f64>() / n;
    let min = hours.iter().copied().fold(f64::INFINITY, f64::min);
    let max = hours.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = hours.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let mut status_counts = BTreeMap::new();
    for u in utilization {
        *status_counts.entry(u.status).or_insert(0) += 1;
    }

    WorkloadDistribution {
        mean_hours: mean,
        min_hours: min,
        max_hours: max,
        range_hours: max - min,
        std_dev_hours: std_dev,
        status_counts,
        balance_score: if mean > 0.0 {
            (1.0 - std_dev / mean).max(0.0)
        } else {
            1.0
        },
    }
}
