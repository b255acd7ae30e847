//! Scoring functions. Every function returns a value to minimize.
//!
//! Functions receive parameters already resolved against their schema; an
//! unexpected variant is treated as "no parameters".

use super::types::{CostParams, ObjectiveParams, TradeOffWeights};
use crate::mva::Metrics;

pub(crate) fn mean_response_time(metrics: &Metrics, _: &ObjectiveParams) -> f64 {
    metrics.mean_response_time
}

pub(crate) fn mean_queue_length(metrics: &Metrics, _: &ObjectiveParams) -> f64 {
    metrics.mean_queue_length
}

pub(crate) fn max_queue_length(metrics: &Metrics, _: &ObjectiveParams) -> f64 {
    metrics.max_queue_length()
}

pub(crate) fn utilization_variance(metrics: &Metrics, _: &ObjectiveParams) -> f64 {
    metrics.utilization_variance()
}

pub(crate) fn throughput(metrics: &Metrics, _: &ObjectiveParams) -> f64 {
    -metrics.throughput
}

/// Response-time percentile. `+inf` when the record has no samples, since
/// a percentile cannot be recovered from means alone.
pub(crate) fn response_time_percentile(metrics: &Metrics, params: &ObjectiveParams) -> f64 {
    let p = match params {
        ObjectiveParams::Percentile(p) => *p,
        _ => 95.0,
    };
    match &metrics.response_time_samples {
        Some(samples) => percentile(samples, p),
        None => f64::INFINITY,
    }
}

pub(crate) fn profit(metrics: &Metrics, params: &ObjectiveParams) -> f64 {
    let cost = match params {
        ObjectiveParams::Cost(cost) => *cost,
        _ => CostParams::default(),
    };
    -(cost.revenue_per_job * metrics.throughput
        - cost.service_rate_cost * metrics.total_service_rate
        - cost.customer_cost * metrics.num_customers as f64)
}

/// Weighted sum of named sub-metrics. Recognized keys: `response_time`,
/// `queue_length`, `utilization_variance`, `max_queue`, `cost` (total
/// servers). Unknown keys are ignored; missing keys contribute zero.
pub(crate) fn weighted_sum(metrics: &Metrics, params: &ObjectiveParams) -> f64 {
    let ObjectiveParams::Weights(weights) = params else {
        return 0.0;
    };
    weights
        .iter()
        .map(|(key, w)| {
            let value = match key.as_str() {
                "response_time" => metrics.mean_response_time,
                "queue_length" => metrics.mean_queue_length,
                "utilization_variance" => metrics.utilization_variance(),
                "max_queue" => metrics.max_queue_length(),
                "cost" => metrics.total_servers as f64,
                _ => return 0.0,
            };
            w * value
        })
        .sum()
}

pub(crate) fn trade_off(metrics: &Metrics, params: &ObjectiveParams) -> f64 {
    let w = match params {
        ObjectiveParams::TradeOff(w) => *w,
        _ => TradeOffWeights::default(),
    };
    let benefit = w.response_time * -metrics.mean_response_time
        + w.throughput * metrics.throughput
        + w.queue_length * -metrics.mean_queue_length;
    -benefit
}

/// Percentile `p` (0–100) of `samples` with linear interpolation between
/// closest ranks. `+inf` for an empty slice.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return f64::INFINITY;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn metrics() -> Metrics {
        Metrics {
            mean_response_time: 2.0,
            mean_queue_length: 10.0,
            queue_lengths: vec![4.0, 6.0],
            response_times: vec![1.0, 3.0],
            utilizations: vec![0.8, 0.4],
            throughput: 5.0,
            total_servers: 3,
            station_names: vec!["A".into(), "B".into()],
            num_customers: 10,
            total_service_rate: 8.0,
            response_time_samples: None,
        }
    }

    #[test]
    fn test_identity_objectives() {
        let m = metrics();
        let none = ObjectiveParams::None;
        assert_eq!(mean_response_time(&m, &none), 2.0);
        assert_eq!(mean_queue_length(&m, &none), 10.0);
        assert_eq!(max_queue_length(&m, &none), 6.0);
        assert!((utilization_variance(&m, &none) - 0.04).abs() < 1e-12);
        assert_eq!(throughput(&m, &none), -5.0);
    }

    #[test]
    fn test_profit_negated() {
        // r·X − C_s·Σmu − C_N·N = 10·5 − 1·8 − 0.5·10 = 37
        let score = profit(&metrics(), &ObjectiveParams::Cost(CostParams::default()));
        assert!((score + 37.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_sum_ignores_unknown_keys() {
        let mut weights = HashMap::new();
        weights.insert("response_time".to_string(), 0.5);
        weights.insert("cost".to_string(), 2.0);
        weights.insert("no_such_metric".to_string(), 100.0);
        let score = weighted_sum(&metrics(), &ObjectiveParams::Weights(weights));
        assert!((score - (0.5 * 2.0 + 2.0 * 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_trade_off() {
        let w = TradeOffWeights {
            response_time: 1.0,
            throughput: 2.0,
            queue_length: 0.5,
        };
        // benefit = −2 + 10 − 5 = 3
        let score = trade_off(&metrics(), &ObjectiveParams::TradeOff(w));
        assert!((score + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_without_samples_is_infinite() {
        let score = response_time_percentile(&metrics(), &ObjectiveParams::Percentile(95.0));
        assert!(score.is_infinite() && score > 0.0);
    }

    #[test]
    fn test_percentile_with_samples() {
        let m = metrics().with_response_time_samples(vec![4.0, 1.0, 3.0, 2.0, 5.0]);
        let median = response_time_percentile(&m, &ObjectiveParams::Percentile(50.0));
        assert!((median - 3.0).abs() < 1e-12);
        assert!((percentile(&[1.0, 2.0], 75.0) - 1.75).abs() < 1e-12);
        assert_eq!(percentile(&[7.0], 10.0), 7.0);
    }
}
