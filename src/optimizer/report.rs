//! Baseline-vs-optimized result record.

use super::config::DecisionVariable;
use crate::error::{QnetError, Result};
use crate::firefly::{FireflyConfig, FireflyHistory};
use crate::mva::Metrics;
use crate::network::NetworkConfig;
use crate::objective::{CostParams, Direction, ObjectiveParams};

/// The network before optimization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineRecord {
    pub network: NetworkConfig,
    pub metrics: Metrics,
    pub objective_value: f64,
}

/// The network decoded from the best vector, with freshly solved metrics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedRecord {
    pub network: NetworkConfig,
    pub metrics: Metrics,
    pub objective_value: f64,
    pub solution_vector: Vec<f64>,
}

/// Change in the minimized objective value. Positive means better.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Improvement {
    /// `baseline − optimized`.
    pub absolute: f64,
    /// `(baseline − optimized) / |baseline| · 100`.
    pub percent: f64,
}

impl Improvement {
    /// Computes the improvement between two minimized objective values.
    ///
    /// Dividing by `|baseline|` keeps the sign meaningful for negated
    /// (maximized) objectives.
    ///
    /// # Errors
    ///
    /// - [`QnetError::NonFiniteObjective`] if either value is infinite or NaN.
    /// - [`QnetError::DivisionUndefined`] if `baseline` is exactly 0.
    pub fn between(baseline: f64, optimized: f64) -> Result<Self> {
        if let Some(bad) = [baseline, optimized].into_iter().find(|v| !v.is_finite()) {
            return Err(QnetError::NonFiniteObjective(bad));
        }
        if baseline == 0.0 {
            return Err(QnetError::DivisionUndefined);
        }
        let absolute = baseline - optimized;
        Ok(Self {
            absolute,
            percent: absolute / baseline.abs() * 100.0,
        })
    }
}

/// Objective and search settings used for a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationInfo {
    pub objective_id: String,
    pub objective_name: String,
    pub objective_description: String,
    pub direction: Direction,
    pub variables: Vec<DecisionVariable>,
    pub params: ObjectiveParams,
    pub firefly: FireflyConfig,
}

/// Money side of a profit evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfitBreakdown {
    /// `r·X`
    pub revenue: f64,
    /// `C_s·Σmu`
    pub service_cost: f64,
    /// `C_N·N`
    pub customer_cost: f64,
    pub profit: f64,
}

impl ProfitBreakdown {
    pub fn from_metrics(metrics: &Metrics, cost: &CostParams) -> Self {
        let revenue = cost.revenue_per_job * metrics.throughput;
        let service_cost = cost.service_rate_cost * metrics.total_service_rate;
        let customer_cost = cost.customer_cost * f64::from(metrics.num_customers);
        Self {
            revenue,
            service_cost,
            customer_cost,
            profit: revenue - service_cost - customer_cost,
        }
    }
}

/// What the optimized configuration costs relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum CostBreakdown {
    /// Servers added to reach the optimized configuration.
    AddedServers {
        baseline_servers: u32,
        optimized_servers: u32,
        added_servers: u32,
    },
    Profit {
        baseline: ProfitBreakdown,
        optimized: ProfitBreakdown,
    },
}

impl CostBreakdown {
    /// The breakdown that makes sense for `objective`, if any.
    ///
    /// Queue-oriented objectives are usually bought with extra servers, so
    /// they report the server delta; profit reports both money sides.
    pub fn for_objective(
        objective: &str,
        params: &ObjectiveParams,
        baseline: &Metrics,
        optimized: &Metrics,
    ) -> Option<Self> {
        match objective {
            "mean_queue_length" | "max_queue_length" | "response_time_percentile" => {
                Some(CostBreakdown::AddedServers {
                    baseline_servers: baseline.total_servers,
                    optimized_servers: optimized.total_servers,
                    added_servers: optimized.total_servers.saturating_sub(baseline.total_servers),
                })
            }
            "profit" => {
                let cost = match params {
                    ObjectiveParams::Cost(cost) => *cost,
                    _ => CostParams::default(),
                };
                Some(CostBreakdown::Profit {
                    baseline: ProfitBreakdown::from_metrics(baseline, &cost),
                    optimized: ProfitBreakdown::from_metrics(optimized, &cost),
                })
            }
            _ => None,
        }
    }
}

/// Everything an optimization run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationReport {
    pub baseline: BaselineRecord,
    pub optimized: OptimizedRecord,
    pub improvement: Improvement,
    pub info: OptimizationInfo,
    pub cost: Option<CostBreakdown>,
    pub history: FireflyHistory,
    /// Candidates that failed evaluation and were penalized during search.
    pub failed_evaluations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(total_servers: u32, throughput: f64) -> Metrics {
        Metrics {
            mean_response_time: 1.0,
            mean_queue_length: 4.0,
            queue_lengths: vec![4.0],
            response_times: vec![1.0],
            utilizations: vec![0.9],
            throughput,
            total_servers,
            station_names: vec!["Station 1".into()],
            num_customers: 4,
            total_service_rate: 6.0,
            response_time_samples: None,
        }
    }

    #[test]
    fn test_improvement_minimize() {
        let imp = Improvement::between(4.0, 3.0).unwrap();
        assert_eq!(imp.absolute, 1.0);
        assert_eq!(imp.percent, 25.0);
    }

    #[test]
    fn test_improvement_negated_objective() {
        // Throughput 2 -> 3, scored as -2 -> -3.
        let imp = Improvement::between(-2.0, -3.0).unwrap();
        assert_eq!(imp.absolute, 1.0);
        assert_eq!(imp.percent, 50.0);
    }

    #[test]
    fn test_improvement_zero_baseline() {
        assert_eq!(
            Improvement::between(0.0, -1.0).unwrap_err(),
            QnetError::DivisionUndefined
        );
    }

    #[test]
    fn test_improvement_non_finite() {
        assert_eq!(
            Improvement::between(f64::INFINITY, f64::INFINITY).unwrap_err(),
            QnetError::NonFiniteObjective(f64::INFINITY)
        );
        assert_eq!(
            Improvement::between(3.0, f64::NEG_INFINITY).unwrap_err(),
            QnetError::NonFiniteObjective(f64::NEG_INFINITY)
        );
        assert!(matches!(
            Improvement::between(f64::NAN, 1.0),
            Err(QnetError::NonFiniteObjective(v)) if v.is_nan()
        ));
    }

    #[test]
    fn test_added_servers() {
        let cost = CostBreakdown::for_objective(
            "mean_queue_length",
            &ObjectiveParams::None,
            &metrics(6, 2.0),
            &metrics(9, 2.5),
        );
        assert_eq!(
            cost,
            Some(CostBreakdown::AddedServers {
                baseline_servers: 6,
                optimized_servers: 9,
                added_servers: 3,
            })
        );

        let removed = CostBreakdown::for_objective(
            "max_queue_length",
            &ObjectiveParams::None,
            &metrics(6, 2.0),
            &metrics(4, 2.0),
        );
        assert!(matches!(
            removed,
            Some(CostBreakdown::AddedServers { added_servers: 0, .. })
        ));
    }

    #[test]
    fn test_profit_breakdown() {
        let Some(CostBreakdown::Profit { optimized, .. }) = CostBreakdown::for_objective(
            "profit",
            &ObjectiveParams::None,
            &metrics(1, 2.0),
            &metrics(1, 3.0),
        ) else {
            panic!("expected a profit breakdown");
        };
        // 10·3 − 1·6 − 0.5·4 = 22
        assert!((optimized.profit - 22.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_breakdown_for_response_time() {
        assert!(CostBreakdown::for_objective(
            "mean_response_time",
            &ObjectiveParams::None,
            &metrics(1, 1.0),
            &metrics(2, 1.0),
        )
        .is_none());
    }
}
