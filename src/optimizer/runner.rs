//! Network optimization driver.

use super::config::OptimizerConfig;
use super::report::{
    BaselineRecord, CostBreakdown, Improvement, OptimizationInfo, OptimizationReport,
    OptimizedRecord,
};
use super::space::DecisionSpace;
use crate::error::{QnetError, Result};
use crate::firefly::{FireflyProblem, FireflyRunner, SearchSpace, PENALTY};
use crate::mva::{Metrics, MvaSolver};
use crate::network::NetworkModel;
use crate::objective::{ObjectiveCatalog, ObjectiveEntry};
use tracing::{debug, info, warn};

/// Searches a baseline network's parameter space for the configuration
/// that minimizes an objective.
///
/// Each candidate vector is decoded into a deep copy of the baseline,
/// solved with MVA, and scored. Candidates that fail to decode or solve are
/// penalized, never fatal.
///
/// # Examples
///
/// ```
/// use u_qnet::firefly::FireflyConfig;
/// use u_qnet::network::{NetworkModel, NetworkParams};
/// use u_qnet::optimizer::{NetworkOptimizer, OptimizerConfig};
///
/// let network =
///     NetworkModel::new(NetworkParams::new(20, vec![5.0, 3.0, 4.0], vec![2, 2, 2])).unwrap();
/// let config = OptimizerConfig::new("mean_response_time")
///     .with_server_bounds(1, 6)
///     .with_firefly(FireflyConfig::default().with_max_iterations(10).with_seed(42));
///
/// let report = NetworkOptimizer::new(network, config).unwrap().optimize().unwrap();
/// assert!(report.optimized.objective_value <= report.baseline.objective_value);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkOptimizer {
    baseline: NetworkModel,
    config: OptimizerConfig,
    entry: ObjectiveEntry,
    space: DecisionSpace,
}

impl NetworkOptimizer {
    /// Builds an optimizer using the standard objective catalog.
    pub fn new(baseline: NetworkModel, config: OptimizerConfig) -> Result<Self> {
        Self::with_catalog(baseline, config, &ObjectiveCatalog::standard())
    }

    /// Builds an optimizer resolving the objective in `catalog`.
    ///
    /// # Errors
    ///
    /// - [`QnetError::InvalidConfig`] for an invalid configuration.
    /// - [`QnetError::UnknownObjective`] if the objective is not registered.
    /// - [`QnetError::InvalidObjectiveParams`] if the parameters do not fit
    ///   the objective.
    pub fn with_catalog(
        baseline: NetworkModel,
        config: OptimizerConfig,
        catalog: &ObjectiveCatalog,
    ) -> Result<Self> {
        config.validate().map_err(QnetError::InvalidConfig)?;
        let entry = catalog.get(&config.objective)?.clone();
        entry
            .schema
            .resolve(&config.params)
            .map_err(|message| QnetError::InvalidObjectiveParams {
                objective: entry.id.clone(),
                message,
            })?;
        let space = DecisionSpace::new(&baseline, &config.variables, &config.bounds)?;

        Ok(Self {
            baseline,
            config,
            entry,
            space,
        })
    }

    pub fn baseline(&self) -> &NetworkModel {
        &self.baseline
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn decision_space(&self) -> &DecisionSpace {
        &self.space
    }

    /// Decodes `vector` into a new network. The baseline is untouched.
    pub fn decode(&self, vector: &[f64]) -> Result<NetworkModel> {
        self.space.decode(&self.baseline, vector)
    }

    /// The vector describing the baseline configuration.
    pub fn encode_baseline(&self) -> Vec<f64> {
        self.space.encode(&self.baseline)
    }

    /// Decodes, solves and scores `vector`.
    pub fn evaluate(&self, vector: &[f64]) -> Result<f64> {
        let network = self.decode(vector)?;
        let metrics = MvaSolver::solve(&network)?;
        self.score(&metrics)
    }

    /// Like [`evaluate`](Self::evaluate), with failures logged and mapped
    /// to [`PENALTY`].
    pub fn objective(&self, vector: &[f64]) -> f64 {
        match self.evaluate(vector) {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                warn!(value, "candidate objective is not finite, applying penalty");
                PENALTY
            }
            Err(e) => {
                warn!(error = %e, "candidate evaluation failed, applying penalty");
                PENALTY
            }
        }
    }

    fn score(&self, metrics: &Metrics) -> Result<f64> {
        self.entry.score(metrics, &self.config.params)
    }

    /// Runs the full optimization.
    ///
    /// The best vector is decoded once more and re-solved, so the reported
    /// optimized metrics are always a real recomputation.
    ///
    /// # Errors
    ///
    /// - Baseline solve or scoring errors.
    /// - [`QnetError::NonFiniteObjective`] if the baseline objective is not
    ///   finite. No search is run in that case.
    /// - [`QnetError::DivisionUndefined`] if the baseline objective is 0.
    pub fn optimize(&self) -> Result<OptimizationReport> {
        let baseline_metrics = MvaSolver::solve(&self.baseline)?;
        let baseline_value = self.score(&baseline_metrics)?;
        if !baseline_value.is_finite() {
            return Err(QnetError::NonFiniteObjective(baseline_value));
        }

        info!(
            objective = %self.entry.id,
            dimensions = self.space.dimensions(),
            stations = self.baseline.num_stations(),
            customers = self.baseline.num_customers(),
            baseline_value,
            "starting network optimization"
        );

        let result = FireflyRunner::run(self, &self.config.firefly)?;

        let optimized_network = self.decode(&result.best)?;
        let optimized_metrics = MvaSolver::solve(&optimized_network)?;
        let optimized_value = self.score(&optimized_metrics)?;
        let improvement = Improvement::between(baseline_value, optimized_value)?;

        info!(
            objective = %self.entry.id,
            baseline_value,
            optimized_value,
            percent = improvement.percent,
            failed_evaluations = result.failed_evaluations,
            "network optimization finished"
        );

        let cost = CostBreakdown::for_objective(
            &self.entry.id,
            &self.config.params,
            &baseline_metrics,
            &optimized_metrics,
        );

        Ok(OptimizationReport {
            baseline: BaselineRecord {
                network: self.baseline.get_configuration(),
                metrics: baseline_metrics,
                objective_value: baseline_value,
            },
            optimized: OptimizedRecord {
                network: optimized_network.get_configuration(),
                metrics: optimized_metrics,
                objective_value: optimized_value,
                solution_vector: result.best,
            },
            improvement,
            info: OptimizationInfo {
                objective_id: self.entry.id.clone(),
                objective_name: self.entry.name.clone(),
                objective_description: self.entry.description.clone(),
                direction: self.entry.direction,
                variables: self.config.variables.clone(),
                params: self.config.params.clone(),
                firefly: self.config.firefly.clone(),
            },
            cost,
            history: result.history,
            failed_evaluations: result.failed_evaluations,
        })
    }
}

impl FireflyProblem for NetworkOptimizer {
    type Error = QnetError;

    fn space(&self) -> &SearchSpace {
        self.space.search_space()
    }

    fn evaluate(&self, position: &[f64]) -> Result<f64> {
        NetworkOptimizer::evaluate(self, position)
    }

    fn seed_position(&self) -> Option<Vec<f64>> {
        if !self.config.seed_baseline {
            return None;
        }
        let x = self.encode_baseline();
        if self.space.search_space().contains(&x) {
            Some(x)
        } else {
            debug!("baseline lies outside the bounds, not seeding");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firefly::FireflyConfig;
    use crate::network::NetworkParams;
    use crate::objective::{CostParams, ObjectiveParams};
    use crate::optimizer::DecisionVariable;
    use std::collections::HashMap;

    // ---- Fixtures ----

    fn three_stations() -> NetworkModel {
        NetworkModel::new(NetworkParams::new(20, vec![5.0, 3.0, 4.0], vec![2, 2, 2])).unwrap()
    }

    fn quick() -> FireflyConfig {
        FireflyConfig::default()
            .with_n_fireflies(10)
            .with_max_iterations(15)
            .with_seed(42)
    }

    // ---- Tests ----

    #[test]
    fn test_response_time_not_worse_than_baseline() {
        let config = OptimizerConfig::new("mean_response_time")
            .with_server_bounds(1, 6)
            .with_firefly(quick());
        let report = NetworkOptimizer::new(three_stations(), config)
            .unwrap()
            .optimize()
            .unwrap();

        assert!(
            report.optimized.metrics.mean_response_time
                <= report.baseline.metrics.mean_response_time,
            "optimized {} > baseline {}",
            report.optimized.metrics.mean_response_time,
            report.baseline.metrics.mean_response_time
        );
        assert_eq!(report.optimized.solution_vector.len(), 3);
        for &m in &report.optimized.network.num_servers {
            assert!((1..=6).contains(&m));
        }
        assert_eq!(report.history.len(), 16);
        assert!(report.cost.is_none());
    }

    #[test]
    fn test_throughput_improvement_non_negative() {
        let config = OptimizerConfig::new("throughput").with_firefly(quick());
        let report = NetworkOptimizer::new(three_stations(), config)
            .unwrap()
            .optimize()
            .unwrap();

        assert!(report.improvement.percent >= 0.0);
        assert!(report.optimized.metrics.throughput >= report.baseline.metrics.throughput);
        assert_eq!(report.baseline.objective_value, -report.baseline.metrics.throughput);
    }

    #[test]
    fn test_reported_value_is_recomputed() {
        let config = OptimizerConfig::new("mean_queue_length")
            .with_variables(vec![DecisionVariable::NumServers, DecisionVariable::ServiceRates])
            .with_firefly(quick());
        let optimizer = NetworkOptimizer::new(three_stations(), config).unwrap();
        let report = optimizer.optimize().unwrap();

        let again = optimizer.evaluate(&report.optimized.solution_vector).unwrap();
        assert_eq!(again, report.optimized.objective_value);
        assert!(matches!(report.cost, Some(CostBreakdown::AddedServers { .. })));
    }

    #[test]
    fn test_decode_leaves_baseline_untouched() {
        let optimizer =
            NetworkOptimizer::new(three_stations(), OptimizerConfig::default()).unwrap();
        let before = optimizer.baseline().get_configuration();
        for v in [[1.0, 1.0, 1.0], [10.0, 3.0, 7.0], [4.0, 4.0, 4.0]] {
            let network = optimizer.decode(&v).unwrap();
            assert_ne!(network.get_configuration(), before);
        }
        assert_eq!(optimizer.baseline().get_configuration(), before);
    }

    #[test]
    fn test_objective_maps_failures_to_penalty() {
        let config = OptimizerConfig::default()
            .with_variables(vec![DecisionVariable::ServiceRates])
            .with_service_rate_bounds(0.1, 10.0);
        let optimizer = NetworkOptimizer::new(three_stations(), config).unwrap();
        assert_eq!(optimizer.objective(&[-1.0, 3.0, 4.0]), PENALTY);
        assert_eq!(optimizer.objective(&[5.0, 3.0]), PENALTY);
        assert!(optimizer.objective(&[5.0, 3.0, 4.0]) < PENALTY);
        assert!(matches!(
            optimizer.evaluate(&[-1.0, 3.0, 4.0]),
            Err(QnetError::InvalidServiceRate { station: 0, .. })
        ));
    }

    #[test]
    fn test_seed_position_respects_bounds() {
        let optimizer =
            NetworkOptimizer::new(three_stations(), OptimizerConfig::default()).unwrap();
        assert_eq!(optimizer.seed_position(), Some(vec![2.0, 2.0, 2.0]));

        let outside = OptimizerConfig::default().with_server_bounds(3, 6);
        let optimizer = NetworkOptimizer::new(three_stations(), outside).unwrap();
        assert_eq!(optimizer.seed_position(), None);

        let off = OptimizerConfig::default().with_seed_baseline(false);
        let optimizer = NetworkOptimizer::new(three_stations(), off).unwrap();
        assert_eq!(optimizer.seed_position(), None);
    }

    #[test]
    fn test_unknown_objective() {
        let err = NetworkOptimizer::new(three_stations(), OptimizerConfig::new("latency"))
            .unwrap_err();
        assert_eq!(err, QnetError::UnknownObjective("latency".into()));
    }

    #[test]
    fn test_missing_weights_rejected() {
        let err = NetworkOptimizer::new(three_stations(), OptimizerConfig::new("weighted_sum"))
            .unwrap_err();
        assert!(matches!(err, QnetError::InvalidObjectiveParams { .. }));

        let mut weights = HashMap::new();
        weights.insert("response_time".to_string(), 1.0);
        weights.insert("cost".to_string(), 0.1);
        let config = OptimizerConfig::new("weighted_sum")
            .with_params(ObjectiveParams::Weights(weights))
            .with_firefly(quick());
        let report = NetworkOptimizer::new(three_stations(), config)
            .unwrap()
            .optimize()
            .unwrap();
        assert!(report.improvement.percent >= 0.0);
    }

    #[test]
    fn test_empty_variables_rejected() {
        let config = OptimizerConfig::default().with_variables(vec![]);
        let err = NetworkOptimizer::new(three_stations(), config).unwrap_err();
        assert!(matches!(err, QnetError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_baseline_is_division_undefined() {
        // A single station has zero utilization variance.
        let network = NetworkModel::new(NetworkParams::new(5, vec![2.0], vec![1])).unwrap();
        let config = OptimizerConfig::new("utilization_variance").with_firefly(quick());
        let err = NetworkOptimizer::new(network, config)
            .unwrap()
            .optimize()
            .unwrap_err();
        assert_eq!(err, QnetError::DivisionUndefined);
    }

    #[test]
    fn test_percentile_without_samples_is_rejected() {
        // No response-time samples are supplied, so every score is +inf.
        let optimizer = NetworkOptimizer::new(
            three_stations(),
            OptimizerConfig::new("response_time_percentile").with_firefly(quick()),
        )
        .unwrap();
        assert_eq!(optimizer.objective(&[2.0, 2.0, 2.0]), PENALTY);
        assert_eq!(
            optimizer.optimize().unwrap_err(),
            QnetError::NonFiniteObjective(f64::INFINITY)
        );
    }

    #[test]
    fn test_profit_over_customers() {
        let config = OptimizerConfig::new("profit")
            .with_variables(vec![DecisionVariable::NumCustomers])
            .with_customer_bounds(1, 60)
            .with_params(ObjectiveParams::Cost(CostParams::default()))
            .with_firefly(quick());
        let report = NetworkOptimizer::new(three_stations(), config)
            .unwrap()
            .optimize()
            .unwrap();

        let n = report.optimized.network.num_customers;
        assert!((1..=60).contains(&n));
        assert_eq!(report.optimized.solution_vector, vec![f64::from(n)]);
        let Some(CostBreakdown::Profit { baseline, optimized }) = report.cost else {
            panic!("expected a profit breakdown");
        };
        assert!(optimized.profit >= baseline.profit);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serializes() {
        let config = OptimizerConfig::new("max_queue_length").with_firefly(quick());
        let report = NetworkOptimizer::new(three_stations(), config)
            .unwrap()
            .optimize()
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["info"]["objective_id"], "max_queue_length");
        assert_eq!(json["info"]["variables"][0], "num_servers");
        assert_eq!(json["cost"]["type"], "added_servers");
        assert_eq!(
            json["history"]["best_values"].as_array().unwrap().len(),
            report.history.len()
        );

        let back: OptimizationReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.info, report.info);
        assert_eq!(back.optimized.solution_vector, report.optimized.solution_vector);
    }
}
