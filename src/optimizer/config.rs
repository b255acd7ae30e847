//! Network optimizer configuration.

use crate::firefly::FireflyConfig;
use crate::objective::ObjectiveParams;

/// A kind of network parameter the optimizer may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecisionVariable {
    /// Population size `N` (one integer slot).
    NumCustomers,
    /// Server count per station (one integer slot per station).
    NumServers,
    /// Service rate per station (one continuous slot per station).
    ServiceRates,
}

impl DecisionVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionVariable::NumCustomers => "num_customers",
            DecisionVariable::NumServers => "num_servers",
            DecisionVariable::ServiceRates => "service_rates",
        }
    }
}

/// Per-kind bounds of the decision variables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VariableBounds {
    /// Server count range, applied to every station.
    pub servers: (u32, u32),

    /// Population range.
    pub customers: (u32, u32),

    /// Service rate range, applied to every station. `None` uses
    /// 50%–200% of each station's baseline rate.
    pub service_rates: Option<(f64, f64)>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            servers: (1, 10),
            customers: (1, 100),
            service_rates: None,
        }
    }
}

impl VariableBounds {
    /// Bounds of station `i`'s service rate given its baseline rate.
    pub fn service_rate_range(&self, baseline_rate: f64) -> (f64, f64) {
        self.service_rates
            .unwrap_or((0.5 * baseline_rate, 2.0 * baseline_rate))
    }

    pub fn validate(&self) -> Result<(), String> {
        let (lo, hi) = self.servers;
        if lo < 1 || lo > hi {
            return Err(format!("server bounds ({lo}, {hi}) must satisfy 1 <= min <= max"));
        }
        let (lo, hi) = self.customers;
        if lo < 1 || lo > hi {
            return Err(format!("customer bounds ({lo}, {hi}) must satisfy 1 <= min <= max"));
        }
        if let Some((lo, hi)) = self.service_rates {
            if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
                return Err(format!(
                    "service rate bounds ({lo}, {hi}) must satisfy 0 < min <= max"
                ));
            }
        }
        Ok(())
    }
}

/// Configuration of a [`NetworkOptimizer`](super::NetworkOptimizer) run.
///
/// # Examples
///
/// ```
/// use u_qnet::firefly::FireflyConfig;
/// use u_qnet::optimizer::{DecisionVariable, OptimizerConfig};
///
/// let config = OptimizerConfig::new("throughput")
///     .with_variables(vec![DecisionVariable::NumServers])
///     .with_server_bounds(1, 6)
///     .with_firefly(FireflyConfig::default().with_seed(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Objective id, looked up in the objective catalog.
    pub objective: String,

    /// Parameter kinds to optimize. Slots are always laid out customers
    /// first, then servers per station, then rates per station, whatever
    /// the order here.
    pub variables: Vec<DecisionVariable>,

    pub bounds: VariableBounds,

    /// Extra parameters for the objective (cost coefficients, weights).
    pub params: ObjectiveParams,

    pub firefly: FireflyConfig,

    /// Start the search from the baseline configuration when it lies
    /// inside the bounds.
    pub seed_baseline: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            objective: "mean_response_time".into(),
            variables: vec![DecisionVariable::NumServers],
            bounds: VariableBounds::default(),
            params: ObjectiveParams::None,
            firefly: FireflyConfig::default(),
            seed_baseline: true,
        }
    }
}

impl OptimizerConfig {
    /// Default configuration for the objective `id`.
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            ..Self::default()
        }
    }

    pub fn with_variables(mut self, variables: Vec<DecisionVariable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_bounds(mut self, bounds: VariableBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_server_bounds(mut self, min: u32, max: u32) -> Self {
        self.bounds.servers = (min, max);
        self
    }

    pub fn with_customer_bounds(mut self, min: u32, max: u32) -> Self {
        self.bounds.customers = (min, max);
        self
    }

    pub fn with_service_rate_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds.service_rates = Some((min, max));
        self
    }

    pub fn with_params(mut self, params: ObjectiveParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_firefly(mut self, firefly: FireflyConfig) -> Self {
        self.firefly = firefly;
        self
    }

    pub fn with_seed_baseline(mut self, seed_baseline: bool) -> Self {
        self.seed_baseline = seed_baseline;
        self
    }

    /// Validates the configuration. The objective id is checked against
    /// the catalog when the optimizer is built.
    pub fn validate(&self) -> Result<(), String> {
        if self.variables.is_empty() {
            return Err("at least one decision variable is required".into());
        }
        self.bounds.validate()?;
        self.firefly.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.objective, "mean_response_time");
        assert_eq!(config.variables, vec![DecisionVariable::NumServers]);
        assert_eq!(config.bounds.servers, (1, 10));
        assert_eq!(config.bounds.customers, (1, 100));
        assert!(config.seed_baseline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_service_rate_range() {
        let bounds = VariableBounds::default();
        assert_eq!(bounds.service_rate_range(4.0), (2.0, 8.0));
        let bounds = VariableBounds {
            service_rates: Some((0.1, 10.0)),
            ..VariableBounds::default()
        };
        assert_eq!(bounds.service_rate_range(4.0), (0.1, 10.0));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(OptimizerConfig::default()
            .with_variables(vec![])
            .validate()
            .is_err());
        assert!(OptimizerConfig::default()
            .with_server_bounds(0, 5)
            .validate()
            .is_err());
        assert!(OptimizerConfig::default()
            .with_customer_bounds(50, 10)
            .validate()
            .is_err());
        assert!(OptimizerConfig::default()
            .with_service_rate_bounds(-1.0, 2.0)
            .validate()
            .is_err());
    }
}
