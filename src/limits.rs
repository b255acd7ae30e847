//! Input range checks applied before core objects are built.
//!
//! The core only enforces structural invariants (positive rates, matching
//! lengths). Deployments additionally cap problem sizes and search settings;
//! [`InputLimits`] holds those caps.

use crate::error::{QnetError, Result};
use crate::firefly::FireflyConfig;
use crate::network::NetworkParams;

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn check(&self, field: &str, value: f64) -> Result<()> {
        if value >= self.min && value <= self.max {
            Ok(())
        } else {
            Err(QnetError::OutOfRange {
                field: field.to_string(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Accepted ranges for user-supplied network and search parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputLimits {
    pub stations: Range,
    pub customers: Range,
    pub service_rate: Range,
    pub servers: Range,
    pub fireflies: Range,
    pub iterations: Range,
    pub alpha: Range,
    pub beta_0: Range,
    pub gamma: Range,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            stations: Range::new(2.0, 20.0),
            customers: Range::new(1.0, 200.0),
            service_rate: Range::new(0.1, 100.0),
            servers: Range::new(1.0, 50.0),
            fireflies: Range::new(10.0, 100.0),
            iterations: Range::new(10.0, 1000.0),
            alpha: Range::new(0.0, 1.0),
            beta_0: Range::new(0.0, 2.0),
            gamma: Range::new(0.0, 10.0),
        }
    }
}

impl InputLimits {
    /// Checks network construction input.
    ///
    /// # Errors
    ///
    /// [`QnetError::OutOfRange`] naming the first offending field.
    pub fn validate_network(&self, params: &NetworkParams) -> Result<()> {
        self.stations
            .check("num_stations", params.num_stations() as f64)?;
        self.customers
            .check("num_customers", f64::from(params.num_customers))?;
        for (i, &rate) in params.service_rates.iter().enumerate() {
            self.service_rate
                .check(&format!("service_rates[{i}]"), rate)?;
        }
        for (i, &m) in params.num_servers.iter().enumerate() {
            self.servers
                .check(&format!("num_servers[{i}]"), f64::from(m))?;
        }
        Ok(())
    }

    /// Checks Firefly hyperparameters.
    pub fn validate_firefly(&self, config: &FireflyConfig) -> Result<()> {
        self.fireflies
            .check("n_fireflies", config.n_fireflies as f64)?;
        self.iterations
            .check("max_iterations", config.max_iterations as f64)?;
        self.alpha.check("alpha", config.alpha)?;
        self.beta_0.check("beta_0", config.beta_0)?;
        self.gamma.check("gamma", config.gamma)
    }
}
