//! Firefly configuration.

/// Configuration for the Firefly Algorithm.
///
/// # Examples
///
/// ```
/// use u_qnet::firefly::FireflyConfig;
///
/// let config = FireflyConfig::default()
///     .with_n_fireflies(30)
///     .with_max_iterations(150)
///     .with_alpha(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FireflyConfig {
    /// Population size. Typical range: 10–100.
    pub n_fireflies: usize,

    /// Number of update rounds. There is no early stopping; the run
    /// always executes every iteration.
    pub max_iterations: usize,

    /// Randomization scale. Each move adds `alpha·(U(0,1) − 0.5)` per
    /// dimension. Higher = more exploration.
    pub alpha: f64,

    /// Attractiveness at distance 0.
    pub beta_0: f64,

    /// Light absorption coefficient. Attractiveness decays as
    /// `beta_0·exp(−gamma·r²)`; higher = more local search.
    pub gamma: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Whether to evaluate the population in parallel using rayon.
    ///
    /// Only the evaluation step is parallel; movement is always sequential.
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            n_fireflies: 25,
            max_iterations: 100,
            alpha: 0.5,
            beta_0: 1.0,
            gamma: 1.0,
            seed: None,
            parallel: false,
        }
    }
}

impl FireflyConfig {
    pub fn with_n_fireflies(mut self, n: usize) -> Self {
        self.n_fireflies = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta_0(mut self, beta_0: f64) -> Self {
        self.beta_0 = beta_0;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_fireflies == 0 {
            return Err("n_fireflies must be at least 1".into());
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(format!("alpha must be non-negative, got {}", self.alpha));
        }
        if !(self.beta_0.is_finite() && self.beta_0 >= 0.0) {
            return Err(format!("beta_0 must be non-negative, got {}", self.beta_0));
        }
        if !(self.gamma.is_finite() && self.gamma >= 0.0) {
            return Err(format!("gamma must be non-negative, got {}", self.gamma));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FireflyConfig::default();
        assert_eq!(config.n_fireflies, 25);
        assert_eq!(config.max_iterations, 100);
        assert!((config.alpha - 0.5).abs() < 1e-12);
        assert!((config.beta_0 - 1.0).abs() < 1e-12);
        assert!((config.gamma - 1.0).abs() < 1e-12);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(FireflyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_population() {
        assert!(FireflyConfig::default()
            .with_n_fireflies(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_negative_parameters() {
        assert!(FireflyConfig::default().with_alpha(-0.1).validate().is_err());
        assert!(FireflyConfig::default().with_beta_0(-1.0).validate().is_err());
        assert!(FireflyConfig::default()
            .with_gamma(f64::NAN)
            .validate()
            .is_err());
    }
}
