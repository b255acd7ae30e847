//! Firefly Algorithm (FA).
//!
//! A population-based metaheuristic for bounded, mixed-integer black-box
//! minimization. Each firefly's brightness is its objective value; dimmer
//! fireflies move towards brighter ones with an attractiveness that decays
//! with squared distance, plus a uniform random step.
//!
//! Evaluation failures are contained: a failed or non-finite evaluation gets the
//! [`PENALTY`] intensity and the run continues.
//!
//! # References
//!
//! - Yang (2009), "Firefly Algorithms for Multimodal Optimization",
//!   *Stochastic Algorithms: Foundations and Applications*, LNCS 5792

mod config;
mod runner;
mod types;

pub use config::FireflyConfig;
pub use runner::{FireflyHistory, FireflyResult, FireflyRunner, PENALTY};
pub use types::{FireflyProblem, FnProblem, SearchSpace};
