//! Closed queueing network optimization.
//!
//! Searches the configuration of a closed queueing network (a fixed
//! population of jobs circulating among service stations) by coupling an
//! exact analytical solver with a population-based metaheuristic:
//!
//! - **Network model**: stations, service rates, server counts, population,
//!   routing, and derived visit ratios.
//! - **MVA**: Mean Value Analysis computing mean response times, queue
//!   lengths, throughput, and utilization.
//! - **Objectives**: a registry of scalar scoring functions, all reduced to
//!   a "lower is better" value (maximized measures are negated).
//! - **Firefly Algorithm**: bounded mixed-integer black-box minimization.
//! - **Optimizer**: encodes selected network parameters into a search
//!   vector, runs the search, and reports baseline vs. optimized.
//!
//! # Example
//!
//! ```
//! use u_qnet::firefly::FireflyConfig;
//! use u_qnet::network::{NetworkModel, NetworkParams};
//! use u_qnet::optimizer::{DecisionVariable, NetworkOptimizer, OptimizerConfig};
//!
//! let network =
//!     NetworkModel::new(NetworkParams::new(20, vec![5.0, 3.0, 4.0], vec![2, 2, 2])).unwrap();
//! let config = OptimizerConfig::new("throughput")
//!     .with_variables(vec![DecisionVariable::NumServers])
//!     .with_server_bounds(1, 6)
//!     .with_firefly(FireflyConfig::default().with_max_iterations(20).with_seed(7));
//!
//! let report = NetworkOptimizer::new(network, config).unwrap().optimize().unwrap();
//! assert!(report.improvement.percent >= 0.0);
//! ```
//!
//! # Logging
//!
//! Progress and contained evaluation failures are emitted through
//! `tracing`. The crate never installs a subscriber.

pub mod error;
pub mod firefly;
pub mod limits;
pub mod mva;
pub mod network;
pub mod objective;
pub mod optimizer;
pub mod random;

pub use error::{QnetError, Result};
