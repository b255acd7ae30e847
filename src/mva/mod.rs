//! Mean Value Analysis (MVA) for closed queueing networks.
//!
//! Builds performance measures up from an empty network to the full
//! population. At each population level `n`, an arriving job sees the mean
//! queue left by `n - 1` jobs, which gives per-station response times; Little's
//! law then yields throughput and queue lengths for level `n`.
//!
//! The recurrence has a sequential dependency on `n` and is a deterministic
//! function of the network state.
//!
//! # Fidelity
//!
//! Single-server stations use the exact recurrence `R = S·(1 + Q)`.
//! Multi-server stations use the approximation `R = S·(1 + Q/m)` rather than
//! the exact multi-server correction, which would require tracking the
//! marginal distribution of busy servers.
//!
//! # References
//!
//! - Reiser & Lavenberg (1980), "Mean-Value Analysis of Closed Multichain
//!   Queuing Networks", *J. ACM* 27(2), 313–322

mod metrics;
mod solver;
pub mod terminal;

pub use metrics::{DetailedReport, Metrics, OverallMetrics, PopulationStep, StationReport};
pub use solver::MvaSolver;
