//! Network configuration optimizer.
//!
//! Couples the MVA solver and the objective catalog with the Firefly
//! search. A chosen subset of network parameters is encoded into a bounded
//! mixed-integer vector space; each candidate vector is decoded into a copy
//! of the baseline network, solved, and scored.
//!
//! # Key Types
//!
//! - [`OptimizerConfig`]: Objective, decision variables, bounds, search settings
//! - [`DecisionSpace`]: Lossless mapping between network parameters and vectors
//! - [`NetworkOptimizer`]: Drives the search and builds the report
//! - [`OptimizationReport`]: Baseline-vs-optimized comparison record

mod config;
mod report;
mod runner;
mod space;

pub use config::{DecisionVariable, OptimizerConfig, VariableBounds};
pub use report::{
    BaselineRecord, CostBreakdown, Improvement, OptimizationInfo, OptimizationReport,
    OptimizedRecord, ProfitBreakdown,
};
pub use runner::NetworkOptimizer;
pub use space::{DecisionSpace, Slot};
