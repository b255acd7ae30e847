//! Objective catalog.
//!
//! Named scoring functions that reduce a [`Metrics`](crate::mva::Metrics)
//! record to one value to be **minimized**. Objectives whose natural goal is
//! maximization (throughput, profit, the weighted trade-off) are negated
//! inside the catalog, so the search never branches on direction.
//!
//! Each [`ObjectiveEntry`] carries its scoring function together with the
//! [`ParamSchema`] it expects, so auxiliary parameters (cost coefficients,
//! weights, a percentile) are checked once at the catalog boundary instead of
//! at call sites.
//!
//! # Standard entries
//!
//! | id | goal | params |
//! |----|------|--------|
//! | `mean_response_time` | minimize | none |
//! | `mean_queue_length` | minimize | none |
//! | `max_queue_length` | minimize | none |
//! | `utilization_variance` | minimize | none |
//! | `throughput` | maximize | none |
//! | `response_time_percentile` | minimize | percentile |
//! | `profit` | maximize | cost |
//! | `weighted_sum` | minimize | weights |
//! | `trade_off` | maximize | trade-off weights |

mod catalog;
mod functions;
mod types;

pub use catalog::{ObjectiveCatalog, ObjectiveEntry, ObjectiveInfo, ScoreFn};
pub use functions::percentile;
pub use types::{CostParams, Direction, ObjectiveParams, ParamSchema, TradeOffWeights};
