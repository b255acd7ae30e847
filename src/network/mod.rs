//! Closed queueing network model.
//!
//! A closed network has a fixed population of jobs circulating among `K`
//! service stations. Each station has a service rate `mu[i]` and a number of
//! parallel servers `m[i]`; jobs move between stations according to a
//! row-stochastic routing matrix `P`.
//!
//! The model derives the visit-ratio vector `e` (the stationary solution of
//! `e·P = e` with `sum(e) = 1`) at construction and whenever the routing
//! matrix changes.
//!
//! # Key Types
//!
//! - [`NetworkParams`]: Construction input
//! - [`NetworkModel`]: Validated model with derived visit ratios
//! - [`NetworkConfig`]: Pure-value snapshot for reporting and round trips
//! - [`NetworkUpdate`]: Whole-array parameter replacement

mod model;
mod visit;

pub use model::{NetworkConfig, NetworkModel, NetworkParams, NetworkUpdate};
pub use visit::visit_ratios;
