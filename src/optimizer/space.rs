//! Encoding between network parameters and flat search vectors.

use super::config::{DecisionVariable, VariableBounds};
use crate::error::{QnetError, Result};
use crate::firefly::SearchSpace;
use crate::network::{NetworkModel, NetworkUpdate};

/// What one vector slot controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Slot {
    NumCustomers,
    NumServers(usize),
    ServiceRate(usize),
}

/// Bounded vector space over a subset of a network's parameters.
///
/// Slots are laid out customers first, then one server count per station,
/// then one service rate per station. Customer and server slots are
/// integer; rate slots are continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSpace {
    space: SearchSpace,
    slots: Vec<Slot>,
}

impl DecisionSpace {
    /// Builds the space for `variables` over a network shaped like
    /// `baseline`.
    ///
    /// # Errors
    ///
    /// [`QnetError::InvalidConfig`] if `variables` is empty or a bound is
    /// malformed.
    pub fn new(
        baseline: &NetworkModel,
        variables: &[DecisionVariable],
        bounds: &VariableBounds,
    ) -> Result<Self> {
        if variables.is_empty() {
            return Err(QnetError::InvalidConfig(
                "at least one decision variable is required".into(),
            ));
        }
        bounds.validate().map_err(QnetError::InvalidConfig)?;

        let k = baseline.num_stations();
        let mut space = SearchSpace::new();
        let mut slots = Vec::new();

        if variables.contains(&DecisionVariable::NumCustomers) {
            let (lo, hi) = bounds.customers;
            space.push(f64::from(lo), f64::from(hi), true);
            slots.push(Slot::NumCustomers);
        }
        if variables.contains(&DecisionVariable::NumServers) {
            let (lo, hi) = bounds.servers;
            for i in 0..k {
                space.push(f64::from(lo), f64::from(hi), true);
                slots.push(Slot::NumServers(i));
            }
        }
        if variables.contains(&DecisionVariable::ServiceRates) {
            for (i, &rate) in baseline.service_rates().iter().enumerate() {
                let (lo, hi) = bounds.service_rate_range(rate);
                space.push(lo, hi, false);
                slots.push(Slot::ServiceRate(i));
            }
        }

        Ok(Self { space, slots })
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.space
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn dimensions(&self) -> usize {
        self.slots.len()
    }

    /// The vector describing `network`'s current values of the selected
    /// parameters.
    pub fn encode(&self, network: &NetworkModel) -> Vec<f64> {
        self.slots
            .iter()
            .map(|slot| match *slot {
                Slot::NumCustomers => f64::from(network.num_customers()),
                Slot::NumServers(i) => f64::from(network.num_servers()[i]),
                Slot::ServiceRate(i) => network.service_rates()[i],
            })
            .collect()
    }

    /// Applies `vector` to a deep copy of `baseline`. The baseline is never
    /// modified.
    ///
    /// Server and rate slots are gathered into whole arrays and applied in a
    /// single update. Integer slots are rounded to the nearest integer.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from the network, e.g. a population or
    /// server count below 1, or a vector of the wrong length.
    pub fn decode(&self, baseline: &NetworkModel, vector: &[f64]) -> Result<NetworkModel> {
        if vector.len() != self.dimensions() {
            return Err(QnetError::InvalidNetworkParameters(format!(
                "decision vector has {} entries, expected {}",
                vector.len(),
                self.dimensions()
            )));
        }

        let mut network = baseline.clone();
        let mut servers: Option<Vec<u32>> = None;
        let mut rates: Option<Vec<f64>> = None;

        for (slot, &value) in self.slots.iter().zip(vector) {
            match *slot {
                Slot::NumCustomers => network.set_num_customers(to_count(value))?,
                Slot::NumServers(i) => {
                    servers.get_or_insert_with(|| baseline.num_servers().to_vec())[i] =
                        to_count(value);
                }
                Slot::ServiceRate(i) => {
                    rates.get_or_insert_with(|| baseline.service_rates().to_vec())[i] = value;
                }
            }
        }

        let mut update = NetworkUpdate::new();
        if let Some(servers) = servers {
            update = update.with_num_servers(servers);
        }
        if let Some(rates) = rates {
            update = update.with_service_rates(rates);
        }
        if !update.is_empty() {
            network.update_parameters(update)?;
        }
        Ok(network)
    }
}

/// Rounds to a non-negative count; negative and NaN values become 0 and are
/// rejected by the network's own validation.
fn to_count(value: f64) -> u32 {
    value.round_ties_even() as u32
}
