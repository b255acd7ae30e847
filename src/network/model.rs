//! Network model definition and validation.

use super::visit::visit_ratios;
use crate::error::{QnetError, Result};
use std::fmt;

/// Tolerance on routing-matrix row sums.
const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Construction input for a [`NetworkModel`].
///
/// # Examples
///
/// ```
/// use u_qnet::network::{NetworkModel, NetworkParams};
///
/// let params = NetworkParams::new(20, vec![5.0, 3.0, 4.0], vec![2, 2, 2])
///     .with_station_names(vec!["CPU".into(), "Disk A".into(), "Disk B".into()]);
/// let network = NetworkModel::new(params).unwrap();
/// assert_eq!(network.num_stations(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkParams {
    /// Number of jobs circulating in the network (N).
    pub num_customers: u32,

    /// Service rate of each station (mu), one per station.
    pub service_rates: Vec<f64>,

    /// Number of parallel servers at each station (m), one per station.
    pub num_servers: Vec<u32>,

    /// Optional K x K routing matrix. Uniform routing when absent.
    pub routing_matrix: Option<Vec<Vec<f64>>>,

    /// Optional station names. `"Station 1".."Station K"` when absent.
    pub station_names: Option<Vec<String>>,
}

impl NetworkParams {
    /// Creates parameters with uniform routing and default station names.
    pub fn new(num_customers: u32, service_rates: Vec<f64>, num_servers: Vec<u32>) -> Self {
        Self {
            num_customers,
            service_rates,
            num_servers,
            routing_matrix: None,
            station_names: None,
        }
    }

    pub fn with_routing_matrix(mut self, routing: Vec<Vec<f64>>) -> Self {
        self.routing_matrix = Some(routing);
        self
    }

    pub fn with_station_names(mut self, names: Vec<String>) -> Self {
        self.station_names = Some(names);
        self
    }

    /// Number of stations implied by the service-rate vector.
    pub fn num_stations(&self) -> usize {
        self.service_rates.len()
    }
}

/// Pure-value snapshot of a network, as returned by
/// [`NetworkModel::get_configuration`].
///
/// Feeding a snapshot back through [`NetworkModel::from_config`] rebuilds an
/// equivalent model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    pub num_stations: usize,
    pub num_customers: u32,
    pub station_names: Vec<String>,
    pub service_rates: Vec<f64>,
    pub num_servers: Vec<u32>,
    pub routing_matrix: Vec<Vec<f64>>,
    pub visit_ratios: Vec<f64>,
}

/// Whole-array replacement of network parameters.
///
/// Any subset of fields may be set; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkUpdate {
    pub num_servers: Option<Vec<u32>>,
    pub service_rates: Option<Vec<f64>>,
    pub routing_matrix: Option<Vec<Vec<f64>>>,
}

impl NetworkUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_servers(mut self, servers: Vec<u32>) -> Self {
        self.num_servers = Some(servers);
        self
    }

    pub fn with_service_rates(mut self, rates: Vec<f64>) -> Self {
        self.service_rates = Some(rates);
        self
    }

    pub fn with_routing_matrix(mut self, routing: Vec<Vec<f64>>) -> Self {
        self.routing_matrix = Some(routing);
        self
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.num_servers.is_none() && self.service_rates.is_none() && self.routing_matrix.is_none()
    }
}

/// A closed queueing network with derived visit ratios.
///
/// Every instance owns its arrays; `clone()` is a deep copy. Candidate
/// configurations are produced by cloning a baseline and updating the clone.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkModel {
    num_customers: u32,
    service_rates: Vec<f64>,
    num_servers: Vec<u32>,
    routing: Vec<Vec<f64>>,
    visit_ratios: Vec<f64>,
    station_names: Vec<String>,
}

impl NetworkModel {
    /// Builds a validated network.
    ///
    /// # Errors
    ///
    /// - [`QnetError::InvalidNetworkParameters`] if there are no stations,
    ///   no customers, mismatched vector lengths, a server count below 1, or
    ///   a non-positive service rate.
    /// - [`QnetError::InvalidRoutingMatrix`] if the routing matrix is not
    ///   K x K or a row does not sum to 1.
    pub fn new(params: NetworkParams) -> Result<Self> {
        let k = params.num_stations();
        if k == 0 {
            return Err(QnetError::InvalidNetworkParameters(
                "network must have at least one station".into(),
            ));
        }
        if params.num_customers == 0 {
            return Err(QnetError::InvalidNetworkParameters(
                "num_customers must be at least 1".into(),
            ));
        }
        validate_servers(&params.num_servers, k)?;
        validate_rates(&params.service_rates, k)?;

        let routing = match params.routing_matrix {
            Some(routing) => {
                validate_routing(&routing, k)?;
                routing
            }
            None => vec![vec![1.0 / k as f64; k]; k],
        };

        let station_names = match params.station_names {
            Some(names) if names.len() != k => {
                return Err(QnetError::InvalidNetworkParameters(format!(
                    "station_names has {} entries, expected {k}",
                    names.len()
                )));
            }
            Some(names) => names,
            None => (1..=k).map(|i| format!("Station {i}")).collect(),
        };

        let visit_ratios = visit_ratios(&routing);

        Ok(Self {
            num_customers: params.num_customers,
            service_rates: params.service_rates,
            num_servers: params.num_servers,
            routing,
            visit_ratios,
            station_names,
        })
    }

    /// Rebuilds a network from a snapshot. Visit ratios are recomputed.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        if config.num_stations != config.service_rates.len() {
            return Err(QnetError::InvalidNetworkParameters(format!(
                "num_stations is {} but {} service rates were given",
                config.num_stations,
                config.service_rates.len()
            )));
        }
        Self::new(NetworkParams {
            num_customers: config.num_customers,
            service_rates: config.service_rates.clone(),
            num_servers: config.num_servers.clone(),
            routing_matrix: Some(config.routing_matrix.clone()),
            station_names: Some(config.station_names.clone()),
        })
    }

    pub fn num_stations(&self) -> usize {
        self.service_rates.len()
    }

    pub fn num_customers(&self) -> u32 {
        self.num_customers
    }

    pub fn service_rates(&self) -> &[f64] {
        &self.service_rates
    }

    pub fn num_servers(&self) -> &[u32] {
        &self.num_servers
    }

    pub fn routing_matrix(&self) -> &[Vec<f64>] {
        &self.routing
    }

    pub fn visit_ratios(&self) -> &[f64] {
        &self.visit_ratios
    }

    pub fn station_names(&self) -> &[String] {
        &self.station_names
    }

    /// Returns a pure-value snapshot of the current configuration.
    pub fn get_configuration(&self) -> NetworkConfig {
        NetworkConfig {
            num_stations: self.num_stations(),
            num_customers: self.num_customers,
            station_names: self.station_names.clone(),
            service_rates: self.service_rates.clone(),
            num_servers: self.num_servers.clone(),
            routing_matrix: self.routing.clone(),
            visit_ratios: self.visit_ratios.clone(),
        }
    }

    /// Replaces the population size.
    pub fn set_num_customers(&mut self, num_customers: u32) -> Result<()> {
        if num_customers == 0 {
            return Err(QnetError::InvalidNetworkParameters(
                "num_customers must be at least 1".into(),
            ));
        }
        self.num_customers = num_customers;
        Ok(())
    }

    /// Applies a whole-array parameter update.
    ///
    /// All supplied arrays are validated before anything is replaced, so a
    /// failed update leaves the model untouched. Visit ratios are recomputed
    /// when the routing matrix changes.
    ///
    /// Service rates are only checked for length here; a non-positive rate
    /// surfaces as [`QnetError::InvalidServiceRate`] when the network is
    /// solved.
    pub fn update_parameters(&mut self, update: NetworkUpdate) -> Result<()> {
        let k = self.num_stations();
        if let Some(servers) = &update.num_servers {
            validate_servers(servers, k)?;
        }
        if let Some(rates) = &update.service_rates {
            if rates.len() != k {
                return Err(QnetError::InvalidNetworkParameters(format!(
                    "service_rates has {} entries, expected {k}",
                    rates.len()
                )));
            }
        }
        if let Some(routing) = &update.routing_matrix {
            validate_routing(routing, k)?;
        }

        if let Some(servers) = update.num_servers {
            self.num_servers = servers;
        }
        if let Some(rates) = update.service_rates {
            self.service_rates = rates;
        }
        if let Some(routing) = update.routing_matrix {
            self.visit_ratios = visit_ratios(&routing);
            self.routing = routing;
        }
        Ok(())
    }
}

impl fmt::Display for NetworkModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NetworkModel(K={}, N={}, mu={:?}, m={:?})",
            self.num_stations(),
            self.num_customers,
            self.service_rates,
            self.num_servers
        )
    }
}

fn validate_servers(servers: &[u32], k: usize) -> Result<()> {
    if servers.len() != k {
        return Err(QnetError::InvalidNetworkParameters(format!(
            "num_servers has {} entries, expected {k}",
            servers.len()
        )));
    }
    if let Some(i) = servers.iter().position(|&m| m == 0) {
        return Err(QnetError::InvalidNetworkParameters(format!(
            "station {i} must have at least one server"
        )));
    }
    Ok(())
}

fn validate_rates(rates: &[f64], k: usize) -> Result<()> {
    if rates.len() != k {
        return Err(QnetError::InvalidNetworkParameters(format!(
            "service_rates has {} entries, expected {k}",
            rates.len()
        )));
    }
    if let Some(i) = rates.iter().position(|&mu| !(mu.is_finite() && mu > 0.0)) {
        return Err(QnetError::InvalidNetworkParameters(format!(
            "station {i} has non-positive service rate {}",
            rates[i]
        )));
    }
    Ok(())
}

fn validate_routing(routing: &[Vec<f64>], k: usize) -> Result<()> {
    if routing.len() != k || routing.iter().any(|row| row.len() != k) {
        return Err(QnetError::InvalidRoutingMatrix(format!(
            "expected a {k}x{k} matrix"
        )));
    }
    for (i, row) in routing.iter().enumerate() {
        if row.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(QnetError::InvalidRoutingMatrix(format!(
                "row {i} has a negative or non-finite probability"
            )));
        }
        let sum: f64 = row.iter().sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(QnetError::InvalidRoutingMatrix(format!(
                "row {i} sums to {sum}, expected 1.0"
            )));
        }
    }
    Ok(())
}
