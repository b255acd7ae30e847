//! Performance records produced by the MVA solver.

/// Mean performance measures of a solved network.
///
/// Immutable once produced; consumed by the objective catalog and by
/// reporting collaborators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// System mean response time `sum(e[i]·R[i])`.
    pub mean_response_time: f64,

    /// Total mean number of jobs over all stations.
    pub mean_queue_length: f64,

    /// Mean number of jobs at each station.
    pub queue_lengths: Vec<f64>,

    /// Mean response time at each station.
    pub response_times: Vec<f64>,

    /// Utilization of each station, clamped to `[0, 1]`.
    pub utilizations: Vec<f64>,

    /// System throughput.
    pub throughput: f64,

    /// Sum of server counts over all stations.
    pub total_servers: u32,

    pub station_names: Vec<String>,

    /// Population the network was solved at.
    pub num_customers: u32,

    /// Sum of service rates over all stations.
    pub total_service_rate: f64,

    /// Individual response-time observations, if any.
    ///
    /// MVA works with means only and never fills this in. Callers holding
    /// simulation or trace samples may attach them so percentile objectives
    /// can be evaluated.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub response_time_samples: Option<Vec<f64>>,
}

impl Metrics {
    /// Largest per-station queue length (0 for an empty record).
    pub fn max_queue_length(&self) -> f64 {
        self.queue_lengths.iter().copied().fold(0.0, f64::max)
    }

    /// Population variance of per-station utilization.
    pub fn utilization_variance(&self) -> f64 {
        let n = self.utilizations.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.utilizations.iter().sum::<f64>() / n as f64;
        self.utilizations
            .iter()
            .map(|u| (u - mean).powi(2))
            .sum::<f64>()
            / n as f64
    }

    /// Attaches response-time samples.
    pub fn with_response_time_samples(mut self, samples: Vec<f64>) -> Self {
        self.response_time_samples = Some(samples);
        self
    }
}

/// Values of the recurrence at one population level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationStep {
    /// Population level `n`.
    pub population: u32,
    /// Per-station response times `R[n]`.
    pub response_times: Vec<f64>,
    /// System throughput `X[n]`.
    pub throughput: f64,
    /// Per-station queue lengths `Q[n]`.
    pub queue_lengths: Vec<f64>,
}

/// System-wide aggregates of a [`DetailedReport`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverallMetrics {
    pub mean_response_time: f64,
    pub mean_queue_length: f64,
    pub throughput: f64,
    pub total_servers: u32,
}

/// Per-station view of a solved network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationReport {
    pub name: String,
    pub id: usize,
    pub num_servers: u32,
    pub service_rate: f64,
    pub visit_ratio: f64,
    pub queue_length: f64,
    pub response_time: f64,
    pub utilization: f64,
}

/// Overall aggregates plus one [`StationReport`] per station.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedReport {
    pub overall: OverallMetrics,
    pub stations: Vec<StationReport>,
}
