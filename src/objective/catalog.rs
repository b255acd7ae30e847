//! Objective registry.

use super::functions;
use super::types::{Direction, ObjectiveParams, ParamSchema};
use crate::error::{QnetError, Result};
use crate::mva::Metrics;

/// Scoring function signature: metrics plus resolved parameters in, value to
/// minimize out.
pub type ScoreFn = fn(&Metrics, &ObjectiveParams) -> f64;

/// A registered objective.
#[derive(Debug, Clone)]
pub struct ObjectiveEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub direction: Direction,
    pub schema: ParamSchema,
    pub score_fn: ScoreFn,
}

impl ObjectiveEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        direction: Direction,
        schema: ParamSchema,
        score_fn: ScoreFn,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            unit: unit.into(),
            direction,
            schema,
            score_fn,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Scores a metrics record.
    ///
    /// # Errors
    ///
    /// [`QnetError::InvalidObjectiveParams`] if `params` does not fit this
    /// entry's schema.
    pub fn score(&self, metrics: &Metrics, params: &ObjectiveParams) -> Result<f64> {
        let resolved = self
            .schema
            .resolve(params)
            .map_err(|message| QnetError::InvalidObjectiveParams {
                objective: self.id.clone(),
                message,
            })?;
        Ok((self.score_fn)(metrics, &resolved))
    }

    /// Presentation view of this entry.
    pub fn info(&self) -> ObjectiveInfo {
        ObjectiveInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            direction: self.direction,
            schema: self.schema,
        }
    }
}

/// Serializable description of an objective for presentation layers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub direction: Direction,
    pub schema: ParamSchema,
}

/// Registry of objectives keyed by id, in registration order.
///
/// # Examples
///
/// ```
/// use u_qnet::objective::{ObjectiveCatalog, ObjectiveParams};
/// use u_qnet::mva::MvaSolver;
/// use u_qnet::network::{NetworkModel, NetworkParams};
///
/// let catalog = ObjectiveCatalog::standard();
/// let network = NetworkModel::new(NetworkParams::new(10, vec![2.0], vec![1])).unwrap();
/// let metrics = MvaSolver::solve(&network).unwrap();
///
/// let score = catalog.score("throughput", &metrics, &ObjectiveParams::None).unwrap();
/// assert!((score + 2.0).abs() < 1e-12); // maximized objectives are negated
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectiveCatalog {
    entries: Vec<ObjectiveEntry>,
}

impl ObjectiveCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with every standard objective registered.
    pub fn standard() -> Self {
        use Direction::{Maximize, Minimize};

        Self::new()
            .with_entry(
                ObjectiveEntry::new(
                    "mean_response_time",
                    "Mean response time",
                    "s",
                    Minimize,
                    ParamSchema::None,
                    functions::mean_response_time,
                )
                .with_description("Mean time a job spends in the system, waiting plus service"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "mean_queue_length",
                    "Mean queue length",
                    "jobs",
                    Minimize,
                    ParamSchema::None,
                    functions::mean_queue_length,
                )
                .with_description("Mean number of jobs held across all stations"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "max_queue_length",
                    "Maximum queue length",
                    "jobs",
                    Minimize,
                    ParamSchema::None,
                    functions::max_queue_length,
                )
                .with_description("Queue length at the most loaded station (bottleneck)"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "utilization_variance",
                    "Utilization balance",
                    "dimensionless",
                    Minimize,
                    ParamSchema::None,
                    functions::utilization_variance,
                )
                .with_description("Variance of per-station utilization (load balancing)"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "throughput",
                    "Throughput",
                    "jobs/s",
                    Maximize,
                    ParamSchema::None,
                    functions::throughput,
                )
                .with_description("Jobs completed per unit time"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "response_time_percentile",
                    "Response time percentile",
                    "s",
                    Minimize,
                    ParamSchema::Percentile,
                    functions::response_time_percentile,
                )
                .with_description(
                    "Percentile of per-job response time; infinite without response-time samples",
                ),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "profit",
                    "Profit",
                    "currency/s",
                    Maximize,
                    ParamSchema::Cost,
                    functions::profit,
                )
                .with_description("Revenue r·X minus service cost C_s·Σmu and holding cost C_N·N"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "weighted_sum",
                    "Weighted sum",
                    "mixed",
                    Minimize,
                    ParamSchema::Weights,
                    functions::weighted_sum,
                )
                .with_description("Weighted linear combination of named sub-metrics"),
            )
            .with_entry(
                ObjectiveEntry::new(
                    "trade_off",
                    "Performance trade-off",
                    "mixed",
                    Maximize,
                    ParamSchema::TradeOff,
                    functions::trade_off,
                )
                .with_description("w1·(−R) + w2·X + w3·(−L)"),
            )
    }

    /// Registers an entry, replacing any entry with the same id.
    pub fn with_entry(mut self, entry: ObjectiveEntry) -> Self {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Looks up an objective by id.
    ///
    /// # Errors
    ///
    /// [`QnetError::UnknownObjective`] if `id` is not registered.
    pub fn get(&self, id: &str) -> Result<&ObjectiveEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| QnetError::UnknownObjective(id.to_string()))
    }

    /// Scores `metrics` with the objective `id`.
    pub fn score(&self, id: &str, metrics: &Metrics, params: &ObjectiveParams) -> Result<f64> {
        self.get(id)?.score(metrics, params)
    }

    /// Describes every registered objective.
    pub fn list(&self) -> Vec<ObjectiveInfo> {
        self.entries.iter().map(ObjectiveEntry::info).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
