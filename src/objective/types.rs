//! Objective parameter types and schemas.

use std::borrow::Cow;
use std::collections::HashMap;

/// Natural goal of an objective. Scores are always minimized; this only
/// tells presentation code how to read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Economic coefficients for the profit objective `r·X − C_s·Σmu − C_N·N`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostParams {
    /// Revenue per completed job (`r`).
    pub revenue_per_job: f64,
    /// Cost per unit of service rate (`C_s`).
    pub service_rate_cost: f64,
    /// Cost per job held in the system (`C_N`).
    pub customer_cost: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            revenue_per_job: 10.0,
            service_rate_cost: 1.0,
            customer_cost: 0.5,
        }
    }
}

/// Weights of the trade-off objective `w1·(−R) + w2·X + w3·(−L)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeOffWeights {
    pub response_time: f64,
    pub throughput: f64,
    pub queue_length: f64,
}

impl Default for TradeOffWeights {
    fn default() -> Self {
        Self {
            response_time: 1.0,
            throughput: 1.0,
            queue_length: 1.0,
        }
    }
}

/// Auxiliary parameters passed alongside metrics when scoring.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum ObjectiveParams {
    #[default]
    None,
    Cost(CostParams),
    Weights(HashMap<String, f64>),
    TradeOff(TradeOffWeights),
    /// Percentile in `[0, 100]`.
    Percentile(f64),
}

/// The parameter shape an objective expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParamSchema {
    None,
    Cost,
    Weights,
    TradeOff,
    Percentile,
}

/// Percentile used when a percentile objective is given no parameter.
const DEFAULT_PERCENTILE: f64 = 95.0;

impl ParamSchema {
    /// Checks `params` against this schema, filling in defaults for
    /// [`ObjectiveParams::None`] where a default exists.
    ///
    /// Parameters passed to a schema-less objective are ignored.
    pub fn resolve<'a>(&self, params: &'a ObjectiveParams) -> Result<Cow<'a, ObjectiveParams>, String> {
        match (self, params) {
            (ParamSchema::None, _) => Ok(Cow::Owned(ObjectiveParams::None)),

            (ParamSchema::Cost, ObjectiveParams::Cost(_)) => Ok(Cow::Borrowed(params)),
            (ParamSchema::Cost, ObjectiveParams::None) => {
                Ok(Cow::Owned(ObjectiveParams::Cost(CostParams::default())))
            }

            (ParamSchema::Weights, ObjectiveParams::Weights(_)) => Ok(Cow::Borrowed(params)),
            (ParamSchema::Weights, ObjectiveParams::None) => {
                Err("a weights map is required".into())
            }

            (ParamSchema::TradeOff, ObjectiveParams::TradeOff(_)) => Ok(Cow::Borrowed(params)),
            (ParamSchema::TradeOff, ObjectiveParams::None) => Ok(Cow::Owned(
                ObjectiveParams::TradeOff(TradeOffWeights::default()),
            )),

            (ParamSchema::Percentile, ObjectiveParams::Percentile(p)) => {
                if (0.0..=100.0).contains(p) {
                    Ok(Cow::Borrowed(params))
                } else {
                    Err(format!("percentile must be in [0, 100], got {p}"))
                }
            }
            (ParamSchema::Percentile, ObjectiveParams::None) => {
                Ok(Cow::Owned(ObjectiveParams::Percentile(DEFAULT_PERCENTILE)))
            }

            (schema, other) => Err(format!("expected {schema:?} parameters, got {other:?}")),
        }
    }
}
