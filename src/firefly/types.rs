//! Search space and problem trait for the Firefly Algorithm.

use std::fmt;
use std::marker::PhantomData;

/// A bounded, mixed-integer box `[lower, upper]`.
///
/// Integer dimensions must have integral bounds, so clipping then rounding
/// always stays inside the box.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    lower: Vec<f64>,
    upper: Vec<f64>,
    integer: Vec<bool>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a continuous dimension `[low, high]`.
    pub fn add_continuous(mut self, low: f64, high: f64) -> Self {
        self.push(low, high, false);
        self
    }

    /// Appends an integer dimension `[low, high]`.
    pub fn add_integer(mut self, low: i64, high: i64) -> Self {
        self.push(low as f64, high as f64, true);
        self
    }

    pub(crate) fn push(&mut self, low: f64, high: f64, integer: bool) {
        self.lower.push(low);
        self.upper.push(high);
        self.integer.push(integer);
    }

    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn is_integer(&self, dim: usize) -> bool {
        self.integer[dim]
    }

    /// Indices of the integer dimensions.
    pub fn integer_dims(&self) -> Vec<usize> {
        (0..self.dimensions()).filter(|&d| self.integer[d]).collect()
    }

    /// Validates the bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.dimensions() == 0 {
            return Err("search space has no dimensions".into());
        }
        for d in 0..self.dimensions() {
            let (lo, hi) = (self.lower[d], self.upper[d]);
            if !(lo.is_finite() && hi.is_finite()) {
                return Err(format!("dimension {d} has non-finite bounds"));
            }
            if lo > hi {
                return Err(format!("dimension {d}: lower {lo} exceeds upper {hi}"));
            }
            if self.integer[d] && (lo.fract() != 0.0 || hi.fract() != 0.0) {
                return Err(format!("integer dimension {d} has fractional bounds"));
            }
        }
        Ok(())
    }

    /// Rounds integer dimensions to the nearest integer (ties to even).
    pub fn round_integers(&self, position: &mut [f64]) {
        for (d, x) in position.iter_mut().enumerate() {
            if self.integer[d] {
                *x = x.round_ties_even();
            }
        }
    }

    /// Clips into bounds, then rounds integer dimensions.
    pub fn repair(&self, position: &mut [f64]) {
        for (d, x) in position.iter_mut().enumerate() {
            *x = x.clamp(self.lower[d], self.upper[d]);
        }
        self.round_integers(position);
    }

    /// Returns `true` if `position` lies in the box and is integral on
    /// integer dimensions.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dimensions()
            && position.iter().enumerate().all(|(d, &x)| {
                x >= self.lower[d] && x <= self.upper[d] && (!self.integer[d] || x.fract() == 0.0)
            })
    }
}

/// Defines a Firefly optimization problem.
///
/// The user supplies the search space and a black-box objective. Lower
/// values are better (minimization); for maximization, negate.
///
/// # Examples
///
/// ```ignore
/// struct Sphere { space: SearchSpace }
///
/// impl FireflyProblem for Sphere {
///     type Error = std::convert::Infallible;
///     fn space(&self) -> &SearchSpace { &self.space }
///     fn evaluate(&self, x: &[f64]) -> Result<f64, Self::Error> {
///         Ok(x.iter().map(|v| v * v).sum())
///     }
/// }
/// ```
pub trait FireflyProblem: Send + Sync {
    /// Error raised by a failed evaluation. Failures are contained by the
    /// runner and penalized; they never abort a run.
    type Error: fmt::Display + Send;

    /// The bounded search space.
    fn space(&self) -> &SearchSpace;

    /// Evaluates a position. Lower is better.
    fn evaluate(&self, position: &[f64]) -> Result<f64, Self::Error>;

    /// Optional known-good starting position.
    ///
    /// When present (and of the right dimension) it is repaired into the
    /// space and replaces the first randomly sampled firefly.
    fn seed_position(&self) -> Option<Vec<f64>> {
        None
    }

    /// Called at the end of each iteration with the best value so far.
    fn on_iteration(&self, _iteration: usize, _best_value: f64) {}
}

/// Adapts a closure into a [`FireflyProblem`].
pub struct FnProblem<F, E> {
    space: SearchSpace,
    objective: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> FnProblem<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E> + Send + Sync,
    E: fmt::Display + Send,
{
    pub fn new(space: SearchSpace, objective: F) -> Self {
        Self {
            space,
            objective,
            _error: PhantomData,
        }
    }
}

impl<F, E> FireflyProblem for FnProblem<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E> + Send + Sync,
    E: fmt::Display + Send,
{
    type Error = E;

    fn space(&self) -> &SearchSpace {
        &self.space
    }

    fn evaluate(&self, position: &[f64]) -> Result<f64, E> {
        (self.objective)(position)
    }
}
