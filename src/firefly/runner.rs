//! Firefly execution loop.

use super::config::FireflyConfig;
use super::types::{FireflyProblem, FnProblem, SearchSpace};
use crate::error::{QnetError, Result};
use crate::random::rng_from;
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

/// Intensity assigned to a candidate whose evaluation failed.
///
/// Any feasible candidate scores lower, so a penalized firefly never becomes
/// the best unless every evaluation fails.
pub const PENALTY: f64 = 1e10;

/// Per-iteration population statistics. Index 0 is the initial population.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireflyHistory {
    /// Best intensity seen so far (non-increasing).
    pub best_values: Vec<f64>,
    /// Mean intensity of the current population.
    pub mean_values: Vec<f64>,
    /// Worst intensity of the current population.
    pub worst_values: Vec<f64>,
    /// Best position seen so far.
    pub best_solutions: Vec<Vec<f64>>,
}

impl FireflyHistory {
    fn record(&mut self, best_value: f64, best: &[f64], intensities: &[f64]) {
        let mean = intensities.iter().sum::<f64>() / intensities.len() as f64;
        let worst = intensities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        self.best_values.push(best_value);
        self.mean_values.push(mean);
        self.worst_values.push(worst);
        self.best_solutions.push(best.to_vec());
    }

    pub fn len(&self) -> usize {
        self.best_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_values.is_empty()
    }
}

/// Result of a Firefly run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireflyResult {
    /// Best position found. Always inside the search space.
    pub best: Vec<f64>,

    /// Intensity of the best position.
    pub best_value: f64,

    /// Number of completed iterations.
    pub iterations: usize,

    /// Evaluations that failed and were replaced by [`PENALTY`].
    pub failed_evaluations: usize,

    /// `iterations + 1` entries.
    pub history: FireflyHistory,
}

/// Executes the Firefly Algorithm.
///
/// Each iteration sweeps every ordered pair `(i, j)`: when `j` is brighter
/// (lower intensity) than `i`, firefly `i` moves towards `j` by
/// `beta_0·exp(−gamma·r²)·(x_j − x_i) + alpha·(U − 0.5)` and is then clipped
/// and rounded. Moves are applied in place, so later pairs see positions
/// already moved and repaired earlier in the same sweep, while intensities
/// stay those of the last evaluation. After the sweep the best of the last
/// evaluation takes an extra random step, and the population is
/// re-evaluated.
pub struct FireflyRunner;

impl FireflyRunner {
    /// Runs Firefly optimization with a generator seeded from `config.seed`.
    pub fn run<P: FireflyProblem>(problem: &P, config: &FireflyConfig) -> Result<FireflyResult> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Minimizes a closure over `space`.
    pub fn minimize<F, E>(
        space: SearchSpace,
        objective: F,
        config: &FireflyConfig,
    ) -> Result<FireflyResult>
    where
        F: Fn(&[f64]) -> std::result::Result<f64, E> + Send + Sync,
        E: fmt::Display + Send,
    {
        Self::run(&FnProblem::new(space, objective), config)
    }

    /// Runs Firefly optimization drawing every random number from `rng`.
    ///
    /// # Errors
    ///
    /// [`QnetError::InvalidConfig`] if the configuration or search space is
    /// invalid. Evaluation failures never abort the run.
    pub fn run_with_rng<P: FireflyProblem, R: Rng>(
        problem: &P,
        config: &FireflyConfig,
        rng: &mut R,
    ) -> Result<FireflyResult> {
        config.validate().map_err(QnetError::InvalidConfig)?;
        let space = problem.space();
        space.validate().map_err(QnetError::InvalidConfig)?;

        let dims = space.dimensions();
        let n = config.n_fireflies;

        info!(
            fireflies = n,
            dimensions = dims,
            iterations = config.max_iterations,
            "starting firefly search"
        );

        // Initialize
        let mut positions: Vec<Vec<f64>> = (0..n)
            .map(|_| {
                let mut x: Vec<f64> = (0..dims)
                    .map(|d| {
                        let (lo, hi) = (space.lower()[d], space.upper()[d]);
                        lo + (hi - lo) * rng.random::<f64>()
                    })
                    .collect();
                space.round_integers(&mut x);
                x
            })
            .collect();

        if let Some(mut seed) = problem.seed_position() {
            if seed.len() == dims {
                space.repair(&mut seed);
                positions[0] = seed;
            } else {
                warn!(
                    expected = dims,
                    got = seed.len(),
                    "ignoring seed position with wrong dimension"
                );
            }
        }

        let mut failed_evaluations = 0usize;
        let mut intensities =
            evaluate_population(problem, &positions, config.parallel, &mut failed_evaluations);

        let start = argmin(&intensities);
        let mut best = positions[start].clone();
        let mut best_value = intensities[start];

        let mut history = FireflyHistory::default();
        history.record(best_value, &best, &intensities);

        for iteration in 1..=config.max_iterations {
            attraction_sweep(&mut positions, &intensities, space, config, rng);

            // Extra random step for the best of the last evaluation.
            let leader = argmin(&intensities);
            for x in positions[leader].iter_mut() {
                *x += config.alpha * (rng.random::<f64>() - 0.5);
            }
            space.repair(&mut positions[leader]);

            intensities =
                evaluate_population(problem, &positions, config.parallel, &mut failed_evaluations);

            let current = argmin(&intensities);
            if intensities[current] < best_value {
                best_value = intensities[current];
                best = positions[current].clone();
            }

            history.record(best_value, &best, &intensities);
            problem.on_iteration(iteration, best_value);

            if iteration.is_multiple_of(10) {
                let mean_value = history.mean_values.last().copied().unwrap_or(best_value);
                debug!(iteration, best_value, mean_value, "firefly progress");
            }
        }

        info!(best_value, failed_evaluations, "firefly search finished");

        Ok(FireflyResult {
            best,
            best_value,
            iterations: config.max_iterations,
            failed_evaluations,
            history,
        })
    }
}

/// One pairwise attraction sweep, applied in place against stale intensities.
/// Each moved position is repaired before the next pair is considered.
pub(crate) fn attraction_sweep<R: Rng>(
    positions: &mut [Vec<f64>],
    intensities: &[f64],
    space: &SearchSpace,
    config: &FireflyConfig,
    rng: &mut R,
) {
    let n = positions.len();
    for i in 0..n {
        for j in 0..n {
            if i == j || intensities[j] >= intensities[i] {
                continue;
            }
            let r2: f64 = positions[i]
                .iter()
                .zip(&positions[j])
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            let beta = config.beta_0 * (-config.gamma * r2).exp();
            for d in 0..positions[i].len() {
                let step = beta * (positions[j][d] - positions[i][d])
                    + config.alpha * (rng.random::<f64>() - 0.5);
                positions[i][d] += step;
            }
            space.repair(&mut positions[i]);
        }
    }
}

/// Index of the smallest intensity; the first one on ties.
fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Evaluates every position, replacing failures and non-finite values with [`PENALTY`].
fn evaluate_population<P: FireflyProblem>(
    problem: &P,
    positions: &[Vec<f64>],
    parallel: bool,
    failed: &mut usize,
) -> Vec<f64> {
    evaluate_all(problem, positions, parallel)
        .into_iter()
        .enumerate()
        .map(|(i, outcome)| match outcome {
            Ok(value) if value.is_finite() => value,
            Ok(value) => {
                *failed += 1;
                warn!(firefly = i, value, "objective is not finite, applying penalty");
                PENALTY
            }
            Err(e) => {
                *failed += 1;
                warn!(firefly = i, error = %e, "objective evaluation failed, applying penalty");
                PENALTY
            }
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_all<P: FireflyProblem>(
    problem: &P,
    positions: &[Vec<f64>],
    parallel: bool,
) -> Vec<std::result::Result<f64, P::Error>> {
    if parallel {
        use rayon::prelude::*;
        positions.par_iter().map(|x| problem.evaluate(x)).collect()
    } else {
        positions.iter().map(|x| problem.evaluate(x)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: FireflyProblem>(
    problem: &P,
    positions: &[Vec<f64>],
    _parallel: bool,
) -> Vec<std::result::Result<f64, P::Error>> {
    positions.iter().map(|x| problem.evaluate(x)).collect()
}
