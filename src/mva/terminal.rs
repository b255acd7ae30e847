//! Closed terminal model: one service station plus a think-time delay.
//!
//! `N` users alternate between thinking for a mean time `Z` and submitting a
//! job to a single server with rate `mu`:
//!
//! ```text
//! L(0) = 0
//! R(n) = S·(1 + L(n-1))
//! X(n) = n / (Z + R(n))
//! L(n) = X(n)·R(n)
//! ```

use crate::error::{QnetError, Result};

/// Performance of a terminal system at its full population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalMetrics {
    /// Mean response time at the server (excluding think time).
    pub response_time: f64,
    /// System throughput.
    pub throughput: f64,
    /// Mean number of jobs at the server.
    pub queue_length: f64,
}

/// Solves the terminal model for `num_users` users.
///
/// # Errors
///
/// - [`QnetError::InvalidNetworkParameters`] if `num_users` is 0 or the
///   think time is negative or non-finite.
/// - [`QnetError::InvalidServiceRate`] if `service_rate` is not positive.
///
/// # Examples
///
/// Choosing the user count and service rate that maximize profit, with the
/// user count as an integer dimension:
///
/// ```
/// use u_qnet::firefly::{FireflyConfig, FireflyRunner, SearchSpace};
/// use u_qnet::mva::terminal::solve_terminal;
///
/// let space = SearchSpace::new().add_integer(1, 50).add_continuous(0.5, 5.0);
/// let config = FireflyConfig::default().with_max_iterations(20).with_seed(1);
///
/// // Revenue 10 per completed job, cost 2 per unit of rate and 0.5 per user.
/// let result = FireflyRunner::minimize(
///     space,
///     |x: &[f64]| {
///         let m = solve_terminal(x[0] as u32, x[1], 5.0)?;
///         Ok::<f64, u_qnet::QnetError>(-(10.0 * m.throughput - 2.0 * x[1] - 0.5 * x[0]))
///     },
///     &config,
/// )
/// .unwrap();
///
/// let users = result.best[0];
/// assert!((1.0..=50.0).contains(&users) && users.fract() == 0.0);
/// assert!((0.5..=5.0).contains(&result.best[1]));
/// assert_eq!(result.failed_evaluations, 0);
/// assert!(result.best_value.is_finite());
/// ```
pub fn solve_terminal(num_users: u32, service_rate: f64, think_time: f64) -> Result<TerminalMetrics> {
    if num_users == 0 {
        return Err(QnetError::InvalidNetworkParameters(
            "terminal model needs at least one user".into(),
        ));
    }
    if !(service_rate.is_finite() && service_rate > 0.0) {
        return Err(QnetError::InvalidServiceRate {
            station: 0,
            rate: service_rate,
        });
    }
    if !(think_time.is_finite() && think_time >= 0.0) {
        return Err(QnetError::InvalidNetworkParameters(format!(
            "think time must be non-negative, got {think_time}"
        )));
    }

    let service_time = 1.0 / service_rate;
    let mut queue = 0.0;
    let mut response = 0.0;
    let mut throughput = 0.0;

    for n in 1..=num_users {
        response = service_time * (1.0 + queue);
        throughput = n as f64 / (think_time + response);
        queue = throughput * response;
    }

    Ok(TerminalMetrics {
        response_time: response,
        throughput,
        queue_length: queue,
    })
}
