//! MVA recurrence.

use super::metrics::{DetailedReport, Metrics, OverallMetrics, PopulationStep, StationReport};
use crate::error::{QnetError, Result};
use crate::network::NetworkModel;

/// Solves closed queueing networks by Mean Value Analysis.
///
/// # Usage
///
/// ```
/// use u_qnet::mva::MvaSolver;
/// use u_qnet::network::{NetworkModel, NetworkParams};
///
/// let network = NetworkModel::new(NetworkParams::new(10, vec![2.0], vec![1])).unwrap();
/// let metrics = MvaSolver::solve(&network).unwrap();
/// assert!((metrics.mean_response_time - 5.0).abs() < 1e-12);
/// assert!((metrics.throughput - 2.0).abs() < 1e-12);
/// ```
pub struct MvaSolver;

impl MvaSolver {
    /// Computes mean performance measures at the network's full population.
    ///
    /// # Errors
    ///
    /// [`QnetError::InvalidServiceRate`] if any station has a non-positive or
    /// non-finite service rate.
    pub fn solve(network: &NetworkModel) -> Result<Metrics> {
        let (response_times, queue_lengths) = recurrence(network, |_| {})?;
        Ok(assemble(network, response_times, queue_lengths))
    }

    /// Like [`solve`](Self::solve), also returning every population level
    /// `n = 1..=N` of the recurrence.
    pub fn solve_trace(network: &NetworkModel) -> Result<(Metrics, Vec<PopulationStep>)> {
        let mut steps = Vec::with_capacity(network.num_customers() as usize);
        let (response_times, queue_lengths) = recurrence(network, |step| steps.push(step))?;
        Ok((assemble(network, response_times, queue_lengths), steps))
    }

    /// Solves the network and lays the result out per station.
    pub fn solve_detailed(network: &NetworkModel) -> Result<DetailedReport> {
        let metrics = Self::solve(network)?;

        let stations = (0..network.num_stations())
            .map(|i| StationReport {
                name: network.station_names()[i].clone(),
                id: i,
                num_servers: network.num_servers()[i],
                service_rate: network.service_rates()[i],
                visit_ratio: network.visit_ratios()[i],
                queue_length: metrics.queue_lengths[i],
                response_time: metrics.response_times[i],
                utilization: metrics.utilizations[i],
            })
            .collect();

        Ok(DetailedReport {
            overall: OverallMetrics {
                mean_response_time: metrics.mean_response_time,
                mean_queue_length: metrics.mean_queue_length,
                throughput: metrics.throughput,
                total_servers: metrics.total_servers,
            },
            stations,
        })
    }
}

/// Runs the recurrence up to the full population and returns `(R[N], Q[N])`.
///
/// `on_step` observes each population level in order.
fn recurrence<F>(network: &NetworkModel, mut on_step: F) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: FnMut(PopulationStep),
{
    let rates = network.service_rates();
    if let Some(station) = rates.iter().position(|&mu| !(mu.is_finite() && mu > 0.0)) {
        return Err(QnetError::InvalidServiceRate {
            station,
            rate: rates[station],
        });
    }

    let k = network.num_stations();
    let servers = network.num_servers();
    let e = network.visit_ratios();
    let service_times: Vec<f64> = rates.iter().map(|mu| 1.0 / mu).collect();

    let mut queue = vec![0.0; k];
    let mut response = vec![0.0; k];

    for n in 1..=network.num_customers() {
        for i in 0..k {
            response[i] = if servers[i] == 1 {
                service_times[i] * (1.0 + queue[i])
            } else {
                service_times[i] * (1.0 + queue[i] / servers[i] as f64)
            };
        }

        let mean_response: f64 = e.iter().zip(&response).map(|(e, r)| e * r).sum();
        let throughput = if mean_response > 0.0 {
            n as f64 / mean_response
        } else {
            0.0
        };

        for i in 0..k {
            queue[i] = throughput * e[i] * response[i];
        }

        on_step(PopulationStep {
            population: n,
            response_times: response.clone(),
            throughput,
            queue_lengths: queue.clone(),
        });
    }

    Ok((response, queue))
}

fn assemble(network: &NetworkModel, response_times: Vec<f64>, queue_lengths: Vec<f64>) -> Metrics {
    let e = network.visit_ratios();
    let servers = network.num_servers();
    let rates = network.service_rates();
    let population = network.num_customers();

    let mean_response_time: f64 = e.iter().zip(&response_times).map(|(e, r)| e * r).sum();
    let throughput = if mean_response_time > 0.0 {
        population as f64 / mean_response_time
    } else {
        0.0
    };
    let mean_queue_length: f64 = queue_lengths.iter().sum();

    let utilizations = (0..network.num_stations())
        .map(|i| {
            let capacity = servers[i] as f64 * rates[i];
            if capacity > 0.0 {
                (throughput * e[i] / capacity).min(1.0)
            } else {
                0.0
            }
        })
        .collect();

    Metrics {
        mean_response_time,
        mean_queue_length,
        queue_lengths,
        response_times,
        utilizations,
        throughput,
        total_servers: servers.iter().sum(),
        station_names: network.station_names().to_vec(),
        num_customers: population,
        total_service_rate: rates.iter().sum(),
        response_time_samples: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NetworkParams, NetworkUpdate};

    fn network(n: u32, rates: Vec<f64>, servers: Vec<u32>) -> NetworkModel {
        NetworkModel::new(NetworkParams::new(n, rates, servers)).unwrap()
    }

    #[test]
    fn test_single_station_golden() {
        // S = 0.5; Q(n) = n, R(n) = 0.5·n, X(n) = 2.
        let net = network(10, vec![2.0], vec![1]);
        let (metrics, steps) = MvaSolver::solve_trace(&net).unwrap();

        assert_eq!(steps.len(), 10);
        let first = &steps[0];
        assert_eq!(first.population, 1);
        assert!((first.response_times[0] - 0.5).abs() < 1e-12);
        assert!((first.throughput - 2.0).abs() < 1e-12);
        assert!((first.queue_lengths[0] - 1.0).abs() < 1e-12);

        for step in &steps {
            let n = step.population as f64;
            assert!((step.response_times[0] - 0.5 * n).abs() < 1e-12);
            assert!((step.queue_lengths[0] - n).abs() < 1e-12);
        }

        assert!((metrics.mean_response_time - 5.0).abs() < 1e-12);
        assert!((metrics.throughput - 2.0).abs() < 1e-12);
        assert!((metrics.mean_queue_length - 10.0).abs() < 1e-12);
        assert!((metrics.utilizations[0] - 1.0).abs() < 1e-12);
        assert_eq!(metrics.total_servers, 1);
    }

    #[test]
    fn test_deterministic() {
        let net = network(20, vec![5.0, 3.0, 4.0], vec![2, 2, 2]);
        let a = MvaSolver::solve(&net).unwrap();
        let b = MvaSolver::solve(&net).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_littles_law() {
        let net = network(20, vec![5.0, 3.0, 4.0], vec![2, 1, 3]);
        let m = MvaSolver::solve(&net).unwrap();
        let little = m.throughput * m.mean_response_time;
        assert!(
            (m.mean_queue_length - little).abs() < 1e-9,
            "L = {}, X·R = {}",
            m.mean_queue_length,
            little
        );
        // Closed network: every job is somewhere.
        assert!((m.mean_queue_length - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_station_monotone_in_population() {
        let mut previous = 0.0;
        for n in 1..=30 {
            let m = MvaSolver::solve(&network(n, vec![3.0], vec![1])).unwrap();
            assert!(m.mean_response_time >= previous);
            previous = m.mean_response_time;
        }
    }

    #[test]
    fn test_multi_server_branch() {
        // One customer never queues: R = S at every station.
        let net = network(1, vec![4.0, 2.0], vec![3, 1]);
        let m = MvaSolver::solve(&net).unwrap();
        assert!((m.response_times[0] - 0.25).abs() < 1e-12);
        assert!((m.response_times[1] - 0.5).abs() < 1e-12);

        // Two customers: second level divides the seen queue by m.
        let net = network(2, vec![4.0, 2.0], vec![3, 1]);
        let (_, steps) = MvaSolver::solve_trace(&net).unwrap();
        let q1 = &steps[0].queue_lengths;
        let r2 = &steps[1].response_times;
        assert!((r2[0] - 0.25 * (1.0 + q1[0] / 3.0)).abs() < 1e-12);
        assert!((r2[1] - 0.5 * (1.0 + q1[1])).abs() < 1e-12);
    }

    #[test]
    fn test_utilization_clamped() {
        let net = network(50, vec![1.0, 100.0], vec![1, 1]);
        let m = MvaSolver::solve(&net).unwrap();
        assert!(m.utilizations.iter().all(|u| (0.0..=1.0).contains(u)));
    }

    #[test]
    fn test_invalid_service_rate_propagates() {
        let mut net = network(5, vec![1.0, 2.0], vec![1, 1]);
        net.update_parameters(NetworkUpdate::new().with_service_rates(vec![1.0, -2.0]))
            .unwrap();
        let err = MvaSolver::solve(&net).unwrap_err();
        assert_eq!(
            err,
            QnetError::InvalidServiceRate {
                station: 1,
                rate: -2.0
            }
        );
    }

    #[test]
    fn test_config_round_trip_metrics() {
        let net = network(15, vec![5.0, 3.0, 4.0], vec![2, 1, 3]);
        let rebuilt = NetworkModel::from_config(&net.get_configuration()).unwrap();
        assert_eq!(
            MvaSolver::solve(&net).unwrap(),
            MvaSolver::solve(&rebuilt).unwrap()
        );
    }

    #[test]
    fn test_detailed_report() {
        let params = NetworkParams::new(10, vec![5.0, 3.0], vec![2, 1])
            .with_station_names(vec!["CPU".into(), "Disk".into()]);
        let net = NetworkModel::new(params).unwrap();
        let report = MvaSolver::solve_detailed(&net).unwrap();
        let metrics = MvaSolver::solve(&net).unwrap();

        assert_eq!(report.stations.len(), 2);
        assert_eq!(report.stations[1].name, "Disk");
        assert_eq!(report.stations[0].num_servers, 2);
        assert!((report.stations[1].queue_length - metrics.queue_lengths[1]).abs() < 1e-15);
        assert!((report.overall.throughput - metrics.throughput).abs() < 1e-15);
        assert_eq!(report.overall.total_servers, 3);
    }

    #[test]
    fn test_extras_for_objectives() {
        let net = network(7, vec![5.0, 3.0], vec![1, 1]);
        let m = MvaSolver::solve(&net).unwrap();
        assert_eq!(m.num_customers, 7);
        assert!((m.total_service_rate - 8.0).abs() < 1e-12);
        assert!(m.response_time_samples.is_none());
    }
}
