//! Derived SLA metric arithmetic.
//!
//! Every ratio here is guarded against empty inputs and clamped so results
//! stay finite.

use crate::sla::agreement::SlaConfiguration;

/// Counters and samples copied out of a tier for recomputation.
#[derive(Clone, Debug, Default)]
pub struct CounterSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub samples: Vec<f64>,
    pub previous_availability: f64,
}

/// Result of one recompute pass for a tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalculatedMetrics {
    pub availability: f64,
    pub response_time: f64,
    pub error_budget_remaining: f64,
    pub burn_rate: f64,
}

/// Fraction of successful requests, or `previous` when nothing was recorded.
pub fn availability(successful: u64, total: u64, previous: f64) -> f64 {
    if total == 0 {
        return previous;
    }
    (successful as f64 / total as f64).clamp(0.0, 1.0)
}

/// Arithmetic mean of samples, 0 when empty.
pub fn mean_response_time(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Fraction of the error budget not yet consumed.
///
/// 1.0 means nothing consumed, 0.0 means observed unavailability meets or
/// exceeds what the target allows.
pub fn error_budget_remaining(target: f64, current: f64) -> f64 {
    let max_gap = 1.0 - target;
    if max_gap <= 0.0 {
        return 1.0;
    }
    let gap = target - current;
    (1.0 - gap / max_gap).clamp(0.0, 1.0)
}

/// Observed error rate relative to the sustainable rate.
///
/// Instantaneous ratio over all counted requests; it is not normalised by
/// elapsed time within the error budget period.
pub fn burn_rate(failed: u64, total: u64, target: f64) -> f64 {
    let error_rate = if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64
    };
    let allowable = 1.0 - target;
    if allowable <= 0.0 {
        return 0.0;
    }
    error_rate / allowable
}

/// Compute all derived metrics for one tier.
pub fn calculate(snapshot: &CounterSnapshot, config: &SlaConfiguration) -> CalculatedMetrics {
    let target = config.availability_target;
    let availability = availability(
        snapshot.successful_requests,
        snapshot.total_requests,
        snapshot.previous_availability,
    );

    CalculatedMetrics {
        availability,
        response_time: mean_response_time(&snapshot.samples),
        error_budget_remaining: error_budget_remaining(target, availability),
        burn_rate: burn_rate(snapshot.failed_requests, snapshot.total_requests, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_availability_keeps_previous_without_requests() {
        assert_eq!(availability(0, 0, 1.0), 1.0);
        assert_eq!(availability(0, 0, 0.97), 0.97);
        assert!((availability(98, 100, 1.0) - 0.98).abs() < EPS);
    }

    #[test]
    fn test_mean_response_time() {
        assert_eq!(mean_response_time(&[]), 0.0);
        assert!((mean_response_time(&[0.1, 0.2, 0.3]) - 0.2).abs() < EPS);
    }

    #[test]
    fn test_error_budget_examples() {
        assert!((error_budget_remaining(0.995, 0.995) - 1.0).abs() < EPS);
        assert!(error_budget_remaining(0.995, 0.99).abs() < EPS);
        assert!((error_budget_remaining(0.99, 0.995) - 1.0).abs() < EPS);
        assert_eq!(error_budget_remaining(0.99, 0.5), 0.0);
        assert!((error_budget_remaining(0.99, 0.985) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_error_budget_perfect_target() {
        assert_eq!(error_budget_remaining(1.0, 0.4), 1.0);
    }

    #[test]
    fn test_burn_rate_example() {
        // 2 failures in 100 against a 1% allowance burns twice as fast.
        assert!((burn_rate(2, 100, 0.99) - 2.0).abs() < 1e-6);
        assert!((burn_rate(1, 100, 0.99) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_burn_rate_guards() {
        assert_eq!(burn_rate(0, 0, 0.99), 0.0);
        assert_eq!(burn_rate(5, 10, 1.0), 0.0);
    }

    #[test]
    fn test_calculate() {
        let config = SlaConfiguration::new(0.99, 1.0);
        let snapshot = CounterSnapshot {
            total_requests: 100,
            successful_requests: 98,
            failed_requests: 2,
            samples: vec![0.5, 1.5],
            previous_availability: 1.0,
        };

        let result = calculate(&snapshot, &config);
        assert!((result.availability - 0.98).abs() < EPS);
        assert!((result.response_time - 1.0).abs() < EPS);
        assert_eq!(result.error_budget_remaining, 0.0);
        assert!((result.burn_rate - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_results_always_finite_and_bounded() {
        let targets = [0.5, 0.9, 0.99, 0.999, 1.0];
        for &target in &targets {
            let config = SlaConfiguration::new(target, 1.0);
            for total in [0u64, 1, 7, 1000] {
                for failed in [0u64, total / 2, total] {
                    let snapshot = CounterSnapshot {
                        total_requests: total,
                        successful_requests: total - failed,
                        failed_requests: failed,
                        samples: Vec::new(),
                        previous_availability: 1.0,
                    };
                    let r = calculate(&snapshot, &config);
                    assert!((0.0..=1.0).contains(&r.availability));
                    assert!((0.0..=1.0).contains(&r.error_budget_remaining));
                    assert!(r.burn_rate.is_finite() && r.burn_rate >= 0.0);
                    assert_eq!(r.response_time, 0.0);
                }
            }
        }
    }
}
