//! Sequential routed leg statistics with geometric fallback.

use log::{debug, warn};
use tokio::time::{sleep, timeout, Instant};

use super::{RouteError, RouteProvider, RoutedLeg, RoutingPolicy};
use crate::distance::{evaluate, DistanceFn};
use crate::error::{OptimizeError, Result};
use crate::legs::{LegAccumulator, LegSource, RouteLeg};
use crate::models::Stop;

/// Legs of `tour` with routed distances where the service answers.
///
/// Legs are requested one at a time in tour order. Each call is bounded by
/// `policy.timeout`, and consecutive calls start at least `policy.min_delay`
/// apart. Timeouts, errors, rate-limit rejections and unusable answers fall
/// back to `fallback` timed at the profile's average speed. Only a failure
/// of `fallback` itself is an error.
pub async fn routed_legs<P, D>(
    tour: &[Stop],
    provider: &P,
    fallback: &D,
    policy: &RoutingPolicy,
) -> Result<Vec<RouteLeg>>
where
    P: RouteProvider,
    D: DistanceFn + ?Sized,
{
    policy.validate().map_err(OptimizeError::InvalidInput)?;

    let profile = policy.profile.token();
    let mut acc = LegAccumulator::with_capacity(tour.len().saturating_sub(1));
    let mut last_call: Option<Instant> = None;

    for w in tour.windows(2) {
        let (from, to) = (&w[0], &w[1]);

        if let Some(last) = last_call {
            let elapsed = last.elapsed();
            if elapsed < policy.min_delay {
                sleep(policy.min_delay - elapsed).await;
            }
        }
        last_call = Some(Instant::now());

        let routed = match timeout(policy.timeout, provider.route(from, to, profile)).await {
            Ok(result) => result.and_then(check_leg),
            Err(_) => Err(RouteError::Timeout(policy.timeout)),
        };

        match routed {
            Ok(leg) => {
                debug!("routed {} -> {}: {:.3} km", from.id, to.id, leg.distance_km);
                acc.push(from, to, leg.distance_km, leg.duration_min, LegSource::Routed);
            }
            Err(e) => {
                warn!("routing {} -> {} failed ({e}), using estimate", from.id, to.id);
                let d = evaluate(fallback, from, to)?;
                acc.push(from, to, d, policy.profile.travel_minutes(d), LegSource::Estimated);
            }
        }
    }

    Ok(acc.finish())
}

fn check_leg(leg: RoutedLeg) -> std::result::Result<RoutedLeg, RouteError> {
    let usable = |v: f64| v.is_finite() && v >= 0.0;
    if usable(leg.distance_km) && usable(leg.duration_min) {
        Ok(leg)
    } else {
        Err(RouteError::InvalidResponse(format!(
            "distance {} km, duration {} min",
            leg.distance_km, leg.duration_min
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::distance::from_fn;
    use crate::error::DistanceError;
    use crate::legs::RouteSummary;
    use crate::models::TransportProfile;

    fn tour() -> Vec<Stop> {
        Stop::from_coords(&[(0.0, 0.0), (0.0, 10.0), (0.0, 20.0), (0.0, 30.0)])
    }

    fn linear() -> impl DistanceFn {
        from_fn(|a: &Stop, b: &Stop| Ok((b.lng - a.lng).abs()))
    }

    /// Answers every leg with a fixed route and records call instants.
    struct Fixed {
        calls: Mutex<Vec<Instant>>,
        profiles: Mutex<Vec<String>>,
    }

    impl Fixed {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                profiles: Mutex::new(Vec::new()),
            }
        }
    }

    impl RouteProvider for Fixed {
        fn route(
            &self,
            _from: &Stop,
            _to: &Stop,
            profile: &str,
        ) -> impl Future<Output = std::result::Result<RoutedLeg, RouteError>> + Send {
            self.calls.lock().unwrap().push(Instant::now());
            self.profiles.lock().unwrap().push(profile.to_string());
            async move {
                Ok(RoutedLeg {
                    distance_km: 12.0,
                    duration_min: 20.0,
                })
            }
        }
    }

    /// Fails every second call with the given error.
    struct Flaky {
        count: AtomicUsize,
        error: RouteError,
    }

    impl RouteProvider for Flaky {
        fn route(
            &self,
            _from: &Stop,
            _to: &Stop,
            _profile: &str,
        ) -> impl Future<Output = std::result::Result<RoutedLeg, RouteError>> + Send {
            let n = self.count.fetch_add(1, Ordering::Relaxed);
            let error = self.error.clone();
            async move {
                if n % 2 == 1 {
                    Err(error)
                } else {
                    Ok(RoutedLeg {
                        distance_km: 11.0,
                        duration_min: 15.0,
                    })
                }
            }
        }
    }

    /// Never answers within a minute.
    struct Slow;

    impl RouteProvider for Slow {
        fn route(
            &self,
            _from: &Stop,
            _to: &Stop,
            _profile: &str,
        ) -> impl Future<Output = std::result::Result<RoutedLeg, RouteError>> + Send {
            async move {
                sleep(Duration::from_secs(60)).await;
                Ok(RoutedLeg {
                    distance_km: 1.0,
                    duration_min: 1.0,
                })
            }
        }
    }

    /// Answers with a negative distance.
    struct Garbage;

    impl RouteProvider for Garbage {
        fn route(
            &self,
            _from: &Stop,
            _to: &Stop,
            _profile: &str,
        ) -> impl Future<Output = std::result::Result<RoutedLeg, RouteError>> + Send {
            async move {
                Ok(RoutedLeg {
                    distance_km: -3.0,
                    duration_min: f64::NAN,
                })
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_legs_routed() {
        let provider = Fixed::new();
        let policy = RoutingPolicy::default().with_profile(TransportProfile::FootWalking);

        let legs = routed_legs(&tour(), &provider, &linear(), &policy).await.unwrap();

        assert_eq!(legs.len(), 3);
        assert!(legs.iter().all(|l| l.source == LegSource::Routed));
        assert_eq!(legs[2].cumulative_distance_km, 36.0);
        assert_eq!(legs[2].cumulative_time_min, 60.0);
        let profiles = provider.profiles.lock().unwrap();
        assert!(profiles.iter().all(|p| p == "foot-walking"));

        let summary = RouteSummary::from_legs(4, &legs);
        assert_eq!(summary.routed_legs, 3);
        assert_eq!(summary.hours_minutes(), (1, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced() {
        let provider = Fixed::new();
        let policy = RoutingPolicy::default().with_min_delay(Duration::from_millis(500));

        routed_legs(&tour(), &provider, &linear(), &policy).await.unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(500),
                "calls only {:?} apart",
                pair[1] - pair[0]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_fall_back_to_estimate() {
        for error in [
            RouteError::Unavailable,
            RouteError::RateLimited,
            RouteError::Transport("connection reset".into()),
        ] {
            let provider = Flaky {
                count: AtomicUsize::new(0),
                error,
            };
            let policy = RoutingPolicy::default();

            let legs = routed_legs(&tour(), &provider, &linear(), &policy).await.unwrap();

            assert_eq!(legs[0].source, LegSource::Routed);
            assert_eq!(legs[0].distance_km, 11.0);
            assert_eq!(legs[1].source, LegSource::Estimated);
            assert_eq!(legs[1].distance_km, 10.0);
            assert!((legs[1].time_min - 20.0).abs() < 1e-12);
            assert_eq!(legs[2].source, LegSource::Routed);
            assert_eq!(legs[2].cumulative_distance_km, 32.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let policy = RoutingPolicy::default()
            .with_timeout(Duration::from_secs(2))
            .with_min_delay(Duration::ZERO);
        let started = Instant::now();

        let legs = routed_legs(&tour(), &Slow, &linear(), &policy).await.unwrap();

        assert!(legs.iter().all(|l| l.source == LegSource::Estimated));
        assert_eq!(legs[2].cumulative_distance_km, 30.0);
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unusable_answer_falls_back() {
        let legs = routed_legs(&tour(), &Garbage, &linear(), &RoutingPolicy::default())
            .await
            .unwrap();
        assert!(legs.iter().all(|l| l.source == LegSource::Estimated));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_failure_is_error() {
        let provider = Flaky {
            count: AtomicUsize::new(0),
            error: RouteError::Unavailable,
        };
        let broken = from_fn(|_: &Stop, _: &Stop| Err(DistanceError::failed("no estimate")));

        let result = routed_legs(&tour(), &provider, &broken, &RoutingPolicy::default()).await;

        assert!(matches!(result, Err(OptimizeError::DistanceFunctionFailure { .. })));
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let policy = RoutingPolicy::default().with_timeout(Duration::ZERO);
        let result = routed_legs(&tour(), &Fixed::new(), &linear(), &policy).await;
        assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
    }
}
