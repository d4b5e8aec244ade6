//! Property tests over random stop sets.

use proptest::prelude::*;
use u_tour::constructive::nearest_neighbor;
use u_tour::cost::{order_cost, total_cost};
use u_tour::distance::DistanceMatrix;
use u_tour::exact::solve_exact;
use u_tour::geo::{haversine_km, LatLng, RoadDistance, RoadFactorPolicy};
use u_tour::local_search::two_opt;
use u_tour::models::{Stop, Strategy as TourStrategy, StrategyHint};
use u_tour::optimizer::{OptimizeRequest, OptimizerConfig, RouteOptimizer};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stops_strategy(max: usize) -> impl Strategy<Value = Vec<Stop>> {
    prop::collection::vec((-34.8_f64..-34.4, -58.6_f64..-58.2), 0..max)
        .prop_map(|coords| Stop::from_coords(&coords))
}

fn hint_strategy() -> impl Strategy<Value = StrategyHint> {
    prop_oneof![
        Just(StrategyHint::Auto),
        Just(StrategyHint::NearestNeighborOnly),
        Just(StrategyHint::EvolutionaryOnly),
    ]
}

fn ids(tour: &[Stop]) -> Vec<String> {
    let mut ids: Vec<String> = tour.iter().map(|s| s.id.to_string()).collect();
    ids.sort();
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every strategy returns a permutation of the input with the start fixed.
    #[test]
    fn prop_tour_is_permutation_with_fixed_start(
        stops in stops_strategy(16),
        hint in hint_strategy(),
    ) {
        init_logging();
        let distance = RoadDistance::default();
        let result = RouteOptimizer::default()
            .optimize(&OptimizeRequest::new(&stops, &distance).with_hint(hint))
            .unwrap();

        prop_assert_eq!(result.len(), stops.len());
        prop_assert_eq!(ids(result.tour()), ids(&stops));
        if let Some(first) = stops.first() {
            prop_assert_eq!(&result.tour()[0], first);
        }
    }

    /// The reported cost is the cost of walking the returned tour.
    #[test]
    fn prop_reported_cost_matches_tour(stops in stops_strategy(14), hint in hint_strategy()) {
        let distance = RoadDistance::default();
        let result = RouteOptimizer::default()
            .optimize(&OptimizeRequest::new(&stops, &distance).with_hint(hint))
            .unwrap();
        let walked = total_cost(result.tour(), &distance).unwrap();
        prop_assert!((walked - result.cost_km()).abs() < 1e-9);
    }

    /// 2-opt never makes a tour worse and is idempotent.
    #[test]
    fn prop_two_opt_monotone_and_idempotent(stops in stops_strategy(14)) {
        let m = DistanceMatrix::build(&stops, &RoadDistance::default()).unwrap();
        let initial: Vec<usize> = (0..stops.len()).collect();

        let first = two_opt(&initial, &m);
        prop_assert!(first.cost <= order_cost(&initial, &m));

        let second = two_opt(&first.order, &m);
        prop_assert_eq!(second.moves, 0);
        prop_assert_eq!(second.order, first.order);
    }

    /// Exhaustive search is never beaten by the heuristic pipeline.
    #[test]
    fn prop_exact_is_lower_bound(stops in stops_strategy(9)) {
        let m = DistanceMatrix::build(&stops, &RoadDistance::default()).unwrap();
        let exact = order_cost(&solve_exact(&m), &m);
        let heuristic = two_opt(&nearest_neighbor(&m), &m).cost;
        prop_assert!(exact <= heuristic + 1e-9);
    }

    /// Auto picks exact search exactly up to the cap.
    #[test]
    fn prop_auto_switches_at_cap(stops in stops_strategy(12), cap in 2_usize..9) {
        let distance = RoadDistance::default();
        let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_exact_cap(cap));
        let result = optimizer.optimize(&OptimizeRequest::new(&stops, &distance)).unwrap();

        let expected = match stops.len() {
            0 | 1 => TourStrategy::Trivial,
            n if n <= cap => TourStrategy::Exact,
            _ => TourStrategy::NearestNeighbor,
        };
        prop_assert_eq!(result.strategy(), expected);
    }

    /// A fixed seed reproduces the evolutionary tour.
    #[test]
    fn prop_seeded_evolution_is_deterministic(stops in stops_strategy(14), seed in any::<u64>()) {
        let distance = RoadDistance::default();
        let optimizer = RouteOptimizer::new(OptimizerConfig::default().with_seed(seed));
        let request = OptimizeRequest::new(&stops, &distance).with_hint(StrategyHint::EvolutionaryOnly);

        let a = optimizer.optimize(&request).unwrap();
        let b = optimizer.optimize(&request).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Great-circle distance is a symmetric non-negative measure.
    #[test]
    fn prop_haversine_symmetric(
        a in (-90.0_f64..90.0, -180.0_f64..180.0),
        b in (-90.0_f64..90.0, -180.0_f64..180.0),
    ) {
        let a = LatLng::new(a.0, a.1);
        let b = LatLng::new(b.0, b.1);
        let ab = haversine_km(a, b);
        prop_assert!(ab >= 0.0);
        prop_assert!(ab <= std::f64::consts::PI * 6371.0 + 1e-6);
        prop_assert!((ab - haversine_km(b, a)).abs() < 1e-9);
        prop_assert_eq!(haversine_km(a, a), 0.0);
    }

    /// Road estimates are never shorter than the straight line.
    #[test]
    fn prop_road_distance_at_least_straight(
        a in (-35.0_f64..-34.0, -59.0_f64..-58.0),
        b in (-35.0_f64..-34.0, -59.0_f64..-58.0),
    ) {
        let a = Stop::new(0, a.0, a.1);
        let b = Stop::new(1, b.0, b.1);
        let straight = haversine_km((&a).into(), (&b).into());
        for policy in [RoadFactorPolicy::urban_default(), RoadFactorPolicy::buenos_aires()] {
            let road = RoadDistance::new(policy).estimated_distance(&a, &b);
            prop_assert!(road >= straight);
        }
    }
}
