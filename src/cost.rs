//! Tour cost.
//!
//! The cost of an open tour is the sum of its consecutive directed legs.
//! There is no closing leg from the last stop back to the first.

use crate::distance::{evaluate, DistanceFn, DistanceMatrix};
use crate::error::Result;
use crate::models::Stop;

/// Total cost of a tour of stops under `distance`.
///
/// Tours of length 0 or 1 cost 0. Each leg is evaluated in traversal
/// direction, `distance(tour[i], tour[i + 1])`.
///
/// # Examples
///
/// ```
/// use u_tour::cost::total_cost;
/// use u_tour::distance::from_fn;
/// use u_tour::models::Stop;
///
/// let stops = Stop::from_coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
/// let planar = from_fn(|a: &Stop, b: &Stop| Ok(((a.lat - b.lat).powi(2) + (a.lng - b.lng).powi(2)).sqrt()));
/// assert_eq!(total_cost(&stops, &planar).unwrap(), 2.0);
/// ```
pub fn total_cost<D: DistanceFn + ?Sized>(tour: &[Stop], distance: &D) -> Result<f64> {
    tour.windows(2)
        .map(|w| evaluate(distance, &w[0], &w[1]))
        .sum()
}

/// Cost of a permutation of stop indices under a distance matrix.
pub fn order_cost(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    order.windows(2).map(|w| matrix.get(w[0], w[1])).sum()
}

/// Materializes a permutation of indices into the corresponding stops.
pub(crate) fn apply_order(stops: &[Stop], order: &[usize]) -> Vec<Stop> {
    order.iter().map(|&i| stops[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::from_fn;
    use crate::error::{DistanceError, OptimizeError};

    #[test]
    fn test_short_tours_cost_zero() {
        let never = from_fn(|_: &Stop, _: &Stop| Err(DistanceError::failed("unused")));
        assert_eq!(total_cost(&[], &never).unwrap(), 0.0);
        assert_eq!(total_cost(&[Stop::new(0, 1.0, 1.0)], &never).unwrap(), 0.0);
    }

    #[test]
    fn test_traversal_direction() {
        // Eastbound legs cost double.
        let one_way = from_fn(|a: &Stop, b: &Stop| {
            let d = (b.lng - a.lng).abs();
            Ok(if b.lng > a.lng { 2.0 * d } else { d })
        });
        let east = Stop::from_coords(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
        let west: Vec<Stop> = east.iter().rev().cloned().collect();

        assert_eq!(total_cost(&east, &one_way).unwrap(), 4.0);
        assert_eq!(total_cost(&west, &one_way).unwrap(), 2.0);
    }

    #[test]
    fn test_failure_is_propagated() {
        let broken = from_fn(|_: &Stop, _: &Stop| Err(DistanceError::failed("offline")));
        let stops = Stop::from_coords(&[(0.0, 0.0), (0.0, 1.0)]);
        assert!(matches!(
            total_cost(&stops, &broken),
            Err(OptimizeError::DistanceFunctionFailure { .. })
        ));
    }

    #[test]
    fn test_order_cost_matches_matrix() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 9.0],
            vec![1.0, 0.0, 2.0],
            vec![9.0, 7.0, 0.0],
        ]);
        assert_eq!(order_cost(&[0, 1, 2], &m), 3.0);
        assert_eq!(order_cost(&[0, 2, 1], &m), 16.0);
        assert_eq!(order_cost(&[2], &m), 0.0);
    }

    #[test]
    fn test_apply_order() {
        let stops = Stop::from_coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let tour = apply_order(&stops, &[2, 0, 1]);
        assert_eq!(tour[0], stops[2]);
        assert_eq!(tour[2], stops[1]);
    }
}
