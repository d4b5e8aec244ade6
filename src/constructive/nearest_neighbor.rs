//! Nearest-neighbor tour construction.
//!
//! # Algorithm
//!
//! 1. Start at stop 0 (the caller's first stop, not an optimized choice)
//! 2. Move to the closest unvisited stop, `d(current, candidate)`
//! 3. Repeat until every stop is visited
//!
//! Ties go to the candidate found first in a left-to-right scan.
//!
//! # Complexity
//!
//! O(n²)

use crate::cost::apply_order;
use crate::distance::{DistanceFn, DistanceMatrix};
use crate::error::Result;
use crate::models::Stop;

/// Nearest-neighbor permutation of `0..n`, starting at 0.
pub fn nearest_neighbor(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let d = matrix.get(current, candidate);
            let closer = match best {
                Some((_, best_d)) => d < best_d,
                None => true,
            };
            if closer {
                best = Some((candidate, d));
            }
        }
        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Nearest-neighbor tour over stops, evaluated with `distance`.
///
/// # Examples
///
/// ```
/// use u_tour::constructive::nearest_neighbor_tour;
/// use u_tour::geo::RoadDistance;
/// use u_tour::models::Stop;
///
/// let stops = Stop::from_coords(&[(0.0, 0.0), (0.0, 3.0), (0.0, 1.0)]);
/// let tour = nearest_neighbor_tour(&stops, &RoadDistance::straight_line()).unwrap();
/// let lngs: Vec<f64> = tour.iter().map(|s| s.lng).collect();
/// assert_eq!(lngs, vec![0.0, 1.0, 3.0]);
/// ```
pub fn nearest_neighbor_tour<D: DistanceFn + ?Sized>(stops: &[Stop], distance: &D) -> Result<Vec<Stop>> {
    if stops.len() <= 1 {
        return Ok(stops.to_vec());
    }
    let matrix = DistanceMatrix::build(stops, distance)?;
    Ok(apply_order(stops, &nearest_neighbor(&matrix)))
}
