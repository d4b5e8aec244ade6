//! Open-path 2-opt with a fixed start.
//!
//! # Algorithm
//!
//! For every pair of positions `1 <= i < j <= n-1`, score the tour obtained
//! by reversing `tour[i..=j]`. After a full scan, apply the best reversal if
//! it lowers the cost by more than [`IMPROVEMENT_EPS`], then scan again.
//! Stop when a scan finds no improving reversal (best-improvement per pass).
//!
//! Position 0 is never part of a reversal, so the start stop stays in place.
//! The last position is free: the tour's destination can change.
//!
//! Candidates are scored by a full re-walk rather than an edge delta,
//! because the distance matrix may be asymmetric and reversing a segment
//! changes the direction of every leg inside it.
//!
//! # Complexity
//!
//! O(n²) candidates per pass, O(n) each: O(n³) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use log::trace;

use crate::cost::{apply_order, order_cost};
use crate::distance::{DistanceFn, DistanceMatrix};
use crate::error::Result;
use crate::models::Stop;

/// Minimum cost decrease for a reversal to count as an improvement.
pub const IMPROVEMENT_EPS: f64 = 1e-12;

/// Result of a 2-opt run.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoOptResult {
    /// The improved permutation.
    pub order: Vec<usize>,
    /// Cost of `order`.
    pub cost: f64,
    /// Number of reversals applied (one per improving pass).
    pub moves: usize,
}

/// Improves a permutation with 2-opt until no reversal helps.
///
/// # Examples
///
/// ```
/// use u_tour::distance::DistanceMatrix;
/// use u_tour::local_search::two_opt;
///
/// // Stops on a line at 0, 1, 2, 3 visited as 0, 2, 1, 3.
/// let pos = [0.0f64, 1.0, 2.0, 3.0];
/// let rows = pos.iter().map(|a| pos.iter().map(|b| (a - b).abs()).collect()).collect();
/// let m = DistanceMatrix::from_rows(rows);
///
/// let result = two_opt(&[0, 2, 1, 3], &m);
/// assert_eq!(result.order, vec![0, 1, 2, 3]);
/// assert_eq!(result.cost, 3.0);
/// ```
pub fn two_opt(order: &[usize], matrix: &DistanceMatrix) -> TwoOptResult {
    let n = order.len();
    let mut current = order.to_vec();
    let mut current_cost = order_cost(&current, matrix);
    let mut moves = 0;

    if n < 3 {
        return TwoOptResult {
            order: current,
            cost: current_cost,
            moves,
        };
    }

    loop {
        let mut best_move = None;
        let mut best_cost = current_cost;

        for i in 1..n - 1 {
            for j in i + 1..n {
                let cost = reversed_cost(&current, i, j, matrix);
                if cost < best_cost - IMPROVEMENT_EPS {
                    best_cost = cost;
                    best_move = Some((i, j));
                }
            }
        }

        let Some((i, j)) = best_move else { break };
        current[i..=j].reverse();
        current_cost = order_cost(&current, matrix);
        moves += 1;
        trace!("2-opt pass {moves}: reversed {i}..={j}, cost {current_cost:.6}");
    }

    TwoOptResult {
        order: current,
        cost: current_cost,
        moves,
    }
}

/// 2-opt over a tour of stops, evaluated with `distance`.
pub fn two_opt_tour<D: DistanceFn + ?Sized>(tour: &[Stop], distance: &D) -> Result<Vec<Stop>> {
    if tour.len() < 3 {
        return Ok(tour.to_vec());
    }
    let matrix = DistanceMatrix::build(tour, distance)?;
    let identity: Vec<usize> = (0..tour.len()).collect();
    Ok(apply_order(tour, &two_opt(&identity, &matrix).order))
}

/// Cost of `order` with `order[i..=j]` reversed, without materializing it.
///
/// Walks the legs in the same sequence as [`order_cost`] on the reversed
/// permutation, so both produce bit-identical sums.
fn reversed_cost(order: &[usize], i: usize, j: usize, matrix: &DistanceMatrix) -> f64 {
    let at = |k: usize| {
        if (i..=j).contains(&k) {
            order[i + j - k]
        } else {
            order[k]
        }
    };
    (1..order.len()).map(|k| matrix.get(at(k - 1), at(k))).sum()
}
