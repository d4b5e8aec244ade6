//! Exhaustive search for small instances.
//!
//! Enumerates all `(n-1)!` orderings of stops `1..n` behind the fixed start
//! stop 0, in lexicographic order, and keeps the cheapest. Ties keep the
//! first ordering enumerated.
//!
//! The solver itself has no size limit; [`DEFAULT_EXACT_CAP`] is enforced by
//! the optimizer.
//!
//! # Complexity
//!
//! O(n! · n) time, O(n) space

use crate::cost::{apply_order, order_cost};
use crate::distance::{DistanceFn, DistanceMatrix};
use crate::error::Result;
use crate::models::Stop;

/// Largest instance solved exhaustively by default: 7! = 5040 orderings.
pub const DEFAULT_EXACT_CAP: usize = 8;

/// Minimum-cost permutation of `0..n` with 0 fixed first.
pub fn solve_exact(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut perm: Vec<usize> = (0..n).collect();
    if n <= 2 {
        return perm;
    }

    let mut best = perm.clone();
    let mut best_cost = order_cost(&perm, matrix);

    while next_permutation(&mut perm[1..]) {
        let cost = order_cost(&perm, matrix);
        if cost < best_cost {
            best_cost = cost;
            best.copy_from_slice(&perm);
        }
    }

    best
}

/// Exact tour over stops, evaluated with `distance`.
pub fn exact_tour<D: DistanceFn + ?Sized>(stops: &[Stop], distance: &D) -> Result<Vec<Stop>> {
    if stops.len() <= 1 {
        return Ok(stops.to_vec());
    }
    let matrix = DistanceMatrix::build(stops, distance)?;
    Ok(apply_order(stops, &solve_exact(&matrix)))
}

/// Rearranges `items` into the next lexicographic permutation.
///
/// Returns `false` (leaving `items` sorted descending) when `items` is
/// already the last permutation.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..items.len())
        .rev()
        .find(|&j| items[j] > items[pivot])
        .unwrap_or(pivot + 1);
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}
