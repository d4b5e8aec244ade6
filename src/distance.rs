//! Distance functions and the per-optimization distance matrix.
//!
//! [`DistanceFn`] is the seam between the engine and whatever estimates
//! travel distance: the geometric [`RoadDistance`](crate::geo::RoadDistance),
//! a precomputed table, or a caller closure wrapped with [`from_fn`].
//!
//! The search algorithms never call a `DistanceFn` directly. The optimizer
//! evaluates every ordered pair once into a [`DistanceMatrix`], so a failing
//! function fails the call before any search starts.

use crate::error::{DistanceError, OptimizeError, Result};
use crate::models::Stop;

/// Estimated travel distance in kilometers from one stop to another.
///
/// Implementations must accept any ordered pair at any time. Symmetry is
/// not assumed: the engine always evaluates in traversal direction.
pub trait DistanceFn {
    fn distance(&self, from: &Stop, to: &Stop) -> std::result::Result<f64, DistanceError>;

    /// Checks the model's own configuration before any distance is taken.
    ///
    /// The optimizer rejects a failing model as invalid input.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl<D: DistanceFn + ?Sized> DistanceFn for &D {
    fn distance(&self, from: &Stop, to: &Stop) -> std::result::Result<f64, DistanceError> {
        (**self).distance(from, to)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        (**self).validate()
    }
}

impl<D: DistanceFn + ?Sized> DistanceFn for Box<D> {
    fn distance(&self, from: &Stop, to: &Stop) -> std::result::Result<f64, DistanceError> {
        (**self).distance(from, to)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        (**self).validate()
    }
}

/// A [`DistanceFn`] backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FnDistance<F>(F);

/// Wraps a closure as a [`DistanceFn`].
///
/// # Examples
///
/// ```
/// use u_tour::distance::{from_fn, DistanceFn};
/// use u_tour::models::Stop;
///
/// let manhattan = from_fn(|a: &Stop, b: &Stop| Ok((a.lat - b.lat).abs() + (a.lng - b.lng).abs()));
/// let d = manhattan.distance(&Stop::new(0, 0.0, 0.0), &Stop::new(1, 1.0, 2.0)).unwrap();
/// assert_eq!(d, 3.0);
/// ```
pub fn from_fn<F>(f: F) -> FnDistance<F>
where
    F: Fn(&Stop, &Stop) -> std::result::Result<f64, DistanceError>,
{
    FnDistance(f)
}

impl<F> DistanceFn for FnDistance<F>
where
    F: Fn(&Stop, &Stop) -> std::result::Result<f64, DistanceError>,
{
    fn distance(&self, from: &Stop, to: &Stop) -> std::result::Result<f64, DistanceError> {
        (self.0)(from, to)
    }
}

/// Checks that a distance value is usable by the search.
pub(crate) fn check_value(d: f64) -> std::result::Result<f64, DistanceError> {
    if !d.is_finite() {
        Err(DistanceError::NonFinite)
    } else if d < 0.0 {
        Err(DistanceError::Negative(d))
    } else {
        Ok(d)
    }
}

/// Evaluates `distance(from, to)` and attributes a failure to the pair.
pub(crate) fn evaluate<D: DistanceFn + ?Sized>(distance: &D, from: &Stop, to: &Stop) -> Result<f64> {
    distance
        .distance(from, to)
        .and_then(check_value)
        .map_err(|source| OptimizeError::DistanceFunctionFailure {
            from: from.id.clone(),
            to: to.id.clone(),
            source,
        })
}

/// Dense `n × n` matrix of directed distances between stops.
///
/// Row `i`, column `j` holds the distance from stop `i` to stop `j` in input
/// order. The diagonal is zero and never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Evaluates `distance` on every ordered pair of distinct stops.
    ///
    /// Fails on the first pair whose distance errors, is not finite, or is
    /// negative.
    pub fn build<D: DistanceFn + ?Sized>(stops: &[Stop], distance: &D) -> Result<Self> {
        let n = stops.len();
        let mut data = vec![0.0; n * n];
        for (i, from) in stops.iter().enumerate() {
            for (j, to) in stops.iter().enumerate() {
                if i != j {
                    data[i * n + j] = evaluate(distance, from, to)?;
                }
            }
        }
        Ok(Self { n, data })
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Panics
    /// Panics if the rows do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            assert_eq!(row.len(), n, "distance matrix must be square");
            data.extend(row);
        }
        Self { n, data }
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance from stop `from` to stop `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }
}
