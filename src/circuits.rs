//! Named stop sets with a current selection.
//!
//! A [`CircuitStore`] is owned by the application and passed explicitly to
//! whatever edits or optimizes it. Each circuit keeps at most one
//! optimization result; any edit of its stops discards that result.

use log::debug;

use crate::distance::DistanceFn;
use crate::error::{CircuitError, Result as OptimizeResult};
use crate::models::{OptimizationResult, Stop, StrategyHint};
use crate::optimizer::{OptimizeRequest, RouteOptimizer};

/// Name given to the circuit a new store starts with.
pub const DEFAULT_CIRCUIT_NAME: &str = "Circuit 1";

/// Most stops one circuit accepts.
pub const MAX_STOPS_PER_CIRCUIT: usize = 40;

/// One named stop set and its last optimization result.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    name: String,
    stops: Vec<Stop>,
    result: Option<OptimizationResult>,
}

impl Circuit {
    fn new(name: String) -> Self {
        Self {
            name,
            stops: Vec::new(),
            result: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The stored result, if the stops have not changed since it was made.
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }
}

/// Circuits in insertion order with one of them selected.
///
/// Never empty.
///
/// # Examples
///
/// ```
/// use u_tour::circuits::CircuitStore;
/// use u_tour::models::Stop;
///
/// let mut store = CircuitStore::new();
/// store.add_circuit("Norte").unwrap();
/// store.add_stop(Stop::new(0, -34.60, -58.38)).unwrap();
///
/// assert_eq!(store.current().name(), "Norte");
/// assert_eq!(store.current().stops().len(), 1);
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitStore {
    circuits: Vec<Circuit>,
    current: usize,
}

impl Default for CircuitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitStore {
    /// A store holding one empty circuit named [`DEFAULT_CIRCUIT_NAME`].
    pub fn new() -> Self {
        Self {
            circuits: vec![Circuit::new(DEFAULT_CIRCUIT_NAME.to_string())],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// A store always holds at least one circuit, so this is `false`.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.circuits.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Circuit> {
        self.circuits.iter().find(|c| c.name == name)
    }

    pub fn current(&self) -> &Circuit {
        &self.circuits[self.current]
    }

    fn current_mut(&mut self) -> &mut Circuit {
        &mut self.circuits[self.current]
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.circuits.iter().position(|c| c.name == name)
    }

    /// Adds an empty circuit and selects it.
    ///
    /// The name is trimmed; empty and duplicate names are rejected.
    pub fn add_circuit(&mut self, name: &str) -> Result<(), CircuitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CircuitError::EmptyName);
        }
        if self.position(name).is_some() {
            return Err(CircuitError::DuplicateName(name.to_string()));
        }
        self.circuits.push(Circuit::new(name.to_string()));
        self.current = self.circuits.len() - 1;
        debug!("added circuit {name:?}");
        Ok(())
    }

    /// Deletes the selected circuit and selects the first remaining one.
    pub fn delete_current(&mut self) -> Result<Circuit, CircuitError> {
        if self.circuits.len() == 1 {
            return Err(CircuitError::LastCircuit);
        }
        let removed = self.circuits.remove(self.current);
        self.current = 0;
        debug!("deleted circuit {:?}", removed.name);
        Ok(removed)
    }

    pub fn switch_to(&mut self, name: &str) -> Result<(), CircuitError> {
        self.current = self
            .position(name)
            .ok_or_else(|| CircuitError::UnknownCircuit(name.to_string()))?;
        Ok(())
    }

    /// Appends a stop to the selected circuit.
    pub fn add_stop(&mut self, stop: Stop) -> Result<(), CircuitError> {
        let circuit = self.current_mut();
        if circuit.stops.len() >= MAX_STOPS_PER_CIRCUIT {
            return Err(CircuitError::CircuitFull {
                cap: MAX_STOPS_PER_CIRCUIT,
            });
        }
        circuit.stops.push(stop);
        circuit.result = None;
        Ok(())
    }

    /// Removes the stop at `index` from the selected circuit.
    pub fn remove_stop(&mut self, index: usize) -> Result<Stop, CircuitError> {
        let circuit = self.current_mut();
        let len = circuit.stops.len();
        if index >= len {
            return Err(CircuitError::StopOutOfRange { index, len });
        }
        circuit.result = None;
        Ok(circuit.stops.remove(index))
    }

    pub fn clear_stops(&mut self) {
        let circuit = self.current_mut();
        circuit.stops.clear();
        circuit.result = None;
    }

    /// Optimizes the selected circuit and stores the result in place of
    /// any previous one.
    ///
    /// On error the previously stored result is left untouched.
    pub fn optimize_current<D: DistanceFn + ?Sized>(
        &mut self,
        optimizer: &RouteOptimizer,
        distance: &D,
        hint: StrategyHint,
    ) -> OptimizeResult<&OptimizationResult> {
        let circuit = &mut self.circuits[self.current];
        let request = OptimizeRequest::new(&circuit.stops, distance).with_hint(hint);
        let result = optimizer.optimize(&request)?;
        debug!(
            "circuit {:?}: {} stops, {:.3} km",
            circuit.name,
            result.len(),
            result.cost_km()
        );
        Ok(circuit.result.insert(result))
    }

    /// Result stored for the selected circuit.
    pub fn last_result(&self) -> Option<&OptimizationResult> {
        self.current().result()
    }
}
