//! Edge weighting.
//!
//! A weigher maps an edge to a non-negative cost. It must be pure: the same
//! edge always yields the same cost, and weighing has no side effects.
//! Searches that receive no weigher use `UnitWeight`.
//!
//! Negative weights are not supported. Dijkstra assumes them away and will
//! report arbitrary results if one is returned.

/// Edge cost function.
pub trait EdgeWeigher<E> {
    fn weight(&self, edge: &E) -> f64;
}

/// Constant cost of 1.0 per edge (hop count).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitWeight;

impl<E> EdgeWeigher<E> for UnitWeight {
    fn weight(&self, _edge: &E) -> f64 {
        1.0
    }
}

impl<E, F> EdgeWeigher<E> for F
where
    F: Fn(&E) -> f64,
{
    fn weight(&self, edge: &E) -> f64 {
        self(edge)
    }
}

/// Weigh `edge` with `weigher`, or 1.0 when none is given.
pub fn weight_of<E>(weigher: Option<&dyn EdgeWeigher<E>>, edge: &E) -> f64 {
    match weigher {
        Some(w) => w.weight(edge),
        None => 1.0,
    }
}
