// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Path-cost functions
//!
//! A path-cost (connectivity) function says what it costs to extend
//! the optimum path ending at `p` by the arc `<p, q>`.  The forest
//! loop is the same for every delineation; only this strategy
//! changes.  Costs are unsigned integers because the bucket queue
//! needs small discrete keys, and the largest value of the chosen
//! type is reserved to mean "unreached".

use crate::error::{IftError, IftResult};
use crate::graph::AdjacencyGraph;
use crate::seeds::LabeledSeeds;
use num_traits::{NumCast, PrimInt, Unsigned};
use std::fmt::Debug;
use std::marker::PhantomData;

/// The numeric type of a path cost, chosen once per computation.
pub trait Cost: PrimInt + Unsigned + Debug {}

impl<T: PrimInt + Unsigned + Debug> Cost for T {}

/// The cost of a path that does not exist.
#[inline]
pub fn infinity<C: Cost>() -> C {
    C::max_value()
}

/// Truncate a non-negative real cost to the integer cost type.  NaN,
/// negative, and unrepresentable values come back as infinity, which
/// never wins a relaxation.
#[inline]
pub fn quantize<C: Cost>(value: f64) -> C {
    if value.is_nan() || value < 0.0 {
        return infinity();
    }
    NumCast::from(value.floor()).unwrap_or_else(infinity)
}

/// Turn a real-valued bound into the largest bucket index, refusing
/// bounds that would collide with the infinity sentinel.
pub fn cost_bound<C: Cost>(bound: f64) -> IftResult<C> {
    let too_big = || IftError::CostRangeExceeded {
        cost: if bound.is_finite() && bound > 0.0 {
            bound as u64
        } else {
            std::u64::MAX
        },
        max_cost: infinity::<C>().to_u64().unwrap_or(std::u64::MAX) - 1,
    };
    if !bound.is_finite() {
        return Err(too_big());
    }
    let c: C = quantize(bound.max(0.0));
    if c == infinity() {
        return Err(too_big());
    }
    Ok(c)
}

/// A connectivity function, injected into the forest loop.
pub trait PathCost<C: Cost> {
    /// The largest finite cost `extend` can ever return.  The bucket
    /// queue is sized from it.
    fn max_cost(&self) -> C;

    /// Setup-time checks against the graph and seeds: map sizes,
    /// label cardinality.  Runs before any node is queued.
    fn validate(&self, _graph: &AdjacencyGraph, _seeds: &LabeledSeeds) -> IftResult<()> {
        Ok(())
    }

    /// Cost of the path to `p` (costing `cost_p`, labeled `label_p`)
    /// extended by the arc `<p, q>`.
    fn extend(&self, p: usize, q: usize, cost_p: C, label_p: i32) -> C;
}

impl<'a, C: Cost, F: PathCost<C> + ?Sized> PathCost<C> for &'a F {
    fn max_cost(&self) -> C {
        (**self).max_cost()
    }

    fn validate(&self, graph: &AdjacencyGraph, seeds: &LabeledSeeds) -> IftResult<()> {
        (**self).validate(graph, seeds)
    }

    fn extend(&self, p: usize, q: usize, cost_p: C, label_p: i32) -> C {
        (**self).extend(p, q, cost_p, label_p)
    }
}

/// A connectivity function made from a closure and a bound.
pub struct FnCost<C, F> {
    max_cost: C,
    f: F,
    _cost: PhantomData<C>,
}

/// Wrap `f(p, q, cost_p, label_p)` as a path-cost function whose
/// costs never exceed `max_cost`.
pub fn from_fn<C, F>(max_cost: C, f: F) -> FnCost<C, F>
where
    C: Cost,
    F: Fn(usize, usize, C, i32) -> C,
{
    FnCost {
        max_cost,
        f,
        _cost: PhantomData,
    }
}

impl<C, F> PathCost<C> for FnCost<C, F>
where
    C: Cost,
    F: Fn(usize, usize, C, i32) -> C,
{
    fn max_cost(&self) -> C {
        self.max_cost
    }

    fn extend(&self, p: usize, q: usize, cost_p: C, label_p: i32) -> C {
        (self.f)(p, q, cost_p, label_p)
    }
}
