// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Watershed delineation from labeled seeds
//!
//! Both variants here are bottleneck (max-path) costs over a scalar
//! weight map W, usually the arc-weight image of the input:
//!
//!   f(<s>) = 0
//!   f(π·<p,q>) = max(f(π), √max(0, W(p)² − W(q)²))
//!
//! Walking downhill in W costs something, walking uphill is free, so
//! each seed floods the basin around it and the trees meet on the
//! crests of W.
//!
//! The oriented variant also looks at an object-probability map O.
//! An object tree stepping to a voxel that is less likely to be
//! object, or a background tree stepping to one that is more likely,
//! is crossing the boundary the wrong way, and pays K·max(W(p), W(q))
//! for that arc instead.

use crate::cost::{cost_bound, quantize, Cost, PathCost};
use crate::error::IftResult;
use crate::forest::image_foresting_transform;
use crate::graph::AdjacencyGraph;
use crate::maps::VoxelMap;
use crate::seeds::LabeledSeeds;

/// Arc penalty factor for crossing against the object orientation.
pub const ORIENTATION_PENALTY: f64 = 1.5;

// Weights are rounded to integers up front; the costs they produce
// are truncated again when they enter the queue.
fn integer_weights(weight: &VoxelMap<f32>) -> IftResult<Vec<f64>> {
    weight.check_non_negative("weight map")?;
    Ok(weight.as_slice().iter().map(|w| f64::from(w.round())).collect())
}

#[inline]
fn descent(wp: f64, wq: f64) -> f64 {
    (wp * wp - wq * wq).max(0.0).sqrt()
}

/// Seeded watershed on a weight map.
#[derive(Debug, Clone)]
pub struct SeededWatershed<'a, C: Cost> {
    weight: &'a VoxelMap<f32>,
    rounded: Vec<f64>,
    max_cost: C,
}

impl<'a, C: Cost> SeededWatershed<'a, C> {
    pub fn new(weight: &'a VoxelMap<f32>) -> IftResult<Self> {
        let rounded = integer_weights(weight)?;
        let wmax = rounded.iter().cloned().fold(0.0, f64::max);
        Ok(SeededWatershed {
            weight,
            rounded,
            max_cost: cost_bound(wmax)?,
        })
    }
}

impl<'a, C: Cost> PathCost<C> for SeededWatershed<'a, C> {
    fn max_cost(&self) -> C {
        self.max_cost
    }

    fn validate(&self, graph: &AdjacencyGraph, _seeds: &LabeledSeeds) -> IftResult<()> {
        self.weight.check_lattice(graph.lattice())
    }

    fn extend(&self, p: usize, q: usize, cost_p: C, _label_p: i32) -> C {
        let arc: C = quantize(descent(self.rounded[p], self.rounded[q]));
        cost_p.max(arc)
    }
}

/// Watershed that penalizes arcs crossing the object boundary in the
/// wrong direction.  Binary only: label 0 is background, anything
/// above it is object.
#[derive(Debug, Clone)]
pub struct OrientedWatershed<'a, C: Cost> {
    weight: &'a VoxelMap<f32>,
    objmap: &'a VoxelMap<f32>,
    rounded: Vec<f64>,
    max_cost: C,
}

impl<'a, C: Cost> OrientedWatershed<'a, C> {
    pub fn new(weight: &'a VoxelMap<f32>, objmap: &'a VoxelMap<f32>) -> IftResult<Self> {
        objmap.check_lattice(weight.lattice())?;
        let rounded = integer_weights(weight)?;
        let wmax = rounded.iter().cloned().fold(0.0, f64::max);
        Ok(OrientedWatershed {
            weight,
            objmap,
            rounded,
            max_cost: cost_bound(ORIENTATION_PENALTY * wmax)?,
        })
    }

    /// Does the arc `<p, q>` run against the polarity of `label_p`?
    #[inline]
    fn against_orientation(&self, p: usize, q: usize, label_p: i32) -> bool {
        let (op, oq) = (self.objmap[p], self.objmap[q]);
        if label_p > 0 {
            op > oq
        } else {
            op < oq
        }
    }
}

impl<'a, C: Cost> PathCost<C> for OrientedWatershed<'a, C> {
    fn max_cost(&self) -> C {
        self.max_cost
    }

    fn validate(&self, graph: &AdjacencyGraph, seeds: &LabeledSeeds) -> IftResult<()> {
        self.weight.check_lattice(graph.lattice())?;
        self.objmap.check_lattice(graph.lattice())?;
        seeds.require_at_most_binary()
    }

    fn extend(&self, p: usize, q: usize, cost_p: C, label_p: i32) -> C {
        let (wp, wq) = (self.rounded[p], self.rounded[q]);
        let arc = if self.against_orientation(p, q, label_p) {
            ORIENTATION_PENALTY * wp.max(wq)
        } else {
            descent(wp, wq)
        };
        cost_p.max(quantize(arc))
    }
}

/// Label every voxel by seeded watershed on `weight`.
pub fn delineate_by_watershed(
    graph: &AdjacencyGraph,
    weight: &VoxelMap<f32>,
    seeds: &LabeledSeeds,
) -> IftResult<Vec<i32>> {
    let cost_fn = SeededWatershed::<u32>::new(weight)?;
    Ok(image_foresting_transform(graph, seeds, cost_fn)?.into_labels())
}

/// Label every voxel by oriented watershed on `weight`, steered by the
/// object map `objmap`.
pub fn delineate_by_oriented_watershed(
    graph: &AdjacencyGraph,
    weight: &VoxelMap<f32>,
    objmap: &VoxelMap<f32>,
    seeds: &LabeledSeeds,
) -> IftResult<Vec<i32>> {
    let cost_fn = OrientedWatershed::<u32>::new(weight, objmap)?;
    Ok(image_foresting_transform(graph, seeds, cost_fn)?.into_labels())
}
