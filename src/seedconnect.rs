// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Connecting the internal seeds
//!
//! Users tend to scatter a handful of object seeds.  Before
//! delineating, we join them up: grow a forest from one
//! representative object seed under
//!
//!   f(<p0>) = 0
//!   f(<p>)  = ∞ for every other p
//!   f(π·<p,q>) = Omax − O(q)
//!
//! where O is the object-probability map and Omax its ceiling, and
//! then add every voxel on the optimum paths from the other object
//! seeds back to the representative.  Cheap voxels are the likely
//! object ones, so the paths run through the object.

use crate::cost::{cost_bound, quantize, Cost, PathCost};
use crate::error::{IftError, IftResult};
use crate::forest::image_foresting_transform;
use crate::graph::AdjacencyGraph;
use crate::maps::VoxelMap;
use crate::seeds::LabeledSeeds;
use log::debug;

#[derive(Debug, Clone)]
pub struct SeedConnection<'a, C: Cost> {
    objmap: &'a VoxelMap<f32>,
    ceiling: f64,
    max_cost: C,
}

impl<'a, C: Cost> SeedConnection<'a, C> {
    /// Use the largest value in the object map as Omax.
    pub fn new(objmap: &'a VoxelMap<f32>) -> IftResult<Self> {
        SeedConnection::with_ceiling(objmap, objmap.max_value())
    }

    /// Use a caller-chosen Omax, such as the normalization value of
    /// the classifier that produced the map.  It may not sit below any
    /// value in the map.
    pub fn with_ceiling(objmap: &'a VoxelMap<f32>, ceiling: f32) -> IftResult<Self> {
        objmap.check_non_negative("object map")?;
        let (omin, omax) = (objmap.min_value(), objmap.max_value());
        if !ceiling.is_finite() || ceiling < omax {
            return Err(IftError::InvalidParameter(format!(
                "ceiling {} is below the object map maximum {}",
                ceiling, omax
            )));
        }
        let ceiling = f64::from(ceiling);
        Ok(SeedConnection {
            objmap,
            ceiling,
            max_cost: cost_bound(ceiling - f64::from(omin))?,
        })
    }
}

impl<'a, C: Cost> PathCost<C> for SeedConnection<'a, C> {
    fn max_cost(&self) -> C {
        self.max_cost
    }

    fn validate(&self, graph: &AdjacencyGraph, _seeds: &LabeledSeeds) -> IftResult<()> {
        self.objmap.check_lattice(graph.lattice())
    }

    fn extend(&self, _p: usize, q: usize, _cost_p: C, _label_p: i32) -> C {
        quantize(self.ceiling - f64::from(self.objmap[q]))
    }
}

/// The seeds plus the optimum paths joining every object seed to the
/// first one, with Omax taken from the map.
pub fn connect_internal_seeds(
    graph: &AdjacencyGraph,
    seeds: &LabeledSeeds,
    objmap: &VoxelMap<f32>,
) -> IftResult<LabeledSeeds> {
    connect_internal_seeds_with(graph, seeds, SeedConnection::<u32>::new(objmap)?)
}

/// As [`connect_internal_seeds`], with an explicit connectivity
/// function.
pub fn connect_internal_seeds_with<C: Cost>(
    graph: &AdjacencyGraph,
    seeds: &LabeledSeeds,
    cost_fn: SeedConnection<'_, C>,
) -> IftResult<LabeledSeeds> {
    seeds.check_nodes(graph.node_count())?;
    seeds.require_binary()?;
    let root = *seeds
        .foreground()
        .next()
        .ok_or_else(|| IftError::InvalidSeedSet("no object seed to connect from".into()))?;

    let mut roots = LabeledSeeds::new();
    roots.push(root.node, root.label);
    let forest = image_foresting_transform(graph, &roots, cost_fn)?;

    let mut connected = seeds.clone();
    let mut member = vec![false; graph.node_count()];
    for s in seeds {
        member[s.node] = true;
    }

    for s in seeds.foreground() {
        // The root itself is the last node of every path, and it is
        // already a seed.
        for node in forest.path_to_root(s.node) {
            if !member[node] {
                member[node] = true;
                connected.push(node, root.label);
            }
        }
    }

    debug!(
        "connected {} object seeds through {} path voxels",
        seeds.foreground().count(),
        connected.len() - seeds.len()
    );
    Ok(connected)
}
