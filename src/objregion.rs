// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Object-region delineation
//!
//! Internal and external seeds compete under a bottleneck cost whose
//! arc weight blends two kinds of boundary evidence: how sharply the
//! object map changes across the arc, and how far apart the two
//! voxels are in feature space.
//!
//!   d(p,q) = K·(α·|O(p) − O(q)| + (1 − α)·‖F(p) − F(q)‖)
//!   f(π·<p,q>) = max(f(π), d(p,q))

use crate::arcweight::{check_alpha, max_arc_weight};
use crate::cost::{cost_bound, quantize, Cost, PathCost};
use crate::error::IftResult;
use crate::forest::image_foresting_transform;
use crate::graph::AdjacencyGraph;
use crate::maps::{MultiBandMap, VoxelMap};
use crate::seeds::LabeledSeeds;

/// Scale applied to every blended arc weight.
pub const REGION_SCALE: f64 = 1.2;

#[derive(Debug, Clone)]
pub struct ObjectRegion<'a, C: Cost> {
    objmap: &'a VoxelMap<f32>,
    features: &'a MultiBandMap,
    alpha: f64,
    max_cost: C,
}

impl<'a, C: Cost> ObjectRegion<'a, C> {
    /// The bound on path costs depends on the heaviest feature arc, so
    /// building this walks the whole graph once.
    pub fn new(
        graph: &AdjacencyGraph,
        objmap: &'a VoxelMap<f32>,
        features: &'a MultiBandMap,
        alpha: f32,
    ) -> IftResult<Self> {
        check_alpha(alpha)?;
        objmap.check_lattice(graph.lattice())?;
        objmap.check_non_negative("object map")?;
        let alpha = f64::from(alpha);
        let orange = f64::from(objmap.max_value() - objmap.min_value());
        let frange = f64::from(max_arc_weight(graph, features)?);
        let bound = REGION_SCALE * (alpha * orange + (1.0 - alpha) * frange);
        Ok(ObjectRegion {
            objmap,
            features,
            alpha,
            max_cost: cost_bound(bound)?,
        })
    }

    #[inline]
    fn arc_weight(&self, p: usize, q: usize) -> f64 {
        let dobj = f64::from((self.objmap[p] - self.objmap[q]).abs());
        let dfeat = f64::from(self.features.distance(p, q));
        REGION_SCALE * (self.alpha * dobj + (1.0 - self.alpha) * dfeat)
    }
}

impl<'a, C: Cost> PathCost<C> for ObjectRegion<'a, C> {
    fn max_cost(&self) -> C {
        self.max_cost
    }

    fn validate(&self, graph: &AdjacencyGraph, _seeds: &LabeledSeeds) -> IftResult<()> {
        self.objmap.check_lattice(graph.lattice())?;
        self.features.check_lattice(graph.lattice())
    }

    fn extend(&self, p: usize, q: usize, cost_p: C, _label_p: i32) -> C {
        cost_p.max(quantize(self.arc_weight(p, q)))
    }
}

/// Label every voxel by object-region delineation.
pub fn delineate_object_region(
    graph: &AdjacencyGraph,
    features: &MultiBandMap,
    objmap: &VoxelMap<f32>,
    seeds: &LabeledSeeds,
    alpha: f32,
) -> IftResult<Vec<i32>> {
    let cost_fn = ObjectRegion::<u32>::new(graph, objmap, features, alpha)?;
    Ok(image_foresting_transform(graph, seeds, cost_fn)?.into_labels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::AdjacencyRelation;
    use crate::error::IftError;
    use crate::lattice::VoxelLattice;

    // A 4x1 strip whose features jump between voxels 1 and 2, and
    // whose object map jumps between voxels 2 and 3.
    fn strip() -> (AdjacencyGraph, MultiBandMap, VoxelMap<f32>) {
        let lattice = VoxelLattice::planar(4, 1).unwrap();
        let graph = AdjacencyGraph::unit(lattice).unwrap();
        let features = MultiBandMap::from_vec(lattice, 1, vec![0.0, 0.0, 50.0, 50.0]).unwrap();
        let objmap = VoxelMap::from_vec(lattice, vec![200.0, 200.0, 200.0, 0.0]).unwrap();
        (graph, features, objmap)
    }

    fn ends() -> LabeledSeeds {
        vec![(0, 1), (3, 0)].into_iter().collect()
    }

    #[test]
    fn bound_covers_the_heaviest_arc() {
        let (graph, features, objmap) = strip();
        let cost_fn = ObjectRegion::<u32>::new(&graph, &objmap, &features, 0.5).unwrap();
        // 1.2·(0.5·200 + 0.5·50)
        assert_eq!(cost_fn.max_cost(), 150);
        assert_eq!(cost_fn.extend(1, 2, 0, 1), 30);
        assert_eq!(cost_fn.extend(2, 3, 0, 1), 120);
        assert_eq!(cost_fn.extend(2, 3, 140, 1), 140);
    }

    #[test]
    fn feature_edges_decide_when_alpha_is_zero() {
        let (graph, features, objmap) = strip();
        let labels = delineate_object_region(&graph, &features, &objmap, &ends(), 0.0).unwrap();
        assert_eq!(labels, vec![1, 1, 0, 0]);
    }

    #[test]
    fn object_edges_decide_when_alpha_is_one() {
        let (graph, features, objmap) = strip();
        let labels = delineate_object_region(&graph, &features, &objmap, &ends(), 1.0).unwrap();
        assert_eq!(labels, vec![1, 1, 1, 0]);
    }

    #[test]
    fn diagonal_valley_needs_eight_connectivity() {
        let lattice = VoxelLattice::planar(3, 3).unwrap();
        #[rustfmt::skip]
        let features = MultiBandMap::from_vec(lattice, 1, vec![
              0.0, 100.0, 100.0,
            100.0,   0.0, 100.0,
            100.0, 100.0,   0.0,
        ]).unwrap();
        let objmap = VoxelMap::filled(lattice, 0.0);
        let seeds: LabeledSeeds = vec![(0, 1), (2, 0)].into_iter().collect();

        let four = AdjacencyGraph::unit(lattice).unwrap();
        let labels = delineate_object_region(&four, &features, &objmap, &seeds, 0.0).unwrap();
        assert_eq!(labels[4], 0);

        let eight =
            AdjacencyGraph::new(lattice, AdjacencyRelation::circular(2.0f32.sqrt())).unwrap();
        let cost_fn = ObjectRegion::<u32>::new(&eight, &objmap, &features, 0.0).unwrap();
        let forest = image_foresting_transform(&eight, &seeds, cost_fn).unwrap();
        assert_eq!(forest.labels(), &[1, 0, 0, 0, 1, 0, 0, 0, 1]);
        assert!(forest.costs().iter().all(|c| *c == 0));
        assert_eq!(forest.path_to_root(8), vec![8, 4, 0]);
    }

    #[test]
    fn forest_is_valid_and_monotone() {
        let lattice = VoxelLattice::planar(5, 5).unwrap();
        let graph = AdjacencyGraph::unit(lattice).unwrap();
        let features = MultiBandMap::from_vec(
            lattice,
            1,
            (0..25).map(|i| ((i * 37) % 11) as f32).collect(),
        )
        .unwrap();
        let objmap = VoxelMap::from_vec(lattice, (0..25).map(|i| (i % 5) as f32 * 40.0).collect())
            .unwrap();
        let seeds: LabeledSeeds = vec![(0, 1), (24, 0)].into_iter().collect();
        let cost_fn = ObjectRegion::<u16>::new(&graph, &objmap, &features, 0.3).unwrap();
        let forest = image_foresting_transform(&graph, &seeds, cost_fn).unwrap();

        let extracted: Vec<u16> = forest.order().iter().map(|n| forest.cost(*n)).collect();
        assert!(extracted.windows(2).all(|w| w[0] <= w[1]));
        for node in 0..25 {
            let root = forest.root_of(node).unwrap();
            assert!(root == 0 || root == 24);
            assert_eq!(forest.label(node), forest.label(root));
        }
    }

    #[test]
    fn alpha_outside_unit_interval_is_refused() {
        let (graph, features, objmap) = strip();
        assert!(matches!(
            ObjectRegion::<u32>::new(&graph, &objmap, &features, 1.2),
            Err(IftError::InvalidParameter(_))
        ));
    }
}
