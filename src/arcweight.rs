// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Arc weights of the image graph
//!
//! The weight of an arc <p, q> is the euclidean distance between the
//! features of its two voxels.  The watershed needs a weight per
//! voxel rather than per arc, so each voxel takes the heaviest of its
//! outgoing arcs: a morphological gradient in feature space.  When an
//! object map is available its own gradient is blended in:
//!
//!   W(p) = Omax·((w(p)/Wmax)·(1 − α) + α·g(p)/Omax)
//!
//! with w the feature gradient, g the object-map gradient, and α the
//! share given to the object map.

use crate::error::{IftError, IftResult};
use crate::graph::AdjacencyGraph;
use crate::maps::{MultiBandMap, VoxelMap};

/// The heaviest arc of the whole graph.  Zero for a graph whose only
/// voxel has no in-grid neighbours.
pub fn max_arc_weight(graph: &AdjacencyGraph, features: &MultiBandMap) -> IftResult<f32> {
    features.check_lattice(graph.lattice())?;
    Ok((0..graph.node_count())
        .flat_map(|p| graph.neighbors(p).map(move |q| (p, q)))
        .map(|(p, q)| features.distance(p, q))
        .fold(0.0, f32::max))
}

/// Check that a blend weight is in [0, 1].
pub fn check_alpha(alpha: f32) -> IftResult<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(IftError::InvalidParameter(format!(
            "alpha={} is outside [0,1]",
            alpha
        )));
    }
    Ok(())
}

// Largest value of `f(p, q)` over the arcs leaving `p`.
fn steepest<F>(graph: &AdjacencyGraph, p: usize, f: F) -> f32
where
    F: Fn(usize, usize) -> f32,
{
    graph.neighbors(p).map(|q| f(p, q)).fold(0.0, f32::max)
}

/// Per-voxel weight map for the watershed delineations.  `alpha` must
/// be zero when there is no object map to blend in.
pub fn arc_weight_image(
    graph: &AdjacencyGraph,
    features: &MultiBandMap,
    objmap: Option<&VoxelMap<f32>>,
    alpha: f32,
) -> IftResult<VoxelMap<f32>> {
    check_alpha(alpha)?;
    features.check_lattice(graph.lattice())?;
    if objmap.is_none() && alpha != 0.0 {
        return Err(IftError::InvalidParameter(format!(
            "alpha={} requires an object map",
            alpha
        )));
    }

    let mut weight = VoxelMap::new(*graph.lattice());
    for p in 0..graph.node_count() {
        weight[p] = steepest(graph, p, |p, q| features.distance(p, q));
    }

    if let Some(objmap) = objmap {
        objmap.check_lattice(graph.lattice())?;
        // A flat map contributes nothing rather than 0/0.
        let scale = |v: f32, max: f32| if max > 0.0 { v / max } else { 0.0 };
        let wmax = weight.max_value();
        let omax = objmap.max_value();
        let blended: Vec<f32> = (0..graph.node_count())
            .map(|p| {
                let g = steepest(graph, p, |p, q| (objmap[q] - objmap[p]).abs());
                omax * (scale(weight[p], wmax) * (1.0 - alpha) + alpha * scale(g, omax))
            })
            .collect();
        weight = VoxelMap::from_vec(*graph.lattice(), blended)?;
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::VoxelLattice;

    fn strip() -> (VoxelLattice, AdjacencyGraph, MultiBandMap) {
        let lattice = VoxelLattice::planar(4, 1).unwrap();
        let graph = AdjacencyGraph::unit(lattice).unwrap();
        let features = MultiBandMap::from_vec(lattice, 1, vec![0.0, 0.0, 8.0, 8.0]).unwrap();
        (lattice, graph, features)
    }

    #[test]
    fn feature_gradient() {
        let (_, graph, features) = strip();
        assert_eq!(max_arc_weight(&graph, &features).unwrap(), 8.0);
        let weight = arc_weight_image(&graph, &features, None, 0.0).unwrap();
        assert_eq!(weight.as_slice(), &[0.0, 8.0, 8.0, 0.0]);
    }

    #[test]
    fn object_map_blend() {
        let (lattice, graph, features) = strip();
        let objmap = VoxelMap::from_vec(lattice, vec![100.0, 100.0, 100.0, 0.0]).unwrap();

        // Only the feature gradient, rescaled to the object map range.
        let weight = arc_weight_image(&graph, &features, Some(&objmap), 0.0).unwrap();
        assert_eq!(weight.as_slice(), &[0.0, 100.0, 100.0, 0.0]);

        // Only the object map gradient.
        let weight = arc_weight_image(&graph, &features, Some(&objmap), 1.0).unwrap();
        assert_eq!(weight.as_slice(), &[0.0, 0.0, 100.0, 100.0]);

        let weight = arc_weight_image(&graph, &features, Some(&objmap), 0.5).unwrap();
        assert_eq!(weight.as_slice(), &[0.0, 50.0, 100.0, 50.0]);
    }

    #[test]
    fn alpha_needs_an_object_map() {
        let (_, graph, features) = strip();
        assert!(matches!(
            arc_weight_image(&graph, &features, None, 0.3),
            Err(IftError::InvalidParameter(_))
        ));
        assert!(check_alpha(1.5).is_err());
        assert!(check_alpha(-0.1).is_err());
        assert!(check_alpha(0.0).is_ok());
    }

    #[test]
    fn features_must_cover_the_graph() {
        let (_, graph, _) = strip();
        let lattice = VoxelLattice::planar(2, 2).unwrap();
        let features = MultiBandMap::new(lattice, 1);
        assert!(max_arc_weight(&graph, &features).is_err());
    }
}
