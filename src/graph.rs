// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image graph
//!
//! Rather than materializing a graph of points with pointers to
//! their children, the graph is implicit: a lattice plus an
//! adjacency relation.  The arcs out of a node are recomputed on
//! demand by displacing its coordinate by each offset and discarding
//! the ones that fall off the grid.

use crate::adjacency::AdjacencyRelation;
use crate::error::{IftError, IftResult};
use crate::lattice::{Voxel, VoxelLattice};

/// A read-only view of a voxel lattice as a graph.  Nothing in a
/// forest computation ever mutates it, so one graph can back any
/// number of computations.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    lattice: VoxelLattice,
    relation: AdjacencyRelation,
}

impl AdjacencyGraph {
    pub fn new(lattice: VoxelLattice, relation: AdjacencyRelation) -> IftResult<Self> {
        if lattice.is_empty() {
            return Err(IftError::DegenerateGraph("lattice has no voxels".into()));
        }
        if relation.len() < 2 {
            return Err(IftError::DegenerateGraph(
                "adjacency relation has no offsets besides the origin".into(),
            ));
        }
        Ok(AdjacencyGraph { lattice, relation })
    }

    /// 4-connected when flat, 6-connected when volumetric.
    pub fn unit(lattice: VoxelLattice) -> IftResult<Self> {
        let relation = if lattice.is_volumetric() {
            AdjacencyRelation::spherical(1.0)
        } else {
            AdjacencyRelation::circular(1.0)
        };
        AdjacencyGraph::new(lattice, relation)
    }

    #[inline]
    pub fn lattice(&self) -> &VoxelLattice {
        &self.lattice
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.lattice.len()
    }

    // Counts the self offset at index 0.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.relation.len()
    }

    /// The neighbour of `u` at relation index `i`, if it is on the grid.
    #[inline]
    pub fn valid_neighbor(&self, u: usize, i: usize) -> Option<usize> {
        let v = self.lattice.voxel(u).shifted(self.relation.offset(i));
        self.lattice.checked_index(v)
    }

    /// Every in-grid neighbour of `u`, in relation order, not
    /// including `u` itself.
    pub fn neighbors(&self, u: usize) -> Neighbors<'_> {
        Neighbors {
            graph: self,
            origin: self.lattice.voxel(u),
            next: 1,
        }
    }
}

/// Iterator over the neighbours of one node.
pub struct Neighbors<'a> {
    graph: &'a AdjacencyGraph,
    origin: Voxel,
    next: usize,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let relation = &self.graph.relation;
        while self.next < relation.len() {
            let v = self.origin.shifted(relation.offset(self.next));
            self.next += 1;
            if let Some(q) = self.graph.lattice.checked_index(v) {
                return Some(q);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.graph.relation.len().saturating_sub(self.next)))
    }
}
