// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Labeled seed sets
//!
//! The seed-editing and classification layers hand the engine an
//! ordered list of (voxel, label) pairs.  Order matters: seeds are
//! queued in this order, and within a bucket the queue is FIFO, so it
//! decides which tree wins a tie.  Label 0 is the background in the
//! binary delineations.

use crate::error::{IftError, IftResult};
use crate::lattice::{Voxel, VoxelLattice};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Seed {
    pub node: usize,
    pub label: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabeledSeeds {
    seeds: Vec<Seed>,
}

impl LabeledSeeds {
    pub fn new() -> Self {
        LabeledSeeds { seeds: Vec::new() }
    }

    pub fn push(&mut self, node: usize, label: i32) {
        self.seeds.push(Seed { node, label });
    }

    /// Add a seed by coordinate, refusing coordinates off the lattice.
    pub fn push_voxel(&mut self, lattice: &VoxelLattice, v: Voxel, label: i32) -> IftResult<()> {
        let node = lattice.checked_index(v).ok_or_else(|| {
            IftError::InvalidSeedSet(format!(
                "seed ({}, {}, {}) lies outside the lattice",
                v.x, v.y, v.z
            ))
        })?;
        self.push(node, label);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Seed> {
        self.seeds.iter()
    }

    pub fn contains_node(&self, node: usize) -> bool {
        self.seeds.iter().any(|s| s.node == node)
    }

    /// The distinct labels, in order of first appearance.
    pub fn labels(&self) -> Vec<i32> {
        let mut labels = Vec::new();
        for s in &self.seeds {
            if !labels.contains(&s.label) {
                labels.push(s.label);
            }
        }
        labels
    }

    pub fn number_of_labels(&self) -> usize {
        self.labels().len()
    }

    pub fn foreground(&self) -> impl Iterator<Item = &Seed> {
        self.seeds.iter().filter(|s| s.label > 0)
    }

    /// Fails on an empty set or a node outside `0..node_count`.
    pub fn check_nodes(&self, node_count: usize) -> IftResult<()> {
        if self.seeds.is_empty() {
            return Err(IftError::InvalidSeedSet("no seeds".into()));
        }
        match self.seeds.iter().find(|s| s.node >= node_count) {
            Some(s) => Err(IftError::InvalidSeedSet(format!(
                "seed {} lies outside a graph of {} nodes",
                s.node, node_count
            ))),
            None => Ok(()),
        }
    }

    /// Fails unless the set uses exactly two labels.
    pub fn require_binary(&self) -> IftResult<()> {
        match self.number_of_labels() {
            2 => Ok(()),
            n => Err(IftError::InvalidSeedSet(format!(
                "binary segmentation needs exactly two labels, found {}",
                n
            ))),
        }
    }

    /// Fails when the set uses more than two labels.
    pub fn require_at_most_binary(&self) -> IftResult<()> {
        match self.number_of_labels() {
            n if n > 2 => Err(IftError::InvalidSeedSet(format!(
                "binary segmentation accepts at most two labels, found {}",
                n
            ))),
            _ => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a LabeledSeeds {
    type Item = &'a Seed;
    type IntoIter = std::slice::Iter<'a, Seed>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.iter()
    }
}

impl std::iter::FromIterator<(usize, i32)> for LabeledSeeds {
    fn from_iter<T: IntoIterator<Item = (usize, i32)>>(iter: T) -> Self {
        LabeledSeeds {
            seeds: iter
                .into_iter()
                .map(|(node, label)| Seed { node, label })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_in_order_of_appearance() {
        let seeds: LabeledSeeds = vec![(4, 2), (0, 1), (8, 2)].into_iter().collect();
        assert_eq!(seeds.labels(), vec![2, 1]);
        assert!(seeds.require_binary().is_ok());
        assert!(seeds.contains_node(8));
        assert!(!seeds.contains_node(3));
    }

    #[test]
    fn three_labels_is_not_binary() {
        let seeds: LabeledSeeds = vec![(0, 0), (1, 1), (2, 2)].into_iter().collect();
        assert!(seeds.require_binary().is_err());
        assert!(seeds.require_at_most_binary().is_err());
    }

    #[test]
    fn empty_and_stray_seeds_are_rejected() {
        assert!(LabeledSeeds::new().check_nodes(4).is_err());
        let seeds: LabeledSeeds = vec![(4, 1)].into_iter().collect();
        assert!(seeds.check_nodes(4).is_err());
        assert!(seeds.check_nodes(5).is_ok());
    }

    #[test]
    fn voxel_seeds_are_bounds_checked() {
        let lattice = VoxelLattice::planar(2, 2).unwrap();
        let mut seeds = LabeledSeeds::new();
        assert!(seeds.push_voxel(&lattice, Voxel::new(1, 1, 0), 1).is_ok());
        assert!(seeds.push_voxel(&lattice, Voxel::new(2, 0, 0), 0).is_err());
        assert_eq!(seeds.iter().next(), Some(&Seed { node: 3, label: 1 }));
    }
}
