// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Adjacency relations
//!
//! An adjacency relation is a fixed list of relative offsets saying
//! which voxels count as the neighbours of a given voxel.  Every
//! relation built here is sorted by increasing offset length, with
//! ties kept in raster (z, y, x) order, so the zero offset (the voxel
//! itself) is always at index 0 and enumeration is deterministic.

use crate::lattice::Voxel;
use itertools::iproduct;

// Integer half-width and squared radius of a ball.  Radii such as √2
// come in a hair short once squared in f32, so the bound is nudged up
// before truncating and offsets are compared as integers.
fn ball(radius: f32) -> (i32, i32) {
    let r2 = f64::from(radius.max(0.0)).powi(2) + 1e-4;
    (r2.sqrt().floor() as i32, r2.floor() as i32)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRelation {
    offsets: Vec<Voxel>,
}

impl AdjacencyRelation {
    /// Build a relation from an arbitrary list of offsets.  The list
    /// is reordered by length and the zero offset is added if it is
    /// missing, so that index 0 always means "self".
    pub fn from_offsets(given: Vec<Voxel>) -> Self {
        let mut offsets = vec![Voxel::default()];
        for o in given {
            if !offsets.contains(&o) {
                offsets.push(o);
            }
        }
        // Stable, so equal lengths keep the caller's order.
        offsets.sort_by_key(|o| o.norm_squared());
        AdjacencyRelation { offsets }
    }

    /// All planar offsets within `radius` of the origin.  A radius of
    /// 1.0 is 4-connectivity, √2 is 8-connectivity.
    pub fn circular(radius: f32) -> Self {
        let (r, r2) = ball(radius);
        let offsets = iproduct!(-r..=r, -r..=r)
            .map(|(dy, dx)| Voxel::new(dx, dy, 0))
            .filter(|o| o.norm_squared() <= r2)
            .collect();
        AdjacencyRelation::from_offsets(offsets)
    }

    /// All volumetric offsets within `radius` of the origin.  A radius
    /// of 1.0 is 6-connectivity, √3 is 26-connectivity.
    pub fn spherical(radius: f32) -> Self {
        let (r, r2) = ball(radius);
        let offsets = iproduct!(-r..=r, -r..=r, -r..=r)
            .map(|(dz, dy, dx)| Voxel::new(dx, dy, dz))
            .filter(|o| o.norm_squared() <= r2)
            .collect();
        AdjacencyRelation::from_offsets(offsets)
    }

    /// A `width` x `height` planar box centered on the origin.  Even
    /// sizes are rounded up to the next odd size.
    pub fn rectangular(width: u32, height: u32) -> Self {
        AdjacencyRelation::cuboid(width, height, 1)
    }

    /// A `width` x `height` x `depth` box centered on the origin.
    pub fn cuboid(width: u32, height: u32, depth: u32) -> Self {
        let (hx, hy, hz) = ((width / 2) as i32, (height / 2) as i32, (depth / 2) as i32);
        let offsets = iproduct!(-hz..=hz, -hy..=hy, -hx..=hx)
            .map(|(dz, dy, dx)| Voxel::new(dx, dy, dz))
            .collect();
        AdjacencyRelation::from_offsets(offsets)
    }

    /// Size of the relation, including the self offset at index 0.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    pub fn offset(&self, i: usize) -> Voxel {
        self.offsets[i]
    }

    pub fn offsets(&self) -> &[Voxel] {
        &self.offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_circle_is_four_connected() {
        let rel = AdjacencyRelation::circular(1.0);
        assert_eq!(
            rel.offsets(),
            &[
                Voxel::new(0, 0, 0),
                Voxel::new(0, -1, 0),
                Voxel::new(-1, 0, 0),
                Voxel::new(1, 0, 0),
                Voxel::new(0, 1, 0),
            ]
        );
    }

    #[test]
    fn relation_sizes() {
        assert_eq!(AdjacencyRelation::circular(2.0f32.sqrt()).len(), 9);
        assert_eq!(AdjacencyRelation::spherical(1.0).len(), 7);
        assert_eq!(AdjacencyRelation::spherical(2.0f32.sqrt()).len(), 19);
        assert_eq!(AdjacencyRelation::spherical(3.0f32.sqrt()).len(), 27);
        assert_eq!(AdjacencyRelation::circular(2.0).len(), 13);
        assert_eq!(AdjacencyRelation::rectangular(3, 5).len(), 15);
        assert_eq!(AdjacencyRelation::circular(0.0).len(), 1);
    }

    #[test]
    fn root_two_circle_adds_the_diagonals_last() {
        let rel = AdjacencyRelation::circular(2.0f32.sqrt());
        assert_eq!(
            &rel.offsets()[5..],
            &[
                Voxel::new(-1, -1, 0),
                Voxel::new(1, -1, 0),
                Voxel::new(-1, 1, 0),
                Voxel::new(1, 1, 0),
            ]
        );
    }

    #[test]
    fn self_offset_always_first() {
        let rel = AdjacencyRelation::from_offsets(vec![Voxel::new(1, 0, 0), Voxel::new(0, 1, 0)]);
        assert_eq!(rel.len(), 3);
        assert_eq!(rel.offset(0), Voxel::default());
        assert_eq!(rel.offset(1), Voxel::new(1, 0, 0));
    }
}
