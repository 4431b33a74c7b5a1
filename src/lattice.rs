// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The voxel lattice
//!
//! A regular three-dimensional grid of voxels.  A plain 2D image is
//! just a lattice with a depth of one.  Every other structure in
//! this crate (maps, graphs, forests) addresses voxels by their
//! linear index into this lattice.

use crate::error::{IftError, IftResult};

/// A voxel coordinate.  Signed, so that a coordinate pushed off the
/// edge of the lattice by an adjacency offset is still representable
/// and can simply be tested for validity.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Voxel { x, y, z }
    }

    #[inline]
    pub fn shifted(self, offset: Voxel) -> Voxel {
        Voxel {
            x: self.x + offset.x,
            y: self.y + offset.y,
            z: self.z + offset.z,
        }
    }

    #[inline]
    pub fn norm_squared(self) -> i32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// The dimensions of the voxel grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VoxelLattice {
    pub xsize: u32,
    pub ysize: u32,
    pub zsize: u32,
}

impl VoxelLattice {
    /// A volumetric lattice.  Refuses a lattice with no voxels in it.
    pub fn new(xsize: u32, ysize: u32, zsize: u32) -> IftResult<Self> {
        if xsize == 0 || ysize == 0 || zsize == 0 {
            return Err(IftError::DegenerateGraph(format!(
                "lattice {}x{}x{} has no voxels",
                xsize, ysize, zsize
            )));
        }
        Ok(VoxelLattice {
            xsize,
            ysize,
            zsize,
        })
    }

    pub fn planar(width: u32, height: u32) -> IftResult<Self> {
        VoxelLattice::new(width, height, 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xsize as usize * self.ysize as usize * self.zsize as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_volumetric(&self) -> bool {
        self.zsize > 1
    }

    #[inline]
    pub fn contains(&self, v: Voxel) -> bool {
        v.x >= 0
            && v.y >= 0
            && v.z >= 0
            && (v.x as u32) < self.xsize
            && (v.y as u32) < self.ysize
            && (v.z as u32) < self.zsize
    }

    // All of the index math lives here, in exactly one place.  The
    // layout is x-fastest, the same one the image crate uses for a
    // single slice.

    /// Linear index of an in-range voxel.
    #[inline]
    pub fn index(&self, v: Voxel) -> usize {
        debug_assert!(self.contains(v));
        let plane = self.xsize as usize * self.ysize as usize;
        v.z as usize * plane + v.y as usize * self.xsize as usize + v.x as usize
    }

    #[inline]
    pub fn checked_index(&self, v: Voxel) -> Option<usize> {
        if self.contains(v) {
            Some(self.index(v))
        } else {
            None
        }
    }

    #[inline]
    pub fn voxel(&self, index: usize) -> Voxel {
        let plane = self.xsize as usize * self.ysize as usize;
        let rem = index % plane;
        Voxel {
            x: (rem % self.xsize as usize) as i32,
            y: (rem / self.xsize as usize) as i32,
            z: (index / plane) as i32,
        }
    }
}
