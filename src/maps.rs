// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-voxel maps
//!
//! An addressable field holding one value per voxel of a lattice: a
//! weight (gradient) map, an object-probability map, or one of the
//! cost or label maps produced by a forest.  Multi-band feature
//! images get their own container, since every voxel carries a
//! whole vector.

use crate::error::{IftError, IftResult};
use crate::lattice::{Voxel, VoxelLattice};
use image::{GenericImageView, Pixel, Primitive};
use num_traits::NumCast;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq)]
pub struct VoxelMap<P: Default + Copy> {
    lattice: VoxelLattice,
    data: Vec<P>,
}

impl<P: Default + Copy> VoxelMap<P> {
    pub fn new(lattice: VoxelLattice) -> Self {
        VoxelMap {
            lattice,
            data: vec![P::default(); lattice.len()],
        }
    }

    /// Wrap existing data, which must hold exactly one value per voxel.
    pub fn from_vec(lattice: VoxelLattice, data: Vec<P>) -> IftResult<Self> {
        if data.len() != lattice.len() {
            return Err(IftError::MapSizeMismatch {
                expected: lattice.len(),
                actual: data.len(),
            });
        }
        Ok(VoxelMap { lattice, data })
    }

    pub fn filled(lattice: VoxelLattice, value: P) -> Self {
        VoxelMap {
            lattice,
            data: vec![value; lattice.len()],
        }
    }

    #[inline]
    pub fn lattice(&self) -> &VoxelLattice {
        &self.lattice
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// Fails unless this map covers exactly `lattice`.
    pub fn check_lattice(&self, lattice: &VoxelLattice) -> IftResult<()> {
        if self.lattice != *lattice {
            return Err(IftError::MapSizeMismatch {
                expected: lattice.len(),
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl VoxelMap<f32> {
    /// Read the luminance of every pixel of an image into a flat map.
    pub fn from_luma_image<I, P, S>(image: &I) -> Self
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        let lattice = VoxelLattice {
            xsize: width,
            ysize: height,
            zsize: 1,
        };
        let mut map = VoxelMap::new(lattice);
        for (x, y, pixel) in image.pixels() {
            let luma = pixel.to_luma();
            map[Voxel::new(x as i32, y as i32, 0)] =
                NumCast::from(luma.channels()[0]).unwrap_or(0.0);
        }
        map
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().cloned().fold(std::f32::NEG_INFINITY, f32::max)
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().cloned().fold(std::f32::INFINITY, f32::min)
    }

    /// Fails on any NaN, infinite or negative entry.  `what` names the
    /// map in the error message.
    pub fn check_non_negative(&self, what: &str) -> IftResult<()> {
        match self.data.iter().position(|v| !v.is_finite() || *v < 0.0) {
            None => Ok(()),
            Some(at) => Err(IftError::InvalidParameter(format!(
                "{} holds {} at voxel {}",
                what, self.data[at], at
            ))),
        }
    }
}

impl<P: Default + Copy> Index<usize> for VoxelMap<P> {
    type Output = P;

    fn index(&self, node: usize) -> &P {
        &self.data[node]
    }
}

impl<P: Default + Copy> IndexMut<usize> for VoxelMap<P> {
    fn index_mut(&mut self, node: usize) -> &mut P {
        &mut self.data[node]
    }
}

impl<P: Default + Copy> Index<Voxel> for VoxelMap<P> {
    type Output = P;

    fn index(&self, v: Voxel) -> &P {
        &self.data[self.lattice.index(v)]
    }
}

impl<P: Default + Copy> IndexMut<Voxel> for VoxelMap<P> {
    fn index_mut(&mut self, v: Voxel) -> &mut P {
        let index = self.lattice.index(v);
        &mut self.data[index]
    }
}

/// A feature vector of `bands` floats for every voxel, stored voxel
/// by voxel so that one feature is a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiBandMap {
    lattice: VoxelLattice,
    bands: usize,
    data: Vec<f32>,
}

impl MultiBandMap {
    pub fn new(lattice: VoxelLattice, bands: usize) -> Self {
        MultiBandMap {
            lattice,
            bands,
            data: vec![0.0; lattice.len() * bands],
        }
    }

    /// Wrap voxel-major data: the first `bands` values belong to voxel
    /// 0, the next `bands` to voxel 1, and so on.
    pub fn from_vec(lattice: VoxelLattice, bands: usize, data: Vec<f32>) -> IftResult<Self> {
        if bands == 0 || data.len() != lattice.len() * bands {
            return Err(IftError::MapSizeMismatch {
                expected: lattice.len() * bands.max(1),
                actual: data.len(),
            });
        }
        Ok(MultiBandMap {
            lattice,
            bands,
            data,
        })
    }

    /// One band per map, all of which must share a lattice.
    pub fn from_bands(bands: &[VoxelMap<f32>]) -> IftResult<Self> {
        let first = bands.first().ok_or_else(|| {
            IftError::InvalidParameter("a feature map needs at least one band".into())
        })?;
        let lattice = *first.lattice();
        let mut out = MultiBandMap::new(lattice, bands.len());
        for (b, band) in bands.iter().enumerate() {
            band.check_lattice(&lattice)?;
            for p in 0..lattice.len() {
                out.data[p * out.bands + b] = band[p];
            }
        }
        Ok(out)
    }

    /// Read an image as a feature map: one luminance band when `color`
    /// is false, otherwise the three RGB channels.
    pub fn from_image<I, P, S>(image: &I, color: bool) -> Self
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        let lattice = VoxelLattice {
            xsize: width,
            ysize: height,
            zsize: 1,
        };
        let bands = if color { 3 } else { 1 };
        let mut map = MultiBandMap::new(lattice, bands);
        for (x, y, pixel) in image.pixels() {
            let p = lattice.index(Voxel::new(x as i32, y as i32, 0));
            let feature = &mut map.data[p * bands..(p + 1) * bands];
            if color {
                let rgb = pixel.to_rgb();
                for (f, c) in feature.iter_mut().zip(rgb.channels()) {
                    *f = NumCast::from(*c).unwrap_or(0.0);
                }
            } else {
                feature[0] = NumCast::from(pixel.to_luma().channels()[0]).unwrap_or(0.0);
            }
        }
        map
    }

    #[inline]
    pub fn lattice(&self) -> &VoxelLattice {
        &self.lattice
    }

    #[inline]
    pub fn bands(&self) -> usize {
        self.bands
    }

    #[inline]
    pub fn feature(&self, node: usize) -> &[f32] {
        &self.data[node * self.bands..(node + 1) * self.bands]
    }

    /// Euclidean distance between the features of two voxels.
    #[inline]
    pub fn distance(&self, p: usize, q: usize) -> f32 {
        self.feature(p)
            .iter()
            .zip(self.feature(q))
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }

    pub fn check_lattice(&self, lattice: &VoxelLattice) -> IftResult<()> {
        if self.lattice != *lattice {
            return Err(IftError::MapSizeMismatch {
                expected: lattice.len() * self.bands,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}
