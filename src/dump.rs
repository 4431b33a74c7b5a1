// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Forest maps as greyscale images
//!
//! Diagnostic views of a computed forest.  Only planar lattices can
//! be dumped; a volume would need a slice picked out first.

use crate::cost::{infinity, Cost};
use crate::error::{IftError, IftResult};
use crate::lattice::VoxelLattice;
use image::{GrayImage, ImageBuffer, Luma};

fn planar(lattice: &VoxelLattice, len: usize) -> IftResult<(u32, u32)> {
    if lattice.is_volumetric() {
        return Err(IftError::InvalidParameter(
            "only planar lattices can be written as an image".into(),
        ));
    }
    if len != lattice.len() {
        return Err(IftError::MapSizeMismatch {
            expected: lattice.len(),
            actual: len,
        });
    }
    Ok((lattice.xsize, lattice.ysize))
}

// Stretch `values` so that the largest one lands on 255.
fn stretch(values: &[f64], width: u32, height: u32) -> GrayImage {
    let factor = values.iter().cloned().fold(0.0, f64::max);
    let mut out: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (i, v) in values.iter().enumerate() {
        let (x, y) = ((i % width as usize) as u32, (i / width as usize) as u32);
        let level = if factor > 0.0 { v * 255.0 / factor } else { 0.0 };
        out.put_pixel(x, y, Luma([level.round().max(0.0).min(255.0) as u8]));
    }
    out
}

/// Labels as grey levels, the largest label white.  Negative labels
/// are drawn black.
pub fn labels_to_image(labels: &[i32], lattice: &VoxelLattice) -> IftResult<GrayImage> {
    let (width, height) = planar(lattice, labels.len())?;
    let values: Vec<f64> = labels.iter().map(|l| f64::from((*l).max(0))).collect();
    Ok(stretch(&values, width, height))
}

/// Path costs as grey levels.  Unreached voxels are drawn white, the
/// same as the dearest reached one.
pub fn costs_to_image<C: Cost>(costs: &[C], lattice: &VoxelLattice) -> IftResult<GrayImage> {
    let (width, height) = planar(lattice, costs.len())?;
    let finite = costs
        .iter()
        .filter(|c| **c != infinity())
        .filter_map(|c| c.to_f64())
        .fold(0.0, f64::max);
    let values: Vec<f64> = costs
        .iter()
        .map(|c| {
            if *c == infinity() {
                finite
            } else {
                c.to_f64().unwrap_or(finite)
            }
        })
        .collect();
    Ok(stretch(&values, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_labels_are_black_and_white() {
        let lattice = VoxelLattice::planar(2, 2).unwrap();
        let img = labels_to_image(&[0, 1, 1, 0], &lattice).unwrap();
        assert_eq!(img.into_raw(), vec![0, 255, 255, 0]);
    }

    #[test]
    fn costs_are_stretched() {
        let lattice = VoxelLattice::planar(4, 1).unwrap();
        let img = costs_to_image(&[0u32, 5, 10, std::u32::MAX], &lattice).unwrap();
        assert_eq!(img.into_raw(), vec![0, 128, 255, 255]);
    }

    #[test]
    fn volumes_are_refused() {
        let lattice = VoxelLattice::new(1, 1, 2).unwrap();
        assert!(labels_to_image(&[0, 1], &lattice).is_err());
    }
}
