// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Setup-time failures of a forest computation
//!
//! Every error here is raised before the first node leaves the
//! queue.  Running off the edge of the lattice, or meeting a node
//! that is already finalized, is ordinary control flow and never
//! shows up as an error.

use failure::Fail;

/// Why a delineation refused to run.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum IftError {
    /// No seeds, a seed outside the lattice, one node carrying two
    /// different labels, or a label count the cost function cannot
    /// handle.
    #[fail(display = "invalid seed set: {}", _0)]
    InvalidSeedSet(String),

    /// A path cost that does not fit in the bucket queue.  The caller
    /// must recompute the cost bound from its auxiliary maps.
    #[fail(display = "path cost {} exceeds the maximum bucket {}", cost, max_cost)]
    CostRangeExceeded { cost: u64, max_cost: u64 },

    /// An empty lattice, or an adjacency relation that has nothing
    /// but the self offset.
    #[fail(display = "degenerate graph: {}", _0)]
    DegenerateGraph(String),

    /// A per-voxel map whose length does not match the lattice.
    #[fail(display = "map size mismatch: expected {} voxels, got {}", expected, actual)]
    MapSizeMismatch { expected: usize, actual: usize },

    /// A blend weight, ceiling or weight map value out of its domain.
    #[fail(display = "invalid parameter: {}", _0)]
    InvalidParameter(String),
}

/// Everything in this crate that can fail returns one of these.
pub type IftResult<T> = Result<T, IftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = IftError::CostRangeExceeded {
            cost: 300,
            max_cost: 255,
        };
        assert_eq!(
            err.to_string(),
            "path cost 300 exceeds the maximum bucket 255"
        );

        let err = IftError::MapSizeMismatch {
            expected: 9,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "map size mismatch: expected 9 voxels, got 4"
        );
    }
}
