// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Object delineation by the Image Foresting Transform
//!
//! An image is a graph: voxels are nodes, an adjacency relation
//! gives the arcs.  From a set of labeled seeds the Image Foresting
//! Transform grows an optimum-path forest in which every voxel is
//! conquered by the seed offering it the cheapest path, and takes
//! that seed's label.  Which delineation you get depends only on the
//! path-cost function: seeded watershed, oriented watershed, or the
//! object-region blend of object map and feature gradients.

extern crate image;

pub mod error;
pub use error::{IftError, IftResult};

pub mod lattice;
pub use lattice::{Voxel, VoxelLattice};

pub mod adjacency;
pub use adjacency::AdjacencyRelation;

pub mod graph;
pub use graph::AdjacencyGraph;

pub mod maps;
pub use maps::{MultiBandMap, VoxelMap};

pub mod seeds;
pub use seeds::{LabeledSeeds, Seed};

pub mod queue;
pub use queue::{BucketQueue, Color};

pub mod cost;
pub use cost::{Cost, PathCost};

pub mod forest;
pub use forest::{image_foresting_transform, Forest, ForestComputation};

pub mod arcweight;
pub use arcweight::{arc_weight_image, max_arc_weight};

pub mod seedconnect;
pub use seedconnect::{connect_internal_seeds, SeedConnection};

pub mod watershed;
pub use watershed::{
    delineate_by_oriented_watershed, delineate_by_watershed, OrientedWatershed, SeededWatershed,
};

pub mod objregion;
pub use objregion::{delineate_object_region, ObjectRegion};

pub mod dump;
pub use dump::{costs_to_image, labels_to_image};
