// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Image Foresting Transform
//!
//! Given a graph, a labeled seed set and a path-cost function, grow
//! an optimum-path forest rooted at the seeds: every node ends up
//! with the cheapest path from any seed, the predecessor on that
//! path, and the label of the seed it started from.  This is
//! Dijkstra's relaxation with three twists: there are many roots, the
//! cost function need not be additive, and the queue is a bucket
//! queue with FIFO tie-breaking, so the result is reproducible.
//!
//! Every delineation in this crate is this one loop with a different
//! [`PathCost`](crate::cost::PathCost).

use crate::cost::{infinity, Cost, PathCost};
use crate::error::{IftError, IftResult};
use crate::graph::AdjacencyGraph;
use crate::queue::{BucketQueue, Color};
use crate::seeds::LabeledSeeds;
use log::{debug, warn};

/// The output of one computation: a spanning forest over the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest<C: Cost> {
    labels: Vec<i32>,
    costs: Vec<C>,
    preds: Vec<Option<usize>>,
    order: Vec<usize>,
}

impl<C: Cost> Forest<C> {
    /// The label each node inherited from its root.  Nodes no seed
    /// could reach keep label 0.
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Final path costs; unreached nodes hold `C::max_value()`.
    pub fn costs(&self) -> &[C] {
        &self.costs
    }

    /// Predecessor of each node on its optimum path.  `None` for seeds
    /// and unreached nodes.
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.preds
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn into_labels(self) -> Vec<i32> {
        self.labels
    }

    #[inline]
    pub fn label(&self, node: usize) -> i32 {
        self.labels[node]
    }

    #[inline]
    pub fn cost(&self, node: usize) -> C {
        self.costs[node]
    }

    #[inline]
    pub fn predecessor(&self, node: usize) -> Option<usize> {
        self.preds[node]
    }

    #[inline]
    pub fn is_reached(&self, node: usize) -> bool {
        self.costs[node] != infinity()
    }

    /// The optimum path from `node` back to its root, `node` first and
    /// the root last.  Empty for an unreached node.
    pub fn path_to_root(&self, node: usize) -> Vec<usize> {
        if !self.is_reached(node) {
            return Vec::new();
        }
        let mut path = vec![node];
        let mut at = node;
        while let Some(pred) = self.preds[at] {
            // A forest has no cycles; a path longer than the graph
            // would mean the bookkeeping is broken.
            debug_assert!(path.len() <= self.preds.len());
            path.push(pred);
            at = pred;
        }
        path
    }

    /// The seed whose tree holds `node`.
    pub fn root_of(&self, node: usize) -> Option<usize> {
        self.path_to_root(node).last().copied()
    }
}

/// The working state of one computation.  It owns every array it
/// writes; only the graph is borrowed, and only for reading.
pub struct ForestComputation<'g, C: Cost, F: PathCost<C>> {
    graph: &'g AdjacencyGraph,
    cost_fn: F,
    queue: BucketQueue,
    labels: Vec<i32>,
    costs: Vec<C>,
    preds: Vec<Option<usize>>,
    order: Vec<usize>,
}

impl<'g, C: Cost, F: PathCost<C>> ForestComputation<'g, C, F> {
    /// Validate everything and queue the seeds.  Any error is
    /// reported here, before the first relaxation.
    pub fn new(graph: &'g AdjacencyGraph, seeds: &LabeledSeeds, cost_fn: F) -> IftResult<Self> {
        let n = graph.node_count();
        if n == 0 {
            return Err(IftError::DegenerateGraph("graph has no nodes".into()));
        }
        seeds.check_nodes(n)?;
        cost_fn.validate(graph, seeds)?;

        let max_cost = cost_fn.max_cost();
        if max_cost == infinity() {
            return Err(IftError::CostRangeExceeded {
                cost: max_cost.to_u64().unwrap_or(std::u64::MAX),
                max_cost: max_cost.to_u64().unwrap_or(std::u64::MAX) - 1,
            });
        }
        let buckets = max_cost.to_usize().ok_or(IftError::CostRangeExceeded {
            cost: max_cost.to_u64().unwrap_or(std::u64::MAX),
            max_cost: std::usize::MAX as u64,
        })?;

        debug!(
            "forest over {} nodes, {} buckets, {} seeds",
            n,
            buckets + 1,
            seeds.len()
        );

        let mut forest = ForestComputation {
            graph,
            cost_fn,
            queue: BucketQueue::new(n, buckets),
            labels: vec![0; n],
            costs: vec![infinity(); n],
            preds: vec![None; n],
            order: Vec::with_capacity(n),
        };

        // Every seed starts with the trivial path.
        for seed in seeds {
            if forest.queue.color(seed.node) == Color::Gray {
                if forest.labels[seed.node] != seed.label {
                    return Err(IftError::InvalidSeedSet(format!(
                        "node {} is seeded with labels {} and {}",
                        seed.node, forest.labels[seed.node], seed.label
                    )));
                }
                continue;
            }
            forest.costs[seed.node] = C::zero();
            forest.labels[seed.node] = seed.label;
            forest.queue.insert(seed.node, 0)?;
        }
        Ok(forest)
    }

    /// Relax until the queue runs dry.
    pub fn run(mut self) -> IftResult<Forest<C>> {
        while let Some(p) = self.queue.remove_min() {
            self.order.push(p);
            let (cost_p, label_p) = (self.costs[p], self.labels[p]);

            for q in self.graph.neighbors(p) {
                if self.queue.color(q) == Color::Black {
                    continue;
                }
                let candidate = self.cost_fn.extend(p, q, cost_p, label_p);
                if candidate < self.costs[q] {
                    if self.queue.color(q) == Color::Gray {
                        self.queue.remove_node(q);
                    }
                    self.preds[q] = Some(p);
                    self.costs[q] = candidate;
                    self.labels[q] = label_p;
                    let bucket = candidate.to_usize().unwrap_or(std::usize::MAX);
                    self.queue.insert(q, bucket)?;
                }
            }
        }

        let unreached = self.costs.iter().filter(|c| **c == infinity()).count();
        if unreached > 0 {
            warn!("{} nodes could not be reached from any seed", unreached);
        }

        Ok(Forest {
            labels: self.labels,
            costs: self.costs,
            preds: self.preds,
            order: self.order,
        })
    }
}

/// Grow the optimum-path forest of `graph` from `seeds` under
/// `cost_fn`.
pub fn image_foresting_transform<C, F>(
    graph: &AdjacencyGraph,
    seeds: &LabeledSeeds,
    cost_fn: F,
) -> IftResult<Forest<C>>
where
    C: Cost,
    F: PathCost<C>,
{
    ForestComputation::new(graph, seeds, cost_fn)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::from_fn;
    use crate::lattice::VoxelLattice;

    fn grid(w: u32, h: u32) -> AdjacencyGraph {
        AdjacencyGraph::unit(VoxelLattice::planar(w, h).unwrap()).unwrap()
    }

    fn seeds(pairs: &[(usize, i32)]) -> LabeledSeeds {
        pairs.iter().cloned().collect()
    }

    // Additive unit arcs: the cost is the hop count.
    fn hops(max: u32) -> impl PathCost<u32> {
        from_fn(max, |_, _, c: u32, _| c + 1)
    }

    #[test]
    fn single_voxel_graph() {
        let lattice = VoxelLattice::planar(1, 1).unwrap();
        let graph = AdjacencyGraph::unit(lattice).unwrap();
        let forest = image_foresting_transform(&graph, &seeds(&[(0, 7)]), hops(1)).unwrap();
        assert_eq!(forest.labels(), &[7]);
        assert_eq!(forest.costs(), &[0]);
        assert_eq!(forest.predecessors(), &[None]);
        assert_eq!(forest.order(), &[0]);
    }

    #[test]
    fn seeds_keep_label_zero_cost_and_no_predecessor() {
        let graph = grid(4, 4);
        let forest =
            image_foresting_transform(&graph, &seeds(&[(0, 1), (15, 2), (6, 3)]), hops(16))
                .unwrap();
        for &(s, l) in &[(0, 1), (15, 2), (6, 3)] {
            assert_eq!(forest.label(s), l);
            assert_eq!(forest.cost(s), 0);
            assert_eq!(forest.predecessor(s), None);
        }
    }

    #[test]
    fn every_path_ends_at_a_seed() {
        let graph = grid(5, 4);
        let s = seeds(&[(0, 1), (19, 2)]);
        let forest = image_foresting_transform(&graph, &s, hops(20)).unwrap();
        for node in 0..graph.node_count() {
            assert!(forest.is_reached(node));
            let path = forest.path_to_root(node);
            let root = *path.last().unwrap();
            assert!(s.contains_node(root));
            assert_eq!(forest.label(node), forest.label(root));
            assert_eq!(forest.cost(node) as usize, path.len() - 1);
        }
    }

    #[test]
    fn extraction_costs_never_decrease() {
        let graph = grid(6, 6);
        let forest = image_foresting_transform(&graph, &seeds(&[(14, 1)]), hops(36)).unwrap();
        assert_eq!(forest.order().len(), 36);
        let costs: Vec<u32> = forest.order().iter().map(|n| forest.cost(*n)).collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn identical_runs_give_identical_forests() {
        let graph = grid(7, 5);
        let s = seeds(&[(3, 1), (31, 0), (17, 2)]);
        let a = image_foresting_transform(&graph, &s, hops(35)).unwrap();
        let b = image_foresting_transform(&graph, &s, hops(35)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cheaper_path_replaces_queued_one() {
        // 0 1
        // 2 3   with the arc 1 -> 3 much dearer than 2 -> 3.
        let graph = grid(2, 2);
        let weight = |p: usize, q: usize| if (p, q) == (1, 3) { 5 } else { 1 };
        let cost_fn = from_fn(10u32, move |p, q, c: u32, _| c + weight(p, q));
        let forest = image_foresting_transform(&graph, &seeds(&[(0, 1)]), cost_fn).unwrap();
        assert_eq!(forest.cost(3), 2);
        assert_eq!(forest.predecessor(3), Some(2));
        assert_eq!(forest.path_to_root(3), vec![3, 2, 0]);
        assert_eq!(forest.order(), &[0, 1, 2, 3]);
    }

    #[test]
    fn unreachable_nodes_stay_unlabeled() {
        let graph = grid(3, 1);
        let wall = from_fn(4u32, |_, q, c: u32, _| if q == 2 { std::u32::MAX } else { c });
        let forest = image_foresting_transform(&graph, &seeds(&[(0, 4)]), wall).unwrap();
        assert_eq!(forest.labels(), &[4, 4, 0]);
        assert!(!forest.is_reached(2));
        assert_eq!(forest.root_of(2), None);
        assert_eq!(forest.root_of(1), Some(0));
    }

    #[test]
    fn duplicate_seed_with_same_label_is_collapsed() {
        let graph = grid(3, 1);
        let forest =
            image_foresting_transform(&graph, &seeds(&[(0, 1), (0, 1)]), hops(3)).unwrap();
        assert_eq!(forest.labels(), &[1, 1, 1]);
        assert_eq!(forest.order(), &[0, 1, 2]);
    }

    #[test]
    fn conflicting_duplicate_seed_is_refused() {
        let graph = grid(3, 1);
        match image_foresting_transform(&graph, &seeds(&[(1, 1), (1, 2)]), hops(3)) {
            Err(IftError::InvalidSeedSet(_)) => {}
            other => panic!("expected an invalid seed set, got {:?}", other),
        }
    }

    #[test]
    fn setup_errors_come_before_relaxation() {
        let graph = grid(3, 1);
        assert!(matches!(
            image_foresting_transform(&graph, &LabeledSeeds::new(), hops(3)),
            Err(IftError::InvalidSeedSet(_))
        ));
        assert!(matches!(
            image_foresting_transform(&graph, &seeds(&[(3, 1)]), hops(3)),
            Err(IftError::InvalidSeedSet(_))
        ));
        let unbounded = from_fn(std::u8::MAX, |_, _, c: u8, _| c);
        assert!(matches!(
            image_foresting_transform(&graph, &seeds(&[(0, 1)]), unbounded),
            Err(IftError::CostRangeExceeded { .. })
        ));
    }

    #[test]
    fn understated_bound_aborts_without_a_forest() {
        let graph = grid(4, 1);
        match image_foresting_transform(&graph, &seeds(&[(0, 1)]), hops(2)) {
            Err(IftError::CostRangeExceeded { cost, max_cost }) => {
                assert_eq!((cost, max_cost), (3, 2));
            }
            other => panic!("expected a cost range error, got {:?}", other),
        }
    }
}
