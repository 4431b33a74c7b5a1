// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The bucket priority queue
//!
//! Path costs in a forest computation are small bounded integers, so
//! instead of a heap we keep one FIFO list ("bucket") per possible
//! cost.  The lists are threaded through per-node `next`/`prev`
//! arrays rather than stored as vectors, which makes removing an
//! arbitrary node (for decrease-key) O(1) without disturbing the
//! order of the nodes around it.
//!
//! A cursor marks the lowest bucket that can still hold anything.
//! Extraction only walks it forward; insertion below it rewinds it.

use crate::error::{IftError, IftResult};

/// Where a node stands in the computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    /// Never queued, or taken back out by [`BucketQueue::remove_node`].
    White,
    /// Sitting in exactly one bucket; its cost may still improve.
    Gray,
    /// Extracted.  Cost and label are final.
    Black,
}

#[derive(Debug, Copy, Clone, Default)]
struct Bucket {
    first: Option<usize>,
    last: Option<usize>,
}

#[derive(Debug, Copy, Clone)]
struct Slot {
    next: Option<usize>,
    prev: Option<usize>,
    bucket: usize,
    color: Color,
}

#[derive(Debug)]
pub struct BucketQueue {
    buckets: Vec<Bucket>,
    slots: Vec<Slot>,
    cursor: usize,
    count: usize,
}

impl BucketQueue {
    /// A queue for nodes `0..node_count` with costs in `0..=max_cost`.
    pub fn new(node_count: usize, max_cost: usize) -> Self {
        BucketQueue {
            buckets: vec![Bucket::default(); max_cost + 1],
            slots: vec![
                Slot {
                    next: None,
                    prev: None,
                    bucket: 0,
                    color: Color::White,
                };
                node_count
            ],
            cursor: 0,
            count: 0,
        }
    }

    #[inline]
    pub fn max_cost(&self) -> usize {
        self.buckets.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn color(&self, node: usize) -> Color {
        self.slots[node].color
    }

    /// Append `node` to the tail of bucket `cost`.  The node must not
    /// already be queued.
    pub fn insert(&mut self, node: usize, cost: usize) -> IftResult<()> {
        if cost > self.max_cost() {
            return Err(IftError::CostRangeExceeded {
                cost: cost as u64,
                max_cost: self.max_cost() as u64,
            });
        }
        debug_assert_ne!(self.slots[node].color, Color::Gray, "node {} queued twice", node);

        let tail = self.buckets[cost].last;
        self.slots[node] = Slot {
            next: None,
            prev: tail,
            bucket: cost,
            color: Color::Gray,
        };
        match tail {
            Some(t) => self.slots[t].next = Some(node),
            None => self.buckets[cost].first = Some(node),
        }
        self.buckets[cost].last = Some(node);

        if cost < self.cursor {
            self.cursor = cost;
        }
        self.count += 1;
        Ok(())
    }

    /// Pop the oldest node of the cheapest non-empty bucket and
    /// finalize it.
    pub fn remove_min(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        while self.buckets[self.cursor].first.is_none() {
            self.cursor += 1;
        }
        let node = self.buckets[self.cursor].first?;
        self.unlink(node);
        self.slots[node].color = Color::Black;
        Some(node)
    }

    /// Take a queued node back out of its bucket so that it can be
    /// reinserted at a better cost.  Nodes that are not queued are
    /// left alone.
    pub fn remove_node(&mut self, node: usize) {
        if self.slots[node].color != Color::Gray {
            return;
        }
        self.unlink(node);
        self.slots[node].color = Color::White;
    }

    fn unlink(&mut self, node: usize) {
        let Slot {
            next, prev, bucket, ..
        } = self.slots[node];
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.buckets[bucket].first = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.buckets[bucket].last = prev,
        }
        self.slots[node].next = None;
        self.slots[node].prev = None;
        self.count -= 1;
    }
}
