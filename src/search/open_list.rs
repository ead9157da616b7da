//! Binary heap over pool nodes. Each node stores its own position in the
//! heap, which makes membership tests O(1) and lets a node whose keys changed
//! be re-sifted from where it is instead of being searched for.

use crate::search::{Cost, NodeId, NodePool};

/// Access to the keys and the heap slot of a node.
pub trait OpenNode {
    /// Primary key, lower is expanded first.
    fn prio(&self) -> Cost;

    /// Secondary key for equal primary keys, lower is expanded first.
    fn tieprio(&self) -> Cost;

    fn open_index(&self) -> Option<usize>;

    fn set_open_index(&mut self, index: Option<usize>);
}

#[derive(Debug, Default)]
pub struct OpenList {
    heap: Vec<NodeId>,
}

#[inline(always)]
fn precedes<N: OpenNode>(lhs: &N, rhs: &N) -> bool {
    (lhs.prio(), lhs.tieprio()) < (rhs.prio(), rhs.tieprio())
}

impl OpenList {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push<N: OpenNode>(&mut self, pool: &mut NodePool<N>, node_id: NodeId) {
        debug_assert!(
            !self.mem(pool, node_id),
            "Node {:?} is already open",
            node_id
        );
        self.heap.push(node_id);
        self.sift_up(pool, self.heap.len() - 1);
    }

    pub fn pop<N: OpenNode>(&mut self, pool: &mut NodePool<N>) -> Option<NodeId> {
        if self.heap.is_empty() {
            return None;
        }
        let node_id = self.heap.swap_remove(0);
        pool.get_mut(node_id).set_open_index(None);
        if !self.heap.is_empty() {
            self.sift_down(pool, 0);
        }
        Some(node_id)
    }

    pub fn peek(&self) -> Option<NodeId> {
        self.heap.first().copied()
    }

    /// Whether `node_id` is currently in this heap.
    pub fn mem<N: OpenNode>(&self, pool: &NodePool<N>, node_id: NodeId) -> bool {
        match pool.get(node_id).open_index() {
            Some(index) => self.heap.get(index) == Some(&node_id),
            None => false,
        }
    }

    /// Must be called before changing the keys of a node that is in the
    /// heap, with a matching [`OpenList::post_update`] afterwards.
    pub fn pre_update<N: OpenNode>(&self, pool: &NodePool<N>, node_id: NodeId) {
        assert!(
            self.mem(pool, node_id),
            "Updating node {:?} which is not open",
            node_id
        );
    }

    /// Restore the heap order after the keys of `node_id` changed.
    pub fn post_update<N: OpenNode>(&mut self, pool: &mut NodePool<N>, node_id: NodeId) {
        let index = pool
            .get(node_id)
            .open_index()
            .expect("Updated node is not open");
        let index = self.sift_up(pool, index);
        self.sift_down(pool, index);
    }

    pub fn remove<N: OpenNode>(&mut self, pool: &mut NodePool<N>, node_id: NodeId) {
        debug_assert!(self.mem(pool, node_id));
        let index = pool
            .get(node_id)
            .open_index()
            .expect("Removed node is not open");
        pool.get_mut(node_id).set_open_index(None);
        self.heap.swap_remove(index);
        if index < self.heap.len() {
            let index = self.sift_up(pool, index);
            self.sift_down(pool, index);
        }
    }

    /// Empty the heap, leaving every former member marked as not open.
    pub fn clear<N: OpenNode>(&mut self, pool: &mut NodePool<N>) {
        for node_id in self.heap.drain(..) {
            pool.get_mut(node_id).set_open_index(None);
        }
    }

    /// Moves the node at `index` towards the root, returns its final index.
    fn sift_up<N: OpenNode>(&mut self, pool: &mut NodePool<N>, mut index: usize) -> usize {
        let node_id = self.heap[index];
        while index > 0 {
            let parent_index = (index - 1) / 2;
            let parent_id = self.heap[parent_index];
            if !precedes(pool.get(node_id), pool.get(parent_id)) {
                break;
            }
            self.heap[index] = parent_id;
            pool.get_mut(parent_id).set_open_index(Some(index));
            index = parent_index;
        }
        self.heap[index] = node_id;
        pool.get_mut(node_id).set_open_index(Some(index));
        index
    }

    fn sift_down<N: OpenNode>(&mut self, pool: &mut NodePool<N>, mut index: usize) {
        let node_id = self.heap[index];
        loop {
            let child_1_index = index * 2 + 1;
            if child_1_index >= self.heap.len() {
                break;
            }
            let child_2_index = child_1_index + 1;
            let child_index = if child_2_index < self.heap.len()
                && precedes(
                    pool.get(self.heap[child_2_index]),
                    pool.get(self.heap[child_1_index]),
                ) {
                child_2_index
            } else {
                child_1_index
            };
            let child_id = self.heap[child_index];
            if !precedes(pool.get(child_id), pool.get(node_id)) {
                break;
            }
            self.heap[index] = child_id;
            pool.get_mut(child_id).set_open_index(Some(index));
            index = child_index;
        }
        self.heap[index] = node_id;
        pool.get_mut(node_id).set_open_index(Some(index));
    }
}
