use segvec::{Linear, SegVec};
use std::num::NonZeroUsize;

/// Handle of a node in a [`NodePool`]. Stores the slot index plus one, so
/// `Option<NodeId>` is as small as a bare index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    #[inline(always)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    #[inline(always)]
    pub fn id(&self) -> usize {
        self.0.get() - 1
    }
}

/// Parent of the root node.
pub const NO_NODE: NodeId = NodeId(NonZeroUsize::MAX);

/// Bulk storage for search nodes. Nodes are never freed one by one: a node
/// found to be useless goes back on the free list and its slot is handed out
/// again by the next [`NodePool::construct`], and the storage as a whole is
/// dropped on [`NodePool::reset`].
///
/// The backing [`SegVec`] grows by adding segments, so growing the pool never
/// moves nodes that are already allocated.
#[derive(Debug)]
pub struct NodePool<N> {
    nodes: SegVec<N, Linear>,
    free: Vec<NodeId>,
}

impl<N> Default for NodePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodePool<N> {
    pub fn new() -> Self {
        Self {
            nodes: SegVec::new(),
            free: Vec::new(),
        }
    }

    pub fn construct(&mut self, node: N) -> NodeId {
        match self.free.pop() {
            Some(node_id) => {
                *self.get_mut(node_id) = node;
                node_id
            }
            None => {
                let node_id = NodeId::from_index(self.nodes.len());
                self.nodes.push(node);
                node_id
            }
        }
    }

    /// Give the slot of `node_id` back to the pool. The handle must not be
    /// used afterwards.
    pub fn destruct(&mut self, node_id: NodeId) {
        debug_assert!(node_id.id() < self.nodes.len(), "Invalid node id");
        debug_assert!(
            self.free.last() != Some(&node_id),
            "Node {:?} destructed twice",
            node_id
        );
        self.free.push(node_id);
    }

    pub fn reset(&mut self) {
        self.nodes = SegVec::new();
        self.free.clear();
    }

    #[inline(always)]
    pub fn get(&self, node_id: NodeId) -> &N {
        self.nodes.get(node_id.id()).expect("Invalid node id")
    }

    #[inline(always)]
    pub fn get_mut(&mut self, node_id: NodeId) -> &mut N {
        self.nodes.get_mut(node_id.id()).expect("Invalid node id")
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever allocated since the last reset.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }
}
