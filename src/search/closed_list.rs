use crate::search::{Domain, NodeId, NodePool};
use tracing::debug;

/// Default number of buckets. Large, so that chains stay short even for big
/// state spaces.
pub const DEFAULT_CLOSED_CAPACITY: usize = 30_000_000;

/// Access to the packed state of a node and to the chain link the closed list
/// threads through its nodes.
pub trait ClosedNode {
    type Packed: Eq;

    fn packed(&self) -> &Self::Packed;

    fn closed_next(&self) -> Option<NodeId>;

    fn set_closed_next(&mut self, next: Option<NodeId>);
}

/// Hash table from packed states to the nodes holding them. The number of
/// buckets is fixed when the table is initialised and never changes; entries
/// in the same bucket are chained through the nodes themselves.
#[derive(Debug)]
pub struct ClosedList {
    capacity: usize,
    buckets: Vec<Option<NodeId>>,
    len: usize,
}

impl ClosedList {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Closed list needs at least one bucket");
        Self {
            capacity,
            buckets: Vec::new(),
            len: 0,
        }
    }

    /// Allocate the buckets. Uses fewer buckets than configured if the
    /// domain knows its state space to be smaller.
    pub fn init<D: Domain>(&mut self, domain: &D) {
        let num_buckets = match domain.num_states_hint() {
            Some(hint) => self.capacity.min(hint.max(1)),
            None => self.capacity,
        };
        debug!(num_buckets, "initialising closed list");
        self.buckets = vec![None; num_buckets];
        self.len = 0;
    }

    pub fn is_initialised(&self) -> bool {
        !self.buckets.is_empty()
    }

    #[inline(always)]
    fn bucket(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Insert `node_id`, which must not be present yet. The hash of its
    /// packed state is computed if it is not given.
    pub fn add<D, N>(
        &mut self,
        domain: &D,
        pool: &mut NodePool<N>,
        node_id: NodeId,
        hash: Option<u64>,
    ) where
        D: Domain,
        N: ClosedNode<Packed = D::PackedState>,
    {
        debug_assert!(self.is_initialised(), "Closed list used before init");
        let hash = hash.unwrap_or_else(|| domain.hash(pool.get(node_id).packed()));
        let bucket = self.bucket(hash);
        pool.get_mut(node_id).set_closed_next(self.buckets[bucket]);
        self.buckets[bucket] = Some(node_id);
        self.len += 1;
    }

    /// The node holding `packed`, if there is one.
    pub fn find<N: ClosedNode>(
        &self,
        pool: &NodePool<N>,
        packed: &N::Packed,
        hash: u64,
    ) -> Option<NodeId> {
        debug_assert!(self.is_initialised(), "Closed list used before init");
        let mut cursor = self.buckets[self.bucket(hash)];
        while let Some(node_id) = cursor {
            let node = pool.get(node_id);
            if node.packed() == packed {
                return Some(node_id);
            }
            cursor = node.closed_next();
        }
        None
    }

    /// Forget every entry. The buckets stay allocated.
    pub fn clear(&mut self) {
        self.buckets.fill(None);
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
