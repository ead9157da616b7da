use crate::search::{Cost, Domain, DomainEdge};
use std::ops::{Deref, DerefMut};

/// A scope guard around one in-place transition. Creating it applies the
/// operator to the borrowed state; dropping it reverts the state, unless the
/// transition was kept with [`AppliedEdge::commit`].
///
/// Since reverting happens in [`Drop`], every exit path out of the scope
/// restores the state, early returns included. This is what allows depth
/// first searches to work on a single state buffer.
#[derive(Debug)]
pub struct AppliedEdge<'a, D: Domain> {
    domain: &'a D,
    state: &'a mut D::State,
    op: D::Oper,
    cost: Cost,
    revop: D::Oper,
    edge: Option<DomainEdge<D>>,
}

impl<'a, D: Domain> AppliedEdge<'a, D> {
    pub fn apply(domain: &'a D, state: &'a mut D::State, op: D::Oper) -> Self {
        let edge = domain.apply(state, op);
        debug_assert!(
            edge.cost >= Cost::from(0.),
            "operator {:?} has negative cost {}",
            op,
            edge.cost
        );
        Self {
            domain,
            state,
            op,
            cost: edge.cost,
            revop: edge.revop,
            edge: Some(edge),
        }
    }

    #[inline(always)]
    pub fn op(&self) -> D::Oper {
        self.op
    }

    #[inline(always)]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline(always)]
    pub fn revop(&self) -> D::Oper {
        self.revop
    }

    /// Keep the transition, the state stays mutated after the guard is gone.
    pub fn commit(mut self) -> Cost {
        self.edge = None;
        self.cost
    }
}

impl<D: Domain> Deref for AppliedEdge<'_, D> {
    type Target = D::State;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl<D: Domain> DerefMut for AppliedEdge<'_, D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl<D: Domain> Drop for AppliedEdge<'_, D> {
    fn drop(&mut self) {
        if let Some(edge) = self.edge.take() {
            self.domain.revert(self.state, edge);
        }
    }
}
