//! The contract every planning domain has to satisfy for the search engines
//! to operate on it.
//!
//! States are mutated in place: [`Domain::apply`] changes the state buffer it
//! is given and hands back an [`Edge`] describing the transition, and
//! [`Domain::revert`] consumes that edge to restore the state exactly as it
//! was, cached heuristic values included. See [`crate::search::AppliedEdge`]
//! for a guard that pairs the two calls automatically.

use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Transition costs, heuristic values and search priorities.
pub type Cost = OrderedFloat<f64>;

pub const ZERO_COST: Cost = OrderedFloat(0.);

pub const INFINITE_COST: Cost = OrderedFloat(f64::INFINITY);

const TYPICAL_NUM_OPERATORS: usize = 8;

/// The applicable operators of a state, in a domain-defined but
/// deterministic order.
pub type Operators<O> = SmallVec<[O; TYPICAL_NUM_OPERATORS]>;

/// The result of applying an operator to a state in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<O, U> {
    /// Cost of the transition.
    pub cost: Cost,
    /// Operator leading back from the new state to the old one. Domains
    /// whose transitions cannot be undone by an operator (e.g. because time
    /// only moves forward) return their nop here.
    pub revop: O,
    /// Whatever the domain needs to restore the old state bit for bit.
    pub undo: U,
}

/// Shorthand for the edge type of a domain.
pub type DomainEdge<D> = Edge<<D as Domain>::Oper, <D as Domain>::Undo>;

pub trait Domain: Debug {
    type State: Clone + Debug;
    type PackedState: Clone + Eq + Hash + Debug;
    type Oper: Copy + Eq + Debug;
    type Undo: Debug;

    /// The operator that does nothing, used as the "no parent operator" of
    /// the root.
    fn nop(&self) -> Self::Oper;

    fn initial_state(&self) -> Self::State;

    fn operators(&self, state: &Self::State) -> Operators<Self::Oper>;

    /// Apply `op` to `state` in place. Panics if `op` is not applicable.
    fn apply(&self, state: &mut Self::State, op: Self::Oper) -> Edge<Self::Oper, Self::Undo>;

    /// Undo the transition described by `edge`, which must be the most
    /// recent edge applied to `state`.
    fn revert(&self, state: &mut Self::State, edge: Edge<Self::Oper, Self::Undo>);

    fn pack(&self, state: &Self::State) -> Self::PackedState;

    fn unpack(&self, packed: &Self::PackedState) -> Self::State;

    fn hash(&self, packed: &Self::PackedState) -> u64;

    /// Admissible estimate of the cost to the goal.
    fn h(&self, state: &Self::State) -> Cost;

    /// Estimate of the number of steps to the goal.
    fn d(&self, state: &Self::State) -> Cost;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// The explicit "wait" operator of the state and its cost, for domains
    /// that have one.
    fn ident(&self, _state: &Self::State) -> Option<(Self::Oper, Cost)> {
        None
    }

    /// Upper bound on the number of distinct states, if one is known. Used to
    /// avoid allocating hash tables far larger than the state space.
    fn num_states_hint(&self) -> Option<usize> {
        None
    }
}
