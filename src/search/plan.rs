//! A plan is a sequence of operators leading from the initial state to a goal
//! state. This module provides the [`Plan`] struct, which represents a plan
//! together with the states it passes through.

use crate::search::Cost;
use itertools::Itertools;
use std::fmt::Debug;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq)]
pub struct Plan<S, O> {
    ops: Vec<O>,
    /// One more state than operators, starting with the initial state
    states: Vec<S>,
    cost: Cost,
}

impl<S, O> Plan<S, O> {
    pub fn new(ops: Vec<O>, states: Vec<S>, cost: Cost) -> Self {
        debug_assert_eq!(ops.len() + 1, states.len());
        Self { ops, states, cost }
    }

    pub fn ops(&self) -> &[O] {
        &self.ops
    }

    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn final_state(&self) -> &S {
        self.states.last().expect("A plan has at least one state")
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<S, O: Debug> Plan<S, O> {
    /// One operator per line.
    pub fn to_text(&self) -> String {
        self.ops.iter().map(|op| format!("{:?}", op)).join("\n")
    }
}

impl<S, O> Deref for Plan<S, O> {
    type Target = [O];

    fn deref(&self) -> &Self::Target {
        &self.ops
    }
}
