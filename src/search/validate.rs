use crate::search::{AppliedEdge, Cost, Domain, Plan, ZERO_COST};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("operator {op} at step {step} is not applicable in state {state}")]
    NotApplicable {
        step: usize,
        op: String,
        state: String,
    },
    #[error("state {step} of the plan is {reported} but replaying gives {replayed}")]
    StateMismatch {
        step: usize,
        reported: String,
        replayed: String,
    },
    #[error("plan does not reach a goal state, final state is {0}")]
    GoalNotReached(String),
    #[error("plan reports cost {reported} but replaying costs {replayed}")]
    CostMismatch { reported: Cost, replayed: Cost },
}

/// Replay `ops` from the initial state of `domain`, checking that every
/// operator is applicable where it is used and that the last state is a
/// goal. Returns the total cost of the replayed path.
pub fn validate<D: Domain>(domain: &D, ops: &[D::Oper]) -> Result<Cost, ValidationError> {
    let mut cur_state = domain.initial_state();
    let mut cost = ZERO_COST;
    for (step, &op) in ops.iter().enumerate() {
        if !domain.operators(&cur_state).contains(&op) {
            return Err(ValidationError::NotApplicable {
                step,
                op: format!("{:?}", op),
                state: format!("{:?}", cur_state),
            });
        }
        cost += AppliedEdge::apply(domain, &mut cur_state, op).commit();
    }

    if !domain.is_goal(&cur_state) {
        return Err(ValidationError::GoalNotReached(format!("{:?}", cur_state)));
    }

    Ok(cost)
}

/// Like [`validate`], but also checks the states recorded in `plan` against
/// the replayed ones and the reported cost against the replayed cost.
pub fn validate_plan<D: Domain>(
    domain: &D,
    plan: &Plan<D::State, D::Oper>,
) -> Result<Cost, ValidationError> {
    let replayed = validate(domain, plan.ops())?;
    let mut cur_state = domain.initial_state();
    for (step, state) in plan.states().iter().enumerate() {
        if step > 0 {
            AppliedEdge::apply(domain, &mut cur_state, plan.ops()[step - 1]).commit();
        }
        if domain.pack(state) != domain.pack(&cur_state) {
            return Err(ValidationError::StateMismatch {
                step,
                reported: format!("{:?}", state),
                replayed: format!("{:?}", cur_state),
            });
        }
    }
    if replayed != plan.cost() {
        return Err(ValidationError::CostMismatch {
            reported: plan.cost(),
            replayed,
        });
    }
    Ok(replayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn validate_good_plan_ok() {
        let domain = reopening_graph();
        let ops = [GraphOper::Edge(2), GraphOper::Edge(3), GraphOper::Edge(4)];
        assert_eq!(validate(&domain, &ops), Ok(Cost::from(3.)));
    }

    #[test]
    fn validate_bad_plan_not_applicable() {
        let domain = reopening_graph();
        let ops = [GraphOper::Edge(2), GraphOper::Edge(4)];
        assert!(matches!(
            validate(&domain, &ops),
            Err(ValidationError::NotApplicable { step: 1, .. })
        ));
    }

    #[test]
    fn validate_bad_plan_incomplete() {
        let domain = reopening_graph();
        let ops = [GraphOper::Edge(1), GraphOper::Edge(3)];
        assert!(matches!(
            validate(&domain, &ops),
            Err(ValidationError::GoalNotReached(_))
        ));
    }

    #[test]
    fn validate_plan_checks_states_and_cost() {
        let domain = reopening_graph();
        let ops = vec![GraphOper::Edge(2), GraphOper::Edge(3), GraphOper::Edge(4)];
        let states = |nodes: &[usize]| -> Vec<GraphState> {
            nodes.iter().map(|&node| GraphState { node }).collect()
        };

        let plan = Plan::new(ops.clone(), states(&[0, 2, 3, 4]), Cost::from(3.));
        assert_eq!(validate_plan(&domain, &plan), Ok(Cost::from(3.)));

        let plan = Plan::new(ops.clone(), states(&[0, 1, 3, 4]), Cost::from(3.));
        assert!(matches!(
            validate_plan(&domain, &plan),
            Err(ValidationError::StateMismatch { step: 1, .. })
        ));

        let plan = Plan::new(ops, states(&[0, 2, 3, 4]), Cost::from(12.));
        assert_eq!(
            validate_plan(&domain, &plan),
            Err(ValidationError::CostMismatch {
                reported: Cost::from(12.),
                replayed: Cost::from(3.)
            })
        );
    }
}
