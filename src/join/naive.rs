use crate::cost::CostModel;
use crate::join::{verify_candidates, JoinResultElement};
use crate::parsing::{LabelId, ParsedTree};
use itertools::Itertools;

/// Unconditional all-pairs join. Quadratic in the collection size, kept
/// as the ground truth oracle and performance baseline for the indexed
/// join.
pub struct NaiveJoin<C> {
    costs: C,
    subproblems: u64,
}

impl<C> NaiveJoin<C>
where
    C: CostModel<LabelId> + Clone + Sync,
{
    pub fn new(costs: C) -> Self {
        Self {
            costs,
            subproblems: 0,
        }
    }

    /// Results come back in ascending `(i, j)` order.
    pub fn execute_join(
        &mut self,
        trees_collection: &[ParsedTree],
        distance_threshold: f64,
    ) -> Vec<JoinResultElement> {
        let all_pairs: Vec<(usize, usize)> =
            (0..trees_collection.len()).tuple_combinations().collect();

        let (join_result, subproblems) = verify_candidates(
            &self.costs,
            trees_collection,
            &all_pairs,
            distance_threshold,
        );
        self.subproblems += subproblems;

        join_result
    }

    pub fn subproblem_count(&self) -> u64 {
        self.subproblems
    }
}
