use crate::cost::{operation_budget, CostModel};
use crate::join::{verify_candidates, JoinResultElement};
use crate::lb::candidate_index;
use crate::lb::degree_histogram::create_collection_histograms;
use crate::parsing::{LabelId, ParsedTree};

/// Degree histogram similarity join: histograms -> candidate index ->
/// bounded verification. Counters accumulate over repeated `execute_join`
/// calls on the same instance, construct a fresh join to reset them.
pub struct IndexedJoin<C> {
    costs: C,
    pre_candidates: u64,
    il_lookups: u64,
    subproblems: u64,
}

impl<C> IndexedJoin<C>
where
    C: CostModel<LabelId> + Clone + Sync,
{
    pub fn new(costs: C) -> Self {
        Self {
            costs,
            pre_candidates: 0,
            il_lookups: 0,
            subproblems: 0,
        }
    }

    /// Result order follows candidate emission order and is not sorted.
    pub fn execute_join(
        &mut self,
        trees_collection: &[ParsedTree],
        distance_threshold: f64,
    ) -> Vec<JoinResultElement> {
        let histogram_collection = create_collection_histograms(trees_collection);

        let k = operation_budget(&self.costs, distance_threshold);
        let lookup = candidate_index::lookup(&histogram_collection, k);
        self.pre_candidates += lookup.pre_candidates;
        self.il_lookups += lookup.il_lookups;

        let (join_result, subproblems) = verify_candidates(
            &self.costs,
            trees_collection,
            &lookup.candidates,
            distance_threshold,
        );
        self.subproblems += subproblems;

        join_result
    }

    pub fn pre_candidate_count(&self) -> u64 {
        self.pre_candidates
    }

    pub fn il_lookup_count(&self) -> u64 {
        self.il_lookups
    }

    pub fn subproblem_count(&self) -> u64 {
        self.subproblems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::UnitCost;
    use crate::join::test_support::{parse_collection, EXAMPLE};

    #[test]
    fn test_example_collection() {
        let trees = parse_collection(&EXAMPLE);
        let mut join = IndexedJoin::new(UnitCost);
        let result = join.execute_join(&trees, 1.0);
        assert_eq!(result, vec![JoinResultElement::new(0, 1, 1.0)]);
        assert!(join.subproblem_count() > 0);
        assert!(join.pre_candidate_count() >= 1);
    }

    #[test]
    fn test_empty_collection() {
        let mut join = IndexedJoin::new(UnitCost);
        assert_eq!(join.pre_candidate_count(), 0);
        assert_eq!(join.il_lookup_count(), 0);
        assert_eq!(join.subproblem_count(), 0);
        let result = join.execute_join(&[], 2.0);
        assert!(result.is_empty());
        assert_eq!(join.subproblem_count(), 0);
    }

    #[test]
    fn test_single_tree_collection() {
        let trees = parse_collection(&["{a{b}{c}}"]);
        let mut join = IndexedJoin::new(UnitCost);
        let result = join.execute_join(&trees, 5.0);
        assert!(result.is_empty());
        assert_eq!(join.pre_candidate_count(), 0);
    }

    #[test]
    fn test_counters_accumulate_across_calls() {
        let trees = parse_collection(&EXAMPLE);
        let mut join = IndexedJoin::new(UnitCost);
        join.execute_join(&trees, 1.0);
        let (pre, il, sub) = (
            join.pre_candidate_count(),
            join.il_lookup_count(),
            join.subproblem_count(),
        );
        join.execute_join(&trees, 1.0);
        assert_eq!(join.pre_candidate_count(), 2 * pre);
        assert_eq!(join.il_lookup_count(), 2 * il);
        assert_eq!(join.subproblem_count(), 2 * sub);
    }
}
