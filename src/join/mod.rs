//! Similarity join strategies. Both produce the same set of result
//! triples for a collection and threshold, the indexed join prunes with
//! the degree histogram index first while the naive join verifies every
//! pair and serves as the correctness oracle and performance baseline.

pub mod indexed;
pub mod naive;

use crate::cost::CostModel;
use crate::parsing::{LabelId, ParsedTree};
use crate::ted::touzet::Touzet;
use rayon::prelude::*;
use serde::Serialize;

/// One matching pair, tree ids are positions in the input collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinResultElement {
    pub t1: usize,
    pub t2: usize,
    pub distance: f64,
}

impl JoinResultElement {
    pub fn new(t1: usize, t2: usize, distance: f64) -> Self {
        Self { t1, t2, distance }
    }
}

/// Verifies candidate pairs in parallel, keeping pairs within the
/// threshold in candidate order. Workers run their own verifier instance
/// and the per-pair subproblem counts are merged by summation, nothing is
/// shared mutably across the shards.
pub(crate) fn verify_candidates<C>(
    costs: &C,
    trees: &[ParsedTree],
    candidates: &[(usize, usize)],
    threshold: f64,
) -> (Vec<JoinResultElement>, u64)
where
    C: CostModel<LabelId> + Clone + Sync,
{
    let verified: Vec<(Option<JoinResultElement>, u64)> = candidates
        .par_iter()
        .map_init(
            || Touzet::new(costs.clone()),
            |ted_algorithm, &(t1, t2)| {
                let before = ted_algorithm.subproblem_count();
                let ted_value = ted_algorithm.verify(&trees[t1], &trees[t2], threshold);
                let element = ted_value.map(|distance| JoinResultElement::new(t1, t2, distance));
                (element, ted_algorithm.subproblem_count() - before)
            },
        )
        .collect();

    let mut join_result = Vec::new();
    let mut subproblems = 0;
    for (element, pair_subproblems) in verified {
        subproblems += pair_subproblems;
        if let Some(element) = element {
            join_result.push(element);
        }
    }

    (join_result, subproblems)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parsing::{parse_tree, LabelDict, ParsedTree};

    pub fn parse_collection(inputs: &[&str]) -> Vec<ParsedTree> {
        let mut ld = LabelDict::new();
        inputs
            .iter()
            .map(|s| parse_tree(Ok(s.to_string()), &mut ld).unwrap())
            .collect()
    }

    /// The worked example: deleting one child of tree 0 yields tree 1,
    /// tree 2 is further than 1 from both.
    pub const EXAMPLE: [&str; 3] = ["{a{b}{c}}", "{a{b}}", "{x{y{z}}}"];
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::cost::UnitCost;

    #[test]
    fn test_verify_candidates_filters_and_counts() {
        let trees = parse_collection(&EXAMPLE);
        let all_pairs = [(0, 1), (0, 2), (1, 2)];
        let (result, subproblems) = verify_candidates(&UnitCost, &trees, &all_pairs, 1.0);
        assert_eq!(result, vec![JoinResultElement::new(0, 1, 1.0)]);
        assert!(subproblems > 0);
    }

    #[test]
    fn test_verify_candidates_keeps_candidate_order() {
        let trees = parse_collection(&["{a}", "{a}", "{a}"]);
        let pairs = [(1, 2), (0, 1), (0, 2)];
        let (result, _) = verify_candidates(&UnitCost, &trees, &pairs, 0.0);
        let ids: Vec<_> = result.iter().map(|e| (e.t1, e.t2)).collect();
        assert_eq!(ids, vec![(1, 2), (0, 1), (0, 2)]);
    }
}
