use crate::lb::degree_histogram::{DegreeHistogram, HistogramCollection};
use std::collections::BTreeMap;

pub type Candidate = (usize, usize);
pub type Candidates = Vec<Candidate>;

/// Candidate pairs plus the pruning statistics of one index lookup.
/// Counters come back by value so parallel callers can merge by addition.
#[derive(Debug, Default)]
pub struct CandidateLookup {
    /// Unordered pairs `(i, j)` with `i < j`, each emitted at most once.
    pub candidates: Candidates,
    /// Pairs that reached the final histogram bound check.
    pub pre_candidates: u64,
    /// Occupied inverted list buckets visited.
    pub il_lookups: u64,
}

// A single edit operation moves at most 2 nodes out of any one degree
// bucket (the edited node's own bucket plus the parent changing degree)
// and changes the whole histogram by at most 3 L1 units (the same two
// buckets plus the parent's target bucket).
const MAX_BUCKET_SHIFT_PER_OP: u64 = 2;
const MAX_L1_SHIFT_PER_OP: usize = 3;

/// Retrieves all tree pairs whose degree histograms do not prove their
/// edit distance above the operation budget `k`.
///
/// Trees are swept in id order. For every degree present in the current
/// tree, earlier trees with a bucket count within `2k` are pulled from
/// the per-degree inverted list as pre-candidates; every tree has leaves,
/// so the degree-0 stratum alone already reaches every true match and the
/// other strata only deduplicate into the same pair. A pre-candidate is
/// kept when the full histogram L1 distance, divided by 3, stays within
/// `k` - a lower bound on the tree edit distance, so no true match is
/// ever dropped.
pub fn lookup(collection: &HistogramCollection, k: usize) -> CandidateLookup {
    let tree_count = collection.len();
    let mut result = CandidateLookup::default();
    if collection.is_empty() {
        return result;
    }

    // per degree: bucket count -> ids of earlier trees with that count,
    // ordered so a window lookup only touches occupied counts
    let mut il_index: Vec<BTreeMap<u32, Vec<usize>>> =
        vec![BTreeMap::new(); collection.max_degree as usize + 1];
    // marker array for first-touch dedup within one tree's sweep
    let mut last_touched = vec![usize::MAX; tree_count];

    let window = (k as u64).saturating_mul(MAX_BUCKET_SHIFT_PER_OP);

    for (tree_id, (tree_size, histogram)) in collection.histograms.iter().enumerate() {
        let mut pre_candidates = vec![];

        for (degree, count) in histogram.iter() {
            let lists = &il_index[*degree as usize];
            let lo = (*count as u64).saturating_sub(window) as u32;
            let hi = (*count as u64 + window).min(u32::MAX as u64) as u32;
            for other_ids in lists.range(lo..=hi).map(|(_, ids)| ids) {
                result.il_lookups += 1;
                for other_id in other_ids.iter() {
                    if last_touched[*other_id] != tree_id {
                        last_touched[*other_id] = tree_id;
                        pre_candidates.push(*other_id);
                    }
                }
            }
        }

        result.pre_candidates += pre_candidates.len() as u64;

        for other_id in pre_candidates {
            let (other_size, other_histogram) = &collection.histograms[other_id];
            let l1 = histogram_l1_distance(*tree_size, histogram, *other_size, other_histogram);
            if l1 / MAX_L1_SHIFT_PER_OP <= k {
                result.candidates.push((other_id, tree_id));
            }
        }

        for (degree, count) in histogram.iter() {
            il_index[*degree as usize]
                .entry(*count)
                .or_default()
                .push(tree_id);
        }
    }

    result
}

/// L1 distance between two degree histograms. Bucket counts sum up to the
/// tree size, so the distance is size1 + size2 - 2 * intersection.
fn histogram_l1_distance(
    s1: usize,
    h1: &DegreeHistogram,
    s2: usize,
    h2: &DegreeHistogram,
) -> usize {
    let intersection_size = h1.iter().fold(0, |intersection, (degree, count)| {
        intersection + std::cmp::min(count, h2.get(degree).unwrap_or(&0))
    }) as usize;

    (s1 + s2) - (2 * intersection_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lb::degree_histogram::create_collection_histograms;
    use crate::parsing::{parse_tree, LabelDict, ParsedTree};

    fn parse_collection(inputs: &[&str]) -> Vec<ParsedTree> {
        let mut ld = LabelDict::new();
        inputs
            .iter()
            .map(|s| parse_tree(Ok(s.to_string()), &mut ld).unwrap())
            .collect()
    }

    fn candidates_for(inputs: &[&str], k: usize) -> CandidateLookup {
        let trees = parse_collection(inputs);
        lookup(&create_collection_histograms(&trees), k)
    }

    #[test]
    fn test_empty_collection() {
        let result = candidates_for(&[], 3);
        assert!(result.candidates.is_empty());
        assert_eq!(result.pre_candidates, 0);
        assert_eq!(result.il_lookups, 0);
    }

    #[test]
    fn test_single_tree_has_no_pairs() {
        let result = candidates_for(&["{a{b}{c}}"], 3);
        assert!(result.candidates.is_empty());
        assert_eq!(result.pre_candidates, 0);
    }

    #[test]
    fn test_zero_threshold_keeps_histogram_matches() {
        // same shape, different labels: identical degree histograms
        let result = candidates_for(&["{a{b}{c}}", "{x{y}{z}}"], 0);
        assert_eq!(result.candidates, vec![(0, 1)]);
    }

    #[test]
    fn test_true_match_is_retained() {
        // deleting one child turns the first tree into the second, so the
        // pair must survive the filter at k = 1
        let result = candidates_for(&["{a{b}{c}}", "{a{b}}", "{x{y{z}}}"], 1);
        assert!(result.candidates.contains(&(0, 1)));
    }

    #[test]
    fn test_no_duplicate_pairs() {
        // many shared strata between equal shaped trees
        let result = candidates_for(
            &["{a{b}{c}}", "{a{b}{c}}", "{a{b}{c}}", "{a{b}{c}}"],
            2,
        );
        let mut seen = result.candidates.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), result.candidates.len(), "duplicate candidate pair");
        assert_eq!(seen.len(), 6);
        for (i, j) in result.candidates {
            assert!(i < j, "pair not emitted in id order");
        }
    }

    #[test]
    fn test_distant_histograms_are_pruned() {
        // star with 6 leaves vs a 7 node chain: the histograms share a
        // single leaf bucket node, L1 distance 12 busts the bound at k = 1
        let result = candidates_for(
            &["{a{b}{c}{d}{e}{f}{g}}", "{a{b{c{d{e{f{g}}}}}}}"],
            1,
        );
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_window_visits_occupied_buckets_only() {
        // huge budget, tiny index: the window spans thousands of counts
        // but only one bucket is occupied, so exactly one lookup happens
        let result = candidates_for(&["{a{b}{c}}", "{a{b}}"], 1000);
        assert_eq!(result.il_lookups, 1);
        assert_eq!(result.candidates, vec![(0, 1)]);
    }

    #[test]
    fn test_lookup_counters_move() {
        let result = candidates_for(&["{a{b}{c}}", "{a{b}}"], 1);
        assert!(result.il_lookups > 0);
        assert!(result.pre_candidates >= 1);
    }
}
