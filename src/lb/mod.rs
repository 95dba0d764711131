//! Lower bound filtering for the similarity join: cheap structural
//! fingerprints that prune tree pairs without computing the exact edit
//! distance. The bound must never exceed the true distance, otherwise
//! the join would miss matches.

pub mod candidate_index;
pub mod degree_histogram;
