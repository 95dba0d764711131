use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Generates a deterministic random collection of bracket notation trees.
/// The same seed always produces the same dataset, which keeps benchmark
/// runs and the strategy equivalence tests reproducible.
pub fn random_collection(trees: usize, max_size: usize, labels: u32, seed: u64) -> Vec<String> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..trees)
        .map(|_| {
            let size = rng.gen_range(1..=max_size.max(1));
            random_tree(&mut rng, size, labels)
        })
        .collect()
}

/// One tree with exactly `size` nodes: the remaining budget is split into
/// random child subtree sizes left to right.
fn random_tree<R: Rng>(rng: &mut R, size: usize, labels: u32) -> String {
    let label = rng.gen_range(0..labels.max(1));
    let mut out = format!("{{{label}");
    let mut remaining = size - 1;
    while remaining > 0 {
        let child_size = rng.gen_range(1..=remaining);
        out.push_str(&random_tree(rng, child_size, labels));
        remaining -= child_size;
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_tree, LabelDict};

    #[test]
    fn test_deterministic_for_seed() {
        let a = random_collection(10, 8, 3, 7);
        let b = random_collection(10, 8, 3, 7);
        assert_eq!(a, b);
        let c = random_collection(10, 8, 3, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_trees_parse_with_requested_sizes() {
        let mut ld = LabelDict::new();
        for input in random_collection(25, 10, 4, 99) {
            let tree = parse_tree(Ok(input.clone()), &mut ld)
                .unwrap_or_else(|e| panic!("generated tree {input} does not parse: {e}"));
            assert!(tree.count() >= 1 && tree.count() <= 10);
        }
    }
}
