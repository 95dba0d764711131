use crate::parsing::ParsedTree;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Out-degree value -> count of nodes having that out-degree.
pub type DegreeHistogram = FxHashMap<u32, u32>;

/// Degree histograms for a whole collection, in input order so that the
/// vector position is the tree id. Read-only once built.
#[derive(Debug, Default)]
pub struct HistogramCollection {
    /// Pairs of (tree size, histogram), one per input tree.
    pub histograms: Vec<(usize, DegreeHistogram)>,
    /// Highest out-degree seen anywhere in the collection, sizes the
    /// per-degree inverted lists of the candidate index.
    pub max_degree: u32,
}

impl HistogramCollection {
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }
}

/// Builds the degree histogram of every tree in the collection.
pub fn create_collection_histograms(tree_collection: &[ParsedTree]) -> HistogramCollection {
    let histograms: Vec<(usize, DegreeHistogram)> = tree_collection
        .par_iter()
        .map(|tree| (tree.count(), create_tree_histogram(tree)))
        .collect();

    let max_degree = histograms
        .iter()
        .flat_map(|(_, hist)| hist.keys().copied())
        .max()
        .unwrap_or(0);

    HistogramCollection {
        histograms,
        max_degree,
    }
}

/// Single traversal counting children per node.
pub fn create_tree_histogram(tree: &ParsedTree) -> DegreeHistogram {
    let Some(root) = tree.iter().next() else {
        panic!("Unable to get tree root, but tree is not empty!");
    };
    let root_id = tree.get_node_id(root).unwrap();

    let mut histogram = DegreeHistogram::default();
    for nid in root_id.descendants(tree) {
        let degree = nid.children(tree).count() as u32;
        histogram
            .entry(degree)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_tree, LabelDict};

    fn parse(input: &str, ld: &mut LabelDict) -> ParsedTree {
        parse_tree(Ok(input.to_owned()), ld).unwrap()
    }

    #[test]
    fn test_tree_histogram() {
        let mut ld = LabelDict::new();
        let tree = parse("{a{b{c}{d{c}}{b}}{f{g}{x}}}", &mut ld);
        let hist = create_tree_histogram(&tree);
        assert_eq!(hist, DegreeHistogram::from_iter([(0, 5), (1, 1), (2, 2), (3, 1)]));
    }

    #[test]
    fn test_single_node_histogram() {
        let mut ld = LabelDict::new();
        let tree = parse("{a}", &mut ld);
        assert_eq!(
            create_tree_histogram(&tree),
            DegreeHistogram::from_iter([(0, 1)])
        );
    }

    #[test]
    fn test_collection_order_and_max_degree() {
        let mut ld = LabelDict::new();
        let trees = vec![
            parse("{a{b}{c}{d}}", &mut ld),
            parse("{a}", &mut ld),
            parse("{a{b{c}}}", &mut ld),
        ];
        let collection = create_collection_histograms(&trees);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.max_degree, 3);
        assert_eq!(collection.histograms[0].0, 4);
        assert_eq!(collection.histograms[1].0, 1);
        assert_eq!(
            collection.histograms[2].1,
            DegreeHistogram::from_iter([(0, 1), (1, 2)])
        );
    }

    #[test]
    fn test_empty_collection() {
        let collection = create_collection_histograms(&[]);
        assert!(collection.is_empty());
        assert_eq!(collection.max_degree, 0);
    }
}
