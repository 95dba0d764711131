use crate::parsing::{LabelId, ParsedTree};
use rustc_hash::FxHashMap;

/// Postorder index over one tree for edit distance verification.
///
/// Postorder ids start at 1, index 0 of every array is a dummy slot so the
/// ids can address the arrays directly. `llds[i]` is the postorder id of
/// the leftmost leaf descendant of node `i`, so the subtree rooted at `i`
/// spans the postorder ids `llds[i]..=i` and `sizes[i] = i - llds[i] + 1`.
/// Keyroots are, for every distinct lld value, the highest node carrying
/// it, in ascending postorder.
#[derive(Debug)]
pub struct TedIndex {
    pub sizes: Vec<usize>,
    pub labels: Vec<LabelId>,
    pub llds: Vec<usize>,
    pub keyroots: Vec<usize>,
}

impl TedIndex {
    pub fn new(tree: &ParsedTree) -> Self {
        let Some(root) = tree.iter().next() else {
            panic!("Unable to get root but tree is not empty!");
        };
        let root_id = tree.get_node_id(root).unwrap();
        let node_count = tree.count();

        let mut sizes = Vec::with_capacity(node_count + 1);
        let mut labels = Vec::with_capacity(node_count + 1);
        let mut llds = Vec::with_capacity(node_count + 1);
        sizes.push(0);
        labels.push(LabelId::default());
        llds.push(0);

        // Explicit stack instead of recursion, deep skewed trees would
        // otherwise overflow. An entry carries the lld once known: when a
        // node is discovered, the next postorder id to be assigned belongs
        // to its leftmost leaf.
        let mut stack = vec![(root_id, None)];
        while let Some((nid, lld)) = stack.pop() {
            match lld {
                None => {
                    let lld = llds.len();
                    stack.push((nid, Some(lld)));
                    for cnid in nid.reverse_children(tree) {
                        stack.push((cnid, None));
                    }
                }
                Some(lld) => {
                    let postorder_id = llds.len();
                    llds.push(lld);
                    sizes.push(postorder_id - lld + 1);
                    labels.push(*tree.get(nid).unwrap().get());
                }
            }
        }

        let mut highest_per_lld = FxHashMap::default();
        for (postorder_id, lld) in llds.iter().enumerate().skip(1) {
            highest_per_lld.insert(*lld, postorder_id);
        }
        let mut keyroots: Vec<usize> = highest_per_lld.into_values().collect();
        keyroots.sort_unstable();

        Self {
            sizes,
            labels,
            llds,
            keyroots,
        }
    }

    pub fn tree_size(&self) -> usize {
        self.sizes.len() - 1
    }
}
