/*! Threshold-bounded exact tree edit distance in the style of Touzet's
 k-strip algorithm [1], structured as the Zhang-Shasha keyroot
 decomposition [2] over postorder prefixes.

 [1] H. Touzet. Comparing similar ordered trees in linear-time.
     Journal of Discrete Algorithms. 2007.

 [2] K. Zhang and D. Shasha. Simple fast algorithms for the editing
     distance between trees and related problems. SIAM J. Comput. 1989.
!*/

use crate::cost::{operation_budget, CostModel};
use crate::indexing::TedIndex;
use crate::matrix::Matrix;
use crate::parsing::{LabelId, ParsedTree};

/// Verifies whether the edit distance of a tree pair stays within a
/// threshold, returning the exact distance when it does.
///
/// The distance threshold buys at most `k = floor(threshold / min_cost)`
/// edit operations. Any mapping within budget pairs nodes whose postorder
/// ids differ by at most k, and every cell its dynamic program touches lies
/// in the strip `|i - j| <= k`, so cells outside the strip are never
/// evaluated and read back as infinity. Strip-restricted cell values are
/// still costs of real edit scripts, which makes any finite result within
/// the threshold exact.
pub struct Touzet<C> {
    costs: C,
    subproblems: u64,
}

impl<C: CostModel<LabelId>> Touzet<C> {
    pub fn new(costs: C) -> Self {
        Self {
            costs,
            subproblems: 0,
        }
    }

    /// Dynamic programming cells evaluated so far, cumulative over all
    /// `verify` calls on this instance.
    pub fn subproblem_count(&self) -> u64 {
        self.subproblems
    }

    /// Returns `Some(distance)` iff the exact edit distance between `t1`
    /// and `t2` is at most `threshold`, `None` otherwise. Never leaks a
    /// partial value on the exceeds path.
    pub fn verify(&mut self, t1: &ParsedTree, t2: &ParsedTree, threshold: f64) -> Option<f64> {
        // The postorder index is rebuilt on every call on purpose, the
        // reference design favors correctness over repeated-call throughput.
        let x1 = TedIndex::new(t1);
        let x2 = TedIndex::new(t2);
        let (n1, n2) = (x1.tree_size(), x2.tree_size());

        // budgets beyond deleting and reinserting everything cannot widen
        // the strip any further
        let k = operation_budget(&self.costs, threshold).min(n1 + n2);

        // every size difference costs at least one insert or delete
        if n1.abs_diff(n2) > k {
            return None;
        }

        let mut td = Matrix::filled(n1 + 1, n2 + 1, f64::INFINITY);
        let mut fd = Matrix::zeros(n1 + 1, n2 + 1);

        for &kr1 in x1.keyroots.iter() {
            for &kr2 in x2.keyroots.iter() {
                self.forest_distance(&x1, &x2, kr1, kr2, k, &mut td, &mut fd);
            }
        }

        let distance = td[(n1, n2)];
        (distance <= threshold).then_some(distance)
    }

    /// Fills the strip-restricted forest distance rectangle spanned by one
    /// keyroot pair and records tree distances for the subtree pairs whose
    /// roots head full prefixes of the rectangle.
    fn forest_distance(
        &mut self,
        x1: &TedIndex,
        x2: &TedIndex,
        kr1: usize,
        kr2: usize,
        k: usize,
        td: &mut Matrix<f64>,
        fd: &mut Matrix<f64>,
    ) {
        let (l1, l2) = (x1.llds[kr1], x2.llds[kr2]);

        // Boundary: the distance against an empty forest is cumulative
        // deletion or insertion. Out-of-strip cells are written too but
        // masked on read by fd_at.
        fd[(l1 - 1, l2 - 1)] = 0.0;
        let mut delete_sum = 0.0;
        for i in l1..=kr1 {
            delete_sum += self.costs.delete(&x1.labels[i]);
            fd[(i, l2 - 1)] = delete_sum;
        }
        let mut insert_sum = 0.0;
        for j in l2..=kr2 {
            insert_sum += self.costs.insert(&x2.labels[j]);
            fd[(l1 - 1, j)] = insert_sum;
        }

        for i in l1..=kr1 {
            let strip_lo = std::cmp::max(l2, i.saturating_sub(k));
            let strip_hi = std::cmp::min(kr2, i + k);
            for j in strip_lo..=strip_hi {
                self.subproblems += 1;

                let deleted = fd_at(fd, i - 1, j, k) + self.costs.delete(&x1.labels[i]);
                let inserted = fd_at(fd, i, j - 1, k) + self.costs.insert(&x2.labels[j]);

                let full_prefixes = x1.llds[i] == l1 && x2.llds[j] == l2;
                let value = if full_prefixes {
                    // both prefixes are whole subtrees, matching the roots
                    // continues on the forest rectangle itself
                    let renamed = fd_at(fd, i - 1, j - 1, k)
                        + self.costs.rename(&x1.labels[i], &x2.labels[j]);
                    let value = deleted.min(inserted).min(renamed);
                    td[(i, j)] = value;
                    value
                } else {
                    // matching the roots consumes both subtrees whole and
                    // reuses their already computed tree distance
                    let matched = fd_at(fd, x1.llds[i] - 1, x2.llds[j] - 1, k) + td[(i, j)];
                    deleted.min(inserted).min(matched)
                };
                fd[(i, j)] = value;
            }
        }
    }
}

#[inline(always)]
fn fd_at(fd: &Matrix<f64>, i: usize, j: usize, k: usize) -> f64 {
    if i.abs_diff(j) <= k {
        fd[(i, j)]
    } else {
        f64::INFINITY
    }
}
