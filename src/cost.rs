//! Edit operation cost models for tree edit distance verification.
//!
//! The verifier only assumes non-negative costs and a minimum positive
//! operation cost, which it needs to turn a distance threshold into a
//! bound on the number of edit operations.

/// Costs of the three edit operations over node labels.
pub trait CostModel<L> {
    /// Cost of renaming `from` into `to`. Must be 0 for equal labels.
    fn rename(&self, from: &L, to: &L) -> f64;
    fn insert(&self, label: &L) -> f64;
    fn delete(&self, label: &L) -> f64;

    /// Smallest positive cost any single operation can have.
    fn min_cost(&self) -> f64;
}

/// Unit costs: every insert, delete and non-identity rename costs 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitCost;

impl<L: PartialEq> CostModel<L> for UnitCost {
    fn rename(&self, from: &L, to: &L) -> f64 {
        if from == to {
            0.0
        } else {
            1.0
        }
    }

    fn insert(&self, _label: &L) -> f64 {
        1.0
    }

    fn delete(&self, _label: &L) -> f64 {
        1.0
    }

    fn min_cost(&self) -> f64 {
        1.0
    }
}

/// Number of edit operations a `threshold` budget can pay for.
pub fn operation_budget<L, C: CostModel<L>>(costs: &C, threshold: f64) -> usize {
    (threshold / costs.min_cost()).floor() as usize
}
