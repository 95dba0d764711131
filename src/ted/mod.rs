//! Exact tree edit distance verification.

pub mod touzet;
