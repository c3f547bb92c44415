//! Tabular batch module
//!
//! In-memory representation of one CSV file: an ordered set of named
//! columns of equal length holding heterogeneous [`Value`]s.
//!
//! # Overview
//!
//! A [`Batch`] is read once, transformed once by the normalizer and handed
//! once to a writer. Column order is preserved end to end so the output file
//! keeps the input layout, with derived columns appended.

mod types;

pub use types::{Batch, Column, Value};

#[cfg(test)]
mod tests;
