//! Core data structures for gencheck.
//!
//! This module contains the variation catalog: which generator inputs a run
//! exercises and the names their output lands under.

pub mod variation;

pub use variation::{
    check_unique, component_variations, permutate_booleans, slice_variations, GeneratorKind,
    VariationSpec,
};
