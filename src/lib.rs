//! Graph coloring heuristics, exact solver and benchmark helpers

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// coloring instance base trait, solutions and checker
pub mod color;

/// read/write DIMACS formats
pub mod dimacs;

/// graph families with known chromatic numbers, random graphs
pub mod generators;

/// snapshot and progress reporting
pub mod report;

/// helper and utility methods for executables
pub mod util;

/// coloring algorithms
pub mod search;
