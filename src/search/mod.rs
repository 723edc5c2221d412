//! Coloring algorithms.

/// greedy DSATUR algorithm
pub mod greedy_dsatur;

/// Welsh-Powell greedy (largest degree first)
pub mod welsh_powell;

/// palette reduction shared by the local searches
pub mod palette;

/// backtracking-based DSATUR (optimal coloring)
pub mod dsatur_backtrack;

/// TABUCOL implementation
pub mod tabucol;

/// simulated annealing
pub mod simulated_annealing;
