use std::time::{Duration, Instant};

use bit_set::BitSet;

use crate::color::{ColoringInstance, Coloring, VertexId, nb_colors};
use crate::report::{SnapshotSink, NoSnapshot, ProgressSink, NoProgress, ProgressReport};
use crate::search::greedy_dsatur::greedy_dsatur;

/// shortest allowed delay between two progress reports (seconds)
const MIN_PROGRESS_INTERVAL:f64 = 0.05;

/// longest allowed delay between two progress reports (seconds)
const MAX_PROGRESS_INTERVAL:f64 = 600.;


/** parameters of the exact solver */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactConfig {
    /// delay between two progress reports
    pub progress_interval: Duration,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self { progress_interval: Duration::from_secs(5) }
    }
}

impl ExactConfig {
    /// sets the delay between two progress reports (clamped to [0.05, 600] seconds)
    pub fn with_progress_interval(mut self, seconds:f64) -> Self {
        let seconds = if seconds.is_nan() { 5. } else { seconds };
        self.progress_interval = Duration::from_secs_f64(
            seconds.max(MIN_PROGRESS_INTERVAL).min(MAX_PROGRESS_INTERVAL)
        );
        self
    }
}


/** wall-clock timer deciding when a progress report is due */
#[derive(Debug, Clone, Copy)]
struct ProgressClock {
    start: Instant,
    last_report: Instant,
    interval: Duration,
}

impl ProgressClock {
    fn new(start:Instant, interval:Duration) -> Self {
        Self { start, last_report: start, interval }
    }

    /// returns the elapsed time if a report is due at `now` (and resets the timer)
    fn due(&mut self, now:Instant) -> Option<Duration> {
        if now.duration_since(self.last_report) >= self.interval {
            self.last_report = now;
            Some(now.duration_since(self.start))
        } else {
            None
        }
    }
}


/** represents a decision (assigning color c to vertex v) */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    v: VertexId,
    c: usize,
}

/// either a decision, either a commit
#[derive(Debug)]
enum BacktrackEvent {
    Commit(Decision), // decision to commit
    Restore(Decision) // decision taken
}


/**
Exact branch and bound for the graph coloring problem (backtracking DSATUR).
The upper bound is given by a greedy DSATUR. Each node colors the uncolored vertex with
the largest saturation degree (ties: largest degree, then smallest id), either with a color
already used and not seen by the vertex, or with a new color if it can still improve the
best known coloring.

The depth-first search is iterative: the decisions to take and to undo are stored in an
explicit stack.
*/
#[derive(Debug)]
pub struct BacktrackingDsatur<'a> {
    /// instance
    inst: &'a dyn ColoringInstance,
    /// parameters
    config: ExactConfig,
    /// set of uncolored vertices
    uncolored: BitSet,
    /// dsat[v]: saturation degree of vertex v
    dsat: Vec<usize>,
    /// colors[i]: color assigned to vertex i
    colors: Vec<Option<usize>>,
    /// number of colors in the search state
    nb_colors: usize,
    /// nb_adj_colored[v][c]: number of vertices adjacent to v colored with c
    nb_adj_colored: Vec<Vec<usize>>,
    /// color_nb_vertices[c]: number of vertices using color c
    color_nb_vertices: Vec<usize>,
    /// number of colors of the best known coloring
    upper_bound: usize,
    /// decision history
    decisions: Vec<BacktrackEvent>,
    /// number of colored vertices
    nb_colored: usize,
    /// best so far coloring
    best_coloring: Coloring,
    /// number of nodes visited
    nb_nodes: u64,
}


impl<'a> BacktrackingDsatur<'a> {
    /** creates a new backtracking DSATUR search, seeded by a greedy DSATUR */
    pub fn new(inst:&'a dyn ColoringInstance, config:ExactConfig) -> Self {
        let n = inst.nb_vertices();
        let best_coloring = greedy_dsatur(inst);
        let upper_bound = nb_colors(&best_coloring);
        let mut uncolored = BitSet::with_capacity(n);
        for v in inst.vertices() { uncolored.insert(v); }
        Self {
            inst,
            config,
            uncolored,
            dsat: vec![0 ; n],
            colors: vec![None ; n],
            nb_colors: 0,
            nb_adj_colored: vec![vec![0 ; upper_bound] ; n],
            color_nb_vertices: vec![0 ; upper_bound],
            upper_bound,
            decisions: Vec::with_capacity(n),
            nb_colored: 0,
            best_coloring,
            nb_nodes: 0,
        }
    }

    /// number of colors of the best coloring found so far
    pub fn upper_bound(&self) -> usize { self.upper_bound }

    /// number of search nodes visited
    pub fn nb_nodes(&self) -> u64 { self.nb_nodes }

    /// best coloring found so far
    pub fn best_coloring(&self) -> &[usize] { &self.best_coloring }

    /// finds the next vertex to color (maximum saturation degree, break ties by degree)
    fn next_vertex(&self) -> Option<VertexId> {
        self.uncolored.iter().max_by(|a,b| {
            self.dsat[*a].cmp(&self.dsat[*b])
                .then_with(|| self.inst.degree(*a).cmp(&self.inst.degree(*b)))
                .then_with(|| b.cmp(a))
        })
    }

    /// returns the next vertex and possible colorings for it.
    fn next_decisions(&self) -> Option<(VertexId, Vec<usize>)> {
        let v = self.next_vertex()?;
        // compute candidate colors (non-adjacent colors)
        let mut candidate_colors:Vec<usize> = (0..self.nb_colors)
            .filter(|c| self.nb_adj_colored[v][*c] == 0).collect();
        // if it can still improve, color the vertex with a new color
        if self.nb_colors + 1 < self.upper_bound {
            candidate_colors.push(self.nb_colors);
        }
        Some((v, candidate_colors))
    }

    /// applies a decision to the search space
    fn commit(&mut self, decision:Decision) {
        self.color_nb_vertices[decision.c] += 1;
        self.nb_colored += 1;
        if decision.c == self.nb_colors {
            self.nb_colors += 1;
        }
        debug_assert!(self.colors[decision.v].is_none());
        self.colors[decision.v] = Some(decision.c);
        for &u in self.inst.neighbors(decision.v) {
            self.nb_adj_colored[u][decision.c] += 1;
            // update dsat value of u
            if self.nb_adj_colored[u][decision.c] == 1 {
                self.dsat[u] += 1;
            }
        }
        self.uncolored.remove(decision.v);
    }

    /// restores the search space from a decision (does not pop self.decisions)
    fn restore(&mut self, decision:Decision) {
        self.color_nb_vertices[decision.c] -= 1;
        self.nb_colored -= 1;
        // change nb_colors if the last color is removed (c should be the last color)
        if self.color_nb_vertices[decision.c] == 0 {
            debug_assert_eq!(decision.c, self.nb_colors-1);
            self.nb_colors -= 1;
        }
        debug_assert!(self.colors[decision.v].is_some());
        self.colors[decision.v] = None;
        for &u in self.inst.neighbors(decision.v) {
            self.nb_adj_colored[u][decision.c] -= 1;
            if self.nb_adj_colored[u][decision.c] == 0 {
                self.dsat[u] -= 1;
            }
        }
        self.uncolored.insert(decision.v);
    }

    /// pushes the children of the current node (smallest color on top)
    fn push_next_decisions(&mut self) {
        // no uncolored vertex left: nothing to branch on
        let (v, colors) = match self.next_decisions() {
            None => return,
            Some(e) => e,
        };
        for c in colors.iter().rev() {
            let decision = Decision { v, c:*c };
            self.decisions.push(BacktrackEvent::Restore(decision)); // prepare to backtrack
            self.decisions.push(BacktrackEvent::Commit(decision)); // decision to apply
        }
    }

    /// backtracking search
    ///
    /// Stores the decisions to be taken in a stack.
    /// pops each decision, try to apply it
    /// when all vertices are assigned, report a new solution
    pub fn dfs_search(&mut self, progress:&mut dyn ProgressSink, snapshots:&mut dyn SnapshotSink) {
        let n = self.inst.nb_vertices();
        if self.upper_bound <= 1 { return; }
        let mut clock = ProgressClock::new(Instant::now(), self.config.progress_interval);
        // populate decisions with the root node children
        self.push_next_decisions();
        while let Some(event) = self.decisions.pop() {
            match event {
                BacktrackEvent::Restore(decision) => { // restore the state
                    self.restore(decision);
                },
                BacktrackEvent::Commit(decision) => { // apply the decision and generate children
                    self.commit(decision);
                    self.nb_nodes += 1;
                    if let Some(elapsed) = clock.due(Instant::now()) {
                        progress.report(&ProgressReport {
                            elapsed,
                            nb_nodes: self.nb_nodes,
                            nb_colored: self.nb_colored,
                            best_nb_colors: self.upper_bound,
                        });
                    }
                    if self.nb_colors >= self.upper_bound { continue; } // check bound
                    if self.nb_colored == n { // feasible solution (improving by the bound check)
                        self.upper_bound = self.nb_colors;
                        for (v,c) in self.colors.iter().enumerate() {
                            self.best_coloring[v] = c.unwrap_or_default();
                        }
                        snapshots.snapshot(&self.colors);
                    } else {
                        self.push_next_decisions();
                    }
                }
            }
        }
    }
}


/** computes an optimal coloring (exponential time: small instances only) */
pub fn exact_coloring(inst:&dyn ColoringInstance) -> Coloring {
    exact_coloring_with(inst, &ExactConfig::default(), &mut NoProgress, &mut NoSnapshot)
}

/** computes an optimal coloring, reporting the progress and each improving coloring */
pub fn exact_coloring_with(
    inst:&dyn ColoringInstance,
    config:&ExactConfig,
    progress:&mut dyn ProgressSink,
    snapshots:&mut dyn SnapshotSink,
) -> Coloring {
    if inst.nb_vertices() == 0 { return Vec::new(); }
    let mut space = BacktrackingDsatur::new(inst, *config);
    snapshots.snapshot_complete(space.best_coloring());
    space.dfs_search(progress, snapshots);
    space.best_coloring
}


#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::color::{checker, CheckerResult, Graph};
    use crate::generators;

    /// checks by brute force if the graph admits a k-coloring
    fn is_colorable(inst:&dyn ColoringInstance, k:usize, colors:&mut Vec<usize>) -> bool {
        let v = colors.len();
        if v == inst.nb_vertices() { return true; }
        for c in 0..k {
            if inst.neighbors(v).iter().all(|u| *u >= v || colors[*u] != c) {
                colors.push(c);
                if is_colorable(inst, k, colors) { return true; }
                colors.pop();
            }
        }
        false
    }

    fn chromatic_number(inst:&dyn ColoringInstance) -> usize {
        (0..=inst.nb_vertices()).find(|k| is_colorable(inst, *k, &mut Vec::new())).unwrap()
    }

    fn nb_optimal_colors(inst:&dyn ColoringInstance) -> usize {
        let coloring = exact_coloring(inst);
        match checker(inst, &coloring) {
            CheckerResult::Ok(k) => k,
            other => panic!("invalid coloring: {:?}", other),
        }
    }

    #[test]
    fn test_config_clamping() {
        assert_eq!(ExactConfig::default().progress_interval, Duration::from_secs(5));
        let low = ExactConfig::default().with_progress_interval(0.);
        assert_eq!(low.progress_interval, Duration::from_millis(50));
        let high = ExactConfig::default().with_progress_interval(1e9);
        assert_eq!(high.progress_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_progress_clock() {
        let start = Instant::now();
        let mut clock = ProgressClock::new(start, Duration::from_secs(5));
        assert_eq!(clock.due(start + Duration::from_secs(1)), None);
        assert_eq!(clock.due(start + Duration::from_secs(6)), Some(Duration::from_secs(6)));
        assert_eq!(clock.due(start + Duration::from_secs(8)), None);
        assert_eq!(clock.due(start + Duration::from_secs(11)), Some(Duration::from_secs(11)));
    }

    #[test]
    fn test_trivial_graphs() {
        assert!(exact_coloring(&generators::empty(0)).is_empty());
        assert_eq!(exact_coloring(&generators::empty(1)), vec![0]);
        assert_eq!(exact_coloring(&generators::empty(7)), vec![0 ; 7]);
    }

    #[test]
    fn test_complete_graphs() {
        for n in 1..8 {
            assert_eq!(nb_optimal_colors(&generators::complete(n)), n);
        }
    }

    #[test]
    fn test_odd_cycles_and_bipartite() {
        for n in &[3, 5, 7, 9, 11] {
            assert_eq!(nb_optimal_colors(&generators::cycle(*n)), 3);
        }
        assert_eq!(nb_optimal_colors(&generators::cycle(8)), 2);
        assert_eq!(nb_optimal_colors(&generators::complete_bipartite(3, 4)), 2);
        assert_eq!(nb_optimal_colors(&generators::grid(3, 4)), 2);
    }

    #[test]
    fn test_path4_alternates() {
        let coloring = exact_coloring(&generators::path(4));
        assert_eq!(nb_colors(&coloring), 2);
        assert!(coloring.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(coloring[0], coloring[2]);
        assert_eq!(coloring[1], coloring[3]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..20 {
            let inst = generators::erdos_renyi(9, 0.5, &mut rng);
            assert_eq!(nb_optimal_colors(&inst), chromatic_number(&inst));
        }
    }

    #[test]
    fn test_progress_is_observational() {
        let inst = generators::erdos_renyi(14, 0.5, &mut StdRng::seed_from_u64(2));
        let config = ExactConfig::default().with_progress_interval(0.);
        let mut reports:Vec<ProgressReport> = Vec::new();
        let mut snapshots:Vec<Vec<Option<usize>>> = Vec::new();
        let with_sinks = exact_coloring_with(&inst, &config, &mut reports, &mut snapshots);
        assert_eq!(with_sinks, exact_coloring(&inst));
        for report in reports.iter() {
            assert!(report.best_nb_colors >= nb_colors(&with_sinks));
        }
        // the first snapshot is the greedy seed, the last one the optimum
        let last:Vec<Option<usize>> = with_sinks.iter().map(|c| Some(*c)).collect();
        assert_eq!(snapshots.last(), Some(&last));
    }

    #[test]
    fn test_node_counter() {
        let inst = generators::cycle(7);
        let mut space = BacktrackingDsatur::new(&inst, ExactConfig::default());
        assert_eq!(space.upper_bound(), 3);
        space.dfs_search(&mut NoProgress, &mut NoSnapshot);
        assert!(space.nb_nodes() > 0);
        assert_eq!(space.upper_bound(), 3);
    }

    proptest! {
        #[test]
        fn prop_optimal_on_small_graphs(n in 1usize..9, p in 0.0f64..1.0, seed in any::<u64>()) {
            let inst:Graph = generators::erdos_renyi(n, p, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(nb_optimal_colors(&inst), chromatic_number(&inst));
        }
    }
}
