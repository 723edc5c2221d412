use std::cmp::max;

use rand::Rng;
use bit_set::BitSet;

use crate::color::{ColoringInstance, Coloring, VertexId};
use crate::report::{SnapshotSink, NoSnapshot};
use crate::search::palette::{PaletteRepair, RepairOutcome, reduce_palette, initial_coloring, first_fit};


/** parameters of the TabuCol local search */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabuColConfig {
    /// maximum number of moves for each number of colors
    pub max_iterations: usize,
    /// number of iterations a vertex can not go back to the color it left
    pub tabu_tenure: usize,
}

impl TabuColConfig {
    /// default parameters for an instance with n vertices
    pub fn for_instance(n:usize) -> Self {
        Self {
            max_iterations: max(10_000, 100*n),
            tabu_tenure: max(7, n/10),
        }
    }

    /// sets the maximum number of iterations (at least 1)
    pub fn with_max_iterations(mut self, max_iterations:usize) -> Self {
        self.max_iterations = max(1, max_iterations);
        self
    }

    /// sets the tabu tenure (at least 1)
    pub fn with_tabu_tenure(mut self, tabu_tenure:usize) -> Self {
        self.tabu_tenure = max(1, tabu_tenure);
        self
    }
}


/**
Decision of changing the color of vertex v by c
*/
#[derive(Debug,Clone,Copy,Hash,Eq,PartialEq)]
pub struct Decision {
    /// vertex to color
    pub v: VertexId,
    /// previously used color for v
    pub c_prev: usize,
    /// color to use
    pub c_next: usize,
}


/** (see https://doi.org/10.1016/j.cor.2005.07.028)
Search state of TabuCol for a fixed number of colors.
Maintains incrementally the number of conflicting edges, the set of conflicting vertices
and, for each vertex, the number of its neighbors using each color.
*/
#[derive(Debug)]
struct SearchState<'a> {
    /// reference instance
    inst: &'a dyn ColoringInstance,
    /// colors[v]: color of the vertex v
    colors: Vec<usize>,
    /// number of colors available
    nb_colors: usize,
    /// nb_neigh_colors[v][c]: number of neighbors of v that are assigned color c
    nb_neigh_colors: Vec<Vec<usize>>,
    /// vertices having at least one neighbor with the same color
    conflicting_vertices: BitSet,
    /// number of conflicting edges
    nb_conflicts: usize,
    /// tabu[v][c]: v can not move back to c while the iteration is lower than this value
    tabu: Vec<Vec<usize>>,
}

impl<'a> SearchState<'a> {

    /** creates the search state from a coloring using colors 0..nb_colors */
    fn new(inst:&'a dyn ColoringInstance, colors:Coloring, nb_colors:usize) -> Self {
        let n = inst.nb_vertices();
        let mut nb_neigh_colors = vec![vec![0 ; nb_colors] ; n];
        for &(u,v) in inst.edges() {
            nb_neigh_colors[u][colors[v]] += 1;
            nb_neigh_colors[v][colors[u]] += 1;
        }
        let mut conflicting_vertices = BitSet::with_capacity(n);
        let mut nb_conflicts = 0;
        for &(u,v) in inst.edges() {
            if colors[u] == colors[v] {
                nb_conflicts += 1;
                conflicting_vertices.insert(u);
                conflicting_vertices.insert(v);
            }
        }
        Self {
            inst,
            colors,
            nb_colors,
            nb_neigh_colors,
            conflicting_vertices,
            nb_conflicts,
            tabu: vec![vec![0 ; nb_colors] ; n],
        }
    }

    /** finds the best admissible move among the conflicting vertices.
    A move going back to a tabu color is admissible only if it reaches less conflicts than
    best_nb_conflicts (aspiration). Ties on the delta prefer non-tabu moves.
    Returns the move and its delta on the number of conflicts.
    */
    fn best_move(&self, iter:usize, best_nb_conflicts:usize) -> Option<(Decision, i64)> {
        let mut best:Option<(Decision, i64)> = None;
        let mut best_is_tabu = true;
        for v in self.conflicting_vertices.iter() {
            let c_prev = self.colors[v];
            let current = self.nb_neigh_colors[v][c_prev] as i64;
            for c_next in (0..self.nb_colors).filter(|c| *c != c_prev) {
                let delta = self.nb_neigh_colors[v][c_next] as i64 - current;
                let is_tabu = self.tabu[v][c_next] > iter;
                let aspiration = (self.nb_conflicts as i64 + delta) < best_nb_conflicts as i64;
                let best_delta = best.map_or(i64::MAX, |(_,d)| d);
                let select = if delta < best_delta {
                    !is_tabu || aspiration
                } else {
                    delta == best_delta && best_is_tabu && !is_tabu
                };
                if select {
                    best = Some((Decision { v, c_prev, c_next }, delta));
                    best_is_tabu = is_tabu && !aspiration;
                }
            }
        }
        best
    }

    /** applies a decision, updating the conflict information in O(d(v)) */
    fn apply_decision(&mut self, decision:&Decision) {
        debug_assert!(decision.c_next < self.nb_colors);
        debug_assert_eq!(self.colors[decision.v], decision.c_prev);
        let (v, c_prev, c_next) = (decision.v, decision.c_prev, decision.c_next);
        for &u in self.inst.neighbors(v) {
            self.nb_neigh_colors[u][c_prev] -= 1;
            self.nb_neigh_colors[u][c_next] += 1;
            if self.colors[u] == c_prev { // remove conflict
                self.nb_conflicts -= 1;
                if self.nb_neigh_colors[u][c_prev] == 0 {
                    self.conflicting_vertices.remove(u);
                }
            }
            if self.colors[u] == c_next { // add conflict
                self.nb_conflicts += 1;
                self.conflicting_vertices.insert(u);
            }
        }
        self.colors[v] = c_next;
        if self.nb_neigh_colors[v][c_next] > 0 {
            self.conflicting_vertices.insert(v);
        } else {
            self.conflicting_vertices.remove(v);
        }
    }

    /** applies a decision and forbids going back to the previous color until `tabu_until` */
    fn commit(&mut self, decision:&Decision, tabu_until:usize) {
        self.apply_decision(decision);
        self.tabu[decision.v][decision.c_prev] = tabu_until;
    }
}


/** TabuCol repairing colorings with a fixed number of colors */
struct TabuCol<'a, R:Rng, S:SnapshotSink+?Sized> {
    inst: &'a dyn ColoringInstance,
    config: TabuColConfig,
    rng: &'a mut R,
    snapshots: &'a mut S,
}

impl<'a, R:Rng, S:SnapshotSink+?Sized> PaletteRepair for TabuCol<'a, R, S> {
    fn repair(&mut self, k:usize) -> RepairOutcome {
        let colors = initial_coloring(self.inst, k, &mut *self.rng);
        let mut state = SearchState::new(self.inst, colors, k);
        if state.nb_conflicts == 0 {
            return RepairOutcome::Feasible(state.colors);
        }
        let mut best_nb_conflicts = state.nb_conflicts;
        let mut best_colors = state.colors.clone();
        for iter in 1..=self.config.max_iterations {
            let decision = match state.best_move(iter, best_nb_conflicts) {
                None => break,
                Some((decision, _)) => decision,
            };
            state.commit(&decision, iter + self.config.tabu_tenure);
            if state.nb_conflicts < best_nb_conflicts {
                best_nb_conflicts = state.nb_conflicts;
                best_colors.copy_from_slice(&state.colors);
                self.snapshots.snapshot_complete(&state.colors);
            }
            if state.nb_conflicts == 0 {
                return RepairOutcome::Feasible(state.colors);
            }
        }
        RepairOutcome::Infeasible { best: best_colors, nb_conflicts: best_nb_conflicts }
    }
}


/**
Runs TabuCol with a decreasing number of colors, starting from Δ+1, and stops at the first
number of colors for which no conflict-free coloring is found within the iteration budget.
Returns the last conflict-free coloring (or a first-fit coloring if none was found).
*/
pub fn tabucol<R:Rng>(inst:&dyn ColoringInstance, config:&TabuColConfig, rng:&mut R) -> Coloring {
    tabucol_with_snapshots(inst, config, rng, &mut NoSnapshot)
}

/** TabuCol, reporting each improving move and the final coloring */
pub fn tabucol_with_snapshots<R:Rng>(
    inst:&dyn ColoringInstance,
    config:&TabuColConfig,
    rng:&mut R,
    snapshots:&mut dyn SnapshotSink,
) -> Coloring {
    if inst.nb_vertices() == 0 { return Vec::new(); }
    let mut search = TabuCol { inst, config:*config, rng, snapshots: &mut *snapshots };
    let reduction = reduce_palette(inst, &mut search);
    let res = match reduction.best_feasible {
        Some((_, coloring)) => coloring,
        None => first_fit(inst),
    };
    snapshots.snapshot_complete(&res);
    res
}
