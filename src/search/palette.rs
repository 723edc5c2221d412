use rand::Rng;
use bit_set::BitSet;

use crate::color::{ColoringInstance, Coloring, VertexId};

/** outcome of a repair attempt with a fixed number of colors */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// conflict-free coloring using colors 0..k
    Feasible(Coloring),
    /// the budget ran out. best: coloring with the fewest conflicts seen for this k
    Infeasible { best:Coloring, nb_conflicts:usize },
}

/** local search able to repair conflicts within a fixed palette */
pub trait PaletteRepair {
    /// tries to find a conflict-free coloring using at most k colors
    fn repair(&mut self, k:usize) -> RepairOutcome;
}

/** result of the palette reduction loop */
#[derive(Debug, Clone, Default)]
pub struct PaletteReduction {
    /// smallest k for which a conflict-free coloring was found, with the coloring
    pub best_feasible: Option<(usize, Coloring)>,
    /// first k that failed, with its best coloring and conflict count
    pub failure: Option<(usize, Coloring, usize)>,
}

/** tries k = max(1, Δ+1), Δ, ..., 1 and stops at the first k that can not be repaired */
pub fn reduce_palette<Repair:PaletteRepair>(inst:&dyn ColoringInstance, repair:&mut Repair) -> PaletteReduction {
    let mut res = PaletteReduction::default();
    if inst.nb_vertices() == 0 { return res; }
    let start_k = std::cmp::max(1, inst.max_degree()+1);
    for k in (1..=start_k).rev() {
        match repair.repair(k) {
            RepairOutcome::Feasible(coloring) => {
                res.best_feasible = Some((k, coloring));
            },
            RepairOutcome::Infeasible { best, nb_conflicts } => {
                res.failure = Some((k, best, nb_conflicts));
                break;
            }
        }
    }
    res
}

/** builds a k-coloring (possibly with conflicts).
Vertices are visited by decreasing degree. Each vertex takes a random color among the ones
not used by its already colored neighbors. If none is free, it takes the color minimizing
conflicts (smallest color on ties).
*/
pub fn initial_coloring<R:Rng>(inst:&dyn ColoringInstance, k:usize, rng:&mut R) -> Coloring {
    debug_assert!(k > 0);
    let n = inst.nb_vertices();
    let mut order:Vec<VertexId> = inst.vertices().collect();
    order.sort_by(|a,b| inst.degree(*b).cmp(&inst.degree(*a))); // stable: ties keep id order
    let mut colors:Vec<Option<usize>> = vec![None ; n];
    let mut nb_neigh_colors:Vec<usize> = vec![0 ; k]; // number of colored neighbors per color
    let mut available:Vec<usize> = Vec::with_capacity(k);
    for v in order {
        nb_neigh_colors.iter_mut().for_each(|e| *e = 0);
        for u in inst.neighbors(v) {
            if let Some(c) = colors[*u] { nb_neigh_colors[c] += 1; }
        }
        available.clear();
        available.extend((0..k).filter(|c| nb_neigh_colors[*c] == 0));
        colors[v] = Some(if available.is_empty() {
            // min_by_key returns the first minimum
            (0..k).min_by_key(|c| nb_neigh_colors[*c]).unwrap_or(0)
        } else {
            available[rng.gen_range(0..available.len())]
        });
    }
    colors.into_iter().map(|c| c.unwrap_or_default()).collect()
}

/** deterministic first-fit coloring in vertex id order */
pub fn first_fit(inst:&dyn ColoringInstance) -> Coloring {
    let n = inst.nb_vertices();
    let mut colors:Vec<Option<usize>> = vec![None ; n];
    let mut used = BitSet::new();
    for v in inst.vertices() {
        used.clear();
        for u in inst.neighbors(v) {
            if let Some(c) = colors[*u] { used.insert(c); }
        }
        colors[v] = Some((0..).find(|c| !used.contains(*c)).unwrap_or(0));
    }
    colors.into_iter().map(|c| c.unwrap_or_default()).collect()
}
