use std::cmp::{Ordering, Ord};

use priority_queue::PriorityQueue;
use bit_set::BitSet;

use crate::color::{ColoringInstance, Coloring, VertexId};
use crate::report::{SnapshotSink, NoSnapshot};

/** priority of an uncolored vertex: saturation, then residual degree, then smallest id */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DSatInfo {
    /// number of distinct colors among colored neighbors
    dsat: usize,
    /// number of uncolored neighbors
    residual_degree: usize,
    /// vertex id
    v: VertexId,
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.residual_degree.cmp(&other.residual_degree))
            .then_with(|| other.v.cmp(&self.v))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** implements a greedy DSATUR algorithm.
    1. choose an uncolored vertex that sees the most colors (break ties by the number of
       uncolored neighbors, then by the smallest id)
    2. assign it the first color available
    3. mark all its uncolored neighbors seeing this color, and update their priority
    4. repeat until a proper coloring is found

The vertex priorities are kept in an indexed heap (O(log n) updates).
*/
pub fn greedy_dsatur(inst:&dyn ColoringInstance) -> Coloring {
    greedy_dsatur_with_snapshots(inst, &mut NoSnapshot)
}

/** greedy DSATUR, reporting the partial coloring after each vertex is colored */
pub fn greedy_dsatur_with_snapshots(inst:&dyn ColoringInstance, snapshots:&mut dyn SnapshotSink) -> Coloring {
    let n:usize = inst.nb_vertices();
    let mut remaining_vertices:PriorityQueue<VertexId, DSatInfo> = PriorityQueue::with_capacity(n);
    for v in inst.vertices() {
        remaining_vertices.push(v, DSatInfo { dsat:0, residual_degree:inst.degree(v), v });
    }
    let mut colors:Vec<Option<usize>> = vec![None ; n]; // colors[v] -> color assigned to vertex v
    let mut adj_colors:Vec<BitSet> = vec![BitSet::default() ; n]; // adj_colors[v] -> colors v sees
    while let Some((current_vertex, _)) = remaining_vertices.pop() {
        // assign it a color
        let mut color:usize = 0;
        while adj_colors[current_vertex].contains(color) { color += 1; }
        colors[current_vertex] = Some(color);
        // update saturation degree information
        for neigh in inst.neighbors(current_vertex).iter()
        .filter(|neigh| colors[**neigh].is_none()) {
            let is_new_color = adj_colors[*neigh].insert(color);
            remaining_vertices.change_priority_by(neigh, |p| {
                if is_new_color { p.dsat += 1; }
                p.residual_degree -= 1;
            });
        }
        snapshots.snapshot(&colors);
    }
    colors.into_iter().map(|c| c.unwrap_or_default()).collect()
}
