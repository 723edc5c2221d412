use bit_set::BitSet;

use crate::color::{ColoringInstance, Coloring, VertexId};
use crate::report::{SnapshotSink, NoSnapshot};

/** Welsh-Powell greedy algorithm.
Sorts the vertices by decreasing degree (ties: smallest id first), then builds the color
classes one after the other: each class takes, in this order, every uncolored vertex that is
not adjacent to a vertex already in the class.
*/
pub fn welsh_powell(inst:&dyn ColoringInstance) -> Coloring {
    welsh_powell_with_snapshots(inst, &mut NoSnapshot)
}

/** Welsh-Powell, reporting the partial coloring after each vertex is colored */
pub fn welsh_powell_with_snapshots(inst:&dyn ColoringInstance, snapshots:&mut dyn SnapshotSink) -> Coloring {
    let n = inst.nb_vertices();
    let mut order:Vec<VertexId> = inst.vertices().collect();
    order.sort_by(|a,b| inst.degree(*b).cmp(&inst.degree(*a)).then_with(|| a.cmp(b)));
    let mut colors:Vec<Option<usize>> = vec![None ; n];
    let mut nb_colored = 0;
    let mut color = 0;
    while nb_colored < n {
        let mut forbidden = BitSet::with_capacity(n); // vertices adjacent to the current class
        for v in order.iter() {
            if colors[*v].is_some() || forbidden.contains(*v) { continue; }
            colors[*v] = Some(color);
            nb_colored += 1;
            for u in inst.neighbors(*v) { forbidden.insert(*u); }
            snapshots.snapshot(&colors);
        }
        color += 1;
    }
    colors.into_iter().map(|c| c.unwrap_or_default()).collect()
}
