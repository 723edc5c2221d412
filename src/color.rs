use std::fmt::Debug;
use std::ops::Range;

use bit_set::BitSet;

/** Vertex Id */
pub type VertexId = usize;

/** Coloring of a graph: coloring[v] is the color of vertex v. Colors are 0-based. */
pub type Coloring = Vec<usize>;

/** Solution of a graph coloring problem
(represented as a partition).
*/
pub type Solution = Vec<Vec<VertexId>>;

/** read-only view over a graph coloring instance. Shared by every algorithm. */
pub trait ColoringInstance: Debug {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// number of (distinct) edges
    fn nb_edges(&self) -> usize;

    /// list of vertices adjacent to u
    fn neighbors(&self, u:VertexId) -> &[VertexId];

    /// degree of u
    fn degree(&self, u:VertexId) -> usize { self.neighbors(u).len() }

    /// returns true iff u and v are adjacent
    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool;

    /// edge list (u < v for each edge)
    fn edges(&self) -> &[(VertexId, VertexId)];

    /// vertex range
    fn vertices(&self) -> Range<VertexId> { 0..self.nb_vertices() }

    /// maximum degree of the graph (0 for the empty graph)
    fn max_degree(&self) -> usize {
        self.vertices().map(|u| self.degree(u)).max().unwrap_or(0)
    }

    /// print statistics of the instance
    fn display_statistics(&self) {
        println!("\t{} \t vertices", self.nb_vertices());
        println!("\t{} \t edges", self.nb_edges());
        let degrees:Vec<usize> = self.vertices().map(|i| self.degree(i)).collect();
        if let (Some(mini), Some(maxi)) = (degrees.iter().min(), degrees.iter().max()) {
            println!("\t{} \t min degree", mini);
            println!("\t{} \t max degree", maxi);
        }
    }
}

/** models an undirected simple graph. Immutable once built. */
#[derive(Debug, Clone)]
pub struct Graph {
    /// nb vertices
    n: usize,
    /// edges of the graph (u < v)
    edges: Vec<(VertexId,VertexId)>,
    /// adj_list[i]: list of vertices adjacent to i
    adj_list: Vec<Vec<VertexId>>,
    /// adj_matrix[i] represents a bitset of its neighbors
    adj_matrix: Vec<BitSet>,
}

impl ColoringInstance for Graph {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.edges.len() }

    fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool { self.adj_matrix[u].contains(v) }

    fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }
}

impl Graph {

    /** builds a graph with n vertices from an edge list (0-based).
    Self-loops and duplicate edges are ignored.

    # Panics
    - if an endpoint is not in 0..n
    */
    pub fn from_edges(n:usize, edge_list:&[(VertexId,VertexId)]) -> Self {
        let mut adj_list = vec![Vec::new() ; n];
        let mut adj_matrix = vec![BitSet::with_capacity(n) ; n];
        let mut edges = Vec::with_capacity(edge_list.len());
        for &(a,b) in edge_list {
            assert!(a < n && b < n, "edge ({},{}) out of range (n={})", a, b, n);
            if a == b || adj_matrix[a].contains(b) { continue; }
            adj_matrix[a].insert(b);
            adj_matrix[b].insert(a);
            adj_list[a].push(b);
            adj_list[b].push(a);
            edges.push((a.min(b), a.max(b)));
        }
        Self { n, edges, adj_list, adj_matrix }
    }

    /** builds a graph from a symmetric adjacency list */
    pub fn from_adj_list(adj_list:&[Vec<VertexId>]) -> Self {
        let mut edges = Vec::new();
        for (i,l) in adj_list.iter().enumerate() {
            for j in l {
                if i < *j {
                    edges.push((i,*j));
                }
            }
        }
        Self::from_edges(adj_list.len(), &edges)
    }
}


/** result of the solution checker */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerResult {
    /// feasible coloring using this number of colors
    Ok(usize),
    /// the coloring does not cover every vertex
    WrongLength {
        /// number of vertices of the instance
        expected:usize,
        /// length of the coloring
        found:usize,
    },
    /// the edge (u,v) joins two vertices of the same color
    Conflict(VertexId, VertexId),
}

/**
checks a coloring. Returns the number of colors used if it is feasible.
*/
pub fn checker(inst:&dyn ColoringInstance, coloring:&[usize]) -> CheckerResult {
    if coloring.len() != inst.nb_vertices() {
        return CheckerResult::WrongLength { expected: inst.nb_vertices(), found: coloring.len() };
    }
    for &(u,v) in inst.edges() {
        if coloring[u] == coloring[v] { return CheckerResult::Conflict(u, v); }
    }
    CheckerResult::Ok(nb_colors(coloring))
}

/// number of edges whose endpoints share a color (full recount)
pub fn count_conflicts(inst:&dyn ColoringInstance, coloring:&[usize]) -> usize {
    inst.edges().iter()
        .filter(|(u,v)| coloring[*u] == coloring[*v])
        .count()
}

/// number of colors used by a coloring (max color + 1)
pub fn nb_colors(coloring:&[usize]) -> usize {
    coloring.iter().max().map_or(0, |c| c+1)
}

/// builds the partition view of a coloring (res[c]: vertices colored with c)
pub fn to_partition(coloring:&[usize]) -> Solution {
    let mut res = vec![vec![] ; nb_colors(coloring)];
    for (v,c) in coloring.iter().enumerate() {
        res[*c].push(v);
    }
    res
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_drops_loops_and_duplicates() {
        let inst = Graph::from_edges(3, &[(0,1), (1,0), (1,1), (1,2)]);
        assert_eq!(inst.nb_vertices(), 3);
        assert_eq!(inst.nb_edges(), 2);
        assert_eq!(inst.neighbors(1), &[0,2]);
        assert!(inst.are_adjacent(2, 1));
        assert!(!inst.are_adjacent(0, 2));
        assert_eq!(inst.max_degree(), 2);
    }

    #[test]
    fn test_from_adj_list() {
        let inst = Graph::from_adj_list(&[vec![1,2], vec![0,3], vec![0,3], vec![1,2]]);
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,2]);
    }

    #[test]
    fn test_empty_graph() {
        let inst = Graph::from_edges(0, &[]);
        assert_eq!(inst.max_degree(), 0);
        assert_eq!(checker(&inst, &[]), CheckerResult::Ok(0));
    }

    #[test]
    fn test_checker() {
        let inst = Graph::from_edges(3, &[(0,1), (1,2)]);
        assert_eq!(checker(&inst, &[0,1,0]), CheckerResult::Ok(2));
        assert_eq!(checker(&inst, &[0,0,1]), CheckerResult::Conflict(0,1));
        assert_eq!(
            checker(&inst, &[0,1]),
            CheckerResult::WrongLength { expected:3, found:2 }
        );
    }

    #[test]
    fn test_conflicts_and_partition() {
        let inst = Graph::from_edges(4, &[(0,1), (1,2), (2,3), (3,0)]);
        assert_eq!(count_conflicts(&inst, &[0,0,0,0]), 4);
        assert_eq!(count_conflicts(&inst, &[0,1,0,1]), 0);
        assert_eq!(nb_colors(&[0,2,1]), 3);
        assert_eq!(to_partition(&[0,1,0,1]), vec![vec![0,2], vec![1,3]]);
    }
}
