use rand::Rng;

use crate::color::{Graph, VertexId};

/// graph with n vertices and no edge (χ=1 if n>0)
pub fn empty(n:usize) -> Graph { Graph::from_edges(n, &[]) }

/// complete graph Kₙ (χ=n)
pub fn complete(n:usize) -> Graph {
    let mut edges = Vec::with_capacity(n*n.saturating_sub(1)/2);
    for u in 0..n {
        for v in u+1..n {
            edges.push((u,v));
        }
    }
    Graph::from_edges(n, &edges)
}

/// cycle Cₙ (χ=3 if n is odd, 2 otherwise). Requires n ≥ 3.
pub fn cycle(n:usize) -> Graph {
    assert!(n >= 3, "a cycle needs at least 3 vertices");
    let edges:Vec<(VertexId,VertexId)> = (0..n).map(|u| (u, (u+1)%n)).collect();
    Graph::from_edges(n, &edges)
}

/// path on n vertices
pub fn path(n:usize) -> Graph {
    let edges:Vec<(VertexId,VertexId)> = (1..n).map(|u| (u-1, u)).collect();
    Graph::from_edges(n, &edges)
}

/// star: vertex 0 is the centre, vertices 1..=leaves are the leaves
pub fn star(leaves:usize) -> Graph {
    let edges:Vec<(VertexId,VertexId)> = (1..=leaves).map(|u| (0, u)).collect();
    Graph::from_edges(leaves+1, &edges)
}

/// complete bipartite graph K_{a,b} (vertices 0..a on one side)
pub fn complete_bipartite(a:usize, b:usize) -> Graph {
    let mut edges = Vec::with_capacity(a*b);
    for u in 0..a {
        for v in a..a+b {
            edges.push((u,v));
        }
    }
    Graph::from_edges(a+b, &edges)
}

/// rows × cols grid (vertex r*cols+c)
pub fn grid(rows:usize, cols:usize) -> Graph {
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let u = r*cols + c;
            if c+1 < cols { edges.push((u, u+1)); }
            if r+1 < rows { edges.push((u, u+cols)); }
        }
    }
    Graph::from_edges(rows*cols, &edges)
}

/// Erdős–Rényi G(n,p) random graph
pub fn erdos_renyi<R:Rng>(n:usize, p:f64, rng:&mut R) -> Graph {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u+1..n {
            if rng.gen::<f64>() < p { edges.push((u,v)); }
        }
    }
    Graph::from_edges(n, &edges)
}


#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::color::ColoringInstance;

    #[test]
    fn test_families_sizes() {
        assert_eq!(complete(5).nb_edges(), 10);
        assert_eq!(cycle(7).nb_edges(), 7);
        assert_eq!(path(4).nb_edges(), 3);
        assert_eq!(star(5).degree(0), 5);
        assert_eq!(complete_bipartite(2, 3).nb_edges(), 6);
        assert_eq!(grid(3, 3).nb_edges(), 12);
        assert_eq!(empty(4).nb_edges(), 0);
    }

    #[test]
    fn test_erdos_renyi_seeded() {
        let g1 = erdos_renyi(30, 0.3, &mut StdRng::seed_from_u64(7));
        let g2 = erdos_renyi(30, 0.3, &mut StdRng::seed_from_u64(7));
        assert_eq!(g1.edges(), g2.edges());
        assert_eq!(erdos_renyi(10, 1.0, &mut StdRng::seed_from_u64(1)).nb_edges(), 45);
    }
}
