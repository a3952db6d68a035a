//! Minimum spanning tree over the full distance graph.

use crate::instance::Instance;

/// Union-find (disjoint set forest) with path compression and union by
/// rank, used to build the MST with Kruskal's algorithm.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Unions the sets containing `a` and `b`. Returns `true` if they were
    /// in different sets (and are now merged).
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// A minimum spanning tree over all `n` nodes of an [`Instance`] (depot
/// included), stored as an adjacency list of tree edges.
///
/// Built with Kruskal's algorithm over edges sorted by `(weight, i, j)`
/// ascending, which makes the tree deterministic even when distances tie.
#[derive(Debug, Clone)]
pub struct Mst {
    adjacency: Vec<Vec<(usize, i64)>>,
    total_weight: i64,
}

impl Mst {
    /// Builds the MST of the complete graph on `inst`'s `n` nodes.
    pub fn build(inst: &Instance) -> Self {
        let n = inst.n();
        let mut edges: Vec<(i64, usize, usize)> = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((inst.distance(i, j), i, j));
            }
        }
        edges.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut uf = UnionFind::new(n);
        let mut adjacency = vec![Vec::new(); n];
        let mut total_weight = 0;

        for (w, i, j) in edges {
            if uf.union(i, j) {
                adjacency[i].push((j, w));
                adjacency[j].push((i, w));
                total_weight += w;
            }
        }

        Self {
            adjacency,
            total_weight,
        }
    }

    /// Tree-neighbors of `node`, in insertion (not sorted) order.
    pub fn neighbors(&self, node: usize) -> &[(usize, i64)] {
        &self.adjacency[node]
    }

    /// Sum of edge weights in the tree.
    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }
}
