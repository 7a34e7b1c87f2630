use std::collections::HashMap;

/// Disjoint-set forest over record indices.
#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        // Union by size.
        let (big, small) = if self.size[ra] < self.size[rb] {
            (rb, ra)
        } else {
            (ra, rb)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }
}

/// Replay dendrogram-style merges over `n` leaves and return one root per leaf.
///
/// Cluster ids follow the SciPy convention: leaves are `0..n`, the `i`-th merge
/// creates cluster `n + i`. Merges naming an unknown cluster are skipped.
pub(crate) fn replay_merges(
    n: usize,
    merges: impl IntoIterator<Item = (usize, usize)>,
) -> Vec<usize> {
    let mut uf = UnionFind::new(n);
    // Any member leaf of each internal cluster.
    let mut leaf_of: HashMap<usize, usize> = HashMap::new();
    let resolve = |id: usize, leaf_of: &HashMap<usize, usize>| -> Option<usize> {
        if id < n {
            Some(id)
        } else {
            leaf_of.get(&id).copied()
        }
    };

    for (step, (a, b)) in merges.into_iter().enumerate() {
        let (Some(la), Some(lb)) = (resolve(a, &leaf_of), resolve(b, &leaf_of)) else {
            tracing::trace!(a, b, step, "skipping merge of unknown cluster");
            continue;
        };
        uf.union(la, lb);
        leaf_of.insert(n + step, la);
    }

    (0..n).map(|i| uf.find(i)).collect()
}
