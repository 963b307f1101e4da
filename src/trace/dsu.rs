use crate::trace::{Step, Trace};

/// One requested disjoint-set operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DsuOp {
    Union(usize, usize),
    Find(usize),
}

/// Independent optimization toggles. Both default to off so the naive
/// behavior can be contrasted against the optimized one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DsuConfig {
    pub path_compression: bool,
    pub union_by_rank: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DsuStepKind {
    /// Universe set up: every node its own parent, rank 0.
    Init,
    /// A find is examining a node on its way to the root.
    Find,
    /// A find reached a self-parent node.
    Found,
    /// Path compression rewrote a node's parent to the discovered root.
    Compress,
    /// A union announced itself, or resolved to a no-op on equal roots.
    Union,
    /// Two distinct roots were linked.
    Link,
    /// Terminal step after all operations.
    Done,
}

/// One snapshot of the union-find forest.
///
/// `highlights` lists (child, parent) edges the renderer should emphasize,
/// e.g. the pointer being climbed during a find. `rank` is carried on every
/// step but only meaningful while union-by-rank is enabled.
pub struct DsuStep {
    pub kind: DsuStepKind,
    pub parent: Box<[usize]>,
    pub rank: Box<[u32]>,
    pub active: Option<usize>,
    pub highlights: Box<[(usize, usize)]>,
    pub message: String,
}

impl Step for DsuStep {
    fn message(&self) -> &str {
        &self.message
    }

    fn is_terminal(&self) -> bool {
        self.kind == DsuStepKind::Done
    }
}

/// Replays `ops` over a fresh universe of `n` elements, recording every
/// pointer hop, link, and compression as its own step.
pub fn dsu_trace(n: usize, ops: &[DsuOp], config: DsuConfig) -> Trace<DsuStep> {
    let mut tracer = DsuTracer {
        parent: (0..n).collect(),
        rank: vec![0; n],
        config,
        steps: Vec::new(),
    };

    tracer.snapshot(
        DsuStepKind::Init,
        None,
        Vec::new(),
        "Initialized disjoint set: each node is its own parent.".to_string(),
    );

    for &op in ops {
        match op {
            DsuOp::Union(u, v) => tracer.union(u, v),
            DsuOp::Find(u) => {
                tracer.find(u);
            }
        }
    }

    tracer.snapshot(
        DsuStepKind::Done,
        None,
        Vec::new(),
        "Operations complete.".to_string(),
    );

    Trace::new(tracer.steps)
}

struct DsuTracer {
    parent: Vec<usize>,
    rank: Vec<u32>,
    config: DsuConfig,
    steps: Vec<DsuStep>,
}

impl DsuTracer {
    fn snapshot(
        &mut self,
        kind: DsuStepKind,
        active: Option<usize>,
        highlights: Vec<(usize, usize)>,
        message: String,
    ) {
        self.steps.push(DsuStep {
            kind,
            parent: self.parent.clone().into_boxed_slice(),
            rank: self.rank.clone().into_boxed_slice(),
            active,
            highlights: highlights.into_boxed_slice(),
            message,
        });
    }

    /// Recursive find, one step per pointer hop. With path compression on,
    /// a `Compress` step follows the recursive return iff the node's parent
    /// actually changed (i.e. it was not already a direct child of the root).
    fn find(&mut self, i: usize) -> usize {
        self.snapshot(
            DsuStepKind::Find,
            Some(i),
            Vec::new(),
            format!("Find({i}): checking parent of {i}."),
        );

        let p = self.parent[i];
        if p == i {
            self.snapshot(
                DsuStepKind::Found,
                Some(i),
                Vec::new(),
                format!("Node {i} is a root."),
            );
            return i;
        }

        if self.config.path_compression {
            self.snapshot(
                DsuStepKind::Find,
                Some(i),
                vec![(i, p)],
                format!("Parent of {i} is {p}, recursively finding root."),
            );
            let root = self.find(p);
            if self.parent[i] != root {
                self.parent[i] = root;
                self.snapshot(
                    DsuStepKind::Compress,
                    Some(i),
                    vec![(i, root)],
                    format!("Path compression: pointing {i} directly to root {root}."),
                );
            }
            root
        } else {
            self.snapshot(
                DsuStepKind::Find,
                Some(i),
                vec![(i, p)],
                format!("Parent of {i} is {p}, moving up."),
            );
            self.find(p)
        }
    }

    fn union(&mut self, i: usize, j: usize) {
        self.snapshot(
            DsuStepKind::Union,
            None,
            Vec::new(),
            format!("Union({i}, {j}): finding both roots."),
        );

        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i == root_j {
            // Make the no-op visible rather than silently skipping it
            self.snapshot(
                DsuStepKind::Union,
                None,
                Vec::new(),
                format!("Nodes {i} and {j} are already in the same set (root {root_i})."),
            );
            return;
        }

        self.snapshot(
            DsuStepKind::Union,
            None,
            vec![(i, root_i), (j, root_j)],
            format!("Roots differ ({root_i} and {root_j}), linking trees."),
        );

        if self.config.union_by_rank {
            match self.rank[root_i].cmp(&self.rank[root_j]) {
                std::cmp::Ordering::Less => {
                    self.parent[root_i] = root_j;
                    self.snapshot(
                        DsuStepKind::Link,
                        Some(root_i),
                        vec![(root_i, root_j)],
                        format!(
                            "Rank({root_i}) < rank({root_j}): attaching {root_i} under {root_j}."
                        ),
                    );
                }
                std::cmp::Ordering::Greater => {
                    self.parent[root_j] = root_i;
                    self.snapshot(
                        DsuStepKind::Link,
                        Some(root_j),
                        vec![(root_j, root_i)],
                        format!(
                            "Rank({root_i}) > rank({root_j}): attaching {root_j} under {root_i}."
                        ),
                    );
                }
                std::cmp::Ordering::Equal => {
                    self.parent[root_j] = root_i;
                    self.rank[root_i] += 1;
                    self.snapshot(
                        DsuStepKind::Link,
                        Some(root_j),
                        vec![(root_j, root_i)],
                        format!(
                            "Ranks equal: attaching {root_j} under {root_i} and raising rank of {root_i}."
                        ),
                    );
                }
            }
        } else {
            // Naive policy: first operand's root goes under the second's,
            // regardless of tree shape. Long chains are the point here.
            self.parent[root_i] = root_j;
            self.snapshot(
                DsuStepKind::Link,
                Some(root_i),
                vec![(root_i, root_j)],
                format!("Naive union: attaching root {root_i} under root {root_j}."),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Follows parent pointers without mutating anything.
    fn root_of(parent: &[usize], mut i: usize) -> usize {
        while parent[i] != i {
            i = parent[i];
        }
        i
    }

    /// Mathematical connectivity: transitive closure of the unioned pairs.
    fn closure_classes(n: usize, ops: &[DsuOp]) -> Vec<usize> {
        let mut class: Vec<usize> = (0..n).collect();
        for &op in ops {
            if let DsuOp::Union(u, v) = op {
                let (cu, cv) = (class[u], class[v]);
                if cu != cv {
                    for c in class.iter_mut() {
                        if *c == cv {
                            *c = cu;
                        }
                    }
                }
            }
        }
        class
    }

    const ALL_CONFIGS: [DsuConfig; 4] = [
        DsuConfig { path_compression: false, union_by_rank: false },
        DsuConfig { path_compression: true, union_by_rank: false },
        DsuConfig { path_compression: false, union_by_rank: true },
        DsuConfig { path_compression: true, union_by_rank: true },
    ];

    #[test]
    fn test_unions_then_find_leave_expected_sets() {
        let ops = [DsuOp::Union(0, 1), DsuOp::Union(1, 2), DsuOp::Find(3)];
        let trace = dsu_trace(5, &ops, DsuConfig::default());
        let parent = &trace.last().parent;
        let r0 = root_of(parent, 0);
        assert_eq!(root_of(parent, 1), r0);
        assert_eq!(root_of(parent, 2), r0);
        assert_eq!(root_of(parent, 3), 3);
        assert_eq!(root_of(parent, 4), 4);
    }

    #[test]
    fn test_trace_shape() {
        let ops = [DsuOp::Union(0, 1), DsuOp::Find(0)];
        let trace = dsu_trace(3, &ops, DsuConfig::default());
        assert_eq!(trace[0].kind, DsuStepKind::Init);
        assert_eq!(trace.iter().filter(|s| s.is_terminal()).count(), 1);
        assert_eq!(trace.last().kind, DsuStepKind::Done);
    }

    #[test]
    fn test_flags_never_change_connectivity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let n = rng.random_range(3..9);
            let ops: Vec<DsuOp> = (0..rng.random_range(2..12))
                .map(|_| {
                    if rng.random_range(0..4) == 0 {
                        DsuOp::Find(rng.random_range(0..n))
                    } else {
                        DsuOp::Union(rng.random_range(0..n), rng.random_range(0..n))
                    }
                })
                .collect();
            let classes = closure_classes(n, &ops);
            for config in ALL_CONFIGS {
                let trace = dsu_trace(n, &ops, config);
                let parent = &trace.last().parent;
                for a in 0..n {
                    for b in 0..n {
                        assert_eq!(
                            root_of(parent, a) == root_of(parent, b),
                            classes[a] == classes[b],
                            "connectivity of ({a}, {b}) changed under {config:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_rank_increments_only_on_equal_rank_union() {
        let config = DsuConfig { path_compression: false, union_by_rank: true };
        // Equal ranks: surviving root's rank goes 0 -> 1
        let trace = dsu_trace(2, &[DsuOp::Union(0, 1)], config);
        let last = trace.last();
        assert_eq!(last.parent[1], 0);
        assert_eq!(last.rank[0], 1);
        assert_eq!(last.rank[1], 0);

        // Distinct ranks: no rank changes on the link
        let ops = [DsuOp::Union(0, 1), DsuOp::Union(2, 0)];
        let trace = dsu_trace(3, &ops, config);
        let last = trace.last();
        assert_eq!(root_of(&last.parent, 2), 0);
        assert_eq!(last.rank[0], 1);
    }

    #[test]
    fn test_naive_union_attaches_first_root_under_second() {
        let trace = dsu_trace(2, &[DsuOp::Union(0, 1)], DsuConfig::default());
        assert_eq!(trace.last().parent[0], 1);
    }

    #[test]
    fn test_compress_emitted_only_when_parent_changes() {
        // Build the chain 0 -> 1 -> 2 with naive unions, then compress via a find
        let config = DsuConfig { path_compression: true, union_by_rank: false };
        let ops = [DsuOp::Union(0, 1), DsuOp::Union(1, 2), DsuOp::Find(0)];
        let trace = dsu_trace(3, &ops, config);
        let compressions: Vec<&DsuStep> = trace
            .iter()
            .filter(|s| s.kind == DsuStepKind::Compress)
            .collect();
        // Node 0 was two hops from the root, node 1 was already a direct child
        assert_eq!(compressions.len(), 1);
        assert_eq!(compressions[0].active, Some(0));
        assert_eq!(trace.last().parent[0], 2);
    }

    #[test]
    fn test_union_of_same_set_emits_no_link() {
        let ops = [DsuOp::Union(0, 1), DsuOp::Union(0, 1)];
        let trace = dsu_trace(2, &ops, DsuConfig::default());
        let links = trace.iter().filter(|s| s.kind == DsuStepKind::Link).count();
        assert_eq!(links, 1);
    }

    #[test]
    fn test_emitted_snapshots_are_not_aliases() {
        let ops = [DsuOp::Union(0, 1), DsuOp::Union(1, 2)];
        let trace = dsu_trace(3, &ops, DsuConfig::default());
        // The init snapshot must still show the identity forest
        let init = &trace[0];
        assert_eq!(&*init.parent, &[0, 1, 2]);
        assert!(init.rank.iter().all(|&r| r == 0));
    }
}
