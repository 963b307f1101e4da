use std::{cmp::Reverse, collections::BinaryHeap};

use crate::graph::Graph;
use crate::trace::{Step, Trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DijkstraStepKind {
    /// Distances initialized: source at 0, everything else infinite.
    Init,
    /// A node was popped from the queue and marked visited.
    Visit,
    /// An edge relaxation strictly improved a tentative distance.
    Update,
    /// Terminal step carrying the reconstructed path.
    Finished,
}

/// One snapshot of the shortest-path search.
///
/// `distances[i]` is `None` while node `i` is still at infinity. `relaxed`
/// holds the edge that caused an `Update` step, for highlighting. `path` is
/// empty on every step except `Finished`, where it stays empty if the end
/// node was unreachable.
pub struct DijkstraStep {
    pub kind: DijkstraStepKind,
    pub current: Option<usize>,
    pub distances: Box<[Option<u64>]>,
    pub visited: Box<[bool]>,
    pub relaxed: Option<(usize, usize)>,
    pub path: Box<[usize]>,
    pub message: String,
}

impl Step for DijkstraStep {
    fn message(&self) -> &str {
        &self.message
    }

    fn is_terminal(&self) -> bool {
        self.kind == DijkstraStepKind::Finished
    }
}

/// Runs Dijkstra's algorithm from `start` to `end` and records one step per
/// atomic event: one `Init`, one `Visit` per newly visited node, one `Update`
/// per strictly improving relaxation, and a final `Finished`.
///
/// The search stops the moment `end` is visited. An unreachable `end` is not
/// an error: `Finished` then reports an empty path and an infinite distance.
pub fn dijkstra_trace(graph: &Graph, start: usize, end: usize) -> Trace<DijkstraStep> {
    let n = graph.node_count();
    let mut steps = Vec::new();
    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    distances[start] = Some(0);

    // Min-heap on (distance, node). Stale entries for already-visited nodes
    // are skipped on pop instead of being removed eagerly.
    let mut queue: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
    queue.push(Reverse((0, start)));

    steps.push(snapshot(
        DijkstraStepKind::Init,
        None,
        &distances,
        &visited,
        None,
        Vec::new(),
        format!(
            "Initialize all distances to infinity, source {} to 0.",
            graph.label(start)
        ),
    ));

    while let Some(Reverse((dist, current))) = queue.pop() {
        if visited[current] {
            continue;
        }
        visited[current] = true;

        steps.push(snapshot(
            DijkstraStepKind::Visit,
            Some(current),
            &distances,
            &visited,
            None,
            Vec::new(),
            format!("Visiting node {} (distance {}).", graph.label(current), dist),
        ));

        if current == end {
            break;
        }

        for edge in graph.edges_from(current) {
            if visited[edge.to] {
                continue;
            }
            let new_dist = dist + edge.weight as u64;
            let improves = match distances[edge.to] {
                Some(existing) => new_dist < existing,
                None => true,
            };
            if improves {
                distances[edge.to] = Some(new_dist);
                previous[edge.to] = Some(current);
                queue.push(Reverse((new_dist, edge.to)));

                steps.push(snapshot(
                    DijkstraStepKind::Update,
                    Some(current),
                    &distances,
                    &visited,
                    Some((edge.from, edge.to)),
                    Vec::new(),
                    format!(
                        "Relaxing edge {}\u{2192}{}, updating distance to {}.",
                        graph.label(edge.from),
                        graph.label(edge.to),
                        new_dist
                    ),
                ));
            }
        }
    }

    // Walk the predecessor chain backward from the end node
    let mut path = Vec::new();
    if distances[end].is_some() {
        let mut current = Some(end);
        while let Some(node) = current {
            path.push(node);
            current = previous[node];
        }
        path.reverse();
    }

    let message = match distances[end] {
        Some(cost) => {
            let labels: Vec<String> = path.iter().map(|&i| graph.label(i).to_string()).collect();
            format!(
                "Shortest path found: {} (cost {}).",
                labels.join(" \u{2192} "),
                cost
            )
        }
        None => format!(
            "Node {} is unreachable from {}.",
            graph.label(end),
            graph.label(start)
        ),
    };
    steps.push(snapshot(
        DijkstraStepKind::Finished,
        None,
        &distances,
        &visited,
        None,
        path,
        message,
    ));

    Trace::new(steps)
}

/// Deep-copies the working state into an immutable step. Later mutation of
/// the generator's arrays must never reach through into an emitted step.
fn snapshot(
    kind: DijkstraStepKind,
    current: Option<usize>,
    distances: &[Option<u64>],
    visited: &[bool],
    relaxed: Option<(usize, usize)>,
    path: Vec<usize>,
    message: String,
) -> DijkstraStep {
    DijkstraStep {
        kind,
        current,
        distances: distances.into(),
        visited: visited.into(),
        relaxed,
        path: path.into_boxed_slice(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn triangle() -> Graph {
        // A -> B costs 4 directly, 2 via C
        let mut graph = Graph::new();
        let a = graph.add_node('A', (0, 0));
        let b = graph.add_node('B', (8, 0));
        let c = graph.add_node('C', (4, 2));
        graph.add_edge(a, b, 4).unwrap();
        graph.add_edge(a, c, 1).unwrap();
        graph.add_edge(c, b, 1).unwrap();
        graph
    }

    /// Independent shortest-path check: relax every edge n times.
    fn brute_force_distances(graph: &Graph, start: usize) -> Vec<Option<u64>> {
        let n = graph.node_count();
        let mut dist: Vec<Option<u64>> = vec![None; n];
        dist[start] = Some(0);
        for _ in 0..n {
            for edge in graph.edges() {
                if let Some(d) = dist[edge.from] {
                    let candidate = d + edge.weight as u64;
                    if dist[edge.to].is_none_or(|existing| candidate < existing) {
                        dist[edge.to] = Some(candidate);
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn test_triangle_path() {
        let graph = triangle();
        let trace = dijkstra_trace(&graph, 0, 1);
        let last = trace.last();
        assert_eq!(last.kind, DijkstraStepKind::Finished);
        assert_eq!(last.distances[1], Some(2));
        assert_eq!(&*last.path, &[0, 2, 1]);
    }

    #[test]
    fn test_trace_shape() {
        let graph = triangle();
        let trace = dijkstra_trace(&graph, 0, 1);
        assert!(trace.len() > 1);
        assert_eq!(trace[0].kind, DijkstraStepKind::Init);
        // Exactly one terminal step, and it is the last one
        let terminal_count = trace.iter().filter(|s| s.is_terminal()).count();
        assert_eq!(terminal_count, 1);
        assert!(trace.last().is_terminal());
    }

    #[test]
    fn test_search_stops_when_end_is_visited() {
        let graph = triangle();
        let trace = dijkstra_trace(&graph, 0, 1);
        // The step right before Finished is the visit of the end node
        let before_last = trace.get(trace.len() - 2).unwrap();
        assert_eq!(before_last.kind, DijkstraStepKind::Visit);
        assert_eq!(before_last.current, Some(1));
    }

    #[test]
    fn test_unreachable_end() {
        let mut graph = Graph::new();
        let a = graph.add_node('A', (0, 0));
        let b = graph.add_node('B', (4, 0));
        let c = graph.add_node('C', (8, 0));
        graph.add_edge(a, b, 1).unwrap();
        let trace = dijkstra_trace(&graph, a, c);
        let last = trace.last();
        assert_eq!(last.kind, DijkstraStepKind::Finished);
        assert!(last.path.is_empty());
        assert_eq!(last.distances[c], None);
    }

    #[test]
    fn test_path_is_adjacent_and_costs_add_up() {
        let graph = triangle();
        let trace = dijkstra_trace(&graph, 0, 1);
        let last = trace.last();
        assert_eq!(last.path.first(), Some(&0));
        assert_eq!(last.path.last(), Some(&1));
        let mut total = 0u64;
        for pair in last.path.windows(2) {
            let edge = graph
                .edges()
                .iter()
                .find(|e| e.from == pair[0] && e.to == pair[1])
                .expect("consecutive path nodes must be joined by an edge");
            total += edge.weight as u64;
        }
        assert_eq!(Some(total), last.distances[1]);
    }

    #[test]
    fn test_matches_brute_force_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.random_range(2..8);
            let mut graph = Graph::new();
            for i in 0..n {
                graph.add_node((b'A' + i as u8) as char, (0, 0));
            }
            for from in 0..n {
                for to in 0..n {
                    if from != to && rng.random_range(0..3) > 0 {
                        graph
                            .add_edge(from, to, rng.random_range(1..10))
                            .unwrap();
                    }
                }
            }
            let end = n - 1;
            let trace = dijkstra_trace(&graph, 0, end);
            let expected = brute_force_distances(&graph, 0);
            assert_eq!(trace.last().distances[end], expected[end]);
        }
    }

    #[test]
    fn test_emitted_snapshots_are_not_aliases() {
        let graph = triangle();
        let trace = dijkstra_trace(&graph, 0, 1);
        // The init snapshot must still show the starting state even though
        // the generator kept mutating its working arrays afterwards.
        let init = &trace[0];
        assert_eq!(init.distances[0], Some(0));
        assert_eq!(init.distances[1], None);
        assert_eq!(init.distances[2], None);
        assert!(init.visited.iter().all(|&v| !v));
    }
}
