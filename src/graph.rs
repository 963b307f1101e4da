use thiserror::Error;

/// Errors from building a graph instance.
/// Generators assume a valid graph; validation happens here, at construction.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge endpoint {0} does not reference an existing node")]
    UnknownEndpoint(usize),
    #[error("edge {0}->{1} has zero weight; weights must be positive")]
    ZeroWeight(usize, usize),
    #[error("self-loop on node {0}")]
    SelfLoop(usize),
}

/// A node with a display label and a 2D terminal position (column, row).
/// Positions are owned by the UI layer; generators never read them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub label: char,
    pub pos: (u16, u16),
}

/// A directed edge between node indices, with a positive integer weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: u32,
}

/// A small directed weighted graph for the shortest-path visualizer.
///
/// Nodes are identified by their index in insertion order. Edge endpoints are
/// validated against existing nodes when the edge is added, so traversal code
/// can index without bounds anxiety.
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, label: char, pos: (u16, u16)) -> usize {
        self.nodes.push(Node { label, pos });
        self.nodes.len() - 1
    }

    /// Adds a directed edge after validating both endpoints and the weight.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: u32) -> Result<(), GraphError> {
        if from >= self.nodes.len() {
            return Err(GraphError::UnknownEndpoint(from));
        }
        if to >= self.nodes.len() {
            return Err(GraphError::UnknownEndpoint(to));
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if weight == 0 {
            return Err(GraphError::ZeroWeight(from, to));
        }
        self.edges.push(Edge { from, to, weight });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Display label of a node, for narration and rendering.
    pub fn label(&self, index: usize) -> char {
        self.nodes[index].label
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn edges_from(&self, from: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from == from)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_validates_endpoints() {
        let mut graph = Graph::new();
        let a = graph.add_node('A', (0, 0));
        let b = graph.add_node('B', (4, 0));
        assert_eq!(graph.add_edge(a, b, 3), Ok(()));
        assert_eq!(graph.add_edge(a, 7, 3), Err(GraphError::UnknownEndpoint(7)));
        assert_eq!(graph.add_edge(9, b, 3), Err(GraphError::UnknownEndpoint(9)));
    }

    #[test]
    fn test_add_edge_rejects_zero_weight_and_self_loops() {
        let mut graph = Graph::new();
        let a = graph.add_node('A', (0, 0));
        let b = graph.add_node('B', (4, 0));
        assert_eq!(graph.add_edge(a, b, 0), Err(GraphError::ZeroWeight(a, b)));
        assert_eq!(graph.add_edge(a, a, 1), Err(GraphError::SelfLoop(a)));
    }

    #[test]
    fn test_edges_from() {
        let mut graph = Graph::new();
        let a = graph.add_node('A', (0, 0));
        let b = graph.add_node('B', (4, 0));
        let c = graph.add_node('C', (2, 2));
        graph.add_edge(a, b, 4).unwrap();
        graph.add_edge(a, c, 1).unwrap();
        graph.add_edge(c, b, 1).unwrap();
        let targets: Vec<usize> = graph.edges_from(a).map(|e| e.to).collect();
        assert_eq!(targets, vec![b, c]);
    }
}
