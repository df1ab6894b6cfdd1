use super::dual_graph::{DualGraph, NodeId};

/// Upper bound on enumerated cycles; dense duals (e.g. Venn-5's hypercube) have far more.
pub const MAX_CYCLES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphCycle {
    pub nodes: Vec<NodeId>,
}

impl GraphCycle {
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Enumerate simple cycles (length ≥ 3), each reported once, starting from its lowest node and
/// oriented so the second node is lower than the last.
pub fn simple_cycles(graph: &DualGraph, limit: usize) -> Vec<GraphCycle> {
    let mut cycles = Vec::new();
    let mut on_path = vec![false; graph.capacity()];
    for start in graph.nodes() {
        if cycles.len() >= limit {
            break;
        }
        let mut path = vec![start];
        on_path[start] = true;
        extend(graph, start, &mut path, &mut on_path, &mut cycles, limit);
        on_path[start] = false;
    }
    cycles
}

fn extend(
    graph: &DualGraph,
    start: NodeId,
    path: &mut Vec<NodeId>,
    on_path: &mut [bool],
    cycles: &mut Vec<GraphCycle>,
    limit: usize,
) {
    let last = path[path.len() - 1];
    for next in graph.neighbours(last) {
        if cycles.len() >= limit {
            return;
        }
        if next == start {
            if path.len() >= 3 && path[1] < last {
                cycles.push(GraphCycle { nodes: path.clone() });
            }
        } else if next > start && !on_path[next] {
            path.push(next);
            on_path[next] = true;
            extend(graph, start, path, on_path, cycles, limit);
            on_path[next] = false;
            path.pop();
        }
    }
}
