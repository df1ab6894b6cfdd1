use std::{cell::OnceCell, collections::{BTreeSet, VecDeque}};

use itertools::Itertools;
use log::{trace, warn};

use crate::model::{AbstractCurve, Zone};

use super::cycles::{simple_cycles, GraphCycle, MAX_CYCLES};

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone)]
pub struct DualNode {
    pub zone: Zone,
    removed: bool,
}

/// Edge between two zones differing by exactly one curve (`curve`).
#[derive(Debug, Clone)]
pub struct DualEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub curve: AbstractCurve,
    removed: bool,
}

impl DualEdge {
    pub fn other(&self, n: NodeId) -> NodeId {
        if self.from == n { self.to } else { self.from }
    }

    pub fn touches(&self, n: NodeId) -> bool {
        self.from == n || self.to == n
    }
}

/// Undirected graph over zones, with an edge wherever two zones straddle a single curve.
///
/// Nodes and edges live in arenas and are never reindexed; removal only marks them, so ids stay
/// valid across a sequence of removals. Searches that need to remove things work on a clone.
#[derive(Debug, Clone)]
pub struct DualGraph {
    nodes: Vec<DualNode>,
    edges: Vec<DualEdge>,
    cycles: OnceCell<Vec<GraphCycle>>,
}

impl DualGraph {
    pub fn new(zones: &[Zone]) -> Self {
        let nodes: Vec<DualNode> = zones.iter().map(|zone| DualNode { zone: zone.clone(), removed: false }).collect();
        let edges: Vec<DualEdge> = (0..zones.len())
            .tuple_combinations()
            .filter_map(|(from, to)| {
                zones[from]
                    .straddled_contour(&zones[to])
                    .map(|curve| DualEdge { from, to, curve, removed: false })
            })
            .collect();
        trace!("Dual graph over {} zones: {} edges", nodes.len(), edges.len());
        DualGraph { nodes, edges, cycles: OnceCell::new() }
    }

    /// Number of node slots, including removed nodes.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn zone(&self, n: NodeId) -> &Zone {
        &self.nodes[n].zone
    }

    pub fn edge(&self, e: EdgeId) -> &DualEdge {
        &self.edges[e]
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter(|(_, n)| !n.removed).map(|(idx, _)| idx)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &DualEdge)> + '_ {
        self.edges.iter().enumerate().filter(|(_, e)| !e.removed)
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes().count()
    }

    pub fn num_edges(&self) -> usize {
        self.edges().count()
    }

    pub fn incident(&self, n: NodeId) -> impl Iterator<Item = (EdgeId, &DualEdge)> + '_ {
        self.edges().filter(move |(_, e)| e.touches(n))
    }

    pub fn degree(&self, n: NodeId) -> usize {
        self.incident(n).count()
    }

    pub fn neighbours(&self, n: NodeId) -> Vec<NodeId> {
        self.incident(n).map(|(_, e)| e.other(n)).collect()
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.incident(a).find(|(_, e)| e.other(a) == b).map(|(idx, _)| idx)
    }

    pub fn node_by_zone(&self, zone: &Zone) -> Option<NodeId> {
        self.nodes().find(|&n| self.nodes[n].zone == *zone)
    }

    /// True iff there is at most one node or no node is isolated.
    pub fn is_connected(&self) -> bool {
        self.num_nodes() <= 1 || self.nodes().all(|n| self.degree(n) > 0)
    }

    pub fn remove_edge(&mut self, e: EdgeId) {
        self.edges[e].removed = true;
        self.cycles.take();
    }

    pub fn remove_node(&mut self, n: NodeId) {
        self.nodes[n].removed = true;
        for edge in self.edges.iter_mut().filter(|e| e.touches(n)) {
            edge.removed = true;
        }
        self.cycles.take();
    }

    /// Copy of this graph with `excluded` nodes (and their edges) removed.
    pub fn without(&self, excluded: &[NodeId]) -> DualGraph {
        let mut copy = self.clone();
        for &n in excluded {
            copy.remove_node(n);
        }
        copy
    }

    fn bfs(&self, start: NodeId, target: NodeId) -> Option<Vec<EdgeId>> {
        if start == target {
            return Some(vec![]);
        }
        let mut prev: Vec<Option<EdgeId>> = vec![None; self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(u) = queue.pop_front() {
            for (e, edge) in self.incident(u) {
                let v = edge.other(u);
                if visited[v] {
                    continue;
                }
                visited[v] = true;
                prev[v] = Some(e);
                if v == target {
                    let mut path = vec![];
                    let mut cur = v;
                    while let Some(e) = prev[cur] {
                        path.push(e);
                        cur = self.edges[e].other(cur);
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(v);
            }
        }
        None
    }

    pub fn try_shortest_vertex_path(&self, start: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
        let edges = self.bfs(start, target)?;
        let mut path = vec![start];
        for e in edges {
            let last = path[path.len() - 1];
            path.push(self.edges[e].other(last));
        }
        Some(path)
    }

    /// Shortest (unit-weight) path between two nodes, as edge ids.
    ///
    /// Panics if `target` is unreachable: callers only ask for paths between nodes they know to be
    /// connected, so a missing path is a construction defect.
    pub fn find_shortest_edge_path(&self, start: NodeId, target: NodeId) -> Vec<EdgeId> {
        self.bfs(start, target).unwrap_or_else(|| {
            panic!("No path from {} to {} in dual graph", self.zone(start), self.zone(target))
        })
    }

    /// Shortest path between two nodes, as node ids (both endpoints included).
    pub fn find_shortest_vertex_path(&self, start: NodeId, target: NodeId) -> Vec<NodeId> {
        self.try_shortest_vertex_path(start, target).unwrap_or_else(|| {
            panic!("No path from {} to {} in dual graph", self.zone(start), self.zone(target))
        })
    }

    /// Shortest path avoiding `busy` nodes; searches a filtered copy.
    pub fn find_shortest_vertex_path_avoiding(&self, start: NodeId, target: NodeId, busy: &[NodeId]) -> Vec<NodeId> {
        let excluded: Vec<NodeId> = busy.iter().copied().filter(|&n| n != start && n != target).collect();
        self.without(&excluded).find_shortest_vertex_path(start, target)
    }

    /// A cycle through `start` and `target`, built from two paths that share only their endpoints.
    /// Returned as node ids, beginning at `start`; `target` appears once in the middle.
    pub fn find_cycle(&self, start: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
        if start == target {
            return None;
        }
        let first = self.try_shortest_vertex_path(start, target)?;
        let mut copy = self.without(&first[1..first.len() - 1]);
        if first.len() == 2 {
            if let Some(e) = copy.edge_between(start, target) {
                copy.remove_edge(e);
            }
        }
        let second = copy.try_shortest_vertex_path(start, target)?;
        let mut cycle = first;
        cycle.extend(second[1..second.len() - 1].iter().rev());
        Some(cycle)
    }

    /// Seed for greedy single-piercing extraction: an edge at the lowest-degree non-isolated node,
    /// going to that node's lowest-degree neighbour. Ties keep the earlier node/edge.
    pub fn low_degree_edge(&self) -> Option<EdgeId> {
        let node = self.nodes().filter(|&n| self.degree(n) > 0).min_by_key(|&n| self.degree(n))?;
        self.incident(node)
            .min_by_key(|(_, e)| self.degree(e.other(node)))
            .map(|(idx, _)| idx)
    }

    /// Four nodes `[n, n2, n3, n4]` forming a square: `n–n2` and `n3–n4` straddle one curve,
    /// `n–n3` and `n2–n4` another.
    pub fn four_tuple(&self) -> Option<[NodeId; 4]> {
        for n in self.nodes() {
            let incident: Vec<&DualEdge> = self.incident(n).map(|(_, e)| e).collect();
            for (e1, e2) in incident.iter().tuple_combinations() {
                if e1.curve == e2.curve {
                    continue;
                }
                let n2 = e1.other(n);
                let n3 = e2.other(n);
                for n4 in self.neighbours(n2) {
                    if n4 == n {
                        continue;
                    }
                    let (Some(a), Some(b)) = (self.edge_between(n2, n4), self.edge_between(n3, n4)) else {
                        continue;
                    };
                    if self.edges[a].curve == e2.curve && self.edges[b].curve == e1.curve {
                        return Some([n, n2, n3, n4]);
                    }
                }
            }
        }
        None
    }

    fn common_neighbours(&self, n1: NodeId, n2: NodeId) -> Vec<NodeId> {
        let others = self.neighbours(n2);
        self.neighbours(n1).into_iter().filter(|n| others.contains(n)).collect()
    }

    /// Like [`four_tuple`](Self::four_tuple), but when no square exists, completes one using zones
    /// from `zones` (the universe of zones that may be split in addition to this graph's nodes):
    /// - three nodes `n1–n3–n2` with `n3` their only common neighbour, plus a zone adjacent to
    ///   both `n1` and `n2`: `[n3, n1, n2, missing]`;
    /// - two nodes `n1`, `n2` with no common neighbour, plus two zones adjacent to both:
    ///   `[zone, n1, n2, missing]`.
    pub fn potential_four_tuple(&self, zones: &BTreeSet<Zone>) -> Option<[Zone; 4]> {
        if let Some(nodes) = self.four_tuple() {
            return Some(nodes.map(|n| self.zone(n).clone()));
        }
        let live: Vec<NodeId> = self.nodes().collect();
        for (&n1, &n2) in live.iter().tuple_combinations() {
            let common = self.common_neighbours(n1, n2);
            match common.as_slice() {
                [] => {}
                &[n3] => {
                    let (z1, z2, z3) = (self.zone(n1), self.zone(n2), self.zone(n3));
                    if let Some(missing) = missing_zone(z1, z2, &[z3], zones) {
                        return Some([z3.clone(), z1.clone(), z2.clone(), missing.clone()]);
                    }
                }
                _ => warn!(
                    "Suspicious adjacency: {} and {} share {} neighbours without forming a square",
                    self.zone(n1),
                    self.zone(n2),
                    common.len(),
                ),
            }
        }
        for (&n1, &n2) in live.iter().tuple_combinations() {
            if !self.common_neighbours(n1, n2).is_empty() {
                continue;
            }
            let (z1, z2) = (self.zone(n1), self.zone(n2));
            for zone in zones {
                if zone == z1 || zone == z2 || !adjacent(zone, z1) || !adjacent(zone, z2) {
                    continue;
                }
                if let Some(missing) = missing_zone(z1, z2, &[zone], zones) {
                    return Some([zone.clone(), z1.clone(), z2.clone(), missing.clone()]);
                }
            }
        }
        None
    }

    /// All simple cycles (capped at [`MAX_CYCLES`]), enumerated on first request.
    pub fn cycles(&self) -> &[GraphCycle] {
        self.cycles.get_or_init(|| simple_cycles(self, MAX_CYCLES))
    }

    /// The first cycle passing through every one of `zones`.
    pub fn compute_cycle(&self, zones: &[Zone]) -> Option<&GraphCycle> {
        let nodes: Option<Vec<NodeId>> = zones.iter().map(|z| self.node_by_zone(z)).collect();
        let nodes = nodes?;
        self.cycles().iter().find(|cycle| nodes.iter().all(|&n| cycle.contains(n)))
    }
}

fn adjacent(z1: &Zone, z2: &Zone) -> bool {
    z1.straddled_contour(z2).is_some()
}

/// A zone from `zones`, other than `z1`, `z2` and `excluded`, adjacent to both `z1` and `z2`.
fn missing_zone<'a>(z1: &Zone, z2: &Zone, excluded: &[&Zone], zones: &'a BTreeSet<Zone>) -> Option<&'a Zone> {
    zones.iter().find(|z| {
        *z != z1 && *z != z2 && !excluded.contains(z) && adjacent(z, z1) && adjacent(z, z2)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn zones(labels: &[&str]) -> Vec<Zone> {
        labels.iter().map(|l| Zone::from_labels(l)).collect()
    }

    fn zone_set(labels: &[&str]) -> BTreeSet<Zone> {
        zones(labels).into_iter().collect()
    }

    #[test]
    fn construction() {
        let g = DualGraph::new(&zones(&["", "a", "b", "ab"]));
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 4);
        for (_, e) in g.edges() {
            assert_ne!(e.from, e.to);
        }
        assert_eq!(g.edge(0).curve, AbstractCurve::new('a'));
        assert_eq!(g.edge_between(0, 3), None);
        assert!(g.is_connected());

        let cube = DualGraph::new(&zones(&["", "a", "b", "c", "ab", "ac", "bc", "abc"]));
        assert_eq!(cube.num_edges(), 12);
        assert!(cube.nodes().all(|n| cube.degree(n) == 3));
    }

    #[test]
    fn edge_count_matches_straddling_pairs() {
        let zs = zones(&["", "a", "b", "c", "ab", "bc", "abc", "d", "ad"]);
        let expected = zs.iter().tuple_combinations().filter(|(z1, z2)| z1.straddled_contour(z2).is_some()).count();
        let g = DualGraph::new(&zs);
        assert_eq!(g.num_edges(), expected);
        let edges: Vec<_> = g.edges().map(|(_, e)| e).collect();
        for (e1, e2) in edges.iter().tuple_combinations() {
            assert!(!(e1.touches(e2.from) && e1.touches(e2.to)), "parallel edges");
        }
    }

    #[test]
    fn connectivity() {
        assert!(DualGraph::new(&zones(&["a"])).is_connected());
        assert!(!DualGraph::new(&zones(&["", "ab"])).is_connected());
        let mut g = DualGraph::new(&zones(&["", "a", "ab"]));
        assert!(g.is_connected());
        g.remove_node(1);
        assert!(!g.is_connected());
        assert_eq!(g.node_by_zone(&Zone::from_labels("a")), None);
        assert_eq!(g.node_by_zone(&Zone::from_labels("ab")), Some(2));
    }

    #[test]
    fn shortest_paths() {
        let g = DualGraph::new(&zones(&["", "a", "b", "ab", "abc"]));
        assert_eq!(g.find_shortest_vertex_path(0, 4), vec![0, 1, 3, 4]);
        assert_eq!(g.find_shortest_edge_path(0, 4).len(), 3);
        assert_eq!(g.find_shortest_vertex_path_avoiding(0, 4, &[1]), vec![0, 2, 3, 4]);
        // The filtered search leaves the graph untouched
        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.find_shortest_vertex_path(2, 2), vec![2]);
    }

    #[test]
    #[should_panic(expected = "No path")]
    fn no_path_is_fatal() {
        let g = DualGraph::new(&zones(&["", "a", "bc"]));
        g.find_shortest_vertex_path(0, 2);
    }

    #[test]
    fn find_cycle() {
        let g = DualGraph::new(&zones(&["", "a", "b", "ab"]));
        assert_eq!(g.find_cycle(0, 3), Some(vec![0, 1, 3, 2]));
        assert_eq!(g.find_cycle(0, 1), Some(vec![0, 1, 3, 2]));
        let path = DualGraph::new(&zones(&["", "a", "ab"]));
        assert_eq!(path.find_cycle(0, 2), None);
        assert_eq!(path.num_edges(), 2);
    }

    #[test]
    fn low_degree_pairing_consumes_all_edges() {
        // {} - a - ab - abc: a path with a perfect matching
        let mut g = DualGraph::new(&zones(&["", "a", "ab", "abc"]));
        let mut pairs = vec![];
        while let Some(e) = g.low_degree_edge() {
            let DualEdge { from, to, .. } = g.edge(e).clone();
            pairs.push((from, to));
            g.remove_node(from);
            g.remove_node(to);
        }
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn low_degree_edge_prefers_leaves() {
        // a - {} - b, plus b - bc: leaf "a" (degree 1) comes first
        let g = DualGraph::new(&zones(&["", "a", "b", "bc"]));
        let e = g.low_degree_edge().unwrap();
        assert_eq!((g.edge(e).from, g.edge(e).to), (0, 1));
        assert_eq!(DualGraph::new(&zones(&["", "ab"])).low_degree_edge(), None);
    }

    #[test]
    fn four_tuple() {
        let g = DualGraph::new(&zones(&["", "a", "b", "ab"]));
        assert_eq!(g.four_tuple(), Some([0, 1, 2, 3]));
        let g = DualGraph::new(&zones(&["", "a", "b"]));
        assert_eq!(g.four_tuple(), None);
        let cube = DualGraph::new(&zones(&["", "a", "b", "c", "ab", "ac", "bc", "abc"]));
        let [n, n2, n3, n4] = cube.four_tuple().unwrap();
        let (e1, e2) = (cube.edge_between(n, n2).unwrap(), cube.edge_between(n, n3).unwrap());
        assert_eq!(cube.edge(cube.edge_between(n3, n4).unwrap()).curve, cube.edge(e1).curve);
        assert_eq!(cube.edge(cube.edge_between(n2, n4).unwrap()).curve, cube.edge(e2).curve);
    }

    #[test]
    fn potential_four_tuple() {
        let universe = zone_set(&["", "a", "b", "ab"]);
        // Three connected nodes: the missing corner comes from the universe
        let g = DualGraph::new(&zones(&["", "a", "b"]));
        let tuple = g.potential_four_tuple(&universe).unwrap();
        assert_eq!(tuple, [Zone::outside(), Zone::from_labels("a"), Zone::from_labels("b"), Zone::from_labels("ab")]);

        // Two disconnected nodes: both other corners come from the universe
        let g = DualGraph::new(&zones(&["a", "b"]));
        let tuple = g.potential_four_tuple(&universe).unwrap();
        assert_eq!(tuple, [Zone::outside(), Zone::from_labels("a"), Zone::from_labels("b"), Zone::from_labels("ab")]);

        // Nothing to complete with
        let g = DualGraph::new(&zones(&["", "a"]));
        assert_eq!(g.potential_four_tuple(&zone_set(&["", "a"])), None);
    }

    #[test]
    fn compute_cycle() {
        let g = DualGraph::new(&zones(&["", "a", "b", "ab", "abc"]));
        let cycle = g.compute_cycle(&zones(&["a", "b"])).unwrap();
        assert_eq!(cycle.nodes, vec![0, 1, 3, 2]);
        assert!(g.compute_cycle(&zones(&["abc"])).is_none());
        assert!(g.compute_cycle(&zones(&["c"])).is_none());
    }
}
