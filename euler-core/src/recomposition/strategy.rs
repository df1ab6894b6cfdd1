use std::{collections::{BTreeMap, BTreeSet}, fmt::{self, Display, Formatter}, str::FromStr};

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::{graph::DualGraph, model::{Description, Zone}};

use super::data::Cluster;

/// How many times [`RecompositionStrategyType::DoublyPiercedExtraZones`] may reuse an identical
/// completed four-tuple over one recomposition before falling back to single piercings.
pub const MAX_CLUSTER_REPEATS: usize = 2;

/// How the zones split by a new curve are grouped into contours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "kebab-case")]
pub enum RecompositionStrategyType {
    /// One contour per zone.
    Nested,
    /// Pairs of adjacent zones, greedily from low-degree dual-graph edges; leftovers nested.
    SinglyPierced,
    /// Squares of zones first, then as `SinglyPierced`.
    #[default]
    DoublyPierced,
    /// Like `DoublyPierced`, but completes partial squares with zones outside the split set.
    DoublyPiercedExtraZones,
    /// All zones split by one contour.
    SingleCluster,
}

pub const RECOMPOSITION_STRATEGIES: [RecompositionStrategyType; 5] = [
    RecompositionStrategyType::Nested,
    RecompositionStrategyType::SinglyPierced,
    RecompositionStrategyType::DoublyPierced,
    RecompositionStrategyType::DoublyPiercedExtraZones,
    RecompositionStrategyType::SingleCluster,
];

impl RecompositionStrategyType {
    pub fn name(&self) -> &'static str {
        match self {
            RecompositionStrategyType::Nested => "nested",
            RecompositionStrategyType::SinglyPierced => "singly-pierced",
            RecompositionStrategyType::DoublyPierced => "doubly-pierced",
            RecompositionStrategyType::DoublyPiercedExtraZones => "doubly-pierced-extra-zones",
            RecompositionStrategyType::SingleCluster => "single-cluster",
        }
    }

    /// Partition `zones` (each consumed exactly once) into clusters. `description` is the diagram
    /// being split; `repeats` counts completed four-tuples across calls.
    pub fn make_clusters(
        &self,
        zones: &[Zone],
        description: &Description,
        repeats: &mut BTreeMap<Cluster, usize>,
    ) -> Vec<Cluster> {
        let clusters = match self {
            RecompositionStrategyType::Nested => nested(zones),
            RecompositionStrategyType::SinglyPierced => {
                let mut graph = DualGraph::new(zones);
                let mut clusters = vec![];
                seek_single_piercings(&mut graph, &mut clusters);
                clusters
            }
            RecompositionStrategyType::DoublyPierced => {
                let mut graph = DualGraph::new(zones);
                let mut clusters = vec![];
                while let Some(tuple) = graph.four_tuple() {
                    clusters.push(Cluster(tuple.iter().map(|&n| graph.zone(n).clone()).collect()));
                    for n in tuple {
                        graph.remove_node(n);
                    }
                }
                seek_single_piercings(&mut graph, &mut clusters);
                clusters
            }
            RecompositionStrategyType::DoublyPiercedExtraZones => {
                let mut graph = DualGraph::new(zones);
                let mut clusters = vec![];
                let mut available: BTreeSet<Zone> = description.zones().clone();
                while let Some(tuple) = graph.potential_four_tuple(&available) {
                    let cluster = Cluster(tuple.to_vec());
                    let count = repeats.entry(cluster.clone()).or_insert(0);
                    if *count == MAX_CLUSTER_REPEATS {
                        warn!("Four-tuple {:?} already used {} times; falling back to single piercings", cluster.0, count);
                        break;
                    }
                    *count += 1;
                    for zone in &tuple {
                        if let Some(n) = graph.node_by_zone(zone) {
                            graph.remove_node(n);
                        }
                        available.remove(zone);
                    }
                    clusters.push(cluster);
                }
                seek_single_piercings(&mut graph, &mut clusters);
                clusters
            }
            RecompositionStrategyType::SingleCluster => vec![Cluster(zones.to_vec())],
        };
        debug!("  {} clusters: {}", self, clusters.iter().map(|c| c.iter().join(" ")).join(" | "));
        clusters
    }
}

fn nested(zones: &[Zone]) -> Vec<Cluster> {
    zones.iter().map(|z| Cluster(vec![z.clone()])).collect()
}

/// Greedily pair the endpoints of low-degree edges, then nest whatever is left.
fn seek_single_piercings(graph: &mut DualGraph, clusters: &mut Vec<Cluster>) {
    while let Some(e) = graph.low_degree_edge() {
        let (from, to) = (graph.edge(e).from, graph.edge(e).to);
        clusters.push(Cluster(vec![graph.zone(from).clone(), graph.zone(to).clone()]));
        graph.remove_node(from);
        graph.remove_node(to);
    }
    if graph.num_edges() != 0 {
        panic!("Non-empty dual graph edge set after single-piercing extraction: {} edges", graph.num_edges());
    }
    clusters.extend(graph.nodes().map(|n| Cluster(vec![graph.zone(n).clone()])));
}

impl Display for RecompositionStrategyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RecompositionStrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RECOMPOSITION_STRATEGIES
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("Unknown recomposition strategy {:?} (expected one of: {})", s, RECOMPOSITION_STRATEGIES.iter().join(", ")))
    }
}
