use std::collections::BTreeMap;

use log::info;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::contig::ContigEnd;

use super::matrix::DistanceMatrix;

/// Reduces the distances observed for one edge to a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Statistic {
    Median,
    Mean,
    /// Harmonic mean over the non-zero distances, the mean when
    /// it is undefined
    HarmonicMean,
}

impl Default for Statistic {
    fn default() -> Self {
        Statistic::Median
    }
}

impl Statistic {
    /// Apply the statistic to a non-empty list of distances
    pub fn apply(&self, dists: &[i64]) -> f64 {
        match self {
            Statistic::Median => median(dists),
            Statistic::Mean => mean(dists),
            Statistic::HarmonicMean => harmonic_mean(dists),
        }
    }
}

impl std::str::FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "median" => Ok(Statistic::Median),
            "mean" => Ok(Statistic::Mean),
            "harmonic" => Ok(Statistic::HarmonicMean),
            _ => Err(format!(
                "Unknown statistic `{}` (expected median, mean or harmonic)",
                s
            )),
        }
    }
}

fn median(dists: &[i64]) -> f64 {
    if dists.is_empty() {
        return 0.0;
    }
    let mut sorted = dists.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn mean(dists: &[i64]) -> f64 {
    if dists.is_empty() {
        return 0.0;
    }
    dists.iter().map(|&d| d as f64).sum::<f64>() / dists.len() as f64
}

fn harmonic_mean(dists: &[i64]) -> f64 {
    let non_zero: Vec<f64> = dists
        .iter()
        .filter(|&&d| d != 0)
        .map(|&d| d as f64)
        .collect();
    let reciprocals: f64 = non_zero.iter().map(|d| 1.0 / d).sum();
    let hm = non_zero.len() as f64 / reciprocals;
    // mixed signs can cancel the reciprocals out
    if non_zero.is_empty() || reciprocals == 0.0 || !hm.is_finite() {
        return mean(dists);
    }
    hm
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusConfig {
    /// Minimum number of observations an edge needs to be kept
    pub threshold: usize,
    pub statistic: Statistic,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        ConsensusConfig {
            threshold: 1,
            statistic: Statistic::Median,
        }
    }
}

/// One consensus distance per edge between contig ends
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ConsensusGraph {
    edges: BTreeMap<ContigEnd, BTreeMap<ContigEnd, i64>>,
}

impl ConsensusGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Drop the edges seen fewer than `threshold` times and reduce the
    /// rest with the configured statistic, truncated toward zero.
    pub fn from_matrix(matrix: &DistanceMatrix, config: &ConsensusConfig) -> Self {
        let mut graph = ConsensusGraph::new();
        let mut dropped = 0;
        for (from, to, dists) in matrix.edges() {
            if dists.len() < config.threshold {
                dropped += 1;
                continue;
            }
            let consensus = config.statistic.apply(dists).trunc() as i64;
            graph.insert(from.clone(), to.clone(), consensus);
        }
        info!(
            "Consensus graph: {} edges kept, {} below threshold {}",
            graph.edge_count(),
            dropped,
            config.threshold
        );
        graph
    }

    pub fn insert(&mut self, from: ContigEnd, to: ContigEnd, dist: i64) {
        self.edges.entry(from).or_default().insert(to, dist);
    }

    pub fn distance(&self, from: &ContigEnd, to: &ContigEnd) -> Option<i64> {
        self.edges.get(from).and_then(|t| t.get(to)).copied()
    }

    /// True if the end has at least one outgoing edge
    pub fn contains(&self, node: &ContigEnd) -> bool {
        self.edges.contains_key(node)
    }

    /// Outgoing edges of a node, in ascending target order
    pub fn neighbors<'a>(
        &'a self,
        node: &ContigEnd,
    ) -> impl Iterator<Item = (&'a ContigEnd, i64)> + 'a {
        self.edges
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, &d)| (to, d)))
    }

    /// Nodes with outgoing edges, in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = &ContigEnd> + '_ {
        self.edges.keys()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Dump the graph as a JSON list of `[from, to, distance]` triples
    #[cfg(feature = "serde1")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        let triples: Vec<(&ContigEnd, &ContigEnd, i64)> = self
            .edges
            .iter()
            .flat_map(|(from, targets)| {
                targets.iter().map(move |(to, &d)| (from, to, d))
            })
            .collect();
        serde_json::to_string(&triples)
    }
}
