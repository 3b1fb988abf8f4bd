use std::collections::BTreeMap;

use log::debug;

use crate::contig::ContigEnd;
use crate::distance::distance;
use crate::parser::{PlacementRecord, Tiling, TilingCluster};

/// Every distance observed between two contig ends, over all tilings
/// that were added. Keyed by source end, then target end.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    edges: BTreeMap<ContigEnd, BTreeMap<ContigEnd, Vec<i64>>>,
}

impl DistanceMatrix {
    pub fn new() -> Self {
        Default::default()
    }

    /// Build a matrix from a set of tilings with the given window
    /// size. Windows smaller than 2 contain no pairs.
    pub fn from_tilings(tilings: &[Tiling], window: usize) -> Self {
        let mut matrix = DistanceMatrix::new();
        for tiling in tilings {
            matrix.add_tiling(tiling, window);
        }
        matrix
    }

    pub fn add_tiling(&mut self, tiling: &Tiling, window: usize) {
        for cluster in tiling.clusters.iter() {
            self.add_cluster(cluster, window);
        }
    }

    /// Slide a window over the records of one cluster, pairing each
    /// record with the `window - 1` records that follow it.
    pub fn add_cluster(&mut self, cluster: &TilingCluster, window: usize) {
        let records = &cluster.records;
        let mut pairs = 0;
        for (i, first) in records.iter().enumerate() {
            let last = records.len().min(i + window);
            for second in records.iter().take(last).skip(i + 1) {
                self.add_pair(first, second);
                pairs += 1;
            }
        }
        debug!(
            "Cluster {}: {} records, {} pairs",
            cluster.name,
            records.len(),
            pairs
        );
    }

    fn add_pair(&mut self, first: &PlacementRecord, second: &PlacementRecord) {
        let end1 = first.contig_end();
        let end2 = second.contig_end();
        let dist = distance(first.start, first.end, second.start, second.end);
        self.insert(end1, end2, dist);
    }

    /// Record one observation of `from -> to`, together with its
    /// mirror: the same adjacency read from the other strand, where
    /// the direction of the edge is reversed.
    pub fn insert(&mut self, from: ContigEnd, to: ContigEnd, dist: i64) {
        let mirror_from = to.flip_orientation();
        let mirror_to = from.flip_orientation();
        self.push(from, to, dist);
        self.push(mirror_from, mirror_to, dist);
    }

    fn push(&mut self, from: ContigEnd, to: ContigEnd, dist: i64) {
        self.edges
            .entry(from)
            .or_default()
            .entry(to)
            .or_default()
            .push(dist);
    }

    pub fn get(&self, from: &ContigEnd, to: &ContigEnd) -> Option<&[i64]> {
        self.edges
            .get(from)
            .and_then(|targets| targets.get(to))
            .map(|dists| dists.as_slice())
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|targets| targets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over all edges with their observed distances, in
    /// ascending order of source, then target.
    pub fn edges(
        &self,
    ) -> impl Iterator<Item = (&ContigEnd, &ContigEnd, &[i64])> + '_ {
        self.edges.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, dists)| (from, to, dists.as_slice()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig::{EndTag, Orientation};
    use crate::parser::TilingParser;

    fn tiling(text: &str) -> Tiling {
        TilingParser::new()
            .parse_lines(text.as_bytes().split(|&b| b == b'\n'))
            .unwrap()
    }

    const TILING: &str = "/ref/genome.fa /ref/contigs.fa
>chr1 10000 bases
0\t100\t50\t101\t100.00\t99.50\t+\tLFT_c1
150\t250\t10\t101\t100.00\t99.50\t+\tRGT_c1
260\t400\t-20\t141\t100.00\t98.00\t-\tc2
380\t500\t0\t121\t100.00\t97.00\t+\tc3
";

    fn end(id: &[u8], orient: Orientation) -> ContigEnd {
        ContigEnd::from_tagged(id, orient)
    }

    #[test]
    fn window_of_two_pairs_neighbours() {
        let matrix = DistanceMatrix::from_tilings(&[tiling(TILING)], 2);
        use Orientation::*;

        let l1 = end(b"LFT_c1", Forward);
        let r1 = end(b"RGT_c1", Forward);
        let c2 = end(b"c2", Backward);
        let c3 = end(b"c3", Forward);

        assert_eq!(matrix.get(&l1, &r1), Some(&[50][..]));
        assert_eq!(matrix.get(&r1, &c2), Some(&[10][..]));
        assert_eq!(matrix.get(&c2, &c3), Some(&[-20][..]));
        // not within the window
        assert_eq!(matrix.get(&l1, &c2), None);
        // three pairs, each mirrored
        assert_eq!(matrix.edge_count(), 6);
    }

    #[test]
    fn larger_window_adds_distant_pairs() {
        let matrix = DistanceMatrix::from_tilings(&[tiling(TILING)], 3);
        let l1 = end(b"LFT_c1", Orientation::Forward);
        let c2 = end(b"c2", Orientation::Backward);
        assert_eq!(matrix.get(&l1, &c2), Some(&[160][..]));
        assert_eq!(matrix.edge_count(), 10);

        let none = DistanceMatrix::from_tilings(&[tiling(TILING)], 1);
        assert!(none.is_empty());
    }

    #[test]
    fn every_edge_has_its_mirror() {
        let tilings = vec![tiling(TILING), tiling(TILING)];
        let matrix = DistanceMatrix::from_tilings(&tilings, 3);
        for (from, to, dists) in matrix.edges() {
            let mirror = matrix
                .get(&to.flip_orientation(), &from.flip_orientation())
                .unwrap();
            assert_eq!(mirror, dists);
        }
    }

    #[test]
    fn observations_accumulate_across_tilings() {
        let tilings = vec![tiling(TILING), tiling(TILING), tiling(TILING)];
        let matrix = DistanceMatrix::from_tilings(&tilings, 2);
        let r1 = ContigEnd::new(b"c1", EndTag::Right, Orientation::Forward);
        let c2 = end(b"c2", Orientation::Backward);
        assert_eq!(matrix.get(&r1, &c2), Some(&[10, 10, 10][..]));

        let mirror_from = ContigEnd::new(b"c2", EndTag::Whole, Orientation::Forward);
        let mirror_to = ContigEnd::new(b"c1", EndTag::Right, Orientation::Backward);
        assert_eq!(matrix.get(&mirror_from, &mirror_to), Some(&[10, 10, 10][..]));
    }
}
