use bstr::{BStr, BString};
use fnv::FnvHashSet;
use log::{debug, info};

use crate::contig::ContigEnd;

use super::consensus::ConsensusGraph;

pub type Path = Vec<ContigEnd>;

/// The contigs that have been claimed by a path during one run. A
/// contig is claimed when its first end is placed, so no contig can
/// appear in two paths.
#[derive(Default, Debug, Clone)]
pub struct VisitedContigs {
    contigs: FnvHashSet<BString>,
}

impl VisitedContigs {
    pub fn new() -> Self {
        Default::default()
    }

    /// Claim a contig, returns false if it was already claimed
    pub fn claim(&mut self, contig: &BStr) -> bool {
        if self.contigs.contains(contig) {
            return false;
        }
        self.contigs.insert(BString::from(contig.to_vec()));
        true
    }

    /// Give a claimed contig back
    pub fn release(&mut self, contig: &BStr) -> bool {
        self.contigs.remove(contig)
    }

    pub fn contains(&self, contig: &BStr) -> bool {
        self.contigs.contains(contig)
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

/// Greedily grows contig-disjoint paths over a consensus graph.
///
/// Each path starts at the smallest unclaimed contig end. From the
/// current end the path first hops to the opposite end of the same
/// contig, if the graph knows it, then bridges to the closest end of
/// an unclaimed contig. Ties on distance go to the smallest contig
/// id. There is no backtracking.
pub struct PathBuilder<'a> {
    graph: &'a ConsensusGraph,
    visited: VisitedContigs,
}

impl<'a> PathBuilder<'a> {
    pub fn new(graph: &'a ConsensusGraph) -> Self {
        PathBuilder {
            graph,
            visited: VisitedContigs::new(),
        }
    }

    pub fn visited(&self) -> &VisitedContigs {
        &self.visited
    }

    /// Build every path that reaches a second contig. A seed that
    /// doesn't get off its own contig is dropped and its contig is
    /// released, so a later seed on the other end or strand can still
    /// use it.
    pub fn build_paths(&mut self) -> Vec<Path> {
        let graph = self.graph;
        let mut paths = Vec::new();
        let mut singletons = 0;

        for seed in graph.nodes() {
            if !self.visited.claim(seed.contig()) {
                continue;
            }
            let path = self.expand(seed.clone());
            if path.iter().any(|end| !end.same_contig(seed)) {
                debug!("Path of {} ends from {}", path.len(), seed);
                paths.push(path);
            } else {
                self.visited.release(seed.contig());
                singletons += 1;
            }
        }

        info!(
            "Built {} paths over {} contigs ({} unchained seeds)",
            paths.len(),
            self.visited.len(),
            singletons
        );
        paths
    }

    /// Grow one path from an already claimed seed
    pub fn expand(&mut self, seed: ContigEnd) -> Path {
        let mut path = vec![seed];

        loop {
            let current = &path[path.len() - 1];
            if let Some(opposite) = self.flip(current) {
                path.push(opposite);
            }

            let current = &path[path.len() - 1];
            match self.bridge(current) {
                Some(next) => {
                    self.visited.claim(next.contig());
                    path.push(next);
                }
                None => break,
            }
        }

        path
    }

    fn flip(&self, current: &ContigEnd) -> Option<ContigEnd> {
        current
            .opposite_end()
            .filter(|opposite| self.graph.contains(opposite))
    }

    /// The nearest end of an unclaimed contig
    fn bridge(&self, current: &ContigEnd) -> Option<ContigEnd> {
        self.graph
            .neighbors(current)
            .filter(|(to, _)| !self.visited.contains(to.contig()))
            .min_by(|(a, da), (b, db)| {
                da.cmp(db)
                    .then_with(|| a.contig.cmp(&b.contig))
                    .then_with(|| a.cmp(b))
            })
            .map(|(to, _)| to.clone())
    }
}

/// Check that no contig appears in more than one path
pub fn paths_are_disjoint(paths: &[Path]) -> bool {
    let mut seen: FnvHashSet<&BString> = FnvHashSet::default();
    for path in paths {
        let mut own: FnvHashSet<&BString> = FnvHashSet::default();
        for end in path {
            own.insert(&end.contig);
        }
        for contig in own {
            if !seen.insert(contig) {
                return false;
            }
        }
    }
    true
}
