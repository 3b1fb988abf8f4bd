use bstr::{BStr, BString, ByteSlice};
use log::debug;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::contig::{ContigEnd, Orientation};
use crate::graph::{ConsensusGraph, Path};

/// One contig-link line: the gap to the next contig, and the strand
/// and id of this one. A negative gap is an expected overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ScaffoldLine {
    pub gap: i64,
    pub orient: Orientation,
    pub contig: BString,
}

impl ScaffoldLine {
    pub fn new(gap: i64, orient: Orientation, contig: &[u8]) -> Self {
        ScaffoldLine {
            gap,
            orient,
            contig: BString::from(contig),
        }
    }
}

/// Tab-separated, as in contig-link files
impl std::fmt::Display for ScaffoldLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.gap, self.orient, self.contig)
    }
}

/// A named, ordered chain of contig-link lines
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct Scaffold {
    pub name: BString,
    pub lines: Vec<ScaffoldLine>,
}

impl Scaffold {
    pub fn new(name: &[u8], lines: Vec<ScaffoldLine>) -> Self {
        Scaffold {
            name: BString::from(name),
            lines,
        }
    }

    pub fn contigs(&self) -> impl Iterator<Item = &BStr> + '_ {
        self.lines.iter().map(|l| l.contig.as_bstr())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A hop between two contigs in a path that has no edge in the
/// consensus graph. Paths built over the same graph never have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEdge {
    pub from: ContigEnd,
    pub to: ContigEnd,
}

impl std::fmt::Display for MissingEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No consensus distance for {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for MissingEdge {}

/// Turn a path of contig ends into contig-link lines. Hops between
/// the two ends of one contig produce nothing; every other hop gives
/// a line for its first contig, with the consensus distance as gap.
/// The last contig gets a closing line with a zero gap.
pub fn assemble_path(
    graph: &ConsensusGraph,
    path: &[ContigEnd],
) -> Result<Vec<ScaffoldLine>, MissingEdge> {
    let mut lines = Vec::with_capacity(path.len());

    for pair in path.windows(2) {
        let (e1, e2) = (&pair[0], &pair[1]);
        if e1.same_contig(e2) {
            continue;
        }
        let gap = graph.distance(e1, e2).ok_or_else(|| MissingEdge {
            from: e1.clone(),
            to: e2.clone(),
        })?;
        lines.push(ScaffoldLine::new(gap, e1.orient, &e1.contig));
    }

    if let Some(last) = path.last() {
        lines.push(ScaffoldLine::new(0, last.orient, &last.contig));
    }

    Ok(lines)
}

/// Assemble every path and number the resulting scaffolds from 1,
/// skipping those with fewer than two lines.
pub fn assemble_scaffolds(
    graph: &ConsensusGraph,
    paths: &[Path],
) -> Result<Vec<Scaffold>, MissingEdge> {
    let mut scaffolds = Vec::new();

    for path in paths {
        let lines = assemble_path(graph, path)?;
        if lines.len() < 2 {
            debug!("Skipping single-contig path from {:?}", path.first());
            continue;
        }
        let name = format!("Scaffold{}", scaffolds.len() + 1);
        scaffolds.push(Scaffold::new(name.as_bytes(), lines));
    }

    Ok(scaffolds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig::EndTag;
    use Orientation::*;

    fn end(id: &str, tag: EndTag, orient: Orientation) -> ContigEnd {
        ContigEnd::new(id.as_bytes(), tag, orient)
    }

    #[test]
    fn one_line_per_contig() {
        let mut graph = ConsensusGraph::new();
        let a = end("a", EndTag::Whole, Forward);
        let b = end("b", EndTag::Whole, Backward);
        let c = end("c", EndTag::Whole, Forward);
        graph.insert(a.clone(), b.clone(), 50);
        graph.insert(b.clone(), c.clone(), -7);

        let lines = assemble_path(&graph, &[a, b, c]).unwrap();
        assert_eq!(
            lines,
            vec![
                ScaffoldLine::new(50, Forward, b"a"),
                ScaffoldLine::new(-7, Backward, b"b"),
                ScaffoldLine::new(0, Forward, b"c"),
            ]
        );
    }

    #[test]
    fn same_contig_hops_are_skipped() {
        let mut graph = ConsensusGraph::new();
        let l1 = end("c1", EndTag::Left, Forward);
        let r1 = end("c1", EndTag::Right, Forward);
        let l2 = end("c2", EndTag::Left, Backward);
        let r2 = end("c2", EndTag::Right, Backward);
        graph.insert(l1.clone(), r1.clone(), 900);
        graph.insert(r1.clone(), l2.clone(), 12);
        graph.insert(l2.clone(), r2.clone(), 900);

        let lines = assemble_path(&graph, &[l1, r1, l2, r2]).unwrap();
        assert_eq!(
            lines,
            vec![
                ScaffoldLine::new(12, Forward, b"c1"),
                ScaffoldLine::new(0, Backward, b"c2"),
            ]
        );
    }

    #[test]
    fn scaffolds_are_numbered_in_order() {
        let mut graph = ConsensusGraph::new();
        let l1 = end("c1", EndTag::Left, Forward);
        let r1 = end("c1", EndTag::Right, Forward);
        let a = end("a", EndTag::Whole, Forward);
        let b = end("b", EndTag::Whole, Forward);
        graph.insert(l1.clone(), r1.clone(), 900);
        graph.insert(a.clone(), b.clone(), 3);

        // a path over both ends of one contig gives a single line
        let paths = vec![vec![l1, r1], vec![a, b]];
        let scaffolds = assemble_scaffolds(&graph, &paths).unwrap();
        assert_eq!(scaffolds.len(), 1);
        assert_eq!(scaffolds[0].name, BString::from("Scaffold1"));
        assert_eq!(
            scaffolds[0].contigs().collect::<Vec<_>>(),
            vec![b"a".as_bstr(), b"b".as_bstr()]
        );
        assert_eq!(format!("{}", scaffolds[0].lines[0]), "3\t+\ta");
    }

    #[test]
    fn hops_off_the_graph_are_errors() {
        let graph = ConsensusGraph::new();
        let a = end("a", EndTag::Whole, Forward);
        let b = end("b", EndTag::Whole, Forward);
        assert_eq!(
            assemble_path(&graph, &[a.clone(), b.clone()]),
            Err(MissingEdge { from: a, to: b })
        );
    }
}
