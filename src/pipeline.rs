//! The two stages of scaffolding: guide tilings to contig links, and
//! contig links plus contig sequences to scaffold sequences.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bstr::BString;
use log::info;

use crate::config::{select_guides, LinkConfig, ParsingConfig};
use crate::fasta::{read_fasta, sequence_store};
use crate::graph::{paths_are_disjoint, ConsensusGraph, DistanceMatrix, PathBuilder};
use crate::merge::merge_scaffolds;
use crate::parser::{LinkParser, Tiling, TilingParser};
use crate::scaffold::{assemble_scaffolds, MissingEdge, Scaffold};

/// Order and orient contigs using the placements of their ends on
/// one or more guiding genomes.
pub fn make_contig_links(
    tilings: &[Tiling],
    config: &LinkConfig,
) -> Result<Vec<Scaffold>, MissingEdge> {
    let matrix = DistanceMatrix::from_tilings(tilings, config.window_size);
    info!(
        "Distance matrix: {} nodes, {} edges from {} guides",
        matrix.node_count(),
        matrix.edge_count(),
        tilings.len()
    );

    let graph = ConsensusGraph::from_matrix(&matrix, &config.consensus());
    let paths = PathBuilder::new(&graph).build_paths();
    debug_assert!(paths_are_disjoint(&paths));

    let scaffolds = assemble_scaffolds(&graph, &paths)?;
    info!("Assembled {} scaffolds", scaffolds.len());
    Ok(scaffolds)
}

pub fn make_contig_links_from_files(
    guides: &[PathBuf],
    config: &LinkConfig,
    parsing: &ParsingConfig,
) -> anyhow::Result<Vec<Scaffold>> {
    config.validate()?;

    let guides = select_guides(guides, config.max_guides);
    if guides.is_empty() {
        bail!("No guide tilings given");
    }

    let parser = TilingParser::with_tolerance(parsing.tolerance);
    let tilings = guides
        .iter()
        .map(|path| parser.parse_file(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(make_contig_links(&tilings, config)?)
}

/// Merge the scaffolds of a contig-link file into sequences. Contigs
/// no scaffold uses are passed through. The result is sorted by name.
pub fn make_scaffolds_from_files<P, Q>(
    links: P,
    contigs: Q,
    parsing: &ParsingConfig,
) -> anyhow::Result<Vec<(BString, BString)>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let links = LinkParser::with_tolerance(parsing.tolerance).parse_file(links)?;
    let store = sequence_store(read_fasta(contigs.as_ref())?);

    let merged = merge_scaffolds(&links.scaffolds, &store)
        .context("Failed to merge scaffolds")?;
    Ok(merged.into_iter().collect())
}
