//! Reference-guided scaffolding of assembled contigs.
//!
//! Contig ends are aligned to one or more related genomes. The
//! placements of the ends in those tilings give distances between
//! them, which are reduced to a consensus graph and walked greedily
//! into contig-link scaffolds. Scaffolds are finally merged into
//! sequences, joining overlapping neighbours.

pub mod config;
pub mod contig;
pub mod distance;
pub mod fasta;
pub mod graph;
pub mod merge;
pub mod mmap;
pub mod parser;
pub mod pipeline;
pub mod scaffold;
pub mod writer;
