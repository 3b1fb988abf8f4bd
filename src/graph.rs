//! The scaffolding graph: observed distances between contig ends,
//! their consensus, and the greedy paths through it.

pub mod consensus;
pub mod matrix;
pub mod path;

pub use self::consensus::{ConsensusConfig, ConsensusGraph, Statistic};
pub use self::matrix::DistanceMatrix;
pub use self::path::{paths_are_disjoint, Path, PathBuilder, VisitedContigs};
