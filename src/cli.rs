use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use scaffolder::config::{LinkConfig, ParsingConfig};
use scaffolder::graph::Statistic;
use scaffolder::parser::ParserTolerance;

#[derive(Parser)]
#[command(
    name = "scaffolder",
    version,
    about = "Order, orient and merge contigs using related genomes as guides"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Fail on the first malformed input line instead of skipping it
    #[arg(long, global = true)]
    pub pedantic: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cut contigs into named ends, ready to be aligned to a guide
    Ends(EndsArgs),

    /// Build contig links from guide tilings
    Links(LinksArgs),

    /// Merge contig links into scaffold sequences
    Scaffold(ScaffoldArgs),

    /// Print the length of every sequence in a FASTA file
    Lengths(LengthsArgs),
}

#[derive(Args)]
pub struct EndsArgs {
    /// Contigs in multi-FASTA format
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output multi-FASTA of contig ends
    #[arg(short, long)]
    pub output: PathBuf,

    /// Length of each end; contigs shorter than two ends are kept whole
    #[arg(short = 'n', long, default_value_t = 2000)]
    pub cut: usize,
}

#[derive(Args)]
pub struct LinksArgs {
    /// Tilings of the contig ends on each guiding genome
    #[arg(short, long, num_args = 1.., required = true)]
    pub input: Vec<PathBuf>,

    /// Output contig-link file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Use at most this many guides, taken in path order
    #[arg(short = 'n', long)]
    pub max_guides: Option<usize>,

    /// Number of consecutive placements paired up
    #[arg(short, long, default_value_t = 2)]
    pub window_size: usize,

    /// Minimum number of observations for an edge
    #[arg(short, long, default_value_t = 1)]
    pub threshold: usize,

    /// Consensus statistic: median, mean or harmonic
    #[arg(short, long, default_value = "median")]
    pub statistic: Statistic,
}

impl From<&LinksArgs> for LinkConfig {
    fn from(args: &LinksArgs) -> Self {
        Self {
            window_size: args.window_size,
            threshold: args.threshold,
            statistic: args.statistic,
            max_guides: args.max_guides,
        }
    }
}

#[derive(Args)]
pub struct ScaffoldArgs {
    /// Contig-link file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Contigs in multi-FASTA format
    #[arg(short, long)]
    pub contigs: PathBuf,

    /// Output multi-FASTA of scaffolds and unplaced contigs
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct LengthsArgs {
    /// Multi-FASTA file
    pub input: PathBuf,
}

impl From<&Cli> for ParsingConfig {
    fn from(cli: &Cli) -> Self {
        let tolerance = if cli.pedantic {
            ParserTolerance::Pedantic
        } else {
            ParserTolerance::IgnoreAll
        };
        Self { tolerance }
    }
}
