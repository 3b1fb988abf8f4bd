mod cli;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use scaffolder::config::{LinkConfig, ParsingConfig};
use scaffolder::{fasta, pipeline, writer};

use cli::{Cli, Commands};

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let parsing = ParsingConfig::from(&cli);

    match &cli.command {
        Commands::Ends(args) => {
            let contigs = fasta::read_fasta(&args.input)?;
            let ends = fasta::extract_contig_ends(&contigs, args.cut);
            let mut out = create(&args.output)?;
            writer::write_fasta(ends.iter().map(|r| (&r.id, &r.seq)), &mut out)?;
            out.flush()?;
        }
        Commands::Links(args) => {
            let config = LinkConfig::from(args);
            let scaffolds =
                pipeline::make_contig_links_from_files(&args.input, &config, &parsing)?;
            let mut out = create(&args.output)?;
            writer::write_contig_links(&scaffolds, &mut out)?;
            out.flush()?;
            info!(
                "Wrote {} scaffolds to {}",
                scaffolds.len(),
                args.output.display()
            );
        }
        Commands::Scaffold(args) => {
            let merged =
                pipeline::make_scaffolds_from_files(&args.input, &args.contigs, &parsing)?;
            let mut out = create(&args.output)?;
            writer::write_fasta(merged.iter().map(|(n, s)| (n, s)), &mut out)?;
            out.flush()?;
            info!(
                "Wrote {} sequences to {}",
                merged.len(),
                args.output.display()
            );
        }
        Commands::Lengths(args) => {
            let records = fasta::read_fasta(&args.input)?;
            let lengths = fasta::sequence_lengths(&records);
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            writer::write_lengths(&lengths, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}
