//! Multi-FASTA input, and the contig preprocessing done before
//! contigs are aligned to a guiding genome.

use std::path::Path;
use std::{fmt, io};

use anyhow::Context;
use bio::io::fasta;
use bstr::BString;
use log::{info, warn};

use crate::contig::EndTag;
use crate::merge::SequenceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: BString,
    pub seq: BString,
}

impl FastaRecord {
    pub fn new(id: &[u8], seq: &[u8]) -> Self {
        FastaRecord {
            id: BString::from(id),
            seq: BString::from(seq),
        }
    }
}

impl From<&fasta::Record> for FastaRecord {
    fn from(record: &fasta::Record) -> Self {
        FastaRecord::new(record.id().as_bytes(), record.seq())
    }
}

/// Read multi-FASTA records. The id of a record is the first word of
/// its header.
pub fn parse_fasta<R: io::Read>(input: R) -> io::Result<Vec<FastaRecord>> {
    fasta::Reader::new(input)
        .records()
        .map(|record| record.map(|r| FastaRecord::from(&r)))
        .collect()
}

pub fn read_fasta<P: AsRef<Path> + fmt::Debug>(path: P) -> anyhow::Result<Vec<FastaRecord>> {
    let records: Vec<FastaRecord> = fasta::Reader::from_file(&path)?
        .records()
        .map(|record| record.map(|r| FastaRecord::from(&r)))
        .collect::<io::Result<_>>()
        .with_context(|| format!("Failed to parse FASTA {:?}", path))?;
    info!("{:?}: {} sequences", path, records.len());
    Ok(records)
}

/// Index records by id. On duplicate ids the last record wins.
pub fn sequence_store(records: Vec<FastaRecord>) -> SequenceStore {
    let mut store = SequenceStore::default();
    for record in records {
        if store.insert(record.id.clone(), record.seq).is_some() {
            warn!("Duplicate sequence id `{}`, keeping the last", record.id);
        }
    }
    store
}

/// Cut each contig into a left and a right end of `cut` bases, named
/// `LFT_<id>` and `RGT_<id>`. Contigs shorter than two ends, and all
/// contigs when `cut` is 0, are kept whole as `ALL_<id>`.
pub fn extract_contig_ends(records: &[FastaRecord], cut: usize) -> Vec<FastaRecord> {
    let mut ends = Vec::with_capacity(records.len() * 2);

    for record in records {
        let len = record.seq.len();
        if cut == 0 || len < 2 * cut {
            ends.push(tagged(EndTag::Whole, record, &record.seq));
        } else {
            ends.push(tagged(EndTag::Left, record, &record.seq[..cut]));
            ends.push(tagged(EndTag::Right, record, &record.seq[len - cut..]));
        }
    }

    info!(
        "Extracted {} contig ends from {} contigs",
        ends.len(),
        records.len()
    );
    ends
}

fn tagged(end: EndTag, record: &FastaRecord, seq: &[u8]) -> FastaRecord {
    let mut id = BString::from(end.prefix());
    id.extend_from_slice(&record.id);
    FastaRecord::new(&id, seq)
}

/// `(length, id)` for each record, in input order
pub fn sequence_lengths(records: &[FastaRecord]) -> Vec<(usize, BString)> {
    records
        .iter()
        .map(|r| (r.seq.len(), r.id.clone()))
        .collect()
}
