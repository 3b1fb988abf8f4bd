//! Turning contig-link scaffolds into sequences, using the contigs'
//! own sequences and joining neighbours that overlap.

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::{error, fmt};

use bstr::{BStr, BString, ByteSlice};
use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, info};

use crate::contig::Orientation;
use crate::scaffold::Scaffold;

/// Contig sequences by contig id
pub type SequenceStore = FnvHashMap<BString, BString>;

/// Largest gap that is filled with `N`s
pub const MAX_GAP: usize = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A contig-link line names a contig without a sequence
    UnknownContig(BString),
    /// A sequence holds a symbol without a complement
    InvalidSymbol(u8),
    /// A gap larger than `MAX_GAP`, with the contig it follows
    GapTooLarge(i64, BString),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::UnknownContig(name) => {
                write!(f, "No sequence for contig `{}`", name)
            }
            MergeError::InvalidSymbol(sym) => write!(
                f,
                "Can't complement symbol `{}`",
                std::ascii::escape_default(*sym)
            ),
            MergeError::GapTooLarge(gap, contig) => write!(
                f,
                "Gap of {} after contig `{}` exceeds {}",
                gap, contig, MAX_GAP
            ),
        }
    }
}

impl error::Error for MergeError {}

/// The complement of a nucleotide or IUPAC ambiguity code, keeping
/// its case
pub fn complement(sym: u8) -> Result<u8, MergeError> {
    let comp = match sym.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'M' => b'K',
        b'K' => b'M',
        b'R' => b'Y',
        b'Y' => b'R',
        b'V' => b'B',
        b'B' => b'V',
        b'H' => b'D',
        b'D' => b'H',
        s @ b'W' | s @ b'S' | s @ b'X' | s @ b'N' => s,
        _ => return Err(MergeError::InvalidSymbol(sym)),
    };
    if sym.is_ascii_lowercase() {
        Ok(comp.to_ascii_lowercase())
    } else {
        Ok(comp)
    }
}

/// # Examples
///
/// ```
/// use scaffolder::merge::reverse_complement;
///
/// assert_eq!(reverse_complement(b"AACG").unwrap(), "CGTT");
/// assert_eq!(reverse_complement(b"acgN").unwrap(), "Ncgt");
/// ```
pub fn reverse_complement(seq: &[u8]) -> Result<BString, MergeError> {
    let rc = seq
        .iter()
        .rev()
        .map(|&s| complement(s))
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(BString::from(rc))
}

/// Length of the longest suffix of `a` that is also a prefix of `b`,
/// 0 if there is none.
pub fn suffix_prefix_overlap(a: &[u8], b: &[u8]) -> usize {
    let max = a.len().min(b.len());
    (1..=max)
        .rev()
        .find(|&o| a[a.len() - o..] == b[..o])
        .unwrap_or(0)
}

fn oriented_sequence(
    store: &SequenceStore,
    contig: &BStr,
    orient: Orientation,
) -> Result<BString, MergeError> {
    let seq = store
        .get(contig)
        .ok_or_else(|| MergeError::UnknownContig(BString::from(contig.to_vec())))?;
    if orient.is_reverse() {
        reverse_complement(seq)
    } else {
        Ok(seq.clone())
    }
}

/// Build the sequence of one scaffold. Non-negative gaps become runs
/// of `N`. A negative gap joins the two contigs on their longest
/// suffix-prefix overlap; without one they are simply concatenated.
pub fn merge_scaffold(
    scaffold: &Scaffold,
    store: &SequenceStore,
) -> Result<BString, MergeError> {
    let lines = &scaffold.lines;
    let mut merged: Vec<u8> = Vec::new();
    let mut ix = 0;

    while ix < lines.len() {
        let line = &lines[ix];
        let seq1 = oriented_sequence(store, line.contig.as_bstr(), line.orient)?;

        if line.gap >= 0 {
            let gap = usize::try_from(line.gap)
                .ok()
                .filter(|&gap| gap <= MAX_GAP)
                .ok_or_else(|| MergeError::GapTooLarge(line.gap, line.contig.clone()))?;
            merged.extend_from_slice(&seq1);
            merged.resize(merged.len() + gap, b'N');
            ix += 1;
            continue;
        }

        match lines.get(ix + 1) {
            Some(next) => {
                let seq2 = oriented_sequence(store, next.contig.as_bstr(), next.orient)?;
                let overlap = suffix_prefix_overlap(&seq1, &seq2);
                merged.extend_from_slice(&seq1);
                if overlap > 0 {
                    merged.extend_from_slice(&seq2[overlap..]);
                    ix += 2;
                } else {
                    debug!(
                        "{}: no overlap between {} and {} for gap {}",
                        scaffold.name, line.contig, next.contig, line.gap
                    );
                    ix += 1;
                }
            }
            None => {
                merged.extend_from_slice(&seq1);
                ix += 1;
            }
        }
    }

    Ok(BString::from(merged))
}

/// Merge every scaffold, and pass through the contigs no scaffold
/// uses. The result is ordered by name.
pub fn merge_scaffolds(
    scaffolds: &[Scaffold],
    store: &SequenceStore,
) -> Result<BTreeMap<BString, BString>, MergeError> {
    let mut result = BTreeMap::new();
    let mut used: FnvHashSet<&BStr> = FnvHashSet::default();

    for scaffold in scaffolds {
        let seq = merge_scaffold(scaffold, store)?;
        used.extend(scaffold.contigs());
        result.insert(scaffold.name.clone(), seq);
    }

    let mut unused = 0;
    for (name, seq) in store.iter() {
        if !used.contains(name.as_bstr()) {
            result.insert(name.clone(), seq.clone());
            unused += 1;
        }
    }

    info!(
        "Merged {} scaffolds, {} contigs left unscaffolded",
        scaffolds.len(),
        unused
    );
    Ok(result)
}
