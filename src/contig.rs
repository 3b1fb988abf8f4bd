//! Contig ends, the nodes of the scaffolding graph, and the naming
//! convention that ties them to the contig ids found in tiling files.

pub mod orientation;

pub use self::orientation::*;

use bstr::{BStr, BString, ByteSlice};
use lazy_static::lazy_static;
use nom::{branch::alt, bytes::complete::tag, combinator::map, IResult};
use regex::bytes::Regex;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Which terminus of a contig a name refers to. Contigs that were
/// split into two ends carry `LFT_`/`RGT_` prefixes, contigs that
/// were too short to split carry `ALL_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum EndTag {
    Left,
    Right,
    Whole,
}

impl EndTag {
    #[inline]
    pub fn prefix(&self) -> &'static str {
        match self {
            EndTag::Left => "LFT_",
            EndTag::Right => "RGT_",
            EndTag::Whole => "ALL_",
        }
    }

    /// The other end of the same contig. A whole contig has only one.
    #[inline]
    pub fn opposite(&self) -> Option<Self> {
        match self {
            EndTag::Left => Some(EndTag::Right),
            EndTag::Right => Some(EndTag::Left),
            EndTag::Whole => None,
        }
    }

    fn parse_prefix(input: &[u8]) -> IResult<&[u8], EndTag> {
        let left = map(tag("LFT_"), |_| EndTag::Left);
        let right = map(tag("RGT_"), |_| EndTag::Right);
        let whole = map(tag("ALL_"), |_| EndTag::Whole);
        alt((left, right, whole))(input)
    }
}

/// Split a (possibly end-tagged) contig id into its end tag and the
/// bare contig id. Ids without a recognised prefix are whole contigs.
///
/// # Examples
///
/// ```
/// use scaffolder::contig::{split_end_tag, EndTag};
///
/// assert_eq!(split_end_tag(b"LFT_ctg12"), (EndTag::Left, &b"ctg12"[..]));
/// assert_eq!(split_end_tag(b"ctg12"), (EndTag::Whole, &b"ctg12"[..]));
/// ```
pub fn split_end_tag(id: &[u8]) -> (EndTag, &[u8]) {
    match EndTag::parse_prefix(id) {
        Ok((bare, end)) if !bare.is_empty() => (end, bare),
        _ => (EndTag::Whole, id),
    }
}

/// Checks that a field is usable as a contig id: non-empty and free
/// of whitespace. Any other byte, `*` and `=` included, is allowed.
pub fn parse_contig_name(input: &[u8]) -> Option<BString> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"(?-u)^[^\s]+$").unwrap();
    }
    RE.find(input).map(|s| BString::from(s.as_bytes()))
}

/// A node in the scaffolding graph: one end of one contig, placed on
/// one strand. Equality, ordering and hashing are structural; the
/// ordering (bare id, then end, then orientation) is the order in
/// which paths are seeded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ContigEnd {
    pub contig: BString,
    pub end: EndTag,
    pub orient: Orientation,
}

impl ContigEnd {
    pub fn new(contig: &[u8], end: EndTag, orient: Orientation) -> Self {
        ContigEnd {
            contig: BString::from(contig),
            end,
            orient,
        }
    }

    /// Build a contig end from an id as it appears in a tiling file,
    /// e.g. `RGT_ctg3`.
    pub fn from_tagged(id: &[u8], orient: Orientation) -> Self {
        let (end, bare) = split_end_tag(id);
        ContigEnd::new(bare, end, orient)
    }

    pub fn contig(&self) -> &BStr {
        self.contig.as_bstr()
    }

    /// The opposite end of the same contig, on the same strand
    pub fn opposite_end(&self) -> Option<Self> {
        let end = self.end.opposite()?;
        Some(ContigEnd {
            contig: self.contig.clone(),
            end,
            orient: self.orient,
        })
    }

    /// The same end seen from the other strand
    pub fn flip_orientation(&self) -> Self {
        ContigEnd {
            contig: self.contig.clone(),
            end: self.end,
            orient: self.orient.flip(),
        }
    }

    #[inline]
    pub fn same_contig(&self, other: &ContigEnd) -> bool {
        self.contig == other.contig
    }
}

impl std::fmt::Display for ContigEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.end.prefix(), self.contig, self.orient)
    }
}
