pub mod error;

pub use self::error::*;

use std::path::Path;

use bstr::{BString, ByteSlice};
use log::{debug, info, warn};

use crate::contig::{parse_contig_name, ContigEnd, Orientation};
use crate::mmap::MappedFile;
use crate::scaffold::{Scaffold, ScaffoldLine};

/// One placement of a contig (or contig end) on a reference, as
/// reported by `show-tiling`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub start: i64,
    pub end: i64,
    pub gap: i64,
    pub length: i64,
    pub coverage: f64,
    pub identity: f64,
    pub orient: Orientation,
    pub contig: BString,
}

impl PlacementRecord {
    /// The graph node this placement stands for
    pub fn contig_end(&self) -> ContigEnd {
        ContigEnd::from_tagged(&self.contig, self.orient)
    }
}

/// The placements on one reference sequence, in reference order
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TilingCluster {
    pub name: BString,
    pub records: Vec<PlacementRecord>,
}

impl TilingCluster {
    pub fn new(name: &[u8]) -> Self {
        TilingCluster {
            name: BString::from(name),
            records: Vec::new(),
        }
    }
}

/// A parsed tiling file. `skipped` counts the malformed record lines
/// that were ignored.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Tiling {
    pub clusters: Vec<TilingCluster>,
    pub skipped: usize,
}

impl Tiling {
    pub fn record_count(&self) -> usize {
        self.clusters.iter().map(|c| c.records.len()).sum()
    }

    fn push_cluster(&mut self, cluster: TilingCluster) {
        if cluster.records.is_empty() {
            debug!("Dropping empty cluster `{}`", cluster.name);
        } else {
            self.clusters.push(cluster);
        }
    }
}

/// A parsed contig-link file
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ContigLinks {
    pub scaffolds: Vec<Scaffold>,
    pub skipped: usize,
}

impl ContigLinks {
    fn push_scaffold(&mut self, scaffold: Scaffold) {
        if scaffold.is_empty() {
            debug!("Dropping empty cluster `{}`", scaffold.name);
        } else {
            self.scaffolds.push(scaffold);
        }
    }
}

fn next_field<'a, I>(input: &mut I) -> FieldResult<&'a [u8]>
where
    I: Iterator<Item = &'a [u8]>,
{
    input.next().ok_or(ParseFieldError::MissingFields)
}

fn parse_next<'a, I, T>(input: &mut I, field: &'static str) -> FieldResult<T>
where
    I: Iterator<Item = &'a [u8]>,
    T: std::str::FromStr,
{
    let bytes = next_field(input)?;
    let s = bytes.to_str()?;
    s.parse().map_err(|_| ParseFieldError::InvalidField(field))
}

fn parse_orient<'a, I>(input: &mut I) -> FieldResult<Orientation>
where
    I: Iterator<Item = &'a [u8]>,
{
    let field = next_field(input)?;
    Orientation::parse_error(Orientation::from_bytes_plus_minus(field))
}

fn parse_contig<'a, I>(input: &mut I) -> FieldResult<BString>
where
    I: Iterator<Item = &'a [u8]>,
{
    let field = next_field(input)?;
    parse_contig_name(field).ok_or(ParseFieldError::InvalidField("contig"))
}

fn ensure_exhausted<'a, I>(input: &mut I) -> FieldResult<()>
where
    I: Iterator<Item = &'a [u8]>,
{
    match input.next() {
        Some(_) => Err(ParseFieldError::ExtraFields),
        None => Ok(()),
    }
}

/// Record types that are parsed from the fields of one line
trait ParseRecord: Sized {
    fn parse_fields<'a, I>(input: I) -> FieldResult<Self>
    where
        I: Iterator<Item = &'a [u8]>;
}

impl ParseRecord for PlacementRecord {
    fn parse_fields<'a, I>(mut input: I) -> FieldResult<Self>
    where
        I: Iterator<Item = &'a [u8]>,
    {
        let start = parse_next(&mut input, "start")?;
        let end = parse_next(&mut input, "end")?;
        let gap = parse_next(&mut input, "gap")?;
        let length = parse_next(&mut input, "length")?;
        let coverage = parse_next(&mut input, "coverage")?;
        let identity = parse_next(&mut input, "identity")?;
        let orient = parse_orient(&mut input)?;
        let contig = parse_contig(&mut input)?;
        ensure_exhausted(&mut input)?;

        Ok(PlacementRecord {
            start,
            end,
            gap,
            length,
            coverage,
            identity,
            orient,
            contig,
        })
    }
}

impl ParseRecord for ScaffoldLine {
    fn parse_fields<'a, I>(mut input: I) -> FieldResult<Self>
    where
        I: Iterator<Item = &'a [u8]>,
    {
        let gap = parse_next(&mut input, "gap")?;
        let orient = parse_orient(&mut input)?;
        let contig = parse_contig(&mut input)?;
        ensure_exhausted(&mut input)?;

        Ok(ScaffoldLine {
            gap,
            orient,
            contig,
        })
    }
}

fn cluster_header(line: &[u8]) -> Option<&[u8]> {
    if line.first() == Some(&b'>') {
        Some(line[1..].trim())
    } else {
        None
    }
}

/// Skip a malformed line or turn it into an error, depending on the
/// tolerance.
fn handle_invalid(
    tolerance: &ParserTolerance,
    err: ParseFieldError,
    line_no: usize,
    line: &[u8],
    skipped: &mut usize,
) -> ParseResult<()> {
    let err = ParseError::invalid_line(err, line_no, line);
    if err.can_safely_continue(tolerance) {
        debug!("{}", err);
        *skipped += 1;
        Ok(())
    } else {
        Err(err)
    }
}

/// Parser for alignment tilings: a header line, then `>`-headed
/// clusters of whitespace-separated placement records, until the
/// first blank line.
#[derive(Default, Debug, Clone)]
pub struct TilingParser {
    tolerance: ParserTolerance,
}

impl TilingParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_tolerance(tolerance: ParserTolerance) -> Self {
        TilingParser { tolerance }
    }

    pub fn parse_lines<'a, I>(&self, input: I) -> ParseResult<Tiling>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut tiling = Tiling::default();
        // records before the first header end up in an unnamed cluster
        let mut cluster = TilingCluster::default();

        for (ix, line) in input.into_iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                break;
            }
            if let Some(name) = cluster_header(line) {
                let done = std::mem::replace(&mut cluster, TilingCluster::new(name));
                tiling.push_cluster(done);
                continue;
            }
            match PlacementRecord::parse_fields(line.fields()) {
                Ok(record) => cluster.records.push(record),
                Err(err) => {
                    handle_invalid(&self.tolerance, err, ix + 1, line, &mut tiling.skipped)?
                }
            }
        }
        tiling.push_cluster(cluster);

        Ok(tiling)
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Tiling> {
        let mapped = MappedFile::open(path)?;
        let tiling = self.parse_lines(mapped.lines())?;
        info!(
            "{}: {} clusters, {} records",
            mapped.path().display(),
            tiling.clusters.len(),
            tiling.record_count()
        );
        if tiling.skipped > 0 {
            warn!(
                "{}: skipped {} malformed records",
                mapped.path().display(),
                tiling.skipped
            );
        }
        Ok(tiling)
    }
}

/// Parser for contig-link files: `>`-headed clusters of
/// `gap<TAB>orientation<TAB>contig` lines. Blank lines are ignored,
/// lines with another number of fields are malformed.
#[derive(Default, Debug, Clone)]
pub struct LinkParser {
    tolerance: ParserTolerance,
}

impl LinkParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_tolerance(tolerance: ParserTolerance) -> Self {
        LinkParser { tolerance }
    }

    pub fn parse_lines<'a, I>(&self, input: I) -> ParseResult<ContigLinks>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut links = ContigLinks::default();
        let mut current: Option<Scaffold> = None;

        for (ix, line) in input.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(name) = cluster_header(line) {
                if let Some(done) = current.replace(Scaffold::new(name, Vec::new())) {
                    links.push_scaffold(done);
                }
                continue;
            }

            let parsed = match current.as_mut() {
                Some(scaffold) => ScaffoldLine::parse_fields(line.split_str("\t"))
                    .map(|entry| scaffold.lines.push(entry)),
                None => Err(ParseFieldError::InvalidField("cluster header")),
            };
            if let Err(err) = parsed {
                handle_invalid(&self.tolerance, err, ix + 1, line, &mut links.skipped)?;
            }
        }
        if let Some(done) = current {
            links.push_scaffold(done);
        }

        Ok(links)
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<ContigLinks> {
        let mapped = MappedFile::open(path)?;
        let links = self.parse_lines(mapped.lines())?;
        info!(
            "{}: {} scaffolds",
            mapped.path().display(),
            links.scaffolds.len()
        );
        if links.skipped > 0 {
            warn!(
                "{}: skipped {} malformed contig-link lines",
                mapped.path().display(),
                links.skipped
            );
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lines(text: &str) -> bstr::Lines<'_> {
        text.as_bytes().lines()
    }

    const TILING: &str = "/data/ref.fa /data/ends.fa NUCMER
>chr1 230218 bases
1\t2000\t102\t2000\t100.00\t99.95\t+\tLFT_ctg1
2103\t4102\t-15\t2000\t100.00\t99.90\t-\tRGT_ctg1
>chr2 813184 bases
88\t901\t0\t814\t100.00\t100.00\t+\tctg9

this line is after the end
";

    #[test]
    fn can_parse_placement_record() {
        let line = "2103   4102  -15  2000  100.00  99.90  -  RGT_ctg1";
        let record = PlacementRecord::parse_fields(line.as_bytes().fields()).unwrap();
        assert_eq!(
            record,
            PlacementRecord {
                start: 2103,
                end: 4102,
                gap: -15,
                length: 2000,
                coverage: 100.0,
                identity: 99.9,
                orient: Orientation::Backward,
                contig: BString::from("RGT_ctg1"),
            }
        );
        assert_eq!(record.contig_end().contig, BString::from("ctg1"));
    }

    #[test]
    fn malformed_records_are_rejected() {
        let parse = |s: &str| PlacementRecord::parse_fields(s.as_bytes().fields());
        assert_eq!(
            parse("1 2 3 4 5.0 6.0 +"),
            Err(ParseFieldError::MissingFields)
        );
        assert_eq!(
            parse("1 2 3 4 5.0 6.0 * ctg"),
            Err(ParseFieldError::OrientationError)
        );
        assert_eq!(
            parse("a 2 3 4 5.0 6.0 + ctg"),
            Err(ParseFieldError::InvalidField("start"))
        );
        assert_eq!(
            parse("1 2 3 4 5.0 6.0 + ctg extra"),
            Err(ParseFieldError::ExtraFields)
        );
        assert_eq!(
            PlacementRecord::parse_fields(b"\xff 2 3 4 5.0 6.0 + ctg".fields()),
            Err(ParseFieldError::Utf8Error)
        );
    }

    #[test]
    fn contig_ids_may_start_with_any_symbol() {
        let record = PlacementRecord::parse_fields(b"1 2 3 4 5.0 6.0 + *ctg=2".fields()).unwrap();
        assert_eq!(record.contig, BString::from("*ctg=2"));

        let text = ">S1\n0\t+\t=ctg\n";
        let links = LinkParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(links.skipped, 0);
        assert_eq!(links.scaffolds[0].lines[0].contig, BString::from("=ctg"));
    }

    #[test]
    fn can_parse_tiling() {
        let tiling = TilingParser::new().parse_lines(lines(TILING)).unwrap();
        assert_eq!(tiling.clusters.len(), 2);
        assert_eq!(tiling.clusters[0].name, BString::from("chr1 230218 bases"));
        assert_eq!(tiling.clusters[0].records.len(), 2);
        assert_eq!(tiling.clusters[1].records[0].contig, BString::from("ctg9"));
        assert_eq!(tiling.record_count(), 3);
        assert_eq!(tiling.skipped, 0);
    }

    #[test]
    fn tolerance_controls_malformed_records() {
        let text = "header\n>chr1\n0\t10\t0\t11\t100\t100\t+\tc1\nnot a record\n";

        let tiling = TilingParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(tiling.record_count(), 1);
        assert_eq!(tiling.skipped, 1);

        let pedantic = TilingParser::with_tolerance(ParserTolerance::Pedantic);
        match pedantic.parse_lines(lines(text)) {
            Err(ParseError::InvalidLine(_, line_no, _)) => assert_eq!(line_no, 4),
            other => panic!("Expected an invalid line, got {:?}", other),
        }
    }

    #[test]
    fn records_before_the_first_header() {
        let text = "header\n0\t10\t0\t11\t100\t100\t+\tc1\n>chr1\n";
        let tiling = TilingParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(tiling.clusters.len(), 1);
        assert_eq!(tiling.clusters[0].name, BString::from(""));
    }

    const LINKS: &str = ">Scaffold1
50\t+\tctg1
-12\t-\tctg7
0\t+\tctg3
>Scaffold2
7\t+\tctg2\tjunk
0\t-\tctg4

";

    #[test]
    fn can_parse_contig_links() {
        let links = LinkParser::new().parse_lines(lines(LINKS)).unwrap();
        assert_eq!(links.scaffolds.len(), 2);
        assert_eq!(links.skipped, 1);
        assert_eq!(
            links.scaffolds[0].lines,
            vec![
                ScaffoldLine::new(50, Orientation::Forward, b"ctg1"),
                ScaffoldLine::new(-12, Orientation::Backward, b"ctg7"),
                ScaffoldLine::new(0, Orientation::Forward, b"ctg3"),
            ]
        );
        assert_eq!(links.scaffolds[1].name, BString::from("Scaffold2"));
        assert_eq!(links.scaffolds[1].lines.len(), 1);
    }

    #[test]
    fn link_lines_need_a_header() {
        let text = "5\t+\tc1\n>S1\n0\t+\tc2\n>S2\n";
        let links = LinkParser::new().parse_lines(lines(text)).unwrap();
        assert_eq!(links.skipped, 1);
        // the empty S2 is dropped
        assert_eq!(links.scaffolds.len(), 1);

        let pedantic = LinkParser::with_tolerance(ParserTolerance::Pedantic);
        assert!(pedantic.parse_lines(lines(text)).is_err());
    }

    #[test]
    fn can_parse_files() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{}", TILING).unwrap();
        let tiling = TilingParser::new().parse_file(tmp.path()).unwrap();
        assert_eq!(tiling.record_count(), 3);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{}", LINKS).unwrap();
        let links = LinkParser::new().parse_file(tmp.path()).unwrap();
        assert_eq!(links.scaffolds.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        assert!(TilingParser::new()
            .parse_file(dir.path().join("missing.tiling"))
            .is_err());
    }
}
