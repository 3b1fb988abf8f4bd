use std::io::{self, Write};

use crate::scaffold::Scaffold;

/// Sequence line width of written FASTA
pub const FASTA_WIDTH: usize = 80;

// Write one contig-link cluster
pub fn write_scaffold<T: Write>(scaffold: &Scaffold, stream: &mut T) -> io::Result<()> {
    writeln!(stream, ">{}", scaffold.name)?;
    for line in scaffold.lines.iter() {
        writeln!(stream, "{}", line)?;
    }
    Ok(())
}

/// Write a contig-link file; the file ends with a blank line.
pub fn write_contig_links<T: Write>(scaffolds: &[Scaffold], stream: &mut T) -> io::Result<()> {
    for scaffold in scaffolds {
        write_scaffold(scaffold, stream)?;
    }
    writeln!(stream)
}

// Write one FASTA record
pub fn write_fasta_record<T: Write>(id: &[u8], seq: &[u8], stream: &mut T) -> io::Result<()> {
    stream.write_all(b">")?;
    stream.write_all(id)?;
    stream.write_all(b"\n")?;
    for chunk in seq.chunks(FASTA_WIDTH) {
        stream.write_all(chunk)?;
        stream.write_all(b"\n")?;
    }
    Ok(())
}

pub fn write_fasta<'a, T, I, S>(records: I, stream: &mut T) -> io::Result<()>
where
    T: Write,
    I: IntoIterator<Item = (&'a S, &'a S)>,
    S: AsRef<[u8]> + ?Sized + 'a,
{
    for (id, seq) in records {
        write_fasta_record(id.as_ref(), seq.as_ref(), stream)?;
    }
    Ok(())
}

// Write `length<TAB>id` lines
pub fn write_lengths<'a, T, I, S>(lengths: I, stream: &mut T) -> io::Result<()>
where
    T: Write,
    I: IntoIterator<Item = &'a (usize, S)>,
    S: AsRef<[u8]> + 'a,
{
    for (len, id) in lengths {
        write!(stream, "{}\t", len)?;
        stream.write_all(id.as_ref())?;
        stream.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig::Orientation;
    use crate::scaffold::ScaffoldLine;
    use bstr::BString;

    fn written<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn print_contig_links() {
        let scaffolds = vec![
            Scaffold::new(
                b"Scaffold1",
                vec![
                    ScaffoldLine::new(50, Orientation::Forward, b"c1"),
                    ScaffoldLine::new(0, Orientation::Backward, b"c2"),
                ],
            ),
            Scaffold::new(
                b"Scaffold2",
                vec![
                    ScaffoldLine::new(-9, Orientation::Forward, b"c3"),
                    ScaffoldLine::new(0, Orientation::Forward, b"c4"),
                ],
            ),
        ];
        let string = written(|out| write_contig_links(&scaffolds, out));
        assert_eq!(
            string,
            ">Scaffold1\n50\t+\tc1\n0\t-\tc2\n>Scaffold2\n-9\t+\tc3\n0\t+\tc4\n\n"
        );
    }

    #[test]
    fn print_wrapped_fasta() {
        let seq = vec![b'A'; FASTA_WIDTH * 2 + 3];
        let string = written(|out| write_fasta_record(b"s1", &seq, out));
        let lines: Vec<&str> = string.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ">s1");
        assert_eq!(lines[1].len(), FASTA_WIDTH);
        assert_eq!(lines[3], "AAA");
    }

    #[test]
    fn print_fasta_and_lengths() {
        let a = (BString::from("a"), BString::from("AC"));
        let b = (BString::from("b"), BString::from("G"));
        let string = written(|out| write_fasta(vec![(&a.0, &a.1), (&b.0, &b.1)], out));
        assert_eq!(string, ">a\nAC\n>b\nG\n");

        let lengths = vec![(2, BString::from("a")), (1, BString::from("b"))];
        let string = written(|out| write_lengths(&lengths, out));
        assert_eq!(string, "2\ta\n1\tb\n");
    }
}
