use std::{error, fmt};

use bstr::ByteSlice;

pub type FieldResult<T> = Result<T, ParseFieldError>;
pub type ParseResult<T> = Result<T, ParseError>;

/// How the parsers treat lines they can't make sense of. With
/// `IgnoreAll` malformed lines are skipped and counted, with
/// `Pedantic` the first one aborts parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserTolerance {
    IgnoreAll,
    Pedantic,
}

impl Default for ParserTolerance {
    fn default() -> Self {
        Self::IgnoreAll
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseFieldError {
    /// A field that should be text isn't valid UTF-8.
    Utf8Error,
    /// Attempted to parse an orientation that wasn't + or -.
    OrientationError,
    /// A required field was incorrectly formatted. Includes the field
    /// name.
    InvalidField(&'static str),
    MissingFields,
    /// The line has more fields than the record type allows.
    ExtraFields,
}

impl From<bstr::Utf8Error> for ParseFieldError {
    fn from(_: bstr::Utf8Error) -> Self {
        ParseFieldError::Utf8Error
    }
}

impl fmt::Display for ParseFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseFieldError as PFE;
        match self {
            PFE::Utf8Error => {
                write!(f, "Failed to parse a bytestring as a UTF-8 string")
            }
            PFE::OrientationError => {
                write!(f, "Failed to parse an orientation character")
            }
            PFE::InvalidField(field) => {
                write!(f, "Failed to parse field `{}`", field)
            }
            PFE::MissingFields => write!(f, "Line is missing required fields"),
            PFE::ExtraFields => write!(f, "Line has too many fields"),
        }
    }
}

impl error::Error for ParseFieldError {}

/// Type encapsulating the errors of the tiling and contig-link
/// parsers. Reading the input is left to the caller, so the only
/// failure is a line that doesn't parse.
#[derive(Debug)]
pub enum ParseError {
    /// A line couldn't be parsed. Includes the line number, the
    /// problem line and a variant describing the error.
    InvalidLine(ParseFieldError, usize, String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidLine(field_err, line_no, line) => write!(
                f,
                "Failed to parse line {} `{}`, error: {}",
                line_no, line, field_err
            ),
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ParseError::InvalidLine(err, _, _) => Some(err),
        }
    }
}

impl ParseError {
    #[inline]
    pub(crate) fn invalid_line(
        error: ParseFieldError,
        line_no: usize,
        line: &[u8],
    ) -> Self {
        let mut dest = String::new();
        line.to_str_lossy_into(&mut dest);
        Self::InvalidLine(error, line_no, dest)
    }

    #[inline]
    pub fn can_safely_continue(&self, tol: &ParserTolerance) -> bool {
        matches!(tol, ParserTolerance::IgnoreAll)
    }
}
