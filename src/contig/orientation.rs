#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::parser::ParseFieldError;

/// Represents the strand a contig is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum Orientation {
    Forward,
    Backward,
}

impl Orientation {
    /// Parse an orientation from a single-element, where + is
    /// Forward, - is Backward
    #[inline]
    pub fn from_bytes_plus_minus<T: AsRef<[u8]>>(bs: T) -> Option<Self> {
        match bs.as_ref() {
            b"+" => Some(Orientation::Forward),
            b"-" => Some(Orientation::Backward),
            _ => None,
        }
    }

    #[inline]
    pub fn parse_error(opt: Option<Self>) -> Result<Self, ParseFieldError> {
        opt.ok_or(ParseFieldError::OrientationError)
    }

    #[inline]
    pub fn plus_minus_as_byte(&self) -> u8 {
        match self {
            Self::Forward => b'+',
            Self::Backward => b'-',
        }
    }

    /// The orientation on the other strand
    #[inline]
    pub fn flip(&self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        !bool::from(*self)
    }
}

/// Default orientation is forward
impl Default for Orientation {
    #[inline]
    fn default() -> Orientation {
        Orientation::Forward
    }
}

/// Forward is true, backward is false
impl From<Orientation> for bool {
    #[inline]
    fn from(o: Orientation) -> bool {
        match o {
            Orientation::Forward => true,
            Orientation::Backward => false,
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = &'static str;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Orientation::from_bytes_plus_minus(s.as_bytes())
            .ok_or("Could not parse orientation (was not + or -)")
    }
}

/// Display maps `Forward` to "+" and `Backward` to "-", the notation
/// used by both tiling and contig-link files.
///
/// # Examples
///
/// ```
/// use scaffolder::contig::Orientation as O;
///
/// assert_eq!(&format!("{}", O::Forward), "+");
/// assert_eq!(&format!("{}", O::Backward), "-");
/// assert_eq!(O::Backward.flip(), O::Forward);
/// ```
impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.plus_minus_as_byte() as char)
    }
}
