use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::graph::{ConsensusConfig, Statistic};
use crate::parser::ParserTolerance;

/// Settings for turning guide tilings into contig links
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    /// Number of consecutive placements that are paired up, the
    /// placement itself included
    pub window_size: usize,
    /// Minimum number of observations an edge needs
    pub threshold: usize,
    pub statistic: Statistic,
    /// Use at most this many guide files, `None` for all of them
    pub max_guides: Option<usize>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            window_size: 2,
            threshold: 1,
            statistic: Statistic::Median,
            max_guides: None,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            bail!(
                "Window size must be at least 2, got {}",
                self.window_size
            );
        }
        Ok(())
    }

    pub fn consensus(&self) -> ConsensusConfig {
        ConsensusConfig {
            threshold: self.threshold,
            statistic: self.statistic,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct ParsingConfig {
    pub tolerance: ParserTolerance,
}

impl ParsingConfig {
    pub fn pedantic() -> Self {
        ParsingConfig {
            tolerance: ParserTolerance::Pedantic,
        }
    }
}

/// Sort the guide files by path and keep the first `max`
pub fn select_guides(guides: &[PathBuf], max: Option<usize>) -> Vec<PathBuf> {
    let mut sorted = guides.to_vec();
    sorted.sort();
    if let Some(max) = max {
        sorted.truncate(max);
    }
    sorted
}
