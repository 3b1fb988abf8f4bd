use anyhow::{Context, Result};

use memmap::Mmap;

use std::fs::File;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;

/// A read-only, memory-mapped input file. Empty files are not
/// mapped, since a zero-length mapping is an error on most platforms.
pub struct MappedFile {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let len = file.metadata()?.len();

        let mmap = if len == 0 {
            None
        } else {
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("Failed to map {}", path.display()))?;
            Some(mmap)
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => mmap.as_ref(),
            None => &[],
        }
    }

    /// Lines without their terminators, `\r\n` included
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.as_bytes().lines()
    }
}
