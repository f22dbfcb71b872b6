//! Bounded read of a script's leading bytes.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

/// Leading bytes of a script, at most the reader's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    bytes: Vec<u8>,
}

impl RawHeader {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Read up to `capacity` bytes from the start of `path`.
///
/// Short files yield a short header; that is not an error.
pub fn read_header(path: &Path, capacity: usize) -> io::Result<RawHeader> {
    let file = File::open(path)?;
    let mut bytes = Vec::with_capacity(capacity);
    file.take(capacity as u64).read_to_end(&mut bytes)?;
    debug!(path = %path.display(), len = bytes.len(), "read script header");
    Ok(RawHeader { bytes })
}
