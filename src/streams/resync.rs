//! Cluster boundary detection for streams joined at an arbitrary byte offset.

use crate::bits::reader::{read_element_id, vint_length, MAX_VINT_LENGTH};
use crate::ebml::ElementId;
use log::debug;

/// Element id of a Cluster as it appears on the wire.
pub const CLUSTER_SIGNATURE: [u8; 4] = [0x1F, 0x43, 0xB6, 0x75];

// id + longest size field
const BOUNDARY_WINDOW: usize = CLUSTER_SIGNATURE.len() + MAX_VINT_LENGTH;

/// Offset of the first verifiable Cluster header in `chunk`.
///
/// A candidate needs a valid size field and a known element id right after it.
/// Candidates that start in the last 12 bytes are not considered.
pub fn find_cluster_boundary(chunk: &[u8]) -> Option<usize> {
    let limit = chunk.len().saturating_sub(BOUNDARY_WINDOW);
    (0..limit).find(|&i| is_cluster_boundary(chunk, i))
}

fn is_cluster_boundary(chunk: &[u8], i: usize) -> bool {
    if chunk[i..i + CLUSTER_SIGNATURE.len()] != CLUSTER_SIGNATURE {
        return false;
    }

    let Some(size_length) = vint_length(chunk[i + CLUSTER_SIGNATURE.len()]) else {
        return false;
    };

    let mut pos = i + CLUSTER_SIGNATURE.len() + size_length;
    match read_element_id(chunk, &mut pos) {
        Some((raw, _)) => ElementId::from_u32(raw).is_known(),
        None => false,
    }
}

/// Gate that drops bytes until a cluster boundary has been found.
#[derive(Debug, Clone, Default)]
pub struct Resynchronizer {
    unstable: bool,
}

impl Resynchronizer {
    /// A gate that forwards everything.
    pub fn stable() -> Self {
        Self { unstable: false }
    }

    /// A gate that waits for the next cluster boundary.
    pub fn unstable() -> Self {
        Self { unstable: true }
    }

    pub fn is_unstable(&self) -> bool {
        self.unstable
    }

    /// Go back to scanning, e.g. after the reader rejected the data.
    pub fn invalidate(&mut self) {
        self.unstable = true;
    }

    /// The part of `chunk` that may be handed to the element reader.
    pub fn accept<'a>(&mut self, chunk: &'a [u8]) -> Option<&'a [u8]> {
        if !self.unstable {
            return Some(chunk);
        }
        let start = find_cluster_boundary(chunk)?;
        debug!("Resynchronized on a cluster at chunk offset {}", start);
        self.unstable = false;
        Some(&chunk[start..])
    }
}
