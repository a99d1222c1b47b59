use super::types::Attachment;
use crate::bits::reader::read_unsigned;
use crate::ebml::{Element, ElementId};
use indexmap::IndexMap;
use log::{debug, info};

/// Map every AttachedFile of a closed Attachments element.
pub fn read_attachments(attachments: &Element) -> Vec<Attachment> {
    let files: Vec<Attachment> = attachments
        .children_with(ElementId::AttachedFile)
        .map(|file| Attachment {
            filename: file.child_string(ElementId::FileName),
            mimetype: file.child_string(ElementId::FileMimeType),
            data: file
                .child_binary(ElementId::FileData)
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        })
        .collect();

    info!("Found {} attachments", files.len());
    files
}

/// Top-level element offsets announced by the SeekHead.
///
/// Offsets are relative to the first byte of the segment payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeekTable {
    entries: IndexMap<ElementId, u64>,
}

impl SeekTable {
    pub fn from_element(seek_head: &Element) -> Self {
        let mut entries = IndexMap::new();
        // CRC-32 and Void children are not Seek entries
        for seek in seek_head.children_with(ElementId::Seek) {
            let id = seek
                .child_binary(ElementId::SeekId)
                .and_then(read_unsigned)
                .and_then(|raw| u32::try_from(raw).ok())
                .map(ElementId::from_u32);
            match (id, seek.child_unsigned(ElementId::SeekPosition)) {
                (Some(id), Some(position)) => {
                    debug!("  Seek entry {} at {}", id, position);
                    entries.insert(id, position);
                }
                _ => debug!("  Skipping incomplete Seek entry"),
            }
        }
        Self { entries }
    }

    pub fn get(&self, id: ElementId) -> Option<u64> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in SeekHead order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, u64)> + '_ {
        self.entries.iter().map(|(id, position)| (*id, *position))
    }

    /// Announced offsets, relative to the segment payload.
    pub fn positions(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.values().copied()
    }
}
