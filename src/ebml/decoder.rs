use super::element::{Block, Element, ElementEvent, ElementValue};
use super::ids::{ElementId, ElementKind, BUFFERED_IDS};
use crate::bits::reader::{
    read_element_id, read_float, read_i16, read_signed, read_unsigned, read_vint, vint_length,
    MAX_ID_LENGTH,
};
use crate::errors::{EbmlError, MatroskaResult};
use log::debug;

/// Deepest nesting accepted inside a buffered subtree.
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Largest single element the decoder will wait for before giving up on the stream.
pub const MAX_ELEMENT_SIZE: u64 = 256 * 1024 * 1024;

/// Source of structural events for the parser.
///
/// Implementations turn raw bytes into `ElementEvent`s. Events decoded before a
/// failure are pushed to `events` even when `write` returns an error.
#[cfg_attr(test, mockall::automock)]
pub trait ElementReader {
    /// Feed the next chunk of the stream.
    fn write(&mut self, chunk: &[u8], events: &mut Vec<ElementEvent>) -> MatroskaResult<()>;

    /// Absolute offset of the first byte not yet consumed.
    fn position(&self) -> u64;

    /// Rebase the absolute offset of the next byte written. Pending bytes are dropped.
    fn set_position(&mut self, position: u64);
}

#[derive(Debug, Clone, Copy)]
struct OpenElement {
    id: ElementId,
    /// Absolute end offset, `None` for unknown-sized (live) elements.
    end: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    id: ElementId,
    size: Option<u64>,
    length: usize,
}

/// Incremental EBML decoder.
///
/// Masters outside the buffered set are reported as `Start`/`End` pairs and
/// their children streamed as they arrive. Buffered ids, and every leaf, are
/// held back until their last byte has been written and then emitted as a
/// single `Tag`.
#[derive(Debug)]
pub struct EbmlDecoder {
    buffered: Vec<ElementId>,
    buffer: Vec<u8>,
    position: u64,
    open: Vec<OpenElement>,
}

impl Default for EbmlDecoder {
    fn default() -> Self {
        Self::new(&BUFFERED_IDS)
    }
}

impl EbmlDecoder {
    pub fn new(buffered: &[ElementId]) -> Self {
        Self {
            buffered: buffered.to_vec(),
            buffer: Vec::new(),
            position: 0,
            open: Vec::new(),
        }
    }

    /// Bytes written but not decoded yet.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Current nesting depth of streamed (non-buffered) masters.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn is_buffered(&self, id: ElementId) -> bool {
        self.buffered.contains(&id)
    }

    fn close_finished(&mut self, at: u64, events: &mut Vec<ElementEvent>) {
        while let Some(top) = self.open.last() {
            match top.end {
                Some(end) if end <= at => {
                    events.push(ElementEvent::End { id: top.id });
                    self.open.pop();
                }
                _ => break,
            }
        }
    }

    // A top-level element can only start once the unknown-sized sibling before it is over.
    fn close_unknown_sized(&mut self, next: ElementId, events: &mut Vec<ElementEvent>) {
        if !next.is_top_level() {
            return;
        }
        while let Some(top) = self.open.last() {
            if top.end.is_some() || top.id == ElementId::Segment {
                break;
            }
            events.push(ElementEvent::End { id: top.id });
            self.open.pop();
        }
    }

    fn read_next(
        &mut self,
        cursor: usize,
        events: &mut Vec<ElementEvent>,
    ) -> MatroskaResult<Option<usize>> {
        let offset = self.position + cursor as u64;
        let data = &self.buffer[cursor..];
        let Some(header) = read_header(data, offset)? else {
            return Ok(None);
        };
        let id = header.id;

        if id.kind() == ElementKind::Master && !self.is_buffered(id) {
            let data_offset = offset + header.length as u64;
            self.close_unknown_sized(id, events);
            events.push(ElementEvent::Start {
                id,
                offset,
                data_offset,
            });
            self.open.push(OpenElement {
                id,
                end: header.size.map(|size| data_offset + size),
            });
            return Ok(Some(header.length));
        }

        let size = header
            .size
            .ok_or_else(|| EbmlError::at(offset, format!("{} has an unknown size", id)))?;
        if size > MAX_ELEMENT_SIZE {
            return Err(EbmlError::at(offset, format!("{} is too large: {} bytes", id, size)).into());
        }
        let total = header.length + size as usize;
        if data.len() < total {
            return Ok(None);
        }

        let element = parse_element(
            id,
            &data[header.length..total],
            offset + header.length as u64,
            0,
        )?;
        self.close_unknown_sized(id, events);
        events.push(ElementEvent::Tag(element));
        Ok(Some(total))
    }

    fn discard(&mut self) {
        self.position += self.buffer.len() as u64;
        self.buffer.clear();
        self.open.clear();
    }
}

impl ElementReader for EbmlDecoder {
    fn write(&mut self, chunk: &[u8], events: &mut Vec<ElementEvent>) -> MatroskaResult<()> {
        self.buffer.extend_from_slice(chunk);

        let mut cursor = 0usize;
        loop {
            self.close_finished(self.position + cursor as u64, events);
            match self.read_next(cursor, events) {
                Ok(Some(consumed)) => cursor += consumed,
                Ok(None) => break,
                Err(err) => {
                    // the rest of the buffer cannot be trusted
                    self.discard();
                    return Err(err);
                }
            }
        }

        self.buffer.drain(..cursor);
        self.position += cursor as u64;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn set_position(&mut self, position: u64) {
        self.buffer.clear();
        self.open.clear();
        self.position = position;
    }
}

/// Read an element header, `Ok(None)` when more bytes are needed.
fn read_header(data: &[u8], offset: u64) -> MatroskaResult<Option<Header>> {
    let Some(&first) = data.first() else {
        return Ok(None);
    };
    match vint_length(first) {
        Some(length) if length <= MAX_ID_LENGTH => {}
        _ => {
            return Err(EbmlError::at(offset, format!("invalid element id byte 0x{:02X}", first)).into())
        }
    }

    let mut pos = 0;
    let Some((raw_id, _)) = read_element_id(data, &mut pos) else {
        return Ok(None);
    };
    let Some(&size_first) = data.get(pos) else {
        return Ok(None);
    };
    if vint_length(size_first).is_none() {
        return Err(EbmlError::at(offset, "invalid element size VINT").into());
    }
    let Some(size) = read_vint(data, &mut pos) else {
        return Ok(None);
    };

    Ok(Some(Header {
        id: ElementId::from_u32(raw_id),
        size: size.value,
        length: pos,
    }))
}

/// Decode a complete element body according to its schema type.
fn parse_element(id: ElementId, body: &[u8], offset: u64, depth: usize) -> MatroskaResult<Element> {
    let invalid = |what: &str| EbmlError::at(offset, format!("invalid {} payload in {}", what, id));

    let value = match id.kind() {
        ElementKind::Master => ElementValue::Master(parse_children(id, body, offset, depth)?),
        ElementKind::Unsigned => {
            ElementValue::Unsigned(read_unsigned(body).ok_or_else(|| invalid("unsigned"))?)
        }
        ElementKind::Signed => {
            ElementValue::Signed(read_signed(body).ok_or_else(|| invalid("signed"))?)
        }
        ElementKind::Date => ElementValue::Date(read_signed(body).ok_or_else(|| invalid("date"))?),
        ElementKind::Float => ElementValue::Float(read_float(body).ok_or_else(|| invalid("float"))?),
        ElementKind::String | ElementKind::Utf8 => ElementValue::String(decode_string(body)),
        ElementKind::Binary => ElementValue::Binary(body.to_vec()),
        ElementKind::Block => ElementValue::Block(parse_block(body, offset)?),
    };

    Ok(Element::new(id, value))
}

fn parse_children(
    parent: ElementId,
    body: &[u8],
    offset: u64,
    depth: usize,
) -> MatroskaResult<Vec<Element>> {
    if depth >= MAX_RECURSION_DEPTH {
        return Err(EbmlError::at(offset, format!("{} is nested too deeply", parent)).into());
    }

    let mut children = Vec::new();
    let mut pos = 0usize;
    while pos < body.len() {
        let child_offset = offset + pos as u64;
        let header = read_header(&body[pos..], child_offset)?.ok_or_else(|| {
            EbmlError::at(child_offset, format!("truncated child header in {}", parent))
        })?;
        let size = header.size.ok_or_else(|| {
            EbmlError::at(
                child_offset,
                format!("{} has an unknown size inside {}", header.id, parent),
            )
        })?;

        let start = pos + header.length;
        let end = usize::try_from(size)
            .ok()
            .and_then(|size| start.checked_add(size))
            .filter(|end| *end <= body.len())
            .ok_or_else(|| {
                EbmlError::at(
                    child_offset,
                    format!("{} overruns its parent {}", header.id, parent),
                )
            })?;

        children.push(parse_element(
            header.id,
            &body[start..end],
            child_offset + header.length as u64,
            depth + 1,
        )?);
        pos = end;
    }

    Ok(children)
}

// Strings are NUL padded on disk.
fn decode_string(body: &[u8]) -> String {
    let end = body.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

fn parse_block(body: &[u8], offset: u64) -> MatroskaResult<Block> {
    let mut pos = 0;
    let track = read_vint(body, &mut pos)
        .and_then(|vint| vint.value)
        .ok_or_else(|| EbmlError::at(offset, "invalid block track number"))?;
    let timecode =
        read_i16(body, &mut pos).ok_or_else(|| EbmlError::at(offset, "truncated block timecode"))?;
    let flags = *body
        .get(pos)
        .ok_or_else(|| EbmlError::at(offset, "truncated block flags"))?;
    pos += 1;

    if flags & 0x06 != 0 {
        debug!("Laced block on track {}, keeping raw frame data", track);
    }

    Ok(Block {
        track,
        timecode,
        flags,
        payload: body[pos..].to_vec(),
    })
}
