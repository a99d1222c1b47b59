//! Minimal EBML writer used to build fixtures in unit tests.

use super::ids::ElementId;

pub(crate) fn id_bytes(id: ElementId) -> Vec<u8> {
    let raw = id.as_u32();
    let length = 4 - (raw.leading_zeros() / 8) as usize;
    raw.to_be_bytes()[4 - length..].to_vec()
}

pub(crate) fn size_bytes(size: usize) -> Vec<u8> {
    let size = size as u64;
    let mut length = 1;
    while size >= (1u64 << (7 * length)) - 1 {
        length += 1;
    }
    let mut bytes = size.to_be_bytes()[8 - length..].to_vec();
    bytes[0] |= 0x80 >> (length - 1);
    bytes
}

pub(crate) fn element(id: ElementId, payload: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(size_bytes(payload.len()));
    out.extend_from_slice(payload);
    out
}

pub(crate) fn master(id: ElementId, children: &[Vec<u8>]) -> Vec<u8> {
    element(id, &children.concat())
}

pub(crate) fn uint(id: ElementId, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8).min(7) as usize;
    element(id, &bytes[skip..])
}

pub(crate) fn float(id: ElementId, value: f64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

pub(crate) fn string(id: ElementId, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

pub(crate) fn block(id: ElementId, track: u8, timecode: i16, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0x80 | track];
    body.extend(timecode.to_be_bytes());
    body.push(0x00);
    body.extend_from_slice(payload);
    element(id, &body)
}

pub(crate) fn unknown_size_header(id: ElementId) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend([0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    out
}
