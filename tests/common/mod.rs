//! Tiny EBML writer for building Matroska fixtures.
#![allow(dead_code)]

pub const EBML: u32 = 0x1A45DFA3;
pub const DOC_TYPE: u32 = 0x4282;
pub const SEGMENT: u32 = 0x18538067;
pub const SEEK_HEAD: u32 = 0x114D9B74;
pub const SEEK: u32 = 0x4DBB;
pub const SEEK_ID: u32 = 0x53AB;
pub const SEEK_POSITION: u32 = 0x53AC;
pub const INFO: u32 = 0x1549A966;
pub const TIMECODE_SCALE: u32 = 0x2AD7B1;
pub const DURATION: u32 = 0x4489;
pub const TRACKS: u32 = 0x1654AE6B;
pub const TRACK_ENTRY: u32 = 0xAE;
pub const TRACK_NUMBER: u32 = 0xD7;
pub const TRACK_TYPE: u32 = 0x83;
pub const CODEC_ID: u32 = 0x86;
pub const CODEC_PRIVATE: u32 = 0x63A2;
pub const LANGUAGE: u32 = 0x22B59C;
pub const NAME: u32 = 0x536E;
pub const CONTENT_ENCODINGS: u32 = 0x6D80;
pub const CONTENT_ENCODING: u32 = 0x6240;
pub const CONTENT_COMPRESSION: u32 = 0x5034;
pub const CONTENT_COMP_ALGO: u32 = 0x4254;
pub const CLUSTER: u32 = 0x1F43B675;
pub const TIMECODE: u32 = 0xE7;
pub const BLOCK_GROUP: u32 = 0xA0;
pub const BLOCK: u32 = 0xA1;
pub const BLOCK_DURATION: u32 = 0x9B;
pub const SIMPLE_BLOCK: u32 = 0xA3;
pub const ATTACHMENTS: u32 = 0x1941A469;
pub const ATTACHED_FILE: u32 = 0x61A7;
pub const FILE_NAME: u32 = 0x466E;
pub const FILE_MIME_TYPE: u32 = 0x4660;
pub const FILE_DATA: u32 = 0x465C;
pub const CHAPTERS: u32 = 0x1043A770;
pub const EDITION_ENTRY: u32 = 0x45B9;
pub const EDITION_FLAG_DEFAULT: u32 = 0x45DB;
pub const CHAPTER_ATOM: u32 = 0xB6;
pub const CHAPTER_TIME_START: u32 = 0x91;
pub const CHAPTER_DISPLAY: u32 = 0x80;
pub const CHAP_STRING: u32 = 0x85;
pub const CHAP_LANGUAGE: u32 = 0x437C;

pub fn id_bytes(id: u32) -> Vec<u8> {
    let length = 4 - (id.leading_zeros() / 8) as usize;
    id.to_be_bytes()[4 - length..].to_vec()
}

pub fn size_bytes(size: usize) -> Vec<u8> {
    let size = size as u64;
    let mut length = 1;
    while size >= (1u64 << (7 * length)) - 1 {
        length += 1;
    }
    let mut bytes = size.to_be_bytes()[8 - length..].to_vec();
    bytes[0] |= 0x80 >> (length - 1);
    bytes
}

pub fn element(id: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(size_bytes(payload.len()));
    out.extend_from_slice(payload);
    out
}

pub fn master(id: u32, children: &[Vec<u8>]) -> Vec<u8> {
    element(id, &children.concat())
}

pub fn uint(id: u32, value: u64) -> Vec<u8> {
    let skip = (value.leading_zeros() / 8).min(7) as usize;
    element(id, &value.to_be_bytes()[skip..])
}

pub fn float(id: u32, value: f64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

pub fn string(id: u32, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

pub fn block(id: u32, track: u8, timecode: i16, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0x80 | track];
    body.extend(timecode.to_be_bytes());
    body.push(0x00);
    body.extend_from_slice(payload);
    element(id, &body)
}

pub fn ebml_header() -> Vec<u8> {
    master(EBML, &[string(DOC_TYPE, "matroska")])
}

pub fn track_entry(number: u64, track_type: u64, codec: &str, extra: &[Vec<u8>]) -> Vec<u8> {
    let mut children = vec![
        uint(TRACK_NUMBER, number),
        uint(TRACK_TYPE, track_type),
        string(CODEC_ID, codec),
    ];
    children.extend_from_slice(extra);
    master(TRACK_ENTRY, &children)
}

pub fn zlib_encoding() -> Vec<u8> {
    master(
        CONTENT_ENCODINGS,
        &[master(
            CONTENT_ENCODING,
            &[master(CONTENT_COMPRESSION, &[uint(CONTENT_COMP_ALGO, 0)])],
        )],
    )
}

pub fn block_group(track: u8, timecode: i16, payload: &[u8], duration: Option<u64>) -> Vec<u8> {
    let mut children = vec![block(BLOCK, track, timecode, payload)];
    if let Some(duration) = duration {
        children.push(uint(BLOCK_DURATION, duration));
    }
    master(BLOCK_GROUP, &children)
}

pub fn chapter_atom(start_ms: u64, title: &str) -> Vec<u8> {
    master(
        CHAPTER_ATOM,
        &[
            uint(CHAPTER_TIME_START, start_ms * 1_000_000),
            master(
                CHAPTER_DISPLAY,
                &[string(CHAP_STRING, title), string(CHAP_LANGUAGE, "eng")],
            ),
        ],
    )
}

/// EBML header followed by a Segment holding `children`.
pub fn matroska_file(children: &[Vec<u8>]) -> Vec<u8> {
    [ebml_header(), master(SEGMENT, children)].concat()
}
