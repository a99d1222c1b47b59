pub mod bits;
pub use bits::reader::{mask, read_element_id, read_vint, Vint};

pub mod config;
pub use config::ParserOptions;

pub mod ebml;
pub use ebml::{EbmlDecoder, Element, ElementEvent, ElementId, ElementReader, BUFFERED_IDS};

pub mod streams;
pub use streams::{find_cluster_boundary, Resynchronizer, SubtitleParser, SubtitleStream};

pub mod subtitles;
pub use subtitles::{
    extract_local_subtitles, Attachment, Chapter, Extraction, ParserEvent, ParserHandoff,
    SubtitleCue, Track,
};

pub mod errors;
pub use errors::{EbmlError, MatroskaError, MatroskaResult, SubtitleError};
