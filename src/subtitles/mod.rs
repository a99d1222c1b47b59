mod attachments;
mod block;
mod chapters;
mod extractor;
mod parser;
mod tracks;
mod types;
mod utils;

pub use attachments::{read_attachments, SeekTable};
pub use block::{decode_block_group, split_script_fields};
pub use chapters::{resolve_chapters, ChapterResolver};
pub use extractor::{
    collect_subtitles, extract_local_subtitles, extract_local_subtitles_with, extract_subtitles,
    Extraction,
};
pub use parser::{ParserHandoff, ParserState, DEFAULT_TIMECODE_SCALE};
pub use tracks::TrackRegistry;
pub use types::{
    Attachment, Chapter, ParserEvent, ScriptFields, SubtitleCue, Track, SCRIPT_TYPES,
};
pub use utils::{cue_end, format_timestamp, to_srt};

#[cfg(test)]
pub mod unit_test;
