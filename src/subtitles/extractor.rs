use super::types::{Attachment, Chapter, ParserEvent, SubtitleCue, Track};
use crate::config::ParserOptions;
use crate::errors::MatroskaResult;
use crate::streams::SubtitleParser;
use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Everything the parser reported for one file
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub tracks: Vec<Track>,
    /// Cues per track number, tracks in announcement order
    pub subtitles: IndexMap<u64, Vec<SubtitleCue>>,
    pub chapters: Vec<Chapter>,
    pub attachments: Vec<Attachment>,
}

impl Extraction {
    fn apply(&mut self, event: ParserEvent) {
        match event {
            ParserEvent::Tracks(tracks) => {
                for track in &tracks {
                    self.subtitles.entry(track.number).or_default();
                }
                self.tracks = tracks;
            }
            ParserEvent::Subtitle { track, cue } => {
                self.subtitles.entry(track).or_default().push(cue);
            }
            ParserEvent::Chapters(chapters) => self.chapters = chapters,
            ParserEvent::Attachments(attachments) => self.attachments = attachments,
            ParserEvent::Cues => {}
        }
    }

    pub fn cue_count(&self) -> usize {
        self.subtitles.values().map(Vec::len).sum()
    }
}

/// Extract subtitles, chapters and attachments from a local Matroska file
pub fn extract_local_subtitles<P: AsRef<Path>>(path: P) -> MatroskaResult<Extraction> {
    extract_local_subtitles_with(path, ParserOptions::default())
}

pub fn extract_local_subtitles_with<P: AsRef<Path>>(
    path: P,
    options: ParserOptions,
) -> MatroskaResult<Extraction> {
    info!("Subtitle Extraction: {}", path.as_ref().display());
    let file = File::open(path)?;
    extract_subtitles(file, options)
}

/// Feed a reader through the strict parser, `options.chunk_size` bytes at a time
pub fn extract_subtitles<R: Read>(source: R, options: ParserOptions) -> MatroskaResult<Extraction> {
    let mut extraction = Extraction::default();
    collect_subtitles(source, options, &mut extraction)?;
    Ok(extraction)
}

/// Like [`extract_subtitles`], collecting into `extraction` so that whatever
/// was decoded before a failure stays available to the caller.
///
/// Returns the number of bytes read.
pub fn collect_subtitles<R: Read>(
    mut source: R,
    options: ParserOptions,
    extraction: &mut Extraction,
) -> MatroskaResult<u64> {
    let mut buffer = vec![0u8; options.chunk_size.max(1)];
    let mut parser = SubtitleParser::with_options(options);
    let mut total = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        total += read as u64;

        let events = match parser.write(&buffer[..read]) {
            Ok(events) => events,
            Err(err) => {
                for event in parser.take_events() {
                    extraction.apply(event);
                }
                warn!("Extraction stopped after {} bytes: {}", total, err);
                return Err(err);
            }
        };
        for event in events {
            extraction.apply(event);
        }
        if parser.is_finished() {
            info!("Parser finished early after {} bytes", total);
            break;
        }
    }

    info!(
        "Extracted {} cues from {} tracks ({} bytes read)",
        extraction.cue_count(),
        extraction.tracks.len(),
        total
    );
    Ok(total)
}
