use crate::config::ParserOptions;
use crate::ebml::{EbmlDecoder, ElementEvent, ElementId, ElementReader};
use crate::errors::{MatroskaError, MatroskaResult};
use crate::subtitles::{ParserEvent, ParserHandoff, ParserState, TrackRegistry};
use log::info;

/// Strict, push-driven subtitle parser.
///
/// Every chunk is handed to the element reader and reader or payload failures
/// are returned to the caller. The caller keeps ownership of its bytes.
#[derive(Debug)]
pub struct SubtitleParser<R: ElementReader = EbmlDecoder> {
    reader: R,
    state: ParserState,
    options: ParserOptions,
    finished: bool,
}

impl SubtitleParser<EbmlDecoder> {
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self::with_reader(EbmlDecoder::default(), options)
    }
}

impl Default for SubtitleParser<EbmlDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ElementReader> SubtitleParser<R> {
    pub fn with_reader(reader: R, options: ParserOptions) -> Self {
        Self {
            reader,
            state: ParserState::new(),
            options,
            finished: false,
        }
    }

    /// Feed the next chunk and collect the events it completed.
    ///
    /// Every decoded element is routed even when one of them fails. The first
    /// failure is returned, and the events decoded alongside it can then be
    /// drained with [`SubtitleParser::take_events`].
    pub fn write(&mut self, chunk: &[u8]) -> MatroskaResult<Vec<ParserEvent>> {
        if self.finished {
            return Ok(Vec::new());
        }

        let mut decoded = Vec::new();
        let mut failure: Option<MatroskaError> = self.reader.write(chunk, &mut decoded).err();

        for event in decoded {
            let closes_tracks = matches!(&event, ElementEvent::Tag(element) if element.id == ElementId::Tracks);
            if let Err(err) = self.state.route(event) {
                failure.get_or_insert(err);
            }
            if closes_tracks && self.should_stop() {
                info!("No subtitle tracks found, stopping");
                self.finished = true;
                break;
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(self.state.take_events()),
        }
    }

    /// Drain events that were decoded but not yet returned, e.g. after
    /// [`SubtitleParser::write`] failed.
    pub fn take_events(&mut self) -> Vec<ParserEvent> {
        self.state.take_events()
    }

    fn should_stop(&self) -> bool {
        self.options.stop_without_subtitle_tracks && self.state.tracks().is_empty()
    }

    /// Decoding stopped because the file has no subtitle tracks.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tracks(&self) -> &TrackRegistry {
        self.state.tracks()
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Absolute offset of the next byte the reader expects.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Retire this parser, keeping what it learned about the file.
    pub fn into_handoff(self) -> ParserHandoff {
        let position = (!self.finished).then(|| self.reader.position());
        self.state.into_handoff(position)
    }
}
