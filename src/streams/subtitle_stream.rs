use super::resync::Resynchronizer;
use crate::config::ParserOptions;
use crate::ebml::{EbmlDecoder, ElementReader};
use crate::subtitles::{ParserEvent, ParserHandoff, ParserState, TrackRegistry};
use log::{debug, info, warn};

/// Tolerant subtitle parser for streams that may be joined mid-file.
///
/// Failures never reach the caller; they are logged and the stream waits for
/// the next cluster boundary. A stream without a reader passes everything
/// through without decoding.
#[derive(Debug)]
pub struct SubtitleStream<R: ElementReader = EbmlDecoder> {
    reader: Option<R>,
    state: ParserState,
    gate: Resynchronizer,
    /// Absolute offset of the next byte written.
    offset: u64,
    skip: u64,
    stall_reported: bool,
    options: ParserOptions,
}

impl SubtitleStream<EbmlDecoder> {
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self::with_reader(EbmlDecoder::default(), options)
    }
}

impl Default for SubtitleStream<EbmlDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ElementReader> SubtitleStream<R> {
    /// Parse from the first byte of the file.
    pub fn with_reader(reader: R, options: ParserOptions) -> Self {
        Self {
            offset: reader.position(),
            reader: Some(reader),
            state: ParserState::new(),
            gate: Resynchronizer::stable(),
            skip: 0,
            stall_reported: false,
            options,
        }
    }

    /// Continue after a retired parser. Input is dropped until a cluster
    /// boundary is found; `reader` must be positioned at the next byte written.
    pub fn resume(reader: R, handoff: ParserHandoff, options: ParserOptions) -> Self {
        Self {
            offset: reader.position(),
            reader: Some(reader),
            state: ParserState::from_handoff(handoff),
            gate: Resynchronizer::unstable(),
            skip: 0,
            stall_reported: false,
            options,
        }
    }

    fn disabled(handoff: ParserHandoff, options: ParserOptions) -> Self {
        Self {
            reader: None,
            state: ParserState::from_handoff(handoff),
            gate: Resynchronizer::stable(),
            offset: 0,
            skip: 0,
            stall_reported: false,
            options,
        }
    }

    /// Whether chunks are still decoded.
    pub fn is_enabled(&self) -> bool {
        self.reader.is_some()
    }

    /// Bytes still to be dropped before decoding resumes.
    pub fn pending_skip(&self) -> u64 {
        self.skip
    }

    pub fn tracks(&self) -> &TrackRegistry {
        self.state.tracks()
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Feed the next chunk of the stream and collect the events it completed.
    pub fn write(&mut self, chunk: &[u8]) -> Vec<ParserEvent> {
        let chunk_offset = self.offset;
        self.offset += chunk.len() as u64;

        let Some(reader) = self.reader.as_mut() else {
            return Vec::new();
        };

        let mut data = chunk;
        let mut data_offset = chunk_offset;
        if self.skip > 0 {
            if self.skip > self.options.skip_stall_warning && !self.stall_reported {
                warn!("Subtitle parsing stalled, {} bytes left to skip", self.skip);
                self.stall_reported = true;
            }
            if self.skip >= chunk.len() as u64 {
                self.skip -= chunk.len() as u64;
                return Vec::new();
            }
            // skip < chunk.len() here
            data = &chunk[self.skip as usize..];
            data_offset += self.skip;
            self.skip = 0;
        }

        let resyncing = self.gate.is_unstable();
        let Some(accepted) = self.gate.accept(data) else {
            return Vec::new();
        };
        if resyncing {
            let boundary = data_offset + (data.len() - accepted.len()) as u64;
            debug!("Resuming decoding at byte {}", boundary);
            reader.set_position(boundary);
        }

        let mut decoded = Vec::new();
        if let Err(err) = reader.write(accepted, &mut decoded) {
            warn!("Subtitle stream error, waiting for the next cluster: {}", err);
            self.gate.invalidate();
        }
        for event in decoded {
            if let Err(err) = self.state.route(event) {
                warn!("Skipping undecodable element: {}", err);
            }
        }

        self.state.take_events()
    }

    /// Retire this stream, keeping what it learned about the file.
    pub fn into_handoff(self) -> ParserHandoff {
        let position = self.reader.as_ref().map(R::position);
        self.state.into_handoff(position)
    }
}

impl<R: ElementReader + Default> SubtitleStream<R> {
    /// Continue parsing at `offset` of the same file with a fresh reader.
    ///
    /// Offset 0 restarts from the beginning. Any other offset is rounded up to
    /// the closest known cluster or seek position; the bytes in between are
    /// skipped. Without such a position the returned stream only passes data
    /// through.
    pub fn seek_to(self, offset: u64) -> Self {
        let options = self.options.clone();
        let mut handoff = self.into_handoff();

        if offset == 0 {
            info!("Seeking to the start of the file");
            let mut stream = Self::with_reader(R::default(), options);
            stream.state = ParserState::from_handoff(handoff);
            return stream;
        }

        // the retired reader's position is a valid restart point too
        if let Some(position) = handoff.position {
            handoff.seek_positions.insert(position);
        }

        let Some(target) = handoff.seek_positions.range(offset..).next().copied() else {
            if handoff.seek_positions.is_empty() {
                warn!("No cues were parsed, subtitle parsing disabled");
            } else {
                warn!("No cues for offset {}, subtitle parsing disabled", offset);
            }
            return Self::disabled(handoff, options);
        };

        debug!("Seek to {} resumes at {}", offset, target);
        let mut reader = R::default();
        reader.set_position(target);
        let mut stream = Self::resume(reader, handoff, options);
        stream.offset = offset;
        stream.skip = target - offset;
        stream
    }
}
