use super::attachments::{read_attachments, SeekTable};
use super::block::decode_block_group;
use super::chapters::ChapterResolver;
use super::tracks::TrackRegistry;
use super::types::ParserEvent;
use crate::ebml::{Element, ElementEvent, ElementId};
use crate::errors::MatroskaResult;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::mem;

/// Default TimecodeScale (1 ms per tick) expressed in milliseconds.
pub const DEFAULT_TIMECODE_SCALE: f64 = 1.0;

/// State moved from a retired parser into the one that replaces it.
#[derive(Debug, Clone)]
pub struct ParserHandoff {
    pub tracks: TrackRegistry,
    pub timecode_scale: f64,
    pub seek_table: SeekTable,
    /// Absolute byte offsets where decoding can restart.
    pub seek_positions: BTreeSet<u64>,
    /// Absolute offset of the first byte of the segment payload.
    pub segment_start: Option<u64>,
    /// Absolute offset of the first byte the retired reader had not consumed,
    /// `None` when it had stopped decoding.
    pub position: Option<u64>,
}

/// Interpretation state of one parse: routes element events to the handlers
/// and collects the resulting `ParserEvent`s.
#[derive(Debug)]
pub struct ParserState {
    tracks: TrackRegistry,
    timecode_scale: f64,
    cluster_timecode: u64,
    /// Raw Duration value, in timecode ticks.
    duration: Option<f64>,
    chapters: ChapterResolver,
    seek_table: SeekTable,
    seek_positions: BTreeSet<u64>,
    segment_start: Option<u64>,
    events: Vec<ParserEvent>,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            tracks: TrackRegistry::new(),
            timecode_scale: DEFAULT_TIMECODE_SCALE,
            cluster_timecode: 0,
            duration: None,
            chapters: ChapterResolver::new(),
            seek_table: SeekTable::default(),
            seek_positions: BTreeSet::new(),
            segment_start: None,
            events: Vec::new(),
        }
    }
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue with the metadata of a retired parser.
    pub fn from_handoff(handoff: ParserHandoff) -> Self {
        Self {
            tracks: handoff.tracks,
            timecode_scale: handoff.timecode_scale,
            seek_table: handoff.seek_table,
            seek_positions: handoff.seek_positions,
            segment_start: handoff.segment_start,
            ..Self::default()
        }
    }

    pub fn into_handoff(self, position: Option<u64>) -> ParserHandoff {
        ParserHandoff {
            tracks: self.tracks,
            timecode_scale: self.timecode_scale,
            seek_table: self.seek_table,
            seek_positions: self.seek_positions,
            segment_start: self.segment_start,
            position,
        }
    }

    pub fn tracks(&self) -> &TrackRegistry {
        &self.tracks
    }

    /// Milliseconds per timecode tick.
    pub fn timecode_scale(&self) -> f64 {
        self.timecode_scale
    }

    /// Segment duration in milliseconds, once the Info element has provided it.
    pub fn duration(&self) -> Option<f64> {
        self.duration.map(|ticks| ticks * self.timecode_scale)
    }

    pub fn seek_table(&self) -> &SeekTable {
        &self.seek_table
    }

    pub fn seek_positions(&self) -> &BTreeSet<u64> {
        &self.seek_positions
    }

    pub fn segment_start(&self) -> Option<u64> {
        self.segment_start
    }

    /// Drain the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<ParserEvent> {
        mem::take(&mut self.events)
    }

    /// Dispatch one structural event.
    pub fn route(&mut self, event: ElementEvent) -> MatroskaResult<()> {
        match event {
            ElementEvent::Start {
                id: ElementId::Segment,
                data_offset,
                ..
            } => self.start_segment(data_offset),
            ElementEvent::End {
                id: ElementId::Cues,
            } => {
                debug!("Cues complete, {} seek positions known", self.seek_positions.len());
                self.events.push(ParserEvent::Cues);
            }
            ElementEvent::Start { .. } | ElementEvent::End { .. } => {}
            ElementEvent::Tag(element) => self.route_tag(&element)?,
        }
        Ok(())
    }

    fn route_tag(&mut self, element: &Element) -> MatroskaResult<()> {
        match element.id {
            ElementId::SeekHead => self.handle_seek_head(element),
            ElementId::TimecodeScale => match element.as_unsigned() {
                Some(0) | None => warn!("Ignoring invalid TimecodeScale {:?}", element.value),
                Some(scale) => self.timecode_scale = scale as f64 / 1_000_000.0,
            },
            ElementId::Timecode => {
                if let Some(timecode) = element.as_unsigned() {
                    self.cluster_timecode = timecode;
                }
            }
            ElementId::Duration => {
                if let Some(ticks) = element.as_float() {
                    self.handle_duration(ticks);
                }
            }
            ElementId::Tracks => {
                let tracks = self.tracks.handle_tracks(element);
                self.events.push(ParserEvent::Tracks(tracks));
            }
            ElementId::BlockGroup => {
                let decoded = decode_block_group(
                    element,
                    &self.tracks,
                    self.cluster_timecode,
                    self.timecode_scale,
                )?;
                if let Some((track, cue)) = decoded {
                    self.events.push(ParserEvent::Subtitle { track, cue });
                }
            }
            ElementId::Attachments => {
                self.events
                    .push(ParserEvent::Attachments(read_attachments(element)));
            }
            ElementId::Chapters => {
                let resolved =
                    self.chapters
                        .handle_chapters(element, self.timecode_scale, self.duration);
                if let Some(chapters) = resolved {
                    self.events.push(ParserEvent::Chapters(chapters));
                }
            }
            ElementId::CueClusterPosition => {
                if let Some(position) = element.as_unsigned() {
                    self.add_seek_position(position);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn start_segment(&mut self, data_offset: u64) {
        if let Some(previous) = self.segment_start {
            if previous != data_offset {
                warn!(
                    "New segment at byte {} replaces the one at {}, dropping {} seek positions",
                    data_offset,
                    previous,
                    self.seek_positions.len()
                );
                self.seek_positions.clear();
                self.chapters.reset();
                self.duration = None;
            }
        }
        self.segment_start = Some(data_offset);
    }

    fn handle_seek_head(&mut self, element: &Element) {
        let table = SeekTable::from_element(element);
        if !table.contains(ElementId::Attachments) {
            debug!("SeekHead lists no Attachments");
            self.events.push(ParserEvent::Attachments(Vec::new()));
        }
        for position in table.positions() {
            self.add_seek_position(position);
        }
        self.seek_table = table;
    }

    // Chapter times are in ticks as well, so the raw value closes the list.
    fn handle_duration(&mut self, ticks: f64) {
        debug!("Segment duration: {:.3}ms", ticks * self.timecode_scale);
        self.duration = Some(ticks);
        if let Some(chapters) = self.chapters.on_duration(ticks) {
            self.events.push(ParserEvent::Chapters(chapters));
        }
    }

    // Positions are stored absolute; relative ones need the segment start first.
    fn add_seek_position(&mut self, relative: u64) {
        match self.segment_start {
            Some(start) => {
                self.seek_positions.insert(start + relative);
            }
            None => debug!("Dropping seek position {} read before the segment start", relative),
        }
    }
}
