use super::types::Chapter;
use crate::ebml::{Element, ElementId};
use log::{debug, info};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Turns the Chapters tree into a flat timeline and holds it back until the
/// segment duration is known.
#[derive(Debug, Clone, Default)]
pub struct ChapterResolver {
    pending: Option<Vec<Chapter>>,
    emitted: bool,
}

impl ChapterResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chapters resolved but still waiting for the segment duration.
    pub fn pending(&self) -> Option<&[Chapter]> {
        self.pending.as_deref()
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted
    }

    /// Forget everything, used when a new segment starts.
    pub fn reset(&mut self) {
        self.pending = None;
        self.emitted = false;
    }

    /// Resolve a closed Chapters element.
    ///
    /// Returns the list to emit when `duration` (timecode ticks) is already known,
    /// otherwise keeps it until [`ChapterResolver::on_duration`] is called.
    pub fn handle_chapters(
        &mut self,
        chapters: &Element,
        timecode_scale: f64,
        duration: Option<f64>,
    ) -> Option<Vec<Chapter>> {
        if self.emitted {
            debug!("Chapters already emitted for this segment, ignoring");
            return None;
        }

        let resolved = resolve_chapters(chapters, timecode_scale, duration);
        info!("Resolved {} chapters", resolved.len());

        if duration.is_some() {
            self.emitted = true;
            Some(resolved)
        } else {
            debug!("Holding chapters until the segment duration is known");
            self.pending = Some(resolved);
            None
        }
    }

    /// Observe the segment duration (timecode ticks); releases held chapters, once.
    pub fn on_duration(&mut self, duration: f64) -> Option<Vec<Chapter>> {
        let mut chapters = self.pending.take()?;
        if let Some(last) = chapters.last_mut() {
            if last.end.is_none() {
                last.end = Some(duration);
            }
        }
        self.emitted = true;
        Some(chapters)
    }
}

/// Flatten the default edition of a Chapters element into a sorted timeline.
///
/// Times are expressed in timecode ticks, the unit of the segment Duration.
/// Ends missing from the file are taken from the next chapter's start, and
/// from `duration` for the last chapter.
pub fn resolve_chapters(chapters: &Element, timecode_scale: f64, duration: Option<f64>) -> Vec<Chapter> {
    let editions: Vec<&Element> = chapters.children_with(ElementId::EditionEntry).collect();
    let Some(edition) = editions
        .iter()
        .find(|edition| edition.child_flag(ElementId::EditionFlagDefault))
        .or_else(|| editions.first())
    else {
        return Vec::new();
    };

    let to_ticks = |nanos: u64| nanos as f64 / timecode_scale / NANOS_PER_MILLI;

    let mut resolved: Vec<Chapter> = edition
        .children_with(ElementId::ChapterAtom)
        .filter(|atom| !atom.child_flag(ElementId::ChapterFlagHidden))
        .filter_map(|atom| {
            let Some(start) = atom.child_unsigned(ElementId::ChapterTimeStart) else {
                debug!("Skipping chapter atom without a start time");
                return None;
            };
            let display = atom.child(ElementId::ChapterDisplay);
            Some(Chapter {
                start: to_ticks(start),
                end: atom.child_unsigned(ElementId::ChapterTimeEnd).map(to_ticks),
                text: display.and_then(|d| d.child_string(ElementId::ChapString)),
                language: display.and_then(|d| d.child_string(ElementId::ChapLanguage)),
            })
        })
        .collect();

    // sort_by is stable, equal starts keep source order
    resolved.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut next_start = duration;
    for chapter in resolved.iter_mut().rev() {
        if chapter.end.is_none() {
            chapter.end = next_start;
        }
        next_start = Some(chapter.start);
    }

    resolved
}
