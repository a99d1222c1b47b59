use super::types::Track;
use crate::ebml::ids::{SUBTITLE_CODEC_PREFIX, TRACK_TYPE_SUBTITLE};
use crate::ebml::{Element, ElementId};
use indexmap::IndexMap;
use log::{debug, info};

/// Subtitle tracks keyed by track number, in announcement order
#[derive(Debug, Clone, Default)]
pub struct TrackRegistry {
    tracks: IndexMap<u64, Track>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, number: u64) -> Option<&Track> {
        self.tracks.get(&number)
    }

    pub fn contains(&self, number: u64) -> bool {
        self.tracks.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Snapshot of every registered track.
    pub fn tracks(&self) -> Vec<Track> {
        self.tracks.values().cloned().collect()
    }

    /// Register the subtitle entries of a closed Tracks element and return the full registry.
    pub fn handle_tracks(&mut self, tracks: &Element) -> Vec<Track> {
        for entry in tracks.children_with(ElementId::TrackEntry) {
            if let Some(track) = read_track_entry(entry) {
                debug!(
                    "  Subtitle track #{}: type '{}', compressed: {}",
                    track.number, track.kind, track.compressed
                );
                // an existing number keeps its position, last entry wins
                self.tracks.insert(track.number, track);
            }
        }

        info!("Found {} subtitle tracks", self.tracks.len());
        self.tracks()
    }
}

/// Interpret one TrackEntry, `None` unless it is a text subtitle track.
pub(crate) fn read_track_entry(entry: &Element) -> Option<Track> {
    let track_type = entry.child_unsigned(ElementId::TrackType);
    if track_type != Some(TRACK_TYPE_SUBTITLE) {
        debug!("  Skipping track with type {:?}", track_type);
        return None;
    }

    let codec_id = entry.child_string(ElementId::CodecId).unwrap_or_default();
    if !codec_id.starts_with(SUBTITLE_CODEC_PREFIX) {
        debug!("  Skipping subtitle track with codec '{}'", codec_id);
        return None;
    }

    let Some(number) = entry.child_unsigned(ElementId::TrackNumber) else {
        debug!("  Skipping subtitle track without a track number");
        return None;
    };

    // "S_TEXT/ASS" -> "ass"
    let kind = codec_id
        .get(SUBTITLE_CODEC_PREFIX.len() + 1..)
        .unwrap_or_default()
        .to_lowercase();

    Some(Track {
        number,
        language: entry.child_string(ElementId::Language),
        kind,
        name: entry
            .child_string(ElementId::Name)
            .filter(|name| !name.is_empty()),
        header: entry
            .child_binary(ElementId::CodecPrivate)
            .filter(|header| !header.is_empty())
            .map(|header| String::from_utf8_lossy(header).into_owned()),
        compressed: is_compressed(entry),
    })
}

// Only the presence of ContentCompression is checked; zlib is assumed.
fn is_compressed(entry: &Element) -> bool {
    entry
        .children_with(ElementId::ContentEncodings)
        .any(|encodings| {
            encodings
                .children_with(ElementId::ContentEncoding)
                .any(|encoding| encoding.child(ElementId::ContentCompression).is_some())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ebml::ElementValue;

    fn uint(id: ElementId, v: u64) -> Element {
        Element::new(id, ElementValue::Unsigned(v))
    }

    fn text(id: ElementId, s: &str) -> Element {
        Element::new(id, ElementValue::String(s.to_string()))
    }

    fn entry(number: u64, track_type: u64, codec: Option<&str>, extra: Vec<Element>) -> Element {
        let mut children = vec![
            uint(ElementId::TrackNumber, number),
            uint(ElementId::TrackType, track_type),
        ];
        if let Some(codec) = codec {
            children.push(text(ElementId::CodecId, codec));
        }
        children.extend(extra);
        Element::master(ElementId::TrackEntry, children)
    }

    #[test]
    fn test_only_text_subtitle_tracks_are_registered() {
        let tracks = Element::master(
            ElementId::Tracks,
            vec![
                entry(1, 0x01, Some("V_MPEG4/ISO/AVC"), vec![]),
                entry(2, 0x02, Some("A_AAC"), vec![]),
                entry(3, 0x11, Some("S_TEXT/UTF8"), vec![text(ElementId::Language, "eng")]),
                entry(4, 0x11, Some("S_HDMV/PGS"), vec![]),
                entry(5, 0x11, None, vec![]),
                entry(6, 0x11, Some("S_TEXT/ASS"), vec![text(ElementId::Name, "Signs")]),
            ],
        );

        let mut registry = TrackRegistry::new();
        let announced = registry.handle_tracks(&tracks);

        let numbers: Vec<u64> = announced.iter().map(|t| t.number).collect();
        assert_eq!(numbers, vec![3, 6]);
        assert_eq!(announced[0].kind, "utf8");
        assert_eq!(announced[0].language.as_deref(), Some("eng"));
        assert_eq!(announced[0].name, None);
        assert_eq!(announced[1].kind, "ass");
        assert_eq!(announced[1].name.as_deref(), Some("Signs"));
    }

    #[test]
    fn test_header_and_compression_flag() {
        let encodings = Element::master(
            ElementId::ContentEncodings,
            vec![Element::master(
                ElementId::ContentEncoding,
                vec![Element::master(
                    ElementId::ContentCompression,
                    vec![uint(ElementId::ContentCompAlgo, 0)],
                )],
            )],
        );
        let private = Element::new(
            ElementId::CodecPrivate,
            ElementValue::Binary(b"[Script Info]\nScriptType: v4.00+".to_vec()),
        );
        let tracks = Element::master(
            ElementId::Tracks,
            vec![
                entry(7, 0x11, Some("S_TEXT/SSA"), vec![encodings, private]),
                entry(8, 0x11, Some("S_TEXT/UTF8"), vec![]),
            ],
        );

        let mut registry = TrackRegistry::new();
        registry.handle_tracks(&tracks);

        let ssa = registry.get(7).unwrap();
        assert!(ssa.compressed);
        assert!(ssa.is_script());
        assert_eq!(
            ssa.header.as_deref(),
            Some("[Script Info]\nScriptType: v4.00+")
        );
        assert!(!registry.get(8).unwrap().compressed);
    }

    #[test]
    fn test_repeated_tracks_element_keeps_order_last_writer_wins() {
        let mut registry = TrackRegistry::new();
        registry.handle_tracks(&Element::master(
            ElementId::Tracks,
            vec![
                entry(3, 0x11, Some("S_TEXT/UTF8"), vec![]),
                entry(4, 0x11, Some("S_TEXT/SSA"), vec![]),
            ],
        ));
        let announced = registry.handle_tracks(&Element::master(
            ElementId::Tracks,
            vec![entry(3, 0x11, Some("S_TEXT/ASS"), vec![])],
        ));

        assert_eq!(announced.len(), 2);
        assert_eq!(announced[0].number, 3);
        assert_eq!(announced[0].kind, "ass");
        assert_eq!(announced[1].number, 4);
    }
}
