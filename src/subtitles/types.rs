use base64::{engine::general_purpose, Engine as _};
use serde::{Serialize, Serializer};

/// Subtitle track announced by the container
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub number: u64,
    pub language: Option<String>,
    /// Normalized codec variant, e.g. `utf8`, `ssa`, `ass`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Codec private data as text, holds the SSA/ASS script header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Block payloads are zlib compressed
    pub compressed: bool,
}

impl Track {
    pub fn is_script(&self) -> bool {
        SCRIPT_TYPES.contains(&self.kind.as_str())
    }
}

/// Codec variants whose payload is a comma separated dialogue line.
pub const SCRIPT_TYPES: [&str; 2] = ["ssa", "ass"];

/// Dialogue fields of an SSA/ASS cue, in source order
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptFields {
    /// Only captured for `ass` tracks
    pub layer: Option<String>,
    pub style: Option<String>,
    pub name: Option<String>,
    pub margin_l: Option<String>,
    pub margin_r: Option<String>,
    pub margin_v: Option<String>,
    pub effect: Option<String>,
}

/// One subtitle event, times in milliseconds
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    pub text: String,
    pub time: f64,
    /// NaN when the block group carries no BlockDuration
    pub duration: f64,
    #[serde(flatten)]
    pub fields: Option<ScriptFields>,
}

/// Entry of the resolved chapter timeline, times in timecode ticks
/// (milliseconds at the default 1 ms TimecodeScale)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Chapter {
    pub start: f64,
    pub end: Option<f64>,
    pub text: Option<String>,
    pub language: Option<String>,
}

/// File attached to the segment, usually a font used by SSA/ASS styles
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: Option<String>,
    pub mimetype: Option<String>,
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

fn serialize_base64<T, S>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&general_purpose::STANDARD.encode(data.as_ref()))
}

/// Facts produced while a stream is interpreted
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum ParserEvent {
    /// Complete subtitle track registry, re-sent whenever a Tracks element closes
    Tracks(Vec<Track>),
    Subtitle { track: u64, cue: SubtitleCue },
    /// Resolved chapter list, sent once per segment
    Chapters(Vec<Chapter>),
    /// Sent once, possibly empty
    Attachments(Vec<Attachment>),
    /// The Cues element closed, every cue position is known
    Cues,
}
