//! Matroska element schema: ids, payload types and the buffered subset.

use std::fmt;

/// Payload type of an element as declared by the Matroska schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Master,
    Unsigned,
    Signed,
    Float,
    String,
    Utf8,
    Date,
    Binary,
    /// Block and SimpleBlock: track number, relative timecode, flags, frame data.
    Block,
}

element_ids! {
    // EBML header
    Ebml = 0x1A45DFA3 => Master,
    EbmlVersion = 0x4286 => Unsigned,
    EbmlReadVersion = 0x42F7 => Unsigned,
    EbmlMaxIdLength = 0x42F2 => Unsigned,
    EbmlMaxSizeLength = 0x42F3 => Unsigned,
    DocType = 0x4282 => String,
    DocTypeVersion = 0x4287 => Unsigned,
    DocTypeReadVersion = 0x4285 => Unsigned,
    Crc32 = 0xBF => Binary,
    Void = 0xEC => Binary,

    Segment = 0x18538067 => Master,

    // Meta seek
    SeekHead = 0x114D9B74 => Master,
    Seek = 0x4DBB => Master,
    SeekId = 0x53AB => Binary,
    SeekPosition = 0x53AC => Unsigned,

    // Segment information
    Info = 0x1549A966 => Master,
    SegmentUid = 0x73A4 => Binary,
    TimecodeScale = 0x2AD7B1 => Unsigned,
    Duration = 0x4489 => Float,
    DateUtc = 0x4461 => Date,
    Title = 0x7BA9 => Utf8,
    MuxingApp = 0x4D80 => Utf8,
    WritingApp = 0x5741 => Utf8,

    // Clusters
    Cluster = 0x1F43B675 => Master,
    Timecode = 0xE7 => Unsigned,
    Position = 0xA7 => Unsigned,
    PrevSize = 0xAB => Unsigned,
    SimpleBlock = 0xA3 => Block,
    BlockGroup = 0xA0 => Master,
    Block = 0xA1 => Block,
    BlockDuration = 0x9B => Unsigned,
    ReferenceBlock = 0xFB => Signed,
    DiscardPadding = 0x75A2 => Signed,

    // Tracks
    Tracks = 0x1654AE6B => Master,
    TrackEntry = 0xAE => Master,
    TrackNumber = 0xD7 => Unsigned,
    TrackUid = 0x73C5 => Unsigned,
    TrackType = 0x83 => Unsigned,
    FlagEnabled = 0xB9 => Unsigned,
    FlagDefault = 0x88 => Unsigned,
    FlagForced = 0x55AA => Unsigned,
    FlagLacing = 0x9C => Unsigned,
    DefaultDuration = 0x23E383 => Unsigned,
    Name = 0x536E => Utf8,
    Language = 0x22B59C => String,
    LanguageIetf = 0x22B59D => String,
    CodecId = 0x86 => String,
    CodecPrivate = 0x63A2 => Binary,
    CodecName = 0x258688 => Utf8,
    Video = 0xE0 => Master,
    Audio = 0xE1 => Master,
    ContentEncodings = 0x6D80 => Master,
    ContentEncoding = 0x6240 => Master,
    ContentEncodingOrder = 0x5031 => Unsigned,
    ContentEncodingScope = 0x5032 => Unsigned,
    ContentEncodingType = 0x5033 => Unsigned,
    ContentCompression = 0x5034 => Master,
    ContentCompAlgo = 0x4254 => Unsigned,
    ContentCompSettings = 0x4255 => Binary,

    // Cueing data
    Cues = 0x1C53BB6B => Master,
    CuePoint = 0xBB => Master,
    CueTime = 0xB3 => Unsigned,
    CueTrackPositions = 0xB7 => Master,
    CueTrack = 0xF7 => Unsigned,
    CueClusterPosition = 0xF1 => Unsigned,
    CueRelativePosition = 0xF0 => Unsigned,
    CueDuration = 0xB2 => Unsigned,
    CueBlockNumber = 0x5378 => Unsigned,

    // Attachments
    Attachments = 0x1941A469 => Master,
    AttachedFile = 0x61A7 => Master,
    FileDescription = 0x467E => Utf8,
    FileName = 0x466E => Utf8,
    FileMimeType = 0x4660 => String,
    FileData = 0x465C => Binary,
    FileUid = 0x46AE => Unsigned,

    // Chapters
    Chapters = 0x1043A770 => Master,
    EditionEntry = 0x45B9 => Master,
    EditionUid = 0x45BC => Unsigned,
    EditionFlagHidden = 0x45BD => Unsigned,
    EditionFlagDefault = 0x45DB => Unsigned,
    EditionFlagOrdered = 0x45DD => Unsigned,
    ChapterAtom = 0xB6 => Master,
    ChapterUid = 0x73C4 => Unsigned,
    ChapterStringUid = 0x5654 => Utf8,
    ChapterTimeStart = 0x91 => Unsigned,
    ChapterTimeEnd = 0x92 => Unsigned,
    ChapterFlagHidden = 0x98 => Unsigned,
    ChapterFlagEnabled = 0x4598 => Unsigned,
    ChapterDisplay = 0x80 => Master,
    ChapString = 0x85 => Utf8,
    ChapLanguage = 0x437C => String,
    ChapCountry = 0x437E => String,

    // Tagging
    Tags = 0x1254C367 => Master,
    Tag = 0x7373 => Master,
}

/// Element ids whose whole subtree is materialized before it is handed to the parser.
pub const BUFFERED_IDS: [ElementId; 7] = [
    ElementId::SeekHead,
    ElementId::TimecodeScale,
    ElementId::Tracks,
    ElementId::BlockGroup,
    ElementId::Attachments,
    ElementId::Chapters,
    ElementId::Duration,
];

/// TrackType value of subtitle tracks.
pub const TRACK_TYPE_SUBTITLE: u64 = 0x11;

/// CodecID prefix shared by the text subtitle codecs.
pub const SUBTITLE_CODEC_PREFIX: &str = "S_TEXT";

impl ElementId {
    pub fn is_known(self) -> bool {
        !matches!(self, ElementId::Unknown(_))
    }

    /// Children of Segment. An unknown-sized element is closed when one of these starts.
    pub fn is_top_level(self) -> bool {
        matches!(
            self,
            ElementId::SeekHead
                | ElementId::Info
                | ElementId::Tracks
                | ElementId::Cluster
                | ElementId::Cues
                | ElementId::Attachments
                | ElementId::Chapters
                | ElementId::Tags
        )
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        ElementId::from_u32(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:X})", self.name(), self.as_u32())
    }
}
