/// Tuning knobs shared by the strict parser, the tolerant stream and the file extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Bytes read per chunk when feeding a parser from a file.
    pub chunk_size: usize,
    /// Stop decoding once a Tracks element closes without any subtitle track.
    pub stop_without_subtitle_tracks: bool,
    /// Pending skip (bytes) above which a seek is reported as stalled.
    pub skip_stall_warning: u64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            stop_without_subtitle_tracks: true,
            skip_stall_warning: 20_000_000,
        }
    }
}

impl ParserOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_stop_without_subtitle_tracks(mut self, stop: bool) -> Self {
        self.stop_without_subtitle_tracks = stop;
        self
    }

    pub fn with_skip_stall_warning(mut self, bytes: u64) -> Self {
        self.skip_stall_warning = bytes;
        self
    }
}
