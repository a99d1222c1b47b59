pub mod resync;
pub mod subtitle_parser;
pub mod subtitle_stream;

pub use resync::{find_cluster_boundary, Resynchronizer, CLUSTER_SIGNATURE};
pub use subtitle_parser::SubtitleParser;
pub use subtitle_stream::SubtitleStream;
