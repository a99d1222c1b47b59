use std::error::Error;
use std::fmt;
use std::io;

/// Enumeration of all possible errors that can occur while interpreting a Matroska stream
#[derive(Debug)]
pub enum MatroskaError {
    Ebml(EbmlError),
    Subtitle(SubtitleError),
    Other(io::Error),
}

/// Element reader errors: malformed VINTs, truncated or unreadable elements
#[derive(Debug)]
pub struct EbmlError {
    pub message: String,
    /// Absolute byte offset of the element that failed, when known.
    pub offset: Option<u64>,
}

impl EbmlError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
        }
    }

    /// Create a new error located at an absolute stream offset.
    pub fn at(offset: u64, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: Some(offset),
        }
    }
}

/// Subtitle payload errors
#[derive(Debug)]
pub struct SubtitleError {
    pub message: String,
}

impl SubtitleError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for MatroskaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatroskaError::Other(err) => write!(f, "I/O error: {}", err),
            MatroskaError::Ebml(err) => write!(f, "EBML error: {}", err),
            MatroskaError::Subtitle(err) => write!(f, "Subtitle error: {}", err),
        }
    }
}

impl fmt::Display for EbmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} (at byte {})", self.message, offset),
            None => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Display for SubtitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for MatroskaError {}
impl Error for EbmlError {}
impl Error for SubtitleError {}

// Conversion implementations
impl From<io::Error> for MatroskaError {
    fn from(err: io::Error) -> Self {
        MatroskaError::Other(err)
    }
}

impl From<EbmlError> for MatroskaError {
    fn from(err: EbmlError) -> Self {
        MatroskaError::Ebml(err)
    }
}

impl From<SubtitleError> for MatroskaError {
    fn from(err: SubtitleError) -> Self {
        MatroskaError::Subtitle(err)
    }
}

// Conversion to io::Error for callers working with Read/Write pipelines
impl From<MatroskaError> for io::Error {
    fn from(err: MatroskaError) -> Self {
        match err {
            MatroskaError::Other(inner) => inner,
            other => io::Error::other(other),
        }
    }
}

impl From<EbmlError> for io::Error {
    fn from(err: EbmlError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

impl From<SubtitleError> for io::Error {
    fn from(err: SubtitleError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

// Type alias for Result with MatroskaError
pub type MatroskaResult<T> = Result<T, MatroskaError>;
