use crate::base::VInt64;

/// Error types for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error, from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source ran out of data inside an element.
    ///
    /// Distinct from a clean end of stream: the element whose header was
    /// already consumed could not be completed. When this comes out of
    /// [`Demuxer::read_packet`](crate::demuxer::Demuxer::read_packet) the
    /// caller may extend the source and retry via
    /// [`Demuxer::read_reset`](crate::demuxer::Demuxer::read_reset).
    #[error("Byte source reached end of data mid-element")]
    SoftEos,

    /// The stream does not carry a document type this crate reads.
    #[error("Unsupported document type: {0:?}")]
    UnsupportedDocType(String),

    /// DocTypeReadVersion is newer than what this crate implements.
    #[error("Unsupported DocTypeReadVersion: {0}")]
    UnsupportedReadVersion(u64),

    /// Invalid variable-length integer encoding, indicates an all-zero width byte.
    #[error("Invalid variable-length integer encoding, 8 leading zeros found...")]
    InvalidVInt,

    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read past the end of the buffer")]
    OutOfBounds,

    /// Attempted to read past the end of the buffer during element body decoding.
    #[error("Element body over decode, ID: {0}")]
    OverDecode(VInt64),

    /// Not all bytes were consumed in an element body during element body decoding.
    #[error("Element body under decode, ID: {0}")]
    UnderDecode(VInt64),

    /// Not all bytes were consumed in an element body.
    #[error("Short read: not all bytes were consumed")]
    ShortRead,

    /// Missing element.
    #[error("Missing element, ID: {0}")]
    MissingElement(VInt64),

    /// Duplicate element in a master element.
    #[error("Duplicate element {id} in master element {parent}")]
    DuplicateElement {
        /// The duplicate element ID.
        id: VInt64,
        /// The parent master element ID.
        parent: VInt64,
    },

    /// Element payload larger than the configured cap.
    #[error("Element {id} payload of {size}B exceeds the {limit}B cap")]
    PayloadTooLarge {
        /// The offending element ID.
        id: VInt64,
        /// Declared payload size.
        size: u64,
        /// Configured cap.
        limit: u64,
    },

    /// An element's payload overruns its parent's remaining budget.
    #[error("Element {id} overruns its parent element")]
    ElementOverrun {
        /// The offending element ID.
        id: VInt64,
    },

    /// An element's value falls outside its legal range.
    #[error("Element {id} value out of range")]
    RangeViolation {
        /// The offending element ID.
        id: VInt64,
    },

    /// Malformed lacing data.
    #[error("Malformed lacing data")]
    MalformedLacingData,

    /// Malformed Block or SimpleBlock header.
    #[error("Malformed block header")]
    MalformedBlock,

    /// Malformed encryption signal byte data.
    #[error("Malformed encryption signal data")]
    MalformedSignal,

    /// Known but unimplemented container feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(&'static str),

    /// Requested metadata is not present in the stream.
    #[error("Requested metadata is not present")]
    Absent,
}

impl Error {
    /// Whether the error leaves a demuxer in a terminal state.
    ///
    /// [`Error::SoftEos`] is recoverable through
    /// [`Demuxer::read_reset`](crate::demuxer::Demuxer::read_reset), and
    /// [`Error::Absent`] is a per-query outcome, not a parse failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::SoftEos | Error::Absent)
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
