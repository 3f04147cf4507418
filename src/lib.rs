#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Error types for this crate.
mod error;
mod functional;
pub use error::*;

/// base types for Matroska elements. ie. `VInt64`, `Header`, etc.
mod base;
/// Block and SimpleBlock interior layout.
mod block;
/// The streaming demuxer itself.
pub mod demuxer;
/// Delacing of frames packed into one block.
mod lacer;
/// Leaf elements in Matroska.
mod leaf;
/// Master elements in Matroska.
mod master;
/// Demuxed packets.
mod packet;
/// The static element schema.
mod schema;
/// Byte sources the demuxer reads from.
pub mod source;
/// Supplementary elements in Matroska. Void elements, CRC-32, etc.
///
/// These elements are not from the Matroska specification, but Matroska specifications inherit them from EBML specifications.
mod supplement;
/// Per-track metadata views.
mod track;
// Element body definitions and traits.
mod element;

/// A prelude for common types and traits.
pub mod prelude {
    pub use crate::base::*;
    pub use crate::block::{EncryptionSignal, MAX_PARTITIONS};
    pub use crate::demuxer::{CuePointInfo, Demuxer, DemuxerOptions};
    pub use crate::element::*;
    pub use crate::lacer::*;
    pub use crate::leaf::*;
    pub use crate::master::*;
    pub use crate::packet::{Keyframe, Packet};
    pub use crate::source::{ByteSource, IoSource, ReadStatus, SourceReader};
    pub use crate::supplement::*;
    pub use crate::track::*;
}
