//! Demuxed media packets.

use crate::block::EncryptionSignal;
use crate::lacer::FrameSpans;

/// Keyframe knowledge for a packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keyframe {
    /// The packet starts with a keyframe.
    Yes,
    /// The packet depends on other packets.
    No,
    /// The container does not say.
    Unknown,
}

/// One demuxed Block or SimpleBlock: a set of frame spans over the owned
/// block payload, plus the metadata its BlockGroup carried.
///
/// Frame data borrows from the packet, so spans stay valid exactly as long
/// as the packet is alive; callers that need longer-lived data copy out.
#[derive(Debug)]
pub struct Packet {
    pub(crate) track: u32,
    pub(crate) timestamp_ns: u64,
    pub(crate) duration_ns: Option<u64>,
    pub(crate) keyframe: Keyframe,
    pub(crate) invisible: bool,
    pub(crate) discardable: bool,
    pub(crate) payload: Vec<u8>,
    pub(crate) frames: FrameSpans,
    pub(crate) additions: Vec<(u64, Vec<u8>)>,
    pub(crate) reference_block_ns: Option<i64>,
    pub(crate) discard_padding_ns: Option<i64>,
    pub(crate) encryption: EncryptionSignal,
}

impl Packet {
    /// Index of the track this packet belongs to, as used by the track
    /// accessors on the demuxer. Not the Matroska track number.
    pub fn track(&self) -> u32 {
        self.track
    }

    /// Presentation timestamp in nanoseconds.
    pub fn tstamp(&self) -> u64 {
        self.timestamp_ns
    }

    /// Duration in nanoseconds, when the container carried one.
    pub fn duration(&self) -> Option<u64> {
        self.duration_ns
    }

    /// Keyframe state; [`Keyframe::No`] for a Block that references others.
    pub fn has_keyframe(&self) -> Keyframe {
        self.keyframe
    }

    /// Whether the container marks the packet invisible.
    pub fn invisible(&self) -> bool {
        self.invisible
    }

    /// Whether the container marks the packet discardable.
    pub fn discardable(&self) -> bool {
        self.discardable
    }

    /// Number of frames in the packet.
    pub fn count(&self) -> u32 {
        self.frames.len() as u32
    }

    /// The `i`-th frame's bytes.
    pub fn data(&self, i: usize) -> Option<&[u8]> {
        self.frames.get(i).map(|span| &self.payload[span.clone()])
    }

    /// ReferenceBlock delta in nanoseconds, for Blocks that carry one.
    pub fn reference_block(&self) -> Option<i64> {
        self.reference_block_ns
    }

    /// DiscardPadding in nanoseconds.
    pub fn discard_padding(&self) -> Option<i64> {
        self.discard_padding_ns
    }

    /// BlockAdditional bytes registered under `id` (1 is the default slot).
    pub fn additional_data(&self, id: u64) -> Option<&[u8]> {
        self.additions
            .iter()
            .find(|(aid, _)| *aid == id)
            .map(|(_, data)| data.as_slice())
    }

    /// Encryption signal decoded from the payload, if the track carries one.
    pub fn encryption(&self) -> &EncryptionSignal {
        &self.encryption
    }

    /// Initialization vector, for encrypted and partitioned packets.
    pub fn iv(&self) -> Option<&[u8]> {
        match &self.encryption {
            EncryptionSignal::Encrypted { iv } | EncryptionSignal::Partitioned { iv, .. } => {
                Some(iv)
            }
            _ => None,
        }
    }

    /// Subsample partition offsets, for partitioned packets.
    pub fn partition_offsets(&self) -> Option<&[u32]> {
        match &self.encryption {
            EncryptionSignal::Partitioned { offsets, .. } => Some(offsets),
            _ => None,
        }
    }
}
