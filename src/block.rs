//! Block and SimpleBlock interior layout: header, lacing, encryption signal.

use crate::Error;
use crate::base::VInt64;
use crate::functional::{Buf, Decode};
use crate::lacer::{FrameSpans, Lacer};

/// Keyframe flag bit, SimpleBlock only.
const FLAG_KEYFRAME: u8 = 0x80;
/// Invisible flag bit.
const FLAG_INVISIBLE: u8 = 0x08;
/// Discardable flag bit, SimpleBlock only.
const FLAG_DISCARDABLE: u8 = 0x01;

/// Encryption signal byte bits.
const SIGNAL_ENCRYPTED: u8 = 0x01;
const SIGNAL_PARTITIONED: u8 = 0x02;

/// Maximum number of subsample partition offsets in one signal.
pub const MAX_PARTITIONS: u8 = 15;

/// Decoded prefix of a Block or SimpleBlock payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Track number the block belongs to.
    pub track_number: u64,
    /// Signed timestamp delta against the cluster timecode.
    pub delta: i16,
    /// Keyframe flag; meaningful for SimpleBlock only.
    pub keyframe: bool,
    /// The frame duration is assumed to be zero when set.
    pub invisible: bool,
    /// Discardable flag; meaningful for SimpleBlock only.
    pub discardable: bool,
    /// Frame spans into the block payload, lacing resolved.
    pub frames: FrameSpans,
}

impl BlockLayout {
    /// Parse the block header and lace sizes of a raw block payload.
    ///
    /// The spans in `frames` index into `payload` and together cover every
    /// byte after the header and lace sizes.
    pub fn parse(payload: &[u8]) -> crate::Result<Self> {
        let mut buf = payload;

        let track = VInt64::decode(&mut buf).map_err(|_| Error::MalformedBlock)?;
        if track.is_unknown {
            return Err(Error::MalformedBlock);
        }
        let delta = i16::decode(&mut buf).map_err(|_| Error::MalformedBlock)?;
        let flags = u8::decode(&mut buf).map_err(|_| Error::MalformedBlock)?;
        let header_len = payload.len() - buf.remaining();

        let lacer = match (flags >> 1) & 0x03 {
            0b00 => None,
            0b01 => Some(Lacer::Xiph),
            0b10 => Some(Lacer::FixedSize),
            _ => Some(Lacer::Ebml),
        };

        let frames = match lacer {
            None => {
                let mut spans = FrameSpans::new();
                spans.push(header_len..payload.len());
                spans
            }
            Some(lacer) => {
                let mut spans = lacer.delace(buf)?;
                for span in &mut spans {
                    span.start += header_len;
                    span.end += header_len;
                }
                spans
            }
        };

        Ok(Self {
            track_number: *track,
            delta,
            keyframe: flags & FLAG_KEYFRAME != 0,
            invisible: flags & FLAG_INVISIBLE != 0,
            discardable: flags & FLAG_DISCARDABLE != 0,
            frames,
        })
    }
}

/// Per-packet encryption state, decoded from the signal byte prefix of an
/// encrypted track's block payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EncryptionSignal {
    /// The track carries no signal byte at all.
    #[default]
    None,
    /// Signal byte present, the payload is in the clear.
    Unencrypted,
    /// Payload encrypted with the given IV.
    Encrypted {
        /// AES-CTR initialization vector.
        iv: [u8; 8],
    },
    /// Payload split into clear/cipher subsamples at the given offsets.
    Partitioned {
        /// AES-CTR initialization vector.
        iv: [u8; 8],
        /// Strictly increasing offsets into the frame payload.
        offsets: Vec<u32>,
    },
}

impl EncryptionSignal {
    /// Decode the signal from the front of `frame`, returning the number of
    /// bytes it occupies.
    pub fn parse(frame: &[u8]) -> crate::Result<(Self, usize)> {
        let (&signal, rest) = frame.split_first().ok_or(Error::MalformedSignal)?;

        if signal & SIGNAL_ENCRYPTED == 0 {
            return Ok((Self::Unencrypted, 1));
        }

        if rest.len() < 8 {
            return Err(Error::MalformedSignal);
        }
        let mut iv = [0u8; 8];
        iv.copy_from_slice(&rest[..8]);

        if signal & SIGNAL_PARTITIONED == 0 {
            return Ok((Self::Encrypted { iv }, 9));
        }

        let rest = &rest[8..];
        let (&count, rest) = rest.split_first().ok_or(Error::MalformedSignal)?;
        if count > MAX_PARTITIONS {
            return Err(Error::MalformedSignal);
        }
        let n = count as usize;
        if rest.len() < n * 4 {
            return Err(Error::MalformedSignal);
        }
        let mut offsets = Vec::with_capacity(n);
        for chunk in rest[..n * 4].chunks_exact(4) {
            offsets.push(u32::from_be_bytes(chunk.try_into().unwrap()));
        }
        if offsets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::MalformedSignal);
        }
        Ok((Self::Partitioned { iv, offsets }, 10 + n * 4))
    }
}
