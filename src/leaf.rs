//! Leaf elements: typed newtypes over the EBML primitive encodings.

use crate::base::VInt64;
use crate::element::Element;
use crate::error::Error;
use crate::functional::Buf;
use crate::Result;

/// Big-endian unsigned integer body, 0..=8 bytes. Empty means "use default".
pub(crate) fn decode_uint_body(buf: &mut &[u8]) -> Result<Option<u64>> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.len() > 8 {
        return Err(Error::ShortRead);
    }
    let len = buf.len();
    let mut value = [0u8; 8];
    value[8 - len..].copy_from_slice(&buf[..len]);
    buf.advance(len);
    Ok(Some(u64::from_be_bytes(value)))
}

/// Big-endian signed integer body, sign-extended from its encoded width.
pub(crate) fn decode_sint_body(buf: &mut &[u8]) -> Result<Option<i64>> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.len() > 8 {
        return Err(Error::ShortRead);
    }
    let len = buf.len();
    let is_neg = (buf[0] & 0x80) != 0;
    let mut value = if is_neg { [0xFFu8; 8] } else { [0u8; 8] };
    value[8 - len..].copy_from_slice(&buf[..len]);
    buf.advance(len);
    Ok(Some(i64::from_be_bytes(value)))
}

/// Float body: 4 or 8 bytes big-endian, empty means "use default".
pub(crate) fn decode_float_body(buf: &mut &[u8]) -> Result<Option<f64>> {
    match buf.len() {
        0 => Ok(None),
        4 => {
            let mut value = [0u8; 4];
            value.copy_from_slice(&buf[..4]);
            buf.advance(4);
            Ok(Some(f32::from_be_bytes(value) as f64))
        }
        8 => {
            let mut value = [0u8; 8];
            value.copy_from_slice(&buf[..8]);
            buf.advance(8);
            Ok(Some(f64::from_be_bytes(value)))
        }
        _ => Err(Error::ShortRead),
    }
}

/// UTF-8/ASCII string body; trailing NUL padding is stripped.
pub(crate) fn decode_string_body(buf: &mut &[u8]) -> Result<String> {
    let end = buf.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    let s = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.advance(buf.len());
    Ok(s)
}

pub(crate) fn decode_binary_body(buf: &mut &[u8]) -> Result<Vec<u8>> {
    let v = buf.to_vec();
    buf.advance(buf.len());
    Ok(v)
}

macro_rules! uint_element {
    ($(#[$attr:meta])* $name:ident = $id:literal) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u64);
        impl std::ops::Deref for $name {
            type Target = u64;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_uint_body(buf)?.unwrap_or(0)))
            }
        }
    };
    ($(#[$attr:meta])* $name:ident = $id:literal, default = $default:expr) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
        impl std::ops::Deref for $name {
            type Target = u64;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_uint_body(buf)?.unwrap_or($default)))
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
    };
}

macro_rules! sint_element {
    ($(#[$attr:meta])* $name:ident = $id:literal) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub i64);
        impl std::ops::Deref for $name {
            type Target = i64;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_sint_body(buf)?.unwrap_or(0)))
            }
        }
    };
}

macro_rules! float_element {
    ($(#[$attr:meta])* $name:ident = $id:literal) => {
        float_element!($(#[$attr])* $name = $id, default = 0.0);
    };
    ($(#[$attr:meta])* $name:ident = $id:literal, default = $default:expr) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
        pub struct $name(pub f64);
        impl std::ops::Deref for $name {
            type Target = f64;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_float_body(buf)?.unwrap_or($default)))
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }
    };
}

macro_rules! string_element {
    ($(#[$attr:meta])* $name:ident = $id:literal) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub String);
        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_string_body(buf)?))
            }
        }
    };
    ($(#[$attr:meta])* $name:ident = $id:literal, default = $default:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);
        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            const HAS_DEFAULT_VALUE: bool = true;
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                let s = decode_string_body(buf)?;
                Ok(Self(if s.is_empty() { $default.to_string() } else { s }))
            }
        }
        impl Default for $name {
            fn default() -> Self {
                Self($default.to_string())
            }
        }
    };
}

macro_rules! binary_element {
    ($(#[$attr:meta])* $name:ident = $id:literal) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub Vec<u8>);
        impl std::ops::Deref for $name {
            type Target = [u8];
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Element for $name {
            const ID: VInt64 = VInt64::from_encoded($id);
            fn decode_body(buf: &mut &[u8]) -> Result<Self> {
                Ok(Self(decode_binary_body(buf)?))
            }
        }
    };
}

// EBML header.
uint_element!(
    /// The version of EBML the document conforms to.
    EbmlVersion = 0x4286, default = 1
);
uint_element!(
    /// The minimum EBML version a reader must support.
    EbmlReadVersion = 0x42F7, default = 1
);
uint_element!(
    /// The maximum length of an EBML ID in the document, in bytes.
    EbmlMaxIdLength = 0x42F2, default = 4
);
uint_element!(
    /// The maximum length of an EBML size in the document, in bytes.
    EbmlMaxSizeLength = 0x42F3, default = 8
);
string_element!(
    /// Document type; "matroska" or "webm" for the streams this crate reads.
    DocType = 0x4282, default = "matroska"
);
uint_element!(
    /// The version of the document type the document conforms to.
    DocTypeVersion = 0x4287, default = 1
);
uint_element!(
    /// The minimum document type version a reader must support.
    DocTypeReadVersion = 0x4285, default = 1
);

// SeekHead.
binary_element!(
    /// The binary EBML ID of a Top-Level Element.
    SeekId = 0x53AB
);
uint_element!(
    /// The Segment Position of a Top-Level Element.
    SeekPosition = 0x53AC
);

// Info.
uint_element!(
    /// Base unit for Segment Ticks, in nanoseconds.
    TimestampScale = 0x2AD7B1, default = 1_000_000
);
float_element!(
    /// Duration of the Segment, in Segment Ticks.
    Duration = 0x4489
);
string_element!(
    /// General name of the Segment.
    Title = 0x7BA9
);
string_element!(
    /// Muxing application or library.
    MuxingApp = 0x4D80
);
string_element!(
    /// Writing application.
    WritingApp = 0x5741
);

// TrackEntry.
uint_element!(
    /// The track number as used in the Block header.
    TrackNumber = 0xD7
);
uint_element!(
    /// A UID that identifies the Track.
    TrackUid = 0x73C5
);
uint_element!(
    /// 1 video, 2 audio, 17 subtitle; anything else is exposed as unknown.
    TrackType = 0x83
);
uint_element!(
    /// Number of nanoseconds per frame, when constant.
    DefaultDuration = 0x23E383
);
string_element!(
    /// An ID corresponding to the codec, e.g. "V_VP8".
    CodecId = 0x86
);
binary_element!(
    /// Private data only known to the codec.
    CodecPrivate = 0x63A2
);
uint_element!(
    /// Codec-built-in delay, in nanoseconds.
    CodecDelay = 0x56AA, default = 0
);
uint_element!(
    /// Nanoseconds a seek target must be rolled back by.
    SeekPreroll = 0x56BB, default = 0
);

// Video.
uint_element!(
    /// Stereo-3D video mode.
    StereoMode = 0x53B8, default = 0
);
uint_element!(
    /// 1 when the BlockAdditional carries alpha data.
    AlphaMode = 0x53C0, default = 0
);
uint_element!(
    /// Width of the encoded video frames in pixels.
    PixelWidth = 0xB0
);
uint_element!(
    /// Height of the encoded video frames in pixels.
    PixelHeight = 0xBA
);
uint_element!(
    /// Pixels to remove at the bottom of the image.
    PixelCropBottom = 0x54AA, default = 0
);
uint_element!(
    /// Pixels to remove at the top of the image.
    PixelCropTop = 0x54BB, default = 0
);
uint_element!(
    /// Pixels to remove on the left of the image.
    PixelCropLeft = 0x54CC, default = 0
);
uint_element!(
    /// Pixels to remove on the right of the image.
    PixelCropRight = 0x54DD, default = 0
);
uint_element!(
    /// Width of the video frames to display.
    DisplayWidth = 0x54B0
);
uint_element!(
    /// Height of the video frames to display.
    DisplayHeight = 0x54BA
);

// Audio.
float_element!(
    /// Sampling frequency in Hz.
    SamplingFrequency = 0xB5, default = 8000.0
);
uint_element!(
    /// Number of channels in the track.
    Channels = 0x9F, default = 1
);
uint_element!(
    /// Bits per sample, mostly used for PCM.
    BitDepth = 0x6264
);

// ContentEncodings.
uint_element!(
    /// The order the encodings were applied in.
    ContentEncodingOrder = 0x5031, default = 0
);
uint_element!(
    /// What parts of the track the encoding applies to.
    ContentEncodingScope = 0x5032, default = 1
);
uint_element!(
    /// 0 compression, 1 encryption.
    ContentEncodingType = 0x5033, default = 0
);
uint_element!(
    /// 0 zlib, 3 header stripping.
    ContentCompAlgo = 0x4254, default = 0
);
binary_element!(
    /// For header stripping, the bytes to prepend to each frame.
    ContentCompSettings = 0x4255
);
uint_element!(
    /// 5 is AES-CTR, the only value WebM admits.
    ContentEncAlgo = 0x47E1, default = 0
);
binary_element!(
    /// The ID of the key the data was encrypted with.
    ContentEncKeyId = 0x47E2
);
uint_element!(
    /// The AES cipher mode; 1 is CTR.
    AesSettingsCipherMode = 0x47E8, default = 1
);

// Cluster / BlockGroup.
uint_element!(
    /// Absolute timestamp of the cluster, in Segment Ticks.
    Timestamp = 0xE7
);
binary_element!(
    /// Raw Block payload; see the block module for the interior layout.
    Block = 0xA1
);
uint_element!(
    /// Duration of the Block, in Track Ticks.
    BlockDuration = 0x9B
);
uint_element!(
    /// Cache priority of a referenced frame; 0 means not referenced.
    ReferencePriority = 0xFA, default = 0
);
sint_element!(
    /// Timestamp of a referenced Block, relative to this one, in Track Ticks.
    ReferenceBlock = 0xFB
);
sint_element!(
    /// Silent trailing (or, negative, leading) data in the Block, in nanoseconds.
    DiscardPadding = 0x75A2
);
uint_element!(
    /// How to interpret the sibling BlockAdditional data.
    BlockAddId = 0xEE, default = 1
);
binary_element!(
    /// Additional block data, interpreted per the BlockAddID.
    BlockAdditional = 0xA5
);

// Cues.
uint_element!(
    /// Absolute timestamp of the seek point, in Segment Ticks.
    CueTime = 0xB3
);
uint_element!(
    /// The track the cue position is for.
    CueTrack = 0xF7
);
uint_element!(
    /// Segment Position of the Cluster holding the cued Block.
    CueClusterPosition = 0xF1
);
uint_element!(
    /// Position of the cued Block relative to its Cluster's payload.
    CueRelativePosition = 0xF0
);
uint_element!(
    /// Number of the cued Block in its Cluster, 1-based.
    CueBlockNumber = 0x5378, default = 1
);
