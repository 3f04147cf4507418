//! Static element schema: every ID this crate knows, its parent and type.
//!
//! The typed element structs carry the per-element decode logic; this table
//! is what the streaming descent consults when it has only an ID — to tell
//! legal children from strays (which is how unknown-size masters end) and
//! to name elements in diagnostics.

use crate::base::VInt64;

/// EBML value type of a schema entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Master,
    Uint,
    Sint,
    Float,
    Str,
    Bin,
}

/// One row of the schema table.
#[derive(Debug, Copy, Clone)]
pub struct SchemaEntry {
    /// Canonical encoded ID, marker bit intact.
    pub id: u64,
    /// Canonical encoded ID of the parent, or [`ROOT`].
    pub parent: u64,
    pub kind: ElementKind,
    pub name: &'static str,
}

/// Sentinel parent for top-level elements.
pub const ROOT: u64 = 0;

use ElementKind::*;

macro_rules! schema {
    ($( $id:literal < $parent:expr , $kind:ident, $name:literal; )*) => {
        &[ $( SchemaEntry { id: $id, parent: $parent, kind: $kind, name: $name }, )* ]
    };
}

/// Every element the demuxer understands, in document order.
pub static SCHEMA: &[SchemaEntry] = schema! {
    0x1A45DFA3 < ROOT,       Master, "EBML";
    0x4286     < 0x1A45DFA3, Uint,   "EBMLVersion";
    0x42F7     < 0x1A45DFA3, Uint,   "EBMLReadVersion";
    0x42F2     < 0x1A45DFA3, Uint,   "EBMLMaxIDLength";
    0x42F3     < 0x1A45DFA3, Uint,   "EBMLMaxSizeLength";
    0x4282     < 0x1A45DFA3, Str,    "DocType";
    0x4287     < 0x1A45DFA3, Uint,   "DocTypeVersion";
    0x4285     < 0x1A45DFA3, Uint,   "DocTypeReadVersion";

    0x18538067 < ROOT,       Master, "Segment";

    0x114D9B74 < 0x18538067, Master, "SeekHead";
    0x4DBB     < 0x114D9B74, Master, "Seek";
    0x53AB     < 0x4DBB,     Bin,    "SeekID";
    0x53AC     < 0x4DBB,     Uint,   "SeekPosition";

    0x1549A966 < 0x18538067, Master, "Info";
    0x2AD7B1   < 0x1549A966, Uint,   "TimestampScale";
    0x4489     < 0x1549A966, Float,  "Duration";
    0x7BA9     < 0x1549A966, Str,    "Title";
    0x4D80     < 0x1549A966, Str,    "MuxingApp";
    0x5741     < 0x1549A966, Str,    "WritingApp";

    0x1654AE6B < 0x18538067, Master, "Tracks";
    0xAE       < 0x1654AE6B, Master, "TrackEntry";
    0xD7       < 0xAE,       Uint,   "TrackNumber";
    0x73C5     < 0xAE,       Uint,   "TrackUID";
    0x83       < 0xAE,       Uint,   "TrackType";
    0x23E383   < 0xAE,       Uint,   "DefaultDuration";
    0x86       < 0xAE,       Str,    "CodecID";
    0x63A2     < 0xAE,       Bin,    "CodecPrivate";
    0x56AA     < 0xAE,       Uint,   "CodecDelay";
    0x56BB     < 0xAE,       Uint,   "SeekPreroll";

    0xE0       < 0xAE,       Master, "Video";
    0x53B8     < 0xE0,       Uint,   "StereoMode";
    0x53C0     < 0xE0,       Uint,   "AlphaMode";
    0xB0       < 0xE0,       Uint,   "PixelWidth";
    0xBA       < 0xE0,       Uint,   "PixelHeight";
    0x54AA     < 0xE0,       Uint,   "PixelCropBottom";
    0x54BB     < 0xE0,       Uint,   "PixelCropTop";
    0x54CC     < 0xE0,       Uint,   "PixelCropLeft";
    0x54DD     < 0xE0,       Uint,   "PixelCropRight";
    0x54B0     < 0xE0,       Uint,   "DisplayWidth";
    0x54BA     < 0xE0,       Uint,   "DisplayHeight";

    0xE1       < 0xAE,       Master, "Audio";
    0xB5       < 0xE1,       Float,  "SamplingFrequency";
    0x9F       < 0xE1,       Uint,   "Channels";
    0x6264     < 0xE1,       Uint,   "BitDepth";

    0x6D80     < 0xAE,       Master, "ContentEncodings";
    0x6240     < 0x6D80,     Master, "ContentEncoding";
    0x5031     < 0x6240,     Uint,   "ContentEncodingOrder";
    0x5032     < 0x6240,     Uint,   "ContentEncodingScope";
    0x5033     < 0x6240,     Uint,   "ContentEncodingType";
    0x5034     < 0x6240,     Master, "ContentCompression";
    0x4254     < 0x5034,     Uint,   "ContentCompAlgo";
    0x4255     < 0x5034,     Bin,    "ContentCompSettings";
    0x5035     < 0x6240,     Master, "ContentEncryption";
    0x47E1     < 0x5035,     Uint,   "ContentEncAlgo";
    0x47E2     < 0x5035,     Bin,    "ContentEncKeyID";
    0x47E7     < 0x5035,     Master, "ContentEncAESSettings";
    0x47E8     < 0x47E7,     Uint,   "AESSettingsCipherMode";

    0x1F43B675 < 0x18538067, Master, "Cluster";
    0xE7       < 0x1F43B675, Uint,   "Timestamp";
    0xA7       < 0x1F43B675, Uint,   "Position";
    0xAB       < 0x1F43B675, Uint,   "PrevSize";
    0xA3       < 0x1F43B675, Bin,    "SimpleBlock";
    0xA0       < 0x1F43B675, Master, "BlockGroup";
    0xA1       < 0xA0,       Bin,    "Block";
    0x9B       < 0xA0,       Uint,   "BlockDuration";
    0xFA       < 0xA0,       Uint,   "ReferencePriority";
    0xFB       < 0xA0,       Sint,   "ReferenceBlock";
    0x75A2     < 0xA0,       Sint,   "DiscardPadding";
    0x75A1     < 0xA0,       Master, "BlockAdditions";
    0xA6       < 0x75A1,     Master, "BlockMore";
    0xEE       < 0xA6,       Uint,   "BlockAddID";
    0xA5       < 0xA6,       Bin,    "BlockAdditional";

    0x1C53BB6B < 0x18538067, Master, "Cues";
    0xBB       < 0x1C53BB6B, Master, "CuePoint";
    0xB3       < 0xBB,       Uint,   "CueTime";
    0xB7       < 0xBB,       Master, "CueTrackPositions";
    0xF7       < 0xB7,       Uint,   "CueTrack";
    0xF1       < 0xB7,       Uint,   "CueClusterPosition";
    0xF0       < 0xB7,       Uint,   "CueRelativePosition";
    0x5378     < 0xB7,       Uint,   "CueBlockNumber";

    // Elements we skip wholesale but must not mistake for strays.
    0x1043A770 < 0x18538067, Master, "Chapters";
    0x1254C367 < 0x18538067, Master, "Tags";
    0x1941A469 < 0x18538067, Master, "Attachments";

    // EBML global elements, legal in any master.
    0xEC       < ROOT,       Bin,    "Void";
    0xBF       < ROOT,       Bin,    "CRC-32";
};

const VOID: u64 = 0xEC;
const CRC32: u64 = 0xBF;

/// Look up a schema row by element ID.
pub fn lookup(id: VInt64) -> Option<&'static SchemaEntry> {
    let enc = id.as_encoded();
    SCHEMA.iter().find(|e| e.id == enc)
}

/// Whether `id` may occur directly inside the master with encoded ID
/// `parent`. Void and CRC-32 are global and fit anywhere.
pub fn is_child_of(id: VInt64, parent: u64) -> bool {
    let enc = id.as_encoded();
    if enc == VOID || enc == CRC32 {
        return true;
    }
    SCHEMA.iter().any(|e| e.id == enc && e.parent == parent)
}

/// Diagnostic name for an ID, `"?"` when unknown.
pub fn name_of(id: VInt64) -> &'static str {
    lookup(id).map_or("?", |e| e.name)
}
