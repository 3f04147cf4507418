use crate::Error;
use crate::base::*;
use crate::element::*;
use crate::functional::*;
use crate::leaf::*;
use crate::supplement::*;

// A helper for generating nested elements.
/* example:
nested! {
    required: [ EbmlMaxIdLength, EbmlMaxSizeLength ],
    optional: [ EbmlVersion, EbmlReadVersion ],
    multiple: [ ],
};
Required elements with a schema default are filled in when absent.
*/
macro_rules! nested {
    (required: [$($required:ident),*$(,)?], optional: [$($optional:ident),*$(,)?], multiple: [$($multiple:ident),*$(,)?],) => {
        paste::paste! {
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let crc32 = Option::<Crc32>::decode(buf).ok().flatten();
                $( let mut [<$required:snake>] = None;)*
                $( let mut [<$optional:snake>] = None;)*
                $( let mut [<$multiple:snake>] = Vec::new();)*
                let mut void: Option<Void> = None;

                while let Ok(Some(header)) = Option::<Header>::decode(buf) {
                    if header.size.is_unknown || *header.size as usize > buf.remaining() {
                        return Err(Error::ElementOverrun { id: header.id });
                    }
                    match header.id {
                        $( $required::ID => {
                            if [<$required:snake>].is_some() {
                                return Err(Error::DuplicateElement { id: header.id, parent: Self::ID });
                            } else {
                                [<$required:snake>] = Some($required::decode_element(&header, buf)?)
                            }
                        } )*
                        $( $optional::ID => {
                            if [<$optional:snake>].is_some() {
                                return Err(Error::DuplicateElement { id: header.id, parent: Self::ID });
                            } else {
                                [<$optional:snake>] = Some($optional::decode_element(&header, buf)?)
                            }
                        } )*
                        $( $multiple::ID => {
                            [<$multiple:snake>].push($multiple::decode_element(&header, buf)?);
                        } )*
                        Void::ID => {
                            let v = Void::decode_element(&header, buf)?;
                            if let Some(previous) = void {
                                void = Some(Void { size: previous.size + v.size });
                            } else {
                                void = Some(v);
                            }
                            log::info!("Skipping Void element in Element {}, size: {}B", Self::ID, *header.size);
                        }
                        _ => {
                            buf.advance(*header.size as usize);
                            log::warn!("Unknown element {}({}b) in Element({})", header.id, *header.size, Self::ID);
                        }
                    }
                }

                if buf.has_remaining() {
                    return Err(Error::ShortRead);
                }

                Ok(Self {
                    crc32,
                    $( [<$required:snake>]: [<$required:snake>].or(if $required::HAS_DEFAULT_VALUE { Some($required::default()) } else { None }).ok_or(Error::MissingElement($required::ID))?, )*
                    $( [<$optional:snake>], )*
                    $( [<$multiple:snake>], )*
                    void,
                })
            }
        }
    };
}

/// EBML element, the first top-level element in a Matroska file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ebml {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// EBMLMaxIDLength element, the maximum length of an EBML ID in bytes.
    pub ebml_max_id_length: EbmlMaxIdLength,
    /// EBMLMaxSizeLength element, the maximum length of an EBML size in bytes.
    pub ebml_max_size_length: EbmlMaxSizeLength,
    /// DocType element; "matroska" or "webm" for anything this crate accepts.
    pub doc_type: DocType,
    /// DocTypeReadVersion element, the minimum reader version required.
    pub doc_type_read_version: DocTypeReadVersion,
    /// EBMLVersion element.
    pub ebml_version: Option<EbmlVersion>,
    /// EBMLReadVersion element.
    pub ebml_read_version: Option<EbmlReadVersion>,
    /// DocTypeVersion element.
    pub doc_type_version: Option<DocTypeVersion>,
}

impl Element for Ebml {
    const ID: VInt64 = VInt64::from_encoded(0x1A45_DFA3);
    nested! {
        required: [ EbmlMaxIdLength, EbmlMaxSizeLength, DocType, DocTypeReadVersion ],
        optional: [ EbmlVersion, EbmlReadVersion, DocTypeVersion ],
        multiple: [ ],
    }
}

/// Contains seeking information of Top-Level Elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeekHead {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Contains a single seek entry to an EBML Element.
    pub seek: Vec<Seek>,
}

impl Element for SeekHead {
    const ID: VInt64 = VInt64::from_encoded(0x114D9B74);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ Seek ],
    }
}

/// Contains a single seek entry to an EBML Element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seek {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The binary EBML ID of a Top-Level Element.
    pub seek_id: SeekId,
    /// The Segment Position (relative to the Segment payload) of a Top-Level Element.
    pub seek_position: SeekPosition,
}

impl Element for Seek {
    const ID: VInt64 = VInt64::from_encoded(0x4DBB);
    nested! {
      required: [ SeekId, SeekPosition ],
      optional: [ ],
      multiple: [ ],
    }
}

impl Seek {
    /// The element ID this entry points at, decoded from its binary form.
    pub fn target_id(&self) -> Option<VInt64> {
        let mut bytes = [0u8; 8];
        let raw = &self.seek_id.0;
        if raw.is_empty() || raw.len() > 8 {
            return None;
        }
        bytes[8 - raw.len()..].copy_from_slice(raw);
        Some(VInt64::from_encoded(u64::from_be_bytes(bytes)))
    }
}

/// Contains general information about the Segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Base unit for Segment Ticks, in nanoseconds.
    pub timestamp_scale: TimestampScale,
    /// Duration of the Segment, in Segment Ticks.
    pub duration: Option<Duration>,
    /// General name of the Segment.
    pub title: Option<Title>,
    /// Muxing application or library.
    pub muxing_app: Option<MuxingApp>,
    /// Writing application.
    pub writing_app: Option<WritingApp>,
}

impl Element for Info {
    const ID: VInt64 = VInt64::from_encoded(0x1549A966);
    nested! {
      required: [ TimestampScale ],
      optional: [ Duration, Title, MuxingApp, WritingApp ],
      multiple: [ ],
    }
}

/// A Top-Level Element of information with many tracks described.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracks {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,

    /// Describes each track in the Segment.
    pub entries: Vec<TrackEntry>,
}

impl Element for Tracks {
    const ID: VInt64 = VInt64::from_encoded(0x1654AE6B);

    // Hand-rolled: a malformed TrackEntry is dropped with a warning rather
    // than poisoning the whole Tracks element.
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        let crc32 = Option::<Crc32>::decode(buf).ok().flatten();
        let mut entries = Vec::new();

        while let Ok(Some(header)) = Option::<Header>::decode(buf) {
            if header.size.is_unknown || *header.size as usize > buf.remaining() {
                return Err(Error::ElementOverrun { id: header.id });
            }
            let size = *header.size as usize;
            match header.id {
                TrackEntry::ID => match TrackEntry::decode_element(&header, buf) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        log::warn!("Dropping malformed TrackEntry: {}", e);
                        buf.advance(size);
                    }
                },
                Void::ID => {
                    buf.advance(size);
                }
                _ => {
                    buf.advance(size);
                    log::warn!("Unknown element {}({}b) in Element({})", header.id, size, Self::ID);
                }
            }
        }

        if buf.has_remaining() {
            return Err(Error::ShortRead);
        }
        if entries.is_empty() {
            return Err(Error::MissingElement(TrackEntry::ID));
        }

        Ok(Self { crc32, entries })
    }
}

/// Describes a track with all Elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackEntry {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The track number as used in the Block Header.
    pub track_number: TrackNumber,
    /// The track type.
    pub track_type: TrackType,
    /// An ID corresponding to the codec.
    pub codec_id: CodecId,
    /// A UID that identifies the Track.
    pub track_uid: Option<TrackUid>,
    /// Number of nanoseconds per frame.
    pub default_duration: Option<DefaultDuration>,
    /// Private data only known to the codec.
    pub codec_private: Option<CodecPrivate>,
    /// CodecDelay is the codec-built-in delay, in nanoseconds.
    pub codec_delay: Option<CodecDelay>,
    /// Number of nanoseconds a seek target must be rolled back by.
    pub seek_preroll: Option<SeekPreroll>,
    /// Video settings.
    pub video: Option<Video>,
    /// Audio settings.
    pub audio: Option<Audio>,
    /// Settings for several content encoding mechanisms.
    pub content_encodings: Option<ContentEncodings>,
}

impl Element for TrackEntry {
    const ID: VInt64 = VInt64::from_encoded(0xAE);
    nested! {
      required: [ TrackNumber, TrackType, CodecId ],
      optional: [ TrackUid, DefaultDuration, CodecPrivate, CodecDelay, SeekPreroll, Video, Audio, ContentEncodings ],
      multiple: [ ],
    }
}

/// Video settings of a TrackEntry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Video {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Stereo-3D video mode.
    pub stereo_mode: StereoMode,
    /// Alpha Video Mode; 1 when the BlockAdditional carries alpha data.
    pub alpha_mode: AlphaMode,
    /// Width of the encoded video frames in pixels.
    pub pixel_width: PixelWidth,
    /// Height of the encoded video frames in pixels.
    pub pixel_height: PixelHeight,
    /// The number of video pixels to remove at the bottom of the image.
    pub pixel_crop_bottom: PixelCropBottom,
    /// The number of video pixels to remove at the top of the image.
    pub pixel_crop_top: PixelCropTop,
    /// The number of video pixels to remove on the left of the image.
    pub pixel_crop_left: PixelCropLeft,
    /// The number of video pixels to remove on the right of the image.
    pub pixel_crop_right: PixelCropRight,
    /// Width of the video frames to display; defaults to the cropped pixel width.
    pub display_width: Option<DisplayWidth>,
    /// Height of the video frames to display; defaults to the cropped pixel height.
    pub display_height: Option<DisplayHeight>,
}

impl Element for Video {
    const ID: VInt64 = VInt64::from_encoded(0xE0);
    nested! {
      required: [ StereoMode, AlphaMode, PixelWidth, PixelHeight, PixelCropBottom, PixelCropTop, PixelCropLeft, PixelCropRight ],
      optional: [ DisplayWidth, DisplayHeight ],
      multiple: [ ],
    }
}

/// Audio settings of a TrackEntry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Audio {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Sampling frequency in Hz.
    pub sampling_frequency: SamplingFrequency,
    /// Numbers of channels in the track.
    pub channels: Channels,
    /// Bits per sample, mostly used for PCM.
    pub bit_depth: Option<BitDepth>,
}

impl Element for Audio {
    const ID: VInt64 = VInt64::from_encoded(0xE1);
    nested! {
      required: [ SamplingFrequency, Channels ],
      optional: [ BitDepth ],
      multiple: [ ],
    }
}

/// Settings for several content encoding mechanisms like compression or encryption.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentEncodings {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Settings for one content encoding, like compression or encryption.
    pub content_encoding: Vec<ContentEncoding>,
}

impl Element for ContentEncodings {
    const ID: VInt64 = VInt64::from_encoded(0x6D80);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ ContentEncoding ],
    }
}

/// Settings for one content encoding, like compression or encryption.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentEncoding {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The order the encodings were applied in, reversed to decode.
    pub content_encoding_order: ContentEncodingOrder,
    /// What parts of the track the encoding applies to.
    pub content_encoding_scope: ContentEncodingScope,
    /// 0 compression, 1 encryption.
    pub content_encoding_type: ContentEncodingType,
    /// Settings describing the compression used.
    pub content_compression: Option<ContentCompression>,
    /// Settings describing the encryption used.
    pub content_encryption: Option<ContentEncryption>,
}

impl Element for ContentEncoding {
    const ID: VInt64 = VInt64::from_encoded(0x6240);
    nested! {
      required: [ ContentEncodingOrder, ContentEncodingScope, ContentEncodingType ],
      optional: [ ContentCompression, ContentEncryption ],
      multiple: [ ],
    }
}

/// Settings describing the compression applied to a track's blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentCompression {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The compression algorithm; 3 is header stripping.
    pub content_comp_algo: ContentCompAlgo,
    /// For header stripping, the bytes to prepend to each frame.
    pub content_comp_settings: Option<ContentCompSettings>,
}

impl Element for ContentCompression {
    const ID: VInt64 = VInt64::from_encoded(0x5034);
    nested! {
      required: [ ContentCompAlgo ],
      optional: [ ContentCompSettings ],
      multiple: [ ],
    }
}

/// Settings describing the encryption applied to a track's blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentEncryption {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The encryption algorithm; 5 is AES-CTR.
    pub content_enc_algo: ContentEncAlgo,
    /// The ID of the key the data was encrypted with.
    pub content_enc_key_id: Option<ContentEncKeyId>,
    /// AES cipher settings.
    pub content_enc_aes_settings: Option<ContentEncAesSettings>,
}

impl Element for ContentEncryption {
    const ID: VInt64 = VInt64::from_encoded(0x5035);
    nested! {
      required: [ ContentEncAlgo ],
      optional: [ ContentEncKeyId, ContentEncAesSettings ],
      multiple: [ ],
    }
}

/// AES cipher settings inside ContentEncryption.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentEncAesSettings {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The AES cipher mode; 1 is CTR.
    pub aes_settings_cipher_mode: AesSettingsCipherMode,
}

impl Element for ContentEncAesSettings {
    const ID: VInt64 = VInt64::from_encoded(0x47E7);
    nested! {
      required: [ AesSettingsCipherMode ],
      optional: [ ],
      multiple: [ ],
    }
}

/// Basic container of information containing a single Block and information specific to that Block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockGroup {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Block containing the actual data to be rendered.
    pub block: Block,
    /// This frame is referenced and has the specified cache priority.
    pub reference_priority: ReferencePriority,
    /// Contain additional binary data to complete the main one.
    pub block_additions: Option<BlockAdditions>,
    /// The duration of the Block, in Track Ticks.
    pub block_duration: Option<BlockDuration>,
    /// Duration of silent data to discard from the Block, in nanoseconds.
    pub discard_padding: Option<DiscardPadding>,
    /// Timestamps of the Blocks this Block depends on, relative to this one.
    /// An empty list means the Block is independently decodable.
    pub reference_block: Vec<ReferenceBlock>,
}

impl Element for BlockGroup {
    const ID: VInt64 = VInt64::from_encoded(0xA0);
    nested! {
      required: [ Block, ReferencePriority ],
      optional: [ BlockAdditions, BlockDuration, DiscardPadding ],
      multiple: [ ReferenceBlock ],
    }
}

/// Contain additional binary data to complete the main one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockAdditions {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Contain the BlockAdditional and some parameters.
    pub block_more: Vec<BlockMore>,
}

impl Element for BlockAdditions {
    const ID: VInt64 = VInt64::from_encoded(0x75A1);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ BlockMore ],
    }
}

/// Contain the BlockAdditional and some parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockMore {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Interpreted by the codec as it wishes (using the BlockAddID).
    pub block_additional: BlockAdditional,
    /// An ID to identify how to interpret the BlockAdditional data; 1 by default.
    pub block_add_id: BlockAddId,
}

impl Element for BlockMore {
    const ID: VInt64 = VInt64::from_encoded(0xA6);
    nested! {
      required: [ BlockAdditional, BlockAddId ],
      optional: [ ],
      multiple: [ ],
    }
}

/// A Top-Level Element to speed seeking access.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cues {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Contains all information relative to a seek point in the Segment.
    pub cue_point: Vec<CuePoint>,
}

impl Element for Cues {
    const ID: VInt64 = VInt64::from_encoded(0x1C53BB6B);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ CuePoint ],
    }
}

/// Contains all information relative to a seek point in the Segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CuePoint {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// Absolute timestamp of the seek point, in Segment Ticks.
    pub cue_time: CueTime,
    /// Positions for different tracks corresponding to the timestamp.
    pub cue_track_positions: Vec<CueTrackPositions>,
}

impl Element for CuePoint {
    const ID: VInt64 = VInt64::from_encoded(0xBB);
    nested! {
      required: [ CueTime ],
      optional: [ ],
      multiple: [ CueTrackPositions ],
    }
}

/// Positions for one track corresponding to a cue timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueTrackPositions {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// Void element, tolerated as padding.
    pub void: Option<Void>,

    /// The track the position is for.
    pub cue_track: CueTrack,
    /// The Segment Position of the Cluster containing the associated Block.
    pub cue_cluster_position: CueClusterPosition,
    /// Number of the Block in the specified Cluster, 1-based.
    pub cue_block_number: CueBlockNumber,
    /// The relative position inside the Cluster of the referenced Block.
    pub cue_relative_position: Option<CueRelativePosition>,
}

impl Element for CueTrackPositions {
    const ID: VInt64 = VInt64::from_encoded(0xB7);
    nested! {
      required: [ CueTrack, CueClusterPosition, CueBlockNumber ],
      optional: [ CueRelativePosition ],
      multiple: [ ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &[u8], body: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        assert!(body.len() < 0x80);
        out.push(0x80 | body.len() as u8);
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn decode_ebml_header() {
        let body = [
            element(&[0x42, 0x82], b"matroska"),
            element(&[0x42, 0x87], &[1]),
            element(&[0x42, 0x85], &[1]),
        ]
        .concat();
        let full = element(&[0x1A, 0x45, 0xDF, 0xA3], &body);
        let mut s = &full[..];
        let ebml = Ebml::decode(&mut s).unwrap();
        assert_eq!(
            ebml,
            Ebml {
                crc32: None,
                void: None,
                ebml_max_id_length: EbmlMaxIdLength(4),
                ebml_max_size_length: EbmlMaxSizeLength(8),
                doc_type: DocType("matroska".to_string()),
                doc_type_read_version: DocTypeReadVersion(1),
                ebml_version: None,
                ebml_read_version: None,
                doc_type_version: Some(DocTypeVersion(1)),
            }
        );
    }

    #[test]
    fn missing_mandatory_without_default_fails() {
        // CueTrackPositions with no CueClusterPosition.
        let body = element(&[0xF7], &[1]);
        let full = element(&[0xB7], &body);
        let mut s = &full[..];
        assert!(matches!(
            CueTrackPositions::decode(&mut s),
            Err(Error::MissingElement(_))
        ));
    }

    #[test]
    fn duplicate_singleton_fails() {
        let body = [element(&[0xB3], &[0]), element(&[0xB3], &[1])].concat();
        let full = element(&[0xBB], &body);
        let mut s = &full[..];
        assert!(matches!(
            CuePoint::decode(&mut s),
            Err(Error::DuplicateElement { .. })
        ));
    }

    #[test]
    fn malformed_track_entry_is_dropped() {
        // First entry lacks CodecId, second is complete.
        let bad = element(
            &[0xAE],
            &[element(&[0xD7], &[1]), element(&[0x83], &[1])].concat(),
        );
        let good = element(
            &[0xAE],
            &[
                element(&[0xD7], &[2]),
                element(&[0x83], &[2]),
                element(&[0x86], b"A_VORBIS"),
            ]
            .concat(),
        );
        let full = element(&[0x16, 0x54, 0xAE, 0x6B], &[bad, good].concat());
        let mut s = &full[..];
        let tracks = Tracks::decode(&mut s).unwrap();
        assert_eq!(tracks.entries.len(), 1);
        assert_eq!(*tracks.entries[0].track_number, 2);
    }

    #[test]
    fn seek_target_id() {
        let seek = Seek {
            crc32: None,
            void: None,
            seek_id: SeekId(vec![0x16, 0x54, 0xAE, 0x6B]),
            seek_position: SeekPosition(4135),
        };
        assert_eq!(seek.target_id(), Some(Tracks::ID));
    }

    #[test]
    fn unknown_child_is_skipped() {
        // A Tags-like unknown element inside Info is ignored.
        let body = [
            element(&[0x2A, 0xD7, 0xB1], &[0x0F, 0x42, 0x40]),
            element(&[0x7B, 0xA9], b"title"),
            element(&[0x55, 0xAA], &[0xAB; 3]),
        ]
        .concat();
        let full = element(&[0x15, 0x49, 0xA9, 0x66], &body);
        let mut s = &full[..];
        let info = Info::decode(&mut s).unwrap();
        assert_eq!(*info.timestamp_scale, 1_000_000);
        assert_eq!(info.title.as_deref(), Some("title"));
    }
}
