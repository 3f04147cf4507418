//! Per-track views derived from the Tracks element.

use crate::master::TrackEntry;
use std::ops::Range;

/// Broad class of a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
    /// Any TrackType this crate does not classify; packets still flow.
    Unknown,
}

/// Codecs recognized by CodecID; everything else demuxes as `Unknown`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Codec {
    Vp8,
    Vp9,
    Av1,
    Vorbis,
    Opus,
    Theora,
    Unknown,
}

/// Content encoding applied to a track's blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEncoding {
    /// Stored as-is.
    None,
    /// Compressed; for header stripping the stripped bytes are kept so the
    /// caller can reconstitute frames.
    Compression {
        /// ContentCompSettings: bytes to prepend to every frame, when the
        /// algorithm is header stripping.
        strip_header: Option<Vec<u8>>,
    },
    /// Encrypted with the given key ID; per-packet state rides in the
    /// signal byte.
    Encryption {
        /// ContentEncKeyID bytes.
        key_id: Vec<u8>,
    },
}

/// Video parameters of a video track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct VideoParams {
    pub stereo_mode: u64,
    pub alpha_mode: u64,
    /// Pixel dimensions of the encoded frames.
    pub width: u64,
    pub height: u64,
    /// Display dimensions; fall back to the encoded dimensions.
    pub display_width: u64,
    pub display_height: u64,
    pub crop_top: u64,
    pub crop_bottom: u64,
    pub crop_left: u64,
    pub crop_right: u64,
}

/// Audio parameters of an audio track.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AudioParams {
    /// Sampling rate in Hz.
    pub rate: f64,
    pub channels: u64,
    /// Bits per sample; 0 when the container does not say.
    pub depth: u64,
    /// Codec-built-in delay, in nanoseconds.
    pub codec_delay: u64,
    /// Pre-roll after a seek, in nanoseconds.
    pub seek_preroll: u64,
}

/// A track as exposed through the demuxer: the decoded TrackEntry plus the
/// precomputed codec-private split.
#[derive(Debug, Clone)]
pub struct Track {
    pub(crate) entry: TrackEntry,
    codec_data: Vec<Range<usize>>,
}

impl Track {
    pub(crate) fn from_entry(entry: TrackEntry) -> Self {
        let codec_data = split_codec_private(&entry);
        Self { entry, codec_data }
    }

    /// Matroska track number, as referenced by block headers.
    pub fn number(&self) -> u64 {
        *self.entry.track_number
    }

    /// Track UID, when present.
    pub fn uid(&self) -> Option<u64> {
        self.entry.track_uid.map(|u| *u)
    }

    pub fn kind(&self) -> TrackKind {
        match *self.entry.track_type {
            1 => TrackKind::Video,
            2 => TrackKind::Audio,
            17 => TrackKind::Subtitle,
            _ => TrackKind::Unknown,
        }
    }

    /// The raw CodecID string, e.g. `"V_VP8"`.
    pub fn codec_id(&self) -> &str {
        &self.entry.codec_id
    }

    pub fn codec(&self) -> Codec {
        match self.codec_id() {
            "V_VP8" => Codec::Vp8,
            "V_VP9" => Codec::Vp9,
            "V_AV1" => Codec::Av1,
            "A_VORBIS" => Codec::Vorbis,
            "A_OPUS" => Codec::Opus,
            "V_THEORA" => Codec::Theora,
            _ => Codec::Unknown,
        }
    }

    /// Number of codec-private pieces: the Xiph-laced header count for
    /// Vorbis and Theora, one otherwise (zero without CodecPrivate).
    pub fn codec_data_count(&self) -> u32 {
        self.codec_data.len() as u32
    }

    /// The `i`-th codec-private piece.
    pub fn codec_data(&self, i: usize) -> Option<&[u8]> {
        let private = self.entry.codec_private.as_ref()?;
        self.codec_data.get(i).map(|r| &private.0[r.clone()])
    }

    pub fn encoding(&self) -> TrackEncoding {
        let Some(encodings) = &self.entry.content_encodings else {
            return TrackEncoding::None;
        };
        let Some(first) = encodings.content_encoding.first() else {
            return TrackEncoding::None;
        };
        if encodings.content_encoding.len() > 1 {
            log::warn!(
                "Track {} has {} content encodings, using the first",
                self.number(),
                encodings.content_encoding.len()
            );
        }
        match *first.content_encoding_type {
            1 => TrackEncoding::Encryption {
                key_id: first
                    .content_encryption
                    .as_ref()
                    .and_then(|e| e.content_enc_key_id.as_ref())
                    .map(|k| k.0.clone())
                    .unwrap_or_default(),
            },
            _ => TrackEncoding::Compression {
                strip_header: first
                    .content_compression
                    .as_ref()
                    .and_then(|c| c.content_comp_settings.as_ref())
                    .map(|s| s.0.clone()),
            },
        }
    }

    pub(crate) fn is_encrypted(&self) -> bool {
        matches!(self.encoding(), TrackEncoding::Encryption { .. })
    }

    /// ContentEncKeyID bytes, for encrypted tracks.
    pub fn content_enc_key_id(&self) -> Option<&[u8]> {
        self.entry
            .content_encodings
            .as_ref()?
            .content_encoding
            .first()?
            .content_encryption
            .as_ref()?
            .content_enc_key_id
            .as_ref()
            .map(|k| k.0.as_slice())
    }

    /// Constant frame duration in nanoseconds, when declared.
    pub fn default_duration(&self) -> Option<u64> {
        self.entry.default_duration.map(|d| *d)
    }

    /// Video parameters; `None` unless this is a video track.
    pub fn video_params(&self) -> Option<VideoParams> {
        if self.kind() != TrackKind::Video {
            return None;
        }
        let video = self.entry.video.as_ref()?;
        let width = *video.pixel_width;
        let height = *video.pixel_height;
        Some(VideoParams {
            stereo_mode: *video.stereo_mode,
            alpha_mode: *video.alpha_mode,
            width,
            height,
            display_width: video.display_width.map_or(width, |w| *w),
            display_height: video.display_height.map_or(height, |h| *h),
            crop_top: *video.pixel_crop_top,
            crop_bottom: *video.pixel_crop_bottom,
            crop_left: *video.pixel_crop_left,
            crop_right: *video.pixel_crop_right,
        })
    }

    /// Audio parameters; `None` unless this is an audio track.
    pub fn audio_params(&self) -> Option<AudioParams> {
        if self.kind() != TrackKind::Audio {
            return None;
        }
        // A missing Audio element still yields the schema defaults.
        let default = crate::master::Audio::default();
        let audio = self.entry.audio.as_ref().unwrap_or(&default);
        Some(AudioParams {
            rate: *audio.sampling_frequency,
            channels: *audio.channels,
            depth: audio.bit_depth.map_or(0, |d| *d),
            codec_delay: self.entry.codec_delay.map_or(0, |d| *d),
            seek_preroll: self.entry.seek_preroll.map_or(0, |p| *p),
        })
    }
}

/// Split CodecPrivate into its pieces.
///
/// Vorbis and Theora pack several codec headers into one blob as a Xiph
/// lace: a count byte `n`, then `n` 255-run sizes, then the pieces with
/// the last one taking the remainder. Other codecs carry a single opaque
/// blob.
fn split_codec_private(entry: &TrackEntry) -> Vec<Range<usize>> {
    let Some(private) = entry.codec_private.as_ref() else {
        return Vec::new();
    };
    let blob = &private.0;
    let whole = vec![0..blob.len()];

    if !matches!(&*entry.codec_id.0, "A_VORBIS" | "V_THEORA") {
        return whole;
    }

    let Some(&count) = blob.first() else {
        return whole;
    };
    let mut pos = 1usize;
    let mut sizes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut size = 0usize;
        loop {
            let Some(&b) = blob.get(pos) else {
                log::warn!("Malformed laced CodecPrivate, exposing it whole");
                return whole;
            };
            pos += 1;
            size += b as usize;
            if b != 0xFF {
                break;
            }
        }
        sizes.push(size);
    }

    let mut out = Vec::with_capacity(count as usize + 1);
    let mut start = pos;
    for size in sizes {
        let end = start + size;
        if end > blob.len() {
            log::warn!("Malformed laced CodecPrivate, exposing it whole");
            return whole;
        }
        out.push(start..end);
        start = end;
    }
    out.push(start..blob.len());
    out
}
