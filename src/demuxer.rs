//! The streaming demuxer: metadata assembly and lazy packet iteration.

use std::collections::VecDeque;

use crate::base::{Header, VInt64};
use crate::block::{BlockLayout, EncryptionSignal};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::functional::Buf;
use crate::leaf::Timestamp;
use crate::master::{BlockGroup, Cues, Ebml, Info, SeekHead, Tracks};
use crate::packet::{Keyframe, Packet};
use crate::schema;
use crate::source::{ByteSource, SourceReader};
use crate::track::Track;

const SEGMENT_ID: VInt64 = VInt64::from_encoded(0x18538067);
const CLUSTER_ID: VInt64 = VInt64::from_encoded(0x1F43B675);
const SIMPLE_BLOCK_ID: VInt64 = VInt64::from_encoded(0xA3);

const SEGMENT_ENC: u64 = 0x18538067;
const CLUSTER_ENC: u64 = 0x1F43B675;

/// Highest DocTypeReadVersion this crate accepts.
const MAX_DOCTYPE_READ_VERSION: u64 = 4;

/// Knobs for [`Demuxer`] construction.
#[derive(Debug, Clone)]
pub struct DemuxerOptions {
    /// Absolute offset the source must not be read past; reads that would
    /// cross it behave like a soft end of stream.
    pub read_limit: Option<u64>,
    /// Cap on a single element payload held in memory.
    pub max_payload: u64,
}

impl Default for DemuxerOptions {
    fn default() -> Self {
        Self {
            read_limit: None,
            max_payload: 16 * 1024 * 1024,
        }
    }
}

/// A resolved cue point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CuePointInfo {
    /// Absolute byte offset of the cued Cluster.
    pub start: u64,
    /// Absolute end of that Cluster: the next cued Cluster's start, or the
    /// Segment end, or unknown.
    pub end: Option<u64>,
    /// Cue timestamp in nanoseconds.
    pub tstamp: u64,
    /// Matroska track number the cue addresses.
    pub track: u64,
    /// 1-based block number within the Cluster.
    pub block_number: u64,
}

#[derive(Debug, Copy, Clone)]
struct CueEntry {
    time: u64,
    track: u64,
    cluster_pos: u64,
    block_number: u64,
}

#[derive(Debug, Copy, Clone)]
struct ClusterState {
    /// Absolute offset of the Cluster element header.
    start: u64,
    /// Absolute end of the payload, or `None` for unknown size.
    payload_end: Option<u64>,
    timecode: Option<u64>,
}

/// Metadata riding along with a block until its packet is built.
#[derive(Debug, Default, Clone)]
struct BlockMeta {
    from_group: bool,
    duration_ticks: Option<u64>,
    reference_ticks: Option<i64>,
    discard_padding_ns: Option<i64>,
    additions: Vec<(u64, Vec<u8>)>,
}

/// A block seen before its cluster's Timecode, held until it arrives.
#[derive(Debug)]
struct PendingBlock {
    payload: Vec<u8>,
    meta: BlockMeta,
}

#[derive(Debug, Copy, Clone)]
struct RestorePoint {
    pos: u64,
    cluster: Option<ClusterState>,
}

/// A streaming WebM/Matroska demultiplexer over a [`ByteSource`].
///
/// Construction parses the EBML header and enough of the Segment to expose
/// segment info, tracks and (when reachable) cues; packets then come out
/// of [`read_packet`](Self::read_packet) lazily, in file order.
#[derive(Debug)]
pub struct Demuxer<S> {
    src: SourceReader<S>,
    max_payload: u64,
    seekable: bool,

    info: Info,
    tracks: Vec<Track>,
    cues: Option<Vec<CueEntry>>,
    /// Seek-Head targets: element ID -> absolute offset.
    seek_entries: Vec<(VInt64, u64)>,

    segment_data_start: u64,
    segment_end: Option<u64>,

    /// Header read but not yet dispatched, with its start offset.
    peeked: Option<(u64, Header)>,
    cluster: Option<ClusterState>,
    pending: VecDeque<PendingBlock>,
    ready: VecDeque<Packet>,
    restore: RestorePoint,
    /// Set by a soft end of stream; reads stay parked until `read_reset`.
    needs_reset: bool,
    fatal: bool,
}

impl<S: ByteSource> Demuxer<S> {
    /// Open a demuxer with default options.
    pub fn new(source: S) -> Result<Self> {
        Self::with_options(source, DemuxerOptions::default())
    }

    /// Open a demuxer, parsing metadata up through Tracks.
    pub fn with_options(source: S, options: DemuxerOptions) -> Result<Self> {
        let mut src = SourceReader::new(source, options.read_limit)?;
        let seekable = src.is_seekable();
        let max_payload = options.max_payload;

        // EBML header, the mandatory spine.
        let header = src
            .read_header_opt()?
            .ok_or(Error::MissingElement(Ebml::ID))?;
        if header.id != Ebml::ID {
            return Err(Error::MissingElement(Ebml::ID));
        }
        let body = read_body(&mut src, &header, max_payload)?;
        let ebml: Ebml = decode_from(&body)?;
        if !matches!(&*ebml.doc_type.0, "matroska" | "webm") {
            return Err(Error::UnsupportedDocType(ebml.doc_type.0));
        }
        if *ebml.doc_type_read_version > MAX_DOCTYPE_READ_VERSION {
            return Err(Error::UnsupportedReadVersion(*ebml.doc_type_read_version));
        }

        // Find the Segment, tolerating Void and stray elements in between.
        let segment = loop {
            let header = src
                .read_header_opt()?
                .ok_or(Error::MissingElement(SEGMENT_ID))?;
            if header.id == SEGMENT_ID {
                break header;
            }
            match header.payload_size() {
                Some(size) => src.skip(size)?,
                None => return Err(Error::ElementOverrun { id: header.id }),
            }
        };
        let segment_data_start = src.position();
        let segment_end = segment
            .payload_size()
            .map(|s| segment_data_start.saturating_add(s));

        let mut this = Self {
            src,
            max_payload,
            seekable,
            info: Info::default(),
            tracks: Vec::new(),
            cues: None,
            seek_entries: Vec::new(),
            segment_data_start,
            segment_end,
            peeked: None,
            cluster: None,
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            restore: RestorePoint {
                pos: segment_data_start,
                cluster: None,
            },
            needs_reset: false,
            fatal: false,
        };
        this.init_segment()?;
        this.restore = RestorePoint {
            pos: this.peeked.map_or(this.src.position(), |(pos, _)| pos),
            cluster: None,
        };
        Ok(this)
    }

    /// Scan Segment children up to the first Cluster, then chase Seek-Head
    /// entries for anything mandatory that sits beyond it.
    fn init_segment(&mut self) -> Result<()> {
        let mut info = None;
        let mut tracks = None;

        loop {
            if let Some(end) = self.segment_end {
                if self.src.position() >= end {
                    break;
                }
            }
            let pos = self.src.position();
            let Some(header) = self.src.read_header_opt()? else {
                break;
            };
            if self.segment_end.is_none() && !schema::is_child_of(header.id, SEGMENT_ENC) {
                // An unknown-size Segment ends at the first stray ID.
                self.peeked = Some((pos, header));
                break;
            }
            match header.id {
                SeekHead::ID => {
                    let body = read_body(&mut self.src, &header, self.max_payload)?;
                    let seek_head: SeekHead = decode_from(&body)?;
                    for seek in seek_head.seek {
                        if let Some(target) = seek.target_id() {
                            let offset =
                                self.segment_data_start.saturating_add(*seek.seek_position);
                            self.seek_entries.push((target, offset));
                        }
                    }
                }
                Info::ID => {
                    let body = read_body(&mut self.src, &header, self.max_payload)?;
                    info = Some(decode_from::<Info>(&body)?);
                }
                Tracks::ID => {
                    let body = read_body(&mut self.src, &header, self.max_payload)?;
                    tracks = Some(decode_from::<Tracks>(&body)?);
                }
                Cues::ID => {
                    let body = read_body(&mut self.src, &header, self.max_payload)?;
                    self.store_cues(&body);
                }
                CLUSTER_ID => {
                    self.peeked = Some((pos, header));
                    break;
                }
                _ => {
                    log::debug!("Init scan skipping {}", schema::name_of(header.id));
                    match header.payload_size() {
                        Some(size) => self.src.skip(size)?,
                        None => return Err(Error::ElementOverrun { id: header.id }),
                    }
                }
            }
        }

        // Whatever the forward scan missed may be reachable via Seek-Head.
        let stashed = self.peeked;
        if self.seekable {
            let mut wanted: Vec<VInt64> = Vec::new();
            if info.is_none() {
                wanted.push(Info::ID);
            }
            if tracks.is_none() {
                wanted.push(Tracks::ID);
            }
            if self.cues.is_none() {
                wanted.push(Cues::ID);
            }
            for target in wanted {
                let Some(&(_, offset)) = self.seek_entries.iter().find(|(id, _)| *id == target)
                else {
                    continue;
                };
                if self.src.seek_to(offset).is_err() {
                    continue;
                }
                let Some(header) = self.src.read_header_opt()? else {
                    continue;
                };
                if header.id != target {
                    log::warn!(
                        "Seek-Head points {} at a {} element, ignoring",
                        schema::name_of(target),
                        schema::name_of(header.id)
                    );
                    continue;
                }
                let body = read_body(&mut self.src, &header, self.max_payload)?;
                match header.id {
                    Info::ID => info = Some(decode_from::<Info>(&body)?),
                    Tracks::ID => tracks = Some(decode_from::<Tracks>(&body)?),
                    Cues::ID => self.store_cues(&body),
                    _ => unreachable!(),
                }
            }
            if let Some((pos, _)) = stashed {
                // Return to the first cluster; it is re-read from its header.
                self.src.seek_to(pos)?;
                self.peeked = None;
            }
        } else if tracks.is_none() || info.is_none() {
            // Forward-only source with media before metadata: walk over
            // clusters until the metadata shows up. Packets inside the
            // skipped clusters cannot be revisited.
            log::warn!("Tracks follow media data on an unseekable source, skipping ahead");
            self.peeked = stashed;
            loop {
                let Some((_, header)) = self.take_header()? else {
                    break;
                };
                match header.id {
                    Info::ID => {
                        let body = read_body(&mut self.src, &header, self.max_payload)?;
                        info = Some(decode_from::<Info>(&body)?);
                    }
                    Tracks::ID => {
                        let body = read_body(&mut self.src, &header, self.max_payload)?;
                        tracks = Some(decode_from::<Tracks>(&body)?);
                    }
                    Cues::ID => {
                        let body = read_body(&mut self.src, &header, self.max_payload)?;
                        self.store_cues(&body);
                    }
                    CLUSTER_ID => match header.payload_size() {
                        Some(size) => self.src.skip(size)?,
                        None => self.skip_unknown_cluster()?,
                    },
                    _ => match header.payload_size() {
                        Some(size) => self.src.skip(size)?,
                        None => return Err(Error::ElementOverrun { id: header.id }),
                    },
                }
                if tracks.is_some() && info.is_some() {
                    break;
                }
            }
        }

        let info = info.ok_or(Error::MissingElement(Info::ID))?;
        let tracks = tracks.ok_or(Error::MissingElement(Tracks::ID))?;

        if *info.timestamp_scale == 0 {
            return Err(Error::RangeViolation {
                id: crate::leaf::TimestampScale::ID,
            });
        }
        if let Some(duration) = info.duration {
            if !duration.is_finite() || *duration < 0.0 {
                return Err(Error::RangeViolation {
                    id: crate::leaf::Duration::ID,
                });
            }
        }

        self.info = info;
        for entry in tracks.entries {
            let number = *entry.track_number;
            if self.tracks.iter().any(|t| t.number() == number) {
                log::warn!("Dropping duplicate track number {}", number);
                continue;
            }
            self.tracks.push(Track::from_entry(entry));
        }
        if self.tracks.is_empty() {
            return Err(Error::MissingElement(Tracks::ID));
        }
        Ok(())
    }

    /// Decode a Cues body leniently; a malformed index is dropped, not fatal.
    fn store_cues(&mut self, body: &[u8]) {
        match decode_from::<Cues>(body) {
            Ok(cues) => {
                let mut entries = Vec::new();
                for point in cues.cue_point {
                    for pos in point.cue_track_positions {
                        entries.push(CueEntry {
                            time: *point.cue_time,
                            track: *pos.cue_track,
                            cluster_pos: *pos.cue_cluster_position,
                            block_number: *pos.cue_block_number,
                        });
                    }
                }
                self.cues = Some(entries);
            }
            Err(e) => log::warn!("Dropping malformed Cues: {}", e),
        }
    }

    /// Walk the children of an unknown-size Cluster without decoding them,
    /// leaving the terminating header in the peek slot.
    fn skip_unknown_cluster(&mut self) -> Result<()> {
        loop {
            let pos = self.src.position();
            let Some(header) = self.src.read_header_opt()? else {
                return Ok(());
            };
            if !schema::is_child_of(header.id, CLUSTER_ENC) {
                self.peeked = Some((pos, header));
                return Ok(());
            }
            match header.payload_size() {
                Some(size) => self.src.skip(size)?,
                None => return Err(Error::ElementOverrun { id: header.id }),
            }
        }
    }

    /// Next header, from the peek slot or the stream.
    fn take_header(&mut self) -> Result<Option<(u64, Header)>> {
        if let Some(peeked) = self.peeked.take() {
            return Ok(Some(peeked));
        }
        let pos = self.src.position();
        Ok(self.src.read_header_opt()?.map(|h| (pos, h)))
    }

    // ------------------------------------------------------------------
    // Metadata accessors.

    /// Number of tracks in the Segment.
    pub fn track_count(&self) -> u32 {
        self.tracks.len() as u32
    }

    /// The `i`-th track, in parse order. The index is what
    /// [`Packet::track`] refers to and is unrelated to the Matroska track
    /// number.
    pub fn track(&self, i: u32) -> Option<&Track> {
        self.tracks.get(i as usize)
    }

    /// All tracks, in parse order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Nanoseconds per timecode tick.
    pub fn timecode_scale(&self) -> u64 {
        *self.info.timestamp_scale
    }

    /// Segment duration in nanoseconds.
    pub fn duration(&self) -> Result<u64> {
        let duration = self.info.duration.ok_or(Error::Absent)?;
        Ok((*duration * self.timecode_scale() as f64) as u64)
    }

    /// Segment title, when present.
    pub fn title(&self) -> Option<&str> {
        self.info.title.as_deref()
    }

    /// Muxing application, when present.
    pub fn muxing_app(&self) -> Option<&str> {
        self.info.muxing_app.as_deref()
    }

    /// Writing application, when present.
    pub fn writing_app(&self) -> Option<&str> {
        self.info.writing_app.as_deref()
    }

    /// Whether a cue index is present or reachable through the Seek-Head.
    pub fn has_cues(&self) -> bool {
        self.cues.is_some() || self.seek_entries.iter().any(|(id, _)| *id == Cues::ID)
    }

    /// Resolve the `i`-th cue point in file order.
    ///
    /// Loads the cue index through the Seek-Head on first use when the
    /// initial scan did not pass over it.
    pub fn cue_point(&mut self, i: usize) -> Result<CuePointInfo> {
        if self.cues.is_none() {
            self.load_cues_via_seek_head()?;
        }
        let scale = self.timecode_scale();
        let segment_data_start = self.segment_data_start;
        let segment_end = self.segment_end;
        let entries = self.cues.as_ref().ok_or(Error::Absent)?;
        let entry = entries.get(i).ok_or(Error::Absent)?;
        let start = segment_data_start.saturating_add(entry.cluster_pos);
        let end = entries[i..]
            .iter()
            .find(|e| e.cluster_pos > entry.cluster_pos)
            .map(|e| segment_data_start.saturating_add(e.cluster_pos))
            .or(segment_end);
        Ok(CuePointInfo {
            start,
            end,
            tstamp: entry.time.saturating_mul(scale),
            track: entry.track,
            block_number: entry.block_number,
        })
    }

    fn load_cues_via_seek_head(&mut self) -> Result<()> {
        let Some(&(_, offset)) = self.seek_entries.iter().find(|(id, _)| *id == Cues::ID) else {
            return Ok(());
        };
        if !self.seekable {
            return Ok(());
        }
        let here = self.src.position();
        self.src.seek_to(offset)?;
        let result = (|| -> Result<()> {
            let Some(header) = self.src.read_header_opt()? else {
                return Ok(());
            };
            if header.id != Cues::ID {
                return Ok(());
            }
            let body = read_body(&mut self.src, &header, self.max_payload)?;
            self.store_cues(&body);
            Ok(())
        })();
        self.src.seek_to(here)?;
        result
    }

    // ------------------------------------------------------------------
    // Packet iteration.

    /// Pull the next packet, in file order.
    ///
    /// `Ok(None)` is the clean end of the stream. [`Error::SoftEos`] means
    /// the source ran dry mid-element; once the caller has extended it,
    /// [`read_reset`](Self::read_reset) rewinds to replay the interrupted
    /// element. Any other error is terminal.
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        if self.fatal {
            return Err(Error::Io(std::io::Error::other(
                "demuxer is in a failed state",
            )));
        }
        loop {
            if let Some(packet) = self.ready.pop_front() {
                return Ok(Some(packet));
            }
            if self.needs_reset {
                // Parked mid-element; only read_reset may move us.
                return Err(Error::SoftEos);
            }
            self.restore = RestorePoint {
                pos: self.peeked.map_or(self.src.position(), |(pos, _)| pos),
                cluster: self.cluster,
            };
            match self.next_element() {
                Ok(true) => continue,
                Ok(false) => {
                    if !self.pending.is_empty() {
                        log::warn!(
                            "Dropping {} blocks from a cluster with no Timecode",
                            self.pending.len()
                        );
                        self.pending.clear();
                    }
                    return Ok(None);
                }
                Err(e) => {
                    if e.is_fatal() {
                        self.fatal = true;
                    } else if matches!(e, Error::SoftEos) {
                        self.needs_reset = true;
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Rewind to the element interrupted by a soft end of stream.
    ///
    /// Metadata and already-delivered packets are unaffected; parsing
    /// resumes exactly where [`Error::SoftEos`] cut it off, so a caller
    /// feeding a growing source sees each packet once. Not callable after
    /// a fatal error.
    pub fn read_reset(&mut self) -> Result<()> {
        if self.fatal {
            return Err(Error::Io(std::io::Error::other(
                "demuxer is in a failed state",
            )));
        }
        self.src.seek_to(self.restore.pos)?;
        self.cluster = self.restore.cluster;
        self.peeked = None;
        self.needs_reset = false;
        Ok(())
    }

    /// Process one element; `false` means the stream ended cleanly.
    fn next_element(&mut self) -> Result<bool> {
        match self.cluster {
            None => self.next_segment_element(),
            Some(cluster) => self.next_cluster_element(cluster),
        }
    }

    fn next_segment_element(&mut self) -> Result<bool> {
        if let Some(end) = self.segment_end {
            if self.peeked.is_none() && self.src.position() >= end {
                return Ok(false);
            }
        }
        let Some((pos, header)) = self.take_header()? else {
            // A known-size Segment promises more data than the source has.
            if self.segment_end.is_some_and(|end| self.src.position() < end) {
                return Err(Error::SoftEos);
            }
            return Ok(false);
        };
        if self.segment_end.is_none() && !schema::is_child_of(header.id, SEGMENT_ENC) {
            // Stray ID ends an unknown-size Segment.
            log::debug!(
                "Element {} ends the unknown-size Segment",
                schema::name_of(header.id)
            );
            return Ok(false);
        }
        if header.id == CLUSTER_ID {
            let payload_end = match header.payload_size() {
                Some(size) => Some(
                    self.src
                        .position()
                        .checked_add(size)
                        .ok_or(Error::ElementOverrun { id: header.id })?,
                ),
                None => None,
            };
            self.cluster = Some(ClusterState {
                start: pos,
                payload_end,
                timecode: None,
            });
            return Ok(true);
        }
        // Metadata after the media: pick up a late cue index, skip the rest.
        if header.id == Cues::ID && self.cues.is_none() {
            let body = read_body(&mut self.src, &header, self.max_payload)?;
            self.store_cues(&body);
            return Ok(true);
        }
        log::debug!("Skipping {} between clusters", schema::name_of(header.id));
        match header.payload_size() {
            Some(size) => self.src.skip(size)?,
            None => return Err(Error::ElementOverrun { id: header.id }),
        }
        Ok(true)
    }

    fn next_cluster_element(&mut self, cluster: ClusterState) -> Result<bool> {
        if let Some(end) = cluster.payload_end {
            if self.peeked.is_none() && self.src.position() >= end {
                self.close_cluster();
                return Ok(true);
            }
        }
        let Some((pos, header)) = self.take_header()? else {
            if cluster.payload_end.is_some_and(|end| self.src.position() < end) {
                return Err(Error::SoftEos);
            }
            // A stream may end cleanly inside an unknown-size cluster.
            self.close_cluster();
            return Ok(false);
        };
        if cluster.payload_end.is_none() && !schema::is_child_of(header.id, CLUSTER_ENC) {
            // The unknown-size cluster ends at this header; leave it for
            // the segment level.
            self.close_cluster();
            self.peeked = Some((pos, header));
            return Ok(true);
        }

        // Children must stay inside a known-size cluster.
        if let (Some(end), Some(size)) = (cluster.payload_end, header.payload_size()) {
            if self.src.position().saturating_add(size) > end {
                return Err(Error::ElementOverrun { id: header.id });
            }
        }

        match header.id {
            Timestamp::ID => {
                let body = read_body(&mut self.src, &header, self.max_payload)?;
                let timecode = decode_from::<Timestamp>(&body)?;
                self.set_timecode(*timecode)?;
            }
            SIMPLE_BLOCK_ID => {
                let payload = read_body(&mut self.src, &header, self.max_payload)?;
                self.take_block(payload, BlockMeta::default())?;
            }
            BlockGroup::ID => {
                let body = read_body(&mut self.src, &header, self.max_payload)?;
                let group: BlockGroup = decode_from(&body)?;
                let meta = BlockMeta {
                    from_group: true,
                    duration_ticks: group.block_duration.map(|d| *d),
                    reference_ticks: group.reference_block.first().map(|r| **r),
                    discard_padding_ns: group.discard_padding.map(|d| *d),
                    additions: group
                        .block_additions
                        .map(|additions| {
                            additions
                                .block_more
                                .into_iter()
                                .map(|more| (*more.block_add_id, more.block_additional.0))
                                .collect()
                        })
                        .unwrap_or_default(),
                };
                self.take_block(group.block.0, meta)?;
            }
            _ => {
                log::debug!("Skipping {} in cluster", schema::name_of(header.id));
                match header.payload_size() {
                    Some(size) => self.src.skip(size)?,
                    None => return Err(Error::ElementOverrun { id: header.id }),
                }
            }
        }
        Ok(true)
    }

    fn close_cluster(&mut self) {
        if !self.pending.is_empty() {
            log::warn!(
                "Dropping {} blocks from a cluster with no Timecode",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.cluster = None;
    }

    /// Record the cluster timecode and release any blocks that arrived
    /// ahead of it.
    fn set_timecode(&mut self, timecode: u64) -> Result<()> {
        if let Some(cluster) = self.cluster.as_mut() {
            if cluster.timecode.is_some() {
                log::warn!("Cluster carries a second Timecode, keeping the first");
                return Ok(());
            }
            cluster.timecode = Some(timecode);
        }
        while let Some(block) = self.pending.pop_front() {
            if let Some(packet) = self.build_packet(block.payload, block.meta, timecode)? {
                self.ready.push_back(packet);
            }
        }
        Ok(())
    }

    fn take_block(&mut self, payload: Vec<u8>, meta: BlockMeta) -> Result<()> {
        match self.cluster.and_then(|c| c.timecode) {
            Some(timecode) => {
                if let Some(packet) = self.build_packet(payload, meta, timecode)? {
                    self.ready.push_back(packet);
                }
            }
            None => {
                // Timecode is semantically first; tolerate muxers that
                // write it late by holding the block.
                self.pending.push_back(PendingBlock { payload, meta });
            }
        }
        Ok(())
    }

    /// Turn one block payload into a packet. `Ok(None)` drops the block
    /// (unknown track).
    fn build_packet(
        &self,
        payload: Vec<u8>,
        meta: BlockMeta,
        cluster_timecode: u64,
    ) -> Result<Option<Packet>> {
        let layout = BlockLayout::parse(&payload)?;

        let Some(track_index) = self
            .tracks
            .iter()
            .position(|t| t.number() == layout.track_number)
        else {
            log::warn!("Dropping block for unknown track {}", layout.track_number);
            return Ok(None);
        };
        let track = &self.tracks[track_index];

        let mut frames = layout.frames;
        let encryption = if track.is_encrypted() {
            if frames.len() != 1 {
                return Err(Error::Unsupported("laced blocks on an encrypted track"));
            }
            let span = &mut frames[0];
            let (signal, consumed) = EncryptionSignal::parse(&payload[span.clone()])?;
            span.start += consumed;
            signal
        } else {
            EncryptionSignal::None
        };

        let scale = self.timecode_scale();
        let abs_timecode = (cluster_timecode as i64).saturating_add(layout.delta as i64).max(0);
        let timestamp_ns = (abs_timecode as u64).saturating_mul(scale);
        let duration_ns = meta
            .duration_ticks
            .map(|ticks| ticks.saturating_mul(scale))
            .or_else(|| track.default_duration());
        let keyframe = if meta.from_group {
            if meta.reference_ticks.is_some() {
                Keyframe::No
            } else {
                Keyframe::Yes
            }
        } else if layout.keyframe {
            Keyframe::Yes
        } else {
            Keyframe::No
        };

        Ok(Some(Packet {
            track: track_index as u32,
            timestamp_ns,
            duration_ns,
            keyframe,
            invisible: layout.invisible,
            discardable: layout.discardable,
            payload,
            frames,
            additions: meta.additions,
            reference_block_ns: meta.reference_ticks.map(|t| t.saturating_mul(scale as i64)),
            discard_padding_ns: meta.discard_padding_ns,
            encryption,
        }))
    }
}

/// Read an element payload into memory, applying the payload cap.
fn read_body<S: ByteSource>(
    src: &mut SourceReader<S>,
    header: &Header,
    max_payload: u64,
) -> Result<Vec<u8>> {
    let size = header
        .payload_size()
        .ok_or(Error::ElementOverrun { id: header.id })?;
    if size > max_payload {
        return Err(Error::PayloadTooLarge {
            id: header.id,
            size,
            limit: max_payload,
        });
    }
    src.read_bytes(size as usize)
}

/// Decode a buffered element body, mapping boundary errors the way
/// `DecodeElement` does.
fn decode_from<T: Element>(body: &[u8]) -> Result<T> {
    let mut buf = body;
    let element = match T::decode_body(&mut buf) {
        Ok(e) => e,
        Err(Error::OutOfBounds) => return Err(Error::OverDecode(T::ID)),
        Err(Error::ShortRead) => return Err(Error::UnderDecode(T::ID)),
        Err(e) => return Err(e),
    };
    if buf.has_remaining() {
        return Err(Error::UnderDecode(T::ID));
    }
    Ok(element)
}
