//! Hand-assembled EBML streams for the integration tests.
#![allow(dead_code)]

/// Minimal-width EBML size VINT for `n`.
pub fn size_vint(n: u64) -> Vec<u8> {
    let mut width = 1usize;
    while n >= (1u64 << (7 * width)) - 1 {
        width += 1;
    }
    let marked = n | 1u64 << (7 * width);
    marked.to_be_bytes()[8 - width..].to_vec()
}

/// An element: ID bytes, minimal size, body.
pub fn el(id: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&size_vint(body.len() as u64));
    out.extend_from_slice(body);
    out
}

/// An element with the unknown-size marker.
pub fn el_unknown(id: &[u8], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.push(0xFF);
    out.extend_from_slice(body);
    out
}

/// Minimal big-endian body bytes of an unsigned integer.
pub fn uint(v: u64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(7);
    bytes[start..].to_vec()
}

pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    el(
        &[0x1A, 0x45, 0xDF, 0xA3],
        &[
            el(&[0x42, 0x82], doc_type.as_bytes()),
            el(&[0x42, 0x87], &[2]),
            el(&[0x42, 0x85], &[2]),
        ]
        .concat(),
    )
}

/// Info with the given scale and duration in ticks.
pub fn info(scale: u64, duration_ticks: Option<f64>) -> Vec<u8> {
    let mut body = el(&[0x2A, 0xD7, 0xB1], &uint(scale));
    if let Some(d) = duration_ticks {
        body.extend_from_slice(&el(&[0x44, 0x89], &d.to_be_bytes()));
    }
    el(&[0x15, 0x49, 0xA9, 0x66], &body)
}

/// A VP8 video TrackEntry.
pub fn video_track(number: u64, width: u64, height: u64) -> Vec<u8> {
    el(
        &[0xAE],
        &[
            el(&[0xD7], &uint(number)),
            el(&[0x83], &[1]),
            el(&[0x86], b"V_VP8"),
            el(
                &[0xE0],
                &[el(&[0xB0], &uint(width)), el(&[0xBA], &uint(height))].concat(),
            ),
        ]
        .concat(),
    )
}

/// A Vorbis audio TrackEntry with a three-piece laced CodecPrivate.
pub fn vorbis_track(number: u64, rate: f64, channels: u64, depth: u64) -> Vec<u8> {
    let mut private = vec![0x02, 30, 4];
    private.extend_from_slice(&[0x11; 30]);
    private.extend_from_slice(&[0x22; 4]);
    private.extend_from_slice(&[0x33; 11]);
    el(
        &[0xAE],
        &[
            el(&[0xD7], &uint(number)),
            el(&[0x83], &[2]),
            el(&[0x86], b"A_VORBIS"),
            el(&[0x63, 0xA2], &private),
            el(
                &[0xE1],
                &[
                    el(&[0xB5], &rate.to_be_bytes()),
                    el(&[0x9F], &uint(channels)),
                    el(&[0x62, 0x64], &uint(depth)),
                ]
                .concat(),
            ),
        ]
        .concat(),
    )
}

pub fn tracks(entries: &[Vec<u8>]) -> Vec<u8> {
    el(&[0x16, 0x54, 0xAE, 0x6B], &entries.concat())
}

/// A SimpleBlock with a single unlaced frame.
pub fn simple_block(track: u64, delta: i16, keyframe: bool, data: &[u8]) -> Vec<u8> {
    assert!(track < 0x7F);
    let mut payload = vec![0x80 | track as u8];
    payload.extend_from_slice(&delta.to_be_bytes());
    payload.push(if keyframe { 0x80 } else { 0x00 });
    payload.extend_from_slice(data);
    el(&[0xA3], &payload)
}

/// A cluster with the given timecode and block elements.
pub fn cluster(timecode: u64, blocks: &[Vec<u8>]) -> Vec<u8> {
    let body = [el(&[0xE7], &uint(timecode)), blocks.concat()].concat();
    el(&[0x1F, 0x43, 0xB6, 0x75], &body)
}

/// Same, but with the unknown-size marker on the Cluster.
pub fn cluster_unknown_size(timecode: u64, blocks: &[Vec<u8>]) -> Vec<u8> {
    let body = [el(&[0xE7], &uint(timecode)), blocks.concat()].concat();
    el_unknown(&[0x1F, 0x43, 0xB6, 0x75], &body)
}

/// A SeekHead with (target id bytes, segment-relative position) entries.
pub fn seek_head(entries: &[(&[u8], u64)]) -> Vec<u8> {
    let body: Vec<u8> = entries
        .iter()
        .map(|(id, pos)| {
            el(
                &[0x4D, 0xBB],
                &[el(&[0x53, 0xAB], id), el(&[0x53, 0xAC], &uint(*pos))].concat(),
            )
        })
        .collect::<Vec<_>>()
        .concat();
    el(&[0x11, 0x4D, 0x9B, 0x74], &body)
}

/// A one-track Cues index.
pub fn cues(entries: &[(u64, u64, u64)]) -> Vec<u8> {
    // (time, track, cluster_pos)
    let body: Vec<u8> = entries
        .iter()
        .map(|(time, track, pos)| {
            el(
                &[0xBB],
                &[
                    el(&[0xB3], &uint(*time)),
                    el(
                        &[0xB7],
                        &[el(&[0xF7], &uint(*track)), el(&[0xF1], &uint(*pos))].concat(),
                    ),
                ]
                .concat(),
            )
        })
        .collect::<Vec<_>>()
        .concat();
    el(&[0x1C, 0x53, 0xBB, 0x6B], &body)
}

pub fn segment(children: &[Vec<u8>]) -> Vec<u8> {
    el(&[0x18, 0x53, 0x80, 0x67], &children.concat())
}

pub fn segment_unknown_size(children: &[Vec<u8>]) -> Vec<u8> {
    el_unknown(&[0x18, 0x53, 0x80, 0x67], &children.concat())
}

/// The two-track file most scenarios start from: VP8 640x480 plus Vorbis
/// 48 kHz stereo, 5 s duration, two clusters of alternating blocks.
pub fn standard_file() -> Vec<u8> {
    let meta = [
        info(1_000_000, Some(5000.0)),
        tracks(&[video_track(1, 640, 480), vorbis_track(2, 48000.0, 2, 16)]),
    ];
    let clusters = [
        cluster(
            0,
            &[
                simple_block(1, 0, true, &[0xAA; 7]),
                simple_block(2, 2, false, &[0xBB; 5]),
                simple_block(1, 33, false, &[0xCC; 6]),
                simple_block(2, 35, false, &[0xDD; 4]),
            ],
        ),
        cluster(
            100,
            &[
                simple_block(1, 0, true, &[0xEE; 3]),
                simple_block(2, 1, false, &[0xFF; 2]),
            ],
        ),
    ];
    [
        ebml_header("webm"),
        segment(&[meta.concat(), clusters.concat()]),
    ]
    .concat()
}
