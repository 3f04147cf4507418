mod common;

use common::*;
use std::cell::Cell;
use std::io::{Cursor, SeekFrom};
use std::rc::Rc;
use webm_demux::prelude::*;
use webm_demux::Error;

/// A source that pretends to end at a movable offset, like a file that is
/// still being downloaded.
struct GrowingSource {
    data: Vec<u8>,
    pos: u64,
    visible: Rc<Cell<u64>>,
}

impl ByteSource for GrowingSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<ReadStatus> {
        let end = self.pos + buf.len() as u64;
        if end > self.visible.get().min(self.data.len() as u64) {
            return Ok(ReadStatus::Eos);
        }
        buf.copy_from_slice(&self.data[self.pos as usize..end as usize]);
        self.pos = end;
        Ok(ReadStatus::Filled)
    }

    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(o) => o as i64,
            SeekFrom::Current(o) => self.pos as i64 + o,
            SeekFrom::End(o) => self.data.len() as i64 + o,
        };
        if target < 0 || target as u64 > self.visible.get() {
            return Err(std::io::ErrorKind::InvalidInput.into());
        }
        self.pos = target as u64;
        Ok(self.pos)
    }

    fn tell(&mut self) -> std::io::Result<u64> {
        Ok(self.pos)
    }
}

fn packet_digest(p: &Packet) -> (u32, u64, Vec<Vec<u8>>) {
    let frames = (0..p.count() as usize)
        .map(|i| p.data(i).unwrap().to_vec())
        .collect();
    (p.track(), p.tstamp(), frames)
}

#[test]
fn truncated_file_reports_soft_eos() {
    let file = standard_file();
    // Cut inside the last cluster's block data.
    let limit = file.len() as u64 - 3;
    let options = DemuxerOptions {
        read_limit: Some(limit),
        ..Default::default()
    };
    let mut demuxer = Demuxer::with_options(IoSource(Cursor::new(file)), options).unwrap();

    let mut delivered = 0;
    let err = loop {
        match demuxer.read_packet() {
            Ok(Some(_)) => delivered += 1,
            Ok(None) => panic!("expected a soft end of stream"),
            Err(e) => break e,
        }
    };
    assert!(matches!(err, Error::SoftEos));
    // Everything before the cut came through.
    assert_eq!(delivered, 5);

    // Still parked until a reset; metadata is untouched.
    assert!(matches!(demuxer.read_packet(), Err(Error::SoftEos)));
    assert_eq!(demuxer.track_count(), 2);
    assert_eq!(demuxer.duration().unwrap(), 5_000_000_000);

    // Resetting without more data just parks again at the same element.
    demuxer.read_reset().unwrap();
    assert!(matches!(demuxer.read_packet(), Err(Error::SoftEos)));
}

#[test]
fn growing_source_delivers_every_packet_once() {
    let file = standard_file();

    // Reference sequence over the complete file.
    let mut reference = Demuxer::new(IoSource(Cursor::new(file.clone()))).unwrap();
    let mut expected = Vec::new();
    while let Some(p) = reference.read_packet().unwrap() {
        expected.push(packet_digest(&p));
    }
    assert!(!expected.is_empty());

    // Byte-by-byte growth: init once it is possible, then read and reset
    // until the source has grown to the full file.
    let visible = Rc::new(Cell::new(0u64));
    let total = file.len() as u64;
    let mut demuxer = loop {
        let source = GrowingSource {
            data: file.clone(),
            pos: 0,
            visible: visible.clone(),
        };
        match Demuxer::new(source) {
            Ok(d) => break d,
            Err(_) => {
                assert!(visible.get() < total, "init never succeeded");
                visible.set(visible.get() + 1);
            }
        }
    };

    let mut got = Vec::new();
    loop {
        match demuxer.read_packet() {
            Ok(Some(p)) => got.push(packet_digest(&p)),
            Ok(None) => break,
            Err(Error::SoftEos) => {
                if visible.get() >= total {
                    panic!("soft EOS with the whole file visible");
                }
                visible.set(visible.get() + 1);
                demuxer.read_reset().unwrap();
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(got, expected);
}
