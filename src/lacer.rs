//! Handler for delacing frame data packed into a single block.

use crate::Error;
use crate::base::VInt64;
use crate::functional::Decode;
use smallvec::SmallVec;
use std::ops::Range;

/// Frame spans produced by delacing, relative to the laced data.
///
/// Inline capacity of four covers the common small lace without touching
/// the heap.
pub type FrameSpans = SmallVec<[Range<usize>; 4]>;

/// Handler for delacing operations on frame data.
pub enum Lacer {
    /// Xiph lacing (variable-size frames with 255-run size prefixes)
    Xiph,
    /// Fixed-size lacing (all frames have the same size)
    FixedSize,
    /// EBML lacing (variable-size frames with EBML-encoded sizes)
    Ebml,
}

impl Lacer {
    /// Decode a laced payload into frame spans.
    ///
    /// `data` starts at the lace head octet (frame count minus one); the
    /// size of the last frame is always deduced from the remainder. The
    /// spans returned are ranges into `data`, and their total always
    /// equals the bytes left after the size prefixes.
    pub fn delace(&self, data: &[u8]) -> crate::Result<FrameSpans> {
        let (&head, rest) = data.split_first().ok_or(Error::MalformedLacingData)?;
        let num_frames = head as usize + 1;

        match self {
            Lacer::Xiph => {
                let mut sizes = Vec::with_capacity(num_frames - 1);
                let mut pos = 1usize;
                for _ in 0..num_frames - 1 {
                    let mut size = 0usize;
                    loop {
                        let b = *data.get(pos).ok_or(Error::MalformedLacingData)?;
                        pos += 1;
                        size += b as usize;
                        if b != 0xFF {
                            break;
                        }
                    }
                    sizes.push(size);
                }
                Self::spans_from(pos, sizes, data.len())
            }
            Lacer::Ebml => {
                let mut rest_buf = rest;
                let mut sizes = Vec::with_capacity(num_frames - 1);
                let mut prev = 0i64;
                for i in 0..num_frames - 1 {
                    let vint = VInt64::decode(&mut rest_buf)
                        .map_err(|_| Error::MalformedLacingData)?;
                    if vint.is_unknown {
                        return Err(Error::MalformedLacingData);
                    }
                    let size = if i == 0 {
                        *vint as i64
                    } else {
                        // Subsequent sizes are range-shifted deltas.
                        let bias = (1i64 << (7 * vint.width as u32 - 1)) - 1;
                        prev + (*vint as i64 - bias)
                    };
                    if size < 0 {
                        return Err(Error::MalformedLacingData);
                    }
                    prev = size;
                    sizes.push(size as usize);
                }
                let pos = data.len() - rest_buf.len();
                Self::spans_from(pos, sizes, data.len())
            }
            Lacer::FixedSize => {
                let remaining = rest.len();
                if remaining % num_frames != 0 {
                    return Err(Error::MalformedLacingData);
                }
                let each = remaining / num_frames;
                let mut out = FrameSpans::new();
                for i in 0..num_frames {
                    let start = 1 + i * each;
                    out.push(start..start + each);
                }
                Ok(out)
            }
        }
    }

    /// Lay explicit frame sizes out from `pos`, the last frame taking the
    /// remainder.
    fn spans_from(pos: usize, sizes: Vec<usize>, total: usize) -> crate::Result<FrameSpans> {
        let mut out = FrameSpans::new();
        let mut start = pos;
        for size in sizes {
            let end = start.checked_add(size).ok_or(Error::MalformedLacingData)?;
            if end > total {
                return Err(Error::MalformedLacingData);
            }
            out.push(start..end);
            start = end;
        }
        if start > total {
            return Err(Error::MalformedLacingData);
        }
        out.push(start..total);
        Ok(out)
    }
}

// The Xiph lacing uses the same coding of size as found in the Ogg container [@?RFC3533].
// The Block data with laced frames is stored as follows:
//     Lacing Head on 1 Octet: Number of frames in the lace minus 1.
//     Lacing size of each frame except the last one.
//     Binary data of each frame consecutively.
// The lacing size is split into 255 values, stored as unsigned octets – for example, 500 is
// coded 255;245 or [0xFF 0xF5]. The size of the last frame is deduced from the size remaining
// in the Block after the other frames.
//
// The EBML lacing stores the first frame size as an unsigned EBML VINT and every following
// size as a signed VINT difference against the previous size, shifted by half the VINT range.
#[cfg(test)]
mod lacer_tests {
    use super::*;

    fn frames<'a>(data: &'a [u8], spans: &FrameSpans) -> Vec<&'a [u8]> {
        spans.iter().map(|r| &data[r.clone()]).collect()
    }

    #[test]
    fn test_xiph_lacing() {
        // 4 frames, sizes: 255, 256, 1, remaining
        let len = vec![0x03, 0xFF, 0x00, 0xFF, 0x1, 0x1];
        let frame0 = vec![2u8; 255];
        let frame1 = vec![42u8; 256];
        let frame2 = vec![38u8; 1];
        let frame3 = vec![100u8; 1];
        let data = [len, frame0, frame1, frame2, frame3].concat();

        let spans = Lacer::Xiph.delace(&data).unwrap();
        let f = frames(&data, &spans);
        assert_eq!(f.len(), 4);
        assert_eq!(f[0], &[2u8; 255]);
        assert_eq!(f[1], &[42u8; 256]);
        assert_eq!(f[2], &[38u8; 1]);
        assert_eq!(f[3], &[100u8; 1]);

        // 1 frame, size: remaining
        let len = vec![0x00];
        let frame0 = vec![2u8; 255];
        let data = [len, frame0].concat();
        let spans = Lacer::Xiph.delace(&data).unwrap();
        let f = frames(&data, &spans);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0], &[2u8; 255]);

        // 4 frames, sizes: 600, 3, 520, remaining
        let len = vec![0x03, 0xFF, 0xFF, 0x5A, 0x3, 0xFF, 0xFF, 0xA];
        assert_eq!(0xff + 0xff + 0x5A, 600);
        assert_eq!(0xff + 0xff + 0xA, 520);
        let frame0 = vec![2u8; 600];
        let frame1 = vec![42u8; 3];
        let frame2 = vec![38u8; 520];
        let frame3 = vec![100u8; 1];
        let data = [len, frame0, frame1, frame2, frame3].concat();

        let spans = Lacer::Xiph.delace(&data).unwrap();
        let f = frames(&data, &spans);
        assert_eq!(f.len(), 4);
        assert_eq!(f[0], &[2u8; 600]);
        assert_eq!(f[1], &[42u8; 3]);
        assert_eq!(f[2], &[38u8; 520]);
        assert_eq!(f[3], &[100u8; 1]);
    }

    #[test]
    fn test_xiph_sizes_overrun() {
        // Declared size exceeds the data.
        let data = vec![0x01, 0x20, 0xAA];
        assert!(matches!(
            Lacer::Xiph.delace(&data),
            Err(Error::MalformedLacingData)
        ));
    }

    #[test]
    fn test_ebml_lacing() {
        // 3 frames, sizes: 800, 500, remaining.
        // 800 = 0x43 0x20 as a 2-byte VINT; -300 signed is bias 0x1FFF
        // minus 300 = 0x5E 0xD3.
        let head = vec![0x02, 0x43, 0x20, 0x5E, 0xD3];
        let frame0 = vec![1u8; 800];
        let frame1 = vec![2u8; 500];
        let frame2 = vec![3u8; 100];
        let data = [head, frame0, frame1, frame2].concat();

        let spans = Lacer::Ebml.delace(&data).unwrap();
        let f = frames(&data, &spans);
        assert_eq!(f.len(), 3);
        assert_eq!(f[0], &[1u8; 800]);
        assert_eq!(f[1], &[2u8; 500]);
        assert_eq!(f[2], &[3u8; 100]);
    }

    #[test]
    fn test_ebml_lacing_growing_delta() {
        // 3 frames, sizes: 2, 5, remaining; +3 delta is 0x80 | (0x3F + 3).
        let head = vec![0x02, 0x82, 0x80 | 0x42];
        let frame0 = vec![9u8; 2];
        let frame1 = vec![8u8; 5];
        let frame2 = vec![7u8; 4];
        let data = [head, frame0, frame1, frame2].concat();

        let spans = Lacer::Ebml.delace(&data).unwrap();
        let f = frames(&data, &spans);
        assert_eq!(f.len(), 3);
        assert_eq!(f[0], &[9u8; 2]);
        assert_eq!(f[1], &[8u8; 5]);
        assert_eq!(f[2], &[7u8; 4]);
    }

    #[test]
    fn test_fixed_lacing() {
        let data = [vec![0x03], vec![5u8; 32]].concat();
        let spans = Lacer::FixedSize.delace(&data).unwrap();
        assert_eq!(spans.len(), 4);
        assert!(spans.iter().all(|r| r.len() == 8));

        // Remainder must divide evenly.
        let data = [vec![0x02], vec![5u8; 32]].concat();
        assert!(matches!(
            Lacer::FixedSize.delace(&data),
            Err(Error::MalformedLacingData)
        ));
    }

    #[test]
    fn test_span_total_matches_payload() {
        let data = [vec![0x01, 0x03], vec![0u8; 10]].concat();
        let spans = Lacer::Xiph.delace(&data).unwrap();
        let total: usize = spans.iter().map(|r| r.len()).sum();
        assert_eq!(total, 10);
    }
}
