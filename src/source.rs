//! Caller-supplied byte sources and the reader the demuxer drives them through.

use crate::base::{Header, VInt64};
use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// Outcome of a [`ByteSource::read`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// The buffer was filled completely.
    Filled,
    /// End of stream, nothing was copied.
    ///
    /// For a growing source this is a *soft* end: the caller may append
    /// more data and resume.
    Eos,
}

/// A demuxable byte stream.
///
/// `read` either fills the whole buffer or reports [`ReadStatus::Eos`]
/// with nothing consumed; partial reads are not part of the contract.
/// `seek` may fail for non-seekable sources, the demuxer tolerates that
/// wherever the format allows forward-only reading. Implementations that
/// cannot seek from the end should fail such seeks; the demuxer never
/// requires them.
pub trait ByteSource {
    /// Fill `buf` completely, or report end of stream.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<ReadStatus>;
    /// Reposition the stream, returning the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64>;
    /// Current absolute offset.
    fn tell(&mut self) -> std::io::Result<u64>;
}

/// Adapter for any `Read + Seek` stream, e.g. a `File` or `Cursor`.
#[derive(Debug)]
pub struct IoSource<R>(pub R);

impl<R: Read + Seek> ByteSource for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<ReadStatus> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.0.read(&mut buf[filled..])? {
                0 if filled == 0 => return Ok(ReadStatus::Eos),
                0 => {
                    // Data ends inside the requested span.
                    return Err(std::io::ErrorKind::UnexpectedEof.into());
                }
                n => filled += n,
            }
        }
        Ok(ReadStatus::Filled)
    }

    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.0.seek(pos)
    }

    fn tell(&mut self) -> std::io::Result<u64> {
        self.0.stream_position()
    }
}

/// Wraps a [`ByteSource`] with offset tracking and the optional read limit.
///
/// All parsing goes through this type. A read that would cross the limit
/// is reported as [`Error::SoftEos`] without consuming anything, the same
/// way a growing source reports its current end.
#[derive(Debug)]
pub struct SourceReader<S> {
    src: S,
    pos: u64,
    max_seen: u64,
    read_limit: Option<u64>,
}

impl<S: ByteSource> SourceReader<S> {
    pub fn new(mut src: S, read_limit: Option<u64>) -> Result<Self> {
        let pos = src.tell()?;
        Ok(Self {
            src,
            pos,
            max_seen: pos,
            read_limit,
        })
    }

    /// Current absolute offset.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Highest absolute offset observed so far.
    pub fn max_offset(&self) -> u64 {
        self.max_seen
    }

    pub fn into_inner(self) -> S {
        self.src
    }

    fn note_pos(&mut self, pos: u64) {
        self.pos = pos;
        if pos > self.max_seen {
            self.max_seen = pos;
        }
    }

    /// Fill `buf` completely or fail with [`Error::SoftEos`].
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if let Some(limit) = self.read_limit {
            if self.pos.saturating_add(buf.len() as u64) > limit {
                return Err(Error::SoftEos);
            }
        }
        match self.src.read(buf)? {
            ReadStatus::Filled => {
                self.note_pos(self.pos + buf.len() as u64);
                Ok(())
            }
            ReadStatus::Eos => Err(Error::SoftEos),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    /// Read `n` bytes into a fresh buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a variable-length integer from the stream.
    pub fn read_vint(&mut self) -> Result<VInt64> {
        let first = self.read_u8()?;
        if first == 0 {
            return Err(Error::InvalidVInt);
        }
        let extra = first.leading_zeros() as usize;
        let mut bytes = [0u8; 8];
        bytes[0] = first;
        if extra > 0 {
            self.read_exact(&mut bytes[1..=extra])?;
        }
        let mut s: &[u8] = &bytes[..=extra];
        crate::functional::Decode::decode(&mut s)
    }

    /// Read an element header.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly *before* the first
    /// byte of the header; an end of data after that is mid-element and
    /// surfaces as [`Error::SoftEos`].
    pub fn read_header_opt(&mut self) -> Result<Option<Header>> {
        let id = match self.read_vint() {
            Err(Error::SoftEos) => return Ok(None),
            other => other?,
        };
        let size = self.read_vint()?;
        Ok(Some(Header { id, size }))
    }

    /// Skip `n` bytes, by seeking when the source supports it.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        let target = self.pos.checked_add(n).ok_or(Error::OutOfBounds)?;
        if let Some(limit) = self.read_limit {
            if target > limit {
                return Err(Error::SoftEos);
            }
        }
        match self.src.seek(SeekFrom::Start(target)) {
            Ok(new_pos) => {
                self.note_pos(new_pos);
                Ok(())
            }
            Err(_) => {
                // Unseekable source: consume and discard.
                let mut scratch = [0u8; 4096];
                let mut left = n;
                while left > 0 {
                    let chunk = scratch.len().min(left as usize);
                    match self.src.read(&mut scratch[..chunk])? {
                        ReadStatus::Filled => {
                            self.note_pos(self.pos + chunk as u64);
                            left -= chunk as u64;
                        }
                        ReadStatus::Eos => return Err(Error::SoftEos),
                    }
                }
                Ok(())
            }
        }
    }

    /// Seek to an absolute offset. Fails for non-seekable sources.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        let new_pos = self.src.seek(SeekFrom::Start(offset))?;
        self.note_pos(new_pos);
        Ok(())
    }

    /// Whether the source honors absolute seeks, probed without moving.
    pub fn is_seekable(&mut self) -> bool {
        self.src.seek(SeekFrom::Start(self.pos)).is_ok()
    }
}
