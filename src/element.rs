use crate::base::*;
use crate::error::Error;
use crate::functional::*;

/// A Matroska element.
pub trait Element: Sized {
    const ID: VInt64;
    const HAS_DEFAULT_VALUE: bool = false;
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self>;
}

impl<T: Element> Decode for T {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        let header = Header::decode(buf)?;
        let body_size = *header.size as usize;
        if buf.remaining() < body_size {
            return Err(Error::OutOfBounds);
        }
        let mut body = buf.slice(body_size);
        let element = match T::decode_body(&mut body) {
            Ok(e) => e,
            Err(Error::OutOfBounds) => return Err(Error::OverDecode(Self::ID)),
            Err(Error::ShortRead) => return Err(Error::UnderDecode(Self::ID)),
            Err(e) => return Err(e),
        };

        if body.has_remaining() {
            return Err(Error::UnderDecode(Self::ID));
        }

        buf.advance(body_size);
        Ok(element)
    }
}

/// Speculative decode: yields the element only when the next header in the
/// buffer carries its ID, consuming nothing otherwise.
impl<T: Element> Decode for Option<T> {
    fn decode(buf: &mut &[u8]) -> crate::Result<Self> {
        let mut peek = *buf;
        let Ok(header) = Header::decode(&mut peek) else {
            return Ok(None);
        };
        if header.id != T::ID {
            return Ok(None);
        }
        *buf = peek;
        T::decode_element(&header, buf).map(Some)
    }
}
