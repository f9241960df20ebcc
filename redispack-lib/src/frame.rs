//! A Redis protocol frame and the utilities for parsing it from a byte buffer.

use bytes::{Buf, Bytes};
use std::fmt;
use std::io::Cursor;
use std::num::TryFromIntError;
use std::string::FromUtf8Error;

/// A frame in the Redis protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Null,
    Array(Vec<Frame>),
}

#[derive(Debug)]
pub enum Error {
    /// Not enough data is available to parse a message
    Incomplete,

    /// Invalid message encoding
    Other(crate::Error),
}

/// Building a command frame entry by entry.
pub(crate) trait PushFrame {
    fn push_bulk(&mut self, bytes: Bytes);
}

impl PushFrame for Vec<Frame> {
    fn push_bulk(&mut self, bytes: Bytes) {
        self.push(Frame::Bulk(bytes));
    }
}

impl From<Vec<Frame>> for Frame {
    fn from(frames: Vec<Frame>) -> Frame {
        Frame::Array(frames)
    }
}

impl Frame {
    /// Checks if an entire message can be decoded from `src`.
    ///
    /// On success the cursor is left right after the end of the frame.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                let _ = get_signed(src)?;
                Ok(())
            }
            b'$' => {
                if b'-' == peek_u8(src)? {
                    // Skip '-1\r\n'
                    skip(src, 4)
                } else {
                    let len: usize = get_decimal(src)?.try_into()?;

                    // skip that number of bytes + 2 (\r\n).
                    skip(src, bulk_end(len)?)
                }
            }
            b'*' => {
                let len = get_decimal(src)?;

                for _ in 0..len {
                    Frame::check(src)?;
                }

                Ok(())
            }
            actual => Err(format!("protocol error; invalid frame type byte `{actual}`").into()),
        }
    }

    /// The message has already been validated with `check`.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?.to_vec();
                let string = String::from_utf8(line)?;

                Ok(Frame::Simple(string))
            }
            b'-' => {
                let line = get_line(src)?.to_vec();
                let string = String::from_utf8(line)?;

                Ok(Frame::Error(string))
            }
            b':' => {
                let value = get_signed(src)?;
                Ok(Frame::Integer(value))
            }
            b'$' => {
                if b'-' == peek_u8(src)? {
                    let line = get_line(src)?;

                    if line != b"-1" {
                        return Err("protocol error; invalid frame format".into());
                    }

                    Ok(Frame::Null)
                } else {
                    let len: usize = get_decimal(src)?.try_into()?;
                    let n = bulk_end(len)?;

                    if src.remaining() < n {
                        return Err(Error::Incomplete);
                    }

                    let data = Bytes::copy_from_slice(&src.chunk()[..len]);

                    // skip that number of bytes + 2 (\r\n).
                    skip(src, n)?;

                    Ok(Frame::Bulk(data))
                }
            }
            b'*' => {
                let len: usize = get_decimal(src)?.try_into()?;
                let mut out = Vec::with_capacity(len);

                for _ in 0..len {
                    out.push(Frame::parse(src)?);
                }

                Ok(Frame::Array(out))
            }
            actual => Err(format!("protocol error; invalid frame type byte `{actual}`").into()),
        }
    }

    /// Converts the frame to an "unexpected frame" error
    pub(crate) fn to_error(&self) -> crate::Error {
        format!("unexpected frame: {self}").into()
    }
}

impl PartialEq<&str> for Frame {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Frame::Simple(s) => s.eq(other),
            Frame::Bulk(s) => s.eq(other),
            _ => false,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use std::str;

        match self {
            Frame::Simple(response) => response.fmt(fmt),
            Frame::Error(msg) => write!(fmt, "error: {msg}"),
            Frame::Integer(num) => num.fmt(fmt),
            Frame::Bulk(msg) => match str::from_utf8(msg) {
                Ok(string) => string.fmt(fmt),
                Err(_) => write!(fmt, "{msg:?}"),
            },
            Frame::Null => "(nil)".fmt(fmt),
            Frame::Array(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(fmt, " ")?;
                    }
                    part.fmt(fmt)?;
                }

                Ok(())
            }
        }
    }
}

fn peek_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.chunk()[0])
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }

    Ok(src.get_u8())
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<(), Error> {
    if src.remaining() < n {
        return Err(Error::Incomplete);
    }

    src.advance(n);
    Ok(())
}

/// Read a new-line terminated length
fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<u64, Error> {
    let line = get_line(src)?;

    atoi::atoi::<u64>(line).ok_or_else(|| "protocol error; invalid frame format".into())
}

/// Read a new-line terminated integer reply, which may be negative
fn get_signed(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;

    atoi::atoi::<i64>(line).ok_or_else(|| "protocol error; invalid frame format".into())
}

/// Bytes taken by a bulk payload of `len` bytes and its trailing `\r\n`.
fn bulk_end(len: usize) -> Result<usize, Error> {
    len.checked_add(2)
        .ok_or_else(|| "protocol error; bulk length out of range".into())
}

/// Find a line
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    // Scan the bytes directly
    #[allow(clippy::cast_possible_truncation)]
    let start = src.position() as usize;
    // Scan to the second to last byte
    let end = src.get_ref().len().saturating_sub(1);

    for i in start..end {
        if src.get_ref()[i] == b'\r' && src.get_ref()[i + 1] == b'\n' {
            // We found a line, update the position to be *after* the \n
            src.set_position((i + 2) as u64);

            // Return the line
            return Ok(&src.get_ref()[start..i]);
        }
    }

    Err(Error::Incomplete)
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src.into())
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl From<TryFromIntError> for Error {
    fn from(_src: TryFromIntError) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Incomplete => "stream ended early".fmt(fmt),
            Error::Other(err) => err.fmt(fmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(src: &[u8]) -> Result<Frame, Error> {
        let mut cursor = Cursor::new(src);
        Frame::check(&mut cursor)?;
        cursor.set_position(0);
        Frame::parse(&mut cursor)
    }

    #[test]
    fn parses_integer_and_null() {
        assert_eq!(parse_all(b":42\r\n").unwrap(), Frame::Integer(42));
        assert_eq!(parse_all(b"$-1\r\n").unwrap(), Frame::Null);
    }

    #[test]
    fn parses_binary_bulk_inside_array() {
        let frame = parse_all(b"*2\r\n$4\r\nhkey\r\n$3\r\n\x00\r\n\r\n").unwrap();

        assert_eq!(
            frame,
            Frame::Array(vec![
                Frame::Bulk(Bytes::from_static(b"hkey")),
                Frame::Bulk(Bytes::from_static(b"\x00\r\n")),
            ])
        );
    }

    #[test]
    fn partial_frame_is_incomplete() {
        let mut cursor = Cursor::new(&b"*2\r\n$4\r\nhkey\r\n$3\r\n"[..]);
        assert!(matches!(Frame::check(&mut cursor), Err(Error::Incomplete)));
    }

    #[test]
    fn negative_integer() {
        assert_eq!(parse_all(b":-1\r\n").unwrap(), Frame::Integer(-1));
        assert_eq!(parse_all(b":-42\r\n").unwrap(), Frame::Integer(-42));
    }

    #[test]
    fn oversized_bulk_length_is_rejected() {
        let src = b"$18446744073709551615\r\nabc\r\n";

        let mut cursor = Cursor::new(&src[..]);
        assert!(matches!(Frame::check(&mut cursor), Err(Error::Other(_))));

        // `parse` does not rely on `check` having run first
        let mut cursor = Cursor::new(&src[..]);
        assert!(matches!(Frame::parse(&mut cursor), Err(Error::Other(_))));
    }

    #[test]
    fn bulk_length_past_the_buffer_is_incomplete() {
        let mut cursor = Cursor::new(&b"$9223372036854775807\r\nabc\r\n"[..]);
        assert!(matches!(Frame::check(&mut cursor), Err(Error::Incomplete)));
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let mut cursor = Cursor::new(&b"?oops\r\n"[..]);
        assert!(matches!(Frame::check(&mut cursor), Err(Error::Other(_))));
    }
}
