//! Primitive codec for reading/writing packet fields
//!
//! Cursor types over a byte buffer. All multi-byte integers on this wire are
//! varints (unsigned LEB128, 7 data bits per byte, high bit = continuation,
//! at most 5 bytes for a u32). Strings are varint-length-prefixed UTF-8,
//! UUIDs are 16 big-endian bytes, and optional fields are preceded by a
//! one-byte presence flag.

use bytes::{BufMut, Bytes, BytesMut};
use std::string::FromUtf8Error;
use thiserror::Error;
use uuid::Uuid;

/// A varint continues past this many bytes only if the input is corrupt.
const MAX_VARINT_BYTES: usize = 5;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unexpected end of buffer: needed {needed} more byte(s), {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("varint longer than {MAX_VARINT_BYTES} bytes")]
    VarIntTooLong,

    #[error("invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Reads packet fields from a borrowed buffer.
///
/// Construction eagerly consumes the leading varint and exposes it as [`id`].
/// For a versioned packet that is the version; in a failed clientbound
/// envelope it is the error code; in a hello packet it is the environment.
///
/// [`id`]: PacketReader::id
#[derive(Debug)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// The leading varint of the buffer, consumed at construction.
    pub id: u32,
}

impl<'a> PacketReader<'a> {
    /// Wrap a buffer and consume its leading varint into `id`.
    pub fn new(buf: &'a [u8]) -> CodecResult<Self> {
        let mut reader = Self { buf, pos: 0, id: 0 };
        reader.id = reader.read_varint()?;
        Ok(reader)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn read_byte(&mut self) -> CodecResult<u8> {
        if self.pos >= self.buf.len() {
            return Err(CodecError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(CodecError::UnexpectedEof {
                needed: len - self.remaining(),
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_varint(&mut self) -> CodecResult<u32> {
        let mut value = 0u32;
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte()?;
            value |= u32::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarIntTooLong)
    }

    pub fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_varint()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_uuid(&mut self) -> CodecResult<Uuid> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.read_bytes(16)?);
        Ok(Uuid::from_bytes(bytes))
    }

    /// Read a presence-flagged optional field.
    ///
    /// When the flag byte is 0 no further bytes are consumed and `None` is
    /// returned; the field is absent, not present-with-default.
    pub fn read_optional<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> CodecResult<T>,
    ) -> CodecResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(read(self)?))
        } else {
            Ok(None)
        }
    }
}

/// Writes packet fields into an owned buffer.
///
/// Construction writes the leading varint (the packet's version, or an error
/// code / environment for the unversioned layouts). Writes are infallible;
/// call [`into_bytes`](PacketWriter::into_bytes) to take the result.
pub struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    /// Start a buffer whose leading varint is `id`.
    pub fn new(id: u32) -> Self {
        let mut writer = Self {
            buf: BytesMut::new(),
        };
        writer.write_varint(id);
        writer
    }

    pub fn write_varint(&mut self, mut value: u32) -> &mut Self {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                return self;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    pub fn write_string(&mut self, value: &str) -> &mut Self {
        self.write_varint(value.len() as u32);
        self.buf.put_slice(value.as_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.buf.put_u8(u8::from(value));
        self
    }

    pub fn write_uuid(&mut self, value: &Uuid) -> &mut Self {
        self.buf.put_slice(value.as_bytes());
        self
    }

    /// Write a presence-flagged optional field.
    ///
    /// Absent values emit a single 0 flag byte and nothing else.
    pub fn write_optional<T>(
        &mut self,
        value: Option<&T>,
        write: impl FnOnce(&mut Self, &T),
    ) -> &mut Self {
        match value {
            Some(inner) => {
                self.write_bool(true);
                write(self, inner);
            }
            None => {
                self.write_bool(false);
            }
        }
        self
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_roundtrip() {
        for value in [0u32, 1, 127, 128, 300, 25565, u32::MAX] {
            let mut writer = PacketWriter::new(value);
            writer.write_varint(value);
            let bytes = writer.into_bytes();

            let mut reader = PacketReader::new(&bytes).unwrap();
            assert_eq!(reader.id, value);
            assert_eq!(reader.read_varint().unwrap(), value);
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_varint_single_byte_values() {
        let bytes = PacketWriter::new(127).into_bytes();
        assert_eq!(&bytes[..], &[0x7F]);

        let bytes = PacketWriter::new(128).into_bytes();
        assert_eq!(&bytes[..], &[0x80, 0x01]);
    }

    #[test]
    fn test_varint_too_long() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let err = PacketReader::new(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::VarIntTooLong));
    }

    #[test]
    fn test_empty_buffer_fails() {
        let err = PacketReader::new(&[]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_string_roundtrip() {
        let mut writer = PacketWriter::new(1);
        writer.write_string("limbo");
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes).unwrap();
        assert_eq!(reader.read_string().unwrap(), "limbo");
    }

    #[test]
    fn test_string_truncated_fails() {
        let mut writer = PacketWriter::new(1);
        writer.write_string("limbo");
        let bytes = writer.into_bytes();

        // "limbo" needs 5 bytes but only 3 survive the truncation
        let mut reader = PacketReader::new(&bytes[..bytes.len() - 2]).unwrap();
        assert!(matches!(
            reader.read_string(),
            Err(CodecError::UnexpectedEof {
                needed: 2,
                remaining: 3
            })
        ));
    }

    #[test]
    fn test_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let mut writer = PacketWriter::new(1);
        writer.write_uuid(&uuid);
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes).unwrap();
        assert_eq!(reader.read_uuid().unwrap(), uuid);
    }

    #[test]
    fn test_optional_present_and_absent() {
        let mut writer = PacketWriter::new(1);
        writer.write_optional(Some(&"mega".to_string()), |w, v| {
            w.write_string(v);
        });
        writer.write_optional(None::<&String>, |w, v| {
            w.write_string(v);
        });
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes).unwrap();
        let present = reader.read_optional(PacketReader::read_string).unwrap();
        let absent = reader.read_optional(PacketReader::read_string).unwrap();
        assert_eq!(present.as_deref(), Some("mega"));
        assert_eq!(absent, None);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_absent_optional_consumes_one_byte() {
        let mut writer = PacketWriter::new(1);
        writer.write_optional(None::<&String>, |w, v| {
            w.write_string(v);
        });
        let bytes = writer.into_bytes();
        // version varint + flag byte, nothing else
        assert_eq!(bytes.len(), 2);
        assert_eq!(bytes[1], 0);
    }
}
