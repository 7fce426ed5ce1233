//! Frame encoding and reply parsing for the DWIN protocol.
//!
//! Frame format:
//! - HEADER (1 byte): 0xAA synchronization byte
//! - COMMAND (1 byte): command identifier
//! - PAYLOAD: command-specific fields, multi-byte values big-endian
//! - TAIL (4 bytes): CC 33 C3 3C

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_HEADER: u8 = 0xAA;

/// Frame terminator
pub const FRAME_TAIL: [u8; 4] = [0xCC, 0x33, 0xC3, 0x3C];

/// Size of the controller's receive buffer, header included, tail excluded
pub const SEND_BUFFER_SIZE: usize = 101;

/// Maximum complete frame size (send buffer + TAIL)
pub const MAX_FRAME_SIZE: usize = SEND_BUFFER_SIZE + FRAME_TAIL.len();

/// Maximum payload carried by a reply
pub const MAX_REPLY_SIZE: usize = 16;

/// Errors that can occur during frame encoding or reply parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Reply exceeds the reply buffer
    ReplyTooLarge,
}

/// Appends big-endian fields to a byte buffer, tracking a running offset
///
/// Each call is independent: the writer holds no state besides the offset.
/// Values are written as-is; range checking is the caller's contract.
pub struct FrameWriter<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> FrameWriter<'a> {
    /// Start a frame for `command` at the beginning of `buf`
    pub fn start(buf: &'a mut [u8], command: u8) -> Result<Self, FrameError> {
        let mut writer = Self { buf, offset: 0 };
        writer.byte(FRAME_HEADER)?;
        writer.byte(command)?;
        Ok(writer)
    }

    /// Current write offset
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left before the send buffer limit (the tail is not counted)
    pub fn remaining(&self) -> usize {
        SEND_BUFFER_SIZE
            .min(self.buf.len().saturating_sub(FRAME_TAIL.len()))
            .saturating_sub(self.offset)
    }

    /// Append one byte
    pub fn byte(&mut self, value: u8) -> Result<(), FrameError> {
        let slot = self
            .buf
            .get_mut(self.offset)
            .ok_or(FrameError::BufferTooSmall)?;
        *slot = value;
        self.offset += 1;
        Ok(())
    }

    /// Append a 16-bit word, big-endian
    pub fn word(&mut self, value: u16) -> Result<(), FrameError> {
        self.bytes(&value.to_be_bytes())
    }

    /// Append a 32-bit value, big-endian
    pub fn long(&mut self, value: u32) -> Result<(), FrameError> {
        self.bytes(&value.to_be_bytes())
    }

    /// Append a 64-bit signed value, big-endian
    pub fn int64(&mut self, value: i64) -> Result<(), FrameError> {
        self.bytes(&value.to_be_bytes())
    }

    /// Append raw bytes
    pub fn bytes(&mut self, data: &[u8]) -> Result<(), FrameError> {
        let end = self.offset + data.len();
        let dest = self
            .buf
            .get_mut(self.offset..end)
            .ok_or(FrameError::BufferTooSmall)?;
        dest.copy_from_slice(data);
        self.offset = end;
        Ok(())
    }

    /// Append at most `limit` bytes of `text`, further truncated to what the
    /// controller's buffer can hold
    ///
    /// Returns the number of bytes written.
    pub fn string(&mut self, text: &str, limit: u16) -> Result<usize, FrameError> {
        let len = text.len().min(limit as usize).min(self.remaining());
        self.bytes(&text.as_bytes()[..len])?;
        Ok(len)
    }

    /// Append the tail and return the total frame length
    pub fn finish(mut self) -> Result<usize, FrameError> {
        self.bytes(&FRAME_TAIL)?;
        Ok(self.offset)
    }
}

/// A reply frame read back from the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Command the reply belongs to
    pub command: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_REPLY_SIZE>,
}

impl Reply {
    /// True for the `AA 00 'O' 'K'` handshake answer
    pub fn is_handshake_ok(&self) -> bool {
        self.command == 0x00 && self.payload.as_slice() == b"OK"
    }
}

/// State machine for parsing replies
///
/// The controller only answers the handshake, so this is deliberately small:
/// it syncs on the header and ends a frame when the tail is seen.
#[derive(Debug, Clone)]
pub struct ReplyParser {
    state: ParseState,
    body: Vec<u8, { MAX_REPLY_SIZE + 5 }>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for HEADER byte
    WaitingForHeader,
    /// Collecting command, payload and tail bytes
    Reading,
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyParser {
    /// Create a new reply parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForHeader,
            body: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForHeader;
        self.body.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(reply))` when a complete reply is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on overflow.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Reply>, FrameError> {
        match self.state {
            ParseState::WaitingForHeader => {
                if byte == FRAME_HEADER {
                    self.body.clear();
                    self.state = ParseState::Reading;
                }
                Ok(None)
            }
            ParseState::Reading => {
                if self.body.push(byte).is_err() {
                    self.reset();
                    return Err(FrameError::ReplyTooLarge);
                }
                if self.body.len() > FRAME_TAIL.len() && self.body.ends_with(&FRAME_TAIL) {
                    let end = self.body.len() - FRAME_TAIL.len();
                    let mut payload = Vec::new();
                    // Cannot fail: body capacity exceeds payload capacity by the
                    // command byte plus the tail
                    let _ = payload.extend_from_slice(&self.body[1..end]);
                    let reply = Reply {
                        command: self.body[0],
                        payload,
                    };
                    self.reset();
                    return Ok(Some(reply));
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete reply found, if any.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Reply>, FrameError> {
        for &byte in bytes {
            if let Some(reply) = self.feed(byte)? {
                return Ok(Some(reply));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_big_endian_fields() {
        let mut buf = [0u8; 32];
        let mut w = FrameWriter::start(&mut buf, 0x14).unwrap();
        w.word(0x1234).unwrap();
        w.long(0xA1B2_C3D4).unwrap();
        let len = w.finish().unwrap();

        assert_eq!(len, 2 + 2 + 4 + 4);
        assert_eq!(
            &buf[..len],
            &[0xAA, 0x14, 0x12, 0x34, 0xA1, 0xB2, 0xC3, 0xD4, 0xCC, 0x33, 0xC3, 0x3C]
        );
    }

    #[test]
    fn test_writer_negative_int64_sign_extends() {
        let mut buf = [0u8; 16];
        let mut w = FrameWriter::start(&mut buf, 0x14).unwrap();
        w.int64(-2).unwrap();
        assert_eq!(w.offset(), 10);
        assert_eq!(&buf[2..10], &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_writer_string_limit() {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let mut w = FrameWriter::start(&mut buf, 0x11).unwrap();
        let written = w.string("Hello", 3).unwrap();
        assert_eq!(written, 3);
        assert_eq!(&buf[2..5], b"Hel");
    }

    #[test]
    fn test_writer_string_truncated_to_send_buffer() {
        let long = "0123456789012345678901234567890123456789012345678901234567890123456789\
                    0123456789012345678901234567890123456789";
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let mut w = FrameWriter::start(&mut buf, 0x11).unwrap();
        let written = w.string(long, u16::MAX).unwrap();
        assert_eq!(written, SEND_BUFFER_SIZE - 2);
        assert_eq!(w.finish().unwrap(), MAX_FRAME_SIZE);
    }

    #[test]
    fn test_writer_buffer_too_small() {
        let mut buf = [0u8; 4];
        let mut w = FrameWriter::start(&mut buf, 0x03).unwrap();
        assert_eq!(w.long(1), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_handshake_reply() {
        let mut parser = ReplyParser::new();
        let reply = parser
            .feed_bytes(&[0xAA, 0x00, b'O', b'K', 0xCC, 0x33, 0xC3, 0x3C])
            .unwrap()
            .unwrap();
        assert!(reply.is_handshake_ok());
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let mut parser = ReplyParser::new();
        let data = [0x00, 0x13, 0xAA, 0x00, b'O', b'K', 0xCC, 0x33, 0xC3, 0x3C];
        let reply = parser.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(reply.command, 0x00);
        assert_eq!(reply.payload.as_slice(), b"OK");
    }

    #[test]
    fn test_parser_overflow_resets() {
        let mut parser = ReplyParser::new();
        let mut result = Ok(None);
        let _ = parser.feed(FRAME_HEADER);
        for _ in 0..32 {
            result = parser.feed(0x01);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(FrameError::ReplyTooLarge));
    }

    #[test]
    fn test_non_ok_reply() {
        let mut parser = ReplyParser::new();
        let reply = parser
            .feed_bytes(&[0xAA, 0x00, b'N', b'O', 0xCC, 0x33, 0xC3, 0x3C])
            .unwrap()
            .unwrap();
        assert!(!reply.is_handshake_ok());
    }
}
