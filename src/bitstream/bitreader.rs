//! BitReader: reads a packed bitstream, most significant bit first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!
use std::io::{self, Read};

const BUFFER_SIZE: usize = 1024 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 1Mbyte buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer cursor has reached the end
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        self.buffer.clear();
                        self.cursor = 0;
                        return Err(e);
                    }
                }
            };
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next n bits (n <= usize::BITS) as an integer, or None if the stream ends
    /// first.
    pub fn bint(&mut self, n: usize) -> io::Result<Option<usize>> {
        let mut result = 0_usize;
        let mut needed = n;

        // Finish a partial byte first, then take whole bytes, then a partial byte.
        while needed > 0 {
            if self.bit_index == 0 && !self.have_data()? {
                return Ok(None);
            }
            let available = 8 - self.bit_index;
            let take = needed.min(available);
            let bits = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (available - take);
            result = result << take | bits as usize;
            self.bit_index += take;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            needed -= take;
        }
        Ok(Some(result))
    }

    /// Returns every remaining whole byte. Any unread bits of a partial byte are dropped.
    pub fn rest(&mut self) -> io::Result<Vec<u8>> {
        if self.bit_index > 0 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        let mut result = self.buffer[self.cursor.min(self.buffer.len())..].to_vec();
        self.cursor = self.buffer.len();
        self.source.read_to_end(&mut result)?;
        Ok(result)
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
