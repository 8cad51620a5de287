use std::io::Write;

/// Writes a packed bitstream for output. Bits are queued most significant first and handed to
/// the writer as whole bytes.
pub struct BitWriter {
    /// Output buffer used to write the bitstream.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Handle to the output stream
    writer: Box<dyn Write + Send + Sync>,
}

impl BitWriter {
    /// Create a new BitWriter over any output stream.
    pub fn new(writer: Box<dyn Write + Send + Sync>) -> Self {
        Self {
            writer,
            output: Vec::with_capacity(64 * 1024),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn push_queue(&mut self) {
        // If the queue has less than 8 bits left, write all full bytes to the output buffer.
        if self.q_bits > 56 {
            while self.q_bits > 7 {
                let byte = (self.queue >> (self.q_bits - 8)) as u8;
                self.output.push(byte);
                self.q_bits -= 8;
            }
        }
    }

    /// Put the low `n` bits (1-32) of `data` on the stream.
    pub fn out_bits(&mut self, n: u8, data: u32) {
        debug_assert!((1..=32).contains(&n));
        if self.q_bits > 32 {
            self.drain_queue();
        }
        let mask = if n == 32 { u32::MAX } else { (1 << n) - 1 };
        self.queue <<= n;
        self.queue |= (data & mask) as u64;
        self.q_bits += n;
    }

    /// Put a byte on the stream.
    pub fn out8(&mut self, data: u8) {
        // Make sure the queue is empty enough to hold the data
        self.push_queue();
        self.queue <<= 8;
        self.queue |= data as u64;
        self.q_bits += 8;
    }

    /// Put a big-endian u32 on the stream.
    pub fn out32(&mut self, data: u32) {
        self.out_bits(32, data)
    }

    /// Put a slice of bytes on the stream.
    pub fn out_bytes(&mut self, data: &[u8]) {
        if self.q_bits == 0 {
            // Byte aligned and nothing queued, so skip the queue
            self.output.extend_from_slice(data);
        } else {
            data.iter().for_each(|&b| self.out8(b));
        }
    }

    /// Bytes written so far, including any still buffered.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.output.len(), self.q_bits)
    }

    /// Move every full byte in the queue to the output buffer.
    fn drain_queue(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits, and writes the buffer out. Flush MUST be called before the writer is
    /// dropped or data may be left in the internal queue.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.drain_queue();
        if self.q_bits > 0 {
            let byte = ((self.queue << (8 - self.q_bits)) & 0xff) as u8;
            self.output.push(byte);
            self.q_bits = 0;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Shared sink so the test can see what was written.
    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn writer() -> (BitWriter, Sink) {
        let sink = Sink::default();
        (BitWriter::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn out8_test() {
        let (mut bw, sink) = writer();
        bw.out8(b'x');
        bw.flush().unwrap();
        assert_eq!(*sink.0.lock().unwrap(), b"x");
    }

    #[test]
    fn last_bits_test() {
        let (mut bw, sink) = writer();
        bw.out8(255);
        bw.out_bits(3, 0b101);
        bw.flush().unwrap();
        assert_eq!(*sink.0.lock().unwrap(), vec![255, 0b1010_0000]);
    }

    #[test]
    fn out32_test() {
        let (mut bw, sink) = writer();
        bw.out32(3);
        bw.out_bytes(b"ARD");
        bw.flush().unwrap();
        assert_eq!(*sink.0.lock().unwrap(), vec![0, 0, 0, 3, b'A', b'R', b'D']);
    }

    #[test]
    fn long_stream_test() {
        let (mut bw, sink) = writer();
        for i in 0..100_u32 {
            bw.out32(i);
        }
        bw.flush().unwrap();
        let out = sink.0.lock().unwrap();
        assert_eq!(out.len(), 400);
        assert_eq!(out[396..], [0, 0, 0, 99]);
    }
}
