//! Move-To-Front coding of a byte stream.
//!
//! Every byte is replaced by its position in a recency list of all 256 byte values, and that
//! value is then moved to the front of the list. Runs of the same byte (which the BWT produces
//! in abundance) become runs of zero, and recently seen bytes get small ranks.
//!
//! The recency list is state owned by one `MoveToFront` value. Encoding and decoding must each
//! start from a fresh (identity) list for the ranks to line up.
//!
use crate::error::{BwtError, Result};
use log::trace;

/// Recency list for Move-To-Front coding.
#[derive(Clone, Debug)]
pub struct MoveToFront {
    /// Position of each byte value in the recency list
    rank: [u8; 256],
    /// Byte value at each position of the recency list
    symbols: [u8; 256],
}

impl MoveToFront {
    /// Creates a recency list in identity order: value v at position v.
    pub fn new() -> Self {
        let mut symbols = [0_u8; 256];
        symbols
            .iter_mut()
            .enumerate()
            .for_each(|(i, s)| *s = i as u8);
        Self {
            rank: symbols,
            symbols,
        }
    }

    /// Return to identity order, ready for an unrelated stream.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current position of `byte` in the recency list.
    pub fn rank_of(&self, byte: u8) -> u8 {
        self.rank[byte as usize]
    }

    /// Emit the rank of `byte` and move it to the front.
    pub fn encode_byte(&mut self, byte: u8) -> u8 {
        let position = self.rank[byte as usize];
        self.promote(byte, position as usize);
        position
    }

    /// Emit the byte at `rank` and move it to the front.
    pub fn decode_rank(&mut self, rank: u8) -> u8 {
        let byte = self.symbols[rank as usize];
        self.promote(byte, rank as usize);
        byte
    }

    /// As `decode_rank`, for ranks carried in a wider integer type.
    pub fn decode_wide(&mut self, rank: usize) -> Result<u8> {
        match u8::try_from(rank) {
            Ok(rank) => Ok(self.decode_rank(rank)),
            Err(_) => Err(BwtError::InvalidInput(format!(
                "rank {} is outside [0, 256)",
                rank
            ))),
        }
    }

    /// Encode a run of bytes, continuing from the current list.
    pub fn encode(&mut self, data: &[u8]) -> Vec<u8> {
        data.iter().map(|&b| self.encode_byte(b)).collect()
    }

    /// Decode a run of ranks, continuing from the current list.
    pub fn decode(&mut self, ranks: &[u8]) -> Vec<u8> {
        ranks.iter().map(|&r| self.decode_rank(r)).collect()
    }

    /// Shift every value in front of `position` one slot back and put `byte` in front.
    fn promote(&mut self, byte: u8, position: usize) {
        for p in (0..position).rev() {
            let moved = self.symbols[p];
            self.symbols[p + 1] = moved;
            self.rank[moved as usize] = (p + 1) as u8;
        }
        self.symbols[0] = byte;
        self.rank[byte as usize] = 0;
    }
}

impl Default for MoveToFront {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode data using Move To Front transform, starting from identity order.
pub fn mtf_encode(data: &[u8]) -> Vec<u8> {
    let ranks = MoveToFront::new().encode(data);
    trace!(
        "MTF encoded {} bytes, {} zero ranks.",
        ranks.len(),
        ranks.iter().filter(|&&r| r == 0).count()
    );
    ranks
}

/// Decode Move To Front ranks, starting from identity order.
pub fn mtf_decode(ranks: &[u8]) -> Vec<u8> {
    MoveToFront::new().decode(ranks)
}

/// Decode Move To Front ranks held in u16s. Any rank of 256 or more is rejected.
pub fn mtf_decode_wide(ranks: &[u16]) -> Result<Vec<u8>> {
    let mut mtf = MoveToFront::new();
    ranks
        .iter()
        .map(|&r| mtf.decode_wide(r as usize))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_vector_test() {
        assert_eq!(mtf_encode(&[65, 65, 65, 66]), vec![65, 0, 0, 66]);
        assert_eq!(mtf_decode(&[65, 0, 0, 66]), vec![65, 65, 65, 66]);
    }

    #[test]
    fn abracadabra_test() {
        let data = b"ABRACADABRA!";
        let ranks = mtf_encode(data);
        assert_eq!(ranks, vec![65, 66, 82, 2, 68, 1, 69, 1, 4, 4, 2, 38]);
        assert_eq!(mtf_decode(&ranks), data);
    }

    #[test]
    fn list_stays_consistent_test() {
        let mut mtf = MoveToFront::new();
        mtf.encode(b"the quick brown fox jumps over the lazy dog");
        for v in 0..=255_u8 {
            assert_eq!(mtf.symbols[mtf.rank_of(v) as usize], v);
        }
    }

    #[test]
    fn reset_test() {
        let mut mtf = MoveToFront::new();
        assert_eq!(mtf.encode(b"zz"), vec![b'z', 0]);
        mtf.reset();
        assert_eq!(mtf.encode_byte(b'z'), b'z');
    }

    #[test]
    fn wide_rank_test() {
        assert_eq!(mtf_decode_wide(&[65, 0, 0, 66]).unwrap(), vec![65, 65, 65, 66]);
        assert!(matches!(
            mtf_decode_wide(&[65, 256]),
            Err(BwtError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_test() {
        assert!(mtf_encode(&[]).is_empty());
        assert!(mtf_decode(&[]).is_empty());
    }
}
