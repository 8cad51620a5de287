use std::io::Read;

use log::trace;

use super::bitreader::BitReader;
use super::bitwriter::BitWriter;
use crate::error::{BwtError, Result};

/// Put a keyed block on the stream: the key as a big-endian u32, then the data bytes.
pub fn write_keyed(bw: &mut BitWriter, key: u32, data: &[u8]) {
    trace!("Writing key {} at {}.", key, bw.loc());
    bw.out32(key);
    bw.out_bytes(data);
}

/// Read a keyed block written by write_keyed. The data runs to the end of the stream.
pub fn read_keyed<R: Read>(br: &mut BitReader<R>) -> Result<(u32, Vec<u8>)> {
    let key = match br.bint(32)? {
        Some(key) => key as u32,
        None => {
            return Err(BwtError::InvalidInput(
                "stream ends before the 32-bit key".to_string(),
            ))
        }
    };
    trace!("Read key {} at {}.", key, br.loc());
    let data = br.rest()?;
    trace!("Read {} data bytes.", data.len());
    Ok((key, data))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_keyed_test() {
        let stream = [0_u8, 0, 0, 3, b'A', b'R', b'D', b'!'];
        let mut br = BitReader::new(stream.as_slice());
        assert_eq!(read_keyed(&mut br).unwrap(), (3, b"ARD!".to_vec()));
    }

    #[test]
    fn truncated_key_test() {
        let mut br = BitReader::new([0_u8, 1].as_slice());
        assert!(matches!(
            read_keyed(&mut br),
            Err(BwtError::InvalidInput(_))
        ));
    }
}
