use super::circular_sort::{check_block, circular_suffix_sort_with, SortConfig};
use crate::error::{BwtError, Result};
use crate::tools::freq_count::freqs;
use log::{debug, info};

/// Burrows-Wheeler-Transform with the default sort configuration.
/// This returns a u32 Key and a u8 vec of the BWT data.
pub fn bwt_encode(block: &[u8]) -> Result<(u32, Vec<u8>)> {
    bwt_encode_with(block, &SortConfig::default())
}

/// Burrows-Wheeler-Transform. Sorts the rotations of the block, then takes the byte preceding
/// each sorted rotation. The key is the sorted position of the unrotated block.
pub fn bwt_encode_with(block: &[u8], config: &SortConfig) -> Result<(u32, Vec<u8>)> {
    let index = circular_suffix_sort_with(block, config)?;

    // Get key and BWT output
    let mut key = 0_u32;
    let mut bwt = vec![0; block.len()];
    for (i, &idx) in index.iter().enumerate() {
        if idx == 0 {
            key = i as u32;
            bwt[i] = block[block.len() - 1];
        } else {
            bwt[i] = block[(idx as usize) - 1];
        }
    }
    info!("BWT of {} bytes, key is {}.", block.len(), key);
    Ok((key, bwt))
}

/// Decode a Burrows-Wheeler-Transform when the caller also carries the block length. A last
/// column of any other length is rejected before decoding.
pub fn bwt_decode_sized(key: u32, bwt_in: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    if bwt_in.len() != expected_len {
        return Err(BwtError::PreconditionViolation(format!(
            "last column has {} bytes, expected {}",
            bwt_in.len(),
            expected_len
        )));
    }
    bwt_decode(key, bwt_in)
}

/// Decode a Burrows-Wheeler-Transform in linear time using key-indexed counting.
pub fn bwt_decode(key: u32, bwt_in: &[u8]) -> Result<Vec<u8>> {
    check_block(bwt_in)?;
    let end = bwt_in.len();
    if key as usize >= end {
        return Err(BwtError::InvalidInput(format!(
            "key {} is outside a block of {} bytes",
            key, end
        )));
    }

    // Convert frequency count to a cumulative sum of frequencies. freq[s] is the first row of
    // the sorted first column holding symbol s.
    let freq_in = freqs(bwt_in);
    let mut freq = [0_u32; 256];
    for i in 0..255 {
        freq[i + 1] = freq[i] + freq_in[i];
    }

    // One stable pass builds the first column and the successor of every row
    let mut first_col = vec![0_u8; end];
    let mut next = vec![0_u32; end];
    for (i, &s) in bwt_in.iter().enumerate() {
        let row = freq[s as usize] as usize;
        first_col[row] = s;
        next[row] = i as u32;
        freq[s as usize] += 1;
    }

    // Walk the rows from the key, emitting the first column as we go
    let mut out = Vec::with_capacity(end);
    let mut row = key as usize;
    for _ in 0..end {
        out.push(first_col[row]);
        row = next[row] as usize;
    }
    debug!("Inverse BWT restored {} bytes.", end);
    Ok(out)
}
