use log::debug;

use crate::bwt_algorithms::bwt_sort::{bwt_decode, bwt_encode_with};
use crate::bwt_algorithms::circular_sort::SortConfig;
use crate::error::Result;
use crate::tools::mtf::{mtf_decode, mtf_encode};

/// Run one block through the BWT and then Move-To-Front. Returns the BWT key and the ranks.
pub fn compress_block(block: &[u8], config: &SortConfig) -> Result<(u32, Vec<u8>)> {
    let (key, bwt) = bwt_encode_with(block, config)?;
    let ranks = mtf_encode(&bwt);

    debug!(
        "{} bytes in block, {} zero ranks after MTF.",
        block.len(),
        ranks.iter().filter(|&&r| r == 0).count()
    );
    Ok((key, ranks))
}

/// Undo compress_block: Move-To-Front decode, then the inverse BWT.
pub fn decompress_block(key: u32, ranks: &[u8]) -> Result<Vec<u8>> {
    let bwt = mtf_decode(ranks);
    bwt_decode(key, &bwt)
}
