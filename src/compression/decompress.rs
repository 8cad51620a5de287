use log::info;

use super::compress::{run_inputs, Frame};
use super::compress_block::decompress_block;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::framing::read_keyed;
use crate::bwt_algorithms::bwt_sort::bwt_decode;
use crate::error::{BwtError, Result};
use crate::tools::cli::{BwOpts, Mode};
use crate::tools::mtf::mtf_decode;

/// Run the reverse modes (inverse, decode, decompress) over the inputs defined in opts.
pub fn decompress(opts: &BwOpts) -> Result<()> {
    run_inputs(opts, |source| {
        let mut br = BitReader::new(source);
        reverse(opts.op_mode, &mut br)
    })
}

/// Read one framed block and undo the mode that produced it.
pub fn reverse<R: std::io::Read>(mode: Mode, br: &mut BitReader<R>) -> Result<Frame> {
    match mode {
        Mode::Inverse => {
            let (key, bwt) = read_keyed(br)?;
            info!("Found key {} for a block of {} bytes.", key, bwt.len());
            Ok(Frame::Raw(bwt_decode(key, &bwt)?))
        }
        Mode::Decode => Ok(Frame::Raw(mtf_decode(&br.rest()?))),
        Mode::Decompress => {
            let (key, ranks) = read_keyed(br)?;
            info!("Found key {} for a block of {} bytes.", key, ranks.len());
            Ok(Frame::Raw(decompress_block(key, &ranks)?))
        }
        other => Err(BwtError::InvalidInput(format!(
            "{} is not a reverse mode",
            other
        ))),
    }
}
