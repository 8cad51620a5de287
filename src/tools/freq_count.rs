use rayon::prelude::*;

/// Inputs above this size are counted in parallel chunks
const PAR_LIMIT: usize = 64_000;
/// 16k is pretty much the sweet spot for chunk size.
const CHUNK: usize = 16_000;

/// Returns a byte frequency table of the input data. Uses parallelism when data set is over 64k.
pub fn freqs(data: &[u8]) -> [u32; 256] {
    if data.len() > PAR_LIMIT {
        data.par_chunks(CHUNK)
            .fold(
                || [0_u32; 256],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || [0_u32; 256],
                |mut s, f| {
                    s.iter_mut().zip(f.iter()).for_each(|(a, b)| *a += b);
                    s
                },
            )
    } else {
        let mut freqs = [0_u32; 256];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}
