//! The compression module runs blocks through the front end in either direction.
//!
//! Compression happens in the following steps:
//! - Burrows Wheeler Transform: Sort the rotations of the block so that bytes with similar
//!   following context end up together, producing runs of identical bytes.
//! - Move To Front transform: Turn those runs into runs of zero and favour small ranks overall.
//!
//! The rank stream is what an entropy coder would take next. Decompression is the inverse:
//! - MTF decode: Convert the ranks back to the symbols they stand for.
//! - BWT reversal: Restore the original block from the transform and its key.
//!
//! Each stage can also be run on its own (modes transform/inverse and encode/decode).
//!
pub mod compress;
pub mod compress_block;
pub mod decompress;
