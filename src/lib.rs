//! Block-sorting front end for compressors: circular suffix sorting, the Burrows-Wheeler
//! Transform and its inverse, and a Move-To-Front coder.
//!
//! Version 0.1.0
//!
//! The transform works on one block held fully in memory. Compression runs the block through
//! the BWT, which clusters similar contexts so that runs of identical bytes appear, then through
//! MTF, which turns those runs into runs of small ranks. The rank stream is what an entropy coder
//! would consume next; that stage is not part of this crate.
//!
//! Basic usage of the binary:
//!
//! `$> blocksort test.txt`
//!
//! This writes test.txt.bsz (key followed by the MTF ranks of the BWT output).
//! `$> blocksort -d test.txt.bsz` restores it.
//!
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod error;
pub mod tools;

pub use bwt_algorithms::bwt_sort::{bwt_decode, bwt_decode_sized, bwt_encode, bwt_encode_with};
pub use bwt_algorithms::circular_sort::{
    circular_suffix_sort, circular_suffix_sort_with, compare_rotations, SortConfig,
};
pub use compression::compress_block::{compress_block, decompress_block};
pub use error::{BwtError, Result};
pub use tools::mtf::{mtf_decode, mtf_decode_wide, mtf_encode, MoveToFront};
