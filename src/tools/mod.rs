//! The tools module provides the helpers around the block sort.
//!
//! The tools are:
//! - cli: Command line interface and run-time options.
//! - freq_count: Byte frequency count, the first step of key-indexed counting.
//! - mtf: Move-To-Front coder.
//!
pub mod cli;
pub mod freq_count;
pub mod mtf;
