//! The bitstream module forms the I/O subsystem of the block-sorting front end.
//!
//! The transform's boundary contract is a 32-bit big-endian key followed by the n last-column
//! bytes; the MTF stage writes one byte per rank. The framing helpers here read and write that
//! layout on top of the BitReader and BitWriter.
//!
pub mod bitreader;
pub mod bitwriter;
pub mod framing;
