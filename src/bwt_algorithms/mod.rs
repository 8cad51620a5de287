//! The bwt_algorithms module forms the sorting subsystem of the block-sorting front end.
//!
//! The Burrows-Wheeler Transform rearranges a block so that bytes sharing a following context
//! end up next to each other, which produces runs of similar bytes. Building it requires sorting
//! every cyclic rotation of the block; inverting it needs only the transformed bytes and the key.
//!
//! - circular_sort: MSD radix sort of cyclic rotations, addressed by offset.
//! - bwt_sort: the transform and its linear-time inverse.
//!
pub mod bwt_sort;
pub mod circular_sort;
