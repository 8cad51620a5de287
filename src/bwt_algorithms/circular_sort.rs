//! Circular suffix sorting for the Burrows-Wheeler Transform.
//!
//! The BWT needs every cyclic rotation of the block in sorted order. The rotations are never
//! built; each one is named by its starting offset and read through modular indexing into the
//! original block. Sorting is a most-significant-digit radix sort: at depth `d` a range of
//! offsets is bucketed by the byte at `(offset + d) mod n` with key-indexed counting, and each
//! bucket is then sorted at depth `d + 1`. Small ranges drop to insertion sort. A range that
//! reaches depth `n` holds identical rotations of a periodic block, and is ordered by offset so
//! the result is always a total order. For a block made of k copies of a primitive pattern of
//! length p, rotations that agree on p bytes are already identical, so depth p is enough.
//!
//! Radix passes stop at `DEPTH_LIMIT`. A long run of one byte would otherwise peel a single
//! offset per level and cost time quadratic in the run. Ranges still tied at the limit are set
//! aside, and once the radix pass is done they are ordered by circular ranks computed with prefix
//! doubling over the whole block (rank by 1 byte, then by pairs of ranks `w` apart, doubling `w`
//! until `w >= n`). Ties left after that are identical rotations and fall back to offset order.
//!
//! Large blocks are split once at depth 0 and the 256 first-level buckets are sorted on the rayon
//! pool. Each task owns a disjoint sub-slice of the index and its own scratch buffer.
//!
use std::cmp::Ordering;

use log::{debug, trace};
use rayon::prelude::*;

use crate::error::{BwtError, Result};

/// Alphabet size (extended ASCII / bytes)
const R: usize = 256;
/// Ranges at or below this length are finished with insertion sort
const CUTOFF: usize = 15;
/// Deepest byte the radix pass looks at before handing a range to prefix doubling
const DEPTH_LIMIT: usize = 32;
/// Default block length at which first-level buckets are sorted in parallel
pub const PARALLEL_THRESHOLD: usize = 40_000;

/// Tuning for the circular suffix sorter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortConfig {
    /// Blocks of at least this many bytes sort their first-level buckets on the rayon pool.
    pub parallel_threshold: usize,
}

impl SortConfig {
    /// A configuration that never sorts in parallel.
    pub fn serial() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}

/// Returns the permutation of `0..n` that sorts all cyclic rotations of `block`.
pub fn circular_suffix_sort(block: &[u8]) -> Result<Vec<u32>> {
    circular_suffix_sort_with(block, &SortConfig::default())
}

/// Returns the permutation of `0..n` that sorts all cyclic rotations of `block`, using `config`
/// to decide whether to sort in parallel.
pub fn circular_suffix_sort_with(block: &[u8], config: &SortConfig) -> Result<Vec<u32>> {
    check_block(block)?;

    // Create index into block. Index is u32, checked above.
    let mut index = (0_u32..block.len() as u32).collect::<Vec<u32>>();
    let period = primitive_period(block);
    if period < block.len() {
        debug!("Block repeats with period {}.", period);
    }

    if block.len() >= config.parallel_threshold {
        debug!("Sorting {} rotations with parallel buckets.", block.len());
        let deferred = par_msd_sort(block, &mut index, period);
        resolve_deferred(block, &mut index, &deferred);
    } else {
        debug!("Sorting {} rotations sequentially.", block.len());
        let mut aux = vec![0_u32; block.len()];
        let deferred = msd_sort(block, &mut index, 0, period, &mut aux);
        resolve_deferred(block, &mut index, &deferred);
    }
    Ok(index)
}

/// Compares the rotations of `block` starting at `a` and `b`. Identical rotations (periodic
/// blocks) compare by offset, so this is the total order the sorter produces.
///
/// Returns `InvalidInput` if `a` or `b` is not a valid offset into `block`.
pub fn compare_rotations(block: &[u8], a: u32, b: u32) -> Result<Ordering> {
    for offset in [a, b] {
        if offset as usize >= block.len() {
            return Err(BwtError::InvalidInput(format!(
                "rotation offset {} is out of range for a block of {} bytes",
                offset,
                block.len()
            )));
        }
    }
    Ok(compare_from(block, a, b, 0, block.len()))
}

/// Rejects blocks that cannot form a well-defined rotation index.
pub(crate) fn check_block(block: &[u8]) -> Result<()> {
    if block.is_empty() {
        return Err(BwtError::InvalidInput("block is empty".to_string()));
    }
    if block.len() > u32::MAX as usize {
        return Err(BwtError::InvalidInput(format!(
            "block of {} bytes exceeds the maximum of {}",
            block.len(),
            u32::MAX
        )));
    }
    Ok(())
}

/// Length of the shortest pattern whose repeats make up `block`, or `n` if there is none.
fn primitive_period(block: &[u8]) -> usize {
    let n = block.len();
    // KMP failure function: fail[i] is the longest proper border of block[..=i]
    let mut fail = vec![0_usize; n];
    let mut k = 0;
    for i in 1..n {
        while k > 0 && block[i] != block[k] {
            k = fail[k - 1];
        }
        if block[i] == block[k] {
            k += 1;
        }
        fail[i] = k;
    }
    let p = n - fail[n - 1];
    if n % p == 0 {
        p
    } else {
        n
    }
}

#[inline]
fn wrap(pos: usize, n: usize) -> usize {
    if pos >= n {
        pos - n
    } else {
        pos
    }
}

/// Byte `d` of the rotation starting at `idx`. Requires `d < n`.
#[inline]
fn char_at(block: &[u8], idx: u32, d: usize) -> usize {
    block[wrap(idx as usize + d, block.len())] as usize
}

/// Compare two rotations that are already known to agree on their first `depth` bytes, looking
/// no further than byte `period`. Ties go to the smaller offset.
fn compare_from(block: &[u8], a: u32, b: u32, depth: usize, period: usize) -> Ordering {
    compare_bytes(block, a, b, depth, period).then(a.cmp(&b))
}

/// Byte comparison of two rotations over bytes `depth..limit`.
fn compare_bytes(block: &[u8], a: u32, b: u32, depth: usize, limit: usize) -> Ordering {
    let n = block.len();
    let mut a_pos = wrap(a as usize + depth, n);
    let mut b_pos = wrap(b as usize + depth, n);
    let mut remaining = limit.saturating_sub(depth);

    // Compare the longest runs that do not wrap, then continue from the front of the block
    while remaining > 0 {
        let len = remaining.min(n - a_pos).min(n - b_pos);
        match block[a_pos..a_pos + len].cmp(&block[b_pos..b_pos + len]) {
            Ordering::Equal => {}
            other => return other,
        }
        a_pos = wrap(a_pos + len, n);
        b_pos = wrap(b_pos + len, n);
        remaining -= len;
    }
    Ordering::Equal
}

/// Key-indexed counting on byte `d` of each rotation in `index`. Stable. Returns the bucket
/// boundaries: symbol `c` occupies `bounds[c]..bounds[c + 1]`.
fn partition(block: &[u8], index: &mut [u32], d: usize, aux: &mut [u32]) -> [usize; R + 1] {
    // Frequency counts, offset by one so the prefix sum gives bucket starts
    let mut bounds = [0_usize; R + 1];
    for &idx in index.iter() {
        bounds[char_at(block, idx, d) + 1] += 1;
    }
    for r in 0..R {
        bounds[r + 1] += bounds[r];
    }

    // Distribute, then copy back
    let aux = &mut aux[..index.len()];
    let mut next = bounds;
    for &idx in index.iter() {
        let c = char_at(block, idx, d);
        aux[next[c]] = idx;
        next[c] += 1;
    }
    index.copy_from_slice(aux);
    bounds
}

/// MSD radix sort of `index` starting at byte `depth`, driven by an explicit work stack of
/// (lo, hi, depth) ranges. `aux` must be at least as long as `index`.
///
/// Returns the `lo..hi` ranges (relative to `index`) that were still tied at `DEPTH_LIMIT`.
/// Those are left for `resolve_deferred`.
fn msd_sort(
    block: &[u8],
    index: &mut [u32],
    depth: usize,
    period: usize,
    aux: &mut [u32],
) -> Vec<(usize, usize)> {
    let limit = period.min(DEPTH_LIMIT);
    let mut deferred = Vec::new();
    let mut stack = vec![(0_usize, index.len(), depth)];

    while let Some((lo, hi, d)) = stack.pop() {
        let range = &mut index[lo..hi];
        if range.len() < 2 {
            continue;
        }
        // Every byte compared equal: these are repeats of a periodic block
        if d >= period {
            trace!("{} identical rotations at [{}..{}).", range.len(), lo, hi);
            range.sort_unstable();
            continue;
        }
        if d >= DEPTH_LIMIT {
            deferred.push((lo, hi));
            continue;
        }
        if range.len() <= CUTOFF {
            if insertion_sort(block, range, d, limit) && limit < period {
                deferred.push((lo, hi));
            }
            continue;
        }

        let bounds = partition(block, range, d, aux);
        // Push in reverse so the smallest symbol is sorted first
        for c in (0..R).rev() {
            let (start, end) = (bounds[c], bounds[c + 1]);
            if end - start > 1 {
                stack.push((lo + start, lo + end, d + 1));
            }
        }
    }
    deferred
}

/// Insertion sort for short ranges whose rotations share their first `d` bytes, comparing bytes
/// up to `limit`. Returns true if any two rotations were still equal at `limit`.
fn insertion_sort(block: &[u8], range: &mut [u32], d: usize, limit: usize) -> bool {
    let mut tied = false;
    for i in 1..range.len() {
        let mut j = i;
        while j > 0 {
            let ord = compare_bytes(block, range[j], range[j - 1], d, limit);
            tied |= ord == Ordering::Equal;
            if ord.then(range[j].cmp(&range[j - 1])) != Ordering::Less {
                break;
            }
            range.swap(j, j - 1);
            j -= 1;
        }
    }
    tied
}

/// Partition at depth 0, then sort the first-level buckets in parallel. Returns the deferred
/// ranges of every bucket, relative to the whole index.
fn par_msd_sort(block: &[u8], index: &mut [u32], period: usize) -> Vec<(usize, usize)> {
    let bounds = {
        let mut aux = vec![0_u32; index.len()];
        partition(block, index, 0, &mut aux)
    };

    // Split the index into one disjoint slice per symbol
    let mut buckets: Vec<(usize, &mut [u32])> = Vec::with_capacity(R);
    let mut rest = index;
    for c in 0..R {
        let (bucket, tail) = std::mem::take(&mut rest).split_at_mut(bounds[c + 1] - bounds[c]);
        buckets.push((bounds[c], bucket));
        rest = tail;
    }
    trace!(
        "{} non-empty first-level buckets.",
        buckets.iter().filter(|(_, b)| !b.is_empty()).count()
    );

    buckets
        .into_par_iter()
        .filter(|(_, bucket)| bucket.len() > 1)
        .map(|(start, bucket)| {
            let mut aux = vec![0_u32; bucket.len()];
            msd_sort(block, bucket, 1, period, &mut aux)
                .into_iter()
                .map(|(lo, hi)| (start + lo, start + hi))
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect()
}

/// Order the ranges the radix pass left tied by full circular rank, then by offset.
fn resolve_deferred(block: &[u8], index: &mut [u32], deferred: &[(usize, usize)]) {
    if deferred.is_empty() {
        return;
    }
    debug!(
        "{} ranges still tied at depth {}, ranking by prefix doubling.",
        deferred.len(),
        DEPTH_LIMIT
    );
    let ranks = circular_ranks(block);
    for &(lo, hi) in deferred {
        index[lo..hi].sort_unstable_by_key(|&idx| (ranks[idx as usize], idx));
    }
}

/// Prefix doubling over cyclic rotations. `ranks[i]` is the class of the rotation starting at
/// `i`: equal rotations share a class, and classes follow rotation order.
fn circular_ranks(block: &[u8]) -> Vec<u32> {
    let n = block.len();
    let mut order = vec![0_u32; n];
    let mut class = vec![0_u32; n];
    let mut count = vec![0_usize; R.max(n)];

    // Width 1: rank by byte
    for &b in block {
        count[b as usize] += 1;
    }
    for r in 1..R {
        count[r] += count[r - 1];
    }
    for i in (0..n).rev() {
        let c = block[i] as usize;
        count[c] -= 1;
        order[count[c]] = i as u32;
    }
    let mut classes = 1;
    for i in 1..n {
        if block[order[i] as usize] != block[order[i - 1] as usize] {
            classes += 1;
        }
        class[order[i] as usize] = (classes - 1) as u32;
    }

    let mut shifted = vec![0_u32; n];
    let mut next_class = vec![0_u32; n];
    let mut width = 1;
    while width < n && classes < n {
        // Rotations are in order of their first `width` bytes, so stepping each back by `width`
        // gives the order by second half. A stable count on the first half finishes the pass.
        for (s, &o) in shifted.iter_mut().zip(order.iter()) {
            *s = wrap(o as usize + n - width, n) as u32;
        }
        count[..classes].fill(0);
        for &s in &shifted {
            count[class[s as usize] as usize] += 1;
        }
        for r in 1..classes {
            count[r] += count[r - 1];
        }
        for &s in shifted.iter().rev() {
            let c = class[s as usize] as usize;
            count[c] -= 1;
            order[count[c]] = s;
        }

        let key = |i: usize| (class[i], class[wrap(i + width, n)]);
        next_class[order[0] as usize] = 0;
        classes = 1;
        for i in 1..n {
            if key(order[i] as usize) != key(order[i - 1] as usize) {
                classes += 1;
            }
            next_class[order[i] as usize] = (classes - 1) as u32;
        }
        std::mem::swap(&mut class, &mut next_class);
        width <<= 1;
    }
    class
}
