//! Benchmark fixtures for the ax runtime.
//!
//! - [`filled_array`] / [`filled_list`]: sequences of `0..n`
//! - [`keyed_map`]: a map over [`spread_keys`]
//! - [`straddling_sizes`]: buffer sizes alternating around the shrink
//!   threshold

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ax_core::stuff::U64;
use ax_core::{Map, Seq};
use ax_map::Hmap;
use ax_seq::{Array, List};

/// Array holding `0..n`.
pub fn filled_array(n: u64) -> Array<u64> {
    fill(Array::new(U64), n)
}

/// List holding `0..n`.
pub fn filled_list(n: u64) -> List<u64> {
    fill(List::new(U64), n)
}

fn fill<S: Seq<Elem = u64>>(mut seq: S, n: u64) -> S {
    for v in 0..n {
        seq.push(v).unwrap();
    }
    seq
}

/// `n` distinct keys in a scattered but deterministic order.
pub fn spread_keys(n: u64) -> Vec<u64> {
    (0..n)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17))
        .collect()
}

/// Map from each of `spread_keys(n)` to its position.
pub fn keyed_map(n: u64) -> Hmap<u64, u64> {
    let mut map = Hmap::new(U64, U64);
    for (i, k) in spread_keys(n).into_iter().enumerate() {
        map.put(k, i as u64).unwrap();
    }
    map
}

/// `rounds` pairs of sizes just inside the hysteresis band of a buffer
/// that settled at `2 * peak + 1` bytes.
pub fn straddling_sizes(peak: usize, rounds: usize) -> Vec<usize> {
    let quarter = (2 * peak + 1) / 4;
    (0..rounds).flat_map(|_| [quarter + 1, peak]).collect()
}
