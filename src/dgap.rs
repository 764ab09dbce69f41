//! d-gap helpers for callers compressing sorted id sequences
//!
//! The codec itself never delta-codes: it round-trips whatever integers it
//! is handed. Posting-list callers difference their sorted ids first (runs
//! of gap 1 then collapse into zero-bit blocks) and integrate after
//! decoding. These two helpers do exactly that conversion; both are
//! in-place.

use crate::simd;

/// Replaces each element with its gap from the previous one; the first
/// element is left as its own gap (a gap from zero).
pub fn to_dgaps(values: &mut [u32]) {
    for i in (1..values.len()).rev() {
        values[i] = values[i].wrapping_sub(values[i - 1]);
    }
}

/// In-place inclusive prefix sum, the inverse of [`to_dgaps`].
///
/// Runs four lanes at a time: two lane-shifted adds produce the prefix sum
/// within a group, and broadcasting lane 3 carries it into the next.
pub fn cumulative_sum(values: &mut [u32]) {
    let groups = values.len() / 4;
    let mut carry = simd::splat(0);
    for g in 0..groups {
        let at = g * 4;
        let mut v = simd::load_u32(&values[at..at + 4]);
        v = simd::add(v, simd::shift_lanes_up1(v));
        v = simd::add(v, simd::shift_lanes_up2(v));
        v = simd::add(v, carry);
        simd::store(&mut values[at..at + 4], v);
        carry = simd::broadcast_lane3(v);
    }

    let mut tail_carry = if groups > 0 { values[groups * 4 - 1] } else { 0 };
    for v in &mut values[groups * 4..] {
        tail_carry = tail_carry.wrapping_add(*v);
        *v = tail_carry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_then_sum_is_identity() {
        let original: Vec<u32> = vec![3, 4, 5, 9, 100, 101, 102, 4000, 4001];
        let mut values = original.clone();
        to_dgaps(&mut values);
        assert_eq!(values[..3], [3, 1, 1]);
        cumulative_sum(&mut values);
        assert_eq!(values, original);
    }

    #[test]
    fn sum_handles_short_and_ragged_lengths() {
        for len in 0..13 {
            let mut values: Vec<u32> = (0..len).map(|i| (i % 5) + 1).collect();
            let expect: Vec<u32> = values
                .iter()
                .scan(0u32, |acc, &v| {
                    *acc += v;
                    Some(*acc)
                })
                .collect();
            cumulative_sum(&mut values);
            assert_eq!(values, expect, "length {len}");
        }
    }

    #[test]
    fn sum_wraps_like_scalar_addition() {
        let mut values = vec![u32::MAX, 2, 1, 1, 1];
        cumulative_sum(&mut values);
        assert_eq!(values, vec![u32::MAX, 1, 2, 3, 4]);
    }
}
