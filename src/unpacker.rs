//! Selector-driven vector unpacker
//!
//! Decoding walks two cursors over one buffer: payload words forward from
//! the start, selector bytes backward from the end (the packer reversed
//! them, so the last byte is the first block's selector). Each selector's
//! high nibble picks the width kernel; its low nibble holds the
//! complemented run length, and the kernel repeats for that many blocks,
//! advancing payload and output each time.
//!
//! The kernels expand one payload word (or two, for the straddled widths)
//! into 32-bit integers with lane shifts, masks, and widening loads. The
//! narrow widths share one shift-mask-store loop using 64-bit lane shifts;
//! their masks discard the neighbor-lane bits the wider shift drags in.
//! The straddled widths use 32-bit lane shifts throughout because their
//! combine step must not see neighbor-lane bits.

use crate::simd;

/// Decodes `src` in full, writing decoded integers from the start of
/// `dst`.
///
/// `count` is the number of integers the caller wants; decoding always
/// finishes the final block, so up to one block's worth of trailing slots
/// past `count` are also written. Size `dst` with
/// [`decode_buffer_len`](crate::decode_buffer_len).
///
/// Malformed input is not detected: it produces garbage values or panics
/// on a slice bound, never undefined behavior.
pub fn decode(dst: &mut [u32], count: usize, src: &[u8]) {
    debug_assert!(dst.len() >= count);
    let mut payload = 0usize;
    let mut keys = src.len();
    let mut out = 0usize;

    // `payload < keys` before the decrement mirrors reading the selector at
    // `keys` while payload may sit exactly on it, so a trailing zero-width
    // selector (no payload of its own) still executes.
    while payload < keys {
        keys -= 1;
        let selector = src[keys];
        let runs = (16 - (selector & 0x0F)) as usize;
        match selector >> 4 {
            0 => {
                // run block: 256 ones per block, no payload
                dst[out..out + 256 * runs].fill(1);
                out += 256 * runs;
            }
            1 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 1, 32);
                    payload += 16;
                    out += 128;
                }
            }
            2 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 2, 16);
                    payload += 16;
                    out += 64;
                }
            }
            3 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 3, 10);
                    payload += 16;
                    out += 40;
                }
            }
            4 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 4, 8);
                    payload += 16;
                    out += 32;
                }
            }
            5 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 5, 6);
                    payload += 16;
                    out += 24;
                }
            }
            6 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 6, 5);
                    payload += 16;
                    out += 20;
                }
            }
            7 => {
                for _ in 0..runs {
                    unpack_7(&src[payload..], &mut dst[out..]);
                    payload += 32;
                    out += 36;
                }
            }
            8 => {
                for _ in 0..runs {
                    unpack_8(&src[payload..], &mut dst[out..]);
                    payload += 16;
                    out += 16;
                }
            }
            9 => {
                for _ in 0..runs {
                    unpack_9(&src[payload..], &mut dst[out..]);
                    payload += 32;
                    out += 28;
                }
            }
            10 => {
                for _ in 0..runs {
                    unpack_single(&src[payload..], &mut dst[out..], 10, 3);
                    payload += 16;
                    out += 12;
                }
            }
            11 => {
                for _ in 0..runs {
                    unpack_12(&src[payload..], &mut dst[out..]);
                    payload += 32;
                    out += 20;
                }
            }
            12 => {
                for _ in 0..runs {
                    unpack_16(&src[payload..], &mut dst[out..]);
                    payload += 16;
                    out += 8;
                }
            }
            13 => {
                for _ in 0..runs {
                    unpack_21(&src[payload..], &mut dst[out..]);
                    payload += 32;
                    out += 12;
                }
            }
            14 => {
                for _ in 0..runs {
                    unpack_32(&src[payload..], &mut dst[out..]);
                    payload += 16;
                    out += 4;
                }
            }
            _ => {
                // reserved selector: never emitted by the encoder; skip one
                // payload byte rather than abort, decode surfaces no errors
                payload += 1;
            }
        }
    }
}

/// One 16-byte word, `fields` values of `width` bits per lane, packed from
/// bit 0. The 64-bit lane shift is safe here: each lane's live fields end
/// at or below bit 32, so bits dragged across the 32-bit boundary always
/// land above the mask.
#[inline]
fn unpack_single(src: &[u8], out: &mut [u32], width: u32, fields: usize) {
    let mask = simd::splat((1u32 << width) - 1);
    let mut v = simd::load(&src[..16]);
    simd::store(&mut out[..4], simd::and(v, mask));
    for k in 1..fields {
        v = simd::srl64(v, width);
        simd::store(&mut out[k * 4..k * 4 + 4], simd::and(v, mask));
    }
}

/// Two words, 36 x 7 bits: four whole quads in word one, the fifth quad
/// straddling (4 low bits | 3 high bits), four whole quads in word two.
#[inline]
fn unpack_7(src: &[u8], out: &mut [u32]) {
    let mask = simd::splat(0x7F);
    let mut w0 = simd::load(&src[..16]);
    let w1 = simd::load(&src[16..32]);

    simd::store(&mut out[..4], simd::and(w0, mask));
    w0 = simd::srl32(w0, 7);
    simd::store(&mut out[4..8], simd::and(w0, mask));
    w0 = simd::srl32(w0, 7);
    simd::store(&mut out[8..12], simd::and(w0, mask));
    w0 = simd::srl32(w0, 7);
    simd::store(&mut out[12..16], simd::and(w0, mask));
    w0 = simd::srl32(w0, 7);
    simd::store(
        &mut out[16..20],
        simd::and(simd::or(simd::sll32(w1, 4), w0), mask),
    );
    let mut v = simd::srl32(w1, 3);
    simd::store(&mut out[20..24], simd::and(v, mask));
    v = simd::srl32(v, 7);
    simd::store(&mut out[24..28], simd::and(v, mask));
    v = simd::srl32(v, 7);
    simd::store(&mut out[28..32], simd::and(v, mask));
    v = simd::srl32(v, 7);
    simd::store(&mut out[32..36], simd::and(v, mask));
}

/// One word, 16 x 8 bits, sequential bytes widened to u32.
#[inline]
fn unpack_8(src: &[u8], out: &mut [u32]) {
    let (a, b, c, d) = simd::widen8(&src[..16]);
    simd::store(&mut out[..4], a);
    simd::store(&mut out[4..8], b);
    simd::store(&mut out[8..12], c);
    simd::store(&mut out[12..16], d);
}

/// Two words, 28 x 9 bits: three whole quads, straddle (5 low | 4 high),
/// three whole quads.
#[inline]
fn unpack_9(src: &[u8], out: &mut [u32]) {
    let mask = simd::splat(0x1FF);
    let mut w0 = simd::load(&src[..16]);
    let w1 = simd::load(&src[16..32]);

    simd::store(&mut out[..4], simd::and(w0, mask));
    w0 = simd::srl32(w0, 9);
    simd::store(&mut out[4..8], simd::and(w0, mask));
    w0 = simd::srl32(w0, 9);
    simd::store(&mut out[8..12], simd::and(w0, mask));
    w0 = simd::srl32(w0, 9);
    simd::store(
        &mut out[12..16],
        simd::and(simd::or(simd::sll32(w1, 5), w0), mask),
    );
    let mut v = simd::srl32(w1, 4);
    simd::store(&mut out[16..20], simd::and(v, mask));
    v = simd::srl32(v, 9);
    simd::store(&mut out[20..24], simd::and(v, mask));
    v = simd::srl32(v, 9);
    simd::store(&mut out[24..28], simd::and(v, mask));
}

/// Two words, 20 x 12 bits: two whole quads, straddle (8 low | 4 high),
/// two whole quads.
#[inline]
fn unpack_12(src: &[u8], out: &mut [u32]) {
    let mask = simd::splat(0xFFF);
    let mut w0 = simd::load(&src[..16]);
    let w1 = simd::load(&src[16..32]);

    simd::store(&mut out[..4], simd::and(w0, mask));
    w0 = simd::srl32(w0, 12);
    simd::store(&mut out[4..8], simd::and(w0, mask));
    w0 = simd::srl32(w0, 12);
    simd::store(
        &mut out[8..12],
        simd::and(simd::or(simd::sll32(w1, 8), w0), mask),
    );
    let mut v = simd::srl32(w1, 4);
    simd::store(&mut out[12..16], simd::and(v, mask));
    v = simd::srl32(v, 12);
    simd::store(&mut out[16..20], simd::and(v, mask));
}

/// One word, 8 x 16 bits, sequential halfwords widened to u32.
#[inline]
fn unpack_16(src: &[u8], out: &mut [u32]) {
    let (lo, hi) = simd::widen16(&src[..16]);
    simd::store(&mut out[..4], lo);
    simd::store(&mut out[4..8], hi);
}

/// Two words, 12 x 21 bits: one whole quad, straddle (11 low | 10 high),
/// one whole quad.
#[inline]
fn unpack_21(src: &[u8], out: &mut [u32]) {
    let mask = simd::splat(0x1FFFFF);
    let mut w0 = simd::load(&src[..16]);
    let w1 = simd::load(&src[16..32]);

    simd::store(&mut out[..4], simd::and(w0, mask));
    w0 = simd::srl32(w0, 21);
    simd::store(
        &mut out[4..8],
        simd::and(simd::or(simd::sll32(w1, 11), w0), mask),
    );
    let v = simd::srl32(w1, 10);
    simd::store(&mut out[8..12], simd::and(v, mask));
}

/// One word, 4 x 32 bits, copied through.
#[inline]
fn unpack_32(src: &[u8], out: &mut [u32]) {
    let v = simd::load(&src[..16]);
    simd::store(&mut out[..4], v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::pack_block;
    use crate::width::{ints_per_block, payload_bytes};

    fn pack_then_unpack(width: u8, values: &[u32]) -> Vec<u32> {
        let n = ints_per_block(width);
        assert_eq!(values.len(), n);
        let mut payload = vec![0u8; payload_bytes(width)];
        pack_block(values, width, &mut payload);

        let mut out = vec![0u32; n];
        match width {
            1..=6 => unpack_single(&payload, &mut out, width as u32, n / 4),
            7 => unpack_7(&payload, &mut out),
            8 => unpack_8(&payload, &mut out),
            9 => unpack_9(&payload, &mut out),
            10 => unpack_single(&payload, &mut out, 10, 3),
            12 => unpack_12(&payload, &mut out),
            16 => unpack_16(&payload, &mut out),
            21 => unpack_21(&payload, &mut out),
            32 => unpack_32(&payload, &mut out),
            _ => unreachable!(),
        }
        out
    }

    #[test]
    fn every_width_round_trips_one_block() {
        for &width in &[1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 21, 32] {
            let n = ints_per_block(width);
            let limit = if width == 32 {
                u64::from(u32::MAX) + 1
            } else {
                1u64 << width
            };
            // a ramp plus the extremes, so every bit position is exercised
            let values: Vec<u32> = (0..n)
                .map(|i| match i % 4 {
                    0 => 0,
                    1 => (limit - 1) as u32,
                    2 => ((i as u64 * 2654435761) % limit) as u32,
                    _ => (i as u64 % limit) as u32,
                })
                .collect();
            let out = pack_then_unpack(width, &values);
            assert_eq!(out, values, "width {width} failed");
        }
    }

    #[test]
    fn straddled_quads_recombine() {
        // the split quad sits at indices 16..20 for width 7
        let mut values = vec![0u32; 36];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (i as u32 * 7 + 3) & 0x7F;
        }
        let out = pack_then_unpack(7, &values);
        assert_eq!(&out[16..20], &values[16..20]);
        assert_eq!(out, values);
    }

    #[test]
    fn decode_stops_at_the_selector_cursor() {
        // hand-built stream: one width-32 block then one width-0 block;
        // stream is payload, then the two selectors reversed
        let mut src = Vec::new();
        for v in [9u32, 8, 7, 6] {
            src.extend_from_slice(&v.to_le_bytes());
        }
        src.push(0x0F); // second block: width 0, run 1
        src.push(0xEF); // first block: width 32, run 1
        let mut dst = vec![0u32; 4 + 256];
        decode(&mut dst, 260, &src);
        assert_eq!(&dst[..4], &[9, 8, 7, 6]);
        assert!(dst[4..260].iter().all(|&v| v == 1));
    }

    #[test]
    fn reserved_selector_skips_one_byte() {
        // 0xF* is never produced by the encoder; the decoder steps over a
        // single payload byte and keeps going
        let src = vec![0xAAu8, 0xF7];
        let mut dst = vec![0u32; 4];
        decode(&mut dst, 0, &src);
        assert_eq!(dst, vec![0u32; 4]);
    }
}
