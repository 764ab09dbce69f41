//! Bit-width classification and the per-width block tables
//!
//! QMX packs integers at one of 15 legal bit widths chosen so that a whole
//! number of values fills a 128-bit register (or two registers for the
//! double-word widths 7, 9, 12 and 21). Values that would need an illegal
//! width are rounded up to the next legal one.

/// The legal bit widths, in selector-type order.
pub const LEGAL_WIDTHS: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 21, 32];

/// Largest `ints_per_block` value (the width-0 run block).
pub const MAX_INTS_PER_BLOCK: usize = 256;

/// Smallest legal width that can hold `v`.
///
/// The value 1 maps to width 0: a zero-bit block carries no payload and
/// decodes to a run of 256 ones, which is the common case for d-gap input
/// (consecutive ids). Zero itself needs one bit.
#[inline]
pub const fn classify(v: u32) -> u8 {
    match v {
        1 => 0,
        0 => 1,
        2..=3 => 2,
        4..=7 => 3,
        8..=15 => 4,
        16..=31 => 5,
        32..=63 => 6,
        64..=127 => 7,
        128..=255 => 8,
        256..=511 => 9,
        512..=1023 => 10,
        1024..=4095 => 12,
        4096..=65535 => 16,
        65536..=2097151 => 21,
        _ => 32,
    }
}

/// Number of integers in one block of width `w`.
#[inline]
pub const fn ints_per_block(w: u8) -> usize {
    match w {
        0 => 256,
        1 => 128,
        2 => 64,
        3 => 40,
        4 => 32,
        5 => 24,
        6 => 20,
        7 => 36,
        8 => 16,
        9 => 28,
        10 => 12,
        12 => 20,
        16 => 8,
        21 => 12,
        32 => 4,
        _ => panic!("bit width outside the QMX legal set"),
    }
}

/// Payload bytes for one block of width `w`: 0 for the run width, 32 for
/// the double-word widths, 16 otherwise.
#[inline]
pub const fn payload_bytes(w: u8) -> usize {
    match w {
        0 => 0,
        7 | 9 | 12 | 21 => 32,
        _ => 16,
    }
}

/// Selector high-nibble value for width `w` (index into [`LEGAL_WIDTHS`]).
#[inline]
pub(crate) const fn selector_type(w: u8) -> u8 {
    match w {
        0..=10 => w,
        12 => 11,
        16 => 12,
        21 => 13,
        32 => 14,
        _ => panic!("bit width outside the QMX legal set"),
    }
}

/// Next larger legal width, used when a planned block must be promoted.
#[inline]
pub(crate) const fn next_width(w: u8) -> u8 {
    match w {
        0..=9 => w + 1,
        10 => 12,
        12 => 16,
        16 => 21,
        21 => 32,
        _ => panic!("no legal width above 32"),
    }
}
