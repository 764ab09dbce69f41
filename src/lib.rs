//! QMX-Improved: SIMD-accelerated compression for 32-bit integer sequences
//!
//! A codec for the d-gap streams of inverted-index posting lists, built
//! around 128-bit registers:
//! - 15 legal bit widths, each filling a whole number of register lanes
//!   per block (widths 7, 9, 12 and 21 span two registers)
//! - One selector byte per run of up to 16 equal-width blocks; payloads
//!   run forward through the stream, selectors backward from the end
//! - Branch-light decoding: per-width kernels of unaligned loads, lane
//!   shifts, masks and widening conversions
//! - An encoder that tiles input into legal blocks via quad smoothing and
//!   width promotion, reusing its scratch across calls
//!
//! The codec round-trips arbitrary u32 values; it does not delta-code.
//! Sorted-id callers convert with [`to_dgaps`] / [`cumulative_sum`].
//!
//! ```
//! use qmx_improved::{QmxCodec, decode, decode_buffer_len, worst_case_encoded_len};
//!
//! let gaps = vec![1u32; 512];
//! let mut codec = QmxCodec::new();
//! let mut encoded = vec![0u8; worst_case_encoded_len(gaps.len())];
//! let len = codec.encode(&mut encoded, &gaps).unwrap();
//! assert_eq!(len, 1); // two zero-bit run blocks behind one selector byte
//!
//! let mut decoded = vec![0u32; decode_buffer_len(gaps.len())];
//! decode(&mut decoded, gaps.len(), &encoded[..len]);
//! assert_eq!(&decoded[..gaps.len()], &gaps[..]);
//! ```

mod codec;
mod dgap;
mod error;
mod packer;
mod planner;
mod simd;
mod unpacker;
mod width;

pub use codec::{decode_buffer_len, worst_case_encoded_len, QmxCodec};
pub use dgap::{cumulative_sum, to_dgaps};
pub use error::{Error, Result};
pub use planner::WASTAGE;
pub use unpacker::decode;
pub use width::{classify, ints_per_block, payload_bytes, LEGAL_WIDTHS, MAX_INTS_PER_BLOCK};
