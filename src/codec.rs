//! Codec instance: scratch ownership and the encode entry point
//!
//! A `QmxCodec` owns the encoder's scratch (the per-integer width array,
//! the zero-staging block pad, and the selector scratch), grown on first
//! use and reused across calls, so steady-state encoding allocates
//! nothing. Decoding is stateless and allocation-free; it lives in
//! [`crate::unpacker`] and is re-exposed here for symmetry.
//!
//! One instance must not be shared across threads mid-call; separate
//! instances are independent.

use log::debug;

use crate::error::{Error, Result};
use crate::packer;
use crate::planner::{self, WASTAGE};
use crate::unpacker;
use crate::width::{classify, MAX_INTS_PER_BLOCK};

/// Worst-case encoded size for `count` integers: every block at the
/// widest layout plus one selector byte per block, with headroom for the
/// planner's padded tail. Deliberately a little generous.
pub fn worst_case_encoded_len(count: usize) -> usize {
    let blocks = count.div_ceil(4) + 1;
    blocks * 16 + blocks.div_ceil(16) + WASTAGE
}

/// Output slots a decode of `count` integers may write: the decoder always
/// finishes its final block, overrunning the requested count by up to one
/// maximal block.
pub fn decode_buffer_len(count: usize) -> usize {
    count + MAX_INTS_PER_BLOCK
}

/// Encoder instance with reusable scratch.
pub struct QmxCodec {
    widths: Vec<u8>,
    selectors: Vec<u8>,
    pad: [u32; MAX_INTS_PER_BLOCK],
}

impl QmxCodec {
    pub fn new() -> Self {
        Self {
            widths: Vec::new(),
            selectors: Vec::new(),
            pad: [0; MAX_INTS_PER_BLOCK],
        }
    }

    /// Compresses `src` into `dst` and returns the encoded length.
    ///
    /// The stream is payload words first, then the selector bytes in
    /// reverse. Nothing is written unless the whole encoding fits: on
    /// [`Error::OutputTooSmall`] the destination is untouched. Empty input
    /// encodes to zero bytes.
    pub fn encode(&mut self, dst: &mut [u8], src: &[u32]) -> Result<usize> {
        if src.is_empty() {
            return Ok(0);
        }

        let scratch = src.len() + WASTAGE;
        if self.widths.len() < scratch {
            debug!("growing width scratch to {} entries", scratch);
            self.widths.resize(scratch, 0);
        }
        for (slot, &v) in self.widths.iter_mut().zip(src) {
            *slot = classify(v);
        }
        self.widths[src.len()..scratch].fill(0);

        let plan_len = planner::plan(&mut self.widths[..scratch], src.len());
        let plan = &self.widths[..plan_len];

        let (payload_len, selector_len) = packer::stream_len(plan);
        let needed = payload_len + selector_len;
        if dst.len() < needed {
            return Err(Error::OutputTooSmall {
                needed,
                capacity: dst.len(),
            });
        }

        self.selectors.clear();
        let written = packer::write_stream(
            &mut dst[..needed],
            src,
            plan,
            &mut self.pad,
            &mut self.selectors,
        );
        debug_assert_eq!(written, needed);
        Ok(written)
    }

    /// Stateless decode; see [`crate::decode`].
    pub fn decode(dst: &mut [u32], count: usize, src: &[u8]) {
        unpacker::decode(dst, count, src);
    }
}

impl Default for QmxCodec {
    fn default() -> Self {
        Self::new()
    }
}
