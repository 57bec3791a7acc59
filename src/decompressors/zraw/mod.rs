// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Line-level block decoder for the ZRAW camera bitstream.
//!
//! Each line carries two interleaved pixel components (A and B), encoded
//! block by block with a small magnitude-class prefix code, adaptive LSB
//! widths and a previous-line predictor. Decoding is stateful and must be
//! bit-exact with the camera encoder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bits::log2ceil;
use crate::blockline::LINE_BLOCK_SIZE;

mod linedec;
mod postprocess;
mod prefix;

pub use linedec::LineBlockDecoder;
pub use postprocess::{LinePostProcessor, NullPostProcessor};

/// Error variants for the ZRAW line decoder
#[derive(Debug, Error)]
pub enum ZrawError {
  /// Bit source ran out of data mid-decode
  #[error("Unexpected end of bitstream")]
  UnexpectedEndOfStream,

  /// Rejected codec parameter or per-block bit budget
  #[error("Parameter out of range: {}", _0)]
  ParameterOutOfRange(String),

  /// Decoder driven outside its line protocol
  #[error("Invalid decoder state: {}", _0)]
  InvalidState(String),

  /// Sentinel for table branches that must never be reached
  #[error("Not implemented: {}", _0)]
  NotImplemented(String),
}

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, ZrawError>;

/// Codec parameters for one line decoder instance, derived by the
/// containing frame parser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecParams {
  pub default_pix_value: u16,
  pub max_allowed_pixel_value: i32,
  pub max_allowed_raw_value: i32,
  pub max_values_count: i32,
  pub blocks_count: i32,
  pub stride: bool,
  /// 1 aligns to 256 bits, 0 to 128 bits
  pub align_mode: i32,
  pub lossless: bool,
  pub bitdepth_real: i32,
  /// CFA pattern index (0..=3), selects the field parity mapping
  pub bayer_pattern: u32,
  pub noise_level_1: i32,
  pub noise_level_2: i32,
  /// Distance below which a pixel counts as quiet
  pub noise_level_distance: u32,
}

impl CodecParams {
  /// Validate parameter ranges before constructing a decoder.
  pub fn verify(&self) -> Result<()> {
    if self.blocks_count < 1 {
      return Err(ZrawError::ParameterOutOfRange(format!("blocks_count {} < 1", self.blocks_count)));
    }
    if self.max_values_count < 1 || self.max_values_count > self.blocks_count * LINE_BLOCK_SIZE as i32 {
      return Err(ZrawError::ParameterOutOfRange(format!(
        "max_values_count {} does not fit {} blocks",
        self.max_values_count, self.blocks_count
      )));
    }
    if self.align_mode != 0 && self.align_mode != 1 {
      return Err(ZrawError::ParameterOutOfRange(format!("unknown align_mode {}", self.align_mode)));
    }
    if self.bayer_pattern > 3 {
      return Err(ZrawError::ParameterOutOfRange(format!("bayer_pattern {} > 3", self.bayer_pattern)));
    }
    if !(1..=16).contains(&self.bitdepth_real) {
      return Err(ZrawError::ParameterOutOfRange(format!("bitdepth_real {}", self.bitdepth_real)));
    }
    if !(0..=u16::MAX as i32).contains(&self.max_allowed_pixel_value) {
      return Err(ZrawError::ParameterOutOfRange(format!(
        "max_allowed_pixel_value {}",
        self.max_allowed_pixel_value
      )));
    }
    if self.max_allowed_raw_value < 0 {
      return Err(ZrawError::ParameterOutOfRange(format!("max_allowed_raw_value {}", self.max_allowed_raw_value)));
    }
    Ok(())
  }
}

/// Line parity. The B component's cross-line predictor reads the previous
/// line of the *same* field, so two back buffers exist and parity selects
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Upper = 0,
  Lower = 1,
}

impl Field {
  #[inline(always)]
  pub fn from_line_index(line_index: u32) -> Self {
    if line_index & 1 == 0 {
      Field::Upper
    } else {
      Field::Lower
    }
  }

  #[inline(always)]
  pub fn idx(self) -> usize {
    self as usize
  }
}

/// Per-block parameter bundle shared by both decoding modes.
///
/// Derived from the block's bit budget delta `a`: `b` is the modulus step,
/// `c` the fold range, `d` the step count over the pixel range, `e` the bit
/// width of `d` and `f` the LSB width of the escape code.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockParams {
  pub a: i32,
  pub b: i32,
  pub c: i32,
  pub d: i32,
  pub e: i32,
  pub f: u32,
}

impl BlockParams {
  pub fn derive(bitdepth_diff: i32, params: &CodecParams) -> Result<Self> {
    debug_assert!((0..=15).contains(&bitdepth_diff));
    if bitdepth_diff > params.bitdepth_real {
      return Err(ZrawError::ParameterOutOfRange(format!(
        "bit budget {} exceeds real bitdepth {}",
        bitdepth_diff, params.bitdepth_real
      )));
    }
    let a = bitdepth_diff;
    let b = 1i32 << a;
    let c = std::cmp::max(0, (b >> 1) - 1);
    let d = ((2 * c + params.max_allowed_pixel_value) >> a) + 1;
    let e = if d > 1 { log2ceil(d as usize) as i32 } else { 0 };
    let f = (params.bitdepth_real - a) as u32;
    Ok(Self { a, b, c, d, e, f })
  }
}

/// Rolling per-component decoding state: the adaptive magnitude estimate
/// `g` and the last three reconstructed samples of the current and the
/// previous line. Index 0 is the most recent.
#[derive(Debug, Clone, Copy)]
struct DecodingContext {
  g: i32,
  last_new: [i32; 3],
  last_old: [i32; 3],
}

impl DecodingContext {
  fn new(default_pix_value: u16) -> Self {
    Self {
      g: 4,
      last_new: [default_pix_value as i32; 3],
      last_old: [default_pix_value as i32; 3],
    }
  }

  fn reset(&mut self, default_pix_value: u16) {
    *self = Self::new(default_pix_value);
  }

  /// Age the sliding windows by one sample.
  #[inline(always)]
  fn shift(&mut self) {
    for p in (1..=2).rev() {
      self.last_new[p] = self.last_new[p - 1];
      self.last_old[p] = self.last_old[p - 1];
    }
  }
}
