// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

//! Library to decode the line-level block bitstream of ZRAW digital camera
//! images. Given the codec parameters extracted by a containing frame
//! parser and a bit-level view of the compressed payload, the decoder
//! reconstructs two interleaved pixel rows per line, block by block, as
//! 16-bit samples.
//!
//! # Example
//! ```rust,no_run
//! use zrawler::{BitPumpLsb, CodecParams, LineBlockDecoder, NullPostProcessor};
//!
//! fn main() {
//!   let params = CodecParams {
//!     default_pix_value: 0,
//!     max_allowed_pixel_value: 4095,
//!     max_allowed_raw_value: 4095,
//!     max_values_count: 16,
//!     blocks_count: 1,
//!     stride: false,
//!     align_mode: 0,
//!     lossless: true,
//!     bitdepth_real: 12,
//!     bayer_pattern: 0,
//!     noise_level_1: 0,
//!     noise_level_2: 0,
//!     noise_level_distance: 30,
//!   };
//!   let data = std::fs::read("line.bin").unwrap();
//!
//!   let mut decoder = LineBlockDecoder::new(params).unwrap();
//!   let mut pump = BitPumpLsb::new(&data);
//!   decoder.read_line(&mut pump).unwrap();
//!
//!   let line = decoder.line_a();
//!   decoder.finalize_line(&mut NullPostProcessor).unwrap();
//!   println!("decoded {} samples", line.len());
//! }
//! ```

#![deny(unstable_features)]

pub mod bits;
pub mod blockline;
pub mod decompressors;
pub mod pumps;

pub use blockline::BlockLine;
pub use blockline::LINE_BLOCK_SIZE;
pub use decompressors::zraw::CodecParams;
pub use decompressors::zraw::LineBlockDecoder;
pub use decompressors::zraw::LinePostProcessor;
pub use decompressors::zraw::NullPostProcessor;
pub use decompressors::zraw::Result;
pub use decompressors::zraw::ZrawError;
pub use pumps::BitPump;
pub use pumps::BitPumpLsb;

#[cfg(test)]
pub(crate) fn init_test_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}
