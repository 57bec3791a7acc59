// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

#![allow(dead_code)]

use zrawler::{CodecParams, LINE_BLOCK_SIZE};

pub fn init_test_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// LSB-first bit writer mirroring the decoder's pump: the first pushed bit
/// lands in bit 0 of the first byte.
pub struct BitWriter {
  bytes: Vec<u8>,
  nbits: usize,
}

impl BitWriter {
  pub fn new() -> Self {
    Self { bytes: Vec::new(), nbits: 0 }
  }

  pub fn push(&mut self, value: u64, bits: u32) {
    for k in 0..bits {
      if self.nbits / 8 == self.bytes.len() {
        self.bytes.push(0);
      }
      self.bytes[self.nbits / 8] |= (((value >> k) & 1) as u8) << (self.nbits % 8);
      self.nbits += 1;
    }
  }

  pub fn bit_len(&self) -> usize {
    self.nbits
  }

  /// Close the stream with enough slack for 48-bit lookaheads.
  pub fn finish(mut self) -> Vec<u8> {
    self.bytes.resize(self.bytes.len() + 8, 0);
    self.bytes
  }

  /// Close the stream padded to at least `len` bytes.
  pub fn finish_padded(mut self, len: usize) -> Vec<u8> {
    self.bytes.resize(std::cmp::max(self.bytes.len() + 8, len), 0);
    self.bytes
  }
}

/// One-block 12-bit parameter set most scenarios build on.
pub fn base_params() -> CodecParams {
  CodecParams {
    default_pix_value: 0,
    max_allowed_pixel_value: 4095,
    max_allowed_raw_value: 4095,
    max_values_count: LINE_BLOCK_SIZE as i32,
    blocks_count: 1,
    stride: false,
    align_mode: 0,
    lossless: false,
    bitdepth_real: 12,
    bayer_pattern: 0,
    noise_level_1: 0,
    noise_level_2: 0,
    noise_level_distance: 30,
  }
}

/// Encode one full-block variable-length line of all-zero residuals.
///
/// With every symbol value at zero, the magnitude estimate decays from its
/// initial 4 as 2, 1, 1, ... so the LSB field widths per pixel are 2, 1 and
/// then 0 for the rest of the block. Class 0 is the single bit '1'.
pub fn push_zero_residual_line(writer: &mut BitWriter, with_bitdepth_field: bool) {
  if with_bitdepth_field {
    writer.push(0, 4);
  }
  writer.push(0, 1); // variable-length mode
  for i in 0..LINE_BLOCK_SIZE {
    writer.push(1, 1); // class 0 for component A
    writer.push(1, 1); // class 0 for component B
    let width = match i {
      0 => 2,
      1 => 1,
      _ => 0,
    };
    writer.push(0, width);
    writer.push(0, width);
  }
}
