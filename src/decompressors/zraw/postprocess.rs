// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use crate::blockline::BlockLine;

/// Post-processing chain invoked when a decoded line is finalized.
///
/// The decoder guarantees the call order: component A kernel, component B
/// kernel for the current field, bit truncation of all three back buffers,
/// then the noise-level re-estimate. Kernel internals are owned by the
/// caller; the decoder only drives the sequence.
pub trait LinePostProcessor {
  /// Filter the finished component-A line. `is_needed_field` tells the
  /// kernel whether this line parity carries the chroma field selected by
  /// the bayer pattern.
  fn post_process_a(&mut self, line: &mut BlockLine, is_needed_field: bool, noise_level: u32);

  /// Filter the finished component-B line of the current field.
  fn post_process_b(&mut self, line: &mut BlockLine, noise_level: u32);

  /// Truncate samples to the real bitdepth with the given shift.
  fn truncate(&mut self, samples: &mut [u16], bitdepth_real: i32, shift: u32);

  /// Fold the per-line quiet-pixel count into the rolling noise history
  /// and return the new noise level.
  fn estimate_noise_level(&mut self, threshold_1: i32, threshold_2: i32, small_distance_count: u32, history: &mut [u32; 8]) -> u32;
}

/// Pass-through chain for callers without post-processing kernels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPostProcessor;

impl LinePostProcessor for NullPostProcessor {
  fn post_process_a(&mut self, _line: &mut BlockLine, _is_needed_field: bool, _noise_level: u32) {}

  fn post_process_b(&mut self, _line: &mut BlockLine, _noise_level: u32) {}

  fn truncate(&mut self, _samples: &mut [u16], _bitdepth_real: i32, _shift: u32) {}

  fn estimate_noise_level(&mut self, _threshold_1: i32, _threshold_2: i32, _small_distance_count: u32, _history: &mut [u32; 8]) -> u32 {
    0
  }
}
