// SPDX-License-Identifier: LGPL-2.1
// Copyright 2025 Daniel Vogelbacher <daniel@chaospixel.com>

use super::{Result, ZrawError};

/// The magnitude class that switches a sample to the escape encoding
/// (raw LSB field of default width, value mapped to `lsb + 1`).
pub(super) const ESCAPE_CLASS: u32 = 12;

/// Decode one magnitude class from up to 9 bits of lookahead.
///
/// `data` holds the upcoming bitstream LSB-first. The code is unary with a
/// short tail: `i` leading zero bits select the row, rows 5..=7 read one
/// extra bit after the stop bit to discriminate between two classes.
/// Returns `(class, bits consumed)`.
#[inline(always)]
pub(super) fn magnitude_class(data: u64) -> Result<(u32, u32)> {
  let mut data = data;
  let mut i = 0;
  while i < 9 {
    if data & 1 != 0 {
      break;
    }
    data >>= 1;
    i += 1;
  }

  match i {
    0 => Ok((0, 1)),
    1 => Ok((1, 2)),
    2 => Ok((2, 3)),
    3 => Ok((3, 4)),
    4 => Ok((4, 5)),
    5 => Ok((if (data & 3) == 1 { 5 } else { 6 }, 7)),
    6 => Ok((if (data & 3) == 1 { 7 } else { 8 }, 8)),
    7 => Ok((if (data & 3) == 1 { 11 } else { ESCAPE_CLASS }, 9)),
    8 => Ok((10, 9)),
    9 => Ok((9, 9)),
    _ => Err(ZrawError::NotImplemented(format!("magnitude class row {}", i))),
  }
}
