// SPDX-License-Identifier: GPL-3.0-only

//! UTF-16LE helpers for firmware strings.

use alloc::string::String;
use core::char;

use crate::error::{DecodeError, Result};

fn units(data: &[u8]) -> impl Iterator<Item = u16> + '_ {
    data.chunks_exact(2).map(|w| u16::from_le_bytes([w[0], w[1]]))
}

/// Decode a UTF-16LE run, replacing unpaired surrogates.
///
/// A trailing odd byte is ignored.
pub fn decode_lossy(data: &[u8]) -> String {
    char::decode_utf16(units(data))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decode a NUL-terminated UTF-16LE string starting at `offset`.
///
/// Returns the string and the number of code units before the terminator.
pub fn read_terminated(data: &[u8], offset: usize) -> Result<(String, usize)> {
    let tail = data.get(offset..).ok_or(DecodeError::TruncatedBuffer {
        offset,
        needed: 2,
        available: 0,
    })?;

    let count = units(tail)
        .position(|w| w == 0)
        .ok_or(DecodeError::MissingTerminator { offset })?;

    Ok((decode_lossy(&tail[..count * 2]), count))
}
