// SPDX-License-Identifier: GPL-3.0-only

use alloc::vec::Vec;
use core::ops::Deref;

use crate::error::{DecodeError, Result};

/// Decoded `BootOrder` variable, highest priority first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BootOrder(Vec<u16>);

impl BootOrder {
    pub fn from_raw(data: &[u8]) -> Result<Self> {
        if data.len() % 2 != 0 {
            return Err(DecodeError::TruncatedBuffer {
                offset: data.len() - 1,
                needed: 2,
                available: 1,
            });
        }

        Ok(Self(
            data.chunks_exact(2)
                .map(|w| u16::from_le_bytes([w[0], w[1]]))
                .collect(),
        ))
    }

    pub fn ids(&self) -> &[u16] {
        &self.0
    }
}

impl Deref for BootOrder {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.0
    }
}
