// SPDX-License-Identifier: GPL-3.0-only

use alloc::string::String;
use core::fmt;

/// Result type for the structural decoders.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// Structural errors raised while decoding a variable.
///
/// Offsets are byte offsets into the buffer that was handed to the
/// top-level decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A declared length or offset runs past the available bytes.
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// A NUL-terminated UTF-16LE string never terminates.
    MissingTerminator { offset: usize },
    /// A device path node declares a length that cannot hold its fields.
    InvalidLength {
        offset: usize,
        length: usize,
        minimum: usize,
    },
    /// Node walking did not land exactly on the declared list length.
    OverrunMismatch {
        offset: usize,
        declared: usize,
        consumed: usize,
    },
}

impl DecodeError {
    /// Rebase the error offset onto an enclosing buffer.
    pub fn rebase(self, base: usize) -> Self {
        match self {
            Self::TruncatedBuffer { offset, needed, available } => Self::TruncatedBuffer {
                offset: offset + base,
                needed,
                available,
            },
            Self::MissingTerminator { offset } => Self::MissingTerminator {
                offset: offset + base,
            },
            Self::InvalidLength { offset, length, minimum } => Self::InvalidLength {
                offset: offset + base,
                length,
                minimum,
            },
            Self::OverrunMismatch { offset, declared, consumed } => Self::OverrunMismatch {
                offset: offset + base,
                declared,
                consumed,
            },
        }
    }

    pub fn offset(&self) -> usize {
        match *self {
            Self::TruncatedBuffer { offset, .. }
            | Self::MissingTerminator { offset }
            | Self::InvalidLength { offset, .. }
            | Self::OverrunMismatch { offset, .. } => offset,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::TruncatedBuffer { offset, needed, available } => write!(
                f,
                "truncated buffer at offset {:#x}: need {} bytes, {} available",
                offset, needed, available
            ),
            Self::MissingTerminator { offset } => write!(
                f,
                "string starting at offset {:#x} has no NUL terminator",
                offset
            ),
            Self::InvalidLength { offset, length, minimum } => write!(
                f,
                "device path node at offset {:#x} has length {}, minimum is {}",
                offset, length, minimum
            ),
            Self::OverrunMismatch { offset, declared, consumed } => write!(
                f,
                "device path list at offset {:#x} declares {} bytes but nodes consume {}",
                offset, declared, consumed
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Errors from reading and decoding a named firmware variable.
#[derive(Debug)]
pub enum Error {
    /// The variable store could not produce the variable.
    Variable {
        name: String,
        error: uefi::status::Error,
    },
    /// The variable was read but its contents are malformed.
    Decode { name: String, error: DecodeError },
}

impl Error {
    /// Name of the variable the error refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Variable { name, .. } | Self::Decode { name, .. } => name,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Variable { name, error } => write!(f, "failed to read {}: {:?}", name, error),
            Self::Decode { name, error } => write!(f, "failed to decode {}: {}", name, error),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
