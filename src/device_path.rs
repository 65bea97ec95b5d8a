// SPDX-License-Identifier: GPL-3.0-only

//! Device path nodes.
//!
//! Every node is a 4 byte header (type, subtype, little-endian length
//! including the header) followed by a payload whose layout depends on the
//! (type, subtype) tag.

use alloc::string::String;
use core::{fmt, mem};
use plain::Plain;

use crate::bbs::BiosBootSpecification;
use crate::error::{DecodeError, Result};
use crate::media::{FilePathMedia, HardDriveMedia};

pub const HEADER_SIZE: usize = mem::size_of::<DevicePathHeader>();

pub const TYPE_MEDIA: u8 = 0x04;
pub const TYPE_BBS: u8 = 0x05;
pub const TYPE_END: u8 = 0x7F;

pub const SUBTYPE_END_INSTANCE: u8 = 0x01;
pub const SUBTYPE_END_ENTIRE: u8 = 0xFF;

// EFI_DEVICE_PATH_PROTOCOL
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct DevicePathHeader {
    device_type: u8,
    sub_type: u8,
    length: u16,
}

unsafe impl Plain for DevicePathHeader {}

impl DevicePathHeader {
    /// Read the header at the front of `data`.
    pub fn read(data: &[u8]) -> Result<Self> {
        plain::from_bytes::<Self>(data)
            .map(|header| *header)
            .map_err(|_| DecodeError::TruncatedBuffer {
                offset: 0,
                needed: HEADER_SIZE,
                available: data.len(),
            })
    }

    pub fn device_type(&self) -> u8 {
        self.device_type
    }

    pub fn sub_type(&self) -> u8 {
        self.sub_type
    }

    /// Declared node length in bytes, header included.
    pub fn length(&self) -> usize {
        u16::from_le(self.length) as usize
    }
}

/// A node whose bytes have been split off a device path list but whose
/// payload has not been interpreted yet.
#[derive(Copy, Clone, Debug)]
pub struct RawNode<'a> {
    header: DevicePathHeader,
    bytes: &'a [u8],
}

impl<'a> RawNode<'a> {
    /// `bytes` must span exactly `header.length()` bytes.
    pub(crate) fn new(header: DevicePathHeader, bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len(), header.length());
        Self { header, bytes }
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    /// The whole node, header included.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Bytes `[at, at + size)` of the node, checked against its declared length.
    pub fn field(&self, at: usize, size: usize) -> Result<&'a [u8]> {
        self.bytes
            .get(at..at + size)
            .ok_or(DecodeError::InvalidLength {
                offset: 0,
                length: self.bytes.len(),
                minimum: at + size,
            })
    }

    pub fn u16_at(&self, at: usize) -> Result<u16> {
        let b = self.field(at, 2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Map a packed layout over the start of the node.
    pub fn layout<T: Plain>(&self) -> Result<&'a T> {
        plain::from_bytes::<T>(self.bytes).map_err(|_| DecodeError::InvalidLength {
            offset: 0,
            length: self.bytes.len(),
            minimum: mem::size_of::<T>(),
        })
    }
}

/// End of Hardware Device Path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EndOfHardware {
    header: DevicePathHeader,
}

impl EndOfHardware {
    pub fn decode(raw: RawNode<'_>) -> Result<DevicePathNode<'_>> {
        Ok(DevicePathNode::End(Self {
            header: raw.header(),
        }))
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    /// End of this instance, another instance follows.
    pub fn is_instance_end(&self) -> bool {
        self.header.sub_type() == SUBTYPE_END_INSTANCE
    }

    pub fn is_entire_end(&self) -> bool {
        self.header.sub_type() == SUBTYPE_END_ENTIRE
    }
}

impl fmt::Display for EndOfHardware {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_instance_end() {
            write!(f, "End This Instance of a Device Path")
        } else {
            write!(f, "End Entire Device Path")
        }
    }
}

/// A node with a tag the registry does not know. Kept as header plus payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpaqueNode<'a> {
    header: DevicePathHeader,
    payload: &'a [u8],
}

impl<'a> OpaqueNode<'a> {
    pub fn decode(raw: RawNode<'_>) -> Result<DevicePathNode<'_>> {
        Ok(DevicePathNode::Opaque(OpaqueNode {
            header: raw.header(),
            payload: raw.payload(),
        }))
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

impl fmt::Display for OpaqueNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Path({},{},",
            self.header.device_type(),
            self.header.sub_type()
        )?;
        for b in self.payload {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// A decoded device path node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DevicePathNode<'a> {
    FilePath(FilePathMedia<'a>),
    HardDrive(HardDriveMedia),
    End(EndOfHardware),
    BiosBootSpec(BiosBootSpecification<'a>),
    Opaque(OpaqueNode<'a>),
}

impl DevicePathNode<'_> {
    pub fn header(&self) -> DevicePathHeader {
        match self {
            Self::FilePath(node) => node.header(),
            Self::HardDrive(node) => node.header(),
            Self::End(node) => node.header(),
            Self::BiosBootSpec(node) => node.header(),
            Self::Opaque(node) => node.header(),
        }
    }

    pub fn device_type(&self) -> u8 {
        self.header().device_type()
    }

    pub fn sub_type(&self) -> u8 {
        self.header().sub_type()
    }

    pub fn length(&self) -> usize {
        self.header().length()
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }

    /// Diagnostic line with the node tag followed by its rendering.
    pub fn summary(&self) -> String {
        alloc::format!(
            "type {:#04x} subtype {:#04x}: {}",
            self.device_type(),
            self.sub_type(),
            self
        )
    }
}

impl fmt::Display for DevicePathNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::FilePath(node) => fmt::Display::fmt(node, f),
            Self::HardDrive(node) => fmt::Display::fmt(node, f),
            Self::End(node) => fmt::Display::fmt(node, f),
            Self::BiosBootSpec(node) => fmt::Display::fmt(node, f),
            Self::Opaque(node) => fmt::Display::fmt(node, f),
        }
    }
}
