// SPDX-License-Identifier: GPL-3.0-only

//! Media device paths (type 0x04).

use alloc::string::String;
use core::fmt;
use plain::Plain;
use uefi::guid::Guid;

use crate::device_path::{DevicePathHeader, DevicePathNode, RawNode, HEADER_SIZE};
use crate::error::{DecodeError, Result};
use crate::guid::{guid_from_bytes, GuidFmt};
use crate::ucs2;

pub const SUBTYPE_HARD_DRIVE: u8 = 0x01;
pub const SUBTYPE_FILE_PATH: u8 = 0x04;

pub const PARTITION_FORMAT_MBR: u8 = 0x01;
pub const PARTITION_FORMAT_GPT: u8 = 0x02;

pub const SIGNATURE_TYPE_NONE: u8 = 0x00;
pub const SIGNATURE_TYPE_MBR: u8 = 0x01;
pub const SIGNATURE_TYPE_GUID: u8 = 0x02;

/// File Path Media Device Path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilePathMedia<'a> {
    header: DevicePathHeader,
    path: &'a [u8],
}

impl FilePathMedia<'_> {
    pub fn decode(raw: RawNode<'_>) -> Result<DevicePathNode<'_>> {
        let length = raw.header().length();
        // Header and NUL terminator
        let minimum = HEADER_SIZE + 2;
        if length < minimum {
            return Err(DecodeError::InvalidLength {
                offset: 0,
                length,
                minimum,
            });
        }

        Ok(DevicePathNode::FilePath(FilePathMedia {
            header: raw.header(),
            path: raw.field(HEADER_SIZE, length - minimum)?,
        }))
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    /// Path name, without its NUL terminator.
    pub fn path_name(&self) -> String {
        ucs2::decode_lossy(self.path)
    }
}

impl fmt::Display for FilePathMedia<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FilePath({})", self.path_name())
    }
}

// HARDDRIVE_DEVICE_PATH
#[derive(Copy, Clone, Debug)]
#[repr(C, packed)]
struct HardDriveLayout {
    _header: DevicePathHeader,
    partition_number: u32,
    partition_start: u64,
    partition_size: u64,
    partition_signature: [u8; 16],
    partition_format: u8,
    signature_type: u8,
}

unsafe impl Plain for HardDriveLayout {}

/// Hard Drive Media Device Path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HardDriveMedia {
    header: DevicePathHeader,
    partition_number: u32,
    partition_start: u64,
    partition_size: u64,
    partition_signature: [u8; 16],
    partition_format: u8,
    signature_type: u8,
}

impl HardDriveMedia {
    pub fn decode(raw: RawNode<'_>) -> Result<DevicePathNode<'_>> {
        let layout = raw.layout::<HardDriveLayout>()?;

        Ok(DevicePathNode::HardDrive(Self {
            header: raw.header(),
            partition_number: u32::from_le(layout.partition_number),
            partition_start: u64::from_le(layout.partition_start),
            partition_size: u64::from_le(layout.partition_size),
            partition_signature: layout.partition_signature,
            partition_format: layout.partition_format,
            signature_type: layout.signature_type,
        }))
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    pub fn partition_number(&self) -> u32 {
        self.partition_number
    }

    /// Starting LBA of the partition.
    pub fn partition_start(&self) -> u64 {
        self.partition_start
    }

    /// Size of the partition in logical blocks.
    pub fn partition_size(&self) -> u64 {
        self.partition_size
    }

    pub fn partition_signature(&self) -> &[u8; 16] {
        &self.partition_signature
    }

    pub fn partition_format(&self) -> u8 {
        self.partition_format
    }

    pub fn signature_type(&self) -> u8 {
        self.signature_type
    }

    /// MBR disk signature, for MBR-signed partitions.
    pub fn mbr_signature(&self) -> Option<u32> {
        if self.signature_type == SIGNATURE_TYPE_MBR {
            let s = &self.partition_signature;
            Some(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
        } else {
            None
        }
    }

    /// GPT unique partition GUID, for GUID-signed partitions.
    pub fn partition_guid(&self) -> Option<Guid> {
        if self.signature_type == SIGNATURE_TYPE_GUID {
            Some(guid_from_bytes(&self.partition_signature))
        } else {
            None
        }
    }
}

impl fmt::Display for HardDriveMedia {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HD({},", self.partition_number)?;
        match self.partition_format {
            PARTITION_FORMAT_MBR => write!(f, "MBR,")?,
            PARTITION_FORMAT_GPT => write!(f, "GPT,")?,
            other => write!(f, "{:#04x},", other)?,
        }
        if let Some(guid) = self.partition_guid() {
            write!(f, "{:x}", GuidFmt(&guid))?;
        } else if let Some(signature) = self.mbr_signature() {
            write!(f, "{:#010x}", signature)?;
        } else {
            write!(f, "0")?;
        }
        write!(
            f,
            ",{:#x},{:#x})",
            self.partition_start, self.partition_size
        )
    }
}
