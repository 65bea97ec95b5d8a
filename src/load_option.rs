// SPDX-License-Identifier: GPL-3.0-only

use alloc::string::String;
use bitflags::bitflags;
use core::{fmt, mem};
use plain::Plain;

use crate::error::{DecodeError, Result};
use crate::path_list::DevicePathList;
use crate::registry::Registry;
use crate::ucs2;

bitflags! {
    /// EFI_LOAD_OPTION attributes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct LoadOptionAttributes: u32 {
        const ACTIVE = 0x0000_0001;
        const FORCE_RECONNECT = 0x0000_0002;
        const HIDDEN = 0x0000_0008;
        const CATEGORY = 0x0000_1F00;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Boot,
    App,
    Other(u8),
}

impl LoadOptionAttributes {
    pub fn category(&self) -> Category {
        match (self.bits() & Self::CATEGORY.bits()) >> 8 {
            0 => Category::Boot,
            1 => Category::App,
            other => Category::Other(other as u8),
        }
    }
}

// EFI_LOAD_OPTION, up to the description
#[derive(Copy, Clone, Debug)]
#[repr(C, packed)]
struct LoadOptionHeader {
    attributes: u32,
    file_path_list_length: u16,
}

unsafe impl Plain for LoadOptionHeader {}

const HEADER_SIZE: usize = mem::size_of::<LoadOptionHeader>();

/// A decoded `BootXXXX` variable.
///
/// Borrows the variable data; only the description is copied out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOption<'a> {
    attributes: LoadOptionAttributes,
    file_path_list_length: u16,
    description: String,
    file_path_list: DevicePathList<'a>,
    optional_data: &'a [u8],
    device_path_offset: usize,
}

impl<'a> LoadOption<'a> {
    pub fn from_raw(data: &'a [u8]) -> Result<Self> {
        Self::from_raw_with(Registry::builtin(), data)
    }

    pub fn from_raw_with(registry: &Registry, data: &'a [u8]) -> Result<Self> {
        let header = plain::from_bytes::<LoadOptionHeader>(data).map_err(|_| {
            DecodeError::TruncatedBuffer {
                offset: 0,
                needed: HEADER_SIZE,
                available: data.len(),
            }
        })?;
        let attributes = LoadOptionAttributes::from_bits_retain(u32::from_le(header.attributes));
        let file_path_list_length = u16::from_le(header.file_path_list_length);

        let (description, units) = ucs2::read_terminated(data, HEADER_SIZE)?;

        let device_path_offset = HEADER_SIZE + 2 * (units + 1);
        let list_len = file_path_list_length as usize;
        let end = device_path_offset + list_len;
        if end > data.len() {
            return Err(DecodeError::TruncatedBuffer {
                offset: device_path_offset,
                needed: list_len,
                available: data.len() - device_path_offset,
            });
        }

        let file_path_list =
            DevicePathList::from_raw_with(registry, &data[device_path_offset..end], list_len)
                .map_err(|err| err.rebase(device_path_offset))?;

        Ok(Self {
            attributes,
            file_path_list_length,
            description,
            file_path_list,
            optional_data: &data[end..],
            device_path_offset,
        })
    }

    pub fn attributes(&self) -> LoadOptionAttributes {
        self.attributes
    }

    pub fn is_active(&self) -> bool {
        self.attributes.contains(LoadOptionAttributes::ACTIVE)
    }

    pub fn is_hidden(&self) -> bool {
        self.attributes.contains(LoadOptionAttributes::HIDDEN)
    }

    pub fn category(&self) -> Category {
        self.attributes.category()
    }

    pub fn file_path_list_length(&self) -> u16 {
        self.file_path_list_length
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn file_path_list(&self) -> &DevicePathList<'a> {
        &self.file_path_list
    }

    pub fn optional_data(&self) -> &'a [u8] {
        self.optional_data
    }

    /// Offset of the file path list within the variable data.
    pub fn device_path_offset(&self) -> usize {
        self.device_path_offset
    }
}

impl fmt::Display for LoadOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.description, self.file_path_list)
    }
}
