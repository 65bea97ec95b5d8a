// SPDX-License-Identifier: GPL-3.0-only

//! BIOS Boot Specification device paths (type 0x05).

use alloc::string::String;
use core::fmt;

use crate::device_path::{DevicePathHeader, DevicePathNode, RawNode, HEADER_SIZE};
use crate::error::Result;
use crate::ucs2;

pub const SUBTYPE_BBS_1_01: u8 = 0x01;

const DEVICE_TYPE_OFFSET: usize = HEADER_SIZE;
const STATUS_FLAG_OFFSET: usize = HEADER_SIZE + 2;
const DESCRIPTION_OFFSET: usize = HEADER_SIZE + 4;

/// BIOS Boot Specification Device Path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BiosBootSpecification<'a> {
    header: DevicePathHeader,
    device_type: u16,
    status_flag: u16,
    description: &'a [u8],
}

impl BiosBootSpecification<'_> {
    pub fn decode(raw: RawNode<'_>) -> Result<DevicePathNode<'_>> {
        let length = raw.header().length();
        let device_type = raw.u16_at(DEVICE_TYPE_OFFSET)?;
        let status_flag = raw.u16_at(STATUS_FLAG_OFFSET)?;

        // Description runs up to the NUL terminator, if there is room for one
        let description = if length > DESCRIPTION_OFFSET + 2 {
            raw.field(DESCRIPTION_OFFSET, length - DESCRIPTION_OFFSET - 2)?
        } else {
            &[]
        };

        Ok(DevicePathNode::BiosBootSpec(BiosBootSpecification {
            header: raw.header(),
            device_type,
            status_flag,
            description,
        }))
    }

    pub fn header(&self) -> DevicePathHeader {
        self.header
    }

    pub fn device_type(&self) -> u16 {
        self.device_type
    }

    pub fn status_flag(&self) -> u16 {
        self.status_flag
    }

    pub fn description(&self) -> String {
        ucs2::decode_lossy(self.description)
    }
}

impl fmt::Display for BiosBootSpecification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BBS({:#06x},{:#06x},{})",
            self.device_type,
            self.status_flag,
            self.description()
        )
    }
}
