// SPDX-License-Identifier: GPL-3.0-only

//! Dispatch from a device path node tag to its decoder.
//!
//! The table is a fixed list built at compile time. Supporting another node
//! kind means adding one entry here; the list walker does not change.

use crate::bbs::{self, BiosBootSpecification};
use crate::device_path::{
    DevicePathNode, EndOfHardware, OpaqueNode, RawNode, SUBTYPE_END_ENTIRE,
    SUBTYPE_END_INSTANCE, TYPE_BBS, TYPE_END, TYPE_MEDIA,
};
use crate::error::Result;
use crate::media::{self, FilePathMedia, HardDriveMedia};

/// Decoder for the payload of one node kind.
pub type DecodeFn = for<'a> fn(RawNode<'a>) -> Result<DevicePathNode<'a>>;

#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub device_type: u8,
    pub sub_type: u8,
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl RegistryEntry {
    pub const fn new(device_type: u8, sub_type: u8, name: &'static str, decode: DecodeFn) -> Self {
        Self {
            device_type,
            sub_type,
            name,
            decode,
        }
    }
}

/// Read-only tag table, safe to share between threads.
#[derive(Clone, Copy)]
pub struct Registry {
    entries: &'static [RegistryEntry],
}

static BUILTIN_ENTRIES: [RegistryEntry; 5] = [
    RegistryEntry::new(TYPE_MEDIA, media::SUBTYPE_HARD_DRIVE, "HardDriveMedia", HardDriveMedia::decode),
    RegistryEntry::new(TYPE_MEDIA, media::SUBTYPE_FILE_PATH, "FilePathMedia", FilePathMedia::decode),
    RegistryEntry::new(TYPE_BBS, bbs::SUBTYPE_BBS_1_01, "BIOSBootSpecification", BiosBootSpecification::decode),
    RegistryEntry::new(TYPE_END, SUBTYPE_END_INSTANCE, "EndOfHardware", EndOfHardware::decode),
    RegistryEntry::new(TYPE_END, SUBTYPE_END_ENTIRE, "EndOfHardware", EndOfHardware::decode),
];

static BUILTIN: Registry = Registry::new(&BUILTIN_ENTRIES);

impl Registry {
    pub const fn new(entries: &'static [RegistryEntry]) -> Self {
        Self { entries }
    }

    /// The node kinds this crate knows how to decode.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn entries(&self) -> &'static [RegistryEntry] {
        self.entries
    }

    pub fn lookup(&self, device_type: u8, sub_type: u8) -> Option<&'static RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.device_type == device_type && entry.sub_type == sub_type)
    }

    /// Decode a node, falling back to an opaque node for unknown tags.
    pub fn decode<'a>(&self, raw: RawNode<'a>) -> Result<DevicePathNode<'a>> {
        let header = raw.header();
        match self.lookup(header.device_type(), header.sub_type()) {
            Some(entry) => (entry.decode)(raw),
            None => OpaqueNode::decode(raw),
        }
    }
}
