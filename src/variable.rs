// SPDX-License-Identifier: GPL-3.0-only

//! Firmware variable names and the stores they are read from.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use uefi::guid::Guid;
use uefi::status::{Error, Result};

use crate::guid::GuidFmt;

pub const BOOT_ORDER_NAME: &str = "BootOrder";

/// Variable name of a boot option, `Boot0001` for id 1.
pub fn boot_option_name(id: u16) -> String {
    format!("Boot{:04X}", id)
}

/// Boot option id of a `BootXXXX` variable name.
pub fn parse_boot_option_name(name: &str) -> Option<u16> {
    let hex = name.strip_prefix("Boot")?;
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

/// A source of firmware variables.
///
/// Reading may need privileges the caller does not hold, in which case the
/// store returns `Error::AccessDenied`.
pub trait VariableStore {
    fn get_variable(&self, name: &str, guid: &Guid) -> Result<Vec<u8>>;
}

impl<T: VariableStore + ?Sized> VariableStore for &T {
    fn get_variable(&self, name: &str, guid: &Guid) -> Result<Vec<u8>> {
        (**self).get_variable(name, guid)
    }
}

/// Variables held in memory, such as a dump taken on another machine.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    vars: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(name: &str, guid: &Guid) -> String {
        format!("{}-{:x}", name, GuidFmt(guid))
    }

    pub fn insert(&mut self, name: &str, guid: &Guid, data: Vec<u8>) -> Option<Vec<u8>> {
        self.vars.insert(Self::key(name, guid), data)
    }

    pub fn remove(&mut self, name: &str, guid: &Guid) -> Option<Vec<u8>> {
        self.vars.remove(&Self::key(name, guid))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl VariableStore for MemoryStore {
    fn get_variable(&self, name: &str, guid: &Guid) -> Result<Vec<u8>> {
        self.vars
            .get(&Self::key(name, guid))
            .cloned()
            .ok_or(Error::NotFound)
    }
}
