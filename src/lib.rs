// SPDX-License-Identifier: GPL-3.0-only

//! Decoding of UEFI boot configuration variables.
//!
//! `BootOrder` decodes to a list of boot option ids and each `BootXXXX`
//! variable decodes to a [`LoadOption`] with its device path nodes. The
//! decoders are pure functions over the variable data. Reading the variables
//! is left to a [`VariableStore`].

#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod bbs;
pub mod boot_order;
pub mod device_path;
#[cfg(feature = "std")]
pub mod efivarfs;
pub mod error;
pub mod guid;
pub mod load_option;
pub mod manager;
pub mod media;
pub mod path_list;
pub mod registry;
pub mod ucs2;
pub mod variable;

pub use self::boot_order::BootOrder;
pub use self::device_path::{DevicePathHeader, DevicePathNode, EndOfHardware, OpaqueNode, RawNode};
pub use self::error::{DecodeError, Error};
pub use self::guid::{GuidFmt, EFI_GLOBAL_VARIABLE_GUID};
pub use self::load_option::{Category, LoadOption, LoadOptionAttributes};
pub use self::manager::{BootEntry, BootManager};
pub use self::path_list::DevicePathList;
pub use self::registry::{Registry, RegistryEntry};
pub use self::variable::{boot_option_name, MemoryStore, VariableStore, BOOT_ORDER_NAME};
