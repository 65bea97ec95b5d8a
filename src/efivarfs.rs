// SPDX-License-Identifier: GPL-3.0-only

//! Linux efivarfs backed variable store.

use alloc::vec::Vec;
use log::{debug, trace};
use std::{fs, io, path::PathBuf};
use uefi::guid::Guid;
use uefi::status::{Error, Result};

use crate::guid::GuidFmt;
use crate::variable::VariableStore;

/// Files in efivarfs start with the variable's 32-bit attribute word.
const ATTRIBUTES_SIZE: usize = 4;

#[derive(Clone, Debug)]
pub struct Efivarfs {
    root: PathBuf,
}

impl Efivarfs {
    pub const DEFAULT_ROOT: &'static str = "/sys/firmware/efi/efivars";

    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, name: &str, guid: &Guid) -> PathBuf {
        self.root.join(format!("{}-{:x}", name, GuidFmt(guid)))
    }
}

/// Firmware status for a failed read of a variable file.
fn status(kind: io::ErrorKind) -> Error {
    match kind {
        io::ErrorKind::NotFound => Error::NotFound,
        io::ErrorKind::PermissionDenied => Error::AccessDenied,
        _ => Error::DeviceError,
    }
}

impl Default for Efivarfs {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

impl VariableStore for Efivarfs {
    fn get_variable(&self, name: &str, guid: &Guid) -> Result<Vec<u8>> {
        let path = self.path(name, guid);
        debug!("Reading {}:{}", name, GuidFmt(guid));

        let data = fs::read(&path).map_err(|err| {
            debug!("{}: {}", path.display(), err);
            status(err.kind())
        })?;

        if data.len() < ATTRIBUTES_SIZE {
            return Err(Error::BadBufferSize);
        }
        let attributes = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        trace!("{}: attributes {:#x}", name, attributes);

        Ok(data[ATTRIBUTES_SIZE..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::EFI_GLOBAL_VARIABLE_GUID;

    #[test]
    fn test_read_strips_attributes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("BootOrder-8be4df61-93ca-11d2-aa0d-00e098032b8c"),
            [0x07, 0x00, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00],
        )
        .unwrap();

        let store = Efivarfs::new(dir.path());
        let data = store
            .get_variable("BootOrder", &EFI_GLOBAL_VARIABLE_GUID)
            .unwrap();
        assert_eq!(data, vec![0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = Efivarfs::new(dir.path());
        assert!(matches!(
            store.get_variable("Boot0001", &EFI_GLOBAL_VARIABLE_GUID),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_short_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Boot0001-8be4df61-93ca-11d2-aa0d-00e098032b8c"),
            [0x07, 0x00],
        )
        .unwrap();

        let store = Efivarfs::new(dir.path());
        assert!(matches!(
            store.get_variable("Boot0001", &EFI_GLOBAL_VARIABLE_GUID),
            Err(Error::BadBufferSize)
        ));
    }

    #[test]
    fn test_unreadable_entry() {
        // A directory where the variable file should be
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Boot0001-8be4df61-93ca-11d2-aa0d-00e098032b8c")).unwrap();

        let store = Efivarfs::new(dir.path());
        assert!(matches!(
            store.get_variable("Boot0001", &EFI_GLOBAL_VARIABLE_GUID),
            Err(Error::DeviceError)
        ));
    }

    #[test]
    fn test_status() {
        assert!(matches!(status(io::ErrorKind::NotFound), Error::NotFound));
        assert!(matches!(status(io::ErrorKind::PermissionDenied), Error::AccessDenied));
        assert!(matches!(status(io::ErrorKind::InvalidData), Error::DeviceError));
        assert!(matches!(status(io::ErrorKind::UnexpectedEof), Error::DeviceError));
    }
}
