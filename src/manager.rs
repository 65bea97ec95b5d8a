// SPDX-License-Identifier: GPL-3.0-only

use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, warn};

use crate::boot_order::BootOrder;
use crate::error::{DecodeError, Error};
use crate::guid::{GuidFmt, EFI_GLOBAL_VARIABLE_GUID};
use crate::load_option::LoadOption;
use crate::variable::{boot_option_name, VariableStore, BOOT_ORDER_NAME};

/// A boot option read from the variable store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootEntry {
    id: u16,
    data: Vec<u8>,
}

impl BootEntry {
    /// Wrap the data of `BootXXXX`, failing if it does not decode.
    pub fn new(id: u16, data: Vec<u8>) -> Result<Self, DecodeError> {
        LoadOption::from_raw(&data)?;
        Ok(Self { id, data })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn name(&self) -> String {
        boot_option_name(self.id)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn load_option(&self) -> Result<LoadOption<'_>, DecodeError> {
        LoadOption::from_raw(&self.data)
    }
}

/// Reads boot configuration from the EFI global variable namespace.
pub struct BootManager<S> {
    store: S,
}

impl<S: VariableStore> BootManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, Error> {
        let data = self
            .store
            .get_variable(name, &EFI_GLOBAL_VARIABLE_GUID)
            .map_err(|error| Error::Variable {
                name: name.into(),
                error,
            })?;
        debug!(
            "{}:{}: {} bytes",
            name,
            GuidFmt(&EFI_GLOBAL_VARIABLE_GUID),
            data.len()
        );
        Ok(data)
    }

    pub fn boot_order(&self) -> Result<BootOrder, Error> {
        let data = self.read(BOOT_ORDER_NAME)?;
        BootOrder::from_raw(&data).map_err(|error| Error::Decode {
            name: BOOT_ORDER_NAME.into(),
            error,
        })
    }

    pub fn boot_entry(&self, id: u16) -> Result<BootEntry, Error> {
        let name = boot_option_name(id);
        let data = self.read(&name)?;
        BootEntry::new(id, data).map_err(|error| Error::Decode { name, error })
    }

    /// Every entry named in `BootOrder`, in boot order.
    ///
    /// A failing entry does not stop the walk.
    pub fn boot_entries(&self) -> Result<Vec<Result<BootEntry, Error>>, Error> {
        let order = self.boot_order()?;
        Ok(self.entries_in(&order))
    }

    /// Entries named in an already decoded `order`.
    pub fn entries_in(&self, order: &BootOrder) -> Vec<Result<BootEntry, Error>> {
        order
            .iter()
            .map(|&id| {
                let entry = self.boot_entry(id);
                if let Err(err) = &entry {
                    warn!("{}", err);
                }
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::MemoryStore;
    use core::cell::RefCell;
    use uefi::status::Error as Status;

    const BOOT_0001: &[u8] = &[
        // Attributes: active
        0x01, 0x00, 0x00, 0x00,
        // File path list length
        0x04, 0x00,
        // "A" and NUL
        0x41, 0x00, 0x00, 0x00,
        // End entire device path
        0x7F, 0xFF, 0x04, 0x00,
    ];

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(
            BOOT_ORDER_NAME,
            &EFI_GLOBAL_VARIABLE_GUID,
            vec![0x01, 0x00, 0x02, 0x00, 0x03, 0x00],
        );
        store.insert("Boot0001", &EFI_GLOBAL_VARIABLE_GUID, BOOT_0001.to_vec());
        // Missing terminator
        store.insert("Boot0002", &EFI_GLOBAL_VARIABLE_GUID, BOOT_0001[..8].to_vec());
        store
    }

    #[test]
    fn test_boot_order() {
        let manager = BootManager::new(store());
        assert_eq!(manager.boot_order().unwrap().ids(), &[1, 2, 3]);
    }

    #[test]
    fn test_boot_entry() {
        let manager = BootManager::new(store());
        let entry = manager.boot_entry(1).unwrap();
        assert_eq!(entry.name(), "Boot0001");
        let option = entry.load_option().unwrap();
        assert_eq!(option.description(), "A");
        assert!(option.is_active());
    }

    #[test]
    fn test_errors_kept_apart() {
        let manager = BootManager::new(store());

        match manager.boot_entry(2) {
            Err(Error::Decode { name, error }) => {
                assert_eq!(name, "Boot0002");
                assert_eq!(error, DecodeError::MissingTerminator { offset: 6 });
            }
            other => panic!("unexpected result {:?}", other),
        }

        match manager.boot_entry(3) {
            Err(Error::Variable { name, error }) => {
                assert_eq!(name, "Boot0003");
                assert!(matches!(error, Status::NotFound));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_boot_entries() {
        let manager = BootManager::new(store());
        let entries = manager.boot_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].as_ref().map(|e| e.id()).ok(), Some(1));
        assert_eq!(entries[1].as_ref().err().map(|e| e.name()), Some("Boot0002"));
        assert_eq!(entries[2].as_ref().err().map(|e| e.name()), Some("Boot0003"));
    }

    struct CountingStore {
        inner: MemoryStore,
        reads: RefCell<Vec<String>>,
    }

    impl VariableStore for CountingStore {
        fn get_variable(&self, name: &str, guid: &uefi::guid::Guid) -> uefi::status::Result<Vec<u8>> {
            self.reads.borrow_mut().push(name.into());
            self.inner.get_variable(name, guid)
        }
    }

    #[test]
    fn test_order_read_once() {
        let manager = BootManager::new(CountingStore {
            inner: store(),
            reads: RefCell::new(Vec::new()),
        });

        let order = manager.boot_order().unwrap();
        let entries = manager.entries_in(&order);
        assert_eq!(entries.len(), 3);
        assert_eq!(
            *manager.store().reads.borrow(),
            ["BootOrder", "Boot0001", "Boot0002", "Boot0003"]
        );
    }

    #[test]
    fn test_no_boot_order() {
        let manager = BootManager::new(MemoryStore::new());
        assert!(matches!(
            manager.boot_entries(),
            Err(Error::Variable {
                error: Status::NotFound,
                ..
            })
        ));
    }

    struct DeniedStore;

    impl VariableStore for DeniedStore {
        fn get_variable(&self, _name: &str, _guid: &uefi::guid::Guid) -> uefi::status::Result<Vec<u8>> {
            Err(Status::AccessDenied)
        }
    }

    #[test]
    fn test_access_denied() {
        let manager = BootManager::new(DeniedStore);
        assert!(matches!(
            manager.boot_order(),
            Err(Error::Variable {
                error: Status::AccessDenied,
                ..
            })
        ));
    }
}
