// SPDX-License-Identifier: GPL-3.0-only

use alloc::vec::Vec;
use core::{fmt, slice};
use log::trace;

use crate::device_path::{DevicePathHeader, DevicePathNode, RawNode, HEADER_SIZE};
use crate::error::{DecodeError, Result};
use crate::registry::Registry;

/// Ordered device path nodes of a load option's file path list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DevicePathList<'a> {
    nodes: Vec<DevicePathNode<'a>>,
}

impl<'a> DevicePathList<'a> {
    /// Decode `declared` bytes of device path nodes from the start of `data`.
    pub fn from_raw(data: &'a [u8], declared: usize) -> Result<Self> {
        Self::from_raw_with(Registry::builtin(), data, declared)
    }

    pub fn from_raw_with(registry: &Registry, data: &'a [u8], declared: usize) -> Result<Self> {
        let list = data.get(..declared).ok_or(DecodeError::TruncatedBuffer {
            offset: 0,
            needed: declared,
            available: data.len(),
        })?;

        let mut nodes = Vec::new();
        let mut offset = 0;
        while offset < declared {
            let rest = &list[offset..];
            // Trailing fragment too short for a header
            if rest.len() < HEADER_SIZE {
                return Err(DecodeError::OverrunMismatch {
                    offset,
                    declared,
                    consumed: offset + HEADER_SIZE,
                });
            }
            let header = DevicePathHeader::read(rest).map_err(|err| err.rebase(offset))?;

            let length = header.length();
            if length < HEADER_SIZE {
                return Err(DecodeError::InvalidLength {
                    offset,
                    length,
                    minimum: HEADER_SIZE,
                });
            }

            // Node runs past the end of the list
            if length > rest.len() {
                return Err(DecodeError::TruncatedBuffer {
                    offset,
                    needed: length,
                    available: rest.len(),
                });
            }

            let node = registry
                .decode(RawNode::new(header, &rest[..length]))
                .map_err(|err| err.rebase(offset))?;
            trace!("device path node at {:#x}: {}", offset, node.summary());

            nodes.push(node);
            offset += length;
        }

        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[DevicePathNode<'a>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, DevicePathNode<'a>> {
        self.nodes.iter()
    }

    /// Split the list into device path instances, dropping the end nodes.
    pub fn instances(&self) -> Vec<&[DevicePathNode<'a>]> {
        self.nodes
            .split(|node| node.is_end())
            .filter(|instance| !instance.is_empty())
            .collect()
    }
}

impl<'l, 'a> IntoIterator for &'l DevicePathList<'a> {
    type Item = &'l DevicePathNode<'a>;
    type IntoIter = slice::Iter<'l, DevicePathNode<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl fmt::Display for DevicePathList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for node in self.nodes.iter().filter(|node| !node.is_end()) {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{}", node)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const END_ENTIRE: &[u8] = &[0x7F, 0xFF, 0x04, 0x00];

    #[test]
    fn test_single_end() {
        let list = DevicePathList::from_raw(END_ENTIRE, 4).unwrap();
        assert_eq!(list.len(), 1);
        match &list.nodes()[0] {
            DevicePathNode::End(end) => {
                assert!(end.is_entire_end());
                assert_eq!(end.to_string(), "End Entire Device Path");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_empty() {
        let list = DevicePathList::from_raw(&[], 0).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.to_string(), "");
    }

    #[test]
    fn test_node_count() {
        let data: &[u8] = &[
            // Unknown node with 2 byte payload
            0x03, 0x0F, 0x06, 0x00, 0xAA, 0xBB,
            // File path "A"
            0x04, 0x04, 0x08, 0x00, 0x41, 0x00, 0x00, 0x00,
            // End entire
            0x7F, 0xFF, 0x04, 0x00,
        ];

        let list = DevicePathList::from_raw(data, data.len()).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.iter().map(|n| n.length()).sum::<usize>(), data.len());
        assert_eq!(list.to_string(), "Path(3,15,aabb)/FilePath(A)");
    }

    #[test]
    fn test_declared_shorter_than_buffer() {
        // Bytes beyond the declared length are not walked
        let data: &[u8] = &[0x7F, 0xFF, 0x04, 0x00, 0x01, 0x02, 0x03];
        let list = DevicePathList::from_raw(data, 4).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_node_past_list() {
        // Second node claims 6 bytes but only 4 remain
        let data: &[u8] = &[
            0x7F, 0x01, 0x04, 0x00,
            0x7F, 0xFF, 0x06, 0x00,
        ];
        assert_eq!(
            DevicePathList::from_raw(data, 8),
            Err(DecodeError::TruncatedBuffer {
                offset: 4,
                needed: 6,
                available: 4,
            })
        );
    }

    #[test]
    fn test_node_past_list_within_buffer() {
        // The buffer holds the whole node but the declared list ends first
        let data: &[u8] = &[
            0x7F, 0x01, 0x04, 0x00,
            0x04, 0x04, 0x08, 0x00, 0x41, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            DevicePathList::from_raw(data, 10),
            Err(DecodeError::TruncatedBuffer {
                offset: 4,
                needed: 8,
                available: 6,
            })
        );
    }

    #[test]
    fn test_invalid_length() {
        let data: &[u8] = &[0x7F, 0xFF, 0x02, 0x00];
        assert_eq!(
            DevicePathList::from_raw(data, 4),
            Err(DecodeError::InvalidLength {
                offset: 0,
                length: 2,
                minimum: 4,
            })
        );
    }

    #[test]
    fn test_zero_length_does_not_loop() {
        let data: &[u8] = &[0x04, 0x04, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            DevicePathList::from_raw(data, 6),
            Err(DecodeError::InvalidLength { length: 0, .. })
        ));
    }

    #[test]
    fn test_partial_header() {
        let data: &[u8] = &[0x7F, 0xFF, 0x04, 0x00, 0x7F, 0xFF];
        assert_eq!(
            DevicePathList::from_raw(data, 6),
            Err(DecodeError::OverrunMismatch {
                offset: 4,
                declared: 6,
                consumed: 8,
            })
        );
    }

    #[test]
    fn test_list_past_buffer() {
        assert_eq!(
            DevicePathList::from_raw(END_ENTIRE, 8),
            Err(DecodeError::TruncatedBuffer {
                offset: 0,
                needed: 8,
                available: 4,
            })
        );
    }

    #[test]
    fn test_node_error_rebased() {
        // Hard drive node at offset 4 declaring only 8 bytes
        let data: &[u8] = &[
            0x7F, 0x01, 0x04, 0x00,
            0x04, 0x01, 0x08, 0x00, 0x01, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            DevicePathList::from_raw(data, data.len()),
            Err(DecodeError::InvalidLength {
                offset: 4,
                length: 8,
                minimum: 42,
            })
        );
    }

    #[test]
    fn test_instances() {
        let data: &[u8] = &[
            0x04, 0x04, 0x08, 0x00, 0x41, 0x00, 0x00, 0x00,
            0x7F, 0x01, 0x04, 0x00,
            0x04, 0x04, 0x08, 0x00, 0x42, 0x00, 0x00, 0x00,
            0x7F, 0xFF, 0x04, 0x00,
        ];

        let list = DevicePathList::from_raw(data, data.len()).unwrap();
        let instances = list.instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0][0].to_string(), "FilePath(A)");
        assert_eq!(instances[1][0].to_string(), "FilePath(B)");
    }

    #[test]
    fn test_idempotent() {
        let data: &[u8] = &[0x04, 0x04, 0x08, 0x00, 0x41, 0x00, 0x00, 0x00];
        assert_eq!(
            DevicePathList::from_raw(data, 8),
            DevicePathList::from_raw(data, 8)
        );
    }
}
