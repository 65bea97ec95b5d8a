// SPDX-License-Identifier: GPL-3.0-only

use core::fmt;
use uefi::guid::Guid;

/// EFI_GLOBAL_VARIABLE, the namespace of `BootOrder` and `BootXXXX`.
pub const EFI_GLOBAL_VARIABLE_GUID: Guid = Guid(
    0x8BE4_DF61,
    0x93CA,
    0x11D2,
    [0xAA, 0x0D, 0x00, 0xE0, 0x98, 0x03, 0x2B, 0x8C],
);

/// Read a GUID stored in its on-disk mixed-endian layout.
pub fn guid_from_bytes(b: &[u8; 16]) -> Guid {
    Guid(
        u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        u16::from_le_bytes([b[4], b[5]]),
        u16::from_le_bytes([b[6], b[7]]),
        [b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]],
    )
}

/// GUID formatter.
///
/// `{}` gives the registry form `{8BE4DF61-93CA-11D2-AA0D-00E098032B8C}`,
/// `{:x}` gives the efivarfs form `8be4df61-93ca-11d2-aa0d-00e098032b8c`.
pub struct GuidFmt<'a>(pub &'a Guid);

impl fmt::Display for GuidFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let g = self.0;
        write!(
            f,
            "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-",
            g.0, g.1, g.2, g.3[0], g.3[1]
        )?;
        for b in &g.3[2..] {
            write!(f, "{:02X}", b)?;
        }
        write!(f, "}}")
    }
}

impl fmt::LowerHex for GuidFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let g = self.0;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-",
            g.0, g.1, g.2, g.3[0], g.3[1]
        )?;
        for b in &g.3[2..] {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
