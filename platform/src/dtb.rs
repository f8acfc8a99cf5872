//! Which device tree blob to hand to the OS.
//!
//! The firmware image carries two blobs, a vendor-kernel one and a mainline one, each stored as a
//! file named by GUID. This module only picks the GUID.
use core::fmt;

use bytemuck::{Contiguous, Pod, Zeroable};
use byteorder::{ByteOrder, LittleEndian};

/// A 128-bit identifier in the usual firmware layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// On-disk byte form: the first three fields little endian, `data4` as is.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut b = [0u8; 16];
        LittleEndian::write_u32(&mut b[0..4], self.data1);
        LittleEndian::write_u16(&mut b[4..6], self.data2);
        LittleEndian::write_u16(&mut b[6..8], self.data3);
        b[8..].copy_from_slice(&self.data4);
        b
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// Device tree flavour requested by the user.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Contiguous)]
pub enum CompatMode {
    /// Tree matching the vendor (BSP) kernel.
    Vendor = 1,
    /// Tree matching upstream Linux.
    Mainline = 2,
}

pub static VENDOR_DTB_FILE_GUID: Guid = Guid::new(
    0xd58b4028,
    0x43d8,
    0x4e97,
    [0x87, 0xd4, 0x4e, 0x37, 0x16, 0x13, 0x65, 0x80],
);

pub static MAINLINE_DTB_FILE_GUID: Guid = Guid::new(
    0x117855c9,
    0xfa71,
    0x43d8,
    [0x89, 0x37, 0x37, 0xd8, 0x1b, 0x19, 0xcd, 0x02],
);

/// File GUID of the blob for `mode`.
pub fn select(mode: CompatMode) -> &'static Guid {
    match mode {
        CompatMode::Vendor => &VENDOR_DTB_FILE_GUID,
        CompatMode::Mainline => &MAINLINE_DTB_FILE_GUID,
    }
}

/// File GUID for a raw compatibility mode setting, if there is a blob for it.
pub fn dtb_file_guid(compat_mode: u32) -> Option<&'static Guid> {
    CompatMode::from_integer(compat_mode).map(select)
}
