// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Request numbers for the counter character device, encoded the way
//! `include/uapi/asm-generic/ioctl.h` does it.

use crate::kernel_types::WATCH_SIZE;

pub const IOC_NRBITS: u32 = 8;
pub const IOC_TYPEBITS: u32 = 8;
pub const IOC_SIZEBITS: u32 = 14;
pub const IOC_DIRBITS: u32 = 2;

pub const IOC_NRSHIFT: u32 = 0;
pub const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
pub const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
pub const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

pub const IOC_NRMASK: u32 = (1 << IOC_NRBITS) - 1;
pub const IOC_TYPEMASK: u32 = (1 << IOC_TYPEBITS) - 1;
pub const IOC_SIZEMASK: u32 = (1 << IOC_SIZEBITS) - 1;
pub const IOC_DIRMASK: u32 = (1 << IOC_DIRBITS) - 1;

pub const IOC_NONE: u32 = 0;
pub const IOC_WRITE: u32 = 1;
pub const IOC_READ: u32 = 2;

/// The `type` tag the kernel reserves for the counter subsystem.
pub const COUNTER_IOCTL_TYPE: u32 = 0x3E;

/// Packs a request number. Each field is masked to its width, so an
/// oversized argument cannot spill into its neighbours.
pub const fn ioc(dir: u32, ty: u32, nr: u32, size: u32) -> u32 {
    ((dir & IOC_DIRMASK) << IOC_DIRSHIFT)
        | ((ty & IOC_TYPEMASK) << IOC_TYPESHIFT)
        | ((nr & IOC_NRMASK) << IOC_NRSHIFT)
        | ((size & IOC_SIZEMASK) << IOC_SIZESHIFT)
}

pub const fn io(ty: u32, nr: u32) -> u32 {
    ioc(IOC_NONE, ty, nr, 0)
}

pub const fn iow(ty: u32, nr: u32, size: usize) -> u32 {
    ioc(IOC_WRITE, ty, nr, size as u32)
}

pub const fn ioc_dir(code: u32) -> u32 {
    (code >> IOC_DIRSHIFT) & IOC_DIRMASK
}

pub const fn ioc_type(code: u32) -> u32 {
    (code >> IOC_TYPESHIFT) & IOC_TYPEMASK
}

pub const fn ioc_nr(code: u32) -> u32 {
    (code >> IOC_NRSHIFT) & IOC_NRMASK
}

pub const fn ioc_size(code: u32) -> u32 {
    (code >> IOC_SIZESHIFT) & IOC_SIZEMASK
}

const _: () = assert!(WATCH_SIZE as u32 <= IOC_SIZEMASK);

/// `_IOW(0x3E, 0x00, struct counter_watch)`
pub const COUNTER_ADD_WATCH_IOCTL: u32 = iow(COUNTER_IOCTL_TYPE, 0x00, WATCH_SIZE);
/// `_IO(0x3E, 0x01)`
pub const COUNTER_ENABLE_EVENTS_IOCTL: u32 = io(COUNTER_IOCTL_TYPE, 0x01);
/// `_IO(0x3E, 0x02)`
pub const COUNTER_DISABLE_EVENTS_IOCTL: u32 = io(COUNTER_IOCTL_TYPE, 0x02);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_request_numbers() {
        assert_eq!(COUNTER_ADD_WATCH_IOCTL, 0x4006_3E00);
        assert_eq!(COUNTER_ENABLE_EVENTS_IOCTL, 0x3E01);
        assert_eq!(COUNTER_DISABLE_EVENTS_IOCTL, 0x3E02);

        assert_ne!(COUNTER_ADD_WATCH_IOCTL, COUNTER_ENABLE_EVENTS_IOCTL);
        assert_ne!(COUNTER_ADD_WATCH_IOCTL, COUNTER_DISABLE_EVENTS_IOCTL);
        assert_ne!(COUNTER_ENABLE_EVENTS_IOCTL, COUNTER_DISABLE_EVENTS_IOCTL);
    }

    #[test]
    fn fields_unpack() {
        let code = ioc(IOC_READ | IOC_WRITE, 0xAB, 0x12, 0x3FFF);

        assert_eq!(ioc_dir(code), IOC_READ | IOC_WRITE);
        assert_eq!(ioc_type(code), 0xAB);
        assert_eq!(ioc_nr(code), 0x12);
        assert_eq!(ioc_size(code), 0x3FFF);

        assert_eq!(ioc_size(COUNTER_ADD_WATCH_IOCTL), WATCH_SIZE as u32);
        assert_eq!(ioc_dir(COUNTER_ADD_WATCH_IOCTL), IOC_WRITE);
        assert_eq!(ioc_type(COUNTER_DISABLE_EVENTS_IOCTL), COUNTER_IOCTL_TYPE);
    }

    #[test]
    fn oversized_fields_are_masked() {
        // A size one past the field width wraps to zero instead of setting
        // a direction bit.
        assert_eq!(ioc(IOC_NONE, 0x3E, 0x01, 1 << IOC_SIZEBITS), 0x3E01);
        assert_eq!(ioc(IOC_NONE, 0x13E, 0x101, 0), 0x3E01);
        assert_eq!(ioc(IOC_READ | IOC_WRITE | 4, 0, 0, 0) >> IOC_DIRSHIFT, 3);
    }
}
