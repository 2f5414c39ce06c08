// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{
    ffi::c_void,
    fs::{File, OpenOptions},
    io::{self, Read as _},
    os::{fd::AsRawFd as _, unix::fs::OpenOptionsExt as _},
    path::{Path, PathBuf},
};

use counter_common::{
    ioctl::{COUNTER_ADD_WATCH_IOCTL, COUNTER_DISABLE_EVENTS_IOCTL, COUNTER_ENABLE_EVENTS_IOCTL},
    Watch, EVENT_SIZE,
};
use log::trace;
use nix::{errno::Errno, sys::ioctl::ioctl_num_type};

/// The requests a [`crate::Session`] makes of a counter character device.
///
/// Closing the device is dropping it.
pub trait EventDevice {
    fn add_watch(&mut self, watch: &Watch) -> io::Result<()>;

    fn enable_events(&mut self) -> io::Result<()>;

    fn disable_events(&mut self) -> io::Result<()>;

    /// One non-blocking read. Must fail with [`io::ErrorKind::WouldBlock`]
    /// when nothing is queued.
    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> io::Result<usize>;
}

/// An open `/dev/counterN` node.
#[derive(Debug)]
pub struct CharDevice {
    file: File,
    path: PathBuf,
}

impl CharDevice {
    /// Opens `path` read-only with `O_NONBLOCK` already set, so no read on
    /// the handle can ever sleep.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;

        trace!("opened {} as fd {}", path.display(), file.as_raw_fd());

        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ioctl(&self, request: u32, arg: *const c_void) -> io::Result<()> {
        trace!(
            "ioctl(fd: {}, request: {request:#010x}) on {}",
            self.file.as_raw_fd(),
            self.path.display()
        );

        // SAFETY: the fd is owned by self.file and stays open for the call;
        // arg is either null or points at a live buffer of the size encoded
        // in the request.
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), request as ioctl_num_type, arg) };
        Errno::result(ret).map(drop).map_err(io::Error::from)
    }
}

impl EventDevice for CharDevice {
    fn add_watch(&mut self, watch: &Watch) -> io::Result<()> {
        let payload = watch.encode();
        self.ioctl(COUNTER_ADD_WATCH_IOCTL, payload.as_ptr().cast())
    }

    fn enable_events(&mut self) -> io::Result<()> {
        self.ioctl(COUNTER_ENABLE_EVENTS_IOCTL, std::ptr::null())
    }

    fn disable_events(&mut self) -> io::Result<()> {
        self.ioctl(COUNTER_DISABLE_EVENTS_IOCTL, std::ptr::null())
    }

    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
