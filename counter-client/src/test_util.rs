// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{
    cell::RefCell,
    collections::VecDeque,
    ffi::CString,
    io,
    os::unix::ffi::OsStrExt as _,
    path::{Path, PathBuf},
    rc::Rc,
};

use counter_common::{Watch, EVENT_SIZE};

use crate::device::EventDevice;

pub fn make_fifo(dir: &Path) -> PathBuf {
    let path = dir.join("counter0");
    let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
    let ret = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    assert_eq!(ret, 0, "mkfifo: {}", io::Error::last_os_error());
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AddWatch(Watch),
    Enable,
    Disable,
    Closed,
}

/// What the next read on a [`FakeDevice`] returns.
pub enum Pending {
    Bytes(Vec<u8>),
    Errno(i32),
}

/// Records every request it receives in a log shared with the test, so the
/// log outlives the device.
#[derive(Default)]
pub struct FakeDevice {
    pub log: Rc<RefCell<Vec<Request>>>,
    pub reject: Option<(Watch, i32)>,
    pub enable_errno: Option<i32>,
    pub disable_errno: Option<i32>,
    pub pending: VecDeque<Pending>,
}

impl FakeDevice {
    pub fn new() -> (Self, Rc<RefCell<Vec<Request>>>) {
        let device = Self::default();
        let log = device.log.clone();
        (device, log)
    }

    fn fail_with(errno: Option<i32>) -> io::Result<()> {
        match errno {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(()),
        }
    }
}

impl EventDevice for FakeDevice {
    fn add_watch(&mut self, watch: &Watch) -> io::Result<()> {
        self.log.borrow_mut().push(Request::AddWatch(*watch));
        match self.reject {
            Some((rejected, errno)) if rejected == *watch => {
                Err(io::Error::from_raw_os_error(errno))
            }
            _ => Ok(()),
        }
    }

    fn enable_events(&mut self) -> io::Result<()> {
        self.log.borrow_mut().push(Request::Enable);
        Self::fail_with(self.enable_errno)
    }

    fn disable_events(&mut self) -> io::Result<()> {
        self.log.borrow_mut().push(Request::Disable);
        Self::fail_with(self.disable_errno)
    }

    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> io::Result<usize> {
        match self.pending.pop_front() {
            Some(Pending::Bytes(bytes)) => {
                let len = bytes.len().min(EVENT_SIZE);
                buf[..len].copy_from_slice(&bytes[..len]);
                Ok(len)
            }
            Some(Pending::Errno(errno)) => Err(io::Error::from_raw_os_error(errno)),
            None => Err(io::Error::from_raw_os_error(libc::EAGAIN)),
        }
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Request::Closed);
    }
}
