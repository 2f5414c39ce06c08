// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! User-space access to Linux counter devices: event subscriptions over the
//! `/dev/counterN` character device and configuration through sysfs.

pub mod device;
mod error;
pub mod session;
pub mod sysfs;

#[cfg(test)]
mod test_util;

pub use counter_common::{
    ComponentRef, ComponentType, DecodeError, Event, EventKind, Function, Scope, Watch,
};

pub use crate::{
    device::{CharDevice, EventDevice},
    error::{Error, Result},
    session::{Drain, Session},
    sysfs::{Count, CountConfig, Counter, Signal},
};
