// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Mirrors of the structures in `include/uapi/linux/counter.h`.
//!
//! These are only ever converted to and from bytes field by field; the
//! `repr(C)` definitions exist so the offsets below are checked against the
//! layout the compiler would give the kernel's own structs.

use core::mem::{offset_of, size_of};

use crate::DecodeError;

/// Size of `struct counter_component`.
pub const COMPONENT_SIZE: usize = 4;
/// Size of `struct counter_watch`, the payload of the add-watch ioctl.
pub const WATCH_SIZE: usize = 6;
/// Size of `struct counter_event`, including the trailing padding byte. Every
/// read from the character device must ask for exactly this many bytes.
pub const EVENT_SIZE: usize = 24;

/// Matches the kernel's struct counter_component
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CounterComponent {
    pub component_type: u8, // enum counter_component_type
    pub scope: u8,          // enum counter_scope
    pub parent: u8,         // id of the parent signal or count
    pub id: u8,             // id of the component within the parent
}

/// Matches the kernel's struct counter_watch
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CounterWatch {
    pub component: CounterComponent,
    pub event: u8,   // enum counter_event_type
    pub channel: u8, // event channel, usually the count id
}

/// Matches the kernel's struct counter_event
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CounterEvent {
    pub timestamp: u64, // ktime_get_ns() at the time of the event
    pub value: u64,     // value of the watched component
    pub watch: CounterWatch,
    pub status: u8, // errno of a failed component read, 0 on success
}

const _: () = {
    assert!(size_of::<CounterComponent>() == COMPONENT_SIZE);
    assert!(size_of::<CounterWatch>() == WATCH_SIZE);
    assert!(size_of::<CounterEvent>() == EVENT_SIZE);

    assert!(offset_of!(CounterWatch, event) == 4);
    assert!(offset_of!(CounterWatch, channel) == 5);

    assert!(offset_of!(CounterEvent, timestamp) == 0);
    assert!(offset_of!(CounterEvent, value) == 8);
    assert!(offset_of!(CounterEvent, watch) == 16);
    assert!(offset_of!(CounterEvent, status) == 22);
};

fn check_len(bytes: &[u8], expected: usize) -> Result<(), DecodeError> {
    if bytes.len() < expected {
        return Err(DecodeError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    Ok(())
}

impl CounterComponent {
    pub fn to_bytes(&self) -> [u8; COMPONENT_SIZE] {
        [self.component_type, self.scope, self.parent, self.id]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(bytes, COMPONENT_SIZE)?;

        Ok(Self {
            component_type: bytes[0],
            scope: bytes[1],
            parent: bytes[2],
            id: bytes[3],
        })
    }
}

impl CounterWatch {
    pub fn to_bytes(&self) -> [u8; WATCH_SIZE] {
        let mut buf = [0u8; WATCH_SIZE];
        buf[..COMPONENT_SIZE].copy_from_slice(&self.component.to_bytes());
        buf[4] = self.event;
        buf[5] = self.channel;
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(bytes, WATCH_SIZE)?;

        Ok(Self {
            component: CounterComponent::from_bytes(&bytes[..COMPONENT_SIZE])?,
            event: bytes[4],
            channel: bytes[5],
        })
    }
}

impl CounterEvent {
    pub fn to_bytes(&self) -> [u8; EVENT_SIZE] {
        let mut buf = [0u8; EVENT_SIZE];
        buf[0..8].copy_from_slice(&self.timestamp.to_ne_bytes());
        buf[8..16].copy_from_slice(&self.value.to_ne_bytes());
        buf[16..22].copy_from_slice(&self.watch.to_bytes());
        buf[22] = self.status;
        buf
    }

    /// Decodes one record as emitted by the device, in native byte order.
    /// The trailing padding byte is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        check_len(bytes, EVENT_SIZE)?;

        let mut word = [0u8; 8];

        word.copy_from_slice(&bytes[0..8]);
        let timestamp = u64::from_ne_bytes(word);

        word.copy_from_slice(&bytes[8..16]);
        let value = u64::from_ne_bytes(word);

        Ok(Self {
            timestamp,
            value,
            watch: CounterWatch::from_bytes(&bytes[16..22])?,
            status: bytes[22],
        })
    }
}
