// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![no_std]

use core::fmt;

use crate::kernel_types::{CounterComponent, CounterEvent, CounterWatch};
pub use crate::{
    kernel_types::{COMPONENT_SIZE, EVENT_SIZE, WATCH_SIZE},
    types::{
        ComponentType, CountDirection, CountMode, EventKind, Function, Scope, SignalLevel,
        SynapseAction, UnknownFunction,
    },
};

pub mod ioctl;
pub mod kernel_types;
pub mod types;

#[cfg(not(asm_generic_ioctl))]
compile_error!("Unsupported architecture: only the asm-generic ioctl encoding is implemented.");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes than the structure occupies.
    Truncated { expected: usize, actual: usize },
    /// A byte that is not a known value of the enum it encodes.
    InvalidValue { field: &'static str, value: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { expected, actual } => {
                write!(f, "truncated record: expected {expected} bytes, got {actual}")
            }
            DecodeError::InvalidValue { field, value } => {
                write!(f, "invalid {field} value {value}")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

/// Identifies the part of a counter device a watch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    pub component_type: ComponentType,
    pub scope: Scope,
    pub parent: u8,
    pub id: u8,
}

impl ComponentRef {
    /// No component: the event is delivered without a value.
    pub const fn none() -> Self {
        Self {
            component_type: ComponentType::None,
            scope: Scope::Device,
            parent: 0,
            id: 0,
        }
    }

    /// The count value of Count `parent`.
    pub const fn count(parent: u8) -> Self {
        Self {
            component_type: ComponentType::Count,
            scope: Scope::Count,
            parent,
            id: 0,
        }
    }

    /// The level of Signal `parent`.
    pub const fn signal(parent: u8) -> Self {
        Self {
            component_type: ComponentType::Signal,
            scope: Scope::Signal,
            parent,
            id: 0,
        }
    }
}

impl Default for ComponentRef {
    fn default() -> Self {
        Self::none()
    }
}

impl From<ComponentRef> for CounterComponent {
    fn from(component: ComponentRef) -> Self {
        CounterComponent {
            component_type: component.component_type.as_u8(),
            scope: component.scope.as_u8(),
            parent: component.parent,
            id: component.id,
        }
    }
}

impl TryFrom<CounterComponent> for ComponentRef {
    type Error = DecodeError;

    fn try_from(raw: CounterComponent) -> Result<Self, Self::Error> {
        Ok(Self {
            component_type: ComponentType::try_from(raw.component_type)?,
            scope: Scope::try_from(raw.scope)?,
            parent: raw.parent,
            id: raw.id,
        })
    }
}

/// A request to be told about `event` on `channel`, reporting the value of
/// `component` with each occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Watch {
    pub component: ComponentRef,
    pub event: EventKind,
    pub channel: u8,
}

impl Watch {
    pub const fn new(component: ComponentRef, event: EventKind, channel: u8) -> Self {
        Self {
            component,
            event,
            channel,
        }
    }

    /// The bytes handed to the add-watch ioctl.
    pub fn encode(&self) -> [u8; WATCH_SIZE] {
        CounterWatch::from(*self).to_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        CounterWatch::from_bytes(bytes)?.try_into()
    }
}

impl From<Watch> for CounterWatch {
    fn from(watch: Watch) -> Self {
        CounterWatch {
            component: watch.component.into(),
            event: watch.event.as_u8(),
            channel: watch.channel,
        }
    }
}

impl TryFrom<CounterWatch> for Watch {
    type Error = DecodeError;

    fn try_from(raw: CounterWatch) -> Result<Self, Self::Error> {
        Ok(Self {
            component: raw.component.try_into()?,
            event: EventKind::try_from(raw.event)?,
            channel: raw.channel,
        })
    }
}

impl fmt::Display for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.component;
        write!(
            f,
            "{} on channel {} ({} {}/{} in {} scope)",
            self.event, self.channel, c.component_type, c.parent, c.id, c.scope
        )
    }
}

/// One record read from the character device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Nanoseconds, kernel monotonic clock.
    pub timestamp: u64,
    pub value: u64,
    pub watch: Watch,
    pub status: u8,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.watch.event
    }

    pub fn encode(&self) -> [u8; EVENT_SIZE] {
        CounterEvent::from(*self).to_bytes()
    }

    /// All or nothing: a short buffer or an unknown enum value in any field
    /// fails the whole record.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        CounterEvent::from_bytes(bytes)?.try_into()
    }
}

impl From<Event> for CounterEvent {
    fn from(event: Event) -> Self {
        CounterEvent {
            timestamp: event.timestamp,
            value: event.value,
            watch: event.watch.into(),
            status: event.status,
        }
    }
}

impl TryFrom<CounterEvent> for Event {
    type Error = DecodeError;

    fn try_from(raw: CounterEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: raw.timestamp,
            value: raw.value,
            watch: raw.watch.try_into()?,
            status: raw.status,
        })
    }
}
