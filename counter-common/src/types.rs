// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::{fmt, str::FromStr};

use crate::DecodeError;

macro_rules! kernel_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = DecodeError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    _ => Err(DecodeError::InvalidValue {
                        field: $field,
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.as_u8()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

kernel_enum! {
    /// enum counter_component_type
    ComponentType, "component type" {
        None = 0 => "none",
        Signal = 1 => "signal",
        Count = 2 => "count",
        Function = 3 => "function",
        SynapseAction = 4 => "synapse action",
        Extension = 5 => "extension",
    }
}

kernel_enum! {
    /// enum counter_scope
    Scope, "scope" {
        Device = 0 => "device",
        Signal = 1 => "signal",
        Count = 2 => "count",
    }
}

kernel_enum! {
    /// enum counter_event_type
    EventKind, "event" {
        Overflow = 0 => "overflow",
        Underflow = 1 => "underflow",
        OverflowUnderflow = 2 => "overflow-underflow",
        Threshold = 3 => "threshold",
        Index = 4 => "index",
        DirectionChange = 5 => "direction-change",
        Timeout = 6 => "timeout",
    }
}

kernel_enum! {
    /// enum counter_count_direction
    CountDirection, "count direction" {
        Forward = 0 => "forward",
        Backward = 1 => "backward",
    }
}

kernel_enum! {
    /// enum counter_count_mode
    CountMode, "count mode" {
        Normal = 0 => "normal",
        RangeLimit = 1 => "range limit",
        NonRecycle = 2 => "non-recycle",
        ModuloN = 3 => "modulo-n",
    }
}

kernel_enum! {
    /// enum counter_function. The labels are the strings the `function`
    /// sysfs attribute reads and accepts.
    Function, "function" {
        Increase = 0 => "increase",
        Decrease = 1 => "decrease",
        PulseDirection = 2 => "pulse-direction",
        QuadratureX1A = 3 => "quadrature x1 a",
        QuadratureX1B = 4 => "quadrature x1 b",
        QuadratureX2A = 5 => "quadrature x2 a",
        QuadratureX2B = 6 => "quadrature x2 b",
        QuadratureX4 = 7 => "quadrature x4",
    }
}

kernel_enum! {
    /// enum counter_signal_level
    SignalLevel, "signal level" {
        Low = 0 => "low",
        High = 1 => "high",
    }
}

kernel_enum! {
    /// enum counter_synapse_action
    SynapseAction, "synapse action" {
        None = 0 => "none",
        RisingEdge = 1 => "rising edge",
        FallingEdge = 2 => "falling edge",
        BothEdges = 3 => "both edges",
    }
}

impl Default for Function {
    fn default() -> Self {
        Function::QuadratureX4
    }
}

/// Returned when a string is not one of the kernel's function names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFunction;

impl fmt::Display for UnknownFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown counter function, expected one of: ")?;
        for (i, function) in Function::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{function}'")?;
        }
        Ok(())
    }
}

impl core::error::Error for UnknownFunction {}

impl FromStr for Function {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Function::ALL
            .iter()
            .copied()
            .find(|function| function.name() == s)
            .ok_or(UnknownFunction)
    }
}
