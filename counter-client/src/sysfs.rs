// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Accessors for `/sys/bus/counter/devices/counterN`.
//!
//! Every attribute is a small text file; nothing here is cached, each call
//! goes to the file.

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use counter_common::{ComponentRef, EventKind, Function, Watch};
use log::debug;

use crate::{Error, Result, Session};

pub const SYSFS_COUNTER_DEVICES: &str = "/sys/bus/counter/devices";
pub const DEV_DIR: &str = "/dev";

pub const DEFAULT_CEILING: u64 = u32::MAX as u64;

fn read_attr(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|value| value.trim_end().to_owned())
        .map_err(|source| Error::Attribute {
            path: path.to_owned(),
            source,
        })
}

fn parse_attr<T: FromStr>(path: &Path) -> Result<T> {
    let value = read_attr(path)?;
    value.parse().map_err(|_| Error::AttributeParse {
        path: path.to_owned(),
        value,
    })
}

fn write_attr(path: &Path, value: impl Display) -> Result<()> {
    fs::write(path, value.to_string()).map_err(|source| Error::Attribute {
        path: path.to_owned(),
        source,
    })
}

/// The state every count is put into by [`Counter::configure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountConfig {
    pub function: Function,
    pub ceiling: u64,
    pub count: Option<u64>,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            function: Function::default(),
            ceiling: DEFAULT_CEILING,
            count: None,
        }
    }
}

#[derive(Debug)]
pub struct Counter {
    id: u32,
    sysfs: PathBuf,
    dev: PathBuf,
    counts: Vec<Count>,
    signals: Vec<Signal>,
}

impl Counter {
    pub fn open(id: u32) -> Result<Self> {
        Self::with_paths(
            id,
            Path::new(SYSFS_COUNTER_DEVICES).join(format!("counter{id}")),
            Path::new(DEV_DIR).join(format!("counter{id}")),
        )
    }

    /// Enumerates counts and signals under `sysfs`; `dev` is only touched
    /// by [`Counter::subscribe`].
    pub fn with_paths(id: u32, sysfs: impl Into<PathBuf>, dev: impl Into<PathBuf>) -> Result<Self> {
        let sysfs = sysfs.into();

        let num_counts: u8 = parse_attr(&sysfs.join("num_counts"))?;
        let counts = (0..num_counts)
            .map(|id| Count {
                id,
                dir: sysfs.join(format!("count{id}")),
            })
            .collect();

        let num_signals: u8 = parse_attr(&sysfs.join("num_signals"))?;
        let signals = (0..num_signals)
            .map(|id| Signal {
                id,
                dir: sysfs.join(format!("signal{id}")),
            })
            .collect();

        debug!(
            "counter{id} at {}: {num_counts} count(s), {num_signals} signal(s)",
            sysfs.display()
        );

        Ok(Self {
            id,
            sysfs,
            dev: dev.into(),
            counts,
            signals,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn sysfs_path(&self) -> &Path {
        &self.sysfs
    }

    pub fn device_path(&self) -> &Path {
        &self.dev
    }

    pub fn counts(&self) -> &[Count] {
        &self.counts
    }

    pub fn count(&self, id: u8) -> Option<&Count> {
        self.counts.get(id as usize)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn signal(&self, id: u8) -> Option<&Signal> {
        self.signals.get(id as usize)
    }

    /// Puts every count into a known state, since sysfs may have been left
    /// in any state by a previous user.
    pub fn configure(&self, config: &CountConfig) -> Result<()> {
        for count in &self.counts {
            count.configure(config)?;
        }
        Ok(())
    }

    pub fn subscribe(&self, watches: &[Watch]) -> Result<Session> {
        Session::open(&self.dev, watches)
    }
}

#[derive(Debug, Clone)]
pub struct Count {
    id: u8,
    dir: PathBuf,
}

impl Count {
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The count value, as reported in events watching this count.
    pub fn component(&self) -> ComponentRef {
        ComponentRef::count(self.id)
    }

    /// A watch for `event` on this count's channel, reporting its value.
    pub fn watch(&self, event: EventKind) -> Watch {
        Watch::new(self.component(), event, self.id)
    }

    /// Disables the count first so it does not run while being reconfigured.
    pub fn configure(&self, config: &CountConfig) -> Result<()> {
        debug!(
            "count{}: function '{}', ceiling {}, count {:?}",
            self.id, config.function, config.ceiling, config.count
        );

        self.set_enabled(false)?;
        self.set_ceiling(config.ceiling)?;
        self.set_function(config.function)?;
        if let Some(count) = config.count {
            self.set_count(count)?;
        }
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        parse_attr(&self.dir.join("count"))
    }

    pub fn set_count(&self, value: u64) -> Result<()> {
        write_attr(&self.dir.join("count"), value)
    }

    pub fn ceiling(&self) -> Result<u64> {
        parse_attr(&self.dir.join("ceiling"))
    }

    pub fn set_ceiling(&self, value: u64) -> Result<()> {
        write_attr(&self.dir.join("ceiling"), value)
    }

    pub fn ceiling_component_id(&self) -> Result<u8> {
        parse_attr(&self.dir.join("ceiling_component_id"))
    }

    pub fn enabled(&self) -> Result<bool> {
        let value: u8 = parse_attr(&self.dir.join("enable"))?;
        Ok(value != 0)
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        write_attr(&self.dir.join("enable"), u8::from(enabled))
    }

    pub fn function(&self) -> Result<Function> {
        parse_attr(&self.dir.join("function"))
    }

    pub fn set_function(&self, function: Function) -> Result<()> {
        write_attr(&self.dir.join("function"), function)
    }

    pub fn functions_available(&self) -> Result<Vec<Function>> {
        let path = self.dir.join("function_available");
        let contents = read_attr(&path)?;
        contents
            .lines()
            .map(|line| {
                line.parse().map_err(|_| Error::AttributeParse {
                    path: path.clone(),
                    value: line.to_owned(),
                })
            })
            .collect()
    }

    pub fn name(&self) -> Result<String> {
        read_attr(&self.dir.join("name"))
    }
}

#[derive(Debug, Clone)]
pub struct Signal {
    id: u8,
    dir: PathBuf,
}

impl Signal {
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn name(&self) -> Result<String> {
        read_attr(&self.dir.join("name"))
    }
}
