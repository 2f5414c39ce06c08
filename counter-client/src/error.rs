// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{io, path::PathBuf};

use counter_common::{DecodeError, Watch};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The device node is missing or cannot be opened.
    #[error("failed to open counter device {}: {source}", path.display())]
    DeviceUnavailable { path: PathBuf, source: io::Error },

    /// The kernel refused an add-watch request.
    #[error("kernel rejected watch for {watch}: {source}")]
    WatchRejected { watch: Watch, source: io::Error },

    /// The device handed back something that is not one whole event record.
    #[error("malformed event from counter device: {0}")]
    Protocol(#[from] DecodeError),

    /// A read reached end of file: the device went away.
    #[error("counter device closed")]
    Disconnected,

    #[error("event session is already closed")]
    SessionClosed,

    #[error("counter device I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to access {}: {source}", path.display())]
    Attribute { path: PathBuf, source: io::Error },

    #[error("unexpected contents in {}: {value:?}", path.display())]
    AttributeParse { path: PathBuf, value: String },
}
