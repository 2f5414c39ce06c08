// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{io, path::Path};

use counter_common::{DecodeError, Event, Watch, EVENT_SIZE};
use log::{debug, trace, warn};

use crate::{
    device::{CharDevice, EventDevice},
    Error, Result,
};

/// A set of watches registered on one open counter device, with event
/// delivery enabled.
///
/// Events stay enabled for as long as the session holds its device. Closing
/// the session, explicitly or by dropping it, disables events and then closes
/// the handle.
#[derive(Debug)]
pub struct Session<D: EventDevice = CharDevice> {
    device: Option<D>,
    watches: Vec<Watch>,
}

impl Session<CharDevice> {
    /// Opens the device node at `path` and subscribes to `watches`.
    pub fn open(path: impl AsRef<Path>, watches: &[Watch]) -> Result<Self> {
        let path = path.as_ref();
        let device = CharDevice::open(path).map_err(|source| Error::DeviceUnavailable {
            path: path.to_owned(),
            source,
        })?;

        debug!(
            "subscribing to {} watch(es) on {}",
            watches.len(),
            device.path().display()
        );

        Self::with_device(device, watches)
    }
}

impl<D: EventDevice> Session<D> {
    /// Registers every watch, in order, then enables events.
    ///
    /// On any failure `device` is dropped before returning, and events are
    /// never enabled with only part of the watch list registered.
    pub fn with_device(mut device: D, watches: &[Watch]) -> Result<Self> {
        for watch in watches {
            trace!("adding watch: {watch}");
            device
                .add_watch(watch)
                .map_err(|source| Error::WatchRejected {
                    watch: *watch,
                    source,
                })?;
        }

        device.enable_events()?;
        debug!("events enabled");

        Ok(Self {
            device: Some(device),
            watches: watches.to_vec(),
        })
    }

    pub fn watches(&self) -> &[Watch] {
        &self.watches
    }

    pub fn is_active(&self) -> bool {
        self.device.is_some()
    }

    /// Attempts to read one event without blocking.
    ///
    /// `Ok(None)` means nothing is queued yet. Errors leave the session
    /// active; the caller decides whether to keep polling.
    pub fn read_event(&mut self) -> Result<Option<Event>> {
        let device = self.device.as_mut().ok_or(Error::SessionClosed)?;
        let mut buf = [0u8; EVENT_SIZE];

        match device.read_record(&mut buf) {
            Ok(0) => Err(Error::Disconnected),
            Ok(n) if n < EVENT_SIZE => Err(Error::Protocol(DecodeError::Truncated {
                expected: EVENT_SIZE,
                actual: n,
            })),
            Ok(_) => {
                let event = Event::decode(&buf)?;
                trace!(
                    "event {} value {} at {} (status {})",
                    event.kind(),
                    event.value,
                    event.timestamp,
                    event.status
                );
                Ok(Some(event))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Reads events until none are queued. Iteration also ends after the
    /// first error, which is yielded.
    pub fn drain(&mut self) -> Drain<'_, D> {
        Drain {
            session: self,
            done: false,
        }
    }

    /// Disables events and closes the device.
    ///
    /// The handle is released even when disabling fails; that failure is
    /// still returned. Closing an already closed session does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut device) = self.device.take() else {
            return Ok(());
        };

        let result = device.disable_events();
        drop(device);
        debug!("events disabled, device closed");

        result.map_err(Error::Io)
    }
}

impl<D: EventDevice> Drop for Session<D> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("error while closing counter event session: {e}");
        }
    }
}

pub struct Drain<'a, D: EventDevice> {
    session: &'a mut Session<D>,
    done: bool,
}

impl<D: EventDevice> Iterator for Drain<'_, D> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.session.read_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
