// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{path::PathBuf, time::Duration};

use anyhow::{Context as _, Result};
use clap::Parser;
use counter_client::{
    sysfs::{DEV_DIR, SYSFS_COUNTER_DEVICES},
    Count, CountConfig, Counter, Session,
};
use counter_common::{EventKind, Function};
use log::{debug, warn};

use crate::rotations::Rotations;

mod rotations;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Counter device number, as in /dev/counterN
    #[arg(short = 'c', long = "counter", default_value_t = 0)]
    counter: u32,

    /// Highest value of count0 before it wraps; 359 gives one count per degree
    #[arg(long, default_value_t = 359)]
    ceiling: u64,

    /// Value count0 starts from
    #[arg(long = "count", default_value_t = 0)]
    initial_count: u64,

    /// Counting function, e.g. 'quadrature x4' or 'pulse-direction'
    #[arg(long, default_value_t = Function::default())]
    function: Function,

    /// Milliseconds between two polls of the event queue
    #[arg(
        short = 'i',
        long = "interval",
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_ms: u64,

    /// sysfs directory of the counter, instead of /sys/bus/counter/devices/counterN
    #[arg(long)]
    sysfs_dir: Option<PathBuf>,

    /// Character device of the counter, instead of /dev/counterN
    #[arg(long)]
    device: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let name = format!("counter{}", args.counter);
    let sysfs_dir = args
        .sysfs_dir
        .unwrap_or_else(|| PathBuf::from(SYSFS_COUNTER_DEVICES).join(&name));
    let device = args
        .device
        .unwrap_or_else(|| PathBuf::from(DEV_DIR).join(&name));

    let counter = Counter::with_paths(args.counter, sysfs_dir, device)?;
    counter.configure(&CountConfig {
        function: args.function,
        ceiling: args.ceiling,
        count: Some(args.initial_count),
    })?;

    let count0 = counter.count(0).context("counter has no count0")?;
    print_attributes(&counter, count0)?;

    let mut session = counter.subscribe(&[
        count0.watch(EventKind::Overflow),
        count0.watch(EventKind::Underflow),
    ])?;

    count0.set_enabled(true)?;

    let result = track_rotations(
        &mut session,
        count0,
        args.ceiling,
        Duration::from_millis(args.interval_ms),
    )
    .await;

    if let Err(e) = count0.set_enabled(false) {
        warn!("failed to disable count0: {e}");
    }

    // A polling error takes precedence over a close error.
    let closed = session.close();
    result?;
    Ok(closed?)
}

fn print_attributes(counter: &Counter, count0: &Count) -> Result<()> {
    debug!("counter sysfs at {}", counter.sysfs_path().display());

    println!("count0/ceiling: {}", count0.ceiling()?);
    println!("count0/enable: {}", count0.enabled()?);
    println!("count0/function: {}", count0.function()?);
    let available = count0
        .functions_available()?
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ");
    println!("count0/function_available: {available}");
    println!("count0/name: {}", count0.name()?);

    for signal in counter.signals() {
        println!("signal{}/name: {}", signal.id(), signal.name()?);
    }

    Ok(())
}

async fn track_rotations(
    session: &mut Session,
    count0: &Count,
    ceiling: u64,
    interval: Duration,
) -> Result<()> {
    let mut rotations = Rotations::new(ceiling);
    let mut ticker = tokio::time::interval(interval);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res.context("failed to listen for Ctrl-C")?;
                println!("Exiting...");
                return Ok(());
            }
            _ = ticker.tick() => {
                println!("rotations: {} count: {}", rotations.turns(), count0.count()?);

                for event in session.drain() {
                    rotations.apply(&event?);
                }
            }
        }
    }
}
