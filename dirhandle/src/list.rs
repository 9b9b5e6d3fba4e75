use std::ffi::OsStr;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use common::clap::ArgMatches;
use common::parking_lot::Mutex;
use common::{Scheduler, SchedulerConfig};

use crate::prelude::*;
use crate::{Batch, DirHandle, Dirent, DotEntries};

pub(crate) fn opt_list(dir: &OsStr, matches: &ArgMatches) -> Result<()> {
    let dir = Path::new(dir);

    let capacity = matches
        .value_of("batch")
        .unwrap_or("16")
        .parse::<NonZeroUsize>()
        .context("--batch must be a number greater than zero")?;

    let dot_entries = if matches.is_present("skip-dots") {
        DotEntries::Skip
    } else {
        DotEntries::Include
    };

    let total = if matches.is_present("async") {
        let workers = matches
            .value_of("workers")
            .unwrap_or("4")
            .parse::<usize>()
            .context("--workers must be a number")?;
        list_async(dir, capacity, dot_entries, workers)?
    } else {
        list_sync(dir, capacity, dot_entries)?
    };

    info!("{:?}: {} entries", dir, total);
    Ok(())
}

fn print_entries(entries: &[Dirent]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in entries {
        writeln!(out, "{}\t{}", entry.kind(), entry.name().to_string_lossy())?;
    }
    Ok(())
}

fn list_sync(dir: &Path, capacity: NonZeroUsize, dot_entries: DotEntries) -> Result<usize> {
    let mut handle = DirHandle::new();
    handle.set_dot_entries(dot_entries);
    handle.open(dir)?;

    let mut batch = Batch::new(capacity);
    let listed = read_all(&mut handle, &mut batch);

    // close in any case, a read error takes precedence
    let closed = handle.close();
    handle.reset_state();

    let total = listed?;
    closed?;
    Ok(total)
}

fn read_all(handle: &mut DirHandle, batch: &mut Batch) -> Result<usize> {
    let mut total = 0;
    loop {
        match handle.read(batch)? {
            0 => return Ok(total),
            count => {
                print_entries(batch.filled(count))?;
                total += count;
            }
        }
    }
}

/// State carried through the chain of completions.
struct Listing {
    total: usize,
    outcome: Arc<Mutex<Option<Result<usize, DirError>>>>,
}

impl Listing {
    fn finish(self, result: Result<usize, DirError>) {
        *self.outcome.lock() = Some(result);
    }
}

fn list_async(
    dir: &Path,
    capacity: NonZeroUsize,
    dot_entries: DotEntries,
    workers: usize,
) -> Result<usize> {
    let scheduler = Scheduler::start(SchedulerConfig::default().workers(workers))?;
    let outcome = Arc::new(Mutex::new(None));

    let listing = Listing {
        total: 0,
        outcome: Arc::clone(&outcome),
    };

    DirHandle::new()
        .with_dot_entries(dot_entries)
        .open_async(&scheduler, dir, move |scheduler, handle| {
            on_open(scheduler, handle, Batch::new(capacity), listing)
        })
        .map_err(|stopped| anyhow!("{}", stopped))?;

    let dispatched = scheduler.run();
    trace!("dispatched {} completions", dispatched);
    scheduler.stop();

    let result = outcome
        .lock()
        .take()
        .ok_or_else(|| anyhow!("listing did not complete"))?;
    Ok(result?)
}

fn on_open(scheduler: &Scheduler, handle: DirHandle, batch: Batch, listing: Listing) {
    match handle.outcome() {
        Ok(_) => read_next(scheduler, handle, batch, listing),
        Err(err) => listing.finish(Err(err)),
    }
}

fn read_next(scheduler: &Scheduler, handle: DirHandle, batch: Batch, listing: Listing) {
    let queued = handle.read_async(scheduler, batch, move |scheduler, handle, batch| {
        on_read(scheduler, handle, batch, listing)
    });

    if let Err(stopped) = queued {
        error!("readdir not queued: {}", stopped);
    }
}

fn on_read(scheduler: &Scheduler, handle: DirHandle, batch: Batch, mut listing: Listing) {
    match handle.outcome() {
        Ok(0) => {
            let total = listing.total;
            close(scheduler, handle, listing, Ok(total))
        }
        Ok(count) => match print_entries(batch.filled(count)) {
            Ok(()) => {
                listing.total += count;
                read_next(scheduler, handle, batch, listing)
            }
            Err(err) => close(scheduler, handle, listing, Err(err.into())),
        },
        Err(err) => close(scheduler, handle, listing, Err(err)),
    }
}

fn close(
    scheduler: &Scheduler,
    mut handle: DirHandle,
    listing: Listing,
    result: Result<usize, DirError>,
) {
    handle.reset_state();

    let queued = handle.close_async(scheduler, move |_, handle| {
        listing.finish(result.and_then(|total| handle.outcome().map(|_| total)))
    });

    if let Err(stopped) = queued {
        error!("closedir not queued: {}", stopped);
    }
}
