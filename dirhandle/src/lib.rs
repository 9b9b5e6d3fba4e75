mod prelude;
use common::clap::ArgMatches;

use crate::prelude::*;

mod optargs;
pub use self::optargs::optargs;

mod batch;
mod closedir;
mod entry;
mod errors;
mod handle;
mod list;
mod opendir;
mod readdir;
mod stream;

pub use batch::{Batch, Scratch};
pub use common::{Scheduler, SchedulerConfig, Stopped};
pub use entry::{Dirent, EntryType, HAVE_DIRENT_TYPES};
pub use errors::DirError;
pub use handle::{DirHandle, DotEntries, FsType, State};

pub fn cmd(matches: &ArgMatches) -> Result<()> {
    let dir = matches
        .value_of_os("DIRECTORY")
        .context("no DIRECTORY given")?;

    trace!("dir: {:?}", dir);

    list::opt_list(dir, matches)
}
