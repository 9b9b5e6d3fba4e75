use common::{Scheduler, Stopped};

use crate::batch::Batch;
use crate::entry::{is_dot, Dirent, EntryType};
use crate::handle::{DirHandle, DotEntries, FsType, Resource};
use crate::prelude::*;
use crate::stream::DirStream;

impl DirHandle {
    /// Fills 'batch' with up to its capacity of entries from the current position and
    /// returns how many. Zero means the directory is exhausted. Entries come in the order
    /// the OS yields them.
    ///
    /// Reading a handle which is not open fails with 'DirError::InvalidState'. When reading
    /// fails midway nothing of the batch is valid.
    pub fn read(&mut self, batch: &mut Batch) -> Result<usize, DirError> {
        self.readdir_work(batch);
        self.outcome()
    }

    /// Reads one batch on a worker of 'scheduler'. Handle and batch are passed back through
    /// 'callback'. Nothing chains automatically, to continue call 'read_async()' again from
    /// the callback.
    pub fn read_async<F>(
        self,
        scheduler: &Scheduler,
        batch: Batch,
        callback: F,
    ) -> Result<(), Stopped<(DirHandle, Batch)>>
    where
        F: FnOnce(&Scheduler, DirHandle, Batch) + Send + 'static,
    {
        trace!("queue readdir {:?}", self.path);
        scheduler.submit(
            (self, batch),
            |state: &mut (DirHandle, Batch)| {
                let (handle, batch) = state;
                handle.readdir_work(batch)
            },
            move |scheduler, (handle, batch)| callback(scheduler, handle, batch),
        )
    }

    pub(crate) fn readdir_work(&mut self, batch: &mut Batch) {
        self.begin(FsType::ReadDir);
        self.dirents = Some(batch.scratch());

        let dot_entries = self.dot_entries();
        let result = match &mut self.resource {
            Resource::Open(stream) => fill(stream, batch.slots(), dot_entries),
            _ => Err(DirError::InvalidState),
        };

        if let Ok(count) = result {
            trace!("readdir {:?}: {} entries", self.path, count);
        }
        self.finish(result);
    }
}

/// Where 'fill()' takes its entries from.
pub(crate) trait EntrySource {
    fn next_entry(&mut self) -> Result<Option<(&[u8], EntryType)>, DirError>;
}

impl EntrySource for DirStream {
    fn next_entry(&mut self) -> Result<Option<(&[u8], EntryType)>, DirError> {
        DirStream::next_entry(self)
    }
}

fn fill<S: EntrySource>(
    stream: &mut S,
    slots: &mut [Dirent],
    dot_entries: DotEntries,
) -> Result<usize, DirError> {
    let mut count = 0;

    while count < slots.len() {
        match stream.next_entry() {
            Ok(Some((name, _))) if dot_entries == DotEntries::Skip && is_dot(name) => {}
            Ok(Some((name, kind))) => {
                slots[count].fill(name, kind);
                count += 1;
            }
            Ok(None) => break,
            Err(err) => {
                slots[..count].iter_mut().for_each(Dirent::clear);
                return Err(err);
            }
        }
    }

    Ok(count)
}

#[cfg(test)]
mod test {
    use std::num::NonZeroUsize;

    use super::*;

    /// yields 'names' as files, then fails with 'error'
    struct Failing {
        names: &'static [&'static str],
        next: usize,
        error: DirError,
    }

    impl EntrySource for Failing {
        fn next_entry(&mut self) -> Result<Option<(&[u8], EntryType)>, DirError> {
            match self.names.get(self.next) {
                Some(name) => {
                    self.next += 1;
                    Ok(Some((name.as_bytes(), EntryType::File)))
                }
                None => Err(self.error),
            }
        }
    }

    fn batch(capacity: usize) -> Batch {
        Batch::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn error_midway_discards_batch() {
        let mut source = Failing {
            names: &[".", "..", "file1", "file2"],
            next: 0,
            error: DirError::Io(libc::EIO),
        };
        let mut dirents = batch(8);

        assert_eq!(
            fill(&mut source, dirents.slots(), DotEntries::Include),
            Err(DirError::Io(libc::EIO))
        );
        assert_eq!(source.next, 4);
        assert!(dirents
            .slots()
            .iter()
            .all(|entry| entry.name().is_empty() && entry.kind() == EntryType::Unknown));
    }

    #[test]
    fn error_after_full_batch_is_not_seen() {
        let mut source = Failing {
            names: &["file1", "file2"],
            next: 0,
            error: DirError::Io(libc::EIO),
        };
        let mut dirents = batch(2);

        assert_eq!(fill(&mut source, dirents.slots(), DotEntries::Include), Ok(2));
        assert_eq!(dirents.filled(2)[1].name(), "file2");
        assert_eq!(
            fill(&mut source, dirents.slots(), DotEntries::Include),
            Err(DirError::Io(libc::EIO))
        );
    }

    #[test]
    fn skipped_dots_do_not_count() {
        let mut source = Failing {
            names: &[".", "file1", ".."],
            next: 0,
            error: DirError::Io(libc::EIO),
        };
        let mut dirents = batch(1);

        assert_eq!(fill(&mut source, dirents.slots(), DotEntries::Skip), Ok(1));
        assert_eq!(dirents.filled(1)[0].name(), "file1");
        assert_eq!(
            fill(&mut source, dirents.slots(), DotEntries::Skip),
            Err(DirError::Io(libc::EIO))
        );
    }
}
