use std::num::NonZeroUsize;
use std::ops::Deref;

use crate::entry::Dirent;

/// Identity of the batch buffer used by the last read on a handle. Lets a completion be
/// matched against the call which caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scratch {
    addr: usize,
    capacity: usize,
}

impl Scratch {
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Caller owned, fixed capacity buffer of entries, reused across reads. A read returns how
/// many slots from the front it filled, the remaining slots keep stale data.
#[derive(Debug)]
pub struct Batch {
    entries: Box<[Dirent]>,
}

impl Batch {
    pub fn new(capacity: NonZeroUsize) -> Batch {
        Batch {
            entries: vec![Dirent::default(); capacity.get()].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// The heap storage does not move when the batch itself is moved, so the scratch stays
    /// valid while the batch travels through an asynchronous read.
    pub fn scratch(&self) -> Scratch {
        Scratch {
            addr: self.entries.as_ptr() as usize,
            capacity: self.entries.len(),
        }
    }

    /// The first 'count' entries, as returned by a read.
    pub fn filled(&self, count: usize) -> &[Dirent] {
        &self.entries[..count.min(self.entries.len())]
    }

    pub(crate) fn slots(&mut self) -> &mut [Dirent] {
        &mut self.entries
    }
}

impl Deref for Batch {
    type Target = [Dirent];

    fn deref(&self) -> &[Dirent] {
        &self.entries
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scratch_follows_moves() {
        let batch = Batch::new(NonZeroUsize::new(3).unwrap());
        let scratch = batch.scratch();
        assert_eq!(scratch.capacity(), 3);

        let moved = Box::new(batch);
        assert_eq!(moved.scratch(), scratch);

        let other = Batch::new(NonZeroUsize::new(3).unwrap());
        assert_ne!(other.scratch(), scratch);
    }

    #[test]
    fn filled_is_clamped() {
        let batch = Batch::new(NonZeroUsize::new(2).unwrap());
        assert_eq!(batch.filled(0).len(), 0);
        assert_eq!(batch.filled(2).len(), 2);
        assert_eq!(batch.filled(7).len(), 2);
        assert_eq!(batch.len(), 2);
    }
}
