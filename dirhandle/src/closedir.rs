use common::{Scheduler, Stopped};

use crate::handle::{DirHandle, FsType, Resource};
use crate::prelude::*;

impl DirHandle {
    /// Releases the directory stream. The handle counts as closed afterwards even when the
    /// OS reports an error. Closing a handle which is not open is 'DirError::InvalidState'
    /// and does not reach the OS.
    pub fn close(&mut self) -> Result<(), DirError> {
        self.closedir_work();
        self.outcome().map(|_| ())
    }

    pub fn close_async<F>(
        self,
        scheduler: &Scheduler,
        callback: F,
    ) -> Result<(), Stopped<DirHandle>>
    where
        F: FnOnce(&Scheduler, DirHandle) + Send + 'static,
    {
        trace!("queue closedir {:?}", self.path);
        scheduler.submit(self, |handle: &mut DirHandle| handle.closedir_work(), callback)
    }

    pub(crate) fn closedir_work(&mut self) {
        self.begin(FsType::CloseDir);

        let result = match std::mem::replace(&mut self.resource, Resource::Closed) {
            Resource::Open(stream) => {
                debug!("closing {:?}", self.path);
                stream.close().map(|()| 0)
            }
            other => {
                self.resource = other;
                Err(DirError::InvalidState)
            }
        };

        self.finish(result);
    }
}
