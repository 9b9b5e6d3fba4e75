use std::path::{Path, PathBuf};

use common::{Scheduler, Stopped};

use crate::handle::{DirHandle, FsType, Resource};
use crate::prelude::*;
use crate::stream::DirStream;

impl DirHandle {
    /// Opens 'path' as directory. Whatever the handle recorded before is reset first. On
    /// failure the handle is left unopened with the classified error as result.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DirError> {
        self.opendir_work(path.as_ref().to_path_buf());
        self.outcome().map(|_| ())
    }

    /// Like 'open()' but the syscall runs on a worker of 'scheduler'. The handle moves along
    /// and comes back through 'callback'.
    pub fn open_async<P, F>(
        self,
        scheduler: &Scheduler,
        path: P,
        callback: F,
    ) -> Result<(), Stopped<DirHandle>>
    where
        P: AsRef<Path>,
        F: FnOnce(&Scheduler, DirHandle) + Send + 'static,
    {
        let path = path.as_ref().to_path_buf();
        trace!("queue opendir {:?}", path);
        scheduler.submit(
            self,
            move |handle: &mut DirHandle| handle.opendir_work(path),
            callback,
        )
    }

    pub(crate) fn opendir_work(&mut self, path: PathBuf) {
        if let Resource::Open(stream) = std::mem::replace(&mut self.resource, Resource::Unopened)
        {
            warn!("reopening {:?}, closing previous stream", self.path);
            if let Err(err) = stream.close() {
                warn!("closing previous stream: {}", err);
            }
        }

        self.reset_state();
        self.begin(FsType::OpenDir);

        let result = match DirStream::open(&path) {
            Ok(stream) => {
                debug!("opened {:?}", path);
                self.resource = Resource::Open(stream);
                Ok(0)
            }
            Err(err) => Err(err),
        };

        self.path = Some(path);
        self.finish(result);
    }
}
