use crate::prelude::*;
use crate::Scheduler;

/// The completion of an offloaded operation. Holds the callback which delivers the result
/// back on the dispatching thread, it fires at most once.
pub struct Completion {
    callback: Option<Box<dyn FnOnce(&Scheduler) + Send>>,
}

impl Completion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(&Scheduler) + Send + 'static,
    {
        Completion {
            callback: Some(Box::new(callback)),
        }
    }

    /// A completion without callback, for work which could not produce one.
    pub fn dropped() -> Self {
        Completion { callback: None }
    }

    pub fn callback_once(&mut self, scheduler: &Scheduler) {
        if let Some(callback) = self.callback.take() {
            trace!("completion");
            callback(scheduler);
        } else {
            trace!("completion already delivered");
        }
    }

    pub fn is_some(&self) -> bool {
        self.callback.is_some()
    }
}
