use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use crate::prelude::*;
use crate::Completion;

type Job = Box<dyn FnOnce() -> Completion + Send>;

/// Scheduler settings for embedding applications, the command line front end fills this
/// from '--workers'.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig { workers: 4 }
    }
}

impl SchedulerConfig {
    /// Number of worker threads, at least one.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// Returned by 'submit()' when the scheduler does not accept work anymore. Carries the
/// submitted state back to the caller untouched.
pub struct Stopped<S>(pub S);

impl<S> Stopped<S> {
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S> fmt::Debug for Stopped<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stopped(..)")
    }
}

impl<S> fmt::Display for Stopped<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scheduler is stopped")
    }
}

impl<S> std::error::Error for Stopped<S> {}

struct JobQueue {
    jobs: VecDeque<Job>,
    stopping: bool,
}

struct Shared {
    jobs: Mutex<JobQueue>,
    job_ready: Condvar,
    completions: Mutex<VecDeque<Completion>>,
    completion_ready: Condvar,
    // submitted but not yet dispatched
    pending: AtomicUsize,
}

/// Runs blocking work on a pool of worker threads and hands the completions back to the
/// thread calling 'run()'. Constructed and stopped explicitly by the embedding application.
///
/// Only one thread should dispatch (call 'run()' or 'run_once()'), callbacks then never run
/// concurrently with each other.
pub struct Scheduler {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Spawns the worker threads.
    pub fn start(config: SchedulerConfig) -> Result<Scheduler, SchedulerError> {
        let shared = Arc::new(Shared {
            jobs: Mutex::new(JobQueue {
                jobs: VecDeque::new(),
                stopping: false,
            }),
            job_ready: Condvar::new(),
            completions: Mutex::new(VecDeque::new()),
            completion_ready: Condvar::new(),
            pending: AtomicUsize::new(0),
        });

        let scheduler = Scheduler {
            shared,
            workers: Mutex::new(Vec::with_capacity(config.workers.max(1))),
        };

        for n in 0..config.workers.max(1) {
            let shared = Arc::clone(&scheduler.shared);
            let worker = thread::Builder::new()
                .name(format!("dirstream-worker-{}", n))
                .spawn(move || worker_loop(shared));

            match worker {
                Ok(worker) => scheduler.workers.lock().push(worker),
                Err(err) => {
                    error!("spawning worker {} failed: {}", n, err);
                    // joins the workers spawned so far
                    scheduler.stop();
                    return Err(err.into());
                }
            }
        }

        debug!("scheduler started with {} workers", scheduler.workers.lock().len());
        Ok(scheduler)
    }

    /// Moves 'state' to a worker thread where 'work' runs on it. Then 'done' is queued to be
    /// called with the state by the dispatching thread.
    pub fn submit<S, W, D>(&self, state: S, work: W, done: D) -> Result<(), Stopped<S>>
    where
        S: Send + 'static,
        W: FnOnce(&mut S) + Send + 'static,
        D: FnOnce(&Scheduler, S) + Send + 'static,
    {
        let mut queue = self.shared.jobs.lock();
        if queue.stopping {
            debug!("submit rejected, scheduler stopped");
            return Err(Stopped(state));
        }

        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        queue.jobs.push_back(Box::new(move || {
            let mut state = state;
            work(&mut state);
            Completion::new(move |scheduler| done(scheduler, state))
        }));
        drop(queue);

        self.shared.job_ready.notify_one();
        Ok(())
    }

    /// Dispatches completions until nothing is pending anymore. Callbacks may submit more
    /// work which keeps the loop running. Returns the number of dispatched completions.
    pub fn run(&self) -> usize {
        let mut dispatched = 0;
        while self.run_once() {
            dispatched += 1;
        }
        trace!("run: dispatched {} completions", dispatched);
        dispatched
    }

    /// Waits for one completion and dispatches it. Returns 'false' without blocking when
    /// nothing is pending.
    pub fn run_once(&self) -> bool {
        if self.pending() == 0 {
            return false;
        }

        let mut completion = {
            let mut completions = self.shared.completions.lock();
            loop {
                if let Some(completion) = completions.pop_front() {
                    break completion;
                }
                self.shared.completion_ready.wait(&mut completions);
            }
        };

        if completion.is_some() {
            completion.callback_once(self);
        } else {
            warn!("dropping completion of a failed job");
        }
        self.shared.pending.fetch_sub(1, Ordering::SeqCst);
        true
    }

    /// Number of submitted operations whose completion was not dispatched yet.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::SeqCst)
    }

    /// Rejects further submissions, lets the workers finish the queued jobs and joins them.
    /// Completions of finished jobs can still be dispatched afterwards.
    pub fn stop(&self) {
        self.shared.jobs.lock().stopping = true;
        self.shared.job_ready.notify_all();

        let workers = std::mem::take(&mut *self.workers.lock());
        if workers.is_empty() {
            return;
        }

        for worker in workers {
            if worker.join().is_err() {
                error!("worker thread panicked");
            }
        }
        debug!("scheduler stopped");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut queue = shared.jobs.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.stopping {
                    trace!("worker exits");
                    return;
                }
                shared.job_ready.wait(&mut queue);
            }
        };

        // a panicking job loses its state, the dispatcher still has to account for it
        let completion = match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(completion) => completion,
            Err(_) => {
                error!("job panicked, its completion is dropped");
                Completion::dropped()
            }
        };

        shared.completions.lock().push_back(completion);
        shared.completion_ready.notify_one();
    }
}
