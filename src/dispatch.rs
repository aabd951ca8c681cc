use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::api::Catalog;
use crate::view::{Completion, Job};

/// Runs jobs on worker threads and queues their completions for the UI
/// thread. Nothing is cancelled: a job that was submitted always completes,
/// and it is up to the receiving page to ignore results it no longer wants.
pub struct Dispatcher {
    catalog: Arc<dyn Catalog>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            catalog,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, job: Job) {
        self.in_flight += 1;
        let catalog = Arc::clone(&self.catalog);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let completion = job.run(catalog.as_ref());
            if sender.send(completion).is_err() {
                debug!("completion dropped, dispatcher is gone");
            }
        });
    }

    pub fn submit_all(&mut self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.submit(job);
        }
    }

    /// Next finished job, if one is ready. Never blocks.
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Block up to `timeout` for the next finished job.
    pub fn wait(&mut self, timeout: Duration) -> Option<Completion> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(completion)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Jobs submitted whose completion has not been taken yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
