// SPDX-License-Identifier: GPL-3.0-only

//! Dedicated capture thread
//!
//! Capture work never runs on the UI context. Jobs are executed one at a time
//! in submission order on a single named OS thread that lives as long as the
//! screen owning it.

use crate::constants::CAPTURE_WORKER_THREAD;
use crate::errors::CaptureFailure;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// Unit of work for the capture thread
pub type CaptureJob = Box<dyn FnOnce() + Send + 'static>;

/// Single-threaded FIFO executor
pub struct CaptureWorker {
    sender: Option<mpsc::Sender<CaptureJob>>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Spawn the capture thread
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<CaptureJob>();

        let handle = std::thread::Builder::new()
            .name(CAPTURE_WORKER_THREAD.to_string())
            .spawn(move || {
                debug!("Capture worker started");
                while let Ok(job) = receiver.recv() {
                    // A panicking job must not take the remaining queue with it
                    if std::panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        error!("Capture job panicked");
                    }
                }
                debug!("Capture worker stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue a job behind everything submitted before it
    ///
    /// On failure the job is handed back so the caller can still report it.
    pub fn submit(&self, job: CaptureJob) -> Result<(), (CaptureFailure, CaptureJob)> {
        match &self.sender {
            Some(sender) => sender
                .send(job)
                .map_err(|mpsc::SendError(job)| (CaptureFailure::WorkerUnavailable, job)),
            None => Err((CaptureFailure::WorkerUnavailable, job)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Stop accepting jobs, finish the queued ones and join the thread
    pub fn shutdown(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Capture worker thread panicked");
            }
        }
        info!("Capture worker shut down");
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for CaptureWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureWorker")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn jobs_run_in_submission_order() {
        let mut worker = CaptureWorker::spawn().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..16 {
            let seen = seen.clone();
            worker
                .submit(Box::new(move || seen.lock().unwrap().push(i)))
                .map_err(|(e, _)| e)
                .unwrap();
        }
        worker.shutdown();

        assert_eq!(*seen.lock().unwrap(), (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn jobs_run_off_the_calling_thread() {
        let mut worker = CaptureWorker::spawn().unwrap();
        let name = Arc::new(Mutex::new(None));
        let slot = name.clone();
        worker
            .submit(Box::new(move || {
                *slot.lock().unwrap() = std::thread::current().name().map(String::from);
            }))
            .map_err(|(e, _)| e)
            .unwrap();
        worker.shutdown();

        assert_eq!(name.lock().unwrap().as_deref(), Some(CAPTURE_WORKER_THREAD));
    }

    #[test]
    fn panicking_job_does_not_stop_the_queue() {
        let mut worker = CaptureWorker::spawn().unwrap();
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();

        worker
            .submit(Box::new(|| panic!("boom")))
            .map_err(|(e, _)| e)
            .unwrap();
        worker
            .submit(Box::new(move || *flag.lock().unwrap() = true))
            .map_err(|(e, _)| e)
            .unwrap();
        worker.shutdown();

        assert!(*ran.lock().unwrap());
    }

    #[test]
    fn submit_after_shutdown_hands_job_back() {
        let mut worker = CaptureWorker::spawn().unwrap();
        worker.shutdown();
        assert!(!worker.is_running());

        let Err((failure, job)) = worker.submit(Box::new(|| {})) else {
            panic!("submit should fail after shutdown");
        };
        assert_eq!(failure, CaptureFailure::WorkerUnavailable);
        job();
    }
}
