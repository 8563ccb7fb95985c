//! Injectable concurrency substrate.
//!
//! The scheduler hands the executor one job per lane and requires only that
//! every job has finished when `run` returns; jobs within a batch may run in
//! any order or interleaving. The default [`ScopedThreadExecutor`] spawns one
//! scoped thread per job; [`SequentialExecutor`] runs them in place, which is
//! byte-for-byte equivalent because same-batch jobs never touch each other's
//! blocks.

use std::panic;

/// One lane's worth of work for a single slice.
pub type Job<'a> = Box<dyn FnOnce() + Send + 'a>;

/// A substrate that can run a batch of lane jobs to completion.
///
/// `run` is the synchronization barrier: it must not return before every job
/// in the batch has finished.
pub trait Executor: Send + Sync {
    /// Run all jobs; returns once all have completed.
    fn run(&self, jobs: Vec<Job<'_>>);
}

/// Runs each batch on freshly spawned scoped threads, one per lane.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopedThreadExecutor;

impl Executor for ScopedThreadExecutor {
    fn run(&self, jobs: Vec<Job<'_>>) {
        let result = crossbeam_utils::thread::scope(|scope| {
            for job in jobs {
                scope.spawn(move |_| job());
            }
        });
        // A panicking lane worker means a bug in the fill loop; surface it
        // instead of returning a half-filled matrix.
        if let Err(payload) = result {
            panic::resume_unwind(payload);
        }
    }
}

/// Runs jobs one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn run(&self, jobs: Vec<Job<'_>>) {
        for job in jobs {
            job();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_jobs(counter: &AtomicU32, n: u32) -> Vec<Job<'_>> {
        (0..n)
            .map(|_| {
                Box::new(|| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }) as Job<'_>
            })
            .collect()
    }

    #[test]
    fn sequential_runs_every_job() {
        let counter = AtomicU32::new(0);
        SequentialExecutor.run(counting_jobs(&counter, 7));
        assert_eq!(counter.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn scoped_threads_join_before_returning() {
        let counter = AtomicU32::new(0);
        ScopedThreadExecutor.run(counting_jobs(&counter, 8));
        // run() is the barrier: all increments must be visible here.
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        ScopedThreadExecutor.run(Vec::new());
        SequentialExecutor.run(Vec::new());
    }
}
