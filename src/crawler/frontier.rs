//! Shared frontier queue for the worker pool
//!
//! This module handles:
//! - FIFO queueing of crawl tasks from any worker
//! - Blocking dequeue with an idle timeout
//! - Outstanding-work tracking (queued plus in-flight) for quiescence
//! - Closing the queue to release blocked workers

use crate::state::CrawlTask;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Result of waiting on the frontier
#[derive(Debug)]
pub enum Popped<'a> {
    /// A task to process; it counts as outstanding until the guard drops
    Task(TaskGuard<'a>),

    /// Nothing arrived within the idle timeout
    Idle,

    /// The frontier was closed
    Closed,
}

/// A dequeued task that is still in flight
///
/// Dropping the guard marks the task done, so a task is accounted for even
/// when its processing panics.
#[derive(Debug)]
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
    task: CrawlTask,
}

impl TaskGuard<'_> {
    pub fn task(&self) -> &CrawlTask {
        &self.task
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.finish(1);
    }
}

/// Multi-producer multi-consumer work queue with join semantics
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<VecDeque<CrawlTask>>,
    outstanding: AtomicUsize,
    closed: AtomicBool,
    available: Notify,
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task to the back of the queue
    ///
    /// Returns false (and drops the task) if the frontier is closed.
    pub fn push(&self, task: CrawlTask) -> bool {
        if self.is_closed() {
            return false;
        }

        // Count before queueing so join() never sees zero while work exists
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        self.lock_queue().push_back(task);
        self.available.notify_one();
        true
    }

    /// Waits for the next task
    ///
    /// Returns `Idle` if nothing could be dequeued within `idle_timeout`, and
    /// `Closed` as soon as the frontier is closed.
    pub async fn pop(&self, idle_timeout: Duration) -> Popped<'_> {
        let deadline = Instant::now() + idle_timeout;

        loop {
            // Register for wake-ups before checking, so a push between the
            // check and the wait is not missed
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_closed() {
                return Popped::Closed;
            }

            let next = self.lock_queue().pop_front();
            if let Some(task) = next {
                return Popped::Task(TaskGuard {
                    frontier: self,
                    task,
                });
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Popped::Idle;
            }
        }
    }

    /// Resolves once no task is queued or in flight
    pub async fn join(&self) {
        loop {
            let drained = self.drained.notified();
            tokio::pin!(drained);
            drained.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }

            drained.await;
        }
    }

    /// Closes the frontier, dropping queued tasks and waking every waiter
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);

        let dropped = {
            let mut queue = self.lock_queue();
            let dropped = queue.len();
            queue.clear();
            dropped
        };
        if dropped > 0 {
            tracing::debug!("Dropped {} queued tasks on close", dropped);
            self.finish(dropped);
        }

        self.available.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.lock_queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of queued plus in-flight tasks
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    fn finish(&self, count: usize) {
        if self.outstanding.fetch_sub(count, Ordering::AcqRel) == count {
            self.drained.notify_waiters();
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<CrawlTask>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
