//! Simulation kernel: event dispatch, pending-job queue, and the
//! completed-job accumulator.

use std::collections::VecDeque;

use jobsim_core::{Configuration, Job, Result, WorkerId};

use crate::events::{EventKind, EventQueue};
use crate::pool::WorkerPool;

pub struct Kernel {
    queue: EventQueue,
    pool: WorkerPool,
    pending: VecDeque<Job>,
    completed: Vec<Job>,
}

impl Kernel {
    pub fn new(config: &Configuration) -> Self {
        Kernel {
            queue: EventQueue::new(),
            pool: WorkerPool::new(&config.worker_tiers),
            pending: VecDeque::new(),
            completed: Vec::new(),
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Seed the event queue with every job's submission, then drain it
    /// to completion. Invariant violations panic with a diagnostic —
    /// they are fatal programming errors, not recoverable conditions.
    pub fn run(mut self, config: &Configuration, jobs: Vec<Job>) -> Vec<Job> {
        for job in jobs {
            self.queue.push(job.submission_time, EventKind::JobSubmitted(job));
        }

        let mut now_prev = i64::MIN;
        while let Some(event) = self.queue.pop() {
            if event.timestamp < now_prev {
                panic!(
                    "invariant violation: event at t={} fired after time had already advanced to t={}",
                    event.timestamp, now_prev
                );
            }
            now_prev = event.timestamp;
            let now = event.timestamp;

            let outcome = match event.kind {
                EventKind::JobSubmitted(job) => self.handle_job_submitted(config, now, job),
                EventKind::WorkerReady(w) | EventKind::WorkerDone(w) => self.handle_worker_activation_complete(config, now, w),
                EventKind::WorkerToPool(w) => {
                    log::debug!("X {now} worker {w} returned to pool");
                    self.pool.return_to_pool(w)
                }
            };

            if let Err(e) = outcome {
                panic!("{e}");
            }
        }

        self.completed
    }

    fn handle_job_submitted(&mut self, config: &Configuration, now: i64, mut job: Job) -> Result<()> {
        if let Some(w) = self.pool.allocate_ready()? {
            job.start_execution_time = now;
            job.worker_tier = Some(self.pool.worker(w).tier_tag.clone());
            job.worker_id = Some(w);
            let duration = config.execution_duration(&job.job_class);
            log::debug!("S {} job {} -> worker {} ({}s)", now, job.id, w, duration);
            self.completed.push(job);
            self.queue.push(now + duration, EventKind::WorkerDone(w));
            return Ok(());
        }

        log::debug!("P {} job {} queued, no READY worker", now, job.id);
        self.pending.push_back(job);
        if let Some(w) = self.pool.invoke_from_pool()? {
            let tier = self.pool.tier(&self.pool.worker(w).tier_tag).clone();
            if tier.is_hot() {
                // Zero-startup tiers reach READY without an intervening
                // event: dispatch in-line rather than enqueue-then-pop,
                // per the one defined exception to "enqueue, don't recurse".
                self.handle_worker_activation_complete(config, now, w)?;
            } else {
                log::debug!("I {} invoking worker {} (tier {}, startup {}s)", now, w, tier.tag, tier.startup_latency);
                self.queue.push(now + tier.startup_latency, EventKind::WorkerReady(w));
            }
        }
        Ok(())
    }

    /// Common handling for `WORKER_READY` and `WORKER_DONE`: both mean
    /// "this worker just became available", retained as distinct event
    /// tags for traceability only (§4.E, §9 Open Question 1).
    fn handle_worker_activation_complete(&mut self, config: &Configuration, now: i64, w: WorkerId) -> Result<()> {
        log::debug!("R {} worker {} ready", now, w);
        self.pool.mark_ready(w)?;

        if let Some(job) = self.pending.pop_front() {
            // Re-enter the generic submission handler rather than binding
            // the popped job to `w` directly: admission is re-evaluated
            // against whichever READY worker has the lowest id, which may
            // not be `w` if another worker is also idle at this instant.
            self.handle_job_submitted(config, now, job)?;
        } else {
            let tier = self.pool.tier(&self.pool.worker(w).tier_tag).clone();
            log::debug!("Z {} worker {} idle, shutdown in {}s", now, w, tier.shutdown_latency);
            self.queue.push(now + tier.shutdown_latency, EventKind::WorkerToPool(w));
        }
        Ok(())
    }
}
