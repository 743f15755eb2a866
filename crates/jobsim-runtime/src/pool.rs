//! Tiered worker pool: state machine and admission policy.

use jobsim_core::{JobsimError, Result, Worker, WorkerId, WorkerStatus, WorkerTier};

/// Owns every worker for the run. Workers are created once at
/// initialization and never destroyed or recreated — only their
/// `status` changes.
pub struct WorkerPool {
    tiers: Vec<WorkerTier>,
    workers: Vec<Worker>,
}

impl WorkerPool {
    pub fn new(tiers: &[WorkerTier]) -> Self {
        let mut workers = Vec::new();
        let mut next_id = 0u64;
        for tier in tiers {
            for _ in 0..tier.capacity {
                workers.push(Worker::new(WorkerId::new(next_id), tier.tag.clone()));
                next_id += 1;
            }
        }
        WorkerPool {
            tiers: tiers.to_vec(),
            workers,
        }
    }

    pub fn tier(&self, tag: &str) -> &WorkerTier {
        self.tiers
            .iter()
            .find(|t| t.tag == tag)
            .unwrap_or_else(|| panic!("unknown worker tier tag '{tag}'"))
    }

    pub fn tiers(&self) -> &[WorkerTier] {
        &self.tiers
    }

    pub fn worker(&self, id: WorkerId) -> &Worker {
        self.workers
            .iter()
            .find(|w| w.id == id)
            .unwrap_or_else(|| panic!("unknown worker id {id}"))
    }

    fn worker_mut(&mut self, id: WorkerId) -> &mut Worker {
        self.workers
            .iter_mut()
            .find(|w| w.id == id)
            .unwrap_or_else(|| panic!("unknown worker id {id}"))
    }

    /// `allocateReady`: the first `READY` worker by ascending id,
    /// transitioned to `BUSY`.
    pub fn allocate_ready(&mut self) -> Result<Option<WorkerId>> {
        let candidate = self
            .workers
            .iter()
            .filter(|w| w.status == WorkerStatus::Ready)
            .min_by_key(|w| w.id)
            .map(|w| w.id);

        if let Some(id) = candidate {
            let w = self.worker_mut(id);
            if w.status != WorkerStatus::Ready {
                return Err(JobsimError::Invariant(format!(
                    "allocate_ready: worker {id} was not READY at dispatch"
                )));
            }
            w.status = WorkerStatus::Busy;
        }
        Ok(candidate)
    }

    /// `invokeFromPool`: the first `IN_POOL` worker ordered by
    /// `(tier priority, worker id)`, transitioned to `ACTIVATING`.
    pub fn invoke_from_pool(&mut self) -> Result<Option<WorkerId>> {
        let tier_priority: Vec<(String, i64)> = self.tiers.iter().map(|t| (t.tag.clone(), t.priority)).collect();
        let priority_of = |tag: &str| -> i64 { tier_priority.iter().find(|(t, _)| t == tag).map(|(_, p)| *p).unwrap_or(i64::MAX) };

        let candidate = self
            .workers
            .iter()
            .filter(|w| w.status == WorkerStatus::InPool)
            .min_by_key(|w| (priority_of(&w.tier_tag), w.id))
            .map(|w| w.id);

        if let Some(id) = candidate {
            let w = self.worker_mut(id);
            if w.status != WorkerStatus::InPool {
                return Err(JobsimError::Invariant(format!(
                    "invoke_from_pool: worker {id} was not IN_POOL at invocation"
                )));
            }
            w.status = WorkerStatus::Activating;
        }
        Ok(candidate)
    }

    /// Transition an activating (or zero-latency, still-activating)
    /// worker to `READY`.
    pub fn mark_ready(&mut self, id: WorkerId) -> Result<()> {
        let w = self.worker_mut(id);
        if w.status != WorkerStatus::Activating && w.status != WorkerStatus::Busy {
            return Err(JobsimError::Invariant(format!(
                "mark_ready: worker {id} was in status {:?}, expected ACTIVATING or BUSY",
                w.status
            )));
        }
        w.status = WorkerStatus::Ready;
        Ok(())
    }

    /// `returnToPool`: a `READY` worker whose shutdown timer fired with
    /// no pending job to pick up goes back to `IN_POOL`.
    pub fn return_to_pool(&mut self, id: WorkerId) -> Result<()> {
        let w = self.worker_mut(id);
        if w.status != WorkerStatus::Ready {
            return Err(JobsimError::Invariant(format!(
                "return_to_pool: worker {id} was in status {:?}, expected READY",
                w.status
            )));
        }
        w.status = WorkerStatus::InPool;
        Ok(())
    }

    /// Count of workers in any of `{IN_POOL, ACTIVATING, READY, BUSY}`
    /// for a tier — always equal to that tier's capacity (§8 invariant).
    pub fn tier_worker_count(&self, tag: &str) -> usize {
        self.workers.iter().filter(|w| w.tier_tag == tag).count()
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_tier() -> WorkerTier {
        WorkerTier {
            tag: "H".into(),
            capacity: 1,
            priority: 1,
            startup_latency: 0,
            shutdown_latency: 0,
        }
    }

    #[test]
    fn invoke_from_pool_prefers_lower_priority_number() {
        let cold = WorkerTier {
            tag: "C".into(),
            capacity: 1,
            priority: 2,
            startup_latency: 300,
            shutdown_latency: 0,
        };
        let mut pool = WorkerPool::new(&[cold, hot_tier()]);
        let chosen = pool.invoke_from_pool().unwrap().unwrap();
        assert_eq!(pool.worker(chosen).tier_tag, "H");
    }

    #[test]
    fn capacity_is_constant_across_transitions() {
        let mut pool = WorkerPool::new(&[hot_tier()]);
        assert_eq!(pool.tier_worker_count("H"), 1);
        let id = pool.invoke_from_pool().unwrap().unwrap();
        pool.mark_ready(id).unwrap();
        pool.allocate_ready().unwrap();
        assert_eq!(pool.tier_worker_count("H"), 1);
    }

    #[test]
    fn double_allocate_ready_on_busy_worker_is_invariant_error() {
        let mut pool = WorkerPool::new(&[hot_tier()]);
        let id = pool.invoke_from_pool().unwrap().unwrap();
        pool.mark_ready(id).unwrap();
        pool.allocate_ready().unwrap();
        assert!(pool.allocate_ready().unwrap().is_none());
    }

    #[test]
    fn return_to_pool_requires_ready_worker() {
        let mut pool = WorkerPool::new(&[hot_tier()]);
        let id = pool.invoke_from_pool().unwrap().unwrap();
        assert!(pool.return_to_pool(id).is_err());
    }
}
