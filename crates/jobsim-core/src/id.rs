//! Monotonic identifiers for jobs and workers.

use core::fmt;

/// Unique identifier for a `Job`, assigned in submission order.
///
/// IDs are never recycled: the generator hands out a strictly
/// increasing sequence starting at zero for the lifetime of a run.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct JobId(u64);

impl JobId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        JobId(id)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for JobId {
    #[inline]
    fn from(id: u64) -> Self {
        JobId(id)
    }
}

impl fmt::Debug for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JobId({})", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a `Worker`, stable across the whole pool
/// (not per-tier) and assigned once at pool initialization.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct WorkerId(u64);

impl WorkerId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        WorkerId(id)
    }

    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for WorkerId {
    #[inline]
    fn from(id: u64) -> Self {
        WorkerId(id)
    }
}

impl fmt::Debug for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkerId({})", self.0)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_roundtrips_through_u64() {
        let id: JobId = 42u64.into();
        assert_eq!(id.as_u64(), 42);
    }

    #[test]
    fn worker_id_orders_numerically() {
        let a = WorkerId::new(1);
        let b = WorkerId::new(2);
        assert!(a < b);
    }
}
