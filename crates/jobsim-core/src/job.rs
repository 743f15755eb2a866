//! The `Job` value and its wire representation.

use serde::{Deserialize, Serialize};

use crate::id::{JobId, WorkerId};

/// A single unit of work submitted by a user.
///
/// Mutated exactly once by the kernel, at dispatch time: `start_execution_time`,
/// `worker_tier`, and `worker_id` go from their "unset" defaults to concrete
/// values. Never mutated again, and never destroyed before the statistics
/// pass runs over the completed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(rename = "type")]
    pub job_class: String,
    pub user_type: String,
    pub submission_time: i64,
    #[serde(default)]
    pub start_execution_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,
}

impl Job {
    pub fn new(id: JobId, job_class: impl Into<String>, user_type: impl Into<String>, submission_time: i64) -> Self {
        Job {
            id,
            job_class: job_class.into(),
            user_type: user_type.into(),
            submission_time,
            start_execution_time: 0,
            worker_tier: None,
            worker_id: None,
        }
    }

    /// Wait time from submission to the start of execution.
    ///
    /// Only meaningful once the job has been dispatched (`worker_id.is_some()`);
    /// before that it compares against the default `start_execution_time == 0`
    /// and the result is not meaningful.
    pub fn wait_time(&self) -> i64 {
        self.start_execution_time - self.submission_time
    }

    pub fn is_dispatched(&self) -> bool {
        self.worker_id.is_some()
    }
}
