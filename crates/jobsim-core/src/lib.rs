//! Data model, configuration, and error types shared by the jobsim
//! event queue, worker pool, generator, and kernel.

pub mod config;
pub mod error;
pub mod id;
pub mod job;
pub mod worker;

pub use config::{Configuration, JobClass, UserClass};
pub use error::{JobsimError, Result};
pub use id::{JobId, WorkerId};
pub use job::Job;
pub use worker::{Worker, WorkerStatus, WorkerTier};
