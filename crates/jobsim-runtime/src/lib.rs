//! Event queue, worker pool, job generator, kernel, and statistics for
//! the jobsim discrete-event simulator.

pub mod events;
pub mod generator;
pub mod kernel;
pub mod pool;
pub mod stats;

pub use events::{Event, EventKind, EventQueue};
pub use generator::JobGenerator;
pub use kernel::Kernel;
pub use pool::WorkerPool;
pub use stats::Statistics;
