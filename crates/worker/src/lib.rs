#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Single-consumer deferred job queue.
//!
//! A [`Generator`] owns one dedicated thread that executes [`Job`]s one at a
//! time in submission order. Producers schedule through cloneable
//! [`GeneratorHandle`]s:
//!
//! * scheduling a job whose coalescing key matches a queued job replaces the
//!   queued job in place instead of queueing duplicate work;
//! * [`GeneratorHandle::cancel`] drops every queued job matching a filter and,
//!   if the job currently executing matches too, blocks until it finishes.
//!
//! When `cancel` returns, nothing matching its filter is queued or running, so
//! resources the cancelled jobs referenced can be released.

mod config;
mod error;
mod generator;
mod job;
mod panic;
mod queue;
mod spawn;
mod stats;

pub use config::{DEFAULT_THREAD_NAME, GeneratorConfig};
pub use error::{GeneratorError, Result};
pub use generator::{CancelOutcome, Generator, GeneratorHandle, ShutdownMode, WorkerState};
pub use job::{Job, JobFilter, MatchAll};
pub use queue::{JobQueue, ScheduleOutcome};
pub use stats::{GeneratorStats, ShutdownReport};
