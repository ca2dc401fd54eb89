use crate::generator::WorkerState;

/// Running totals kept under the coordinator lock.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
	pub scheduled: u64,
	pub coalesced: u64,
	pub executed: u64,
	pub cancelled: u64,
	pub panicked: u64,
	pub discarded: u64,
}

/// Point-in-time snapshot of one generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorStats {
	pub name: String,
	pub state: WorkerState,
	/// Jobs waiting in the queue.
	pub pending: usize,
	/// Whether a job is executing right now.
	pub in_flight: bool,
	/// Cancellers blocked until the in-flight job finishes.
	pub drain_waiters: usize,
	/// Accepted `schedule` calls, including coalesced ones.
	pub scheduled: u64,
	pub coalesced: u64,
	/// Jobs that ran to completion or panicked.
	pub executed: u64,
	/// Queued jobs removed by cancellation.
	pub cancelled: u64,
	pub panicked: u64,
	/// Queued jobs dropped when the worker stopped.
	pub discarded: u64,
}

/// Shutdown report for one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
	executed: u64,
	discarded: u64,
	prepared: bool,
}

impl ShutdownReport {
	pub(crate) fn new(counters: &Counters, prepared: bool) -> Self {
		Self {
			executed: counters.executed,
			discarded: counters.discarded,
			prepared,
		}
	}

	/// Jobs executed over the generator's lifetime.
	pub fn executed(&self) -> u64 {
		self.executed
	}

	/// Jobs still queued when the worker stopped.
	pub fn discarded(&self) -> u64 {
		self.discarded
	}

	/// Whether the prepare hook had completed successfully.
	pub fn prepared(&self) -> bool {
		self.prepared
	}
}
