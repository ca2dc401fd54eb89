use std::sync::{Arc, OnceLock};
use std::thread::{JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::job::{Job, JobFilter};
use crate::panic;
use crate::queue::{JobQueue, ScheduleOutcome};
use crate::spawn::spawn_worker_thread;
use crate::stats::{Counters, GeneratorStats, ShutdownReport};

/// Lifecycle of the generator thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
	/// The prepare hook has not finished yet.
	Starting,
	/// Waiting for new work.
	Idle,
	/// Popping and executing jobs.
	Draining,
	/// Terminal; no more jobs will run.
	Stopped,
}

/// How [`Generator::shutdown`] treats queued work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
	/// Finish the current job and discard the rest.
	Immediate,
	/// Run every queued job before stopping.
	Drain,
}

/// Result of one [`GeneratorHandle::cancel`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CancelOutcome {
	/// Queued jobs that were removed and dropped.
	pub removed: usize,
	/// Whether the call waited for a matching in-flight job to finish.
	pub drained: bool,
}

struct InFlight<T> {
	seq: u64,
	tag: T,
}

struct State<J: Job> {
	queue: JobQueue<J>,
	current: Option<InFlight<J::Tag>>,
	phase: WorkerState,
	ready: bool,
	prepare_error: Option<String>,
	stop: Option<ShutdownMode>,
	/// Sequence number of the last job handed to `execute`.
	started: u64,
	/// Sequence number of the last job whose execution returned.
	finished: u64,
	/// Cancellers blocked on the current job.
	drain_waiters: usize,
	counters: Counters,
}

struct Shared<J: Job> {
	name: String,
	state: Mutex<State<J>>,
	new_work: Condvar,
	drained: Condvar,
	ready: Condvar,
	idle: Condvar,
	worker: OnceLock<ThreadId>,
}

/// Cloneable producer/canceller side of a generator.
pub struct GeneratorHandle<J: Job> {
	shared: Arc<Shared<J>>,
}

impl<J: Job> Clone for GeneratorHandle<J> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

/// Owner of the dedicated generator thread.
///
/// Jobs are scheduled and cancelled through [`GeneratorHandle`]s obtained from
/// [`Generator::handle`]. Dropping the generator requests an immediate stop
/// without joining the thread; use [`Generator::shutdown`] to wait for it.
pub struct Generator<J: Job> {
	handle: GeneratorHandle<J>,
	thread: Option<JoinHandle<()>>,
}

impl<J: Job> Generator<J> {
	/// Starts a generator with no preparation step.
	pub fn start(config: GeneratorConfig) -> Result<Self> {
		Self::start_with(config, || Ok(()))
	}

	/// Starts a generator whose thread runs `prepare` before touching any job.
	///
	/// Jobs may be scheduled immediately; they stay queued until `prepare`
	/// returns `Ok`. If it fails, the worker stops and queued jobs are dropped.
	pub fn start_with<P>(config: GeneratorConfig, prepare: P) -> Result<Self>
	where
		P: FnOnce() -> std::result::Result<(), String> + Send + 'static,
	{
		let shared = Arc::new(Shared {
			name: config.thread_name.clone(),
			state: Mutex::new(State {
				queue: JobQueue::with_capacity(config.queue_capacity),
				current: None,
				phase: WorkerState::Starting,
				ready: false,
				prepare_error: None,
				stop: None,
				started: 0,
				finished: 0,
				drain_waiters: 0,
				counters: Counters::default(),
			}),
			new_work: Condvar::new(),
			drained: Condvar::new(),
			ready: Condvar::new(),
			idle: Condvar::new(),
			worker: OnceLock::new(),
		});

		let worker_shared = Arc::clone(&shared);
		let thread = spawn_worker_thread(&config, move || run_worker(worker_shared, prepare))?;
		tracing::debug!(worker = %config.thread_name, "worker.started");

		Ok(Self {
			handle: GeneratorHandle { shared },
			thread: Some(thread),
		})
	}

	/// Returns a producer/canceller handle.
	pub fn handle(&self) -> GeneratorHandle<J> {
		self.handle.clone()
	}

	/// Stops the worker and waits for its thread to exit.
	///
	/// The job executing at the time of the call always runs to completion.
	pub fn shutdown(mut self, mode: ShutdownMode) -> Result<ShutdownReport> {
		self.handle.request_stop(mode);
		if let Some(thread) = self.thread.take() {
			thread.join().map_err(|payload| {
				GeneratorError::WorkerPanicked(panic::panic_message(payload.as_ref()).unwrap_or_else(|| "non-string panic payload".to_string()))
			})?;
		}
		let state = self.handle.shared.state.lock();
		Ok(ShutdownReport::new(&state.counters, state.ready))
	}
}

impl<J: Job> Drop for Generator<J> {
	fn drop(&mut self) {
		if self.thread.is_some() {
			self.handle.request_stop(ShutdownMode::Immediate);
		}
	}
}

impl<J: Job> GeneratorHandle<J> {
	/// Queues `job`, coalescing it with an equal queued job.
	///
	/// Never waits for job execution. Fails only once the generator is stopping.
	pub fn schedule(&self, job: J) -> Result<ScheduleOutcome> {
		let mut state = self.shared.state.lock();
		if state.phase == WorkerState::Stopped || state.stop.is_some() {
			drop(state);
			tracing::warn!(worker = %self.shared.name, "worker.schedule_after_stop");
			return Err(GeneratorError::Stopped);
		}

		let (outcome, displaced) = state.queue.schedule(job);
		state.counters.scheduled += 1;
		if outcome == ScheduleOutcome::Coalesced {
			state.counters.coalesced += 1;
		}
		let pending = state.queue.len();
		drop(state);
		drop(displaced);

		tracing::trace!(worker = %self.shared.name, ?outcome, pending, "worker.schedule");
		self.shared.new_work.notify_one();
		Ok(outcome)
	}

	/// Removes queued jobs matching `filter` and waits out a matching in-flight job.
	///
	/// On return, no job matching `filter` is queued or executing, so resources
	/// such jobs reference may be released. Never fails; a filter matching
	/// nothing returns immediately.
	///
	/// Called from inside a job on the generator thread, the in-flight job is
	/// the caller itself and is not waited for.
	pub fn cancel<F>(&self, filter: F) -> CancelOutcome
	where
		F: JobFilter<J::Tag>,
	{
		let mut state = self.shared.state.lock();
		let removed = state.queue.remove_matching(|tag| filter.check(tag));
		state.counters.cancelled += removed.len() as u64;
		let in_flight = state.current.as_ref().filter(|job| filter.check(&job.tag)).map(|job| job.seq);
		drop(filter);

		let mut drained = false;
		if let Some(seq) = in_flight {
			if self.is_worker_thread() {
				tracing::warn!(worker = %self.shared.name, seq, "worker.cancel_reentrant");
			} else {
				state.drain_waiters += 1;
				tracing::trace!(worker = %self.shared.name, seq, "worker.cancel_wait");
				while state.finished < seq && state.phase != WorkerState::Stopped {
					self.shared.drained.wait(&mut state);
				}
				state.drain_waiters -= 1;
				drained = true;
			}
		}
		drop(state);

		tracing::trace!(worker = %self.shared.name, removed = removed.len(), drained, "worker.cancel");
		CancelOutcome {
			removed: removed.len(),
			drained,
		}
	}

	/// Blocks until the prepare hook has completed.
	pub fn wait_ready(&self) -> Result<()> {
		let mut state = self.shared.state.lock();
		while state.phase == WorkerState::Starting {
			self.shared.ready.wait(&mut state);
		}
		ready_result(&state)
	}

	/// Like [`Self::wait_ready`], returning `Ok(false)` if `timeout` elapses first.
	///
	/// A timeout too large to represent as a deadline waits without limit.
	pub fn wait_ready_timeout(&self, timeout: Duration) -> Result<bool> {
		let Some(deadline) = Instant::now().checked_add(timeout) else {
			return self.wait_ready().map(|()| true);
		};
		let mut state = self.shared.state.lock();
		while state.phase == WorkerState::Starting {
			if self.shared.ready.wait_until(&mut state, deadline).timed_out() {
				break;
			}
		}
		if state.phase == WorkerState::Starting {
			return Ok(false);
		}
		ready_result(&state).map(|()| true)
	}

	pub fn is_ready(&self) -> bool {
		self.shared.state.lock().ready
	}

	/// Blocks until the queue is empty and no job is executing, or the worker stopped.
	pub fn wait_idle(&self) {
		let mut state = self.shared.state.lock();
		while state.phase != WorkerState::Stopped && !(state.phase == WorkerState::Idle && state.queue.is_empty()) {
			self.shared.idle.wait(&mut state);
		}
	}

	pub fn pending(&self) -> usize {
		self.shared.state.lock().queue.len()
	}

	pub fn state(&self) -> WorkerState {
		self.shared.state.lock().phase
	}

	pub fn name(&self) -> &str {
		&self.shared.name
	}

	pub fn stats(&self) -> GeneratorStats {
		let state = self.shared.state.lock();
		GeneratorStats {
			name: self.shared.name.clone(),
			state: state.phase,
			pending: state.queue.len(),
			in_flight: state.current.is_some(),
			drain_waiters: state.drain_waiters,
			scheduled: state.counters.scheduled,
			coalesced: state.counters.coalesced,
			executed: state.counters.executed,
			cancelled: state.counters.cancelled,
			panicked: state.counters.panicked,
			discarded: state.counters.discarded,
		}
	}

	fn request_stop(&self, mode: ShutdownMode) {
		let mut state = self.shared.state.lock();
		if state.stop.is_none() || mode == ShutdownMode::Immediate {
			state.stop = Some(mode);
		}
		drop(state);
		tracing::debug!(worker = %self.shared.name, ?mode, "worker.stop_requested");
		self.shared.new_work.notify_all();
	}

	fn is_worker_thread(&self) -> bool {
		self.shared.worker.get() == Some(&std::thread::current().id())
	}
}

fn ready_result<J: Job>(state: &State<J>) -> Result<()> {
	if state.ready {
		return Ok(());
	}
	match &state.prepare_error {
		Some(msg) => Err(GeneratorError::PrepareFailed(msg.clone())),
		None => Err(GeneratorError::Stopped),
	}
}

fn run_worker<J, P>(shared: Arc<Shared<J>>, prepare: P)
where
	J: Job,
	P: FnOnce() -> std::result::Result<(), String>,
{
	let _ = shared.worker.set(std::thread::current().id());

	let prepared = panic::catch(prepare).unwrap_or_else(|msg| Err(format!("prepare hook panicked: {msg}")));
	let mut state = shared.state.lock();
	if let Err(msg) = prepared {
		tracing::error!(worker = %shared.name, error = %msg, "worker.prepare_failed");
		state.prepare_error = Some(msg);
		finish(&shared, state);
		return;
	}
	state.ready = true;
	state.phase = WorkerState::Idle;
	shared.ready.notify_all();
	tracing::debug!(worker = %shared.name, pending = state.queue.len(), "worker.ready");

	loop {
		if state.stop == Some(ShutdownMode::Immediate) {
			break;
		}

		let Some(mut job) = state.queue.pop_front() else {
			if state.stop.is_some() {
				break;
			}
			if state.phase != WorkerState::Idle {
				tracing::trace!(worker = %shared.name, executed = state.counters.executed, "worker.idle");
			}
			state.phase = WorkerState::Idle;
			shared.idle.notify_all();
			if state.drain_waiters > 0 {
				shared.drained.notify_all();
			}
			shared.new_work.wait(&mut state);
			continue;
		};

		let tag = match panic::catch(|| job.tag().clone()) {
			Ok(tag) => tag,
			Err(msg) => {
				state.counters.panicked += 1;
				tracing::error!(worker = %shared.name, error = %msg, "worker.tag_panicked");
				MutexGuard::unlocked(&mut state, move || drop(job));
				continue;
			}
		};
		state.phase = WorkerState::Draining;
		state.started += 1;
		let seq = state.started;
		state.current = Some(InFlight { seq, tag });
		tracing::trace!(worker = %shared.name, seq, pending = state.queue.len(), "worker.execute");

		let outcome = MutexGuard::unlocked(&mut state, || {
			panic::catch(move || {
				job.execute();
				drop(job);
			})
		});

		state.current = None;
		state.finished = seq;
		state.counters.executed += 1;
		if let Err(msg) = outcome {
			state.counters.panicked += 1;
			tracing::error!(worker = %shared.name, seq, error = %msg, "worker.job_panicked");
		}
		if state.drain_waiters > 0 {
			shared.drained.notify_all();
		}
	}

	finish(&shared, state);
}

/// Moves the worker into its terminal state and wakes every waiter.
fn finish<J: Job>(shared: &Shared<J>, mut state: MutexGuard<'_, State<J>>) {
	let discarded = state.queue.take_all();
	state.counters.discarded += discarded.len() as u64;
	state.phase = WorkerState::Stopped;
	debug_assert!(state.current.is_none(), "worker stopped with a job in flight");
	tracing::debug!(
		worker = %shared.name,
		executed = state.counters.executed,
		discarded = discarded.len(),
		"worker.stopped"
	);
	drop(state);
	drop(discarded);

	shared.ready.notify_all();
	shared.idle.notify_all();
	shared.drained.notify_all();
}
