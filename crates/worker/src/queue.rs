use std::collections::VecDeque;

use crate::job::Job;

/// Outcome from scheduling one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
	/// Job was appended to the back of the queue.
	Enqueued,
	/// Job replaced a queued job with the same coalescing key, keeping its position.
	Coalesced,
}

/// Ordered sequence of pending jobs.
///
/// FIFO, except that coalescing replacement keeps the position of the job
/// being replaced. At most one job per coalescing key is queued at a time.
/// The queue itself is not synchronized; the generator keeps it behind its
/// coordinator lock.
pub struct JobQueue<J> {
	jobs: VecDeque<J>,
}

impl<J> Default for JobQueue<J> {
	fn default() -> Self {
		Self { jobs: VecDeque::new() }
	}
}

impl<J: Job> JobQueue<J> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			jobs: VecDeque::with_capacity(capacity),
		}
	}

	/// Appends `job`, or swaps it in for a queued job with an equal key.
	///
	/// The displaced job is handed back so the caller can drop it after
	/// releasing whatever lock guards the queue.
	pub fn schedule(&mut self, job: J) -> (ScheduleOutcome, Option<J>) {
		let key = job.coalesce_key();
		if let Some(existing) = self.jobs.iter_mut().find(|it| it.coalesce_key() == key) {
			let mut previous = std::mem::replace(existing, job);
			existing.absorb(&mut previous);
			return (ScheduleOutcome::Coalesced, Some(previous));
		}
		self.jobs.push_back(job);
		(ScheduleOutcome::Enqueued, None)
	}

	pub fn pop_front(&mut self) -> Option<J> {
		self.jobs.pop_front()
	}

	/// Removes every job whose tag satisfies `pred`, preserving survivor order.
	pub fn remove_matching(&mut self, mut pred: impl FnMut(&J::Tag) -> bool) -> Vec<J> {
		let mut removed = Vec::new();
		let mut kept = VecDeque::with_capacity(self.jobs.len());
		for job in self.jobs.drain(..) {
			if pred(job.tag()) {
				removed.push(job);
			} else {
				kept.push_back(job);
			}
		}
		self.jobs = kept;
		removed
	}

	/// Empties the queue, returning what was pending in order.
	pub fn take_all(&mut self) -> Vec<J> {
		self.jobs.drain(..).collect()
	}

	pub fn len(&self) -> usize {
		self.jobs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.jobs.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &J> {
		self.jobs.iter()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;

	#[derive(Debug, Clone, PartialEq, Eq)]
	struct Entry {
		key: u8,
		version: u32,
		dirty: Vec<u32>,
	}

	impl Job for Entry {
		type Key = u8;
		type Tag = u8;

		fn coalesce_key(&self) -> u8 {
			self.key
		}

		fn tag(&self) -> &u8 {
			&self.key
		}

		fn execute(&mut self) {}

		fn absorb(&mut self, previous: &mut Self) {
			for d in previous.dirty.drain(..) {
				if !self.dirty.contains(&d) {
					self.dirty.push(d);
				}
			}
		}
	}

	fn entry(key: u8, version: u32) -> Entry {
		Entry {
			key,
			version,
			dirty: vec![version],
		}
	}

	fn keys(queue: &JobQueue<Entry>) -> Vec<(u8, u32)> {
		queue.iter().map(|e| (e.key, e.version)).collect()
	}

	#[test]
	fn equal_keys_coalesce_in_place() {
		let mut queue = JobQueue::new();
		assert_eq!(queue.schedule(entry(1, 1)), (ScheduleOutcome::Enqueued, None));
		assert_eq!(queue.schedule(entry(2, 1)), (ScheduleOutcome::Enqueued, None));

		let (outcome, displaced) = queue.schedule(entry(1, 2));
		assert_eq!(outcome, ScheduleOutcome::Coalesced);
		assert_eq!(displaced.map(|e| e.version), Some(1));

		assert_eq!(keys(&queue), vec![(1, 2), (2, 1)]);
	}

	#[test]
	fn replacement_runs_merge_hook() {
		let mut queue = JobQueue::new();
		queue.schedule(entry(4, 1));
		queue.schedule(entry(4, 2));
		queue.schedule(entry(4, 3));

		let job = queue.pop_front().expect("one job queued");
		assert_eq!(job.version, 3);
		assert_eq!(job.dirty, vec![3, 2, 1]);
		assert!(queue.is_empty());
	}

	#[test]
	fn remove_matching_keeps_survivor_order() {
		let mut queue = JobQueue::new();
		for key in [1, 2, 3, 4, 5] {
			queue.schedule(entry(key, 0));
		}

		let removed = queue.remove_matching(|tag| tag % 2 == 0);
		assert_eq!(removed.iter().map(|e| e.key).collect::<Vec<_>>(), vec![2, 4]);
		assert_eq!(keys(&queue), vec![(1, 0), (3, 0), (5, 0)]);
	}

	#[test]
	fn remove_matching_nothing_is_noop() {
		let mut queue = JobQueue::new();
		queue.schedule(entry(1, 0));
		assert!(queue.remove_matching(|_| false).is_empty());
		assert_eq!(queue.len(), 1);
	}

	#[test]
	fn pop_front_on_empty_returns_none() {
		let mut queue: JobQueue<Entry> = JobQueue::with_capacity(4);
		assert!(queue.pop_front().is_none());
	}

	proptest! {
		/// Scheduling any sequence leaves one job per key, ordered by first submission,
		/// each carrying the latest version for its key.
		#[test]
		fn prop_coalescing_preserves_first_position(ops in prop::collection::vec((0u8..6, 0u32..1000), 0..64)) {
			let mut queue = JobQueue::new();
			for (key, version) in &ops {
				queue.schedule(entry(*key, *version));
			}

			let mut expected: Vec<(u8, u32)> = Vec::new();
			for (key, version) in &ops {
				match expected.iter_mut().find(|(k, _)| k == key) {
					Some(slot) => slot.1 = *version,
					None => expected.push((*key, *version)),
				}
			}

			prop_assert_eq!(keys(&queue), expected);
		}
	}
}
