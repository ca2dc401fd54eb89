//! Job and filter contracts consumed by the generator.

/// One unit of deferred work executed on the generator thread.
///
/// Two jobs with equal [`Job::coalesce_key`] are the same logical request:
/// scheduling the second one while the first is still queued replaces the
/// first in place. The [`Job::tag`] is the only part of a job other threads
/// ever look at after submission, and only through a [`JobFilter`].
///
/// [`Job::coalesce_key`], [`Job::tag`], [`Job::absorb`] and cloning the tag
/// run while the generator's coordinator lock is held and must not panic. A
/// panic there unwinds the scheduling or cancelling caller; on the generator
/// thread it is caught and the job is dropped unexecuted.
pub trait Job: Send + 'static {
	/// Identity used for coalescing.
	type Key: Eq;
	/// Resource affiliation inspected by cancellation filters.
	type Tag: Clone + Send + 'static;

	fn coalesce_key(&self) -> Self::Key;

	fn tag(&self) -> &Self::Tag;

	/// Runs the payload. Failures are the job's own business; the worker moves
	/// on to the next job regardless.
	fn execute(&mut self);

	/// Folds state from the queued job this one is replacing.
	///
	/// The replaced job is dropped afterwards, outside the coordinator lock, so
	/// its `Drop` may call back into the generator. The default keeps only the
	/// newer job.
	fn absorb(&mut self, _previous: &mut Self) {}
}

/// Predicate selecting jobs by tag for cancellation.
pub trait JobFilter<T> {
	fn check(&self, tag: &T) -> bool;
}

impl<T, F> JobFilter<T> for F
where
	F: Fn(&T) -> bool,
{
	fn check(&self, tag: &T) -> bool {
		self(tag)
	}
}

/// Filter matching every job.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<T> JobFilter<T> for MatchAll {
	fn check(&self, _tag: &T) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closures_act_as_filters() {
		let target = 7u32;
		let filter = move |tag: &u32| *tag == target;
		assert!(filter.check(&7));
		assert!(!filter.check(&8));
	}

	#[test]
	fn match_all_accepts_anything() {
		assert!(MatchAll.check(&"layer"));
		assert!(MatchAll.check(&0u8));
	}
}
