//! Error types for the generator lifecycle.

use thiserror::Error;

/// Errors surfaced by [`crate::Generator`] and [`crate::GeneratorHandle`].
#[derive(Debug, Error)]
pub enum GeneratorError {
	/// The worker thread could not be spawned.
	#[error("failed to spawn worker thread '{name}': {error}")]
	Spawn {
		/// Configured thread name.
		name: String,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The prepare hook returned an error or panicked.
	#[error("worker preparation failed: {0}")]
	PrepareFailed(String),

	/// The worker has stopped and accepts no more jobs.
	#[error("worker has stopped")]
	Stopped,

	/// The worker thread terminated abnormally.
	#[error("worker thread panicked: {0}")]
	WorkerPanicked(String),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
