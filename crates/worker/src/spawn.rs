use std::thread::JoinHandle;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};

/// Spawns the dedicated generator thread described by `config`.
pub(crate) fn spawn_worker_thread<F>(config: &GeneratorConfig, f: F) -> Result<JoinHandle<()>>
where
	F: FnOnce() + Send + 'static,
{
	tracing::trace!(thread = %config.thread_name, stack_size = ?config.stack_size, "worker.spawn_thread");
	let mut builder = std::thread::Builder::new().name(config.thread_name.clone());
	if let Some(bytes) = config.stack_size {
		builder = builder.stack_size(bytes);
	}
	builder.spawn(f).map_err(|error| GeneratorError::Spawn {
		name: config.thread_name.clone(),
		error,
	})
}
