/// Default worker thread name.
pub const DEFAULT_THREAD_NAME: &str = "tilegen-worker";

/// Construction options for a [`crate::Generator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
	pub(crate) thread_name: String,
	pub(crate) stack_size: Option<usize>,
	pub(crate) queue_capacity: usize,
}

impl GeneratorConfig {
	/// Sets the worker thread name.
	#[must_use]
	pub fn thread_name(mut self, name: impl Into<String>) -> Self {
		self.thread_name = name.into();
		self
	}

	/// Sets the worker thread stack size in bytes.
	///
	/// # Panics
	///
	/// Panics if `bytes` is zero.
	#[must_use]
	pub fn stack_size(mut self, bytes: usize) -> Self {
		assert!(bytes > 0, "worker stack size must be > 0");
		self.stack_size = Some(bytes);
		self
	}

	/// Sets the initial queue allocation. The queue still grows without bound.
	#[must_use]
	pub fn queue_capacity(mut self, capacity: usize) -> Self {
		self.queue_capacity = capacity;
		self
	}

	pub fn name(&self) -> &str {
		&self.thread_name
	}
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			thread_name: DEFAULT_THREAD_NAME.to_string(),
			stack_size: None,
			queue_capacity: 32,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builder_overrides_defaults() {
		let config = GeneratorConfig::default().thread_name("textures").stack_size(1 << 20).queue_capacity(4);
		assert_eq!(config.name(), "textures");
		assert_eq!(config.stack_size, Some(1 << 20));
		assert_eq!(config.queue_capacity, 4);
	}

	#[test]
	#[should_panic(expected = "stack size must be > 0")]
	fn zero_stack_size_panics() {
		let _ = GeneratorConfig::default().stack_size(0);
	}
}
