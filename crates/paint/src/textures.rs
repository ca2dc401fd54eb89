use tilegen_worker::{
	CancelOutcome, Generator, GeneratorConfig, GeneratorHandle, GeneratorStats, JobFilter, Result, ScheduleOutcome, ShutdownMode, ShutdownReport,
};

use crate::error::PaintError;
use crate::operation::PaintOperation;
use crate::target::{BaseLayerFilter, LayerId, PageFilter, PageId, PaintTarget};

/// Rendering context the textures thread binds before painting anything.
pub trait TextureContext: Send + 'static {
	/// Acquires the context on the calling (worker) thread.
	fn enable_textures(&mut self) -> std::result::Result<(), PaintError>;

	/// Fills placeholder textures shown until real content is painted.
	fn paint_default_textures(&mut self) -> std::result::Result<(), PaintError> {
		Ok(())
	}

	/// Called once the thread is ready to paint.
	fn mark_ready(&mut self) {}
}

/// Dedicated texture-painting thread.
pub struct TexturesGenerator {
	inner: Generator<PaintOperation>,
}

impl TexturesGenerator {
	/// Spawns the thread; `context` is prepared on it before any operation runs.
	pub fn start(config: GeneratorConfig, mut context: impl TextureContext) -> Result<Self> {
		let inner = Generator::start_with(config, move || {
			context.enable_textures().map_err(|e| e.to_string())?;
			tracing::debug!("paint.textures_enabled");
			context.paint_default_textures().map_err(|e| e.to_string())?;
			context.mark_ready();
			Ok(())
		})?;
		Ok(Self { inner })
	}

	pub fn handle(&self) -> TexturesHandle {
		TexturesHandle { inner: self.inner.handle() }
	}

	pub fn shutdown(self, mode: ShutdownMode) -> Result<ShutdownReport> {
		self.inner.shutdown(mode)
	}
}

/// Cloneable entry point for scheduling and retracting paint operations.
#[derive(Clone)]
pub struct TexturesHandle {
	inner: GeneratorHandle<PaintOperation>,
}

impl TexturesHandle {
	pub fn schedule_operation(&self, operation: PaintOperation) -> Result<ScheduleOutcome> {
		self.inner.schedule(operation)
	}

	/// Retracts every tile operation for `page`.
	///
	/// On return the page's tiles are neither queued nor being painted.
	pub fn remove_operations_for_page(&self, page: PageId) -> CancelOutcome {
		self.remove_operations_for_filter(PageFilter(page))
	}

	/// Retracts every layer operation in the tree rooted at `base`.
	pub fn remove_operations_for_base_layer(&self, base: LayerId) -> CancelOutcome {
		self.remove_operations_for_filter(BaseLayerFilter(base))
	}

	pub fn remove_operations_for_filter(&self, filter: impl JobFilter<PaintTarget>) -> CancelOutcome {
		self.inner.cancel(filter)
	}

	pub fn wait_ready(&self) -> Result<()> {
		self.inner.wait_ready()
	}

	pub fn wait_idle(&self) {
		self.inner.wait_idle();
	}

	pub fn stats(&self) -> GeneratorStats {
		self.inner.stats()
	}
}
