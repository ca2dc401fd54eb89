use std::collections::BTreeSet;
use std::sync::Arc;

use tilegen_worker::Job;

use crate::error::PaintError;
use crate::target::{LayerId, PageId, PaintTarget, TileCoord};

/// Paints individual tiles of a page into their textures.
pub trait TilePainter: Send + Sync {
	fn paint_tile(&self, page: PageId, tile: TileCoord) -> Result<(), PaintError>;
}

/// Paints a whole layer into its texture.
pub trait LayerPainter: Send + Sync {
	fn paint_layer(&self, layer: LayerId) -> Result<(), PaintError>;
}

enum Work {
	Tiles { dirty: BTreeSet<TileCoord>, painter: Arc<dyn TilePainter> },
	Layer { painter: Arc<dyn LayerPainter> },
}

/// One deferred paint request.
///
/// Operations on the same [`PaintTarget`] coalesce. A newer tile operation
/// inherits the dirty tiles of the one it replaces, so no invalidation is
/// lost; a newer layer operation simply supersedes the older one.
pub struct PaintOperation {
	target: PaintTarget,
	work: Work,
}

impl PaintOperation {
	/// Repaints `dirty` tiles of `page`.
	pub fn tiles(page: PageId, dirty: impl IntoIterator<Item = TileCoord>, painter: Arc<dyn TilePainter>) -> Self {
		Self {
			target: PaintTarget::Tiles { page },
			work: Work::Tiles {
				dirty: dirty.into_iter().collect(),
				painter,
			},
		}
	}

	/// Repaints `layer`, which belongs to the tree rooted at `base`.
	pub fn layer(base: LayerId, layer: LayerId, painter: Arc<dyn LayerPainter>) -> Self {
		Self {
			target: PaintTarget::Layer { base, layer },
			work: Work::Layer { painter },
		}
	}

	pub fn target(&self) -> PaintTarget {
		self.target
	}

	/// Dirty tiles still to paint; empty for layer operations.
	pub fn dirty_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
		let dirty = match &self.work {
			Work::Tiles { dirty, .. } => Some(dirty.iter().copied()),
			Work::Layer { .. } => None,
		};
		dirty.into_iter().flatten()
	}
}

impl Job for PaintOperation {
	type Key = PaintTarget;
	type Tag = PaintTarget;

	fn coalesce_key(&self) -> PaintTarget {
		self.target
	}

	fn tag(&self) -> &PaintTarget {
		&self.target
	}

	fn execute(&mut self) {
		match (&self.work, self.target) {
			(Work::Tiles { dirty, painter }, PaintTarget::Tiles { page }) => {
				let mut failed = 0usize;
				for tile in dirty {
					if let Err(error) = painter.paint_tile(page, *tile) {
						failed += 1;
						tracing::warn!(%page, %tile, %error, "paint.tile_failed");
					}
				}
				tracing::trace!(%page, tiles = dirty.len(), failed, "paint.tiles");
			}
			(Work::Layer { painter }, PaintTarget::Layer { layer, .. }) => {
				if let Err(error) = painter.paint_layer(layer) {
					tracing::warn!(%layer, %error, "paint.layer_failed");
				} else {
					tracing::trace!(%layer, "paint.layer");
				}
			}
			_ => unreachable!("paint work does not match its target"),
		}
	}

	fn absorb(&mut self, previous: &mut Self) {
		if let (Work::Tiles { dirty, .. }, Work::Tiles { dirty: older, .. }) = (&mut self.work, &mut previous.work) {
			dirty.append(older);
		}
	}
}
