//! Error types for paint operations.

use thiserror::Error;

use crate::target::{LayerId, PageId, TileCoord};

/// Errors reported by painters and texture contexts.
#[derive(Debug, Error)]
pub enum PaintError {
	/// The tile has no backing texture.
	#[error("tile {tile} of {page} has no backing texture")]
	TileUnavailable {
		/// Page owning the tile.
		page: PageId,
		/// Tile position.
		tile: TileCoord,
	},

	/// The layer was detached from its tree before it could be painted.
	#[error("{0} is detached")]
	LayerDetached(LayerId),

	/// Uploading pixels to the GPU failed.
	#[error("texture upload failed: {0}")]
	Upload(String),

	/// The rendering context could not be acquired.
	#[error("texture context unavailable: {0}")]
	Context(String),
}
