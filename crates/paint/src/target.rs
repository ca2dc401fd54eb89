use std::fmt;

use tilegen_worker::JobFilter;

/// Page whose tiles are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

/// Compositing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Tile position within a page, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	pub const fn new(x: u32, y: u32) -> Self {
		Self { x, y }
	}
}

impl fmt::Display for PageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "page#{}", self.0)
	}
}

impl fmt::Display for LayerId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "layer#{}", self.0)
	}
}

impl fmt::Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.x, self.y)
	}
}

/// Render target a paint operation touches.
///
/// Doubles as the coalescing key: at most one queued operation per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintTarget {
	/// Tile set of one page.
	Tiles { page: PageId },
	/// One layer inside the tree rooted at `base`.
	Layer { base: LayerId, layer: LayerId },
}

impl PaintTarget {
	pub fn page(&self) -> Option<PageId> {
		match self {
			Self::Tiles { page } => Some(*page),
			Self::Layer { .. } => None,
		}
	}

	pub fn base_layer(&self) -> Option<LayerId> {
		match self {
			Self::Tiles { .. } => None,
			Self::Layer { base, .. } => Some(*base),
		}
	}
}

/// Selects tile operations of one page.
#[derive(Debug, Clone, Copy)]
pub struct PageFilter(pub PageId);

impl JobFilter<PaintTarget> for PageFilter {
	fn check(&self, tag: &PaintTarget) -> bool {
		tag.page() == Some(self.0)
	}
}

/// Selects layer operations anywhere under one base layer.
#[derive(Debug, Clone, Copy)]
pub struct BaseLayerFilter(pub LayerId);

impl JobFilter<PaintTarget> for BaseLayerFilter {
	fn check(&self, tag: &PaintTarget) -> bool {
		tag.base_layer() == Some(self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn page_filter_ignores_layers() {
		let filter = PageFilter(PageId(3));
		assert!(filter.check(&PaintTarget::Tiles { page: PageId(3) }));
		assert!(!filter.check(&PaintTarget::Tiles { page: PageId(4) }));
		assert!(!filter.check(&PaintTarget::Layer {
			base: LayerId(3),
			layer: LayerId(3),
		}));
	}

	#[test]
	fn base_layer_filter_matches_whole_tree() {
		let filter = BaseLayerFilter(LayerId(1));
		assert!(filter.check(&PaintTarget::Layer {
			base: LayerId(1),
			layer: LayerId(1),
		}));
		assert!(filter.check(&PaintTarget::Layer {
			base: LayerId(1),
			layer: LayerId(9),
		}));
		assert!(!filter.check(&PaintTarget::Layer {
			base: LayerId(2),
			layer: LayerId(9),
		}));
		assert!(!filter.check(&PaintTarget::Tiles { page: PageId(1) }));
	}
}
