#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Tile and layer paint operations for the textures thread.
//!
//! [`TexturesGenerator`] runs [`PaintOperation`]s on a dedicated
//! `tilegen-worker` thread after binding a [`TextureContext`]. Operations on
//! the same page or layer coalesce, and pages or layer trees being torn down
//! can be retracted with [`TexturesHandle::remove_operations_for_page`] and
//! [`TexturesHandle::remove_operations_for_base_layer`], which also wait out an
//! operation already painting them.

mod error;
mod operation;
mod target;
mod textures;

pub use error::PaintError;
pub use operation::{LayerPainter, PaintOperation, TilePainter};
pub use target::{BaseLayerFilter, LayerId, PageFilter, PageId, PaintTarget, TileCoord};
pub use textures::{TextureContext, TexturesGenerator, TexturesHandle};
