//! Totem Catalog - named content on disk
//!
//! The catalog maps short names ("shrek", "dance") to files under the images
//! root. Subdirectories of the root double as playlists for directory
//! cycling, paced per directory by a [`PacingTable`].

pub mod artwork;
pub mod catalog;
pub mod fetch;
pub mod media;
pub mod pacing;

pub use artwork::{ArtworkFetcher, artwork_name, store_artwork};
pub use catalog::{CatalogEntry, CatalogError, ContentCatalog, ContentKind, content_name};
pub use fetch::{HttpArtworkFetcher, MAX_ARTWORK_BYTES};
pub use media::{ImageMediaSource, MediaError, MediaSource};
pub use pacing::{CyclePacing, PacingTable};
