//! Upload ingestion.
//!
//! Uploads are hashed, checked against the collection and the block-list,
//! normalized to upright orientation and written to a content-addressed
//! cache.

mod cache;
mod dedup;
mod orientation;
mod upload;

pub use cache::ImageCache;
pub use dedup::{Ingested, Ingestor, Skip};
pub use orientation::Orientation;
pub use upload::{
    ACCEPTED_EXTENSIONS, ContainerKind, DECODABLE_EXTENSIONS, DEFAULT_EXTENSION, Upload,
    is_decodable, resolve_extension,
};
