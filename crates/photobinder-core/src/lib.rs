//! # photobinder-core
//!
//! Core pipeline for `PhotoBinder`.
//!
//! This crate provides:
//! - Upload ingestion with MD5 deduplication and EXIF orientation fixes
//! - A content-addressed image cache
//! - Image extraction from Outlook `.msg` and MIME `.eml` files
//! - The ordered photo collection with a session block-list
//! - **Document rendering** - one photo per page, as Word or PDF

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod ingest;
pub mod photo;
pub mod render;
mod session;
pub mod unpack;

pub use error::{Error, Result};
pub use ingest::{ContainerKind, ImageCache, Ingested, Ingestor, Skip, Upload};
pub use photo::{ContentHash, Edit, PhotoRecord, PhotoStore};
pub use render::{
    DocumentKind, DocumentRenderer, PdfRenderer, RenderOptions, RenderedDocument, WordRenderer,
    effective_labels, fit_within, render,
};
pub use session::{Session, UploadReport, UploadWarning};
pub use unpack::{Unpacked, unpack};
