//! # photobinder-mime
//!
//! MIME message parsing for `.eml` files.
//!
//! ## Features
//!
//! - **Message parsing**: Split raw RFC 5322 messages into headers and body
//! - **Multipart**: Recursive splitting of `multipart/*` bodies on their boundary
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words, RFC 2231 parameters
//! - **Content types**: Type/subtype with parameters
//!
//! ## Quick Start
//!
//! ```ignore
//! use photobinder_mime::Message;
//!
//! let message = Message::parse(raw_bytes)?;
//! for part in message.leaf_parts() {
//!     let ct = part.content_type()?;
//!     if ct.is_image() {
//!         let bytes = part.decode_body()?;
//!         println!("{} ({} bytes)", part.filename().unwrap_or_default(), bytes.len());
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
