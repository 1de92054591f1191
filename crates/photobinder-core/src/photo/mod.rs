//! Photo collection.
//!
//! This module provides the photo record model and the ordered store that
//! owns the collection together with the session block-list.

mod model;
mod store;

pub use model::{ContentHash, PhotoRecord};
pub use store::{Edit, PhotoStore};
