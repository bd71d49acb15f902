//! Source position correspondence for fragment-assembled output.
//!
//! Code generators that emit independently compiled fragments record entries in
//! fragment-local coordinates with a [`Mapper`]. Once each fragment's placement in the
//! final output is known, the mapper shifts its entries into absolute coordinates, and
//! [`SourceMap`] turns the result into a reverse index from any output offset back to
//! the original source location.

mod location;
mod mapper;
mod source_map;

pub use location::{ByteOffset, Entry, Location};
pub use mapper::Mapper;
pub use source_map::SourceMap;
