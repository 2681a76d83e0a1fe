//! Feed normalization core for an RSS/Atom reader.
//!
//! This crate turns the loosely-structured data recovered from Atom XML into
//! normalized, owned records that downstream layers (persistence, UI) can
//! consume without re-checking anything:
//!
//! - [`atom::ContentReducer`] - reduces the HTML fragment inside an Atom
//!   `content`/`summary` element to a plain-text summary and a representative
//!   image URL
//! - [`atom::AtomDateParser`] - parses Atom timestamp strings into epoch
//!   milliseconds, absorbing malformed input
//! - [`atom::AtomMapper`] - assembles [`model::PostPayload`] and
//!   [`model::FeedPayload`] records from raw field maps
//!
//! Everything here is pure, synchronous transformation code. Network fetching
//! and storage live upstream and downstream of this crate; the only outward
//! dependencies are the [`util::TextCleaner`] and [`icon::IconResolver`]
//! capabilities, both of which ship with default implementations.
//!
//! # Example
//!
//! ```
//! use sift::{AtomMapper, RawFieldMap};
//!
//! let mut fields = RawFieldMap::new();
//! fields.insert("title", "An <b>update</b>");
//! fields.insert("link", "https://example.com/post/1");
//! fields.insert("published", "2023-05-01T12:00:00+0000");
//! fields.insert("content", "<p>Hello world</p>");
//!
//! let mapper = AtomMapper::new();
//! let post = mapper.map_post(&fields).unwrap();
//! assert_eq!(post.title, "An update");
//! assert_eq!(post.description, "Hello world");
//! assert_eq!(post.date, 1_682_942_400_000);
//! ```

pub mod atom;
pub mod icon;
pub mod model;
pub mod util;

pub use atom::{AtomContent, AtomDateParser, AtomMapper};
pub use model::{FeedPayload, MappingError, PostPayload, RawFieldMap};
