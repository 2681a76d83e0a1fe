//! Atom feed normalization: content reduction, date parsing, payload mapping.
//!
//! This module is the pipeline that turns raw Atom data into normalized
//! records:
//!
//! - [`content`] - Reduces the HTML fragment inside `content`/`summary`
//!   elements to a plain-text summary plus a representative image URL
//! - [`date`] - Parses Atom timestamp strings into epoch milliseconds
//! - [`mapper`] - Assembles `PostPayload` / `FeedPayload` records from raw
//!   field maps using the two components above
//!
//! # Example
//!
//! ```ignore
//! use sift::atom::{reduce_fragment, AtomMapper};
//!
//! let reduced = reduce_fragment("<p>Hello <img src='http://x/i.png'/> world</p>");
//! assert_eq!(reduced.content, "Hello  world");
//!
//! let mapper = AtomMapper::new();
//! let feed = mapper.map_feed(feed_url, &fields, posts)?;
//! ```

mod content;
mod date;
mod mapper;

pub use content::{reduce_fragment, AtomContent, ContentReducer};
pub use date::{AtomDateParser, DateDiagnostics, TracingDiagnostics};
pub use mapper::AtomMapper;
