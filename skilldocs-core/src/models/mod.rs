//! Data model for skilldocs.
//!
//! # Core Concepts
//!
//! - [`Manifest`]: the static skill → topic → article tree read from
//!   `manifest.json`. Immutable for the lifetime of a load.
//! - [`FlatArticleRecord`]: one row per article, derived from the manifest in
//!   traversal order. This is what search ranks.
//! - [`Route`]: the parsed URL fragment, rebuilt on every navigation.

mod article;
mod manifest;
mod route;

pub use article::*;
pub use manifest::*;
pub use route::*;
