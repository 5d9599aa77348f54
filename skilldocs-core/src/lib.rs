//! Core logic for skilldocs: the manifest model and the pure, data-in/data-out
//! components built on it.
//!
//! - [`routing`]: fragment parsing and path building
//! - [`navigation`]: the sorted navigation tree, flat index and path resolution
//! - [`search`]: ranked title/skill/topic search and the results panel
//! - [`document`]: front-matter and sanitised markdown documents
//! - [`toc`]: heading anchors and the scroll-spy
//!
//! Nothing here performs I/O; fetching and event wiring live in the
//! `skilldocs` crate.

pub mod document;
pub mod models;
pub mod navigation;
pub mod routing;
pub mod search;
pub mod toc;
pub mod tree_render;
