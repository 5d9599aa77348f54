//! skilldocs: skill → topic → article documentation sites.
//!
//! The pure logic (manifest model, routing, navigation tree, search, table of
//! contents, markdown documents) lives in [`skilldocs_core`] and is
//! re-exported here. This crate adds I/O and wiring:
//!
//! - [`content`]: where site files come from (disk or HTTP)
//! - [`router`], [`navigation`], [`markdown`]: the stateful components
//! - [`app`]: the event-driven application and its context
//! - [`api`]: the preview server
//! - [`browse`]: the line-driven terminal session

pub mod api;
pub mod app;
pub mod browse;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod markdown;
pub mod navigation;
pub mod prefs;
pub mod router;

pub use skilldocs_core::{document, models, routing, search, toc, tree_render};
