//! Fragment-based router.
//!
//! The router owns the current fragment and the route parsed from it.
//! [`Router::navigate`] never handles the route itself: it queues a
//! `HashChanged` event, and the route is applied when the app loop gets to
//! it. Navigation is therefore always asynchronous to the caller.

pub use skilldocs_core::routing::{build_path, parse_hash, to_hash};

use skilldocs_core::models::Route;

use crate::events::{AppEvent, EventBus, Notification};

#[derive(Debug)]
pub struct Router {
    hash: String,
    current: Route,
    bus: EventBus,
}

impl Router {
    pub fn new(bus: EventBus) -> Self {
        Self {
            hash: String::new(),
            current: Route::default(),
            bus,
        }
    }

    /// The last route handled.
    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Change the fragment to `#/<path>`.
    pub fn navigate(&self, path: &str) {
        tracing::debug!(path, "Navigating");
        self.bus.send(AppEvent::HashChanged(to_hash(path)));
    }

    /// Apply a fragment change: parse it, remember it and tell subscribers.
    pub fn handle_route(&mut self, hash: &str) -> &Route {
        self.hash = hash.to_string();
        self.current = parse_hash(hash);
        tracing::info!(path = %self.current.path, "Route changed");
        self.bus.notify(Notification::RouteChanged(self.current.clone()));
        &self.current
    }

    pub fn is_active(&self, skill: &str, topic: Option<&str>, article: Option<&str>) -> bool {
        self.current.is_active(skill, topic, article)
    }

    pub fn should_expand_skill(&self, skill: &str) -> bool {
        self.current.should_expand_skill(skill)
    }

    pub fn should_expand_topic(&self, skill: &str, topic: &str) -> bool {
        self.current.should_expand_topic(skill, topic)
    }
}
