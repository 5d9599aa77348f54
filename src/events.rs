//! Typed events flowing into the app and notifications flowing out of it.
//!
//! Inbound [`AppEvent`]s are queued on an unbounded channel and handled one
//! at a time by [`App`](crate::app::App). Outbound [`Notification`]s are
//! broadcast to any number of subscribers (the terminal browser, tests).

use skilldocs_core::models::Route;
use skilldocs_core::search::PanelKey;
use skilldocs_core::toc::TocLayout;
use tokio::sync::{broadcast, mpsc};

use crate::error::FetchError;
use crate::markdown::LoadTicket;
use crate::prefs::Theme;

const NOTIFICATION_CAPACITY: usize = 256;

/// A key pressed outside of the search panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    /// True while an input or textarea has focus.
    pub in_form_field: bool,
}

impl KeyPress {
    pub fn new(key: char) -> Self {
        Self {
            key,
            in_form_field: false,
        }
    }

    pub fn in_field(key: char) -> Self {
        Self {
            key,
            in_form_field: true,
        }
    }
}

/// A finished article fetch, tagged with the load it belongs to.
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: LoadTicket,
    pub path: String,
    pub result: Result<String, FetchError>,
}

#[derive(Debug)]
pub enum AppEvent {
    /// The URL fragment changed.
    HashChanged(String),
    Key(KeyPress),
    SearchInput(String),
    SearchKey(PanelKey),
    SearchFocus,
    SearchBlur,
    /// A click on the result at this position.
    SearchSelect(usize),
    OutsideClick,
    Scroll(f64),
    AnimationFrame,
    Layout(TocLayout),
    ToggleMenu,
    ArticleFetched(FetchCompletion),
    /// Timer wake-up for deferred work (the search blur grace period).
    Tick,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    RouteChanged(Route),
    NavigationReady { articles: usize },
    NavigationFailed(String),
    Welcome,
    RenderComplete {
        path: String,
        title: Option<String>,
        headings: usize,
    },
    RenderFailed { path: String, message: String },
    ActiveHeading { index: usize, id: String },
    SearchResults { query: String, count: usize },
    SearchClosed,
    FocusSearch,
    ThemeChanged(Theme),
    SidebarToggled { visible: bool },
    MenuToggled { open: bool },
}

/// Sending half of the app's event queue plus the notification broadcaster.
#[derive(Debug, Clone)]
pub struct EventBus {
    events: mpsc::UnboundedSender<AppEvent>,
    notifications: broadcast::Sender<Notification>,
}

impl EventBus {
    /// Create a bus and the receiver the app loop drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        (
            Self {
                events,
                notifications,
            },
            rx,
        )
    }

    /// Queue an event. Dropped silently once the app has shut down.
    pub fn send(&self, event: AppEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Event queue closed, dropping event");
        }
    }

    pub fn notify(&self, notification: Notification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }
}
