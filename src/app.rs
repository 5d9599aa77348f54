//! The application: wires router, navigation, search, renderer and table of
//! contents together and owns theme, sidebar and menu state.
//!
//! # Lifecycle
//!
//! 1. Build an [`AppContext`] (config, content source, event bus, preferences).
//! 2. [`App::new`] constructs every component from the context.
//! 3. [`App::init`] loads the theme and the manifest.
//! 4. Events are handled one at a time, either by [`App::run`] draining the
//!    queue or by calling [`App::dispatch`] directly.
//! 5. [`App::shutdown`] tears down per-article state.
//!
//! Article fetches run as spawned tasks that post an `ArticleFetched` event
//! back to the queue, so the only suspension points are I/O.

use std::sync::Arc;
use std::time::{Duration, Instant};

use skilldocs_core::search::{PanelKey, SearchIndex, SearchPanel, BLUR_GRACE};
use skilldocs_core::toc::TableOfContents;
use tokio::sync::mpsc;

use crate::config::SiteConfig;
use crate::content::ContentSource;
use crate::events::{AppEvent, EventBus, FetchCompletion, KeyPress, Notification};
use crate::markdown::{MarkdownRenderer, RenderState};
use crate::navigation::{NavStatus, Navigation};
use crate::prefs::{PreferenceStore, Theme};
use crate::router::Router;

/// Delay standing in for one display refresh.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything components need, constructed once and passed in explicitly.
#[derive(Debug)]
pub struct AppContext {
    pub config: Arc<SiteConfig>,
    pub source: Arc<dyn ContentSource>,
    pub bus: EventBus,
    pub prefs: PreferenceStore,
}

impl AppContext {
    /// Build a context and the receiver for its event queue.
    pub fn new(
        config: SiteConfig,
        source: Arc<dyn ContentSource>,
        prefs: PreferenceStore,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (bus, rx) = EventBus::new();
        (
            Self {
                config: Arc::new(config),
                source,
                bus,
                prefs,
            },
            rx,
        )
    }
}

#[derive(Debug)]
pub struct App {
    ctx: AppContext,
    router: Router,
    navigation: Navigation,
    search: SearchIndex,
    panel: SearchPanel,
    renderer: MarkdownRenderer,
    toc: TableOfContents,
    theme: Theme,
    sidebar_visible: bool,
    menu_open: bool,
    search_focused: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let toc = TableOfContents::new(ctx.config.header_height, ctx.config.scroll_offset);
        Self {
            router: Router::new(ctx.bus.clone()),
            navigation: Navigation::new(),
            search: SearchIndex::new(Vec::new().into()),
            panel: SearchPanel::new(),
            renderer: MarkdownRenderer::new(),
            toc,
            theme: Theme::default(),
            sidebar_visible: true,
            menu_open: false,
            search_focused: false,
            ctx,
        }
    }

    /// Load the stored theme and the manifest.
    ///
    /// A manifest failure leaves navigation in its error state and is
    /// reported as a notification; the app keeps running.
    pub async fn init(&mut self) {
        self.theme = self.ctx.prefs.load_theme();
        self.ctx.bus.notify(Notification::ThemeChanged(self.theme));

        match self.navigation.init(self.ctx.source.as_ref()).await {
            Ok(()) => {
                self.search = SearchIndex::new(self.navigation.get_all_articles());
                self.ctx.bus.notify(Notification::NavigationReady {
                    articles: self.search.len(),
                });
            }
            Err(e) => {
                self.ctx.bus.notify(Notification::NavigationFailed(e.to_string()));
            }
        }
    }

    /// Drain the event queue until `Shutdown` or until every sender is gone.
    pub async fn run(&mut self, rx: &mut mpsc::UnboundedReceiver<AppEvent>) {
        while let Some(event) = rx.recv().await {
            if !self.dispatch(event) {
                break;
            }
        }
        self.shutdown();
    }

    /// Tear down per-article state. Preferences are already persisted.
    pub fn shutdown(&mut self) {
        self.toc.clear();
        self.renderer.show_welcome();
        tracing::info!("App shut down");
    }

    pub fn bus(&self) -> &EventBus {
        &self.ctx.bus
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn search_panel(&self) -> &SearchPanel {
        &self.panel
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    pub fn toc(&self) -> &TableOfContents {
        &self.toc
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    /// True while an article fetch or a scroll-spy frame is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.renderer.state(), RenderState::Loading { .. }) || self.toc.frame_pending()
    }

    /// Handle one event. Returns false once the app should stop.
    pub fn dispatch(&mut self, event: AppEvent) -> bool {
        tracing::trace!(?event, "Dispatching");

        match event {
            AppEvent::HashChanged(hash) => self.handle_route(&hash),
            AppEvent::ArticleFetched(completion) => self.handle_fetched(completion),
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::SearchInput(query) => {
                self.search_focused = true;
                self.panel.input(&self.search, &query);
                self.notify_panel();
            }
            AppEvent::SearchKey(key) => {
                if key == PanelKey::Escape {
                    self.search_focused = false;
                }
                let was_open = self.panel.is_open();
                match self.panel.key(key) {
                    Some(path) => self.activate_result(&path),
                    None if was_open && !self.panel.is_open() => {
                        self.ctx.bus.notify(Notification::SearchClosed)
                    }
                    None => {}
                }
            }
            AppEvent::SearchSelect(position) => {
                if let Some(path) = self.panel.select(position) {
                    self.activate_result(&path);
                }
            }
            AppEvent::SearchFocus => {
                self.search_focused = true;
                self.panel.focus();
            }
            AppEvent::SearchBlur => {
                self.search_focused = false;
                self.panel.blur(Instant::now());
                self.schedule(BLUR_GRACE, AppEvent::Tick);
            }
            AppEvent::Tick => {
                let was_open = self.panel.is_open();
                self.panel.tick(Instant::now());
                if was_open && !self.panel.is_open() {
                    self.ctx.bus.notify(Notification::SearchClosed);
                }
            }
            AppEvent::OutsideClick => {
                self.search_focused = false;
                if self.panel.is_open() {
                    self.panel.outside_click();
                    self.ctx.bus.notify(Notification::SearchClosed);
                }
            }
            AppEvent::Scroll(y) => {
                if self.toc.on_scroll(y) {
                    self.schedule(FRAME_INTERVAL, AppEvent::AnimationFrame);
                }
            }
            AppEvent::AnimationFrame => {
                if let Some(change) = self.toc.on_frame() {
                    self.ctx.bus.notify(Notification::ActiveHeading {
                        index: change.current,
                        id: change.id,
                    });
                }
            }
            AppEvent::Layout(layout) => self.toc.set_layout(layout),
            AppEvent::ToggleMenu => {
                self.menu_open = !self.menu_open;
                self.ctx.bus.notify(Notification::MenuToggled {
                    open: self.menu_open,
                });
            }
            AppEvent::Shutdown => return false,
        }

        true
    }

    fn handle_route(&mut self, hash: &str) {
        let route = self.router.handle_route(hash).clone();
        self.navigation.update_active_state(&self.router);

        if self.menu_open {
            self.menu_open = false;
            self.ctx.bus.notify(Notification::MenuToggled { open: false });
        }

        let Some((skill, topic, article)) = route.article_slugs() else {
            self.toc.clear();
            self.renderer.show_welcome();
            self.ctx.bus.notify(Notification::Welcome);
            return;
        };

        match self.navigation.get_article_path(skill, topic, article) {
            Some(path) => self.start_fetch(path),
            None => {
                if matches!(self.navigation.status(), NavStatus::Failed(_)) {
                    tracing::warn!(route = %route.path, "Navigation unavailable, cannot resolve route");
                } else {
                    tracing::warn!(route = %route.path, "No article for route");
                }
                self.toc.clear();
                self.renderer.show_not_found(&route.path);
                self.ctx.bus.notify(Notification::RenderFailed {
                    path: route.path.clone(),
                    message: "Article not found".to_string(),
                });
            }
        }
    }

    fn start_fetch(&mut self, path: String) {
        let ticket = self.renderer.begin_load(&path);
        let source = Arc::clone(&self.ctx.source);
        let bus = self.ctx.bus.clone();

        tokio::spawn(async move {
            let result = source.fetch(&path).await;
            bus.send(AppEvent::ArticleFetched(FetchCompletion {
                ticket,
                path,
                result,
            }));
        });
    }

    fn handle_fetched(&mut self, completion: FetchCompletion) {
        let FetchCompletion {
            ticket,
            path,
            result,
        } = completion;

        if !self.renderer.is_current(ticket) {
            tracing::debug!(path = %path, "Ignoring superseded article fetch");
            return;
        }

        let failure = result.as_ref().err().map(ToString::to_string);
        self.toc.clear();

        match self.renderer.complete(ticket, result) {
            Some(rendered) => {
                let title = rendered.document.title().map(str::to_string);
                let headings = self.toc.generate(rendered.document).len();
                self.ctx.bus.notify(Notification::RenderComplete {
                    path: rendered.path.to_string(),
                    title,
                    headings,
                });
            }
            None => {
                self.ctx.bus.notify(Notification::RenderFailed {
                    path,
                    message: failure.unwrap_or_default(),
                });
            }
        }
    }

    fn handle_key(&mut self, key: KeyPress) {
        // The search box counts as a form field while it has focus.
        if key.in_form_field || self.search_focused {
            tracing::trace!(key = %key.key, "Shortcut suppressed while typing");
            return;
        }

        match key.key {
            '/' => {
                self.search_focused = true;
                self.ctx.bus.notify(Notification::FocusSearch);
            }
            't' | 'T' => {
                self.theme = self.theme.toggle();
                if let Err(e) = self.ctx.prefs.save_theme(self.theme) {
                    tracing::warn!("Failed to save theme: {}", e);
                }
                self.ctx.bus.notify(Notification::ThemeChanged(self.theme));
            }
            'b' | 'B' => {
                self.sidebar_visible = !self.sidebar_visible;
                self.ctx.bus.notify(Notification::SidebarToggled {
                    visible: self.sidebar_visible,
                });
            }
            _ => {}
        }
    }

    fn activate_result(&mut self, path: &str) {
        self.search_focused = false;
        self.ctx.bus.notify(Notification::SearchClosed);
        self.router.navigate(path);
    }

    fn notify_panel(&self) {
        if self.panel.is_open() {
            self.ctx.bus.notify(Notification::SearchResults {
                query: self.panel.query().to_string(),
                count: self.panel.results().len(),
            });
        } else {
            self.ctx.bus.notify(Notification::SearchClosed);
        }
    }

    /// Post `event` back to the queue after `delay`.
    fn schedule(&self, delay: Duration, event: AppEvent) {
        let bus = self.ctx.bus.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            bus.send(event);
        });
    }
}
