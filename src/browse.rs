//! Line-driven terminal session over the [`App`].
//!
//! Each input line is a command that becomes an app event; notifications
//! coming back from the app are printed as they arrive.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use skilldocs_core::document::ArticleDocument;
use skilldocs_core::search::PanelKey;
use skilldocs_core::toc::{PanelViewport, TocLayout, MAX_LEVEL};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{broadcast, mpsc};

use crate::app::App;
use crate::events::{AppEvent, KeyPress, Notification};
use crate::router::to_hash;

const HELP: &str = "\
Commands:
  go <fragment>    navigate, e.g. go #/sf/admin/user-management
  search <query>   type into the search box
  up | down        move the search cursor
  enter | esc      activate / close the search results
  pick <n>         click search result n (1-based)
  key <c>          press a shortcut key (/ t b)
  scroll <y>       scroll the article to y pixels
  menu             toggle the mobile menu
  tree             show the navigation tree
  toc              show the table of contents
  show             print the rendered article HTML
  info             manifest details
  quit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Go(String),
    Search(String),
    Panel(PanelKey),
    Pick(usize),
    Key(char),
    Scroll(f64),
    Menu,
    Tree,
    Toc,
    Show,
    Info,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        match name {
            "go" => Ok(Self::Go(arg.to_string())),
            "search" => Ok(Self::Search(arg.to_string())),
            "up" => Ok(Self::Panel(PanelKey::Up)),
            "down" => Ok(Self::Panel(PanelKey::Down)),
            "enter" => Ok(Self::Panel(PanelKey::Enter)),
            "esc" => Ok(Self::Panel(PanelKey::Escape)),
            "pick" => arg
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(|n| Self::Pick(n - 1))
                .ok_or_else(|| format!("pick needs a result number, got {:?}", arg)),
            "key" => {
                let mut chars = arg.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Key(c)),
                    _ => Err("key needs exactly one character".to_string()),
                }
            }
            "scroll" => arg
                .parse()
                .map(Self::Scroll)
                .map_err(|_| format!("scroll needs a number, got {:?}", arg)),
            "menu" => Ok(Self::Menu),
            "tree" => Ok(Self::Tree),
            "toc" => Ok(Self::Toc),
            "show" => Ok(Self::Show),
            "info" => Ok(Self::Info),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Height of one terminal row in layout units.
const ROW_HEIGHT: f64 = 24.0;

/// Rows of the table of contents visible at once.
const TOC_ROWS: f64 = 10.0;

/// Longest wait for a pending fetch or frame before giving the prompt back.
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

/// Normalise user input to a fragment: `sf/admin` and `#/sf/admin` both work.
fn fragment(arg: &str) -> String {
    if arg.starts_with('#') {
        arg.to_string()
    } else {
        to_hash(arg)
    }
}

/// Run the session until `quit` or end of input.
pub async fn run<R, W>(
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut notifications = app.bus().subscribe();
    let mut lines = input.lines();

    writeln!(out, "Type 'help' for commands.")?;
    let mut running = settle(app, rx).await;
    print_notifications(app, &mut notifications, out)?;
    out.flush()?;

    while running {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    settle(app, rx).await;
                    print_notifications(app, &mut notifications, out)?;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => running = false,
                    Ok(command) => {
                        execute(app, command, out)?;
                        running = settle(app, rx).await;
                    }
                    Err(e) => writeln!(out, "error: {}", e)?,
                }
            }
            Some(event) = rx.recv() => {
                running = app.dispatch(event);
            }
        }

        print_notifications(app, &mut notifications, out)?;
        out.flush()?;
    }

    app.shutdown();
    Ok(())
}

/// Handle queued events, then wait out any fetch or animation frame still
/// in flight so the next command sees its result.
///
/// Returns false once the app has asked to stop.
async fn settle(app: &mut App, rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> bool {
    loop {
        if let Ok(event) = rx.try_recv() {
            if !app.dispatch(event) {
                return false;
            }
            continue;
        }
        if !app.is_busy() {
            return true;
        }
        match tokio::time::timeout(SETTLE_LIMIT, rx.recv()).await {
            Ok(Some(event)) => {
                if !app.dispatch(event) {
                    return false;
                }
            }
            Ok(None) => return false,
            Err(_) => {
                tracing::warn!("Gave up waiting for pending work");
                return true;
            }
        }
    }
}

/// Positions for a terminal rendering: one row per markdown event, one row
/// per table of contents link.
fn terminal_layout(document: &ArticleDocument) -> TocLayout {
    let heading_tops: Vec<f64> = document
        .headings()
        .iter()
        .filter(|h| h.level <= MAX_LEVEL)
        .map(|h| h.position as f64 * ROW_HEIGHT)
        .collect();
    let links = (0..heading_tops.len())
        .map(|i| (i as f64 * ROW_HEIGHT, ROW_HEIGHT))
        .collect();

    TocLayout {
        heading_tops,
        links,
        panel: PanelViewport {
            scroll_top: 0.0,
            height: TOC_ROWS * ROW_HEIGHT,
        },
    }
}

fn format_generated(generated: Option<DateTime<Utc>>) -> String {
    match generated {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown".to_string(),
    }
}

fn execute<W: Write>(app: &mut App, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Go(arg) => app.bus().send(AppEvent::HashChanged(fragment(&arg))),
        Command::Search(query) => {
            app.dispatch(AppEvent::SearchInput(query));
        }
        Command::Panel(key) => {
            app.dispatch(AppEvent::SearchKey(key));
            if app.search_panel().is_open() {
                print_results(app, out)?;
            }
        }
        Command::Pick(position) => {
            app.dispatch(AppEvent::SearchSelect(position));
        }
        Command::Key(c) => {
            app.dispatch(AppEvent::Key(KeyPress::new(c)));
        }
        Command::Scroll(y) => {
            app.dispatch(AppEvent::Scroll(y));
        }
        Command::Menu => {
            app.dispatch(AppEvent::ToggleMenu);
        }
        Command::Tree => write!(out, "{}", app.navigation().render())?,
        Command::Toc => {
            let toc = app.toc();
            if toc.is_empty() {
                writeln!(out, "{}", skilldocs_core::toc::EMPTY_MESSAGE)?;
            }
            for (i, entry) in toc.entries().iter().enumerate() {
                let marker = if toc.active() == Some(i) { '>' } else { ' ' };
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                writeln!(out, "{} {}{} (#{})", marker, indent, entry.text, entry.id)?;
            }
        }
        Command::Show => write!(out, "{}", app.renderer().render_html())?,
        Command::Info => match app.navigation().manifest() {
            Some(manifest) => {
                let generated = format_generated(manifest.generated);
                writeln!(
                    out,
                    "{} skills, {} articles, generated {}",
                    manifest.skills.len(),
                    manifest.article_count(),
                    generated
                )?;
            }
            None => writeln!(out, "No manifest loaded")?,
        },
        Command::Help => write!(out, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

fn print_results<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let panel = app.search_panel();
    if panel.shows_no_results() {
        writeln!(out, "  No results for {:?}", panel.query())?;
        return Ok(());
    }
    for (i, result) in panel.results().iter().enumerate() {
        let marker = if panel.cursor() == Some(i) { '>' } else { ' ' };
        writeln!(
            out,
            "{} {}. {}  [{} / {}]",
            marker,
            i + 1,
            result.article.title,
            result.article.skill,
            result.article.topic
        )?;
    }
    Ok(())
}

fn print_notifications<W: Write>(
    app: &mut App,
    notifications: &mut broadcast::Receiver<Notification>,
    out: &mut W,
) -> Result<()> {
    loop {
        match notifications.try_recv() {
            Ok(notification) => {
                if matches!(notification, Notification::RenderComplete { .. }) {
                    if let Some(layout) = app.renderer().document().map(terminal_layout) {
                        app.dispatch(AppEvent::Layout(layout));
                    }
                }
                describe(app, &notification, out)?;
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed notifications");
            }
            Err(_) => return Ok(()),
        }
    }
}

fn describe<W: Write>(app: &App, notification: &Notification, out: &mut W) -> Result<()> {
    match notification {
        Notification::RouteChanged(route) => writeln!(out, "-> #/{}", route.path)?,
        Notification::NavigationReady { articles } => {
            writeln!(out, "Loaded {} articles", articles)?
        }
        Notification::NavigationFailed(message) => {
            writeln!(out, "Navigation unavailable: {}", message)?
        }
        Notification::Welcome => writeln!(out, "Welcome. Pick an article with 'go' or 'search'.")?,
        Notification::RenderComplete {
            path,
            title,
            headings,
        } => writeln!(
            out,
            "Rendered {} ({}), {} headings",
            title.as_deref().unwrap_or("untitled"),
            path,
            headings
        )?,
        Notification::RenderFailed { path, message } => {
            writeln!(out, "Article not found: {} ({})", path, message)?
        }
        Notification::ActiveHeading { id, .. } => writeln!(out, "Reading #{}", id)?,
        Notification::SearchResults { .. } => print_results(app, out)?,
        Notification::SearchClosed => {}
        Notification::FocusSearch => writeln!(out, "Search focused")?,
        Notification::ThemeChanged(theme) => writeln!(out, "Theme: {}", theme.as_str())?,
        Notification::SidebarToggled { visible } => {
            writeln!(out, "Sidebar {}", if *visible { "shown" } else { "hidden" })?
        }
        Notification::MenuToggled { open } => {
            writeln!(out, "Menu {}", if *open { "open" } else { "closed" })?
        }
    }
    Ok(())
}
