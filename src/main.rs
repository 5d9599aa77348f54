use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skilldocs::{
    api,
    app::{App, AppContext},
    browse,
    config::SiteConfig,
    prefs::PreferenceStore,
    routing::parse_hash,
};

#[derive(Parser)]
#[command(name = "skilldocs")]
#[command(about = "Browse and serve a skills documentation site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site and the preview API
    Serve {
        /// Site root holding manifest.json and content/
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Browse the site interactively in the terminal
    Browse {
        /// Site root holding manifest.json and content/
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Fetch the site over HTTP instead of from disk
        #[arg(short, long)]
        url: Option<String>,

        /// Fragment to open first, e.g. #/sf/admin/user-management
        #[arg(long)]
        hash: Option<String>,
    },
    /// Search article titles, skills and topics
    Search {
        query: String,

        #[arg(short, long)]
        site: Option<PathBuf>,
    },
    /// Print the content path a fragment resolves to
    Resolve {
        hash: String,

        #[arg(short, long)]
        site: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for browse mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "skilldocs=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Browse mode: keep stdout for the session itself
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: SiteConfig) -> anyhow::Result<()> {
    let source = config.content_source();
    tracing::info!("Loading site from {}", source.describe());

    let state = api::SiteState::load(source)
        .await
        .context("Failed to load site manifest")?;
    let site_dir = config.base_url.is_none().then(|| config.site_dir.clone());
    let app = api::create_router(state, site_dir, config.cors_origins.as_deref());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!("skilldocs listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let config = SiteConfig::from_env();

    match cli.command {
        Some(Commands::Serve { site, port }) => {
            let mut config = config.with_site(site, None);
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Browse { site, url, hash }) => {
            let config = config.with_site(site, url);
            let source = config.content_source();
            let prefs = PreferenceStore::open_default().unwrap_or_else(|e| {
                tracing::warn!("Preferences unavailable, theme will not persist: {}", e);
                PreferenceStore::in_memory()
            });

            let (ctx, mut rx) = AppContext::new(config, source, prefs);
            let mut app = App::new(ctx);
            app.init().await;
            app.bus()
                .send(skilldocs::events::AppEvent::HashChanged(hash.unwrap_or_default()));

            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            browse::run(&mut app, &mut rx, stdin, &mut stdout).await?;
        }
        Some(Commands::Search { query, site }) => {
            let config = config.with_site(site, None);
            let state = api::SiteState::load(config.content_source())
                .await
                .context("Failed to load site manifest")?;
            let results = state.search().search(&query);
            if results.is_empty() {
                println!("No results for {:?}", query);
            }
            for result in results {
                println!(
                    "{:>3}  {}  #/{}",
                    result.score,
                    result.article.title,
                    result.article.route_path()
                );
            }
        }
        Some(Commands::Resolve { hash, site }) => {
            let config = config.with_site(site, None);
            let state = api::SiteState::load(config.content_source())
                .await
                .context("Failed to load site manifest")?;
            let route = parse_hash(&hash);
            match route
                .article_slugs()
                .and_then(|(s, t, a)| state.tree().get_article_path(s, t, a))
            {
                Some(path) => println!("{}", path),
                None => anyhow::bail!("No article for #/{}", route.path),
            }
        }
        None => {
            // Default: start server
            serve(config).await?;
        }
    }

    Ok(())
}
