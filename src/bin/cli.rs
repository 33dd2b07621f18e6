//! CanteenApps CLI
//!
//! Command-line interface for the headless dashboard:
//! - Render the booted shell, optionally after a list of UI events
//! - Step through navigation hashes
//! - Inspect pages, stat cards and notifications
//! - Generate a default config file

use anyhow::Context;
use canteen::app::{AppContext, CanteenApp, UiEvent};
use canteen::components::StatCard;
use canteen::config::{generate_default_config, Config, UiConfig};
use canteen::navigation::PageToken;
use canteen::notification::NotificationFeed;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "canteen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless CanteenApps admin dashboard")]
#[command(long_about = "Boots the CanteenApps dashboard in memory.\nLoad fragments, navigate between pages and replay UI events from the shell.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: the usual search locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Boot the dashboard and print the result
    Render {
        /// Initial page (default: the configured default page)
        #[arg(short, long)]
        page: Option<String>,
        /// UI events to dispatch after boot, e.g. `toggle-sidebar`, `hash:menu`, `role:kasir`
        #[arg(short, long)]
        event: Vec<String>,
    },

    /// Apply location hashes in order and show the active page after each
    Navigate {
        /// Hashes such as `#menu` or `struk`
        hashes: Vec<String>,
    },

    /// List the configured pages
    Pages,

    /// Show the dashboard stat cards
    Stats,

    /// Show the notification feed
    Notifications,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };
    canteen::logging::init(&config.logging, "");

    match cli.command {
        Commands::Render { page, event } => {
            let events = event
                .iter()
                .map(|e| e.parse::<UiEvent>())
                .collect::<Result<Vec<_>, _>>()?;

            let hash = match page {
                Some(page) => PageToken::parse(&page)?.href(),
                None => config.navigation.default_token()?.href(),
            };

            let mut app = boot_instant(config, &hash).await?;
            for event in events {
                app.dispatch(event).await?;
            }
            print_session(&app, cli.format).await?;
            app.shutdown().await;
        }

        Commands::Navigate { hashes } => {
            let hash = config.navigation.default_token()?.href();
            let mut app = boot_instant(config, &hash).await?;

            let mut steps = Vec::new();
            for hash in hashes {
                app.dispatch(UiEvent::HashChange(hash.clone())).await?;
                let current = app.context().navigator.current().await;
                let active = app.context().navigator.active_pages().await;
                steps.push(serde_json::json!({
                    "hash": hash,
                    "page": current.as_ref().map(PageToken::as_str),
                    "active": active,
                }));
            }

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&steps)?),
                OutputFormat::Html => println!("{}", app.render().await),
                OutputFormat::Table => {
                    println!("{:<20} {:<15} {}", "Hash", "Page", "Active containers");
                    println!("{}", "-".repeat(60));
                    for step in &steps {
                        println!(
                            "{:<20} {:<15} {}",
                            step["hash"].as_str().unwrap_or("-"),
                            step["page"].as_str().unwrap_or("(none)"),
                            step["active"]
                                .as_array()
                                .map(|a| a
                                    .iter()
                                    .filter_map(|v| v.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", "))
                                .unwrap_or_default()
                        );
                    }
                }
            }
            app.shutdown().await;
        }

        Commands::Pages => {
            let default = config.navigation.default_token()?;
            let pages = config.navigation.page_tokens()?;

            if cli.format == OutputFormat::Json {
                let rows: Vec<_> = pages
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "token": p.as_str(),
                            "container": p.mount_id(),
                            "href": p.href(),
                            "default": *p == default,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<15} {:<20} {}", "Page", "Container", "Href");
                println!("{}", "-".repeat(45));
                for page in &pages {
                    let marker = if *page == default { " (default)" } else { "" };
                    println!(
                        "{:<15} {:<20} {}{}",
                        page.as_str(),
                        page.mount_id(),
                        page.href(),
                        marker
                    );
                }
            }
        }

        Commands::Stats => {
            let data = canteen::data::DashboardData::sample();
            let cards = StatCard::from_data(&data);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
                OutputFormat::Html => {
                    for card in &cards {
                        println!("{}", card.render());
                    }
                }
                OutputFormat::Table => {
                    println!("{:<22} {:<15} {}", "Card", "Value", "Trend");
                    println!("{}", "-".repeat(55));
                    for card in &cards {
                        println!("{:<22} {:<15} {}", card.title, card.value, card.trend);
                    }
                }
            }
        }

        Commands::Notifications => {
            let now = chrono::Utc::now();
            let feed = NotificationFeed::sample(now);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
                OutputFormat::Html => println!("{}", feed.render(now)),
                OutputFormat::Table => {
                    println!("Unread: {}", feed.unread_count());
                    println!();
                    for item in feed.items() {
                        let dot = if item.unread { "*" } else { " " };
                        println!(
                            "{} {:<25} {:<45} {}",
                            dot,
                            item.title,
                            item.message,
                            item.time_label(now)
                        );
                    }
                }
            }
        }

        Commands::Config { output } => {
            let config_content = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &config_content)?;
                println!("Config written to {:?}", path);
            } else {
                println!("{}", config_content);
            }
        }
    }

    Ok(())
}

/// Boot a session with every UI delay removed
async fn boot_instant(config: Config, hash: &str) -> anyhow::Result<CanteenApp> {
    let source = config.assets.fragment_source()?;
    let shell = config.assets.shell_html();
    let config = Config {
        ui: UiConfig::instant(),
        ..config
    };

    let ctx = AppContext::new(config, &shell, source)?;
    let mut app = CanteenApp::new(ctx);
    app.boot(hash).await?;
    Ok(app)
}

async fn print_session(app: &CanteenApp, format: OutputFormat) -> anyhow::Result<()> {
    let ctx = app.context();
    let page = ctx.navigator.current().await;
    let toasts = ctx.toasts.messages().await;
    let components: Vec<_> = app
        .registry()
        .names()
        .into_iter()
        .map(|name| (name.to_string(), app.registry().state(name)))
        .collect();

    match format {
        OutputFormat::Html => println!("{}", app.render().await),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "page": page.as_ref().map(PageToken::as_str),
                "location": ctx.navigator.location().await,
                "active": ctx.navigator.active_pages().await,
                "components": components,
                "toasts": toasts,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!("CanteenApps v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!(
                "Page: {}",
                page.as_ref().map(PageToken::as_str).unwrap_or("(none)")
            );
            println!("Location: {}", ctx.navigator.location().await);
            println!();
            println!("Components:");
            for (name, state) in &components {
                let state = state
                    .map(|s| format!("{:?}", s))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<15} {}", name, state);
            }
            println!();
            println!("Toasts:");
            for message in &toasts {
                println!("  {}", message);
            }
        }
    }
    Ok(())
}
