use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use client_core::{
    page_window, CatalogClient, CollectionSource, HttpCollection, RemoteCollectionController,
    ToastIntent, ToastQueue,
};
use serde::Serialize;
use shared::protocol::PartialQuery;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings, DEFAULT_CONFIG_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Collection {
    Aesthetics,
    Updates,
    Team,
    InvitedUsers,
}

#[derive(Parser, Debug)]
#[command(about = "Browse a paginated catalog collection")]
struct Args {
    #[arg(value_enum)]
    collection: Collection,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// 0-based page to open after sorting.
    #[arg(long, default_value_t = 0)]
    page: u32,
    /// Column to sort by; repeat to flip direction.
    #[arg(long = "sort")]
    sort: Vec<String>,
    /// Extra endpoint filter as KEY=VALUE.
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    settings.validate()?;

    let client = CatalogClient::with_timeout(&settings.server_url, settings.request_timeout())
        .context("failed to build catalog client")?;
    info!(server_url = %client.server_url(), collection = ?args.collection, "browsing catalog");

    match args.collection {
        Collection::Aesthetics => {
            browse(with_filters(client.aesthetics()?, &args), &args, &settings).await
        }
        Collection::Updates => {
            browse(with_filters(client.updates()?, &args), &args, &settings).await
        }
        Collection::Team => browse(with_filters(client.team()?, &args), &args, &settings).await,
        Collection::InvitedUsers => {
            browse(with_filters(client.invited_users()?, &args), &args, &settings).await
        }
    }
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn with_filters<T>(collection: HttpCollection<T>, args: &Args) -> HttpCollection<T> {
    args.filters
        .iter()
        .fold(collection, |collection, (key, value)| {
            collection.with_filter(key, value)
        })
}

async fn browse<T, S>(source: S, args: &Args, settings: &Settings) -> Result<()>
where
    T: Serialize + Clone,
    S: CollectionSource<T>,
{
    let toasts = Arc::new(ToastQueue::default());
    let controller = RemoteCollectionController::new(source, toasts.clone());

    controller.fetch(PartialQuery::default()).await;
    for field in &args.sort {
        controller.toggle_sort(field).await;
    }
    if args.page != 0 {
        controller.go_to_page(args.page).await;
    }

    for toast in toasts.drain() {
        let label = match toast.intent {
            ToastIntent::Success => "ok",
            ToastIntent::Warning => "warning",
            ToastIntent::Danger => "error",
        };
        eprintln!("[{label}] {}", toast.message);
    }

    let state = controller.snapshot();
    let Some(items) = &state.items else {
        bail!("{:?} could not be loaded", args.collection);
    };

    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    if let Some(field) = &state.sort_field {
        println!(
            "sorted by {field} ({})",
            controller.sort_indicator(field).as_str()
        );
    }
    println!(
        "pages: {}",
        render_page_window(
            &page_window(state.total_pages, state.current_page, settings.page_window),
            state.current_page,
        )
    );
    Ok(())
}

/// Renders 0-based page links 1-based, bracketing the current page.
fn render_page_window(window: &[Option<u32>], current_page: u32) -> String {
    if window.is_empty() {
        return "none".to_string();
    }
    window
        .iter()
        .map(|page| match page {
            Some(page) if *page == current_page => format!("[{}]", page + 1),
            Some(page) => (page + 1).to_string(),
            None => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_window_one_based_with_current_marked() {
        let window = page_window(10, 5, 1);
        assert_eq!(render_page_window(&window, 5), "1 … 5 [6] 7 … 10");
        assert_eq!(render_page_window(&[], 0), "none");
    }

    #[test]
    fn log_filter_honours_rust_log_and_defaults_to_info() {
        std::env::set_var("RUST_LOG", "client_core=debug");
        assert_eq!(log_filter().to_string(), "client_core=debug");

        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter().to_string(), "info");
    }

    #[test]
    fn parses_key_value_filters() {
        assert_eq!(
            parse_filter("role=EDITOR"),
            Ok(("role".to_string(), "EDITOR".to_string()))
        );
        assert_eq!(
            parse_filter("q=a=b"),
            Ok(("q".to_string(), "a=b".to_string()))
        );
        assert!(parse_filter("=x").is_err());
        assert!(parse_filter("role").is_err());
    }

    #[test]
    fn repeated_sort_flags_are_collected_in_order() {
        let args = Args::try_parse_from([
            "catalog_cli",
            "invited-users",
            "--sort",
            "email",
            "--sort",
            "email",
            "--page",
            "2",
        ])
        .expect("args");
        assert_eq!(args.collection, Collection::InvitedUsers);
        assert_eq!(args.sort, vec!["email", "email"]);
        assert_eq!(args.page, 2);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }
}
