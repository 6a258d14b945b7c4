#[macro_use]
mod macros;

mod analytics;
mod app_system;
mod config;
mod domain;
mod error;
mod feed;
mod messages;
mod router;
mod search;
mod session;
mod source;
mod views;

#[cfg(test)]
mod mock_source;

use anyhow::{anyhow, Context};
use clap::Parser;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::app_system::{setup_tracing, DashboardSystem};
use crate::config::{Cli, Command, SearchArgs};
use crate::router::{guard, Route};
use crate::search::highlight::Highlighted;
use crate::search::SearchEntry;
use crate::session::SessionStore;
use crate::source::{CmsClient, DataSource};
use crate::views::orders::OrderSortKey;
use crate::views::{CategoriesView, CustomersView, OrdersView, OverviewView, ProductsView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing();

    let session = SessionStore::new(&cli.session_file);
    let route = match &cli.command {
        Command::Login => {
            session.log_in()?;
            println!("Logged in. Continue at {}", Route::Overview);
            return Ok(());
        }
        Command::Logout => {
            let next = session.log_out()?;
            println!("Logged out. Continue at {next}");
            return Ok(());
        }
        Command::Overview => Route::Overview,
        Command::Products(_) => Route::Products,
        Command::Orders { .. } => Route::Orders,
        Command::Customers(_) => Route::Customers,
        Command::Categories => Route::Categories,
        Command::Open { path } => {
            Route::from_path(path).ok_or_else(|| anyhow!("No view serves {path}"))?
        }
    };

    let logged_in = session.is_logged_in()?;
    let landed = guard(route, logged_in);
    if landed == Route::Login {
        if logged_in {
            println!("Already logged in. Continue at {}", Route::Overview);
        } else {
            warn!(requested = %route, "Not logged in");
            println!("Log in first: storefront_admin login");
        }
        return Ok(());
    }

    let settings = cli.cms.resolve()?;
    let client = CmsClient::new(&settings).context("Failed to build CMS client")?;
    info!(endpoint = %client.endpoint(), "Using CMS");
    let source: Arc<dyn DataSource> = Arc::new(client);

    let mut system = DashboardSystem::start(source, cli.search_settings()).await?;
    let output = render_route(&mut system, landed, &cli.command).await;
    system.shutdown().await?;

    print!("{}", output?);
    Ok(())
}

/// Render the view behind `route`, applying whatever search, filter and
/// sort options came with the subcommand.
async fn render_route(
    system: &mut DashboardSystem,
    route: Route,
    command: &Command,
) -> anyhow::Result<String> {
    let default_search = SearchArgs::default();
    let (search, status, sort) = match command {
        Command::Products(search) | Command::Customers(search) => (search, None, OrderSortKey::Date),
        Command::Orders {
            search,
            status,
            sort,
        } => (search, status.as_deref(), *sort),
        _ => (&default_search, None, OrderSortKey::Date),
    };
    let query = search.search.clone().unwrap_or_default();

    let (mut out, entries) = match route {
        Route::Login => (String::new(), Vec::new()),
        Route::Overview => {
            let view = OverviewView::mount(system.source.as_ref()).await;
            (view.render(), Vec::new())
        }
        Route::Products => {
            let mut view = ProductsView::mount(&system.feed).await;
            view.set_search(query.clone());
            (view.render(), SearchEntry::from_records(view.products()))
        }
        Route::Orders => {
            let mut view = OrdersView::mount(system.source.as_ref()).await;
            view.set_search(query.clone());
            view.set_status_filter(status.unwrap_or_default());
            view.set_sort_key(sort);
            (view.render(), SearchEntry::from_records(view.orders()))
        }
        Route::Customers => {
            let mut view = CustomersView::mount(system.source.as_ref()).await;
            view.set_search(query.clone());
            (view.render(), SearchEntry::from_records(view.customers()))
        }
        Route::Categories => {
            let view = CategoriesView::mount(&system.feed).await;
            (view.render(), Vec::new())
        }
    };

    if search.suggest && !entries.is_empty() {
        out.push_str(&suggestions(system, entries, &query).await?);
    }
    Ok(out)
}

/// Drive a search box the way a user typing `query` would, then report the
/// suggestion list once the debounce has settled.
async fn suggestions(
    system: &mut DashboardSystem,
    entries: Vec<SearchEntry>,
    query: &str,
) -> anyhow::Result<String> {
    let search = system.open_search();
    search.set_candidates(entries).await?;
    search.focus().await?;
    search.set_query(query.to_string()).await?;
    tokio::time::sleep(system.search_settings().debounce + Duration::from_millis(50)).await;
    let snapshot = search.snapshot().await?;

    let mut out = String::from("\nSuggestions:\n");
    if snapshot.suggestions.is_empty() {
        out.push_str("  (none)\n");
    }
    for suggestion in &snapshot.suggestions {
        let _ = writeln!(out, "  {}", Highlighted(&suggestion.segments));
    }
    Ok(out)
}
