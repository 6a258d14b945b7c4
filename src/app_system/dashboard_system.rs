use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::config::SearchSettings;
use crate::domain::Product;
use crate::error::FeedError;
use crate::feed::{ProductFeedClient, ProductFeedService};
use crate::search::SearchClient;
use crate::source::{fetch_records, queries, DataSource};

const FEED_BUFFER: usize = 32;

/// The running dashboard: the data source, the shared product feed and any
/// search boxes opened against it.
///
/// Startup loads the product list once and publishes it through the feed.
/// Views receive the feed client instead of fetching products themselves.
pub struct DashboardSystem {
    pub source: Arc<dyn DataSource>,
    pub feed: ProductFeedClient,
    search_settings: SearchSettings,
    searches: Vec<SearchClient>,
    handles: Vec<JoinHandle<()>>,
}

impl DashboardSystem {
    #[instrument(name = "dashboard_start", skip(source))]
    pub async fn start(
        source: Arc<dyn DataSource>,
        search_settings: SearchSettings,
    ) -> Result<Self, FeedError> {
        let (feed_service, feed) = ProductFeedService::new(FEED_BUFFER);
        let feed_handle = tokio::spawn(feed_service.run());

        let system = Self {
            source,
            feed,
            search_settings,
            searches: Vec::new(),
            handles: vec![feed_handle],
        };
        system.load_products().await?;
        Ok(system)
    }

    /// A failed product fetch leaves the feed empty and uninitialized; the
    /// product views then render their empty states.
    async fn load_products(&self) -> Result<(), FeedError> {
        match fetch_records::<Product>(self.source.as_ref(), queries::PRODUCTS).await {
            Ok(products) => {
                let count = self.feed.initialize(products).await?;
                info!(product_count = count, "Product feed ready");
            }
            Err(e) => error!(error = %e, "Error fetching products"),
        }
        Ok(())
    }

    pub fn search_settings(&self) -> SearchSettings {
        self.search_settings
    }

    /// Start a search box that lives until the system shuts down.
    pub fn open_search(&mut self) -> SearchClient {
        let (client, handle) = SearchClient::spawn(self.search_settings);
        self.searches.push(client.clone());
        self.handles.push(handle);
        client
    }

    pub async fn shutdown(self) -> Result<(), FeedError> {
        info!("Shutting down dashboard...");

        for search in &self.searches {
            if let Err(e) = search.shutdown().await {
                warn!(error = %e, "Search service already stopped");
            }
        }
        self.feed.shutdown().await?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(FeedError::ActorCommunicationError(format!(
                    "Service task failed: {e}"
                )));
            }
        }

        info!("Dashboard shutdown complete.");
        Ok(())
    }
}
