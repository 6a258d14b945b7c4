use std::sync::Arc;
use tokio::sync::{oneshot, watch};

use crate::domain::Product;
use crate::error::{FeedError, SearchError};
use crate::search::{SearchEntry, SearchSnapshot};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Current contents of the shared product feed.
pub type ProductSnapshot = Arc<Vec<Product>>;

/// Typed message enums for actor communication. Each variant includes parameters
/// and a oneshot channel for responses.

#[derive(Debug)]
pub enum FeedRequest {
    Initialize {
        products: Vec<Product>,
        respond_to: ServiceResponse<usize, FeedError>,
    },
    GetProducts {
        respond_to: ServiceResponse<ProductSnapshot, FeedError>,
    },
    Subscribe {
        respond_to: ServiceResponse<watch::Receiver<ProductSnapshot>, FeedError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum SearchRequest {
    SetCandidates {
        entries: Vec<SearchEntry>,
        respond_to: ServiceResponse<(), SearchError>,
    },
    SetQuery {
        query: String,
        respond_to: ServiceResponse<Vec<usize>, SearchError>,
    },
    Focus {
        respond_to: ServiceResponse<(), SearchError>,
    },
    Blur {
        respond_to: ServiceResponse<(), SearchError>,
    },
    Select {
        position: usize,
        respond_to: ServiceResponse<String, SearchError>,
    },
    Snapshot {
        respond_to: ServiceResponse<SearchSnapshot, SearchError>,
    },
    /// Posted by the debounce timer once the query has been quiet.
    Recompute { generation: u64 },
    /// Posted by the blur grace timer.
    HideSuggestions { generation: u64 },
    Shutdown,
}
