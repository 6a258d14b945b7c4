//! The shared product feed: one writer fills it at startup, every view
//! reads from it through a cloned [`ProductFeedClient`].

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::domain::Product;
use crate::error::FeedError;
use crate::messages::{FeedRequest, ProductSnapshot, ServiceResponse};

pub struct ProductFeedService {
    receiver: mpsc::Receiver<FeedRequest>,
    publisher: watch::Sender<ProductSnapshot>,
    initialized: bool,
}

impl ProductFeedService {
    pub fn new(buffer_size: usize) -> (Self, ProductFeedClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, _) = watch::channel(Arc::new(Vec::new()));
        let service = Self {
            receiver,
            publisher,
            initialized: false,
        };
        (service, ProductFeedClient::new(sender))
    }

    #[instrument(name = "product_feed", skip(self))]
    pub async fn run(mut self) {
        info!("ProductFeedService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                FeedRequest::Initialize {
                    products,
                    respond_to,
                } => {
                    self.handle_initialize(products, respond_to);
                }
                FeedRequest::GetProducts { respond_to } => {
                    let _ = respond_to.send(Ok(self.publisher.borrow().clone()));
                }
                FeedRequest::Subscribe { respond_to } => {
                    debug!("New feed subscriber");
                    let _ = respond_to.send(Ok(self.publisher.subscribe()));
                }
                FeedRequest::Shutdown => {
                    info!("ProductFeedService shutting down");
                    break;
                }
            }
        }

        info!("ProductFeedService stopped");
    }

    #[instrument(fields(product_count = products.len()), skip(self, products, respond_to))]
    fn handle_initialize(
        &mut self,
        products: Vec<Product>,
        respond_to: ServiceResponse<usize, FeedError>,
    ) {
        if self.initialized {
            warn!("Rejecting second initialization");
            let _ = respond_to.send(Err(FeedError::AlreadyInitialized));
            return;
        }

        let count = products.len();
        self.initialized = true;
        self.publisher.send_replace(Arc::new(products));
        info!("Product feed initialized");
        let _ = respond_to.send(Ok(count));
    }
}

/// Read handle to the product feed, injected into each view.
#[derive(Clone)]
pub struct ProductFeedClient {
    sender: mpsc::Sender<FeedRequest>,
}

impl ProductFeedClient {
    pub fn new(sender: mpsc::Sender<FeedRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, products), fields(product_count = products.len()))]
    pub async fn initialize(&self, products: Vec<Product>) -> Result<usize, FeedError> {
        debug!("Sending request");
        let (respond_to, response) = tokio::sync::oneshot::channel();
        self.sender
            .send(FeedRequest::Initialize {
                products,
                respond_to,
            })
            .await
            .map_err(|_| FeedError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| FeedError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), FeedError> {
        debug!("Sending shutdown request");
        self.sender
            .send(FeedRequest::Shutdown)
            .await
            .map_err(|_| FeedError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(ProductFeedClient => fn products() -> ProductSnapshot as FeedRequest::GetProducts, Error = FeedError);
client_method!(ProductFeedClient => fn subscribe() -> watch::Receiver<ProductSnapshot> as FeedRequest::Subscribe, Error = FeedError);

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> (ProductFeedClient, tokio::task::JoinHandle<()>) {
        let (service, client) = ProductFeedService::new(8);
        (client, tokio::spawn(service.run()))
    }

    #[tokio::test]
    async fn starts_empty_and_serves_initialized_products() {
        let (feed, handle) = start();
        assert!(feed.products().await.unwrap().is_empty());

        let count = feed
            .initialize(vec![
                Product::new("p1", "Chair", "chairs", 10.0, 2),
                Product::new("p2", "Table", "tables", 5.0, 4),
            ])
            .await
            .unwrap();
        assert_eq!(count, 2);

        let products = feed.products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Chair");

        feed.shutdown().await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn only_one_writer_may_initialize() {
        let (feed, _handle) = start();
        feed.initialize(vec![Product::new("p1", "Chair", "chairs", 10.0, 2)])
            .await
            .unwrap();

        let second = feed.initialize(Vec::new()).await;
        assert_eq!(second, Err(FeedError::AlreadyInitialized));
        assert_eq!(feed.products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_initialization() {
        let (feed, _handle) = start();
        let mut updates = feed.subscribe().await.unwrap();
        assert!(updates.borrow().is_empty());

        feed.initialize(vec![Product::new("p1", "Lamp", "decoration", 3.0, 1)])
            .await
            .unwrap();

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().len(), 1);
    }

    #[tokio::test]
    async fn requests_after_shutdown_fail() {
        let (feed, handle) = start();
        feed.shutdown().await.unwrap();
        handle.await.unwrap();

        let result = feed.products().await;
        assert!(matches!(result, Err(FeedError::ActorCommunicationError(_))));
    }
}
