//! One module per admin route. Each view owns its local UI state and
//! renders to text.

pub mod categories;
pub mod customers;
pub mod orders;
pub mod overview;
pub mod products;
pub mod render;

pub use categories::CategoriesView;
pub use customers::CustomersView;
pub use orders::OrdersView;
pub use overview::OverviewView;
pub use products::ProductsView;

use tracing::{error, info, instrument};

use crate::domain::Record;
use crate::source::{fetch_records, DataSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Refreshed(usize),
    /// The fetch failed and the previous records were kept.
    Stale,
}

/// Records behind a list view plus its loading flag.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub records: Vec<T>,
    pub loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
        }
    }
}

impl<T: Record> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stale-if-error load: a failed fetch is logged and leaves the current
    /// records in place. The loading flag clears either way.
    #[instrument(skip(self, source, query), fields(kind = T::KIND))]
    pub async fn load(&mut self, source: &dyn DataSource, query: &str) -> LoadOutcome {
        let outcome = match fetch_records::<T>(source, query).await {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                info!(count, "Records loaded");
                LoadOutcome::Refreshed(count)
            }
            Err(e) => {
                error!(error = %e, kept = self.records.len(), "Error fetching records");
                LoadOutcome::Stale
            }
        };
        self.loading = false;
        outcome
    }
}
