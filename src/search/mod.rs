//! Case-insensitive substring search shared by every list view, plus the
//! debounced suggestion service built on top of it.

pub mod highlight;
pub mod scheduler;
pub mod service;

pub use highlight::{highlight, Segment};
pub use scheduler::ScheduledTask;
pub use service::SearchClient;

use crate::domain::{Customer, Order, Product};

/// A record that exposes text fields for searching and a canonical value to
/// put in the search box when it is picked from the suggestions.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
    fn display_value(&self) -> &str;
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category_name.as_str()]
    }

    fn display_value(&self) -> &str {
        &self.name
    }
}

impl Searchable for Order {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.order_id.as_str(), self.customer_name()]
    }

    fn display_value(&self) -> &str {
        &self.order_id
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.full_name.as_str(), self.email.as_str()]
    }

    fn display_value(&self) -> &str {
        &self.full_name
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// OR across fields: a record matches when any field contains the query.
pub fn matches<T: Searchable + ?Sized>(record: &T, query: &str) -> bool {
    record
        .search_fields()
        .into_iter()
        .any(|field| contains_ignore_case(field, query))
}

/// The immediate result set behind the main table. An empty query keeps
/// every record.
pub fn filter_records<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    records.iter().filter(|record| matches(*record, query)).collect()
}

/// Type-erased copy of a record's searchable text, handed to the
/// suggestion service so it never touches the record list itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    lowered_fields: Vec<String>,
    pub display: String,
}

impl SearchEntry {
    pub fn from_record<T: Searchable + ?Sized>(record: &T) -> Self {
        Self {
            lowered_fields: record
                .search_fields()
                .into_iter()
                .map(str::to_lowercase)
                .collect(),
            display: record.display_value().to_string(),
        }
    }

    pub fn from_records<T: Searchable>(records: &[T]) -> Vec<Self> {
        records.iter().map(Self::from_record).collect()
    }

    fn matches_lowered(&self, lowered_query: &str) -> bool {
        self.lowered_fields
            .iter()
            .any(|field| field.contains(lowered_query))
    }
}

/// Indices of the entries matching `query`, in input order.
pub fn matching_indices(entries: &[SearchEntry], query: &str) -> Vec<usize> {
    let lowered = query.to_lowercase();
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.matches_lowered(&lowered))
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Position of the record in the candidate list.
    pub index: usize,
    pub display: String,
    pub segments: Vec<Segment>,
}

/// Point-in-time view of a search box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<usize>,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_visible: bool,
}
