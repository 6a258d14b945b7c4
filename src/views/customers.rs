use tracing::instrument;

use super::render::{self, Table};
use super::{ListState, LoadOutcome};
use crate::domain::Customer;
use crate::search::filter_records;
use crate::source::{queries, DataSource};

/// Customer directory (`/admin/customers`).
#[derive(Default)]
pub struct CustomersView {
    list: ListState<Customer>,
    search_text: String,
}

impl CustomersView {
    #[instrument(skip(source))]
    pub async fn mount(source: &dyn DataSource) -> Self {
        let mut view = Self::default();
        view.refresh(source).await;
        view
    }

    pub async fn refresh(&mut self, source: &dyn DataSource) -> LoadOutcome {
        self.list.load(source, queries::CUSTOMERS).await
    }

    pub fn customers(&self) -> &[Customer] {
        &self.list.records
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_text = query.into();
    }

    pub fn filtered(&self) -> Vec<&Customer> {
        filter_records(&self.list.records, &self.search_text)
    }

    pub fn render(&self) -> String {
        if self.list.loading {
            return render::loading("Customers");
        }

        let rows = self.filtered();
        if rows.is_empty() {
            return render::empty_state("No customers found", "Try adjusting your search criteria");
        }

        let mut table = Table::new(["Name", "Email", "Phone", "Address", "City"]);
        for customer in rows {
            table.row(vec![
                customer.full_name.clone(),
                customer.email.clone(),
                customer.phone_number.clone(),
                customer.address.clone(),
                customer.city.clone(),
            ]);
        }
        table.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_source::MockSource;
    use serde_json::json;

    fn source() -> MockSource {
        let source = MockSource::new();
        source.respond(
            queries::CUSTOMERS,
            json!([
                {
                    "_id": "c1",
                    "fullName": "Jane Roe",
                    "email": "john.doe@example.com",
                    "phoneNumber": "+1 555 0100",
                    "address": "1 Main St",
                    "city": "Springfield"
                },
                { "_id": "c2", "fullName": "Mary Smith", "email": "mary@example.com" }
            ]),
        );
        source
    }

    #[tokio::test]
    async fn search_matches_email_case_insensitively() {
        let mut view = CustomersView::mount(&source()).await;
        assert_eq!(view.customers().len(), 2);

        view.set_search("JOHN");
        let names: Vec<&str> = view.filtered().iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["Jane Roe"]);
    }

    #[tokio::test]
    async fn renders_table_and_empty_state() {
        let mut view = CustomersView::mount(&source()).await;
        let rendered = view.render();
        assert!(rendered.contains("Springfield"));
        assert!(rendered.contains("mary@example.com"));

        view.set_search("nobody");
        assert!(view.render().contains("No customers found"));
    }

    #[test]
    fn unloaded_view_shows_loading() {
        assert!(CustomersView::default().render().starts_with("Loading Customers"));
    }
}
