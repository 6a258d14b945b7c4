use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::{highlight, matching_indices, ScheduledTask, SearchEntry, SearchSnapshot, Suggestion};
use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::messages::{SearchRequest, ServiceResponse};

/// Owns the state of one search box: the query, the immediate results, and
/// the debounced suggestion list.
///
/// Results follow every keystroke. Suggestions only follow once the query
/// has been quiet for the debounce interval. Timers post messages back to
/// this actor through a weak sender, so an abandoned search box shuts down
/// when its last client is dropped.
pub struct SearchService {
    receiver: mpsc::Receiver<SearchRequest>,
    mailbox: mpsc::WeakSender<SearchRequest>,
    settings: SearchSettings,
    entries: Vec<SearchEntry>,
    query: String,
    results: Vec<usize>,
    suggestions: Vec<usize>,
    suggestions_visible: bool,
    query_generation: u64,
    blur_generation: u64,
    debounce: ScheduledTask,
    blur_grace: ScheduledTask,
}

impl SearchService {
    pub fn new(buffer_size: usize, settings: SearchSettings) -> (Self, SearchClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            mailbox: sender.downgrade(),
            settings,
            entries: Vec::new(),
            query: String::new(),
            results: Vec::new(),
            suggestions: Vec::new(),
            suggestions_visible: false,
            query_generation: 0,
            blur_generation: 0,
            debounce: ScheduledTask::new(),
            blur_grace: ScheduledTask::new(),
        };
        (service, SearchClient::new(sender))
    }

    #[instrument(name = "search_service", skip(self))]
    pub async fn run(mut self) {
        info!("SearchService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SearchRequest::SetCandidates {
                    entries,
                    respond_to,
                } => {
                    self.handle_set_candidates(entries, respond_to);
                }
                SearchRequest::SetQuery { query, respond_to } => {
                    self.handle_set_query(query, respond_to);
                }
                SearchRequest::Focus { respond_to } => {
                    self.handle_focus(respond_to);
                }
                SearchRequest::Blur { respond_to } => {
                    self.handle_blur(respond_to);
                }
                SearchRequest::Select {
                    position,
                    respond_to,
                } => {
                    self.handle_select(position, respond_to);
                }
                SearchRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.snapshot()));
                }
                SearchRequest::Recompute { generation } => {
                    self.handle_recompute(generation);
                }
                SearchRequest::HideSuggestions { generation } => {
                    if generation == self.blur_generation {
                        debug!("Blur grace elapsed, hiding suggestions");
                        self.suggestions_visible = false;
                    }
                }
                SearchRequest::Shutdown => {
                    info!("SearchService shutting down");
                    break;
                }
            }
        }

        info!("SearchService stopped");
    }

    #[instrument(fields(candidate_count = entries.len()), skip(self, entries, respond_to))]
    fn handle_set_candidates(
        &mut self,
        entries: Vec<SearchEntry>,
        respond_to: ServiceResponse<(), SearchError>,
    ) {
        self.entries = entries;
        self.results = matching_indices(&self.entries, &self.query);
        // Old suggestion indices point into the previous candidate list.
        self.suggestions.clear();
        if !self.query.is_empty() && !self.debounce.is_pending() {
            self.schedule_recompute();
        }
        debug!(result_count = self.results.len(), "Candidates replaced");
        let _ = respond_to.send(Ok(()));
    }

    /// Immediate path: results are recomputed here, suggestions are only
    /// scheduled.
    #[instrument(fields(query = %query), skip(self, query, respond_to))]
    fn handle_set_query(&mut self, query: String, respond_to: ServiceResponse<Vec<usize>, SearchError>) {
        self.query = query;
        self.results = matching_indices(&self.entries, &self.query);
        self.query_generation += 1;

        if self.query.is_empty() {
            self.debounce.cancel();
            self.suggestions.clear();
            self.suggestions_visible = false;
        } else {
            self.schedule_recompute();
        }

        debug!(result_count = self.results.len(), "Results updated");
        let _ = respond_to.send(Ok(self.results.clone()));
    }

    /// Publish suggestions for the current query once it has been quiet for
    /// the debounce interval.
    fn schedule_recompute(&mut self) {
        let generation = self.query_generation;
        let mailbox = self.mailbox.clone();
        self.debounce.schedule(self.settings.debounce, async move {
            if let Some(sender) = mailbox.upgrade() {
                let _ = sender.send(SearchRequest::Recompute { generation }).await;
            }
        });
    }

    #[instrument(skip(self))]
    fn handle_recompute(&mut self, generation: u64) {
        if generation != self.query_generation {
            debug!(current = self.query_generation, "Ignoring stale recompute");
            return;
        }
        self.suggestions = matching_indices(&self.entries, &self.query);
        self.suggestions_visible = true;
        debug!(suggestion_count = self.suggestions.len(), "Suggestions recomputed");
    }

    fn handle_focus(&mut self, respond_to: ServiceResponse<(), SearchError>) {
        self.blur_generation += 1;
        self.blur_grace.cancel();
        self.suggestions_visible = !self.query.is_empty();
        let _ = respond_to.send(Ok(()));
    }

    /// Hiding waits for the grace period so a pointer selection made while
    /// the box is losing focus still lands on a visible list.
    fn handle_blur(&mut self, respond_to: ServiceResponse<(), SearchError>) {
        self.blur_generation += 1;
        let generation = self.blur_generation;
        let mailbox = self.mailbox.clone();
        self.blur_grace.schedule(self.settings.blur_grace, async move {
            if let Some(sender) = mailbox.upgrade() {
                let _ = sender.send(SearchRequest::HideSuggestions { generation }).await;
            }
        });
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_select(&mut self, position: usize, respond_to: ServiceResponse<String, SearchError>) {
        let selected = self
            .suggestions
            .get(position)
            .and_then(|&index| self.entries.get(index))
            .map(|entry| entry.display.clone());
        let Some(display) = selected else {
            debug!(suggestion_count = self.suggestions.len(), "Selection out of range");
            let _ = respond_to.send(Err(SearchError::NoSuchSuggestion(position)));
            return;
        };

        self.query = display;
        self.query_generation += 1;
        self.debounce.cancel();
        self.results = matching_indices(&self.entries, &self.query);
        self.suggestions = self.results.clone();

        self.blur_generation += 1;
        self.blur_grace.cancel();
        self.suggestions_visible = false;

        info!(selected = %self.query, "Suggestion selected");
        let _ = respond_to.send(Ok(self.query.clone()));
    }

    fn snapshot(&self) -> SearchSnapshot {
        let suggestions = self
            .suggestions
            .iter()
            .filter_map(|&index| {
                self.entries.get(index).map(|entry| Suggestion {
                    index,
                    display: entry.display.clone(),
                    segments: highlight(&entry.display, &self.query),
                })
            })
            .collect();

        SearchSnapshot {
            query: self.query.clone(),
            results: self.results.clone(),
            suggestions,
            suggestions_visible: self.suggestions_visible,
        }
    }
}

/// Handle to one search box.
#[derive(Clone)]
pub struct SearchClient {
    sender: mpsc::Sender<SearchRequest>,
}

impl SearchClient {
    pub fn new(sender: mpsc::Sender<SearchRequest>) -> Self {
        Self { sender }
    }

    /// Spawn a search service for a fresh search box.
    pub fn spawn(settings: SearchSettings) -> (Self, tokio::task::JoinHandle<()>) {
        let (service, client) = SearchService::new(64, settings);
        (client, tokio::spawn(service.run()))
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SearchError> {
        debug!("Sending shutdown request");
        self.sender
            .send(SearchRequest::Shutdown)
            .await
            .map_err(|_| SearchError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(SearchClient => fn set_candidates(entries: Vec<SearchEntry>) -> () as SearchRequest::SetCandidates, Error = SearchError);
client_method!(SearchClient => fn set_query(query: String) -> Vec<usize> as SearchRequest::SetQuery, Error = SearchError);
client_method!(SearchClient => fn focus() -> () as SearchRequest::Focus, Error = SearchError);
client_method!(SearchClient => fn blur() -> () as SearchRequest::Blur, Error = SearchError);
client_method!(SearchClient => fn select(position: usize) -> String as SearchRequest::Select, Error = SearchError);
client_method!(SearchClient => fn snapshot() -> SearchSnapshot as SearchRequest::Snapshot, Error = SearchError);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;
    use std::time::Duration;

    fn customers() -> Vec<Customer> {
        vec![
            Customer::new("c1", "John Doe", "john.doe@example.com"),
            Customer::new("c2", "Mary Smith", "mary@example.com"),
            Customer::new("c3", "Johnny Cash", "cash@example.org"),
        ]
    }

    async fn start() -> SearchClient {
        let (client, _handle) = SearchClient::spawn(SearchSettings::default());
        client
            .set_candidates(SearchEntry::from_records(&customers()))
            .await
            .unwrap();
        client
    }

    async fn settle(duration_ms: u64) {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn results_follow_every_keystroke() {
        let search = start().await;

        assert_eq!(search.set_query("j".into()).await.unwrap(), vec![0, 2]);
        assert_eq!(search.set_query("jo".into()).await.unwrap(), vec![0, 2]);
        assert_eq!(search.set_query("JOHN.".into()).await.unwrap(), vec![0]);

        let snapshot = search.snapshot().await.unwrap();
        assert_eq!(snapshot.results, vec![0]);
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestions_wait_for_quiet_period() {
        let search = start().await;

        search.set_query("mar".into()).await.unwrap();
        settle(200).await;
        search.set_query("mary".into()).await.unwrap();
        settle(200).await;
        assert!(search.snapshot().await.unwrap().suggestions.is_empty());

        settle(150).await;
        let snapshot = search.snapshot().await.unwrap();
        assert!(snapshot.suggestions_visible);
        assert_eq!(snapshot.suggestions.len(), 1);
        assert_eq!(snapshot.suggestions[0].display, "Mary Smith");
        assert!(snapshot.suggestions[0].segments[0].matched);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestions_are_a_subset_of_results() {
        let search = start().await;

        for query in ["j", "jo", "joh", "john", "example"] {
            search.set_query(query.into()).await.unwrap();
            settle(350).await;
            let snapshot = search.snapshot().await.unwrap();
            for suggestion in &snapshot.suggestions {
                assert!(snapshot.results.contains(&suggestion.index), "query {query}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_query_hides_suggestions_immediately() {
        let search = start().await;
        search.set_query("john".into()).await.unwrap();
        settle(350).await;
        assert!(search.snapshot().await.unwrap().suggestions_visible);

        let results = search.set_query(String::new()).await.unwrap();
        assert_eq!(results, vec![0, 1, 2]);
        let snapshot = search.snapshot().await.unwrap();
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn blur_hides_after_grace_and_focus_cancels_it() {
        let search = start().await;
        search.set_query("john".into()).await.unwrap();
        settle(350).await;

        search.blur().await.unwrap();
        settle(100).await;
        assert!(search.snapshot().await.unwrap().suggestions_visible);
        search.focus().await.unwrap();
        settle(300).await;
        assert!(search.snapshot().await.unwrap().suggestions_visible);

        search.blur().await.unwrap();
        settle(250).await;
        assert!(!search.snapshot().await.unwrap().suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_replaces_query_and_hides() {
        let search = start().await;
        search.focus().await.unwrap();
        search.set_query("john".into()).await.unwrap();
        settle(350).await;

        search.blur().await.unwrap();
        let chosen = search.select(1).await.unwrap();
        assert_eq!(chosen, "Johnny Cash");

        let snapshot = search.snapshot().await.unwrap();
        assert_eq!(snapshot.query, "Johnny Cash");
        assert_eq!(snapshot.results, vec![2]);
        assert!(!snapshot.suggestions_visible);

        assert_eq!(
            search.select(5).await,
            Err(SearchError::NoSuchSuggestion(5))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn focus_with_empty_query_keeps_suggestions_hidden() {
        let search = start().await;
        search.focus().await.unwrap();
        assert!(!search.snapshot().await.unwrap().suggestions_visible);

        search.set_query("mary".into()).await.unwrap();
        settle(350).await;
        search.set_query(String::new()).await.unwrap();
        search.blur().await.unwrap();
        search.focus().await.unwrap();
        assert!(!search.snapshot().await.unwrap().suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn new_candidates_wait_for_the_debounce() {
        let search = start().await;
        search.set_query("john".into()).await.unwrap();
        settle(100).await;

        let fresh = vec![
            Customer::new("c4", "John Smith", "js@example.com"),
            Customer::new("c5", "Ada King", "ada@example.com"),
        ];
        search
            .set_candidates(SearchEntry::from_records(&fresh))
            .await
            .unwrap();
        let snapshot = search.snapshot().await.unwrap();
        assert_eq!(snapshot.results, vec![0]);
        assert!(snapshot.suggestions.is_empty());

        settle(250).await;
        let snapshot = search.snapshot().await.unwrap();
        assert_eq!(snapshot.suggestions.len(), 1);
        assert_eq!(snapshot.suggestions[0].display, "John Smith");
    }

    #[tokio::test(start_paused = true)]
    async fn replacing_candidates_after_suggestions_recomputes_later() {
        let search = start().await;
        search.set_query("john".into()).await.unwrap();
        settle(350).await;
        assert_eq!(search.snapshot().await.unwrap().suggestions.len(), 2);

        let fresh = vec![Customer::new("c4", "John Smith", "js@example.com")];
        search
            .set_candidates(SearchEntry::from_records(&fresh))
            .await
            .unwrap();
        assert!(search.snapshot().await.unwrap().suggestions.is_empty());

        settle(350).await;
        let snapshot = search.snapshot().await.unwrap();
        assert_eq!(snapshot.suggestions.len(), 1);
        assert_eq!(snapshot.suggestions[0].index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn service_stops_when_clients_are_dropped() {
        let (client, handle) = SearchClient::spawn(SearchSettings::default());
        client.set_query("pending timer".into()).await.unwrap();
        drop(client);
        handle.await.unwrap();
    }
}
