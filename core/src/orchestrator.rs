//! UI-independent search state and the decision of which endpoint to call.
//!
//! # Design
//! A search is three steps so an event loop never has to hold `&mut` across
//! an await:
//!
//! 1. [`SearchOrchestrator::begin_search`] validates the current query,
//!    picks a [`SearchPlan`] and stamps it with a generation number.
//! 2. [`PendingSearch::run`] performs the network call and turns any
//!    outcome into a [`SearchResult`].
//! 3. [`SearchOrchestrator::complete`] installs that result, unless a newer
//!    search, a mode switch or [`SearchOrchestrator::detach`] made it stale.
//!
//! [`SearchOrchestrator::execute_search`] chains the three for callers that
//! search one at a time.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, info, warn};

use crate::medicine::Medicine;
use crate::service::SearchService;
use crate::transport::Transport;
use crate::types::{SearchCriteria, SearchResponse, SortOrder, SuggestionField};

/// Which field the free-text query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchMode {
    #[default]
    Name,
    Formulation,
}

impl SearchMode {
    pub fn suggestion_field(self) -> SuggestionField {
        match self {
            SearchMode::Name => SuggestionField::Name,
            SearchMode::Formulation => SuggestionField::Formulation,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SearchMode::Name => "medicine name",
            SearchMode::Formulation => "formulation",
        }
    }
}

/// User-facing states a search can end in besides plain results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchNotice {
    /// Nothing was typed into any field; no request was sent.
    MissingInput(SearchMode),
    /// The backend answered but matched nothing.
    NoResults,
    /// The request failed after retries, or the response was unusable.
    Unavailable(SearchMode),
}

impl fmt::Display for SearchNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchNotice::MissingInput(mode) => write!(
                f,
                "Please enter a {}, type or dosage to search.",
                mode.label()
            ),
            SearchNotice::NoResults => f.write_str("No medicines found matching your search."),
            SearchNotice::Unavailable(mode) => write!(
                f,
                "Could not search by {}. Please check your connection and try again.",
                mode.label()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub text: String,
    pub type_filter: String,
    pub dosage_filter: String,
    pub sort_order: SortOrder,
}

/// Endpoint choice for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// Only the type filter is set: list that type directly.
    ByType {
        medicine_type: String,
        sort_order: SortOrder,
    },
    General {
        criteria: SearchCriteria,
        sort_order: SortOrder,
    },
}

impl SearchQuery {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
            && self.type_filter.trim().is_empty()
            && self.dosage_filter.trim().is_empty()
    }

    pub fn plan(&self) -> Result<SearchPlan, SearchNotice> {
        if self.is_blank() {
            return Err(SearchNotice::MissingInput(self.mode));
        }

        let medicine_type = self.type_filter.trim();
        if !medicine_type.is_empty()
            && self.text.trim().is_empty()
            && self.dosage_filter.trim().is_empty()
        {
            return Ok(SearchPlan::ByType {
                medicine_type: medicine_type.to_string(),
                sort_order: self.sort_order,
            });
        }

        let text = Some(self.text.as_str());
        let (name, formulation) = match self.mode {
            SearchMode::Name => (text, None),
            SearchMode::Formulation => (None, text),
        };
        Ok(SearchPlan::General {
            criteria: SearchCriteria::new(
                name,
                formulation,
                Some(&self.type_filter),
                Some(&self.dosage_filter),
            ),
            sort_order: self.sort_order,
        })
    }
}

/// Outcome of the latest search. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub exact_match: Option<Medicine>,
    pub similar: Vec<Medicine>,
    pub uses: Option<String>,
    pub side_effects: Option<String>,
    pub error: Option<SearchNotice>,
}

impl SearchResult {
    fn notice(notice: SearchNotice) -> Self {
        Self {
            error: Some(notice),
            ..Self::default()
        }
    }

    /// Result of a type listing; details come from the first entry shown.
    pub fn from_listing(mut medicines: Vec<Medicine>, sort_order: SortOrder) -> Self {
        sort_by_generic_price(&mut medicines, sort_order);
        let (uses, side_effects) = match medicines.first() {
            Some(first) => (Some(first.uses.clone()), Some(first.side_effects.clone())),
            None => (None, None),
        };
        Self {
            exact_match: None,
            similar: medicines,
            uses,
            side_effects,
            error: None,
        }
        .or_no_results()
    }

    pub fn from_response(response: SearchResponse, sort_order: SortOrder) -> Self {
        let mut similar = response.similar_formulations;
        sort_by_generic_price(&mut similar, sort_order);
        Self {
            exact_match: response.exact_match,
            similar,
            uses: response.uses,
            side_effects: response.side_effects,
            error: None,
        }
        .or_no_results()
    }

    pub fn has_matches(&self) -> bool {
        self.exact_match.is_some() || !self.similar.is_empty()
    }

    fn or_no_results(self) -> Self {
        if self.has_matches() {
            self
        } else {
            Self::notice(SearchNotice::NoResults)
        }
    }
}

/// Stable sort by generic price; [`SortOrder::None`] keeps server order.
pub fn sort_by_generic_price(medicines: &mut [Medicine], sort_order: SortOrder) {
    let by_price = |a: &Medicine, b: &Medicine| {
        a.cost_of_generic
            .partial_cmp(&b.cost_of_generic)
            .unwrap_or(Ordering::Equal)
    };
    match sort_order {
        SortOrder::None => {}
        SortOrder::LowToHigh => medicines.sort_by(by_price),
        SortOrder::HighToLow => medicines.sort_by(|a, b| by_price(b, a)),
    }
}

/// A planned search detached from the orchestrator that started it.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    generation: u64,
    mode: SearchMode,
    plan: SearchPlan,
}

/// Result of a [`PendingSearch`], tagged with its generation.
#[derive(Debug, Clone)]
pub struct SearchCompletion {
    generation: u64,
    result: SearchResult,
}

impl SearchCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }
}

impl PendingSearch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// Perform the call. Never fails: client errors become
    /// [`SearchNotice::Unavailable`].
    pub async fn run<T: Transport>(self, service: &SearchService<T>) -> SearchCompletion {
        let outcome = match &self.plan {
            SearchPlan::ByType {
                medicine_type,
                sort_order,
            } => service
                .get_medicines_by_type(medicine_type, sort_order.as_param())
                .await
                .map(|listing| SearchResult::from_listing(listing, *sort_order)),
            SearchPlan::General {
                criteria,
                sort_order,
            } => service
                .search_medicines(criteria, sort_order.as_param())
                .await
                .map(|response| SearchResult::from_response(response, *sort_order)),
        };

        let result = outcome.unwrap_or_else(|err| {
            warn!(generation = self.generation, error = %err, "search failed");
            SearchResult::notice(SearchNotice::Unavailable(self.mode))
        });
        SearchCompletion {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct SearchOrchestrator<T> {
    service: SearchService<T>,
    query: SearchQuery,
    result: SearchResult,
    generation: u64,
    searching: bool,
    attached: bool,
}

impl<T: Transport> SearchOrchestrator<T> {
    pub fn new(service: SearchService<T>) -> Self {
        Self {
            service,
            query: SearchQuery::default(),
            result: SearchResult::default(),
            generation: 0,
            searching: false,
            attached: true,
        }
    }

    pub fn service(&self) -> &SearchService<T> {
        &self.service
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.query.mode
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Switch modes. Clears all text, filters and results, and orphans any
    /// search still in flight. The sort order is kept.
    pub fn set_mode(&mut self, mode: SearchMode) {
        if mode == self.query.mode {
            return;
        }
        debug!(?mode, "search mode changed");
        self.query = SearchQuery {
            sort_order: self.query.sort_order,
            ..SearchQuery::new(mode)
        };
        self.result = SearchResult::default();
        self.invalidate();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_type_filter(&mut self, medicine_type: impl Into<String>) {
        self.query.type_filter = medicine_type.into();
    }

    pub fn set_dosage_filter(&mut self, dosage: impl Into<String>) {
        self.query.dosage_filter = dosage.into();
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.query.sort_order = sort_order;
    }

    /// Stop applying completions, e.g. when the screen owning this state
    /// is torn down.
    pub fn detach(&mut self) {
        self.attached = false;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.searching = false;
    }

    /// Validate and plan a search. Returns `None` when no request should be
    /// sent; in that case the result already holds the validation notice.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        if !self.attached {
            return None;
        }
        self.invalidate();
        match self.query.plan() {
            Ok(plan) => {
                info!(generation = self.generation, mode = ?self.query.mode, ?plan, "search started");
                self.searching = true;
                Some(PendingSearch {
                    generation: self.generation,
                    mode: self.query.mode,
                    plan,
                })
            }
            Err(notice) => {
                debug!(%notice, "search rejected before sending");
                self.result = SearchResult::notice(notice);
                None
            }
        }
    }

    /// Install a completion. Returns `false` if it was stale and dropped.
    pub fn complete(&mut self, completion: SearchCompletion) -> bool {
        if !self.attached || completion.generation != self.generation {
            debug!(
                generation = completion.generation,
                current = self.generation,
                attached = self.attached,
                "dropping stale search result"
            );
            return false;
        }
        self.searching = false;
        self.result = completion.result;
        true
    }

    pub async fn execute_search(&mut self) -> &SearchResult {
        if let Some(pending) = self.begin_search() {
            let completion = pending.run(&self.service).await;
            self.complete(completion);
        }
        &self.result
    }

    /// Autocomplete values; failures are logged and yield nothing.
    pub async fn suggest(&self, field: SuggestionField, text: &str) -> Vec<String> {
        self.service
            .fetch_suggestions(field, text)
            .await
            .unwrap_or_else(|err| {
                warn!(?field, error = %err, "suggestions unavailable");
                Vec::new()
            })
    }

    /// Suggestions for the current free-text query in the current mode.
    pub async fn query_suggestions(&self) -> Vec<String> {
        self.suggest(self.query.mode.suggestion_field(), &self.query.text)
            .await
    }

    pub async fn medicine_details(&self, name: &str) -> Option<Medicine> {
        match self.service.get_medicine_details(name).await {
            Ok(medicine) => Some(medicine),
            Err(err) => {
                warn!(name, error = %err, "medicine details unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{scripted_service, ScriptedTransport, Step};
    use proptest::prelude::*;
    use serde_json::json;

    fn orchestrator(steps: Vec<Step>) -> (SearchOrchestrator<ScriptedTransport>, ScriptedTransport) {
        let (service, transport) = scripted_service(steps);
        (SearchOrchestrator::new(service), transport)
    }

    fn med(name: &str, generic: f64) -> serde_json::Value {
        json!({
            "Name": name,
            "Cost of branded": generic * 3.0,
            "Cost of generic": generic,
            "Type": "Antibiotic",
            "Uses": format!("{name} uses"),
            "Side Effects": format!("{name} side effects"),
        })
    }

    fn priced(generic: f64) -> Medicine {
        Medicine {
            cost_of_generic: generic,
            ..Medicine::default()
        }
    }

    #[tokio::test]
    async fn blank_query_sends_nothing() {
        let (mut orch, transport) = orchestrator(vec![]);
        orch.set_text("   ");
        let result = orch.execute_search().await;
        assert_eq!(result.error, Some(SearchNotice::MissingInput(SearchMode::Name)));
        assert_eq!(transport.request_count(), 0);

        orch.set_mode(SearchMode::Formulation);
        let result = orch.execute_search().await;
        assert_eq!(
            result.error.unwrap().to_string(),
            "Please enter a formulation, type or dosage to search."
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn name_search_stores_exact_match_and_sorted_similar() {
        let body = json!({
            "exact_match": med("Paracetamol", 2.0),
            "similar_formulations": [med("Calpol", 9.0), med("Dolo", 1.5), med("Crocin", 4.0)],
            "Uses": "Fever",
            "Side Effects": "Nausea",
        });
        let (mut orch, transport) = orchestrator(vec![Step::ok(&body.to_string())]);
        orch.set_text("Paracetamol");
        orch.set_sort_order(SortOrder::LowToHigh);
        let result = orch.execute_search().await.clone();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert!(sent[0].url.ends_with("/search?sort_order=low_to_high"));
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"name":"Paracetamol"}"#));

        assert_eq!(result.exact_match.unwrap().name, "Paracetamol");
        let names: Vec<_> = result.similar.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Dolo", "Crocin", "Calpol"]);
        assert_eq!(result.uses.as_deref(), Some("Fever"));
        assert_eq!(result.side_effects.as_deref(), Some("Nausea"));
        assert!(result.error.is_none());
        assert!(!orch.is_searching());
    }

    #[tokio::test]
    async fn formulation_mode_sends_formulation_with_filters() {
        let (mut orch, transport) = orchestrator(vec![Step::ok(
            r#"{"exact_match":null,"similar_formulations":[{"Name":"TAB A"}]}"#,
        )]);
        orch.set_mode(SearchMode::Formulation);
        orch.set_text("Amoxicillin");
        orch.set_type_filter(" Antibiotic ");
        orch.set_dosage_filter("250mg");
        orch.execute_search().await;

        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"formulation": "Amoxicillin", "type": "Antibiotic", "dosage": "250mg"})
        );
        assert!(!transport.requests()[0].url.contains("sort_order"));
    }

    #[tokio::test]
    async fn type_only_uses_fast_path_and_first_entry_details() {
        let body = json!([med("Azithral", 5.0), med("Amoxil", 3.0)]);
        let (mut orch, transport) = orchestrator(vec![Step::ok(&body.to_string())]);
        orch.set_type_filter("Antibiotic");
        let result = orch.execute_search().await;

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert!(sent[0].url.ends_with("/medicines/by_type?type=Antibiotic"));
        assert!(result.exact_match.is_none());
        assert_eq!(result.similar.len(), 2);
        assert_eq!(result.uses.as_deref(), Some("Azithral uses"));
        assert_eq!(result.side_effects.as_deref(), Some("Azithral side effects"));
    }

    #[tokio::test]
    async fn type_only_details_follow_generic_sort() {
        let body = json!([med("Azithral", 5.0), med("Amoxil", 3.0)]);
        let (mut orch, _) = orchestrator(vec![Step::ok(&body.to_string())]);
        orch.set_type_filter("Antibiotic");
        orch.set_sort_order(SortOrder::LowToHigh);
        let result = orch.execute_search().await;

        assert_eq!(result.similar[0].name, "Amoxil");
        assert_eq!(result.uses.as_deref(), Some("Amoxil uses"));
        assert_eq!(result.side_effects.as_deref(), Some("Amoxil side effects"));
    }

    #[tokio::test]
    async fn type_with_dosage_takes_general_path() {
        let (mut orch, transport) = orchestrator(vec![Step::ok(
            r#"{"exact_match":null,"similar_formulations":[{"Name":"TAB A"}]}"#,
        )]);
        orch.set_type_filter("Antibiotic");
        orch.set_dosage_filter("500mg");
        orch.execute_search().await;
        assert_eq!(transport.requests()[0].method, HttpMethod::Post);
    }

    #[tokio::test]
    async fn empty_response_is_no_results() {
        let (mut orch, _) = orchestrator(vec![
            Step::ok(r#"{"exact_match":null,"similar_formulations":[]}"#),
            Step::ok("[]"),
        ]);
        orch.set_text("Unobtainium");
        assert_eq!(orch.execute_search().await.error, Some(SearchNotice::NoResults));

        orch.set_text("");
        orch.set_type_filter("Nothing");
        let result = orch.execute_search().await;
        assert_eq!(result.error, Some(SearchNotice::NoResults));
        assert!(result.uses.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_clears_previous_results() {
        let (mut orch, transport) = orchestrator(vec![Step::ok(
            r#"{"exact_match":{"Name":"TAB A"},"similar_formulations":[]}"#,
        )]);
        orch.set_text("TAB A");
        assert!(orch.execute_search().await.has_matches());

        for _ in 0..3 {
            transport.push(Step::fail("network down"));
        }
        let result = orch.execute_search().await;
        assert_eq!(result.error, Some(SearchNotice::Unavailable(SearchMode::Name)));
        assert!(!result.has_matches());
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let (mut orch, transport) = orchestrator(vec![Step::status(500, r#"{"detail":"boom"}"#)]);
        orch.set_mode(SearchMode::Formulation);
        orch.set_text("Metformin");
        let result = orch.execute_search().await;
        assert_eq!(
            result.error,
            Some(SearchNotice::Unavailable(SearchMode::Formulation))
        );
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn mode_switch_resets_everything_but_sort() {
        let (mut orch, _) = orchestrator(vec![Step::ok(
            r#"{"exact_match":{"Name":"TAB A"},"similar_formulations":[]}"#,
        )]);
        orch.set_text("TAB A");
        orch.set_type_filter("Antidiabetic");
        orch.set_dosage_filter("1mg");
        orch.set_sort_order(SortOrder::HighToLow);
        orch.execute_search().await;

        orch.set_mode(SearchMode::Formulation);
        assert_eq!(
            orch.query(),
            &SearchQuery {
                mode: SearchMode::Formulation,
                sort_order: SortOrder::HighToLow,
                ..SearchQuery::default()
            }
        );
        assert_eq!(orch.result(), &SearchResult::default());
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let (mut orch, transport) = orchestrator(vec![
            Step::ok(r#"{"exact_match":{"Name":"OLD"},"similar_formulations":[]}"#),
            Step::ok(r#"{"exact_match":{"Name":"NEW"},"similar_formulations":[]}"#),
        ]);
        orch.set_text("OLD");
        let first = orch.begin_search().unwrap();
        orch.set_text("NEW");
        let second = orch.begin_search().unwrap();
        let second_generation = second.generation();
        assert!(second_generation > first.generation());
        match second.plan() {
            SearchPlan::General { criteria, .. } => {
                assert_eq!(criteria.name.as_deref(), Some("NEW"))
            }
            other => panic!("expected general search, got {other:?}"),
        }

        let service = orch.service().clone();
        let first_done = first.run(&service).await;
        let second_done = second.run(&service).await;
        assert_eq!(first_done.result().exact_match.as_ref().unwrap().name, "OLD");
        assert_eq!(second_done.generation(), second_generation);

        assert!(orch.complete(second_done));
        assert!(!orch.complete(first_done));
        assert_eq!(orch.result().exact_match.as_ref().unwrap().name, "NEW");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn mode_switch_orphans_in_flight_search() {
        let (mut orch, _) = orchestrator(vec![Step::ok(
            r#"{"exact_match":{"Name":"TAB A"},"similar_formulations":[]}"#,
        )]);
        orch.set_text("TAB A");
        let pending = orch.begin_search().unwrap();
        assert!(orch.is_searching());
        orch.set_mode(SearchMode::Formulation);
        let done = pending.run(orch.service()).await;
        assert!(!orch.complete(done));
        assert_eq!(orch.result(), &SearchResult::default());
    }

    #[tokio::test]
    async fn detached_orchestrator_ignores_completions() {
        let (mut orch, transport) = orchestrator(vec![Step::ok(
            r#"{"exact_match":{"Name":"TAB A"},"similar_formulations":[]}"#,
        )]);
        orch.set_text("TAB A");
        let pending = orch.begin_search().unwrap();
        orch.detach();
        let done = pending.run(orch.service()).await;
        assert!(!orch.complete(done));
        assert!(orch.begin_search().is_none());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestion_failures_yield_empty_list() {
        let (mut orch, transport) = orchestrator(vec![
            Step::ok(r#"{"suggestions":[{"value":"Glimepiride 1mg","field_type":"Formulation"}]}"#),
            Step::status(400, r#"{"detail":"Invalid field"}"#),
        ]);
        orch.set_mode(SearchMode::Formulation);
        orch.set_text("glim");
        assert_eq!(orch.query_suggestions().await, vec!["Glimepiride 1mg"]);
        assert!(transport.requests()[0].url.contains("/suggestions/Formulation"));

        assert!(orch.suggest(SuggestionField::Dosage, "1").await.is_empty());
        assert!(orch.suggest(SuggestionField::Type, "").await.is_empty());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn medicine_details_maps_not_found_to_none() {
        let (orch, _) = orchestrator(vec![
            Step::ok(&med("Amoxil", 3.0).to_string()),
            Step::status(404, r#"{"detail":"Medicine not found"}"#),
        ]);
        assert_eq!(orch.medicine_details("Amoxil").await.unwrap().cost_of_generic, 3.0);
        assert!(orch.medicine_details("Nope").await.is_none());
    }

    #[test]
    fn sorting_never_touches_exact_match() {
        let response = SearchResponse {
            exact_match: Some(priced(100.0)),
            similar_formulations: vec![priced(3.0), priced(1.0)],
            ..SearchResponse::default()
        };
        let result = SearchResult::from_response(response, SortOrder::LowToHigh);
        assert_eq!(result.exact_match.unwrap().cost_of_generic, 100.0);
        assert_eq!(result.similar[0].cost_of_generic, 1.0);
    }

    fn prices() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0u32..10_000, 0..20)
            .prop_map(|cents| cents.into_iter().map(|c| f64::from(c) / 100.0).collect())
    }

    proptest! {
        #[test]
        fn none_is_identity(prices in prices()) {
            let mut meds: Vec<_> = prices.iter().copied().map(priced).collect();
            let before = meds.clone();
            sort_by_generic_price(&mut meds, SortOrder::None);
            prop_assert_eq!(meds, before);
        }

        #[test]
        fn descending_reverses_ascending_without_ties(prices in prices()) {
            let mut unique = prices;
            unique.sort_by(|a, b| a.partial_cmp(b).unwrap());
            unique.dedup();
            let mut ascending: Vec<_> = unique.iter().rev().copied().map(priced).collect();
            sort_by_generic_price(&mut ascending, SortOrder::LowToHigh);
            let mut descending = ascending.clone();
            sort_by_generic_price(&mut descending, SortOrder::HighToLow);
            ascending.reverse();
            prop_assert_eq!(descending, ascending);
        }

        #[test]
        fn ties_keep_input_order(prices in prices()) {
            let mut meds: Vec<_> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| Medicine { name: i.to_string(), ..priced(p.floor()) })
                .collect();
            for order in [SortOrder::LowToHigh, SortOrder::HighToLow] {
                sort_by_generic_price(&mut meds, order);
                for pair in meds.windows(2) {
                    if pair[0].cost_of_generic == pair[1].cost_of_generic {
                        let a: usize = pair[0].name.parse().unwrap();
                        let b: usize = pair[1].name.parse().unwrap();
                        prop_assert!(a < b);
                    }
                }
                meds.sort_by_key(|m| m.name.parse::<usize>().unwrap());
            }
        }
    }
}
