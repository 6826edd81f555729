//! Client core for the GenericBro medicine finder.
//!
//! # Overview
//! Searches medicines by name or formulation against the finder backend and
//! compares generic with branded cost. The presentation layer (a mobile
//! app, through `genericbro-ffi`) renders what this crate decides.
//!
//! # Design
//! - `MedicineClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. No I/O happens inside it.
//! - `SearchService` runs those requests over a `Transport` under a bounded
//!   retry policy (3 attempts, 10s each, 1s/2s backoff).
//! - `SearchOrchestrator` owns the search form state, chooses between the
//!   type listing and the general search, sorts by generic price, and maps
//!   every failure to a fixed `SearchNotice`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod medicine;
pub mod orchestrator;
pub mod retry;
pub mod service;
pub mod theme;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::MedicineClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use medicine::Medicine;
pub use orchestrator::{
    sort_by_generic_price, PendingSearch, SearchCompletion, SearchMode, SearchNotice,
    SearchOrchestrator, SearchPlan, SearchQuery, SearchResult,
};
pub use retry::{with_retry, Endpoint, RetryPolicy};
pub use service::SearchService;
pub use theme::Theme;
pub use transport::{Transport, UreqTransport};
pub use types::{SearchCriteria, SearchResponse, SortOrder, SuggestionField};
