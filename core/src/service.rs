//! The four backend calls, each run under the retry policy.
//!
//! # Design
//! `SearchService` glues the pure `MedicineClient` to a `Transport`: build
//! the request once, execute it (cloned per attempt) inside
//! [`with_retry`], parse the response inside the same attempt so a
//! non-retryable status ends the loop immediately. Every logical call gets
//! its own span carrying the endpoint and a request id.

use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::client::MedicineClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::medicine::Medicine;
use crate::retry::{with_retry, Endpoint, RetryPolicy};
use crate::transport::{Transport, UreqTransport};
use crate::types::{SearchCriteria, SearchResponse, SortOrder, SuggestionField};

type Parser<R> = fn(&MedicineClient, HttpResponse) -> Result<R, ApiError>;

#[derive(Debug, Clone)]
pub struct SearchService<T> {
    client: MedicineClient,
    transport: T,
    retry: RetryPolicy,
}

impl SearchService<UreqTransport> {
    /// Service backed by a real HTTP agent whose own timeout matches the
    /// per-attempt timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = MedicineClient::new(&config.base_url)?;
        info!(base_url = client.base_url(), "search service configured");
        Ok(Self::new(
            client,
            UreqTransport::new(config.retry.attempt_timeout),
            config.retry,
        ))
    }
}

impl<T: Transport> SearchService<T> {
    pub fn new(client: MedicineClient, transport: T, retry: RetryPolicy) -> Self {
        Self {
            client,
            transport,
            retry,
        }
    }

    pub fn client(&self) -> &MedicineClient {
        &self.client
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Autocomplete values for `field`. An empty query short-circuits to an
    /// empty list without touching the network.
    pub async fn fetch_suggestions(
        &self,
        field: SuggestionField,
        query: &str,
    ) -> Result<Vec<String>, ApiError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = self.client.build_suggestions(field, query)?;
        self.call(
            Endpoint::Suggestions,
            request,
            MedicineClient::parse_suggestions,
        )
        .await
    }

    pub async fn search_medicines(
        &self,
        criteria: &SearchCriteria,
        sort_order: Option<SortOrder>,
    ) -> Result<SearchResponse, ApiError> {
        let request = self.client.build_search(criteria, sort_order)?;
        self.call(Endpoint::Search, request, MedicineClient::parse_search)
            .await
    }

    pub async fn get_medicine_details(&self, name: &str) -> Result<Medicine, ApiError> {
        let request = self.client.build_medicine_details(name)?;
        self.call(
            Endpoint::MedicineDetails,
            request,
            MedicineClient::parse_medicine_details,
        )
        .await
    }

    pub async fn get_medicines_by_type(
        &self,
        medicine_type: &str,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<Medicine>, ApiError> {
        let request = self
            .client
            .build_medicines_by_type(medicine_type, sort_order)?;
        self.call(
            Endpoint::MedicinesByType,
            request,
            MedicineClient::parse_medicines_by_type,
        )
        .await
    }

    async fn call<R>(
        &self,
        endpoint: Endpoint,
        request: HttpRequest,
        parse: Parser<R>,
    ) -> Result<R, ApiError> {
        let span = info_span!("api_call", %endpoint, request_id = %Uuid::new_v4());
        async move {
            debug!(
                method = request.method.as_str(),
                url = %request.url,
                payload = request.body.as_deref().unwrap_or(""),
                "sending request"
            );
            let result = with_retry(&self.retry, endpoint, |attempt| {
                let request = request.clone();
                async move {
                    let response = self.transport.execute(request).await?;
                    debug!(
                        attempt,
                        status = response.status,
                        body = %response.body,
                        "received response"
                    );
                    parse(&self.client, response)
                }
            })
            .await;
            if let Err(err) = &result {
                error!(error = %err, status = ?err.status(), "request failed");
            }
            result
        }
        .instrument(span)
        .await
    }
}
