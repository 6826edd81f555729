//! Stateless HTTP request builder and response parser for the GenericBro API.
//!
//! # Design
//! `MedicineClient` holds only the validated base URL and carries no mutable
//! state between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The round-trip itself belongs to a
//! [`Transport`](crate::transport::Transport) or to the FFI host.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::medicine::Medicine;
use crate::types::{
    ErrorDetail, SearchCriteria, SearchResponse, SortOrder, SuggestionField, SuggestionsResponse,
};

/// Synchronous, stateless client for the medicine finder API.
#[derive(Debug, Clone)]
pub struct MedicineClient {
    base_url: Url,
}

impl MedicineClient {
    /// Validate `base_url`, e.g. `http://127.0.0.1:8000/finder`. A trailing
    /// slash is tolerated.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments (each percent-encoded on its own) to the base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn build_suggestions(
        &self,
        field: SuggestionField,
        query: &str,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.endpoint(&["suggestions", field.as_str()])?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(get(url))
    }

    pub fn build_search(
        &self,
        criteria: &SearchCriteria,
        sort_order: Option<SortOrder>,
    ) -> Result<HttpRequest, ApiError> {
        if criteria.is_empty() {
            return Err(ApiError::EmptyCriteria);
        }
        let body =
            serde_json::to_string(criteria).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut url = self.endpoint(&["search"])?;
        if let Some(order) = sort_order {
            url.query_pairs_mut().append_pair("sort_order", order.as_str());
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_medicine_details(&self, name: &str) -> Result<HttpRequest, ApiError> {
        Ok(get(self.endpoint(&["medicine", name])?))
    }

    pub fn build_medicines_by_type(
        &self,
        medicine_type: &str,
        sort_order: Option<SortOrder>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.endpoint(&["medicines", "by_type"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("type", medicine_type.trim());
            if let Some(order) = sort_order {
                query.append_pair("sort_order", order.as_str());
            }
        }
        Ok(get(url))
    }

    pub fn parse_suggestions(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        let parsed: SuggestionsResponse = parse_json(response)?;
        Ok(parsed.suggestions.into_iter().map(|s| s.value).collect())
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<SearchResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_medicine_details(&self, response: HttpResponse) -> Result<Medicine, ApiError> {
        parse_json(response)
    }

    pub fn parse_medicines_by_type(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Medicine>, ApiError> {
        parse_json(response)
    }
}

fn get(url: Url) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url: url.into(),
        headers: Vec::new(),
        body: None,
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-200 status codes to the appropriate `ApiError` variant, keeping
/// the backend's `detail` message when the body carries one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    let detail = error_detail(&response.body)
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));
    if response.status == 404 {
        return Err(ApiError::NotFound { detail });
    }
    Err(ApiError::Http {
        status: response.status,
        detail,
    })
}

/// FastAPI sends `detail` as a string for `HTTPException` and as a list of
/// objects for validation failures; both are flattened to text.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorDetail = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Null => None,
        serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
