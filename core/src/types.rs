//! Request and response DTOs for the GenericBro API.
//!
//! # Design
//! These mirror the backend's schemas but are defined independently of the
//! mock-server crate; integration tests catch schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::medicine::Medicine;

/// Client-requested ordering by generic price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

impl SortOrder {
    /// Value of the `sort_order` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::None => "none",
            SortOrder::LowToHigh => "low_to_high",
            SortOrder::HighToLow => "high_to_low",
        }
    }

    /// `None` for [`SortOrder::None`], so the parameter can be omitted.
    pub fn as_param(self) -> Option<SortOrder> {
        (self != SortOrder::None).then_some(self)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column the suggestions endpoint can autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionField {
    Name,
    Formulation,
    Type,
    Dosage,
}

impl SuggestionField {
    /// Path segment expected by `/suggestions/{field}`.
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionField::Name => "Name",
            SuggestionField::Formulation => "Formulation",
            SuggestionField::Type => "Type",
            SuggestionField::Dosage => "Dosage",
        }
    }
}

/// Body of `POST /search`. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formulation: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub medicine_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

impl SearchCriteria {
    /// Drop blank name, formulation and type. The type is trimmed. Dosage
    /// is sent verbatim and only dropped when empty.
    pub fn new(
        name: Option<&str>,
        formulation: Option<&str>,
        medicine_type: Option<&str>,
        dosage: Option<&str>,
    ) -> Self {
        fn keep(value: Option<&str>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty()).map(str::to_string)
        }
        Self {
            name: keep(name),
            formulation: keep(formulation),
            medicine_type: keep(medicine_type.map(str::trim)),
            dosage: dosage.filter(|v| !v.is_empty()).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.formulation.is_none()
            && self.medicine_type.is_none()
            && self.dosage.is_none()
    }
}

/// Response of `POST /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub exact_match: Option<Medicine>,
    #[serde(default)]
    pub similar_formulations: Vec<Medicine>,
    #[serde(rename = "Uses", default)]
    pub uses: Option<String>,
    #[serde(rename = "Side Effects", alias = "Side_Effects", default)]
    pub side_effects: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Suggestion {
    pub value: String,
}

/// Error body the backend attaches to non-200 responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: serde_json::Value,
}
